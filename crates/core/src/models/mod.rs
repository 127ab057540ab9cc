pub mod forecast;
pub mod product;
pub mod section;
pub mod settings;
pub mod sku;
pub mod trend;
pub mod user;
