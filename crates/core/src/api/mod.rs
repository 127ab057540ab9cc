pub mod traits;

// Implementations
pub mod http;
pub mod static_trends;
