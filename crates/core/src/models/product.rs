use serde::{Deserialize, Serialize};

use super::sku::Sku;

/// Categories offered by the product form.
pub const CATEGORIES: [&str; 10] = [
    "Produce",
    "Meat",
    "Dairy",
    "Seafood",
    "Bakery",
    "Frozen",
    "Pantry",
    "Beverages",
    "Snacks",
    "Household",
];

/// Lead time used when the form leaves it blank or unparseable.
pub const DEFAULT_LEAD_TIME_DAYS: u32 = 3;

/// Minimum order quantity used when the form leaves it blank or unparseable.
pub const DEFAULT_MIN_ORDER_QUANTITY: u32 = 50;

/// Raw product form contents, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub category: String,
    pub base_price: String,
    pub description: String,
    pub supplier: String,
    pub lead_time_days: String,
    pub min_order_quantity: String,
    pub sku_id: String,
}

/// A named field of [`ProductDraft`], for field-by-field editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductField {
    Name,
    Category,
    BasePrice,
    Description,
    Supplier,
    LeadTimeDays,
    MinOrderQuantity,
    SkuId,
}

impl ProductDraft {
    pub fn set(&mut self, field: ProductField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ProductField::Name => self.name = value,
            ProductField::Category => self.category = value,
            ProductField::BasePrice => self.base_price = value,
            ProductField::Description => self.description = value,
            ProductField::Supplier => self.supplier = value,
            ProductField::LeadTimeDays => self.lead_time_days = value,
            ProductField::MinOrderQuantity => self.min_order_quantity = value,
            ProductField::SkuId => self.sku_id = value,
        }
    }

    pub fn get(&self, field: ProductField) -> &str {
        match field {
            ProductField::Name => &self.name,
            ProductField::Category => &self.category,
            ProductField::BasePrice => &self.base_price,
            ProductField::Description => &self.description,
            ProductField::Supplier => &self.supplier,
            ProductField::LeadTimeDays => &self.lead_time_days,
            ProductField::MinOrderQuantity => &self.min_order_quantity,
            ProductField::SkuId => &self.sku_id,
        }
    }
}

/// Body of `POST /add-product`, after coercion of the draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub sku_id: String,
    pub name: String,
    pub category: String,
    pub base_price: f64,
    pub description: String,
    pub supplier: String,
    pub lead_time_days: u32,
    pub min_order_quantity: u32,
}

/// Successful response of `POST /add-product`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCreated {
    #[serde(default)]
    pub message: String,
    pub product: Sku,
}
