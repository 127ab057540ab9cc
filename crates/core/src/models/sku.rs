use serde::{Deserialize, Serialize};

/// A stock-keeping unit as served by `GET /skus`.
///
/// Products created through `/add-product` carry extra fields; they are
/// optional here so both shapes deserialize into the same type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sku {
    /// Identifier (e.g., "SKU001")
    pub id: String,

    /// Display name (e.g., "Organic Bananas")
    pub name: String,

    /// Category (e.g., "Produce")
    pub category: String,

    /// List price in USD; the promo simulator starts from this value
    pub base_price: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_time_days: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_order_quantity: Option<u32>,
}

impl Sku {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        base_price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            base_price,
            description: None,
            supplier: None,
            lead_time_days: None,
            min_order_quantity: None,
        }
    }
}

/// Envelope of `GET /skus`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuList {
    pub skus: Vec<Sku>,
}
