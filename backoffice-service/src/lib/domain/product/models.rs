use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::product::errors::ProductIdError;
use crate::domain::product::errors::SkuError;

/// Catalog product. Soft-deleted rows keep their data with status
/// "inactive" so sales history stays resolvable.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub brand: Option<String>,
    pub sku: Sku,
    pub image_url: Option<String>,
    pub quantity: i32,
    pub price: f64,
    pub purchase_price: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProductId(pub Uuid);

impl ProductId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an id from its canonical string form.
    ///
    /// # Errors
    /// * `InvalidUuid` - not a valid UUID
    pub fn from_string(raw: &str) -> Result<Self, ProductIdError> {
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| ProductIdError::InvalidUuid(raw.to_string()))
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stock-keeping unit. Uppercased on construction so lookups are
/// case-insensitive without a functional index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sku(String);

impl Sku {
    const MAX_LENGTH: usize = 64;

    /// # Errors
    /// * `Empty` - blank after trimming
    /// * `TooLong` - over 64 characters
    pub fn new(raw: String) -> Result<Self, SkuError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SkuError::Empty);
        }
        if trimmed.len() > Self::MAX_LENGTH {
            return Err(SkuError::TooLong(trimmed.len()));
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Sku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fields for creating a product. Quantity and prices default to zero when
/// the caller omits them.
#[derive(Debug, Clone)]
pub struct CreateProductCommand {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub brand: Option<String>,
    pub sku: Sku,
    pub image_url: Option<String>,
    pub quantity: i32,
    pub price: f64,
    pub purchase_price: f64,
}

/// Full-replacement update. Every field is written; there is no partial
/// variant for products.
#[derive(Debug, Clone)]
pub struct UpdateProductCommand {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub brand: Option<String>,
    pub sku: Sku,
    pub image_url: Option<String>,
    pub quantity: i32,
    pub price: f64,
    pub purchase_price: f64,
}

/// Aggregate inventory numbers over active products.
#[derive(Debug, Clone, PartialEq)]
pub struct InventorySummary {
    pub total_products: i64,
    pub total_units: i64,
    /// Sum of quantity * sale price.
    pub inventory_value: f64,
    pub low_stock_count: i64,
    pub out_of_stock_count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBreakdown {
    pub category: String,
    pub product_count: i64,
    pub total_units: i64,
}

/// A product sitting under the low-stock threshold.
#[derive(Debug, Clone)]
pub struct LowStockProduct {
    pub id: ProductId,
    pub name: String,
    pub sku: Sku,
    pub category: String,
    pub quantity: i32,
    pub price: f64,
    pub image_url: Option<String>,
}

/// Inventory statistics for the back-office dashboard.
#[derive(Debug, Clone)]
pub struct InventoryStats {
    pub summary: InventorySummary,
    pub by_category: Vec<CategoryBreakdown>,
    /// Up to five products with quantity below the threshold, lowest first.
    pub low_stock: Vec<LowStockProduct>,
}

/// Quantity below which a product counts as low stock.
pub const LOW_STOCK_THRESHOLD: i32 = 10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sku_is_uppercased_and_trimmed() {
        let sku = Sku::new("  abc-123  ".to_string()).unwrap();
        assert_eq!(sku.as_str(), "ABC-123");
    }

    #[test]
    fn test_sku_rejects_blank() {
        assert!(matches!(Sku::new("   ".to_string()), Err(SkuError::Empty)));
    }

    #[test]
    fn test_sku_rejects_overlong() {
        let raw = "X".repeat(65);
        assert!(matches!(Sku::new(raw), Err(SkuError::TooLong(65))));
    }

    #[test]
    fn test_product_id_round_trip() {
        let id = ProductId::new();
        let parsed = ProductId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_product_id_rejects_garbage() {
        assert!(ProductId::from_string("not-a-uuid").is_err());
    }
}
