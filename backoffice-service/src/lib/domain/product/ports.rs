use async_trait::async_trait;

use crate::domain::product::errors::ProductError;
use crate::domain::product::models::CreateProductCommand;
use crate::domain::product::models::InventoryStats;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductId;
use crate::domain::product::models::UpdateProductCommand;

/// Persistence port for the product catalog.
#[async_trait]
pub trait ProductRepository: Send + Sync + 'static {
    /// Active products, newest first.
    async fn list_active(&self) -> Result<Vec<Product>, ProductError>;

    /// Find a product regardless of status.
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductError>;

    /// Insert a new product.
    ///
    /// # Errors
    /// * `SkuAlreadyExists` - unique constraint on `sku`
    async fn create(&self, command: CreateProductCommand) -> Result<Product, ProductError>;

    /// Replace every mutable field of the product.
    ///
    /// # Errors
    /// * `NotFound` - no such product
    /// * `SkuAlreadyExists` - the new SKU belongs to a different product
    async fn update(
        &self,
        id: &ProductId,
        command: UpdateProductCommand,
    ) -> Result<Product, ProductError>;

    /// Soft delete: set status to "inactive". Returns the product name for
    /// the confirmation message.
    ///
    /// # Errors
    /// * `NotFound` - no such product
    async fn deactivate(&self, id: &ProductId) -> Result<String, ProductError>;

    /// Inventory statistics over active products.
    async fn stats(&self) -> Result<InventoryStats, ProductError>;
}
