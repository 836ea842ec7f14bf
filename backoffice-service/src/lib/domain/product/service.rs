use std::sync::Arc;

use crate::domain::product::errors::ProductError;
use crate::domain::product::models::CreateProductCommand;
use crate::domain::product::models::InventoryStats;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductId;
use crate::domain::product::models::UpdateProductCommand;
use crate::domain::product::ports::ProductRepository;

/// Catalog service behind the protected product routes.
pub struct ProductService<PR: ProductRepository> {
    products: Arc<PR>,
}

impl<PR: ProductRepository> ProductService<PR> {
    pub fn new(products: Arc<PR>) -> Self {
        Self { products }
    }

    pub async fn list(&self) -> Result<Vec<Product>, ProductError> {
        self.products.list_active().await
    }

    pub async fn get(&self, id: &ProductId) -> Result<Product, ProductError> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))
    }

    pub async fn create(&self, command: CreateProductCommand) -> Result<Product, ProductError> {
        let product = self.products.create(command).await?;
        tracing::info!(sku = %product.sku, "Product created");
        Ok(product)
    }

    pub async fn update(
        &self,
        id: &ProductId,
        command: UpdateProductCommand,
    ) -> Result<Product, ProductError> {
        let product = self.products.update(id, command).await?;
        tracing::info!(sku = %product.sku, "Product updated");
        Ok(product)
    }

    /// Deactivate instead of deleting, so the row survives for history.
    /// Returns the product name for the confirmation message.
    pub async fn deactivate(&self, id: &ProductId) -> Result<String, ProductError> {
        let name = self.products.deactivate(id).await?;
        tracing::info!(product = %name, "Product deactivated");
        Ok(name)
    }

    pub async fn inventory_stats(&self) -> Result<InventoryStats, ProductError> {
        self.products.stats().await
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::domain::product::models::Sku;

    mock! {
        pub Products {}

        #[async_trait]
        impl ProductRepository for Products {
            async fn list_active(&self) -> Result<Vec<Product>, ProductError>;
            async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductError>;
            async fn create(&self, command: CreateProductCommand) -> Result<Product, ProductError>;
            async fn update(
                &self,
                id: &ProductId,
                command: UpdateProductCommand,
            ) -> Result<Product, ProductError>;
            async fn deactivate(&self, id: &ProductId) -> Result<String, ProductError>;
            async fn stats(&self) -> Result<InventoryStats, ProductError>;
        }
    }

    fn sample_product() -> Product {
        let now = Utc::now();
        Product {
            id: ProductId::new(),
            name: "Wooden blocks".to_string(),
            description: None,
            category: "toys".to_string(),
            brand: Some("Acme".to_string()),
            sku: Sku::new("BLK-001".to_string()).unwrap(),
            image_url: None,
            quantity: 25,
            price: 19.99,
            purchase_price: 8.50,
            status: "active".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_get_missing_product_is_not_found() {
        let mut products = MockProducts::new();
        products.expect_find_by_id().returning(|_| Ok(None));

        let service = ProductService::new(Arc::new(products));
        let result = service.get(&ProductId::new()).await;
        assert!(matches!(result, Err(ProductError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_surfaces_sku_conflict() {
        let mut products = MockProducts::new();
        products
            .expect_create()
            .returning(|command| Err(ProductError::SkuAlreadyExists(command.sku.to_string())));

        let service = ProductService::new(Arc::new(products));
        let command = CreateProductCommand {
            name: "Wooden blocks".to_string(),
            description: None,
            category: "toys".to_string(),
            brand: None,
            sku: Sku::new("BLK-001".to_string()).unwrap(),
            image_url: None,
            quantity: 0,
            price: 0.0,
            purchase_price: 0.0,
        };

        let result = service.create(command).await;
        assert!(matches!(result, Err(ProductError::SkuAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_deactivate_returns_name() {
        let product = sample_product();
        let id = product.id;

        let mut products = MockProducts::new();
        products
            .expect_deactivate()
            .withf(move |candidate| *candidate == id)
            .times(1)
            .returning(|_| Ok("Wooden blocks".to_string()));

        let service = ProductService::new(Arc::new(products));
        let name = service.deactivate(&id).await.unwrap();
        assert_eq!(name, "Wooden blocks");
    }

    #[tokio::test]
    async fn test_list_passes_through() {
        let mut products = MockProducts::new();
        products
            .expect_list_active()
            .returning(|| Ok(vec![sample_product()]));

        let service = ProductService::new(Arc::new(products));
        let listed = service.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].sku.as_str(), "BLK-001");
    }
}
