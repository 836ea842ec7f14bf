use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::product::errors::ProductError;
use crate::domain::product::models::CategoryBreakdown;
use crate::domain::product::models::CreateProductCommand;
use crate::domain::product::models::InventoryStats;
use crate::domain::product::models::InventorySummary;
use crate::domain::product::models::LowStockProduct;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductId;
use crate::domain::product::models::Sku;
use crate::domain::product::models::UpdateProductCommand;
use crate::domain::product::models::LOW_STOCK_THRESHOLD;
use crate::domain::product::ports::ProductRepository;

const PRODUCT_COLUMNS: &str = "id, name, description, category, brand, sku, image_url, \
     quantity, price, purchase_price, status, created_at, updated_at";

pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    category: String,
    brand: Option<String>,
    sku: String,
    image_url: Option<String>,
    quantity: i32,
    price: f64,
    purchase_price: f64,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self) -> Result<Product, ProductError> {
        Ok(Product {
            id: ProductId(self.id),
            name: self.name,
            description: self.description,
            category: self.category,
            brand: self.brand,
            sku: Sku::new(self.sku)?,
            image_url: self.image_url,
            quantity: self.quantity,
            price: self.price,
            purchase_price: self.purchase_price,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn map_sku_violation(e: sqlx::Error, sku: &Sku) -> ProductError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() && db_err.constraint() == Some("products_sku_key") {
            return ProductError::SkuAlreadyExists(sku.to_string());
        }
    }
    ProductError::DatabaseError(e.to_string())
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn list_active(&self) -> Result<Vec<Product>, ProductError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE status = 'active' ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        row.map(ProductRow::into_product).transpose()
    }

    async fn create(&self, command: CreateProductCommand) -> Result<Product, ProductError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            INSERT INTO products (
                id, name, description, category, brand, sku, image_url,
                quantity, price, purchase_price, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'active', now(), now())
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&command.name)
        .bind(&command.description)
        .bind(&command.category)
        .bind(&command.brand)
        .bind(command.sku.as_str())
        .bind(&command.image_url)
        .bind(command.quantity)
        .bind(command.price)
        .bind(command.purchase_price)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sku_violation(e, &command.sku))?;

        row.into_product()
    }

    async fn update(
        &self,
        id: &ProductId,
        command: UpdateProductCommand,
    ) -> Result<Product, ProductError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            UPDATE products
            SET name = $2, description = $3, category = $4, brand = $5, sku = $6,
                image_url = $7, quantity = $8, price = $9, purchase_price = $10,
                updated_at = now()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id.0)
        .bind(&command.name)
        .bind(&command.description)
        .bind(&command.category)
        .bind(&command.brand)
        .bind(command.sku.as_str())
        .bind(&command.image_url)
        .bind(command.quantity)
        .bind(command.price)
        .bind(command.purchase_price)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sku_violation(e, &command.sku))?;

        match row {
            Some(r) => r.into_product(),
            None => Err(ProductError::NotFound(id.to_string())),
        }
    }

    async fn deactivate(&self, id: &ProductId) -> Result<String, ProductError> {
        let row = sqlx::query(
            r#"
            UPDATE products
            SET status = 'inactive', updated_at = now()
            WHERE id = $1
            RETURNING name
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        match row {
            Some(r) => Ok(r.get("name")),
            None => Err(ProductError::NotFound(id.to_string())),
        }
    }

    async fn stats(&self) -> Result<InventoryStats, ProductError> {
        let totals = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total_products,
                COALESCE(SUM(quantity), 0)::bigint AS total_units,
                COALESCE(SUM(quantity * price), 0)::float8 AS inventory_value,
                COUNT(*) FILTER (WHERE quantity < $1) AS low_stock_count,
                COUNT(*) FILTER (WHERE quantity = 0) AS out_of_stock_count
            FROM products
            WHERE status = 'active'
            "#,
        )
        .bind(LOW_STOCK_THRESHOLD)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        let by_category = sqlx::query(
            r#"
            SELECT category,
                   COUNT(*) AS product_count,
                   COALESCE(SUM(quantity), 0)::bigint AS total_units
            FROM products
            WHERE status = 'active'
            GROUP BY category
            ORDER BY product_count DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        let low_stock = sqlx::query(
            r#"
            SELECT id, name, sku, category, quantity, price, image_url
            FROM products
            WHERE status = 'active' AND quantity < $1
            ORDER BY quantity ASC
            LIMIT 5
            "#,
        )
        .bind(LOW_STOCK_THRESHOLD)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        Ok(InventoryStats {
            summary: InventorySummary {
                total_products: totals.get("total_products"),
                total_units: totals.get("total_units"),
                inventory_value: totals.get("inventory_value"),
                low_stock_count: totals.get("low_stock_count"),
                out_of_stock_count: totals.get("out_of_stock_count"),
            },
            by_category: by_category
                .into_iter()
                .map(|row| CategoryBreakdown {
                    category: row.get("category"),
                    product_count: row.get("product_count"),
                    total_units: row.get("total_units"),
                })
                .collect(),
            low_stock: low_stock
                .into_iter()
                .map(|row| {
                    Ok(LowStockProduct {
                        id: ProductId(row.get("id")),
                        name: row.get("name"),
                        sku: Sku::new(row.get("sku"))?,
                        category: row.get("category"),
                        quantity: row.get("quantity"),
                        price: row.get("price"),
                        image_url: row.get("image_url"),
                    })
                })
                .collect::<Result<Vec<_>, ProductError>>()?,
        })
    }
}
