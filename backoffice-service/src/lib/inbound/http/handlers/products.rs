use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::one_time_code::MessageResponseData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::product::models::CreateProductCommand;
use crate::domain::product::models::InventoryStats;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductId;
use crate::domain::product::models::Sku;
use crate::domain::product::models::UpdateProductCommand;
use crate::inbound::http::router::AppState;

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<ProductResponseData>>, ApiError> {
    state
        .product_service
        .list()
        .await
        .map_err(ApiError::from)
        .map(|products| {
            ApiSuccess::new(
                StatusCode::OK,
                products.iter().map(ProductResponseData::from).collect(),
            )
        })
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<ApiSuccess<ProductResponseData>, ApiError> {
    let id = parse_id(&product_id)?;

    state
        .product_service
        .get(&id)
        .await
        .map_err(ApiError::from)
        .map(|ref product| ApiSuccess::new(StatusCode::OK, product.into()))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(body): Json<ProductRequest>,
) -> Result<ApiSuccess<ProductResponseData>, ApiError> {
    let command = body.try_into_create_command()?;

    state
        .product_service
        .create(command)
        .await
        .map_err(ApiError::from)
        .map(|ref product| ApiSuccess::new(StatusCode::CREATED, product.into()))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(body): Json<ProductRequest>,
) -> Result<ApiSuccess<ProductResponseData>, ApiError> {
    let id = parse_id(&product_id)?;
    let command = body.try_into_update_command()?;

    state
        .product_service
        .update(&id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref product| ApiSuccess::new(StatusCode::OK, product.into()))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<ApiSuccess<MessageResponseData>, ApiError> {
    let id = parse_id(&product_id)?;

    state
        .product_service
        .deactivate(&id)
        .await
        .map_err(ApiError::from)
        .map(|name| {
            ApiSuccess::new(
                StatusCode::OK,
                MessageResponseData {
                    message: format!("Product deactivated: {name}"),
                },
            )
        })
}

pub async fn inventory_stats(
    State(state): State<AppState>,
) -> Result<ApiSuccess<InventoryStatsResponseData>, ApiError> {
    state
        .product_service
        .inventory_stats()
        .await
        .map_err(ApiError::from)
        .map(|stats| ApiSuccess::new(StatusCode::OK, stats.into()))
}

fn parse_id(raw: &str) -> Result<ProductId, ApiError> {
    ProductId::from_string(raw).map_err(|e| ApiError::UnprocessableEntity(e.to_string()))
}

/// Shared body for create and full update.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductRequest {
    name: String,
    description: Option<String>,
    category: String,
    brand: Option<String>,
    sku: String,
    image_url: Option<String>,
    #[serde(default)]
    quantity: i32,
    #[serde(default)]
    price: f64,
    #[serde(default)]
    purchase_price: f64,
}

impl ProductRequest {
    fn validate(&self) -> Result<Sku, ApiError> {
        if self.name.trim().is_empty() || self.category.trim().is_empty() {
            return Err(ApiError::BadRequest(
                "name, sku, and category are required".to_string(),
            ));
        }
        Sku::new(self.sku.clone()).map_err(|e| ApiError::UnprocessableEntity(e.to_string()))
    }

    fn try_into_create_command(self) -> Result<CreateProductCommand, ApiError> {
        let sku = self.validate()?;
        Ok(CreateProductCommand {
            name: self.name,
            description: self.description,
            category: self.category,
            brand: self.brand,
            sku,
            image_url: self.image_url,
            quantity: self.quantity,
            price: self.price,
            purchase_price: self.purchase_price,
        })
    }

    fn try_into_update_command(self) -> Result<UpdateProductCommand, ApiError> {
        let sku = self.validate()?;
        Ok(UpdateProductCommand {
            name: self.name,
            description: self.description,
            category: self.category,
            brand: self.brand,
            sku,
            image_url: self.image_url,
            quantity: self.quantity,
            price: self.price,
            purchase_price: self.purchase_price,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductResponseData {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub brand: Option<String>,
    pub sku: String,
    pub image_url: Option<String>,
    pub quantity: i32,
    pub price: f64,
    pub purchase_price: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Product> for ProductResponseData {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            brand: product.brand.clone(),
            sku: product.sku.as_str().to_string(),
            image_url: product.image_url.clone(),
            quantity: product.quantity,
            price: product.price,
            purchase_price: product.purchase_price,
            status: product.status.clone(),
            created_at: product.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryStatsResponseData {
    pub total_products: i64,
    pub total_units: i64,
    pub inventory_value: f64,
    pub low_stock_count: i64,
    pub out_of_stock_count: i64,
    pub by_category: Vec<CategoryBreakdownData>,
    pub low_stock: Vec<LowStockProductData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBreakdownData {
    pub category: String,
    pub product_count: i64,
    pub total_units: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowStockProductData {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub quantity: i32,
    pub price: f64,
    pub image_url: Option<String>,
}

impl From<InventoryStats> for InventoryStatsResponseData {
    fn from(stats: InventoryStats) -> Self {
        Self {
            total_products: stats.summary.total_products,
            total_units: stats.summary.total_units,
            inventory_value: stats.summary.inventory_value,
            low_stock_count: stats.summary.low_stock_count,
            out_of_stock_count: stats.summary.out_of_stock_count,
            by_category: stats
                .by_category
                .into_iter()
                .map(|c| CategoryBreakdownData {
                    category: c.category,
                    product_count: c.product_count,
                    total_units: c.total_units,
                })
                .collect(),
            low_stock: stats
                .low_stock
                .into_iter()
                .map(|p| LowStockProductData {
                    id: p.id.to_string(),
                    name: p.name,
                    sku: p.sku.as_str().to_string(),
                    category: p.category,
                    quantity: p.quantity,
                    price: p.price,
                    image_url: p.image_url,
                })
                .collect(),
        }
    }
}
