#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProductIdError {
    #[error("Invalid product id: {0}")]
    InvalidUuid(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SkuError {
    #[error("SKU cannot be empty")]
    Empty,

    #[error("SKU is too long: {0} characters, maximum is 64")]
    TooLong(usize),
}

#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    #[error(transparent)]
    InvalidProductId(#[from] ProductIdError),

    #[error(transparent)]
    InvalidSku(#[from] SkuError),

    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("SKU already exists: {0}")]
    SkuAlreadyExists(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
