pub mod blacklist;
pub mod password_reset;
pub mod product;
pub mod user;
pub mod verification_code;

pub use blacklist::PostgresTokenBlacklistRepository;
pub use password_reset::PostgresPasswordResetRepository;
pub use product::PostgresProductRepository;
pub use user::PostgresUserRepository;
pub use verification_code::PostgresVerificationCodeRepository;
