pub mod health;
pub mod warehouse;

pub use health::{HealthResponse, health_check};
pub use warehouse::add_product_to_warehouse;
