use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// PostgreSQL SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Error, Debug)]
pub enum FulfillmentError {
    #[error("Amount must be greater than 0.")]
    InvalidAmount,

    #[error("Product not found.")]
    ProductNotFound,

    #[error("Warehouse not found.")]
    WarehouseNotFound,

    #[error("No matching order found or it was already fulfilled.")]
    NoMatchingOrder,

    #[error("Price overflow: {unit_price} x {amount}")]
    PriceOverflow {
        unit_price: rust_decimal::Decimal,
        amount: i32,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl FulfillmentError {
    /// Map a failed stock-movement insert. A duplicate `IdOrder` means a
    /// concurrent request fulfilled the order first.
    pub fn from_insert_error(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db_err)
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                Self::NoMatchingOrder
            }
            _ => Self::Database(e),
        }
    }

    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidAmount | Self::NoMatchingOrder => StatusCode::BAD_REQUEST,
            Self::ProductNotFound | Self::WarehouseNotFound => StatusCode::NOT_FOUND,
            Self::PriceOverflow { .. } | Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_internal(&self) -> bool {
        self.http_status() == StatusCode::INTERNAL_SERVER_ERROR
    }

    /// Text returned to the caller. Internal failures only expose a category.
    pub fn client_message(&self) -> String {
        match self {
            Self::PriceOverflow { .. } => "Internal server error: price overflow".to_string(),
            Self::Database(e) => format!("Internal server error: {}", database_category(e)),
            other => other.to_string(),
        }
    }
}

fn database_category(e: &sqlx::Error) -> &'static str {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            "database unavailable"
        }
        _ => "database error",
    }
}

impl IntoResponse for FulfillmentError {
    fn into_response(self) -> Response {
        if self.is_internal() {
            tracing::error!(error = %self, "Fulfillment failed with internal error");
        }
        (self.http_status(), self.client_message()).into_response()
    }
}
