use crate::store::StoreError;
use shared::{AppError, ErrorCode};
use thiserror::Error;

/// Cart errors
#[derive(Debug, Error)]
pub enum CartError {
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i32),

    #[error("Quantity of cart line {0} is too large")]
    QuantityOverflow(String),
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::Storage(e) => e.into(),
            CartError::InvalidQuantity(qty) => {
                AppError::with_message(ErrorCode::InvalidQuantity, format!("Invalid quantity: {}", qty))
                    .with_detail("quantity", qty)
            }
            CartError::QuantityOverflow(line_id) => AppError::with_message(
                ErrorCode::ValueOutOfRange,
                format!("Quantity of cart line {} is too large", line_id),
            )
            .with_detail("line_id", line_id),
        }
    }
}
