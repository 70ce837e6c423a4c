use crate::store::StoreError;
use shared::models::OrderStatus;
use shared::{AppError, ErrorCode};
use thiserror::Error;

/// Order lifecycle errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Order {id} is already {}", .status.label())]
    AlreadyProcessed { id: String, status: OrderStatus },
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Storage(e) => e.into(),
            OrderError::EmptyCart => AppError::new(ErrorCode::CartEmpty),
            OrderError::OrderNotFound(id) => {
                AppError::with_message(ErrorCode::OrderNotFound, format!("Order not found: {}", id))
                    .with_detail("order_id", id)
            }
            OrderError::AlreadyProcessed { id, status } => AppError::with_message(
                ErrorCode::OrderAlreadyPaid,
                format!("Order {} is already {}", id, status.label()),
            )
            .with_detail("order_id", id)
            .with_detail("status", status.label()),
        }
    }
}
