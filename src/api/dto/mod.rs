//! Response envelopes for the HTTP surface.

pub mod cluster_dto;

use serde::Serialize;

/// Standard wrapper for successful JSON responses. Errors go through `AppError`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data }
    }
}
