//! Common HTTP building blocks: response envelopes and extractors

pub mod validated_json;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use validated_json::{JsonBody, PatchBody, ValidatedJson};

/// Success envelope for a single resource: `{"success": true, "data": {...}}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Always `true`; failures use the error envelope
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Success envelope for collections: `{"success": true, "count": n, "data": [...]}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListResponse<T> {
    pub success: bool,
    /// Number of items in `data`
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}
