use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body returned by every failing API call
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Acknowledgement body for mutating calls
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
    /// Id of the created resource, only present on creation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl ActionResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            id: None,
        }
    }

    pub fn created(message: impl Into<String>, id: i64) -> Self {
        Self {
            success: true,
            message: message.into(),
            id: Some(id),
        }
    }
}
