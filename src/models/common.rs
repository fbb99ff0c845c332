use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Subscription;

/// Response envelope shared by every endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[aliases(SubscriptionApiResponse = ApiResponse<Subscription>, SubscriptionListApiResponse = ApiResponse<Vec<Subscription>>)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: String, message: String) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError { code, message }),
        }
    }
}
