use serde::{Deserialize, Serialize};

/// Body of `POST /contacts`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub full_name: String,
    pub email: String,
    pub company: String,
    pub role: String,
    pub phone: String,
    pub country: String,
    pub linkedin: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
