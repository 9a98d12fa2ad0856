//! API request and response types

use crate::runtime::SessionBlob;
use crate::state_machine::Step;
use serde::{Deserialize, Serialize};

/// Chat turn where the client carries the session blob
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub session_data: Option<SessionBlob>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_data: SessionBlob,
}

/// Chat turn against a server-held session
#[derive(Debug, Deserialize)]
pub struct SessionChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SessionChatResponse {
    pub response: String,
    pub step: Step,
}

#[derive(Debug, Serialize)]
pub struct CategoryInfo {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<CategoryInfo>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
