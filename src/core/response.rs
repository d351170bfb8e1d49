use serde::Serialize;

/// Normalized status/message pair handed back to the caller for display.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HandlerResponse {
    pub payload: String,
    pub status: u16,
    pub headers: ResponseHeaders,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResponseHeaders {
    #[serde(rename = "Content-Type")]
    pub content_type: String,
}

impl HandlerResponse {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        HandlerResponse {
            payload: message.into(),
            status,
            headers: ResponseHeaders {
                content_type: "text/plain".to_string(),
            },
        }
    }
}
