use std::fmt;

use serde::Deserialize;

/// Errors raised while accepting a user request
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("userRequest must not be empty")]
    Empty,
}

/// The free-text description of the prompt a user wants designed.
///
/// Always non-blank. The text is kept exactly as submitted so every stage
/// sees the same request verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRequest(String);

impl UserRequest {
    pub fn new(text: impl Into<String>) -> Result<Self, RequestError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(RequestError::Empty);
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<DesignPromptRequest> for UserRequest {
    type Error = RequestError;

    fn try_from(body: DesignPromptRequest) -> Result<Self, Self::Error> {
        Self::new(body.user_request)
    }
}

/// JSON body of `POST /design_prompt`
#[derive(Debug, Clone, Deserialize)]
pub struct DesignPromptRequest {
    #[serde(rename = "userRequest")]
    pub user_request: String,
}
