pub mod gemini;

use async_trait::async_trait;
use serde::{ Deserialize, Serialize };
use thiserror::Error;

use crate::models::chat::Role;

/// One text fragment inside a provider turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// A role-tagged turn in the shape the generative API expects. The role is
/// absent on system instructions and may be absent in responses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn turn(role: Role, text: &str) -> Self {
        Self {
            role: Some(role),
            parts: vec![Part { text: text.to_string() }],
        }
    }

    pub fn user(text: &str) -> Self {
        Self::turn(Role::User, text)
    }

    pub fn untagged(text: &str) -> Self {
        Self {
            role: None,
            parts: vec![Part { text: text.to_string() }],
        }
    }

    /// Concatenated text of all parts.
    pub fn text(&self) -> String {
        self.parts.iter().map(|p| p.text.as_str()).collect()
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider withheld the answer (safety filter). Distinct from a
    /// transport failure; `reason` carries the provider's block reason
    /// verbatim when one was supplied.
    #[error("provider withheld the response (reason: {reason:?})")]
    Blocked {
        reason: Option<String>,
    },

    #[error("provider call timed out")]
    Timeout,

    #[error("provider transport error: {0}")]
    Http(reqwest::Error),

    #[error("unexpected provider response: {0}")]
    UnexpectedResponse(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_decode() {
            ProviderError::UnexpectedResponse(err.to_string())
        } else {
            ProviderError::Http(err)
        }
    }
}

/// The capability this service depends on: given the normalized turn history
/// and the newest user message, produce a single non-streamed reply.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn generate(
        &self,
        history: &[Content],
        message: &str
    ) -> Result<String, ProviderError>;
}
