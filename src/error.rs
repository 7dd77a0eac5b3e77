use thiserror::Error;

use crate::llm::ProviderError;
use crate::models::chat::ChatResponse;

/// Everything `RelayService::handle_chat` can fail with. Each variant maps to
/// exactly one documented JSON error shape; provider internals never reach
/// the client.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("request carried no message")]
    EmptyMessage,

    /// The provider returned no usable candidate. `reason` is the provider's
    /// block reason verbatim when one was supplied.
    #[error("provider blocked the response (reason: {reason:?})")]
    Blocked {
        reason: Option<String>,
    },

    #[error("provider call failed")]
    Provider(#[source] ProviderError),
}

impl RelayError {
    /// The JSON body the client sees for this failure. Kept separate from
    /// status selection so the wire layer owns status codes alone.
    pub fn into_response_body(self) -> ChatResponse {
        match self {
            RelayError::EmptyMessage => ChatResponse::failure("message is required", None),
            RelayError::Blocked { reason } =>
                ChatResponse::failure("response blocked", reason),
            RelayError::Provider(_) =>
                ChatResponse::failure("server error processing request", None),
        }
    }
}
