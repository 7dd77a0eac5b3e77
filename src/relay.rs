use std::sync::Arc;

use log::{ error, info, warn };

use crate::error::RelayError;
use crate::history::{ self, NormalizedHistory };
use crate::llm::{ ChatProvider, Content, ProviderError };
use crate::models::chat::ChatRequest;

/// Coordinates one chat exchange: validate, normalize, call the provider,
/// classify the outcome. Holds only read-only state, so one instance serves
/// every request concurrently without locking.
pub struct RelayService {
    provider: Arc<dyn ChatProvider>,
}

impl RelayService {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle_chat(&self, request: ChatRequest) -> Result<String, RelayError> {
        if request.message.is_empty() {
            return Err(RelayError::EmptyMessage);
        }

        let normalized = history::normalize(&request.history);
        let turns = self.repair_if_needed(normalized);

        info!(
            "relaying chat: history_turns={} message_chars={}",
            turns.len(),
            request.message.len()
        );

        match self.provider.generate(&turns, &request.message).await {
            Ok(reply) => Ok(reply),
            Err(ProviderError::Blocked { reason }) => {
                warn!("provider blocked the response (reason: {:?})", reason);
                Err(RelayError::Blocked { reason })
            }
            Err(err) => {
                error!("provider call failed: {}", err);
                Err(RelayError::Provider(err))
            }
        }
    }

    fn repair_if_needed(&self, normalized: NormalizedHistory) -> Vec<Content> {
        if normalized.first_turn_is_user() {
            normalized.turns
        } else {
            history::trim_to_first_user_turn(normalized.turns)
        }
    }
}
