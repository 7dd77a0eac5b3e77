use log::warn;

use crate::llm::Content;
use crate::models::chat::{ ChatMessage, Role };

/// Provider-shaped transcript produced from the client's history. Order and
/// turn count always match the input; repair is a separate, explicit step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedHistory {
    pub turns: Vec<Content>,
}

impl NormalizedHistory {
    /// True when the transcript is empty or opens with a user turn. The
    /// generative API rejects transcripts that open with a model turn, so
    /// callers check this before sending.
    pub fn first_turn_is_user(&self) -> bool {
        self.turns
            .first()
            .map_or(true, |content| content.role == Some(Role::User))
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Maps every client message to a provider turn, one to one. Empty texts and
/// consecutive same-role turns pass through untouched; the advisory client
/// timestamp is discarded here.
pub fn normalize(history: &[ChatMessage]) -> NormalizedHistory {
    let turns = history
        .iter()
        .map(|message| Content::turn(message.role, &message.text))
        .collect();
    NormalizedHistory { turns }
}

/// Drops leading model turns until the transcript opens with a user turn,
/// logging each dropped turn. Interior model turns are never touched.
pub fn trim_to_first_user_turn(turns: Vec<Content>) -> Vec<Content> {
    let mut dropped = 0usize;
    let repaired: Vec<Content> = turns
        .into_iter()
        .skip_while(|content| {
            let leading_model = content.role != Some(Role::User);
            if leading_model {
                dropped += 1;
            }
            leading_model
        })
        .collect();

    if dropped > 0 {
        warn!(
            "history opened with {} model turn(s); dropped them so the transcript starts with a user turn",
            dropped
        );
    }

    repaired
}
