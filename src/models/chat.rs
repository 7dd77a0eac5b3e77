use serde::{ Deserialize, Deserializer, Serialize };

/// Conversation participant. The wire format knows exactly two roles;
/// any unrecognized value collapses to `Model` during deserialization so
/// the coercion is visible at the boundary instead of deep in the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error> where D: Deserializer<'de> {
        let value = String::deserialize(deserializer)?;
        Ok(match value.as_str() {
            "user" => Role::User,
            _ => Role::Model,
        })
    }
}

/// One conversational turn as the client sends it. `timestamp` is advisory
/// and client-owned; the relay accepts it and ignores it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// Body of `POST /api/chat`. `message` is the newest user turn and is kept
/// separate from `history`, which holds everything before it. A missing
/// `message` deserializes to the empty string and is rejected by validation
/// so the client always sees the documented JSON error shape.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

/// Result contract of `POST /api/chat`: exactly one of the two variants is
/// ever produced for a request.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatResponse {
    Success {
        response: String,
    },
    Failure {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
}

impl ChatResponse {
    pub fn success(response: impl Into<String>) -> Self {
        ChatResponse::Success { response: response.into() }
    }

    pub fn failure(error: impl Into<String>, details: Option<String>) -> Self {
        ChatResponse::Failure { error: error.into(), details }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_round_trips_known_values() {
        assert_eq!(serde_json::to_value(Role::User).unwrap(), json!("user"));
        assert_eq!(serde_json::to_value(Role::Model).unwrap(), json!("model"));
        assert_eq!(serde_json::from_value::<Role>(json!("user")).unwrap(), Role::User);
        assert_eq!(serde_json::from_value::<Role>(json!("model")).unwrap(), Role::Model);
    }

    #[test]
    fn unknown_role_collapses_to_model() {
        assert_eq!(serde_json::from_value::<Role>(json!("system")).unwrap(), Role::Model);
        assert_eq!(serde_json::from_value::<Role>(json!("assistant")).unwrap(), Role::Model);
        assert_eq!(serde_json::from_value::<Role>(json!("")).unwrap(), Role::Model);
    }

    #[test]
    fn chat_request_defaults_missing_fields() {
        let request: ChatRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(request.message, "");
        assert!(request.history.is_empty());

        let request: ChatRequest = serde_json::from_value(json!({
            "message": "hello",
            "history": [{ "role": "user", "text": "hi", "timestamp": 1700000000 }]
        })).unwrap();
        assert_eq!(request.message, "hello");
        assert_eq!(request.history.len(), 1);
        assert_eq!(request.history[0].timestamp, Some(1700000000));
    }

    #[test]
    fn success_response_serializes_only_response_field() {
        let value = serde_json::to_value(ChatResponse::success("hi there")).unwrap();
        assert_eq!(value, json!({ "response": "hi there" }));
    }

    #[test]
    fn failure_response_omits_absent_details() {
        let value = serde_json::to_value(ChatResponse::failure("server error", None)).unwrap();
        assert_eq!(value, json!({ "error": "server error" }));

        let value = serde_json::to_value(
            ChatResponse::failure("response blocked", Some("SAFETY".to_string()))
        ).unwrap();
        assert_eq!(value, json!({ "error": "response blocked", "details": "SAFETY" }));
    }
}
