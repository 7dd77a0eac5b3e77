use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::sync::Arc;
use log::info;

/// Optional persona file loaded at startup. Only the system instruction is
/// used today; unknown fields are ignored so persona files can carry
/// client-side metadata.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PersonaConfig {
    #[serde(default)]
    pub system_instruction: Option<String>,
}

pub fn load_persona(path: &str) -> Result<Arc<PersonaConfig>, Box<dyn Error + Send + Sync>> {
    let raw = fs
        ::read_to_string(path)
        .map_err(|e| format!("Failed to read persona file '{}': {}", path, e))?;
    let persona: PersonaConfig = serde_json
        ::from_str(&raw)
        .map_err(|e| format!("Failed to parse persona file '{}': {}", path, e))?;

    info!(
        "Loaded persona from {} (system_instruction: {})",
        path,
        if persona.system_instruction.is_some() { "present" } else { "absent" }
    );

    Ok(Arc::new(persona))
}
