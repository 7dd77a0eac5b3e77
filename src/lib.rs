pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod llm;
pub mod models;
pub mod relay;
pub mod server;

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use log::info;

use cli::Args;
use config::persona::{ self, PersonaConfig };
use llm::gemini::{ GeminiClient, DEFAULT_BASE_URL, DEFAULT_MODEL };
use relay::RelayService;
use server::Server;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Chat Model: {}", args.chat_model.as_deref().unwrap_or(DEFAULT_MODEL));
    info!("Chat Base URL: {}", args.chat_base_url.as_deref().unwrap_or(DEFAULT_BASE_URL));
    info!("Persona Path: {}", args.persona_path.as_deref().unwrap_or("(none)"));
    info!("Request Timeout: {}s", args.request_timeout_secs);
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let persona = match args.persona_path.as_deref() {
        Some(path) => persona::load_persona(path)?,
        None => Arc::new(PersonaConfig::default()),
    };

    let http = reqwest::Client
        ::builder()
        .timeout(Duration::from_secs(args.request_timeout_secs))
        .build()?;

    let provider = GeminiClient::new(
        http,
        args.chat_api_key.clone(),
        args.chat_model.clone(),
        args.chat_base_url.clone(),
        persona.system_instruction.clone()
    );

    let relay = Arc::new(RelayService::new(Arc::new(provider)));
    let addr = args.server_addr.clone();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, relay, args.clone());
    server.run().await?;

    Ok(())
}
