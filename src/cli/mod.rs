use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Chat Provider Args ---
    /// API key for the generative language provider.
    #[arg(long, env = "CHAT_API_KEY")]
    pub chat_api_key: String,

    /// Model name for chat completion (e.g., gemini-1.5-flash)
    #[arg(long, env = "CHAT_MODEL")] // No default, rely on client defaults if None
    pub chat_model: Option<String>,

    /// Base URL for the provider API. Override for proxies or testing.
    #[arg(long, env = "CHAT_BASE_URL")] // No default, let the client handle defaults if None
    pub chat_base_url: Option<String>,

    /// Timeout in seconds for a single provider call.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "30")]
    pub request_timeout_secs: u64,

    // --- General App Args ---
    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:3001")]
    pub server_addr: String,

    /// Optional path to a JSON persona file carrying a system instruction.
    #[arg(long, env = "PERSONA_PATH")]
    pub persona_path: Option<String>,

    /// Optional path to the TLS certificate file (PEM format) for enabling HTTPS. Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format) for enabling HTTPS. Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}
