use crate::cli::Args;
use crate::error::RelayError;
use crate::models::chat::{ ChatRequest, ChatResponse };
use crate::relay::RelayService;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    routing::post,
    Router,
    Json,
    extract::State,
    http::StatusCode,
};
use tower_http::cors::{ Any, CorsLayer };
use log::info;

#[derive(Clone)]
struct AppState {
    relay: Arc<RelayService>,
}

/// Routes plus the permissive CORS layer. The browser client is served from
/// a different origin, so every origin, method, and header is allowed.
pub fn build_router(relay: Arc<RelayService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/chat", post(chat_handler))
        .layer(cors)
        .with_state(AppState { relay })
}

pub async fn start_http_server(
    addr_str: &str,
    relay: Arc<RelayService>,
    args: Args
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = addr_str.parse::<SocketAddr>()?;
    let app = build_router(relay);

    if args.enable_tls && args.tls_cert_path.is_some() && args.tls_key_path.is_some() {
        let cert_path = args.tls_cert_path.as_ref().unwrap();
        let key_path = args.tls_key_path.as_ref().unwrap();

        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
            cert_path,
            key_path
        ).await?;

        info!("Starting HTTPS API server on: https://{}", addr);
        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await?;
    } else {
        info!("Starting HTTP API server on: http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app.into_make_service()).await?;
    }

    Ok(())
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>
) -> (StatusCode, Json<ChatResponse>) {
    match state.relay.handle_chat(request).await {
        Ok(reply) => (StatusCode::OK, Json(ChatResponse::success(reply))),
        Err(err) => error_reply(err),
    }
}

fn error_reply(err: RelayError) -> (StatusCode, Json<ChatResponse>) {
    let status = match err {
        RelayError::EmptyMessage => StatusCode::BAD_REQUEST,
        RelayError::Blocked { .. } | RelayError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(err.into_response_body()))
}
