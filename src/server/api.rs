use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    routing::{ get, post },
    Router,
    extract::{ State, Query },
    response::IntoResponse,
    http::StatusCode,
    Json,
};
use serde::{ Deserialize, Serialize };
use tower_http::cors::{ Any, CorsLayer };
use log::{ info, warn, error };
use uuid::Uuid;
use crate::booking;
use crate::cli::Args;
use crate::config::fleet::FleetConfig;
use crate::i18n;
use crate::models::booking::BookingRequest;
use crate::resolver::ChatAgent;

#[derive(Clone)]
struct AppState {
    agent: Arc<ChatAgent>,
    fleet: Arc<FleetConfig>,
    http: reqwest::Client,
    args: Args,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub language: Option<String>,
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
struct ChatResponse {
    response: String,
    conversation_id: String,
}

#[derive(Deserialize)]
pub struct LanguageQuery {
    pub language: Option<String>,
}

#[derive(Serialize)]
struct WelcomeResponse {
    response: String,
}

#[derive(Serialize)]
struct FaqItem {
    question: String,
    answer: String,
}

#[derive(Serialize)]
struct BookingResponse {
    success: bool,
    message: Option<String>,
    whatsapp_url: Option<String>,
}

#[derive(Serialize)]
struct ReloadResponse {
    success: bool,
    message: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub async fn serve(
    addr: &str,
    agent: Arc<ChatAgent>,
    fleet: Arc<FleetConfig>,
    args: Args
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let socket_addr = addr.parse::<SocketAddr>()?;

    let app_state = AppState {
        agent,
        fleet,
        http: reqwest::Client::new(),
        args: args.clone(),
    };

    let app = router(app_state);

    if args.enable_tls && args.tls_cert_path.is_some() && args.tls_key_path.is_some() {
        let cert_path = args.tls_cert_path.as_ref().unwrap();
        let key_path = args.tls_key_path.as_ref().unwrap();

        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
            cert_path,
            key_path
        ).await?;

        info!("Starting HTTPS server on: https://{}", socket_addr);
        axum_server::bind_rustls(socket_addr, tls_config).serve(app.into_make_service()).await?;
    } else {
        info!("Starting HTTP server on: http://{}", socket_addr);
        let listener = tokio::net::TcpListener::bind(socket_addr).await?;
        axum::serve(listener, app.into_make_service()).await?;
    }

    Ok(())
}

fn router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/chat/welcome", get(welcome_handler))
        .route("/api/booking", post(booking_handler))
        .route("/api/fleet", get(fleet_handler))
        .route("/api/faq", get(faq_handler))
        .route("/api/reload-faq", get(reload_faq_handler))
        .layer(cors)
        .with_state(state)
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>
) -> impl IntoResponse {
    let lang = i18n::resolve_lang(req.language.as_deref());

    if req.message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ChatResponse {
                response: i18n::message(i18n::MessageKey::ChatEmptyMessage, lang).to_string(),
                conversation_id: req.conversation_id.unwrap_or_default(),
            }),
        ).into_response();
    }

    let conversation_id = req.conversation_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    match state.agent.resolve(&conversation_id, req.message.trim(), lang).await {
        Ok(response) =>
            (StatusCode::OK, Json(ChatResponse { response, conversation_id })).into_response(),
        Err(e) => {
            error!("Chat resolution failed: {}", e);
            let apology = i18n
                ::message(i18n::MessageKey::GenericErrorApology, lang)
                .replace("{whatsapp}", &state.args.whatsapp_number);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatResponse { response: apology, conversation_id }),
            ).into_response()
        }
    }
}

async fn welcome_handler(
    State(state): State<AppState>,
    Query(query): Query<LanguageQuery>
) -> impl IntoResponse {
    let lang = i18n::resolve_lang(query.language.as_deref());
    Json(WelcomeResponse { response: state.agent.welcome(lang) })
}

async fn booking_handler(
    State(state): State<AppState>,
    Query(query): Query<LanguageQuery>,
    Json(req): Json<BookingRequest>
) -> impl IntoResponse {
    let lang = i18n::resolve_lang(query.language.as_deref());

    if let Err(e) = booking::validate(&req) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(BookingResponse {
                success: false,
                message: Some(e.localized(lang)),
                whatsapp_url: None,
            }),
        ).into_response();
    }

    // Best effort: a failed persist never blocks the WhatsApp handoff.
    if let Some(endpoint) = state.args.booking_endpoint.as_deref() {
        if let Err(e) = booking::persist(&state.http, endpoint, &req).await {
            warn!("Booking persistence failed (continuing with handoff): {}", e);
        }
    }

    let url = booking::whatsapp_link(&state.args.whatsapp_number, &req, lang);
    (
        StatusCode::OK,
        Json(BookingResponse {
            success: true,
            message: None,
            whatsapp_url: Some(url),
        }),
    ).into_response()
}

async fn fleet_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.fleet.vehicles.clone())
}

async fn faq_handler(
    State(state): State<AppState>,
    Query(query): Query<LanguageQuery>
) -> impl IntoResponse {
    let lang = i18n::resolve_lang(query.language.as_deref());
    let faq = state.agent.faq_snapshot().await;
    let items: Vec<FaqItem> = faq.entries
        .iter()
        .filter_map(|entry| {
            match (entry.question_for(lang), entry.answer_for(lang)) {
                (Some(question), Some(answer)) =>
                    Some(FaqItem {
                        question: question.to_string(),
                        answer: answer.to_string(),
                    }),
                _ => None,
            }
        })
        .collect();
    Json(items)
}

async fn reload_faq_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.agent.reload_faq_if_changed(&state.args.faq_path).await {
        Ok(true) =>
            (
                StatusCode::OK,
                Json(ReloadResponse { success: true, message: "FAQ reloaded".into() }),
            ).into_response(),
        Ok(false) =>
            (
                StatusCode::OK,
                Json(ReloadResponse { success: true, message: "FAQ unchanged".into() }),
            ).into_response(),
        Err(e) =>
            (
                StatusCode::BAD_REQUEST,
                Json(ReloadResponse { success: false, message: format!("Reload error: {}", e) }),
            ).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{ to_bytes, Body };
    use axum::http::Request;
    use clap::Parser;
    use serde_json::{ json, Value };
    use tower::ServiceExt;
    use crate::config::{ faq, fleet };
    use crate::history::initialize_history_store;

    fn test_state(booking_endpoint: Option<&str>) -> AppState {
        let mut args = Args::parse_from(["rental-assistant"]);
        args.booking_endpoint = booking_endpoint.map(|s| s.to_string());
        let history = initialize_history_store(&args).unwrap();
        let faq = faq::load_faq("json/faq.json").unwrap();
        let fleet = fleet::load_fleet("json/fleet.json").unwrap();
        let agent = Arc::new(ChatAgent::new(None, history, faq, args.whatsapp_number.clone()));
        AppState {
            agent,
            fleet,
            http: reqwest::Client::new(),
            args,
        }
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap()
            ).await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn booking_body() -> Value {
        json!({
            "name": "Budi",
            "vehicle": "Toyota Innova Reborn",
            "contact": "081234567890",
            "start_date": "2025-07-01",
            "end_date": "2025-07-03",
            "destination": "Yogyakarta",
            "price_per_day": 850000
        })
    }

    #[tokio::test]
    async fn booking_template_follows_the_client_language() {
        let app = router(test_state(None));
        let (status, body) = post_json(app, "/api/booking?language=en", booking_body()).await;

        assert_eq!(status, StatusCode::OK);
        let url = body["whatsapp_url"].as_str().unwrap();
        assert!(url.contains("Hello"));
        assert!(!url.contains("Halo"));
    }

    #[tokio::test]
    async fn booking_without_language_uses_the_default_locale() {
        let app = router(test_state(None));
        let (status, body) = post_json(app, "/api/booking", booking_body()).await;

        assert_eq!(status, StatusCode::OK);
        let url = body["whatsapp_url"].as_str().unwrap();
        assert!(url.contains("Halo"));
    }

    #[tokio::test]
    async fn booking_validation_errors_follow_the_client_language() {
        let app = router(test_state(None));
        let mut body = booking_body();
        body["name"] = json!("");
        let (status, resp) = post_json(app, "/api/booking?language=en", body).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(resp["message"], "Field name is required");
    }

    #[tokio::test]
    async fn persist_failure_does_not_block_the_handoff() {
        // Nothing listens on port 9; the POST fails with connection refused.
        let app = router(test_state(Some("http://127.0.0.1:9/api/booking")));
        let (status, body) = post_json(app, "/api/booking", booking_body()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(body["whatsapp_url"].as_str().unwrap().starts_with("https://wa.me/"));
    }

    #[tokio::test]
    async fn empty_chat_message_is_rejected_with_localized_text() {
        let app = router(test_state(None));
        let (status, body) = post_json(
            app,
            "/api/chat",
            json!({"message": "   ", "language": "en"})
        ).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["response"], "Message must not be empty.");
    }
}
