use actix_web::{web, HttpResponse, Responder};
use crate::models::{DecideRequest, ErrorResponse, HealthResponse, PointerInput, TapRequest};
use crate::services::{DeckRegistry, MatchingError};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<DeckRegistry>,
}

/// Configure all deck routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/decks/{user_id}", web::get().to(get_deck))
        .route("/decks/{user_id}/pointer", web::post().to(pointer))
        .route("/decks/{user_id}/tap", web::post().to(tap_photo))
        .route("/decks/{user_id}/decide", web::post().to(decide))
        .route("/decks/{user_id}/reload", web::post().to(reload))
        .route("/decks/{user_id}/more", web::post().to(load_more));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        sessions: state.registry.session_count(),
        timestamp: chrono::Utc::now(),
    })
}

/// Current deck view
///
/// GET /api/v1/decks/{userId}
async fn get_deck(state: web::Data<AppState>, user_id: web::Path<String>) -> impl Responder {
    let session = state.registry.get_or_create(&user_id).await;
    HttpResponse::Ok().json(session.view())
}

/// Pointer event on the top card
///
/// POST /api/v1/decks/{userId}/pointer
///
/// Request body:
/// ```json
/// { "type": "move", "pointerId": 1, "x": 212.0, "y": 340.5 }
/// ```
async fn pointer(
    state: web::Data<AppState>,
    user_id: web::Path<String>,
    req: web::Json<PointerInput>,
) -> impl Responder {
    let session = state.registry.get_or_create(&user_id).await;
    HttpResponse::Ok().json(session.pointer(req.into_inner()))
}

/// Photo navigation click on the top card
///
/// POST /api/v1/decks/{userId}/tap
///
/// Request body:
/// ```json
/// { "side": "left|right" }
/// ```
async fn tap_photo(
    state: web::Data<AppState>,
    user_id: web::Path<String>,
    req: web::Json<TapRequest>,
) -> impl Responder {
    let session = state.registry.get_or_create(&user_id).await;
    HttpResponse::Ok().json(session.tap_photo(req.side))
}

/// Decision button press
///
/// POST /api/v1/decks/{userId}/decide
///
/// Request body:
/// ```json
/// { "decision": "like|nope|super_like" }
/// ```
async fn decide(
    state: web::Data<AppState>,
    user_id: web::Path<String>,
    req: web::Json<DecideRequest>,
) -> impl Responder {
    let session = state.registry.get_or_create(&user_id).await;
    tracing::info!("Decision button {} for user {}", req.decision, user_id);
    HttpResponse::Ok().json(session.decide(req.decision))
}

/// Start over with a fresh candidate snapshot
///
/// POST /api/v1/decks/{userId}/reload
async fn reload(state: web::Data<AppState>, user_id: web::Path<String>) -> impl Responder {
    let session = state.registry.get_or_create(&user_id).await;
    match session.reload().await {
        Ok(view) => {
            tracing::info!("Reloaded deck for user {} ({} profiles)", user_id, view.remaining);
            HttpResponse::Ok().json(view)
        }
        Err(e) => source_failure(&user_id, "reload deck", e),
    }
}

/// Put newly available candidates in front of the queue
///
/// POST /api/v1/decks/{userId}/more
async fn load_more(state: web::Data<AppState>, user_id: web::Path<String>) -> impl Responder {
    let session = state.registry.get_or_create(&user_id).await;
    match session.load_more().await {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => source_failure(&user_id, "load more profiles", e),
    }
}

fn source_failure(user_id: &str, action: &str, e: MatchingError) -> HttpResponse {
    tracing::error!("Failed to {} for {}: {}", action, user_id, e);
    HttpResponse::BadGateway().json(ErrorResponse {
        error: format!("Failed to {}", action),
        message: e.to_string(),
        status_code: 502,
    })
}
