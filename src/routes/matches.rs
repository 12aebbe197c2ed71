use crate::core::MatchEngine;
use crate::models::{ErrorResponse, FindMatchesRequest, FindMatchesResponse, HealthResponse};
use crate::services::{RemoteScorer, SupabaseClient, SupabaseError};
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use std::time::Duration;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub supabase: Arc<SupabaseClient>,
    pub remote: Arc<RemoteScorer>,
    pub engine: MatchEngine,
    /// Threshold applied when the request omits one.
    pub default_min_score: u8,
    /// Upper bound on the best-effort AI scoring call.
    pub remote_timeout: Duration,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/matches/find", web::post().to(find_matches));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let supabase_healthy = state.supabase.health_check().await.unwrap_or(false);

    let status = if supabase_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Find matches endpoint
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "personaId": "string",
///   "projectId": "string",
///   "minMatchScore": 60
/// }
/// ```
///
/// Runs the two-phase pipeline: best-effort AI scoring under a timeout,
/// always-on local heuristic scoring, then merge and threshold selection.
/// AI failure is non-fatal and surfaces as `remote_used: false`.
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    // Validate request
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_matches request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let min_score = req.min_match_score.unwrap_or(state.default_min_score);
    let run_id = uuid::Uuid::new_v4();

    tracing::info!(
        "[{}] Matching persona {} against project {} (min score {})",
        run_id,
        req.persona_id,
        req.project_id,
        min_score
    );

    let persona = match state.supabase.get_persona(&req.persona_id).await {
        Ok(persona) => persona,
        Err(SupabaseError::NotFound(message)) => {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "Persona not found".to_string(),
                message,
                status_code: 404,
            });
        }
        Err(e) => {
            tracing::error!("Failed to fetch persona {}: {}", req.persona_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch persona".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let contacts = match state.supabase.list_contacts(&req.project_id).await {
        Ok(contacts) => contacts,
        Err(e) => {
            tracing::error!("Failed to fetch contacts for {}: {}", req.project_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch contacts".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    if contacts.is_empty() {
        return HttpResponse::Ok().json(FindMatchesResponse {
            matches: vec![],
            total_contacts: 0,
            min_match_score: min_score,
            remote_used: false,
        });
    }

    // Phase 1: best-effort remote scoring. Any failure or timeout degrades
    // to an empty remote list; the match run still succeeds.
    let (remote_matches, remote_used) =
        match tokio::time::timeout(state.remote_timeout, state.remote.score(&persona, &contacts))
            .await
        {
            Ok(Ok(matches)) => {
                let used = !matches.is_empty();
                (matches, used)
            }
            Ok(Err(e)) => {
                tracing::warn!("Remote scoring unavailable, using local heuristics only: {}", e);
                (Vec::new(), false)
            }
            Err(_) => {
                tracing::warn!(
                    "Remote scoring timed out after {:?}, using local heuristics only",
                    state.remote_timeout
                );
                (Vec::new(), false)
            }
        };

    // Phase 2: local heuristic scoring always runs, then merge and select.
    let local_matches = state.engine.score_contacts(&persona, &contacts);
    let merged = state.engine.merge(&remote_matches, local_matches, &contacts);
    let selected = state.engine.select_for_sending(merged, min_score);

    tracing::info!(
        "[{}] Returning {} matches for persona {} (from {} contacts, remote_used={})",
        run_id,
        selected.len(),
        req.persona_id,
        contacts.len(),
        remote_used
    );

    HttpResponse::Ok().json(FindMatchesResponse {
        matches: selected,
        total_contacts: contacts.len(),
        min_match_score: min_score,
        remote_used,
    })
}
