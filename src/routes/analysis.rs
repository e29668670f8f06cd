use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::config::UploadSettings;
use crate::core::{fallback_conversation, FallbackAnalyzer, HeuristicScorer};
use crate::models::{ErrorResponse, HealthResponse, ScoreConversationRequest, UploadRequest, UploadResponse};
use crate::services::accept_upload;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<FallbackAnalyzer>,
    pub scorer: Arc<HeuristicScorer>,
    pub upload: UploadSettings,
}

/// Configure all analysis routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/upload", web::post().to(upload_screenshot))
        .route("/conversations/score", web::post().to(score_conversation))
        .route("/conversations/sample", web::get().to(sample_analysis));
}

fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        remote_model: state.analyzer.has_primary(),
    })
}

/// Upload a screenshot for analysis
///
/// POST /api/v1/upload
///
/// Request body:
/// ```json
/// {
///   "fileName": "chat.png",
///   "mimeType": "image/png",
///   "imageBase64": "data:image/png;base64,..."
/// }
/// ```
async fn upload_screenshot(
    state: web::Data<AppState>,
    req: web::Json<UploadRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for upload request: {:?}", errors);
        return validation_error(errors);
    }

    let request_id = uuid::Uuid::new_v4().to_string();

    let accepted = match accept_upload(&req, &state.upload) {
        Ok(accepted) => accepted,
        Err(e) => {
            tracing::info!("Rejected upload {}: {}", request_id, e);
            let status = StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::BAD_REQUEST);
            return HttpResponse::build(status).json(ErrorResponse {
                error: "Invalid upload".to_string(),
                message: e.to_string(),
                status_code: status.as_u16(),
            });
        }
    };

    tracing::info!(
        "Analyzing upload {}: {} ({} bytes, {})",
        request_id,
        accepted.file.name,
        accepted.file.size,
        accepted.file.mime_type
    );

    let analysis = state.analyzer.run(&accepted.input).await;

    tracing::info!(
        "Upload {} scored {} by {:?}",
        request_id,
        analysis.analysis.romantic_interest_score,
        analysis.analysis.model.provider
    );

    HttpResponse::Ok().json(UploadResponse {
        request_id,
        file: accepted.file,
        analysis,
        next: "/api/v1/conversations/score".to_string(),
    })
}

/// Score an already-parsed conversation with the heuristic scorer
///
/// POST /api/v1/conversations/score
///
/// Request body:
/// ```json
/// {
///   "conversation": [{ "id": "0", "sender": "personA", "text": "hey!" }],
///   "fileName": "chat.png"
/// }
/// ```
async fn score_conversation(
    state: web::Data<AppState>,
    req: web::Json<ScoreConversationRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for score request: {:?}", errors);
        return validation_error(errors);
    }

    let req = req.into_inner();
    let file_name = req.file_name.clone();
    let messages = req.into_messages();

    let result = state.scorer.score_to_result(&messages, file_name.as_deref());

    tracing::info!(
        "Scored conversation of {} messages: {}",
        messages.len(),
        result.analysis.romantic_interest_score
    );

    HttpResponse::Ok().json(result)
}

/// Heuristic analysis of the built-in demo conversation
async fn sample_analysis(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.scorer.score_to_result(&fallback_conversation(), None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HeuristicAnalyzer;
    use actix_web::{test, App};

    fn state() -> AppState {
        let scorer = Arc::new(HeuristicScorer::with_defaults());
        AppState {
            analyzer: Arc::new(FallbackAnalyzer::heuristic_only(HeuristicAnalyzer::new(scorer.clone()))),
            scorer,
            upload: UploadSettings::default(),
        }
    }

    #[actix_web::test]
    async fn test_health_check_response() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: HealthResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.status, "healthy");
        assert!(!body.remote_model);
    }
}
