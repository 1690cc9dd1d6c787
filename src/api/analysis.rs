use crate::state::AppState;
use crate::utils::{AppError, ErrorResponse};
use actix_web::{web, HttpResponse};
use serde::Deserialize;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AnalyzeRequest {
    /// Page to run through Lighthouse.
    pub url: Option<String>,
}

/// POST /get-url
/// Runs a Lighthouse analysis and relays the `categories` object unchanged
#[utoipa::path(
    post,
    path = "/get-url",
    tag = "Analysis",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Lighthouse categories (performance, accessibility, seo)"),
        (status = 400, description = "URL missing (`message` = \"URL is required\"), or rejected by the analysis API (`message` = \"Invalid request\", upstream error text in `details`)", body = ErrorResponse),
        (status = 500, description = "Analysis API unreachable (reason in `details`) or answered without categories (`message` = \"Unexpected response format from Lighthouse API\")", body = ErrorResponse)
    )
)]
pub async fn get_url(
    state: web::Data<AppState>,
    request: web::Json<AnalyzeRequest>,
) -> Result<HttpResponse, AppError> {
    let url = match request.url.as_deref().filter(|u| !u.is_empty()) {
        Some(url) => url,
        None => return Err(AppError::Validation("URL is required".to_string())),
    };

    log::info!("🌐 POST /get-url - url: {}", url);

    match state.analyzer.analyze(url).await {
        Ok(categories) => {
            log::info!("✅ Analysis complete: {}", url);
            Ok(HttpResponse::Ok().json(categories))
        }
        Err(e) => {
            log::error!("❌ Error analyzing website {}: {}", url, e);
            Err(e)
        }
    }
}
