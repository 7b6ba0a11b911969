use super::error::ApiError;
use super::extractors::AppJson;
use super::models::{
    SaveResultResponse, StatisticsResponse, TestResultSubmission, TextQuery, TextResponse,
};
use super::AppState;
use crate::progress::compute_progress;
use crate::stats::{NewTestResult, StatsDb};
use crate::word_generator::{TextGenerator, TextRequest};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use rand::{rngs::StdRng, SeedableRng};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use validator::Validate;

const FAVICON_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100"><text y=".9em" font-size="90">⚡</text></svg>"#;

/// Run a database operation off the async executor
async fn with_db<T, F>(state: &Arc<AppState>, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&StatsDb) -> crate::error::Result<T> + Send + 'static,
{
    let state = state.clone();
    let result = tokio::task::spawn_blocking(move || {
        let db = state.db();
        op(&*db)
    })
    .await?;
    result.map_err(ApiError::from)
}

pub async fn get_text(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TextQuery>,
) -> Result<Json<TextResponse>, ApiError> {
    let request = TextRequest::from_keys(&query.lang, &query.difficulty)?;
    tracing::info!(
        "Generating text: language={}, difficulty={}",
        request.language,
        request.difficulty
    );

    let generator_state = state.clone();
    let text = tokio::task::spawn_blocking(move || {
        let mut rng = StdRng::from_entropy();
        TextGenerator::new(&generator_state.config).generate_text(&request, &mut rng)
    })
    .await??;

    Ok(Json(TextResponse {
        text,
        language: request.language,
        difficulty: request.difficulty,
    }))
}

pub async fn save_test_result(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<Map<String, Value>>,
) -> Result<Json<SaveResultResponse>, ApiError> {
    let submission = TestResultSubmission::from_loose(&body);
    submission
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    let (language, difficulty) = submission.keys().map_err(ApiError::bad_request)?;

    let saved = with_db(&state, move |db| {
        let user = db.resolve_user(submission.user_id.as_deref())?;
        db.record_result(&NewTestResult {
            user_id: user.id,
            chars_per_minute: submission.chars_per_minute,
            accuracy: submission.accuracy,
            time_seconds: submission.time_seconds,
            language,
            difficulty,
            created_at: None,
        })
    })
    .await?;

    tracing::info!(
        user_id = %saved.user_id,
        test_result_id = saved.id,
        "Saved test result"
    );

    Ok(Json(SaveResultResponse {
        user_id: saved.user_id,
        test_result_id: saved.id,
    }))
}

pub async fn get_user_statistics(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<StatisticsResponse>, ApiError> {
    tracing::info!("Fetching statistics for user {}", user_id);

    let lookup_id = user_id.clone();
    let statistics = with_db(&state, move |db| {
        let history = db.results_for_user(&lookup_id)?;
        if history.is_empty() {
            return Ok(None);
        }
        Ok(Some(StatisticsResponse {
            last_result: db.last_result(&lookup_id)?,
            best_performance: db.best_performance(&lookup_id)?,
            avg_statistics: db.average_statistics(&lookup_id)?,
            progress_metrics: compute_progress(&history),
            all_test_results: history,
        }))
    })
    .await?;

    statistics
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("no test results for user '{user_id}'")))
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database = match with_db(&state, |db| db.ping()).await {
        Ok(()) => json!({ "status": "healthy" }),
        Err(e) => {
            tracing::warn!("database health check failed: {:?}", e);
            json!({ "status": "unhealthy" })
        }
    };
    let healthy = database.get("status").and_then(|v| v.as_str()) == Some("healthy");

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(json!({
            "status": if healthy { "healthy" } else { "degraded" },
            "service": "typetest",
            "version": env!("CARGO_PKG_VERSION"),
            "dependencies": { "database": database }
        })),
    )
}

pub async fn favicon() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/svg+xml")], FAVICON_SVG)
}
