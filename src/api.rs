use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::task::JoinError;
use tower_http::cors::CorsLayer;

use crate::config::ServerConfig;
use crate::{compare_methods, Comparison, Method, PrimeError, GREETING, VERSION};

pub struct AppState {
    pub max_count: usize,
    pub max_trials: u32,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            max_count: config.max_count,
            max_trials: config.max_trials,
        }
    }

    fn check_trials(&self, requested: u32) -> Result<(), PrimeError> {
        if requested > self.max_trials {
            tracing::warn!("Rejected comparison of {} trials (limit {})", requested, self.max_trials);
            return Err(PrimeError::TrialLimitExceeded {
                requested,
                max: self.max_trials,
            });
        }
        Ok(())
    }

    fn check_limit(&self, requested: usize) -> Result<(), PrimeError> {
        if requested > self.max_count {
            tracing::warn!("Rejected request for {} primes (limit {})", requested, self.max_count);
            return Err(PrimeError::LimitExceeded {
                requested,
                max: self.max_count,
            });
        }
        Ok(())
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/info", get(info))
        .route("/primes/{count}", get(get_primes))
        .route("/compare/{count}", get(compare))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub enum ApiError {
    Prime(PrimeError),
    Task(JoinError),
}

impl From<PrimeError> for ApiError {
    fn from(err: PrimeError) -> Self {
        Self::Prime(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Prime(
                err @ (PrimeError::LimitExceeded { .. } | PrimeError::TrialLimitExceeded { .. }),
            ) => {
                (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            ApiError::Prime(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::Task(err) => {
                tracing::error!("Generation task failed: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };
        (status, Json(json!({"error": message}))).into_response()
    }
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

async fn info() -> impl IntoResponse {
    Json(json!({
        "version": VERSION,
        "string": GREETING,
    }))
}

#[derive(Deserialize)]
pub struct PrimesQuery {
    #[serde(default)]
    method: Method,
}

#[derive(Serialize)]
pub struct PrimesResponse {
    method: Method,
    count: usize,
    primes: Vec<u64>,
}

async fn get_primes(
    State(state): State<Arc<AppState>>,
    Path(count): Path<usize>,
    Query(PrimesQuery { method }): Query<PrimesQuery>,
) -> Result<Json<PrimesResponse>, ApiError> {
    state.check_limit(count)?;
    tracing::debug!("Generating {} primes with {:?}", count, method);

    let primes = blocking(move || method.generate(count)).await?;
    Ok(Json(PrimesResponse {
        method,
        count,
        primes,
    }))
}

#[derive(Deserialize)]
pub struct CompareQuery {
    #[serde(default = "default_trials")]
    trials: u32,
}

fn default_trials() -> u32 {
    1
}

async fn compare(
    State(state): State<Arc<AppState>>,
    Path(count): Path<usize>,
    Query(CompareQuery { trials }): Query<CompareQuery>,
) -> Result<Json<Comparison>, ApiError> {
    state.check_limit(count)?;
    state.check_trials(trials)?;
    tracing::debug!("Comparing methods over {} trials of {} primes", trials, count);

    let comparison = blocking(move || compare_methods(count, trials)).await?;
    for timing in &comparison.results {
        tracing::debug!("{} took {:.3}s", timing.label, timing.seconds);
    }
    Ok(Json(comparison))
}

/// Runs CPU-bound generation off the async workers.
async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, PrimeError> + Send + 'static,
{
    Ok(tokio::task::spawn_blocking(work)
        .await
        .map_err(ApiError::Task)??)
}
