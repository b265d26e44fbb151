//! HTTP surface of the ledger node.
pub mod constants;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use constants::{HEALTH_OK, MINED_MESSAGE};
use ledger_core::{digest_of, Block, ChainSnapshot, LedgerError, SharedLedger};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::error;

#[derive(Clone)]
pub struct AppState {
    pub ledger: SharedLedger,
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

#[derive(Serialize)]
struct Head {
    height: usize,
    digest: String,
}

#[derive(Serialize)]
struct MineResponse {
    message: &'static str,
    #[serde(flatten)]
    block: Block,
}

#[derive(Serialize)]
struct ValidityResponse {
    message: &'static str,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug)]
pub enum ApiError {
    Mining(LedgerError),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Mining(LedgerError::Pow(err)) => {
                (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
            }
            ApiError::Mining(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError::Mining(err)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/chain/head", get(head))
        .route("/mine_block", get(mine_block))
        .route("/get_chain", get(get_chain))
        .route("/valid", get(valid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Health> {
    Json(Health { status: HEALTH_OK })
}

async fn head(State(state): State<AppState>) -> Json<Head> {
    let tip = state.ledger.latest_block();
    Json(Head {
        height: state.ledger.len(),
        digest: digest_of(&tip),
    })
}

/// Runs the search on the blocking pool; the request waits until a block
/// is appended or the search is cancelled.
async fn mine_block(State(state): State<AppState>) -> Result<Json<MineResponse>, ApiError> {
    let ledger = state.ledger.clone();
    let block = tokio::task::spawn_blocking(move || ledger.mine())
        .await
        .map_err(|err| {
            error!(%err, "mining task failed");
            ApiError::Internal(err.to_string())
        })??;
    Ok(Json(MineResponse {
        message: MINED_MESSAGE,
        block,
    }))
}

async fn get_chain(State(state): State<AppState>) -> Json<ChainSnapshot> {
    Json(state.ledger.read_chain())
}

async fn valid(State(state): State<AppState>) -> Json<ValidityResponse> {
    Json(ValidityResponse {
        message: state.ledger.check_validity().message(),
    })
}
