//! HTTP server setup and routing.
//!
//! Thin glue over the catalogue and the merge engine: listing profiles,
//! ingesting presets, and applying named profiles to a submitted domain
//! spec. Errors travel as a `{code, message}` JSON envelope over a non-2xx
//! status; if even that envelope cannot be encoded, the response degrades to
//! a fixed plain-text 500 body rather than being left unfinished.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::catalogue::Catalogue;
use crate::config::ServiceConfig;
use crate::error::{CatalogueError, MergeError, SetupError};
use crate::merge::Merger;
use crate::types::{DomainSpec, Preset};

pub struct AppState {
    pub catalogue: Catalogue,
    pub merger: Merger,
}

pub type SharedState = Arc<AppState>;

/// Merge request: a base domain spec plus the names of the profiles to apply.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub domain: DomainSpec,
    #[serde(default)]
    pub profiles: Vec<String>,
}

/// Merge response: the merged spec and any non-fatal warnings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyResponse {
    pub domain: DomainSpec,
    pub warnings: Vec<String>,
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

const INTERNAL_ERROR_BODY: &str = "500 - internal error";

/// Build the `{code, message}` envelope, degrading to fixed text if the
/// envelope itself cannot be encoded.
fn error_response(status: StatusCode, message: String) -> Response {
    let body = ErrorBody {
        code: status.as_u16(),
        message,
    };
    match serde_json::to_vec(&body) {
        Ok(data) => (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            data,
        )
            .into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response(),
    }
}

fn catalogue_error_response(err: CatalogueError) -> Response {
    let status = match &err {
        CatalogueError::NotFound(_) => StatusCode::NOT_FOUND,
        CatalogueError::InvalidName(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, err.to_string())
}

/// GET /profiles: list all the profiles known to the system.
async fn list_profiles(State(state): State<SharedState>) -> Response {
    match state.catalogue.names() {
        Ok(entries) => Json(entries).into_response(),
        Err(err) => {
            error!(%err, "profiles: gathering");
            catalogue_error_response(err)
        }
    }
}

/// POST /presets: add a preset to the profiles catalogue.
async fn add_preset(State(state): State<SharedState>, Json(preset): Json<Preset>) -> Response {
    match state.catalogue.add(&preset) {
        Ok(()) => {
            info!(name = %preset.name, "preset added to catalogue");
            (StatusCode::CREATED, Json(preset.name)).into_response()
        }
        Err(err) => {
            error!(%err, "presets: storing");
            catalogue_error_response(err)
        }
    }
}

/// POST /domainspec: apply the named profiles to the submitted domain spec
/// and return the merged spec with warnings.
async fn apply_domain_spec(
    State(state): State<SharedState>,
    Json(request): Json<ApplyRequest>,
) -> Response {
    let presets = match state.catalogue.get_all(&request.profiles) {
        Ok(presets) => presets,
        Err(err) => {
            error!(%err, "domainspec: gathering presets");
            return catalogue_error_response(err);
        }
    };

    match state.merger.apply_presets(&request.domain, &presets) {
        Ok(outcome) => Json(ApplyResponse {
            domain: outcome.domain,
            warnings: outcome.warnings,
        })
        .into_response(),
        Err(err) => {
            let status = match &err {
                MergeError::Conflicts(_) => StatusCode::CONFLICT,
                MergeError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            error!(%err, "domainspec: merging");
            error_response(status, err.to_string())
        }
    }
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}

/// Build the axum router.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/profiles", get(list_profiles))
        .route("/presets", post(add_preset))
        .route("/domainspec", post(apply_domain_spec))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the virt-profiles server. Blocks until shut down.
pub async fn run_server(config: &ServiceConfig) -> Result<(), SetupError> {
    let catalogue = Catalogue::new(config.profiles_dir.clone())?;
    let merger = Merger::new()
        .with_conflict_policy(config.conflict_policy)
        .with_sorting(config.sort_presets);
    let state = Arc::new(AppState { catalogue, merger });

    let addr = config.listen_address();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "virt-profiles server listening");

    axum::serve(listener, build_router(state))
        .await
        .map_err(|err| SetupError::Server(err.to_string()))?;

    Ok(())
}
