use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::admin::AppState;
use crate::error::SidecarError;
use crate::reload::ReloadContext;
use crate::runtime::RuntimeInfo;
use crate::transaction::UpdateConfigCmd;

#[derive(Debug, Serialize, Deserialize)]
pub struct LastUpdate {
    pub last_update_ts: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResetConfigCmd {
    pub zone_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: String,
}

/// Transaction error rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub SidecarError);

impl From<SidecarError> for ApiError {
    fn from(e: SidecarError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            SidecarError::ZoneMismatch { .. } => StatusCode::CONFLICT,
            SidecarError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
            SidecarError::HandshakeFailed(_) => StatusCode::BAD_GATEWAY,
            SidecarError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            SidecarError::Canceled => StatusCode::SERVICE_UNAVAILABLE,
            SidecarError::Snapshot { .. }
            | SidecarError::Persistence { .. }
            | SidecarError::RollbackFailed { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.0.to_string(),
            kind: self.0.kind().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

pub async fn get_runtime_info(State(state): State<AppState>) -> Json<RuntimeInfo> {
    Json(state.manager.runtime_info())
}

pub async fn get_last_update_ts(State(state): State<AppState>) -> Json<LastUpdate> {
    Json(LastUpdate {
        last_update_ts: state.manager.last_update_ts(),
    })
}

pub async fn update_config(
    State(state): State<AppState>,
    Json(cmd): Json<UpdateConfigCmd>,
) -> Result<StatusCode, ApiError> {
    let ctx = ReloadContext::with_timeout(state.handshake_timeout);
    state
        .manager
        .update_config_reload(&ctx, &cmd, &state.gate)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reset_config(
    State(state): State<AppState>,
    Json(cmd): Json<ResetConfigCmd>,
) -> Result<StatusCode, ApiError> {
    let ctx = ReloadContext::with_timeout(state.handshake_timeout);
    state
        .manager
        .reset_config_reload(&ctx, &cmd.zone_id, &state.gate)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
