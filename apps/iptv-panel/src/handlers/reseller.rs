use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use iptv_shared::{AddCreditRequest, MessageResponse, display_value};
use tracing::{info, warn};

use crate::AppState;
use crate::error::ApiError;
use crate::extract::AdminJson;

/// POST /reseller/addCredit
pub async fn add_credit(
    State(state): State<AppState>,
    AdminJson(req): AdminJson<AddCreditRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let touched = state
        .store
        .resellers
        .add_credit(&req.reseller_id, &req.amount)
        .await?;

    let reseller_id = display_value(&req.reseller_id);
    let amount = display_value(&req.amount);
    if touched == 0 {
        warn!(%reseller_id, "Credit top-up matched no reseller");
    } else {
        info!(%reseller_id, %amount, "Reseller credited");
    }

    state
        .notifier
        .notify(format!("Reseller {reseller_id} credited: {amount}"));
    Ok(Json(MessageResponse::new("Credit added successfully.")))
}

/// GET /reseller/details/{reseller_id}
pub async fn reseller_details(
    State(state): State<AppState>,
    Path(reseller_id): Path<String>,
) -> Result<Response, ApiError> {
    let reseller = state.store.resellers.get_by_id(&reseller_id).await?;
    Ok(match reseller {
        Some(reseller) => Json(reseller).into_response(),
        None => StatusCode::OK.into_response(),
    })
}
