use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use billet_core::settings::PARTIAL_CANCELLATION_ENABLED;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct PartialCancellationSettings {
    /// Customers can cancel individual tickets if the order total is 0.00
    /// and the order contains more than one position.
    pub partial_cancellation_enabled: bool,
}

/// GET /v1/events/:event/settings/partial-cancellation
pub async fn get_settings(
    State(state): State<AppState>,
    Path(event): Path<String>,
) -> Json<PartialCancellationSettings> {
    let enabled = state
        .settings
        .get_bool(&event, PARTIAL_CANCELLATION_ENABLED)
        .await;
    Json(PartialCancellationSettings {
        partial_cancellation_enabled: enabled,
    })
}

/// PUT /v1/events/:event/settings/partial-cancellation
/// Permission checks sit in the host control panel in front of this.
pub async fn put_settings(
    State(state): State<AppState>,
    Path(event): Path<String>,
    Json(body): Json<PartialCancellationSettings>,
) -> Json<PartialCancellationSettings> {
    state
        .settings
        .set_bool(
            &event,
            PARTIAL_CANCELLATION_ENABLED,
            body.partial_cancellation_enabled,
        )
        .await;
    Json(body)
}
