use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::Form;
use billet_order::{eligibility, selection, AutoSettlement, CancelError, Order, OrderStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct OrderAccess {
    pub secret: String,
}

#[derive(Debug, Deserialize)]
pub struct CancelForm {
    /// Repeated `positions` field from the selection form.
    #[serde(default)]
    pub positions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AllowedResponse {
    pub allowed: bool,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub level: &'static str,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct OrderSummary {
    pub id: Uuid,
    pub code: String,
    pub event: String,
    pub status: OrderStatus,
    pub total: Decimal,
}

#[derive(Debug, Serialize)]
pub struct PositionView {
    pub id: u64,
    pub item: String,
    pub price: Decimal,
    pub addon_to: Option<u64>,
    pub has_addons: bool,
}

/// Everything the selection form needs to render (or re-render).
#[derive(Debug, Serialize)]
pub struct CancelPageResponse {
    pub order: OrderSummary,
    pub positions: Vec<PositionView>,
    pub selected: Vec<u64>,
    pub messages: Vec<Message>,
}

async fn authorized_order(
    state: &AppState,
    order_id: Uuid,
    secret: &str,
) -> Result<Order, AppError> {
    state
        .orders
        .get_order(order_id)
        .await
        .filter(|order| order.secret == secret)
        .ok_or_else(|| {
            AppError::NotFoundError(
                "Unknown order code or not authorized to access this order.".to_string(),
            )
        })
}

fn order_url(state: &AppState, order: &Order) -> String {
    format!(
        "{}/{}/order/{}/",
        state.shop_base_url.trim_end_matches('/'),
        order.event,
        order.code
    )
}

/// The service keeps no session flash store, so redirect notices travel as
/// short query-string codes the shop page renders.
fn gate_redirect(state: &AppState, order: &Order) -> Response {
    tracing::debug!(order = %order.code, "partial cancellation not allowed, redirecting");
    Redirect::to(&format!(
        "{}?notice=partial-cancel-denied",
        order_url(state, order)
    ))
    .into_response()
}

fn page(order: &Order, selected: Vec<u64>, messages: Vec<Message>) -> CancelPageResponse {
    CancelPageResponse {
        order: OrderSummary {
            id: order.id,
            code: order.code.clone(),
            event: order.event.clone(),
            status: order.status,
            total: order.total,
        },
        positions: order
            .live_positions()
            .map(|p| PositionView {
                id: p.id,
                item: p.item.clone(),
                price: p.price,
                addon_to: p.addon_to,
                has_addons: order.addons_of(p.id).next().is_some(),
            })
            .collect(),
        selected,
        messages,
    }
}

/// GET /v1/orders/:id/partial-cancel
/// Selection page data; the gate re-runs on every request.
pub async fn get_cancel_page(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Query(access): Query<OrderAccess>,
) -> Result<Response, AppError> {
    let order = authorized_order(&state, order_id, &access.secret).await?;
    if !eligibility::check(&order, state.settings.as_ref()).await {
        return Ok(gate_redirect(&state, &order));
    }
    Ok(Json(page(&order, Vec::new(), Vec::new())).into_response())
}

/// GET /v1/orders/:id/partial-cancel/allowed
/// Lets the shop's order page decide whether to show the entry link.
pub async fn get_cancel_allowed(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Query(access): Query<OrderAccess>,
) -> Result<Json<AllowedResponse>, AppError> {
    let order = authorized_order(&state, order_id, &access.secret).await?;
    let allowed = eligibility::check(&order, state.settings.as_ref()).await;
    Ok(Json(AllowedResponse { allowed }))
}

/// POST /v1/orders/:id/partial-cancel
/// Cancel the selected positions; success and gate failure redirect back to
/// the order detail page, validation failures re-render the form.
pub async fn post_cancel(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Query(access): Query<OrderAccess>,
    Form(form): Form<CancelForm>,
) -> Result<Response, AppError> {
    let order = authorized_order(&state, order_id, &access.secret).await?;
    if !eligibility::check(&order, state.settings.as_ref()).await {
        return Ok(gate_redirect(&state, &order));
    }

    match state.cancellation.cancel_positions(&order, &form.positions).await {
        Ok(outcome) => {
            let mut target = format!("{}?notice=canceled", order_url(&state, &order));
            if matches!(outcome.settlement, AutoSettlement::CapacityConflict) {
                target.push_str("&warning=autopay-quota");
            }
            Ok(Redirect::to(&target).into_response())
        }
        Err(err @ (CancelError::EmptySelection | CancelError::Change(_))) => {
            let selected = selection::parse_position_ids(&form.positions)
                .into_iter()
                .collect();
            let body = page(
                &order,
                selected,
                vec![Message {
                    level: "error",
                    text: err.to_string(),
                }],
            );
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response())
        }
        Err(other) => Err(AppError::from(anyhow::anyhow!(other))),
    }
}
