use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;

use crate::auth::middleware::AuthUser;
use crate::dto::TodayQuery;
use crate::error::AppResult;
use crate::models::card::DailyCard;
use crate::AppState;

/// Resolve today's card for the authenticated user. The client may pass its
/// device-local date; otherwise the server's current date is used.
pub async fn todays_card(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<TodayQuery>,
) -> AppResult<Json<DailyCard>> {
    let today = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let card = state.resolver.resolve_todays_card(auth_user.id, today).await?;
    Ok(Json(card))
}
