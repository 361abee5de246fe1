/// Analytics endpoint
///
/// ```text
/// GET /api/dashboard
/// ```
///
/// Users get totals for their own tasks; managers get system-wide totals plus
/// an `allUsersStats` map keyed by username.
///
/// ```json
/// {
///   "totalTasks": 5,
///   "tasksByStatus": { "pending": 2, "completed": 3 }
/// }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Extension, Json};
use tasktrack_shared::{
    auth::middleware::AuthContext,
    services::analytics::{self, AnalyticsReport},
};

pub async fn get_analytics(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthContext>,
) -> ApiResult<Json<AnalyticsReport>> {
    let report = analytics::get_analytics(state.store(), &caller).await?;
    Ok(Json(report))
}
