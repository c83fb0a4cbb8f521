// POST /api/moderate-image — run the moderation pipeline on one image.
//
// 400 for validation failures, 502 for provider failures, 200 for a
// completed verdict. A "fail" verdict is a content outcome, not an HTTP
// error — it still returns 200.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::pipeline::{self, ModerationRequest, Outcome};
use crate::web::AppState;

pub async fn moderate_image(
    State(state): State<AppState>,
    Json(request): Json<ModerationRequest>,
) -> impl IntoResponse {
    match pipeline::moderate(&request, state.vision.as_ref(), &state.terms).await {
        Outcome::Rejected(response) => (StatusCode::BAD_REQUEST, Json(response)),
        Outcome::ProviderFailed(response) => (StatusCode::BAD_GATEWAY, Json(response)),
        Outcome::Completed(response) => (StatusCode::OK, Json(response)),
    }
}
