use axum::{
    extract::{FromRequestParts, FromRef},
    http::{request::Parts, StatusCode},
};
use crate::state::AppState;
use crate::domain::models::user::Editor;
use std::sync::Arc;
use tracing::{Span, warn};

pub const EDITOR_HEADER: &str = "X-Editor-Id";

/// The staff user or customer making the request, taken from the `X-Editor-Id` header.
/// Staff users are looked up first, then customers.
pub struct ActingEditor(pub Editor);

impl<S> FromRequestParts<S> for ActingEditor
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let editor_id = parts.headers.get(EDITOR_HEADER)
            .ok_or(StatusCode::UNAUTHORIZED)?
            .to_str()
            .map_err(|_| StatusCode::BAD_REQUEST)?
            .to_string();

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let user = app_state.user_repo.find_by_id(&editor_id).await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
        let editor = match user {
            Some(user) => Editor::from(&user),
            None => {
                let customer = app_state.customer_repo.find_by_id(&editor_id).await
                    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
                match customer {
                    Some(customer) => Editor::from(&customer),
                    None => {
                        warn!("Unknown editor id: {}", editor_id);
                        return Err(StatusCode::UNAUTHORIZED);
                    }
                }
            }
        };

        Span::current().record("editor_id", &editor.id);

        Ok(ActingEditor(editor))
    }
}
