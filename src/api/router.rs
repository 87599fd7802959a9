use axum::{
    body::Body,
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, entry, diary, resource, treatment, customer, user};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Entries
        .route("/api/v1/entries", post(entry::create_entry).get(entry::list_entries))
        .route("/api/v1/entries/{entry_id}", get(entry::get_entry).put(entry::update_entry).delete(entry::delete_entry))
        .route("/api/v1/entries/{entry_id}/move", post(entry::move_entry))
        .route("/api/v1/entries/{entry_id}/{action}", post(entry::set_entry_status))

        // Diary views
        .route("/api/v1/days/{date}/slots", get(diary::day_slots))
        .route("/api/v1/reminders", get(diary::reminders))
        .route("/api/v1/statistics", get(diary::statistics))

        // Reference data
        .route("/api/v1/resources", post(resource::create_resource).get(resource::list_resources))
        .route("/api/v1/resources/{resource_id}", get(resource::get_resource))
        .route("/api/v1/treatments", post(treatment::create_treatment).get(treatment::list_treatments))
        .route("/api/v1/treatments/{treatment_id}", get(treatment::get_treatment))

        // People
        .route("/api/v1/customers", post(customer::create_customer).get(customer::list_customers))
        .route("/api/v1/customers/{customer_id}", get(customer::get_customer).put(customer::update_customer))
        .route("/api/v1/customers/{customer_id}/history", get(customer::customer_history))
        .route("/api/v1/users", post(user::create_user).get(user::list_users))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        editor_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
