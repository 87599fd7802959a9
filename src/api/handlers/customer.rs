use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{CreateCustomerRequest, UpdateCustomerRequest};
use crate::api::dtos::responses::{CustomerHistoryResponse, CustomerView};
use crate::api::handlers::entry::entry_views;
use crate::domain::models::customer::{Customer, NewCustomerParams};
use crate::domain::services::{credentials::hash_password, statistics::Statistics};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_customer(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateCustomerRequest>,
) -> Result<impl IntoResponse, AppError> {
    if state.customer_repo.find_by_username(&payload.username).await?.is_some() {
        return Err(AppError::Conflict("Username already exists".into()));
    }

    let customer = Customer::new(NewCustomerParams {
        username: payload.username,
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        phone: payload.phone,
        date_of_birth: payload.date_of_birth,
        title: payload.title,
        gender: payload.gender,
        notes: payload.notes,
        password_hash: hash_password(&payload.password)?,
    });
    customer.validate()?;

    let created = state.customer_repo.create(&customer).await?;
    info!("Created customer: {} ({})", created.full_name(), created.id);
    Ok((StatusCode::CREATED, Json(CustomerView::from(created))))
}

pub async fn list_customers(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let customers: Vec<CustomerView> = state.customer_repo.list().await?
        .into_iter()
        .map(CustomerView::from)
        .collect();
    Ok(Json(customers))
}

pub async fn get_customer(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let customer = state.customer_repo.find_by_id(&customer_id).await?
        .ok_or(AppError::NotFound("Customer not found".into()))?;
    Ok(Json(CustomerView::from(customer)))
}

pub async fn update_customer(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<String>,
    Json(payload): Json<UpdateCustomerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut customer = state.customer_repo.find_by_id(&customer_id).await?
        .ok_or(AppError::NotFound("Customer not found".into()))?;

    customer.first_name = payload.first_name;
    customer.last_name = payload.last_name;
    customer.email = payload.email.trim().to_lowercase();
    customer.phone = payload.phone;
    customer.date_of_birth = payload.date_of_birth;
    customer.title = payload.title;
    if let Some(gender) = payload.gender {
        customer.gender = gender;
    }
    customer.notes = payload.notes;
    customer.reminder_opt_out = payload.reminder_opt_out;
    customer.change_notification_opt_out = payload.change_notification_opt_out;
    customer.validate()?;

    let updated = state.customer_repo.update(&customer).await?;
    info!("Updated customer: {} ({})", updated.full_name(), updated.id);
    Ok(Json(CustomerView::from(updated)))
}

pub async fn customer_history(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let customer = state.customer_repo.find_by_id(&customer_id).await?
        .ok_or(AppError::NotFound("Customer not found".into()))?;
    let today = state.entry_service.now().date();
    let entries = state.entry_repo.list_by_customer_until(&customer.id, today).await?;
    let statistics = Statistics::collect(&entries);

    Ok(Json(CustomerHistoryResponse {
        customer: CustomerView::from(customer),
        entries: entry_views(&state, entries).await?,
        statistics,
    }))
}
