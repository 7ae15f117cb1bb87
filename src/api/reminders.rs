use actix_web::{web, HttpResponse};
use serde_json::json;

use super::parse_object_id;
use crate::database::Store;
use crate::models::{ReminderRequest, ReminderResponse};
use crate::services::auth_service::Claims;
use crate::services::reminder_service;
use crate::utils::AppError;

#[utoipa::path(
    get,
    path = "/reminder/{id}",
    tag = "Reminders",
    params(("id" = String, Path, description = "Reminder id")),
    responses(
        (status = 200, description = "Reminder", body = ReminderResponse),
        (status = 404, description = "Reminder not found or not owned by the caller")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_reminder(
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let reminder_id = parse_object_id(&path, "reminder")?;

    let reminder = reminder_service::get_reminder(store.get_ref(), &user_id, &reminder_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Reminder fetched",
        "reminder": ReminderResponse::from(reminder)
    })))
}

#[utoipa::path(
    post,
    path = "/reminder/{goal_id}",
    tag = "Reminders",
    params(("goal_id" = String, Path, description = "Goal the reminder belongs to")),
    request_body = ReminderRequest,
    responses(
        (status = 201, description = "Reminder created", body = ReminderResponse),
        (status = 422, description = "Validation failed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_reminder(
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
    store: web::Data<dyn Store>,
    request: web::Json<ReminderRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let goal_id = parse_object_id(&path, "goal")?;
    log::info!("⏰ POST /reminder/{} - user: {}", goal_id, user_id);

    let reminder =
        reminder_service::create_reminder(store.get_ref(), &user_id, &goal_id, request.into_inner()).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Reminder created!",
        "reminder": ReminderResponse::from(reminder)
    })))
}

#[utoipa::path(
    put,
    path = "/reminder/{id}",
    tag = "Reminders",
    params(("id" = String, Path, description = "Reminder id")),
    request_body = ReminderRequest,
    responses(
        (status = 200, description = "Reminder updated", body = ReminderResponse),
        (status = 422, description = "Validation failed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_reminder(
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
    store: web::Data<dyn Store>,
    request: web::Json<ReminderRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let reminder_id = parse_object_id(&path, "reminder")?;

    let reminder =
        reminder_service::update_reminder(store.get_ref(), &user_id, &reminder_id, request.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Reminder updated!",
        "reminder": ReminderResponse::from(reminder)
    })))
}

#[utoipa::path(
    delete,
    path = "/reminder/{id}",
    tag = "Reminders",
    params(("id" = String, Path, description = "Reminder id")),
    responses(
        (status = 200, description = "Reminder deleted"),
        (status = 404, description = "Reminder not found or not owned by the caller")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_reminder(
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let reminder_id = parse_object_id(&path, "reminder")?;

    reminder_service::delete_reminder(store.get_ref(), &user_id, &reminder_id).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Reminder deleted!" })))
}
