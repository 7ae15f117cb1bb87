use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde_json::json;

use super::parse_object_id;
use crate::database::Store;
use crate::models::{
    CreateGoalRequest, GoalResponse, RecordDayRequest, UpdateGoalRequest, UpdateStatusRequest,
};
use crate::services::auth_service::Claims;
use crate::services::goal_service;
use crate::utils::AppError;

/// An empty body records today; anything else must be a valid `RecordDayRequest`.
fn parse_record_day(body: &[u8]) -> Result<RecordDayRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RecordDayRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        log::warn!("⚠️ Rejected day body: {}", e);
        AppError::BadRequest(format!("Invalid request body: {}", e))
    })
}

#[utoipa::path(
    get,
    path = "/goals",
    tag = "Goals",
    responses(
        (status = 200, description = "Goals of the authenticated user", body = [GoalResponse]),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_goals(
    claims: web::ReqData<Claims>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    log::info!("📋 GET /goals - user: {}", user_id);

    let goals: Vec<GoalResponse> = goal_service::list_goals(store.get_ref(), &user_id)
        .await?
        .into_iter()
        .map(GoalResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "message": "Goals fetched",
        "goals": goals
    })))
}

#[utoipa::path(
    get,
    path = "/goals/{id}",
    tag = "Goals",
    params(("id" = String, Path, description = "Goal id")),
    responses(
        (status = 200, description = "Goal", body = GoalResponse),
        (status = 404, description = "Goal not found or not authored by the caller")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_goal(
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let goal_id = parse_object_id(&path, "goal")?;

    let goal = goal_service::load_owned_goal(store.get_ref(), &user_id, &goal_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Goal fetched",
        "goal": GoalResponse::from(goal)
    })))
}

#[utoipa::path(
    post,
    path = "/goals",
    tag = "Goals",
    request_body = CreateGoalRequest,
    responses(
        (status = 201, description = "Goal created", body = GoalResponse),
        (status = 422, description = "Validation failed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_goal(
    claims: web::ReqData<Claims>,
    store: web::Data<dyn Store>,
    request: web::Json<CreateGoalRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    log::info!("➕ POST /goals - user: {}", user_id);

    let (goal, author) = goal_service::create_goal(store.get_ref(), &user_id, request.into_inner()).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Goal created!",
        "goal": GoalResponse::from(goal),
        "author": {
            "_id": author.id.to_hex(),
            "username": author.username
        }
    })))
}

#[utoipa::path(
    put,
    path = "/goals/{id}",
    tag = "Goals",
    params(("id" = String, Path, description = "Goal id")),
    request_body = UpdateGoalRequest,
    responses(
        (status = 200, description = "Goal updated", body = GoalResponse),
        (status = 422, description = "Validation failed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_goal(
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
    store: web::Data<dyn Store>,
    request: web::Json<UpdateGoalRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let goal_id = parse_object_id(&path, "goal")?;
    log::info!("✏️ PUT /goals/{} - user: {}", goal_id, user_id);

    let goal = goal_service::update_goal(store.get_ref(), &user_id, &goal_id, request.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Goal updated!",
        "goal": GoalResponse::from(goal)
    })))
}

#[utoipa::path(
    delete,
    path = "/goals/{id}",
    tag = "Goals",
    params(("id" = String, Path, description = "Goal id")),
    responses(
        (status = 200, description = "Goal and its reminders deleted"),
        (status = 404, description = "Goal not found or not authored by the caller")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_goal(
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let goal_id = parse_object_id(&path, "goal")?;
    log::info!("🗑️ DELETE /goals/{} - user: {}", goal_id, user_id);

    goal_service::delete_goal(store.get_ref(), &user_id, &goal_id).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Goal deleted!" })))
}

#[utoipa::path(
    put,
    path = "/goals/{id}/status",
    tag = "Goals",
    params(("id" = String, Path, description = "Goal id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = GoalResponse),
        (status = 422, description = "Invalid status transition")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_status(
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
    store: web::Data<dyn Store>,
    request: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let goal_id = parse_object_id(&path, "goal")?;
    log::info!("🔄 PUT /goals/{}/status -> {}", goal_id, request.status);

    let goal = goal_service::change_status(store.get_ref(), &user_id, &goal_id, request.status).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Goal status updated!",
        "goal": GoalResponse::from(goal)
    })))
}

#[utoipa::path(
    post,
    path = "/goals/{id}/events",
    tag = "Goals",
    params(("id" = String, Path, description = "Goal id")),
    request_body = RecordDayRequest,
    responses(
        (status = 200, description = "Day recorded", body = GoalResponse),
        (status = 400, description = "Malformed body or date"),
        (status = 422, description = "Day already recorded")
    ),
    security(("bearer_auth" = []))
)]
pub async fn record_day(
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
    store: web::Data<dyn Store>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let goal_id = parse_object_id(&path, "goal")?;
    let day = parse_record_day(&body)?.date;

    let goal = goal_service::record_day(store.get_ref(), &user_id, &goal_id, day).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Day recorded!",
        "goal": GoalResponse::from(goal)
    })))
}

#[utoipa::path(
    delete,
    path = "/goals/{id}/events/{date}",
    tag = "Goals",
    params(
        ("id" = String, Path, description = "Goal id"),
        ("date" = String, Path, description = "Recorded day, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Day removed", body = GoalResponse),
        (status = 404, description = "Day was not recorded")
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove_day(
    claims: web::ReqData<Claims>,
    path: web::Path<(String, String)>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let (raw_id, raw_date) = path.into_inner();
    let goal_id = parse_object_id(&raw_id, "goal")?;
    let day = NaiveDate::parse_from_str(&raw_date, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("Invalid date: {}", raw_date)))?;

    let goal = goal_service::remove_day(store.get_ref(), &user_id, &goal_id, day).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Day removed!",
        "goal": GoalResponse::from(goal)
    })))
}
