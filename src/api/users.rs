use actix_web::{web, Either, HttpResponse};
use askama::Template;
use serde_json::json;

use crate::config::AppConfig;
use crate::database::Store;
use crate::models::{
    EmailRequest, LoginRequest, LoginResponse, SignupRequest, TokenPurpose, UpdatePasswordRequest,
    UpdatePushTokenRequest, UpdateUsernameRequest, UserInfo, UserProfile,
};
use crate::services::account_service::{self, DeleteAccountRequest, ResetPasswordRequest, TokenLinkQuery};
use crate::services::auth_service::Claims;
use crate::services::Mailer;
use crate::utils::AppError;

#[derive(Template)]
#[template(path = "pages/change_password.html")]
struct ChangePasswordPage<'a> {
    title: &'a str,
    token: &'a str,
    user_id: &'a str,
}

#[derive(Template)]
#[template(path = "pages/delete_account.html")]
struct DeleteAccountPage<'a> {
    title: &'a str,
    token: &'a str,
    user_id: &'a str,
}

fn html(page: Result<String, askama::Error>) -> Result<HttpResponse, AppError> {
    let body = page.map_err(|e| AppError::Internal(format!("Failed to render page: {}", e)))?;
    Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(body))
}

// ==================== ACCOUNT ====================

#[utoipa::path(
    post,
    path = "/signup",
    tag = "Account",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created", body = UserInfo),
        (status = 422, description = "Validation failed or email already exists")
    )
)]
pub async fn signup(
    store: web::Data<dyn Store>,
    mailer: web::Data<dyn Mailer>,
    config: web::Data<AppConfig>,
    request: web::Json<SignupRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /signup - email: {}", request.email);

    let user = account_service::signup(store.get_ref(), mailer.get_ref(), &config, request.into_inner()).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "User created",
        "user": UserInfo::from(&user)
    })))
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Account",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 404, description = "User not found or password is not correct")
    )
)]
pub async fn login(
    store: web::Data<dyn Store>,
    config: web::Data<AppConfig>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔐 POST /login - email: {}", request.email);

    let email = request.email.clone();
    match account_service::login(store.get_ref(), &config, request.into_inner()).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", email);
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", email, e);
            Err(e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/reset-password-request",
    tag = "Account",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "Reset link emailed"),
        (status = 404, description = "Email is not recognized")
    )
)]
pub async fn reset_password_request(
    store: web::Data<dyn Store>,
    mailer: web::Data<dyn Mailer>,
    config: web::Data<AppConfig>,
    request: web::Json<EmailRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📨 POST /reset-password-request - email: {}", request.email);

    account_service::request_one_time_token(
        store.get_ref(),
        mailer.get_ref(),
        &config,
        &request.email,
        TokenPurpose::PasswordReset,
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Password reset link has been sent to your email"
    })))
}

/// Form opened from the reset email.
pub async fn change_password_page(query: web::Query<TokenLinkQuery>) -> Result<HttpResponse, AppError> {
    html(
        ChangePasswordPage {
            title: "Reset your password",
            token: &query.token,
            user_id: &query.id,
        }
        .render(),
    )
}

#[utoipa::path(
    post,
    path = "/reset-password",
    tag = "Account",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Invalid or expired token"),
        (status = 422, description = "Passwords do not match")
    )
)]
pub async fn reset_password(
    store: web::Data<dyn Store>,
    mailer: web::Data<dyn Mailer>,
    config: web::Data<AppConfig>,
    request: Either<web::Json<ResetPasswordRequest>, web::Form<ResetPasswordRequest>>,
) -> Result<HttpResponse, AppError> {
    let request = match request {
        Either::Left(web::Json(r)) | Either::Right(web::Form(r)) => r,
    };
    log::info!("🔑 POST /reset-password - user: {}", request.user_id);

    account_service::reset_password(store.get_ref(), mailer.get_ref(), &config, request).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Password reset successfully" })))
}

#[utoipa::path(
    post,
    path = "/delete-account-request",
    tag = "Account",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "Deletion link emailed"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_account_request(
    store: web::Data<dyn Store>,
    mailer: web::Data<dyn Mailer>,
    config: web::Data<AppConfig>,
    request: web::Json<EmailRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📨 POST /delete-account-request - email: {}", request.email);

    account_service::request_one_time_token(
        store.get_ref(),
        mailer.get_ref(),
        &config,
        &request.email,
        TokenPurpose::AccountDeletion,
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Account deletion link has been sent to your email"
    })))
}

/// Form opened from the deletion email.
pub async fn delete_account_page(query: web::Query<TokenLinkQuery>) -> Result<HttpResponse, AppError> {
    html(
        DeleteAccountPage {
            title: "Delete your account",
            token: &query.token,
            user_id: &query.id,
        }
        .render(),
    )
}

#[utoipa::path(
    post,
    path = "/delete-user-account",
    tag = "Account",
    request_body = DeleteAccountRequest,
    responses(
        (status = 200, description = "Account, goals and reminders deleted"),
        (status = 400, description = "Invalid or expired token"),
        (status = 404, description = "Password is not correct")
    )
)]
pub async fn delete_user_account(
    store: web::Data<dyn Store>,
    mailer: web::Data<dyn Mailer>,
    config: web::Data<AppConfig>,
    request: Either<web::Json<DeleteAccountRequest>, web::Form<DeleteAccountRequest>>,
) -> Result<HttpResponse, AppError> {
    let request = match request {
        Either::Left(web::Json(r)) | Either::Right(web::Form(r)) => r,
    };
    log::info!("🗑️ POST /delete-user-account - user: {}", request.user_id);

    account_service::delete_account(store.get_ref(), mailer.get_ref(), &config, request).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Account deleted successfully" })))
}

// ==================== PROFILE ====================

#[utoipa::path(
    get,
    path = "/user",
    tag = "Profile",
    responses((status = 200, description = "Profile of the authenticated user", body = UserProfile)),
    security(("bearer_auth" = []))
)]
pub async fn get_profile(
    claims: web::ReqData<Claims>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let user = account_service::get_profile(store.get_ref(), &user_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "User fetched",
        "user": UserProfile::from(&user)
    })))
}

#[utoipa::path(
    put,
    path = "/user/username",
    tag = "Profile",
    request_body = UpdateUsernameRequest,
    responses(
        (status = 200, description = "Username updated", body = UserProfile),
        (status = 422, description = "Validation failed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_username(
    claims: web::ReqData<Claims>,
    store: web::Data<dyn Store>,
    request: web::Json<UpdateUsernameRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let user = account_service::update_username(store.get_ref(), &user_id, request.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Username updated!",
        "user": UserProfile::from(&user)
    })))
}

#[utoipa::path(
    put,
    path = "/user/password",
    tag = "Profile",
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password updated"),
        (status = 404, description = "Password is not correct")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_password(
    claims: web::ReqData<Claims>,
    store: web::Data<dyn Store>,
    mailer: web::Data<dyn Mailer>,
    config: web::Data<AppConfig>,
    request: web::Json<UpdatePasswordRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    log::info!("🔑 PUT /user/password - user: {}", user_id);

    account_service::update_password(store.get_ref(), mailer.get_ref(), &config, &user_id, request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Password updated!" })))
}

#[utoipa::path(
    put,
    path = "/user/push-token",
    tag = "Profile",
    request_body = UpdatePushTokenRequest,
    responses((status = 200, description = "Push token stored", body = UserProfile)),
    security(("bearer_auth" = []))
)]
pub async fn update_push_token(
    claims: web::ReqData<Claims>,
    store: web::Data<dyn Store>,
    request: web::Json<UpdatePushTokenRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let user = account_service::update_push_token(store.get_ref(), &user_id, request.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Push token updated!",
        "user": UserProfile::from(&user)
    })))
}
