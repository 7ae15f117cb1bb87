pub mod goals;
pub mod health;
pub mod reminders;
pub mod swagger;
pub mod users;

use actix_web::{error::JsonPayloadError, web, HttpRequest};
use mongodb::bson::oid::ObjectId;

use crate::config::AppConfig;
use crate::middleware::AuthMiddleware;
use crate::utils::AppError;

pub(crate) fn parse_object_id(raw: &str, what: &'static str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw.trim()).map_err(|_| AppError::InvalidId(what))
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::warn!("⚠️ Rejected JSON body: {}", err);
    AppError::BadRequest(format!("Invalid request body: {}", err)).into()
}

/// Route table. Account routes are public; goals, reminders and profile
/// require a bearer token.
pub fn configure(cfg: &mut web::ServiceConfig, config: &AppConfig) {
    let auth = AuthMiddleware::new(&config.jwt_secret, &config.jwt_issuer);

    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/health", web::get().to(health::health_check))
        // ==================== ACCOUNT ====================
        .route("/signup", web::post().to(users::signup))
        .route("/login", web::post().to(users::login))
        .route("/reset-password-request", web::post().to(users::reset_password_request))
        .route("/change-password", web::get().to(users::change_password_page))
        .route("/reset-password", web::post().to(users::reset_password))
        .route("/delete-account-request", web::post().to(users::delete_account_request))
        .route("/delete-account", web::get().to(users::delete_account_page))
        .route("/delete-user-account", web::post().to(users::delete_user_account))
        // ==================== PROFILE ====================
        .service(
            web::scope("/user")
                .wrap(auth.clone())
                .route("", web::get().to(users::get_profile))
                .route("/username", web::put().to(users::update_username))
                .route("/password", web::put().to(users::update_password))
                .route("/push-token", web::put().to(users::update_push_token)),
        )
        // ==================== GOALS ====================
        .service(
            web::scope("/goals")
                .wrap(auth.clone())
                .route("", web::get().to(goals::list_goals))
                .route("", web::post().to(goals::create_goal))
                .route("/{id}", web::get().to(goals::get_goal))
                .route("/{id}", web::put().to(goals::update_goal))
                .route("/{id}", web::delete().to(goals::delete_goal))
                .route("/{id}/status", web::put().to(goals::update_status))
                .route("/{id}/events", web::post().to(goals::record_day))
                .route("/{id}/events/{date}", web::delete().to(goals::remove_day)),
        )
        // ==================== REMINDERS ====================
        .service(
            web::scope("/reminder")
                .wrap(auth)
                .route("/{id}", web::get().to(reminders::get_reminder))
                .route("/{id}", web::put().to(reminders::update_reminder))
                .route("/{id}", web::delete().to(reminders::delete_reminder))
                .route("/{goal_id}", web::post().to(reminders::create_reminder)),
        );
}
