use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Goals Service API",
        version = "1.0.0",
        description = "API for tracking personal goals.\n\n**Authentication:** goal, reminder and profile endpoints require a JWT Bearer token obtained from `/login`.\n\nPassword reset and account deletion are confirmed through one-time links sent by email."
    ),
    paths(
        // Account
        crate::api::users::signup,
        crate::api::users::login,
        crate::api::users::reset_password_request,
        crate::api::users::reset_password,
        crate::api::users::delete_account_request,
        crate::api::users::delete_user_account,

        // Profile
        crate::api::users::get_profile,
        crate::api::users::update_username,
        crate::api::users::update_password,
        crate::api::users::update_push_token,

        // Goals
        crate::api::goals::list_goals,
        crate::api::goals::get_goal,
        crate::api::goals::create_goal,
        crate::api::goals::update_goal,
        crate::api::goals::delete_goal,
        crate::api::goals::update_status,
        crate::api::goals::record_day,
        crate::api::goals::remove_day,

        // Reminders
        crate::api::reminders::get_reminder,
        crate::api::reminders::create_reminder,
        crate::api::reminders::update_reminder,
        crate::api::reminders::delete_reminder,

        // Health
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::models::SignupRequest,
            crate::models::LoginRequest,
            crate::models::LoginResponse,
            crate::models::EmailRequest,
            crate::models::UserInfo,
            crate::models::UserProfile,
            crate::models::UpdateUsernameRequest,
            crate::models::UpdatePasswordRequest,
            crate::models::UpdatePushTokenRequest,
            crate::services::account_service::ResetPasswordRequest,
            crate::services::account_service::DeleteAccountRequest,

            crate::models::GoalStatus,
            crate::models::GoalCategory,
            crate::models::GoalResponse,
            crate::models::CreateGoalRequest,
            crate::models::UpdateGoalRequest,
            crate::models::UpdateStatusRequest,
            crate::models::RecordDayRequest,

            crate::models::ReminderType,
            crate::models::ReminderTime,
            crate::models::ReminderRequest,
            crate::models::ReminderResponse,

            crate::utils::FieldError,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Account", description = "Signup, login, password reset and account deletion."),
        (name = "Profile", description = "Profile of the authenticated user."),
        (name = "Goals", description = "Goals, their status workflow and recorded days."),
        (name = "Reminders", description = "Daily or weekly reminders attached to a goal."),
        (name = "Health", description = "Service and database status."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by /login"))
                        .build()
                ),
            );
        }
    }
}
