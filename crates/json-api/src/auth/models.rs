//! Auth request and response bodies.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use elysian_app::auth::{NewUser, Password, ProfileUpdate, User};

/// Public view of a user.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UserResponse {
    pub id: i64,
    pub mobile_number: String,
    pub alternate_mobile_number: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub is_staff: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.into_i64(),
            mobile_number: user.mobile_number,
            alternate_mobile_number: user.alternate_mobile_number,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            is_staff: user.is_staff,
        }
    }
}

/// Registration Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RegisterRequest {
    pub mobile_number: String,
    pub alternate_mobile_number: Option<String>,
    pub password: String,
    pub password_confirm: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
}

impl From<RegisterRequest> for NewUser {
    fn from(request: RegisterRequest) -> Self {
        NewUser {
            mobile_number: request.mobile_number,
            alternate_mobile_number: request.alternate_mobile_number,
            password: Password::new(request.password),
            password_confirm: Password::new(request.password_confirm),
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
        }
    }
}

/// Login Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LoginRequest {
    pub mobile_number: String,
    pub password: String,
}

/// Issued after registration or login. The refresh token only travels as a cookie.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AuthResponse {
    pub message: String,
    pub user: UserResponse,
    pub access_token: String,
}

/// Profile Update Request
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProfileUpdateRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub alternate_mobile_number: Option<String>,
}

impl From<ProfileUpdateRequest> for ProfileUpdate {
    fn from(request: ProfileUpdateRequest) -> Self {
        ProfileUpdate {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            alternate_mobile_number: request.alternate_mobile_number,
        }
    }
}

/// Profile Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProfileResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    pub user: UserResponse,
}

/// Either a session was created/reused or the access token was refreshed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SessionResponse {
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

/// Logout Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LogoutResponse {
    pub message: String,
    pub session_id: String,
}

/// Refresh Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RefreshResponse {
    pub message: String,
    pub access_token: String,
}
