//! Signup and login
//!
//! Issues the credentials the gated routes verify. Password hashing and
//! verification run on the blocking pool.

use crate::auth::{JwtService, PasswordService, TokenIssueError};
use crate::error::ApiError;
use crate::repositories::{NewUser, UserRepository};
use auth_gateway_shared::validation::{validate_email, validate_name, validate_password};
use auth_gateway_shared::{LoginRequest, LoginResponse, SignupRequest, SignupResponse};
use tracing::info;

pub struct UserService;

impl UserService {
    pub async fn signup(
        users: &dyn UserRepository,
        req: SignupRequest,
    ) -> Result<SignupResponse, ApiError> {
        let email = normalize_email(&req.email);
        validate_name(&req.name).map_err(ApiError::Validation)?;
        validate_email(&email).map_err(ApiError::Validation)?;
        validate_password(&req.password).map_err(ApiError::Validation)?;

        let password_hash = PasswordService::hash_async(req.password).await?;

        // Duplicate emails come back from the store as DuplicateEmail (409)
        let user = users
            .create(NewUser {
                name: req.name.trim().to_string(),
                email,
                password_hash,
                role: req.role,
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, "user registered");

        Ok(SignupResponse {
            success: true,
            message: "User created successfully".to_string(),
            user: user.profile(),
        })
    }

    pub async fn login(
        users: &dyn UserRepository,
        jwt: &JwtService,
        req: LoginRequest,
    ) -> Result<LoginResponse, ApiError> {
        let email = normalize_email(&req.email);
        if email.is_empty() || req.password.is_empty() {
            return Err(ApiError::Validation(
                "Please fill all the details carefully".to_string(),
            ));
        }

        let user = users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| ApiError::NotFound("User is not registered".to_string()))?;

        let valid = PasswordService::verify_async(req.password, user.password_hash.clone()).await?;
        if !valid {
            return Err(ApiError::Unauthorized("Password incorrect".to_string()));
        }

        let token = jwt.issue(&user).map_err(|e| match e {
            TokenIssueError::MissingSecret => {
                ApiError::Internal(anyhow::anyhow!("cannot issue token: signing secret is not configured"))
            }
            other => ApiError::Internal(other.into()),
        })?;

        info!(user_id = %user.id, role = %user.role, "user logged in");

        Ok(LoginResponse {
            success: true,
            message: "User logged in successfully".to_string(),
            token,
            expires_in: jwt.token_expiry_secs(),
            user: user.profile(),
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
