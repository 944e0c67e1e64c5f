use std::sync::Arc;

use crate::dtos::auth::{AuthResponse, CreateUserRequest, LoginRequest, RegisterRequest};
use crate::dtos::users::SanitizedUser;
use crate::models::{Role, User};
use crate::services::{policy, Claims, JwtService, ServiceError, UserStore};
use crate::utils::{hash_password, verify_password, Password, PasswordHashString};

/// Authentication flow: registration, login and privileged user creation.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt: JwtService,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, jwt: JwtService) -> Self {
        Self { users, jwt }
    }

    /// Public self-registration. Always creates a `Role::User` account;
    /// privileged roles are only assignable through `create_user`.
    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse, ServiceError> {
        if self.users.find_by_email(&req.email).await?.is_some() {
            return Err(ServiceError::UserAlreadyExists);
        }

        let password_hash = hash_password(&Password::new(req.password))
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Password hashing error: {}", e)))?;

        let user = User::new(
            req.name,
            req.email,
            password_hash.into_string(),
            Role::User,
            None,
        );
        self.users.insert(&user).await?;

        tracing::info!(user_id = %user.id, "User registered");

        let token = self.jwt.issue(&user.id, user.role)?;
        Ok(AuthResponse {
            token,
            user: SanitizedUser::from(user),
        })
    }

    /// Login with email and password. Unknown email and wrong password fail
    /// identically so neither leaks which part was wrong.
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, ServiceError> {
        let user = self
            .users
            .find_by_email(&req.email)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        verify_password(
            &Password::new(req.password),
            &PasswordHashString::new(user.password_hash.clone()),
        )
        .map_err(|_| ServiceError::InvalidCredentials)?;

        let token = self.jwt.issue(&user.id, user.role)?;
        Ok(AuthResponse {
            token,
            user: SanitizedUser::from(user),
        })
    }

    /// Privileged account creation, authorized per the caller's role.
    pub async fn create_user(
        &self,
        caller: &Claims,
        req: CreateUserRequest,
    ) -> Result<SanitizedUser, ServiceError> {
        let spec = policy::new_user_spec(caller.role, &caller.sub, req.role, req.counselor_id)?;

        // A client-supplied counselor id must point at an actual counselor
        if spec.counselor_needs_validation {
            let counselor_id = spec.counselor.as_deref().unwrap_or_default();
            let counselor = self
                .users
                .find_by_id(counselor_id)
                .await?
                .filter(|u| u.role == Role::Counselor);
            if counselor.is_none() {
                return Err(ServiceError::ValidationError(
                    "Counselor not found".to_string(),
                ));
            }
        }

        if self.users.find_by_email(&req.email).await?.is_some() {
            return Err(ServiceError::UserAlreadyExists);
        }

        let password_hash = hash_password(&Password::new(req.password))
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Password hashing error: {}", e)))?;

        let user = User::new(
            req.name,
            req.email,
            password_hash.into_string(),
            spec.role,
            spec.counselor,
        );
        self.users.insert(&user).await?;

        tracing::info!(
            user_id = %user.id,
            role = %user.role,
            created_by = %caller.sub,
            "User created"
        );

        Ok(SanitizedUser::from(user))
    }
}
