//! Account management and administrator sign-in

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::{AuthConfig, BootstrapAdminConfig},
    error::{AppError, AppResult},
    models::{
        optional, required,
        user::{CreateUser, NewUser, Role, User, UserClaims},
    },
    repository::Repository,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate an administrator by email and return a JWT token.
    ///
    /// Engineers have no password and cannot sign in.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_email(email.trim())
            .await?
            .filter(|u| u.role == Role::Admin)
            .ok_or_else(|| AppError::Authentication(INVALID_CREDENTIALS.to_string()))?;

        let hash = user
            .password
            .as_deref()
            .ok_or_else(|| AppError::Authentication(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(hash, password)? {
            tracing::warn!(user_id = %user.id, "Rejected sign-in with wrong password");
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.create_token_for_user(&user)?;
        Ok((token, user))
    }

    /// Token lifetime in seconds
    pub fn token_lifetime_secs(&self) -> i64 {
        self.config.jwt_expiration_hours as i64 * 3600
    }

    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();

        let claims = UserClaims {
            sub: user.id,
            worker_id: user.worker_id.clone(),
            role: user.role,
            exp: now + self.token_lifetime_secs(),
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Validate a bearer token issued by this server
    pub fn decode_token(&self, token: &str) -> AppResult<UserClaims> {
        UserClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// List all users
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    /// Create a new user; admins must come with a password
    pub async fn create_user(&self, user: CreateUser) -> AppResult<User> {
        let new_user = prepare_user(user)?;

        if self
            .repository
            .users
            .email_or_worker_id_exists(&new_user.email, &new_user.worker_id)
            .await?
        {
            return Err(AppError::Conflict(
                "Email or worker ID is already registered".to_string(),
            ));
        }

        let created = self.repository.users.create(&new_user).await?;
        tracing::info!(user_id = %created.id, worker_id = %created.worker_id, role = %created.role, "User created");
        Ok(created)
    }

    /// Create or refresh the configured administrator
    pub async fn ensure_admin(&self, admin: &BootstrapAdminConfig) -> AppResult<User> {
        let password = optional(Some(admin.password.clone()))
            .ok_or_else(|| AppError::Validation("Bootstrap admin password is empty".to_string()))?;

        let new_admin = NewUser {
            name: required(Some(admin.name.clone()), "bootstrap_admin.name")?,
            email: required(Some(admin.email.clone()), "bootstrap_admin.email")?.to_lowercase(),
            worker_id: required(Some(admin.worker_id.clone()), "bootstrap_admin.worker_id")?,
            role: Role::Admin,
            password_hash: Some(hash_password(&password)?),
        };

        let user = self.repository.users.upsert_admin(&new_admin).await?;
        tracing::info!(user_id = %user.id, email = %user.email, "Bootstrap administrator ensured");
        Ok(user)
    }
}

/// Validate an account request and hash its password
fn prepare_user(mut user: CreateUser) -> AppResult<NewUser> {
    let name = required(user.name.clone(), "name")?;
    let email = required(user.email.clone(), "email")?.to_lowercase();
    let worker_id = required(user.worker_id.clone(), "workerId")?;

    user.email = Some(email.clone());
    user.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let role = Role::from_request(user.role.as_deref());
    let password = user.password.filter(|p| !p.is_empty());

    if role == Role::Admin && password.is_none() {
        return Err(AppError::Validation("Admins must have a password".to_string()));
    }

    let password_hash = password.as_deref().map(hash_password).transpose()?;

    Ok(NewUser {
        name,
        email,
        worker_id,
        role,
        password_hash,
    })
}

/// Hash a password with Argon2 and a random salt
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a stored Argon2 hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
