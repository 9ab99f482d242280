use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    auth::{
        dto::{LoginRequest, PublicUser, RegisterRequest, RegistrationResponse},
        jwt::TokenCodec,
        password::PasswordEncoder,
        repo::UserRepo,
        repo_types::{NewUser, UserRole},
    },
    db::RepoError,
    error::AppError,
};

const USERNAME_MAX_LEN: usize = 50;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Registration and login on top of the user store.
#[derive(Clone)]
pub struct CredentialService {
    users: Arc<dyn UserRepo>,
    passwords: PasswordEncoder,
    tokens: TokenCodec,
}

impl CredentialService {
    pub fn new(users: Arc<dyn UserRepo>, passwords: PasswordEncoder, tokens: TokenCodec) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<RegistrationResponse, AppError> {
        let username = req.username.trim().to_owned();
        let email = req.email.trim().to_lowercase();

        if username.is_empty() {
            return Err(AppError::validation("Username is required"));
        }
        if username.chars().count() > USERNAME_MAX_LEN {
            return Err(AppError::validation(format!(
                "Username must be at most {USERNAME_MAX_LEN} characters"
            )));
        }
        if !is_valid_email(&email) {
            return Err(AppError::validation("Invalid email"));
        }
        if req.password.trim().is_empty() {
            return Err(AppError::validation("Password is required"));
        }

        if self.users.exists_by_username(&username).await? {
            warn!(%username, "username already registered");
            return Err(AppError::DuplicateCredential("Username already exists"));
        }
        if self.users.exists_by_email(&email).await? {
            warn!(%email, "email already registered");
            return Err(AppError::DuplicateCredential("Email already exists"));
        }

        let password_hash = self.passwords.encode(&req.password)?;
        let user = self
            .users
            .insert(NewUser {
                username,
                email,
                password_hash,
                first_name: blank_to_none(req.first_name),
                last_name: blank_to_none(req.last_name),
                role: UserRole::User,
                is_active: true,
            })
            .await
            .map_err(|e| match e {
                // lost a race with a concurrent registration
                RepoError::Conflict("email") => AppError::DuplicateCredential("Email already exists"),
                RepoError::Conflict(_) => AppError::DuplicateCredential("Username already exists"),
                other => other.into(),
            })?;

        info!(user_id = user.id, username = %user.username, "user registered");
        Ok(user.into())
    }

    /// Unknown usernames and wrong passwords fail identically.
    pub async fn login(&self, req: LoginRequest) -> Result<String, AppError> {
        let username = req.username.trim();

        let Some(user) = self.users.find_by_username(username).await? else {
            self.passwords.reject(&req.password);
            warn!(%username, "login for unknown username");
            return Err(AppError::InvalidCredential);
        };

        if !self.passwords.matches(&req.password, &user.password_hash) {
            warn!(%username, user_id = user.id, "login with invalid password");
            return Err(AppError::InvalidCredential);
        }

        let token = self.tokens.issue(&user.username)?;
        info!(user_id = user.id, username = %user.username, "user logged in");
        Ok(token)
    }

    pub async fn profile(&self, username: &str) -> Result<PublicUser, AppError> {
        self.users
            .find_by_username(username)
            .await?
            .map(PublicUser::from)
            .ok_or_else(|| AppError::NotFound(format!("User not found: {username}")))
    }
}
