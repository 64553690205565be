use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::constants::API_NAME;
use crate::error::AppError;
use crate::models::{RegisterRequest, User, UserRole};
use crate::repository::UserRepository;

/// Bearer tokens stay valid for 7 days from issuance.
const TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies bearer tokens with the configured secret. The secret is
/// stable across restarts; previously issued tokens survive a redeploy.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn issue(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to sign token: {}", e)))
    }

    /// Verifies signature and expiry and returns the embedded user id.
    pub fn verify(&self, token: &str) -> Result<Uuid, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|_| AppError::Unauthorized("Not authorized, invalid token".to_string()))?;
        data.claims
            .sub
            .parse()
            .map_err(|_| AppError::Unauthorized("Not authorized, invalid token".to_string()))
    }
}

#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    signer: TokenSigner,
}

impl AuthService {
    pub fn new(users: UserRepository, signer: TokenSigner) -> Self {
        Self { users, signer }
    }

    pub fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    pub fn users(&self) -> &UserRepository {
        &self.users
    }

    /// Creates an account and returns a signed bearer token for it.
    pub async fn register(&self, request: &RegisterRequest) -> Result<String, AppError> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if request.name.trim().is_empty() {
            return Err(AppError::Validation("All fields are required".to_string()));
        }

        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to hash password: {}", e)))?;

        let user = self
            .users
            .create(&request.name, &request.email, &password_hash)
            .await
            .map_err(|e| {
                // The unique index is the backstop for a concurrent duplicate.
                if UserRepository::check_duplicate_email_error(&e).is_some() {
                    AppError::Conflict("User already exists".to_string())
                } else {
                    AppError::Database(e)
                }
            })?;

        tracing::info!("{} Registered user {}", API_NAME, user.id);
        self.signer.issue(user.id)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

        let matches = bcrypt::verify(password, &user.password_hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to verify password: {}", e)))?;
        if !matches {
            return Err(AppError::Unauthorized("Incorrect password".to_string()));
        }

        tracing::info!("{} User {} logged in", API_NAME, user.id);
        self.signer.issue(user.id)
    }

    /// Self-service upgrade of the caller's role to `owner`.
    pub async fn promote_to_owner(&self, user_id: Uuid) -> Result<(), AppError> {
        self.users.update_role(user_id, UserRole::Owner).await?;
        tracing::info!("{} User {} promoted to owner", API_NAME, user_id);
        Ok(())
    }

    pub async fn update_avatar(&self, user_id: Uuid, image_url: &str) -> Result<(), AppError> {
        self.users.update_image(user_id, image_url).await?;
        Ok(())
    }
}

/// Relation a caller must hold to a resource before a handler's domain logic
/// may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Caller must hold the `owner` role.
    OwnerRole,
    /// Caller must be the given owner of the resource; `None` (an unlisted
    /// car's owner slot) can never match.
    OwnerOf(Option<Uuid>),
}

/// Single authorization predicate applied uniformly before domain logic.
pub fn authorize(caller: &User, access: Access) -> Result<(), AppError> {
    match access {
        Access::OwnerRole => {
            if caller.role != UserRole::Owner {
                return Err(AppError::Forbidden("Owner role required".to_string()));
            }
        }
        Access::OwnerOf(resource_owner) => {
            if resource_owner != Some(caller.id) {
                return Err(AppError::Forbidden("Unauthorized".to_string()));
            }
        }
    }
    Ok(())
}
