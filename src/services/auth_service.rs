//! Authentication service - registration, login and session tokens.
//!
//! Tokens carry only the user id. Every protected request re-loads the user
//! from the identity store, so role changes and deletions apply at once.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{
    AuthResponse, NewUser, Password, PatientDetails, Registration, RoleRegistration, User,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account (and a doctor profile for doctors) and sign it in.
    async fn register(&self, registration: Registration) -> AppResult<AuthResponse>;

    /// Check credentials and issue a session token.
    async fn login(&self, email: String, password: String) -> AppResult<AuthResponse>;

    /// Check a token's signature and expiry.
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Verify a token and load the user it names.
    async fn authenticate(&self, token: &str) -> AppResult<User>;
}

/// Sign a session token for a user id.
fn generate_token(user_id: Uuid, config: &Config) -> AppResult<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        exp: (now + Duration::days(config.jwt_expiration_days)).timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(token)
}

/// Concrete implementation of AuthService over a Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, registration: Registration) -> AppResult<AuthResponse> {
        let role = registration.role();

        if self
            .uow
            .users()
            .find_by_email(&registration.email)
            .await?
            .is_some()
        {
            tracing::info!(email = %registration.email, "Registration rejected, email taken");
            return Err(AppError::conflict("User"));
        }

        let password_hash = Password::new(&registration.password)?.into_string();

        let user = match registration.role {
            RoleRegistration::Doctor { profile, phone } => {
                let new_user = NewUser {
                    name: registration.name,
                    email: registration.email,
                    password_hash,
                    role,
                    details: PatientDetails {
                        phone,
                        ..Default::default()
                    },
                };
                let (user, profile) = self.uow.doctors().create_with_user(new_user, profile).await?;
                tracing::info!(user_id = %user.id, doctor_id = %profile.id, "Doctor profile created");
                user
            }
            RoleRegistration::Patient(details) => {
                self.uow
                    .users()
                    .create(NewUser {
                        name: registration.name,
                        email: registration.email,
                        password_hash,
                        role,
                        details,
                    })
                    .await?
            }
            RoleRegistration::Admin => {
                self.uow
                    .users()
                    .create(NewUser {
                        name: registration.name,
                        email: registration.email,
                        password_hash,
                        role,
                        details: Default::default(),
                    })
                    .await?
            }
        };

        tracing::info!(user_id = %user.id, email = %user.email, role = %user.role, "User registered");

        let token = generate_token(user.id, &self.config)?;
        Ok(AuthResponse::new(&user, token))
    }

    async fn login(&self, email: String, password: String) -> AppResult<AuthResponse> {
        let email = email.trim().to_lowercase();
        let user = self.uow.users().find_by_email(&email).await?;

        // Verify against a placeholder when the email is unknown so both
        // failures take the same time.
        let stored = match &user {
            Some(user) => Password::from_hash(user.password_hash.clone()),
            None => Password::dummy(),
        };
        let password_valid = stored.verify(&password);

        match user {
            Some(user) if password_valid => {
                let token = generate_token(user.id, &self.config)?;
                Ok(AuthResponse::new(&user, token))
            }
            _ => {
                tracing::info!(email = %email, "Failed login attempt");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    async fn authenticate(&self, token: &str) -> AppResult<User> {
        let claims = self.verify_token(token)?;

        self.uow
            .users()
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| {
                tracing::debug!(user_id = %claims.sub, "Token names a user that no longer exists");
                AppError::Unauthorized
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::new("postgres://localhost/test", "test-secret-key-for-testing-only-32chars")
    }

    #[test]
    fn test_token_round_trip() {
        let config = config();
        let id = Uuid::new_v4();
        let token = generate_token(id, &config).unwrap();

        let claims = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(config.jwt_secret_bytes()),
            &Validation::default(),
        )
        .unwrap()
        .claims;

        assert_eq!(claims.sub, id);
        assert_eq!(claims.exp - claims.iat, 30 * 24 * 60 * 60);
    }

    #[test]
    fn test_token_from_other_key_rejected() {
        let token = generate_token(Uuid::new_v4(), &config()).unwrap();
        let other = Config::new("postgres://localhost/test", "another-secret-key-also-32-chars-long");

        let result = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(other.jwt_secret_bytes()),
            &Validation::default(),
        );
        assert!(result.is_err());
    }
}
