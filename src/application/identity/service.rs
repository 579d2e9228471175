//! User management service: application-layer orchestration
//!
//! Registration, login, password changes and the bootstrap admin account.
//! HTTP handlers are thin wrappers that delegate here.

use std::sync::Arc;

use tracing::info;
use validator::ValidateEmail;

use crate::domain::{CreateUserDto, DomainError, DomainResult, RepositoryProvider, User, UserRole};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig) -> Self {
        Self { repos, jwt_config }
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate by username or email and issue a bearer token.
    pub async fn login(&self, username_or_email: &str, password: &str) -> DomainResult<AuthResult> {
        let users = self.repos.users();
        let user = match users.get_user_by_username(username_or_email).await? {
            Some(user) => Some(user),
            None => users.get_user_by_email(username_or_email).await?,
        };

        let Some(user) = user else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        if !user.is_active {
            return Err(DomainError::Unauthorized("Account is disabled".into()));
        }

        if !verify_password(password, &user.password_hash) {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        let token = create_token(&user.id, &user.username, user.role.as_str(), &self.jwt_config)
            .map_err(|e| DomainError::Storage(format!("Failed to create token: {}", e)))?;

        users.record_login(&user.id).await?;
        info!(user_id = %user.id, username = %user.username, "User logged in");

        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expires_in_seconds(),
            user,
        })
    }

    // ── Registration ────────────────────────────────────────────

    /// Register a new account. Self-registered users are always guests.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> DomainResult<User> {
        let username = username.trim();
        let email = email.trim();

        if username.chars().count() < 3 || username.chars().count() > 50 {
            return Err(DomainError::Validation(
                "Username must be 3-50 characters".into(),
            ));
        }
        if password.chars().count() < 8 {
            return Err(DomainError::Validation(
                "Password must be at least 8 characters".into(),
            ));
        }
        if !email.validate_email() {
            return Err(DomainError::Validation("Invalid email address".into()));
        }

        let user = self.create(username, email, password, UserRole::Guest).await?;
        info!(user_id = %user.id, username = %user.username, "New user registered");
        Ok(user)
    }

    /// Create the configured admin account when no user exists yet.
    ///
    /// Returns the new admin, or `None` if the user table was not empty.
    pub async fn ensure_default_admin(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> DomainResult<Option<User>> {
        if self.repos.users().count_users().await? > 0 {
            return Ok(None);
        }
        let admin = self.create(username, email, password, UserRole::Admin).await?;
        info!(username = %admin.username, "Default admin user created");
        Ok(Some(admin))
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn current_user(&self, id: &str) -> DomainResult<User> {
        self.repos
            .users()
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| user_not_found(id))
    }

    // ── Commands ────────────────────────────────────────────────

    /// Change a user's password. Verifies the current password first.
    pub async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        if new_password.chars().count() < 8 {
            return Err(DomainError::Validation(
                "New password must be at least 8 characters".into(),
            ));
        }

        let user = self.current_user(user_id).await?;

        if !verify_password(current_password, &user.password_hash) {
            return Err(DomainError::Unauthorized("Invalid current password".into()));
        }

        let new_hash = hash_password(new_password)
            .map_err(|e| DomainError::Storage(format!("Failed to hash password: {}", e)))?;

        self.repos
            .users()
            .update_user_password(user_id, &new_hash)
            .await?;

        info!(user_id, "Password changed");
        Ok(())
    }

    async fn create(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> DomainResult<User> {
        let users = self.repos.users();
        if users.get_user_by_username(username).await?.is_some() {
            return Err(DomainError::Conflict("Username already exists".into()));
        }
        if users.get_user_by_email(email).await?.is_some() {
            return Err(DomainError::Conflict("Email already exists".into()));
        }

        let password_hash = hash_password(password)
            .map_err(|e| DomainError::Storage(format!("Failed to hash password: {}", e)))?;

        users
            .create_user(CreateUserDto {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
                role,
            })
            .await
    }
}

fn user_not_found(id: &str) -> DomainError {
    DomainError::NotFound {
        entity: "User",
        field: "id",
        value: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::crypto::jwt::verify_token;
    use crate::infrastructure::storage::InMemoryStorage;

    fn service() -> UserService {
        UserService::new(Arc::new(InMemoryStorage::new()), JwtConfig::default())
    }

    #[tokio::test]
    async fn register_then_login_with_username_or_email() {
        let svc = service();
        let user = svc
            .register("maria", "maria@example.com", "s3cret-pass")
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::Guest);
        assert_ne!(user.password_hash, "s3cret-pass");

        let auth = svc.login("maria", "s3cret-pass").await.unwrap();
        assert_eq!(auth.token_type, "Bearer");
        assert_eq!(auth.expires_in, 24 * 3600);
        let claims = verify_token(&auth.token, &JwtConfig::default()).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, "guest");

        svc.login("maria@example.com", "s3cret-pass").await.unwrap();
        let me = svc.current_user(&user.id).await.unwrap();
        assert!(me.last_login_at.is_some());
    }

    #[tokio::test]
    async fn register_validates_input_and_uniqueness() {
        let svc = service();
        for (u, e, p) in [
            ("ab", "ab@example.com", "long-enough"),
            ("maria", "not-an-email", "long-enough"),
            ("maria", "maria@example.com", "short"),
        ] {
            assert!(matches!(
                svc.register(u, e, p).await,
                Err(DomainError::Validation(_))
            ));
        }

        svc.register("maria", "maria@example.com", "long-enough")
            .await
            .unwrap();
        assert!(matches!(
            svc.register("maria", "other@example.com", "long-enough").await,
            Err(DomainError::Conflict(_))
        ));
        assert!(matches!(
            svc.register("other", "maria@example.com", "long-enough").await,
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn bad_credentials_are_unauthorized() {
        let svc = service();
        svc.register("maria", "maria@example.com", "long-enough")
            .await
            .unwrap();
        assert!(matches!(
            svc.login("maria", "wrong-password").await,
            Err(DomainError::Unauthorized(_))
        ));
        assert!(matches!(
            svc.login("nobody", "long-enough").await,
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn change_password_requires_current_one() {
        let svc = service();
        let user = svc
            .register("maria", "maria@example.com", "long-enough")
            .await
            .unwrap();

        assert!(matches!(
            svc.change_password(&user.id, "wrong", "brand-new-pass").await,
            Err(DomainError::Unauthorized(_))
        ));
        svc.change_password(&user.id, "long-enough", "brand-new-pass")
            .await
            .unwrap();
        svc.login("maria", "brand-new-pass").await.unwrap();
        assert!(svc.login("maria", "long-enough").await.is_err());
    }

    #[tokio::test]
    async fn default_admin_only_created_once() {
        let svc = service();
        let admin = svc
            .ensure_default_admin("admin", "admin@example.com", "admin-pass")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, UserRole::Admin);

        assert!(svc
            .ensure_default_admin("admin2", "admin2@example.com", "admin-pass")
            .await
            .unwrap()
            .is_none());
    }
}
