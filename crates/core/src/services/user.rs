//! User service.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tandem_common::{AppError, AppResult, IdGenerator};
use tandem_db::{
    entities::{user, user_profile},
    repositories::{
        ReflectionRepository, SubscriptionRepository, UserProfileRepository, UserRepository,
        VoteRepository,
    },
};
use validator::Validate;

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    profile_repo: UserProfileRepository,
    subscription_repo: SubscriptionRepository,
    reflection_repo: ReflectionRepository,
    vote_repo: VoteRepository,
    id_gen: IdGenerator,
}

/// Input for creating a new user.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    #[validate(length(min = 1, max = 128))]
    pub username: String,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(max = 256))]
    pub name: Option<String>,
}

/// Input for updating a user.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInput {
    #[validate(length(max = 256))]
    pub name: Option<String>,

    #[validate(length(max = 2048))]
    pub bio: Option<String>,

    #[validate(url)]
    pub avatar_url: Option<String>,

    #[validate(length(max = 32))]
    pub lang: Option<String>,
}

/// Profile statistics derived from the user's activity.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    /// Goals the user is actively subscribed to.
    pub goals_joined: u64,
    /// Reflections the user has posted.
    pub reflections_posted: u64,
    /// Votes the user has cast across all goals.
    pub total_votes: u64,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub fn new(
        user_repo: UserRepository,
        profile_repo: UserProfileRepository,
        subscription_repo: SubscriptionRepository,
        reflection_repo: ReflectionRepository,
        vote_repo: VoteRepository,
    ) -> Self {
        Self {
            user_repo,
            profile_repo,
            subscription_repo,
            reflection_repo,
            vote_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new user.
    pub async fn create(&self, input: CreateUserInput) -> AppResult<user::Model> {
        input.validate()?;

        if self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::BadRequest("Username already taken".to_string()));
        }

        if let Some(ref email) = input.email
            && self.user_repo.find_by_email(email).await?.is_some()
        {
            return Err(AppError::BadRequest("Email already registered".to_string()));
        }

        let password_hash = hash_password(&input.password)?;

        let user_id = self.id_gen.generate();
        let token = self.id_gen.generate_token();

        let user_model = user::ActiveModel {
            id: Set(user_id.clone()),
            username: Set(input.username.clone()),
            username_lower: Set(input.username.to_lowercase()),
            email: Set(input.email),
            token: Set(Some(token)),
            name: Set(input.name),
            ..Default::default()
        };

        let user = self.user_repo.create(user_model).await?;

        let profile_model = user_profile::ActiveModel {
            user_id: Set(user_id),
            password: Set(Some(password_hash)),
            ..Default::default()
        };

        self.profile_repo.create(profile_model).await?;

        Ok(user)
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Authenticate a user by token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Authenticate a user by username and password.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let profile = self
            .profile_repo
            .find_by_user_id(&user.id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let password_hash = profile.password.ok_or(AppError::Unauthorized)?;
        if !verify_password(password, &password_hash)? {
            return Err(AppError::Unauthorized);
        }

        Ok(user)
    }

    /// Regenerate a user's authentication token.
    pub async fn regenerate_token(&self, user_id: &str) -> AppResult<String> {
        let user = self.user_repo.get_by_id(user_id).await?;
        let new_token = self.id_gen.generate_token();

        let mut active: user::ActiveModel = user.into();
        active.token = Set(Some(new_token.clone()));
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.user_repo.update(active).await?;

        Ok(new_token)
    }

    /// Clear a user's authentication token.
    pub async fn clear_token(&self, user_id: &str) -> AppResult<()> {
        let user = self.user_repo.get_by_id(user_id).await?;

        let mut active: user::ActiveModel = user.into();
        active.token = Set(None);
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.user_repo.update(active).await?;
        Ok(())
    }

    /// Update a user and their profile.
    pub async fn update(&self, id: &str, input: UpdateUserInput) -> AppResult<user::Model> {
        input.validate()?;

        let user = self.user_repo.get_by_id(id).await?;
        let mut active: user::ActiveModel = user.into();

        if let Some(name) = input.name {
            active.name = Set(Some(name));
        }
        if let Some(avatar_url) = input.avatar_url {
            active.avatar_url = Set(Some(avatar_url));
        }
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let updated = self.user_repo.update(active).await?;

        if input.bio.is_some() || input.lang.is_some() {
            let profile = self
                .profile_repo
                .find_by_user_id(id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Profile not found: {id}")))?;
            let mut active: user_profile::ActiveModel = profile.into();
            if let Some(bio) = input.bio {
                active.bio = Set(Some(bio));
            }
            if let Some(lang) = input.lang {
                active.lang = Set(Some(lang));
            }
            active.updated_at = Set(Some(chrono::Utc::now().into()));
            self.profile_repo.update(active).await?;
        }

        Ok(updated)
    }

    /// Profile statistics for a user.
    pub async fn stats(&self, user_id: &str) -> AppResult<ProfileStats> {
        let goals_joined = self.subscription_repo.count_active_by_user(user_id).await?;
        let reflections_posted = self.reflection_repo.count_by_user(user_id).await?;
        let total_votes = self.vote_repo.count_by_user(user_id).await?;

        Ok(ProfileStats {
            goals_joined,
            reflections_posted,
            total_votes,
        })
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(id: &str, username: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: username.to_string(),
            username_lower: username.to_lowercase(),
            email: None,
            token: Some("test_token".to_string()),
            name: Some("Test User".to_string()),
            avatar_url: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn empty_db() -> Arc<sea_orm::DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    fn create_test_service(
        user_db: Arc<sea_orm::DatabaseConnection>,
        profile_db: Arc<sea_orm::DatabaseConnection>,
    ) -> UserService {
        UserService::new(
            UserRepository::new(user_db),
            UserProfileRepository::new(profile_db),
            SubscriptionRepository::new(empty_db()),
            ReflectionRepository::new(empty_db()),
            VoteRepository::new(empty_db()),
        )
    }

    #[test]
    fn test_hash_password() {
        let password = "test_password_123";
        let hash = hash_password(password).unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(hash.len() > 50);
    }

    #[test]
    fn test_verify_password_correct() {
        let password = "test_password_123";
        let hash = hash_password(password).unwrap();

        assert!(verify_password(password, &hash).unwrap());
    }

    #[test]
    fn test_verify_password_incorrect() {
        let password = "test_password_123";
        let hash = hash_password(password).unwrap();

        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(verify_password("test", "invalid_hash").is_err());
    }

    #[test]
    fn test_hash_password_different_each_time() {
        let password = "same_password";
        let hash1 = hash_password(password).unwrap();
        let hash2 = hash_password(password).unwrap();

        // Different salts should produce different hashes
        assert_ne!(hash1, hash2);

        assert!(verify_password(password, &hash1).unwrap());
        assert!(verify_password(password, &hash2).unwrap());
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = create_test_service(user_db, empty_db());

        let result = service.get("nonexistent").await;
        match result {
            Err(AppError::UserNotFound(id)) => assert_eq!(id, "nonexistent"),
            _ => panic!("Expected UserNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_authenticate_by_token_found() {
        let user = create_test_user("user1", "testuser");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );

        let service = create_test_service(user_db, empty_db());

        let result = service.authenticate_by_token("test_token").await.unwrap();
        assert_eq!(result.id, "user1");
    }

    #[tokio::test]
    async fn test_authenticate_by_token_not_found() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = create_test_service(user_db, empty_db());

        let result = service.authenticate_by_token("invalid").await;
        match result {
            Err(AppError::Unauthorized) => {}
            _ => panic!("Expected Unauthorized error"),
        }
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let user = create_test_user("user1", "testuser");
        let hash = hash_password("correct_password").unwrap();
        let profile = user_profile::Model {
            user_id: "user1".to_string(),
            password: Some(hash),
            bio: None,
            lang: None,
            created_at: Utc::now().into(),
            updated_at: None,
        };

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );
        let profile_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[profile]])
                .into_connection(),
        );

        let service = create_test_service(user_db, profile_db);

        let result = service.authenticate("testuser", "wrong_password").await;
        match result {
            Err(AppError::Unauthorized) => {}
            _ => panic!("Expected Unauthorized error"),
        }
    }

    #[test]
    fn test_create_user_input_validation() {
        let input = CreateUserInput {
            username: "a".repeat(200),
            email: None,
            password: "password123".to_string(),
            name: None,
        };
        assert!(input.validate().is_err());

        let input = CreateUserInput {
            username: "testuser".to_string(),
            email: None,
            password: "short".to_string(),
            name: None,
        };
        assert!(input.validate().is_err());

        let input = CreateUserInput {
            username: "testuser".to_string(),
            email: Some("not-an-email".to_string()),
            password: "password123".to_string(),
            name: None,
        };
        assert!(input.validate().is_err());

        let input = CreateUserInput {
            username: "testuser".to_string(),
            email: Some("test@example.com".to_string()),
            password: "password123".to_string(),
            name: Some("Test User".to_string()),
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_update_user_input_validation() {
        let input = UpdateUserInput {
            name: None,
            bio: Some("a".repeat(3000)),
            avatar_url: None,
            lang: None,
        };
        assert!(input.validate().is_err());

        let input = UpdateUserInput {
            name: Some("New Name".to_string()),
            bio: Some("Bio".to_string()),
            avatar_url: Some("https://example.com/avatar.png".to_string()),
            lang: Some("en".to_string()),
        };
        assert!(input.validate().is_ok());
    }
}
