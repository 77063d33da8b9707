use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Owns the registration guard and the credential validator; the token
/// side of login lives in the HTTP layer, which exchanges the returned
/// identity for a signed token.
pub struct UserService<R>
where
    R: UserRepository,
{
    repository: Arc<R>,
    password_hasher: auth::PasswordHasher,
}

impl<R> UserService<R>
where
    R: UserRepository,
{
    /// Create a new user service with an injected repository.
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            password_hasher: auth::PasswordHasher::new(),
        }
    }
}

#[async_trait]
impl<R> UserServicePort for UserService<R>
where
    R: UserRepository,
{
    async fn register_user(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        // Reject a duplicate on either field before touching the hasher;
        // the single error shape hides which field collided
        if self
            .repository
            .find_by_username_or_email(&command.username, &command.email)
            .await?
            .is_some()
        {
            return Err(UserError::AlreadyRegistered);
        }

        let password_hash = self
            .password_hasher
            .hash(command.password.as_str())
            .map_err(|e| UserError::HashingFailed(e.to_string()))?;

        // The command (and the plaintext inside it) is dropped here; only
        // the hash survives
        let user = self
            .repository
            .create(&command.username, &command.email, &password_hash)
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(user)
    }

    async fn authenticate_user(
        &self,
        username: &Username,
        password: &str,
    ) -> Result<User, UserError> {
        let user = self
            .repository
            .find_by_username(username)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        // Wrong password and an unparseable stored hash both collapse into
        // the same InvalidCredentials as the unknown-user case above
        match self.password_hasher.verify(password, &user.password_hash) {
            Ok(true) => Ok(user),
            Ok(false) => Err(UserError::InvalidCredentials),
            Err(e) => {
                tracing::warn!(username = %username, "Stored password hash rejected: {}", e);
                Err(UserError::InvalidCredentials)
            }
        }
    }

    async fn get_user_by_username(&self, username: &Username) -> Result<User, UserError> {
        self.repository
            .find_by_username(username)
            .await?
            .ok_or(UserError::NotFound(username.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::Password;
    use crate::domain::user::models::UserId;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;
            async fn find_by_username_or_email(
                &self,
                username: &Username,
                email: &EmailAddress,
            ) -> Result<Option<User>, UserError>;
            async fn create(
                &self,
                username: &Username,
                email: &EmailAddress,
                password_hash: &str,
            ) -> Result<User, UserError>;
        }
    }

    fn test_user(username: &str, password_hash: &str) -> User {
        User {
            id: UserId(1),
            username: Username::new(username.to_string()).unwrap(),
            email: EmailAddress::new(format!("{}@example.com", username)).unwrap(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        }
    }

    fn register_command(username: &str, email: &str, password: &str) -> RegisterUserCommand {
        RegisterUserCommand::new(
            Username::new(username.to_string()).unwrap(),
            EmailAddress::new(email.to_string()).unwrap(),
            Password::new(password.to_string()).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_register_user_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_username_or_email()
            .times(1)
            .returning(|_, _| Ok(None));

        repository
            .expect_create()
            .withf(|username, email, password_hash| {
                username.as_str() == "alice"
                    && email.as_str() == "alice@example.com"
                    && password_hash.starts_with("$argon2")
            })
            .times(1)
            .returning(|username, email, password_hash| {
                Ok(User {
                    id: UserId(1),
                    username: username.clone(),
                    email: email.clone(),
                    password_hash: password_hash.to_string(),
                    created_at: Utc::now(),
                })
            });

        let service = UserService::new(Arc::new(repository));

        let user = service
            .register_user(register_command("alice", "alice@example.com", "secret123"))
            .await
            .expect("Registration failed");

        assert_eq!(user.username.as_str(), "alice");
        // Stored credential is a hash, never the plaintext
        assert!(user.password_hash.starts_with("$argon2"));
        assert_ne!(user.password_hash, "secret123");
    }

    #[tokio::test]
    async fn test_register_user_duplicate_email() {
        let mut repository = MockTestUserRepository::new();

        // A different username with an already-used email still collides
        repository
            .expect_find_by_username_or_email()
            .times(1)
            .returning(|_, _| Ok(Some(test_user("existing", "$argon2id$hash"))));

        repository.expect_create().times(0);

        let service = UserService::new(Arc::new(repository));

        let result = service
            .register_user(register_command("newcomer", "existing@example.com", "pw123"))
            .await;

        assert!(matches!(result, Err(UserError::AlreadyRegistered)));
    }

    #[tokio::test]
    async fn test_authenticate_user_success() {
        let hasher = auth::PasswordHasher::new();
        let hash = hasher.hash("secret123").unwrap();

        let mut repository = MockTestUserRepository::new();
        let stored = test_user("alice", &hash);
        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));

        let service = UserService::new(Arc::new(repository));

        let username = Username::new("alice".to_string()).unwrap();
        let user = service
            .authenticate_user(&username, "secret123")
            .await
            .expect("Authentication failed");

        assert_eq!(user.username.as_str(), "alice");
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_are_indistinguishable() {
        let hasher = auth::PasswordHasher::new();
        let hash = hasher.hash("right_password").unwrap();

        let mut repository = MockTestUserRepository::new();
        let stored = test_user("real_user", &hash);
        repository
            .expect_find_by_username()
            .withf(|u| u.as_str() == "real_user")
            .returning(move |_| Ok(Some(stored.clone())));
        repository
            .expect_find_by_username()
            .withf(|u| u.as_str() == "ghost")
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository));

        let ghost = Username::new("ghost".to_string()).unwrap();
        let real = Username::new("real_user".to_string()).unwrap();

        let unknown_err = service
            .authenticate_user(&ghost, "anything")
            .await
            .expect_err("Ghost user authenticated");
        let wrong_pw_err = service
            .authenticate_user(&real, "wrong_password")
            .await
            .expect_err("Wrong password accepted");

        assert!(matches!(unknown_err, UserError::InvalidCredentials));
        assert!(matches!(wrong_pw_err, UserError::InvalidCredentials));
        assert_eq!(unknown_err.to_string(), wrong_pw_err.to_string());
    }

    #[tokio::test]
    async fn test_authenticate_user_malformed_stored_hash_fails_closed() {
        let mut repository = MockTestUserRepository::new();
        let stored = test_user("alice", "not-a-phc-string");
        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));

        let service = UserService::new(Arc::new(repository));

        let username = Username::new("alice".to_string()).unwrap();
        let result = service.authenticate_user(&username, "whatever").await;

        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_get_user_by_username_not_found() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository));

        let username = Username::new("nobody".to_string()).unwrap();
        let result = service.get_user_by_username(&username).await;

        assert!(matches!(result, Err(UserError::NotFound(_))));
    }
}
