use async_trait::async_trait;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user with validated credentials.
    ///
    /// # Errors
    /// * `AlreadyRegistered` - Username or email is already taken
    /// * `HashingFailed` - Password hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn register_user(&self, command: RegisterUserCommand) -> Result<User, UserError>;

    /// Resolve and authenticate a user from a username/password pair.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password,
    ///   indistinguishable by design
    /// * `DatabaseError` - Database operation failed
    async fn authenticate_user(
        &self,
        username: &Username,
        password: &str,
    ) -> Result<User, UserError>;

    /// Retrieve user by unique username.
    ///
    /// # Errors
    /// * `NotFound` - No user with this username
    /// * `DatabaseError` - Database operation failed
    async fn get_user_by_username(&self, username: &Username) -> Result<User, UserError>;
}

/// Persistence operations for the user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Retrieve user by username.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;

    /// Retrieve a user matching either the username or the email.
    ///
    /// # Returns
    /// Optional user entity (None if neither field is taken)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username_or_email(
        &self,
        username: &Username,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserError>;

    /// Persist a new user and return it with its assigned id.
    ///
    /// # Errors
    /// * `AlreadyRegistered` - Unique constraint violated (username or email)
    /// * `DatabaseError` - Database operation failed
    async fn create(
        &self,
        username: &Username,
        email: &EmailAddress,
        password_hash: &str,
    ) -> Result<User, UserError>;
}
