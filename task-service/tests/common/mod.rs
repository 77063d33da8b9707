use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::KeyMaterial;
use auth::TokenCodec;
use chrono::Utc;
use task_service::domain::task::errors::TaskError;
use task_service::domain::task::models::CreateTaskCommand;
use task_service::domain::task::models::Task;
use task_service::domain::task::models::TaskId;
use task_service::domain::task::ports::TaskRepository;
use task_service::domain::task::service::TaskService;
use task_service::domain::user::errors::UserError;
use task_service::domain::user::models::EmailAddress;
use task_service::domain::user::models::User;
use task_service::domain::user::models::UserId;
use task_service::domain::user::models::Username;
use task_service::domain::user::ports::UserRepository;
use task_service::domain::user::service::UserService;
use task_service::inbound::http::router::create_router;

// Fixture keypair so no test pays for RSA generation
const TEST_PRIVATE_KEY: &str = include_str!("../keys/test-private.pem");
const TEST_PUBLIC_KEY: &str = include_str!("../keys/test-public.pem");

/// Test application that spawns the real router on a random port.
///
/// Persistence is in-memory fakes behind the repository ports, so each
/// test gets an isolated store with no external services, and tests can
/// reach into the store directly (e.g. to delete a user out from under a
/// live token).
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub token_codec: TokenCodec,
    pub users: Arc<InMemoryUserRepository>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let tasks = Arc::new(InMemoryTaskRepository::new());

        let keys = KeyMaterial::from_pem(TEST_PRIVATE_KEY, TEST_PUBLIC_KEY);
        let token_codec =
            Arc::new(TokenCodec::with_default_ttl(&keys).expect("Failed to build codec"));

        let user_service = Arc::new(UserService::new(Arc::clone(&users)));
        let task_service = Arc::new(TaskService::new(Arc::clone(&tasks)));

        let router = create_router(user_service, task_service, Arc::clone(&token_codec));

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        // A second codec over the same keypair lets tests mint their own
        // tokens (expired ones included)
        let token_codec = TokenCodec::with_default_ttl(&keys).expect("Failed to build codec");

        Self {
            address,
            api_client: reqwest::Client::new(),
            token_codec,
            users,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register a user through the API
    pub async fn register_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> reqwest::Response {
        self.post("/api/auth/register")
            .json(&serde_json::json!({
                "username": username,
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in through the API and return the bearer token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post("/api/auth/login")
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["access_token"]
            .as_str()
            .expect("Missing access_token")
            .to_string()
    }
}

/// In-memory user store implementing the repository port.
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Test hook: drop an account as if it was deleted after token issuance
    pub fn remove_by_username(&self, username: &str) {
        self.users
            .lock()
            .unwrap()
            .retain(|u| u.username.as_str() != username);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == *username)
            .cloned())
    }

    async fn find_by_username_or_email(
        &self,
        username: &Username,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == *username || u.email == *email)
            .cloned())
    }

    async fn create(
        &self,
        username: &Username,
        email: &EmailAddress,
        password_hash: &str,
    ) -> Result<User, UserError> {
        let user = User {
            id: UserId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            username: username.clone(),
            email: email.clone(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };

        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }
}

/// In-memory task store implementing the repository port.
pub struct InMemoryTaskRepository {
    tasks: Mutex<Vec<Task>>,
    next_id: AtomicI64,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Task>, TaskError> {
        Ok(self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == *user_id)
            .cloned()
            .collect())
    }

    async fn create(
        &self,
        command: CreateTaskCommand,
        user_id: &UserId,
    ) -> Result<Task, TaskError> {
        let task = Task {
            id: TaskId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            title: command.title,
            description: command.description,
            is_done: false,
            created_at: Utc::now(),
            user_id: *user_id,
        };

        self.tasks.lock().unwrap().push(task.clone());
        Ok(task)
    }

    async fn find_for_user(
        &self,
        task_id: &TaskId,
        user_id: &UserId,
    ) -> Result<Option<Task>, TaskError> {
        Ok(self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == *task_id && t.user_id == *user_id)
            .cloned())
    }

    async fn set_done(
        &self,
        task_id: &TaskId,
        user_id: &UserId,
        is_done: bool,
    ) -> Result<(), TaskError> {
        let mut tasks = self.tasks.lock().unwrap();
        match tasks
            .iter_mut()
            .find(|t| t.id == *task_id && t.user_id == *user_id)
        {
            Some(task) => {
                task.is_done = is_done;
                Ok(())
            }
            None => Err(TaskError::NotFound(task_id.to_string())),
        }
    }

    async fn delete(&self, task_id: &TaskId, user_id: &UserId) -> Result<(), TaskError> {
        let mut tasks = self.tasks.lock().unwrap();
        let before = tasks.len();
        tasks.retain(|t| !(t.id == *task_id && t.user_id == *user_id));

        if tasks.len() == before {
            return Err(TaskError::NotFound(task_id.to_string()));
        }

        Ok(())
    }
}
