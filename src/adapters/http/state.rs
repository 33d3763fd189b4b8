//! Shared application state for the HTTP adapters.

use std::sync::Arc;

use crate::application::handlers::auth::{LoginHandler, RefreshTokensHandler, RegisterHandler};
use crate::application::handlers::task::{
    BatchProcessTasksHandler, CreateTaskHandler, GetTaskHandler, GetTaskStatsHandler,
    ListTasksHandler, RemoveTaskHandler, UpdateTaskHandler, UpdateTaskStatusHandler,
};
use crate::application::handlers::user::{
    CreateUserHandler, GetUserHandler, ListUsersHandler, RemoveUserHandler, UpdateUserHandler,
};
use crate::ports::{JobQueue, PasswordHasher, TaskRepository, TokenIssuer, UserRepository};

/// Shared application state containing all dependencies.
///
/// Cloned per request; every field is an `Arc`. Command and query handlers are
/// built on demand from it.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub tasks: Arc<dyn TaskRepository>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn TokenIssuer>,
    pub queue: Arc<dyn JobQueue>,
}

impl AppState {
    // ── auth ────────────────────────────────────────────────────────────────

    pub fn register_handler(&self) -> RegisterHandler {
        RegisterHandler::new(self.users.clone(), self.hasher.clone(), self.tokens.clone())
    }

    pub fn login_handler(&self) -> LoginHandler {
        LoginHandler::new(self.users.clone(), self.hasher.clone(), self.tokens.clone())
    }

    pub fn refresh_tokens_handler(&self) -> RefreshTokensHandler {
        RefreshTokensHandler::new(self.users.clone(), self.tokens.clone())
    }

    // ── users ───────────────────────────────────────────────────────────────

    pub fn create_user_handler(&self) -> CreateUserHandler {
        CreateUserHandler::new(self.users.clone(), self.hasher.clone())
    }

    pub fn get_user_handler(&self) -> GetUserHandler {
        GetUserHandler::new(self.users.clone())
    }

    pub fn list_users_handler(&self) -> ListUsersHandler {
        ListUsersHandler::new(self.users.clone())
    }

    pub fn update_user_handler(&self) -> UpdateUserHandler {
        UpdateUserHandler::new(self.users.clone(), self.hasher.clone())
    }

    pub fn remove_user_handler(&self) -> RemoveUserHandler {
        RemoveUserHandler::new(self.users.clone(), self.tasks.clone())
    }

    // ── tasks ───────────────────────────────────────────────────────────────

    pub fn create_task_handler(&self) -> CreateTaskHandler {
        CreateTaskHandler::new(self.tasks.clone(), self.queue.clone())
    }

    pub fn get_task_handler(&self) -> GetTaskHandler {
        GetTaskHandler::new(self.tasks.clone())
    }

    pub fn list_tasks_handler(&self) -> ListTasksHandler {
        ListTasksHandler::new(self.tasks.clone())
    }

    pub fn task_stats_handler(&self) -> GetTaskStatsHandler {
        GetTaskStatsHandler::new(self.tasks.clone())
    }

    pub fn update_task_handler(&self) -> UpdateTaskHandler {
        UpdateTaskHandler::new(self.tasks.clone(), self.queue.clone())
    }

    pub fn update_task_status_handler(&self) -> UpdateTaskStatusHandler {
        UpdateTaskStatusHandler::new(self.tasks.clone(), self.queue.clone())
    }

    pub fn remove_task_handler(&self) -> RemoveTaskHandler {
        RemoveTaskHandler::new(self.tasks.clone())
    }

    pub fn batch_process_tasks_handler(&self) -> BatchProcessTasksHandler {
        BatchProcessTasksHandler::new(self.tasks.clone(), self.queue.clone())
    }
}
