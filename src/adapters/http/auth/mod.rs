//! HTTP adapter for authentication endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{AuthResponse, LoginRequest, RegisterRequest};
pub use routes::auth_routes;
