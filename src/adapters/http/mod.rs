//! HTTP adapters - REST API implementations.
//!
//! Each domain module has its own HTTP adapter for endpoint exposure. The
//! `router` module assembles them into the application router.

pub mod auth;
pub mod error;
pub mod middleware;
pub mod router;
pub mod state;
pub mod tasks;
pub mod users;

pub use error::{ErrorResponse, TaskApiError, UserApiError};
pub use middleware::RouteRateLimits;
pub use router::{app_router, RouterSettings};
pub use state::AppState;
