//! HTTP middleware stack for the recipe site.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Method override (rewrite `POST ?_method=DELETE` before routing)
//! 2. Sentry layer (capture errors)
//! 3. `TraceLayer` (request tracing)
//! 4. Request ID (add unique ID to each request)
//! 5. Session layer (tower-sessions, signed cookie)

pub mod auth;
pub mod method_override;
pub mod request_id;
pub mod session;

pub use auth::{OptionalAuth, RequireAuth, clear_current_user, set_current_user};
pub use method_override::method_override_middleware;
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
