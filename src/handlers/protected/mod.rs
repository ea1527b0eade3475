// handlers/protected/mod.rs - Protected handlers (session required)
//
// Everything here sits behind the session middleware at /api/*; handlers
// receive the verified AuthUser as a request extension.

pub mod auth;
pub mod dashboard;
pub mod notes;

pub use auth::*;
pub use dashboard::dashboard_get;
pub use notes::*;
