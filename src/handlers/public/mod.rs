// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Security Level: None (completely public access)
// Route Prefix: No /api prefix (e.g., /auth/*)

pub mod auth;

pub use auth::*;
