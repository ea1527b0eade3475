// handlers/mod.rs - Two-tier handler architecture
//
// Public (no auth, /auth/*) → Protected (session required, /api/*)

pub mod protected;
pub mod public;
