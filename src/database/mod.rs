pub mod manager;
pub mod models;
pub mod store;

pub use manager::DatabaseError;
pub use models::{Note, User};
pub use store::{NoteStore, PgStore, StoreError, UserStore};
