//! Server-side models.

pub mod session;

pub use session::{SessionError, SessionState};
