//! Pure pipeline stages: response validation, status rendering and change
//! detection. Nothing here performs I/O.

pub mod interpreter;
pub mod tracker;
pub mod validator;

pub use interpreter::{NO_NEW_STATUSES, StatusInterpreter};
pub use tracker::ChangeTracker;
pub use validator::ResponseValidator;
