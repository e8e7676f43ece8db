//! Domain models for family studies.

mod document;
mod family;
mod lock;
mod patient;
mod user;

pub use document::*;
pub use family::*;
pub use lock::*;
pub use patient::*;
pub use user::*;
