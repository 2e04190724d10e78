//! Value Object Module

pub mod email;

pub use kernel::id::{SessionId, UserId};
