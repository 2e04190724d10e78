//! Shared Kernel
//!
//! Vocabulary shared by every backend crate:
//! - Unified error type (`AppError`) and its HTTP classification (`ErrorKind`)
//! - Typed UUID identifiers
//!
//! Only things whose meaning is identical across crates belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
