//! Static asset delivery and composable value validation.
//!
//! The crate keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (path containment, predicates,
//!   combinators, the validator builder). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (filesystem, response sinks, file
//!   delivery, rules files). Seams are traits so tests can observe them.
//!
//! [`validate`] is the top-level validation entry point and [`error`] holds the
//! error types both halves report with.

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod validate;

pub use crate::core::builder::{ValidatorBuilder, validator};
pub use crate::core::predicate::{Predicate, ValueKind};
pub use crate::core::sandbox::PathSandbox;
pub use crate::error::{DeliveryError, HttpError, ValidationError};
pub use crate::io::deliver::FileDeliverer;
pub use crate::validate::validate;
