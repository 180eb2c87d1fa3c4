//! # Arbor Core
//!
//! Core types and the error taxonomy shared by every Arbor crate.
//!
//! - **Types**: [`OptionSide`], [`ExerciseStyle`], [`PayoffStyle`]
//! - **Errors**: [`ArborError`] with configuration, numeric degeneracy and
//!   serialization variants, plus [`NumericIssue`] annotations
//!
//! ## Example
//!
//! ```rust
//! use arbor_core::prelude::*;
//!
//! let side: OptionSide = "Put".parse().unwrap();
//! assert_eq!(side.intrinsic(90.0, 100.0), 10.0);
//! assert!(ExerciseStyle::American.allows_early_exercise());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod types;

pub use error::{ArborError, ArborResult, IssueKind, NumericIssue};
pub use types::{ExerciseStyle, OptionSide, PayoffStyle};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{ArborError, ArborResult, IssueKind, NumericIssue};
    pub use crate::types::{ExerciseStyle, OptionSide, PayoffStyle};
}
