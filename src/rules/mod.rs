//! Typed rule dispatch for string classification.
//!
//! A [`ValidatorRegistry`] maps each [`InputKind`] to exactly one
//! [`Validator`]. Validators are pure: `(text, context) -> verdict`. The
//! registry decides which validator runs and reports unknown or unbound kinds
//! as invalid instead of failing.
//!
//! ## Module Structure
//!
//! - `types`: input kinds, priorities, inputs and outcomes
//! - `heuristics`: code-likeness and prose checks shared by validators
//! - `validators`: the `Validator` trait and the built-in validators
//! - `registry`: kind-to-validator dispatch

pub mod heuristics;
pub mod registry;
pub mod types;
pub mod validators;

pub use registry::ValidatorRegistry;
pub use types::{
    InputKind, RulePriority, RuleVerdict, ValidationContext, ValidationInput, ValidationOutcome,
};
pub use validators::{BuiltinValidator, DEFAULT_TRANSLATABLE_ATTRIBUTES, Validator};
