//! # his-search
//!
//! Turns the optional query criteria of a patient search into a typed,
//! injection-free [`Predicate`].
//!
//! The predicate is a list of `(field, operator, value)` conditions. It never
//! contains executable text; translating it into a parameterized query is left
//! to the storage backend.

pub mod builder;
pub mod criteria;
pub mod error;
pub mod predicate;

pub use builder::{FilterBuilder, build};
pub use criteria::{SearchCriteria, SearchField};
pub use error::ValidationError;
pub use predicate::{Clause, Condition, FilterValue, Operator, PatientField, Predicate};
