//! # his-core
//!
//! Domain types shared by every HIS API crate: the resolved caller [`Identity`],
//! read-only [`PatientRecord`]s and [`StaffAccount`]s.

pub mod date;
pub mod error;
pub mod identity;
pub mod patient;
pub mod staff;

pub use date::{DATE_FORMAT, parse_calendar_date};
pub use error::{CoreError, Result};
pub use identity::Identity;
pub use patient::{Gender, PatientRecord};
pub use staff::{NewStaff, StaffAccount};
