//! Typed search predicate.
//!
//! A [`Predicate`] is an AND of [`Clause`]s; a clause is either a single
//! [`Condition`] or an OR-group of them. Fields come from a closed enum and values
//! are typed, so nothing a caller sends can end up as query text.

use std::fmt;

use time::Date;

/// Patient attributes that can appear in a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatientField {
    NationalId,
    PassportId,
    FirstNameTh,
    FirstNameEn,
    MiddleNameTh,
    MiddleNameEn,
    LastNameTh,
    LastNameEn,
    DateOfBirth,
    PhoneNumber,
    Email,
}

impl PatientField {
    /// Attribute name, identical to the `PatientRecord` field and storage column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NationalId => "national_id",
            Self::PassportId => "passport_id",
            Self::FirstNameTh => "first_name_th",
            Self::FirstNameEn => "first_name_en",
            Self::MiddleNameTh => "middle_name_th",
            Self::MiddleNameEn => "middle_name_en",
            Self::LastNameTh => "last_name_th",
            Self::LastNameEn => "last_name_en",
            Self::DateOfBirth => "date_of_birth",
            Self::PhoneNumber => "phone_number",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for PatientField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison operators for conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Exact equality
    Eq,
    /// Case-insensitive substring match
    ContainsIgnoreCase,
}

/// Typed condition value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Date(Date),
}

impl FilterValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Date(_) => None,
        }
    }

    pub fn as_date(&self) -> Option<Date> {
        match self {
            Self::Date(d) => Some(*d),
            Self::Text(_) => None,
        }
    }
}

/// A single `field op value` comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub field: PatientField,
    pub op: Operator,
    pub value: FilterValue,
}

impl Condition {
    /// Create an exact text match.
    pub fn eq(field: PatientField, value: impl Into<String>) -> Self {
        Self {
            field,
            op: Operator::Eq,
            value: FilterValue::Text(value.into()),
        }
    }

    /// Create an exact date match.
    pub fn eq_date(field: PatientField, value: Date) -> Self {
        Self {
            field,
            op: Operator::Eq,
            value: FilterValue::Date(value),
        }
    }

    /// Create a case-insensitive substring match.
    pub fn contains_ignore_case(field: PatientField, value: impl Into<String>) -> Self {
        Self {
            field,
            op: Operator::ContainsIgnoreCase,
            value: FilterValue::Text(value.into()),
        }
    }
}

/// One AND-ed term of a predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// A single condition
    Match(Condition),
    /// Conditions combined with OR
    AnyOf(Vec<Condition>),
}

impl Clause {
    /// Conditions in this clause, in order.
    pub fn conditions(&self) -> &[Condition] {
        match self {
            Self::Match(c) => std::slice::from_ref(c),
            Self::AnyOf(cs) => cs,
        }
    }
}

/// A non-empty conjunction of clauses, produced only by [`crate::FilterBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    pub(crate) fn new(clauses: Vec<Clause>) -> Self {
        debug_assert!(!clauses.is_empty(), "predicate must constrain the search");
        Self { clauses }
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Always `false` for predicates built by [`crate::FilterBuilder`].
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Field names touched by this predicate, for logging without values.
    pub fn fields(&self) -> Vec<&'static str> {
        self.clauses
            .iter()
            .flat_map(|c| c.conditions().iter().map(|cond| cond.field.as_str()))
            .collect()
    }
}
