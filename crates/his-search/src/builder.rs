//! Builds a [`Predicate`] from [`SearchCriteria`].

use his_core::parse_calendar_date;

use crate::criteria::{SearchCriteria, SearchField};
use crate::error::ValidationError;
use crate::predicate::{Clause, Condition, PatientField, Predicate};

/// Accumulates clauses for a patient search.
///
/// # Example
///
/// ```ignore
/// let predicate = FilterBuilder::new()
///     .exact(PatientField::NationalId, "1234567890123")
///     .name(PatientField::FirstNameTh, PatientField::FirstNameEn, "som")
///     .finish()?;
/// ```
#[derive(Debug, Default)]
pub struct FilterBuilder {
    clauses: Vec<Clause>,
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an exact-match clause.
    #[must_use]
    pub fn exact(mut self, field: PatientField, value: &str) -> Self {
        self.clauses.push(Clause::Match(Condition::eq(field, value)));
        self
    }

    /// Adds a case-insensitive substring clause over both name scripts.
    #[must_use]
    pub fn name(mut self, thai: PatientField, english: PatientField, value: &str) -> Self {
        self.clauses.push(Clause::AnyOf(vec![
            Condition::contains_ignore_case(thai, value),
            Condition::contains_ignore_case(english, value),
        ]));
        self
    }

    /// Parses `value` as `YYYY-MM-DD` and adds a date-of-birth clause.
    pub fn date_of_birth(mut self, value: &str) -> Result<Self, ValidationError> {
        let date = parse_calendar_date(value).map_err(|e| {
            tracing::debug!(error = %e, "Rejected date_of_birth criterion");
            ValidationError::invalid_date_format(value)
        })?;
        self.clauses
            .push(Clause::Match(Condition::eq_date(PatientField::DateOfBirth, date)));
        Ok(self)
    }

    /// Adds the clause for one recognized criterion.
    pub fn criterion(self, field: SearchField, value: &str) -> Result<Self, ValidationError> {
        Ok(match field {
            SearchField::NationalId => self.exact(PatientField::NationalId, value),
            SearchField::PassportId => self.exact(PatientField::PassportId, value),
            SearchField::FirstName => {
                self.name(PatientField::FirstNameTh, PatientField::FirstNameEn, value)
            }
            SearchField::MiddleName => {
                self.name(PatientField::MiddleNameTh, PatientField::MiddleNameEn, value)
            }
            SearchField::LastName => {
                self.name(PatientField::LastNameTh, PatientField::LastNameEn, value)
            }
            SearchField::DateOfBirth => self.date_of_birth(value)?,
            SearchField::PhoneNumber => self.exact(PatientField::PhoneNumber, value),
            SearchField::Email => self.exact(PatientField::Email, value),
        })
    }

    /// Finishes the predicate, refusing to produce an unconstrained search.
    pub fn finish(self) -> Result<Predicate, ValidationError> {
        if self.clauses.is_empty() {
            return Err(ValidationError::NoSearchCriteria);
        }
        Ok(Predicate::new(self.clauses))
    }

    /// Builds a predicate from caller criteria, in input order.
    ///
    /// Unrecognized names and empty values are skipped. The first invalid value
    /// aborts the build, so a partial predicate is never returned.
    pub fn from_criteria(criteria: &SearchCriteria) -> Result<Predicate, ValidationError> {
        let mut builder = Self::new();
        for (name, value) in criteria.iter() {
            if value.is_empty() {
                continue;
            }
            match SearchField::from_name(name) {
                Some(field) => builder = builder.criterion(field, value)?,
                None => tracing::trace!(criterion = %name, "Ignoring unrecognized search criterion"),
            }
        }
        let predicate = builder.finish()?;
        tracing::debug!(
            clauses = predicate.len(),
            fields = ?predicate.fields(),
            "Built patient search predicate"
        );
        Ok(predicate)
    }
}

/// Builds a predicate from caller criteria. See [`FilterBuilder::from_criteria`].
pub fn build(criteria: &SearchCriteria) -> Result<Predicate, ValidationError> {
    FilterBuilder::from_criteria(criteria)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::{FilterValue, Operator};
    use time::macros::date;

    fn criteria(pairs: &[(&str, &str)]) -> SearchCriteria {
        pairs.iter().copied().collect()
    }

    #[test]
    fn empty_criteria_is_rejected() {
        assert_eq!(
            build(&SearchCriteria::new()),
            Err(ValidationError::NoSearchCriteria)
        );
    }

    #[test]
    fn blank_and_unrecognized_criteria_do_not_count() {
        let input = criteria(&[
            ("national_id", ""),
            ("hospital", "Hospital"),
            ("email", ""),
            ("unknown", "x"),
        ]);
        assert_eq!(build(&input), Err(ValidationError::NoSearchCriteria));
    }

    #[test]
    fn exact_fields_produce_equality() {
        let predicate = build(&criteria(&[("national_id", "1234567890123")])).unwrap();
        assert_eq!(
            predicate.clauses(),
            &[Clause::Match(Condition::eq(
                PatientField::NationalId,
                "1234567890123"
            ))]
        );
    }

    #[test]
    fn name_fields_match_both_scripts() {
        let predicate = build(&criteria(&[("first_name", "som")])).unwrap();
        let Clause::AnyOf(conditions) = &predicate.clauses()[0] else {
            panic!("expected an OR-group");
        };
        assert_eq!(conditions.len(), 2);
        assert_eq!(conditions[0].field, PatientField::FirstNameTh);
        assert_eq!(conditions[1].field, PatientField::FirstNameEn);
        for condition in conditions {
            assert_eq!(condition.op, Operator::ContainsIgnoreCase);
            assert_eq!(condition.value, FilterValue::Text("som".into()));
        }
    }

    #[test]
    fn date_of_birth_is_typed() {
        let predicate = build(&criteria(&[("date_of_birth", "1990-05-12")])).unwrap();
        assert_eq!(
            predicate.clauses(),
            &[Clause::Match(Condition::eq_date(
                PatientField::DateOfBirth,
                date!(1990 - 05 - 12)
            ))]
        );
    }

    #[test]
    fn invalid_date_short_circuits() {
        let input = criteria(&[
            ("national_id", "1234567890123"),
            ("date_of_birth", "invalid_date"),
        ]);
        assert_eq!(
            build(&input),
            Err(ValidationError::invalid_date_format("invalid_date"))
        );
    }

    #[test]
    fn signed_year_is_not_a_date() {
        for value in ["+1990-05-12", "-1990-05-12"] {
            assert_eq!(
                build(&criteria(&[("date_of_birth", value)])),
                Err(ValidationError::invalid_date_format(value))
            );
        }
    }

    #[test]
    fn clauses_follow_input_order() {
        let input = criteria(&[
            ("email", "somchai@example.com"),
            ("last_name", "Sukdee"),
            ("phone_number", "0812345678"),
            ("passport_id", "A12345678"),
        ]);
        let predicate = build(&input).unwrap();
        assert_eq!(
            predicate.fields(),
            vec![
                "email",
                "last_name_th",
                "last_name_en",
                "phone_number",
                "passport_id"
            ]
        );
    }

    #[test]
    fn hostile_values_stay_values() {
        let payload = "x' OR '1'='1";
        let predicate = build(&criteria(&[("national_id", payload)])).unwrap();
        let condition = &predicate.clauses()[0].conditions()[0];
        assert_eq!(condition.value.as_text(), Some(payload));
    }

    #[test]
    fn error_messages_match_api_contract() {
        assert_eq!(
            ValidationError::NoSearchCriteria.to_string(),
            "At least one search criteria is required"
        );
        assert_eq!(
            ValidationError::invalid_date_format("x").to_string(),
            "Invalid date_of_birth format. Use YYYY-MM-DD"
        );
    }
}
