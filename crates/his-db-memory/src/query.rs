//! Predicate evaluation against in-memory records.

use his_core::PatientRecord;
use his_search::{Clause, Condition, FilterValue, Operator, PatientField, Predicate};
use time::Date;

/// Borrowed view of a record attribute.
#[derive(Debug, Clone, Copy)]
enum FieldRef<'a> {
    Text(Option<&'a str>),
    Date(Date),
}

fn field_ref(record: &PatientRecord, field: PatientField) -> FieldRef<'_> {
    match field {
        PatientField::NationalId => FieldRef::Text(record.national_id.as_deref()),
        PatientField::PassportId => FieldRef::Text(record.passport_id.as_deref()),
        PatientField::FirstNameTh => FieldRef::Text(Some(&record.first_name_th)),
        PatientField::FirstNameEn => FieldRef::Text(Some(&record.first_name_en)),
        PatientField::MiddleNameTh => FieldRef::Text(Some(&record.middle_name_th)),
        PatientField::MiddleNameEn => FieldRef::Text(Some(&record.middle_name_en)),
        PatientField::LastNameTh => FieldRef::Text(Some(&record.last_name_th)),
        PatientField::LastNameEn => FieldRef::Text(Some(&record.last_name_en)),
        PatientField::DateOfBirth => FieldRef::Date(record.date_of_birth),
        PatientField::PhoneNumber => FieldRef::Text(Some(&record.phone_number)),
        PatientField::Email => FieldRef::Text(Some(&record.email)),
    }
}

/// Check if a record satisfies one condition.
///
/// A missing optional attribute never matches, mirroring SQL `NULL` semantics.
pub fn matches_condition(record: &PatientRecord, condition: &Condition) -> bool {
    match (field_ref(record, condition.field), condition.op, &condition.value) {
        (FieldRef::Text(Some(actual)), Operator::Eq, FilterValue::Text(expected)) => {
            actual == expected
        }
        (FieldRef::Text(Some(actual)), Operator::ContainsIgnoreCase, FilterValue::Text(needle)) => {
            actual.to_lowercase().contains(&needle.to_lowercase())
        }
        (FieldRef::Date(actual), Operator::Eq, FilterValue::Date(expected)) => actual == *expected,
        _ => false,
    }
}

/// Check if a record satisfies every clause of a predicate.
pub fn matches(record: &PatientRecord, predicate: &Predicate) -> bool {
    predicate.clauses().iter().all(|clause| match clause {
        Clause::Match(condition) => matches_condition(record, condition),
        Clause::AnyOf(conditions) => conditions.iter().any(|c| matches_condition(record, c)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use his_core::Gender;
    use his_search::{SearchCriteria, build};
    use time::macros::date;

    fn record() -> PatientRecord {
        PatientRecord {
            id: 1,
            first_name_th: "สมชาย".into(),
            middle_name_th: String::new(),
            last_name_th: "สุขดี".into(),
            first_name_en: "Somchai".into(),
            middle_name_en: String::new(),
            last_name_en: "Sukdee".into(),
            date_of_birth: date!(1990 - 05 - 12),
            patient_hn: Some("HN001".into()),
            national_id: Some("1234567890123".into()),
            passport_id: None,
            phone_number: "0812345678".into(),
            email: "somchai@example.com".into(),
            gender: Gender::Male,
            hospital: "Hospital".into(),
        }
    }

    fn predicate(pairs: &[(&str, &str)]) -> Predicate {
        build(&pairs.iter().copied().collect::<SearchCriteria>()).unwrap()
    }

    #[test]
    fn test_exact_match() {
        assert!(matches(&record(), &predicate(&[("national_id", "1234567890123")])));
        assert!(!matches(&record(), &predicate(&[("national_id", "123456789012")])));
    }

    #[test]
    fn test_missing_optional_never_matches() {
        assert!(!matches(&record(), &predicate(&[("passport_id", "A1")])));
    }

    #[test]
    fn test_name_contains_either_script() {
        assert!(matches(&record(), &predicate(&[("first_name", "som")])));
        assert!(matches(&record(), &predicate(&[("first_name", "SOMCHAI")])));
        assert!(matches(&record(), &predicate(&[("last_name", "สุข")])));
        assert!(!matches(&record(), &predicate(&[("first_name", "wichai")])));
    }

    #[test]
    fn test_date_match() {
        assert!(matches(&record(), &predicate(&[("date_of_birth", "1990-05-12")])));
        assert!(!matches(&record(), &predicate(&[("date_of_birth", "1990-05-13")])));
    }

    #[test]
    fn test_clauses_are_anded() {
        let p = predicate(&[("first_name", "som"), ("email", "other@example.com")]);
        assert!(!matches(&record(), &p));
        let p = predicate(&[("first_name", "som"), ("email", "somchai@example.com")]);
        assert!(matches(&record(), &p));
    }
}
