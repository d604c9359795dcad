//! Predicate to SQL translation.
//!
//! Column names come from [`PatientField`](his_search::PatientField), never from caller input. Values are
//! always bound through numbered `$n` placeholders.

use his_search::{Clause, Condition, FilterValue, Operator, Predicate};
use his_storage::StorageError;
use time::Date;

/// Columns selected for a patient row, in `PatientRecord` order.
pub const PATIENT_COLUMNS: &str = "id, first_name_th, middle_name_th, last_name_th, \
first_name_en, middle_name_en, last_name_en, date_of_birth, patient_hn, national_id, \
passport_id, phone_number, email, gender, hospital";

/// A value bound to a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Text(String),
    Date(Date),
}

/// SQL text plus its positional parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

struct QueryWriter {
    params: Vec<SqlValue>,
}

impl QueryWriter {
    fn placeholder(&mut self, value: SqlValue) -> String {
        self.params.push(value);
        format!("${}", self.params.len())
    }

    fn condition(&mut self, condition: &Condition) -> Result<String, StorageError> {
        let column = condition.field.as_str();
        let sql = match (condition.op, &condition.value) {
            (Operator::Eq, FilterValue::Text(text)) => {
                let p = self.placeholder(SqlValue::Text(text.clone()));
                format!("{column} = {p}")
            }
            (Operator::Eq, FilterValue::Date(date)) => {
                let p = self.placeholder(SqlValue::Date(*date));
                format!("{column} = {p}")
            }
            (Operator::ContainsIgnoreCase, FilterValue::Text(text)) => {
                let pattern = format!("%{}%", escape_like(text));
                let p = self.placeholder(SqlValue::Text(pattern));
                format!("{column} ILIKE {p} ESCAPE '\\'")
            }
            (Operator::ContainsIgnoreCase, FilterValue::Date(_)) => {
                return Err(StorageError::invalid_query(format!(
                    "substring match is not supported on date column {column}"
                )));
            }
        };
        Ok(sql)
    }

    fn clause(&mut self, clause: &Clause) -> Result<String, StorageError> {
        match clause {
            Clause::Match(condition) => self.condition(condition),
            Clause::AnyOf(conditions) => {
                let parts = conditions
                    .iter()
                    .map(|c| self.condition(c))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!("({})", parts.join(" OR ")))
            }
        }
    }
}

/// Escapes `%`, `_` and `\` so a value matches literally inside `LIKE`.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Builds `SELECT ... FROM patients WHERE ... ORDER BY id` for `predicate`.
///
/// Fails with [`StorageError::InvalidQuery`] for an operator the column type
/// cannot support.
pub fn build_patient_query(predicate: &Predicate) -> Result<BuiltQuery, StorageError> {
    let mut writer = QueryWriter { params: Vec::new() };
    let clauses = predicate
        .clauses()
        .iter()
        .map(|c| writer.clause(c))
        .collect::<Result<Vec<_>, _>>()?;
    let sql = format!(
        "SELECT {PATIENT_COLUMNS} FROM patients WHERE {} ORDER BY id",
        clauses.join(" AND ")
    );
    Ok(BuiltQuery {
        sql,
        params: writer.params,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use his_search::{PatientField, SearchCriteria, build};
    use time::macros::date;

    fn selects(field: PatientField) -> bool {
        PATIENT_COLUMNS
            .split(',')
            .any(|c| c.trim() == field.as_str())
    }

    fn query(pairs: &[(&str, &str)]) -> BuiltQuery {
        let predicate = build(&pairs.iter().copied().collect::<SearchCriteria>()).unwrap();
        build_patient_query(&predicate).unwrap()
    }

    #[test]
    fn test_exact_match() {
        let q = query(&[("national_id", "1234567890123")]);
        assert!(q.sql.ends_with("FROM patients WHERE national_id = $1 ORDER BY id"));
        assert_eq!(q.params, vec![SqlValue::Text("1234567890123".into())]);
    }

    #[test]
    fn test_name_or_group() {
        let q = query(&[("first_name", "som"), ("email", "a@b.c")]);
        assert!(q.sql.contains(
            "WHERE (first_name_th ILIKE $1 ESCAPE '\\' OR first_name_en ILIKE $2 ESCAPE '\\') AND email = $3"
        ));
        assert_eq!(
            q.params,
            vec![
                SqlValue::Text("%som%".into()),
                SqlValue::Text("%som%".into()),
                SqlValue::Text("a@b.c".into()),
            ]
        );
    }

    #[test]
    fn test_date_is_typed_param() {
        let q = query(&[("date_of_birth", "1990-05-12")]);
        assert!(q.sql.contains("date_of_birth = $1"));
        assert_eq!(q.params, vec![SqlValue::Date(date!(1990 - 05 - 12))]);
    }

    #[test]
    fn test_injection_stays_in_params() {
        let payload = "x'; DROP TABLE patients; --";
        let q = query(&[("national_id", payload)]);
        assert!(!q.sql.contains("DROP"));
        assert_eq!(q.params, vec![SqlValue::Text(payload.into())]);
    }

    #[test]
    fn test_like_metacharacters_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        let q = query(&[("last_name", "a%b")]);
        assert_eq!(q.params[0], SqlValue::Text("%a\\%b%".into()));
    }

    #[test]
    fn test_substring_on_date_rejected() {
        let mut writer = QueryWriter { params: Vec::new() };
        let condition = Condition {
            field: PatientField::DateOfBirth,
            op: Operator::ContainsIgnoreCase,
            value: FilterValue::Date(date!(1990 - 05 - 12)),
        };
        let err = writer.condition(&condition).unwrap_err();
        assert!(matches!(err, StorageError::InvalidQuery { .. }));
        assert!(writer.params.is_empty());
    }

    #[test]
    fn test_all_fields_selected() {
        for field in [
            PatientField::NationalId,
            PatientField::PassportId,
            PatientField::FirstNameTh,
            PatientField::FirstNameEn,
            PatientField::MiddleNameTh,
            PatientField::MiddleNameEn,
            PatientField::LastNameTh,
            PatientField::LastNameEn,
            PatientField::DateOfBirth,
            PatientField::PhoneNumber,
            PatientField::Email,
        ] {
            assert!(selects(field), "{field} not selected");
        }
    }
}
