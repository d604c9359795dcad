//! Patient records as stored by the owning hospital.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::error::CoreError;

time::serde::format_description!(birth_date, Date, "[year]-[month]-[day]");

/// Administrative gender as recorded at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }
}

impl FromStr for Gender {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "M" => Ok(Gender::Male),
            "F" => Ok(Gender::Female),
            other => Err(CoreError::invalid_gender(other)),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A patient record. Names are kept in two scripts: Thai (`*_th`) and English (`*_en`).
///
/// Search never mutates records; `hospital` is the owning facility and is what the
/// authorization gate checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: i64,
    pub first_name_th: String,
    #[serde(default)]
    pub middle_name_th: String,
    pub last_name_th: String,
    #[serde(default)]
    pub first_name_en: String,
    #[serde(default)]
    pub middle_name_en: String,
    #[serde(default)]
    pub last_name_en: String,
    #[serde(with = "birth_date")]
    pub date_of_birth: Date,
    #[serde(default)]
    pub patient_hn: Option<String>,
    #[serde(default)]
    pub national_id: Option<String>,
    #[serde(default)]
    pub passport_id: Option<String>,
    pub phone_number: String,
    #[serde(default)]
    pub email: String,
    pub gender: Gender,
    pub hospital: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn somchai() -> PatientRecord {
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

    #[test]
    fn serializes_date_and_gender_as_codes() {
        let json = serde_json::to_value(somchai()).unwrap();
        assert_eq!(json["date_of_birth"], "1990-05-12");
        assert_eq!(json["gender"], "M");
        assert_eq!(json["passport_id"], serde_json::Value::Null);
        assert_eq!(json["hospital"], "Hospital");
    }

    #[test]
    fn gender_codes_are_closed() {
        assert_eq!("F".parse::<Gender>().unwrap(), Gender::Female);
        assert!("X".parse::<Gender>().is_err());
    }
}
