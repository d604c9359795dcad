//! Raw search criteria as received from the caller.

use indexmap::IndexMap;

/// Fields a caller may search patients by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    NationalId,
    PassportId,
    FirstName,
    MiddleName,
    LastName,
    DateOfBirth,
    PhoneNumber,
    Email,
}

impl SearchField {
    /// All recognized fields.
    pub const ALL: [SearchField; 8] = [
        SearchField::NationalId,
        SearchField::PassportId,
        SearchField::FirstName,
        SearchField::MiddleName,
        SearchField::LastName,
        SearchField::DateOfBirth,
        SearchField::PhoneNumber,
        SearchField::Email,
    ];

    /// Look up a field by its query parameter name.
    ///
    /// Returns `None` for anything that is not a recognized field.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "national_id" => Some(SearchField::NationalId),
            "passport_id" => Some(SearchField::PassportId),
            "first_name" => Some(SearchField::FirstName),
            "middle_name" => Some(SearchField::MiddleName),
            "last_name" => Some(SearchField::LastName),
            "date_of_birth" => Some(SearchField::DateOfBirth),
            "phone_number" => Some(SearchField::PhoneNumber),
            "email" => Some(SearchField::Email),
            _ => None,
        }
    }

    /// The query parameter name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::NationalId => "national_id",
            SearchField::PassportId => "passport_id",
            SearchField::FirstName => "first_name",
            SearchField::MiddleName => "middle_name",
            SearchField::LastName => "last_name",
            SearchField::DateOfBirth => "date_of_birth",
            SearchField::PhoneNumber => "phone_number",
            SearchField::Email => "email",
        }
    }
}

/// Ordered mapping of criterion names to values, in the order the caller sent them.
///
/// Unrecognized names are kept here and ignored later by the builder. When a name is
/// repeated, the first value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    values: IndexMap<String, String>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a criterion unless the name is already present.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts a criterion unless the name is already present.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.entry(name.into()).or_insert_with(|| value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Iterates criteria in input order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for SearchCriteria
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut criteria = Self::new();
        for (name, value) in iter {
            criteria.insert(name, value);
        }
        criteria
    }
}
