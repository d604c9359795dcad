//! Staff accounts used for login.

use std::fmt;

use serde::Serialize;

/// A registered staff member. The password hash never leaves the process.
#[derive(Clone, Serialize)]
pub struct StaffAccount {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub hospital: String,
}

impl fmt::Debug for StaffAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaffAccount")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("hospital", &self.hospital)
            .finish()
    }
}

/// Data required to register a staff member.
#[derive(Clone)]
pub struct NewStaff {
    pub username: String,
    pub password_hash: String,
    pub hospital: String,
}

impl fmt::Debug for NewStaff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewStaff")
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("hospital", &self.hospital)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_never_exposed() {
        let staff = StaffAccount {
            id: 7,
            username: "admin".into(),
            password_hash: "$argon2id$secret".into(),
            hospital: "Hospital".into(),
        };
        let json = serde_json::to_value(&staff).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "admin");
        assert!(!format!("{staff:?}").contains("secret"));
    }
}
