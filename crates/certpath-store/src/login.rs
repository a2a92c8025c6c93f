//! Last-login record written on each successful sign-in

use certpath_model::Identity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One user's most recent login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRecord {
    /// Display name
    pub name: String,
    /// User key
    pub email: String,
    /// Avatar URL
    #[serde(default)]
    pub picture: String,
    /// When the sign-in completed
    pub last_login: DateTime<Utc>,
    /// Application name
    pub app: String,
}

impl LoginRecord {
    /// Record for `identity` at `at`
    #[must_use]
    pub fn new(identity: &Identity, at: DateTime<Utc>, app: impl Into<String>) -> Self {
        Self {
            name: identity.name.clone(),
            email: identity.email.clone(),
            picture: identity.picture.clone(),
            last_login: at,
            app: app.into(),
        }
    }

    /// Pretty JSON bytes
    ///
    /// # Errors
    /// Returns `serde_json::Error` if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn camel_case_wire_shape() {
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let record = LoginRecord::new(
            &Identity::new("Sam", "sam@example.com"),
            at,
            "Agentic AI Architect Roadmap",
        );
        let value: serde_json::Value = serde_json::from_slice(&record.to_bytes().unwrap()).unwrap();
        assert_eq!(value["lastLogin"], "2026-01-02T03:04:05Z");
        assert_eq!(value["app"], "Agentic AI Architect Roadmap");
        assert_eq!(value["email"], "sam@example.com");
        assert_eq!(value["picture"], "");
    }
}
