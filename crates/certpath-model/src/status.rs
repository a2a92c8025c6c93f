//! Completion status and its rotation rule
//!
//! A [`Status`] only ever changes through [`Status::rotated`]. There is no
//! public "set status" operation on certifications or projects.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Completion state of a certification or project
///
/// Unknown wire values load as `Completed`, so a stored document written by
/// another version is never rejected and its next rotation is `Locked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Not started
    #[default]
    Locked,
    /// Being studied or built
    InProgress,
    /// Done
    Completed,
}

impl Status {
    /// All statuses in rotation order
    pub const ALL: [Status; 3] = [Status::Locked, Status::InProgress, Status::Completed];

    /// Next status in the 3-cycle `Locked -> InProgress -> Completed -> Locked`
    ///
    /// Anything that is neither `Locked` nor `InProgress` rotates to `Locked`.
    #[inline]
    #[must_use]
    pub fn rotated(self) -> Self {
        match self {
            Status::Locked => Status::InProgress,
            Status::InProgress => Status::Completed,
            Status::Completed => Status::Locked,
        }
    }

    /// Wire name, as written into persisted documents
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Locked => "LOCKED",
            Status::InProgress => "IN_PROGRESS",
            Status::Completed => "COMPLETED",
        }
    }

    /// Parse a wire name, mapping anything unrecognised to `Completed`
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        match value {
            "LOCKED" => Status::Locked,
            "IN_PROGRESS" => Status::InProgress,
            _ => Status::Completed,
        }
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Status::from_wire(&value))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_order() {
        assert_eq!(Status::Locked.rotated(), Status::InProgress);
        assert_eq!(Status::InProgress.rotated(), Status::Completed);
        assert_eq!(Status::Completed.rotated(), Status::Locked);
    }

    #[test]
    fn rotation_is_a_three_cycle() {
        for status in Status::ALL {
            assert_eq!(status.rotated().rotated().rotated(), status);
            assert_ne!(status.rotated(), status);
        }
    }

    #[test]
    fn wire_names() {
        assert_eq!(serde_json::to_string(&Status::InProgress).unwrap(), "\"IN_PROGRESS\"");
        let parsed: Status = serde_json::from_str("\"COMPLETED\"").unwrap();
        assert_eq!(parsed, Status::Completed);
    }

    #[test]
    fn unknown_wire_values_load_as_completed() {
        for raw in ["\"DONE\"", "\"NOT_STARTED\"", "\"locked\"", "\"\""] {
            let parsed: Status = serde_json::from_str(raw).unwrap();
            assert_eq!(parsed, Status::Completed, "{raw}");
            assert_eq!(parsed.rotated(), Status::Locked);
        }
        assert!(serde_json::from_str::<Status>("3").is_err());
    }
}
