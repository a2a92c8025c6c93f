//! Artifact naming
//!
//! Names are part of the persisted layout and must stay stable across
//! releases, otherwise existing users lose their documents.

use chrono::NaiveDate;

/// Prefix of the per-user progress artifact
pub const PROGRESS_PREFIX: &str = "agentic_roadmap_progress_";

/// Prefix of the per-user login record
pub const LOGIN_PREFIX: &str = "user_tracker_";

/// Key of the single local slot
pub const LOCAL_SLOT: &str = "agentic_roadmap_data";

/// Prefix of exported backups
pub const EXPORT_PREFIX: &str = "agentic_roadmap_backup_";

/// Remote artifact holding a user's document
#[must_use]
pub fn progress_artifact(key: &str) -> String {
    format!("{PROGRESS_PREFIX}{key}.json")
}

/// Remote artifact holding a user's last login
#[must_use]
pub fn login_artifact(key: &str) -> String {
    format!("{LOGIN_PREFIX}{key}.json")
}

/// Backup file name for a calendar date
#[must_use]
pub fn export_file(date: NaiveDate) -> String {
    format!("{EXPORT_PREFIX}{}.json", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_names_are_stable() {
        assert_eq!(
            progress_artifact("sam@example.com"),
            "agentic_roadmap_progress_sam@example.com.json"
        );
        assert_eq!(
            login_artifact("sam@example.com"),
            "user_tracker_sam@example.com.json"
        );
    }

    #[test]
    fn export_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(export_file(date), "agentic_roadmap_backup_2026-03-07.json");
    }
}
