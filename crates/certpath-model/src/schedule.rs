//! Fixed weekly study plan

use serde::Serialize;

/// Kind of study block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TaskKind {
    /// Reading and courses
    Theory,
    /// Sandbox exercises
    Lab,
    /// Recap and notes
    Review,
    /// Project work
    Build,
}

/// One day of the week's plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeeklyTask {
    /// Day label
    pub day: &'static str,
    /// What to do
    pub activity: &'static str,
    /// Block kind
    #[serde(rename = "type")]
    pub kind: TaskKind,
    /// Planned hours
    pub hours: f32,
}

/// The recommended week
pub const WEEKLY_SCHEDULE: [WeeklyTask; 6] = [
    WeeklyTask { day: "Monday", activity: "New Concept Study (MS Learn)", kind: TaskKind::Theory, hours: 1.5 },
    WeeklyTask { day: "Tuesday", activity: "Hands-on Lab (Sandbox Environment)", kind: TaskKind::Lab, hours: 1.5 },
    WeeklyTask { day: "Wednesday", activity: "Mid-week Review & Documentation", kind: TaskKind::Review, hours: 1.0 },
    WeeklyTask { day: "Thursday", activity: "Flagship Project Build Time", kind: TaskKind::Build, hours: 2.0 },
    WeeklyTask { day: "Friday", activity: "Architecture Pattern Analysis", kind: TaskKind::Theory, hours: 1.0 },
    WeeklyTask { day: "Weekend", activity: "Optional: Deep Dive / Hackathon", kind: TaskKind::Build, hours: 0.0 },
];

/// Planned hours per week
#[must_use]
pub fn weekly_hours() -> f32 {
    WEEKLY_SCHEDULE.iter().map(|t| t.hours).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seven_hours_a_week() {
        assert!((weekly_hours() - 7.0).abs() < f32::EPSILON);
    }
}
