//! Volunteer and shift models, plus shift-derived reliability metrics.

use serde::{Deserialize, Serialize};

use super::{opt_string_or_number, string_or_number, timestamp_millis};

/// A registered volunteer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volunteer {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub reliability_score: i64,
    #[serde(default)]
    pub total_hours: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Volunteer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn is_active(&self) -> bool {
        self.status == "active"
    }

    pub fn created_at_millis(&self) -> Option<i64> {
        self.created_at.as_deref().and_then(timestamp_millis)
    }
}

fn default_shift_status() -> String {
    "scheduled".to_string()
}

/// A scheduled or completed volunteer shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub volunteer_id: Option<String>,
    #[serde(default)]
    pub volunteer_name: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub start_time: String,
    /// `HH:MM`
    pub end_time: String,
    #[serde(default)]
    pub role: String,
    #[serde(default = "default_shift_status")]
    pub status: String,
    #[serde(default)]
    pub notes: String,
}

impl Shift {
    fn is_scheduled(&self) -> bool {
        self.status == "scheduled"
    }

    fn is_credited(&self) -> bool {
        matches!(self.status.as_str(), "completed" | "all_good" | "late")
    }

    /// Whole hours worked, wrapping past midnight. `None` when a time is malformed.
    fn duration_hours(&self) -> Option<i64> {
        let start = hour_of(&self.start_time)?;
        let end = hour_of(&self.end_time)?;
        let mut duration = end - start;
        if duration < 0 {
            duration += 24;
        }
        Some(duration)
    }
}

fn hour_of(time: &str) -> Option<i64> {
    time.split(':').next()?.trim().parse().ok()
}

/// Reliability score over a volunteer's shift history.
pub fn reliability_score(shifts: &[Shift]) -> i64 {
    shifts
        .iter()
        .filter(|s| !s.is_scheduled())
        .map(|shift| {
            let mut score = match shift.status.as_str() {
                "completed" | "all_good" => 20,
                "late" => 10,
                "missed" | "no_show" => -50,
                "covered" | "covered 24h" | "covered_24h" => -5,
                "covered late" | "covered_late" | "covered <24h notice" | "covered_less_24h" => -10,
                "covered <1h notice" | "covered_less_1h" => -20,
                _ => 0,
            };

            if shift.notes.contains("Covering for") {
                if shift.notes.contains(">24h notice") {
                    score += 10;
                } else if shift.notes.contains("<24h notice") {
                    score += 20;
                }
            }
            score
        })
        .sum()
}

/// Hours credited for completed (or late) shifts.
pub fn total_hours(shifts: &[Shift]) -> i64 {
    shifts
        .iter()
        .filter(|s| s.is_credited())
        .filter_map(Shift::duration_hours)
        .sum()
}

/// Past shifts ordered by date. Scheduled shifts are not counted.
fn worked_by_date(shifts: &[Shift]) -> Vec<&Shift> {
    let mut worked: Vec<&Shift> = shifts.iter().filter(|s| !s.is_scheduled()).collect();
    worked.sort_by(|a, b| a.date.cmp(&b.date));
    worked
}

/// Credited shifts in a row, counting back from the most recent one.
pub fn current_streak(shifts: &[Shift]) -> i64 {
    worked_by_date(shifts)
        .into_iter()
        .rev()
        .take_while(|s| s.is_credited())
        .count() as i64
}

/// Longest run of credited shifts anywhere in the history.
pub fn max_streak(shifts: &[Shift]) -> i64 {
    let mut best = 0;
    let mut run = 0;
    for shift in worked_by_date(shifts) {
        if shift.is_credited() {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift(status: &str, start: &str, end: &str, notes: &str) -> Shift {
        Shift {
            id: "1".to_string(),
            volunteer_id: Some("v1".to_string()),
            volunteer_name: "Jo".to_string(),
            date: "2024-06-01".to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            role: "Cat Care".to_string(),
            status: status.to_string(),
            notes: notes.to_string(),
        }
    }

    #[test]
    fn test_reliability_score_rules() {
        let shifts = vec![
            shift("completed", "09:00", "12:00", ""),
            shift("late", "09:00", "12:00", ""),
            shift("no_show", "09:00", "12:00", ""),
            shift("scheduled", "09:00", "12:00", "Covering for Sam"),
            shift("completed", "09:00", "12:00", "Covering for Sam (<24h notice)"),
            shift("covered_less_1h", "09:00", "12:00", ""),
        ];
        // 20 + 10 - 50 + (20 + 20) - 20
        assert_eq!(reliability_score(&shifts), 0);
    }

    #[test]
    fn test_total_hours_wraps_midnight() {
        let shifts = vec![
            shift("completed", "22:00", "02:00", ""),
            shift("late", "09:30", "11:00", ""),
            shift("missed", "09:00", "17:00", ""),
            shift("completed", "bad", "11:00", ""),
        ];
        assert_eq!(total_hours(&shifts), 4 + 2);
    }

    fn dated(date: &str, status: &str) -> Shift {
        Shift {
            date: date.to_string(),
            ..shift(status, "09:00", "12:00", "")
        }
    }

    #[test]
    fn test_current_streak_counts_back_from_latest() {
        let shifts = vec![
            dated("2024-06-09", "scheduled"),
            dated("2024-06-07", "late"),
            dated("2024-06-01", "completed"),
            dated("2024-06-03", "missed"),
            dated("2024-06-05", "all_good"),
        ];
        assert_eq!(current_streak(&shifts), 2);

        let ended_badly = vec![dated("2024-06-01", "completed"), dated("2024-06-02", "no_show")];
        assert_eq!(current_streak(&ended_badly), 0);
        assert_eq!(current_streak(&[]), 0);
    }

    #[test]
    fn test_max_streak_finds_longest_run() {
        let shifts = vec![
            dated("2024-06-06", "completed"),
            dated("2024-06-01", "completed"),
            dated("2024-06-02", "late"),
            dated("2024-06-03", "all_good"),
            dated("2024-06-04", "covered_late"),
            dated("2024-06-05", "scheduled"),
        ];
        assert_eq!(max_streak(&shifts), 3);
        assert_eq!(current_streak(&shifts), 1);
        assert_eq!(max_streak(&[dated("2024-06-01", "missed")]), 0);
    }

    #[test]
    fn test_shift_defaults_to_scheduled() {
        let parsed: Shift = serde_json::from_value(serde_json::json!({
            "id": 3,
            "volunteerId": 9,
            "date": "2024-06-01",
            "startTime": "09:00",
            "endTime": "11:00"
        }))
        .unwrap();
        assert_eq!(parsed.status, "scheduled");
        assert_eq!(parsed.volunteer_id.as_deref(), Some("9"));
    }
}
