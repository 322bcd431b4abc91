use super::{null_as_empty, Draft, Entity, MemberRef, ResourceKind};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    #[default]
    Training,
    Match,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Training => "training",
            Self::Match => "match",
        }
    }
}

/// A scheduled training session or match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type", default)]
    pub event_type: EventType,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub teams: Vec<MemberRef>,
    #[serde(default)]
    pub coach: Option<MemberRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coach_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Event {
    pub fn start(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.start_date)
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.end_date)
    }

    pub fn team_ids(&self) -> Vec<i64> {
        self.teams.iter().map(MemberRef::id).collect()
    }

    /// Coach id from the embedded record, falling back to the flat `coachId`
    pub fn coach_ref(&self) -> Option<i64> {
        self.coach.as_ref().map(MemberRef::id).or(self.coach_id)
    }
}

impl Entity for Event {
    const KIND: ResourceKind = ResourceKind::Events;

    fn id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn to_draft(&self) -> Draft {
        let mut draft = Draft::new()
            .with("name", self.name.as_str())
            .with("type", self.event_type.as_str())
            .with("location", self.location.as_str())
            .with("startDate", self.start_date.as_str())
            .with("endDate", self.end_date.as_str())
            .with("teamIds", self.team_ids());
        if let Some(coach_id) = self.coach_ref() {
            draft.set("coachId", Value::from(coach_id));
        }
        draft
    }

    fn validate_draft(draft: &Draft) -> Result<(), String> {
        if draft.ids("teamIds").is_empty() {
            return Err("At least one team must be selected.".into());
        }
        let start = draft.str("startDate").and_then(parse_timestamp);
        let end = draft.str("endDate").and_then(parse_timestamp);
        match (start, end) {
            (Some(start), Some(end)) if end <= start => {
                Err("End time must be after the start time.".into())
            },
            (Some(_), Some(_)) => Ok(()),
            _ => Err("Please select start and end dates/times.".into()),
        }
    }
}

/// Parse the timestamp formats the API and the forms produce
///
/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM[:SS]` (taken as UTC) and a bare
/// `YYYY-MM-DD` (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Event {
        serde_json::from_value(json!({
            "id": 12,
            "name": "Derby",
            "type": "match",
            "startDate": "2026-10-03T14:00:00.000Z",
            "endDate": "2026-10-03T15:30:00.000Z",
            "location": "North pitch",
            "teams": [{"id": 1, "name": "U12 Reds"}, {"id": 2, "name": "U12 Blues"}],
            "coach": {"id": 4, "name": "Marta"}
        }))
        .unwrap()
    }

    #[test]
    fn test_decodes_event() {
        let event = sample();
        assert_eq!(event.event_type, EventType::Match);
        assert_eq!(event.team_ids(), vec![1, 2]);
        assert_eq!(event.coach_ref(), Some(4));
        assert!(event.start().unwrap() < event.end().unwrap());
    }

    #[test]
    fn test_null_coach_and_teams() {
        let event: Event = serde_json::from_value(json!({
            "id": 1, "name": "Drills", "type": "training",
            "startDate": "2026-10-01T09:00:00Z", "endDate": "2026-10-01T10:00:00Z",
            "location": "Gym", "teams": null, "coach": null
        }))
        .unwrap();
        assert!(event.teams.is_empty());
        assert_eq!(event.coach_ref(), None);
    }

    #[test]
    fn test_validate_requires_teams() {
        let draft = sample().to_draft().with("teamIds", json!([]));
        assert_eq!(
            Event::validate_draft(&draft).unwrap_err(),
            "At least one team must be selected."
        );
    }

    #[test]
    fn test_validate_requires_dates() {
        let mut draft = sample().to_draft();
        draft.set("endDate", Value::Null);
        assert_eq!(
            Event::validate_draft(&draft).unwrap_err(),
            "Please select start and end dates/times."
        );
        assert!(Event::validate_draft(&sample().to_draft()).is_ok());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2026-10-03T14:00:00.000Z").is_some());
        assert!(parse_timestamp("2026-10-03T14:00").is_some());
        assert!(parse_timestamp("2026-10-03").is_some());
        assert!(parse_timestamp("next tuesday").is_none());
        assert!(parse_timestamp("").is_none());
    }
}
