use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum::EnumString;

use super::{Entity, GroupRef};
use crate::store::keys;
use crate::validation::{FieldError, FormErrors, parse_date, parse_time};

/// Calendar event: training session, match, meeting...
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub kind: EventKind,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`, empty when not set
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub groups: Vec<GroupRef>,
    pub subgroup: Option<String>,
    pub description: String,
}

impl Event {
    pub fn date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    pub fn start_time(&self) -> Option<NaiveTime> {
        parse_time(&self.start_time)
    }

    /// True when the event happens on or after `today`.
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.date().is_some_and(|d| d >= today)
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum EventKind {
    #[default]
    #[strum(serialize = "training", serialize = "entrainement")]
    Training,
    #[strum(serialize = "match", serialize = "game")]
    Match,
    Meeting,
    Tournament,
    Other,
}

#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub kind: Option<EventKind>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    pub groups: Option<Vec<GroupRef>>,
    pub subgroup: Option<Option<String>>,
    pub description: Option<String>,
}

impl Entity for Event {
    const STORAGE_KEY: &'static str = keys::EVENTS;
    const ENTITY_NAME: &'static str = "event";
    type Patch = EventPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn apply(&mut self, patch: EventPatch) {
        if let Some(v) = patch.title {
            self.title = v;
        }
        if let Some(v) = patch.kind {
            self.kind = v;
        }
        if let Some(v) = patch.date {
            self.date = v;
        }
        if let Some(v) = patch.start_time {
            self.start_time = v;
        }
        if let Some(v) = patch.end_time {
            self.end_time = v;
        }
        if let Some(v) = patch.location {
            self.location = v;
        }
        if let Some(v) = patch.groups {
            self.groups = v;
        }
        if let Some(v) = patch.subgroup {
            self.subgroup = v;
        }
        if let Some(v) = patch.description {
            self.description = v;
        }
    }

    fn validate(&self) -> Result<(), Vec<FieldError>> {
        check_event(&self.title, &self.date, &self.start_time, &self.end_time)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.location.as_str(),
            self.description.as_str(),
        ]
    }

    fn group_refs(&self) -> Vec<&GroupRef> {
        self.groups.iter().collect()
    }

    fn group_refs_mut(&mut self) -> Vec<&mut GroupRef> {
        self.groups.iter_mut().collect()
    }
}

/// Values typed into the "create event" / "create training" forms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewEventForm {
    pub title: String,
    pub kind: EventKind,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub groups: Vec<GroupRef>,
    pub subgroup: Option<String>,
    pub description: String,
}

impl NewEventForm {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        check_event(&self.title, &self.date, &self.start_time, &self.end_time)
    }

    pub fn into_event(self) -> Event {
        Event {
            id: String::new(),
            title: self.title.trim().to_string(),
            kind: self.kind,
            date: self.date.trim().to_string(),
            start_time: self.start_time.trim().to_string(),
            end_time: self.end_time.trim().to_string(),
            location: self.location.trim().to_string(),
            groups: self.groups,
            subgroup: self.subgroup.filter(|s| !s.trim().is_empty()),
            description: self.description,
        }
    }
}

fn check_event(
    title: &str,
    date: &str,
    start_time: &str,
    end_time: &str,
) -> Result<(), Vec<FieldError>> {
    let mut errors = FormErrors::new();
    errors.require("title", title, "Title");
    errors.required_date("date", date, "Date");
    errors.optional_time("startTime", start_time);
    errors.optional_time("endTime", end_time);
    if let (Some(start), Some(end)) = (parse_time(start_time), parse_time(end_time)) {
        if end <= start {
            errors.push("endTime", "End time must be after start time");
        }
    }
    errors.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_upcoming() {
        let event = Event {
            date: "2025-05-10".to_string(),
            ..Default::default()
        };
        let before = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let after = NaiveDate::from_ymd_opt(2025, 5, 11).unwrap();
        assert!(event.is_upcoming(before));
        assert!(!event.is_upcoming(after));

        let undated = Event::default();
        assert!(!undated.is_upcoming(before));
    }

    #[test]
    fn test_kind_aliases() {
        assert_eq!(EventKind::from_str("Game").unwrap(), EventKind::Match);
        assert_eq!(EventKind::from_str("entrainement").unwrap(), EventKind::Training);
        assert_eq!(EventKind::from_str("meeting").unwrap(), EventKind::Meeting);
    }

    #[test]
    fn test_form_rejects_inverted_times() {
        let form = NewEventForm {
            title: "U12 training".to_string(),
            date: "2025-05-10".to_string(),
            start_time: "18:00".to_string(),
            end_time: "17:00".to_string(),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "endTime");
    }

    #[test]
    fn test_form_requires_title_and_date() {
        let errors = NewEventForm::default().validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "date"]);
    }
}
