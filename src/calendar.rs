//! Event calendar
//!
//! Agenda-style calendar over the events collection: month, week and day
//! ranges, default time slots for new events and rescheduling of existing
//! ones. Times are shown in local time and sent to the API as UTC.

use crate::api::{format_api_error, ResourceApi};
use crate::model::{Draft, Entity, Event, EventType, MemberRef, SelectOption};
use crate::page::{resolve_labels, ResourcePage, StatusMessage, SubmitOutcome};
use crate::resource::get_color_for_value;
use chrono::{
    DateTime, Datelike, Duration, Local, LocalResult, Months, NaiveDate, NaiveDateTime,
    NaiveTime, SecondsFormat, TimeZone, Timelike, Utc,
};

/// Fallback when the color map has no entry for a type
const DEFAULT_EVENT_COLOR: [u8; 3] = [108, 99, 255];

/// Length of a new event, in minutes
const DEFAULT_EVENT_MINUTES: i64 = 60;

/// Hour a new event starts at when picked from the month grid
const DEFAULT_START_HOUR: u32 = 9;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CalendarView {
    #[default]
    Month,
    Week,
    Day,
}

impl CalendarView {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Month => "Month",
            Self::Week => "Week",
            Self::Day => "Day",
        }
    }

    pub fn cycle(&self) -> Self {
        match self {
            Self::Month => Self::Week,
            Self::Week => Self::Day,
            Self::Day => Self::Month,
        }
    }
}

/// An event prepared for display
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEntry {
    pub id: i64,
    pub title: String,
    pub event_type: EventType,
    pub location: String,
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
    pub color: [u8; 3],
    pub teams: Vec<String>,
    pub coach: Option<String>,
}

impl CalendarEntry {
    /// Build an entry, naming teams and coach from the reference options
    /// when the event only carries their ids
    ///
    /// Events whose dates cannot be parsed are skipped.
    pub fn from_event(
        event: &Event,
        teams: &[SelectOption],
        coaches: &[SelectOption],
    ) -> Option<Self> {
        let start = event.start()?.with_timezone(&Local);
        let end = event
            .end()
            .map(|e| e.with_timezone(&Local))
            .unwrap_or(start + Duration::minutes(DEFAULT_EVENT_MINUTES));

        let team_names = event
            .teams
            .iter()
            .map(|t| name_of(t, teams))
            .collect::<Vec<_>>();
        let coach = match &event.coach {
            Some(c) => Some(name_of(c, coaches)),
            None => event
                .coach_id
                .map(|id| resolve_labels(&[id], coaches).remove(0)),
        };

        Some(Self {
            id: event.id,
            title: event.name.clone(),
            event_type: event.event_type,
            location: event.location.clone(),
            start,
            end,
            color: get_color_for_value("event_type", event.event_type.as_str())
                .unwrap_or(DEFAULT_EVENT_COLOR),
            teams: team_names,
            coach,
        })
    }

    /// "U12 Reds, U12 Blues" or "N/A"
    pub fn teams_label(&self) -> String {
        if self.teams.is_empty() {
            "N/A".to_string()
        } else {
            self.teams.join(", ")
        }
    }

    pub fn coach_label(&self) -> &str {
        self.coach.as_deref().unwrap_or("N/A")
    }

    pub fn overlaps(&self, from: NaiveDate, to: NaiveDate) -> bool {
        let start = self.start.date_naive();
        let end = self.end.date_naive();
        start < to && end >= from
    }
}

fn name_of(member: &MemberRef, options: &[SelectOption]) -> String {
    match member.name() {
        Some(name) => name.to_string(),
        None => resolve_labels(&[member.id()], options).remove(0),
    }
}

/// `dd/mm/yyyy HH:MM`
pub fn format_date_time(ts: &DateTime<Local>) -> String {
    ts.format("%d/%m/%Y %H:%M").to_string()
}

// =========================================================================
// Slots
// =========================================================================

/// Round up to the next quarter hour, dropping seconds
pub fn round_up_to_quarter(ts: NaiveDateTime) -> NaiveDateTime {
    let hour_start = ts.date().and_hms_opt(ts.hour(), 0, 0).unwrap_or(ts);
    let quarters = (ts.minute() as i64 + 14) / 15;
    hour_start + Duration::minutes(quarters * 15)
}

/// Start and end of a new event picked at `clicked`
///
/// Month cells and midnight picks carry no time of day, so they start at
/// 09:00. The start is rounded up to the next quarter hour and the event
/// lasts one hour.
pub fn default_slot(clicked: NaiveDateTime, view: CalendarView) -> (NaiveDateTime, NaiveDateTime) {
    let at_midnight = clicked.hour() == 0 && clicked.minute() == 0;
    let picked = if view == CalendarView::Month || at_midnight {
        clicked
            .date()
            .and_time(NaiveTime::from_hms_opt(DEFAULT_START_HOUR, 0, 0).unwrap_or_default())
    } else {
        clicked
    };
    let start = round_up_to_quarter(picked);
    (start, start + Duration::minutes(DEFAULT_EVENT_MINUTES))
}

/// Local wall-clock time as an RFC 3339 UTC timestamp with milliseconds
pub fn to_iso(local: NaiveDateTime) -> String {
    let utc = match Local.from_local_datetime(&local) {
        LocalResult::Single(ts) => ts.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        // Skipped by a DST jump
        LocalResult::None => Utc.from_utc_datetime(&local),
    };
    utc.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Create draft for a new training at the given slot
pub fn new_event_draft(start: NaiveDateTime, end: NaiveDateTime) -> Draft {
    Draft::new()
        .with("type", EventType::Training.as_str())
        .with("startDate", to_iso(start))
        .with("endDate", to_iso(end))
        .with("teamIds", Vec::<i64>::new())
}

// =========================================================================
// Ranges
// =========================================================================

/// Half-open day range `[from, to)` shown by a view around `anchor`
pub fn visible_range(view: CalendarView, anchor: NaiveDate) -> (NaiveDate, NaiveDate) {
    match view {
        CalendarView::Month => {
            let first = anchor.with_day(1).unwrap_or(anchor);
            let next = first.checked_add_months(Months::new(1)).unwrap_or(first);
            (first, next)
        },
        CalendarView::Week => {
            let monday =
                anchor - Duration::days(anchor.weekday().num_days_from_monday() as i64);
            (monday, monday + Duration::days(7))
        },
        CalendarView::Day => (anchor, anchor + Duration::days(1)),
    }
}

/// Anchor moved one view-length forward or back
pub fn shift(view: CalendarView, anchor: NaiveDate, forward: bool) -> NaiveDate {
    let moved = match (view, forward) {
        (CalendarView::Month, true) => anchor.checked_add_months(Months::new(1)),
        (CalendarView::Month, false) => anchor.checked_sub_months(Months::new(1)),
        (CalendarView::Week, true) => anchor.checked_add_signed(Duration::days(7)),
        (CalendarView::Week, false) => anchor.checked_sub_signed(Duration::days(7)),
        (CalendarView::Day, true) => anchor.succ_opt(),
        (CalendarView::Day, false) => anchor.pred_opt(),
    };
    moved.unwrap_or(anchor)
}

/// Entries in range grouped by local start day, each day sorted by start
pub fn agenda(
    entries: &[CalendarEntry],
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<(NaiveDate, Vec<&CalendarEntry>)> {
    let mut visible: Vec<&CalendarEntry> =
        entries.iter().filter(|e| e.overlaps(from, to)).collect();
    visible.sort_by_key(|e| (e.start, e.id));

    let mut days: Vec<(NaiveDate, Vec<&CalendarEntry>)> = Vec::new();
    for entry in visible {
        let day = entry.start.date_naive().max(from);
        match days.last_mut() {
            Some((d, list)) if *d == day => list.push(entry),
            _ => days.push((day, vec![entry])),
        }
    }
    days
}

/// Navigation state of the calendar screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarState {
    pub view: CalendarView,
    pub anchor: NaiveDate,
    /// Index into the flattened agenda of the current range
    pub selected: usize,
}

impl CalendarState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            view: CalendarView::Month,
            anchor: today,
            selected: 0,
        }
    }

    pub fn range(&self) -> (NaiveDate, NaiveDate) {
        visible_range(self.view, self.anchor)
    }

    pub fn next(&mut self) {
        self.anchor = shift(self.view, self.anchor, true);
        self.selected = 0;
    }

    pub fn prev(&mut self) {
        self.anchor = shift(self.view, self.anchor, false);
        self.selected = 0;
    }

    pub fn today(&mut self) {
        self.anchor = Local::now().date_naive();
        self.selected = 0;
    }

    pub fn cycle_view(&mut self) {
        self.view = self.view.cycle();
        self.selected = 0;
    }

    /// "October 2026", "Week of 12/10/2026", "Sat 17/10/2026"
    pub fn title(&self) -> String {
        let (from, _) = self.range();
        match self.view {
            CalendarView::Month => from.format("%B %Y").to_string(),
            CalendarView::Week => format!("Week of {}", from.format("%d/%m/%Y")),
            CalendarView::Day => from.format("%a %d/%m/%Y").to_string(),
        }
    }

    /// Slot for a new event created from the current view
    pub fn new_slot(&self, now: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
        let clicked = match self.view {
            CalendarView::Month => self.anchor.and_time(NaiveTime::MIN),
            CalendarView::Week | CalendarView::Day => self.anchor.and_time(now.time()),
        };
        default_slot(clicked, self.view)
    }
}

// =========================================================================
// Rescheduling
// =========================================================================

/// New start and end for an event moved by `delta`, keeping its length
pub fn moved_by(event: &Event, delta: Duration) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = event.start()?;
    let end = event.end().unwrap_or(start + Duration::minutes(DEFAULT_EVENT_MINUTES));
    Some((start + delta, end + delta))
}

/// Move an event, sending only its new start and end
///
/// On failure the collection keeps the event at its previous time.
pub async fn reschedule<A>(
    page: &mut ResourcePage<Event>,
    api: &A,
    id: i64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> SubmitOutcome
where
    A: ResourceApi<Event> + ?Sized,
{
    if page.get(id).is_none() {
        return SubmitOutcome::NoTarget;
    }
    if end <= start {
        let reason = "End time must be after the start time.".to_string();
        page.set_message(StatusMessage::failure(reason.clone()));
        return SubmitOutcome::Invalid(reason);
    }

    let patch = Draft::new()
        .with("startDate", start.to_rfc3339_opts(SecondsFormat::Millis, true))
        .with("endDate", end.to_rfc3339_opts(SecondsFormat::Millis, true));

    match api.update(id, &patch).await {
        Ok(updated) => {
            page.set_message(StatusMessage::success(format!(
                "Event \"{}\" moved to {}.",
                updated.label(),
                format_date_time(&start.with_timezone(&Local))
            )));
            page.reconcile_updated(updated);
            SubmitOutcome::Saved(id)
        },
        Err(e) => {
            tracing::error!("Failed to reschedule event {}: {}", id, e);
            let text = format!("Failed to move event. {}", format_api_error(&e));
            page.set_message(StatusMessage::failure(text.clone()));
            SubmitOutcome::Failed(text)
        },
    }
}
