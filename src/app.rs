//! Application State
//!
//! Central application state for tclub: the four resource pages, the
//! reference option lists they join against, calendar navigation and the
//! current input mode.

use crate::api::{ClubApi, Filters, ResourceApi, ResourceClient};
use crate::calendar::{self, agenda, CalendarEntry, CalendarState};
use crate::config::Config;
use crate::model::{Coach, Entity, Event, SelectOption, Student, Team};
use crate::page::{
    options_from, FormTarget, PageView, ResourcePage, StatusMessage, SubmitOutcome,
};
use crate::resource::{FieldDef, FieldKind};
use crate::theme::Theme;
use chrono::{Duration, Local};
use serde_json::Value;

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Calendar,
    Teams,
    Students,
    Coaches,
}

impl View {
    pub const ALL: [View; 4] = [View::Calendar, View::Teams, View::Students, View::Coaches];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Calendar => "calendar",
            Self::Teams => "teams",
            Self::Students => "students",
            Self::Coaches => "coaches",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Calendar => "Calendar",
            Self::Teams => "Teams",
            Self::Students => "Students",
            Self::Coaches => "Coaches",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "calendar" | "events" | "event" => Some(Self::Calendar),
            "teams" | "team" => Some(Self::Teams),
            "students" | "student" => Some(Self::Students),
            "coaches" | "coach" => Some(Self::Coaches),
            _ => None,
        }
    }

    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|v| v == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// Application modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,      // Table or agenda
    Command,     // : command input
    Help,        // ? help popup
    Confirm,     // Delete confirmation
    Warning,     // Warning/info dialog (OK only)
    Describe,    // JSON of the selected record
    Form,        // Create or edit form
    EventDetail, // Calendar event popup
}

/// Focus inside the create/edit form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub target: FormTarget,
    /// Index into the resource's field list
    pub field: usize,
    /// Highlighted option of a multiselect field
    pub option_cursor: usize,
    /// Text being typed into the focused text-like field
    pub input: String,
}

impl FormState {
    fn new(target: FormTarget) -> Self {
        Self {
            target,
            field: 0,
            option_cursor: 0,
            input: String::new(),
        }
    }
}

/// Option lists used by select fields and lookup columns
#[derive(Debug, Clone, Default)]
pub struct References {
    pub teams: Vec<SelectOption>,
    pub students: Vec<SelectOption>,
    pub coaches: Vec<SelectOption>,
}

impl References {
    pub fn get(&self, key: &str) -> &[SelectOption] {
        match key {
            "teams" => &self.teams,
            "students" => &self.students,
            "coaches" => &self.coaches,
            _ => &[],
        }
    }
}

/// Run `$body` with the page of the current view and its client
///
/// The calendar view works on the events page.
macro_rules! with_page {
    ($app:expr, |$page:ident, $api:ident| $body:expr) => {
        match $app.view {
            View::Teams => {
                let ($page, $api) = (&mut $app.teams, &$app.api.teams);
                $body
            },
            View::Students => {
                let ($page, $api) = (&mut $app.students, &$app.api.students);
                $body
            },
            View::Coaches => {
                let ($page, $api) = (&mut $app.coaches, &$app.api.coaches);
                $body
            },
            View::Calendar => {
                let ($page, $api) = (&mut $app.events, &$app.api.events);
                $body
            },
        }
    };
}

/// Fetch a reference collection as options; `None` keeps the previous list
async fn fetch_options<T: Entity>(client: &ResourceClient<T>) -> Option<Vec<SelectOption>> {
    match client.list_all(&Filters::new()).await {
        Ok(items) => Some(options_from(&items)),
        Err(e) => {
            tracing::warn!("Failed to load {} options: {}", client.endpoint(), e);
            None
        },
    }
}

/// Main application state
pub struct App {
    pub api: ClubApi,
    pub api_url: String,

    pub view: View,
    pub mode: Mode,

    // Pages
    pub teams: ResourcePage<Team>,
    pub students: ResourcePage<Student>,
    pub coaches: ResourcePage<Coach>,
    pub events: ResourcePage<Event>,
    pub references: References,

    // Navigation state
    pub selected: usize,
    pub calendar: CalendarState,

    // Form
    pub form: Option<FormState>,

    // Confirmation
    pub confirm_yes: bool,

    // Command input
    pub command_text: String,
    pub command_suggestions: Vec<String>,
    pub command_suggestion_selected: usize,
    pub command_preview: Option<String>,

    // UI state
    pub loading: bool,
    pub warning_message: Option<String>,
    pub describe_scroll: usize,
    pub describe_data: Option<Value>,

    pub readonly: bool,
    pub theme: Theme,
    pub config: Config,
}

impl App {
    pub fn new(api: ClubApi, view: View, config: Config, theme: Theme, readonly: bool) -> Self {
        let mut teams = ResourcePage::default();
        let mut students = ResourcePage::default();
        let mut coaches = ResourcePage::default();
        let mut events = ResourcePage::default();
        if let Some(per_page) = config.items_per_page {
            teams = teams.with_items_per_page(per_page);
            students = students.with_items_per_page(per_page);
            coaches = coaches.with_items_per_page(per_page);
            events = events.with_items_per_page(per_page);
        }

        Self {
            api_url: api.base_url().to_string(),
            api,
            view,
            mode: Mode::Normal,
            teams,
            students,
            coaches,
            events,
            references: References::default(),
            selected: 0,
            calendar: CalendarState::new(Local::now().date_naive()),
            form: None,
            confirm_yes: true,
            command_text: String::new(),
            command_suggestions: Vec::new(),
            command_suggestion_selected: 0,
            command_preview: None,
            loading: false,
            warning_message: None,
            describe_scroll: 0,
            describe_data: None,
            readonly,
            theme,
            config,
        }
    }

    // =========================================================================
    // Page Access
    // =========================================================================

    pub fn page_view(&self) -> &dyn PageView {
        match self.view {
            View::Teams => &self.teams,
            View::Students => &self.students,
            View::Coaches => &self.coaches,
            View::Calendar => &self.events,
        }
    }

    pub fn page_view_mut(&mut self) -> &mut dyn PageView {
        match self.view {
            View::Teams => &mut self.teams,
            View::Students => &mut self.students,
            View::Coaches => &mut self.coaches,
            View::Calendar => &mut self.events,
        }
    }

    /// Id of the highlighted record in the table or agenda
    pub fn selected_id(&self) -> Option<i64> {
        match self.view {
            View::Calendar => self.agenda_ids().get(self.calendar.selected).copied(),
            _ => self.page_view().visible_ids().get(self.selected).copied(),
        }
    }

    /// Number of selectable rows on screen
    fn row_count(&self) -> usize {
        match self.view {
            View::Calendar => self.agenda_ids().len(),
            _ => self.page_view().visible_ids().len(),
        }
    }

    fn clamp_selection(&mut self) {
        let last = self.row_count().saturating_sub(1);
        match self.view {
            View::Calendar => self.calendar.selected = self.calendar.selected.min(last),
            _ => self.selected = self.selected.min(last),
        }
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Fetch the current view's collection together with its reference lists
    pub async fn mount_view(&mut self) {
        self.loading = true;
        self.selected = 0;
        self.calendar.selected = 0;

        match self.view {
            View::Teams => {
                let (_, students, coaches) = tokio::join!(
                    self.teams.mount(&self.api.teams),
                    fetch_options(&self.api.students),
                    fetch_options(&self.api.coaches),
                );
                self.store_references(None, students, coaches);
            },
            View::Students => {
                let (_, teams) = tokio::join!(
                    self.students.mount(&self.api.students),
                    fetch_options(&self.api.teams),
                );
                self.store_references(teams, None, None);
            },
            View::Coaches => {
                self.coaches.mount(&self.api.coaches).await;
            },
            View::Calendar => {
                let (_, teams, coaches) = tokio::join!(
                    self.events.mount(&self.api.events),
                    fetch_options(&self.api.teams),
                    fetch_options(&self.api.coaches),
                );
                self.store_references(teams, None, coaches);
            },
        }

        self.sync_references();
        self.loading = false;
    }

    fn store_references(
        &mut self,
        teams: Option<Vec<SelectOption>>,
        students: Option<Vec<SelectOption>>,
        coaches: Option<Vec<SelectOption>>,
    ) {
        if let Some(teams) = teams {
            self.references.teams = teams;
        }
        if let Some(students) = students {
            self.references.students = students;
        }
        if let Some(coaches) = coaches {
            self.references.coaches = coaches;
        }
    }

    /// The current page's own collection is the freshest option list for its kind
    fn sync_references(&mut self) {
        match self.view {
            View::Teams => self.references.teams = options_from(self.teams.items()),
            View::Students => self.references.students = options_from(self.students.items()),
            View::Coaches => self.references.coaches = options_from(self.coaches.items()),
            View::Calendar => {},
        }
    }

    pub async fn switch_view(&mut self, view: View) {
        self.view = view;
        self.mode = Mode::Normal;
        self.form = None;
        if let Err(e) = self.config.set_last_view(view.key()) {
            tracing::warn!("Failed to save last view: {}", e);
        }
        self.mount_view().await;
    }

    pub async fn refresh(&mut self) {
        self.mount_view().await;
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn next(&mut self) {
        let count = self.row_count();
        if count == 0 {
            return;
        }
        match self.view {
            View::Calendar => {
                self.calendar.selected = (self.calendar.selected + 1).min(count - 1);
            },
            _ => self.selected = (self.selected + 1).min(count - 1),
        }
    }

    pub fn previous(&mut self) {
        match self.view {
            View::Calendar => self.calendar.selected = self.calendar.selected.saturating_sub(1),
            _ => self.selected = self.selected.saturating_sub(1),
        }
    }

    pub fn go_to_top(&mut self) {
        match self.view {
            View::Calendar => self.calendar.selected = 0,
            _ => self.selected = 0,
        }
    }

    pub fn go_to_bottom(&mut self) {
        let last = self.row_count().saturating_sub(1);
        match self.view {
            View::Calendar => self.calendar.selected = last,
            _ => self.selected = last,
        }
    }

    pub fn next_page(&mut self) {
        if self.page_view_mut().next_page() {
            self.selected = 0;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page_view_mut().prev_page() {
            self.selected = 0;
        }
    }

    // =========================================================================
    // Calendar
    // =========================================================================

    /// Events with their team and coach names resolved
    pub fn calendar_entries(&self) -> Vec<CalendarEntry> {
        self.events
            .items()
            .iter()
            .filter_map(|e| {
                CalendarEntry::from_event(e, &self.references.teams, &self.references.coaches)
            })
            .collect()
    }

    /// Entry ids in agenda order for the visible range
    pub fn agenda_ids(&self) -> Vec<i64> {
        let entries = self.calendar_entries();
        let (from, to) = self.calendar.range();
        agenda(&entries, from, to)
            .into_iter()
            .flat_map(|(_, list)| list.into_iter().map(|e| e.id).collect::<Vec<_>>())
            .collect()
    }

    pub fn selected_entry(&self) -> Option<CalendarEntry> {
        let id = self.selected_id()?;
        self.calendar_entries().into_iter().find(|e| e.id == id)
    }

    pub fn enter_event_detail(&mut self) {
        if self.selected_entry().is_some() {
            self.mode = Mode::EventDetail;
        }
    }

    /// Open the create form with a default slot for the current calendar view
    pub fn new_event(&mut self) {
        if self.guard_readonly() {
            return;
        }
        let (start, end) = self.calendar.new_slot(Local::now().naive_local());
        self.events.prefill_create(calendar::new_event_draft(start, end));
        self.open_form(FormTarget::Create);
    }

    /// Move the selected event, keeping its length
    pub async fn move_selected_event(&mut self, delta: Duration) {
        if self.guard_readonly() {
            return;
        }
        let Some(id) = self.selected_id() else {
            return;
        };
        let Some((start, end)) = self.events.get(id).and_then(|e| calendar::moved_by(e, delta))
        else {
            return;
        };
        self.loading = true;
        calendar::reschedule(&mut self.events, &self.api.events, id, start, end).await;
        self.loading = false;

        // Keep the moved event highlighted when it stays in range
        if let Some(pos) = self.agenda_ids().iter().position(|i| *i == id) {
            self.calendar.selected = pos;
        }
        self.clamp_selection();
    }

    pub fn calendar_next(&mut self) {
        self.calendar.next();
    }

    pub fn calendar_prev(&mut self) {
        self.calendar.prev();
    }

    // =========================================================================
    // Forms
    // =========================================================================

    fn guard_readonly(&mut self) -> bool {
        if self.readonly {
            self.show_warning("Read-only mode: changes are disabled");
        }
        self.readonly
    }

    pub fn enter_create_mode(&mut self) {
        if self.view == View::Calendar {
            self.new_event();
            return;
        }
        if self.guard_readonly() {
            return;
        }
        self.open_form(FormTarget::Create);
    }

    pub fn enter_edit_mode(&mut self) {
        if self.guard_readonly() {
            return;
        }
        let Some(id) = self.selected_id() else {
            return;
        };
        if self.page_view_mut().begin_edit(id) {
            self.open_form(FormTarget::Edit);
        }
    }

    fn open_form(&mut self, target: FormTarget) {
        self.form = Some(FormState::new(target));
        self.mode = Mode::Form;
        self.load_field_input();
    }

    pub fn form_fields(&self) -> &'static [FieldDef] {
        &self.page_view().def().fields
    }

    pub fn current_field(&self) -> Option<&'static FieldDef> {
        let form = self.form.as_ref()?;
        self.form_fields().get(form.field)
    }

    /// Copy the focused field's draft value into the text buffer
    fn load_field_input(&mut self) {
        let Some(field) = self.current_field() else {
            return;
        };
        let Some(target) = self.form.as_ref().map(|f| f.target) else {
            return;
        };
        let input = match self.page_view().draft(target).get(&field.key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        if let Some(form) = self.form.as_mut() {
            form.input = input;
            form.option_cursor = 0;
        }
    }

    pub fn next_field(&mut self) {
        let count = self.form_fields().len();
        if let Some(form) = self.form.as_mut() {
            if count > 0 {
                form.field = (form.field + 1) % count;
            }
        }
        self.load_field_input();
    }

    pub fn prev_field(&mut self) {
        let count = self.form_fields().len();
        if let Some(form) = self.form.as_mut() {
            if count > 0 {
                form.field = (form.field + count - 1) % count;
            }
        }
        self.load_field_input();
    }

    /// Type one character into the focused text-like field
    pub fn form_input_char(&mut self, c: char) {
        let Some(field) = self.current_field() else {
            return;
        };
        if field.kind.is_option() {
            if c == ' ' && field.kind == FieldKind::MultiSelect {
                self.toggle_option();
            }
            return;
        }
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let target = form.target;
        form.input.push(c);
        let value = Value::String(form.input.clone());
        if !self.page_view_mut().set_field(target, &field.key, value) {
            if let Some(form) = self.form.as_mut() {
                form.input.pop();
            }
        }
    }

    pub fn form_backspace(&mut self) {
        let Some(field) = self.current_field() else {
            return;
        };
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let target = form.target;
        if field.kind.is_option() {
            self.page_view_mut().set_field(target, &field.key, Value::Null);
            return;
        }
        form.input.pop();
        let value = Value::String(form.input.clone());
        self.page_view_mut().set_field(target, &field.key, value);
    }

    /// Options offered by a select or multiselect field
    pub fn field_options(&self, field: &FieldDef) -> &[SelectOption] {
        field
            .options_from
            .as_deref()
            .map(|key| self.references.get(key))
            .unwrap_or(&[])
    }

    /// Left/Right on an option field: step the selection or the cursor
    pub fn cycle_option(&mut self, forward: bool) {
        let Some(field) = self.current_field() else {
            return;
        };
        let Some(target) = self.form.as_ref().map(|f| f.target) else {
            return;
        };
        let draft = self.page_view().draft(target);

        let value = match field.kind {
            FieldKind::Select => {
                let options = self.field_options(field);
                if options.is_empty() {
                    return;
                }
                let current = draft
                    .id(&field.key)
                    .and_then(|id| options.iter().position(|o| o.id == id));
                let idx = step(current, options.len(), forward);
                Value::from(options[idx].id)
            },
            FieldKind::Choice => {
                if field.choices.is_empty() {
                    return;
                }
                let current = draft
                    .str(&field.key)
                    .and_then(|s| field.choices.iter().position(|c| c == s));
                let idx = step(current, field.choices.len(), forward);
                Value::String(field.choices[idx].clone())
            },
            FieldKind::MultiSelect => {
                let len = self.field_options(field).len();
                if let Some(form) = self.form.as_mut() {
                    if len > 0 {
                        form.option_cursor = step(Some(form.option_cursor), len, forward);
                    }
                }
                return;
            },
            _ => return,
        };
        self.page_view_mut().set_field(target, &field.key, value);
    }

    /// Space on a multiselect field: add or remove the highlighted option
    pub fn toggle_option(&mut self) {
        let Some(field) = self.current_field() else {
            return;
        };
        if field.kind != FieldKind::MultiSelect {
            return;
        }
        let Some(form) = self.form.as_ref() else {
            return;
        };
        let target = form.target;
        let Some(option) = self.field_options(field).get(form.option_cursor) else {
            return;
        };
        let option_id = option.id;

        let mut ids = self.page_view().draft(target).ids(&field.key);
        match ids.iter().position(|id| *id == option_id) {
            Some(pos) => {
                ids.remove(pos);
            },
            None => ids.push(option_id),
        }
        self.page_view_mut()
            .set_field(target, &field.key, Value::from(ids));
    }

    /// Submit the open form; the form stays open when the submit fails
    pub async fn submit_form(&mut self) -> SubmitOutcome {
        let Some(target) = self.form.as_ref().map(|f| f.target) else {
            return SubmitOutcome::NoTarget;
        };

        self.loading = true;
        let outcome = match target {
            FormTarget::Create => with_page!(self, |page, api| page.submit_create(api).await),
            FormTarget::Edit => with_page!(self, |page, api| page.submit_update(api).await),
        };
        self.loading = false;

        if outcome.is_success() {
            self.form = None;
            self.mode = Mode::Normal;
            self.sync_references();
            self.clamp_selection();
        }
        outcome
    }

    /// Esc in the form: an edit is abandoned, a create draft is kept
    pub fn cancel_form(&mut self) {
        if let Some(form) = self.form.take() {
            if form.target == FormTarget::Edit {
                self.page_view_mut().cancel_edit();
            }
        }
        self.mode = Mode::Normal;
    }

    // =========================================================================
    // Deleting
    // =========================================================================

    pub fn enter_confirm_mode(&mut self) {
        if self.guard_readonly() {
            return;
        }
        let Some(id) = self.selected_id() else {
            return;
        };
        if self.page_view_mut().request_delete(id) {
            self.confirm_yes = true;
            self.mode = Mode::Confirm;
        }
    }

    pub async fn confirm_delete(&mut self) -> SubmitOutcome {
        self.loading = true;
        let outcome = with_page!(self, |page, api| page.confirm_delete(api).await);
        self.loading = false;

        if outcome.is_success() {
            self.sync_references();
        }
        self.clamp_selection();
        self.mode = Mode::Normal;
        outcome
    }

    pub fn cancel_delete(&mut self) {
        self.page_view_mut().cancel_delete();
        self.mode = Mode::Normal;
    }

    // =========================================================================
    // Mode Transitions
    // =========================================================================

    pub fn get_available_commands(&self) -> Vec<String> {
        let mut commands: Vec<String> = View::ALL.iter().map(|v| v.key().to_string()).collect();
        commands.push("events".to_string());
        commands.push("refresh".to_string());
        commands.push("help".to_string());
        commands.push("quit".to_string());
        commands.sort();
        commands
    }

    pub fn enter_command_mode(&mut self) {
        self.mode = Mode::Command;
        self.command_text.clear();
        self.command_suggestions = self.get_available_commands();
        self.command_suggestion_selected = 0;
        self.command_preview = None;
    }

    pub fn update_command_suggestions(&mut self) {
        let input = self.command_text.to_lowercase();
        self.command_suggestions = self
            .get_available_commands()
            .into_iter()
            .filter(|cmd| cmd.starts_with(&input))
            .collect();

        if self.command_suggestion_selected >= self.command_suggestions.len() {
            self.command_suggestion_selected = 0;
        }
        self.update_preview();
    }

    fn update_preview(&mut self) {
        self.command_preview = if self.command_text.is_empty() {
            None
        } else {
            self.command_suggestions
                .get(self.command_suggestion_selected)
                .cloned()
        };
    }

    pub fn next_suggestion(&mut self) {
        if !self.command_suggestions.is_empty() {
            self.command_suggestion_selected =
                (self.command_suggestion_selected + 1) % self.command_suggestions.len();
            self.command_preview = self
                .command_suggestions
                .get(self.command_suggestion_selected)
                .cloned();
        }
    }

    pub fn prev_suggestion(&mut self) {
        if !self.command_suggestions.is_empty() {
            if self.command_suggestion_selected == 0 {
                self.command_suggestion_selected = self.command_suggestions.len() - 1;
            } else {
                self.command_suggestion_selected -= 1;
            }
            self.command_preview = self
                .command_suggestions
                .get(self.command_suggestion_selected)
                .cloned();
        }
    }

    pub fn apply_suggestion(&mut self) {
        if let Some(preview) = &self.command_preview {
            self.command_text = preview.clone();
            self.update_command_suggestions();
        }
    }

    pub fn enter_help_mode(&mut self) {
        self.mode = Mode::Help;
    }

    pub fn enter_describe_mode(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        self.describe_data = self.page_view().row_by_id(id);
        if self.describe_data.is_some() {
            self.describe_scroll = 0;
            self.mode = Mode::Describe;
        }
    }

    pub fn describe_json(&self) -> Option<String> {
        self.describe_data
            .as_ref()
            .map(|data| serde_json::to_string_pretty(data).unwrap_or_default())
    }

    pub fn describe_line_count(&self) -> usize {
        self.describe_json().map(|s| s.lines().count()).unwrap_or(0)
    }

    pub fn describe_scroll_to_bottom(&mut self, visible_lines: usize) {
        self.describe_scroll = self.describe_line_count().saturating_sub(visible_lines);
    }

    pub fn show_warning(&mut self, message: &str) {
        self.warning_message = Some(message.to_string());
        self.mode = Mode::Warning;
    }

    pub fn exit_mode(&mut self) {
        self.mode = Mode::Normal;
        self.describe_data = None;
    }

    // =========================================================================
    // Command Execution
    // =========================================================================

    /// Run the typed command; returns true when the app should quit
    pub async fn execute_command(&mut self) -> bool {
        let command_text = match &self.command_preview {
            Some(preview) if !self.command_text.is_empty() => preview.clone(),
            _ => self.command_text.trim().to_string(),
        };

        let Some(cmd) = command_text.split_whitespace().next() else {
            return false;
        };

        match cmd {
            "q" | "quit" => return true,
            "refresh" => {
                self.exit_mode();
                self.refresh().await;
            },
            "help" => {
                self.enter_help_mode();
            },
            other => match View::from_key(other) {
                Some(view) => self.switch_view(view).await,
                None => {
                    let message = StatusMessage::failure(format!("Unknown command: {}", other));
                    self.page_view_mut().set_message(message);
                    self.exit_mode();
                },
            },
        }

        false
    }
}

/// Next index in a cyclic list of `len` entries
fn step(current: Option<usize>, len: usize, forward: bool) -> usize {
    match (current, forward) {
        (None, true) => 0,
        (None, false) => len - 1,
        (Some(i), true) => (i + 1) % len,
        (Some(i), false) => (i + len - 1) % len,
    }
}
