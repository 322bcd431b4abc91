//! Page lifecycle driven by an in-memory API double

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use reqwest::StatusCode;
use serde_json::json;
use std::sync::Mutex;
use tclub::api::{ApiError, ApiResult, Filters, PageSlice, RemoveResult, ResourceApi};
use tclub::calendar::{moved_by, reschedule};
use tclub::model::{Draft, Entity, Event, Team};
use tclub::page::{FormTarget, LoadState, MessageKind, ResourcePage, SubmitOutcome};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    List,
    Create(Draft),
    Update(i64, Draft),
    Remove(i64),
}

/// Records every call and answers from a fixed collection
struct MockApi<T> {
    items: Vec<T>,
    next_id: i64,
    fail: bool,
    refuse_delete: bool,
    calls: Mutex<Vec<Call>>,
}

impl<T: Entity> MockApi<T> {
    fn new(items: Vec<T>) -> Self {
        Self {
            items,
            next_id: 101,
            fail: false,
            refuse_delete: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Answer deletes with `{"success": false}`
    fn refusing_delete(mut self) -> Self {
        self.refuse_delete = true;
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> ApiResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            return Err(ApiError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "boom".to_string(),
            });
        }
        Ok(())
    }

    /// Build the server's answer from a draft merged over an optional record
    fn echo(&self, id: i64, base: Option<&T>, draft: &Draft) -> ApiResult<T> {
        let mut value = base
            .map(|e| serde_json::to_value(e).unwrap())
            .unwrap_or_else(|| json!({}));
        for (key, v) in draft.as_map() {
            value[key] = v.clone();
        }
        value["id"] = json!(id);
        Ok(serde_json::from_value(value)?)
    }
}

#[async_trait]
impl<T: Entity> ResourceApi<T> for MockApi<T> {
    async fn list_all(&self, _filters: &Filters) -> ApiResult<Vec<T>> {
        self.record(Call::List)?;
        Ok(self.items.clone())
    }

    async fn list_paginated(
        &self,
        _page: u32,
        _page_size: u32,
        _filters: &Filters,
    ) -> ApiResult<PageSlice<T>> {
        self.record(Call::List)?;
        Ok(PageSlice {
            items: self.items.clone(),
            total: self.items.len() as u64,
        })
    }

    async fn get_one(&self, id: i64) -> ApiResult<T> {
        self.items
            .iter()
            .find(|e| e.id() == id)
            .cloned()
            .ok_or(ApiError::NotFound {
                path: format!("/{}", id),
            })
    }

    async fn create(&self, draft: &Draft) -> ApiResult<T> {
        self.record(Call::Create(draft.clone()))?;
        self.echo(self.next_id, None, draft)
    }

    async fn update(&self, id: i64, draft: &Draft) -> ApiResult<T> {
        self.record(Call::Update(id, draft.clone()))?;
        let base = self.items.iter().find(|e| e.id() == id);
        self.echo(id, base, draft)
    }

    async fn remove(&self, id: i64) -> ApiResult<RemoveResult> {
        self.record(Call::Remove(id))?;
        Ok(RemoveResult {
            success: !self.refuse_delete,
        })
    }
}

fn team(id: i64, name: &str) -> Team {
    serde_json::from_value(json!({"id": id, "name": name, "students": []})).unwrap()
}

fn squad() -> Vec<Team> {
    vec![team(5, "U9 Blues"), team(9, "U10 Whites"), team(12, "U11 Greens")]
}

async fn mounted(api: &MockApi<Team>) -> ResourcePage<Team> {
    let mut page = ResourcePage::default();
    assert!(page.mount(api).await);
    page
}

mod teams {
    use super::*;

    #[tokio::test]
    async fn test_create_appends_and_clears_draft() {
        let api = MockApi::new(squad());
        let mut page = mounted(&api).await;

        assert!(page.set_field(FormTarget::Create, "name", json!("U12 Reds")));
        let outcome = page.submit_create(&api).await;

        assert_eq!(outcome, SubmitOutcome::Saved(101));
        assert_eq!(page.items().len(), 4);
        assert_eq!(page.items().last().map(|t| t.name.as_str()), Some("U12 Reds"));
        assert!(page.draft(FormTarget::Create).is_empty());
        let message = page.message().unwrap();
        assert_eq!(message.kind, MessageKind::Success);
        assert_eq!(message.text, "Team \"U12 Reds\" created.");
    }

    #[tokio::test]
    async fn test_create_sends_member_ids() {
        let api = MockApi::new(squad());
        let mut page = mounted(&api).await;

        assert!(page.set_field(FormTarget::Create, "name", json!("U12 Reds")));
        assert!(page.set_field(FormTarget::Create, "studentIds", json!(["3", "7"])));
        let outcome = page.submit_create(&api).await;

        assert_eq!(outcome, SubmitOutcome::Saved(101));
        let sent = Draft::new()
            .with("name", "U12 Reds")
            .with("studentIds", json!([3, 7]));
        assert_eq!(api.calls(), vec![Call::List, Call::Create(sent)]);

        let created = page.get(101).unwrap();
        assert_eq!(created.name, "U12 Reds");
        assert_eq!(created.student_ids(), vec![3, 7]);
        assert!(page.draft(FormTarget::Create).is_empty());
    }

    #[tokio::test]
    async fn test_validation_failure_makes_no_call() {
        let api = MockApi::new(squad());
        let mut page = mounted(&api).await;

        let outcome = page.submit_create(&api).await;

        assert_eq!(outcome, SubmitOutcome::Invalid("Team Name is required.".into()));
        assert_eq!(api.calls(), vec![Call::List]);
        assert_eq!(page.items().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_waits_for_confirmation() {
        let api = MockApi::new(squad());
        let mut page = mounted(&api).await;

        assert!(page.request_delete(5));
        assert_eq!(page.pending_delete(), Some(5));
        assert_eq!(api.calls(), vec![Call::List]);

        let outcome = page.confirm_delete(&api).await;

        assert_eq!(outcome, SubmitOutcome::Removed(5));
        assert_eq!(api.calls(), vec![Call::List, Call::Remove(5)]);
        assert!(page.get(5).is_none());
        assert_eq!(page.items().len(), 2);
        assert_eq!(page.pending_delete(), None);
    }

    #[tokio::test]
    async fn test_refused_delete_keeps_collection() {
        let api = MockApi::new(squad()).refusing_delete();
        let mut page = mounted(&api).await;

        assert!(page.request_delete(9));
        let outcome = page.confirm_delete(&api).await;

        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        assert_eq!(api.calls(), vec![Call::List, Call::Remove(9)]);
        assert_eq!(page.items(), squad().as_slice());
        assert_eq!(page.pending_delete(), None);
        let message = page.message().unwrap();
        assert!(message.is_failure());
        assert_eq!(message.text, "Failed to delete team.");
    }

    #[tokio::test]
    async fn test_cancelled_delete_sends_nothing() {
        let api = MockApi::new(squad());
        let mut page = mounted(&api).await;

        assert!(page.request_delete(9));
        page.cancel_delete();

        assert_eq!(page.confirm_delete(&api).await, SubmitOutcome::NoTarget);
        assert_eq!(api.calls(), vec![Call::List]);
        assert_eq!(page.items().len(), 3);
    }

    #[tokio::test]
    async fn test_update_replaces_in_place() {
        let api = MockApi::new(squad());
        let mut page = mounted(&api).await;

        assert!(page.begin_edit(9));
        assert!(page.set_field(FormTarget::Edit, "name", json!("U10 Golds")));
        let outcome = page.submit_update(&api).await;

        assert_eq!(outcome, SubmitOutcome::Saved(9));
        let names: Vec<&str> = page.items().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["U9 Blues", "U10 Golds", "U11 Greens"]);
        assert_eq!(page.editing(), None);
    }

    #[tokio::test]
    async fn test_failed_update_keeps_state() {
        let api = MockApi::new(squad());
        let mut page = mounted(&api).await;
        let failing = MockApi::new(squad()).failing();

        assert!(page.begin_edit(9));
        assert!(page.set_field(FormTarget::Edit, "name", json!("U10 Golds")));
        let outcome = page.submit_update(&failing).await;

        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        assert_eq!(page.items(), squad().as_slice());
        assert_eq!(page.editing(), Some(9));
        assert_eq!(page.draft(FormTarget::Edit).str("name"), Some("U10 Golds"));
        assert!(page.message().unwrap().is_failure());
    }

    #[tokio::test]
    async fn test_failed_mount_is_ready_and_empty() {
        let api = MockApi::new(squad()).failing();
        let mut page: ResourcePage<Team> = ResourcePage::default();

        assert!(!page.mount(&api).await);

        assert_eq!(page.load_state(), LoadState::Ready);
        assert!(page.items().is_empty());
        let message = page.message().unwrap();
        assert!(message.text.starts_with("Failed to load teams."));
    }

    #[tokio::test]
    async fn test_delete_on_last_page_clamps() {
        let api = MockApi::new(squad());
        let mut page: ResourcePage<Team> = ResourcePage::default().with_items_per_page(2);
        page.mount(&api).await;

        assert!(page.next_page());
        assert_eq!(page.pager().page(), 1);

        assert!(page.request_delete(12));
        page.confirm_delete(&api).await;

        assert_eq!(page.pager().page(), 0);
        assert_eq!(page.visible_items().len(), 2);
    }
}

mod events {
    use super::*;

    fn training() -> Event {
        serde_json::from_value(json!({
            "id": 3,
            "name": "Training",
            "type": "training",
            "location": "North pitch",
            "startDate": "2026-10-05T17:00:00.000Z",
            "endDate": "2026-10-05T18:30:00.000Z",
            "teams": [{"id": 5, "name": "U9 Blues"}],
            "coachId": 6
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_reschedule_sends_only_times() {
        let api = MockApi::new(vec![training()]);
        let mut page: ResourcePage<Event> = ResourcePage::default();
        page.mount(&api).await;

        let (start, end) = moved_by(&training(), Duration::days(1)).unwrap();
        let outcome = reschedule(&mut page, &api, 3, start, end).await;

        assert_eq!(outcome, SubmitOutcome::Saved(3));
        let expected = Draft::new()
            .with("startDate", "2026-10-06T17:00:00.000Z")
            .with("endDate", "2026-10-06T18:30:00.000Z");
        assert_eq!(api.calls(), vec![Call::List, Call::Update(3, expected)]);
        assert_eq!(
            page.get(3).and_then(Event::start),
            Some(Utc.with_ymd_and_hms(2026, 10, 6, 17, 0, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn test_failed_reschedule_keeps_event() {
        let api = MockApi::new(vec![training()]);
        let mut page: ResourcePage<Event> = ResourcePage::default();
        page.mount(&api).await;
        let failing = MockApi::new(vec![training()]).failing();

        let (start, end) = moved_by(&training(), Duration::hours(2)).unwrap();
        let outcome = reschedule(&mut page, &failing, 3, start, end).await;

        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        assert_eq!(page.items(), &[training()]);
    }

    #[tokio::test]
    async fn test_create_needs_a_team() {
        let api = MockApi::new(Vec::<Event>::new());
        let mut page: ResourcePage<Event> = ResourcePage::default();
        page.mount(&api).await;

        for (key, value) in [
            ("name", json!("Friendly")),
            ("type", json!("match")),
            ("coachId", json!(6)),
            ("location", json!("Away")),
            ("startDate", json!("2026-10-10T10:00")),
            ("endDate", json!("2026-10-10T11:30")),
        ] {
            assert!(page.set_field(FormTarget::Create, key, value), "{}", key);
        }

        let outcome = page.submit_create(&api).await;
        assert_eq!(
            outcome,
            SubmitOutcome::Invalid("At least one team must be selected.".into())
        );

        assert!(page.set_field(FormTarget::Create, "teamIds", json!([5])));
        assert_eq!(page.submit_create(&api).await, SubmitOutcome::Saved(101));
        assert_eq!(page.items().len(), 1);
    }
}
