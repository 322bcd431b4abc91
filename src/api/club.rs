//! Per-collection client instances for the club API

use super::client::{FilterValue, Filters, ResourceApi, ResourceClient};
use super::error::ApiResult;
use super::http::ApiHttpClient;
use crate::model::{Coach, Event, Student, Team};
use chrono::{DateTime, SecondsFormat, Utc};

pub type TeamsClient = ResourceClient<Team>;
pub type StudentsClient = ResourceClient<Student>;
pub type CoachesClient = ResourceClient<Coach>;
pub type EventsClient = ResourceClient<Event>;

/// One client per collection, all sharing one HTTP transport
#[derive(Clone, Debug)]
pub struct ClubApi {
    pub teams: TeamsClient,
    pub students: StudentsClient,
    pub coaches: CoachesClient,
    pub events: EventsClient,
}

impl ClubApi {
    pub fn new(base_url: &str) -> ApiResult<Self> {
        Ok(Self::with_http(ApiHttpClient::new(base_url)?))
    }

    pub fn with_http(http: ApiHttpClient) -> Self {
        Self {
            teams: ResourceClient::for_entity(http.clone()),
            students: ResourceClient::for_entity(http.clone()),
            coaches: ResourceClient::for_entity(http.clone()),
            events: ResourceClient::for_entity(http),
        }
    }

    pub fn base_url(&self) -> &str {
        self.teams.http().base_url().as_str()
    }
}

impl EventsClient {
    /// Events overlapping `[from, to)`
    pub async fn list_in_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> ApiResult<Vec<Event>> {
        let mut filters = Filters::new();
        filters.insert(
            "from".to_string(),
            FilterValue::Text(from.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        filters.insert(
            "to".to_string(),
            FilterValue::Text(to.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        self.list_all(&filters).await
    }
}
