//! Generic typed client for one REST collection
//!
//! `ResourceClient<T>` wraps a collection endpoint (`/teams`, `/events`, ...)
//! and decodes its responses into `T`. List endpoints answer either with a
//! bare JSON array or with an `{items, total}` envelope; both normalize to
//! the same sequence through [`ListResponse`].

use super::error::ApiResult;
use super::http::ApiHttpClient;
use crate::model::{Draft, Entity};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

/// Scalar query parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::Int(n) => write!(f, "{}", n),
            Self::Float(n) => write!(f, "{}", n),
            Self::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Query parameters, sorted by key so requests are reproducible
pub type Filters = BTreeMap<String, FilterValue>;

fn to_query(filters: &Filters) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|(k, v)| (k.clone(), v.to_string()))
        .collect()
}

/// Shapes a list endpoint may answer with
#[derive(Debug, Clone, PartialEq)]
pub enum ListResponse {
    Array(Vec<Value>),
    Envelope {
        items: Vec<Value>,
        total: Option<u64>,
        count: Option<u64>,
    },
    Unrecognized,
}

impl ListResponse {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::Array(items),
            Value::Object(mut map) => match map.remove("items") {
                Some(Value::Array(items)) => Self::Envelope {
                    items,
                    total: map.get("total").and_then(as_count),
                    count: map.get("count").and_then(as_count),
                },
                _ => Self::Unrecognized,
            },
            _ => Self::Unrecognized,
        }
    }

    pub fn into_items(self) -> Vec<Value> {
        match self {
            Self::Array(items) | Self::Envelope { items, .. } => items,
            Self::Unrecognized => Vec::new(),
        }
    }
}

/// Any JSON number as a count; floats truncate, negatives clamp to 0
fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f as u64)),
        _ => None,
    }
}

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq)]
pub struct PageSlice<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Default for PageSlice<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

/// Body of a delete response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RemoveResult {
    pub success: bool,
}

/// Operations a page needs from a collection
#[async_trait]
pub trait ResourceApi<T: Entity>: Send + Sync {
    async fn list_all(&self, filters: &Filters) -> ApiResult<Vec<T>>;

    async fn list_paginated(
        &self,
        page: u32,
        page_size: u32,
        filters: &Filters,
    ) -> ApiResult<PageSlice<T>>;

    async fn get_one(&self, id: i64) -> ApiResult<T>;

    async fn create(&self, draft: &Draft) -> ApiResult<T>;

    async fn update(&self, id: i64, draft: &Draft) -> ApiResult<T>;

    async fn remove(&self, id: i64) -> ApiResult<RemoveResult>;
}

/// HTTP-backed client for one collection endpoint
pub struct ResourceClient<T> {
    http: ApiHttpClient,
    endpoint: String,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            endpoint: self.endpoint.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T> fmt::Debug for ResourceClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(http: ApiHttpClient, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            _entity: PhantomData,
        }
    }

    /// Client for the entity's own collection endpoint
    pub fn for_entity(http: ApiHttpClient) -> Self {
        Self::new(http, T::KIND.endpoint())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn http(&self) -> &ApiHttpClient {
        &self.http
    }

    fn item_path(&self, id: i64) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), id)
    }

    /// Decode list items one by one, skipping records that don't fit `T`
    fn decode_items(&self, items: Vec<Value>) -> Vec<T> {
        items
            .into_iter()
            .enumerate()
            .filter_map(|(i, item)| match serde_json::from_value(item) {
                Ok(entity) => Some(entity),
                Err(e) => {
                    tracing::warn!("{}: skipping item {}: {}", self.endpoint, i, e);
                    None
                },
            })
            .collect()
    }
}

#[async_trait]
impl<T: Entity> ResourceApi<T> for ResourceClient<T> {
    async fn list_all(&self, filters: &Filters) -> ApiResult<Vec<T>> {
        let body = self.http.get(&self.endpoint, &to_query(filters)).await?;
        let response = ListResponse::from_value(body);
        if response == ListResponse::Unrecognized {
            tracing::warn!("{}: unrecognized list response, treating as empty", self.endpoint);
        }
        Ok(self.decode_items(response.into_items()))
    }

    async fn list_paginated(
        &self,
        page: u32,
        page_size: u32,
        filters: &Filters,
    ) -> ApiResult<PageSlice<T>> {
        let mut query = to_query(filters);
        query.push(("page".to_string(), page.to_string()));
        query.push(("pageSize".to_string(), page_size.to_string()));

        let body = self.http.get(&self.endpoint, &query).await?;
        match ListResponse::from_value(body) {
            ListResponse::Envelope {
                items,
                total: Some(total),
                ..
            } => Ok(PageSlice {
                items: self.decode_items(items),
                total,
            }),
            _ => {
                tracing::warn!(
                    "{}: malformed paginated response, treating as empty",
                    self.endpoint
                );
                Ok(PageSlice::default())
            },
        }
    }

    async fn get_one(&self, id: i64) -> ApiResult<T> {
        let body = self.http.get(&self.item_path(id), &[]).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn create(&self, draft: &Draft) -> ApiResult<T> {
        let body = self.http.post(&self.endpoint, &draft.to_value()).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn update(&self, id: i64, draft: &Draft) -> ApiResult<T> {
        let body = self
            .http
            .patch(&self.item_path(id), &draft.to_value())
            .await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn remove(&self, id: i64) -> ApiResult<RemoveResult> {
        let body = self.http.delete(&self.item_path(id)).await?;
        if body.is_null() {
            return Ok(RemoveResult { success: true });
        }
        match body.get("success").and_then(Value::as_bool) {
            Some(success) => Ok(RemoveResult { success }),
            // Some endpoints echo the deleted record instead
            None => Ok(RemoveResult { success: true }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_response_shapes() {
        let array = ListResponse::from_value(json!([{"id": 1}]));
        assert!(matches!(array, ListResponse::Array(ref v) if v.len() == 1));

        let envelope = ListResponse::from_value(json!({"items": [{"id": 1}, {"id": 2}], "total": 7}));
        assert_eq!(
            envelope,
            ListResponse::Envelope {
                items: vec![json!({"id": 1}), json!({"id": 2})],
                total: Some(7),
                count: None,
            }
        );

        assert_eq!(ListResponse::from_value(json!({"data": []})), ListResponse::Unrecognized);
        assert_eq!(ListResponse::from_value(json!("nope")), ListResponse::Unrecognized);
        assert!(ListResponse::Unrecognized.into_items().is_empty());
    }

    #[test]
    fn test_envelope_with_text_total() {
        let response = ListResponse::from_value(json!({"items": [], "total": "12"}));
        assert!(matches!(response, ListResponse::Envelope { total: None, .. }));
    }

    #[test]
    fn test_envelope_total_accepts_any_number() {
        let total = |v: Value| match ListResponse::from_value(json!({"items": [], "total": v})) {
            ListResponse::Envelope { total, .. } => total,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(total(json!(1.0)), Some(1));
        assert_eq!(total(json!(7.9)), Some(7));
        assert_eq!(total(json!(-3)), Some(0));
        assert_eq!(total(json!(null)), None);
    }

    #[test]
    fn test_filters_to_query() {
        let mut filters = Filters::new();
        filters.insert("type".into(), "match".into());
        filters.insert("coachId".into(), 4i64.into());
        assert_eq!(
            to_query(&filters),
            vec![
                ("coachId".to_string(), "4".to_string()),
                ("type".to_string(), "match".to_string())
            ]
        );
    }
}
