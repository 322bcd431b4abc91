//! Club domain records
//!
//! Plain records as returned by the club API, plus the [`Draft`] that forms
//! edit before anything is sent to the server. Records carry no behavior
//! beyond identity and conversion to a draft; their lifecycle is driven by
//! the page that owns them.

mod coach;
mod draft;
mod event;
mod student;
mod team;

pub use coach::Coach;
pub use draft::Draft;
pub use event::{parse_timestamp, Event, EventType};
pub use student::Student;
pub use team::Team;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Debug;

/// Collections exposed by the club API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Teams,
    Students,
    Coaches,
    Events,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Teams,
        ResourceKind::Students,
        ResourceKind::Coaches,
        ResourceKind::Events,
    ];

    /// Registry key of the resource definition
    pub fn key(&self) -> &'static str {
        match self {
            Self::Teams => "teams",
            Self::Students => "students",
            Self::Coaches => "coaches",
            Self::Events => "events",
        }
    }

    /// Collection endpoint relative to the API base URL
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Teams => "/teams",
            Self::Students => "/students",
            Self::Coaches => "/coaches",
            Self::Events => "/events",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "teams" | "team" => Some(Self::Teams),
            "students" | "student" => Some(Self::Students),
            "coaches" | "coach" => Some(Self::Coaches),
            "events" | "event" => Some(Self::Events),
            _ => None,
        }
    }
}

/// A record with a server-assigned numeric id
pub trait Entity: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: ResourceKind;

    fn id(&self) -> i64;

    /// Human readable name used in messages and option lists
    fn label(&self) -> &str;

    /// Copy of the editable fields, keyed the way the edit form expects
    fn to_draft(&self) -> Draft;

    /// Resource-specific checks run after the per-field `required` flags
    fn validate_draft(_draft: &Draft) -> Result<(), String> {
        Ok(())
    }
}

/// Relation entry that the server sends either as a bare id or as an object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MemberRef {
    Id(i64),
    Record {
        id: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

impl MemberRef {
    pub fn id(&self) -> i64 {
        match self {
            Self::Id(id) => *id,
            Self::Record { id, .. } => *id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Record { name, .. } => name.as_deref(),
        }
    }

    /// Name when known, `#<id>` otherwise
    pub fn display(&self) -> String {
        self.name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", self.id()))
    }
}

/// Option offered by select and multiselect fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub id: i64,
    pub name: String,
}

impl SelectOption {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn of<T: Entity>(entity: &T) -> Self {
        Self::new(entity.id(), entity.label())
    }
}

/// Relation lists may arrive as `null`
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
