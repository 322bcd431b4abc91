use super::{Draft, Entity, MemberRef, ResourceKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A squad, its coach and its students
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "TeamRecord")]
pub struct Team {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coach_id: Option<i64>,
    pub students: Vec<MemberRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Team as sent by the server
///
/// Members arrive as `students`, `studentIds` or `players` depending on the
/// endpoint, sometimes more than one at once. The first non-null list wins.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeamRecord {
    id: i64,
    name: String,
    #[serde(default)]
    coach_id: Option<i64>,
    #[serde(default)]
    students: Option<Vec<MemberRef>>,
    #[serde(default)]
    student_ids: Option<Vec<MemberRef>>,
    #[serde(default)]
    players: Option<Vec<MemberRef>>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
}

impl From<TeamRecord> for Team {
    fn from(record: TeamRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            coach_id: record.coach_id,
            students: record
                .students
                .or(record.student_ids)
                .or(record.players)
                .unwrap_or_default(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl Team {
    pub fn student_ids(&self) -> Vec<i64> {
        self.students.iter().map(MemberRef::id).collect()
    }
}

impl Entity for Team {
    const KIND: ResourceKind = ResourceKind::Teams;

    fn id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn to_draft(&self) -> Draft {
        let mut draft = Draft::new().with("name", self.name.as_str());
        if let Some(coach_id) = self.coach_id {
            draft.set("coachId", Value::from(coach_id));
        }
        draft.set("studentIds", Value::from(self.student_ids()));
        draft
    }
}
