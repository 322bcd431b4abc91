use super::{null_as_empty, Draft, Entity, MemberRef, ResourceKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub teams: Vec<MemberRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Entity for Student {
    const KIND: ResourceKind = ResourceKind::Students;

    fn id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn to_draft(&self) -> Draft {
        let mut draft = Draft::new().with("name", self.name.as_str());
        draft.set("email", self.email.clone().map(Value::from).unwrap_or_default());
        draft.set(
            "phoneNumber",
            self.phone_number.clone().map(Value::from).unwrap_or_default(),
        );
        // Date inputs only hold the calendar day
        draft.set(
            "dateOfBirth",
            self.date_of_birth
                .as_deref()
                .map(|d| Value::from(d.chars().take(10).collect::<String>()))
                .unwrap_or_default(),
        );
        draft.set(
            "teamIds",
            Value::from(self.teams.iter().map(MemberRef::id).collect::<Vec<_>>()),
        );
        draft
    }
}
