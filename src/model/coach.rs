use super::{Draft, Entity, ResourceKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coach {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Entity for Coach {
    const KIND: ResourceKind = ResourceKind::Coaches;

    fn id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn to_draft(&self) -> Draft {
        let optional = |v: &Option<String>| v.clone().map(Value::from).unwrap_or_default();

        let mut draft = Draft::new().with("name", self.name.as_str());
        draft.set("email", optional(&self.email));
        draft.set("phoneNumber", optional(&self.phone_number));
        draft.set("specialization", optional(&self.specialization));
        draft
    }
}
