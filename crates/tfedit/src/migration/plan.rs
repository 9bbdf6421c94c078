//! the parts of `terraform show -json <planfile>` the analyzer reads
use super::MigrationError;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub resource_changes: Vec<ResourceChange>,
}

impl Plan {
    pub fn parse(plan_json: &str) -> Result<Self, MigrationError> {
        Ok(serde_json::from_str(plan_json)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceChange {
    pub address: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub change: Change,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Change {
    pub actions: Vec<Action>,
    /// planned values, `null` when the resource is deleted
    #[serde(default)]
    pub after: serde_json::Value,
}

impl Change {
    /// Only a plain create counts, a replacement is `["delete", "create"]`
    pub fn is_create(&self) -> bool {
        self.actions == [Action::Create]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    NoOp,
    Create,
    Read,
    Update,
    Delete,
    #[serde(other)]
    Unknown,
}
