//! generating state migrations from a plan
//!
//! After the upgrade rules split resources, `terraform plan` wants to create the new resources.
//! They already exist remotely, so they should be imported instead. The analyzer reads the plan
//! as JSON and writes a [tfmigrate](https://github.com/minamijoyo/tfmigrate) migration file with
//! an `import` action for every resource the plan would create.
//!
//! ```
//! let plan = r#"{
//!   "resource_changes": [{
//!     "address": "aws_s3_bucket_acl.example",
//!     "type": "aws_s3_bucket_acl",
//!     "change": { "actions": ["create"], "after": { "bucket": "tfedit-test", "acl": "private" } }
//!   }]
//! }"#;
//!
//! let migration = tfedit::migration::generate_from_plan(plan, "").unwrap();
//! assert!(migration.contains("\"import aws_s3_bucket_acl.example tfedit-test,private\""));
//! ```
mod analyzer;
mod aws;
mod dictionary;
mod plan;
mod state_migration;

pub use analyzer::{Conflict, PlanAnalyzer, PlannedAction, Resolver, StateImportResolver, Subject};
pub use dictionary::{import_id_by_attribute, import_id_by_attributes, Dictionary, ImportIdFn, Resource};
pub use plan::{Action, Change, Plan, ResourceChange};
pub use state_migration::{StateAction, StateMigration};

/// Name of generated migrations
pub const MIGRATION_NAME: &str = "fromplan";

#[derive(thiserror::Error, Debug)]
pub enum MigrationError {
    #[error("failed to parse plan file")]
    InvalidPlan(#[from] serde_json::Error),
    #[error("planned values of {0} are not an object")]
    InvalidResourceAfter(String),
    #[error("unknown resource type for import: {0}")]
    UnknownResourceType(String),
    #[error("failed to cast {key} = {value} to string as import ID")]
    InvalidImportId {
        key: String,
        value: serde_json::Value,
    },
    #[error("unable to determine the import ID of {resource_type}: {reason}")]
    AmbiguousImportId {
        resource_type: String,
        reason: &'static str,
    },
    #[error("failed to render migration file")]
    Render(#[source] hcl::Error),
}

/// Reads a plan in JSON and renders the migration that imports all resources it would create
///
/// Returns an empty string if there is nothing to import.
pub fn generate_from_plan(plan_json: &str, dir: &str) -> Result<String, MigrationError> {
    let plan = Plan::parse(plan_json)?;
    let dictionary = Dictionary::with_default_schemas();
    let migration = PlanAnalyzer::new(&dictionary).analyze(&plan, MIGRATION_NAME, dir)?;
    migration.render()
}
