use super::dictionary::{Dictionary, Resource};
use super::plan::{Plan, ResourceChange};
use super::state_migration::{StateAction, StateMigration};
use super::MigrationError;

/// What the plan is about to do with a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannedAction {
    Create,
    Unknown,
}

/// A planned change that a migration could make unnecessary
#[derive(Debug, Clone)]
pub struct Conflict {
    resource_change: ResourceChange,
    resolved: bool,
}

impl Conflict {
    pub fn new(resource_change: ResourceChange) -> Self {
        Conflict {
            resource_change,
            resolved: false,
        }
    }

    pub fn mark_as_resolved(&mut self) {
        self.resolved = true;
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn planned_action(&self) -> PlannedAction {
        if self.resource_change.change.is_create() {
            PlannedAction::Create
        } else {
            PlannedAction::Unknown
        }
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_change.resource_type
    }

    pub fn address(&self) -> &str {
        &self.resource_change.address
    }

    /// The planned values of the resource
    pub fn resource_after(&self) -> Result<&Resource, MigrationError> {
        self.resource_change
            .change
            .after
            .as_object()
            .ok_or_else(|| MigrationError::InvalidResourceAfter(self.address().to_owned()))
    }
}

/// All conflicts of a plan, in plan order
#[derive(Debug, Clone, Default)]
pub struct Subject {
    conflicts: Vec<Conflict>,
}

impl Subject {
    pub fn new(plan: &Plan) -> Self {
        Subject {
            conflicts: plan
                .resource_changes
                .iter()
                .cloned()
                .map(Conflict::new)
                .collect(),
        }
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn unresolved_conflicts_mut(&mut self) -> impl Iterator<Item = &mut Conflict> {
        self.conflicts
            .iter_mut()
            .filter(|conflict| !conflict.is_resolved())
    }

    pub fn is_resolved(&self) -> bool {
        self.conflicts.iter().all(Conflict::is_resolved)
    }
}

/// Resolves conflicts of a [Subject] with state actions
pub trait Resolver {
    fn resolve(&self, subject: &mut Subject) -> Result<Vec<StateAction>, MigrationError>;
}

/// Imports every resource the plan would create
#[derive(Debug, derive_new::new)]
pub struct StateImportResolver<'a> {
    dictionary: &'a Dictionary,
}

impl Resolver for StateImportResolver<'_> {
    #[tracing::instrument(level = "trace", skip_all)]
    fn resolve(&self, subject: &mut Subject) -> Result<Vec<StateAction>, MigrationError> {
        let mut actions = Vec::new();
        for conflict in subject.unresolved_conflicts_mut() {
            if conflict.planned_action() != PlannedAction::Create {
                continue;
            }

            let id = self
                .dictionary
                .import_id(conflict.resource_type(), conflict.resource_after()?)?;
            tracing::debug!(address = conflict.address(), %id, "import");

            actions.push(StateAction::import(conflict.address(), id));
            conflict.mark_as_resolved();
        }
        Ok(actions)
    }
}

/// Turns a plan into a state migration by running resolvers in order
pub struct PlanAnalyzer<'a> {
    resolvers: Vec<Box<dyn Resolver + 'a>>,
}

impl<'a> PlanAnalyzer<'a> {
    pub fn new(dictionary: &'a Dictionary) -> Self {
        PlanAnalyzer {
            resolvers: vec![Box::new(StateImportResolver::new(dictionary))],
        }
    }

    #[tracing::instrument(level = "trace", skip_all, fields(%name, %dir))]
    pub fn analyze(&self, plan: &Plan, name: &str, dir: &str) -> Result<StateMigration, MigrationError> {
        let mut subject = Subject::new(plan);

        let mut migration = StateMigration::new(name, dir);
        for resolver in &self.resolvers {
            migration.append_actions(resolver.resolve(&mut subject)?);
        }

        if !subject.is_resolved() {
            tracing::trace!("some changes are left to terraform");
        }
        Ok(migration)
    }
}
