use super::MigrationError;
use std::fmt;

/// A single step of a state migration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateAction {
    /// `terraform import <address> <id>`
    Import { address: String, id: String },
}

impl StateAction {
    pub fn import(address: impl Into<String>, id: impl Into<String>) -> Self {
        StateAction::Import {
            address: address.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for StateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateAction::Import { address, id } => {
                write!(f, "import {} {id}", quote_address(address))
            }
        }
    }
}

/// Single-quotes addresses containing `"`, like for_each instances
fn quote_address(address: &str) -> std::borrow::Cow<'_, str> {
    if address.contains('"') {
        format!("'{address}'").into()
    } else {
        address.into()
    }
}

/// `migration "state" "<name>"` block of a tfmigrate migration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateMigration {
    pub name: String,
    /// working directory of the migration, left out of the block when empty
    pub dir: String,
    pub actions: Vec<StateAction>,
}

impl StateMigration {
    pub fn new(name: impl Into<String>, dir: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
            actions: Vec::new(),
        }
    }

    pub fn append_actions(&mut self, actions: impl IntoIterator<Item = StateAction>) {
        self.actions.extend(actions);
    }

    /// Renders the migration file, an empty string when there is nothing to migrate
    pub fn render(&self) -> Result<String, MigrationError> {
        if self.actions.is_empty() {
            return Ok(String::new());
        }

        let actions: Vec<hcl::Expression> = self
            .actions
            .iter()
            .map(|action| hcl::Expression::from(action.to_string()))
            .collect();

        let mut block = hcl::Block::builder("migration")
            .add_label("state")
            .add_label(self.name.as_str());
        if !self.dir.is_empty() {
            block = block.add_attribute(("dir", self.dir.as_str()));
        }
        let block = block
            .add_attribute(("actions", hcl::Expression::Array(actions)))
            .build();

        let body = hcl::Body::builder().add_block(block).build();
        hcl::to_string(&body).map_err(MigrationError::Render)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn migration(dir: &str) -> StateMigration {
        let mut migration = StateMigration::new("fromplan", dir);
        migration.append_actions([
            StateAction::import("aws_s3_bucket_acl.example", "tfedit-test,private"),
            StateAction::import("aws_s3_bucket_logging.example", "tfedit-test"),
        ]);
        migration
    }

    #[test]
    fn action_text() {
        assert_eq!(
            StateAction::import("aws_s3_bucket_acl.example", "tfedit,private").to_string(),
            "import aws_s3_bucket_acl.example tfedit,private"
        );
        assert_eq!(
            StateAction::import("aws_s3_bucket_acl.example[0]", "tfedit,private").to_string(),
            "import aws_s3_bucket_acl.example[0] tfedit,private"
        );
    }

    #[test]
    fn for_each_address_is_quoted() {
        assert_eq!(
            StateAction::import("aws_s3_bucket_acl.example[\"a\"]", "tfedit-a,private").to_string(),
            "import 'aws_s3_bucket_acl.example[\"a\"]' tfedit-a,private"
        );
    }

    #[test]
    fn render_for_each() {
        let mut migration = StateMigration::new("fromplan", "");
        migration.append_actions([
            StateAction::import("aws_s3_bucket_acl.example[\"foo\"]", "test-foo"),
            StateAction::import("aws_s3_bucket_acl.example[\"bar\"]", "test-bar"),
        ]);
        let rendered = migration.render().unwrap();

        assert_eq!(
            hcl::parse(&rendered).unwrap(),
            hcl::parse(
                r#"
migration "state" "fromplan" {
  actions = [
    "import 'aws_s3_bucket_acl.example[\"foo\"]' test-foo",
    "import 'aws_s3_bucket_acl.example[\"bar\"]' test-bar",
  ]
}
"#
            )
            .unwrap()
        );
    }

    #[test]
    fn render() {
        let rendered = migration("dir1").render().unwrap();
        assert!(rendered.starts_with("migration \"state\" \"fromplan\" {"), "{rendered}");

        assert_eq!(
            hcl::parse(&rendered).unwrap(),
            hcl::parse(
                r#"
migration "state" "fromplan" {
  dir = "dir1"
  actions = [
    "import aws_s3_bucket_acl.example tfedit-test,private",
    "import aws_s3_bucket_logging.example tfedit-test",
  ]
}
"#
            )
            .unwrap()
        );
    }

    #[test]
    fn render_without_dir() {
        let rendered = migration("").render().unwrap();
        let body = hcl::parse(&rendered).unwrap();
        let block = body.blocks().next().unwrap();
        let attributes: Vec<&str> = block.body.attributes().map(|attr| attr.key()).collect();
        assert_eq!(attributes, vec!["actions"]);
    }

    #[test]
    fn render_nothing() {
        assert_eq!(StateMigration::new("fromplan", "dir1").render().unwrap(), "");
    }
}
