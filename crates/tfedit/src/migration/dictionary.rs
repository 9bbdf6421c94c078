//! import IDs by resource type
use super::MigrationError;
use std::collections::HashMap;
use std::fmt;

/// Planned values of a resource
pub type Resource = serde_json::Map<String, serde_json::Value>;

/// Computes the ID `terraform import` expects for a resource
pub type ImportIdFn = Box<dyn Fn(&Resource) -> Result<String, MigrationError>>;

/// Registry of [ImportIdFn]s, built once and only read afterwards
#[derive(Default)]
pub struct Dictionary {
    import_id_fns: HashMap<String, ImportIdFn>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dictionary with all schemas this crate knows about
    pub fn with_default_schemas() -> Self {
        let mut dictionary = Self::new();
        super::aws::register_schema(&mut dictionary);
        dictionary
    }

    /// Registers `f` for `resource_type`, replacing a previous registration
    pub fn register_import_id_fn<F>(&mut self, resource_type: impl Into<String>, f: F)
    where
        F: Fn(&Resource) -> Result<String, MigrationError> + 'static,
    {
        self.import_id_fns.insert(resource_type.into(), Box::new(f));
    }

    pub fn contains(&self, resource_type: &str) -> bool {
        self.import_id_fns.contains_key(resource_type)
    }

    pub fn import_id(&self, resource_type: &str, resource: &Resource) -> Result<String, MigrationError> {
        let f = self
            .import_id_fns
            .get(resource_type)
            .ok_or_else(|| MigrationError::UnknownResourceType(resource_type.to_owned()))?;
        f(resource)
    }
}

impl fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut resource_types: Vec<_> = self.import_id_fns.keys().collect();
        resource_types.sort();
        f.debug_struct("Dictionary")
            .field("resource_types", &resource_types)
            .finish()
    }
}

/// The string value of `key` is the import ID
pub fn import_id_by_attribute(
    key: impl Into<String>,
) -> impl Fn(&Resource) -> Result<String, MigrationError> {
    let key = key.into();
    move |resource: &Resource| string_attribute(resource, &key)
}

/// The string values of `keys` joined by `separator` are the import ID
pub fn import_id_by_attributes(
    keys: &[&str],
    separator: impl Into<String>,
) -> impl Fn(&Resource) -> Result<String, MigrationError> {
    let keys: Vec<String> = keys.iter().map(|key| key.to_string()).collect();
    let separator = separator.into();
    move |resource: &Resource| {
        let values = keys
            .iter()
            .map(|key| string_attribute(resource, key))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(values.join(&separator))
    }
}

fn string_attribute(resource: &Resource, key: &str) -> Result<String, MigrationError> {
    match resource.get(key) {
        Some(serde_json::Value::String(value)) => Ok(value.clone()),
        value => Err(MigrationError::InvalidImportId {
            key: key.to_owned(),
            value: value.cloned().unwrap_or_default(),
        }),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn resource() -> Resource {
        let value = serde_json::json!({
            "foo1": "FOO1",
            "foo2": "FOO2",
            "bar": 1,
            "baz": null
        });
        match value {
            serde_json::Value::Object(resource) => resource,
            _ => unreachable!(),
        }
    }

    #[test]
    fn by_attribute() {
        let resource = resource();
        assert_eq!(import_id_by_attribute("foo1")(&resource).unwrap(), "FOO1");

        for (key, message) in [
            ("bar", "failed to cast bar = 1 to string as import ID"),
            ("baz", "failed to cast baz = null to string as import ID"),
            ("qux", "failed to cast qux = null to string as import ID"),
        ] {
            let err = import_id_by_attribute(key)(&resource).unwrap_err();
            assert_eq!(err.to_string(), message);
        }
    }

    #[test]
    fn by_attributes() {
        let resource = resource();
        assert_eq!(
            import_id_by_attributes(&["foo1", "foo2"], ",")(&resource).unwrap(),
            "FOO1,FOO2"
        );

        for key in ["bar", "baz", "qux"] {
            assert!(import_id_by_attributes(&["foo1", key], ",")(&resource).is_err());
        }
    }

    #[test]
    fn lookup_by_resource_type() {
        let mut dictionary = Dictionary::new();
        dictionary.register_import_id_fn("foo_test1", import_id_by_attribute("foo1"));
        dictionary.register_import_id_fn("foo_test2", import_id_by_attribute("foo2"));
        dictionary.register_import_id_fn("foo_test3", import_id_by_attribute("bar"));

        let resource = resource();
        assert_eq!(dictionary.import_id("foo_test2", &resource).unwrap(), "FOO2");
        assert!(dictionary.import_id("foo_test3", &resource).is_err());

        let err = dictionary.import_id("foo_test4", &resource).unwrap_err();
        assert_eq!(err.to_string(), "unknown resource type for import: foo_test4");
    }
}
