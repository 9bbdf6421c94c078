//! import IDs of the resources split off `aws_s3_bucket`
use super::dictionary::{import_id_by_attribute, import_id_by_attributes, Dictionary, Resource};
use super::MigrationError;

/// Split resources imported by their bucket name alone
const BUCKET_IMPORTED: [&str; 11] = [
    "aws_s3_bucket_accelerate_configuration",
    "aws_s3_bucket_cors_configuration",
    "aws_s3_bucket_lifecycle_configuration",
    "aws_s3_bucket_logging",
    "aws_s3_bucket_object_lock_configuration",
    "aws_s3_bucket_policy",
    "aws_s3_bucket_replication_configuration",
    "aws_s3_bucket_request_payment_configuration",
    "aws_s3_bucket_server_side_encryption_configuration",
    "aws_s3_bucket_versioning",
    "aws_s3_bucket_website_configuration",
];

pub fn register_schema(dictionary: &mut Dictionary) {
    dictionary.register_import_id_fn("aws_s3_bucket_acl", s3_bucket_acl_import_id);
    for resource_type in BUCKET_IMPORTED {
        dictionary.register_import_id_fn(resource_type, import_id_by_attribute("bucket"));
    }
}

/// `bucket,acl` for a canned ACL, `bucket` for an access control policy
fn s3_bucket_acl_import_id(resource: &Resource) -> Result<String, MigrationError> {
    let is_set = |key: &str| resource.get(key).map_or(false, |value| !value.is_null());

    match (is_set("acl"), is_set("access_control_policy")) {
        (true, false) => import_id_by_attributes(&["bucket", "acl"], ",")(resource),
        (false, true) => import_id_by_attribute("bucket")(resource),
        (true, true) => Err(MigrationError::AmbiguousImportId {
            resource_type: "aws_s3_bucket_acl".to_owned(),
            reason: "both acl and access_control_policy are set",
        }),
        (false, false) => Err(MigrationError::AmbiguousImportId {
            resource_type: "aws_s3_bucket_acl".to_owned(),
            reason: "neither acl nor access_control_policy is set",
        }),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn import_id(resource_type: &str, resource: serde_json::Value) -> Result<String, MigrationError> {
        let serde_json::Value::Object(resource) = resource else {
            panic!("not an object");
        };
        Dictionary::with_default_schemas().import_id(resource_type, &resource)
    }

    #[test]
    fn acl() {
        let id = import_id(
            "aws_s3_bucket_acl",
            serde_json::json!({
                "acl": "private",
                "bucket": "tfedit-test",
                "expected_bucket_owner": null
            }),
        );
        assert_eq!(id.unwrap(), "tfedit-test,private");
    }

    #[test]
    fn acl_with_access_control_policy() {
        let id = import_id(
            "aws_s3_bucket_acl",
            serde_json::json!({
                "access_control_policy": [{
                    "grant": [{
                        "grantee": [{ "type": "Group", "uri": "http://acs.amazonaws.com/groups/s3/LogDelivery" }],
                        "permission": "READ_ACP"
                    }],
                    "owner": [{ "id": "set_aws_canonical_user_id" }]
                }],
                "acl": null,
                "bucket": "tfedit-test",
                "expected_bucket_owner": null
            }),
        );
        assert_eq!(id.unwrap(), "tfedit-test");
    }

    #[test]
    fn acl_errors() {
        let neither = import_id(
            "aws_s3_bucket_acl",
            serde_json::json!({ "bucket": "tfedit-test", "expected_bucket_owner": null }),
        );
        assert_eq!(
            neither.unwrap_err().to_string(),
            "unable to determine the import ID of aws_s3_bucket_acl: neither acl nor access_control_policy is set"
        );

        let both = import_id(
            "aws_s3_bucket_acl",
            serde_json::json!({
                "acl": "private",
                "bucket": "tfedit-test",
                "access_control_policy": []
            }),
        );
        assert!(both.is_err());
    }

    #[test]
    fn bucket_imported() {
        for resource_type in BUCKET_IMPORTED {
            let id = import_id(
                resource_type,
                serde_json::json!({ "bucket": "tfedit-test", "expected_bucket_owner": null }),
            );
            assert_eq!(id.unwrap(), "tfedit-test", "{resource_type}");
        }
    }

    #[test]
    fn bucket_itself_is_unknown() {
        let err = import_id("aws_s3_bucket", serde_json::json!({ "bucket": "tfedit-test" }));
        assert_eq!(
            err.unwrap_err().to_string(),
            "unknown resource type for import: aws_s3_bucket"
        );
    }
}
