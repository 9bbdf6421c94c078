use super::s3_bucket::BUCKET;
use crate::attribute::{self, Literal, Value};
use crate::block::{BlockEdit, Resource};
use crate::document::Document;
use crate::filter::FilterError;
use crate::split::new_split_resource;

/// The first `object_lock_configuration` becomes `aws_s3_bucket_object_lock_configuration`
///
/// Its `rule` blocks move to the new resource. `object_lock_enabled` stays on the bucket, where
/// `"Enabled"` turns into `true`.
pub(super) fn object_lock_configuration(
    document: &mut Document,
    resource: &mut Resource,
) -> Result<(), FilterError> {
    if resource
        .find_nested_blocks_by_type("object_lock_configuration")
        .is_empty()
    {
        return Ok(());
    }

    let mut split = new_split_resource(
        resource,
        "aws_s3_bucket_object_lock_configuration",
        BUCKET,
    )?;
    let Some(mut configuration) = resource.remove_nested_block("object_lock_configuration", 0)
    else {
        return Ok(());
    };

    for rule in configuration.take_nested_blocks_by_type("rule") {
        split.append_nested_block(rule);
    }

    if let Some(enabled) = configuration.get_attribute("object_lock_enabled") {
        match attribute::value(enabled) {
            Value::Literal(Literal::String(value)) if value == "Enabled" => {
                resource.set_attribute_value("object_lock_enabled", true)
            }
            _ => resource.set_attribute_raw("object_lock_enabled", attribute::raw_value(enabled)),
        }
    }

    document.append_block(split);
    Ok(())
}
