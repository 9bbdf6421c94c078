use super::s3_bucket::BUCKET;
use crate::block::{BlockEdit, NestedBlock, Resource};
use crate::document::Document;
use crate::filter::FilterError;
use crate::split::{bool_to_enum, new_split_resource, remap_attribute};

/// The first `versioning` becomes `versioning_configuration` of `aws_s3_bucket_versioning`
pub(super) fn versioning(document: &mut Document, resource: &mut Resource) -> Result<(), FilterError> {
    if resource.find_nested_blocks_by_type("versioning").is_empty() {
        return Ok(());
    }

    let mut split = new_split_resource(resource, "aws_s3_bucket_versioning", BUCKET)?;
    let Some(mut configuration) = resource.remove_nested_block("versioning", 0) else {
        return Ok(());
    };

    upgrade_configuration(&mut configuration);
    split.append_nested_block(configuration);

    document.append_block(split);
    Ok(())
}

fn upgrade_configuration(configuration: &mut NestedBlock) {
    configuration.set_type("versioning_configuration");

    if let Some(enabled) = configuration.remove_attribute("enabled") {
        let status = remap_attribute(&enabled, bool_to_enum("Enabled", "Suspended"));
        configuration.set_attribute_raw("status", status);
    }

    if let Some(mfa_delete) = configuration.get_attribute("mfa_delete") {
        let mfa_delete = remap_attribute(mfa_delete, bool_to_enum("Enabled", "Disabled"));
        configuration.set_attribute_raw("mfa_delete", mfa_delete);
    }
}
