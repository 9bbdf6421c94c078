use super::s3_bucket::BUCKET;
use crate::attribute;
use crate::block::{nested_block, BlockEdit, NestedBlock, Resource};
use crate::document::Document;
use crate::filter::FilterError;
use crate::split;

/// `replication_configuration` becomes `aws_s3_bucket_replication_configuration`
pub(super) fn replication_configuration(
    document: &mut Document,
    resource: &mut Resource,
) -> Result<(), FilterError> {
    split::split_nested_blocks(
        document,
        resource,
        "replication_configuration",
        "aws_s3_bucket_replication_configuration",
        BUCKET,
        |split, configurations| {
            for mut configuration in configurations {
                if let Some(role) = configuration.remove_attribute("role") {
                    split.append_attribute(role);
                }

                for mut rule in configuration.take_nested_blocks_by_type("rules") {
                    upgrade_rule(&mut rule);
                    split.append_nested_block(rule);
                }
            }
        },
    )?;
    Ok(())
}

fn upgrade_rule(rule: &mut NestedBlock) {
    rule.set_type("rule");
    wrap_attribute(
        rule,
        "delete_marker_replication_status",
        "delete_marker_replication",
        "status",
    );

    for destination in rule.find_nested_blocks_by_type_mut("destination") {
        for replication_time in destination.find_nested_blocks_by_type_mut("replication_time") {
            wrap_attribute(replication_time, "minutes", "time", "minutes");
        }
        for metrics in destination.find_nested_blocks_by_type_mut("metrics") {
            wrap_attribute(metrics, "minutes", "event_threshold", "minutes");
        }
    }
}

/// Replaces the attribute `name` with `block_type { new_name = <value> }` at the end of `block`
fn wrap_attribute(block: &mut NestedBlock, name: &str, block_type: &str, new_name: &str) {
    let Some(attribute) = block.remove_attribute(name) else {
        return;
    };

    let mut wrapper = nested_block(block_type);
    wrapper.set_attribute_raw(new_name, attribute::raw_value(&attribute));
    block.append_nested_block(wrapper);
}
