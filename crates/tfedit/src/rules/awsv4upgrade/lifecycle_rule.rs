use super::s3_bucket::BUCKET;
use crate::attribute::{self, Literal, Value};
use crate::block::{nested_block, BlockEdit, NestedBlock, Resource};
use crate::document::Document;
use crate::filter::FilterError;
use crate::split::{self, bool_to_enum, remap_attribute};
use hcl_edit::expr::Expression;
use hcl_edit::structure::Attribute;

/// Filter of a lifecycle rule whose `prefix` is `""` and whose `tags` are `{}`
///
/// Either may also be missing, but not both: a rule without any of them always gets
/// `filter { prefix = "" }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyFilterPolicy {
    /// `filter {}`
    #[default]
    EmptyFilter,
    /// `filter { prefix = "" }`, or `filter { and { .. } }` with both values as they are
    KeepValues,
    /// no `filter` block
    Omit,
}

/// `lifecycle_rule` blocks become `rule` blocks of `aws_s3_bucket_lifecycle_configuration`
pub(super) fn lifecycle_rule(
    document: &mut Document,
    resource: &mut Resource,
    empty_filter_policy: EmptyFilterPolicy,
) -> Result<(), FilterError> {
    split::split_nested_blocks(
        document,
        resource,
        "lifecycle_rule",
        "aws_s3_bucket_lifecycle_configuration",
        BUCKET,
        |split, rules| {
            for mut rule in rules {
                upgrade_rule(&mut rule, empty_filter_policy);
                split.append_nested_block(rule);
            }
        },
    )?;
    Ok(())
}

fn upgrade_rule(rule: &mut NestedBlock, empty_filter_policy: EmptyFilterPolicy) {
    rule.set_type("rule");

    if let Some(enabled) = rule.remove_attribute("enabled") {
        let status = remap_attribute(&enabled, bool_to_enum("Enabled", "Disabled"));
        rule.set_attribute_raw("status", status);
    }

    if let Some(filter) = filter_block(rule, empty_filter_policy) {
        rule.append_nested_block(filter);
    }

    for block_type in ["transition", "expiration"] {
        for block in rule.find_nested_blocks_by_type_mut(block_type) {
            upgrade_date(block);
        }
    }

    for block_type in [
        "noncurrent_version_transition",
        "noncurrent_version_expiration",
    ] {
        for block in rule.find_nested_blocks_by_type_mut(block_type) {
            block.rename_attribute("days", "noncurrent_days");
        }
    }

    if let Some(days) = rule.remove_attribute("abort_incomplete_multipart_upload_days") {
        let mut abort = nested_block("abort_incomplete_multipart_upload");
        abort.set_attribute_raw("days_after_initiation", attribute::raw_value(&days));
        rule.append_nested_block(abort);
    }
}

/// Moves `prefix` and `tags` of `rule` into a `filter` block
fn filter_block(rule: &mut NestedBlock, empty_filter_policy: EmptyFilterPolicy) -> Option<NestedBlock> {
    let prefix = rule.remove_attribute("prefix");
    let tags = rule.remove_attribute("tags");

    let is_empty = (prefix.is_some() || tags.is_some())
        && prefix.as_ref().map_or(true, is_empty_string)
        && tags.as_ref().map_or(true, is_empty_object);
    if is_empty {
        match empty_filter_policy {
            EmptyFilterPolicy::EmptyFilter => return Some(nested_block("filter")),
            EmptyFilterPolicy::Omit => return None,
            EmptyFilterPolicy::KeepValues => {}
        }
    }

    // tags are only valid inside `and`
    let mut values = nested_block(if tags.is_some() { "and" } else { "filter" });
    match prefix {
        Some(prefix) => values.append_attribute(prefix),
        // without a prefix the API reports `"Prefix": ""`
        None => values.set_attribute_value("prefix", ""),
    }

    match tags {
        Some(tags) => {
            values.append_attribute(tags);
            let mut filter = nested_block("filter");
            filter.append_nested_block(values);
            Some(filter)
        }
        None => Some(values),
    }
}

fn is_empty_string(attribute: &Attribute) -> bool {
    matches!(attribute::value(attribute), Value::Literal(Literal::String(value)) if value.is_empty())
}

fn is_empty_object(attribute: &Attribute) -> bool {
    matches!(&attribute.value, Expression::Object(object) if object.is_empty())
}

/// `date = "2022-12-31"` becomes `date = "2022-12-31T00:00:00Z"`, anything else is kept
fn upgrade_date(block: &mut NestedBlock) {
    let date = match block.get_attribute_value("date") {
        Some(Value::Literal(Literal::String(date))) => date,
        _ => return,
    };

    if chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_err() {
        tracing::debug!(%date, "not a plain date, keeping it as is");
        return;
    }

    block.set_attribute_value("date", format!("{date}T00:00:00Z"));
}
