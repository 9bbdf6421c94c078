use super::s3_bucket::BUCKET;
use crate::attribute;
use crate::block::{nested_block, BlockEdit, Referable, Resource};
use crate::document::Document;
use crate::filter::FilterError;
use crate::references::ReferencePrefix;
use crate::split::new_split_resource;

/// Attributes of `aws_s3_bucket` that moved to `aws_s3_bucket_website_configuration`
const MOVED_ATTRIBUTES: [&str; 2] = ["website_domain", "website_endpoint"];

/// The first `website` becomes `aws_s3_bucket_website_configuration`
///
/// References to the website attributes of the bucket are pointed to the new resource. A
/// reference through an index, like `aws_s3_bucket.example[0].website_endpoint`, is left as is.
pub(super) fn website(document: &mut Document, resource: &mut Resource) -> Result<(), FilterError> {
    if resource.find_nested_blocks_by_type("website").is_empty() {
        return Ok(());
    }

    let mut split = new_split_resource(resource, "aws_s3_bucket_website_configuration", BUCKET)?;
    let Some(mut website) = resource.remove_nested_block("website", 0) else {
        return Ok(());
    };

    for (name, block_type, new_name) in [
        ("index_document", "index_document", "suffix"),
        ("error_document", "error_document", "key"),
    ] {
        if let Some(value) = website.remove_attribute(name) {
            let mut block = nested_block(block_type);
            block.set_attribute_raw(new_name, attribute::raw_value(&value));
            split.append_nested_block(block);
        }
    }
    split.append_unwrapped_nested_block_body(website);

    for name in MOVED_ATTRIBUTES {
        let from = ReferencePrefix::parse(&format!(
            "{}.{}.{name}",
            resource.schema_type(),
            resource.name()
        ))?;
        let to = ReferencePrefix::parse(&format!(
            "{}.{}.{name}",
            split.schema_type(),
            split.name()
        ))?;

        let renamed = document.rename_references(&from, &to) + resource.rename_references(&from, &to);
        tracing::debug!(%from, %to, renamed, "renamed references");
    }

    document.append_block(split);
    Ok(())
}
