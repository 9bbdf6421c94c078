use super::lifecycle_rule::{lifecycle_rule, EmptyFilterPolicy};
use super::{grant, object_lock_configuration, replication_configuration, versioning, website};
use crate::block::{Block, BlockEdit, Referable, Resource};
use crate::document::Document;
use crate::filter::{
    self, typed, BlockFilter, Filter, FilterError, MultiBlockFilter, VerticalFormatterFilter,
};
use crate::split::{self, BackReference};
use hcl_edit::structure::Attribute;

/// Every resource split off a bucket refers to it by `bucket = aws_s3_bucket.<name>.id`
pub(super) const BUCKET: BackReference = BackReference::new("bucket", "id");

/// Rules for `resource "aws_s3_bucket"` blocks
pub struct S3BucketFilter {
    filters: MultiBlockFilter,
}

impl S3BucketFilter {
    pub fn new(empty_filter_policy: EmptyFilterPolicy) -> Self {
        let lifecycle = move |document: &mut Document, resource: &mut Resource| {
            lifecycle_rule(document, resource, empty_filter_policy)
        };

        let filters: Vec<Box<dyn BlockFilter>> = vec![
            Box::new(typed(acceleration_status)),
            Box::new(typed(acl)),
            Box::new(typed(cors_rule)),
            Box::new(typed(grant::grant)),
            Box::new(typed(lifecycle)),
            Box::new(typed(logging)),
            Box::new(typed(object_lock_configuration::object_lock_configuration)),
            Box::new(typed(policy)),
            Box::new(typed(replication_configuration::replication_configuration)),
            Box::new(typed(request_payer)),
            Box::new(typed(server_side_encryption_configuration)),
            Box::new(typed(versioning::versioning)),
            Box::new(typed(website::website)),
            // removals leave irregular blank lines behind, runs last
            Box::new(VerticalFormatterFilter),
        ];

        S3BucketFilter {
            filters: MultiBlockFilter::new(filters),
        }
    }
}

impl Default for S3BucketFilter {
    fn default() -> Self {
        Self::new(EmptyFilterPolicy::default())
    }
}

impl BlockFilter for S3BucketFilter {
    fn block_filter(&self, document: &mut Document, block: &mut Block) -> Result<(), FilterError> {
        let is_bucket = block
            .downcast::<Resource>()
            .map_or(false, |resource| resource.schema_type() == "aws_s3_bucket");
        if !is_bucket {
            return Ok(());
        }

        self.filters.block_filter(document, block)
    }
}

impl Filter for S3BucketFilter {
    fn filter(&self, document: &mut Document) -> Result<(), FilterError> {
        filter::filter_blocks_by_type(document, Some("resource"), Some("aws_s3_bucket"), self)
    }
}

/// Moves `attribute` onto `resource` as `name`, keeping its comments
fn append_attribute_as(resource: &mut Resource, attribute: Attribute, name: &str) {
    let old_name = crate::attribute::name(&attribute).to_owned();
    resource.append_attribute(attribute);
    resource.rename_attribute(&old_name, name);
}

/// Splits the attribute `name` into a new resource, where it is called `new_name`
fn split_attribute_as(
    document: &mut Document,
    resource: &mut Resource,
    name: &str,
    schema_type: &str,
    new_name: &str,
) -> Result<(), FilterError> {
    split::split_attribute(document, resource, name, schema_type, BUCKET, |split, attribute| {
        append_attribute_as(split, attribute, new_name)
    })?;
    Ok(())
}

/// Splits all nested blocks `block_type` into a new resource which takes over their bodies
fn split_unwrapped(
    document: &mut Document,
    resource: &mut Resource,
    block_type: &str,
    schema_type: &str,
) -> Result<(), FilterError> {
    split::split_nested_blocks(document, resource, block_type, schema_type, BUCKET, |split, blocks| {
        for block in blocks {
            split.append_unwrapped_nested_block_body(block);
        }
    })?;
    Ok(())
}

pub(super) fn acceleration_status(
    document: &mut Document,
    resource: &mut Resource,
) -> Result<(), FilterError> {
    split_attribute_as(
        document,
        resource,
        "acceleration_status",
        "aws_s3_bucket_accelerate_configuration",
        "status",
    )
}

pub(super) fn acl(document: &mut Document, resource: &mut Resource) -> Result<(), FilterError> {
    split_attribute_as(document, resource, "acl", "aws_s3_bucket_acl", "acl")
}

pub(super) fn cors_rule(document: &mut Document, resource: &mut Resource) -> Result<(), FilterError> {
    split::split_nested_blocks(
        document,
        resource,
        "cors_rule",
        "aws_s3_bucket_cors_configuration",
        BUCKET,
        |split, blocks| {
            for block in blocks {
                split.append_nested_block(block);
            }
        },
    )?;
    Ok(())
}

pub(super) fn logging(document: &mut Document, resource: &mut Resource) -> Result<(), FilterError> {
    split_unwrapped(document, resource, "logging", "aws_s3_bucket_logging")
}

pub(super) fn policy(document: &mut Document, resource: &mut Resource) -> Result<(), FilterError> {
    split_attribute_as(document, resource, "policy", "aws_s3_bucket_policy", "policy")
}

pub(super) fn request_payer(
    document: &mut Document,
    resource: &mut Resource,
) -> Result<(), FilterError> {
    split_attribute_as(
        document,
        resource,
        "request_payer",
        "aws_s3_bucket_request_payment_configuration",
        "payer",
    )
}

pub(super) fn server_side_encryption_configuration(
    document: &mut Document,
    resource: &mut Resource,
) -> Result<(), FilterError> {
    split_unwrapped(
        document,
        resource,
        "server_side_encryption_configuration",
        "aws_s3_bucket_server_side_encryption_configuration",
    )
}
