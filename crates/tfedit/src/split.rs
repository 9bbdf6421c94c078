//! splitting content of a resource into new sibling resources
//!
//! Most upgrade rules move an argument or nested block out of a resource into a resource of a new
//! type. The new resource
//!
//! 1. has the new type and the same name as the source, e.g. `aws_s3_bucket_acl.example`
//! 2. copies the meta-arguments `provider`, `count` and `for_each`, in that order
//! 3. points back to the source, e.g. `bucket = aws_s3_bucket.example[count.index].id`
//! 4. receives the extracted content
//!
//! and is appended at the end of the document. The extracted content is removed from the source.
use crate::attribute::{self, Literal, Value};
use crate::block::{BlockEdit, BlockError, NestedBlock, Referable, Resource};
use crate::document::{BlockId, Document};
use hcl_edit::expr::Expression;
use hcl_edit::structure::Attribute;

/// Meta-arguments copied onto split resources, in order
pub const META_ARGUMENTS: [&str; 3] = ["provider", "count", "for_each"];

/// Attribute of a split resource that points back to its source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackReference {
    /// attribute set on the new resource
    pub attribute: &'static str,
    /// attribute of the source the new resource refers to
    pub target: &'static str,
}

impl BackReference {
    pub const fn new(attribute: &'static str, target: &'static str) -> Self {
        BackReference { attribute, target }
    }
}

/// Creates an empty resource of `schema_type` that belongs to `source`
pub fn new_split_resource(
    source: &Resource,
    schema_type: &str,
    back_reference: BackReference,
) -> Result<Resource, BlockError> {
    let mut resource = Resource::new(schema_type, source.name());
    for meta_argument in META_ARGUMENTS {
        resource.copy_attribute(source, meta_argument);
    }
    resource.set_attribute_by_reference(back_reference.attribute, source, back_reference.target)?;
    Ok(resource)
}

/// Moves the attribute `name` of `source` into a new resource of `schema_type`
///
/// `fill` receives the new resource and the removed attribute. Does nothing and returns `None` if
/// `source` has no attribute `name`.
#[tracing::instrument(level = "debug", skip(document, source, fill), fields(source = %source.address()))]
pub fn split_attribute(
    document: &mut Document,
    source: &mut Resource,
    name: &str,
    schema_type: &str,
    back_reference: BackReference,
    fill: impl FnOnce(&mut Resource, Attribute),
) -> Result<Option<BlockId>, BlockError> {
    if source.get_attribute(name).is_none() {
        tracing::trace!("attribute not found");
        return Ok(None);
    }

    let mut resource = new_split_resource(source, schema_type, back_reference)?;
    if let Some(attribute) = source.remove_attribute(name) {
        fill(&mut resource, attribute);
    }

    Ok(Some(document.append_block(resource)))
}

/// Moves all nested blocks of `block_type` in `source` into a new resource of `schema_type`
///
/// `fill` receives the new resource and the removed blocks in source order. Does nothing and returns
/// `None` if `source` has no such nested block.
#[tracing::instrument(level = "debug", skip(document, source, fill), fields(source = %source.address()))]
pub fn split_nested_blocks(
    document: &mut Document,
    source: &mut Resource,
    block_type: &str,
    schema_type: &str,
    back_reference: BackReference,
    fill: impl FnOnce(&mut Resource, Vec<NestedBlock>),
) -> Result<Option<BlockId>, BlockError> {
    if source.find_nested_blocks_by_type(block_type).is_empty() {
        tracing::trace!("nested block not found");
        return Ok(None);
    }

    let mut resource = new_split_resource(source, schema_type, back_reference)?;
    let blocks = source.take_nested_blocks_by_type(block_type);
    fill(&mut resource, blocks);

    Ok(Some(document.append_block(resource)))
}

/// Maps a literal value through `map`, any other value is returned as is
///
/// ```
/// # use tfedit::attribute::Literal;
/// # use tfedit::split::remap;
/// let status = |literal: &Literal| match literal {
///     Literal::Bool(true) => Some(Literal::from("Enabled")),
///     Literal::Bool(false) => Some(Literal::from("Disabled")),
///     _ => None,
/// };
///
/// let expr = remap(&"true".parse().unwrap(), status);
/// assert_eq!(expr.to_string(), r#""Enabled""#);
///
/// let expr = remap(&"var.enabled".parse().unwrap(), status);
/// assert_eq!(expr.to_string(), "var.enabled");
/// ```
pub fn remap(expr: &Expression, map: impl Fn(&Literal) -> Option<Literal>) -> Expression {
    let value = Value::from(expr);
    match value.literal().and_then(map) {
        Some(literal) => literal.into_expression(),
        None => value.into_expression(),
    }
}

/// [remap] on the value of an attribute, with its surrounding whitespace removed
pub fn remap_attribute(
    attribute: &Attribute,
    map: impl Fn(&Literal) -> Option<Literal>,
) -> Expression {
    remap(&attribute::raw_value(attribute), map)
}

/// Maps `true` and `false` to string literals
pub fn bool_to_enum(
    on_true: &'static str,
    on_false: &'static str,
) -> impl Fn(&Literal) -> Option<Literal> {
    move |literal| match literal {
        Literal::Bool(true) => Some(Literal::from(on_true)),
        Literal::Bool(false) => Some(Literal::from(on_false)),
        _ => None,
    }
}
