//! composable rules over documents and blocks
//!
//! A [BlockFilter] edits one top-level block and may append new blocks to the document.
//! A [Filter] edits a whole document, usually by selecting blocks with [BlocksByTypeFilter] and
//! running block filters on each of them.
//!
//! Errors stop the current chain right away. Edits made before the error are kept.
use crate::block::{Block, BlockEdit, BlockError, BlockKind};
use crate::document::Document;
use crate::references::InvalidReferencePrefix;
use std::marker::PhantomData;

#[derive(thiserror::Error, Debug)]
pub enum FilterError {
    #[error(transparent)]
    Block(#[from] BlockError),
    #[error(transparent)]
    InvalidReferencePrefix(#[from] InvalidReferencePrefix),
    #[error("unknown filter type: {0}")]
    UnknownFilterType(String),
}

/// Rule applied to a single top-level block
///
/// `block` is taken out of `document` while the filter runs: it is not visible through
/// [Document::blocks] and document-wide operations do not touch it.
pub trait BlockFilter {
    fn block_filter(&self, document: &mut Document, block: &mut Block) -> Result<(), FilterError>;
}

// blanket impl for Fn
impl<F> BlockFilter for F
where
    F: Fn(&mut Document, &mut Block) -> Result<(), FilterError>,
{
    fn block_filter(&self, document: &mut Document, block: &mut Block) -> Result<(), FilterError> {
        self(document, block)
    }
}

/// Rule applied to a whole document
pub trait Filter {
    fn filter(&self, document: &mut Document) -> Result<(), FilterError>;
}

/// Runs block filters on the same block in order, stops at the first error
#[derive(derive_new::new)]
pub struct MultiBlockFilter {
    filters: Vec<Box<dyn BlockFilter>>,
}

impl BlockFilter for MultiBlockFilter {
    fn block_filter(&self, document: &mut Document, block: &mut Block) -> Result<(), FilterError> {
        for filter in &self.filters {
            filter.block_filter(document, block)?;
        }
        Ok(())
    }
}

/// Runs document filters in order, stops at the first error
#[derive(derive_new::new)]
pub struct MultiFilter {
    filters: Vec<Box<dyn Filter>>,
}

impl Filter for MultiFilter {
    fn filter(&self, document: &mut Document) -> Result<(), FilterError> {
        for filter in &self.filters {
            filter.filter(document)?;
        }
        Ok(())
    }
}

/// Block filter for one block kind, blocks of any other kind are skipped
pub struct TypedFilter<T, F> {
    filter: F,
    kind: PhantomData<fn(&mut T)>,
}

impl<T, F> BlockFilter for TypedFilter<T, F>
where
    T: BlockKind,
    F: Fn(&mut Document, &mut T) -> Result<(), FilterError>,
{
    fn block_filter(&self, document: &mut Document, block: &mut Block) -> Result<(), FilterError> {
        let Some(typed) = block.downcast_mut::<T>() else {
            tracing::trace!(
                block_type = block.block_type(),
                kind = std::any::type_name::<T>(),
                "block kind does not match, skipping"
            );
            return Ok(());
        };

        (self.filter)(document, typed)
    }
}

/// Wraps a function over one block kind as [BlockFilter]
///
/// ```
/// # use tfedit::block::{BlockEdit, Provider};
/// # use tfedit::filter::{typed, BlockFilter};
/// let rename = typed(|_, provider: &mut Provider| {
///     if let Some(region) = provider.remove_attribute("aws_region") {
///         provider.set_attribute_raw("region", region.value);
///     }
///     Ok(())
/// });
///
/// let mut document = tfedit::document!(r#"resource "aws_s3_bucket" "example" {}"#);
/// let id = document.blocks().next().unwrap().0;
/// let mut block = document.block(id).unwrap().clone();
/// rename.block_filter(&mut document, &mut block).unwrap();
/// assert!(!block.is_edited());
/// ```
pub fn typed<T, F>(filter: F) -> TypedFilter<T, F>
where
    T: BlockKind,
    F: Fn(&mut Document, &mut T) -> Result<(), FilterError>,
{
    TypedFilter {
        filter,
        kind: PhantomData,
    }
}

/// Applies a block filter to all top-level blocks matching a block type and schema type
///
/// Blocks are visited in document order. Only blocks present when the selector starts are
/// visited, blocks appended by the inner filter are left for later selectors.
pub struct BlocksByTypeFilter {
    block_type: Option<String>,
    schema_type: Option<String>,
    filter: Box<dyn BlockFilter>,
}

impl BlocksByTypeFilter {
    /// `None` matches any block type or schema type
    pub fn new(
        block_type: Option<&str>,
        schema_type: Option<&str>,
        filter: Box<dyn BlockFilter>,
    ) -> Self {
        BlocksByTypeFilter {
            block_type: block_type.map(str::to_owned),
            schema_type: schema_type.map(str::to_owned),
            filter,
        }
    }
}

impl Filter for BlocksByTypeFilter {
    fn filter(&self, document: &mut Document) -> Result<(), FilterError> {
        filter_blocks_by_type(
            document,
            self.block_type.as_deref(),
            self.schema_type.as_deref(),
            self.filter.as_ref(),
        )
    }
}

/// Applies `filter` to the top-level blocks matching `block_type` and `schema_type`
///
/// See [BlocksByTypeFilter], which owns its filter.
#[tracing::instrument(level = "trace", skip(document, filter))]
pub fn filter_blocks_by_type(
    document: &mut Document,
    block_type: Option<&str>,
    schema_type: Option<&str>,
    filter: &dyn BlockFilter,
) -> Result<(), FilterError> {
    let ids = document.find_block_ids_by_type(block_type, schema_type);

    for id in ids {
        let Some(mut block) = document.check_out(id) else {
            continue;
        };

        tracing::debug!(address = block.address(), "applying filter");
        let result = filter.block_filter(document, &mut block);
        document.check_in(id, block);
        result?;
    }

    Ok(())
}

/// Applies a block filter to every top-level block
pub struct AllBlocksFilter(BlocksByTypeFilter);

impl AllBlocksFilter {
    pub fn new(filter: Box<dyn BlockFilter>) -> Self {
        AllBlocksFilter(BlocksByTypeFilter::new(None, None, filter))
    }
}

impl Filter for AllBlocksFilter {
    fn filter(&self, document: &mut Document) -> Result<(), FilterError> {
        self.0.filter(document)
    }
}

/// Canonicalizes the blank lines of a block, see [crate::format::vertical_format]
///
/// Put it last in a chain, after every rule that removes nodes from the block.
pub struct VerticalFormatterFilter;

impl BlockFilter for VerticalFormatterFilter {
    fn block_filter(&self, _document: &mut Document, block: &mut Block) -> Result<(), FilterError> {
        block.vertical_format();
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::block::{Provider, Resource};
    use crate::document;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    const SOURCE: &str = r#"provider "aws" {
  region = "us-east-1"
}

resource "aws_s3_bucket" "first" {
  bucket = "first"
}

resource "aws_s3_bucket" "second" {
  bucket = "second"
}

resource "aws_instance" "web" {
  ami = "ami-123"
}
"#;

    fn tag(value: &'static str) -> impl Fn(&mut Document, &mut Resource) -> Result<(), FilterError> {
        move |_, resource| {
            resource.set_attribute_value("tag", value);
            Ok(())
        }
    }

    fn tags(document: &Document) -> Vec<(String, String)> {
        document
            .blocks()
            .filter_map(|(_, block)| {
                let tag = block.get_attribute_value("tag")?;
                let tag = tag.literal()?.as_str()?.to_owned();
                Some((block.address(), tag))
            })
            .collect()
    }

    #[test]
    fn typed_filter_skips_other_kinds() {
        let mut document = document!(SOURCE);
        AllBlocksFilter::new(Box::new(typed(|_, provider: &mut Provider| {
            provider.set_attribute_value("alias", "east");
            Ok(())
        })))
        .filter(&mut document)
        .unwrap();

        let edited: Vec<_> = document
            .blocks()
            .filter(|(_, block)| block.is_edited())
            .map(|(_, block)| block.address())
            .collect();
        assert_eq!(edited, vec!["provider.aws"]);
        assert!(document.to_string().ends_with(
            r#"resource "aws_instance" "web" {
  ami = "ami-123"
}
"#
        ));
    }

    #[test]
    fn by_type_selector_in_document_order() {
        let mut document = document!(SOURCE);
        BlocksByTypeFilter::new(
            Some("resource"),
            Some("aws_s3_bucket"),
            Box::new(MultiBlockFilter::new(vec![
                Box::new(typed(tag("one"))),
                Box::new(typed(tag("two"))),
            ])),
        )
        .filter(&mut document)
        .unwrap();

        assert_eq!(
            tags(&document),
            vec![
                ("aws_s3_bucket.first".to_owned(), "two".to_owned()),
                ("aws_s3_bucket.second".to_owned(), "two".to_owned()),
            ]
        );
    }

    #[test]
    fn appended_blocks_are_not_visited() {
        let mut document = document!(SOURCE);
        let visited = Rc::new(RefCell::new(Vec::new()));
        let recorder = Rc::clone(&visited);

        BlocksByTypeFilter::new(
            Some("resource"),
            None,
            Box::new(move |document: &mut Document, block: &mut Block| {
                recorder.borrow_mut().push(block.address());
                document.append_block(Resource::new("aws_s3_bucket_acl", block.label(1)));
                Ok(())
            }),
        )
        .filter(&mut document)
        .unwrap();

        assert_eq!(
            *visited.borrow(),
            vec![
                "aws_s3_bucket.first",
                "aws_s3_bucket.second",
                "aws_instance.web"
            ]
        );
        assert_eq!(document.blocks().count(), 7);
    }

    #[test]
    fn errors_stop_the_chain_and_keep_earlier_edits() {
        let mut document = document!(SOURCE);
        let failing = |_: &mut Document, block: &mut Block| -> Result<(), FilterError> {
            if block.label(1) == "second" {
                return Err(FilterError::UnknownFilterType("failing".to_owned()));
            }
            Ok(())
        };

        let error = BlocksByTypeFilter::new(
            Some("resource"),
            None,
            Box::new(MultiBlockFilter::new(vec![
                Box::new(typed(tag("before"))),
                Box::new(failing),
                Box::new(typed(tag("after"))),
            ])),
        )
        .filter(&mut document)
        .unwrap_err();

        assert_eq!(error.to_string(), "unknown filter type: failing");
        assert_eq!(
            tags(&document),
            vec![
                ("aws_s3_bucket.first".to_owned(), "after".to_owned()),
                ("aws_s3_bucket.second".to_owned(), "before".to_owned()),
            ]
        );
        assert_eq!(document.blocks().count(), 4);
    }

    #[test]
    fn multi_filter_runs_in_order() {
        let mut document = document!(SOURCE);
        MultiFilter::new(vec![
            Box::new(BlocksByTypeFilter::new(
                Some("resource"),
                None,
                Box::new(typed(tag("first"))),
            )),
            Box::new(BlocksByTypeFilter::new(
                None,
                Some("aws_instance"),
                Box::new(typed(tag("second"))),
            )),
        ])
        .filter(&mut document)
        .unwrap();

        assert_eq!(
            tags(&document),
            vec![
                ("aws_s3_bucket.first".to_owned(), "first".to_owned()),
                ("aws_s3_bucket.second".to_owned(), "first".to_owned()),
                ("aws_instance.web".to_owned(), "second".to_owned()),
            ]
        );
    }
}
