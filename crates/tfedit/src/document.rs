//! a parsed configuration file
//!
//! [Document] owns the top-level structures of one file in source order. Blocks are addressed by
//! [BlockId], which stays valid for the lifetime of the document since blocks are only ever
//! appended.
use crate::block::{Block, BlockEdit};
use crate::format;
use crate::references::{self, ReferencePrefix};
use hcl_edit::structure::{Attribute, Body, Structure};
use hcl_edit::Decorate;
use indexmap::IndexMap;
use std::fmt;
use std::str::FromStr;

#[derive(thiserror::Error, Debug)]
#[error("unable to parse configuration")]
pub struct ParseError(#[from] hcl_edit::parser::Error);

/// Index of a top-level block in a [Document]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(usize);

#[derive(Debug, Clone)]
enum Entry {
    Attribute(Attribute),
    Block(Block),
    /// a block that is currently being edited by a filter
    CheckedOut,
}

#[derive(Debug, Clone)]
pub struct Document {
    /// parsed body without structures, carries the leading and trailing decor of the file
    shell: Body,
    entries: Vec<Entry>,
}

impl Document {
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let mut shell = hcl_edit::parser::parse_body(source)?;

        let mut entries = Vec::with_capacity(shell.len());
        while !shell.is_empty() {
            entries.push(match shell.remove(shell.len() - 1) {
                Structure::Attribute(attribute) => Entry::Attribute(attribute),
                Structure::Block(block) => Entry::Block(Block::from_raw(block)),
            });
        }
        entries.reverse();

        tracing::debug!(structures = entries.len(), "document parsed");
        Ok(Document { shell, entries })
    }

    /// Top-level blocks in document order
    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &Block)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| match entry {
                Entry::Block(block) => Some((BlockId(index), block)),
                _ => None,
            })
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        match self.entries.get(id.0)? {
            Entry::Block(block) => Some(block),
            _ => None,
        }
    }

    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        match self.entries.get_mut(id.0)? {
            Entry::Block(block) => Some(block),
            _ => None,
        }
    }

    /// Ids of the top-level blocks matching `block_type` and `schema_type`, in document order
    ///
    /// `None` matches any value. The schema type is the first label of a block.
    pub fn find_block_ids_by_type(
        &self,
        block_type: Option<&str>,
        schema_type: Option<&str>,
    ) -> Vec<BlockId> {
        self.blocks()
            .filter(|(_, block)| block_type.map_or(true, |ty| block.block_type() == ty))
            .filter(|(_, block)| schema_type.map_or(true, |ty| block.schema_type() == ty))
            .map(|(id, _)| id)
            .collect()
    }

    /// Top-level blocks matching `block_type` and `schema_type`, see [Self::find_block_ids_by_type]
    pub fn find_blocks_by_type(
        &self,
        block_type: Option<&str>,
        schema_type: Option<&str>,
    ) -> Vec<&Block> {
        self.find_block_ids_by_type(block_type, schema_type)
            .into_iter()
            .filter_map(|id| self.block(id))
            .collect()
    }

    /// Appends `block` at the end of the document, separated by a blank line
    pub fn append_block(&mut self, block: impl Into<Block>) -> BlockId {
        let mut block = block.into();
        block.raw_mut().decor_mut().set_prefix("\n");

        tracing::debug!(address = block.address(), "block appended");
        self.entries.push(Entry::Block(block));
        BlockId(self.entries.len() - 1)
    }

    /// Takes a block out of the document while a filter edits it
    pub(crate) fn check_out(&mut self, id: BlockId) -> Option<Block> {
        let entry = self.entries.get_mut(id.0)?;
        match std::mem::replace(entry, Entry::CheckedOut) {
            Entry::Block(block) => Some(block),
            other => {
                *entry = other;
                None
            }
        }
    }

    pub(crate) fn check_in(&mut self, id: BlockId, block: Block) {
        if let Some(entry) = self.entries.get_mut(id.0) {
            *entry = Entry::Block(block);
        }
    }

    /// Rewrites references starting with `from` in every block of the document
    ///
    /// A block that is currently edited by a filter is not part of the document and is skipped.
    #[tracing::instrument(level = "trace", skip_all, fields(%from, %to))]
    pub fn rename_references(&mut self, from: &ReferencePrefix, to: &ReferencePrefix) -> usize {
        self.entries
            .iter_mut()
            .map(|entry| match entry {
                Entry::Block(block) => block.rename_references(from, to),
                Entry::Attribute(attribute) => {
                    references::rename_references_in_expr(&mut attribute.value, from, to)
                }
                Entry::CheckedOut => 0,
            })
            .sum()
    }

    /// References of each top-level block, keyed by block address
    pub fn references(&self) -> IndexMap<String, Vec<String>> {
        let mut report: IndexMap<String, Vec<String>> = IndexMap::new();
        for (_, block) in self.blocks() {
            let found = report.entry(block.address()).or_default();
            found.extend(block.references());
            found.sort();
            found.dedup();
        }
        report
    }
}

impl FromStr for Document {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Document::parse(s)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut body = self.shell.clone();
        for entry in &self.entries {
            match entry {
                Entry::Attribute(attribute) => body.push(attribute.clone()),
                Entry::Block(block) => {
                    let edited = block.is_edited();
                    let mut raw = block.clone().into_raw();
                    if edited {
                        format::layout(&mut raw, 0);
                    }
                    body.push(raw);
                }
                Entry::CheckedOut => {}
            }
        }

        write!(f, "{body}")
    }
}

/// Utility macro to create a [Document]
///
/// ```
/// # use tfedit::document;
/// let document = document!(r#"resource "aws_s3_bucket" "example" {}"#);
/// assert_eq!(document.blocks().count(), 1);
/// ```
///
/// # Panic
/// Panics on invalid input
///
/// ```should_panic
/// # use tfedit::document;
/// document!("not = valid = hcl");
/// ```
#[macro_export]
macro_rules! document {
    { $expr:expr } => {
        $crate::document::Document::parse($expr).expect("document must parse")
    };
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::block::{Provider, Resource};
    use pretty_assertions::assert_eq;

    const SOURCE: &str = r#"# header comment
terraform {
  required_version = ">= 1.0"
}

provider "aws" {
  region = "us-east-1" # inline
}

resource "aws_s3_bucket" "example" {
  bucket = "tfedit-test"
}

resource "aws_s3_bucket" "other" {
  bucket    = "tfedit-other"
    oddly_indented = true
}

data "aws_s3_bucket" "example" {
  bucket = "tfedit-existing"
}
"#;

    #[test]
    fn round_trip_is_lossless() {
        let document = document!(SOURCE);
        assert_eq!(document.to_string(), SOURCE);
    }

    #[test]
    fn find_blocks_by_type() {
        let document = document!(SOURCE);

        let addresses = |block_type, schema_type| -> Vec<String> {
            document
                .find_blocks_by_type(block_type, schema_type)
                .into_iter()
                .map(Block::address)
                .collect()
        };

        assert_eq!(
            addresses(Some("resource"), Some("aws_s3_bucket")),
            vec!["aws_s3_bucket.example", "aws_s3_bucket.other"]
        );
        assert_eq!(
            addresses(None, Some("aws_s3_bucket")),
            vec![
                "aws_s3_bucket.example",
                "aws_s3_bucket.other",
                "data.aws_s3_bucket.example"
            ]
        );
        assert_eq!(addresses(Some("provider"), None), vec!["provider.aws"]);
        assert_eq!(addresses(None, None).len(), 5);
        assert!(addresses(Some("module"), None).is_empty());
    }

    #[test]
    fn untouched_blocks_keep_their_layout() {
        let mut document = document!(SOURCE);

        let id = document.find_block_ids_by_type(Some("provider"), None)[0];
        let provider = document.block_mut(id).unwrap();
        assert!(provider.downcast::<Provider>().is_some());
        provider.set_attribute_value("alias", "east");

        let mut acl = Resource::new("aws_s3_bucket_acl", "example");
        acl.set_attribute_value("acl", "private");
        document.append_block(acl);

        let output = document.to_string();
        assert!(output.contains("  bucket    = \"tfedit-other\"\n    oddly_indented = true\n"));
        assert!(output.contains("  region = \"us-east-1\" # inline\n  alias  = \"east\"\n}"));
        assert!(output.ends_with(
            "\n\nresource \"aws_s3_bucket_acl\" \"example\" {\n  acl = \"private\"\n}\n"
        ));
        assert_eq!(hcl::parse(&output).unwrap().blocks().count(), 6);
    }

    #[test]
    fn check_out_hides_block() {
        let mut document = document!(SOURCE);
        let id = document.find_block_ids_by_type(Some("terraform"), None)[0];

        let block = document.check_out(id).unwrap();
        assert_eq!(document.blocks().count(), 4);
        assert!(document.check_out(id).is_none());

        document.check_in(id, block);
        assert_eq!(document.to_string(), SOURCE);
    }

    #[test]
    fn references_report() {
        let document = document!(
            r#"
resource "aws_s3_bucket_policy" "example" {
  bucket = aws_s3_bucket.example.id
  policy = data.aws_iam_policy_document.example.json
}

output "endpoint" {
  value = "http://${aws_s3_bucket.example.website_endpoint}"
}
"#
        );

        let report = document.references();
        assert_eq!(
            report.keys().collect::<Vec<_>>(),
            vec!["aws_s3_bucket_policy.example", "output.endpoint"]
        );
        assert_eq!(
            report["aws_s3_bucket_policy.example"],
            vec![
                "aws_s3_bucket.example.id",
                "data.aws_iam_policy_document.example.json"
            ]
        );
        assert_eq!(
            report["output.endpoint"],
            vec!["aws_s3_bucket.example.website_endpoint"]
        );
    }

    #[test]
    fn parse_error() {
        assert!(Document::parse("resource \"a\" \"b\" {").is_err());
    }
}
