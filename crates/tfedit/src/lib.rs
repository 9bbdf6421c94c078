//! # tfedit - structural rewriting of terraform configuration
//!
//! For a user guide and material related to CLI usage see the README.
//!
//! ## Introduction for developers
//!
//! Read this to understand how `tfedit` works internally.
//!
//! ### HCL Terms
//!
//! In hcl terms...
//! - a file gets parsed as a `body`
//! - ...which is just a list of `structures`
//! - ...where there are two kinds:
//!   - `attribute`: a "key = value" pair
//!   - or `block`:
//!     - 1 `identifier`
//!     - followed by 0 or more `labels`
//!     - and a `body` enclosed in `{` and `}`
//!
//! Terraform gives the top-level blocks meaning: `resource "aws_s3_bucket" "example" {}` has the
//! block type `resource`, the schema type `aws_s3_bucket` and the name `example`. Blocks inside a
//! body have no address and are called nested blocks here.
//!
//! ### Parsing
//!
//! A file is parsed losslessly with [hcl_edit] and wrapped in a [document::Document]. Each
//! top-level block becomes a [block::Block] of a known kind, or [block::Block::Unknown].
//! Comments, blank lines and the formatting of every expression survive a round trip.
//!
//! ### Filters
//!
//! Rules are [filter::BlockFilter]s written against one block kind with [filter::typed]. They read
//! and edit the block through [block::BlockEdit] and may append new blocks to the document.
//! A [filter::Filter] selects the blocks a rule applies to. Expressions are never evaluated: a
//! value is either a literal or copied verbatim, see [attribute::Value].
//!
//! Most upgrade rules move content of a block into a new block, see [split].
//!
//! **Example**
//!
//! ```
//! use tfedit::filter::Filter;
//!
//! let mut document = tfedit::document!(
//!     r#"
//! resource "aws_s3_bucket" "example" {
//!   bucket = "tfedit-test"
//!   acl    = "private"
//! }
//! "#
//! );
//!
//! tfedit::rules::filter_by_type("awsv4upgrade")
//!     .unwrap()
//!     .filter(&mut document)
//!     .unwrap();
//!
//! let addresses: Vec<String> = document.blocks().map(|(_, block)| block.address()).collect();
//! assert_eq!(addresses, vec!["aws_s3_bucket.example", "aws_s3_bucket_acl.example"]);
//! ```
//!
//! ### Printing
//!
//! Blocks no rule touched are printed exactly as parsed. Edited blocks get their indentation and
//! `=` alignment fixed, see [format].
//!
//! ### State migrations
//!
//! Split resources already exist remotely and need to be imported, see [migration].

pub mod attribute;
pub mod block;
mod decor;
pub mod document;
pub mod filter;
pub mod format;
pub mod list;
pub mod migration;
pub mod references;
pub mod rules;
pub mod split;
mod visit;
