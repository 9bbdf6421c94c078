//! typed view on blocks
//!
//! Every top-level block of a [crate::document::Document] is a [Block]: a sum type over the block
//! kinds terraform knows about. Nested blocks have no address of their own and are plain
//! [NestedBlock]s.
//!
//! All of them share the editing operations of [BlockEdit]. Mutating a top-level block through
//! [BlockEdit::raw_mut] marks it as edited, which makes the document lay it out again when printed.
//! Blocks that were never touched are printed exactly as they were parsed.
use crate::attribute::{self, Literal, Value};
use crate::decor::{self, Gap};
use crate::format;
use crate::references::{self, ReferencePrefix};
use hcl_edit::expr::Expression;
use hcl_edit::structure::{Attribute, BlockLabel, Body, Structure};
use hcl_edit::{Decorate, Decorated, Ident};

/// A block inside the body of another block
pub type NestedBlock = hcl_edit::structure::Block;

/// Creates an empty nested block of `block_type`
pub fn nested_block(block_type: &str) -> NestedBlock {
    NestedBlock::new(Decorated::new(Ident::new(block_type)))
}

#[derive(thiserror::Error, Debug)]
pub enum BlockError {
    #[error("unable to build expression `{expression}`")]
    InvalidExpression {
        expression: String,
        #[source]
        source: hcl_edit::parser::Error,
    },
}

/// Editing operations shared by top-level and nested blocks
pub trait BlockEdit {
    fn raw(&self) -> &NestedBlock;

    /// Mutable access to the syntax tree, marks top-level blocks as edited
    fn raw_mut(&mut self) -> &mut NestedBlock;

    fn block_type(&self) -> &str {
        self.raw().ident.value().as_str()
    }

    fn labels(&self) -> Vec<&str> {
        self.raw().labels.iter().map(BlockLabel::as_str).collect()
    }

    /// Returns the label at `index` or an empty string
    fn label(&self, index: usize) -> &str {
        self.raw()
            .labels
            .get(index)
            .map(BlockLabel::as_str)
            .unwrap_or_default()
    }

    fn set_type(&mut self, block_type: &str) {
        self.raw_mut().ident = Decorated::new(Ident::new(block_type));
    }

    fn body(&self) -> &Body {
        &self.raw().body
    }

    fn attributes(&self) -> Vec<&Attribute> {
        self.body()
            .iter()
            .filter_map(|structure| match structure {
                Structure::Attribute(attribute) => Some(attribute),
                Structure::Block(_) => None,
            })
            .collect()
    }

    fn get_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes()
            .into_iter()
            .find(|attribute| attribute::name(attribute) == name)
    }

    fn get_attribute_value(&self, name: &str) -> Option<Value> {
        self.get_attribute(name).map(attribute::value)
    }

    /// Sets `name` to a literal, replacing the value of an existing attribute in place
    fn set_attribute_value(&mut self, name: &str, value: impl Into<Literal>)
    where
        Self: Sized,
    {
        self.set_attribute_raw(name, value.into().into_expression());
    }

    /// Sets `name` to `expr` as is, replacing the value of an existing attribute in place
    fn set_attribute_raw(&mut self, name: &str, expr: Expression) {
        let body = &mut self.raw_mut().body;
        match attribute_index(body, name) {
            Some(index) => {
                let mut attribute = match body.remove(index) {
                    Structure::Attribute(attribute) => attribute,
                    Structure::Block(_) => unreachable!("index points to an attribute"),
                };
                attribute.value = attribute::new_attribute(name, expr).value;
                body.insert(index, attribute);
            }
            None => body.push(attribute::new_attribute(name, expr)),
        }
    }

    /// Moves `attribute` to the end of this body, keeping the comments in front of it
    fn append_attribute(&mut self, mut attribute: Attribute) {
        let mut gap = Gap::parse(decor::prefix(attribute.decor()));
        gap.set_leading_blank_lines(0);
        attribute.decor_mut().set_prefix(gap.to_string());

        let name = attribute::name(&attribute).to_owned();
        self.remove_attribute(&name);
        self.raw_mut().body.push(attribute);
    }

    /// Renames the attribute `from` to `to` in place, returns false if there is no `from`
    fn rename_attribute(&mut self, from: &str, to: &str) -> bool {
        let Some(index) = attribute_index(self.body(), from) else {
            return false;
        };

        let body = &mut self.raw_mut().body;
        let mut structure = body.remove(index);
        if let Structure::Attribute(attribute) = &mut structure {
            *attribute.key.value_mut() = Ident::new(to);
        }
        body.insert(index, structure);
        true
    }

    fn remove_attribute(&mut self, name: &str) -> Option<Attribute> {
        let index = attribute_index(self.body(), name)?;
        match self.raw_mut().body.remove(index) {
            Structure::Attribute(attribute) => Some(attribute),
            Structure::Block(_) => None,
        }
    }

    /// Copies the attribute `name` of `from`, does nothing if `from` has no such attribute
    fn copy_attribute(&mut self, from: &impl BlockEdit, name: &str)
    where
        Self: Sized,
    {
        if let Some(attribute) = from.get_attribute(name) {
            self.set_attribute_raw(name, attribute::raw_value(attribute));
        }
    }

    /// Sets `name` to a reference of `attribute` of `target`, like `aws_s3_bucket.example.id`
    ///
    /// The reference points to the current instance when `target` has `count` or `for_each`.
    fn set_attribute_by_reference<T: Referable>(
        &mut self,
        name: &str,
        target: &T,
        attribute: &str,
    ) -> Result<(), BlockError>
    where
        Self: Sized,
    {
        let expression = format!(
            "{}{}.{}.{attribute}",
            T::ADDRESS_PREFIX,
            target.schema_type(),
            target.referable_name()
        );
        let expr = expression
            .parse::<Expression>()
            .map_err(|source| BlockError::InvalidExpression { expression, source })?;

        self.set_attribute_raw(name, expr);
        Ok(())
    }

    fn nested_blocks(&self) -> Vec<&NestedBlock> {
        self.body()
            .iter()
            .filter_map(|structure| match structure {
                Structure::Block(block) => Some(block),
                Structure::Attribute(_) => None,
            })
            .collect()
    }

    /// Returns nested blocks of `block_type` in order, an empty list if there are none
    fn find_nested_blocks_by_type(&self, block_type: &str) -> Vec<&NestedBlock> {
        self.nested_blocks()
            .into_iter()
            .filter(|block| block.block_type() == block_type)
            .collect()
    }

    fn find_nested_blocks_by_type_mut(&mut self, block_type: &str) -> Vec<&mut NestedBlock> {
        if nested_block_indices(self.body(), block_type).is_empty() {
            return Vec::new();
        }

        self.raw_mut()
            .body
            .blocks_mut()
            .filter(|block| block.ident.value().as_str() == block_type)
            .collect()
    }

    /// Removes the `position`th nested block of `block_type` and returns it
    fn remove_nested_block(&mut self, block_type: &str, position: usize) -> Option<NestedBlock> {
        let index = nested_block_indices(self.body(), block_type)
            .into_iter()
            .nth(position)?;

        match self.raw_mut().body.remove(index) {
            Structure::Block(block) => Some(block),
            Structure::Attribute(_) => None,
        }
    }

    /// Removes all nested blocks of `block_type` and returns them in order
    fn take_nested_blocks_by_type(&mut self, block_type: &str) -> Vec<NestedBlock> {
        let indices = nested_block_indices(self.body(), block_type);
        if indices.is_empty() {
            return Vec::new();
        }

        let body = &mut self.raw_mut().body;
        let mut taken: Vec<NestedBlock> = indices
            .into_iter()
            .rev()
            .filter_map(|index| match body.remove(index) {
                Structure::Block(block) => Some(block),
                Structure::Attribute(_) => None,
            })
            .collect();
        taken.reverse();
        taken
    }

    /// Appends `block` to the end of this body, separated by a blank line
    fn append_nested_block(&mut self, mut block: NestedBlock) {
        let mut gap = Gap::parse(decor::prefix(block.decor()));
        gap.set_leading_blank_lines(1);
        block.decor_mut().set_prefix(gap.to_string());

        self.raw_mut().body.push(block);
    }

    /// Appends the attributes and nested blocks of `block` to this body, without `block` itself
    fn append_unwrapped_nested_block_body(&mut self, block: NestedBlock) {
        let body = &mut self.raw_mut().body;
        let separate = !body.is_empty();

        for (index, mut structure) in block.body.into_iter().enumerate() {
            if index == 0 {
                let decor = decor::structure_decor_mut(&mut structure);
                let mut gap = Gap::parse(decor::prefix(decor));
                gap.set_leading_blank_lines(usize::from(separate));
                decor.set_prefix(gap.to_string());
            }
            body.push(structure);
        }
    }

    /// Canonicalizes the blank lines of this body, see [format::vertical_format]
    fn vertical_format(&mut self) {
        format::vertical_format(&mut self.raw_mut().body);
    }

    /// All references in this block, sorted and without duplicates
    fn references(&self) -> Vec<String> {
        references::references(self.body())
    }

    /// Rewrites references starting with `from` to start with `to`, see [references]
    fn rename_references(&mut self, from: &ReferencePrefix, to: &ReferencePrefix) -> usize {
        if !references::contains_prefix(self.body(), from) {
            return 0;
        }

        references::rename_references(&mut self.raw_mut().body, from, to)
    }
}

impl BlockEdit for NestedBlock {
    fn raw(&self) -> &NestedBlock {
        self
    }

    fn raw_mut(&mut self) -> &mut NestedBlock {
        self
    }
}

fn attribute_index(body: &Body, name: &str) -> Option<usize> {
    body.iter().position(|structure| {
        matches!(structure, Structure::Attribute(attribute) if attribute::name(attribute) == name)
    })
}

fn nested_block_indices(body: &Body, block_type: &str) -> Vec<usize> {
    body.iter()
        .enumerate()
        .filter_map(|(index, structure)| match structure {
            Structure::Block(block) if block.ident.value().as_str() == block_type => Some(index),
            _ => None,
        })
        .collect()
}

/// Blocks that can be addressed from other blocks (resources and data sources)
pub trait Referable: BlockEdit {
    /// Prepended to the schema type in addresses
    const ADDRESS_PREFIX: &'static str;

    fn schema_type(&self) -> &str {
        self.label(0)
    }

    fn name(&self) -> &str {
        self.label(1)
    }

    fn count(&self) -> Option<&Attribute> {
        self.get_attribute("count")
    }

    fn for_each(&self) -> Option<&Attribute> {
        self.get_attribute("for_each")
    }

    /// Name with the instance accessor, e.g. `example[count.index]` or `example[each.key]`
    fn referable_name(&self) -> String {
        if self.count().is_some() {
            format!("{}[count.index]", self.name())
        } else if self.for_each().is_some() {
            format!("{}[each.key]", self.name())
        } else {
            self.name().to_owned()
        }
    }

    fn address(&self) -> String {
        format!("{}{}.{}", Self::ADDRESS_PREFIX, self.schema_type(), self.name())
    }
}

/// Downcast from [Block] to a concrete kind
pub trait BlockKind: BlockEdit + Sized {
    fn from_block(block: &Block) -> Option<&Self>;
    fn from_block_mut(block: &mut Block) -> Option<&mut Self>;
}

#[derive(Debug, Clone)]
struct Inner {
    raw: NestedBlock,
    edited: bool,
}

impl Inner {
    fn new(block_type: &str, labels: &[&str]) -> Self {
        let mut raw = nested_block(block_type);
        raw.labels = labels
            .iter()
            .map(|label| BlockLabel::String(Decorated::new((*label).to_owned())))
            .collect();

        Inner { raw, edited: true }
    }
}

macro_rules! block_kinds {
    ($( $(#[$meta:meta])* $kind:ident($ident:literal, $labels:literal); )+) => {
        /// A top-level block
        #[derive(Debug, Clone)]
        pub enum Block {
            $( $kind($kind), )+
            /// Any block with an identifier or label count not listed above
            Unknown(Unknown),
        }

        impl Block {
            /// Wraps a parsed block according to its identifier and number of labels
            pub fn from_raw(raw: NestedBlock) -> Self {
                let inner = Inner { raw, edited: false };
                match (inner.raw.ident.value().as_str(), inner.raw.labels.len()) {
                    $( ($ident, $labels) => Block::$kind($kind { inner }), )+
                    _ => Block::Unknown(Unknown { inner }),
                }
            }

            fn inner(&self) -> &Inner {
                match self {
                    $( Block::$kind(block) => &block.inner, )+
                    Block::Unknown(block) => &block.inner,
                }
            }

            fn inner_mut(&mut self) -> &mut Inner {
                match self {
                    $( Block::$kind(block) => &mut block.inner, )+
                    Block::Unknown(block) => &mut block.inner,
                }
            }

            pub(crate) fn into_raw(self) -> NestedBlock {
                match self {
                    $( Block::$kind(block) => block.inner.raw, )+
                    Block::Unknown(block) => block.inner.raw,
                }
            }
        }

        $(
            $(#[$meta])*
            #[derive(Debug, Clone)]
            pub struct $kind {
                inner: Inner,
            }

            impl BlockEdit for $kind {
                fn raw(&self) -> &NestedBlock {
                    &self.inner.raw
                }

                fn raw_mut(&mut self) -> &mut NestedBlock {
                    self.inner.edited = true;
                    &mut self.inner.raw
                }
            }

            impl BlockKind for $kind {
                fn from_block(block: &Block) -> Option<&Self> {
                    match block {
                        Block::$kind(block) => Some(block),
                        _ => None,
                    }
                }

                fn from_block_mut(block: &mut Block) -> Option<&mut Self> {
                    match block {
                        Block::$kind(block) => Some(block),
                        _ => None,
                    }
                }
            }

            impl From<$kind> for Block {
                fn from(block: $kind) -> Self {
                    Block::$kind(block)
                }
            }
        )+
    };
}

block_kinds! {
    /// `resource "<type>" "<name>" {}`
    Resource("resource", 2);
    /// `data "<type>" "<name>" {}`
    DataSource("data", 2);
    /// `provider "<name>" {}`
    Provider("provider", 1);
    /// `module "<name>" {}`
    Module("module", 1);
    /// `variable "<name>" {}`
    Variable("variable", 1);
    /// `output "<name>" {}`
    Output("output", 1);
    /// `locals {}`
    Locals("locals", 0);
    /// `terraform {}`
    Terraform("terraform", 0);
    /// `moved {}`
    Moved("moved", 0);
}

#[derive(Debug, Clone)]
pub struct Unknown {
    inner: Inner,
}

impl BlockEdit for Unknown {
    fn raw(&self) -> &NestedBlock {
        &self.inner.raw
    }

    fn raw_mut(&mut self) -> &mut NestedBlock {
        self.inner.edited = true;
        &mut self.inner.raw
    }
}

impl BlockEdit for Block {
    fn raw(&self) -> &NestedBlock {
        &self.inner().raw
    }

    fn raw_mut(&mut self) -> &mut NestedBlock {
        let inner = self.inner_mut();
        inner.edited = true;
        &mut inner.raw
    }
}

impl BlockKind for Block {
    fn from_block(block: &Block) -> Option<&Self> {
        Some(block)
    }

    fn from_block_mut(block: &mut Block) -> Option<&mut Self> {
        Some(block)
    }
}

impl Block {
    pub fn downcast<T: BlockKind>(&self) -> Option<&T> {
        T::from_block(self)
    }

    pub fn downcast_mut<T: BlockKind>(&mut self) -> Option<&mut T> {
        T::from_block_mut(self)
    }

    /// First label, empty if there is none
    pub fn schema_type(&self) -> &str {
        self.label(0)
    }

    /// Whether the block was changed since it was parsed
    pub fn is_edited(&self) -> bool {
        self.inner().edited
    }

    /// Address of the block as used in references and in plan output
    pub fn address(&self) -> String {
        match self {
            Block::Resource(resource) => resource.address(),
            Block::DataSource(data_source) => data_source.address(),
            Block::Module(module) => format!("module.{}", module.name()),
            Block::Variable(variable) => format!("var.{}", variable.name()),
            _ => std::iter::once(self.block_type())
                .chain(self.labels())
                .collect::<Vec<_>>()
                .join("."),
        }
    }
}

impl Resource {
    /// Creates an empty `resource "<schema_type>" "<name>"`
    pub fn new(schema_type: &str, name: &str) -> Self {
        Resource {
            inner: Inner::new("resource", &[schema_type, name]),
        }
    }
}

impl Referable for Resource {
    const ADDRESS_PREFIX: &'static str = "";
}

impl DataSource {
    /// Creates an empty `data "<schema_type>" "<name>"`
    pub fn new(schema_type: &str, name: &str) -> Self {
        DataSource {
            inner: Inner::new("data", &[schema_type, name]),
        }
    }
}

impl Referable for DataSource {
    const ADDRESS_PREFIX: &'static str = "data.";
}

impl Provider {
    pub fn name(&self) -> &str {
        self.label(0)
    }
}

impl Module {
    pub fn name(&self) -> &str {
        self.label(0)
    }
}

impl Variable {
    pub fn name(&self) -> &str {
        self.label(0)
    }
}

impl Output {
    pub fn name(&self) -> &str {
        self.label(0)
    }
}
