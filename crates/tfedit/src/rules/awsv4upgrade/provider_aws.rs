use crate::block::{Block, BlockEdit, Provider};
use crate::document::Document;
use crate::filter::{self, typed, BlockFilter, Filter, FilterError, MultiBlockFilter};

/// Rules for `provider "aws"` blocks
pub struct ProviderAwsFilter {
    filters: MultiBlockFilter,
}

impl ProviderAwsFilter {
    pub fn new() -> Self {
        ProviderAwsFilter {
            filters: MultiBlockFilter::new(vec![Box::new(typed(s3_force_path_style))]),
        }
    }
}

impl Default for ProviderAwsFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockFilter for ProviderAwsFilter {
    fn block_filter(&self, document: &mut Document, block: &mut Block) -> Result<(), FilterError> {
        let is_aws = block
            .downcast::<Provider>()
            .map_or(false, |provider| provider.name() == "aws");
        if !is_aws {
            return Ok(());
        }

        self.filters.block_filter(document, block)
    }
}

impl Filter for ProviderAwsFilter {
    fn filter(&self, document: &mut Document) -> Result<(), FilterError> {
        filter::filter_blocks_by_type(document, Some("provider"), Some("aws"), self)
    }
}

/// `s3_force_path_style` was renamed to `s3_use_path_style`
fn s3_force_path_style(_: &mut Document, provider: &mut Provider) -> Result<(), FilterError> {
    if provider.rename_attribute("s3_force_path_style", "s3_use_path_style") {
        tracing::debug!("renamed s3_force_path_style");
    }
    Ok(())
}
