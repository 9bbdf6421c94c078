//! named rule sets
pub mod awsv4upgrade;

use crate::filter::{Filter, FilterError};

/// Names accepted by [filter_by_type]
pub const FILTER_TYPES: [&str; 1] = ["awsv4upgrade"];

/// Returns the rule set registered as `filter_type`
pub fn filter_by_type(filter_type: &str) -> Result<Box<dyn Filter>, FilterError> {
    match filter_type {
        "awsv4upgrade" => Ok(Box::new(awsv4upgrade::all_filter())),
        _ => Err(FilterError::UnknownFilterType(filter_type.to_owned())),
    }
}
