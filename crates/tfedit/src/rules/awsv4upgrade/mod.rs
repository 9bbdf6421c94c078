//! upgrade to version 4 of the AWS provider
//!
//! Version 4 split most arguments of `aws_s3_bucket` into separate resources. Each rule moves one
//! argument or nested block of every `aws_s3_bucket` into a new resource, see [crate::split].
//!
//! <https://registry.terraform.io/providers/hashicorp/aws/latest/docs/guides/version-4-upgrade>
mod grant;
mod lifecycle_rule;
mod object_lock_configuration;
mod provider_aws;
mod replication_configuration;
mod s3_bucket;
mod versioning;
mod website;

pub use lifecycle_rule::EmptyFilterPolicy;
pub use provider_aws::ProviderAwsFilter;
pub use s3_bucket::S3BucketFilter;

use crate::filter::MultiFilter;

/// All rules of the upgrade: provider arguments first, then buckets
pub fn all_filter() -> MultiFilter {
    MultiFilter::new(vec![
        Box::new(ProviderAwsFilter::new()),
        Box::new(S3BucketFilter::new(EmptyFilterPolicy::default())),
    ])
}

#[cfg(test)]
pub(crate) mod test {
    use crate::block::{BlockEdit, Resource};
    use crate::document::Document;
    use crate::filter::{typed, Filter, FilterError};
    use pretty_assertions::assert_eq;

    /// Runs `rule` on every `aws_s3_bucket` in `src`, then formats the bucket
    pub(crate) fn apply_bucket_rule<F>(rule: F, src: &str) -> String
    where
        F: Fn(&mut Document, &mut Resource) -> Result<(), FilterError> + 'static,
    {
        let mut document = Document::parse(src).unwrap();
        crate::filter::filter_blocks_by_type(
            &mut document,
            Some("resource"),
            Some("aws_s3_bucket"),
            &typed(move |document: &mut Document, resource: &mut Resource| {
                rule(document, resource)?;
                resource.vertical_format();
                Ok(())
            }),
        )
        .unwrap();
        document.to_string()
    }

    /// Compares two configurations structurally, ignoring comments and layout
    #[track_caller]
    pub(crate) fn assert_same_configuration(actual: &str, expected: &str) {
        let parse = |src: &str| match hcl::parse(src) {
            Ok(body) => body,
            Err(err) => panic!("invalid configuration ({err}):\n{src}"),
        };
        assert_eq!(parse(actual), parse(expected), "actual:\n{actual}");
    }

    #[test]
    fn all_rules_are_idempotent() {
        let src = r#"
provider "aws" {
  region              = "ap-northeast-1"
  s3_force_path_style = true
}

resource "aws_s3_bucket" "example" {
  count  = 2
  bucket = "tfedit-test-${count.index}"
  acl    = "private"

  versioning {
    enabled = true
  }

  logging {
    target_bucket = "tfedit-log"
    target_prefix = "log/"
  }

  lifecycle_rule {
    id      = "log"
    enabled = true
    prefix  = "log/"

    expiration {
      days = 90
    }
  }

  website {
    index_document = "index.html"
  }
}
"#;

        let mut document = Document::parse(src).unwrap();
        super::all_filter().filter(&mut document).unwrap();
        let once = document.to_string();

        let mut document = Document::parse(&once).unwrap();
        super::all_filter().filter(&mut document).unwrap();
        assert_eq!(document.to_string(), once);

        assert_same_configuration(
            &once,
            r#"
provider "aws" {
  region            = "ap-northeast-1"
  s3_use_path_style = true
}

resource "aws_s3_bucket" "example" {
  count  = 2
  bucket = "tfedit-test-${count.index}"
}

resource "aws_s3_bucket_acl" "example" {
  count  = 2
  bucket = aws_s3_bucket.example[count.index].id
  acl    = "private"
}

resource "aws_s3_bucket_lifecycle_configuration" "example" {
  count  = 2
  bucket = aws_s3_bucket.example[count.index].id

  rule {
    id = "log"

    expiration {
      days = 90
    }

    status = "Enabled"

    filter {
      prefix = "log/"
    }
  }
}

resource "aws_s3_bucket_logging" "example" {
  count         = 2
  bucket        = aws_s3_bucket.example[count.index].id
  target_bucket = "tfedit-log"
  target_prefix = "log/"
}

resource "aws_s3_bucket_versioning" "example" {
  count  = 2
  bucket = aws_s3_bucket.example[count.index].id

  versioning_configuration {
    status = "Enabled"
  }
}

resource "aws_s3_bucket_website_configuration" "example" {
  count  = 2
  bucket = aws_s3_bucket.example[count.index].id

  index_document {
    suffix = "index.html"
  }
}
"#,
        );
    }
}
