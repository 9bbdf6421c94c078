//! reference enumeration and prefix based renaming
//!
//! A reference is a traversal rooted in a variable, e.g. `aws_s3_bucket.example.id`.
//! Renaming matches on whole segments: `a.b` matches `a.b.c` and `a.b[0]` but neither `a.bc`
//! nor `aa.b`.
use crate::visit::{VisitTraversals, VisitTraversalsMut};
use hcl_edit::expr::{Expression, Traversal, TraversalOperator};
use hcl_edit::structure::Body;
use hcl_edit::{Decorated, Ident};
use std::collections::BTreeSet;
use std::fmt::Write;

/// Dotted path of identifiers used as the match and replacement of a rename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferencePrefix(Vec<Ident>);

impl ReferencePrefix {
    pub fn parse(path: &str) -> Result<Self, InvalidReferencePrefix> {
        let segments = path
            .split('.')
            .map(|segment| {
                Ident::try_new(segment).map_err(|_| InvalidReferencePrefix(path.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ReferencePrefix(segments))
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(Ident::as_str)
    }
}

impl std::fmt::Display for ReferencePrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.segments().collect::<Vec<_>>().join("."))
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid reference prefix `{0}`")]
pub struct InvalidReferencePrefix(pub String);

/// Returns all references in `body`, sorted and without duplicates
pub fn references(body: &Body) -> Vec<String> {
    let mut found = BTreeSet::new();
    body.visit_traversals(&mut |traversal: &Traversal| {
        if let Some(reference) = traversal.reference() {
            found.insert(reference);
        }
    });
    found.into_iter().collect()
}

/// Whether any reference in `body` starts with `prefix`
pub fn contains_prefix(body: &Body, prefix: &ReferencePrefix) -> bool {
    let mut found = false;
    body.visit_traversals(&mut |traversal: &Traversal| {
        found |= traversal.starts_with(prefix);
    });
    found
}

/// Rewrites every reference in `body` starting with `from` to start with `to` instead
///
/// Returns the number of rewritten references.
#[tracing::instrument(level = "trace", skip(body))]
pub fn rename_references(body: &mut Body, from: &ReferencePrefix, to: &ReferencePrefix) -> usize {
    let mut renamed = 0;
    body.visit_traversals_mut(&mut |traversal: &mut Traversal| {
        if traversal.replace_prefix(from, to) {
            renamed += 1;
        }
    });
    renamed
}

pub(crate) fn rename_references_in_expr(
    expr: &mut Expression,
    from: &ReferencePrefix,
    to: &ReferencePrefix,
) -> usize {
    let mut renamed = 0;
    expr.visit_traversals_mut(&mut |traversal: &mut Traversal| {
        if traversal.replace_prefix(from, to) {
            renamed += 1;
        }
    });
    renamed
}

trait TraversalExt {
    fn get_longest_path(&self) -> Vec<&str>;
    fn starts_with(&self, prefix: &ReferencePrefix) -> bool;
    fn replace_prefix(&mut self, from: &ReferencePrefix, to: &ReferencePrefix) -> bool;
    fn reference(&self) -> Option<String>;
}

impl TraversalExt for Traversal {
    fn get_longest_path(&self) -> Vec<&str> {
        let Expression::Variable(var) = &self.expr else {
            return vec![];
        };

        let mut path = vec![var.value().as_str()];
        for operator in &self.operators {
            let TraversalOperator::GetAttr(ident) = operator.value() else {
                break;
            };

            path.push(ident.value().as_str());
        }

        path
    }

    fn starts_with(&self, prefix: &ReferencePrefix) -> bool {
        let path = self.get_longest_path();
        !prefix.0.is_empty()
            && path.len() >= prefix.0.len()
            && path[..prefix.0.len()].iter().copied().eq(prefix.segments())
    }

    fn replace_prefix(&mut self, from: &ReferencePrefix, to: &ReferencePrefix) -> bool {
        let Some(new_root) = to.0.first() else {
            return false;
        };

        if !self.starts_with(from) {
            return false;
        }

        if let Expression::Variable(var) = &mut self.expr {
            *var.value_mut() = new_root.clone();
        }

        let attributes = to.0[1..].iter().map(|ident| {
            Decorated::new(TraversalOperator::GetAttr(Decorated::new(ident.clone())))
        });
        self.operators.splice(0..from.0.len() - 1, attributes);

        tracing::trace!(traversal = ?self.reference(), "reference renamed");
        true
    }

    fn reference(&self) -> Option<String> {
        let Expression::Variable(var) = &self.expr else {
            return None;
        };

        let mut reference = var.value().to_string();
        for operator in &self.operators {
            // writing into a String never fails
            let _ = match operator.value() {
                TraversalOperator::GetAttr(ident) => write!(reference, ".{}", ident.value()),
                TraversalOperator::Index(expr) => {
                    write!(reference, "[{}]", expr.to_string().trim())
                }
                TraversalOperator::LegacyIndex(index) => write!(reference, ".{}", index.value()),
                TraversalOperator::AttrSplat(_) => write!(reference, ".*"),
                TraversalOperator::FullSplat(_) => write!(reference, "[*]"),
            };
        }

        Some(reference)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn prefix(path: &str) -> ReferencePrefix {
        ReferencePrefix::parse(path).unwrap()
    }

    #[test]
    fn enumerates_sorted_unique_references() {
        let body = hcl_edit::parser::parse_body(
            r#"
bucket = aws_s3_bucket.example[count.index].id
name   = "${var.prefix}-${var.prefix}"
count  = length(var.names)

nested {
  role = aws_iam_role.replication.arn
}
"#,
        )
        .unwrap();

        assert_eq!(
            references(&body),
            vec![
                "aws_iam_role.replication.arn",
                "aws_s3_bucket.example[count.index].id",
                "count.index",
                "var.names",
                "var.prefix",
            ]
        );
    }

    #[test]
    fn renames_on_segment_boundaries() {
        let mut body = hcl_edit::parser::parse_body(
            r#"
a = a.b.c
b = a.bc.c
c = aa.b.c
d = a.b
e = "${a.b[0]}"
f = A.B.c
"#,
        )
        .unwrap();

        let renamed = rename_references(&mut body, &prefix("a.b"), &prefix("x.y"));
        assert_eq!(renamed, 3);

        assert_eq!(
            body.to_string(),
            r#"
a = x.y.c
b = a.bc.c
c = aa.b.c
d = x.y
e = "${x.y[0]}"
f = A.B.c
"#
        );
    }

    #[test]
    fn renames_in_nested_blocks() {
        let mut body = hcl_edit::parser::parse_body(
            r#"
alias {
  name = aws_s3_bucket.example.website_domain
  zone = aws_s3_bucket.example.hosted_zone_id
}
"#,
        )
        .unwrap();

        rename_references(
            &mut body,
            &prefix("aws_s3_bucket.example.website_domain"),
            &prefix("aws_s3_bucket_website_configuration.example.website_domain"),
        );

        assert_eq!(
            references(&body),
            vec![
                "aws_s3_bucket.example.hosted_zone_id",
                "aws_s3_bucket_website_configuration.example.website_domain",
            ]
        );
    }

    #[test]
    fn invalid_prefix() {
        assert!(ReferencePrefix::parse("aws_s3_bucket.my bucket").is_err());
        assert!(ReferencePrefix::parse("").is_err());
    }
}
