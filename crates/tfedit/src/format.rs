//! blank-line and indentation layout
//!
//! [vertical_format] canonicalizes the blank lines of a body after structural edits.
//! [layout] fixes indentation and `=` alignment of edited blocks right before they are printed,
//! since moved and newly created nodes carry the indentation of wherever they came from (or none).
use crate::decor::{self, Gap};
use hcl_edit::structure::{Block, Body, Structure};
use hcl_edit::Decorate;

const INDENT: &str = "  ";

/// Runs `f` on each structure of `body` in order
pub(crate) fn for_each_structure_mut(body: &mut Body, mut f: impl FnMut(usize, &mut Structure)) {
    for index in 0..body.len() {
        let mut structure = body.remove(index);
        f(index, &mut structure);
        body.insert(index, structure);
    }
}

/// Canonical vertical layout of a body
///
/// - no blank lines at the start or end of the body
/// - exactly one blank line before and after each nested block
/// - at most one blank line between attributes (existing groups are kept)
///
/// Bodies of nested blocks only get their blank-line runs shortened to a single line.
#[tracing::instrument(level = "trace", skip_all)]
pub fn vertical_format(body: &mut Body) {
    let is_block: Vec<bool> = body
        .iter()
        .map(|structure| matches!(structure, Structure::Block(_)))
        .collect();

    for_each_structure_mut(body, |index, structure| {
        let decor = decor::structure_decor_mut(structure);
        let mut gap = Gap::parse(decor::prefix(decor));

        let blank_lines = match index {
            0 => 0,
            _ if is_block[index] || is_block[index - 1] => 1,
            _ => gap.leading_blank_lines().min(1),
        };
        gap.collapse_blank_lines();
        gap.set_leading_blank_lines(blank_lines);
        decor.set_prefix(gap.to_string());

        if let Structure::Block(block) = structure {
            collapse_blank_lines(&mut block.body);
        }
    });

    let mut gap = Gap::parse(decor::suffix(body.decor()));
    gap.collapse_blank_lines();
    gap.set_leading_blank_lines(0);
    gap.trim_trailing_blank_lines();
    body.decor_mut().set_suffix(gap.to_string());
}

fn collapse_blank_lines(body: &mut Body) {
    for_each_structure_mut(body, |_, structure| {
        let decor = decor::structure_decor_mut(structure);
        let mut gap = Gap::parse(decor::prefix(decor));
        gap.collapse_blank_lines();
        decor.set_prefix(gap.to_string());

        if let Structure::Block(block) = structure {
            collapse_blank_lines(&mut block.body);
        }
    });

    let mut gap = Gap::parse(decor::suffix(body.decor()));
    gap.collapse_blank_lines();
    body.decor_mut().set_suffix(gap.to_string());
}

/// Indents `block` for the nesting `depth` and aligns the `=` of consecutive attributes
///
/// Blank lines at the start of a body are removed, all others are kept. Empty bodies without
/// comments are collapsed to `{}`.
pub(crate) fn layout(block: &mut Block, depth: usize) {
    let mut gap = Gap::parse(decor::prefix(block.decor()));
    gap.reindent(&INDENT.repeat(depth));
    block.decor_mut().set_prefix(gap.to_string());

    layout_body(&mut block.body, depth + 1);
}

fn layout_body(body: &mut Body, depth: usize) {
    let mut gap = Gap::parse(decor::suffix(body.decor()));
    if body.is_empty() && !gap.has_comments() && decor::prefix(body.decor()).trim().is_empty() {
        // `{}`
        body.set_prefer_oneline(true);
        body.decor_mut().clear();
        return;
    }
    body.set_prefer_oneline(false);

    let indent = INDENT.repeat(depth);
    for_each_structure_mut(body, |index, structure| {
        if index == 0 {
            let decor = decor::structure_decor_mut(structure);
            let mut gap = Gap::parse(decor::prefix(decor));
            gap.set_leading_blank_lines(0);
            decor.set_prefix(gap.to_string());
        }

        match structure {
            Structure::Block(block) => layout(block, depth),
            Structure::Attribute(attribute) => {
                let mut gap = Gap::parse(decor::prefix(attribute.decor()));
                gap.reindent(&indent);
                attribute.decor_mut().set_prefix(gap.to_string());
            }
        }
    });

    gap.reindent(&indent);
    gap.set_indent(&INDENT.repeat(depth - 1));
    body.decor_mut().set_suffix(gap.to_string());

    align_attributes(body);
}

/// Pads attribute keys so the `=` of single-line attributes on consecutive lines line up
fn align_attributes(body: &mut Body) {
    // (key width, whether the attribute starts a new group); None for blocks and multi-line values
    let widths: Vec<Option<(usize, bool)>> = body
        .iter()
        .map(|structure| match structure {
            Structure::Attribute(attribute) if !attribute.value.to_string().contains('\n') => {
                let gap = Gap::parse(decor::prefix(attribute.decor()));
                let starts_group = gap.leading_blank_lines() > 0 || gap.has_comments();
                Some((attribute.key.value().as_str().len(), starts_group))
            }
            _ => None,
        })
        .collect();

    let mut column = vec![0; widths.len()];
    let mut start = 0;
    while start < widths.len() {
        let mut end = start + 1;
        if widths[start].is_some() {
            while matches!(widths.get(end), Some(Some((_, false)))) {
                end += 1;
            }
        }

        let width = widths[start..end]
            .iter()
            .flatten()
            .map(|(width, _)| *width)
            .max()
            .unwrap_or_default();
        column[start..end].fill(width);
        start = end;
    }

    for_each_structure_mut(body, |index, structure| {
        let Structure::Attribute(attribute) = structure else {
            return;
        };

        let key_width = attribute.key.value().as_str().len();
        let padding = column[index].saturating_sub(key_width) + 1;
        attribute.key.decor_mut().set_suffix(" ".repeat(padding));
        attribute.value.decor_mut().set_prefix(" ");
    });
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    // hcl-edit 0.7 has no `Display` for `Block`; render it as the sole structure of a body.
    fn render(block: &Block) -> String {
        let mut body = Body::new();
        body.push(block.clone());
        body.set_prefer_omit_trailing_newline(true);
        body.to_string()
    }

    fn first_block(src: &str) -> Block {
        let body = hcl_edit::parser::parse_body(src).unwrap();
        body.into_iter()
            .find_map(|structure| match structure {
                Structure::Block(block) => Some(block),
                Structure::Attribute(_) => None,
            })
            .unwrap()
    }

    fn blank_lines_before(body: &Body) -> Vec<usize> {
        body.iter()
            .map(|structure| {
                Gap::parse(decor::prefix(decor::structure_decor(structure))).leading_blank_lines()
            })
            .collect()
    }

    #[test]
    fn vertical_format_irregular_blank_lines() {
        let mut block = first_block(
            r#"resource "aws_s3_bucket" "example" {


  bucket = "tfedit-test"
  nested {
    value = 1
  }


  nested {
    value = 2
  }



  nested {


    value = 3
  }

}
"#,
        );

        vertical_format(&mut block.body);
        assert_eq!(blank_lines_before(&block.body), vec![0, 1, 1, 1]);

        let formatted = render(&block);
        assert!(!formatted.contains("\n\n\n"), "{formatted}");
        assert!(formatted.ends_with("  }\n}"), "{formatted}");

        let mut again = block.clone();
        vertical_format(&mut again.body);
        assert_eq!(render(&again), formatted);
    }

    #[test]
    fn vertical_format_keeps_attribute_groups_and_comments() {
        let mut block = first_block(
            r#"provider "aws" {
  region = "us-east-1"
  alias  = "east"



  # credentials
  profile = "default"
}
"#,
        );

        vertical_format(&mut block.body);
        assert_eq!(blank_lines_before(&block.body), vec![0, 0, 1]);
        assert!(render(&block).contains("\n\n  # credentials\n  profile"));
    }

    #[test]
    fn layout_reindents_and_aligns() {
        let mut block = first_block(
            r#"resource "aws_s3_bucket_acl" "example" {
count = 2
        bucket = aws_s3_bucket.example[count.index].id
# comment
acl = "private"
}
"#,
        );

        layout(&mut block, 0);
        assert_eq!(
            render(&block),
            r#"resource "aws_s3_bucket_acl" "example" {
  count  = 2
  bucket = aws_s3_bucket.example[count.index].id
  # comment
  acl = "private"
}"#
        );
    }

    #[test]
    fn layout_empty_bodies() {
        let mut block = first_block(
            r#"resource "aws_s3_bucket_lifecycle_configuration" "example" {
bucket = aws_s3_bucket.example.id
rule {
status = "Enabled"
filter {
}
}
rule {
filter {
# empty on purpose
}
}
}
"#,
        );

        layout(&mut block, 0);
        assert_eq!(
            render(&block),
            r#"resource "aws_s3_bucket_lifecycle_configuration" "example" {
  bucket = aws_s3_bucket.example.id
  rule {
    status = "Enabled"
    filter {}
  }
  rule {
    filter {
      # empty on purpose
    }
  }
}"#
        );
    }

    #[test]
    fn layout_new_empty_block() {
        let mut block = first_block("rule {\n  status = \"Enabled\"\n}\n");
        block.body.push(crate::block::nested_block("filter"));

        layout(&mut block, 0);
        assert_eq!(
            render(&block),
            "rule {\n  status = \"Enabled\"\n  filter {}\n}"
        );
    }
}
