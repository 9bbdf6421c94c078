//! line based view of whitespace and comment decor
//!
//! The parser attaches everything between two structures (blank lines, comments and the
//! indentation in front of the next structure) to the prefix of the following structure.
//! Whatever follows the last structure of a body ends up in the suffix of that body.
//!
//! [Gap] splits such a string into full lines and the trailing indentation so blank-line runs can
//! be counted and rewritten without touching the comments in between.
use hcl_edit::structure::Structure;
use hcl_edit::{Decor, Decorate};
use std::fmt;

pub(crate) fn prefix(decor: &Decor) -> &str {
    decor.prefix().map(|raw| &**raw).unwrap_or_default()
}

pub(crate) fn suffix(decor: &Decor) -> &str {
    decor.suffix().map(|raw| &**raw).unwrap_or_default()
}

pub(crate) fn structure_decor(structure: &Structure) -> &Decor {
    match structure {
        Structure::Attribute(attribute) => attribute.decor(),
        Structure::Block(block) => block.decor(),
    }
}

pub(crate) fn structure_decor_mut(structure: &mut Structure) -> &mut Decor {
    match structure {
        Structure::Attribute(attribute) => attribute.decor_mut(),
        Structure::Block(block) => block.decor_mut(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Blank,
    Comment,
    /// inside a `/* ... */` comment that started on an earlier line
    CommentContinuation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Gap {
    lines: Vec<(LineKind, String)>,
    indent: String,
}

impl Gap {
    pub(crate) fn parse(raw: &str) -> Self {
        let mut parts: Vec<&str> = raw.split('\n').collect();
        let indent = parts.pop().unwrap_or_default().to_owned();

        let mut in_block_comment = false;
        let lines = parts
            .into_iter()
            .map(|line| {
                let kind = if in_block_comment {
                    LineKind::CommentContinuation
                } else if line.trim().is_empty() {
                    LineKind::Blank
                } else {
                    LineKind::Comment
                };

                if in_block_comment {
                    in_block_comment = !line.contains("*/");
                } else if let Some(start) = line.rfind("/*") {
                    in_block_comment = !line[start..].contains("*/");
                }

                (kind, line.to_owned())
            })
            .collect();

        Gap { lines, indent }
    }

    pub(crate) fn leading_blank_lines(&self) -> usize {
        self.lines
            .iter()
            .take_while(|(kind, _)| *kind == LineKind::Blank)
            .count()
    }

    pub(crate) fn has_comments(&self) -> bool {
        self.lines.iter().any(|(kind, _)| *kind != LineKind::Blank)
    }

    /// Replaces the blank lines in front of the first comment (or the node) with `count` blank lines
    pub(crate) fn set_leading_blank_lines(&mut self, count: usize) {
        let current = self.leading_blank_lines();
        self.lines.splice(
            0..current,
            std::iter::repeat((LineKind::Blank, String::new())).take(count),
        );
    }

    /// Shortens every run of blank lines to a single blank line
    pub(crate) fn collapse_blank_lines(&mut self) {
        let mut previous_blank = false;
        self.lines.retain(|(kind, _)| {
            let blank = *kind == LineKind::Blank;
            let keep = !(blank && previous_blank);
            previous_blank = blank;
            keep
        });
    }

    /// Removes blank lines after the last comment
    pub(crate) fn trim_trailing_blank_lines(&mut self) {
        while matches!(self.lines.last(), Some((LineKind::Blank, _))) {
            self.lines.pop();
        }
    }

    /// Indents comment lines and the node itself with `indent`
    pub(crate) fn reindent(&mut self, indent: &str) {
        for (kind, line) in &mut self.lines {
            match kind {
                LineKind::Blank => line.clear(),
                LineKind::Comment => *line = format!("{indent}{}", line.trim_start()),
                LineKind::CommentContinuation => {}
            }
        }
        self.indent = indent.to_owned();
    }

    /// Indentation of the node following the gap, comment lines are left as they are
    pub(crate) fn set_indent(&mut self, indent: &str) {
        self.indent = indent.to_owned();
    }
}

impl fmt::Display for Gap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (_, line) in &self.lines {
            writeln!(f, "{line}")?;
        }
        f.write_str(&self.indent)
    }
}
