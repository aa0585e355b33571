//! Adding and removing include directives.
//!
//! [`include_spelling`] is the inverse of resolution: given a header, find
//! the shortest include name that reaches it from an including file. The
//! edit functions turn directives into minimal, non-overlapping text edits.

use std::path::{Component, Path};

use crate::base::{CaseSensitivity, LineIndex, TextRange, TextSize, file_name_matches, normalize};
use crate::project::ScannerConfiguration;
use crate::syntax::{IncludeDirective, IncludeStyle, parse_includes};

/// Replace `range` with `new_text`. An insertion has an empty range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextEdit {
    pub range: TextRange,
    pub new_text: String,
}

impl TextEdit {
    pub fn insert(offset: TextSize, text: impl Into<String>) -> Self {
        Self {
            range: TextRange::empty(offset),
            new_text: text.into(),
        }
    }

    pub fn delete(range: TextRange) -> Self {
        Self {
            range,
            new_text: String::new(),
        }
    }

    /// Apply to `text`. Edits must be sorted and non-overlapping.
    pub fn apply_all(text: &str, edits: &[TextEdit]) -> String {
        let mut out = String::with_capacity(text.len());
        let mut last = 0usize;
        for edit in edits {
            let start = usize::from(edit.range.start());
            out.push_str(&text[last..start]);
            out.push_str(&edit.new_text);
            last = usize::from(edit.range.end());
        }
        out.push_str(&text[last..]);
        out
    }
}

/// Shortest include name reaching `header`.
///
/// The first of [`include_spellings`]. This only looks at path prefixes; a
/// shorter spelling can still resolve to a different header, which
/// [`IncludeHost::add_include`](super::IncludeHost::add_include) checks.
pub fn include_spelling(
    header: &Path,
    owning_file: Option<&Path>,
    config: &ScannerConfiguration,
    case: CaseSensitivity,
) -> Option<IncludeDirective> {
    include_spellings(header, owning_file, config, case)
        .into_iter()
        .next()
}

/// Every include name reaching `header`, shortest first.
///
/// Candidates are the owning file's directory and the local include paths
/// (quoted), then the system include paths (angle brackets). Ties in segment
/// count keep that order. Empty when the header is under none of them.
pub fn include_spellings(
    header: &Path,
    owning_file: Option<&Path>,
    config: &ScannerConfiguration,
    case: CaseSensitivity,
) -> Vec<IncludeDirective> {
    let current = owning_file
        .and_then(Path::parent)
        .map(|dir| (dir, IncludeStyle::Quoted));
    let local = config
        .local_include_paths
        .iter()
        .map(|dir| (dir.as_path(), IncludeStyle::Quoted));
    let system = config
        .system_include_paths
        .iter()
        .map(|dir| (dir.as_path(), IncludeStyle::System));

    let mut candidates: Vec<(Vec<String>, IncludeStyle)> = current
        .into_iter()
        .chain(local)
        .chain(system)
        .filter_map(|(dir, style)| {
            relative_segments(header, dir, case).map(|segments| (segments, style))
        })
        .collect();
    candidates.sort_by_key(|(segments, _)| segments.len());

    let mut spellings: Vec<IncludeDirective> = Vec::with_capacity(candidates.len());
    for (segments, style) in candidates {
        let directive = IncludeDirective::new(segments.join("/"), style);
        if !spellings.contains(&directive) {
            spellings.push(directive);
        }
    }
    spellings
}

/// Segments of `path` below `base`, if `path` is strictly inside it.
fn relative_segments(path: &Path, base: &Path, case: CaseSensitivity) -> Option<Vec<String>> {
    let path = normalize(path);
    let base = normalize(base);
    let mut path_components = path.components();

    for base_component in base.components() {
        let path_component = path_components.next()?;
        let same = match (base_component, path_component) {
            (Component::Normal(a), Component::Normal(b)) => file_name_matches(a, b, case),
            (a, b) => a == b,
        };
        if !same {
            return None;
        }
    }

    let segments: Vec<String> = path_components
        .map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Option<_>>()?;
    (!segments.is_empty()).then_some(segments)
}

/// Edit inserting `directive`, or `None` if the document already has it.
///
/// The new line goes after the last existing include; without includes it
/// goes after an include guard or `#pragma once`, else before the first line
/// that is not a leading comment.
pub fn add_include_edit(source: &str, directive: &IncludeDirective) -> Option<TextEdit> {
    let includes = parse_includes(source);
    let already_present = includes.iter().any(|include| {
        include.directive.name() == directive.name()
            && include.directive.style() == directive.style()
    });
    if already_present {
        return None;
    }

    let line = directive.to_string();
    let offset = match includes.last() {
        Some(last) => line_end(source, last.range.end()),
        None => preamble_end(source),
    };

    let at_unterminated_end =
        usize::from(offset) == source.len() && !source.is_empty() && !source.ends_with('\n');
    let text = if at_unterminated_end {
        format!("\n{line}")
    } else {
        format!("{line}\n")
    };
    Some(TextEdit::insert(offset, text))
}

/// Edits deleting every include of `name` (either style), in document order.
pub fn remove_include_edits(source: &str, name: &str) -> Vec<TextEdit> {
    let index = LineIndex::new(source);
    parse_includes(source)
        .into_iter()
        .filter(|include| include.directive.name() == name)
        .filter_map(|include| {
            let line = index.line_col(include.range.start()).line;
            index.line_range(line).map(TextEdit::delete)
        })
        .collect()
}

/// Offset just past the line terminator of the line containing `offset`.
fn line_end(source: &str, offset: TextSize) -> TextSize {
    let index = LineIndex::new(source);
    let line = index.line_col(offset).line;
    index
        .line_range(line)
        .map_or(TextSize::of(source), |range| range.end())
}

/// Where the first include goes in a document that has none.
fn preamble_end(source: &str) -> TextSize {
    let mut offset = 0usize;
    let mut in_block_comment = false;
    let mut lines = source.split_inclusive('\n').peekable();

    while let Some(raw) = lines.next() {
        let trimmed = raw.trim();
        if in_block_comment {
            in_block_comment = !trimmed.contains("*/");
            offset += raw.len();
            continue;
        }
        if trimmed.is_empty() || trimmed.starts_with("//") {
            offset += raw.len();
            continue;
        }
        if trimmed.starts_with("/*") {
            in_block_comment = !trimmed.contains("*/");
            offset += raw.len();
            continue;
        }
        if directive_is(trimmed, "pragma") && trimmed.split_whitespace().any(|w| w == "once") {
            return TextSize::from((offset + raw.len()) as u32);
        }
        if directive_is(trimmed, "ifndef") {
            let guard_end = offset + raw.len();
            if let Some(next) = lines.peek() {
                if directive_is(next.trim(), "define") {
                    return TextSize::from((guard_end + next.len()) as u32);
                }
            }
        }
        break;
    }

    TextSize::from(offset as u32)
}

fn directive_is(line: &str, keyword: &str) -> bool {
    line.strip_prefix('#')
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix(keyword))
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}
