//! Line-oriented extraction of `#include` directives.
//!
//! This is not a preprocessor: conditionals are not evaluated and macro
//! includes (`#include HEADER`) are skipped. Comments are honored so that
//! commented-out includes are not reported.

use super::directive::{IncludeDirective, IncludeStyle};
use crate::base::{TextRange, TextSize};

/// The directive keyword that introduced an include.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IncludeKeyword {
    Include,
    IncludeNext,
    Import,
}

impl IncludeKeyword {
    fn from_ident(ident: &str) -> Option<Self> {
        match ident {
            "include" => Some(IncludeKeyword::Include),
            "include_next" => Some(IncludeKeyword::IncludeNext),
            "import" => Some(IncludeKeyword::Import),
            _ => None,
        }
    }
}

/// One include found in source text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedInclude {
    pub directive: IncludeDirective,
    pub keyword: IncludeKeyword,
    /// The directive line without its line terminator.
    pub range: TextRange,
    /// The name between the delimiters.
    pub name_range: TextRange,
}

/// Extract every include directive from `text`, in document order.
pub fn parse_includes(text: &str) -> Vec<ParsedInclude> {
    let mut includes = Vec::new();
    let mut in_block_comment = false;
    let mut line_start = 0usize;

    for raw_line in text.split_inclusive('\n') {
        let line = raw_line.trim_end_matches(['\n', '\r']);
        let mut cursor = Cursor::new(line, &mut in_block_comment);

        if let Some((keyword, style, name_start, name_end)) = cursor.directive() {
            let name = &line[name_start..name_end];
            let at = |offset: usize| TextSize::from((line_start + offset) as u32);
            includes.push(ParsedInclude {
                directive: IncludeDirective::new(name, style),
                keyword,
                range: TextRange::new(at(0), at(line.len())),
                name_range: TextRange::new(at(name_start), at(name_end)),
            });
        }
        cursor.finish_line();

        line_start += raw_line.len();
    }

    includes
}

/// Scanning state over one line. Carries the block-comment flag across lines.
struct Cursor<'a, 'b> {
    line: &'a str,
    pos: usize,
    in_block_comment: &'b mut bool,
}

impl<'a, 'b> Cursor<'a, 'b> {
    fn new(line: &'a str, in_block_comment: &'b mut bool) -> Self {
        Self {
            line,
            pos: 0,
            in_block_comment,
        }
    }

    fn rest(&self) -> &'a str {
        &self.line[self.pos..]
    }

    /// Skip whitespace and comments. Returns false at end of line.
    fn skip_trivia(&mut self) -> bool {
        loop {
            if *self.in_block_comment {
                match self.rest().find("*/") {
                    Some(end) => {
                        self.pos += end + 2;
                        *self.in_block_comment = false;
                    }
                    None => {
                        self.pos = self.line.len();
                        return false;
                    }
                }
            }
            let rest = self.rest();
            let trimmed = rest.trim_start_matches([' ', '\t', '\x0c', '\x0b']);
            self.pos += rest.len() - trimmed.len();

            if trimmed.starts_with("/*") {
                self.pos += 2;
                *self.in_block_comment = true;
            } else if trimmed.starts_with("//") || trimmed.is_empty() {
                self.pos = self.line.len();
                return false;
            } else {
                return true;
            }
        }
    }

    fn eat(&mut self, c: char) -> bool {
        if self.rest().starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> &'a str {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn directive(&mut self) -> Option<(IncludeKeyword, IncludeStyle, usize, usize)> {
        if !self.skip_trivia() || !self.eat('#') || !self.skip_trivia() {
            return None;
        }
        let keyword = IncludeKeyword::from_ident(self.ident())?;
        if !self.skip_trivia() {
            return None;
        }
        let (style, close) = if self.eat('"') {
            (IncludeStyle::Quoted, '"')
        } else if self.eat('<') {
            (IncludeStyle::System, '>')
        } else {
            return None;
        };
        let name_start = self.pos;
        let len = self.rest().find(close)?;
        if len == 0 {
            return None;
        }
        self.pos += len + 1;
        Some((keyword, style, name_start, name_start + len))
    }

    /// Consume the remainder so a comment opened after code is tracked.
    fn finish_line(&mut self) {
        while self.skip_trivia() {
            let rest = self.rest();
            if let Some(body) = rest.strip_prefix(['"', '\'']) {
                let quote = &rest[..1];
                self.pos += 1 + body.find(quote).map_or(body.len(), |end| end + 1);
                continue;
            }
            let step = rest
                .find(['"', '\'', '/', ' ', '\t'])
                .filter(|&i| i > 0)
                .unwrap_or_else(|| rest.chars().next().map_or(1, char::len_utf8));
            self.pos += step;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(text: &str) -> Vec<String> {
        parse_includes(text)
            .into_iter()
            .map(|inc| inc.directive.to_string())
            .collect()
    }

    #[test]
    fn test_both_styles_with_ranges() {
        let text = "#include <vector>\n  #  include \"foo.h\"\r\nint x;\n";
        let includes = parse_includes(text);
        assert_eq!(includes.len(), 2);

        assert!(includes[0].directive.is_system());
        assert_eq!(&text[includes[0].name_range], "vector");
        assert_eq!(&text[includes[0].range], "#include <vector>");

        assert_eq!(includes[1].directive.name(), "foo.h");
        assert_eq!(&text[includes[1].range], "  #  include \"foo.h\"");
        assert_eq!(&text[includes[1].name_range], "foo.h");
    }

    #[test]
    fn test_keywords() {
        let includes = parse_includes("#include_next <limits.h>\n#import \"Cocoa.h\"\n#define X 1\n");
        let keywords: Vec<_> = includes.iter().map(|inc| inc.keyword).collect();
        assert_eq!(
            keywords,
            vec![IncludeKeyword::IncludeNext, IncludeKeyword::Import]
        );
    }

    #[test]
    fn test_comments_hide_includes() {
        let text = "\
// #include <hidden1.h>
/* #include <hidden2.h>
#include <hidden3.h> */ #include <after_comment.h>
/* one */ #include <visible.h> /* open
#include <hidden4.h>
*/
#include <last.h> // trailing
";
        assert_eq!(
            names(text),
            vec![
                "#include <after_comment.h>",
                "#include <visible.h>",
                "#include <last.h>",
            ]
        );
    }

    #[test]
    fn test_string_literal_does_not_open_comment() {
        let text = "const char* s = \"/*\";\n#include <real.h>\n";
        assert_eq!(names(text), vec!["#include <real.h>"]);
    }

    #[test]
    fn test_macro_and_malformed_includes_are_skipped() {
        let text = "#include HEADER\n#include <unterminated\n#include \"\"\n#includex <a.h>\n";
        assert!(parse_includes(text).is_empty());
    }
}
