//! Include directives: the value type consumed by the resolver and the
//! scanner that extracts directives from C/C++ source text.

mod directive;
mod parser;

pub use directive::{ExplicitPath, IncludeDirective, IncludeStyle, NameKind};
pub use parser::{IncludeKeyword, ParsedInclude, parse_includes};
