//! The `IncludeDirective` value type.

use std::fmt;
use std::path::{Path, PathBuf};

use smol_str::SmolStr;

/// Quoting style of an include.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IncludeStyle {
    /// `#include "name"`: current directory and local paths first.
    Quoted,
    /// `#include <name>`: system paths only.
    System,
}

/// Shape of the included name, decided once at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NameKind {
    Relative,
    Absolute,
}

/// A location recorded by an earlier parse of the including file.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExplicitPath {
    Absolute(PathBuf),
    /// `//server/share/...` or `\\server\share\...`, resolved through the
    /// workspace store.
    Unc(SmolStr),
}

impl ExplicitPath {
    /// Classify a raw recorded path. Relative paths carry no location and
    /// yield `None`.
    pub fn classify(raw: &str) -> Option<Self> {
        if raw.starts_with("//") || raw.starts_with("\\\\") {
            Some(ExplicitPath::Unc(SmolStr::new(raw)))
        } else if Path::new(raw).is_absolute() {
            Some(ExplicitPath::Absolute(PathBuf::from(raw)))
        } else {
            None
        }
    }
}

/// The payload of one `#include` statement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IncludeDirective {
    name: SmolStr,
    style: IncludeStyle,
    kind: NameKind,
    explicit: Option<ExplicitPath>,
}

impl IncludeDirective {
    pub fn new(name: impl Into<SmolStr>, style: IncludeStyle) -> Self {
        let name = name.into();
        let kind = if Path::new(name.as_str()).is_absolute() {
            NameKind::Absolute
        } else {
            NameKind::Relative
        };
        Self {
            name,
            style,
            kind,
            explicit: None,
        }
    }

    /// `#include "name"`
    pub fn quoted(name: impl Into<SmolStr>) -> Self {
        Self::new(name, IncludeStyle::Quoted)
    }

    /// `#include <name>`
    pub fn system(name: impl Into<SmolStr>) -> Self {
        Self::new(name, IncludeStyle::System)
    }

    /// Attach the location an index recorded for this include. Relative
    /// paths are dropped.
    pub fn with_explicit_path(mut self, raw: &str) -> Self {
        self.explicit = ExplicitPath::classify(raw);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn style(&self) -> IncludeStyle {
        self.style
    }

    pub fn is_system(&self) -> bool {
        self.style == IncludeStyle::System
    }

    pub fn name_kind(&self) -> NameKind {
        self.kind
    }

    pub fn explicit_path(&self) -> Option<&ExplicitPath> {
        self.explicit.as_ref()
    }

    /// The last path segment of the name, e.g. `types.h` for `sys/types.h`.
    pub fn last_segment(&self) -> &str {
        self.name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.name.as_str())
    }
}

impl fmt::Display for IncludeDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.style {
            IncludeStyle::Quoted => write!(f, "#include \"{}\"", self.name),
            IncludeStyle::System => write!(f, "#include <{}>", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_kind_is_classified_once() {
        assert_eq!(
            IncludeDirective::quoted("foo.h").name_kind(),
            NameKind::Relative
        );
        assert_eq!(
            IncludeDirective::system("/abs/path/foo.h").name_kind(),
            NameKind::Absolute
        );
    }

    #[test]
    fn test_explicit_path_classification() {
        assert_eq!(
            ExplicitPath::classify("//server/share/foo.h"),
            Some(ExplicitPath::Unc("//server/share/foo.h".into()))
        );
        assert_eq!(
            ExplicitPath::classify("\\\\server\\share\\foo.h"),
            Some(ExplicitPath::Unc("\\\\server\\share\\foo.h".into()))
        );
        assert_eq!(
            ExplicitPath::classify("/usr/include/stdio.h"),
            Some(ExplicitPath::Absolute(PathBuf::from("/usr/include/stdio.h")))
        );
        assert_eq!(ExplicitPath::classify("include/stdio.h"), None);

        let directive = IncludeDirective::quoted("foo.h").with_explicit_path("rel/foo.h");
        assert!(directive.explicit_path().is_none());
    }

    #[test]
    fn test_last_segment_and_display() {
        let directive = IncludeDirective::system("sys/types.h");
        assert_eq!(directive.last_segment(), "types.h");
        assert_eq!(directive.to_string(), "#include <sys/types.h>");

        let directive = IncludeDirective::quoted("win\\shim.h");
        assert_eq!(directive.last_segment(), "shim.h");
        assert_eq!(directive.to_string(), "#include \"win\\shim.h\"");
    }
}
