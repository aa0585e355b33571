//! IDE features: high-level APIs for editor requests about includes.
//!
//! This module sits between the resolver and an editor protocol. Each
//! function corresponds to one request and works on an [`IncludeHost`].
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: Take data in, return data out
//! 2. **No protocol types**: Uses our own types, converted at the boundary
//! 3. **No hidden choice**: Ambiguity is surfaced, a [`HeaderChooser`] decides
//!
//! ## Usage
//!
//! ```ignore
//! use cinclude::ide::{FirstCandidate, IncludeHost};
//!
//! let host = IncludeHost::new(resolver, configs);
//! let file = host.set_file_content("/proj/src/main.c", "#include \"util.h\"\n");
//!
//! let links = host.include_links(file)?;
//! let target = host.goto_include(file, offset, &FirstCandidate)?;
//! ```

mod add_include;
mod chooser;
mod diagnostics;
mod goto;
mod host;
mod include_links;

pub use add_include::{
    TextEdit, add_include_edit, include_spelling, include_spellings, remove_include_edits,
};
pub use chooser::{CachingChooser, FirstCandidate, HeaderChooser, pick_single};
pub use diagnostics::{Diagnostic, RelatedInfo, Severity, codes, include_diagnostics};
pub use goto::goto_include;
pub use host::IncludeHost;
pub use include_links::{IncludeLink, LinkTarget, include_links};
