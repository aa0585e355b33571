//! Foundation types for the include toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`FileId`], [`FileSet`] - Identifiers and contents of open documents
//! - [`TextRange`], [`TextSize`] - Source positions
//! - [`LineCol`], [`LineIndex`] - Line/column conversion
//! - [`CanonicalKey`], [`CaseSensitivity`] - Path comparison
//! - [`Cancellable`], [`CancellationToken`] - Cooperative cancellation
//!
//! This module has NO dependencies on other cinclude modules.

mod cancel;
mod file_id;
mod file_set;
mod path;
mod span;

pub use cancel::{Cancellable, CancellationToken, NeverCancelled};
pub use file_id::FileId;
pub use file_set::FileSet;
pub use path::{CanonicalKey, CaseSensitivity, file_name_matches, normalize};
pub use span::{LineCol, LineIndex, TextRange, TextSize};

// Re-export text-size types for convenience
pub use text_size;
