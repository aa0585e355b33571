//! Include resolution: from a directive and a scanner configuration to the
//! ordered, deduplicated set of header locations it can refer to.
//!
//! Stages run in a fixed order and the first one with a result wins:
//!
//! 1. the explicit path recorded on the directive,
//! 2. the configured search paths (absolute name, current directory, local
//!    paths, system paths), with linked-resource substitution of every hit,
//! 3. a depth-first walk of the owning project looking for the file name.
//!
//! "Not found" is an empty result. Errors are reserved for searches the
//! workspace could not complete.

mod fallback;
mod links;
mod location;
mod resolver;

pub use location::ResolvedLocation;
pub use resolver::{IncludeResolver, ResolveRequest, ResolverOptions};
