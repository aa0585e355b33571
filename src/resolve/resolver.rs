//! The staged include resolver.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, trace};

use super::fallback::ProjectWalk;
use super::links::substitute_links;
use super::location::{LocationSet, ResolvedLocation};
use crate::base::{Cancellable, CanonicalKey, CaseSensitivity, NeverCancelled, normalize};
use crate::errors::ResolveError;
use crate::project::config::ResolverSection;
use crate::project::{ScannerConfigProvider, ScannerConfiguration, Workspace};
use crate::syntax::{ExplicitPath, IncludeDirective, NameKind};

/// Knobs injected at construction instead of read from the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Applied to every path comparison and deduplication.
    pub case_sensitivity: CaseSensitivity,
    /// Walk the owning project when nothing else matched.
    pub project_fallback: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            case_sensitivity: CaseSensitivity::host(),
            project_fallback: true,
        }
    }
}

impl From<&ResolverSection> for ResolverOptions {
    fn from(section: &ResolverSection) -> Self {
        Self {
            case_sensitivity: section.case_sensitivity.effective(),
            project_fallback: section.effective_project_fallback(),
        }
    }
}

/// One unit of work for [`IncludeResolver::resolve_all`].
#[derive(Clone, Debug)]
pub struct ResolveRequest {
    pub directive: IncludeDirective,
    pub owning_file: Option<PathBuf>,
    pub config: Option<Arc<ScannerConfiguration>>,
}

/// Resolves include directives against a [`Workspace`].
///
/// Stateless between calls: the same inputs over an unchanged workspace give
/// the same ordered output. Safe to share across threads.
#[derive(Debug, Clone)]
pub struct IncludeResolver<W> {
    workspace: W,
    options: ResolverOptions,
}

impl<W: Workspace> IncludeResolver<W> {
    pub fn new(workspace: W) -> Self {
        Self::with_options(workspace, ResolverOptions::default())
    }

    pub fn with_options(workspace: W, options: ResolverOptions) -> Self {
        Self { workspace, options }
    }

    pub fn workspace(&self) -> &W {
        &self.workspace
    }

    pub fn options(&self) -> ResolverOptions {
        self.options
    }

    /// Resolve one directive.
    ///
    /// `owning_file` is the including file; it supplies the current
    /// directory and the project for the fallback walk. `config` is `None`
    /// when no scanner configuration could be obtained.
    pub fn resolve(
        &self,
        directive: &IncludeDirective,
        owning_file: Option<&Path>,
        config: Option<&ScannerConfiguration>,
    ) -> Result<Vec<ResolvedLocation>, ResolveError> {
        self.resolve_cancellable(directive, owning_file, config, &NeverCancelled)
    }

    /// Like [`resolve`](Self::resolve), fetching the configuration for
    /// `owning_file` from `provider`.
    pub fn resolve_in<P: ScannerConfigProvider + ?Sized>(
        &self,
        directive: &IncludeDirective,
        owning_file: &Path,
        provider: &P,
    ) -> Result<Vec<ResolvedLocation>, ResolveError> {
        let config = provider.scanner_config(owning_file);
        self.resolve(directive, Some(owning_file), config.as_deref())
    }

    /// Like [`resolve`](Self::resolve), checking `cancel` between
    /// configured directories and between resources of the project walk.
    pub fn resolve_cancellable(
        &self,
        directive: &IncludeDirective,
        owning_file: Option<&Path>,
        config: Option<&ScannerConfiguration>,
        cancel: &dyn Cancellable,
    ) -> Result<Vec<ResolvedLocation>, ResolveError> {
        let _span = tracing::debug_span!("resolve_include", include = %directive).entered();

        if let Some(hit) = self.resolve_explicit(directive)? {
            debug!(stage = "explicit", location = %hit, "include resolved");
            return Ok(vec![hit]);
        }

        match config {
            Some(config) => {
                let found = self.resolve_configured(directive, owning_file, config, cancel)?;
                if !found.is_empty() {
                    debug!(stage = "configured", count = found.len(), "include resolved");
                    return Ok(found);
                }
            }
            None => debug!("no scanner configuration, skipping search paths"),
        }

        if let Some(hit) = self.resolve_in_project(directive, owning_file, cancel)? {
            debug!(stage = "project", location = %hit, "include resolved");
            return Ok(vec![hit]);
        }

        debug!("include not found");
        Ok(Vec::new())
    }

    /// Resolve a batch in parallel. Output order matches `requests`.
    pub fn resolve_all(
        &self,
        requests: &[ResolveRequest],
    ) -> Vec<Result<Vec<ResolvedLocation>, ResolveError>> {
        requests
            .par_iter()
            .map(|request| {
                self.resolve(
                    &request.directive,
                    request.owning_file.as_deref(),
                    request.config.as_deref(),
                )
            })
            .collect()
    }

    // ------------------------------------------------------------------------
    // Stages
    // ------------------------------------------------------------------------

    fn resolve_explicit(
        &self,
        directive: &IncludeDirective,
    ) -> Result<Option<ResolvedLocation>, ResolveError> {
        let location = match directive.explicit_path() {
            None => return Ok(None),
            Some(ExplicitPath::Absolute(path)) => normalize(path),
            Some(ExplicitPath::Unc(unc)) => {
                let mapped = self
                    .workspace
                    .resolve_unc(unc)
                    .map_err(|e| ResolveError::workspace(unc.as_str(), e))?;
                match mapped {
                    Some(path) => path,
                    None => return Ok(None),
                }
            }
        };
        if self.is_file(&location)? {
            Ok(Some(ResolvedLocation::File(location)))
        } else {
            trace!(path = %location.display(), "explicit path is stale");
            Ok(None)
        }
    }

    fn resolve_configured(
        &self,
        directive: &IncludeDirective,
        owning_file: Option<&Path>,
        config: &ScannerConfiguration,
        cancel: &dyn Cancellable,
    ) -> Result<Vec<ResolvedLocation>, ResolveError> {
        let name = directive.name();

        if directive.name_kind() == NameKind::Absolute {
            // Joining an absolute name onto a search directory yields the
            // name itself, so the search lists cannot add anything.
            let path = normalize(Path::new(name));
            return Ok(if self.is_file(&path)? {
                vec![ResolvedLocation::File(path)]
            } else {
                Vec::new()
            });
        }

        let mut found = LocationSet::new();

        if !directive.is_system() {
            if let Some(dir) = owning_file.and_then(Path::parent) {
                let candidate = normalize(&dir.join(name));
                if self.is_file(&candidate)? {
                    trace!(path = %candidate.display(), "found in current directory");
                    self.add_hit(&mut found, candidate)?;
                    return Ok(found.into_vec());
                }
            }

            self.search_dirs(&config.local_include_paths, name, &mut found, cancel)?;
            if !found.is_empty() {
                return Ok(found.into_vec());
            }
        }

        self.search_dirs(&config.system_include_paths, name, &mut found, cancel)?;
        Ok(found.into_vec())
    }

    fn resolve_in_project(
        &self,
        directive: &IncludeDirective,
        owning_file: Option<&Path>,
        cancel: &dyn Cancellable,
    ) -> Result<Option<ResolvedLocation>, ResolveError> {
        if !self.options.project_fallback {
            return Ok(None);
        }
        let Some(root) = owning_file.and_then(|file| self.workspace.project_of(file)) else {
            return Ok(None);
        };
        trace!(project = %root.display(), "walking project");
        let hit = ProjectWalk::new(
            &self.workspace,
            directive.last_segment(),
            self.options.case_sensitivity,
            cancel,
        )
        .find(&root)?;
        Ok(hit.map(ResolvedLocation::File))
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    /// Every existing `dir/name`, in configured order.
    fn search_dirs(
        &self,
        dirs: &[PathBuf],
        name: &str,
        found: &mut LocationSet,
        cancel: &dyn Cancellable,
    ) -> Result<(), ResolveError> {
        for dir in dirs {
            if cancel.is_cancelled() {
                return Err(ResolveError::Cancelled);
            }
            let candidate = normalize(&dir.join(name));
            if self.is_file(&candidate)? {
                trace!(path = %candidate.display(), "found on search path");
                self.add_hit(found, candidate)?;
            }
        }
        Ok(())
    }

    /// Record a raw hit unless its physical file was already reported,
    /// possibly under a linked alias or through a symlinked directory.
    fn add_hit(&self, found: &mut LocationSet, raw: PathBuf) -> Result<(), ResolveError> {
        let physical = self.canonical_key(&raw);
        if found.has_physical(&physical) {
            trace!(path = %raw.display(), "physical file already reported");
            return Ok(());
        }
        for location in substitute_links(&self.workspace, raw)? {
            let key = self.canonical_key(location.path());
            found.insert(key, location);
        }
        found.mark_physical(physical);
        Ok(())
    }

    /// Only files are hits; a folder named like the header is skipped.
    fn is_file(&self, path: &Path) -> Result<bool, ResolveError> {
        self.workspace
            .is_file(path)
            .map_err(|e| ResolveError::workspace(path, e))
    }

    fn canonical_key(&self, path: &Path) -> CanonicalKey {
        CanonicalKey::new(
            &self.workspace.canonicalize(path),
            self.options.case_sensitivity,
        )
    }
}
