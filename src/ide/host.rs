//! `IncludeHost`: open documents plus the resolver and configurations.

use std::path::Path;
use std::sync::Arc;

use crate::base::{CanonicalKey, CaseSensitivity, FileId, FileSet, TextSize};
use crate::errors::ResolveError;
use crate::project::{ScannerConfigProvider, ScannerConfiguration, Workspace};
use crate::resolve::{IncludeResolver, ResolvedLocation};
use crate::syntax::{IncludeDirective, ParsedInclude, parse_includes};

use super::add_include::{self, TextEdit};
use super::chooser::HeaderChooser;
use super::diagnostics::{self, Diagnostic};
use super::goto;
use super::include_links::{self, IncludeLink};

/// Entry point for editor requests about includes.
///
/// Documents are registered with [`set_file_content`](Self::set_file_content);
/// every request re-parses and re-resolves, nothing is cached here.
pub struct IncludeHost<W, P> {
    resolver: IncludeResolver<W>,
    configs: P,
    files: FileSet,
}

impl<W: Workspace, P: ScannerConfigProvider> IncludeHost<W, P> {
    pub fn new(resolver: IncludeResolver<W>, configs: P) -> Self {
        Self {
            resolver,
            configs,
            files: FileSet::new(),
        }
    }

    pub fn set_file_content(&self, path: impl AsRef<Path>, text: impl Into<Arc<str>>) -> FileId {
        let file = self.files.file_id(path.as_ref());
        self.files.set_contents(file, text);
        file
    }

    pub fn remove_file(&self, file: FileId) {
        self.files.remove(file);
    }

    pub fn files(&self) -> &FileSet {
        &self.files
    }

    pub fn resolver(&self) -> &IncludeResolver<W> {
        &self.resolver
    }

    pub fn configs(&self) -> &P {
        &self.configs
    }

    /// Configuration for a registered document.
    pub fn scanner_config(&self, file: FileId) -> Option<Arc<ScannerConfiguration>> {
        let path = self.files.path(file)?;
        self.configs.scanner_config(&path)
    }

    /// Includes of a registered document, in document order.
    pub fn includes(&self, file: FileId) -> Vec<ParsedInclude> {
        self.files
            .contents(file)
            .map(|text| parse_includes(&text))
            .unwrap_or_default()
    }

    /// Resolve a directive as written in `file`.
    pub fn resolve(
        &self,
        file: FileId,
        directive: &IncludeDirective,
    ) -> Result<Vec<ResolvedLocation>, ResolveError> {
        match self.files.path(file) {
            Some(path) => self.resolver.resolve_in(directive, &path, &self.configs),
            None => self.resolver.resolve(directive, None, None),
        }
    }

    pub fn include_links(&self, file: FileId) -> Result<Vec<IncludeLink>, ResolveError> {
        include_links::include_links(self, file)
    }

    pub fn goto_include(
        &self,
        file: FileId,
        offset: TextSize,
        chooser: &dyn HeaderChooser,
    ) -> Result<Option<ResolvedLocation>, ResolveError> {
        goto::goto_include(self, file, offset, chooser)
    }

    pub fn diagnostics(&self, file: FileId) -> Vec<Diagnostic> {
        diagnostics::include_diagnostics(self, file)
    }

    /// Edit adding an include of `header` to `file`, spelled the shortest
    /// way that resolves back to `header` from that file.
    pub fn add_include(&self, file: FileId, header: &Path) -> Option<TextEdit> {
        let path = self.files.path(file)?;
        let text = self.files.contents(file)?;
        let config = self.configs.scanner_config(&path).unwrap_or_default();
        let case = self.resolver.options().case_sensitivity;
        let target = self.physical_key(header, case);

        let directive = add_include::include_spellings(header, Some(path.as_path()), &config, case)
            .into_iter()
            .find(|directive| match self.resolve(file, directive) {
                Ok(found) => found.first().is_some_and(|first| {
                    [first.path(), first.physical()]
                        .into_iter()
                        .any(|reached| self.physical_key(reached, case) == target)
                }),
                Err(err) => {
                    tracing::debug!(name = directive.name(), %err, "spelling does not resolve");
                    false
                }
            })?;
        add_include::add_include_edit(&text, &directive)
    }

    fn physical_key(&self, path: &Path, case: CaseSensitivity) -> CanonicalKey {
        CanonicalKey::new(&self.resolver.workspace().canonicalize(path), case)
    }
}
