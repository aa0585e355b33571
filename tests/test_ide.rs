//! Editor features over an `IncludeHost`.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use cinclude::base::{CaseSensitivity, TextSize};
use cinclude::ide::{
    CachingChooser, FirstCandidate, IncludeHost, Severity, TextEdit, codes, remove_include_edits,
};
use cinclude::project::{MemoryWorkspace, ScannerConfigStore, ScannerConfiguration};
use cinclude::resolve::{IncludeResolver, ResolvedLocation, ResolverOptions};
use rstest::{fixture, rstest};

const MAIN: &str = "/proj/src/main.c";

const SOURCE: &str = "\
#include \"util.h\"
#include <cfg.h>
#include <missing.h>
// #include \"commented.h\"

int main(void) { return 0; }
";

#[fixture]
fn host() -> IncludeHost<MemoryWorkspace, ScannerConfigStore> {
    let ws = MemoryWorkspace::new()
        .with_project("/proj")
        .with_file(MAIN)
        .with_file("/proj/include/util.h")
        .with_file("/opt/a/cfg.h")
        .with_file("/opt/b/cfg.h")
        .with_file("/opt/b/extra.h");
    let resolver = IncludeResolver::with_options(
        ws,
        ResolverOptions {
            case_sensitivity: CaseSensitivity::Sensitive,
            project_fallback: false,
        },
    );
    let configs = ScannerConfigStore::new();
    configs.set_project_config(
        "/proj",
        ScannerConfiguration::new()
            .with_local("/proj/include")
            .with_system("/opt/a")
            .with_system("/opt/b"),
    );
    IncludeHost::new(resolver, configs)
}

fn offset_of(needle: &str) -> TextSize {
    TextSize::from(SOURCE.find(needle).unwrap() as u32)
}

#[rstest]
fn test_include_links(host: IncludeHost<MemoryWorkspace, ScannerConfigStore>) {
    let file = host.set_file_content(MAIN, SOURCE);
    let links = host.include_links(file).unwrap();

    // missing.h and the commented-out include produce nothing.
    assert_eq!(links.len(), 2);

    assert_eq!(links[0].directive.name(), "util.h");
    assert_eq!(links[0].start.line, 0);
    assert_eq!(links[0].start.col, 10);
    assert_eq!(links[0].targets.len(), 1);
    assert_eq!(
        links[0].targets[0].location.path(),
        Path::new("/proj/include/util.h")
    );

    assert_eq!(links[1].directive.name(), "cfg.h");
    assert_eq!(links[1].targets.len(), 2);
    assert!(links[1].tooltip.contains("2 candidates"));
}

#[rstest]
fn test_goto_include_with_chooser(host: IncludeHost<MemoryWorkspace, ScannerConfigStore>) {
    let file = host.set_file_content(MAIN, SOURCE);

    let single = host
        .goto_include(file, offset_of("util.h"), &FirstCandidate)
        .unwrap();
    assert_eq!(
        single,
        Some(ResolvedLocation::File(PathBuf::from("/proj/include/util.h")))
    );

    let asked = Mutex::new(0usize);
    let prefer_last = |candidates: &[ResolvedLocation]| -> Option<ResolvedLocation> {
        *asked.lock().unwrap() += 1;
        candidates.last().cloned()
    };
    let chooser = CachingChooser::new(prefer_last);

    for _ in 0..2 {
        let picked = host
            .goto_include(file, offset_of("cfg.h"), &chooser)
            .unwrap();
        assert_eq!(
            picked,
            Some(ResolvedLocation::File(PathBuf::from("/opt/b/cfg.h")))
        );
    }
    assert_eq!(*asked.lock().unwrap(), 1);
    assert_eq!(chooser.cached_decisions(), 1);

    // Not on an include line.
    let nothing = host
        .goto_include(file, offset_of("int main"), &FirstCandidate)
        .unwrap();
    assert_eq!(nothing, None);
}

#[rstest]
fn test_diagnostics(host: IncludeHost<MemoryWorkspace, ScannerConfigStore>) {
    let file = host.set_file_content(MAIN, SOURCE);
    let diagnostics = host.diagnostics(file);

    assert_eq!(diagnostics.len(), 2);

    let ambiguous = &diagnostics[0];
    assert_eq!(ambiguous.code.as_deref(), Some(codes::AMBIGUOUS_INCLUDE));
    assert_eq!(ambiguous.severity, Severity::Hint);
    assert_eq!(ambiguous.start_line, 1);
    assert_eq!(ambiguous.related.len(), 2);

    let unresolved = &diagnostics[1];
    assert_eq!(unresolved.code.as_deref(), Some(codes::UNRESOLVED_INCLUDE));
    assert_eq!(unresolved.severity, Severity::Warning);
    assert_eq!(unresolved.start_line, 2);
    assert!(unresolved.message.contains("missing.h"));
}

#[test]
fn test_search_failure_diagnostic() {
    let ws = MemoryWorkspace::new()
        .with_file(MAIN)
        .with_failure("/locked");
    let config = ScannerConfiguration::new().with_system("/locked");
    let host = IncludeHost::new(IncludeResolver::new(ws), config);
    let file = host.set_file_content(MAIN, "#include <a.h>\n#include <b.h>\n");

    let diagnostics = host.diagnostics(file);
    assert_eq!(diagnostics.len(), 2);
    assert!(
        diagnostics
            .iter()
            .all(|d| d.code.as_deref() == Some(codes::INCLUDE_SEARCH_FAILED)
                && d.severity == Severity::Error)
    );
    assert!(host.include_links(file).is_err());
}

#[rstest]
fn test_add_include(host: IncludeHost<MemoryWorkspace, ScannerConfigStore>) {
    let file = host.set_file_content(MAIN, SOURCE);

    let edit = host
        .add_include(file, Path::new("/opt/b/extra.h"))
        .unwrap();
    let edited = TextEdit::apply_all(SOURCE, &[edit]);
    assert!(edited.starts_with(
        "#include \"util.h\"\n#include <cfg.h>\n#include <missing.h>\n#include <extra.h>\n"
    ));

    // Already included.
    assert!(
        host.add_include(file, Path::new("/proj/include/util.h"))
            .is_none()
    );
    // Not reachable from any search path.
    assert!(host.add_include(file, Path::new("/elsewhere/x.h")).is_none());
}

/// `"util.h"` would pick up the copy beside the source file, so the longer
/// spelling through the project root is used instead.
#[test]
fn test_add_include_skips_spelling_that_reaches_another_header() {
    let ws = MemoryWorkspace::new()
        .with_project("/proj")
        .with_file(MAIN)
        .with_file("/proj/src/util.h")
        .with_file("/proj/include/util.h");
    let config = ScannerConfiguration::new()
        .with_local("/proj/include")
        .with_local("/proj");
    let host = IncludeHost::new(IncludeResolver::new(ws), config);
    let file = host.set_file_content(MAIN, "int x;\n");

    let edit = host
        .add_include(file, Path::new("/proj/include/util.h"))
        .unwrap();
    assert_eq!(edit.new_text, "#include \"include/util.h\"\n");

    let edit = host.add_include(file, Path::new("/proj/src/util.h")).unwrap();
    assert_eq!(edit.new_text, "#include \"util.h\"\n");
}

#[test]
fn test_remove_include() {
    let edits = remove_include_edits(SOURCE, "cfg.h");
    assert_eq!(edits.len(), 1);
    let edited = TextEdit::apply_all(SOURCE, &edits);
    assert!(!edited.contains("cfg.h"));
    assert!(edited.contains("missing.h"));
}

#[rstest]
fn test_removed_file_has_no_links(host: IncludeHost<MemoryWorkspace, ScannerConfigStore>) {
    let file = host.set_file_content(MAIN, SOURCE);
    host.remove_file(file);
    assert!(host.include_links(file).unwrap().is_empty());
    assert!(host.diagnostics(file).is_empty());
}
