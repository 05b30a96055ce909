//! File names of generated site outputs.

pub const DIR_INDEX_NAME: &str = "index";
pub const PACKAGE_SUMMARY_NAME: &str = "package-summary";

pub const MACHINE_PACKAGE_LIST_FILE: &str = "package-list";
pub const PACKAGE_INDEX_FILE: &str = "packages.html";
pub const CLASS_INDEX_FILE: &str = "classes.html";
pub const DIR_INDEX_FILE: &str = "index.html";
pub const PACKAGE_SUMMARY_FILE: &str = "package-summary.html";
pub const TOC_FILE: &str = "_toc.yaml";
pub const BOOK_FILE: &str = "_book.yaml";

/// Shown in place of the unnamed root package.
pub const ROOT_PACKAGE_DISPLAY_NAME: &str = "[JVM root]";

/// Qualified-name prefixes of compiler-internal types that never get a
/// page anywhere, so references to them stay unlinked.
pub const NON_DOCUMENTABLE_PREFIXES: [&str; 2] =
    ["kotlin.jvm.functions", "kotlin.coroutines.SuspendFunction"];
