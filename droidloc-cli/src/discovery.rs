//! Locating the Android project and its default `strings.xml`.

use std::path::{Path, PathBuf};

const SETTINGS_FILES: [&str; 2] = ["settings.gradle", "settings.gradle.kts"];
const SOURCE_STRINGS_PATTERN: &str = "**/src/main/res/values/strings.xml";
const PREFERRED_MODULE: &str = "app";

/// Walks up from `start` to the first directory holding a Gradle settings file.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| SETTINGS_FILES.iter().any(|name| dir.join(name).is_file()))
        .map(Path::to_path_buf)
}

/// Finds the default-locale `strings.xml` below `project_root`.
///
/// A file inside the `app` module wins; otherwise the first match in path
/// order is used.
pub fn find_source_strings(project_root: &Path) -> Result<PathBuf, String> {
    let pattern = project_root.join(SOURCE_STRINGS_PATTERN);
    let pattern = pattern.to_string_lossy();
    let mut matches: Vec<PathBuf> = glob::glob(&pattern)
        .map_err(|e| format!("Invalid search pattern: {}", e))?
        .filter_map(Result::ok)
        .collect();
    matches.sort();
    tracing::debug!(candidates = matches.len(), "searched for values/strings.xml");

    let preferred = matches.iter().position(|path| {
        path.strip_prefix(project_root)
            .ok()
            .and_then(|relative| relative.components().next())
            .is_some_and(|first| first.as_os_str() == PREFERRED_MODULE)
    });

    match preferred {
        Some(index) => Ok(matches.swap_remove(index)),
        None if !matches.is_empty() => Ok(matches.swap_remove(0)),
        None => Err(format!(
            "No values/strings.xml found under {}",
            project_root.display()
        )),
    }
}

/// The `res` directory holding `values/strings.xml`.
pub fn resource_root(source_strings: &Path) -> Result<PathBuf, String> {
    source_strings
        .parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            format!(
                "Cannot determine resource directory of {}",
                source_strings.display()
            )
        })
}
