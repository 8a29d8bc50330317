use std::collections::HashSet;
use std::env;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

/// Normalize and deduplicate file extensions provided by the user.
pub(super) fn sanitize_extensions(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut cleaned = Vec::new();
    for value in values {
        let normalized = value.trim().trim_start_matches('.').to_ascii_lowercase();
        if normalized.is_empty() {
            continue;
        }
        if seen.insert(normalized.clone()) {
            cleaned.push(normalized);
        }
    }
    cleaned
}

/// Prompt title for a root, shortened to `~/...` under the home directory.
pub(super) fn default_title_for(root: &Path) -> String {
    if let Some(home) = env::var_os("HOME").map(PathBuf::from)
        && let Ok(rel) = root.strip_prefix(&home)
    {
        if rel.components().next().is_none() {
            return "~".to_string();
        }
        return format!("~{MAIN_SEPARATOR}{}", rel.display());
    }
    root.display().to_string()
}
