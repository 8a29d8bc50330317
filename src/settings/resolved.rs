use std::path::PathBuf;

use lazypick::ScanOptions;
use lazypick::selector::SelectorOptions;

/// Application-ready configuration derived from user input, config files and
/// defaults.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub root: PathBuf,
    pub scan: ScanOptions,
    pub selector: SelectorOptions,
    pub title: String,
    pub log_level: String,
    pub log_file: PathBuf,
}

impl ResolvedConfig {
    /// Print a human readable summary of the effective configuration.
    pub fn print_summary(&self) {
        print!("{}", self.summary());
    }

    fn summary(&self) -> String {
        let mut lines = vec![
            "Effective configuration:".to_string(),
            format!("  Root: {}", self.root.display()),
            format!("  Include hidden: {}", bool_to_word(self.scan.include_hidden)),
            format!(
                "  Respect ignore files: {}",
                bool_to_word(self.scan.respect_ignore_files)
            ),
        ];
        lines.push(match self.scan.max_depth {
            Some(depth) => format!("  Max depth: {depth}"),
            None => "  Max depth: unlimited".to_string(),
        });
        lines.push(match &self.scan.extensions {
            Some(exts) if !exts.is_empty() => format!("  Extensions: {}", exts.join(", ")),
            _ => "  Extensions: (all)".to_string(),
        });
        lines.push(format!("  Page size: {}", self.selector.page_size));
        lines.push(format!(
            "  Debounce: {} ms",
            self.selector.debounce.as_millis()
        ));
        lines.push(format!(
            "  Hydration workers: {}",
            self.selector.hydration_workers
        ));
        lines.push(format!("  Prompt title: {}", self.title));
        if !self.selector.initial_query.is_empty() {
            lines.push(format!("  Initial query: {}", self.selector.initial_query));
        }
        lines.push(format!("  Log level: {}", self.log_level));
        lines.push(format!("  Log file: {}", self.log_file.display()));

        let mut summary = lines.join("\n");
        summary.push('\n');
        summary
    }
}

fn bool_to_word(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_selector_settings() {
        let config = ResolvedConfig {
            root: PathBuf::from("/tmp"),
            scan: ScanOptions::default().with_extensions(["png"]),
            selector: SelectorOptions::default().with_initial_query("cat"),
            title: "pics".into(),
            log_level: "info".into(),
            log_file: PathBuf::from("/tmp/lazypick.log"),
        };

        let summary = config.summary();
        assert!(summary.contains("Page size: 12"));
        assert!(summary.contains("Debounce: 300 ms"));
        assert!(summary.contains("Extensions: png"));
        assert!(summary.contains("Initial query: cat"));
        assert!(summary.contains("Include hidden: no"));
    }
}
