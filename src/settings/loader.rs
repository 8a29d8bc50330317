use anyhow::{Result, anyhow};

use super::raw::RawConfig;
use super::resolved::ResolvedConfig;
use super::sources::build_config;
use crate::cli::CliArgs;

/// Load configuration by combining config files, environment variables and
/// CLI arguments, in increasing order of precedence.
pub fn load(cli: &CliArgs) -> Result<ResolvedConfig> {
    let builder = build_config(cli)?;
    let mut raw: RawConfig = builder
        .try_deserialize()
        .map_err(|err| anyhow!("failed to deserialize configuration: {err}"))?;
    raw.apply_cli_overrides(cli);
    raw.resolve()
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;
    use std::fs;

    use clap::Parser;

    use super::*;

    #[test]
    fn explicit_config_file_is_merged_under_cli_flags() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = dir.path().join("picker.toml");
        fs::write(
            &config,
            format!(
                "[selector]\npage_size = 30\ndebounce_ms = 50\n\n[catalog]\nroot = {:?}\nextensions = [\"png\"]\n\n[ui]\ntitle = \"images\"\n",
                dir.path()
            ),
        )
        .expect("write config");

        let cli = CliArgs::parse_from([
            OsString::from("lazypick"),
            "--no-config".into(),
            "--config".into(),
            config.into_os_string(),
            "--page-size".into(),
            "40".into(),
        ]);
        let resolved = load(&cli).expect("configuration loads");

        assert_eq!(resolved.selector.page_size, 40);
        assert_eq!(resolved.selector.debounce.as_millis(), 50);
        assert_eq!(resolved.title, "images");
        assert_eq!(resolved.scan.extensions, Some(vec!["png".to_string()]));
    }

    #[test]
    fn missing_explicit_config_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("absent.toml");
        let cli = CliArgs::parse_from([
            OsString::from("lazypick"),
            "--no-config".into(),
            "--config".into(),
            missing.into_os_string(),
        ]);
        assert!(load(&cli).is_err());
    }
}
