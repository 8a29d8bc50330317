use std::fmt::Write;
use std::path::PathBuf;

use clap::{
    ArgAction, ColorChoice, CommandFactory, FromArgMatches, Parser, ValueEnum,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use lazypick::app_dirs;

/// Version banner listing the directories the binary reads and writes.
fn long_version() -> &'static str {
    let describe = |dir: anyhow::Result<PathBuf>| match dir {
        Ok(path) => path.display().to_string(),
        Err(err) => format!("unavailable ({err})"),
    };

    let mut details = format!("lazypick {}", env!("CARGO_PKG_VERSION"));
    let _ = writeln!(details);
    let _ = writeln!(
        details,
        "config directory: {}",
        describe(app_dirs::get_config_dir())
    );
    let _ = writeln!(
        details,
        "cache directory: {}",
        describe(app_dirs::get_cache_dir())
    );

    Box::leak(details.into_boxed_str())
}

fn cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Cyan.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
}

/// Parse command line arguments into [`CliArgs`].
pub(crate) fn parse_cli() -> CliArgs {
    let mut matches = CliArgs::command().get_matches();
    CliArgs::from_arg_matches_mut(&mut matches).unwrap_or_else(|err| err.exit())
}

#[derive(Parser, Debug)]
#[command(
    name = "lazypick",
    version,
    long_version = long_version(),
    about = "Pick a file with a paged fuzzy search and lazily loaded previews",
    color = ColorChoice::Auto,
    styles = cli_styles()
)]
/// Command-line arguments accepted by the `lazypick` binary.
pub(crate) struct CliArgs {
    #[arg(
        short,
        long = "config",
        value_name = "FILE",
        env = "LAZYPICK_CONFIG",
        action = ArgAction::Append,
        help = "Additional configuration file to merge (default: none)"
    )]
    pub(crate) config: Vec<PathBuf>,
    #[arg(
        short = 'n',
        long = "no-config",
        help = "Skip loading default configuration files"
    )]
    pub(crate) no_config: bool,
    #[arg(
        short = 'r',
        long,
        value_name = "PATH",
        help = "Directory to pick from (default: current directory)"
    )]
    pub(crate) root: Option<PathBuf>,
    #[arg(
        short = 'q',
        long = "query",
        value_name = "QUERY",
        help = "Initial search query (default: empty)"
    )]
    pub(crate) initial_query: Option<String>,
    #[arg(
        long = "page-size",
        value_name = "NUM",
        help = "Results fetched per page (default: 12)"
    )]
    pub(crate) page_size: Option<usize>,
    #[arg(
        long = "debounce-ms",
        value_name = "MS",
        help = "Quiet period before a query edit takes effect (default: 300)"
    )]
    pub(crate) debounce_ms: Option<u64>,
    #[arg(
        long = "ext",
        value_name = "EXT",
        action = ArgAction::Append,
        help = "Only list files with this extension; repeatable (default: all)"
    )]
    pub(crate) extensions: Vec<String>,
    #[arg(short = 'H', long = "hidden", help = "Include hidden files")]
    pub(crate) hidden: bool,
    #[arg(
        short = 'p',
        long = "print-config",
        help = "Print the resolved configuration before running"
    )]
    pub(crate) print_config: bool,
    #[arg(
        long = "log-level",
        value_name = "FILTER",
        help = "Log filter directive; RUST_LOG takes precedence (default: info)"
    )]
    pub(crate) log_level: Option<String>,
    #[arg(
        long = "log-file",
        value_name = "FILE",
        help = "Write logs to this file (default: lazypick.log in the cache directory)"
    )]
    pub(crate) log_file: Option<PathBuf>,
    #[arg(short = 'o', long = "output", value_enum, default_value_t = OutputFormat::Plain, help = "Choose how to print the result")]
    pub(crate) output: OutputFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
/// Output formats supported by the CLI utility.
pub(crate) enum OutputFormat {
    Plain,
    Json,
}
