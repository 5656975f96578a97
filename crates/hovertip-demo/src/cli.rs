#![forbid(unsafe_code)]

//! Command-line and environment options for the demo.
//!
//! Environment variables (`HOVERTIP_*`) set the defaults; explicit flags
//! override them.

use std::env;
use std::path::PathBuf;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
hovertip demo: hover the buttons to see tooltips placed around them

USAGE:
    hovertip-demo [OPTIONS]

OPTIONS:
    --bindings=PATH      JSON array of extra buttons: [{\"label\": .., \"binding\": ..}]
    --margin=N           Margin in cells for bindings that set none
    --exit-after-ms=N    Quit after N milliseconds (0 = never)
    --no-mouse           Disable mouse capture
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    q / Esc / Ctrl+C     Quit

ENVIRONMENT VARIABLES:
    HOVERTIP_DEMO_BINDINGS       Default for --bindings
    HOVERTIP_DEMO_MARGIN         Default for --margin
    HOVERTIP_DEMO_EXIT_AFTER_MS  Default for --exit-after-ms
    HOVERTIP_LOG                 Log filter (default: info)
    HOVERTIP_LOG_FILE            Log file; logs are discarded when unset";

/// Parsed demo options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Extra buttons to load.
    pub bindings: Option<PathBuf>,
    /// Margin for bindings that do not name one.
    pub margin: Option<u16>,
    /// Auto-exit after this many milliseconds (0 = disabled).
    pub exit_after_ms: u64,
    /// Whether mouse events are captured.
    pub mouse: bool,
    /// `tracing_subscriber::EnvFilter` directive.
    pub log_filter: String,
    /// Where logs go.
    pub log_file: Option<PathBuf>,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            bindings: None,
            margin: None,
            exit_after_ms: 0,
            mouse: true,
            log_filter: "info".into(),
            log_file: None,
        }
    }
}

/// What the arguments asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Run(Opts),
    Help,
    Version,
}

/// Read a variable through `lookup`, treating empty values as unset.
fn env_string(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|val| !val.trim().is_empty())
}

fn env_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    env_string(lookup, key).and_then(|val| val.trim().parse().ok())
}

fn parse_flag<T: std::str::FromStr>(flag: &str, val: &str) -> Result<T, String> {
    val.parse()
        .map_err(|_| format!("Invalid {flag} value: {val}"))
}

impl Opts {
    /// Parse process arguments and environment, exiting on `--help`,
    /// `--version`, or a bad argument.
    pub fn parse() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        match Self::from_sources(|key| env::var(key).ok(), &args) {
            Ok(Parsed::Run(opts)) => opts,
            Ok(Parsed::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Parsed::Version) => {
                println!("hovertip-demo {VERSION}");
                process::exit(0);
            }
            Err(msg) => {
                eprintln!("{msg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Parse from an environment lookup and an argument list.
    pub fn from_sources(
        lookup: impl Fn(&str) -> Option<String>,
        args: &[String],
    ) -> Result<Parsed, String> {
        let mut opts = Self::default();

        if let Some(path) = env_string(&lookup, "HOVERTIP_DEMO_BINDINGS") {
            opts.bindings = Some(PathBuf::from(path));
        }
        if let Some(margin) = env_u64(&lookup, "HOVERTIP_DEMO_MARGIN") {
            opts.margin = u16::try_from(margin).ok();
        }
        if let Some(ms) = env_u64(&lookup, "HOVERTIP_DEMO_EXIT_AFTER_MS") {
            opts.exit_after_ms = ms;
        }
        if let Some(filter) = env_string(&lookup, "HOVERTIP_LOG") {
            opts.log_filter = filter;
        }
        if let Some(path) = env_string(&lookup, "HOVERTIP_LOG_FILE") {
            opts.log_file = Some(PathBuf::from(path));
        }

        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Parsed::Help),
                "--version" | "-V" => return Ok(Parsed::Version),
                "--no-mouse" => opts.mouse = false,
                other => {
                    if let Some(val) = other.strip_prefix("--bindings=") {
                        opts.bindings = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--margin=") {
                        opts.margin = Some(parse_flag("--margin", val)?);
                    } else if let Some(val) = other.strip_prefix("--exit-after-ms=") {
                        opts.exit_after_ms = parse_flag("--exit-after-ms", val)?;
                    } else {
                        return Err(format!("Unknown argument: {other}"));
                    }
                }
            }
        }

        Ok(Parsed::Run(opts))
    }
}
