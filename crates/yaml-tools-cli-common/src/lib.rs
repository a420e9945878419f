#![doc = include_str!("../README.md")]

use bpaf::Bpaf;
use tracing_subscriber::prelude::*;

/// Environment variable holding a `tracing` filter directive. Overrides
/// `--log-level` when set.
pub const LOG_ENV: &str = "YAML_TOOLS_LOG";

/// Global options applied to all commands
#[derive(Debug, Clone, Bpaf)]
#[bpaf(generate(cli_global_options))]
#[allow(clippy::upper_case_acronyms)]
pub struct CLIGlobalOptions {
    /// Set the formatting mode for error reports: "off" prints everything as
    /// plain text, "force" forces ANSI colors even if the console output is
    /// determined to be incompatible
    #[bpaf(long("colors"), argument("off|force"))]
    pub colors: Option<ColorsArg>,

    /// Print what each command reads and writes. Implies `--log-level info`
    /// unless a level is given.
    #[bpaf(short('v'), long("verbose"), switch, fallback(false))]
    pub verbose: bool,

    /// The level of logging. In order, from the most verbose to the least verbose:
    /// debug, info, warn, error.
    #[bpaf(
        long("log-level"),
        argument("none|debug|info|warn|error"),
        fallback(LogLevel::None),
        display_fallback
    )]
    pub log_level: LogLevel,
}

impl CLIGlobalOptions {
    /// The level actually in effect once `--verbose` is taken into account.
    pub fn effective_log_level(&self) -> LogLevel {
        match self.log_level {
            LogLevel::None if self.verbose => LogLevel::Info,
            level => level,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorsArg {
    Off,
    Force,
}

impl core::str::FromStr for ColorsArg {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(Self::Off),
            "force" => Ok(Self::Force),
            _ => Err(format!("expected 'off' or 'force', got '{s}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    #[default]
    None,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// The `EnvFilter` directive for this level.
    pub fn as_filter(self) -> &'static str {
        match self {
            Self::None => "off",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl core::str::FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(format!(
                "expected 'none', 'debug', 'info', 'warn', or 'error', got '{s}'"
            )),
        }
    }
}

impl core::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Install the global tracing subscriber. `YAML_TOOLS_LOG` wins over the
/// command line; span entry/exit is only shown when it is set explicitly.
///
/// Calling this more than once is harmless: later calls leave the first
/// subscriber in place.
pub fn init_tracing(options: &CLIGlobalOptions) {
    let (filter, explicit) = match tracing_subscriber::EnvFilter::try_from_env(LOG_ENV) {
        Ok(f) => (f, true),
        Err(_) => (
            tracing_subscriber::EnvFilter::new(options.effective_log_level().as_filter()),
            false,
        ),
    };
    tracing_subscriber::registry()
        .with(
            tracing_tree::HierarchicalLayer::new(2)
                .with_targets(true)
                .with_bracketed_fields(true)
                .with_indent_lines(true)
                .with_verbose_exit(explicit)
                .with_verbose_entry(explicit)
                .with_ansi(options.colors != Some(ColorsArg::Off))
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .try_init()
        .ok();
}

/// Install the miette report handler, honoring `--colors`.
pub fn setup_miette(colors: Option<ColorsArg>) {
    let theme = match colors {
        Some(ColorsArg::Force) => miette::GraphicalTheme::unicode(),
        Some(ColorsArg::Off) => miette::GraphicalTheme::unicode_nocolor(),
        None if std::io::IsTerminal::is_terminal(&std::io::stderr()) => {
            miette::GraphicalTheme::unicode()
        }
        None => miette::GraphicalTheme::unicode_nocolor(),
    };
    miette::set_hook(Box::new(move |_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(false)
                .context_lines(2)
                .graphical_theme(theme.clone())
                .build(),
        )
    }))
    .ok();
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bpaf::Parser;

    fn opts() -> bpaf::OptionParser<CLIGlobalOptions> {
        cli_global_options().to_options()
    }

    #[test]
    fn defaults() {
        let parsed = opts().run_inner(&[]).unwrap();
        assert!(!parsed.verbose);
        assert_eq!(parsed.log_level, LogLevel::None);
        assert!(parsed.colors.is_none());
        assert_eq!(parsed.effective_log_level(), LogLevel::None);
    }

    #[test]
    fn verbose_short() {
        let parsed = opts().run_inner(&["-v"]).unwrap();
        assert!(parsed.verbose);
        assert_eq!(parsed.effective_log_level(), LogLevel::Info);
    }

    #[test]
    fn explicit_level_beats_verbose() {
        let parsed = opts()
            .run_inner(&["--verbose", "--log-level", "debug"])
            .unwrap();
        assert_eq!(parsed.effective_log_level(), LogLevel::Debug);
    }

    #[test]
    fn log_levels() {
        for (arg, level) in [
            ("none", LogLevel::None),
            ("debug", LogLevel::Debug),
            ("info", LogLevel::Info),
            ("warn", LogLevel::Warn),
            ("error", LogLevel::Error),
        ] {
            let args = ["--log-level", arg];
            let parsed = opts().run_inner(&args[..]).unwrap();
            assert_eq!(parsed.log_level, level);
            assert_eq!(level.to_string(), arg);
        }
    }

    #[test]
    fn log_level_invalid() {
        assert!(opts().run_inner(&["--log-level", "trace"]).is_err());
    }

    #[test]
    fn filter_directives() {
        assert_eq!(LogLevel::None.as_filter(), "off");
        assert_eq!(LogLevel::Warn.as_filter(), "warn");
    }

    #[test]
    fn colors() {
        let parsed = opts().run_inner(&["--colors", "off"]).unwrap();
        assert_eq!(parsed.colors, Some(ColorsArg::Off));
        let parsed = opts().run_inner(&["--colors", "force"]).unwrap();
        assert_eq!(parsed.colors, Some(ColorsArg::Force));
        assert!(opts().run_inner(&["--colors", "auto"]).is_err());
    }
}
