//! Terminal detection and log subscriber setup.

use std::io::{self, IsTerminal};

use tracing_subscriber::EnvFilter;

/// Log targets of this tool; everything else (reqwest, hyper) stays at warn.
const OWN_TARGETS: [&str; 2] = ["release_artifacts", "fetch_artifacts"];

/// How stderr should be used for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TerminalMode {
    pub(crate) color: bool,
    pub(crate) progress_bar: bool,
}

impl TerminalMode {
    /// Inspects `NO_COLOR`, `TERM` and whether stderr is a terminal.
    pub(crate) fn detect(no_color_flag: bool, quiet: bool) -> Self {
        Self::resolve(
            no_color_flag,
            quiet,
            no_color_env_requested(),
            is_dumb_terminal(),
            io::stderr().is_terminal(),
        )
    }

    fn resolve(
        no_color_flag: bool,
        quiet: bool,
        no_color_env: bool,
        dumb_terminal: bool,
        stderr_is_terminal: bool,
    ) -> Self {
        Self {
            color: !(no_color_flag || no_color_env || dumb_terminal),
            progress_bar: stderr_is_terminal && !quiet && !dumb_terminal,
        }
    }
}

fn no_color_env_requested() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty())
}

fn is_dumb_terminal() -> bool {
    std::env::var("TERM")
        .map(|value| value.eq_ignore_ascii_case("dumb"))
        .unwrap_or(false)
}

/// Filter directive applying `level` to this tool's own targets.
fn default_directive(level: &str) -> String {
    let mut directive = String::from("warn");
    for target in OWN_TARGETS {
        directive.push_str(&format!(",{target}={level}"));
    }
    directive
}

/// Installs a compact stderr subscriber without timestamps or targets.
///
/// `RUST_LOG` replaces the default filter unless `force_cli_level` is set.
pub(crate) fn init_tracing(level: &str, force_cli_level: bool, mode: TerminalMode) {
    let directive = default_directive(level);
    let filter = if force_cli_level {
        EnvFilter::new(&directive)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directive))
    };
    let _ = tracing_subscriber::fmt()
        .compact()
        .without_time()
        .with_target(false)
        .with_writer(io::stderr)
        .with_ansi(mode.color)
        .with_env_filter(filter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_disabled_by_any_source() {
        assert!(TerminalMode::resolve(false, false, false, false, true).color);
        assert!(!TerminalMode::resolve(true, false, false, false, true).color);
        assert!(!TerminalMode::resolve(false, false, true, false, true).color);
        assert!(!TerminalMode::resolve(false, false, false, true, true).color);
    }

    #[test]
    fn test_progress_bar_only_on_interactive_terminal() {
        assert!(TerminalMode::resolve(false, false, false, false, true).progress_bar);
        assert!(!TerminalMode::resolve(false, false, false, false, false).progress_bar);
        assert!(!TerminalMode::resolve(false, true, false, false, true).progress_bar);
        assert!(!TerminalMode::resolve(false, false, false, true, true).progress_bar);
        // --no-color alone keeps the bar.
        assert!(TerminalMode::resolve(true, false, false, false, true).progress_bar);
    }

    #[test]
    fn test_default_directive_scopes_level_to_own_targets() {
        assert_eq!(
            default_directive("debug"),
            "warn,release_artifacts=debug,fetch_artifacts=debug"
        );
        assert!(EnvFilter::try_new(default_directive("trace")).is_ok());
    }
}
