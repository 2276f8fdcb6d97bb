//! Command-line arguments for the console binary.
//!
//! The surface is small enough that a hand-rolled parser beats pulling in
//! a framework: one positional path plus a handful of flags.

/// Parsed invocation of the console binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    /// Path to render, e.g. `/organization/acme`. Defaults to the root,
    /// which the router redirects to the organizations list.
    pub path: String,
    /// `--production` / `--staging` override the environment flag from
    /// the host context. `None` leaves the host's answer in effect.
    pub production_override: Option<bool>,
    /// Print the session log after rendering.
    pub show_logs: bool,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            production_override: None,
            show_logs: false,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum CliCommand {
    Run(CliArgs),
    Help,
}

pub fn usage() -> String {
    "Usage: portside [OPTIONS] [PATH]\n\
     \n\
     Render the registry console for PATH (default \"/\").\n\
     \n\
     Options:\n\
     \x20 --production   Target the production registry\n\
     \x20 --staging      Target the staging registry\n\
     \x20 --show-logs    Print the session log after rendering\n\
     \x20 -h, --help     Show this help"
        .to_string()
}

/// Parse arguments (exclusive of the program name). Unknown flags and a
/// second positional path are errors.
pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<CliCommand, String> {
    let mut parsed = CliArgs::default();
    let mut path_seen = false;

    for arg in args {
        match arg.as_str() {
            "-h" | "--help" => return Ok(CliCommand::Help),
            "--production" => parsed.production_override = Some(true),
            "--staging" => parsed.production_override = Some(false),
            "--show-logs" => parsed.show_logs = true,
            flag if flag.starts_with('-') => {
                return Err(format!("Unknown option \"{flag}\". Try --help."));
            }
            path => {
                if path_seen {
                    return Err(format!("Unexpected extra argument \"{path}\"."));
                }
                path_seen = true;
                parsed.path = path.to_string();
            }
        }
    }

    Ok(CliCommand::Run(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_args_renders_root() {
        let cmd = parse(args(&[])).unwrap();
        assert_eq!(cmd, CliCommand::Run(CliArgs::default()));
    }

    #[test]
    fn positional_path_is_accepted() {
        match parse(args(&["/organization/acme"])).unwrap() {
            CliCommand::Run(parsed) => assert_eq!(parsed.path, "/organization/acme"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn environment_flags_override() {
        match parse(args(&["--production", "/npm"])).unwrap() {
            CliCommand::Run(parsed) => {
                assert_eq!(parsed.production_override, Some(true));
                assert_eq!(parsed.path, "/npm");
            }
            other => panic!("unexpected: {other:?}"),
        }

        match parse(args(&["--staging"])).unwrap() {
            CliCommand::Run(parsed) => assert_eq!(parsed.production_override, Some(false)),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn help_short_circuits() {
        assert_eq!(parse(args(&["--help", "/ignored"])).unwrap(), CliCommand::Help);
        assert_eq!(parse(args(&["-h"])).unwrap(), CliCommand::Help);
    }

    #[test]
    fn unknown_flag_is_an_error() {
        let err = parse(args(&["--verbose"])).unwrap_err();
        assert!(err.contains("--verbose"));
    }

    #[test]
    fn second_path_is_an_error() {
        assert!(parse(args(&["/a", "/b"])).is_err());
    }
}
