use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands, ConfigCommands};
use commands::config::load_config;
use commands::parse::ParseCommandOptions;
use commands::tokens::TokensOptions;
use commands::{CommandContext, CommandError};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        init_logging();
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                eprintln!("{}", error_json(&e));
            } else {
                eprintln!("Error: {e}");
            }
            error_exit_code(&e)
        }
    }
}

/// Installs a stderr log subscriber. `RUST_LOG` wins over the default level.
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fexpr_rs=debug,fx=debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: &Cli) -> commands::Result<()> {
    match &cli.command {
        // config commands must work even when the file does not parse
        Commands::Config { command } => {
            let ctx = CommandContext::from_cli(cli);
            match command {
                None | Some(ConfigCommands::Show) => commands::config::execute_show(&ctx),
                Some(ConfigCommands::Path) => commands::config::execute_path(&ctx),
                Some(ConfigCommands::Init { force }) => {
                    commands::config::execute_init(&ctx, *force)
                }
            }
        }
        Commands::Completions { shell } => {
            commands::completions::execute(shell).map_err(CommandError::from)
        }
        Commands::Parse { filter, tree } => commands::parse::execute(
            &filter_context(cli)?,
            &ParseCommandOptions {
                filter: filter.clone(),
                tree: *tree,
            },
        ),
        Commands::Tokens {
            filter,
            skip_trivia,
        } => commands::tokens::execute(
            &filter_context(cli)?,
            &TokensOptions {
                filter: filter.clone(),
                skip_trivia: *skip_trivia,
            },
        ),
        Commands::Highlight { filter } => {
            commands::highlight::execute(&filter_context(cli)?, filter)
        }
    }
}

/// Builds the context for filter commands: config file limits under the
/// command-line flags.
fn filter_context(cli: &Cli) -> commands::Result<CommandContext> {
    let config = load_config()?;
    Ok(CommandContext::from_cli_and_config(cli, &config))
}

/// Returns the JSON error document printed in `--json` mode.
fn error_json(e: &CommandError) -> String {
    let mut error = serde_json::json!({
        "code": error_code(e),
        "message": e.to_string(),
    });
    if let CommandError::Filter(parse_error) = e {
        if let Some(position) = parse_error.position() {
            error["position"] = serde_json::json!(position);
        }
    }

    let document = serde_json::json!({ "error": error });
    serde_json::to_string_pretty(&document).unwrap_or_else(|_| document.to_string())
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Filter(err) if err.is_lexical() => "LEX_ERROR",
        CommandError::Filter(_) => "FILTER_ERROR",
        CommandError::Tokens { .. } => "LEX_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    ExitCode::from(exit_status(e))
}

fn exit_status(e: &CommandError) -> u8 {
    match e {
        CommandError::Filter(_) | CommandError::Tokens { .. } => 1,
        CommandError::Json(_) => 1,
        CommandError::Io(_) => 3,
        CommandError::Config(_) => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fexpr_rs::{parse, ParseError};
    use serial_test::serial;
    use std::env;
    use std::fs;
    use tempfile::TempDir;

    fn cli_for(command: Commands) -> Cli {
        Cli {
            verbose: false,
            quiet: true,
            json: false,
            no_color: true,
            max_function_depth: None,
            command,
        }
    }

    /// Runs `f` with FX_CONFIG pointing at `path`, restoring it afterwards.
    fn with_config_env<T>(path: &std::path::Path, f: impl FnOnce() -> T) -> T {
        let original = env::var("FX_CONFIG").ok();
        env::set_var("FX_CONFIG", path);

        let result = f();

        match original {
            Some(val) => env::set_var("FX_CONFIG", val),
            None => env::remove_var("FX_CONFIG"),
        }
        result
    }

    #[test]
    fn test_error_codes() {
        let syntax = CommandError::Filter(parse("a =").unwrap_err());
        let lexical = CommandError::Filter(parse("a = %").unwrap_err());

        assert_eq!(error_code(&syntax), "FILTER_ERROR");
        assert_eq!(error_code(&lexical), "LEX_ERROR");
        assert_eq!(error_code(&CommandError::Config("x".into())), "CONFIG_ERROR");
        assert_eq!(
            error_code(&CommandError::Io(std::io::Error::other("x"))),
            "IO_ERROR"
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_status(&CommandError::Filter(ParseError::Empty)), 1);
        assert_eq!(
            exit_status(&CommandError::Tokens {
                count: 1,
                first: "x".into()
            }),
            1
        );
        assert_eq!(exit_status(&CommandError::Io(std::io::Error::other("x"))), 3);
        assert_eq!(exit_status(&CommandError::Config("x".into())), 5);
    }

    #[test]
    fn test_error_json_includes_position() {
        let e = CommandError::Filter(parse("(a = 1 && b >)").unwrap_err());
        let value: serde_json::Value = serde_json::from_str(&error_json(&e)).unwrap();

        assert_eq!(value["error"]["code"], "FILTER_ERROR");
        assert_eq!(value["error"]["position"], 13);
        assert!(value["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("filter error: invalid group at position 0"));
    }

    #[test]
    fn test_error_json_without_position() {
        let e = CommandError::Config("broken".into());
        let value: serde_json::Value = serde_json::from_str(&error_json(&e)).unwrap();
        assert_eq!(value["error"]["message"], "configuration error: broken");
        assert!(value["error"].get("position").is_none());
    }

    #[test]
    #[serial]
    fn test_run_parse_with_missing_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let cli = cli_for(Commands::Parse {
            filter: "a = 1".to_string(),
            tree: false,
        });
        let result = with_config_env(&config_path, || run(&cli));
        assert!(result.is_ok(), "Expected Ok but got: {:?}", result);
    }

    #[test]
    #[serial]
    fn test_run_config_limits_apply() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[parser]\nmax_input_length = 4\n").unwrap();

        let cli = cli_for(Commands::Parse {
            filter: "a = 12".to_string(),
            tree: false,
        });
        let result = with_config_env(&config_path, || run(&cli));
        assert!(matches!(
            result,
            Err(CommandError::Filter(ParseError::InputTooLong { length: 6, max: 4 }))
        ));
    }

    #[test]
    #[serial]
    fn test_run_broken_config_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "this is not toml =").unwrap();

        let cli = cli_for(Commands::Parse {
            filter: "a = 1".to_string(),
            tree: false,
        });
        let result = with_config_env(&config_path, || run(&cli));
        assert!(matches!(result, Err(CommandError::Config(_))));

        // config path still works with a broken file
        let cli = cli_for(Commands::Config {
            command: Some(ConfigCommands::Path),
        });
        assert!(with_config_env(&config_path, || run(&cli)).is_ok());
    }

    #[test]
    #[serial]
    fn test_run_flag_overrides_config_depth() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[parser]\nmax_function_depth = 1\n").unwrap();

        let mut cli = cli_for(Commands::Parse {
            filter: "f(g(1)) = 1".to_string(),
            tree: false,
        });
        assert!(with_config_env(&config_path, || run(&cli)).is_err());

        cli.max_function_depth = Some(2);
        assert!(with_config_env(&config_path, || run(&cli)).is_ok());
    }
}
