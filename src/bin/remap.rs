use std::env;
use std::io::Read;
use std::path::PathBuf;
use std::process;

use remapper::{Error, RawConfig, Sinks, resolve};

const HELP: &str = "\
remap - resolve a key against an ordered pattern/value mapping table

Usage:
  remap [OPTIONS]
  remap --help
  remap --version

Options:
  -k, --key <KEY>           Key to resolve.
  -m, --map-file <PATH>     Read the mapping table from a file (`-` for stdin).
      --map <TEXT>          Inline mapping table text.
  -s, --separator <SEP>     Literal separator between pattern and value.
      --mode <MODE>         strict | fallback-to-original | fallback-to-default
                            (default: strict).
  -e, --export-to <LIST>    Comma-separated sinks out of output,env,log
                            (default: output).
      --env-name <NAME>     Environment variable name for the env sink.
  -d, --default <VALUE>     Result when nothing matches in
                            fallback-to-default mode.
      --allow-empty-map <BOOL>
                            Permit an empty mapping table (true/false).
  -h, --help                Show this help text.
  -V, --version             Show the version.

Every option falls back to the workflow input variable INPUT_<NAME>
(INPUT_KEY, INPUT_MAP, INPUT_SEPARATOR, INPUT_MODE, INPUT_EXPORT_TO,
INPUT_EXPORT_TO_ENV_NAME, INPUT_DEFAULT, INPUT_ALLOW_EMPTY_MAP) when
omitted. The resolved value is delivered to the selected sinks; the
output and env sinks append to the files named by GITHUB_OUTPUT and
GITHUB_ENV, or print to stdout when those are unset.
";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Options {
    key: Option<String>,
    map: Option<String>,
    map_file: Option<PathBuf>,
    separator: Option<String>,
    mode: Option<String>,
    export_to: Option<String>,
    env_name: Option<String>,
    default_value: Option<String>,
    allow_empty_map: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Help,
    Version,
    Resolve(Options),
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    process::exit(run(&args));
}

fn run(args: &[String]) -> i32 {
    match parse_args(args) {
        Ok(Command::Help) => {
            println!("{HELP}");
            0
        }
        Ok(Command::Version) => {
            println!("remap {}", env!("CARGO_PKG_VERSION"));
            0
        }
        Ok(Command::Resolve(options)) => match execute(options) {
            Ok(()) => 0,
            Err(err) => {
                eprintln!("remap: {err}");
                1
            }
        },
        Err(err) => {
            eprintln!("remap: {err}");
            eprintln!("Try `remap --help`.");
            1
        }
    }
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut options = Options::default();
    let mut index = 0usize;
    while index < args.len() {
        match args[index].as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "-k" | "--key" => {
                options.key = Some(take_value(args, &mut index, "-k/--key")?);
            }
            "--map" => {
                options.map = Some(take_value(args, &mut index, "--map")?);
            }
            "-m" | "--map-file" => {
                options.map_file = Some(PathBuf::from(take_value(
                    args,
                    &mut index,
                    "-m/--map-file",
                )?));
            }
            "-s" | "--separator" => {
                options.separator = Some(take_value(args, &mut index, "-s/--separator")?);
            }
            "--mode" => {
                options.mode = Some(take_value(args, &mut index, "--mode")?);
            }
            "-e" | "--export-to" => {
                options.export_to = Some(take_value(args, &mut index, "-e/--export-to")?);
            }
            "--env-name" => {
                options.env_name = Some(take_value(args, &mut index, "--env-name")?);
            }
            "-d" | "--default" => {
                options.default_value = Some(take_value(args, &mut index, "-d/--default")?);
            }
            "--allow-empty-map" => {
                options.allow_empty_map =
                    Some(take_value(args, &mut index, "--allow-empty-map")?);
            }
            unknown => return Err(format!("unknown option `{unknown}`")),
        }
        index += 1;
    }
    Ok(Command::Resolve(options))
}

fn take_value(args: &[String], index: &mut usize, flag: &str) -> Result<String, String> {
    *index += 1;
    args.get(*index)
        .cloned()
        .ok_or_else(|| format!("missing value for `{flag}`"))
}

fn execute(options: Options) -> Result<(), Error> {
    let map = map_text(&options)?;
    let config = RawConfig::new()
        .key(options.key.unwrap_or_else(|| input_var("key")))
        .map(map)
        .separator(options.separator.unwrap_or_else(|| input_var("separator")))
        .mode(or_default(options.mode, "mode", "strict"))
        .export_to(or_default(options.export_to, "export_to", "output"))
        .export_to_env_name(
            options
                .env_name
                .unwrap_or_else(|| input_var("export_to_env_name")),
        )
        .default_value(
            options
                .default_value
                .unwrap_or_else(|| input_var("default")),
        )
        .allow_empty_map(
            options
                .allow_empty_map
                .unwrap_or_else(|| input_var("allow_empty_map")),
        )
        .validate()?;

    let value = resolve(&config)?;
    Sinks::workflow().deliver(&config, &value)
}

/// Map text precedence: inline `--map`, then `--map-file` (`-` = stdin),
/// then the `INPUT_MAP` variable.
fn map_text(options: &Options) -> Result<String, Error> {
    if let Some(map) = &options.map {
        return Ok(map.clone());
    }
    match &options.map_file {
        Some(path) if path.as_os_str() == "-" => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => Ok(input_var("map")),
    }
}

fn or_default(flag: Option<String>, name: &str, default: &str) -> String {
    let value = flag.unwrap_or_else(|| input_var(name));
    if value.is_empty() {
        default.to_owned()
    } else {
        value
    }
}

fn input_var(name: &str) -> String {
    env::var(format!("INPUT_{}", name.to_ascii_uppercase())).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{Command, Options, parse_args};
    use std::path::PathBuf;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|token| (*token).to_string()).collect()
    }

    #[test]
    fn parse_empty_args_resolves_with_defaults() {
        let parsed = parse_args(&[]).expect("parse should succeed");
        assert_eq!(parsed, Command::Resolve(Options::default()));
    }

    #[test]
    fn parse_collects_all_options() {
        let parsed = parse_args(&args(&[
            "-k",
            "staging-23",
            "--map",
            "staging-\\d+=>staging",
            "-s",
            "=>",
            "--mode",
            "fallback-to-default",
            "-e",
            "output,log",
            "--env-name",
            "MAPPED",
            "-d",
            "fallback",
            "--allow-empty-map",
            "false",
        ]))
        .expect("parse should succeed");

        let Command::Resolve(options) = parsed else {
            panic!("expected resolve");
        };
        assert_eq!(options.key.as_deref(), Some("staging-23"));
        assert_eq!(options.map.as_deref(), Some("staging-\\d+=>staging"));
        assert_eq!(options.separator.as_deref(), Some("=>"));
        assert_eq!(options.mode.as_deref(), Some("fallback-to-default"));
        assert_eq!(options.export_to.as_deref(), Some("output,log"));
        assert_eq!(options.env_name.as_deref(), Some("MAPPED"));
        assert_eq!(options.default_value.as_deref(), Some("fallback"));
        assert_eq!(options.allow_empty_map.as_deref(), Some("false"));
        assert_eq!(options.map_file, None);
    }

    #[test]
    fn parse_accepts_map_file_and_stdin_marker() {
        let parsed = parse_args(&args(&["-m", "table.txt"])).expect("parse should succeed");
        let Command::Resolve(options) = parsed else {
            panic!("expected resolve");
        };
        assert_eq!(options.map_file, Some(PathBuf::from("table.txt")));

        let parsed = parse_args(&args(&["--map-file", "-"])).expect("parse should succeed");
        let Command::Resolve(options) = parsed else {
            panic!("expected resolve");
        };
        assert_eq!(options.map_file, Some(PathBuf::from("-")));
    }

    #[test]
    fn parse_reports_missing_value() {
        let err = parse_args(&args(&["--key"])).expect_err("parse should fail");
        assert_eq!(err, "missing value for `-k/--key`");
    }

    #[test]
    fn parse_rejects_unknown_option() {
        let err = parse_args(&args(&["--frobnicate"])).expect_err("parse should fail");
        assert_eq!(err, "unknown option `--frobnicate`");
    }

    #[test]
    fn help_and_version_short_circuit() {
        assert_eq!(
            parse_args(&args(&["-k", "k1", "--help"])).expect("parse should work"),
            Command::Help
        );
        assert_eq!(
            parse_args(&args(&["--version"])).expect("parse should work"),
            Command::Version
        );
    }
}
