// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use questadmin_app::AppState;
use questadmin_store::AdminStore;
use runtime::StoreRuntime;
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `questadmin --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let mut store = match options.data {
        DataMode::Demo => AdminStore::demo()?,
        DataMode::Empty => AdminStore::empty()?,
    };
    for (kind, size) in config.page_sizes() {
        store.set_page_size(kind, size);
    }

    if let Some(key) = &options.export {
        let kind = AdminStore::kind_for_key(key)?;
        println!("{}", store.export_json(kind)?);
        return Ok(());
    }

    let log_file = config.log_file()?;
    let _log_guard = logging::init(&log_file, config.log_level())?;
    if options.check_only {
        return Ok(());
    }

    let mut state = AppState::starting_at(config.start_page());
    let mut runtime = StoreRuntime::new(store, config.auth_client(), config.download_dir());
    questadmin_tui::run_app(&mut state, &mut runtime)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DataMode {
    #[default]
    Demo,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    data: DataMode,
    export: Option<String>,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        data: DataMode::default(),
        export: None,
        check_only: false,
        show_help: false,
    };
    let mut data_flag: Option<&'static str> = None;

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            flag @ ("--demo" | "--empty") => {
                let (flag, mode) = if flag == "--demo" {
                    ("--demo", DataMode::Demo)
                } else {
                    ("--empty", DataMode::Empty)
                };
                if let Some(previous) = data_flag
                    && previous != flag
                {
                    bail!("{previous} and {flag} cannot be combined; pick one");
                }
                data_flag = Some(flag);
                options.data = mode;
            }
            "--export" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--export requires a page key such as users"))?;
                options.export = Some(value.as_ref().to_owned());
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                bail!("unknown argument {unknown:?}; run with --help to see supported options");
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("questadmin: AIQuestTalk admin console");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --demo                   Start with the demo records (default)");
    println!("  --empty                  Start with no records");
    println!("  --export <page>          Print a page's records as JSON and exit");
    println!("  --check                  Validate config and logging, then exit");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, DataMode, parse_cli_args};
    use anyhow::Result;
    use std::path::PathBuf;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/questadmin-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                print_config_path: false,
                print_example: false,
                data: DataMode::Demo,
                export: None,
                check_only: false,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_path_override() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/custom/config.toml"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_values() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));

        let error = parse_cli_args(vec!["--export"], default_options_path())
            .expect_err("missing export page should fail");
        assert!(error.to_string().contains("page key"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_selects_data_mode() -> Result<()> {
        let options = parse_cli_args(vec!["--empty"], default_options_path())?;
        assert_eq!(options.data, DataMode::Empty);

        let options = parse_cli_args(vec!["--demo", "--demo"], default_options_path())?;
        assert_eq!(options.data, DataMode::Demo);

        let error = parse_cli_args(vec!["--demo", "--empty"], default_options_path())
            .expect_err("conflicting data flags");
        assert!(error.to_string().contains("cannot be combined"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_export_check_and_help() -> Result<()> {
        let options = parse_cli_args(
            vec!["--export", "payments", "--check", "-h"],
            default_options_path(),
        )?;
        assert_eq!(options.export.as_deref(), Some("payments"));
        assert!(options.check_only);
        assert!(options.show_help);
        Ok(())
    }
}
