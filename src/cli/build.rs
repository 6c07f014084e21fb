//! Build command implementations (build, batch)

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};
use crate::config::loader::{
    find_config, load_config, merge_cli_overrides, project_root, CliOverrides,
};
use crate::config::UnibuildConfig;
use crate::dispatch::{BuildOutcome, DispatchError, Dispatcher};
use crate::executor::{BuildOptions, ConfigScenes, EngineExecutor};
use crate::registry::Registry;

/// Run the build command
pub fn run_build(
    target: &str,
    config_path: Option<&Path>,
    name: Option<&str>,
    engine: Option<&Path>,
    debug: bool,
    verbose: bool,
) -> ExitCode {
    let dispatcher = match make_dispatcher(config_path, name, engine, verbose) {
        Ok(d) => d,
        Err(code) => return code,
    };

    report(dispatcher.dispatch_by_token(target, options_for(debug)), &dispatcher)
}

/// Run the batch command
pub fn run_batch(
    args: &[String],
    config_path: Option<&Path>,
    debug: bool,
    verbose: bool,
) -> ExitCode {
    let dispatcher = match make_dispatcher(config_path, None, None, verbose) {
        Ok(d) => d,
        Err(code) => return code,
    };

    report(dispatcher.dispatch_from_args(args, options_for(debug)), &dispatcher)
}

fn options_for(debug: bool) -> BuildOptions {
    if debug {
        BuildOptions::debug()
    } else {
        BuildOptions::none()
    }
}

/// Load config, resolve the engine, and assemble a dispatcher.
fn make_dispatcher(
    config_path: Option<&Path>,
    name: Option<&str>,
    engine: Option<&Path>,
    verbose: bool,
) -> Result<Dispatcher, ExitCode> {
    let (config, project_root) = load_project(config_path, verbose)?;

    let mut config = config;
    let overrides = CliOverrides {
        name: name.map(|n| n.to_string()),
        engine: engine.map(|p| p.to_path_buf()),
    };
    merge_cli_overrides(&mut config, &overrides);

    let engine_project = if config.engine.project_path.is_absolute() {
        config.engine.project_path.clone()
    } else {
        project_root.join(&config.engine.project_path)
    };

    let executor = match EngineExecutor::locate(
        config.engine.executable.clone(),
        engine_project,
        config.engine.build_method.clone(),
    ) {
        Ok(exec) => exec,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    };

    if verbose {
        println!("Using engine: {}", executor.executable().display());
    }

    Ok(Dispatcher::new(
        Registry::builtin(),
        config.project.name.clone(),
        Box::new(ConfigScenes::new(config.scenes)),
        Box::new(executor),
    )
    .with_project_root(project_root)
    .with_verbose(verbose))
}

/// Find and load the project config, returning it with the project root.
fn load_project(
    config_path: Option<&Path>,
    verbose: bool,
) -> Result<(UnibuildConfig, PathBuf), ExitCode> {
    match config_path {
        Some(path) => {
            let config = match load_config(Some(path)) {
                Ok(cfg) => cfg,
                Err(e) => {
                    eprintln!("Error loading config: {}", e);
                    return Err(ExitCode::from(EXIT_ERROR));
                }
            };
            let root = project_root(path)
                .map(Path::to_path_buf)
                .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());
            Ok((config, root))
        }
        None => match find_config() {
            Some(found) => {
                if verbose {
                    println!("Using config: {}", found.display());
                }
                let config = match load_config(Some(&found)) {
                    Ok(cfg) => cfg,
                    Err(e) => {
                        eprintln!("Error loading config: {}", e);
                        return Err(ExitCode::from(EXIT_ERROR));
                    }
                };
                let root = project_root(&found)
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());
                Ok((config, root))
            }
            None => {
                if verbose {
                    println!("No unibuild.toml found, using defaults");
                }
                let root = std::env::current_dir().unwrap_or_default();
                Ok((crate::config::loader::default_config(), root))
            }
        },
    }
}

/// Print the outcome or error and map it to an exit code.
fn report(result: Result<BuildOutcome, DispatchError>, dispatcher: &Dispatcher) -> ExitCode {
    match result {
        Ok(outcome) => {
            if outcome.is_success() {
                println!("{}", outcome.summary());
                ExitCode::from(EXIT_SUCCESS)
            } else {
                eprintln!("{}", outcome.summary());
                ExitCode::from(EXIT_ERROR)
            }
        }
        Err(e @ DispatchError::UnknownTarget { .. })
        | Err(e @ DispatchError::UnknownPlatformId { .. }) => {
            eprintln!("Error: {}", e);
            eprintln!();
            eprintln!("Known targets:");
            for token in dispatcher.registry().tokens() {
                eprintln!("  {}", token);
            }
            ExitCode::from(EXIT_INVALID_ARGS)
        }
        Err(e) => {
            eprintln!("Build error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
