// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flownav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flownav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Flownav CLI entrypoint.
//!
//! Inspects and evicts cached navigation sessions, prints the effective configuration, and
//! emits JSON schemas for the messages exchanged with the diagram surface.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use flownav::bridge::{HostCommand, SurfaceEvent};
use flownav::cache::{FileCacheStore, SessionCache};
use flownav::model::DiagramId;
use flownav::Config;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--config <file>] cache show <root-diagram-id>\n  {program} [--config <file>] cache evict <root-diagram-id>\n  {program} [--config <file>] config\n  {program} schema host|surface\n\nCache entries live under `cacheDir` (default `.flownav/cache`).\nEvery config key can be overridden with a FLOWNAV_* environment variable."
    );
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    CacheShow(String),
    CacheEvict(String),
    ShowConfig,
    Schema(SchemaKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchemaKind {
    Host,
    Surface,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config: Option<PathBuf>,
    command: Command,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut config = None;
    let mut words = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                if config.is_some() {
                    return Err(());
                }
                config = Some(PathBuf::from(args.next().ok_or(())?));
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => words.push(arg),
        }
    }

    let words = words.iter().map(String::as_str).collect::<Vec<_>>();
    let command = match words.as_slice() {
        ["cache", "show", root] => Command::CacheShow((*root).to_owned()),
        ["cache", "evict", root] => Command::CacheEvict((*root).to_owned()),
        ["config"] => Command::ShowConfig,
        ["schema", "host"] => Command::Schema(SchemaKind::Host),
        ["schema", "surface"] => Command::Schema(SchemaKind::Surface),
        _ => return Err(()),
    };

    Ok(CliOptions { config, command })
}

fn session_cache(
    config: &Config,
    root: &str,
) -> Result<SessionCache<FileCacheStore>, Box<dyn Error>> {
    let root = DiagramId::new(root)?;
    let store = Arc::new(config.cache_store());
    Ok(SessionCache::new(store, &root))
}

fn run(options: CliOptions) -> Result<(), Box<dyn Error>> {
    let config = Config::load(options.config.as_deref())?;
    flownav::logging::init_logging(&config)?;

    match options.command {
        Command::CacheShow(root) => {
            let cache = session_cache(&config, &root)?;
            match cache.latest()? {
                Some(entry) => println!("{}", serde_json::to_string_pretty(&entry)?),
                None => {
                    eprintln!("flownav: no cached session for {root}");
                    std::process::exit(1);
                }
            }
        }
        Command::CacheEvict(root) => {
            let cache = session_cache(&config, &root)?;
            cache.evict()?;
            tracing::info!(key = cache.key(), "evicted cached session");
        }
        Command::ShowConfig => println!("{}", serde_json::to_string_pretty(&config)?),
        Command::Schema(kind) => {
            let schema = match kind {
                SchemaKind::Host => schemars::schema_for!(HostCommand),
                SchemaKind::Surface => schemars::schema_for!(SurfaceEvent),
            };
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }
    Ok(())
}

fn main() {
    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "flownav".to_owned());

    let options = match parse_options(args) {
        Ok(options) => options,
        Err(()) => {
            print_usage(&program);
            std::process::exit(2);
        }
    };

    if let Err(err) = run(options) {
        eprintln!("flownav: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_options, CliOptions, Command, SchemaKind};

    fn parse(args: &[&str]) -> Result<CliOptions, ()> {
        parse_options(args.iter().map(|arg| (*arg).to_owned()))
    }

    #[test]
    fn parses_cache_commands() {
        let options = parse(&["cache", "show", "A"]).expect("parse options");
        assert_eq!(options.command, Command::CacheShow("A".to_owned()));
        assert!(options.config.is_none());

        let options = parse(&["cache", "evict", "A"]).expect("parse options");
        assert_eq!(options.command, Command::CacheEvict("A".to_owned()));
    }

    #[test]
    fn parses_config_flag_in_any_position() {
        let before = parse(&["--config", "flownav.json", "config"]).expect("parse options");
        let after = parse(&["config", "--config", "flownav.json"]).expect("parse options");
        assert_eq!(before, after);
        assert_eq!(
            before.config.as_deref(),
            Some(std::path::Path::new("flownav.json"))
        );
    }

    #[test]
    fn parses_schema_kinds() {
        assert_eq!(
            parse(&["schema", "host"]).expect("parse options").command,
            Command::Schema(SchemaKind::Host)
        );
        assert_eq!(
            parse(&["schema", "surface"]).expect("parse options").command,
            Command::Schema(SchemaKind::Surface)
        );
    }

    #[test]
    fn rejects_empty_args() {
        parse(&[]).unwrap_err();
    }

    #[test]
    fn rejects_unknown_args() {
        parse(&["--nope", "config"]).unwrap_err();
        parse(&["schema", "backend"]).unwrap_err();
        parse(&["cache", "show"]).unwrap_err();
    }

    #[test]
    fn rejects_duplicate_config_flags() {
        parse(&["--config", "a", "--config", "b", "config"]).unwrap_err();
    }

    #[test]
    fn rejects_missing_config_value() {
        parse(&["config", "--config"]).unwrap_err();
    }
}
