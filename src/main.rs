// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindgraph-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mindgraph CLI entrypoint.
//!
//! By default this runs the interactive TUI over the store directory. `--list`, `--import` and
//! `--export` run a single command against the same store and exit.

use std::error::Error;
use std::path::{Path, PathBuf};

use mindgraph::board::{system_clock, Board};
use mindgraph::model::MapId;
use mindgraph::store::{DirBackend, Storage, WriteDurability};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<store-dir>] [--durable-writes]\n  {program} [--store <dir>] [--durable-writes]\n  {program} [<store-dir>] --list\n  {program} [<store-dir>] [--durable-writes] --import <file>\n  {program} [<store-dir>] --export <map-id> [--out <dir>]\n\nIf store-dir/--store is omitted, the current working directory is used.\nThe TUI writes its log to <store-dir>/mindgraph.log (filter via MINDGRAPH_LOG).\n\n--durable-writes opts into slower, best-effort durable persistence (fsync/sync where supported)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
enum Command {
    #[default]
    Tui,
    List,
    Import(String),
    Export {
        map_id: String,
        out: Option<String>,
    },
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    store_dir: Option<String>,
    durable_writes: bool,
    command: Command,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();
    let mut out = None::<String>;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--store" => {
                if options.store_dir.is_some() {
                    return Err(());
                }
                options.store_dir = Some(args.next().ok_or(())?);
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            "--list" => {
                if options.command != Command::Tui {
                    return Err(());
                }
                options.command = Command::List;
            }
            "--import" => {
                if options.command != Command::Tui {
                    return Err(());
                }
                options.command = Command::Import(args.next().ok_or(())?);
            }
            "--export" => {
                if options.command != Command::Tui {
                    return Err(());
                }
                options.command = Command::Export {
                    map_id: args.next().ok_or(())?,
                    out: None,
                };
            }
            "--out" => {
                if out.is_some() {
                    return Err(());
                }
                out = Some(args.next().ok_or(())?);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.store_dir.is_some() {
                    return Err(());
                }
                options.store_dir = Some(arg);
            }
        }
    }

    match (&mut options.command, out) {
        (Command::Export { out, .. }, dir) => *out = dir,
        (_, Some(_)) => return Err(()),
        (_, None) => {}
    }

    Ok(options)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "mindgraph".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let dir = PathBuf::from(options.store_dir.unwrap_or_else(|| ".".to_owned()));
        let backend = if options.durable_writes {
            DirBackend::new(&dir).with_durability(WriteDurability::Durable)
        } else {
            DirBackend::new(&dir)
        };
        let storage = Storage::new(backend);

        if options.command == Command::Tui {
            let log_path = mindgraph::logging::init_file_logging(&dir)?;
            tracing::info!(store = %dir.display(), log = %log_path.display(), "starting tui");
            let board = Board::open(storage, system_clock);
            return mindgraph::tui::run(board, PathBuf::from("."));
        }

        mindgraph::logging::init_stderr_logging();
        let mut board = Board::open(storage, system_clock);
        match options.command {
            Command::Tui => {}
            Command::List => {
                for map in board.workspace().maps() {
                    println!("{}\t{}\t{}", map.map_id(), map.name(), map.nodes().len());
                }
            }
            Command::Import(path) => {
                let map_id = board.import_path(Path::new(&path))?;
                if !board.last_save_ok() {
                    return Err(format!("imported {map_id} but could not write the store").into());
                }
                println!("{map_id}");
            }
            Command::Export { map_id, out } => {
                let map_id = MapId::new(map_id)?;
                let out = PathBuf::from(out.unwrap_or_else(|| ".".to_owned()));
                let path = board.export_map_to_dir(&map_id, &out)?;
                println!("{}", path.display());
            }
        }

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("mindgraph: {err}");
        std::process::exit(1);
    }
}
