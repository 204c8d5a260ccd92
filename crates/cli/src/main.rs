#![warn(clippy::pedantic)]

use std::{
    fs,
    io::{self, Write},
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use repcycle_storage::{FileStore, LocalStorage, parse_log};

mod cli;
mod commands;
mod render;

use cli::Cli;
use commands::App;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let store = FileStore::open(&cli.data_dir)?;

    repcycle_app::log::init(
        Arc::new(Mutex::new(LocalStorage::new(store.clone()))),
        cli.console_level(),
    )
    .context("failed to initialize logging")?;

    let seed = cli
        .seed
        .as_ref()
        .map(|path| -> Result<_> {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            parse_log(&json).with_context(|| format!("invalid seed history {}", path.display()))
        })
        .transpose()?;

    let app = App::new(store, seed, Local::now().date_naive());
    let mut out = io::stdout().lock();
    app.run(cli.command, &mut out)?;
    out.flush()?;

    Ok(())
}
