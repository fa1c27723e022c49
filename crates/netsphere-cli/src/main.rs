mod cli;
mod commands;
mod console;
mod shutdown;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Command};
use netsphere_core::config::{ConfigStore, polling};
use tracing_subscriber::EnvFilter;

use commands::set::SetRequest;

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("netsphere=info".parse()?)
                .add_directive("netsphere_core=info".parse()?),
        )
        .init();

    let store = ConfigStore::new(args.config.clone());
    let target = args.target();
    let overlay = args.overlay_config();

    match args.command {
        Some(Command::Status { json }) => commands::status::run(&target, &store, json),
        Some(Command::Set {
            fullscreen,
            quality,
            aspect,
            fps,
            fov,
            save,
        }) => commands::set::run(
            &target,
            &store,
            SetRequest {
                fullscreen,
                quality,
                aspect,
                fps,
                fov,
                save,
            },
        ),
        Some(Command::Watch {
            interval_ms,
            attach_every,
        }) => commands::watch::run(overlay, interval_ms, attach_every),
        Some(Command::Layout { json }) => commands::layout::run(json),
        None => commands::watch::run(
            overlay,
            polling::FRAME_INTERVAL_MS,
            polling::TIMER_ATTACH_INTERVAL_FRAMES,
        ),
    }
}
