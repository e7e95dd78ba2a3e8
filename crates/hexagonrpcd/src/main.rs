mod cli;
mod config;

use anyhow::Context;
use clap::Parser;
use hexagonrpc_listener::{Config as ListenerConfig, InterfaceRegistry};
use hexagonrpc_wire::DeviceChannel;

use cli::Args;
use config::channel_fd_from_env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    args.log_unimplemented();

    let fd = channel_fd_from_env().context("reading HEXAGONRPC_FD")?;
    let channel = DeviceChannel::from_raw_fd(fd);

    let mut registry = InterfaceRegistry::new();
    // No other interfaces are registered at this boundary (apps_std,
    // apps_mem, and CHRE method bodies are out of scope), so
    // apps_remotectl's name table is empty — it still answers every
    // `open` with "not found" the same way a populated daemon would for
    // a name it doesn't carry.
    let remotectl_handle = registry.register(hexagonrpc_remotectl::apps_remotectl(Vec::new()));
    debug_assert_eq!(remotectl_handle, 0, "apps_remotectl must be the first interface registered");

    let config = ListenerConfig::default();

    log::info!("hexagonrpcd: serving reverse calls on fd {fd}");
    let result = hexagonrpc_listener::run(&channel, &registry, &config).await;

    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            log::error!("listener loop exited: {e}");
            Err(e.into())
        }
    }
}
