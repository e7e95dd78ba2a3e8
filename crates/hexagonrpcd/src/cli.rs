//! Command-line surface. Flags are parsed and stored so the binary's
//! invocation shape matches a real `hexagonrpcd`, but the behavior behind
//! most of them — sysfs auto-detection, shell-PD creation, dma-buf
//! plumbing, client spawning — lives outside the bridge this crate
//! implements, so `main` only logs that it saw them.

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "hexagonrpcd")]
#[command(about = "Bridges AP-side callers to the Hexagon DSP over FastRPC")]
pub struct Args {
    /// FastRPC device node to open, if not inherited via HEXAGONRPC_FD.
    #[arg(short = 'f', long = "device")]
    pub device: Option<String>,

    /// Shell ELF to load into the target signed PD before serving.
    #[arg(short = 'c', long = "shell-elf")]
    pub shell_elf: Option<String>,

    /// DSP domain to attach to (adsp, cdsp, sdsp, mdsp).
    #[arg(short = 'd', long = "dsp")]
    pub dsp: Option<String>,

    /// Client program to spawn once the bridge is serving. Repeatable.
    #[arg(short = 'p', long = "client-prog")]
    pub client_progs: Vec<String>,

    /// Root directory the remote filesystem calls are rooted under.
    #[arg(short = 'R', long = "root-dir")]
    pub root_dir: Option<String>,

    /// Attach sensor PDs before serving.
    #[arg(short = 's', long = "attach-sensors")]
    pub attach_sensors: bool,
}

impl Args {
    /// Logs every flag that was supplied but whose behavior this binary
    /// does not implement, so an operator isn't left wondering why `-c`
    /// did nothing.
    pub fn log_unimplemented(&self) {
        if self.device.is_some() {
            log::warn!("-f/--device is accepted but sysfs auto-detection is not implemented; the channel fd still comes from HEXAGONRPC_FD");
        }
        if self.shell_elf.is_some() {
            log::warn!("-c/--shell-elf is accepted but shell-PD loading is not implemented");
        }
        if self.dsp.is_some() {
            log::warn!("-d/--dsp is accepted but DSP domain selection is not implemented");
        }
        if !self.client_progs.is_empty() {
            log::warn!(
                "-p/--client-prog ({} given) is accepted but client spawning is not implemented",
                self.client_progs.len()
            );
        }
        if self.root_dir.is_some() {
            log::warn!("-R/--root-dir is accepted but remote filesystem rooting is not implemented");
        }
        if self.attach_sensors {
            log::warn!("-s/--attach-sensors is accepted but sensor-PD attachment is not implemented");
        }
    }
}
