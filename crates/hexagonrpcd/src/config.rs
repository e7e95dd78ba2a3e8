//! Environment-derived startup configuration.

use std::os::fd::RawFd;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("HEXAGONRPC_FD is not set")]
    MissingFd,
    #[error("HEXAGONRPC_FD is not a valid file descriptor: {0}")]
    InvalidFd(std::num::ParseIntError),
}

/// Reads the channel fd the caller is expected to hand us already open,
/// the way a session-setup wrapper would pass one down to a real
/// `hexagonrpcd` rather than have it open the device node itself.
pub fn channel_fd_from_env() -> Result<RawFd, ConfigError> {
    let raw = std::env::var("HEXAGONRPC_FD").map_err(|_| ConfigError::MissingFd)?;
    raw.trim().parse::<RawFd>().map_err(ConfigError::InvalidFd)
}
