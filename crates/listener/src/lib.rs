//! The reverse-tunnel loop: the peer-initiated half of the bridge, where
//! the Hexagon DSP calls back into AP-side interfaces.

pub mod config;
pub mod geometry;
pub mod proto;
pub mod registry;
pub mod run;

pub use config::Config;
pub use registry::{Interface, InterfaceRegistry, ProcSlot};
pub use run::run;
