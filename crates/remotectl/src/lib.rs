//! Remote-processor-control: the interface every other interface is
//! opened and closed through, on both ends of the bridge.

pub mod client;
pub mod proto;
pub mod reverse;

pub use client::{close_remote, open_remote};
pub use proto::{close_def, open_def, MAX_ERR_LEN, REMOTECTL_HANDLE};
pub use reverse::apps_remotectl;
