//! The peer-visible result code taxonomy, mirrored from the peer's AEE
//! ("Application Environment Error") numbering.

use hexagonrpc_idl::IdlError;
use hexagonrpc_wire::WireError;

#[derive(Debug, thiserror::Error)]
pub enum HrpcError {
    /// Malformed descriptor, geometry mismatch, extended-id missing when
    /// required.
    #[error("bad parameter")]
    BadParam,
    /// Unknown handle, unknown method, known-unsupported feature.
    #[error("unsupported")]
    Unsupported,
    /// Allocation failure anywhere in the loop.
    #[error("out of memory")]
    NoMemory,
    /// remotectl open: the named interface does not exist.
    #[error("interface not found")]
    NotFound,
    /// A kernel/system error, propagated as `-errno` without translation.
    #[error("transport error (errno {0})")]
    Transport(i32),
    /// Filesystem/env failure unrelated to the channel itself — config
    /// loading, log file setup.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl HrpcError {
    /// The 32-bit code placed in `last_result` / returned to the immediate
    /// forward caller.
    pub fn as_result_code(&self) -> u32 {
        match self {
            HrpcError::BadParam => result_codes::EBADPARM,
            HrpcError::Unsupported => result_codes::EUNSUPPORTED,
            HrpcError::NoMemory => result_codes::ENOMEMORY,
            HrpcError::NotFound => result_codes::NOT_FOUND,
            HrpcError::Transport(errno) => *errno as u32,
            HrpcError::Io(e) => e.raw_os_error().unwrap_or(-1) as u32,
        }
    }

    /// The inverse of the `Transport` arm, for reconstructing an `HrpcError`
    /// from a raw `-errno` read off the wire.
    pub fn from_errno(errno: i32) -> Self {
        HrpcError::Transport(errno)
    }
}

/// Folds an error into the 32-bit code dispatch sites hand back to the
/// peer, collapsing the typed error into a result value at the call
/// boundary.
impl From<HrpcError> for u32 {
    fn from(e: HrpcError) -> Self {
        e.as_result_code()
    }
}

/// Named result codes, kept apart from `HrpcError::as_result_code` so the
/// mapping against the peer's AEE numbering is easy to audit.
pub mod result_codes {
    pub const OK: u32 = 0;
    pub const EBADPARM: u32 = 0x8000_0001;
    pub const EUNSUPPORTED: u32 = 0x8000_0002;
    pub const ENOMEMORY: u32 = 0x8000_0003;
    /// Domain-specific "not found", returned as `-5` by remotectl open.
    pub const NOT_FOUND: u32 = (-5i32) as u32;
}

impl From<IdlError> for HrpcError {
    fn from(_: IdlError) -> Self {
        HrpcError::BadParam
    }
}

impl From<WireError> for HrpcError {
    fn from(e: WireError) -> Self {
        HrpcError::Transport(e.raw_errno())
    }
}
