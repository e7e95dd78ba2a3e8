//! Method descriptors for the remote-processor-control interface, grounded
//! on `libhexagonrpc/interface/remotectl.c`/`remotectl.h`: `open` (msg_id
//! 0, name in / handle+err out) and `close` (msg_id 1, handle in / err
//! out).

use hexagonrpc_idl::{ArgKind, MethodDescriptor, WordSize};

/// The handle `remotectl` itself is always invoked through, on both ends
/// of the bridge.
pub const REMOTECTL_HANDLE: u32 = 0;

/// Bound for the peer-reported error string, matching the 256-byte
/// scratch buffers the source's callers stack-allocate for it.
pub const MAX_ERR_LEN: usize = 256;

pub fn open_def() -> MethodDescriptor {
    MethodDescriptor::new(
        0,
        vec![
            ArgKind::BlobSeq(1),
            ArgKind::OutBlob(4),
            ArgKind::OutBlobSeq(1),
            ArgKind::OutBlob(4),
        ],
        vec![],
    )
    .expect("static descriptor is well-formed")
}

pub fn close_def() -> MethodDescriptor {
    MethodDescriptor::new(
        1,
        vec![
            ArgKind::Word(WordSize::Four),
            ArgKind::OutBlobSeq(1),
            ArgKind::OutBlob(4),
        ],
        vec![],
    )
    .expect("static descriptor is well-formed")
}
