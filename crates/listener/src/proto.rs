//! Method descriptors for the `adsp_listener` reverse-tunnel control
//! methods, grounded on `hexagonrpcd/interface/adsp_listener.c`: `init2`
//! (msg_id 3, no args) and `next2` (msg_id 4, the return-previous /
//! fetch-next pair the whole loop turns on).

use hexagonrpc_idl::{ArgKind, MethodDescriptor, WordSize};

/// The peer-side handle `adsp_listener` is always invoked through.
pub const ADSP_LISTENER_HANDLE: u32 = 3;

pub fn init2_def() -> MethodDescriptor {
    MethodDescriptor::new(3, vec![], vec![]).expect("static descriptor is well-formed")
}

/// `(ret_rctx, ret_res, ret_outbufs) -> (rctx, handle, sc, inbufs_len, inbufs)`.
pub fn next2_def() -> MethodDescriptor {
    MethodDescriptor::new(
        4,
        vec![
            ArgKind::Word(WordSize::Four),
            ArgKind::Word(WordSize::Four),
            ArgKind::BlobSeq(1),
            ArgKind::OutBlob(4),
            ArgKind::OutBlob(4),
            ArgKind::OutBlob(4),
            ArgKind::OutBlob(4),
            ArgKind::OutBlobSeq(1),
        ],
        vec![],
    )
    .expect("static descriptor is well-formed")
}
