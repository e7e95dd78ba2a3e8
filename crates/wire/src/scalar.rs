//! Packed 32-bit scalar descriptor: `[3 attr][5 method][8 in][8 out][4 in-handles][4 out-handles]`.
//!
//! Mirrors `REMOTE_SCALARS_MAKEX`/`REMOTE_SCALARS_METHOD` et al. from the
//! peer's `remote.h`. The engine always emits `attr = 0` and both handle
//! counts `0`; a descriptor with nonzero handles arriving from the peer is
//! rejected with `EBADPARM` by the listener, not by this type.

/// Method slot value that signals "the real message id is the first word
/// of the primary-input blob" (msg_id > 30).
pub const EXTENDED_METHOD_SLOT: u32 = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScalarDescriptor(u32);

impl ScalarDescriptor {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn into_raw(self) -> u32 {
        self.0
    }

    pub const fn makex(
        attr: u32,
        method: u32,
        n_in: u32,
        n_out: u32,
        n_in_handles: u32,
        n_out_handles: u32,
    ) -> Self {
        Self(
            ((attr & 0x7) << 29)
                | ((method & 0x1f) << 24)
                | ((n_in & 0xff) << 16)
                | ((n_out & 0xff) << 8)
                | ((n_in_handles & 0x0f) << 4)
                | (n_out_handles & 0x0f),
        )
    }

    /// Builds a descriptor the way the engine always does: no attributes,
    /// no handles.
    pub const fn make(method: u32, n_in: u32, n_out: u32) -> Self {
        Self::makex(0, method, n_in, n_out, 0, 0)
    }

    pub const fn attr(self) -> u32 {
        (self.0 >> 29) & 0x7
    }

    pub const fn method(self) -> u32 {
        (self.0 >> 24) & 0x1f
    }

    pub const fn in_bufs(self) -> u32 {
        (self.0 >> 16) & 0xff
    }

    pub const fn out_bufs(self) -> u32 {
        (self.0 >> 8) & 0xff
    }

    pub const fn in_handles(self) -> u32 {
        (self.0 >> 4) & 0x0f
    }

    pub const fn out_handles(self) -> u32 {
        self.0 & 0x0f
    }

    /// True when the method slot is the reserved extended-id marker.
    pub const fn is_extended(self) -> bool {
        self.method() == EXTENDED_METHOD_SLOT
    }
}
