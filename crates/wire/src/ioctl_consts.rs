//! Named ioctl request codes for the FastRPC device node.
//!
//! Only [`INVOKE`] is driven by this crate. The rest are named here
//! because the daemon that owns this engine issues them elsewhere
//! (session attach, shell-PD creation, dma-buf allocation, mmap) — those
//! call sites live outside this crate.

/// `FASTRPC_IOCTL_INVOKE` — the single entry point the forward marshaller
/// and the listener loop use.
pub const INVOKE: u64 = 0xc0187205;

/// Session attach, used by daemon startup before any invocation is made.
pub const INIT_ATTACH: u64 = 0x7307;
/// Session attach for the sensors PD.
pub const INIT_ATTACH_SNS: u64 = 0x730a;
/// Create a shell process domain from an ELF.
pub const INIT_CREATE: u64 = 0xc0387308;
/// Create a statically-defined process domain.
pub const INIT_CREATE_STATIC: u64 = 0xc0787309;
/// Allocate a DMA-BUF for buffer pass-through.
pub const ALLOC_DMA_BUFF: u64 = 0xc0187303;
/// Map a DMA-BUF region into the DSP address space.
pub const MMAP: u64 = 0xc0187304;
