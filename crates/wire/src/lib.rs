//! Wire-level primitives: the packed scalar descriptor, I/O buffer
//! descriptors, and the kernel invocation entry point. No marshalling
//! logic lives here — see `hexagonrpc-marshal` for the engine that walks
//! an IDL descriptor and drives these types.

pub mod buffer;
pub mod channel;
pub mod ioctl_consts;
pub mod scalar;

pub use buffer::{BorrowedBuf, IoBufferDescriptor, RawIoBuffer};
pub use channel::{Channel, DeviceChannel, WireError};
pub use scalar::{ScalarDescriptor, EXTENDED_METHOD_SLOT};
