//! The forward marshaller: turns a [`hexagonrpc_idl::MethodDescriptor`]
//! plus a typed argument vector into one `INVOKE` ioctl and back again.

pub mod args;
pub mod build;
pub mod codec;
pub mod count;
pub mod decode;
pub mod error;
pub mod invoke;

pub use args::{CallArg, CallArgs, InnerValue, InnerValueMut};
pub use build::{alloc_and_encode, DecodeTarget, InvokeBuffers};
pub use codec::{encode_outbufs, InbufDecoder};
pub use count::{count_pass, BufCount};
pub use decode::decode_pass;
pub use error::{result_codes, HrpcError};
pub use invoke::invoke;
