//! The top-level entry point: count → allocate/encode → submit → decode.
//! There is no separate free pass — [`crate::build::InvokeBuffers`]
//! drops at the end of this function's scope regardless of which `?` exits
//! first, which is the one place this crate's shape diverges from the
//! source's five explicit passes (see DESIGN.md).

use hexagonrpc_idl::MethodDescriptor;
use hexagonrpc_wire::{Channel, RawIoBuffer, ScalarDescriptor};

use crate::args::CallArg;
use crate::build::{alloc_and_encode, InvokeBuffers};
use crate::count::{count_pass, BufCount};
use crate::decode::decode_pass;
use crate::error::{result_codes, HrpcError};

/// Runs one forward call: `desc` describes the method, `handle` selects
/// the peer-side interface, `args` are the caller's typed arguments in
/// declaration order. Returns the AEE-style result code on success (always
/// `result_codes::OK` here — the source's `hexagonrpc()` only ever reports
/// the local ioctl's outcome, not a separate peer status word).
pub fn invoke(
    desc: &MethodDescriptor,
    channel: &dyn Channel,
    handle: u32,
    args: Vec<CallArg>,
) -> Result<u32, HrpcError> {
    let count = count_pass(desc, &args)?;
    let (mut buffers, targets) = alloc_and_encode(desc, count, args)?;

    let method = if desc.is_extended() {
        hexagonrpc_wire::EXTENDED_METHOD_SLOT
    } else {
        desc.msg_id
    };
    let sc = ScalarDescriptor::make(method, count.n_in_bufs, count.n_out_bufs);

    let mut raw = assemble_raw(&mut buffers, count);
    channel.invoke_raw(handle, sc, &mut raw)?;

    decode_pass(desc, &buffers, targets)?;
    Ok(result_codes::OK)
}

/// Flattens `buffers` into the `[primary_in?, in_descs..., primary_out?,
/// out_descs...]` layout the scalar descriptor's `(n_in, n_out)` counts
/// describe.
fn assemble_raw(buffers: &mut InvokeBuffers, count: BufCount) -> Vec<RawIoBuffer> {
    let mut raw = Vec::with_capacity((count.n_in_bufs + count.n_out_bufs) as usize);

    if count.n_prim_in > 0 {
        raw.push(RawIoBuffer {
            ptr: buffers.primary_in.as_mut_ptr() as u64,
            length: buffers.primary_in.len() as u64,
            fd: -1,
            attr: 0,
        });
    }
    for d in &mut buffers.in_descs {
        raw.push(d.to_raw());
    }
    if count.n_prim_out > 0 {
        raw.push(RawIoBuffer {
            ptr: buffers.primary_out.as_mut_ptr() as u64,
            length: buffers.primary_out.len() as u64,
            fd: -1,
            attr: 0,
        });
    }
    for d in &mut buffers.out_descs {
        raw.push(d.to_raw());
    }

    raw
}
