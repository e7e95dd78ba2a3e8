//! The reverse-tunnel loop, grounded on
//! `run_fastrpc_listener`/`return_for_next_invoke`/`invoke_requested_procedure`
//! in `hexagonrpcd/listener.c`. Reverse calls are strictly sequential:
//! there is one `next2` in flight at a time, and the state a round needs to
//! carry into the next is all stack-local here, never a module `static`.

use hexagonrpc_marshal::{
    codec::{encode_outbufs, InbufDecoder},
    result_codes, CallArgs, HrpcError,
};
use hexagonrpc_wire::{Channel, ScalarDescriptor};

use crate::config::Config;
use crate::geometry::{allocate_outbufs, required_counts};
use crate::proto::{init2_def, next2_def};
use crate::registry::{resolve_method, InterfaceRegistry};

/// What one `next2` round carries forward into the next: the rctx the
/// peer handed us, the result of the call we just serviced, and that
/// call's flattened output buffers.
struct ListenerState {
    last_rctx: u32,
    last_result: u32,
    last_outbufs: Vec<Vec<u8>>,
}

impl ListenerState {
    fn initial() -> Self {
        Self {
            last_rctx: 0,
            // Matches the source's sentinel: no previous call has run yet.
            last_result: 0xffff_ffff,
            last_outbufs: Vec::new(),
        }
    }
}

/// Runs the reverse-tunnel loop until the channel reports a transport
/// error. Validation failures (unknown handle, unknown method, geometry
/// mismatch) never break the loop — they set the next round's result code
/// and `continue`, exactly like the source's `invoke_requested_procedure`
/// returning a nonzero `*result` without `ret`.
pub async fn run(
    channel: &(dyn Channel + Send + Sync),
    registry: &InterfaceRegistry,
    config: &Config,
) -> Result<(), HrpcError> {
    tokio::task::block_in_place(|| {
        hexagonrpc_marshal::invoke(&init2_def(), channel, config.adsp_listener_handle, CallArgs::new().build())
    })?;

    let mut state = ListenerState::initial();

    loop {
        let mut rctx_buf = [0u8; 4];
        let mut handle_buf = [0u8; 4];
        let mut sc_buf = [0u8; 4];
        let mut inbufs_len_buf = [0u8; 4];
        let mut inbufs_buf = vec![0u8; config.max_listener_inbuf_len as usize];

        let ret_outbufs: Vec<&[u8]> = state.last_outbufs.iter().map(|v| v.as_slice()).collect();
        let encoded_outbufs = encode_outbufs(&ret_outbufs);

        let args = CallArgs::new()
            .push_word_u32(state.last_rctx)
            .push_word_u32(state.last_result)
            .push_blob_seq(encoded_outbufs.len() as u32, &encoded_outbufs)
            .push_out_blob(&mut rctx_buf)
            .push_out_blob(&mut handle_buf)
            .push_out_blob(&mut sc_buf)
            .push_out_blob(&mut inbufs_len_buf)
            .push_out_blob_seq(config.max_listener_inbuf_len, &mut inbufs_buf)
            .build();

        tokio::task::block_in_place(|| {
            hexagonrpc_marshal::invoke(&next2_def(), channel, config.adsp_listener_handle, args)
        })?;

        let rctx = u32::from_le_bytes(rctx_buf);
        let handle = u32::from_le_bytes(handle_buf);
        let sc = ScalarDescriptor::from_raw(u32::from_le_bytes(sc_buf));
        let inbufs_len = u32::from_le_bytes(inbufs_len_buf);

        state.last_rctx = rctx;

        if inbufs_len > config.max_listener_inbuf_len {
            log::error!("listener: inbufs_len {inbufs_len} exceeds configured bound");
            state.last_result = HrpcError::BadParam.as_result_code();
            state.last_outbufs = Vec::new();
            continue;
        }

        let mut decoder = InbufDecoder::new();
        decoder.feed(&inbufs_buf[..inbufs_len as usize]);
        if !decoder.is_complete() {
            log::error!("listener: incomplete inbuf frame from peer");
            state.last_result = HrpcError::BadParam.as_result_code();
            state.last_outbufs = Vec::new();
            continue;
        }
        let mut decoded = decoder.finish();
        if decoded.is_empty() {
            decoded.push(Vec::new());
        }
        let prim_in = decoded[0].clone();
        let real_inbufs = &decoded[1..];

        if sc.in_handles() != 0 || sc.out_handles() != 0 {
            log::error!("listener: handles are not supported");
            state.last_result = result_codes::EBADPARM;
            state.last_outbufs = Vec::new();
            continue;
        }

        let Some(iface) = registry.lookup(handle) else {
            log::error!("listener: unsupported handle {handle}");
            state.last_result = result_codes::EUNSUPPORTED;
            state.last_outbufs = Vec::new();
            continue;
        };

        let method = match resolve_method(sc, &prim_in) {
            Ok(m) => m,
            Err(e) => {
                state.last_result = e.as_result_code();
                state.last_outbufs = Vec::new();
                continue;
            }
        };

        let Some(proc) = iface.proc(method) else {
            log::error!("listener: unsupported method {method} on handle {handle}");
            state.last_result = result_codes::EUNSUPPORTED;
            state.last_outbufs = Vec::new();
            continue;
        };

        let required = match required_counts(&proc.descriptor, &prim_in, real_inbufs) {
            Ok(r) => r,
            Err(e) => {
                state.last_result = e.as_result_code();
                state.last_outbufs = Vec::new();
                continue;
            }
        };
        if required.n_in_bufs != sc.in_bufs() || required.n_out_bufs != sc.out_bufs() {
            log::error!("listener: geometry mismatch for handle {handle} method {method}");
            state.last_result = result_codes::EBADPARM;
            state.last_outbufs = Vec::new();
            continue;
        }

        let mut outbufs = match allocate_outbufs(&proc.descriptor, &prim_in, real_inbufs) {
            Ok(o) => o,
            Err(_) => {
                state.last_result = result_codes::ENOMEMORY;
                state.last_outbufs = Vec::new();
                continue;
            }
        };

        state.last_result = (proc.handler)(&decoded, &mut outbufs);
        state.last_outbufs = outbufs;
    }
}
