//! The forward-direction client: opens and closes peer-side interfaces by
//! name, grounded on `hexagonrpc_open`/`hexagonrpc_close` in
//! `libhexagonrpc/handle.c` — except `close` here invokes
//! [`crate::proto::close_def`], not the open descriptor `hexagonrpc_close`
//! mistakenly reused there (see DESIGN.md).

use hexagonrpc_marshal::{CallArgs, HrpcError};
use hexagonrpc_wire::Channel;

use crate::proto::{close_def, open_def, MAX_ERR_LEN};

fn peer_error(err_buf: &[u8], err_len: u32) -> Option<String> {
    if err_len == 0 {
        return None;
    }
    let len = (err_len as usize).min(err_buf.len());
    Some(String::from_utf8_lossy(&err_buf[..len]).into_owned())
}

/// Opens a peer-side interface by name. A transport/marshalling failure is
/// `Err`; a peer-reported open failure (e.g. the name doesn't exist) comes
/// back as `Ok((_, Some(message)))` with the handle left unset.
pub fn open_remote(
    channel: &dyn Channel,
    remotectl_handle: u32,
    name: &str,
) -> Result<(u32, Option<String>), HrpcError> {
    let mut name_bytes = name.as_bytes().to_vec();
    name_bytes.push(0);

    let mut handle_buf = [0u8; 4];
    let mut err_buf = vec![0u8; MAX_ERR_LEN];
    let mut err_len_buf = [0u8; 4];

    let args = CallArgs::new()
        .push_blob_seq(name_bytes.len() as u32, &name_bytes)
        .push_out_blob(&mut handle_buf)
        .push_out_blob_seq(MAX_ERR_LEN as u32, &mut err_buf)
        .push_out_blob(&mut err_len_buf)
        .build();

    hexagonrpc_marshal::invoke(&open_def(), channel, remotectl_handle, args)?;

    let err_len = u32::from_le_bytes(err_len_buf);
    Ok((u32::from_le_bytes(handle_buf), peer_error(&err_buf, err_len)))
}

/// Closes a peer-side interface previously opened with [`open_remote`].
pub fn close_remote(
    channel: &dyn Channel,
    remotectl_handle: u32,
    target_handle: u32,
) -> Result<Option<String>, HrpcError> {
    let mut err_buf = vec![0u8; MAX_ERR_LEN];
    let mut err_len_buf = [0u8; 4];

    let args = CallArgs::new()
        .push_word_u32(target_handle)
        .push_out_blob_seq(MAX_ERR_LEN as u32, &mut err_buf)
        .push_out_blob(&mut err_len_buf)
        .build();

    hexagonrpc_marshal::invoke(&close_def(), channel, remotectl_handle, args)?;

    let err_len = u32::from_le_bytes(err_len_buf);
    Ok(peer_error(&err_buf, err_len))
}
