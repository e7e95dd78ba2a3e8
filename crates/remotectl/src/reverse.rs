//! The reverse-direction service: the interface registered at handle 0 so
//! the peer can open AP-side interfaces by name, grounded on the same
//! `remotectl_open_def`/`remotectl_close_def` shapes `crate::proto`
//! builds for the forward direction — the wire contract is symmetric,
//! only which side initiates differs.

use hexagonrpc_listener::{Interface, ProcSlot};
use hexagonrpc_marshal::result_codes;

use crate::proto::{close_def, open_def};

const NOT_FOUND: u32 = result_codes::NOT_FOUND;

fn write_u32(buf: &mut [u8], at: usize, v: u32) {
    buf[at..at + 4].copy_from_slice(&v.to_le_bytes());
}

fn write_err(outs: &mut [Vec<u8>], err_valid_len_buf_idx: usize, err_buf_idx: usize, message: &str) {
    let bytes = message.as_bytes();
    let cap = outs[err_buf_idx].len();
    let len = bytes.len().min(cap);
    outs[err_buf_idx][..len].copy_from_slice(&bytes[..len]);
    write_u32(&mut outs[0], err_valid_len_buf_idx, len as u32);
}

/// Builds the `apps_remotectl` interface from a name → handle table
/// resolved once at startup, after every other interface has been
/// registered (handles never change afterward, so a snapshot is exact for
/// the registry's whole lifetime).
pub fn apps_remotectl(name_table: Vec<(String, u32)>) -> Interface {
    let open_table = name_table;

    let open_handler = move |ins: &[Vec<u8>], outs: &mut [Vec<u8>]| -> u32 {
        let name_bytes = ins.get(1).map(Vec::as_slice).unwrap_or(&[]);
        let name = String::from_utf8_lossy(name_bytes.split(|&b| b == 0).next().unwrap_or(&[]));
        let name: &str = name.as_ref();

        match open_table.iter().find(|(n, _)| n.as_str() == name) {
            Some((_, handle)) => {
                write_u32(&mut outs[0], 0, *handle);
                write_u32(&mut outs[0], 4, 0);
                result_codes::OK
            }
            None => {
                log::error!("apps_remotectl: open requested for unknown interface {name:?}");
                write_u32(&mut outs[0], 0, 0);
                write_err(outs, 4, 1, "interface not found");
                NOT_FOUND
            }
        }
    };

    let close_handler = move |_ins: &[Vec<u8>], outs: &mut [Vec<u8>]| -> u32 {
        // No reclamation: always reports success, the same no-op the
        // forward-side registry's own `close` is.
        write_u32(&mut outs[0], 0, 0);
        result_codes::OK
    };

    Interface::new(
        "apps_remotectl",
        vec![
            ProcSlot {
                descriptor: open_def(),
                handler: Box::new(open_handler),
            },
            ProcSlot {
                descriptor: close_def(),
                handler: Box::new(close_handler),
            },
        ],
    )
}
