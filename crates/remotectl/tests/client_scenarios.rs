//! Forward-direction scenarios for opening and closing peer-side
//! interfaces.

use std::cell::RefCell;

use hexagonrpc_remotectl::{close_remote, open_remote, REMOTECTL_HANDLE};
use hexagonrpc_wire::{Channel, RawIoBuffer, ScalarDescriptor, WireError};

struct StubChannel {
    seen_sc: RefCell<Option<ScalarDescriptor>>,
    fill: Vec<(usize, Vec<u8>)>,
}

impl StubChannel {
    fn with_fill(fill: Vec<(usize, Vec<u8>)>) -> Self {
        Self {
            seen_sc: RefCell::new(None),
            fill,
        }
    }
}

impl Channel for StubChannel {
    fn invoke_raw(
        &self,
        _handle: u32,
        sc: ScalarDescriptor,
        args: &mut [RawIoBuffer],
    ) -> Result<(), WireError> {
        *self.seen_sc.borrow_mut() = Some(sc);
        for (idx, bytes) in &self.fill {
            let a = &args[*idx];
            unsafe {
                std::ptr::copy_nonoverlapping(bytes.as_ptr(), a.ptr as *mut u8, bytes.len());
            }
        }
        Ok(())
    }
}

#[test]
fn open_remote_success_reports_handle_and_no_error() {
    // raw layout for open_def: [prim_in][name inbuf][prim_out][err outbuf]
    let mut prim_out = Vec::new();
    prim_out.extend_from_slice(&7u32.to_le_bytes()); // handle
    prim_out.extend_from_slice(&0u32.to_le_bytes()); // err_valid_len

    let channel = StubChannel::with_fill(vec![(2, prim_out)]);

    let (handle, err) = open_remote(&channel, REMOTECTL_HANDLE, "apps_std").unwrap();
    assert_eq!(handle, 7);
    assert_eq!(err, None);
    assert_eq!(
        channel.seen_sc.borrow().unwrap(),
        ScalarDescriptor::make(0, 2, 2)
    );
}

#[test]
fn open_remote_reports_peer_error_message() {
    let mut prim_out = Vec::new();
    prim_out.extend_from_slice(&0u32.to_le_bytes());
    prim_out.extend_from_slice(&9u32.to_le_bytes()); // err_valid_len

    let channel = StubChannel::with_fill(vec![(2, prim_out), (3, b"not found".to_vec())]);

    let (_, err) = open_remote(&channel, REMOTECTL_HANDLE, "missing").unwrap();
    assert_eq!(err.as_deref(), Some("not found"));
}

#[test]
fn close_remote_success_reports_no_error() {
    let err_valid_len = 0u32.to_le_bytes().to_vec();
    let channel = StubChannel::with_fill(vec![(1, err_valid_len)]);

    let err = close_remote(&channel, REMOTECTL_HANDLE, 7).unwrap();
    assert_eq!(err, None);
    assert_eq!(
        channel.seen_sc.borrow().unwrap(),
        ScalarDescriptor::make(1, 1, 2)
    );
}
