//! Scenarios against a scripted `Channel` that plays the peer's side of
//! the `init2`/`next2` handshake, one response per call, ending the loop
//! with a transport error once the scenario under test has run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use hexagonrpc_idl::MethodDescriptor;
use hexagonrpc_listener::{Config, Interface, InterfaceRegistry, ProcSlot};
use hexagonrpc_marshal::codec::encode_outbufs;
use hexagonrpc_wire::{Channel, RawIoBuffer, ScalarDescriptor, WireError};

enum Step {
    /// Fills `(raw arg index, bytes)` pairs before returning success.
    Fill(Vec<(usize, Vec<u8>)>),
    /// Ends the loop, the way a closed or dead channel would.
    Fail,
}

struct ScriptedChannel {
    calls: Mutex<usize>,
    steps: Vec<Step>,
    /// Bytes of the outgoing `ret_outbufs` `BLOB_SEQ` (raw arg index 1)
    /// seen on each call, recorded for inspection after the run.
    seen_ret_outbufs: Mutex<Vec<Vec<u8>>>,
}

impl ScriptedChannel {
    fn new(steps: Vec<Step>) -> Self {
        Self {
            calls: Mutex::new(0),
            steps,
            seen_ret_outbufs: Mutex::new(Vec::new()),
        }
    }
}

unsafe fn snapshot(a: &RawIoBuffer) -> Vec<u8> {
    if a.ptr == 0 {
        Vec::new()
    } else {
        std::slice::from_raw_parts(a.ptr as *const u8, a.length as usize).to_vec()
    }
}

impl Channel for ScriptedChannel {
    fn invoke_raw(
        &self,
        _handle: u32,
        _sc: ScalarDescriptor,
        args: &mut [RawIoBuffer],
    ) -> Result<(), WireError> {
        let mut calls = self.calls.lock().unwrap();
        let idx = *calls;
        *calls += 1;
        drop(calls);

        if args.len() > 1 {
            self.seen_ret_outbufs
                .lock()
                .unwrap()
                .push(unsafe { snapshot(&args[1]) });
        } else {
            self.seen_ret_outbufs.lock().unwrap().push(Vec::new());
        }

        match self.steps.get(idx) {
            Some(Step::Fill(fills)) => {
                for (i, bytes) in fills {
                    let a = &args[*i];
                    unsafe {
                        std::ptr::copy_nonoverlapping(bytes.as_ptr(), a.ptr as *mut u8, bytes.len());
                    }
                }
                Ok(())
            }
            Some(Step::Fail) | None => Err(WireError::Transport(-5)),
        }
    }
}

/// One empty-frame primary-input and no real inbufs, the shape a call
/// with no arguments produces on the wire.
fn empty_call_frame() -> Vec<u8> {
    encode_outbufs(&[&[]])
}

fn next2_output_fill(rctx: u32, handle: u32, sc: ScalarDescriptor, inbufs: &[u8]) -> Vec<(usize, Vec<u8>)> {
    let mut primary_out = Vec::new();
    primary_out.extend_from_slice(&rctx.to_le_bytes());
    primary_out.extend_from_slice(&handle.to_le_bytes());
    primary_out.extend_from_slice(&sc.into_raw().to_le_bytes());
    primary_out.extend_from_slice(&(inbufs.len() as u32).to_le_bytes());
    vec![(2, primary_out), (3, inbufs.to_vec())]
}

#[tokio::test(flavor = "multi_thread")]
async fn s5_unknown_handle_is_unsupported_and_skips_dispatch() {
    let registry = InterfaceRegistry::new();
    let config = Config::default();

    let frame = empty_call_frame();
    let channel = ScriptedChannel::new(vec![
        Step::Fill(vec![]), // init2
        Step::Fill(next2_output_fill(
            1,
            99, // no interface registered at this handle
            ScalarDescriptor::make(0, 0, 0),
            &frame,
        )),
        Step::Fail,
    ]);

    let err = hexagonrpc_listener::run(&channel, &registry, &config)
        .await
        .unwrap_err();
    assert!(matches!(err, hexagonrpc_marshal::HrpcError::Transport(-5)));

    assert_eq!(*channel.calls.lock().unwrap(), 3);
    // The call that serviced the EUNSUPPORTED round reported back no
    // outbufs at all, since nothing was ever dispatched.
    assert_eq!(channel.seen_ret_outbufs.lock().unwrap()[2], Vec::<u8>::new());
}

#[tokio::test(flavor = "multi_thread")]
async fn s6_geometry_mismatch_is_rejected_without_dispatch() {
    let mut registry = InterfaceRegistry::new();
    let dispatched = Arc::new(AtomicBool::new(false));
    let dispatched_clone = dispatched.clone();
    registry.register(Interface::new(
        "test_iface",
        vec![ProcSlot {
            descriptor: MethodDescriptor::new(0, vec![], vec![]).unwrap(),
            handler: Box::new(move |_ins, _outs| {
                dispatched_clone.store(true, Ordering::SeqCst);
                hexagonrpc_marshal::result_codes::OK
            }),
        }],
    ));
    let config = Config::default();

    let frame = empty_call_frame();
    // The peer claims one inbuf for a zero-argument method: geometry
    // cannot match, so this must be rejected before the handler runs.
    let channel = ScriptedChannel::new(vec![
        Step::Fill(vec![]), // init2
        Step::Fill(next2_output_fill(
            1,
            0,
            ScalarDescriptor::make(0, 1, 0),
            &frame,
        )),
        Step::Fail,
    ]);

    let err = hexagonrpc_listener::run(&channel, &registry, &config)
        .await
        .unwrap_err();
    assert!(matches!(err, hexagonrpc_marshal::HrpcError::Transport(-5)));

    assert!(!dispatched.load(Ordering::SeqCst));
    assert_eq!(channel.seen_ret_outbufs.lock().unwrap()[2], Vec::<u8>::new());
}
