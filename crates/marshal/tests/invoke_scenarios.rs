//! End-to-end scenarios for the forward marshaller against a stub
//! `Channel`, mirroring the fixed value tables a real device would see on
//! the wire.

use std::cell::RefCell;

use hexagonrpc_idl::{ArgKind, MethodDescriptor, WordSize};
use hexagonrpc_marshal::{invoke, result_codes, CallArgs};
use hexagonrpc_wire::{Channel, RawIoBuffer, ScalarDescriptor, WireError};

/// Records the scalar descriptor and a byte-for-byte snapshot of every
/// buffer the marshaller handed it, and optionally fills output buffers
/// the way the kernel would before returning.
struct StubChannel {
    seen_sc: RefCell<Option<ScalarDescriptor>>,
    seen_bufs: RefCell<Vec<Vec<u8>>>,
    fill: Vec<(usize, Vec<u8>)>,
}

impl StubChannel {
    fn new() -> Self {
        Self {
            seen_sc: RefCell::new(None),
            seen_bufs: RefCell::new(Vec::new()),
            fill: Vec::new(),
        }
    }

    fn with_fill(fill: Vec<(usize, Vec<u8>)>) -> Self {
        Self {
            fill,
            ..Self::new()
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

        let snapshots = args
            .iter()
            .map(|a| unsafe {
                if a.ptr == 0 {
                    Vec::new()
                } else {
                    std::slice::from_raw_parts(a.ptr as *const u8, a.length as usize).to_vec()
                }
            })
            .collect();
        *self.seen_bufs.borrow_mut() = snapshots;

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
fn s1_no_args_call() {
    let desc = MethodDescriptor::new(0, vec![], vec![]).unwrap();
    let channel = StubChannel::new();

    let result = invoke(&desc, &channel, 0, CallArgs::new().build()).unwrap();

    assert_eq!(result, result_codes::OK);
    assert_eq!(
        channel.seen_sc.borrow().unwrap(),
        ScalarDescriptor::make(0, 0, 0)
    );
    assert!(channel.seen_bufs.borrow().is_empty());
}

#[test]
fn s2_mixed_scalars_and_sequences() {
    let desc = MethodDescriptor::new(
        0,
        vec![
            ArgKind::Word(WordSize::Four),
            ArgKind::BlobSeq(1),
            ArgKind::BlobSeq(1),
            ArgKind::Word(WordSize::Eight),
        ],
        vec![],
    )
    .unwrap();

    let channel = StubChannel::new();
    let args = CallArgs::new()
        .push_word_u32(0x0123_4567)
        .push_blob_seq(2, b"hi")
        .push_blob_seq(0, &[])
        .push_word_u64(0xFEDC_BA98_7654_3210)
        .build();

    invoke(&desc, &channel, 0, args).unwrap();

    assert_eq!(
        channel.seen_sc.borrow().unwrap(),
        ScalarDescriptor::make(0, 3, 0)
    );
    let bufs = channel.seen_bufs.borrow();
    assert_eq!(
        bufs[0],
        vec![
            0x67, 0x45, 0x23, 0x01, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10, 0x32,
            0x54, 0x76, 0x98, 0xBA, 0xDC, 0xFE,
        ]
    );
    assert_eq!(bufs[1], b"hi".to_vec());
    assert_eq!(bufs[2], Vec::<u8>::new());
}

#[test]
fn s3_output_path() {
    let desc = MethodDescriptor::new(
        1,
        vec![
            ArgKind::OutBlob(4),
            ArgKind::OutBlobSeq(1),
            ArgKind::OutBlobSeq(1),
        ],
        vec![],
    )
    .unwrap();

    let mut u32_out = [0xffu8; 4];
    let mut dst_hi = [0u8; 2];
    let mut dst_hello = [0u8; 5];

    // raw layout: [primary_in][primary_out][outbuf(dst_hi)][outbuf(dst_hello)]
    let channel = StubChannel::with_fill(vec![
        (1, vec![0, 0, 0, 0]),
        (2, b"hi".to_vec()),
        (3, b"hello".to_vec()),
    ]);

    let args = CallArgs::new()
        .push_out_blob(&mut u32_out)
        .push_out_blob_seq(2, &mut dst_hi)
        .push_out_blob_seq(5, &mut dst_hello)
        .build();

    invoke(&desc, &channel, 0, args).unwrap();

    assert_eq!(
        channel.seen_sc.borrow().unwrap(),
        ScalarDescriptor::make(1, 1, 3)
    );
    assert_eq!(channel.seen_bufs.borrow()[0], vec![2, 0, 0, 0, 5, 0, 0, 0]);
    assert_eq!(u32_out, [0, 0, 0, 0]);
    assert_eq!(&dst_hi, b"hi");
    assert_eq!(&dst_hello, b"hello");
}

#[test]
fn s4_extended_method_id() {
    let desc = MethodDescriptor::new(
        32,
        vec![
            ArgKind::Word(WordSize::Four),
            ArgKind::BlobSeq(1),
            ArgKind::BlobSeq(1),
        ],
        vec![],
    )
    .unwrap();

    let channel = StubChannel::new();
    let args = CallArgs::new()
        .push_word_u32(0x0123_4567)
        .push_blob_seq(2, b"hi")
        .push_blob_seq(0, &[])
        .build();

    invoke(&desc, &channel, 0, args).unwrap();

    assert_eq!(
        channel.seen_sc.borrow().unwrap(),
        ScalarDescriptor::make(hexagonrpc_wire::EXTENDED_METHOD_SLOT, 3, 0)
    );
    let bufs = channel.seen_bufs.borrow();
    assert_eq!(
        &bufs[0][..16],
        &[
            0x20, 0x00, 0x00, 0x00, 0x67, 0x45, 0x23, 0x01, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00,
        ]
    );
}
