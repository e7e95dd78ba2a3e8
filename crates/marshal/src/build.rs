//! Passes 2 and 3: allocate and encode. Rust's ownership model collapses
//! the source's separate "free" pass into `Drop` on [`InvokeBuffers`] —
//! every buffer this module allocates is released exactly once, when the
//! value goes out of scope, regardless of which exit path is taken (see
//! DESIGN.md).

use hexagonrpc_idl::{ArgKind, InnerArg, MethodDescriptor};
use hexagonrpc_wire::{BorrowedBuf, IoBufferDescriptor};

use crate::args::{CallArg, InnerValue, InnerValueMut};
use crate::count::BufCount;
use crate::error::HrpcError;

pub struct InvokeBuffers<'a> {
    pub primary_in: Vec<u8>,
    pub primary_out: Vec<u8>,
    pub in_descs: Vec<IoBufferDescriptor<'a>>,
    pub out_descs: Vec<IoBufferDescriptor<'a>>,
}

/// What's left to do after the kernel returns, for one top-level
/// argument. `None` means the argument is either input-only or was
/// already satisfied by a direct DMA into the caller's buffer — not a
/// transfer of the allocated buffer.
pub enum DecodeTarget<'a> {
    Blob(&'a mut [u8]),
    Type {
        inner_idx: usize,
        positions: Vec<Option<&'a mut [u8]>>,
    },
    TypeSeq {
        inner_idx: usize,
        out_desc_index: usize,
        instances: Vec<Vec<Option<&'a mut [u8]>>>,
    },
}

fn put_u32(buf: &mut [u8], at: usize, v: u32) {
    buf[at..at + 4].copy_from_slice(&v.to_le_bytes());
}

pub fn alloc_and_encode<'a>(
    desc: &MethodDescriptor,
    count: BufCount,
    args: Vec<CallArg<'a>>,
) -> Result<(InvokeBuffers<'a>, Vec<Option<DecodeTarget<'a>>>), HrpcError> {
    let mut primary_in = vec![0u8; count.n_prim_in as usize];
    let primary_out = vec![0u8; count.n_prim_out as usize];
    let mut in_descs: Vec<IoBufferDescriptor<'a>> = Vec::new();
    let mut out_descs: Vec<IoBufferDescriptor<'a>> = Vec::new();
    let mut targets: Vec<Option<DecodeTarget<'a>>> = Vec::with_capacity(desc.args.len());

    let mut cursor = 0usize;
    if desc.is_extended() {
        put_u32(&mut primary_in, cursor, desc.msg_id);
        cursor += 4;
    }

    for (kind, arg) in desc.args.iter().zip(args.into_iter()) {
        match (kind, arg) {
            (ArgKind::Word(size), CallArg::Word32(v)) => {
                if size.bytes() != 4 {
                    return Err(HrpcError::BadParam);
                }
                put_u32(&mut primary_in, cursor, v);
                cursor += 4;
                targets.push(None);
            }
            (ArgKind::Word(size), CallArg::Word64(v)) => {
                if size.bytes() != 8 {
                    return Err(HrpcError::BadParam);
                }
                primary_in[cursor..cursor + 8].copy_from_slice(&v.to_le_bytes());
                cursor += 8;
                targets.push(None);
            }
            (ArgKind::Blob(size), CallArg::Blob(data)) => {
                if data.len() as u32 != *size {
                    return Err(HrpcError::BadParam);
                }
                primary_in[cursor..cursor + *size as usize].copy_from_slice(data);
                cursor += *size as usize;
                targets.push(None);
            }
            (ArgKind::Type(idx), CallArg::Type(values)) => {
                let inner = desc.inner_type(*idx);
                if inner.elements.len() != values.len() {
                    return Err(HrpcError::BadParam);
                }
                for (elem, value) in inner.elements.iter().zip(values) {
                    match (elem, value) {
                        (InnerArg::Blob(size), InnerValue::Blob(data)) => {
                            if data.len() as u32 != *size {
                                return Err(HrpcError::BadParam);
                            }
                            primary_in[cursor..cursor + *size as usize].copy_from_slice(data);
                            cursor += *size as usize;
                        }
                        (InnerArg::BlobSeq(d), InnerValue::BlobSeq { count: n, data }) => {
                            if data.len() as u32 != d * n {
                                return Err(HrpcError::BadParam);
                            }
                            put_u32(&mut primary_in, cursor, n);
                            cursor += 4;
                            in_descs.push(IoBufferDescriptor::new(BorrowedBuf::In(data)));
                        }
                        _ => return Err(HrpcError::BadParam),
                    }
                }
                targets.push(None);
            }
            (ArgKind::BlobSeq(d), CallArg::BlobSeq { count: n, data }) => {
                if data.len() as u32 != d * n {
                    return Err(HrpcError::BadParam);
                }
                put_u32(&mut primary_in, cursor, n);
                cursor += 4;
                in_descs.push(IoBufferDescriptor::new(BorrowedBuf::In(data)));
                targets.push(None);
            }
            (ArgKind::TypeSeq(idx), CallArg::TypeSeq(instances)) => {
                put_u32(&mut primary_in, cursor, instances.len() as u32);
                cursor += 4;

                if !instances.is_empty() {
                    let inner = desc.inner_type(*idx);
                    let elem_prim_in = crate::args::inner_type_prim_in(inner) as usize;
                    let mut packed = vec![0u8; elem_prim_in * instances.len()];
                    let mut seq_bufs: Vec<&'a [u8]> = Vec::new();
                    let mut packed_cursor = 0usize;

                    for instance in instances {
                        if inner.elements.len() != instance.len() {
                            return Err(HrpcError::BadParam);
                        }
                        for (elem, value) in inner.elements.iter().zip(instance) {
                            match (elem, value) {
                                (InnerArg::Blob(size), InnerValue::Blob(data)) => {
                                    if data.len() as u32 != *size {
                                        return Err(HrpcError::BadParam);
                                    }
                                    packed[packed_cursor..packed_cursor + *size as usize]
                                        .copy_from_slice(data);
                                    packed_cursor += *size as usize;
                                }
                                (InnerArg::BlobSeq(d), InnerValue::BlobSeq { count: n, data }) => {
                                    if data.len() as u32 != d * n {
                                        return Err(HrpcError::BadParam);
                                    }
                                    put_u32(&mut packed, packed_cursor, n);
                                    packed_cursor += 4;
                                    seq_bufs.push(data);
                                }
                                _ => return Err(HrpcError::BadParam),
                            }
                        }
                    }

                    in_descs.push(IoBufferDescriptor::new(BorrowedBuf::Owned(packed)));
                    in_descs.extend(
                        seq_bufs
                            .into_iter()
                            .map(|data| IoBufferDescriptor::new(BorrowedBuf::In(data))),
                    );
                }
                targets.push(None);
            }
            (ArgKind::OutBlob(size), CallArg::OutBlob(dest)) => {
                if dest.len() as u32 != *size {
                    return Err(HrpcError::BadParam);
                }
                targets.push(Some(DecodeTarget::Blob(dest)));
            }
            (ArgKind::OutType(idx), CallArg::OutType(values)) => {
                let inner = desc.inner_type(*idx);
                if inner.elements.len() != values.len() {
                    return Err(HrpcError::BadParam);
                }
                let mut positions: Vec<Option<&'a mut [u8]>> = Vec::with_capacity(values.len());
                for (elem, value) in inner.elements.iter().zip(values) {
                    match (elem, value) {
                        (InnerArg::Blob(size), InnerValueMut::Blob(dest)) => {
                            if dest.len() as u32 != *size {
                                return Err(HrpcError::BadParam);
                            }
                            positions.push(Some(dest));
                        }
                        (InnerArg::BlobSeq(d), InnerValueMut::BlobSeq { max_count, dest }) => {
                            if dest.len() as u32 != d * max_count {
                                return Err(HrpcError::BadParam);
                            }
                            put_u32(&mut primary_in, cursor, max_count);
                            cursor += 4;
                            out_descs.push(IoBufferDescriptor::new(BorrowedBuf::Out(dest)));
                            positions.push(None);
                        }
                        _ => return Err(HrpcError::BadParam),
                    }
                }
                targets.push(Some(DecodeTarget::Type {
                    inner_idx: *idx,
                    positions,
                }));
            }
            (ArgKind::OutBlobSeq(d), CallArg::OutBlobSeq { max_count, dest }) => {
                if dest.len() as u32 != d * max_count {
                    return Err(HrpcError::BadParam);
                }
                put_u32(&mut primary_in, cursor, max_count);
                cursor += 4;
                out_descs.push(IoBufferDescriptor::new(BorrowedBuf::Out(dest)));
                targets.push(None);
            }
            (ArgKind::OutTypeSeq(idx), CallArg::OutTypeSeq { max_count, dest }) => {
                put_u32(&mut primary_in, cursor, max_count);
                cursor += 4;

                if max_count > 0 {
                    let inner = desc.inner_type(*idx);
                    let seq_count = crate::args::inner_type_blob_seq_count(inner);
                    let prim_out = crate::args::inner_type_prim_out(inner) as usize;

                    let mut packed_in = vec![0u8; 4 * seq_count as usize * max_count as usize];
                    let packed_out = vec![0u8; prim_out * max_count as usize];
                    let mut seq_out_bufs: Vec<&'a mut [u8]> = Vec::new();
                    let mut packed_in_cursor = 0usize;
                    let mut instance_positions: Vec<Vec<Option<&'a mut [u8]>>> =
                        Vec::with_capacity(dest.len());

                    if dest.len() as u32 != max_count {
                        return Err(HrpcError::BadParam);
                    }

                    for instance in dest {
                        if inner.elements.len() != instance.len() {
                            return Err(HrpcError::BadParam);
                        }
                        let mut positions: Vec<Option<&'a mut [u8]>> =
                            Vec::with_capacity(instance.len());
                        for (elem, value) in inner.elements.iter().zip(instance) {
                            match (elem, value) {
                                (InnerArg::Blob(size), InnerValueMut::Blob(d)) => {
                                    if d.len() as u32 != *size {
                                        return Err(HrpcError::BadParam);
                                    }
                                    positions.push(Some(d));
                                }
                                (InnerArg::BlobSeq(d_size), InnerValueMut::BlobSeq { max_count: inner_max, dest: inner_dest }) => {
                                    if inner_dest.len() as u32 != d_size * inner_max {
                                        return Err(HrpcError::BadParam);
                                    }
                                    put_u32(&mut packed_in, packed_in_cursor, inner_max);
                                    packed_in_cursor += 4;
                                    seq_out_bufs.push(inner_dest);
                                    positions.push(None);
                                }
                                _ => return Err(HrpcError::BadParam),
                            }
                        }
                        instance_positions.push(positions);
                    }

                    in_descs.push(IoBufferDescriptor::new(BorrowedBuf::Owned(packed_in)));
                    let out_desc_index = out_descs.len();
                    out_descs.push(IoBufferDescriptor::new(BorrowedBuf::Owned(packed_out)));
                    out_descs.extend(
                        seq_out_bufs
                            .into_iter()
                            .map(|d| IoBufferDescriptor::new(BorrowedBuf::Out(d))),
                    );

                    targets.push(Some(DecodeTarget::TypeSeq {
                        inner_idx: *idx,
                        out_desc_index,
                        instances: instance_positions,
                    }));
                } else {
                    targets.push(None);
                }
            }
            _ => return Err(HrpcError::BadParam),
        }
    }

    let buffers = InvokeBuffers {
        primary_in,
        primary_out,
        in_descs,
        out_descs,
    };

    Ok((buffers, targets))
}
