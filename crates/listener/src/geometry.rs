//! Geometry validation and output-buffer allocation for inbound calls.
//! The forward marshaller's [`hexagonrpc_marshal::count_pass`]
//! sizes things from a typed `CallArg` vector the caller built; here there
//! is no caller, only bytes the peer sent, so this module re-derives the
//! same `*_SEQ` counts and sizes from the primary-input blob and the real
//! inbufs — the reverse-tunnel counterpart of the source's
//! `check_buf_sizes` / `allocate_outbufs` in `hexagonrpcd/listener.c`.

use hexagonrpc_idl::{ArgKind, InnerArg, MethodDescriptor};
use hexagonrpc_marshal::args::{inner_type_blob_seq_count, inner_type_prim_out};
use hexagonrpc_marshal::{BufCount, HrpcError};

fn read_u32(buf: &[u8], at: usize) -> Result<u32, HrpcError> {
    buf.get(at..at + 4)
        .map(|b| u32::from_le_bytes(b.try_into().unwrap()))
        .ok_or(HrpcError::BadParam)
}

/// Derives the `BufCount` a conforming call to `desc` must have produced
/// and checks each declared `*_SEQ` inbuf is at least as large as its
/// count field claims, reading counts back out of `prim_in` and real
/// sizes from `inbufs` (primary-input excluded, in wire order).
pub fn required_counts(
    desc: &MethodDescriptor,
    prim_in: &[u8],
    inbufs: &[Vec<u8>],
) -> Result<BufCount, HrpcError> {
    let mut count = BufCount::default();
    let mut cursor = 0usize;
    let mut in_idx = 0usize;

    let mut next_inbuf = |idx: &mut usize, min_len: usize| -> Result<(), HrpcError> {
        let buf = inbufs.get(*idx).ok_or(HrpcError::BadParam)?;
        if buf.len() < min_len {
            return Err(HrpcError::BadParam);
        }
        *idx += 1;
        Ok(())
    };

    if desc.is_extended() {
        cursor += 4;
        count.n_prim_in += 4;
    }

    for kind in &desc.args {
        match kind {
            ArgKind::Word(size) => {
                cursor += size.bytes() as usize;
                count.n_prim_in += size.bytes();
            }
            ArgKind::Blob(size) => {
                cursor += *size as usize;
                count.n_prim_in += size;
            }
            ArgKind::Type(idx) => {
                let inner = desc.inner_type(*idx);
                for elem in &inner.elements {
                    match elem {
                        InnerArg::Blob(size) => {
                            cursor += *size as usize;
                            count.n_prim_in += size;
                        }
                        InnerArg::BlobSeq(d) => {
                            let n = read_u32(prim_in, cursor)?;
                            cursor += 4;
                            count.n_prim_in += 4;
                            count.n_in_bufs += 1;
                            next_inbuf(&mut in_idx, *d as usize * n as usize)?;
                        }
                    }
                }
            }
            ArgKind::BlobSeq(d) => {
                let n = read_u32(prim_in, cursor)?;
                cursor += 4;
                count.n_prim_in += 4;
                count.n_in_bufs += 1;
                next_inbuf(&mut in_idx, *d as usize * n as usize)?;
            }
            ArgKind::TypeSeq(idx) => {
                let n_inst = read_u32(prim_in, cursor)?;
                cursor += 4;
                count.n_prim_in += 4;
                if n_inst > 0 {
                    let inner = desc.inner_type(*idx);
                    count.n_in_bufs += 1; // packed payload buffer
                    in_idx += 1;
                    let seqs = inner_type_blob_seq_count(inner);
                    count.n_in_bufs += seqs * n_inst;
                    in_idx += (seqs * n_inst) as usize;
                }
            }
            ArgKind::OutBlob(size) => {
                count.n_prim_out += size;
            }
            ArgKind::OutType(idx) => {
                let inner = desc.inner_type(*idx);
                for elem in &inner.elements {
                    match elem {
                        InnerArg::Blob(size) => count.n_prim_out += size,
                        InnerArg::BlobSeq(_) => {
                            read_u32(prim_in, cursor)?;
                            cursor += 4;
                            count.n_prim_in += 4;
                            count.n_out_bufs += 1;
                        }
                    }
                }
            }
            ArgKind::OutBlobSeq(_) => {
                read_u32(prim_in, cursor)?;
                cursor += 4;
                count.n_prim_in += 4;
                count.n_out_bufs += 1;
            }
            ArgKind::OutTypeSeq(idx) => {
                let max_count = read_u32(prim_in, cursor)?;
                cursor += 4;
                count.n_prim_in += 4;
                if max_count > 0 {
                    let inner = desc.inner_type(*idx);
                    let seqs = inner_type_blob_seq_count(inner);
                    count.n_in_bufs += 1; // packed counts buffer
                    next_inbuf(&mut in_idx, 4 * seqs as usize * max_count as usize)?;
                    count.n_out_bufs += 1; // packed scalar-output buffer
                    count.n_out_bufs += seqs * max_count;
                }
            }
        }
    }

    if count.n_prim_in > 0 {
        count.n_in_bufs += 1;
    }
    if count.n_prim_out > 0 {
        count.n_out_bufs += 1;
    }

    if cursor != prim_in.len() || in_idx != inbufs.len() {
        return Err(HrpcError::BadParam);
    }

    Ok(count)
}

/// Zero-filled output buffers in wire order: primary-output (if any),
/// then one buffer per `OUT_BLOB_SEQ`/`OUT_TYPE_SEQ` element, sized from
/// the counts the peer placed in `prim_in` (and, for `OUT_TYPE_SEQ`'s
/// per-instance `BLOB_SEQ` elements, in the matching packed counts
/// inbuf). Handlers write their results directly into these before the
/// listener flattens them back onto the wire.
pub fn allocate_outbufs(
    desc: &MethodDescriptor,
    prim_in: &[u8],
    inbufs: &[Vec<u8>],
) -> Result<Vec<Vec<u8>>, HrpcError> {
    let mut cursor = if desc.is_extended() { 4 } else { 0 };
    let mut in_idx = 0usize;
    let mut out: Vec<Vec<u8>> = Vec::new();
    let mut n_prim_out = 0u32;

    for kind in &desc.args {
        match kind {
            ArgKind::Word(size) => cursor += size.bytes() as usize,
            ArgKind::Blob(size) => cursor += *size as usize,
            ArgKind::Type(idx) => {
                let inner = desc.inner_type(*idx);
                for elem in &inner.elements {
                    match elem {
                        InnerArg::Blob(size) => cursor += *size as usize,
                        InnerArg::BlobSeq(_) => {
                            cursor += 4;
                            in_idx += 1;
                        }
                    }
                }
            }
            ArgKind::BlobSeq(_) => {
                cursor += 4;
                in_idx += 1;
            }
            ArgKind::TypeSeq(idx) => {
                let n_inst = read_u32(prim_in, cursor)?;
                cursor += 4;
                if n_inst > 0 {
                    let inner = desc.inner_type(*idx);
                    in_idx += 1 + (inner_type_blob_seq_count(inner) * n_inst) as usize;
                }
            }
            ArgKind::OutBlob(size) => n_prim_out += size,
            ArgKind::OutType(idx) => {
                let inner = desc.inner_type(*idx);
                n_prim_out += inner_type_prim_out(inner);
                for elem in &inner.elements {
                    if let InnerArg::BlobSeq(d) = elem {
                        let max = read_u32(prim_in, cursor)?;
                        cursor += 4;
                        out.push(vec![0u8; *d as usize * max as usize]);
                    }
                }
            }
            ArgKind::OutBlobSeq(d) => {
                let max = read_u32(prim_in, cursor)?;
                cursor += 4;
                out.push(vec![0u8; *d as usize * max as usize]);
            }
            ArgKind::OutTypeSeq(idx) => {
                let n_inst = read_u32(prim_in, cursor)?;
                cursor += 4;
                if n_inst > 0 {
                    let inner = desc.inner_type(*idx);
                    let prim_out = inner_type_prim_out(inner);
                    out.push(vec![0u8; prim_out as usize * n_inst as usize]);

                    let packed_counts = inbufs.get(in_idx).ok_or(HrpcError::BadParam)?;
                    in_idx += 1;
                    let mut packed_cursor = 0usize;
                    for _ in 0..n_inst {
                        for elem in &inner.elements {
                            if let InnerArg::BlobSeq(d) = elem {
                                let inner_max = read_u32(packed_counts, packed_cursor)?;
                                packed_cursor += 4;
                                out.push(vec![0u8; *d as usize * inner_max as usize]);
                            }
                        }
                    }
                }
            }
        }
    }

    if n_prim_out > 0 {
        out.insert(0, vec![0u8; n_prim_out as usize]);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexagonrpc_idl::WordSize;

    #[test]
    fn accepts_matching_geometry() {
        let desc = MethodDescriptor::new(
            0,
            vec![ArgKind::Word(WordSize::Four), ArgKind::BlobSeq(1)],
            vec![],
        )
        .unwrap();
        let prim_in = [5u8, 0, 0, 0, 2, 0, 0, 0];
        let inbufs = vec![b"hi".to_vec()];

        let count = required_counts(&desc, &prim_in, &inbufs).unwrap();
        assert_eq!(count.n_in_bufs, 2);
        assert_eq!(count.n_out_bufs, 0);
    }

    #[test]
    fn rejects_undersized_inbuf() {
        let desc = MethodDescriptor::new(0, vec![ArgKind::BlobSeq(1)], vec![]).unwrap();
        let prim_in = [3u8, 0, 0, 0];
        let inbufs = vec![b"ab".to_vec()];

        assert!(required_counts(&desc, &prim_in, &inbufs).is_err());
    }
}
