//! Pass 1: count. Walks the descriptor once to size the primary-input and
//! primary-output blobs and the number of I/O buffer descriptors the call
//! will need.

use hexagonrpc_idl::{ArgKind, InnerArg, MethodDescriptor};

use crate::args::{check_arity, inner_type_blob_seq_count, CallArg};
use crate::error::HrpcError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BufCount {
    pub n_in_bufs: u32,
    pub n_out_bufs: u32,
    pub n_prim_in: u32,
    pub n_prim_out: u32,
}

pub fn count_pass(desc: &MethodDescriptor, args: &[CallArg]) -> Result<BufCount, HrpcError> {
    check_arity(args, &desc.args)?;

    let mut count = BufCount::default();
    if desc.is_extended() {
        count.n_prim_in += 4;
    }

    for (kind, arg) in desc.args.iter().zip(args) {
        match (kind, arg) {
            (ArgKind::Word(size), _) => count.n_prim_in += size.bytes(),
            (ArgKind::Blob(size), _) => count.n_prim_in += size,
            (ArgKind::Type(idx), CallArg::Type(values)) => {
                let inner = desc.inner_type(*idx);
                for (elem, value) in inner.elements.iter().zip(values) {
                    match (elem, value) {
                        (InnerArg::Blob(size), _) => count.n_prim_in += size,
                        (InnerArg::BlobSeq(_), _) => {
                            count.n_prim_in += 4;
                            count.n_in_bufs += 1;
                        }
                    }
                }
            }
            (ArgKind::BlobSeq(_), _) => {
                count.n_prim_in += 4;
                count.n_in_bufs += 1;
            }
            (ArgKind::TypeSeq(idx), CallArg::TypeSeq(instances)) => {
                count.n_prim_in += 4;
                if !instances.is_empty() {
                    let inner = desc.inner_type(*idx);
                    count.n_in_bufs += 1; // packed payload buffer
                    count.n_in_bufs += inner_type_blob_seq_count(inner) * instances.len() as u32;
                }
            }
            (ArgKind::OutBlob(size), _) => count.n_prim_out += size,
            (ArgKind::OutType(idx), _) => {
                let inner = desc.inner_type(*idx);
                for elem in &inner.elements {
                    match elem {
                        InnerArg::Blob(size) => count.n_prim_out += size,
                        InnerArg::BlobSeq(_) => {
                            count.n_prim_in += 4;
                            count.n_out_bufs += 1;
                        }
                    }
                }
            }
            (ArgKind::OutBlobSeq(_), _) => {
                count.n_prim_in += 4;
                count.n_out_bufs += 1;
            }
            (ArgKind::OutTypeSeq(idx), CallArg::OutTypeSeq { max_count, .. }) => {
                count.n_prim_in += 4;
                if *max_count > 0 {
                    let inner = desc.inner_type(*idx);
                    count.n_in_bufs += 1; // packed counts buffer
                    count.n_out_bufs += 1; // packed scalar-output buffer
                    let seqs = inner_type_blob_seq_count(inner);
                    count.n_out_bufs += seqs * max_count;
                }
            }
            _ => return Err(HrpcError::BadParam),
        }
    }

    if count.n_prim_in > 0 {
        count.n_in_bufs += 1;
    }
    if count.n_prim_out > 0 {
        count.n_out_bufs += 1;
    }

    Ok(count)
}
