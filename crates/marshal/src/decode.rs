//! Pass 4: decode. Copies bytes the kernel wrote into the primary-output
//! blob (and a TYPE_SEQ's packed scalar-output buffer) back into the
//! caller's destination slices. BLOB_SEQ / OUT_BLOB_SEQ destinations were
//! already handed to the kernel directly in [`crate::build`], so there's
//! nothing left to copy for those.

use hexagonrpc_idl::{ArgKind, InnerArg, MethodDescriptor};
use hexagonrpc_wire::BorrowedBuf;

use crate::build::{DecodeTarget, InvokeBuffers};
use crate::error::HrpcError;

pub fn decode_pass(
    desc: &MethodDescriptor,
    buffers: &InvokeBuffers,
    targets: Vec<Option<DecodeTarget>>,
) -> Result<(), HrpcError> {
    let mut cursor = 0usize;

    for (kind, target) in desc.args.iter().zip(targets.into_iter()) {
        match (kind, target) {
            (ArgKind::OutBlob(size), Some(DecodeTarget::Blob(dest))) => {
                let size = *size as usize;
                dest.copy_from_slice(&buffers.primary_out[cursor..cursor + size]);
                cursor += size;
            }
            (ArgKind::OutType(idx), Some(DecodeTarget::Type { inner_idx, positions })) => {
                if *idx != inner_idx {
                    return Err(HrpcError::BadParam);
                }
                let inner = desc.inner_type(inner_idx);
                for (elem, pos) in inner.elements.iter().zip(positions) {
                    match elem {
                        InnerArg::Blob(size) => {
                            let size = *size as usize;
                            if let Some(dest) = pos {
                                dest.copy_from_slice(&buffers.primary_out[cursor..cursor + size]);
                            }
                            cursor += size;
                        }
                        InnerArg::BlobSeq(_) => {}
                    }
                }
            }
            (
                ArgKind::OutTypeSeq(idx),
                Some(DecodeTarget::TypeSeq {
                    inner_idx,
                    out_desc_index,
                    instances,
                }),
            ) => {
                if *idx != inner_idx {
                    return Err(HrpcError::BadParam);
                }
                let inner = desc.inner_type(inner_idx);
                let packed = match &buffers.out_descs[out_desc_index].buf {
                    BorrowedBuf::Owned(v) => v.as_slice(),
                    _ => return Err(HrpcError::BadParam),
                };
                let mut packed_cursor = 0usize;
                for instance_positions in instances {
                    for (elem, pos) in inner.elements.iter().zip(instance_positions) {
                        match elem {
                            InnerArg::Blob(size) => {
                                let size = *size as usize;
                                if let Some(dest) = pos {
                                    dest.copy_from_slice(
                                        &packed[packed_cursor..packed_cursor + size],
                                    );
                                }
                                packed_cursor += size;
                            }
                            InnerArg::BlobSeq(_) => {}
                        }
                    }
                }
            }
            (_, None) => {}
            _ => return Err(HrpcError::BadParam),
        }
    }

    Ok(())
}
