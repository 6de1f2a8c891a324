
use std::ops::Range;

use crate::error::{Error, Result};
use crate::layout::{
    LogRecordHeader, ZilChain, BLOCK_POINTER_LEN, LOG_RECORD_HDR_LEN, LOG_RECORD_TYPE_WRITE,
    WRITE_RECORD_LEN, ZIL_CHAIN_LEN,
};

/// Scatter/gather plan for one block.
///
/// The same ranges apply to the source and the destination buffer:
/// every encrypted segment occupies identical offsets on both sides,
/// and everything outside the segments has already been copied
/// verbatim by the planner (or, for `NoEncryption`, is left for the
/// caller to copy wholesale).
#[cfg_attr(test, derive(Debug))]
pub(crate) enum BlockPlan {
    /// Nothing in this block needs encryption. The caller copies the
    /// plaintext through and zeroes the tag.
    NoEncryption,
    Crypt {
        segments: Vec<Range<usize>>,
        enc_len: usize,
    },
}

/// A regular data block is one contiguous encrypted segment.
pub(crate) fn plan_regular(datalen: usize) -> BlockPlan {
    BlockPlan::Crypt {
        segments: vec![0..datalen],
        enc_len: datalen,
    }
}

/// Walks the records of an intent-log block, copying the chain
/// header, every record header and every embedded block pointer
/// verbatim into `dst` and collecting the remaining byte ranges as
/// encrypted segments.
///
/// The walk is bounded by the header's `bytes_used` and by each
/// record's own length field; a record that understates its header,
/// overruns the used region, or claims to be a write record smaller
/// than one is rejected before any of it is read.
pub(crate) fn plan_intent_log(src: &[u8], dst: &mut [u8]) -> Result<BlockPlan> {
    debug_assert_eq!(src.len(), dst.len());

    let chain = ZilChain::parse(src)?;
    if chain.bytes_used < ZIL_CHAIN_LEN as u64 || chain.bytes_used > src.len() as u64 {
        return Err(Error::MalformedLogHeader(chain.bytes_used, src.len()));
    }
    let used = chain.bytes_used as usize;

    let mut segments = Vec::new();
    let mut enc_len = 0;

    let mut off = ZIL_CHAIN_LEN;
    while off < used {
        let hdr =
            LogRecordHeader::parse(&src[off..used]).ok_or(Error::MalformedLogRecord(off))?;
        let rec_len = hdr.rec_len as usize;
        if rec_len < LOG_RECORD_HDR_LEN || rec_len > used - off {
            return Err(Error::MalformedLogRecord(off));
        }

        if hdr.rec_type == LOG_RECORD_TYPE_WRITE {
            if rec_len < WRITE_RECORD_LEN {
                return Err(Error::MalformedLogRecord(off));
            }

            dst[off..off + LOG_RECORD_HDR_LEN]
                .copy_from_slice(&src[off..off + LOG_RECORD_HDR_LEN]);

            let body = off + LOG_RECORD_HDR_LEN..off + WRITE_RECORD_LEN - BLOCK_POINTER_LEN;
            enc_len += body.len();
            segments.push(body);

            // The embedded block pointer travels in the clear; the
            // log layer reads it before replay can decrypt anything.
            let bp = off + WRITE_RECORD_LEN - BLOCK_POINTER_LEN..off + WRITE_RECORD_LEN;
            dst[bp.clone()].copy_from_slice(&src[bp]);

            if rec_len > WRITE_RECORD_LEN {
                let inline = off + WRITE_RECORD_LEN..off + rec_len;
                enc_len += inline.len();
                segments.push(inline);
            }
        } else {
            dst[off..off + LOG_RECORD_HDR_LEN]
                .copy_from_slice(&src[off..off + LOG_RECORD_HDR_LEN]);

            let body = off + LOG_RECORD_HDR_LEN..off + rec_len;
            enc_len += body.len();
            segments.push(body);
        }

        off += rec_len;
    }

    if segments.is_empty() {
        return Ok(BlockPlan::NoEncryption);
    }

    dst[..ZIL_CHAIN_LEN].copy_from_slice(&src[..ZIL_CHAIN_LEN]);

    Ok(BlockPlan::Crypt { segments, enc_len })
}

/// Copies `data` back out into the planned ranges of `dst`.
pub(crate) fn scatter(segments: &[Range<usize>], data: &[u8], dst: &mut [u8]) {
    let mut pos = 0;
    for seg in segments {
        dst[seg.clone()].copy_from_slice(&data[pos..pos + seg.len()]);
        pos += seg.len();
    }
}

/// Collects the planned ranges of `src` into one contiguous buffer,
/// reserving `extra` bytes of spare capacity for a trailing tag.
pub(crate) fn gather(segments: &[Range<usize>], src: &[u8], extra: usize) -> Vec<u8> {
    let total: usize = segments.iter().map(|seg| seg.len()).sum();
    let mut buf = Vec::with_capacity(total + extra);
    for seg in segments {
        buf.extend_from_slice(&src[seg.clone()]);
    }
    buf
}
