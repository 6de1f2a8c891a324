
use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};
use crate::ZIL_MAC_LEN;

/// Length of the address tuple naming the first physical copy of a
/// logical block.
pub const BLOCK_IDENTITY_LEN: usize = 16;

/// On-disk size of a full block pointer, as embedded in intent-log
/// write records.
pub const BLOCK_POINTER_LEN: usize = 128;

/// On-disk size of the chain header at the front of every intent-log
/// block.
pub const ZIL_CHAIN_LEN: usize = 8 + BLOCK_POINTER_LEN + 8 + ZIL_MAC_LEN;

/// Common header carried by every intent-log record.
pub const LOG_RECORD_HDR_LEN: usize = 8;

/// Fixed payload of a write record between its header and the
/// embedded block pointer.
pub const WRITE_RECORD_BODY_LEN: usize = 64;

/// Total length of a write record with no inline data.
pub const WRITE_RECORD_LEN: usize = LOG_RECORD_HDR_LEN + WRITE_RECORD_BODY_LEN + BLOCK_POINTER_LEN;

/// Record type of a write record.
pub const LOG_RECORD_TYPE_WRITE: u32 = 9;

/// Block classes the crypto core tells apart. Intent-log blocks get
/// their own scatter/gather plan, IV derivation and tag length;
/// everything else is a plain data block.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ObjectType {
    Data,
    IntentLog,
}

/// Names a record within an intent log. The sequence number embedded
/// in `blkid` makes the tuple globally unique, which is what lets it
/// stand in for the birth epoch in the intent-log IV derivation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Bookmark {
    pub objset: u64,
    pub object: u64,
    pub level: u64,
    pub blkid: u64,
}

impl Bookmark {
    pub(crate) fn to_bytes(self) -> [u8; 32] {
        let mut buf = [0u8; 32];
        LittleEndian::write_u64(&mut buf[0..8], self.objset);
        LittleEndian::write_u64(&mut buf[8..16], self.object);
        LittleEndian::write_u64(&mut buf[16..24], self.level);
        LittleEndian::write_u64(&mut buf[24..32], self.blkid);
        buf
    }
}

/// Chain header at the front of an intent-log block.
///
/// The crypto core reads `bytes_used` to bound the record walk and
/// leaves the `mac` slot to the caller; the remaining fields are
/// owned by the log layer and pass through untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZilChain {
    pub pad: u64,
    pub next_block: [u8; BLOCK_POINTER_LEN],
    pub bytes_used: u64,
    pub mac: [u8; ZIL_MAC_LEN],
}

impl ZilChain {
    /// An empty chain header claiming `bytes_used` bytes of log data.
    pub fn new(bytes_used: u64) -> ZilChain {
        ZilChain {
            pad: 0,
            next_block: [0u8; BLOCK_POINTER_LEN],
            bytes_used,
            mac: [0u8; ZIL_MAC_LEN],
        }
    }

    pub fn parse(buf: &[u8]) -> Result<ZilChain> {
        if buf.len() < ZIL_CHAIN_LEN {
            return Err(Error::TruncatedLogHeader(buf.len()));
        }

        let mut next_block = [0u8; BLOCK_POINTER_LEN];
        next_block.copy_from_slice(&buf[8..8 + BLOCK_POINTER_LEN]);
        let mut mac = [0u8; ZIL_MAC_LEN];
        mac.copy_from_slice(&buf[144..ZIL_CHAIN_LEN]);

        Ok(ZilChain {
            pad: LittleEndian::read_u64(&buf[0..8]),
            next_block,
            bytes_used: LittleEndian::read_u64(&buf[136..144]),
            mac,
        })
    }

    pub fn write_to(&self, buf: &mut [u8]) -> Result<()> {
        if buf.len() < ZIL_CHAIN_LEN {
            return Err(Error::TruncatedLogHeader(buf.len()));
        }

        LittleEndian::write_u64(&mut buf[0..8], self.pad);
        buf[8..8 + BLOCK_POINTER_LEN].copy_from_slice(&self.next_block);
        LittleEndian::write_u64(&mut buf[136..144], self.bytes_used);
        buf[144..ZIL_CHAIN_LEN].copy_from_slice(&self.mac);
        Ok(())
    }
}

/// Common header of an intent-log record: a 4-byte type tag and the
/// 4-byte total record length, both little-endian.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LogRecordHeader {
    pub rec_type: u32,
    pub rec_len: u32,
}

impl LogRecordHeader {
    pub fn parse(buf: &[u8]) -> Option<LogRecordHeader> {
        if buf.len() < LOG_RECORD_HDR_LEN {
            return None;
        }
        Some(LogRecordHeader {
            rec_type: LittleEndian::read_u32(&buf[0..4]),
            rec_len: LittleEndian::read_u32(&buf[4..8]),
        })
    }

    pub fn write_to(&self, buf: &mut [u8]) {
        LittleEndian::write_u32(&mut buf[0..4], self.rec_type);
        LittleEndian::write_u32(&mut buf[4..8], self.rec_len);
    }
}
