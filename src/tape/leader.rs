/// Tape lead-in and lead-out framing

use crate::error::Result;
use crate::format::constants::{
    LEAD_IN_BYTE, LEAD_IN_FILL_LEN, LEAD_IN_LEN, LEAD_IN_SYNC_BYTE, LEAD_OUT_BYTE, LEAD_OUT_LEN,
};
use crate::io::ByteCursor;

/// The 255 x 0x80 + 5 x 0xFE block before a tape header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadIn {
    /// Offset in the image
    pub offset: usize,
    /// Raw bytes (always 260)
    pub bytes: Vec<u8>,
}

impl LeadIn {
    /// Read a lead-in, valid or not
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let offset = cursor.position();
        let bytes = cursor.advance(LEAD_IN_LEN)?.to_vec();
        Ok(Self { offset, bytes })
    }

    /// Consume a lead-in only if one is present and exact
    pub fn try_read(cursor: &mut ByteCursor<'_>) -> Option<Self> {
        cursor.speculate(|c| {
            let lead_in = LeadIn::read(c).ok()?;
            lead_in.is_valid().then_some(lead_in)
        })
    }

    /// Does `data` start with an exact lead-in?
    pub fn matches(data: &[u8]) -> bool {
        data.len() >= LEAD_IN_LEN
            && data[..LEAD_IN_FILL_LEN].iter().all(|&b| b == LEAD_IN_BYTE)
            && data[LEAD_IN_FILL_LEN..LEAD_IN_LEN]
                .iter()
                .all(|&b| b == LEAD_IN_SYNC_BYTE)
    }

    /// Fill part of the lead-in
    pub fn fill(&self) -> &[u8] {
        &self.bytes[..LEAD_IN_FILL_LEN]
    }

    /// Sync part of the lead-in
    pub fn sync(&self) -> &[u8] {
        &self.bytes[LEAD_IN_FILL_LEN..]
    }

    /// Number of 0x80 bytes in the fill part
    pub fn fill_count(&self) -> usize {
        self.fill().iter().filter(|&&b| b == LEAD_IN_BYTE).count()
    }

    /// Number of 0xFE bytes in the sync part
    pub fn sync_count(&self) -> usize {
        self.sync().iter().filter(|&&b| b == LEAD_IN_SYNC_BYTE).count()
    }

    /// Exact 255 x 0x80 then 5 x 0xFE
    pub fn is_valid(&self) -> bool {
        Self::matches(&self.bytes)
    }
}

/// Zero bytes after the program checksum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadOut {
    /// Offset in the image
    pub offset: usize,
    /// Raw bytes, whatever length was found
    pub bytes: Vec<u8>,
}

impl LeadOut {
    /// Take everything left as the lead-out
    pub fn read(cursor: &mut ByteCursor<'_>) -> Self {
        let offset = cursor.position();
        let bytes = cursor.advance_to_end().to_vec();
        Self { offset, bytes }
    }

    /// Expected length?
    pub fn length_valid(&self) -> bool {
        self.bytes.len() == LEAD_OUT_LEN
    }

    /// Only zero bytes?
    pub fn content_valid(&self) -> bool {
        self.bytes.iter().all(|&b| b == LEAD_OUT_BYTE)
    }
}
