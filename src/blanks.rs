//! Cross-check that reserved filler regions of serialized records hold only NUL.

use log::debug;

use crate::codec::NUL;
use crate::error::LayoutError;
use crate::layout::{ByteRange, EntityLayout};

/// Check a single 1-indexed inclusive region of one record.
pub fn check_region(record: &[u8], range: ByteRange, index: usize) -> Result<(), LayoutError> {
    if range.start == 0 || range.end > record.len() || range.start > range.end {
        return Err(LayoutError::OutOfBounds {
            start: range.start,
            end: range.end,
            len: record.len(),
        });
    }
    match record[range.as_index()].iter().position(|&b| b != NUL) {
        None => Ok(()),
        Some(offset) => Err(LayoutError::BlankRegion {
            record: index,
            start: range.start,
            end: range.end,
            column: range.start + offset,
            byte: record[range.start - 1 + offset],
        }),
    }
}

/// Verify every blank region of every record in a concatenated byte string.
pub fn verify_blanks(layout: &EntityLayout, fire: &[u8]) -> Result<(), LayoutError> {
    if fire.len() % layout.width != 0 {
        return Err(LayoutError::RecordWidth {
            index: fire.len() / layout.width,
            expected: layout.width,
            actual: fire.len() % layout.width,
        });
    }
    let map = layout.blank_map();
    for (index, record) in fire.chunks(layout.width).enumerate() {
        for range in &map {
            check_region(record, *range, index)?;
        }
    }
    debug!(
        "verified {} blank region(s) across {} record(s)",
        map.len(),
        fire.len() / layout.width
    );
    Ok(())
}
