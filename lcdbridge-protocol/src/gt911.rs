//! GT911 touch controller report format.
//!
//! The controller exposes its touch state as a register block starting at
//! [`REG_POINT_INFO`]:
//! - STATUS (1 byte): bit 7 = buffer ready, bits 0..3 = number of points
//! - POINT[n] (8 bytes each): track id, x (u16 LE), y (u16 LE),
//!   size (u16 LE), reserved
//!
//! After a read the host writes 0 back to the status register so the
//! controller can latch the next report.

use heapless::Vec;

/// Default 7-bit I2C address
pub const I2C_ADDRESS: u8 = 0x5D;

/// Status register, first byte of the point block
pub const REG_POINT_INFO: u16 = 0x814E;

/// Maximum simultaneous touch points reported
pub const MAX_POINTS: usize = 5;

/// Size of one point record in bytes
pub const POINT_RECORD_LEN: usize = 8;

/// Size of the full report block (status + all point records)
pub const REPORT_LEN: usize = 1 + MAX_POINTS * POINT_RECORD_LEN;

/// Status bit set when a fresh report is latched
pub const STATUS_BUFFER_READY: u8 = 0x80;

const STATUS_POINT_MASK: u8 = 0x0F;

/// Register address as transmitted on the bus (big-endian)
pub const fn register_bytes(reg: u16) -> [u8; 2] {
    reg.to_be_bytes()
}

/// Write transaction that clears the status register
pub const fn clear_status_command() -> [u8; 3] {
    let reg = register_bytes(REG_POINT_INFO);
    [reg[0], reg[1], 0x00]
}

/// Report decoding errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportError {
    /// Status byte does not have the ready flag set
    NotReady,
    /// Point count above [`MAX_POINTS`]
    TooManyPoints(u8),
}

/// One touch point in panel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchPoint {
    /// Tracking id, stable while a finger stays down
    pub track_id: u8,
    pub x: u16,
    pub y: u16,
    pub size: u16,
}

impl TouchPoint {
    fn from_record(record: &[u8]) -> Self {
        Self {
            track_id: record[0],
            x: u16::from_le_bytes([record[1], record[2]]),
            y: u16::from_le_bytes([record[3], record[4]]),
            size: u16::from_le_bytes([record[5], record[6]]),
        }
    }
}

/// Decoded contents of one report block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TouchReport {
    pub points: Vec<TouchPoint, MAX_POINTS>,
}

impl TouchReport {
    /// Decode a raw register block
    pub fn parse(raw: &[u8; REPORT_LEN]) -> Result<Self, ReportError> {
        let status = raw[0];
        if status & STATUS_BUFFER_READY == 0 {
            return Err(ReportError::NotReady);
        }

        let count = status & STATUS_POINT_MASK;
        if count as usize > MAX_POINTS {
            return Err(ReportError::TooManyPoints(count));
        }

        let mut points = Vec::new();
        for record in raw[1..]
            .chunks_exact(POINT_RECORD_LEN)
            .take(count as usize)
        {
            // Capacity checked against MAX_POINTS above
            let _ = points.push(TouchPoint::from_record(record));
        }

        Ok(Self { points })
    }

    /// True when the report carries no touch points (all fingers lifted)
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(status: u8, points: &[(u8, u16, u16)]) -> [u8; REPORT_LEN] {
        let mut raw = [0u8; REPORT_LEN];
        raw[0] = status;
        for (i, &(id, x, y)) in points.iter().enumerate() {
            let off = 1 + i * POINT_RECORD_LEN;
            raw[off] = id;
            raw[off + 1..off + 3].copy_from_slice(&x.to_le_bytes());
            raw[off + 3..off + 5].copy_from_slice(&y.to_le_bytes());
            raw[off + 5..off + 7].copy_from_slice(&20u16.to_le_bytes());
        }
        raw
    }

    #[test]
    fn test_parse_two_points() {
        let raw = block(0x82, &[(2, 150, 180), (5, 600, 30)]);
        let report = TouchReport::parse(&raw).unwrap();
        assert_eq!(report.points.len(), 2);
        assert_eq!(
            report.points[0],
            TouchPoint {
                track_id: 2,
                x: 150,
                y: 180,
                size: 20
            }
        );
        assert_eq!(report.points[1].x, 600);
    }

    #[test]
    fn test_ready_with_zero_points() {
        let raw = block(0x80, &[]);
        assert!(TouchReport::parse(&raw).unwrap().is_empty());
    }

    #[test]
    fn test_not_ready() {
        let raw = block(0x02, &[(1, 1, 1), (2, 2, 2)]);
        assert_eq!(TouchReport::parse(&raw), Err(ReportError::NotReady));
    }

    #[test]
    fn test_malformed_count() {
        let raw = block(0x8A, &[]);
        assert_eq!(TouchReport::parse(&raw), Err(ReportError::TooManyPoints(10)));
    }

    #[test]
    fn test_clear_command() {
        assert_eq!(clear_status_command(), [0x81, 0x4E, 0x00]);
    }
}
