//! GT911 capacitive touch controller
//!
//! Polled, no interrupt line. Each poll is two bus transactions:
//!
//! 1. write the big-endian point-info register address, read back the
//!    status byte and all five point records
//! 2. write zero to the status register so the controller latches the
//!    next report
//!
//! The status is cleared even when the report was not ready; a stale
//! ready flag would otherwise make the next poll return the same points.

use embedded_hal_async::i2c::I2c;
use lcdbridge_core::input::{TouchHandler, TouchTracker};
use lcdbridge_protocol::gt911::{
    clear_status_command, register_bytes, ReportError, TouchReport, REG_POINT_INFO, REPORT_LEN,
};

/// Poll failures. None of them are fatal; the caller skips the update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchError {
    /// I2C transaction failed
    Bus,
    /// No fresh report latched
    NotReady,
    /// Status byte claimed more points than the controller supports
    Malformed(u8),
}

impl From<ReportError> for TouchError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::NotReady => TouchError::NotReady,
            ReportError::TooManyPoints(n) => TouchError::Malformed(n),
        }
    }
}

/// GT911 driver over an async I2C bus
pub struct Gt911<I> {
    i2c: I,
    address: u8,
}

impl<I: I2c> Gt911<I> {
    pub fn new(i2c: I, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Read and decode one report
    pub async fn read_report(&mut self) -> Result<TouchReport, TouchError> {
        let mut raw = [0u8; REPORT_LEN];
        self.i2c
            .write_read(self.address, &register_bytes(REG_POINT_INFO), &mut raw)
            .await
            .map_err(|_| TouchError::Bus)?;

        self.i2c
            .write(self.address, &clear_status_command())
            .await
            .map_err(|_| TouchError::Bus)?;

        Ok(TouchReport::parse(&raw)?)
    }

    /// Read one report and feed it through `tracker`
    ///
    /// Returns the number of points down. On error the tracker is left
    /// untouched.
    pub async fn poll<H: TouchHandler>(
        &mut self,
        tracker: &mut TouchTracker,
        handler: &mut H,
    ) -> Result<usize, TouchError> {
        let report = self.read_report().await?;
        tracker.update(&report, handler);
        Ok(report.points.len())
    }

    /// Release the bus
    pub fn release(self) -> I {
        self.i2c
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};
    use heapless::Vec;
    use lcdbridge_protocol::gt911::{I2C_ADDRESS, POINT_RECORD_LEN};

    /// Register file mock: answers any read with `block`, records writes
    struct MockBus {
        block: [u8; REPORT_LEN],
        writes: Vec<Vec<u8, 4>, 8>,
        fail: bool,
    }

    impl MockBus {
        fn with_points(status: u8, points: &[(u8, u16, u16)]) -> Self {
            let mut block = [0u8; REPORT_LEN];
            block[0] = status;
            for (i, &(id, x, y)) in points.iter().enumerate() {
                let off = 1 + i * POINT_RECORD_LEN;
                block[off] = id;
                block[off + 1..off + 3].copy_from_slice(&x.to_le_bytes());
                block[off + 3..off + 5].copy_from_slice(&y.to_le_bytes());
            }
            Self {
                block,
                writes: Vec::new(),
                fail: false,
            }
        }
    }

    impl ErrorType for MockBus {
        type Error = ErrorKind;
    }

    impl I2c for MockBus {
        async fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            assert_eq!(address, I2C_ADDRESS);
            if self.fail {
                return Err(ErrorKind::Other);
            }
            for op in operations {
                match op {
                    Operation::Write(bytes) => {
                        let _ = self.writes.push(Vec::from_slice(*bytes).unwrap());
                    }
                    Operation::Read(buf) => {
                        let n = buf.len().min(REPORT_LEN);
                        buf[..n].copy_from_slice(&self.block[..n]);
                    }
                }
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct Events {
        downs: Vec<(u16, u16), 8>,
        ups: Vec<(u16, u16), 8>,
    }

    impl TouchHandler for Events {
        fn touch_down(&mut self, x: u16, y: u16) {
            let _ = self.downs.push((x, y));
        }

        fn touch_up(&mut self, x: u16, y: u16) {
            let _ = self.ups.push((x, y));
        }
    }

    #[test]
    fn test_read_report_then_clear() {
        let bus = MockBus::with_points(0x81, &[(0, 570, 45)]);
        let mut touch = Gt911::new(bus, I2C_ADDRESS);

        let report = block_on(touch.read_report()).unwrap();
        assert_eq!(report.points.len(), 1);
        assert_eq!(report.points[0].x, 570);

        let bus = touch.release();
        assert_eq!(bus.writes.len(), 2);
        assert_eq!(bus.writes[0].as_slice(), &[0x81, 0x4E]);
        assert_eq!(bus.writes[1].as_slice(), &[0x81, 0x4E, 0x00]);
    }

    #[test]
    fn test_not_ready_still_clears() {
        let bus = MockBus::with_points(0x01, &[(0, 10, 10)]);
        let mut touch = Gt911::new(bus, I2C_ADDRESS);

        assert_eq!(block_on(touch.read_report()), Err(TouchError::NotReady));
        assert_eq!(touch.release().writes.len(), 2);
    }

    #[test]
    fn test_malformed_count() {
        let bus = MockBus::with_points(0x87, &[]);
        let mut touch = Gt911::new(bus, I2C_ADDRESS);
        assert_eq!(block_on(touch.read_report()), Err(TouchError::Malformed(7)));
    }

    #[test]
    fn test_bus_error() {
        let mut bus = MockBus::with_points(0x81, &[(0, 1, 1)]);
        bus.fail = true;
        let mut touch = Gt911::new(bus, I2C_ADDRESS);
        assert_eq!(block_on(touch.read_report()), Err(TouchError::Bus));
    }

    #[test]
    fn test_poll_emits_edges() {
        let mut tracker = TouchTracker::new();
        let mut events = Events::default();

        let mut touch = Gt911::new(MockBus::with_points(0x81, &[(1, 100, 200)]), I2C_ADDRESS);
        assert_eq!(block_on(touch.poll(&mut tracker, &mut events)), Ok(1));
        assert_eq!(events.downs.as_slice(), &[(100, 200)]);

        let mut touch = Gt911::new(MockBus::with_points(0x80, &[]), I2C_ADDRESS);
        assert_eq!(block_on(touch.poll(&mut tracker, &mut events)), Ok(0));
        assert_eq!(events.ups.as_slice(), &[(100, 200)]);
    }

    #[test]
    fn test_failed_poll_keeps_tracker() {
        let mut tracker = TouchTracker::new();
        let mut events = Events::default();

        let mut touch = Gt911::new(MockBus::with_points(0x81, &[(0, 5, 6)]), I2C_ADDRESS);
        block_on(touch.poll(&mut tracker, &mut events)).unwrap();

        let mut bus = MockBus::with_points(0x80, &[]);
        bus.fail = true;
        let mut touch = Gt911::new(bus, I2C_ADDRESS);
        assert_eq!(
            block_on(touch.poll(&mut tracker, &mut events)),
            Err(TouchError::Bus)
        );
        assert!(events.ups.is_empty());
    }
}
