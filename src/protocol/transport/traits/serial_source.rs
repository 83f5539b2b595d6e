//! Byte source for the telemetry text stream (UART, USB CDC, test buffer…).

/// Non-blocking access to the bytes currently buffered by the serial link.
pub trait SerialSource {
    type Error: core::fmt::Debug;

    /// Copy up to `buf.len()` already-received bytes into `buf` and return how
    /// many were copied. Returns `Ok(0)` when nothing is pending; never waits.
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}
