//! Injected time source: a monotonic millisecond clock plus an asynchronous
//! delay, so the cycle scheduler never depends on a particular BSP timer.

/// Timer trait abstraction; must remain thread-safe when applicable.
pub trait BridgeTimer {
    /// Milliseconds elapsed since an arbitrary, fixed origin. Monotonic.
    fn now_ms(&self) -> u64;

    /// Asynchronously wait for `millis` milliseconds.
    fn delay_ms<'a>(&'a mut self, millis: u32) -> impl core::future::Future<Output = ()> + 'a;
}
