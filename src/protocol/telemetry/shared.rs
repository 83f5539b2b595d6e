//! Snapshot cell for deployments that decode and transmit from separate
//! tasks.
//!
//! One task writes through [`SharedSnapshot::update`]; readers take a copy
//! with [`SharedSnapshot::snapshot`] and encode every frame of a cycle from
//! that single copy.
use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex, RawMutex};
use embassy_sync::blocking_mutex::Mutex;

use crate::core::TelemetrySnapshot;

pub struct SharedSnapshot<M: RawMutex> {
    inner: Mutex<M, Cell<TelemetrySnapshot>>,
}

impl<M: RawMutex> SharedSnapshot<M> {
    /// Build around an explicit raw mutex.
    pub const fn with_mutex(raw: M) -> Self {
        Self {
            inner: Mutex::const_new(raw, Cell::new(TelemetrySnapshot::new())),
        }
    }

    /// Copy of the current snapshot.
    pub fn snapshot(&self) -> TelemetrySnapshot {
        self.inner.lock(|cell| cell.get())
    }

    /// Mutate the snapshot under the lock; the change becomes visible to
    /// readers all at once.
    pub fn update<R>(&self, f: impl FnOnce(&mut TelemetrySnapshot) -> R) -> R {
        self.inner.lock(|cell| {
            let mut snapshot = cell.get();
            let result = f(&mut snapshot);
            cell.set(snapshot);
            result
        })
    }
}

impl SharedSnapshot<CriticalSectionRawMutex> {
    /// Cell usable from a `static` shared across executors and interrupts.
    pub const fn new() -> Self {
        Self::with_mutex(CriticalSectionRawMutex::new())
    }
}

impl SharedSnapshot<NoopRawMutex> {
    /// Cell for tasks running on one executor.
    pub const fn local() -> Self {
        Self::with_mutex(NoopRawMutex::new())
    }
}

//==================================================================================TESTS
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Hundredths;
    use crate::protocol::telemetry::decoder::TelemetryDecoder;

    #[test]
    fn readers_see_whole_updates() {
        let shared = SharedSnapshot::local();
        let mut decoder = TelemetryDecoder::new();

        let applied = shared.update(|snapshot| decoder.decode_line("V\t12800\tSOC\t950", snapshot));
        assert_eq!(applied, 2);

        let copy = shared.snapshot();
        assert_eq!(copy.voltage, Hundredths::new(12, 80));
        assert_eq!(copy.state_of_charge, Hundredths::new(95, 0));
    }

    #[test]
    fn copies_are_detached() {
        let shared = SharedSnapshot::local();
        let before = shared.snapshot();
        shared.update(|snapshot| snapshot.voltage = Hundredths::new(1, 0));
        assert_eq!(before, TelemetrySnapshot::new());
        assert_eq!(shared.snapshot().voltage, Hundredths::new(1, 0));
    }
}
