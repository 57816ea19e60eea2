//! Short-lived cache of the last reading of each quantity.
//!
//! Entries are never cleared; they simply stop being returned once older than the
//! freshness window. Pressure entries also remember the oversampling mode they
//! were taken in and only match that mode.

use embassy_time::{Duration, Instant};

use crate::baro::bmp180::config::OversamplingMode;

/// Quantities with an independent cache slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingKind {
    /// Uncompensated temperature `UT`
    RawTemperature,
    /// Uncompensated pressure `UP`
    RawPressure,
    /// Compensated temperature in 0.1 °C
    Temperature,
    /// Compensated pressure in Pa
    Pressure,
}

impl ReadingKind {
    const fn slot(self) -> usize {
        match self {
            ReadingKind::RawTemperature => 0,
            ReadingKind::RawPressure => 1,
            ReadingKind::Temperature => 2,
            ReadingKind::Pressure => 3,
        }
    }

    /// Whether the value depends on the oversampling mode
    const fn mode_dependent(self) -> bool {
        matches!(self, ReadingKind::RawPressure | ReadingKind::Pressure)
    }
}

/// A value plus the moment it was captured
#[derive(Debug, Clone, Copy)]
struct CachedReading {
    value: i32,
    captured_at: Instant,
    mode: Option<OversamplingMode>,
}

/// Per-quantity last-value cache
#[derive(Debug)]
pub struct ReadingCache {
    freshness: Duration,
    slots: [Option<CachedReading>; 4],
}

impl ReadingCache {
    pub fn new(freshness: Duration) -> Self {
        Self {
            freshness,
            slots: [None; 4],
        }
    }

    pub fn freshness(&self) -> Duration {
        self.freshness
    }

    /// Returns the cached value if it was set less than the freshness window ago.
    ///
    /// `mode` is the current oversampling mode; it is ignored for temperature.
    pub fn get(&self, kind: ReadingKind, mode: OversamplingMode, now: Instant) -> Option<i32> {
        let entry = self.slots[kind.slot()]?;
        let age = now.checked_duration_since(entry.captured_at)?;
        if age >= self.freshness {
            return None;
        }
        if kind.mode_dependent() && entry.mode != Some(mode) {
            return None;
        }
        Some(entry.value)
    }

    pub fn set(&mut self, kind: ReadingKind, value: i32, mode: OversamplingMode, now: Instant) {
        self.slots[kind.slot()] = Some(CachedReading {
            value,
            captured_at: now,
            mode: kind.mode_dependent().then_some(mode),
        });
    }
}
