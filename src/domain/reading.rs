// Reading domain models
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl Reading {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Most recent readings, bounded to `capacity` entries in ascending time order.
///
/// The buffer is never merged: every `replace` discards whatever was there.
#[derive(Debug, Clone)]
pub struct SeriesBuffer {
    capacity: usize,
    readings: Vec<Reading>,
}

impl SeriesBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            readings: Vec::with_capacity(capacity),
        }
    }

    /// Swap in a fresh sequence, keeping only the newest `capacity` readings.
    pub fn replace(&mut self, mut readings: Vec<Reading>) {
        readings.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        if readings.len() > self.capacity {
            let excess = readings.len() - self.capacity;
            readings.drain(..excess);
        }
        self.readings = readings;
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }
}
