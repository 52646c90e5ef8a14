// SPDX-License-Identifier: GPL-3.0-only

//! Frame sampling and duplicate suppression

use crate::constants::scan;
use std::time::{Duration, Instant};

/// Decides which frames get decoded and which results reach the user
///
/// At most one frame per `interval` is sampled, none while a result is shown,
/// and a payload that was just dismissed is ignored for `cooldown` so a code
/// still held in front of the camera doesn't pop up again at once.
#[derive(Debug, Clone)]
pub struct ScanGate {
    interval: Duration,
    cooldown: Duration,
    last_sample: Option<Instant>,
    in_flight: bool,
    dismissed: Option<(String, Instant)>,
}

impl ScanGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            cooldown: scan::DUPLICATE_COOLDOWN,
            last_sample: None,
            in_flight: false,
            dismissed: None,
        }
    }

    /// Change the sampling interval (config reload)
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Whether a frame captured at `now` should be decoded
    pub fn should_sample(&self, now: Instant, showing_result: bool) -> bool {
        if showing_result || self.in_flight {
            return false;
        }
        match self.last_sample {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        }
    }

    /// Record that a decode started at `now`
    pub fn begin(&mut self, now: Instant) {
        self.last_sample = Some(now);
        self.in_flight = true;
    }

    /// Record that the running decode finished
    pub fn finish(&mut self) {
        self.in_flight = false;
    }

    /// Whether `text` is the payload dismissed less than `cooldown` ago
    pub fn is_duplicate(&self, text: &str, now: Instant) -> bool {
        match &self.dismissed {
            Some((last, at)) => last == text && now.saturating_duration_since(*at) < self.cooldown,
            None => false,
        }
    }

    /// Record that the dialog for `text` was closed at `now`
    pub fn dismissed(&mut self, text: String, now: Instant) {
        self.dismissed = Some((text, now));
    }

    /// Forget pacing state, e.g. after the camera restarted
    pub fn reset(&mut self) {
        self.last_sample = None;
        self.in_flight = false;
    }
}

impl Default for ScanGate {
    fn default() -> Self {
        Self::new(Duration::from_millis(scan::DEFAULT_INTERVAL_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(500);

    #[test]
    fn test_samples_at_most_once_per_interval() {
        let mut gate = ScanGate::new(INTERVAL);
        let t0 = Instant::now();
        assert!(gate.should_sample(t0, false));

        gate.begin(t0);
        gate.finish();
        assert!(!gate.should_sample(t0 + Duration::from_millis(100), false));
        assert!(gate.should_sample(t0 + INTERVAL, false));
    }

    #[test]
    fn test_no_sampling_while_result_shown_or_in_flight() {
        let mut gate = ScanGate::new(INTERVAL);
        let t0 = Instant::now();
        assert!(!gate.should_sample(t0, true));

        gate.begin(t0);
        assert!(!gate.should_sample(t0 + INTERVAL * 2, false));
        gate.finish();
        assert!(gate.should_sample(t0 + INTERVAL * 2, false));
    }

    #[test]
    fn test_duplicate_within_cooldown() {
        let mut gate = ScanGate::new(INTERVAL);
        let t0 = Instant::now();
        assert!(!gate.is_duplicate("hello", t0));

        gate.dismissed("hello".to_string(), t0);
        assert!(gate.is_duplicate("hello", t0 + Duration::from_millis(500)));
        assert!(!gate.is_duplicate("other", t0 + Duration::from_millis(500)));
        assert!(!gate.is_duplicate("hello", t0 + scan::DUPLICATE_COOLDOWN));
    }

    #[test]
    fn test_reset_clears_pacing() {
        let mut gate = ScanGate::new(INTERVAL);
        let t0 = Instant::now();
        gate.begin(t0);
        gate.reset();
        assert!(gate.should_sample(t0, false));
    }
}
