//! Haptic device that hands patterns back to the host UI.
//!
//! The Dart side owns the platform vibration API, so core pulses are queued
//! here and returned from the next `session_pump`. At most
//! `MAX_QUEUED_PATTERNS` commands are kept; older ones are dropped first.

use std::sync::{Arc, Mutex};
use tidebreath_core::HapticDevice;

pub(crate) const MAX_QUEUED_PATTERNS: usize = 32;

/// Shared queue of vibration commands; an empty pattern means cancel.
#[derive(Clone, Default)]
pub(crate) struct HostHaptics {
    queue: Arc<Mutex<Vec<Vec<u32>>>>,
}

impl HostHaptics {
    pub(crate) fn take(&self) -> Vec<Vec<u32>> {
        match self.queue.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    fn push(&self, pattern: Vec<u32>) {
        let mut queue = self
            .queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if queue.len() == MAX_QUEUED_PATTERNS {
            queue.remove(0);
        }
        queue.push(pattern);
    }
}

impl HapticDevice for HostHaptics {
    fn vibrate(&mut self, pattern: &[u32]) {
        self.push(pattern.to_vec());
    }

    fn cancel(&mut self) {
        self.push(Vec::new());
    }
}

#[cfg(test)]
mod tests {
    use super::{HostHaptics, MAX_QUEUED_PATTERNS};
    use tidebreath_core::HapticDevice;

    #[test]
    fn take_drains_patterns_in_order() {
        let handle = HostHaptics::default();
        let mut device = handle.clone();
        device.vibrate(&[50, 150]);
        device.cancel();

        assert_eq!(handle.take(), vec![vec![50, 150], Vec::new()]);
        assert!(handle.take().is_empty());
    }

    #[test]
    fn unpumped_queue_keeps_newest_patterns() {
        let handle = HostHaptics::default();
        let mut device = handle.clone();
        for pulse in 0..(MAX_QUEUED_PATTERNS as u32 + 8) {
            device.vibrate(&[pulse]);
        }
        device.cancel();

        let queued = handle.take();
        assert_eq!(queued.len(), MAX_QUEUED_PATTERNS);
        assert_eq!(queued.first(), Some(&vec![9]));
        assert_eq!(queued.last(), Some(&Vec::new()));
    }
}
