// In crates/core-types/src/signal_log.rs

use serde::Serialize;

use crate::{Error, Result, Signal};

/// The running history of emitted signals for one session.
///
/// Entries are kept in emission order and can only be appended or cleared
/// all at once. No two entries share the same `time`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct SignalLog {
    entries: Vec<Signal>,
}

impl SignalLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a signal, rejecting one whose `time` is already present.
    pub fn append(&mut self, signal: Signal) -> Result<()> {
        if self.entries.iter().any(|s| s.time == signal.time) {
            return Err(Error::DuplicateSignal { time: signal.time });
        }
        self.entries.push(signal);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The last `n` entries, newest first. Does not reorder the log itself.
    pub fn tail(&self, n: usize) -> Vec<Signal> {
        self.entries.iter().rev().take(n).copied().collect()
    }

    pub fn last(&self) -> Option<&Signal> {
        self.entries.last()
    }

    /// Entries in emission order.
    pub fn iter(&self) -> std::slice::Iter<'_, Signal> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LeverageHint, SignalKind};

    fn signal(time: i64, price: f64) -> Signal {
        Signal {
            kind: SignalKind::Buy,
            time,
            price,
            take_profit: price + 2.0,
            stop_loss: price - 1.0,
            leverage_hint: LeverageHint::X20,
        }
    }

    #[test]
    fn append_keeps_emission_order() {
        let mut log = SignalLog::new();
        log.append(signal(1, 10.0)).unwrap();
        log.append(signal(2, 11.0)).unwrap();
        log.append(signal(3, 12.0)).unwrap();

        let times: Vec<i64> = log.iter().map(|s| s.time).collect();
        assert_eq!(times, vec![1, 2, 3]);
        assert_eq!(log.last().map(|s| s.time), Some(3));
    }

    #[test]
    fn append_rejects_duplicate_time() {
        let mut log = SignalLog::new();
        log.append(signal(7, 10.0)).unwrap();

        let err = log.append(signal(7, 99.0)).unwrap_err();
        assert_eq!(err, Error::DuplicateSignal { time: 7 });
        assert_eq!(log.len(), 1);
        assert_eq!(log.last().map(|s| s.price), Some(10.0));
    }

    #[test]
    fn tail_is_newest_first_and_bounded() {
        let mut log = SignalLog::new();
        for t in 1..=12 {
            log.append(signal(t, t as f64)).unwrap();
        }

        let tail: Vec<i64> = log.tail(10).iter().map(|s| s.time).collect();
        assert_eq!(tail, vec![12, 11, 10, 9, 8, 7, 6, 5, 4, 3]);

        // Underlying order is untouched.
        assert_eq!(log.iter().next().map(|s| s.time), Some(1));
        assert_eq!(log.tail(50).len(), 12);
        assert!(log.tail(0).is_empty());
    }

    #[test]
    fn clear_empties_the_log() {
        let mut log = SignalLog::new();
        log.append(signal(1, 10.0)).unwrap();
        log.append(signal(2, 11.0)).unwrap();

        log.clear();

        assert!(log.is_empty());
        assert!(log.last().is_none());
        for n in [0, 1, 10, 100] {
            assert!(log.tail(n).is_empty());
        }
    }

    #[test]
    fn cleared_log_accepts_a_previously_seen_time() {
        let mut log = SignalLog::new();
        log.append(signal(1, 10.0)).unwrap();
        log.clear();
        assert!(log.append(signal(1, 10.0)).is_ok());
    }
}
