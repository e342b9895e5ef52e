//! Telemetry sinks that receive published signals.
//!
//! Sinks are handed to a policy at construction. Publishing never feeds back
//! into the policy.

use crate::signals::Signal;
use rust_decimal::Decimal;
use tracing::debug;

/// Destination of published signals.
pub trait SignalSink {
    /// Publishes one signal computed at `step`.
    fn publish(&mut self, step: u64, signal: &Signal);
}

/// Discards every signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl SignalSink for NullSink {
    fn publish(&mut self, _step: u64, _signal: &Signal) {}
}

/// Emits every signal as a `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl SignalSink for TracingSink {
    fn publish(&mut self, step: u64, signal: &Signal) {
        debug!(step = step, signal = %signal.name, value = %signal.value, "Signal published");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RecordedSignal {
    step: u64,
    signal: Signal,
}

/// Keeps the full history of published signals.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    history: Vec<RecordedSignal>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent value published under `name`.
    #[must_use]
    pub fn latest(&self, name: &str) -> Option<Decimal> {
        self.history
            .iter()
            .rev()
            .find(|r| r.signal.name == name)
            .map(|r| r.signal.value)
    }

    /// Signals published at `step`, in publication order.
    #[must_use]
    pub fn at_step(&self, step: u64) -> Vec<&Signal> {
        self.history
            .iter()
            .filter(|r| r.step == step)
            .map(|r| &r.signal)
            .collect()
    }

    /// Values published under `name`, oldest first.
    #[must_use]
    pub fn series(&self, name: &str) -> Vec<Decimal> {
        self.history
            .iter()
            .filter(|r| r.signal.name == name)
            .map(|r| r.signal.value)
            .collect()
    }
}

impl SignalSink for MemorySink {
    fn publish(&mut self, step: u64, signal: &Signal) {
        self.history.push(RecordedSignal {
            step,
            signal: signal.clone(),
        });
    }
}

impl<S: SignalSink + ?Sized> SignalSink for &mut S {
    fn publish(&mut self, step: u64, signal: &Signal) {
        (**self).publish(step, signal);
    }
}

impl<S: SignalSink + ?Sized> SignalSink for Box<S> {
    fn publish(&mut self, step: u64, signal: &Signal) {
        (**self).publish(step, signal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_memory_sink_lookups() {
        let mut sink = MemorySink::new();
        sink.publish(0, &Signal::new("Swap count", dec!(0)));
        sink.publish(1, &Signal::new("Swap count", dec!(1)));
        sink.publish(1, &Signal::new("Swap volume", dec!(12.5)));

        assert_eq!(sink.latest("Swap count"), Some(dec!(1)));
        assert_eq!(sink.latest("Impermanent loss"), None);
        assert_eq!(sink.series("Swap count"), vec![dec!(0), dec!(1)]);
        assert_eq!(sink.at_step(1).len(), 2);
    }

    fn publish_through<S: SignalSink>(mut sink: S, step: u64, signal: &Signal) {
        sink.publish(step, signal);
    }

    #[test]
    fn test_borrowed_and_boxed_sinks_forward() {
        let mut sink = MemorySink::new();
        publish_through(&mut sink, 0, &Signal::new("Wallet A", dec!(3)));
        publish_through(Box::new(&mut sink), 1, &Signal::new("Wallet A", dec!(4)));

        assert_eq!(sink.series("Wallet A"), vec![dec!(3), dec!(4)]);
        assert_eq!(sink.at_step(1), vec![&Signal::new("Wallet A", dec!(4))]);
    }
}
