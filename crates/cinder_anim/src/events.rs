//! Scheduler lifecycle notifications.
//!
//! Interested parties subscribe for a receiver and drain it at their own
//! pace. Emission never blocks the driver: a full channel drops the event.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

/// Events emitted as the scheduler's lifecycle progresses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SchedulerEvent {
    /// The driver thread started.
    Started,
    /// The simulation was paused.
    Paused,
    /// The simulation was resumed.
    Resumed,
    /// The driver was asked to stop.
    Stopped,
    /// The scheduler was destroyed and its active set cleared.
    Destroyed,
    /// An ambient batch was admitted to the active set.
    AmbientSpawned {
        /// Number of animations in the batch.
        count: usize,
    },
    /// Finished animations were swept out of the active set.
    Retired {
        /// Number of animations removed this tick.
        count: usize,
    },
}

/// Handle for draining scheduler events.
///
/// Receivers share one queue: each event is delivered to whichever
/// subscriber receives it first.
#[derive(Clone)]
pub struct EventReceiver {
    receiver: Receiver<SchedulerEvent>,
}

impl EventReceiver {
    /// Receives all pending events (non-blocking).
    #[inline]
    pub fn drain(&self) -> Vec<SchedulerEvent> {
        let mut events = Vec::with_capacity(16);
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Receives one event (non-blocking).
    #[inline]
    pub fn try_recv(&self) -> Option<SchedulerEvent> {
        self.receiver.try_recv().ok()
    }

    /// Number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Whether any event is pending.
    #[inline]
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.receiver.is_empty()
    }
}

/// Bounded event channel owned by the scheduler.
pub(crate) struct EventChannel {
    sender: Sender<SchedulerEvent>,
    receiver: Receiver<SchedulerEvent>,
}

impl EventChannel {
    pub(crate) fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Emits without blocking; a full channel drops the event.
    pub(crate) fn emit(&self, event: SchedulerEvent) {
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                tracing::trace!(?event, "event channel full, dropping");
            }
            Err(TrySendError::Disconnected(_)) => {}
        }
    }

    pub(crate) fn subscribe(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.receiver.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_and_drain() {
        let channel = EventChannel::new(16);
        let receiver = channel.subscribe();

        channel.emit(SchedulerEvent::Started);
        channel.emit(SchedulerEvent::AmbientSpawned { count: 5 });

        assert!(receiver.has_events());
        let events = receiver.drain();
        assert_eq!(
            events,
            vec![
                SchedulerEvent::Started,
                SchedulerEvent::AmbientSpawned { count: 5 }
            ]
        );
        assert!(!receiver.has_events());
    }

    #[test]
    fn test_full_channel_drops() {
        let channel = EventChannel::new(2);
        let receiver = channel.subscribe();

        channel.emit(SchedulerEvent::Started);
        channel.emit(SchedulerEvent::Paused);
        // Third emission has nowhere to go; it is dropped, not blocked on.
        channel.emit(SchedulerEvent::Resumed);

        assert_eq!(receiver.pending_count(), 2);
        assert_eq!(
            receiver.drain(),
            vec![SchedulerEvent::Started, SchedulerEvent::Paused]
        );
    }
}
