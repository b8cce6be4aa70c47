use crossbeam_channel::{Receiver, Sender};
use vello::kurbo::Size;

/// Broadcasts viewport size changes to every live subscriber.
pub struct ResizeSignal {
    current: Size,
    subscribers: Vec<Sender<Size>>,
}

impl ResizeSignal {
    pub fn new(initial: Size) -> Self {
        Self {
            current: initial,
            subscribers: Vec::new(),
        }
    }

    /// Latest viewport size in logical pixels.
    pub fn current(&self) -> Size {
        self.current
    }

    /// Registers a listener; it stays registered until the subscription is dropped.
    pub fn subscribe(&mut self) -> ResizeSubscription {
        let (sender, receiver) = crossbeam_channel::unbounded();
        self.subscribers.push(sender);
        ResizeSubscription { receiver }
    }

    /// Records the new size and delivers it, pruning dropped subscriptions.
    pub fn emit(&mut self, size: Size) {
        self.current = size;
        self.subscribers
            .retain(|subscriber| subscriber.send(size).is_ok());
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

/// Receiving end of a [`ResizeSignal`] registration.
pub struct ResizeSubscription {
    receiver: Receiver<Size>,
}

impl ResizeSubscription {
    /// Drains pending notifications, keeping only the most recent size.
    pub fn latest(&self) -> Option<Size> {
        self.receiver.try_iter().last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscriber_receives_size() {
        let mut signal = ResizeSignal::new(Size::new(800.0, 600.0));
        let subscription = signal.subscribe();

        signal.emit(Size::new(1024.0, 768.0));

        assert_eq!(subscription.latest(), Some(Size::new(1024.0, 768.0)));
        assert_eq!(subscription.latest(), None);
        assert_eq!(signal.current(), Size::new(1024.0, 768.0));
    }

    #[test]
    fn bursts_coalesce_to_last_size() {
        let mut signal = ResizeSignal::new(Size::ZERO);
        let subscription = signal.subscribe();

        signal.emit(Size::new(100.0, 100.0));
        signal.emit(Size::new(200.0, 150.0));
        signal.emit(Size::new(300.0, 250.0));

        assert_eq!(subscription.latest(), Some(Size::new(300.0, 250.0)));
    }

    #[test]
    fn every_subscriber_is_notified() {
        let mut signal = ResizeSignal::new(Size::ZERO);
        let first = signal.subscribe();
        let second = signal.subscribe();

        signal.emit(Size::new(640.0, 480.0));

        assert!(first.latest().is_some());
        assert!(second.latest().is_some());
    }

    #[test]
    fn dropped_subscription_is_pruned() {
        let mut signal = ResizeSignal::new(Size::ZERO);
        let subscription = signal.subscribe();
        assert_eq!(signal.subscriber_count(), 1);

        drop(subscription);
        signal.emit(Size::new(10.0, 10.0));

        assert_eq!(signal.subscriber_count(), 0);
    }
}
