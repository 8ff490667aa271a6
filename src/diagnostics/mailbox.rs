//! One-slot diagnostic mailbox between interrupt and main-loop context.
//!
//! The slot and its handshake flag sit behind one `critical_section::Mutex`, so
//! the only synchronization is a scoped interrupt-free section that ends on
//! every exit path of the closure.

use core::cell::Cell;

use critical_section::Mutex;

use super::snapshot::DiagnosticSnapshot;

#[derive(Clone, Copy)]
struct Slot {
    pending: bool,
    snapshot: DiagnosticSnapshot,
}

/// Single-producer, single-consumer handoff holding at most one snapshot.
///
/// # Example
///
/// ```rust,ignore
/// let mut mailbox = DiagnosticMailbox::new();
/// let (producer, mut consumer) = mailbox.split();
/// // producer moves into the encoder interrupt, consumer stays in the main loop
/// if let Some(snapshot) = consumer.poll() {
///     report(&snapshot);
/// }
/// ```
pub struct DiagnosticMailbox {
    slot: Mutex<Cell<Slot>>,
}

impl DiagnosticMailbox {
    /// Create an empty (drained) mailbox.
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(Slot {
                pending: false,
                snapshot: DiagnosticSnapshot::EMPTY,
            })),
        }
    }

    /// Split into the producer and consumer halves.
    ///
    /// Taking `&mut self` keeps a single handle per role for the lifetime of
    /// the borrow.
    pub fn split(&mut self) -> (DiagnosticProducer<'_>, DiagnosticConsumer<'_>) {
        let mailbox: &Self = self;
        (
            DiagnosticProducer { mailbox },
            DiagnosticConsumer { mailbox },
        )
    }

    /// Whether a snapshot is waiting for the consumer.
    pub fn is_pending(&self) -> bool {
        critical_section::with(|cs| self.slot.borrow(cs).get().pending)
    }
}

impl Default for DiagnosticMailbox {
    fn default() -> Self {
        Self::new()
    }
}

/// Interrupt-side half of the mailbox.
pub struct DiagnosticProducer<'a> {
    mailbox: &'a DiagnosticMailbox,
}

impl<'a> DiagnosticProducer<'a> {
    /// Whether the consumer has drained the last snapshot.
    ///
    /// Only the consumer can change the flag from pending to drained, so a
    /// `true` result stays valid until this producer posts.
    #[inline]
    pub fn is_drained(&self) -> bool {
        !self.mailbox.is_pending()
    }

    /// Publish a snapshot if the slot is drained.
    ///
    /// Returns the snapshot back when the previous one has not been consumed;
    /// the pending snapshot is never overwritten.
    pub fn try_post(
        &mut self,
        snapshot: DiagnosticSnapshot,
    ) -> core::result::Result<(), DiagnosticSnapshot> {
        critical_section::with(|cs| {
            let cell = self.mailbox.slot.borrow(cs);
            if cell.get().pending {
                return Err(snapshot);
            }
            cell.set(Slot {
                pending: true,
                snapshot,
            });
            Ok(())
        })
    }
}

/// Main-loop half of the mailbox.
pub struct DiagnosticConsumer<'a> {
    mailbox: &'a DiagnosticMailbox,
}

impl<'a> DiagnosticConsumer<'a> {
    /// Whether a snapshot is waiting.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.mailbox.is_pending()
    }

    /// Take the pending snapshot, marking the slot drained.
    ///
    /// The copy and the flag reset happen in the same critical section.
    pub fn poll(&mut self) -> Option<DiagnosticSnapshot> {
        critical_section::with(|cs| {
            let cell = self.mailbox.slot.borrow(cs);
            let slot = cell.get();
            if !slot.pending {
                return None;
            }
            cell.set(Slot {
                pending: false,
                ..slot
            });
            Some(slot.snapshot)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(revolution: u32) -> DiagnosticSnapshot {
        DiagnosticSnapshot {
            revolution,
            a_lifetime: revolution * 800,
            b_lifetime: revolution * 800,
            ..DiagnosticSnapshot::EMPTY
        }
    }

    #[test]
    fn test_empty_mailbox_polls_none() {
        let mut mailbox = DiagnosticMailbox::new();
        let (producer, mut consumer) = mailbox.split();

        assert!(producer.is_drained());
        assert!(consumer.poll().is_none());
    }

    #[test]
    fn test_post_then_poll() {
        let mut mailbox = DiagnosticMailbox::new();
        let (mut producer, mut consumer) = mailbox.split();

        assert!(producer.try_post(snapshot(1)).is_ok());
        assert!(consumer.is_pending());
        assert!(!producer.is_drained());

        let got = consumer.poll().expect("snapshot should be pending");
        assert_eq!(got.revolution, 1);
        assert!(producer.is_drained());
        assert!(consumer.poll().is_none());
    }

    #[test]
    fn test_pending_snapshot_is_not_overwritten() {
        let mut mailbox = DiagnosticMailbox::new();
        let (mut producer, mut consumer) = mailbox.split();

        producer.try_post(snapshot(1)).unwrap();
        let rejected = producer.try_post(snapshot(2)).unwrap_err();
        assert_eq!(rejected.revolution, 2);

        assert_eq!(consumer.poll().unwrap().revolution, 1);
        producer.try_post(snapshot(3)).unwrap();
        assert_eq!(consumer.poll().unwrap().revolution, 3);
    }
}
