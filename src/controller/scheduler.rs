use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use crate::alert::AlertDescriptor;
use crate::node::Screen;

use super::ScreenCommand;

/// Work the controller postponed.
///
/// Continuations of an in-flight multi-screen presentation and debounced
/// alert installs carry their own deadline; commands submitted while an
/// owner has work in flight are parked here so the owner's stream still
/// applies in submission order.
pub(crate) enum DeferredWork<C> {
    /// Remainder of a `present_many` chain. `owner` is the id of the node
    /// presented last, which anchors the next step.
    PresentChain {
        gate: String,
        owner: String,
        rest: Vec<Screen<C>>,
    },
    InstallAlert {
        owner: String,
        alert: AlertDescriptor,
    },
    Command {
        owner: String,
        command: ScreenCommand<C>,
    },
}

struct OwnerQueue<C> {
    items: VecDeque<(Instant, DeferredWork<C>)>,
}

impl<C> OwnerQueue<C> {
    fn front_due(&self) -> Option<Instant> {
        self.items.front().map(|(due, _)| *due)
    }
}

/// Per-owner FIFO of deferred work on one logical thread.
///
/// Each owner's queue drains strictly in order; the head's deadline gates
/// the whole queue, so nothing belonging to an owner overtakes a pending
/// delay. Queues of different owners are independent and interleave
/// freely.
pub(crate) struct Scheduler<C> {
    owners: HashMap<String, OwnerQueue<C>>,
}

impl<C> Scheduler<C> {
    pub(crate) fn new() -> Self {
        Self {
            owners: HashMap::new(),
        }
    }

    pub(crate) fn has_pending(&self, gate: &str) -> bool {
        self.owners.contains_key(gate)
    }

    pub(crate) fn is_idle(&self) -> bool {
        self.owners.is_empty()
    }

    /// Earliest deadline across all owners, for host polling loops.
    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        self.owners
            .values()
            .filter_map(OwnerQueue::front_due)
            .min()
    }

    /// Park work at the tail of the owner's queue, runnable as soon as it
    /// reaches the head.
    pub(crate) fn enqueue(&mut self, gate: &str, work: DeferredWork<C>) {
        self.queue_mut(gate)
            .items
            .push_back((Instant::now(), work));
    }

    /// Put a continuation at the head of the owner's queue with a fresh
    /// deadline. Continuations belong to the mutation already in flight,
    /// so they run before anything parked behind it.
    pub(crate) fn defer(&mut self, gate: &str, work: DeferredWork<C>, delay: Duration) {
        self.queue_mut(gate)
            .items
            .push_front((Instant::now() + delay, work));
    }

    /// Drop pending alert installs for `owner`; a newer alert superseded
    /// them. Returns how many installs were cancelled.
    pub(crate) fn cancel_alert_installs(&mut self, owner: &str) -> usize {
        let Some(queue) = self.owners.get_mut(owner) else {
            return 0;
        };
        let before = queue.items.len();
        queue
            .items
            .retain(|(_, work)| !matches!(work, DeferredWork::InstallAlert { .. }));
        let cancelled = before - queue.items.len();
        if queue.items.is_empty() {
            self.owners.remove(owner);
        }
        cancelled
    }

    pub(crate) fn cancel_all_alert_installs(&mut self) {
        let owners: Vec<String> = self.owners.keys().cloned().collect();
        for owner in owners {
            self.cancel_alert_installs(&owner);
        }
    }

    /// Pop the next runnable piece of work at `now`, earliest deadline
    /// first (owner name breaks ties for determinism).
    pub(crate) fn take_ready(&mut self, now: Instant) -> Option<DeferredWork<C>> {
        let mut best: Option<(Instant, &String)> = None;
        for (name, queue) in &self.owners {
            if let Some(due) = queue.front_due() {
                if due <= now
                    && best.is_none_or(|(b_due, b_name)| due < b_due || (due == b_due && name < b_name))
                {
                    best = Some((due, name));
                }
            }
        }
        let key = best?.1.clone();

        let queue = self.owners.get_mut(&key)?;
        let (_, work) = queue.items.pop_front()?;
        if queue.items.is_empty() {
            self.owners.remove(&key);
        }
        Some(work)
    }

    fn queue_mut(&mut self, gate: &str) -> &mut OwnerQueue<C> {
        self.owners
            .entry(gate.to_string())
            .or_insert_with(|| OwnerQueue {
                items: VecDeque::new(),
            })
    }
}
