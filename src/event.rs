use crate::node::PresentationKind;
use crate::transition::TransitionDirection;

/// Notifications emitted by the controller as the navigation state mutates.
///
/// Dismissal events replace per-node callbacks: when a dismissal removes
/// several screens they are reported most-recently-presented first, so a
/// subscriber tracking "what is on top now" always lands on the enclosing
/// screen rather than the deepest one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    ScreenPresented {
        id: String,
        kind: PresentationKind,
        animated: bool,
    },
    ScreenDismissed {
        id: String,
    },
    ModalPresented {
        owner: String,
        id: String,
    },
    ModalDismissed {
        owner: String,
        id: String,
    },
    TransitionPresented {
        owner: String,
        id: String,
        direction: TransitionDirection,
    },
    /// `direction` is the recorded entry direction reversed, ready to drive
    /// the exit animation.
    TransitionDismissed {
        owner: String,
        id: String,
        direction: TransitionDirection,
    },
    AlertPresented {
        owner: String,
        id: String,
    },
    AlertDismissed {
        owner: String,
        id: String,
    },
    /// A referenced owner id was not found; the operation was a no-op.
    OwnerMissing {
        operation: &'static str,
        owner: String,
    },
}

/// Sink for [`NavEvent`]s, injected into the controller at construction.
pub trait NavObserver {
    fn on_event(&self, event: &NavEvent);
}

/// Default observer that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl NavObserver for NoopObserver {
    fn on_event(&self, _event: &NavEvent) {}
}
