mod dismiss;
mod present;
mod scheduler;

pub use present::Placement;

use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::alert::{AlertCenter, AlertDescriptor};
use crate::error::NavError;
use crate::event::{NavEvent, NavObserver, NoopObserver};
use crate::modal::{ModalDescriptor, ModalLayers};
use crate::node::{Screen, ROOT_ID};
use crate::queue::NavQueue;
use crate::render::{RenderHost, Transaction};
use crate::transition::{TransitionDescriptor, TransitionLayers};
use crate::tree::NavTree;

use scheduler::{DeferredWork, Scheduler};

/// Delay between two presentations that both travel through a new
/// environment; the platform needs the first one to settle before the
/// next can animate.
const CONSECUTIVE_PRESENT_DELAY: Duration = Duration::from_millis(550);

/// Debounce between tearing down a replaced alert and installing its
/// successor, so the dismiss and show animations do not collide.
const ALERT_REPLACE_DELAY: Duration = Duration::from_millis(100);

/// Where `add_to_queue` and `add_to_transition_queue` place an entry.
#[derive(Debug, Clone)]
pub enum QueuePlacement {
    /// Tail of the queue.
    Append,
    /// Earliest slot attributable to `owner`, stacking behind that
    /// owner's earlier inserts.
    Insert { owner: String },
    /// Directly behind the queued entry `id`; falls back to `Insert`
    /// keyed on `owner` when `id` is not queued.
    InsertAfter { id: String, owner: String },
}

/// Screen-family operations. Public methods wrap these and route them
/// through the per-owner gate so an owner's stream applies in submission
/// order even across deferred presentation chains.
pub(crate) enum ScreenCommand<C> {
    Present {
        screen: Screen<C>,
        placement: Placement,
    },
    PresentMany {
        screens: Vec<Screen<C>>,
    },
    Dismiss,
    DismissUpTo {
        id: String,
    },
    DismissCount {
        count: usize,
    },
    DismissPushStack,
    DismissEnvironment,
    DismissAll,
    DismissTransitionOrScreen,
}

/// One independent navigation root.
///
/// Owns the tree, the per-owner modal/transition/alert side-structures,
/// the screen and transition queues, and the deferred-work scheduler. All
/// operations assume single-actor confinement: the controller is not a
/// thread-safe structure and every mutation runs on the caller's one
/// logical UI thread.
pub struct NavController<C> {
    tree: NavTree<C>,
    screen_queue: NavQueue<Screen<C>>,
    transition_queues: HashMap<String, NavQueue<TransitionDescriptor<C>>>,
    modals: ModalLayers<C>,
    transitions: TransitionLayers<C>,
    alerts: AlertCenter,
    scheduler: Scheduler<C>,
    observer: Rc<dyn NavObserver>,
    render: Option<Box<dyn RenderHost<C>>>,
}

impl<C> Default for NavController<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> NavController<C> {
    pub fn new() -> Self {
        Self::with_observer(Rc::new(NoopObserver))
    }

    pub fn with_observer(observer: Rc<dyn NavObserver>) -> Self {
        Self {
            tree: NavTree::new(),
            screen_queue: NavQueue::new(),
            transition_queues: HashMap::new(),
            modals: ModalLayers::new(),
            transitions: TransitionLayers::new(),
            alerts: AlertCenter::new(),
            scheduler: Scheduler::new(),
            observer,
            render: None,
        }
    }

    /// Inject the rendering collaborator; it is handed the tree after
    /// every mutation.
    pub fn set_render_host(&mut self, host: Box<dyn RenderHost<C>>) {
        self.render = Some(host);
    }

    pub fn tree(&self) -> &NavTree<C> {
        &self.tree
    }

    /// True while deferred work (presentation chains, debounced alerts,
    /// gated commands) is outstanding.
    pub fn has_pending_work(&self) -> bool {
        !self.scheduler.is_idle()
    }

    /// Deadline of the earliest deferred work, for host polling loops.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Run every piece of deferred work that has come due. Hosts call
    /// this from their tick; it never blocks.
    pub fn poll_deferred(&mut self) {
        self.poll_deferred_at(Instant::now());
    }

    pub(crate) fn poll_deferred_at(&mut self, now: Instant) {
        while let Some(work) = self.scheduler.take_ready(now) {
            match work {
                DeferredWork::PresentChain { gate, owner, rest } => {
                    self.run_chain(&gate, owner, rest);
                }
                DeferredWork::InstallAlert { owner, alert } => {
                    self.install_alert(&owner, alert);
                }
                DeferredWork::Command { owner, command } => {
                    self.execute_command(&owner, command);
                }
            }
        }
    }

    // ----- screens -------------------------------------------------------

    /// Present one screen on behalf of `owner`.
    pub fn present(&mut self, owner: &str, screen: Screen<C>, placement: Placement) {
        self.submit(owner, ScreenCommand::Present { screen, placement });
    }

    /// Present a sequence of screens, each anchored at the previous one.
    pub fn present_many(&mut self, owner: &str, screens: Vec<Screen<C>>) {
        self.submit(owner, ScreenCommand::PresentMany { screens });
    }

    /// Dismiss `owner` and everything presented after it.
    pub fn dismiss(&mut self, owner: &str) {
        self.submit(owner, ScreenCommand::Dismiss);
    }

    /// Dismiss everything presented after the screen `id`.
    pub fn dismiss_up_to(&mut self, owner: &str, id: &str) {
        self.submit(owner, ScreenCommand::DismissUpTo { id: id.to_string() });
    }

    /// Dismiss the `count` most recently presented screens.
    pub fn dismiss_count(&mut self, owner: &str, count: usize) {
        self.submit(owner, ScreenCommand::DismissCount { count });
    }

    /// Pop the owner's whole push stack.
    pub fn dismiss_push_stack(&mut self, owner: &str) {
        self.submit(owner, ScreenCommand::DismissPushStack);
    }

    /// Dismiss the environment enclosing `owner`.
    pub fn dismiss_environment(&mut self, owner: &str) {
        self.submit(owner, ScreenCommand::DismissEnvironment);
    }

    /// Dismiss every presented screen, back to the root.
    pub fn dismiss_all(&mut self, owner: &str) {
        self.submit(owner, ScreenCommand::DismissAll);
    }

    /// Unwind one transition if the owner has any, otherwise dismiss the
    /// owner's screen.
    pub fn dismiss_transition_or_dismiss(&mut self, owner: &str) {
        self.submit(owner, ScreenCommand::DismissTransitionOrScreen);
    }

    // ----- screen queue --------------------------------------------------

    pub fn add_to_queue(&mut self, screen: Screen<C>, placement: QueuePlacement) {
        match placement {
            QueuePlacement::Append => self.screen_queue.append(screen),
            QueuePlacement::Insert { owner } => self.screen_queue.insert(screen, &owner),
            QueuePlacement::InsertAfter { id, owner } => {
                self.screen_queue.insert_after(screen, &id, &owner);
            }
        }
    }

    pub fn remove_from_queue(&mut self, ids: &[&str]) {
        self.screen_queue.remove(ids);
    }

    pub fn clear_queue(&mut self) {
        self.screen_queue.clear();
    }

    pub fn queued_screens(&self) -> Vec<&str> {
        self.screen_queue.ids()
    }

    /// Dequeue the head of the screen queue and present it at the tail of
    /// the tree.
    pub fn show_next(&mut self, owner: &str) -> Result<(), NavError> {
        let screen = self.screen_queue.take_next()?;
        self.submit(
            owner,
            ScreenCommand::Present {
                screen,
                placement: Placement::Append,
            },
        );
        Ok(())
    }

    pub fn show_next_or_dismiss(&mut self, owner: &str) {
        if self.show_next(owner).is_err() {
            self.dismiss(owner);
        }
    }

    pub fn show_next_or_dismiss_environment(&mut self, owner: &str) {
        if self.show_next(owner).is_err() {
            self.dismiss_environment(owner);
        }
    }

    // ----- modals --------------------------------------------------------

    pub fn show_modal(&mut self, owner: &str, modal: ModalDescriptor<C>) {
        let id = self.modals.show(owner, modal);
        self.emit(NavEvent::ModalPresented {
            owner: owner.to_string(),
            id,
        });
        self.notify_overlays(owner);
    }

    pub fn show_modals(&mut self, owner: &str, modals: Vec<ModalDescriptor<C>>) {
        for modal in modals {
            self.show_modal(owner, modal);
        }
    }

    /// Dismiss the modal `id` (or the topmost live one when `None`).
    pub fn dismiss_modal(&mut self, owner: &str, id: Option<&str>) {
        let dismissed = match id {
            Some(id) => self.modals.dismiss(owner, id),
            None => self.modals.dismiss_last(owner),
        };
        match dismissed {
            Some(id) => {
                self.emit(NavEvent::ModalDismissed {
                    owner: owner.to_string(),
                    id,
                });
                self.notify_overlays(owner);
            }
            None => log::info!("dismiss_modal: no matching modal for `{owner}`"),
        }
    }

    pub fn dismiss_modals_count(&mut self, owner: &str, count: usize) {
        let dismissed = self.modals.dismiss_count(owner, count);
        self.finish_modal_dismissals(owner, dismissed);
    }

    pub fn dismiss_modals_up_to(&mut self, owner: &str, id: &str) {
        let dismissed = self.modals.dismiss_up_to(owner, id);
        self.finish_modal_dismissals(owner, dismissed);
    }

    pub fn dismiss_all_modals(&mut self, owner: &str) {
        let dismissed = self.modals.dismiss_all(owner);
        self.finish_modal_dismissals(owner, dismissed);
    }

    /// Stack length including tombstoned entries.
    pub fn modal_count(&self, owner: &str) -> usize {
        self.modals.modal_count(owner)
    }

    pub fn active_modal_count(&self, owner: &str) -> usize {
        self.modals.active_modal_count(owner)
    }

    pub fn modal_stack(&self, owner: &str) -> &[ModalDescriptor<C>] {
        self.modals.stack(owner)
    }

    fn finish_modal_dismissals(&mut self, owner: &str, dismissed: Vec<String>) {
        if dismissed.is_empty() {
            return;
        }
        for id in dismissed {
            self.emit(NavEvent::ModalDismissed {
                owner: owner.to_string(),
                id,
            });
        }
        self.notify_overlays(owner);
    }

    // ----- transitions ---------------------------------------------------

    pub fn show_transition(&mut self, owner: &str, transition: TransitionDescriptor<C>) {
        let direction = transition.direction;
        let id = self.transitions.show(owner, transition);
        self.emit(NavEvent::TransitionPresented {
            owner: owner.to_string(),
            id,
            direction,
        });
        self.notify_overlays(owner);
    }

    pub fn show_transitions(&mut self, owner: &str, transitions: Vec<TransitionDescriptor<C>>) {
        for transition in transitions {
            self.show_transition(owner, transition);
        }
    }

    /// Remove the owner's most recent transition.
    pub fn dismiss_transition(&mut self, owner: &str) {
        self.apply_dismiss_transition(owner);
    }

    pub fn dismiss_transitions_up_to(&mut self, owner: &str, id: &str) {
        let dismissed = self.transitions.dismiss_up_to(owner, id);
        self.finish_transition_dismissals(owner, dismissed);
    }

    pub fn dismiss_transitions_count(&mut self, owner: &str, count: usize) {
        let dismissed = self.transitions.dismiss_count(owner, count);
        self.finish_transition_dismissals(owner, dismissed);
    }

    pub fn dismiss_all_transitions(&mut self, owner: &str) {
        let dismissed = self.transitions.dismiss_all(owner);
        self.finish_transition_dismissals(owner, dismissed);
    }

    /// Number of transitions above the owner's root content.
    pub fn transition_depth(&self, owner: &str) -> usize {
        self.transitions.depth(owner)
    }

    pub fn transition_stack(&self, owner: &str) -> &[TransitionDescriptor<C>] {
        self.transitions.stack(owner)
    }

    pub(crate) fn apply_dismiss_transition(&mut self, owner: &str) {
        if let Some((id, direction)) = self.transitions.dismiss(owner) {
            self.emit(NavEvent::TransitionDismissed {
                owner: owner.to_string(),
                id,
                direction,
            });
            self.notify_overlays(owner);
        }
    }

    fn finish_transition_dismissals(
        &mut self,
        owner: &str,
        dismissed: Vec<crate::transition::DismissedTransition>,
    ) {
        if dismissed.is_empty() {
            return;
        }
        for (id, direction) in dismissed {
            self.emit(NavEvent::TransitionDismissed {
                owner: owner.to_string(),
                id,
                direction,
            });
        }
        self.notify_overlays(owner);
    }

    // ----- transition queue ----------------------------------------------

    pub fn add_to_transition_queue(
        &mut self,
        owner: &str,
        transition: TransitionDescriptor<C>,
        placement: QueuePlacement,
    ) {
        let queue = self
            .transition_queues
            .entry(owner.to_string())
            .or_default();
        match placement {
            QueuePlacement::Append => queue.append(transition),
            QueuePlacement::Insert { owner } => queue.insert(transition, &owner),
            QueuePlacement::InsertAfter { id, owner } => {
                queue.insert_after(transition, &id, &owner);
            }
        }
    }

    pub fn remove_from_transition_queue(&mut self, owner: &str, ids: &[&str]) {
        if let Some(queue) = self.transition_queues.get_mut(owner) {
            queue.remove(ids);
        }
    }

    pub fn queued_transitions(&self, owner: &str) -> Vec<&str> {
        self.transition_queues
            .get(owner)
            .map_or_else(Vec::new, NavQueue::ids)
    }

    pub fn show_next_transition(&mut self, owner: &str) -> Result<(), NavError> {
        let queue = self
            .transition_queues
            .get_mut(owner)
            .ok_or(NavError::EmptyQueue)?;
        let transition = queue.take_next()?;
        self.show_transition(owner, transition);
        Ok(())
    }

    pub fn show_next_transition_or_next_screen_or_dismiss(&mut self, owner: &str) {
        if self.show_next_transition(owner).is_ok() {
            return;
        }
        if self.show_next(owner).is_ok() {
            return;
        }
        self.dismiss(owner);
    }

    // ----- alerts --------------------------------------------------------

    /// Show an alert for `owner`, or for the topmost screen when `owner`
    /// is `None`.
    ///
    /// Replacing a live (or still pending) alert tears the old one down
    /// immediately and installs the successor after a short debounce; at
    /// no point do two alerts coexist for one owner.
    pub fn show_alert(&mut self, owner: Option<&str>, alert: AlertDescriptor) {
        let owner = self.resolve_alert_owner(owner);
        let replaced_active = match self.alerts.remove(&owner) {
            Some(id) => {
                self.emit(NavEvent::AlertDismissed {
                    owner: owner.clone(),
                    id,
                });
                true
            }
            None => false,
        };
        let cancelled = self.scheduler.cancel_alert_installs(&owner);

        if replaced_active || cancelled > 0 {
            self.scheduler.defer(
                &owner,
                DeferredWork::InstallAlert {
                    owner: owner.clone(),
                    alert,
                },
                ALERT_REPLACE_DELAY,
            );
        } else {
            self.install_alert(&owner, alert);
        }
    }

    pub fn dismiss_alert(&mut self, owner: Option<&str>) {
        let owner = self.resolve_alert_owner(owner);
        self.scheduler.cancel_alert_installs(&owner);
        match self.alerts.remove(&owner) {
            Some(id) => self.emit(NavEvent::AlertDismissed { owner, id }),
            None => log::info!("dismiss_alert: no alert active for `{owner}`"),
        }
    }

    pub fn dismiss_all_alerts(&mut self) {
        self.scheduler.cancel_all_alert_installs();
        for (owner, id) in self.alerts.remove_all() {
            self.emit(NavEvent::AlertDismissed { owner, id });
        }
    }

    pub fn active_alert(&self, owner: &str) -> Option<&AlertDescriptor> {
        self.alerts.active(owner)
    }

    pub fn active_alert_count(&self) -> usize {
        self.alerts.active_count()
    }

    fn install_alert(&mut self, owner: &str, alert: AlertDescriptor) {
        let id = self.alerts.install(owner, alert);
        self.emit(NavEvent::AlertPresented {
            owner: owner.to_string(),
            id,
        });
    }

    fn resolve_alert_owner(&self, owner: Option<&str>) -> String {
        match owner {
            Some(owner) => owner.to_string(),
            None => self
                .tree
                .last_node()
                .map_or_else(|| ROOT_ID.to_string(), |node| node.id.clone()),
        }
    }

    // ----- plumbing ------------------------------------------------------

    /// Route a screen command through the per-owner gate: it runs now
    /// unless the owner already has work in flight, in which case it
    /// parks behind that work.
    pub(crate) fn submit(&mut self, owner: &str, command: ScreenCommand<C>) {
        if self.scheduler.has_pending(owner) {
            log::debug!("parking command behind in-flight work for `{owner}`");
            self.scheduler.enqueue(
                owner,
                DeferredWork::Command {
                    owner: owner.to_string(),
                    command,
                },
            );
        } else {
            self.execute_command(owner, command);
        }
    }

    fn execute_command(&mut self, owner: &str, command: ScreenCommand<C>) {
        match command {
            ScreenCommand::Present { screen, placement } => {
                self.apply_present(owner, screen, &placement);
            }
            ScreenCommand::PresentMany { screens } => {
                self.run_chain(owner, owner.to_string(), screens);
            }
            ScreenCommand::Dismiss => self.apply_dismiss("dismiss", owner),
            ScreenCommand::DismissUpTo { id } => self.apply_dismiss_up_to(&id),
            ScreenCommand::DismissCount { count } => self.apply_dismiss_count(count),
            ScreenCommand::DismissPushStack => self.apply_dismiss_push_stack(owner),
            ScreenCommand::DismissEnvironment => self.apply_dismiss_environment(owner),
            ScreenCommand::DismissAll => self.apply_dismiss_up_to(ROOT_ID),
            ScreenCommand::DismissTransitionOrScreen => {
                self.apply_dismiss_transition_or_screen(owner);
            }
        }
    }

    pub(crate) fn emit(&self, event: NavEvent) {
        match &event {
            NavEvent::OwnerMissing { operation, owner } => {
                log::warn!("{operation}: owner `{owner}` not found, ignoring");
            }
            _ => log::debug!("{event:?}"),
        }
        self.observer.on_event(&event);
    }

    pub(crate) fn notify_render(&mut self, animated: bool) {
        if let Some(host) = self.render.as_mut() {
            host.apply(&self.tree, Transaction { animated });
        }
    }

    fn notify_overlays(&mut self, owner: &str) {
        if let Some(host) = self.render.as_mut() {
            host.overlays_changed(owner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recording(RefCell<Vec<NavEvent>>);

    impl NavObserver for Recording {
        fn on_event(&self, event: &NavEvent) {
            self.0.borrow_mut().push(event.clone());
        }
    }

    fn recording_controller() -> (NavController<&'static str>, Rc<Recording>) {
        let observer = Rc::new(Recording::default());
        let controller = NavController::with_observer(observer.clone());
        (controller, observer)
    }

    #[test]
    fn test_present_many_defers_after_opening_an_environment() {
        let (mut controller, _) = recording_controller();
        controller.present_many(
            ROOT_ID,
            vec![
                Screen::sheet("sheet").id("s1"),
                Screen::push("detail").id("p1"),
            ],
        );

        // The sheet lands immediately; the push waits out the settle
        // delay.
        assert_eq!(controller.tree().flattened_ids(), vec![ROOT_ID, "s1"]);
        assert!(controller.has_pending_work());

        controller.poll_deferred_at(Instant::now());
        assert_eq!(controller.tree().flattened_ids(), vec![ROOT_ID, "s1"]);

        controller.poll_deferred_at(Instant::now() + Duration::from_millis(600));
        assert_eq!(controller.tree().flattened_ids(), vec![ROOT_ID, "s1", "p1"]);
        assert!(!controller.has_pending_work());
    }

    #[test]
    fn test_present_many_without_animation_runs_in_one_go() {
        let (mut controller, _) = recording_controller();
        controller.present_many(
            ROOT_ID,
            vec![
                Screen::sheet("sheet").id("s1"),
                Screen::push("detail").id("p1").animated(false),
            ],
        );

        // A non-animating follow-up has nothing to collide with.
        assert_eq!(controller.tree().flattened_ids(), vec![ROOT_ID, "s1", "p1"]);
        assert!(!controller.has_pending_work());
    }

    #[test]
    fn test_commands_park_behind_an_inflight_chain() {
        let (mut controller, _) = recording_controller();
        controller.present_many(
            ROOT_ID,
            vec![
                Screen::sheet("sheet").id("s1"),
                Screen::push("detail").id("p1"),
            ],
        );
        controller.present(ROOT_ID, Screen::push("inbox").id("x"), Placement::AtOwner);

        // The root's stream stays in submission order: the parked push
        // waits for the chain to finish.
        assert_eq!(controller.tree().flattened_ids(), vec![ROOT_ID, "s1"]);

        controller.poll_deferred_at(Instant::now() + Duration::from_millis(600));
        assert_eq!(
            controller.tree().flattened_ids(),
            vec![ROOT_ID, "x", "s1", "p1"]
        );
    }

    #[test]
    fn test_alert_replacement_debounces_and_never_overlaps() {
        let (mut controller, observer) = recording_controller();
        controller.show_alert(Some("home"), AlertDescriptor::new("first").id("a1"));
        assert_eq!(controller.active_alert("home").unwrap().id, "a1");

        controller.show_alert(Some("home"), AlertDescriptor::new("second").id("a2"));
        assert!(controller.active_alert("home").is_none());
        assert_eq!(controller.active_alert_count(), 0);

        controller.poll_deferred_at(Instant::now() + Duration::from_millis(50));
        assert!(controller.active_alert("home").is_none());

        controller.poll_deferred_at(Instant::now() + Duration::from_millis(200));
        assert_eq!(controller.active_alert("home").unwrap().id, "a2");
        assert_eq!(controller.active_alert_count(), 1);

        let events = observer.0.borrow();
        let alert_events: Vec<_> = events
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    NavEvent::AlertPresented { .. } | NavEvent::AlertDismissed { .. }
                )
            })
            .collect();
        assert_eq!(alert_events.len(), 3);
    }

    #[test]
    fn test_third_alert_supersedes_a_pending_install() {
        let (mut controller, _) = recording_controller();
        controller.show_alert(Some("home"), AlertDescriptor::new("first").id("a1"));
        controller.show_alert(Some("home"), AlertDescriptor::new("second").id("a2"));
        controller.show_alert(Some("home"), AlertDescriptor::new("third").id("a3"));

        controller.poll_deferred_at(Instant::now() + Duration::from_millis(200));
        assert_eq!(controller.active_alert("home").unwrap().id, "a3");
        assert_eq!(controller.active_alert_count(), 1);
    }

    #[test]
    fn test_show_alert_defaults_to_topmost_screen() {
        let (mut controller, _) = recording_controller();
        controller.present(ROOT_ID, Screen::push("detail").id("p1"), Placement::AtOwner);
        controller.show_alert(None, AlertDescriptor::new("hello").id("a1"));

        assert_eq!(controller.active_alert("p1").unwrap().id, "a1");
    }

    #[test]
    fn test_show_next_feeds_queue_in_fifo_order() {
        let (mut controller, _) = recording_controller();
        for id in ["a", "b", "c"] {
            controller.add_to_queue(Screen::push(id).id(id), QueuePlacement::Append);
        }

        controller.show_next(ROOT_ID).unwrap();
        controller.show_next(ROOT_ID).unwrap();
        controller.show_next(ROOT_ID).unwrap();
        assert_eq!(
            controller.tree().flattened_ids(),
            vec![ROOT_ID, "a", "b", "c"]
        );
        assert_eq!(controller.show_next(ROOT_ID), Err(NavError::EmptyQueue));
    }

    #[test]
    fn test_show_next_transition_falls_back_through_the_chain() {
        let (mut controller, _) = recording_controller();
        controller.present(ROOT_ID, Screen::push("detail").id("p1"), Placement::AtOwner);

        // Empty transition queue, empty screen queue: falls through to a
        // screen dismissal.
        controller.show_next_transition_or_next_screen_or_dismiss("p1");
        assert_eq!(controller.tree().flattened_ids(), vec![ROOT_ID]);
    }
}
