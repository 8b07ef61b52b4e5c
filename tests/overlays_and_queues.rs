//! Queues, modals, transitions, and alert debouncing through the public
//! controller API.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use navstack::{
    AlertDescriptor, ModalDescriptor, NavController, NavError, NavEvent, NavObserver, Placement,
    QueuePlacement, Screen, TransitionDescriptor, TransitionDirection, ROOT_ID,
};

#[derive(Default)]
struct Recorder(RefCell<Vec<NavEvent>>);

impl NavObserver for Recorder {
    fn on_event(&self, event: &NavEvent) {
        self.0.borrow_mut().push(event.clone());
    }
}

fn controller() -> (NavController<&'static str>, Rc<Recorder>) {
    let recorder = Rc::new(Recorder::default());
    let nav = NavController::with_observer(recorder.clone());
    (nav, recorder)
}

#[test]
fn test_queued_screens_materialize_in_append_order() {
    let (mut nav, _) = controller();
    for id in ["a", "b", "c"] {
        nav.add_to_queue(Screen::push(id).id(id), QueuePlacement::Append);
    }

    nav.show_next(ROOT_ID).unwrap();
    nav.show_next(ROOT_ID).unwrap();
    nav.show_next(ROOT_ID).unwrap();

    assert_eq!(nav.tree().flattened_ids(), vec![ROOT_ID, "a", "b", "c"]);
}

#[test]
fn test_queue_insert_stacks_ahead_of_existing_entries() {
    let (mut nav, _) = controller();
    nav.add_to_queue(Screen::push("existing").id("existing"), QueuePlacement::Append);
    nav.add_to_queue(
        Screen::push("a").id("a"),
        QueuePlacement::Insert { owner: "caller".into() },
    );
    nav.add_to_queue(
        Screen::push("b").id("b"),
        QueuePlacement::Insert { owner: "caller".into() },
    );

    // Same-owner inserts keep their submission order, ahead of whatever
    // was already queued.
    assert_eq!(nav.queued_screens(), vec!["a", "b", "existing"]);
}

#[test]
fn test_queue_insert_after_anchors_behind_a_queued_entry() {
    let (mut nav, _) = controller();
    nav.add_to_queue(Screen::push("a").id("a"), QueuePlacement::Append);
    nav.add_to_queue(Screen::push("z").id("z"), QueuePlacement::Append);
    nav.add_to_queue(
        Screen::push("b").id("b"),
        QueuePlacement::InsertAfter { id: "a".into(), owner: "caller".into() },
    );
    nav.add_to_queue(
        Screen::push("c").id("c"),
        QueuePlacement::InsertAfter { id: "a".into(), owner: "caller".into() },
    );

    assert_eq!(nav.queued_screens(), vec!["a", "b", "c", "z"]);
}

#[test]
fn test_show_next_on_an_empty_queue_is_a_typed_failure() {
    let (mut nav, _) = controller();
    assert_eq!(nav.show_next(ROOT_ID), Err(NavError::EmptyQueue));
}

#[test]
fn test_show_next_or_dismiss_falls_back_to_dismissal() {
    let (mut nav, _) = controller();
    nav.present(ROOT_ID, Screen::push("a").id("a"), Placement::AtOwner);

    nav.show_next_or_dismiss("a");

    assert_eq!(nav.tree().flattened_ids(), vec![ROOT_ID]);
}

#[test]
fn test_remove_and_clear_queue_are_idempotent() {
    let (mut nav, _) = controller();
    nav.add_to_queue(Screen::push("a").id("a"), QueuePlacement::Append);
    nav.add_to_queue(Screen::push("b").id("b"), QueuePlacement::Append);

    nav.remove_from_queue(&["a", "ghost"]);
    assert_eq!(nav.queued_screens(), vec!["b"]);

    nav.clear_queue();
    nav.clear_queue();
    assert!(nav.queued_screens().is_empty());
}

#[test]
fn test_modal_dismissal_tombstones_without_shrinking() {
    let (mut nav, recorder) = controller();
    nav.show_modal(ROOT_ID, ModalDescriptor::new("first").id("m1"));
    nav.show_modal(ROOT_ID, ModalDescriptor::new("second").id("m2"));

    nav.dismiss_modal(ROOT_ID, Some("m1"));

    assert_eq!(nav.modal_count(ROOT_ID), 2);
    assert_eq!(nav.active_modal_count(ROOT_ID), 1);
    assert!(nav.modal_stack(ROOT_ID)[0].removed);

    let events = recorder.0.borrow();
    assert!(events.iter().any(|event| matches!(
        event,
        NavEvent::ModalDismissed { id, .. } if id == "m1"
    )));
}

#[test]
fn test_dismiss_all_modals_walks_top_down() {
    let (mut nav, recorder) = controller();
    for id in ["m1", "m2", "m3"] {
        nav.show_modal(ROOT_ID, ModalDescriptor::new("content").id(id));
    }

    nav.dismiss_all_modals(ROOT_ID);

    assert_eq!(nav.active_modal_count(ROOT_ID), 0);
    assert_eq!(nav.modal_count(ROOT_ID), 3);

    let dismissed: Vec<String> = recorder
        .0
        .borrow()
        .iter()
        .filter_map(|event| match event {
            NavEvent::ModalDismissed { id, .. } => Some(id.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(dismissed, vec!["m3", "m2", "m1"]);
}

#[test]
fn test_transition_stack_bottoms_out_at_its_root() {
    let (mut nav, _) = controller();
    nav.show_transition(ROOT_ID, TransitionDescriptor::new("page").id("t1"));
    assert_eq!(nav.transition_depth(ROOT_ID), 1);

    nav.dismiss_transition(ROOT_ID);
    nav.dismiss_transition(ROOT_ID);

    assert_eq!(nav.transition_depth(ROOT_ID), 0);
    assert_eq!(nav.transition_stack(ROOT_ID).len(), 1);
}

#[test]
fn test_transition_dismissal_reports_the_reversed_direction() {
    let (mut nav, recorder) = controller();
    nav.show_transition(
        ROOT_ID,
        TransitionDescriptor::new("page")
            .id("t1")
            .direction(TransitionDirection::Leading),
    );

    nav.dismiss_transition(ROOT_ID);

    assert!(recorder.0.borrow().iter().any(|event| matches!(
        event,
        NavEvent::TransitionDismissed { id, direction, .. }
            if id == "t1" && *direction == TransitionDirection::Trailing
    )));
}

#[test]
fn test_dismiss_transition_or_dismiss_prefers_the_transition() {
    let (mut nav, _) = controller();
    nav.present(ROOT_ID, Screen::push("a").id("a"), Placement::AtOwner);
    nav.show_transition("a", TransitionDescriptor::new("page").id("t1"));

    nav.dismiss_transition_or_dismiss("a");
    assert_eq!(nav.transition_depth("a"), 0);
    assert_eq!(nav.tree().flattened_ids(), vec![ROOT_ID, "a"]);

    nav.dismiss_transition_or_dismiss("a");
    assert_eq!(nav.tree().flattened_ids(), vec![ROOT_ID]);
}

#[test]
fn test_transition_queue_round_trip() {
    let (mut nav, _) = controller();
    nav.add_to_transition_queue(
        ROOT_ID,
        TransitionDescriptor::new("one").id("t1"),
        QueuePlacement::Append,
    );
    nav.add_to_transition_queue(
        ROOT_ID,
        TransitionDescriptor::new("two").id("t2"),
        QueuePlacement::Append,
    );
    nav.remove_from_transition_queue(ROOT_ID, &["t2"]);

    nav.show_next_transition(ROOT_ID).unwrap();
    assert_eq!(nav.transition_depth(ROOT_ID), 1);
    assert_eq!(
        nav.show_next_transition(ROOT_ID),
        Err(NavError::EmptyQueue)
    );
}

#[test]
fn test_alert_replacement_waits_out_the_debounce() {
    let (mut nav, _) = controller();
    nav.show_alert(Some("home"), AlertDescriptor::new("first").id("a1"));
    nav.show_alert(Some("home"), AlertDescriptor::new("second").id("a2"));

    // The first alert came down at once; its successor is not up yet.
    assert!(nav.active_alert("home").is_none());
    assert!(nav.has_pending_work());

    std::thread::sleep(Duration::from_millis(150));
    nav.poll_deferred();

    assert_eq!(nav.active_alert("home").unwrap().id, "a2");
    assert_eq!(nav.active_alert_count(), 1);
}

#[test]
fn test_present_many_settles_between_environments() {
    let (mut nav, _) = controller();
    nav.present_many(
        ROOT_ID,
        vec![
            Screen::sheet("s1").id("s1"),
            Screen::sheet("s2").id("s2"),
        ],
    );

    assert_eq!(nav.tree().flattened_ids(), vec![ROOT_ID, "s1"]);

    std::thread::sleep(Duration::from_millis(650));
    nav.poll_deferred();

    assert_eq!(nav.tree().flattened_ids(), vec![ROOT_ID, "s1", "s2"]);
    assert!(!nav.has_pending_work());
}

#[test]
fn test_dismiss_all_alerts_clears_every_owner() {
    let (mut nav, _) = controller();
    nav.show_alert(Some("home"), AlertDescriptor::new("first").id("a1"));
    nav.show_alert(Some("settings"), AlertDescriptor::new("second").id("a2"));

    nav.dismiss_all_alerts();

    assert_eq!(nav.active_alert_count(), 0);
    assert!(nav.active_alert("home").is_none());
    assert!(nav.active_alert("settings").is_none());
}
