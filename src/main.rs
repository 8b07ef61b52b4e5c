use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;

use navstack::{
    AlertButton, AlertDescriptor, ModalDescriptor, NavController, NavEvent, NavObserver,
    Placement, QueuePlacement, Screen, TransitionDescriptor, TransitionDirection, ROOT_ID,
};

/// Observer that forwards every navigation event to the log.
struct LogObserver;

impl NavObserver for LogObserver {
    fn on_event(&self, event: &NavEvent) {
        log::info!("{event:?}");
    }
}

/// Tick the controller until all deferred work (presentation chains,
/// alert debounces) has settled.
async fn drain(nav: &mut NavController<String>) {
    while nav.has_pending_work() {
        nav.poll_deferred();
        tokio::time::sleep(Duration::from_millis(16)).await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut nav: NavController<String> = NavController::with_observer(Rc::new(LogObserver));

    // A push stack under the root, then a sheet flow presented in one go.
    // The chain pauses between the sheet and its follow-up push so both
    // would animate cleanly on a real host.
    nav.present(ROOT_ID, Screen::push("Inbox".into()).id("inbox"), Placement::AtOwner);
    nav.present("inbox", Screen::push("Thread".into()).id("thread"), Placement::AtOwner);
    nav.present_many(
        "thread",
        vec![
            Screen::sheet("Compose".into()).id("compose"),
            Screen::push("Attachments".into()).id("attachments"),
        ],
    );
    drain(&mut nav).await;
    log::info!("tree after sheet flow: {:?}", nav.tree().flattened_ids());

    // Queue two screens, then consume them in order.
    nav.add_to_queue(Screen::push("Tips".into()).id("tips"), QueuePlacement::Append);
    nav.add_to_queue(
        Screen::push("Welcome".into()).id("welcome"),
        QueuePlacement::Insert { owner: "attachments".into() },
    );
    while nav.show_next("attachments").is_ok() {}
    drain(&mut nav).await;

    // Stacked modals; dismissal tombstones in place so z-order holds
    // while exit animations play.
    nav.show_modal("compose", ModalDescriptor::new("Saving…".into()).id("spinner").dim(true));
    nav.show_modal(
        "compose",
        ModalDescriptor::new("Saved".into()).id("toast").tap_to_dismiss(true),
    );
    nav.dismiss_modal("compose", Some("spinner"));
    log::info!(
        "modals for compose: {} total, {} active",
        nav.modal_count("compose"),
        nav.active_modal_count("compose")
    );

    // Replacing an alert debounces the successor in.
    nav.show_alert(None, AlertDescriptor::new("Discard draft?").id("discard"));
    nav.show_alert(
        None,
        AlertDescriptor::new("Delete thread?")
            .id("delete")
            .button(AlertButton::destructive("Delete"))
            .button(AlertButton::cancel("Keep")),
    );
    drain(&mut nav).await;

    // A directional content swap inside one screen, then unwound.
    nav.show_transition(
        "inbox",
        TransitionDescriptor::new("Filters".into())
            .id("filters")
            .direction(TransitionDirection::Leading),
    );
    nav.dismiss_transition("inbox");

    // Collapse the sheet flow and leave the push stack behind.
    nav.dismiss_environment("attachments");
    drain(&mut nav).await;

    println!("{}", serde_json::to_string_pretty(nav.tree())?);
    Ok(())
}
