use std::collections::HashMap;

use crate::node::ROOT_ID;
use crate::queue::QueueItem;

/// Direction a transition's content enters from. Dismissal plays the
/// reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDirection {
    Leading,
    Trailing,
    Top,
    Bottom,
}

impl TransitionDirection {
    pub fn reversed(&self) -> Self {
        match self {
            TransitionDirection::Leading => TransitionDirection::Trailing,
            TransitionDirection::Trailing => TransitionDirection::Leading,
            TransitionDirection::Top => TransitionDirection::Bottom,
            TransitionDirection::Bottom => TransitionDirection::Top,
        }
    }
}

/// A directional content swap within one owner.
///
/// Lighter than a presented screen: it never touches the system
/// push/sheet machinery and lives only in its owner's transition stack.
#[derive(Debug, Clone)]
pub struct TransitionDescriptor<C> {
    pub id: String,
    pub direction: TransitionDirection,
    pub animates: bool,
    /// Whether the view layer may pop this entry with an edge-swipe.
    pub swipe_back: bool,
    pub content: Option<C>,
}

impl<C> TransitionDescriptor<C> {
    pub fn new(content: C) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            direction: TransitionDirection::Trailing,
            animates: true,
            swipe_back: true,
            content: Some(content),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn direction(mut self, direction: TransitionDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn animated(mut self, animates: bool) -> Self {
        self.animates = animates;
        self
    }

    pub fn swipe_back(mut self, allowed: bool) -> Self {
        self.swipe_back = allowed;
        self
    }
}

impl<C> QueueItem for TransitionDescriptor<C> {
    fn queue_id(&self) -> &str {
        &self.id
    }
}

/// Per-owner transition stacks.
///
/// Every stack is seeded with a root sentinel standing for the owner's
/// initial content; the sentinel is never removable. Unlike modals,
/// dismissed entries are physically removed.
#[derive(Debug, Clone, Default)]
pub struct TransitionLayers<C> {
    stacks: HashMap<String, Vec<TransitionDescriptor<C>>>,
}

/// Id + reversed direction of one dismissed entry, in dismissal order.
pub type DismissedTransition = (String, TransitionDirection);

impl<C> TransitionLayers<C> {
    pub fn new() -> Self {
        Self {
            stacks: HashMap::new(),
        }
    }

    fn stack_mut(&mut self, owner: &str) -> &mut Vec<TransitionDescriptor<C>> {
        self.stacks.entry(owner.to_string()).or_insert_with(|| {
            vec![TransitionDescriptor {
                id: ROOT_ID.to_string(),
                direction: TransitionDirection::Trailing,
                animates: false,
                swipe_back: false,
                content: None,
            }]
        })
    }

    pub fn show(&mut self, owner: &str, transition: TransitionDescriptor<C>) -> String {
        let id = transition.id.clone();
        self.stack_mut(owner).push(transition);
        id
    }

    /// Remove the single most recent entry. The root sentinel stays put;
    /// dismissing past it is a no-op.
    pub fn dismiss(&mut self, owner: &str) -> Option<DismissedTransition> {
        let stack = self.stack_mut(owner);
        if stack.len() <= 1 {
            log::info!("transition stack for `{owner}` is at its root, nothing to dismiss");
            return None;
        }
        let entry = stack.pop()?;
        Some((entry.id, entry.direction.reversed()))
    }

    /// Remove every entry above `id`, most recent first. `id` itself
    /// survives, so `dismiss_up_to(owner, ROOT_ID)` clears the whole stack.
    pub fn dismiss_up_to(&mut self, owner: &str, id: &str) -> Vec<DismissedTransition> {
        let stack = self.stack_mut(owner);
        let start = stack
            .iter()
            .rposition(|entry| entry.id == id)
            .map_or_else(|| stack.len(), |idx| idx + 1);
        Self::drain_from(stack, start)
    }

    /// Remove the `count` most recent entries, bounded by the sentinel.
    pub fn dismiss_count(&mut self, owner: &str, count: usize) -> Vec<DismissedTransition> {
        let stack = self.stack_mut(owner);
        let start = stack.len().saturating_sub(count).max(1);
        Self::drain_from(stack, start)
    }

    /// Remove everything above the sentinel.
    pub fn dismiss_all(&mut self, owner: &str) -> Vec<DismissedTransition> {
        let stack = self.stack_mut(owner);
        Self::drain_from(stack, 1)
    }

    /// Entries currently shown for `owner`, sentinel included once the
    /// owner has been touched.
    pub fn stack(&self, owner: &str) -> &[TransitionDescriptor<C>] {
        self.stacks.get(owner).map_or(&[], |stack| stack.as_slice())
    }

    /// Number of entries above the sentinel.
    pub fn depth(&self, owner: &str) -> usize {
        self.stacks
            .get(owner)
            .map_or(0, |stack| stack.len().saturating_sub(1))
    }

    fn drain_from(
        stack: &mut Vec<TransitionDescriptor<C>>,
        start: usize,
    ) -> Vec<DismissedTransition> {
        stack
            .drain(start..)
            .map(|entry| (entry.id, entry.direction.reversed()))
            .rev()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_is_seeded_with_root_sentinel() {
        let mut transitions: TransitionLayers<&str> = TransitionLayers::new();
        transitions.show("home", TransitionDescriptor::new("page").id("t1"));

        let stack = transitions.stack("home");
        assert_eq!(stack[0].id, ROOT_ID);
        assert_eq!(stack[1].id, "t1");
        assert_eq!(transitions.depth("home"), 1);
    }

    #[test]
    fn test_dismiss_reverses_recorded_direction() {
        let mut transitions: TransitionLayers<&str> = TransitionLayers::new();
        transitions.show(
            "home",
            TransitionDescriptor::new("page")
                .id("t1")
                .direction(TransitionDirection::Leading),
        );

        let (id, direction) = transitions.dismiss("home").unwrap();
        assert_eq!(id, "t1");
        assert_eq!(direction, TransitionDirection::Trailing);
    }

    #[test]
    fn test_dismiss_never_removes_the_sentinel() {
        let mut transitions: TransitionLayers<&str> = TransitionLayers::new();
        transitions.show("home", TransitionDescriptor::new("page").id("t1"));

        assert!(transitions.dismiss("home").is_some());
        assert!(transitions.dismiss("home").is_none());
        assert_eq!(transitions.stack("home").len(), 1);
    }

    #[test]
    fn test_dismiss_up_to_removes_suffix_most_recent_first() {
        let mut transitions: TransitionLayers<&str> = TransitionLayers::new();
        for id in ["t1", "t2", "t3"] {
            transitions.show("home", TransitionDescriptor::new("page").id(id));
        }

        let dismissed = transitions.dismiss_up_to("home", "t1");
        let ids: Vec<_> = dismissed.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["t3", "t2"]);
        assert_eq!(transitions.depth("home"), 1);

        let rest = transitions.dismiss_up_to("home", ROOT_ID);
        assert_eq!(rest.len(), 1);
        assert_eq!(transitions.depth("home"), 0);
    }

    #[test]
    fn test_dismiss_count_is_bounded_by_sentinel() {
        let mut transitions: TransitionLayers<&str> = TransitionLayers::new();
        transitions.show("home", TransitionDescriptor::new("page").id("t1"));
        transitions.show("home", TransitionDescriptor::new("page").id("t2"));

        let dismissed = transitions.dismiss_count("home", 10);
        assert_eq!(dismissed.len(), 2);
        assert_eq!(transitions.stack("home").len(), 1);
    }

    #[test]
    fn test_dismiss_up_to_unknown_id_dismisses_nothing() {
        let mut transitions: TransitionLayers<&str> = TransitionLayers::new();
        transitions.show("home", TransitionDescriptor::new("page").id("t1"));

        assert!(transitions.dismiss_up_to("home", "ghost").is_empty());
        assert_eq!(transitions.depth("home"), 1);
    }
}
