use crate::event::NavEvent;
use crate::node::ROOT_ID;

use super::NavController;

impl<C> NavController<C> {
    /// Primitive dismissal: remove `target` and every node presented
    /// after it, across all layers.
    ///
    /// Dismissal events fire most-recently-presented first, so an
    /// observer tracking the top of the tree always ends on the screen
    /// that encloses the dismissed region.
    pub(crate) fn apply_dismiss(&mut self, operation: &'static str, target: &str) {
        if target == ROOT_ID {
            log::debug!("{operation}: the root is never dismissed");
            return;
        }
        let Some(layer_idx) = self.tree.last_layer_containing(target) else {
            self.emit(NavEvent::OwnerMissing {
                operation,
                owner: target.to_string(),
            });
            return;
        };
        let Some(node_idx) = self.tree.layers()[layer_idx].position_of(target) else {
            return;
        };
        let animated = self.tree.layers()[layer_idx].nodes[node_idx].animates;

        let mut removed = Vec::new();
        {
            let layers = self.tree.layers_mut();
            removed.extend(layers[layer_idx].nodes.drain(node_idx..));
            for layer in layers.drain(layer_idx + 1..) {
                removed.extend(layer.nodes);
            }
            // An environment layer emptied by the trim has nothing left
            // to present; it leaves together with its back stack.
            if layers[layer_idx].is_environment() && layers[layer_idx].nodes.is_empty() {
                layers.remove(layer_idx);
            }
        }
        self.tree.ensure_trailing_push_layer();

        for node in removed.iter().rev() {
            self.emit(NavEvent::ScreenDismissed {
                id: node.id.clone(),
            });
        }
        self.notify_render(animated);
    }

    /// Dismiss everything presented after `up_to`, leaving `up_to` on
    /// screen.
    pub(crate) fn apply_dismiss_up_to(&mut self, up_to: &str) {
        let flattened = self.tree.flattened_ids();
        let Some(idx) = flattened.iter().rposition(|id| *id == up_to) else {
            self.emit(NavEvent::OwnerMissing {
                operation: "dismiss_up_to",
                owner: up_to.to_string(),
            });
            return;
        };
        let Some(target) = flattened.get(idx + 1).map(|id| id.to_string()) else {
            log::info!("dismiss_up_to: `{up_to}` is already on top");
            return;
        };
        self.apply_dismiss("dismiss_up_to", &target);
    }

    /// Dismiss the `count` most recently presented screens.
    pub(crate) fn apply_dismiss_count(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        let flattened = self.tree.flattened_ids();
        if flattened.len() <= 1 {
            log::info!("dismiss_count: nothing is presented");
            return;
        }
        // Walking the reversed node list `count` steps lands here; the
        // root caps the walk at the earliest presented screen.
        let idx = flattened.len().saturating_sub(count).max(1);
        let target = flattened[idx].to_string();
        self.apply_dismiss("dismiss_count", &target);
    }

    /// Pop the owner's whole push stack by dismissing its first node.
    pub(crate) fn apply_dismiss_push_stack(&mut self, owner: &str) {
        let layer_idx = if owner == ROOT_ID {
            Some(0)
        } else {
            self.tree.last_layer_containing(owner)
        };
        let Some(layer_idx) = layer_idx else {
            self.emit(NavEvent::OwnerMissing {
                operation: "dismiss_push_stack",
                owner: owner.to_string(),
            });
            return;
        };

        let layers = self.tree.layers();
        let target_layer = if layers[layer_idx].is_push() {
            layer_idx
        } else {
            // The owner opened an environment; its stack is the push
            // layer trailing it.
            layer_idx + 1
        };
        let target = layers
            .get(target_layer)
            .and_then(|layer| layer.nodes.first())
            .map(|node| node.id.clone());

        match target {
            Some(target) => self.apply_dismiss("dismiss_push_stack", &target),
            None => log::info!("dismiss_push_stack: stack for `{owner}` is already empty"),
        }
    }

    /// Dismiss the nearest environment at or below the owner, taking the
    /// owner and everything above with it.
    pub(crate) fn apply_dismiss_environment(&mut self, owner: &str) {
        if owner == ROOT_ID {
            log::info!("dismiss_environment: the root has no enclosing environment");
            return;
        }
        let Some(layer_idx) = self.tree.last_layer_containing(owner) else {
            self.emit(NavEvent::OwnerMissing {
                operation: "dismiss_environment",
                owner: owner.to_string(),
            });
            return;
        };

        let target = self.tree.layers()[..=layer_idx]
            .iter()
            .rev()
            .find(|layer| layer.is_environment())
            .and_then(|layer| layer.nodes.first())
            .map(|node| node.id.clone());

        match target {
            Some(target) => self.apply_dismiss("dismiss_environment", &target),
            None => log::info!("dismiss_environment: `{owner}` is not inside an environment"),
        }
    }

    /// Dismiss whichever screen is currently on top.
    pub fn dismiss_last_screen(&mut self) {
        let Some(target) = self.tree.last_node().map(|node| node.id.clone()) else {
            log::info!("dismiss_last_screen: nothing is presented");
            return;
        };
        self.apply_dismiss("dismiss_last_screen", &target);
    }

    /// Dismiss the most recently opened environment.
    pub fn dismiss_last_environment(&mut self) {
        let target = self
            .tree
            .last_environment_layer()
            .and_then(|idx| self.tree.layers()[idx].nodes.first())
            .map(|node| node.id.clone());
        match target {
            Some(target) => self.apply_dismiss("dismiss_last_environment", &target),
            None => log::info!("dismiss_last_environment: no environment is open"),
        }
    }

    /// Pop the outermost push stack currently on top of the tree.
    pub fn dismiss_last_push_stack(&mut self) {
        let target = self
            .tree
            .layers()
            .last()
            .and_then(|layer| layer.nodes.first())
            .map(|node| node.id.clone());
        match target {
            Some(target) => self.apply_dismiss("dismiss_last_push_stack", &target),
            None => log::info!("dismiss_last_push_stack: the top stack is empty"),
        }
    }

    /// Unwind the owner's transition stack one step if it has any depth,
    /// otherwise dismiss the owner's screen.
    pub(crate) fn apply_dismiss_transition_or_screen(&mut self, owner: &str) {
        if self.transitions.depth(owner) > 0 {
            self.apply_dismiss_transition(owner);
        } else {
            self.apply_dismiss("dismiss", owner);
        }
    }
}
