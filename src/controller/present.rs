use crate::event::NavEvent;
use crate::node::{NavNode, Screen, ROOT_ID};
use crate::tree::NavLayer;

use super::scheduler::DeferredWork;
use super::{NavController, CONSECUTIVE_PRESENT_DELAY};

/// Where a presented screen lands relative to its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Directly at the owner: a push slots in right after it, an
    /// environment opens just above its layer.
    AtOwner,
    /// Same rules as `AtOwner`, anchored at an explicitly named screen
    /// instead of the caller.
    After(String),
    /// Tail of the tree regardless of where the owner sits.
    Append,
}

/// Anchor resolution: the layer the anchor lives in, and its position
/// inside that layer. `None` position marks a virtual predecessor (the
/// root, which precedes layer 0 without being part of it).
type Anchor = (usize, Option<usize>);

impl<C> NavController<C> {
    /// Materialize one screen. Returns the presented node's id, or `None`
    /// when the anchor could not be found and the call degraded to a
    /// no-op.
    pub(crate) fn apply_present(
        &mut self,
        owner: &str,
        screen: Screen<C>,
        placement: &Placement,
    ) -> Option<String> {
        let anchor_id = match placement {
            Placement::AtOwner => Some(owner),
            Placement::After(id) => Some(id.as_str()),
            Placement::Append => None,
        };

        let anchor = match anchor_id {
            Some(id) => match self.resolve_anchor(id) {
                Some(anchor) => Some(anchor),
                None => {
                    self.emit(NavEvent::OwnerMissing {
                        operation: "present",
                        owner: id.to_string(),
                    });
                    return None;
                }
            },
            None => None,
        };

        let animated = screen.animates;
        let id = screen.id.clone();
        let kind = screen.kind;
        let node = screen.into_node();

        if kind.is_environment() {
            self.insert_environment(node, anchor);
        } else {
            self.insert_push(node, anchor);
        }
        self.tree.ensure_trailing_push_layer();

        self.emit(NavEvent::ScreenPresented {
            id: id.clone(),
            kind,
            animated,
        });
        self.notify_render(animated);
        Some(id)
    }

    /// Present a sequence of screens, each anchored at the one before it.
    ///
    /// When a step opens a new environment and the next step animates, the
    /// remainder of the chain is deferred: the platform cannot animate a
    /// second presentation while the environment it just opened is still
    /// settling.
    pub(crate) fn run_chain(&mut self, gate: &str, owner: String, mut rest: Vec<Screen<C>>) {
        let mut current = owner;
        while !rest.is_empty() {
            let screen = rest.remove(0);
            let opened_environment = screen.kind.is_environment();
            let presented = self.apply_present(&current, screen, &Placement::AtOwner);
            let settled = match presented {
                Some(id) => {
                    current = id;
                    true
                }
                None => false,
            };

            if settled && opened_environment && rest.first().is_some_and(|next| next.animates) {
                self.scheduler.defer(
                    gate,
                    DeferredWork::PresentChain {
                        gate: gate.to_string(),
                        owner: current,
                        rest,
                    },
                    CONSECUTIVE_PRESENT_DELAY,
                );
                return;
            }
        }
    }

    fn resolve_anchor(&self, id: &str) -> Option<Anchor> {
        if id == ROOT_ID {
            return Some((0, None));
        }
        let layer = self.tree.last_layer_containing(id)?;
        Some((layer, self.tree.layers()[layer].position_of(id)))
    }

    /// Insert a push node after its anchor, inside the anchor's push layer
    /// (or the push layer trailing the anchor's environment layer).
    fn insert_push(&mut self, node: NavNode<C>, anchor: Option<Anchor>) {
        let Some((layer_idx, pos)) = anchor else {
            // Append override: tail of the last push layer, wherever the
            // caller sits.
            self.tree.ensure_trailing_push_layer();
            let layers = self.tree.layers_mut();
            let last = layers.len() - 1;
            layers[last].nodes.push(node);
            return;
        };

        if self.tree.layers()[layer_idx].is_push() {
            let layer = &mut self.tree.layers_mut()[layer_idx];
            // A virtual predecessor owns the slot before the first node;
            // an unlocatable owner degrades to appending.
            let insert_at = pos.map_or(0, |p| p + 1).min(layer.nodes.len());
            layer.nodes.insert(insert_at, node);
        } else {
            // The anchor opened an environment; pushes belong to the push
            // layer trailing it, where the anchor is the virtual
            // predecessor.
            let target = layer_idx + 1;
            let missing_tail = self
                .tree
                .layers()
                .get(target)
                .is_none_or(|layer| !layer.is_push());
            if missing_tail {
                self.tree
                    .layers_mut()
                    .insert(target, NavLayer::push_layer(Vec::new()));
            }
            self.tree.layers_mut()[target].nodes.insert(0, node);
        }
    }

    /// Open a new environment: an environment layer holding the node plus
    /// its blank trailing push layer, immediately above the anchor's
    /// layer (skipping the anchor's own trailing push layer when the
    /// anchor is itself an environment).
    fn insert_environment(&mut self, node: NavNode<C>, anchor: Option<Anchor>) {
        let insert_at = match anchor {
            None => self.tree.layers().len(),
            Some((layer_idx, _)) => {
                if self.tree.layers()[layer_idx].is_push() {
                    layer_idx + 1
                } else {
                    layer_idx + 2
                }
            }
        };
        let insert_at = insert_at.min(self.tree.layers().len());

        let layers = self.tree.layers_mut();
        layers.insert(insert_at, NavLayer::push_layer(Vec::new()));
        layers.insert(insert_at, NavLayer::environment(node));
    }
}
