use serde::{Deserialize, Serialize};

use crate::node::{NavNode, PresentationKind, ROOT_ID};

/// An ordered run of presented nodes sharing one presentation kind.
///
/// Push layers hold any number of nodes; environment layers hold at most
/// one. The top-level layer sequence always keeps a push layer after every
/// environment layer so the host's back-stack binding has something to
/// attach to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavLayer<C> {
    pub kind: PresentationKind,
    pub nodes: Vec<NavNode<C>>,
}

impl<C> NavLayer<C> {
    pub fn push_layer(nodes: Vec<NavNode<C>>) -> Self {
        Self {
            kind: PresentationKind::Push,
            nodes,
        }
    }

    pub fn environment(node: NavNode<C>) -> Self {
        debug_assert!(node.kind.is_environment(), "environment layer seeded with a push node");
        Self {
            kind: node.kind,
            nodes: vec![node],
        }
    }

    pub fn is_push(&self) -> bool {
        self.kind == PresentationKind::Push
    }

    pub fn is_environment(&self) -> bool {
        self.kind.is_environment()
    }

    /// Position of `id` within this layer's node sequence.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == id)
    }
}

/// The single source of truth for what is currently presented.
///
/// Rooted at a sentinel node that is never removed. `layers[0]` is the
/// root's own push stack; environment layers and their trailing push
/// stacks follow in presentation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavTree<C> {
    root: NavNode<C>,
    layers: Vec<NavLayer<C>>,
}

impl<C> Default for NavTree<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> NavTree<C> {
    pub fn new() -> Self {
        Self {
            root: NavNode::root(),
            layers: vec![NavLayer::push_layer(Vec::new())],
        }
    }

    pub fn root(&self) -> &NavNode<C> {
        &self.root
    }

    pub fn layers(&self) -> &[NavLayer<C>] {
        &self.layers
    }

    pub(crate) fn layers_mut(&mut self) -> &mut Vec<NavLayer<C>> {
        &mut self.layers
    }

    /// Index of the last layer containing `id`.
    ///
    /// Scanned in reverse so the most recently presented match wins when a
    /// duplicate id has been presented twice.
    pub fn last_layer_containing(&self, id: &str) -> Option<usize> {
        self.layers
            .iter()
            .rposition(|layer| layer.position_of(id).is_some())
    }

    /// All nodes in presentation order, root first.
    pub fn flattened(&self) -> Vec<&NavNode<C>> {
        let mut nodes = vec![&self.root];
        nodes.extend(self.layers.iter().flat_map(|layer| layer.nodes.iter()));
        nodes
    }

    /// Ids of all nodes in presentation order, root first.
    pub fn flattened_ids(&self) -> Vec<&str> {
        self.flattened().into_iter().map(|node| node.id.as_str()).collect()
    }

    /// Number of presented screens, the root excluded.
    pub fn screen_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.nodes.len()).sum()
    }

    /// The most recently presented node, if anything is presented at all.
    pub fn last_node(&self) -> Option<&NavNode<C>> {
        self.layers
            .iter()
            .rev()
            .find_map(|layer| layer.nodes.last())
    }

    /// Index of the last environment layer that still holds its node.
    pub fn last_environment_layer(&self) -> Option<usize> {
        self.layers
            .iter()
            .rposition(|layer| layer.is_environment() && !layer.nodes.is_empty())
    }

    pub fn contains(&self, id: &str) -> bool {
        id == ROOT_ID || self.last_layer_containing(id).is_some()
    }

    /// Re-establish the trailing-push-layer shape after a mutation.
    ///
    /// A missing trailing push layer is a programmer error in the mutation
    /// that preceded this call; it is corrected here instead of surfaced.
    pub(crate) fn ensure_trailing_push_layer(&mut self) {
        let needs_tail = self
            .layers
            .last()
            .map_or(true, |layer| !layer.is_push());
        if needs_tail {
            log::debug!("tree missing trailing push layer, inserting one");
            self.layers.push(NavLayer::push_layer(Vec::new()));
        }
    }
}
