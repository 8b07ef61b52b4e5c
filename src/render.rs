use crate::tree::NavTree;

/// How a single tree mutation reaches the screen.
///
/// `animated: false` means the host must apply the mutation with its
/// implicit animations disabled; the change is still synchronously
/// visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transaction {
    pub animated: bool,
}

/// The rendering collaborator, injected into the controller.
///
/// The core never draws; it hands the host the new tree after every
/// mutation and tells it whether to animate. Hosts walk
/// [`NavTree::layers`] to mount one stack segment per push layer and one
/// presentation per environment layer, resolving node ids to content via
/// the nodes' embedded payloads.
pub trait RenderHost<C> {
    /// The tree changed; re-render it under `transaction`.
    fn apply(&mut self, tree: &NavTree<C>, transaction: Transaction);

    /// The owner's modal or transition overlays changed. Z-order follows
    /// array position in the respective stacks.
    fn overlays_changed(&mut self, _owner: &str) {}
}
