use serde::{Deserialize, Serialize};

/// Id of the sentinel node every tree is rooted at. It is never dismissed.
pub const ROOT_ID: &str = "root";

/// How a screen is brought on screen.
///
/// `Push` extends the current navigation context; `Sheet` and
/// `FullScreenCover` open a new environment with its own back stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PresentationKind {
    Push,
    Sheet,
    FullScreenCover,
}

impl PresentationKind {
    /// True for the kinds that open an independent navigation environment.
    pub fn is_environment(&self) -> bool {
        !matches!(self, PresentationKind::Push)
    }
}

/// A single presented unit in the navigation tree.
///
/// Content is an opaque renderable the view layer understands; the core
/// never inspects it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavNode<C> {
    pub id: String,
    pub kind: PresentationKind,
    pub animates: bool,
    pub content: Option<C>,
}

impl<C> NavNode<C> {
    /// The synthetic root node seeding every tree.
    pub(crate) fn root() -> Self {
        Self {
            id: ROOT_ID.to_string(),
            kind: PresentationKind::Push,
            animates: false,
            content: None,
        }
    }
}

/// Request to present one screen.
///
/// Built in chained style and handed to the controller:
///
/// ```
/// use navstack::Screen;
///
/// let screen = Screen::sheet("checkout").id("checkout").animated(false);
/// assert_eq!(screen.id, "checkout");
/// ```
#[derive(Debug, Clone)]
pub struct Screen<C> {
    pub id: String,
    pub kind: PresentationKind,
    pub content: Option<C>,
    pub animates: bool,
}

impl<C> Screen<C> {
    fn new(kind: PresentationKind, content: C) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            content: Some(content),
            animates: true,
        }
    }

    /// A screen pushed onto the owner's current stack.
    pub fn push(content: C) -> Self {
        Self::new(PresentationKind::Push, content)
    }

    /// A screen presented as a sheet, opening a new environment.
    pub fn sheet(content: C) -> Self {
        Self::new(PresentationKind::Sheet, content)
    }

    /// A screen presented as a full-screen cover, opening a new environment.
    pub fn full_screen_cover(content: C) -> Self {
        Self::new(PresentationKind::FullScreenCover, content)
    }

    /// Override the system-assigned id with a caller-chosen one.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Whether the mutation that shows (or later removes) this screen runs
    /// through the host's animation system.
    pub fn animated(mut self, animates: bool) -> Self {
        self.animates = animates;
        self
    }

    pub(crate) fn into_node(self) -> NavNode<C> {
        NavNode {
            id: self.id,
            kind: self.kind,
            animates: self.animates,
            content: self.content,
        }
    }
}
