use std::collections::HashMap;

/// Presentation style of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertStyle {
    Alert,
    ConfirmationDialog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertButtonRole {
    Default,
    Cancel,
    Destructive,
}

#[derive(Debug, Clone)]
pub struct AlertButton {
    pub label: String,
    pub role: AlertButtonRole,
}

impl AlertButton {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            role: AlertButtonRole::Default,
        }
    }

    pub fn cancel(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            role: AlertButtonRole::Cancel,
        }
    }

    pub fn destructive(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            role: AlertButtonRole::Destructive,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AlertDescriptor {
    pub id: String,
    pub style: AlertStyle,
    pub title: String,
    pub subtitle: Option<String>,
    pub buttons: Vec<AlertButton>,
}

impl AlertDescriptor {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            style: AlertStyle::Alert,
            title: title.into(),
            subtitle: None,
            buttons: Vec::new(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn style(mut self, style: AlertStyle) -> Self {
        self.style = style;
        self
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn button(mut self, button: AlertButton) -> Self {
        self.buttons.push(button);
        self
    }
}

/// At most one active alert per owner.
///
/// Replacement while an alert is up goes through the controller's
/// scheduler: the old alert comes down immediately and the new one is
/// installed after a short debounce so the platform's dismiss and show
/// animations do not collide.
#[derive(Debug, Clone, Default)]
pub struct AlertCenter {
    active: HashMap<String, AlertDescriptor>,
}

impl AlertCenter {
    pub fn new() -> Self {
        Self {
            active: HashMap::new(),
        }
    }

    /// Install an alert for `owner`. The slot must be empty; the controller
    /// clears it first when replacing.
    pub fn install(&mut self, owner: &str, alert: AlertDescriptor) -> String {
        debug_assert!(
            !self.active.contains_key(owner),
            "alert slot for `{owner}` installed twice"
        );
        let id = alert.id.clone();
        self.active.insert(owner.to_string(), alert);
        id
    }

    /// Clear the owner's slot, returning the removed alert's id.
    pub fn remove(&mut self, owner: &str) -> Option<String> {
        self.active.remove(owner).map(|alert| alert.id)
    }

    /// Clear every slot, returning `(owner, id)` pairs.
    pub fn remove_all(&mut self) -> Vec<(String, String)> {
        self.active
            .drain()
            .map(|(owner, alert)| (owner, alert.id))
            .collect()
    }

    pub fn active(&self, owner: &str) -> Option<&AlertDescriptor> {
        self.active.get(owner)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}
