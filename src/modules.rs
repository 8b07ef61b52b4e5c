use std::collections::HashMap;

use crate::controller::NavController;

/// Registry of independent navigation roots ("modules").
///
/// Each module owns its own controller and shares no mutable state with
/// the others; only one module is active at a time. Which module starts
/// active is the host's business (typically restored from whatever it
/// persisted last run) and is passed in at construction.
pub struct NavModules<C> {
    modules: HashMap<String, NavController<C>>,
    active: String,
}

impl<C> NavModules<C> {
    pub fn new(initial_active: impl Into<String>) -> Self {
        let active = initial_active.into();
        let mut modules = HashMap::new();
        modules.insert(active.clone(), NavController::new());
        Self { modules, active }
    }

    /// Register a module under `id`, replacing any previous controller
    /// with that id.
    pub fn register(&mut self, id: impl Into<String>, controller: NavController<C>) {
        self.modules.insert(id.into(), controller);
    }

    pub fn active_id(&self) -> &str {
        &self.active
    }

    pub fn active(&self) -> &NavController<C> {
        &self.modules[&self.active]
    }

    pub fn active_mut(&mut self) -> &mut NavController<C> {
        self.modules
            .get_mut(&self.active)
            .expect("active module always registered")
    }

    /// Switch the active module. Unknown ids are ignored so stale
    /// persisted identifiers cannot strand the host.
    pub fn activate(&mut self, id: &str) -> bool {
        if self.modules.contains_key(id) {
            id.clone_into(&mut self.active);
            true
        } else {
            log::warn!("activate: module `{id}` is not registered");
            false
        }
    }

    pub fn module(&self, id: &str) -> Option<&NavController<C>> {
        self.modules.get(id)
    }

    pub fn module_mut(&mut self, id: &str) -> Option<&mut NavController<C>> {
        self.modules.get_mut(id)
    }

    pub fn module_ids(&self) -> Vec<&str> {
        self.modules.keys().map(String::as_str).collect()
    }

    /// Drive deferred work for every module, active or not; a background
    /// module's pending presentations keep settling while another module
    /// holds the screen.
    pub fn poll_deferred(&mut self) {
        for controller in self.modules.values_mut() {
            controller.poll_deferred();
        }
    }

    pub fn has_pending_work(&self) -> bool {
        self.modules
            .values()
            .any(NavController::has_pending_work)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Placement;
    use crate::node::{Screen, ROOT_ID};

    #[test]
    fn test_modules_are_independent() {
        let mut modules: NavModules<&str> = NavModules::new("main");
        modules.register("settings", NavController::new());

        modules
            .active_mut()
            .present(ROOT_ID, Screen::push("inbox").id("inbox"), Placement::AtOwner);

        assert_eq!(
            modules.module("main").unwrap().tree().flattened_ids(),
            vec![ROOT_ID, "inbox"]
        );
        assert_eq!(
            modules.module("settings").unwrap().tree().flattened_ids(),
            vec![ROOT_ID]
        );
    }

    #[test]
    fn test_activate_ignores_unknown_module() {
        let mut modules: NavModules<&str> = NavModules::new("main");
        assert!(!modules.activate("ghost"));
        assert_eq!(modules.active_id(), "main");

        modules.register("settings", NavController::new());
        assert!(modules.activate("settings"));
        assert_eq!(modules.active_id(), "settings");
    }
}
