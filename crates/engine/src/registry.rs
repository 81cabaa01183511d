//! Static registry of app hooks.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::hook::AppHook;

/// Registry mapping app ids to their hooks. Hooks are registered explicitly
/// at startup; iteration follows app-id order, which keeps the fan-out (and
/// therefore output order) deterministic.
#[derive(Default, Clone)]
pub struct HookRegistry {
    hooks: BTreeMap<String, Arc<dyn AppHook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook under its own app id. A second registration for the
    /// same id replaces the first.
    pub fn register(&mut self, hook: Arc<dyn AppHook>) {
        self.hooks.insert(hook.info().app_id, hook);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_hook(mut self, hook: Arc<dyn AppHook>) -> Self {
        self.register(hook);
        self
    }

    pub fn get(&self, app_id: &str) -> Option<&Arc<dyn AppHook>> {
        self.hooks.get(app_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn AppHook>)> {
        self.hooks.iter().map(|(id, hook)| (id.as_str(), hook))
    }

    pub fn app_ids(&self) -> impl Iterator<Item = &str> {
        self.hooks.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("apps", &self.hooks.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HookError;
    use crate::hook::AppInfo;
    use alloy_chains::NamedChain;
    use alloy_primitives::Address;
    use async_trait::async_trait;
    use hooks_rs_types::PositionDefinition;

    struct EmptyHook(&'static str);

    #[async_trait]
    impl AppHook for EmptyHook {
        fn info(&self) -> AppInfo {
            AppInfo::new(self.0, self.0, "test hook")
        }

        async fn get_position_definitions(
            &self,
            _network: NamedChain,
            _address: Option<Address>,
        ) -> Result<Vec<PositionDefinition>, HookError> {
            Ok(vec![])
        }
    }

    #[test]
    fn test_iteration_follows_app_id_order() {
        let registry = HookRegistry::new()
            .with_hook(Arc::new(EmptyHook("zeta")))
            .with_hook(Arc::new(EmptyHook("alpha")))
            .with_hook(Arc::new(EmptyHook("mid")));
        let ids: Vec<&str> = registry.app_ids().collect();
        assert_eq!(ids, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_reregistration_replaces() {
        let mut registry = HookRegistry::new();
        registry.register(Arc::new(EmptyHook("app")));
        registry.register(Arc::new(EmptyHook("app")));
        assert_eq!(registry.len(), 1);
        assert!(registry.get("app").is_some());
        assert!(registry.get("other").is_none());
    }
}
