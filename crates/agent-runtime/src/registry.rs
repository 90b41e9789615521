//! Action registry for managing available actions

use agent_core::Action;
use std::sync::{Arc, PoisonError, RwLock};

/// Registry for managing actions
///
/// Actions keep their registration order; dispatch tries them in that order.
#[derive(Default)]
pub struct ActionRegistry {
    actions: RwLock<Vec<Arc<dyn Action>>>,
}

impl ActionRegistry {
    /// Create a new action registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action, replacing any action with the same name
    pub fn register(&self, action: Arc<dyn Action>) {
        let mut actions = self.actions.write().unwrap_or_else(PoisonError::into_inner);
        actions.retain(|a| a.name() != action.name());
        actions.push(action);
    }

    /// Find an action by name or simile
    pub fn get(&self, name: &str) -> Option<Arc<dyn Action>> {
        let actions = self.actions.read().unwrap_or_else(PoisonError::into_inner);
        actions.iter().find(|a| a.answers_to(name)).cloned()
    }

    /// All registered actions, in registration order
    pub fn list_actions(&self) -> Vec<Arc<dyn Action>> {
        let actions = self.actions.read().unwrap_or_else(PoisonError::into_inner);
        actions.clone()
    }

    /// Registered action names
    pub fn names(&self) -> Vec<String> {
        self.list_actions()
            .iter()
            .map(|a| a.name().to_string())
            .collect()
    }

    /// Get the number of registered actions
    pub fn len(&self) -> usize {
        self.actions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::{
        ActionOutput, HandlerCallback, HandlerOptions, Memory, Runtime, State,
    };
    use async_trait::async_trait;

    struct Named(&'static str, &'static [&'static str]);

    #[async_trait]
    impl Action for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn similes(&self) -> &[&str] {
            self.1
        }

        fn description(&self) -> &str {
            "test action"
        }

        async fn validate(&self, _: &dyn Runtime, _: &Memory, _: &State) -> bool {
            true
        }

        async fn handle(
            &self,
            _: &dyn Runtime,
            _: &Memory,
            _: &mut State,
            _: &HandlerOptions,
            _: Option<&dyn HandlerCallback>,
        ) -> Option<ActionOutput> {
            None
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = ActionRegistry::new();
        assert!(registry.is_empty());

        registry.register(Arc::new(Named("ANALYZE_TOKEN", &["ANALYZE_COIN"])));
        registry.register(Arc::new(Named("GENERATE_TWEET", &[])));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["ANALYZE_TOKEN", "GENERATE_TWEET"]);
        assert_eq!(
            registry.get("analyze_coin").map(|a| a.name().to_string()),
            Some("ANALYZE_TOKEN".to_string())
        );
        assert!(registry.get("MISSING").is_none());
    }

    #[test]
    fn test_register_replaces_same_name() {
        let registry = ActionRegistry::new();
        registry.register(Arc::new(Named("GENERATE_TWEET", &[])));
        registry.register(Arc::new(Named("GENERATE_TWEET", &["POST"])));

        assert_eq!(registry.len(), 1);
        assert!(registry.get("POST").is_some());
    }
}
