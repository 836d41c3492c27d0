//! Process-wide agent registry, populated at startup and read-only afterwards.

use super::{AgentDescriptor, AgentKind, Example};
use crate::error::RouterError;

/// Registered task agents plus the fallback agent.
///
/// Only task agents take part in selection; the fallback is bound when none
/// of their examples is similar enough.
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    agents: Vec<AgentDescriptor>,
    fallback: AgentDescriptor,
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentRegistry {
    /// An empty registry holding only the fallback agent.
    pub fn new() -> Self {
        Self {
            agents: Vec::new(),
            fallback: AgentDescriptor::casual_chat(),
        }
    }

    /// The registry with every built-in task agent.
    pub fn builtin() -> Self {
        Self::new().with_agent(AgentDescriptor::language_study())
    }

    /// Register a task agent.
    ///
    /// Fails for the fallback kind and for kinds already registered.
    pub fn register(&mut self, descriptor: AgentDescriptor) -> Result<(), RouterError> {
        if descriptor.kind.is_fallback() {
            return Err(RouterError::Configuration(format!(
                "'{}' is the fallback agent and cannot be registered for selection",
                descriptor.kind
            )));
        }
        if self.agents.iter().any(|a| a.kind == descriptor.kind) {
            return Err(RouterError::Configuration(format!(
                "agent '{}' is already registered",
                descriptor.kind
            )));
        }
        self.agents.push(descriptor);
        Ok(())
    }

    fn with_agent(mut self, descriptor: AgentDescriptor) -> Self {
        if !self.agents.iter().any(|a| a.kind == descriptor.kind) {
            self.agents.push(descriptor);
        }
        self
    }

    /// Registered task agents in registration order.
    pub fn agents(&self) -> &[AgentDescriptor] {
        &self.agents
    }

    pub fn fallback(&self) -> &AgentDescriptor {
        &self.fallback
    }

    /// Look up any kind, including the fallback.
    pub fn get(&self, kind: AgentKind) -> Option<&AgentDescriptor> {
        if kind == self.fallback.kind {
            return Some(&self.fallback);
        }
        self.agents.iter().find(|a| a.kind == kind)
    }

    /// Like [`get`](Self::get), but a missing kind is an error.
    pub fn descriptor(&self, kind: AgentKind) -> Result<&AgentDescriptor, RouterError> {
        self.get(kind)
            .ok_or_else(|| RouterError::UnknownAgent(kind.to_string()))
    }

    /// Every selectable example, tagged with its owning agent.
    pub fn selectable_examples(&self) -> impl Iterator<Item = (AgentKind, &Example)> {
        self.agents
            .iter()
            .flat_map(|agent| agent.examples.iter().map(move |ex| (agent.kind, ex)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registers_language_study() {
        let registry = AgentRegistry::builtin();
        assert_eq!(registry.agents().len(), 1);
        assert_eq!(registry.agents()[0].kind, AgentKind::LanguageStudy);
        assert_eq!(registry.fallback().kind, AgentKind::CasualChat);
    }

    #[test]
    fn fallback_examples_are_not_selectable() {
        let registry = AgentRegistry::builtin();
        let kinds: Vec<_> = registry.selectable_examples().map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![AgentKind::LanguageStudy, AgentKind::LanguageStudy]);
    }

    #[test]
    fn get_resolves_fallback_and_task_agents() {
        let registry = AgentRegistry::builtin();
        assert!(registry.get(AgentKind::CasualChat).is_some());
        assert!(registry.get(AgentKind::LanguageStudy).is_some());
    }

    #[test]
    fn missing_agent_is_unknown() {
        let registry = AgentRegistry::new();
        let err = registry.descriptor(AgentKind::LanguageStudy).unwrap_err();
        assert!(matches!(err, RouterError::UnknownAgent(ref name) if name == "language_study"));
    }

    #[test]
    fn register_rejects_duplicates_and_fallback() {
        let mut registry = AgentRegistry::builtin();
        assert!(registry.register(AgentDescriptor::language_study()).is_err());
        assert!(registry.register(AgentDescriptor::casual_chat()).is_err());

        let mut empty = AgentRegistry::new();
        empty.register(AgentDescriptor::language_study()).unwrap();
        assert_eq!(empty.agents().len(), 1);
    }
}
