//! Explicit-entities versus predefined-scope resolution.

use std::collections::BTreeSet;

use soar_types::TargetEntity;

use crate::action::ActionError;

/// Scope applied when the caller does not name one.
pub const DEFAULT_SCOPE: &str = "All entities";

/// Scope names the backend accepts, fetched once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeSet(BTreeSet<String>);

impl ScopeSet {
    pub fn new<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(scopes.into_iter().map(Into::into).collect())
    }

    /// Exact, case-sensitive membership.
    pub fn contains(&self, scope: &str) -> bool {
        self.0.contains(scope)
    }

    /// Sorted scope names joined with `", "`.
    pub fn allowed_values(&self) -> String {
        self.0.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
    }
}

impl From<BTreeSet<String>> for ScopeSet {
    fn from(scopes: BTreeSet<String>) -> Self {
        Self(scopes)
    }
}

/// What an action runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionTarget {
    /// Caller-named entities; never empty.
    Entities(Vec<TargetEntity>),
    /// A validated predefined scope.
    Scope(String),
}

impl ActionTarget {
    /// `targetEntities` for the request envelope; empty for a scope.
    pub fn target_entities(&self) -> Vec<TargetEntity> {
        match self {
            ActionTarget::Entities(entities) => entities.clone(),
            ActionTarget::Scope(_) => Vec::new(),
        }
    }

    pub fn scope(&self) -> Option<&str> {
        match self {
            ActionTarget::Entities(_) => None,
            ActionTarget::Scope(scope) => Some(scope),
        }
    }

    pub fn is_predefined_scope(&self) -> bool {
        matches!(self, ActionTarget::Scope(_))
    }
}

/// Decide between explicit entities and a predefined scope.
///
/// Non-empty `target_entities` win and the scope is ignored even when it is
/// not a valid scope name. Otherwise `scope` must be in `valid_scopes`.
pub fn resolve_target(target_entities: Vec<TargetEntity>, scope: &str, valid_scopes: &ScopeSet) -> Result<ActionTarget, ActionError> {
    if !target_entities.is_empty() {
        return Ok(ActionTarget::Entities(target_entities));
    }
    if !valid_scopes.contains(scope) {
        return Err(ActionError::InvalidScope {
            scope: scope.to_string(),
            allowed: valid_scopes.allowed_values(),
        });
    }
    Ok(ActionTarget::Scope(scope.to_string()))
}
