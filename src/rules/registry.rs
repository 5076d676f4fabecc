//! Variant registry for rule lookup.
//!
//! The `VariantRegistry` maps each `VariantTag` to the shared rules that
//! govern it. Episodes look their rules up here on reset.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::linear::LinearTransformRules;
use super::polyhedral::PolyhedralRules;
use super::variant::{RuleVariant, VariantTag};
use crate::core::GameError;

/// Registry of rule variants.
///
/// `standard()` registers the variants with a built-in end condition. Cycle
/// and Thom rules need a caller-supplied terminal predicate, so they are only
/// available after an explicit `register`.
///
/// ## Example
///
/// ```
/// use hironaka_engine::core::PointSet;
/// use hironaka_engine::rules::{CycleRules, FnPredicate, VariantRegistry, VariantTag};
///
/// let mut registry = VariantRegistry::standard();
/// assert!(registry.get(VariantTag::Thom).is_err());
///
/// registry.register(CycleRules::thom(FnPredicate::new("big", |s: &PointSet| s.max_value() > 100)));
/// assert!(registry.get(VariantTag::Thom).is_ok());
/// ```
#[derive(Clone, Default)]
pub struct VariantRegistry {
    rules: FxHashMap<VariantTag, Arc<dyn RuleVariant>>,
}

impl VariantRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the basic, hard and linear-transform rules.
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .with_rules(PolyhedralRules::basic())
            .with_rules(PolyhedralRules::hard())
            .with_rules(LinearTransformRules::new())
    }

    /// Register rules under their own tag, replacing any previous entry.
    pub fn register(&mut self, rules: impl RuleVariant + 'static) {
        self.register_shared(Arc::new(rules));
    }

    /// Register already-shared rules.
    pub fn register_shared(&mut self, rules: Arc<dyn RuleVariant>) {
        if self.rules.insert(rules.tag(), Arc::clone(&rules)).is_some() {
            log::debug!("replaced rules for {} variant", rules.tag());
        }
    }

    /// Builder form of `register`.
    #[must_use]
    pub fn with_rules(mut self, rules: impl RuleVariant + 'static) -> Self {
        self.register(rules);
        self
    }

    /// Rules for `tag`.
    pub fn get(&self, tag: VariantTag) -> Result<Arc<dyn RuleVariant>, GameError> {
        self.rules
            .get(&tag)
            .cloned()
            .ok_or(GameError::UnsupportedVariant(tag))
    }

    /// Check if a tag is registered.
    #[must_use]
    pub fn contains(&self, tag: VariantTag) -> bool {
        self.rules.contains_key(&tag)
    }

    /// Registered tags, in declaration order.
    #[must_use]
    pub fn tags(&self) -> Vec<VariantTag> {
        VariantTag::ALL
            .into_iter()
            .filter(|tag| self.rules.contains_key(tag))
            .collect()
    }

    /// Get the number of registered variants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl std::fmt::Debug for VariantRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariantRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{CycleRules, ReductionStabilized};

    #[test]
    fn test_standard_registry() {
        let registry = VariantRegistry::standard();
        assert_eq!(
            registry.tags(),
            vec![VariantTag::Basic, VariantTag::Hard, VariantTag::LinearTransform]
        );
        assert_eq!(registry.get(VariantTag::Hard).unwrap().tag(), VariantTag::Hard);
    }

    #[test]
    fn test_missing_variant() {
        let registry = VariantRegistry::standard();
        let err = registry.get(VariantTag::CycleMoving).err().unwrap();
        assert_eq!(err, GameError::UnsupportedVariant(VariantTag::CycleMoving));
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = VariantRegistry::new();
        assert!(registry.is_empty());

        registry.register(CycleRules::cycle_moving(ReductionStabilized::new()));
        registry.register(CycleRules::cycle_moving(ReductionStabilized::new()));

        assert_eq!(registry.len(), 1);
        assert!(registry.contains(VariantTag::CycleMoving));
    }

    #[test]
    fn test_debug_lists_tags() {
        let registry = VariantRegistry::standard();
        assert_eq!(
            format!("{:?}", registry),
            "VariantRegistry { tags: [Basic, Hard, LinearTransform] }"
        );
    }
}
