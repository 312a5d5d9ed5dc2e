//! Per-model fixture definitions.
//!
//! A [`FixtureDefinition`] overrides how many instances of a model are
//! generated and which field values they receive. Models without a
//! definition fall back to [`DEFAULT_AMOUNT`] instances with every field
//! generated.

use crate::random::RandomValueProvider;
use fixture_core::{Constraint, DefinitionConfig, Overrides};
use std::collections::{BTreeMap, HashMap};

/// Number of instances generated for a model without an explicit amount.
pub const DEFAULT_AMOUNT: usize = 5;

/// Factory callback producing the partial field mapping of one instance.
///
/// It receives the engine's seeded provider so that custom values stay
/// reproducible.
pub type FactoryFn = Box<dyn FnMut(&mut RandomValueProvider) -> Overrides + Send>;

/// User override for one model. Unset attributes fall back to the defaults.
#[derive(Default)]
pub struct FixtureDefinition {
    amount: Option<usize>,
    factory: Option<FactoryFn>,
}

impl FixtureDefinition {
    /// Create a definition with every attribute defaulted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of instances.
    pub fn amount(mut self, amount: usize) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set the factory.
    pub fn factory<F>(mut self, factory: F) -> Self
    where
        F: FnMut(&mut RandomValueProvider) -> Overrides + Send + 'static,
    {
        self.factory = Some(Box::new(factory));
        self
    }

    /// Definition whose factory returns the same static overrides every time.
    pub fn fixed(amount: Option<usize>, overrides: Overrides) -> Self {
        Self {
            amount,
            factory: Some(Box::new(move |_: &mut RandomValueProvider| {
                overrides.clone()
            })),
        }
    }

    /// Configured amount, if any.
    pub fn configured_amount(&self) -> Option<usize> {
        self.amount
    }

    /// Whether a custom factory is set.
    pub fn has_factory(&self) -> bool {
        self.factory.is_some()
    }
}

impl std::fmt::Debug for FixtureDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixtureDefinition")
            .field("amount", &self.amount)
            .field("factory", &self.factory.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Registry of user overrides keyed by model name.
#[derive(Debug, Default)]
pub struct FixtureDefinitionRegistry {
    definitions: HashMap<String, FixtureDefinition>,
}

impl FixtureDefinitionRegistry {
    /// Create an empty registry: every model uses the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from the static definitions of a fixture file.
    pub fn from_config(definitions: &BTreeMap<String, DefinitionConfig>) -> Self {
        definitions
            .iter()
            .fold(Self::new(), |registry, (model, config)| {
                registry.with(
                    model.clone(),
                    FixtureDefinition::fixed(config.amount, config.overrides()),
                )
            })
    }

    /// Register (or replace) the definition for a model.
    pub fn define(&mut self, model: impl Into<String>, definition: FixtureDefinition) {
        self.definitions.insert(model.into(), definition);
    }

    /// Builder form of [`define`](Self::define).
    pub fn with(mut self, model: impl Into<String>, definition: FixtureDefinition) -> Self {
        self.define(model, definition);
        self
    }

    /// The user definition for a model, if any.
    pub fn get(&self, model: &str) -> Option<&FixtureDefinition> {
        self.definitions.get(model)
    }

    /// Names of models with a user definition.
    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// Number of instances to generate for a model.
    pub fn amount_for(&self, model: &str) -> usize {
        self.definitions
            .get(model)
            .and_then(|d| d.amount)
            .unwrap_or(DEFAULT_AMOUNT)
    }

    /// Run the model's factory. The default factory supplies nothing, which
    /// leaves every field to the engine.
    pub fn produce(&mut self, model: &str, random: &mut RandomValueProvider) -> Overrides {
        match self
            .definitions
            .get_mut(model)
            .and_then(|d| d.factory.as_mut())
        {
            Some(factory) => (*factory)(random),
            None => Overrides::new(),
        }
    }

    /// Constraint constructor: select at most `n` related instances.
    pub fn at_max(n: usize) -> Constraint {
        Constraint::at_max(n)
    }

    /// Constraint constructor: select at least `n` related instances if
    /// that many exist.
    pub fn at_least_if_existing(n: usize) -> Constraint {
        Constraint::at_least_if_existing(n)
    }
}
