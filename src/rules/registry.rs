use std::collections::HashMap;

use crate::rules::{
    types::{InputKind, ValidationInput, ValidationOutcome},
    validators::{BuiltinValidator, DEFAULT_TRANSLATABLE_ATTRIBUTES, Validator},
};

/// Maps each input kind to at most one validator.
#[derive(Default)]
pub struct ValidatorRegistry {
    validators: HashMap<InputKind, Box<dyn Validator>>,
}

impl ValidatorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry seeded with the six built-in validators.
    pub fn with_defaults() -> Self {
        let attributes: Vec<String> = DEFAULT_TRANSLATABLE_ATTRIBUTES
            .iter()
            .map(|s| s.to_string())
            .collect();
        Self::with_attributes(&attributes)
    }

    /// Built-in validators, with `attributes` as the translatable attribute set.
    pub fn with_attributes(attributes: &[String]) -> Self {
        let mut registry = Self::new();
        for validator in BuiltinValidator::defaults(attributes) {
            registry.register(Box::new(validator));
        }
        registry
    }

    /// Bind `validator` to its kind, returning the validator it replaced.
    pub fn register(&mut self, validator: Box<dyn Validator>) -> Option<Box<dyn Validator>> {
        self.validators.insert(validator.kind(), validator)
    }

    pub fn remove(&mut self, kind: InputKind) -> Option<Box<dyn Validator>> {
        self.validators.remove(&kind)
    }

    pub fn get(&self, kind: InputKind) -> Option<&dyn Validator> {
        self.validators.get(&kind).map(|v| v.as_ref())
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// All validators, sorted by priority tier then name.
    pub fn get_all_validators(&self) -> Vec<&dyn Validator> {
        let mut all: Vec<&dyn Validator> = self.validators.values().map(|v| v.as_ref()).collect();
        all.sort_by(|a, b| {
            a.priority()
                .cmp(&b.priority())
                .then_with(|| a.name().cmp(b.name()))
        });
        all
    }

    /// Classify one input with the validator bound to its kind.
    pub fn validate(&self, input: &ValidationInput) -> ValidationOutcome {
        let rejected = |reason: &str| ValidationOutcome {
            is_valid: false,
            validator_name: None,
            kind: input.kind.clone(),
            reason: Some(reason.to_string()),
        };

        let Ok(kind) = input.kind.parse::<InputKind>() else {
            return rejected("unknown type");
        };
        let Some(validator) = self.get(kind) else {
            return rejected("not found");
        };

        let verdict = validator.validate(&input.text, &input.context);
        ValidationOutcome {
            is_valid: verdict.is_valid,
            validator_name: Some(validator.name().to_string()),
            kind: input.kind.clone(),
            reason: verdict.reason,
        }
    }
}

impl std::fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self
            .get_all_validators()
            .into_iter()
            .map(|v| v.name())
            .collect();
        f.debug_struct("ValidatorRegistry")
            .field("validators", &names)
            .finish()
    }
}
