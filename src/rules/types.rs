use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The closed set of string categories the registry can classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputKind {
    JsxText,
    JsxAttribute,
    ObjectProperty,
    ValidationMessage,
    ComponentProp,
    AlertMessage,
}

impl InputKind {
    pub const ALL: [InputKind; 6] = [
        InputKind::JsxText,
        InputKind::JsxAttribute,
        InputKind::ObjectProperty,
        InputKind::ValidationMessage,
        InputKind::ComponentProp,
        InputKind::AlertMessage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InputKind::JsxText => "jsx-text",
            InputKind::JsxAttribute => "jsx-attribute",
            InputKind::ObjectProperty => "object-property",
            InputKind::ValidationMessage => "validation-message",
            InputKind::ComponentProp => "component-prop",
            InputKind::AlertMessage => "alert-message",
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownInputKind(pub String);

impl fmt::Display for UnknownInputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown input kind '{}'", self.0)
    }
}

impl std::error::Error for UnknownInputKind {}

impl FromStr for InputKind {
    type Err = UnknownInputKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InputKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownInputKind(s.to_string()))
    }
}

/// Ordering tier used when listing validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RulePriority {
    High,
    Medium,
    Low,
}

/// Where a string was found. Each validator reads the fields it cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationContext {
    pub attribute_name: Option<String>,
    pub property_name: Option<String>,
    pub prop_name: Option<String>,
    pub component_name: Option<String>,
    pub callee_name: Option<String>,
}

impl ValidationContext {
    pub fn attribute(name: impl Into<String>) -> Self {
        Self {
            attribute_name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn property(name: impl Into<String>) -> Self {
        Self {
            property_name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn prop(component: impl Into<String>, prop: impl Into<String>) -> Self {
        Self {
            component_name: Some(component.into()),
            prop_name: Some(prop.into()),
            ..Default::default()
        }
    }

    pub fn callee(name: impl Into<String>) -> Self {
        Self {
            callee_name: Some(name.into()),
            ..Default::default()
        }
    }
}

/// A string to classify. `kind` stays a raw string so callers can pass
/// categories the registry does not know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationInput {
    pub text: String,
    pub kind: String,
    #[serde(default)]
    pub context: ValidationContext,
}

impl ValidationInput {
    pub fn new(text: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: kind.into(),
            context: ValidationContext::default(),
        }
    }

    pub fn with_context(mut self, context: ValidationContext) -> Self {
        self.context = context;
        self
    }
}

/// What a single validator decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleVerdict {
    pub is_valid: bool,
    pub reason: Option<String>,
}

impl RuleVerdict {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            reason: None,
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            reason: Some(reason.into()),
        }
    }
}

/// Registry answer for one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validator_name: Option<String>,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use crate::rules::types::*;

    #[test]
    fn test_input_kind_round_trips_through_str() {
        for kind in InputKind::ALL {
            assert_eq!(kind.as_str().parse::<InputKind>(), Ok(kind));
        }
        assert_eq!(
            "unknown-x".parse::<InputKind>(),
            Err(UnknownInputKind("unknown-x".to_string()))
        );
    }

    #[test]
    fn test_priority_orders_high_first() {
        assert!(RulePriority::High < RulePriority::Medium);
        assert!(RulePriority::Medium < RulePriority::Low);
    }

    #[test]
    fn test_input_deserializes_camel_case_context() {
        let input: ValidationInput = serde_json::from_str(
            r#"{"text":"btn-primary","kind":"jsx-attribute","context":{"attributeName":"className"}}"#,
        )
        .unwrap();
        assert_eq!(input.context, ValidationContext::attribute("className"));
    }
}
