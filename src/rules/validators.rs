//! The `Validator` trait and the six built-in validators.

use enum_dispatch::enum_dispatch;

use crate::{
    rules::{
        heuristics::{code_like_reason, is_dotted_key, reads_like_prose},
        types::{InputKind, RulePriority, RuleVerdict, ValidationContext},
    },
    utils::contains_alphabetic,
};

/// Attributes whose values are shown to users.
pub const DEFAULT_TRANSLATABLE_ATTRIBUTES: &[&str] = &[
    "placeholder",
    "title",
    "alt",
    "label",
    "aria-label",
    "aria-description",
    "aria-placeholder",
    "aria-roledescription",
    "aria-valuetext",
];

/// Object keys whose values are shown to users.
pub const USER_FACING_PROPERTIES: &[&str] = &[
    "label",
    "title",
    "description",
    "placeholder",
    "message",
    "text",
    "tooltip",
    "heading",
    "subtitle",
    "caption",
    "hint",
    "helperText",
    "errorMessage",
    "successMessage",
    "emptyText",
];

/// Component props whose values are shown to users.
pub const USER_FACING_PROPS: &[&str] = &[
    "title",
    "label",
    "description",
    "placeholder",
    "message",
    "text",
    "tooltip",
    "heading",
    "subtitle",
    "caption",
    "helperText",
    "emptyText",
    "confirmText",
    "cancelText",
];

/// Calls whose string arguments reach the user directly.
const USER_FACING_CALLEES: &[&str] = &["alert", "confirm", "prompt"];

/// Checks every validator applies before its own rule.
fn baseline(text: &str) -> Option<RuleVerdict> {
    let text = text.trim();
    if text.is_empty() {
        return Some(RuleVerdict::invalid("empty text"));
    }
    if !contains_alphabetic(text) {
        return Some(RuleVerdict::invalid("no alphabetic characters"));
    }
    None
}

fn not_code_like(text: &str) -> RuleVerdict {
    match code_like_reason(text) {
        Some(reason) => RuleVerdict::invalid(reason),
        None => RuleVerdict::valid(),
    }
}

/// A pure classification rule bound to one input kind.
#[enum_dispatch]
pub trait Validator: Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> InputKind;

    fn priority(&self) -> RulePriority;

    /// The validator's own rule, run on trimmed text that already passed the
    /// baseline check.
    fn check(&self, text: &str, ctx: &ValidationContext) -> RuleVerdict;

    fn validate(&self, text: &str, ctx: &ValidationContext) -> RuleVerdict {
        baseline(text).unwrap_or_else(|| self.check(text.trim(), ctx))
    }
}

#[enum_dispatch(Validator)]
#[derive(Debug, Clone)]
pub enum BuiltinValidator {
    JsxText(JsxTextValidator),
    JsxAttribute(JsxAttributeValidator),
    ObjectProperty(ObjectPropertyValidator),
    ValidationMessage(ValidationMessageValidator),
    ComponentProp(ComponentPropValidator),
    AlertMessage(AlertMessageValidator),
}

impl BuiltinValidator {
    /// One validator per input kind, attribute checks using `attributes`.
    pub fn defaults(attributes: &[String]) -> Vec<BuiltinValidator> {
        vec![
            JsxTextValidator.into(),
            JsxAttributeValidator::new(attributes.to_vec()).into(),
            ObjectPropertyValidator.into(),
            ValidationMessageValidator.into(),
            ComponentPropValidator.into(),
            AlertMessageValidator.into(),
        ]
    }
}

/// Text children of JSX elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsxTextValidator;

impl Validator for JsxTextValidator {
    fn name(&self) -> &str {
        "jsx-text"
    }

    fn kind(&self) -> InputKind {
        InputKind::JsxText
    }

    fn priority(&self) -> RulePriority {
        RulePriority::High
    }

    fn check(&self, text: &str, _ctx: &ValidationContext) -> RuleVerdict {
        not_code_like(text)
    }
}

/// String values of JSX attributes.
#[derive(Debug, Clone)]
pub struct JsxAttributeValidator {
    attributes: Vec<String>,
}

impl JsxAttributeValidator {
    pub fn new(attributes: Vec<String>) -> Self {
        Self { attributes }
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }
}

impl Default for JsxAttributeValidator {
    fn default() -> Self {
        Self::new(
            DEFAULT_TRANSLATABLE_ATTRIBUTES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }
}

impl Validator for JsxAttributeValidator {
    fn name(&self) -> &str {
        "jsx-attribute"
    }

    fn kind(&self) -> InputKind {
        InputKind::JsxAttribute
    }

    fn priority(&self) -> RulePriority {
        RulePriority::High
    }

    fn check(&self, text: &str, ctx: &ValidationContext) -> RuleVerdict {
        let Some(attribute) = ctx.attribute_name.as_deref() else {
            return RuleVerdict::invalid("missing attribute name");
        };
        if !self.attributes.iter().any(|a| a == attribute) {
            return RuleVerdict::invalid(format!(
                "attribute '{}' is not translatable",
                attribute
            ));
        }
        not_code_like(text)
    }
}

/// Values of user-facing keys in object literals.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectPropertyValidator;

impl Validator for ObjectPropertyValidator {
    fn name(&self) -> &str {
        "object-property"
    }

    fn kind(&self) -> InputKind {
        InputKind::ObjectProperty
    }

    fn priority(&self) -> RulePriority {
        RulePriority::Low
    }

    fn check(&self, text: &str, ctx: &ValidationContext) -> RuleVerdict {
        let Some(property) = ctx.property_name.as_deref() else {
            return RuleVerdict::invalid("missing property name");
        };
        if !USER_FACING_PROPERTIES.contains(&property) {
            return RuleVerdict::invalid(format!("property '{}' is not user-facing", property));
        }
        not_code_like(text)
    }
}

/// Messages passed to schema/form validation calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationMessageValidator;

impl Validator for ValidationMessageValidator {
    fn name(&self) -> &str {
        "validation-message"
    }

    fn kind(&self) -> InputKind {
        InputKind::ValidationMessage
    }

    fn priority(&self) -> RulePriority {
        RulePriority::Medium
    }

    fn check(&self, text: &str, _ctx: &ValidationContext) -> RuleVerdict {
        if is_dotted_key(text) {
            return RuleVerdict::invalid("looks like a translation key");
        }
        if !reads_like_prose(text) {
            return RuleVerdict::invalid("does not read like a message");
        }
        RuleVerdict::valid()
    }
}

/// String props passed to components.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentPropValidator;

impl Validator for ComponentPropValidator {
    fn name(&self) -> &str {
        "component-prop"
    }

    fn kind(&self) -> InputKind {
        InputKind::ComponentProp
    }

    fn priority(&self) -> RulePriority {
        RulePriority::Medium
    }

    fn check(&self, text: &str, ctx: &ValidationContext) -> RuleVerdict {
        let Some(prop) = ctx.prop_name.as_deref() else {
            return RuleVerdict::invalid("missing prop name");
        };
        if !USER_FACING_PROPS.contains(&prop) {
            return RuleVerdict::invalid(format!("prop '{}' is not user-facing", prop));
        }
        not_code_like(text)
    }
}

/// Arguments of alert-style calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertMessageValidator;

impl AlertMessageValidator {
    fn is_user_facing(callee: &str) -> bool {
        let callee = callee.strip_prefix("window.").unwrap_or(callee);
        USER_FACING_CALLEES.contains(&callee) || callee == "toast" || callee.starts_with("toast.")
    }
}

impl Validator for AlertMessageValidator {
    fn name(&self) -> &str {
        "alert-message"
    }

    fn kind(&self) -> InputKind {
        InputKind::AlertMessage
    }

    fn priority(&self) -> RulePriority {
        RulePriority::Medium
    }

    fn check(&self, text: &str, ctx: &ValidationContext) -> RuleVerdict {
        if let Some(callee) = ctx.callee_name.as_deref() {
            if callee.starts_with("console.") {
                return RuleVerdict::invalid("console output is for developers");
            }
            if !Self::is_user_facing(callee) {
                return RuleVerdict::invalid(format!("'{}' is not a user-facing call", callee));
            }
        }
        not_code_like(text)
    }
}
