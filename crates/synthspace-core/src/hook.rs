use crate::model::RecordKind;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error as ThisError;

/// Loose field-name to JSON-value map every record passes through before it
/// becomes typed. Hooks see and return this shape.
pub type FieldMap = serde_json::Map<String, Value>;

/// One mutation hook: field map in, field map out.
pub type Hook = Box<dyn Fn(FieldMap) -> FieldMap + Send + Sync>;

///
/// HookRegistry
///
/// Ordered per-kind chains of pure transforms. Every synthesized record runs
/// through its kind's chain before typed conversion; required-field
/// validation happens once, after the whole chain, so intermediate hooks may
/// hold the map in any shape they like.
///

#[derive(Default)]
pub struct HookRegistry {
    chains: HashMap<RecordKind, Vec<Hook>>,
}

impl HookRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transform to the chain for `kind`. Hooks run in registration
    /// order; each receives the previous hook's output.
    pub fn register<F>(&mut self, kind: RecordKind, hook: F)
    where
        F: Fn(FieldMap) -> FieldMap + Send + Sync + 'static,
    {
        self.chains.entry(kind).or_default().push(Box::new(hook));
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chains.values().all(Vec::is_empty)
    }

    #[must_use]
    pub fn chain_len(&self, kind: RecordKind) -> usize {
        self.chains.get(&kind).map_or(0, Vec::len)
    }

    /// Run `fields` through the chain registered for `kind`.
    #[must_use]
    pub fn apply(&self, kind: RecordKind, fields: FieldMap) -> FieldMap {
        match self.chains.get(&kind) {
            Some(chain) => chain.iter().fold(fields, |acc, hook| hook(acc)),
            None => fields,
        }
    }
}

///
/// HookError
///
/// A hook broke the per-kind payload contract. Fatal for the run; the kind
/// and field name the message carries point at the offending transform.
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum HookError {
    #[error("hook output for {kind} is missing required field `{field}`")]
    MissingField {
        kind: RecordKind,
        field: &'static str,
    },

    #[error("hook output for {kind} has a mistyped field `{field}`")]
    MistypedField {
        kind: RecordKind,
        field: &'static str,
    },
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tagged(fields: &FieldMap) -> String {
        fields
            .get("tag")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    #[test]
    fn hooks_apply_in_registration_order() {
        let mut registry = HookRegistry::new();
        registry.register(RecordKind::User, |mut fields| {
            let tag = tagged(&fields);
            fields.insert("tag".to_string(), json!(format!("{tag}a")));
            fields
        });
        registry.register(RecordKind::User, |mut fields| {
            let tag = tagged(&fields);
            fields.insert("tag".to_string(), json!(format!("{tag}b")));
            fields
        });

        let out = registry.apply(RecordKind::User, FieldMap::new());
        assert_eq!(tagged(&out), "ab");
        assert_eq!(registry.chain_len(RecordKind::User), 2);
    }

    #[test]
    fn kinds_without_a_chain_pass_through_unchanged() {
        let registry = HookRegistry::new();
        let mut fields = FieldMap::new();
        fields.insert("id".to_string(), json!("abc"));

        let out = registry.apply(RecordKind::Message, fields.clone());
        assert_eq!(out, fields);
        assert!(registry.is_empty());
    }

    #[test]
    fn chains_are_scoped_to_their_kind() {
        let mut registry = HookRegistry::new();
        registry.register(RecordKind::Channel, |mut fields| {
            fields.insert("touched".to_string(), json!(true));
            fields
        });

        let untouched = registry.apply(RecordKind::User, FieldMap::new());
        assert!(untouched.get("touched").is_none());

        let touched = registry.apply(RecordKind::Channel, FieldMap::new());
        assert_eq!(touched.get("touched"), Some(&json!(true)));
    }
}
