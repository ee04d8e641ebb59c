//! Mapping validation: merge-key expansion, key validators and the
//! unknown-key policy.

use crate::constraints::{check_constraints, FoundKeys};
use crate::context::ValidationContext;
use crate::diagnostic::{quoted, Diagnostic, DiagnosticKind, Severity};
use crate::inference::describe_node;
use crate::schema::{Schema, UnknownKeyPolicy};
use crate::validator::validate_node;
use std::collections::HashMap;
use yamlschema_yaml::{NodeKind, YamlNode};

const MERGE_KEY: &str = "<<";

/// One effective key/value pair of a mapping after merges
#[derive(Debug, Clone, Copy)]
pub(crate) struct KeyValue<'a> {
    pub key: YamlNode<'a>,
    pub value: YamlNode<'a>,
}

impl<'a> KeyValue<'a> {
    /// Key text; an alias key reads through to its target
    pub fn name(&self) -> &'a str {
        self.key.resolve().unwrap_or(self.key).value()
    }
}

/// Expand `<<` merge entries into concrete pairs.
///
/// Merged pairs are spliced in where the `<<` entry stands. When a key
/// occurs more than once, the last occurrence wins and keeps its place, so
/// explicit keys after a merge override merged ones.
pub(crate) fn expand_merges<'a>(node: YamlNode<'a>) -> Vec<KeyValue<'a>> {
    let mut pairs = Vec::with_capacity(node.len());
    for (key, value) in node.entries() {
        if key.value() == MERGE_KEY {
            let before = pairs.len();
            merge_pairs(value, &mut pairs);
            tracing::trace!(merged = pairs.len() - before, "expanded merge key");
            continue;
        }
        pairs.push(KeyValue { key, value });
    }
    dedupe_keep_last(pairs)
}

fn merge_pairs<'a>(value: YamlNode<'a>, out: &mut Vec<KeyValue<'a>>) {
    match value.kind() {
        NodeKind::Alias => {
            if let Some(target) = value.resolve() {
                merge_pairs(target, out);
            }
        }
        NodeKind::Map => out.extend(value.entries().map(|(key, value)| KeyValue { key, value })),
        NodeKind::Sequence => {
            for item in value.items() {
                merge_pairs(item, out);
            }
        }
        _ => {}
    }
}

fn dedupe_keep_last(pairs: Vec<KeyValue<'_>>) -> Vec<KeyValue<'_>> {
    let last: HashMap<&str, usize> = pairs
        .iter()
        .enumerate()
        .map(|(index, pair)| (pair.name(), index))
        .collect();
    pairs
        .iter()
        .enumerate()
        .filter(|(index, pair)| last.get(pair.name()) == Some(index))
        .map(|(_, pair)| *pair)
        .collect()
}

/// Severity for an unknown key, or `None` when it is ignored
fn unknown_key_severity(policy: UnknownKeyPolicy, ctx: &ValidationContext) -> Option<Severity> {
    match policy {
        UnknownKeyPolicy::Error => Some(Severity::Error),
        UnknownKeyPolicy::Warn => Some(Severity::Warning),
        UnknownKeyPolicy::Ignore => None,
        UnknownKeyPolicy::Inherit if ctx.options().strict_keys => Some(Severity::Error),
        UnknownKeyPolicy::Inherit => Some(Severity::Warning),
    }
}

/// Validate the entries of a mapping node, then its inter-field rules
pub(crate) fn validate_mapping(node: YamlNode<'_>, schema: &Schema, ctx: &mut ValidationContext) {
    let pairs = expand_merges(node);
    let mut found = FoundKeys::default();

    for pair in &pairs {
        if ctx.is_stopped() {
            return;
        }

        let key = pair.name();
        let key_path = ctx.key_path(key);
        found.insert(key, *pair);

        for validator in &schema.key_validators {
            validator.validate_key(key, pair.key, &key_path, ctx);
        }

        if let Some(child) = schema.allowed_keys.get(key) {
            ctx.with_key(key, |ctx| validate_node(pair.value, child, ctx));
            continue;
        }

        if let Some(additional) = &schema.additional_properties {
            ctx.with_key(key, |ctx| validate_node(pair.value, additional, ctx));
            continue;
        }

        if let Some(severity) = unknown_key_severity(schema.unknown_key_policy, ctx) {
            ctx.add(
                Diagnostic::new(severity, DiagnosticKind::UnknownKey, format!("unknown key {}", quoted(key)))
                    .with_path(key_path)
                    .at(pair.key)
                    .with_got(describe_node(pair.value)),
            );
        }
    }

    check_constraints(node, schema, &found, ctx);
}

#[cfg(test)]
mod tests {
    use super::*;
    use yamlschema_yaml::parse;

    fn effective(content: &str, path: &[&str]) -> Vec<(String, String)> {
        let doc = parse(content).unwrap();
        let mut node = doc.root();
        for key in path {
            node = node.get(key).unwrap();
        }
        expand_merges(node)
            .into_iter()
            .map(|pair| (pair.name().to_string(), pair.value.resolve().unwrap().value().to_string()))
            .collect()
    }

    #[test]
    fn test_explicit_key_overrides_merge() {
        let pairs = effective(
            "base: &ref\n  timeout: 30\n  host: y\nservice:\n  <<: *ref\n  host: x\n",
            &["service"],
        );
        assert_eq!(
            pairs,
            vec![
                ("timeout".to_string(), "30".to_string()),
                ("host".to_string(), "x".to_string())
            ]
        );
    }

    #[test]
    fn test_merge_sequence_later_wins() {
        let pairs = effective(
            "a: &a {x: 1, y: 1}\nb: &b {y: 2}\nc:\n  <<: [*a, *b]\n",
            &["c"],
        );
        assert_eq!(
            pairs,
            vec![
                ("x".to_string(), "1".to_string()),
                ("y".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn test_merge_of_scalar_contributes_nothing() {
        let pairs = effective("m:\n  <<: 5\n  k: v\n", &["m"]);
        assert_eq!(pairs, vec![("k".to_string(), "v".to_string())]);
    }

    #[test]
    fn test_merged_nodes_keep_source_position() {
        let doc = parse("base: &ref\n  timeout: 30\nsvc:\n  <<: *ref\n").unwrap();
        let pairs = expand_merges(doc.root().get("svc").unwrap());
        assert_eq!(pairs.len(), 1);
        assert_eq!((pairs[0].key.line(), pairs[0].key.column()), (2, 3));
    }
}
