//! Inter-field rules checked once per mapping, after its entries.

use crate::context::ValidationContext;
use crate::diagnostic::{bracketed, quoted, Diagnostic, DiagnosticKind};
use crate::mapping::KeyValue;
use crate::schema::{display_default, Schema};
use std::collections::HashMap;
use yamlschema_yaml::YamlNode;

/// Keys present in a mapping after merges
#[derive(Debug, Default)]
pub(crate) struct FoundKeys<'a> {
    pairs: HashMap<&'a str, KeyValue<'a>>,
}

impl<'a> FoundKeys<'a> {
    pub fn insert(&mut self, key: &'a str, pair: KeyValue<'a>) {
        self.pairs.insert(key, pair);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pairs.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&KeyValue<'a>> {
        self.pairs.get(key)
    }

    /// The declared keys that are present, in declaration order
    fn present<'k>(&self, keys: &'k [String]) -> Vec<&'k String> {
        keys.iter().filter(|key| self.contains(key)).collect()
    }
}

/// Run every rule family, in a fixed order
pub(crate) fn check_constraints(
    node: YamlNode<'_>,
    schema: &Schema,
    found: &FoundKeys<'_>,
    ctx: &mut ValidationContext,
) {
    check_required(node, schema, found, ctx);
    check_defaults(node, schema, found, ctx);
    check_any_of(node, schema, found, ctx);
    check_exactly_one_of(node, schema, found, ctx);
    check_mutually_exclusive(schema, found, ctx);
    check_conditions(schema, found, ctx);
}

fn check_required(node: YamlNode<'_>, schema: &Schema, found: &FoundKeys<'_>, ctx: &mut ValidationContext) {
    for (key, child) in &schema.allowed_keys {
        if child.required && !found.contains(key) {
            ctx.add(
                Diagnostic::error(
                    DiagnosticKind::MissingRequired,
                    format!("required field {} is missing", quoted(key)),
                )
                .with_path(ctx.key_path(key))
                .at(node),
            );
        }
    }
}

fn check_defaults(node: YamlNode<'_>, schema: &Schema, found: &FoundKeys<'_>, ctx: &mut ValidationContext) {
    for (key, child) in &schema.allowed_keys {
        let Some(default) = &child.default else {
            continue;
        };
        if default.is_null() || child.required || found.contains(key) {
            continue;
        }
        ctx.add(
            Diagnostic::warning(
                DiagnosticKind::DefaultApplied,
                format!("field {} not set, will use default: {}", quoted(key), display_default(default)),
            )
            .with_path(ctx.key_path(key))
            .at(node),
        );
    }
}

fn check_any_of(node: YamlNode<'_>, schema: &Schema, found: &FoundKeys<'_>, ctx: &mut ValidationContext) {
    if schema.any_of.is_empty() {
        return;
    }
    if schema
        .any_of
        .iter()
        .any(|group| group.iter().all(|key| found.contains(key)))
    {
        return;
    }

    let groups: Vec<String> = schema
        .any_of
        .iter()
        .map(|group| match group.as_slice() {
            [single] => quoted(single),
            keys => {
                let quoted: Vec<String> = keys.iter().map(|k| quoted(k)).collect();
                format!("({})", quoted.join(" and "))
            }
        })
        .collect();

    ctx.add(
        Diagnostic::error(
            DiagnosticKind::AnyOfUnsatisfied,
            format!("at least one of {} is required", groups.join(" or ")),
        )
        .with_path(ctx.path())
        .at(node),
    );
}

fn check_exactly_one_of(node: YamlNode<'_>, schema: &Schema, found: &FoundKeys<'_>, ctx: &mut ValidationContext) {
    if schema.exactly_one_of.is_empty() {
        return;
    }

    let present = found.present(&schema.exactly_one_of);
    let declared = bracketed(&schema.exactly_one_of);
    match present.as_slice() {
        [] => ctx.add(
            Diagnostic::error(
                DiagnosticKind::ExactlyOneOf,
                format!("exactly one of {} is required, none found", declared),
            )
            .with_path(ctx.path())
            .at(node),
        ),
        [_] => {}
        [_, second, ..] => {
            let Some(pair) = found.get(second) else {
                return;
            };
            ctx.add(
                Diagnostic::error(
                    DiagnosticKind::ExactlyOneOf,
                    format!(
                        "exactly one of {} is required, found: {}",
                        declared,
                        bracketed(&present)
                    ),
                )
                .with_path(ctx.path())
                .at(pair.key),
            );
        }
    }
}

fn check_mutually_exclusive(schema: &Schema, found: &FoundKeys<'_>, ctx: &mut ValidationContext) {
    let present = found.present(&schema.mutually_exclusive);
    if let [_, second, ..] = present.as_slice()
        && let Some(pair) = found.get(second)
    {
        ctx.add(
            Diagnostic::error(
                DiagnosticKind::MutuallyExclusive,
                format!("fields {} are mutually exclusive", bracketed(&present)),
            )
            .with_path(ctx.path())
            .at(pair.key),
        );
    }
}

fn check_conditions(schema: &Schema, found: &FoundKeys<'_>, ctx: &mut ValidationContext) {
    for rule in &schema.conditions {
        let Some(condition) = found.get(&rule.field) else {
            continue;
        };
        // Only scalars can hold the condition value
        let matches = condition
            .value
            .resolve()
            .is_some_and(|value| value.is_scalar() && value.value() == rule.value);
        if !matches {
            continue;
        }

        for key in &rule.then_required {
            if found.contains(key) {
                continue;
            }
            ctx.add(
                Diagnostic::error(
                    DiagnosticKind::ConditionalRequired,
                    format!("field {} is required when {}={}", quoted(key), rule.field, quoted(&rule.value)),
                )
                .with_path(ctx.key_path(key))
                .at(condition.value),
            );
        }

        for key in &rule.then_forbidden {
            let Some(forbidden) = found.get(key) else {
                continue;
            };
            ctx.add(
                Diagnostic::error(
                    DiagnosticKind::ConditionalForbidden,
                    format!("field {} is forbidden when {}={}", quoted(key), rule.field, quoted(&rule.value)),
                )
                .with_path(ctx.key_path(key))
                .at(forbidden.key),
            );
        }
    }
}
