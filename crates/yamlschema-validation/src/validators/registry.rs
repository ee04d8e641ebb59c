//! Name → constructor registry for the bundled validators.
//!
//! Schema files refer to validators by name (`enum`, `regex`, ...). Names are
//! matched case-insensitively; the set is closed, so an unknown name is a
//! schema error rather than a silently skipped check.

use super::{
    EnumValidator, ForbiddenKeyValidator, KeyValidator, LengthKeyValidator, LengthValidator,
    NonEmptyValidator, OneOfTypeValidator, PatternKeyValidator, PatternValidator, RangeValidator,
    UrlValidator, ValueValidator,
};
use crate::error::{SchemaError, SchemaResult};
use crate::inference::NodeType;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use yamlschema_yaml::Position;

/// Parameters of one validator entry in a schema description.
///
/// Which fields matter depends on `name`; the rest are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidatorSpec {
    pub name: String,
    /// enum
    pub allowed: Vec<String>,
    /// regex (value and key)
    pub pattern: Option<String>,
    /// enum, regex, forbidden
    pub message: Option<String>,
    /// range; also the key length minimum
    pub min: Option<f64>,
    /// range; also the key length maximum
    pub max: Option<f64>,
    /// length (value and key)
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    /// url
    pub require_scheme: bool,
    pub allowed_schemes: Vec<String>,
    /// oneoftype
    pub types: Vec<String>,
    /// forbidden
    pub forbidden: Vec<String>,
    /// Where the entry was declared, for error messages
    #[serde(skip)]
    pub position: Position,
}

impl ValidatorSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    fn compile_pattern(&self) -> SchemaResult<Regex> {
        let pattern = self.pattern.as_deref().unwrap_or_default();
        Regex::new(pattern).map_err(|source| SchemaError::InvalidPattern {
            pattern: pattern.to_string(),
            position: self.position,
            source,
        })
    }

    /// A key length bound: `minLength`/`maxLength` win over `min`/`max`
    fn key_length_bound(&self, length: Option<usize>, fallback: Option<f64>) -> SchemaResult<Option<usize>> {
        if length.is_some() {
            return Ok(length);
        }
        match fallback {
            None => Ok(None),
            Some(value) if value >= 0.0 && value.fract() == 0.0 => Ok(Some(value as usize)),
            Some(value) => Err(SchemaError::structure(
                format!("key length bound must be a non-negative integer, got {}", value),
                self.position,
            )),
        }
    }
}

type ValueConstructor = fn(&ValidatorSpec) -> SchemaResult<Arc<dyn ValueValidator>>;
type KeyConstructor = fn(&ValidatorSpec) -> SchemaResult<Arc<dyn KeyValidator>>;

static VALUE_VALIDATORS: Lazy<HashMap<&'static str, ValueConstructor>> = Lazy::new(|| {
    let mut map: HashMap<&'static str, ValueConstructor> = HashMap::new();
    map.insert("enum", |spec| {
        let mut validator = EnumValidator::new(spec.allowed.iter().cloned());
        validator.message = spec.message.clone();
        Ok(Arc::new(validator))
    });
    map.insert("regex", |spec| {
        let mut validator = PatternValidator::new(spec.compile_pattern()?);
        validator.message = spec.message.clone();
        Ok(Arc::new(validator))
    });
    map.insert("range", |spec| Ok(Arc::new(RangeValidator::new(spec.min, spec.max))));
    map.insert("nonempty", |_| Ok(Arc::new(NonEmptyValidator)));
    map.insert("length", |spec| {
        Ok(Arc::new(LengthValidator::new(spec.min_length, spec.max_length)))
    });
    map.insert("url", |spec| {
        Ok(Arc::new(UrlValidator::new(
            spec.require_scheme,
            spec.allowed_schemes.clone(),
        )))
    });
    map.insert("oneoftype", |spec| {
        let types = spec
            .types
            .iter()
            .map(|name| {
                name.parse::<NodeType>()
                    .map_err(|err| SchemaError::UnknownType {
                        name: err.0,
                        position: spec.position,
                    })
            })
            .collect::<SchemaResult<Vec<_>>>()?;
        Ok(Arc::new(OneOfTypeValidator::new(types)))
    });
    map
});

static KEY_VALIDATORS: Lazy<HashMap<&'static str, KeyConstructor>> = Lazy::new(|| {
    let mut map: HashMap<&'static str, KeyConstructor> = HashMap::new();
    map.insert("regex", |spec| {
        let mut validator = PatternKeyValidator::new(spec.compile_pattern()?);
        validator.message = spec.message.clone();
        Ok(Arc::new(validator))
    });
    map.insert("forbidden", |spec| {
        let mut validator = ForbiddenKeyValidator::new(spec.forbidden.iter().cloned());
        validator.message = spec.message.clone();
        Ok(Arc::new(validator))
    });
    map.insert("length", |spec| {
        let min = spec.key_length_bound(spec.min_length, spec.min)?;
        let max = spec.key_length_bound(spec.max_length, spec.max)?;
        Ok(Arc::new(LengthKeyValidator::new(min, max)))
    });
    map
});

/// Build a value validator from its spec
pub fn value_validator(spec: &ValidatorSpec) -> SchemaResult<Arc<dyn ValueValidator>> {
    let name = spec.name.to_ascii_lowercase();
    let constructor = VALUE_VALIDATORS
        .get(name.as_str())
        .ok_or_else(|| SchemaError::UnknownValidator {
            name: spec.name.clone(),
            position: spec.position,
        })?;
    constructor(spec)
}

/// Build a key validator from its spec
pub fn key_validator(spec: &ValidatorSpec) -> SchemaResult<Arc<dyn KeyValidator>> {
    let name = spec.name.to_ascii_lowercase();
    let constructor = KEY_VALIDATORS
        .get(name.as_str())
        .ok_or_else(|| SchemaError::UnknownKeyValidator {
            name: spec.name.clone(),
            position: spec.position,
        })?;
    constructor(spec)
}

/// Registered value validator names, sorted
pub fn value_validator_names() -> Vec<&'static str> {
    let mut names: Vec<_> = VALUE_VALIDATORS.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Registered key validator names, sorted
pub fn key_validator_names() -> Vec<&'static str> {
    let mut names: Vec<_> = KEY_VALIDATORS.keys().copied().collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_case_insensitive() {
        let spec = ValidatorSpec {
            allowed: vec!["a".to_string()],
            ..ValidatorSpec::named("ENUM")
        };
        assert!(value_validator(&spec).is_ok());
        assert!(key_validator(&ValidatorSpec::named("Forbidden")).is_ok());
    }

    #[test]
    fn test_unknown_names() {
        let err = value_validator(&ValidatorSpec::named("email")).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownValidator { ref name, .. } if name == "email"));
        assert!(err.to_string().starts_with("unknown validator name"));

        let err = key_validator(&ValidatorSpec::named("enum")).unwrap_err();
        assert!(err.to_string().starts_with("unknown key validator name"));
    }

    #[test]
    fn test_bad_pattern_and_type() {
        let spec = ValidatorSpec {
            pattern: Some("(".to_string()),
            ..ValidatorSpec::named("regex")
        };
        assert!(matches!(
            value_validator(&spec),
            Err(SchemaError::InvalidPattern { .. })
        ));

        let spec = ValidatorSpec {
            types: vec!["strin".to_string()],
            ..ValidatorSpec::named("oneoftype")
        };
        assert!(matches!(
            value_validator(&spec),
            Err(SchemaError::UnknownType { .. })
        ));
    }

    #[test]
    fn test_key_length_aliases() {
        let spec = ValidatorSpec {
            min: Some(2.0),
            max_length: Some(8),
            ..ValidatorSpec::named("length")
        };
        assert!(key_validator(&spec).is_ok());

        let spec = ValidatorSpec {
            min: Some(1.5),
            ..ValidatorSpec::named("length")
        };
        assert!(key_validator(&spec).is_err());
    }

    #[test]
    fn test_listing() {
        assert_eq!(
            value_validator_names(),
            vec!["enum", "length", "nonempty", "oneoftype", "range", "regex", "url"]
        );
        assert_eq!(key_validator_names(), vec!["forbidden", "length", "regex"]);
    }
}
