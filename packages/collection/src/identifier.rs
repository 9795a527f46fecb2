use std::fmt;
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;

use fsstore_core::{Error, Fields, Result, Value};

use crate::entry::Entry;

/// Turns an incoming record into the fields a pattern needs, filling in
/// defaults and rejecting records it cannot handle.
pub type Parser = Arc<dyn Fn(Fields) -> Result<Fields> + Send + Sync>;

/// A compiled key pattern such as `posts/{year}/{month}/{slug}-{id}`.
#[derive(Clone)]
pub struct Identifier {
    pattern: String,
    placeholders: Vec<String>,
    keys: Vec<String>,
    parser: Parser,
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identifier")
            .field("pattern", &self.pattern)
            .field("placeholders", &self.placeholders)
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

impl Identifier {
    /// Compiles `pattern`. Surrounding whitespace and separators are trimmed.
    ///
    /// Fails with `InvalidPattern` if the pattern has no `{placeholder}`.
    pub fn new<F>(pattern: &str, parser: F) -> Result<Self>
    where
        F: Fn(Fields) -> Result<Fields> + Send + Sync + 'static,
    {
        Self::with_parser(pattern, Arc::new(parser))
    }

    /// Like [`Identifier::new`], sharing an existing parser.
    pub fn with_parser(pattern: &str, parser: Parser) -> Result<Self> {
        lazy_static! {
            static ref PLACEHOLDER: Regex = Regex::new(r"\{([^}]+)\}").unwrap();
        }

        let pattern = pattern.trim().trim_matches('/').to_string();

        let mut placeholders: Vec<String> = Vec::new();
        let mut keys = Vec::new();
        for segment in pattern.split('/') {
            for capture in PLACEHOLDER.captures_iter(segment) {
                let placeholder = &capture[0];
                if placeholders.iter().any(|p| p == placeholder) {
                    continue;
                }
                placeholders.push(placeholder.to_string());
                keys.push(capture[1].to_string());
            }
        }

        if placeholders.is_empty() {
            return Err(Error::InvalidPattern { pattern });
        }

        Ok(Self {
            pattern,
            placeholders,
            keys,
            parser,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Placeholder tokens, braces included, in first-occurrence order.
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Field names bound to [`placeholders`](Self::placeholders), same order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Runs the parser over `record` and substitutes the resulting fields
    /// into the pattern.
    ///
    /// Fails with `MissingField` when the parser leaves a placeholder's
    /// field unset, and with `InvalidField` when the field cannot be
    /// rendered into a key.
    pub fn parse(&self, record: Fields) -> Result<Entry> {
        let fields = (self.parser)(record)?;

        let mut key = self.pattern.clone();
        for (placeholder, field) in self.placeholders.iter().zip(&self.keys) {
            let value = fields.get(field).ok_or_else(|| Error::MissingField {
                placeholder: placeholder.clone(),
                field: field.clone(),
            })?;
            key = key.replace(placeholder.as_str(), &render(field, value)?);
        }

        Ok(Entry::new(key, fields))
    }
}

fn render(field: &str, value: &Value) -> Result<String> {
    let rendered = match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::String(s) => s.clone(),
        Value::Bytes(_) | Value::Array(_) | Value::Map(_) => {
            return Err(Error::InvalidField {
                field: field.to_string(),
                reason: format!("{} values have no key form", value.type_name()),
            })
        }
    };

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use collection_literals::btree;
    use fsstore_core::ErrorKind;

    fn with_default_id(mut fields: Fields) -> Result<Fields> {
        fields.entry("id".to_string()).or_insert(Value::Integer(1));
        Ok(fields)
    }

    #[test]
    fn compiles_placeholders_in_order() {
        let identifier = Identifier::new(" /posts/{year}/{month}/{slug}-{id}/ ", Ok).unwrap();

        assert_eq!(identifier.pattern(), "posts/{year}/{month}/{slug}-{id}");
        assert_eq!(
            identifier.placeholders(),
            ["{year}", "{month}", "{slug}", "{id}"]
        );
        assert_eq!(identifier.keys(), ["year", "month", "slug", "id"]);
    }

    #[test]
    fn repeated_placeholders_are_listed_once() {
        let identifier = Identifier::new("{kind}/{id}/{kind}-{id}", Ok).unwrap();
        assert_eq!(identifier.keys(), ["kind", "id"]);

        let entry = identifier
            .parse(btree! {
                "kind".to_string() => Value::from("note"),
                "id".to_string() => Value::from(7),
            })
            .unwrap();
        assert_eq!(entry.key(), "note/7/note-7");
    }

    #[test]
    fn pattern_without_placeholders_is_invalid() {
        let err = Identifier::new("posts/all", Ok).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPattern);

        let err = Identifier::new("", Ok).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPattern);
    }

    #[test]
    fn parse_uses_parser_defaults() {
        let identifier =
            Identifier::new("posts/{year}/{month}/{slug}-{id}", with_default_id).unwrap();

        let entry = identifier
            .parse(btree! {
                "year".to_string() => Value::from("2021"),
                "month".to_string() => Value::from("01"),
                "slug".to_string() => Value::from("hello-world"),
            })
            .unwrap();

        assert_eq!(entry.key(), "posts/2021/01/hello-world-1");
        assert_eq!(entry.value().get("id"), Some(&Value::Integer(1)));
        assert_eq!(entry.value().len(), 4);
    }

    #[test]
    fn scalar_fields_render_into_keys() {
        let identifier = Identifier::new("{a}/{b}/{c}/{d}", Ok).unwrap();
        let entry = identifier
            .parse(btree! {
                "a".to_string() => Value::from(true),
                "b".to_string() => Value::from(1.5),
                "c".to_string() => Value::Null,
                "d".to_string() => Value::from(-3),
            })
            .unwrap();
        assert_eq!(entry.key(), "true/1.5//-3");
    }

    #[test]
    fn missing_and_invalid_fields() {
        let identifier = Identifier::new("posts/{slug}", Ok).unwrap();

        let err = identifier.parse(Fields::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert_eq!(err.to_string(), "placeholder '{slug}' requires field 'slug'");

        let err = identifier
            .parse(btree! { "slug".to_string() => Value::from(vec![Value::from("x")]) })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidField);
    }

    #[test]
    fn parser_errors_propagate() {
        let identifier = Identifier::new("posts/{slug}", |_| {
            Err(Error::invalid_record("slug is required"))
        })
        .unwrap();

        let err = identifier.parse(Fields::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRecord);
    }
}
