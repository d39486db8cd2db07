//! Directive model and serializer for spec documents.
//!
//! A [`Spec`] owns two ordered sections of pre-registered directives
//! (preamble metadata, body blocks). Directive identity — key and shape —
//! is fixed when the section is built; populating a spec only ever
//! replaces values.

use crate::keys;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Value stored in a directive: one string or an ordered list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(String),
    List(Vec<String>),
}

impl Value {
    /// A value is empty when the string is empty or every item is empty.
    /// Empty values serialize to nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Scalar(s) => s.is_empty(),
            Value::List(items) => items.iter().all(|item| item.is_empty()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(s)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

impl From<&[&str]> for Value {
    fn from(items: &[&str]) -> Self {
        Value::List(items.iter().map(|s| s.to_string()).collect())
    }
}

/// Value shape does not match the directive's declared shape.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("directive `{0}` expects a list value, got a scalar")]
    ExpectedList(String),
    #[error("directive `{0}` expects a scalar value, got a list")]
    ExpectedScalar(String),
}

/// How a directive renders its value. Closed set: the serializer matches
/// exhaustively, so a new shape is a compile-time-checked addition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// `DisplayKey: value`
    Scalar,
    /// One line, non-empty items joined by `separator`.
    List { separator: String },
    /// One `DisplayKey{i}: item` line per non-empty item, `i` counted over
    /// the filtered items.
    Indexed,
    /// `%key` header with free-text body lines. Preceded by a blank line
    /// when rendered, so consecutive blocks stay visually separated.
    Block,
}

/// One named field of a spec document.
#[derive(Debug, Clone)]
pub struct Directive {
    key: String,
    shape: Shape,
    value: Value,
    description: String,
}

impl Directive {
    pub fn scalar(key: &str) -> Self {
        Self::new(key, Shape::Scalar, Value::Scalar(String::new()))
    }

    /// Space-separated list directive.
    pub fn list(key: &str) -> Self {
        Self::list_with_separator(key, " ")
    }

    pub fn list_with_separator(key: &str, separator: &str) -> Self {
        Self::new(
            key,
            Shape::List { separator: separator.to_string() },
            Value::List(Vec::new()),
        )
    }

    pub fn indexed(key: &str) -> Self {
        Self::new(key, Shape::Indexed, Value::List(Vec::new()))
    }

    pub fn block(key: &str) -> Self {
        Self::new(key, Shape::Block, Value::List(Vec::new()))
    }

    fn new(key: &str, shape: Shape, value: Value) -> Self {
        Directive {
            key: key.to_string(),
            shape,
            value,
            description: String::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// CapitalCase rendering of the key: `build_requires` → `BuildRequires`.
    pub fn display_key(&self) -> String {
        keys::display_key(&self.key)
    }

    /// Replace the stored value. Key and shape never change.
    pub fn set(&mut self, value: impl Into<Value>) {
        self.value = value.into();
    }

    /// Replace the stored value and, when non-empty, the description.
    pub fn set_with_description(&mut self, value: impl Into<Value>, description: &str) {
        self.value = value.into();
        if !description.is_empty() {
            self.description = description.to_string();
        }
    }

    /// Render to spec text. An empty value renders to nothing at all, the
    /// description comment included.
    pub fn serialize(&self) -> Result<String, ShapeError> {
        if self.value.is_empty() {
            return Ok(String::new());
        }
        let comment = if self.description.is_empty() {
            None
        } else {
            Some(format!("# {}", self.description))
        };
        let text = match &self.shape {
            Shape::Scalar => {
                let value = self.scalar_value()?;
                let line = format!("{}: {}", self.display_key(), value);
                match comment {
                    Some(c) => format!("{c}\n{line}"),
                    None => line,
                }
            }
            Shape::List { separator } => {
                let joined = self.filtered_items()?.join(separator);
                let line = format!("{}: {}", self.display_key(), joined);
                match comment {
                    Some(c) => format!("{c}\n{line}"),
                    None => line,
                }
            }
            Shape::Indexed => {
                let display = self.display_key();
                let lines = self
                    .filtered_items()?
                    .iter()
                    .enumerate()
                    .map(|(idx, item)| format!("{display}{idx}: {item}"))
                    .collect::<Vec<_>>()
                    .join("\n");
                match comment {
                    Some(c) => format!("{c}\n{lines}"),
                    None => lines,
                }
            }
            Shape::Block => {
                let body = self.filtered_items()?.join("\n");
                let header = match comment {
                    Some(c) => format!("\n\n{c}\n%{}", self.key),
                    None => format!("\n\n%{}", self.key),
                };
                format!("{header}\n{body}")
            }
        };
        Ok(text)
    }

    fn scalar_value(&self) -> Result<&str, ShapeError> {
        match &self.value {
            Value::Scalar(s) => Ok(s),
            Value::List(_) => Err(ShapeError::ExpectedScalar(self.key.clone())),
        }
    }

    /// List items with empties dropped, in order.
    fn filtered_items(&self) -> Result<Vec<&str>, ShapeError> {
        match &self.value {
            Value::List(items) => {
                Ok(items.iter().filter(|i| !i.is_empty()).map(String::as_str).collect())
            }
            Value::Scalar(_) => Err(ShapeError::ExpectedList(self.key.clone())),
        }
    }
}

/// Ordered set of pre-registered directives, keyed by registry name.
///
/// The registry name usually equals the directive key; indexed directives
/// register under the plural collection name (`sources` → key `source`) so
/// populate input lines up with what the parser emits.
#[derive(Debug, Clone, Default)]
pub struct Section {
    entries: Vec<(String, Directive)>,
}

impl Section {
    /// Preamble layout: package metadata scalars, numbered sources and
    /// patches, then the dependency lists.
    pub fn preamble() -> Self {
        let mut section = Section::default();
        for key in [
            "name",
            "version",
            "release",
            "summary",
            "license",
            "url",
            "packager",
            "build_arch",
            "exclude_arch",
        ] {
            section.register(key, Directive::scalar(key));
        }
        section.register("sources", Directive::indexed("source"));
        section.register("patches", Directive::indexed("patch"));
        for key in ["build_requires", "requires", "conflicts", "obsoletes"] {
            section.register(key, Directive::list(key));
        }
        section
    }

    /// Body layout: the build and install stage blocks.
    pub fn body() -> Self {
        let mut section = Section::default();
        for key in ["description", "prep", "changelog", "build", "install", "check", "files"] {
            section.register(key, Directive::block(key));
        }
        section
    }

    pub fn register(&mut self, name: &str, directive: Directive) {
        self.entries.push((name.to_string(), directive));
    }

    pub fn get(&self, name: &str) -> Option<&Directive> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, d)| d)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Directive> {
        self.entries.iter_mut().find(|(n, _)| n == name).map(|(_, d)| d)
    }

    pub fn directives(&self) -> impl Iterator<Item = &Directive> {
        self.entries.iter().map(|(_, d)| d)
    }

    /// Concatenate every non-empty directive in registration order.
    pub fn serialize(&self) -> Result<String, ShapeError> {
        let mut parts = Vec::new();
        for (_, directive) in &self.entries {
            let text = directive.serialize()?;
            if !text.is_empty() {
                parts.push(text);
            }
        }
        Ok(parts.join("\n"))
    }
}

/// A spec document: one preamble section and one body section.
#[derive(Debug, Clone)]
pub struct Spec {
    pub preamble: Section,
    pub body: Section,
}

impl Spec {
    /// Spec with the default directive layout and no values set.
    pub fn new() -> Self {
        Spec {
            preamble: Section::preamble(),
            body: Section::body(),
        }
    }

    /// Set the value of every directive whose registry name matches a
    /// supplied key, in both sections. Unmatched keys are silently ignored.
    pub fn populate(&mut self, values: impl IntoIterator<Item = (String, Value)>) {
        for (key, value) in values {
            for section in [&mut self.preamble, &mut self.body] {
                if let Some(directive) = section.get_mut(&key) {
                    directive.set(value.clone());
                }
            }
        }
    }

    /// Preamble text, then the body blocks with their separating blank lines.
    pub fn serialize(&self) -> Result<String, ShapeError> {
        Ok(format!("{}\n{}", self.preamble.serialize()?, self.body.serialize()?))
    }
}

impl Default for Spec {
    fn default() -> Self {
        Spec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_directive_line() {
        let mut d = Directive::scalar("build_arch");
        d.set("noarch");
        assert_eq!(d.serialize().unwrap(), "BuildArch: noarch");
    }

    #[test]
    fn empty_directive_serializes_to_nothing() {
        let d = Directive::scalar("summary");
        assert_eq!(d.serialize().unwrap(), "");
    }

    #[test]
    fn description_comment_precedes_line() {
        let mut d = Directive::scalar("license");
        d.set_with_description("MIT", "SPDX short identifier");
        assert_eq!(d.serialize().unwrap(), "# SPDX short identifier\nLicense: MIT");
    }

    #[test]
    fn description_suppressed_when_value_empty() {
        let mut d = Directive::scalar("license");
        d.set_with_description("", "SPDX short identifier");
        assert_eq!(d.serialize().unwrap(), "");
    }

    #[test]
    fn list_directive_joins_with_separator() {
        let mut d = Directive::list("build_requires");
        d.set(["gcc", "make", "gettext"].as_slice());
        assert_eq!(d.serialize().unwrap(), "BuildRequires: gcc make gettext");

        let mut d = Directive::list_with_separator("requires", ",");
        d.set(["python", "linux"].as_slice());
        assert_eq!(d.serialize().unwrap(), "Requires: python,linux");
    }

    #[test]
    fn list_directive_drops_empty_items() {
        let mut d = Directive::list("requires");
        d.set(["python", "", "linux"].as_slice());
        assert_eq!(d.serialize().unwrap(), "Requires: python linux");
    }

    #[test]
    fn indexed_directive_numbers_filtered_items() {
        let mut d = Directive::indexed("patch");
        d.set(["p1.patch", "p2.patch"].as_slice());
        assert_eq!(d.serialize().unwrap(), "Patch0: p1.patch\nPatch1: p2.patch");

        // Index follows the filtered position, not the stored one.
        let mut d = Directive::indexed("source");
        d.set(["", "a.tar.gz", "b.tar.gz"].as_slice());
        assert_eq!(d.serialize().unwrap(), "Source0: a.tar.gz\nSource1: b.tar.gz");
    }

    #[test]
    fn block_directive_renders_header_and_body() {
        let mut d = Directive::block("prep");
        d.set(["%setup -q"].as_slice());
        assert_eq!(d.serialize().unwrap(), "\n\n%prep\n%setup -q");
    }

    #[test]
    fn list_shape_rejects_scalar_value() {
        let mut d = Directive::list("requires");
        d.set("python");
        assert_eq!(d.serialize(), Err(ShapeError::ExpectedList("requires".to_string())));
    }

    #[test]
    fn scalar_shape_rejects_list_value() {
        let mut d = Directive::scalar("version");
        d.set(["1", "2"].as_slice());
        assert_eq!(d.serialize(), Err(ShapeError::ExpectedScalar("version".to_string())));
    }

    #[test]
    fn set_never_changes_key_or_shape() {
        let mut d = Directive::list("requires");
        d.set("oops");
        assert_eq!(d.key(), "requires");
        assert_eq!(d.shape(), &Shape::List { separator: " ".to_string() });
    }

    #[test]
    fn section_skips_empty_directives() {
        let mut spec = Spec::new();
        spec.populate([
            ("build_requires".to_string(), Value::from(["gcc", "make", "gettext"].as_slice())),
        ]);
        let text = spec.preamble.serialize().unwrap();
        assert_eq!(text, "BuildRequires: gcc make gettext");
        assert!(text.lines().all(|l| !l.starts_with("Requires:")));
    }

    #[test]
    fn populate_ignores_unknown_keys() {
        let mut spec = Spec::new();
        spec.populate([
            ("name".to_string(), Value::from("hello")),
            ("no_such_directive".to_string(), Value::from("x")),
        ]);
        assert_eq!(spec.preamble.serialize().unwrap(), "Name: hello");
    }

    #[test]
    fn populate_reaches_both_sections() {
        let mut spec = Spec::new();
        spec.populate([
            ("name".to_string(), Value::from("hello")),
            ("prep".to_string(), Value::from(["%setup -q"].as_slice())),
        ]);
        assert_eq!(
            spec.serialize().unwrap(),
            "Name: hello\n\n\n%prep\n%setup -q"
        );
    }

    #[test]
    fn indexed_registry_uses_plural_name() {
        let mut spec = Spec::new();
        spec.populate([("sources".to_string(), Value::from(["hello.tar.gz"].as_slice()))]);
        assert_eq!(spec.preamble.serialize().unwrap(), "Source0: hello.tar.gz");
    }
}
