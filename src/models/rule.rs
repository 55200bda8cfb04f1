use std::fmt;

use serde_yaml::Value;

use crate::errors::MergeError;
use crate::utils::yaml::get_key;

/// The two shapes a rule source document may take.
///
/// A `rules` sequence carries complete `TYPE,VALUE,TARGET` lines; a
/// `payload` sequence carries bare `TYPE,VALUE` lines that still need a
/// target. Both are normalized to [`RuleEntry`] before merging, so shape
/// never leaks into the merge logic.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleList {
    Explicit(Vec<Value>),
    Implicit(Vec<Value>),
}

impl RuleList {
    /// Extract the rule list from a parsed source document.
    ///
    /// `rules` takes precedence when both keys are present. Returns `None`
    /// when the document has neither key as a sequence.
    pub fn from_document(doc: &Value) -> Option<RuleList> {
        let map = doc.as_mapping()?;

        if let Some(entries) = get_key(map, "rules").and_then(Value::as_sequence) {
            return Some(RuleList::Explicit(entries.clone()));
        }
        if let Some(entries) = get_key(map, "payload").and_then(Value::as_sequence) {
            return Some(RuleList::Implicit(entries.clone()));
        }
        None
    }

    /// The YAML key this list was read from, for log lines.
    pub fn shape(&self) -> &'static str {
        match self {
            RuleList::Explicit(_) => "rules",
            RuleList::Implicit(_) => "payload",
        }
    }

    pub fn entries(&self) -> &[Value] {
        match self {
            RuleList::Explicit(entries) => entries,
            RuleList::Implicit(entries) => entries,
        }
    }
}

/// One normalized routing rule line in `TYPE,VALUE,TARGET` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleEntry(String);

impl RuleEntry {
    /// Normalize an entry that already carries its own target.
    ///
    /// Entries with fewer than 2 comma-separated fields are rejected; a
    /// 2-field line is allowed because terminal rules like `MATCH,DIRECT`
    /// have no VALUE field.
    pub fn from_explicit(raw: &str) -> Result<RuleEntry, MergeError> {
        let line = raw.trim();
        if count_fields(line) < 2 {
            return Err(MergeError::MalformedRule(format!(
                "{:?} has fewer than 2 comma-separated fields",
                raw
            )));
        }
        Ok(RuleEntry(line.to_string()))
    }

    /// Normalize a payload entry by appending the default target.
    pub fn from_implicit(raw: &str, default_target: &str) -> Result<RuleEntry, MergeError> {
        let line = raw.trim();
        if count_fields(line) < 2 {
            return Err(MergeError::MalformedRule(format!(
                "{:?} has fewer than 2 comma-separated fields",
                raw
            )));
        }
        Ok(RuleEntry(format!("{},{}", line, default_target)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RuleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn count_fields(line: &str) -> usize {
    if line.is_empty() {
        0
    } else {
        line.split(',').count()
    }
}
