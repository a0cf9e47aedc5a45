//! The rule table: event name → ordered extraction paths.

use std::collections::HashMap;

use progression_jsonpath::JsonPath;
use serde_json::Value;

use crate::{
  Error, Result,
  registry::Matching,
};

/// Maps event names to the ordered list of paths to extract from their
/// payloads. Paths are compiled once when the table is built.
#[derive(Debug, Clone)]
pub struct RuleTable {
  matching: Matching,
  rules:    HashMap<String, Vec<JsonPath>>,
}

impl RuleTable {
  /// Build a table from `(event name, paths)` pairs.
  ///
  /// Returns [`Error::Path`] for the first malformed path. Entries for the
  /// same name (after case folding) are concatenated in order.
  pub fn new<'a, I>(matching: Matching, entries: I) -> Result<Self>
  where
    I: IntoIterator<Item = (&'a str, &'a [&'a str])>,
  {
    let mut rules: HashMap<String, Vec<JsonPath>> = HashMap::new();
    for (event_name, paths) in entries {
      let compiled = paths
        .iter()
        .map(|p| {
          JsonPath::parse(p).map_err(|source| Error::Path {
            event_name: event_name.to_owned(),
            source,
          })
        })
        .collect::<Result<Vec<_>>>()?;
      rules
        .entry(matching.key(event_name))
        .or_default()
        .extend(compiled);
    }
    Ok(Self { matching, rules })
  }

  /// The paths registered for `event_name`, or `None` if it needs no
  /// extraction.
  pub fn lookup_paths(&self, event_name: &str) -> Option<&[JsonPath]> {
    let found = match self.matching {
      Matching::Exact => self.rules.get(event_name),
      Matching::CaseInsensitive => self.rules.get(&event_name.to_ascii_lowercase()),
    };
    found.map(Vec::as_slice)
  }

  /// Try each registered path in order, passing its first match to `accept`,
  /// and return the first value `accept` keeps.
  pub fn find_extracted<T>(
    &self,
    event_name: &str,
    payload: &Value,
    mut accept: impl FnMut(String) -> Option<T>,
  ) -> Option<T> {
    self
      .lookup_paths(event_name)?
      .iter()
      .filter_map(|path| path.first(payload))
      .find_map(|value| accept(value))
  }

  pub fn len(&self) -> usize { self.rules.len() }

  pub fn is_empty(&self) -> bool { self.rules.is_empty() }
}
