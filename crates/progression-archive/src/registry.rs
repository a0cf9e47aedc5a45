//! Event-name registries.
//!
//! A registry is a fixed set of event names with one matching mode chosen at
//! construction. Case-insensitive and exact registries are separate values
//! and are never merged.

use std::collections::HashSet;

/// How a registry compares event names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matching {
  /// ASCII case-insensitive comparison.
  CaseInsensitive,
  /// Byte-for-byte comparison.
  Exact,
}

impl Matching {
  pub(crate) fn key(self, name: &str) -> String {
    match self {
      Self::CaseInsensitive => name.to_ascii_lowercase(),
      Self::Exact => name.to_owned(),
    }
  }
}

/// An immutable set of event names with O(1) membership tests.
#[derive(Debug, Clone)]
pub struct EventNameRegistry {
  matching: Matching,
  names:    HashSet<String>,
}

impl EventNameRegistry {
  pub fn new<I, S>(matching: Matching, names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let names = names
      .into_iter()
      .map(|n| matching.key(n.as_ref()))
      .collect();
    Self { matching, names }
  }

  pub fn case_insensitive<I, S>(names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    Self::new(Matching::CaseInsensitive, names)
  }

  pub fn exact<I, S>(names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    Self::new(Matching::Exact, names)
  }

  pub fn contains(&self, name: &str) -> bool {
    match self.matching {
      Matching::Exact => self.names.contains(name),
      Matching::CaseInsensitive => self.names.contains(&name.to_ascii_lowercase()),
    }
  }

  pub fn len(&self) -> usize { self.names.len() }

  pub fn is_empty(&self) -> bool { self.names.is_empty() }
}
