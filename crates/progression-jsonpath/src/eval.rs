//! Evaluation of parsed segments against a JSON document.
//!
//! Matches are returned in document order. Recursive descent is pre-order: a
//! node's own match comes before the matches of its children.

use serde_json::Value;

use crate::parse::{Segment, Selector};

pub(crate) fn select<'v>(segments: &[Segment], root: &'v Value) -> Vec<&'v Value> {
  let mut current = vec![root];
  for segment in segments {
    let mut next = Vec::new();
    for node in current {
      if segment.descendant {
        descend(node, &segment.selector, &mut next);
      } else {
        apply(node, &segment.selector, &mut next);
      }
    }
    if next.is_empty() {
      return next;
    }
    current = next;
  }
  current
}

fn descend<'v>(node: &'v Value, selector: &Selector, out: &mut Vec<&'v Value>) {
  apply(node, selector, out);
  match node {
    Value::Object(map) => map.values().for_each(|v| descend(v, selector, out)),
    Value::Array(items) => items.iter().for_each(|v| descend(v, selector, out)),
    _ => {}
  }
}

fn apply<'v>(node: &'v Value, selector: &Selector, out: &mut Vec<&'v Value>) {
  match (selector, node) {
    (Selector::Name(name), Value::Object(map)) => out.extend(map.get(name)),
    (Selector::Names(names), Value::Object(map)) => {
      out.extend(names.iter().filter_map(|name| map.get(name)));
    }
    (Selector::Index(index), Value::Array(items)) => {
      out.extend(resolve_index(*index, items.len()).map(|i| &items[i]));
    }
    (Selector::Indexes(indexes), Value::Array(items)) => {
      out.extend(
        indexes
          .iter()
          .filter_map(|&index| resolve_index(index, items.len()))
          .map(|i| &items[i]),
      );
    }
    (Selector::Slice { start, end }, Value::Array(items)) => {
      let len = items.len();
      let from = clamp_bound(start.unwrap_or(0), len);
      let to = clamp_bound(end.unwrap_or(len as i64), len);
      if from < to {
        out.extend(&items[from..to]);
      }
    }
    (Selector::Wildcard, Value::Object(map)) => out.extend(map.values()),
    (Selector::Wildcard, Value::Array(items)) => out.extend(items.iter()),
    _ => {}
  }
}

/// Resolve a possibly negative index against `len`.
fn resolve_index(index: i64, len: usize) -> Option<usize> {
  let len = len as i64;
  let resolved = if index < 0 { len + index } else { index };
  (0..len).contains(&resolved).then_some(resolved as usize)
}

/// Resolve a slice bound, clamping into `0..=len`.
fn clamp_bound(bound: i64, len: usize) -> usize {
  let len = len as i64;
  let resolved = if bound < 0 { len + bound } else { bound };
  resolved.clamp(0, len) as usize
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::parse::parse_path;

  fn eval<'v>(path: &str, doc: &'v Value) -> Vec<&'v Value> {
    select(&parse_path(path).unwrap(), doc)
  }

  #[test]
  fn negative_index_counts_from_end() {
    let doc = json!({ "a": [1, 2, 3] });
    assert_eq!(eval("$.a[-1]", &doc), vec![&json!(3)]);
    assert!(eval("$.a[-4]", &doc).is_empty());
    assert!(eval("$.a[3]", &doc).is_empty());
  }

  #[test]
  fn slices_are_clamped() {
    let doc = json!({ "a": [1, 2, 3, 4] });
    assert_eq!(eval("$.a[1:3]", &doc), vec![&json!(2), &json!(3)]);
    assert_eq!(eval("$.a[-2:]", &doc), vec![&json!(3), &json!(4)]);
    assert_eq!(eval("$.a[2:100]", &doc).len(), 2);
    assert!(eval("$.a[3:1]", &doc).is_empty());
  }

  #[test]
  fn recursive_descent_is_pre_order() {
    let doc = json!({
      "id": "outer",
      "hearing": { "id": "hearing", "defendants": [{ "id": "d1" }, { "id": "d2" }] },
    });
    let ids: Vec<_> = eval("$..id", &doc).into_iter().filter_map(Value::as_str).collect();
    assert_eq!(ids, ["outer", "hearing", "d1", "d2"]);
  }

  #[test]
  fn descendant_index_selects_inside_every_array() {
    let doc = json!({ "a": [["x", "y"], ["z"]] });
    let firsts: Vec<_> = eval("$..[0]", &doc).into_iter().cloned().collect();
    assert_eq!(firsts, vec![json!(["x", "y"]), json!("x"), json!("z")]);
  }

  #[test]
  fn wildcard_on_scalar_matches_nothing() {
    let doc = json!({ "a": 1 });
    assert!(eval("$.a.*", &doc).is_empty());
    assert!(eval("$.a.b.c", &doc).is_empty());
  }

  #[test]
  fn name_union_keeps_selector_order() {
    let doc = json!({ "a": 1, "b": 2 });
    assert_eq!(eval("$['b','a','c']", &doc), vec![&json!(2), &json!(1)]);
  }
}
