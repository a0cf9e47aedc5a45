//! Path-expression parser.
//!
//! Pipeline:
//!   raw &str
//!     └─ Parser::segments()     → Vec<Segment>
//!          └─ parse_member()    → `.name`, `.*`, `..name`
//!          └─ parse_bracket()   → `[n]`, `['a']`, `[*]`, `[0,1]`, `[1:3]`

use crate::error::{Error, Result};

// ─── Segment representation ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Selector {
  Name(String),
  Names(Vec<String>),
  Index(i64),
  Indexes(Vec<i64>),
  Slice {
    start: Option<i64>,
    end:   Option<i64>,
  },
  Wildcard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Segment {
  pub selector:   Selector,
  /// `..` — match at this node and every node below it.
  pub descendant: bool,
}

impl Segment {
  /// A segment is definite when it can select at most one location.
  pub fn is_definite(&self) -> bool {
    !self.descendant
      && matches!(self.selector, Selector::Name(_) | Selector::Index(_))
  }
}

// ─── Parser ──────────────────────────────────────────────────────────────────

struct Parser<'a> {
  path: &'a str,
  pos:  usize,
}

impl<'a> Parser<'a> {
  fn rest(&self) -> &'a str { &self.path[self.pos..] }

  fn peek(&self) -> Option<char> { self.rest().chars().next() }

  fn bump(&mut self) -> Option<char> {
    let c = self.peek()?;
    self.pos += c.len_utf8();
    Some(c)
  }

  fn skip_spaces(&mut self) {
    while self.peek().is_some_and(char::is_whitespace) {
      self.bump();
    }
  }

  fn unexpected(&self) -> Error {
    match self.peek() {
      Some(c) => Error::Unexpected {
        path:   self.path.to_string(),
        offset: self.pos,
        found:  c.to_string(),
      },
      None => Error::UnexpectedEnd(self.path.to_string()),
    }
  }

  fn expect(&mut self, want: char) -> Result<()> {
    if self.peek() == Some(want) {
      self.bump();
      Ok(())
    } else {
      Err(self.unexpected())
    }
  }

  fn segments(mut self) -> Result<Vec<Segment>> {
    if self.bump() != Some('$') {
      return Err(Error::MissingRoot(self.path.to_string()));
    }

    let mut segments = Vec::new();
    while self.peek().is_some() {
      let segment = if self.rest().starts_with("..") {
        self.pos += 2;
        let selector = if self.peek() == Some('[') {
          self.parse_bracket()?
        } else {
          self.parse_member()?
        };
        Segment {
          selector,
          descendant: true,
        }
      } else if self.peek() == Some('.') {
        self.bump();
        Segment {
          selector:   self.parse_member()?,
          descendant: false,
        }
      } else if self.peek() == Some('[') {
        Segment {
          selector:   self.parse_bracket()?,
          descendant: false,
        }
      } else {
        return Err(self.unexpected());
      };
      segments.push(segment);
    }
    Ok(segments)
  }

  /// A dot-notation member: `*` or a bare name of identifier characters.
  /// Anything else after the name is left for the caller to reject.
  fn parse_member(&mut self) -> Result<Selector> {
    match self.peek() {
      Some('*') => {
        self.bump();
        return Ok(Selector::Wildcard);
      }
      Some('?') => return Err(Error::UnsupportedFilter(self.path.to_string())),
      _ => {}
    }
    let rest = self.rest();
    let len = rest
      .find(|c: char| !is_name_char(c))
      .unwrap_or(rest.len());
    if len == 0 {
      return Err(self.unexpected());
    }
    self.pos += len;
    Ok(Selector::Name(rest[..len].to_string()))
  }

  fn parse_bracket(&mut self) -> Result<Selector> {
    self.expect('[')?;
    self.skip_spaces();

    let selector = match self.peek() {
      Some('*') => {
        self.bump();
        Selector::Wildcard
      }
      Some('?') => return Err(Error::UnsupportedFilter(self.path.to_string())),
      Some('\'' | '"') => {
        let mut names = vec![self.parse_quoted()?];
        self.skip_spaces();
        while self.peek() == Some(',') {
          self.bump();
          self.skip_spaces();
          names.push(self.parse_quoted()?);
          self.skip_spaces();
        }
        if names.len() == 1 {
          Selector::Name(names.remove(0))
        } else {
          Selector::Names(names)
        }
      }
      Some(_) => {
        let rest = self.rest();
        let len = rest.find(']').ok_or_else(|| Error::UnexpectedEnd(self.path.to_string()))?;
        let body = rest[..len].trim();
        let selector = self.parse_index_body(body)?;
        self.pos += len;
        selector
      }
      None => return Err(Error::UnexpectedEnd(self.path.to_string())),
    };

    self.skip_spaces();
    self.expect(']')?;
    Ok(selector)
  }

  fn parse_index_body(&self, body: &str) -> Result<Selector> {
    if let Some((start, end)) = body.split_once(':') {
      return Ok(Selector::Slice {
        start: self.parse_optional_index(start)?,
        end:   self.parse_optional_index(end)?,
      });
    }
    if body.contains(',') {
      let indexes = body
        .split(',')
        .map(|part| self.parse_index(part))
        .collect::<Result<Vec<_>>>()?;
      return Ok(Selector::Indexes(indexes));
    }
    Ok(Selector::Index(self.parse_index(body)?))
  }

  fn parse_index(&self, raw: &str) -> Result<i64> {
    raw.trim().parse::<i64>().map_err(|_| Error::InvalidIndex {
      path:  self.path.to_string(),
      value: raw.trim().to_string(),
    })
  }

  fn parse_optional_index(&self, raw: &str) -> Result<Option<i64>> {
    if raw.trim().is_empty() {
      Ok(None)
    } else {
      self.parse_index(raw).map(Some)
    }
  }

  /// A single- or double-quoted name; `\` escapes the next character.
  fn parse_quoted(&mut self) -> Result<String> {
    let quote = self.bump().ok_or_else(|| Error::UnexpectedEnd(self.path.to_string()))?;
    let mut name = String::new();
    loop {
      match self.bump() {
        Some('\\') => match self.bump() {
          Some(c) => name.push(c),
          None => return Err(Error::UnexpectedEnd(self.path.to_string())),
        },
        Some(c) if c == quote => return Ok(name),
        Some(c) => name.push(c),
        None => return Err(Error::UnexpectedEnd(self.path.to_string())),
      }
    }
  }
}

fn is_name_char(c: char) -> bool {
  c.is_alphanumeric() || matches!(c, '_' | '-' | '$')
}

/// Parse a path expression into its segments.
pub(crate) fn parse_path(path: &str) -> Result<Vec<Segment>> {
  Parser {
    path: path.trim(),
    pos:  0,
  }
  .segments()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn child(selector: Selector) -> Segment {
    Segment {
      selector,
      descendant: false,
    }
  }

  #[test]
  fn parses_dot_and_index_segments() {
    let segments = parse_path("$.prompts[0].id").unwrap();
    assert_eq!(segments, vec![
      child(Selector::Name("prompts".into())),
      child(Selector::Index(0)),
      child(Selector::Name("id".into())),
    ]);
    assert!(segments.iter().all(Segment::is_definite));
  }

  #[test]
  fn parses_recursive_descent() {
    let segments = parse_path("$..label").unwrap();
    assert_eq!(segments, vec![Segment {
      selector:   Selector::Name("label".into()),
      descendant: true,
    }]);
    assert!(!segments[0].is_definite());
  }

  #[test]
  fn parses_quoted_names_and_unions() {
    let segments = parse_path("$['hearing']['court.centre', \"id\"]").unwrap();
    assert_eq!(segments, vec![
      child(Selector::Name("hearing".into())),
      child(Selector::Names(vec!["court.centre".into(), "id".into()])),
    ]);
  }

  #[test]
  fn parses_slices_and_index_unions() {
    let segments = parse_path("$.a[1:3].b[0, 2][-1][:2]").unwrap();
    assert_eq!(segments[1].selector, Selector::Slice {
      start: Some(1),
      end:   Some(3),
    });
    assert_eq!(segments[3].selector, Selector::Indexes(vec![0, 2]));
    assert_eq!(segments[4].selector, Selector::Index(-1));
    assert_eq!(segments[5].selector, Selector::Slice {
      start: None,
      end:   Some(2),
    });
  }

  #[test]
  fn parses_wildcards() {
    let segments = parse_path("$.defendants[*].offences.*").unwrap();
    assert_eq!(segments[1].selector, Selector::Wildcard);
    assert_eq!(segments[3].selector, Selector::Wildcard);
  }

  #[test]
  fn dot_names_allow_identifier_characters() {
    let segments = parse_path("$.court-centre.case_id.$ref.prénom").unwrap();
    let names: Vec<_> = segments
      .iter()
      .map(|s| match &s.selector {
        Selector::Name(n) => n.as_str(),
        other => panic!("unexpected selector {other:?}"),
      })
      .collect();
    assert_eq!(names, ["court-centre", "case_id", "$ref", "prénom"]);
  }

  #[test]
  fn bare_root_has_no_segments() {
    assert!(parse_path("$").unwrap().is_empty());
  }

  #[test]
  fn rejects_malformed_paths() {
    assert!(matches!(parse_path("prompts[0]"), Err(Error::MissingRoot(_))));
    assert!(matches!(parse_path("$.prompts["), Err(Error::UnexpectedEnd(_))));
    assert!(matches!(parse_path("$.prompts[x]"), Err(Error::InvalidIndex { .. })));
    assert!(matches!(parse_path("$."), Err(Error::UnexpectedEnd(_))));
    assert!(matches!(parse_path("$.a b"), Err(Error::Unexpected { .. })));
    assert!(matches!(parse_path("$['a'"), Err(Error::UnexpectedEnd(_))));
    for path in ["$.prompts]", "$.prompts'", "$.a)b", "$.a?(x)", "$.a@b", "$.\"id\""] {
      assert!(
        matches!(parse_path(path), Err(Error::Unexpected { .. })),
        "{path} should be rejected"
      );
    }
    assert!(matches!(parse_path("$.?(@.id)"), Err(Error::UnsupportedFilter(_))));
    assert!(matches!(parse_path("$..?(@.id)"), Err(Error::UnsupportedFilter(_))));
    assert!(matches!(
      parse_path("$.prompts[?(@.id)]"),
      Err(Error::UnsupportedFilter(_))
    ));
  }
}
