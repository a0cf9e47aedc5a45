//! Reference lists of stream ids, read once from plain-text files.
//!
//! One UUID per line. Surrounding whitespace and blank lines are ignored.

use std::{collections::HashSet, path::Path};

use uuid::Uuid;

use crate::{Error, Result};

/// A set of stream ids loaded from a reference file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamIdList {
  ids: HashSet<Uuid>,
}

impl StreamIdList {
  /// Read and parse `path`.
  ///
  /// An unreadable file or a line that is not a UUID is an error; callers
  /// are expected to treat it as fatal at startup.
  pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| Error::ReferenceFile {
      path: path.to_path_buf(),
      source,
    })?;
    let list = Self::parse(path, &raw)?;
    tracing::info!(path = %path.display(), ids = list.len(), "loaded stream list");
    Ok(list)
  }

  fn parse(path: &Path, raw: &str) -> Result<Self> {
    let mut ids = HashSet::new();
    for (index, line) in raw.lines().enumerate() {
      let value = line.trim();
      if value.is_empty() {
        continue;
      }
      let id = Uuid::parse_str(value).map_err(|_| Error::InvalidStreamId {
        path:  path.to_path_buf(),
        line:  index + 1,
        value: value.to_owned(),
      })?;
      ids.insert(id);
    }
    Ok(Self { ids })
  }

  pub fn contains(&self, stream_id: &Uuid) -> bool { self.ids.contains(stream_id) }

  pub fn len(&self) -> usize { self.ids.len() }

  pub fn is_empty(&self) -> bool { self.ids.is_empty() }
}

impl FromIterator<Uuid> for StreamIdList {
  fn from_iter<T: IntoIterator<Item = Uuid>>(iter: T) -> Self {
    Self {
      ids: iter.into_iter().collect(),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use super::*;

  #[test]
  fn reads_one_id_per_line() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{a}").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "  {}  ", b.simple()).unwrap();

    let list = StreamIdList::from_file(file.path()).unwrap();
    assert_eq!(list.len(), 2);
    assert!(list.contains(&a));
    assert!(list.contains(&b));
  }

  #[test]
  fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = StreamIdList::from_file(dir.path().join("absent.txt")).unwrap_err();
    assert!(matches!(err, Error::ReferenceFile { .. }));
  }

  #[test]
  fn invalid_line_reports_position() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{}", Uuid::new_v4()).unwrap();
    writeln!(file, "not-a-stream").unwrap();

    let err = StreamIdList::from_file(file.path()).unwrap_err();
    let Error::InvalidStreamId { line, value, .. } = &err else {
      panic!("unexpected error: {err}");
    };
    assert_eq!(*line, 2);
    assert_eq!(value, "not-a-stream");
  }
}
