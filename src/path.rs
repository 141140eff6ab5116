use std::fmt;

/// One hop in a [`Path`]: a property name for object containers, or the
/// index an array element will land at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => write!(f, "{k}"),
            PathSegment::Index(i) => write!(f, "{i}"),
        }
    }
}

/// An address into the value tree / schema, root to leaf.
///
/// Kept internally as a segment list rather than a pre-joined string, so
/// that a key containing a literal `.` never collides with a path boundary
/// (see SPEC_FULL.md §9). `to_dotted` performs the lossy join only at the
/// point §6 requires one — when materializing `ParseResult.completedFields`
/// / `pendingFields`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path(pub Vec<PathSegment>);

impl Path {
    pub fn root() -> Self {
        Path(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push_key(&self, key: impl Into<String>) -> Path {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.into()));
        Path(segments)
    }

    pub fn push_index(&self, index: usize) -> Path {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Path(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Dot-joined surface form required by `ParseResult`. The root path
    /// joins to the empty string.
    pub fn to_dotted(&self) -> String {
        self.0
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Array-of-strings form used by `ValidationError.path`.
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(|s| s.to_string()).collect()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_dotted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_join() {
        let p = Path::root().push_key("a").push_index(2).push_key("b");
        assert_eq!(p.to_dotted(), "a.2.b");
        assert_eq!(p.to_strings(), vec!["a", "2", "b"]);
    }

    #[test]
    fn root_is_empty_string() {
        assert_eq!(Path::root().to_dotted(), "");
        assert!(Path::root().is_root());
    }
}
