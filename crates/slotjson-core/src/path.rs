//! Path resolver for slash-delimited paths into a [`Value`] tree.
//!
//! # Path syntax
//!
//! - `"/a/b/c"` and `"a/b/c"` and `"a/b/c/"` are equivalent: exactly one
//!   leading and one trailing `/` are ignored.
//! - A segment of one to three ASCII digits (`^[0-9]{1,3}$`) is an array
//!   index; anything else is an object key.
//! - `""` (or `"/"`) denotes the root itself.
//!
//! The index rule is lexical, not driven by the container being walked: an
//! object key that is itself 1-3 digits (e.g. `"3"`) cannot be reached by
//! any path.

use std::fmt;

use tracing::trace;

use crate::error::{Result, SlotError};
use crate::value::Value;

/// One path component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Index(usize),
    Key(String),
}

impl Segment {
    /// Classify a raw path piece.
    pub fn parse(piece: &str) -> Self {
        if (1..=3).contains(&piece.len()) && piece.bytes().all(|b| b.is_ascii_digit()) {
            let index = piece
                .bytes()
                .fold(0usize, |acc, b| acc * 10 + usize::from(b - b'0'));
            Segment::Index(index)
        } else {
            Segment::Key(piece.to_string())
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Index(i) => write!(f, "{}", i),
            Segment::Key(k) => f.write_str(k),
        }
    }
}

/// An ordered list of segments. Zero segments addresses the root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// Parse a path string. Never fails: every string is a valid path.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.strip_prefix('/').unwrap_or(raw);
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Self::root();
        }
        Self {
            segments: trimmed.split('/').map(Segment::parse).collect(),
        }
    }

    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// Read-only outcome of walking a path: the located node together with its
/// parent and the segment naming it there. The root has no parent.
#[derive(Debug, Clone, Copy)]
pub struct Resolution<'a> {
    pub parent: Option<(&'a Value, &'a Segment)>,
    pub node: &'a Value,
}

/// Mutable outcome of walking a path, used by the mutation engine.
///
/// A `Child` location always names a slot that existed when the location was
/// produced; mutations go through the parent container so the tree stays
/// strictly owned.
#[derive(Debug)]
pub enum Location<'a> {
    Root(&'a mut Value),
    Child {
        parent: &'a mut Value,
        segment: &'a Segment,
    },
}

impl Location<'_> {
    /// The located node.
    pub fn node(&self) -> Option<&Value> {
        match self {
            Location::Root(root) => Some(&**root),
            Location::Child { parent, segment } => parent.child(segment),
        }
    }

    pub fn node_mut(&mut self) -> Option<&mut Value> {
        match self {
            Location::Root(root) => Some(&mut **root),
            Location::Child { parent, segment } => parent.child_mut(segment),
        }
    }
}

fn not_found(segment: &Segment, depth: usize) -> SlotError {
    SlotError::NotFound {
        segment: segment.to_string(),
        depth,
    }
}

/// Walk `path` from `root` without mutating anything.
///
/// Fails with [`SlotError::NotFound`] at the first segment that does not
/// exist, or whose container kind does not match (index into a non-array,
/// key into a non-object).
pub fn resolve<'a>(root: &'a Value, path: &'a Path) -> Result<Resolution<'a>> {
    let mut resolution = Resolution {
        parent: None,
        node: root,
    };
    for (depth, segment) in path.segments.iter().enumerate() {
        trace!(%segment, depth, "resolving segment");
        let child = resolution
            .node
            .child(segment)
            .ok_or_else(|| not_found(segment, depth))?;
        resolution = Resolution {
            parent: Some((resolution.node, segment)),
            node: child,
        };
    }
    Ok(resolution)
}

/// Walk `path` from `root`, returning a handle for in-place mutation.
pub fn resolve_mut<'a>(root: &'a mut Value, path: &'a Path) -> Result<Location<'a>> {
    let Some((last, parents)) = path.segments.split_last() else {
        return Ok(Location::Root(root));
    };
    let mut current = root;
    for (depth, segment) in parents.iter().enumerate() {
        trace!(%segment, depth, "resolving segment");
        current = current
            .child_mut(segment)
            .ok_or_else(|| not_found(segment, depth))?;
    }
    if current.child(last).is_none() {
        return Err(not_found(last, parents.len()));
    }
    Ok(Location::Child {
        parent: current,
        segment: last,
    })
}
