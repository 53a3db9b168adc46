// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flownav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flownav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use super::ids::{DiagramIdTag, Id, IdError, NodeIdTag};

/// Ordered, non-empty chain of ids from the session root, written `A/n1/B`.
pub struct IdPath<T> {
    segments: Vec<Id<T>>,
}

impl<T> Clone for IdPath<T> {
    fn clone(&self) -> Self {
        Self {
            segments: self.segments.clone(),
        }
    }
}

impl<T> fmt::Debug for IdPath<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdPath({self})")
    }
}

impl<T> PartialEq for IdPath<T> {
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
    }
}

impl<T> Eq for IdPath<T> {}

impl<T> Hash for IdPath<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.segments.hash(state);
    }
}

impl<T> PartialOrd for IdPath<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for IdPath<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segments.cmp(&other.segments)
    }
}

/// Chain of diagram ids; the identity key of a [`DiagramReference`](super::DiagramReference).
pub type DiagramPath = IdPath<DiagramIdTag>;

/// Chain of tree-node ids, including intermediate sub-process/swimlane/form nodes.
pub type AbsolutePath = IdPath<NodeIdTag>;

impl<T> IdPath<T> {
    pub fn root(id: Id<T>) -> Self {
        Self { segments: vec![id] }
    }

    pub fn from_segments(segments: Vec<Id<T>>) -> Result<Self, PathError> {
        if segments.is_empty() {
            return Err(PathError::Empty);
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Id<T>] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn first(&self) -> &Id<T> {
        &self.segments[0]
    }

    pub fn last(&self) -> &Id<T> {
        &self.segments[self.segments.len() - 1]
    }

    pub fn child(&self, id: Id<T>) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(id);
        Self { segments }
    }

    /// `None` for a single-segment path.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Segment-wise prefix test; `A/BC` does not start with `A/B`.
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.segments.len() >= prefix.segments.len()
            && self.segments[..prefix.segments.len()] == prefix.segments[..]
    }

    pub fn is_strict_descendant_of(&self, prefix: &Self) -> bool {
        self.segments.len() > prefix.segments.len() && self.starts_with(prefix)
    }
}

impl<T> fmt::Display for IdPath<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.segments.iter().enumerate() {
            if idx > 0 {
                f.write_str("/")?;
            }
            f.write_str(segment.as_str())?;
        }
        Ok(())
    }
}

impl<T> FromStr for IdPath<T> {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(PathError::Empty);
        }
        let segments = s
            .split('/')
            .map(|segment| Id::new(segment.to_owned()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| PathError::InvalidSegment {
                path: s.to_owned(),
                source,
            })?;
        Self::from_segments(segments)
    }
}

impl<T> Serialize for IdPath<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T> Deserialize<'de> for IdPath<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path must contain at least one segment")]
    Empty,
    #[error("invalid segment in path {path:?}: {source}")]
    InvalidSegment {
        path: String,
        #[source]
        source: IdError,
    },
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{DiagramPath, PathError};

    fn path(raw: &str) -> DiagramPath {
        raw.parse().expect("diagram path")
    }

    #[test]
    fn child_and_parent_are_inverse() {
        let base = path("A/B");
        let child = base.child("C".parse().expect("id"));
        assert_eq!(child.to_string(), "A/B/C");
        assert_eq!(child.parent(), Some(base));
        assert_eq!(path("A").parent(), None);
    }

    #[rstest]
    #[case("A/B/C", "A/B", true)]
    #[case("A/B", "A/B", false)]
    #[case("A/BC", "A/B", false)]
    #[case("X/B/C", "A/B", false)]
    #[case("A", "A/B", false)]
    fn strict_descendant_is_segment_wise(
        #[case] candidate: &str,
        #[case] prefix: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(path(candidate).is_strict_descendant_of(&path(prefix)), expected);
    }

    #[test]
    fn parse_rejects_empty_segments() {
        assert_eq!("".parse::<DiagramPath>(), Err(PathError::Empty));
        assert!(matches!(
            "A//B".parse::<DiagramPath>(),
            Err(PathError::InvalidSegment { .. })
        ));
    }

    #[test]
    fn serializes_as_slash_joined_string() {
        let value = serde_json::to_value(path("A/n1/B")).expect("json");
        assert_eq!(value, serde_json::json!("A/n1/B"));
    }
}
