/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt::{self, Write};

use indexmap::IndexMap;

use crate::DEFAULT_DELIMITER;

/// Folder-like view over a flat set of object keys.
///
/// Each node maps a path segment to the subtree beneath it. A node with no children is
/// either a terminal object or an (empty) folder; both live in the same flat namespace
/// so the tree does not distinguish them.
///
/// Children are kept in first-insertion order so rendering the same tree is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyTree {
    children: IndexMap<String, KeyTree>,
}

impl KeyTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a single key, creating any path segments not yet present.
    ///
    /// Inserting a key whose segments already exist is a no-op.
    pub fn insert(&mut self, key: &str) {
        let mut node = self;
        for segment in key.split(DEFAULT_DELIMITER) {
            node = node.children.entry(segment.to_owned()).or_default();
        }
    }

    /// Get the subtree for a direct child segment
    pub fn get(&self, segment: &str) -> Option<&KeyTree> {
        self.children.get(segment)
    }

    /// Iterate over the direct children of this node in enumeration order
    pub fn children(&self) -> impl Iterator<Item = (&str, &KeyTree)> {
        self.children.iter().map(|(name, tree)| (name.as_str(), tree))
    }

    /// Number of direct children
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// True if this node has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for KeyTree {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tree = KeyTree::new();
        for key in iter {
            tree.insert(key.as_ref());
        }
        tree
    }
}

impl fmt::Display for KeyTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_level(f, self, "")
    }
}

/// Build a [`KeyTree`] from a set of `/` delimited object keys.
///
/// The order keys are processed in does not change which segments end up in the tree,
/// only the order children are enumerated in.
pub fn build<I, S>(keys: I) -> KeyTree
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keys.into_iter().collect()
}

/// Render a [`KeyTree`] as a box-drawing directory listing, one segment per line.
///
/// ```
/// let tree = s3_bucket_dump::tree::build(["a/b/c", "a/x"]);
/// assert_eq!(
///     "└── a\n    ├── b\n    │   └── c\n    └── x\n",
///     s3_bucket_dump::tree::render(&tree)
/// );
/// ```
pub fn render(tree: &KeyTree) -> String {
    tree.to_string()
}

fn write_level<W: Write>(out: &mut W, tree: &KeyTree, indent: &str) -> fmt::Result {
    let last = tree.len().saturating_sub(1);
    for (i, (name, subtree)) in tree.children().enumerate() {
        let (connector, continuation) = if i == last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        writeln!(out, "{indent}{connector}{name}")?;
        if !subtree.is_empty() {
            write_level(out, subtree, &format!("{indent}{continuation}"))?;
        }
    }
    Ok(())
}
