//! Page hierarchy: direct children, breadcrumbs, and the full forest.
//!
//! Parent references are weak. A reference to a page that is not in the
//! collection is treated as "no parent", and parent cycles are broken
//! instead of followed.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::models::Page;

/// Direct non-template children of `parent_id` (root level when `None`),
/// in storage order.
pub fn children<'a>(pages: &'a [Page], parent_id: Option<&str>) -> Vec<&'a Page> {
    pages
        .iter()
        .filter(|p| !p.is_template && p.parent_id.as_deref() == parent_id)
        .collect()
}

/// Root-first chain ending at `page_id`.
///
/// The walk stops at a page with no parent, at a reference that does not
/// resolve, or when an id repeats.
pub fn breadcrumbs<'a>(pages: &'a [Page], page_id: Option<&str>) -> Vec<&'a Page> {
    let by_id: HashMap<&str, &Page> = pages.iter().map(|p| (p.id.as_str(), p)).collect();
    let mut seen = HashSet::new();
    let mut chain = Vec::new();
    let mut current = page_id;
    while let Some(id) = current {
        if !seen.insert(id) {
            break;
        }
        let Some(page) = by_id.get(id) else {
            break;
        };
        chain.push(*page);
        current = page.parent_id.as_deref();
    }
    chain.reverse();
    chain
}

/// A page with its nested children.
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode<'a> {
    #[serde(flatten)]
    pub page: &'a Page,
    pub children: Vec<TreeNode<'a>>,
}

impl TreeNode<'_> {
    /// Number of pages in this subtree, this one included.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::size).sum::<usize>()
    }
}

/// Non-template pages arranged as a forest.
#[derive(Debug, Clone, Serialize)]
pub struct PageTree<'a> {
    pub roots: Vec<TreeNode<'a>>,
}

impl<'a> PageTree<'a> {
    /// Build the forest. Pages whose parent is missing become roots; pages
    /// caught in a parent cycle surface as roots with the cycle cut at the
    /// first member in storage order.
    pub fn build(pages: &'a [Page]) -> Self {
        let live: Vec<&Page> = pages.iter().filter(|p| !p.is_template).collect();
        let ids: HashSet<&str> = live.iter().map(|p| p.id.as_str()).collect();

        let mut kids: HashMap<&str, Vec<&Page>> = HashMap::new();
        let mut roots = Vec::new();
        for p in &live {
            match p.parent_id.as_deref() {
                Some(parent) if parent != p.id && ids.contains(parent) => {
                    kids.entry(parent).or_default().push(*p);
                }
                _ => roots.push(*p),
            }
        }

        let mut visited = HashSet::new();
        let mut tree = PageTree { roots: Vec::new() };
        for root in roots {
            if let Some(node) = Self::grow(root, &kids, &mut visited) {
                tree.roots.push(node);
            }
        }
        // Anything left is only reachable through a cycle.
        for p in &live {
            if !visited.contains(p.id.as_str()) {
                if let Some(node) = Self::grow(*p, &kids, &mut visited) {
                    tree.roots.push(node);
                }
            }
        }
        tree
    }

    fn grow(
        page: &'a Page,
        kids: &HashMap<&str, Vec<&'a Page>>,
        visited: &mut HashSet<&'a str>,
    ) -> Option<TreeNode<'a>> {
        if !visited.insert(page.id.as_str()) {
            return None;
        }
        let children = kids
            .get(page.id.as_str())
            .map(|list| {
                list.iter()
                    .filter_map(|child| Self::grow(*child, kids, visited))
                    .collect()
            })
            .unwrap_or_default();
        Some(TreeNode { page, children })
    }

    /// Total pages in the forest.
    pub fn len(&self) -> usize {
        self.roots.iter().map(TreeNode::size).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
