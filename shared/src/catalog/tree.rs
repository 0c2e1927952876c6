//! Category hierarchy: forest construction and descendant resolution
//!
//! The parent graph is read from storage as-is. It may contain dangling
//! parent references (the parent was deleted) and, for data written before the
//! write-time cycle guard existed, cycles. Every traversal here keeps a visited
//! set, so malformed input degrades into a well-formed forest instead of
//! looping.

use std::collections::{HashMap, HashSet, VecDeque};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::Category;

/// What to do with a category whose `parent_id` points to no known category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanPolicy {
    /// Show the orphan (and its subtree) as a root category
    #[default]
    PromoteToRoot,
    /// Leave the orphan and its whole subtree out of the forest
    Drop,
}

impl FromStr for OrphanPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "promote" | "promote_to_root" | "root" => Ok(Self::PromoteToRoot),
            "drop" | "exclude" => Ok(Self::Drop),
            other => Err(format!("unknown orphan policy: {other}")),
        }
    }
}

/// A category with its children resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    /// Number of nodes in this subtree, self included
    pub fn len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(&node.children);
        }
        count
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

// Unlinks descendants on the heap so a long parent chain does not drop
// recursively.
impl Drop for CategoryNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Result of [`build_forest`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forest {
    pub roots: Vec<CategoryNode>,
    /// Categories whose parent reference did not resolve
    pub orphans: Vec<i64>,
    /// Categories left out under [`OrphanPolicy::Drop`]
    pub dropped: Vec<i64>,
    /// Categories promoted to root to break a parent cycle
    pub cycles: Vec<i64>,
}

impl Forest {
    /// Total number of categories placed in the forest
    pub fn len(&self) -> usize {
        self.roots.iter().map(CategoryNode::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Depth-first, pre-order walk over every placed category
    pub fn iter(&self) -> impl Iterator<Item = &CategoryNode> {
        let mut stack: Vec<&CategoryNode> = self.roots.iter().rev().collect();
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Find a placed category node by id
    pub fn find(&self, id: i64) -> Option<&CategoryNode> {
        self.iter().find(|node| node.category.id == id)
    }
}

/// Build the category forest from a flat list.
///
/// Sibling order follows input order. Under [`OrphanPolicy::PromoteToRoot`]
/// every input category appears exactly once in the result: roots are the
/// categories without parent, the orphans, and (last, in input order) one
/// member of each parent cycle.
pub fn build_forest(categories: Vec<Category>, policy: OrphanPolicy) -> Forest {
    let n = categories.len();

    let mut position: HashMap<i64, usize> = HashMap::with_capacity(n);
    for (i, category) in categories.iter().enumerate() {
        position.entry(category.id).or_insert(i);
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut entry_points = Vec::new();
    let mut orphan_positions = Vec::new();

    for (i, category) in categories.iter().enumerate() {
        match category.parent_id {
            None => entry_points.push(i),
            Some(parent_id) => match position.get(&parent_id) {
                Some(&parent) => children[parent].push(i),
                None => {
                    orphan_positions.push(i);
                    if policy == OrphanPolicy::PromoteToRoot {
                        entry_points.push(i);
                    }
                }
            },
        }
    }

    let mut forest = Forest {
        orphans: orphan_positions.iter().map(|&i| categories[i].id).collect(),
        ..Forest::default()
    };

    let mut slots: Vec<Option<Category>> = categories.into_iter().map(Some).collect();
    let mut placed = vec![false; n];

    for i in entry_points {
        if let Some(node) = assemble(i, &children, &mut slots, &mut placed) {
            forest.roots.push(node);
        }
    }

    if policy == OrphanPolicy::Drop {
        for i in orphan_positions {
            let mut stack = vec![i];
            while let Some(current) = stack.pop() {
                if std::mem::replace(&mut placed[current], true) {
                    continue;
                }
                if let Some(category) = slots[current].take() {
                    forest.dropped.push(category.id);
                }
                stack.extend(children[current].iter().rev());
            }
        }
    }

    // Whatever is left is only reachable through a parent cycle
    for i in 0..n {
        if placed[i] {
            continue;
        }
        if let Some(node) = assemble(i, &children, &mut slots, &mut placed) {
            tracing::warn!(
                category_id = node.category.id,
                parent_id = ?node.category.parent_id,
                "Category parent cycle detected, promoting to root"
            );
            forest.cycles.push(node.category.id);
            forest.roots.push(node);
        }
    }

    forest
}

/// Build the subtree rooted at `root` without recursion.
///
/// Positions are marked as placed on first visit, so a child that was already
/// reached through a cycle is skipped. Children keep input order.
fn assemble(
    root: usize,
    children: &[Vec<usize>],
    slots: &mut [Option<Category>],
    placed: &mut [bool],
) -> Option<CategoryNode> {
    if std::mem::replace(&mut placed[root], true) {
        return None;
    }

    // (position, next child to visit, finished children)
    let mut stack: Vec<(usize, usize, Vec<CategoryNode>)> =
        vec![(root, 0, Vec::with_capacity(children[root].len()))];

    loop {
        let (index, cursor, _) = stack.last_mut()?;
        if let Some(&child) = children[*index].get(*cursor) {
            *cursor += 1;
            if !std::mem::replace(&mut placed[child], true) {
                stack.push((child, 0, Vec::with_capacity(children[child].len())));
            }
            continue;
        }

        let (index, _, nodes) = stack.pop()?;
        let node = slots[index].take().map(|category| CategoryNode {
            category,
            children: nodes,
        });
        match stack.last_mut() {
            Some((_, _, siblings)) => siblings.extend(node),
            None => return node,
        }
    }
}

/// Resolve `root_id` and all of its descendants.
///
/// If `root_id` is not among `categories` the result is `{root_id}`.
/// Terminates on cyclic input.
pub fn resolve_descendant_ids(root_id: i64, categories: &[Category]) -> HashSet<i64> {
    CategoryIndex::new(categories).descendant_ids(root_id)
}

/// Read-only lookup structure over one category snapshot
#[derive(Debug)]
pub struct CategoryIndex<'a> {
    categories: &'a [Category],
    by_id: HashMap<i64, usize>,
    by_slug: HashMap<&'a str, usize>,
    children: HashMap<i64, Vec<i64>>,
}

impl<'a> CategoryIndex<'a> {
    pub fn new(categories: &'a [Category]) -> Self {
        let mut by_id = HashMap::with_capacity(categories.len());
        let mut by_slug = HashMap::with_capacity(categories.len());
        let mut children: HashMap<i64, Vec<i64>> = HashMap::new();

        for (i, category) in categories.iter().enumerate() {
            by_id.entry(category.id).or_insert(i);
            by_slug.entry(category.slug.as_str()).or_insert(i);
            if let Some(parent_id) = category.parent_id {
                children.entry(parent_id).or_default().push(category.id);
            }
        }

        Self {
            categories,
            by_id,
            by_slug,
            children,
        }
    }

    pub fn get(&self, id: i64) -> Option<&'a Category> {
        self.by_id.get(&id).map(|&i| &self.categories[i])
    }

    pub fn contains(&self, id: i64) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&'a Category> {
        self.by_slug.get(slug).map(|&i| &self.categories[i])
    }

    /// Resolve a storefront category reference.
    ///
    /// A numeric reference is tried as an id first, then as a slug (slugs
    /// like `"2024"` are legal).
    pub fn find_by_ref(&self, reference: &str) -> Option<&'a Category> {
        let reference = reference.trim();
        reference
            .parse::<i64>()
            .ok()
            .and_then(|id| self.get(id))
            .or_else(|| self.find_by_slug(reference))
    }

    /// Direct children ids in input order
    pub fn child_ids(&self, id: i64) -> &[i64] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `root_id` plus every category reachable through parent→child links
    pub fn descendant_ids(&self, root_id: i64) -> HashSet<i64> {
        let mut visited = HashSet::from([root_id]);
        if !self.contains(root_id) {
            return visited;
        }

        let mut queue = VecDeque::from([root_id]);
        while let Some(current) = queue.pop_front() {
            for &child in self.child_ids(current) {
                if visited.insert(child) {
                    queue.push_back(child);
                }
            }
        }
        visited
    }

    /// Ancestor ids of `id`, nearest first. Stops at a missing parent or when
    /// a cycle is hit.
    pub fn ancestor_ids(&self, id: i64) -> Vec<i64> {
        let mut chain = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut current = self.get(id).and_then(|c| c.parent_id);
        while let Some(parent_id) = current {
            if !seen.insert(parent_id) {
                break;
            }
            chain.push(parent_id);
            current = self.get(parent_id).and_then(|c| c.parent_id);
        }
        chain
    }

    /// Levels in the subtree rooted at `id`, `id` itself counting as one
    pub fn subtree_height(&self, id: i64) -> usize {
        let mut visited = HashSet::from([id]);
        let mut level = vec![id];
        let mut height = 0;
        while !level.is_empty() {
            height += 1;
            level = level
                .iter()
                .flat_map(|&current| self.child_ids(current))
                .copied()
                .filter(|&child| visited.insert(child))
                .collect();
        }
        height
    }

    /// Whether making `parent_id` the parent of `category_id` closes a cycle
    pub fn would_create_cycle(&self, category_id: i64, parent_id: i64) -> bool {
        parent_id == category_id || self.ancestor_ids(parent_id).contains(&category_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(id: i64, parent_id: Option<i64>) -> Category {
        Category {
            id,
            name: format!("Category {id}"),
            slug: format!("category-{id}"),
            parent_id,
            image: None,
            description: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn root_ids(forest: &Forest) -> Vec<i64> {
        forest.roots.iter().map(|n| n.category.id).collect()
    }

    fn child_ids(node: &CategoryNode) -> Vec<i64> {
        node.children.iter().map(|n| n.category.id).collect()
    }

    #[test]
    fn test_build_forest_nests_children() {
        // A(1) <- B(2) <- C(3), D(4) root
        let forest = build_forest(
            vec![cat(3, Some(2)), cat(1, None), cat(2, Some(1)), cat(4, None)],
            OrphanPolicy::default(),
        );

        assert_eq!(root_ids(&forest), vec![1, 4]);
        let a = forest.find(1).unwrap();
        assert_eq!(child_ids(a), vec![2]);
        assert_eq!(child_ids(forest.find(2).unwrap()), vec![3]);
        assert!(forest.find(3).unwrap().is_leaf());
        assert_eq!(forest.len(), 4);
        assert!(forest.orphans.is_empty());
        assert!(forest.cycles.is_empty());
    }

    #[test]
    fn test_sibling_order_follows_input() {
        let forest = build_forest(
            vec![cat(1, None), cat(5, Some(1)), cat(3, Some(1)), cat(4, Some(1))],
            OrphanPolicy::PromoteToRoot,
        );
        assert_eq!(child_ids(&forest.roots[0]), vec![5, 3, 4]);
    }

    #[test]
    fn test_orphan_promoted_to_root() {
        // D's parent 999 does not exist
        let forest = build_forest(
            vec![cat(1, None), cat(4, Some(999)), cat(5, Some(4))],
            OrphanPolicy::PromoteToRoot,
        );
        assert_eq!(root_ids(&forest), vec![1, 4]);
        assert_eq!(child_ids(forest.find(4).unwrap()), vec![5]);
        assert_eq!(forest.orphans, vec![4]);
        assert_eq!(forest.len(), 3);
    }

    #[test]
    fn test_orphan_dropped_with_subtree() {
        let forest = build_forest(
            vec![cat(1, None), cat(4, Some(999)), cat(5, Some(4)), cat(6, Some(1))],
            OrphanPolicy::Drop,
        );
        assert_eq!(root_ids(&forest), vec![1]);
        assert_eq!(forest.len(), 2);
        assert_eq!(forest.orphans, vec![4]);
        assert_eq!(forest.dropped, vec![4, 5]);
        assert!(forest.cycles.is_empty());
    }

    #[test]
    fn test_self_parent_is_placed_once() {
        let forest = build_forest(vec![cat(1, Some(1)), cat(2, None)], OrphanPolicy::default());
        assert_eq!(root_ids(&forest), vec![2, 1]);
        assert!(forest.find(1).unwrap().is_leaf());
        assert_eq!(forest.cycles, vec![1]);
        assert_eq!(forest.len(), 2);
    }

    #[test]
    fn test_two_node_cycle_with_hanging_child() {
        // 1 -> 2 -> 1, and 3 hangs below 2
        let forest = build_forest(
            vec![cat(1, Some(2)), cat(2, Some(1)), cat(3, Some(2))],
            OrphanPolicy::default(),
        );
        assert_eq!(root_ids(&forest), vec![1]);
        assert_eq!(child_ids(&forest.roots[0]), vec![2]);
        assert_eq!(child_ids(forest.find(2).unwrap()), vec![3]);
        assert_eq!(forest.cycles, vec![1]);
        assert_eq!(forest.len(), 3);
    }

    #[test]
    fn test_every_category_appears_exactly_once() {
        let input = vec![
            cat(1, None),
            cat(2, Some(1)),
            cat(3, Some(2)),
            cat(4, Some(42)),
            cat(5, Some(6)),
            cat(6, Some(5)),
            cat(7, Some(7)),
            cat(8, Some(4)),
        ];
        let forest = build_forest(input.clone(), OrphanPolicy::PromoteToRoot);

        let mut seen: Vec<i64> = forest.iter().map(|n| n.category.id).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 2, 3, 4, 5, 6, 7, 8]);

        // Resolvable parents are honoured unless the parent link closes a cycle
        for category in &input {
            let Some(parent_id) = category.parent_id else {
                continue;
            };
            if input.iter().any(|c| c.id == parent_id) && !forest.cycles.contains(&category.id) {
                let parent = forest.find(parent_id).unwrap();
                assert!(child_ids(parent).contains(&category.id));
                assert!(!root_ids(&forest).contains(&category.id));
            }
        }
    }

    #[test]
    fn test_deep_chain_is_built_iteratively() {
        const DEPTH: i64 = 10_000;
        let input: Vec<Category> = (0..DEPTH)
            .map(|id| cat(id, (id > 0).then_some(id - 1)))
            .collect();

        let forest = build_forest(input, OrphanPolicy::default());

        assert_eq!(root_ids(&forest), vec![0]);
        assert_eq!(forest.len(), DEPTH as usize);
        assert_eq!(forest.roots[0].len(), DEPTH as usize);
        assert!(forest.find(DEPTH - 1).unwrap().is_leaf());
        assert_eq!(forest.iter().last().map(|n| n.category.id), Some(DEPTH - 1));
        assert!(forest.cycles.is_empty());
    }

    #[test]
    fn test_deep_cycle_is_built_iteratively() {
        // 0 -> 1 -> ... -> n-1 -> 0
        const LEN: i64 = 10_000;
        let input: Vec<Category> = (0..LEN).map(|id| cat(id, Some((id + 1) % LEN))).collect();

        let forest = build_forest(input, OrphanPolicy::default());

        assert_eq!(root_ids(&forest), vec![0]);
        assert_eq!(forest.cycles, vec![0]);
        assert_eq!(forest.len(), LEN as usize);
        assert_eq!(child_ids(&forest.roots[0]), vec![LEN - 1]);
    }

    #[test]
    fn test_subtree_height() {
        let categories = vec![
            cat(1, None),
            cat(2, Some(1)),
            cat(3, Some(2)),
            cat(4, Some(1)),
            cat(5, Some(6)),
            cat(6, Some(5)),
        ];
        let index = CategoryIndex::new(&categories);

        assert_eq!(index.subtree_height(1), 3);
        assert_eq!(index.subtree_height(3), 1);
        assert_eq!(index.subtree_height(5), 2);
        assert_eq!(index.subtree_height(99), 1);
    }

    #[test]
    fn test_empty_input() {
        let forest = build_forest(Vec::new(), OrphanPolicy::default());
        assert!(forest.is_empty());
        assert_eq!(forest.len(), 0);
    }

    #[test]
    fn test_resolve_descendants_chain() {
        let categories = vec![cat(1, None), cat(2, Some(1)), cat(3, Some(2)), cat(4, None)];
        assert_eq!(
            resolve_descendant_ids(1, &categories),
            HashSet::from([1, 2, 3])
        );
        assert_eq!(resolve_descendant_ids(3, &categories), HashSet::from([3]));
        assert_eq!(resolve_descendant_ids(4, &categories), HashSet::from([4]));
    }

    #[test]
    fn test_resolve_descendants_unknown_root() {
        // Dangling children of a missing root are not pulled in
        let categories = vec![cat(1, None), cat(2, Some(99))];
        assert_eq!(resolve_descendant_ids(99, &categories), HashSet::from([99]));
    }

    #[test]
    fn test_resolve_descendants_terminates_on_cycle() {
        let categories = vec![cat(1, Some(3)), cat(2, Some(1)), cat(3, Some(2)), cat(4, Some(4))];
        assert_eq!(
            resolve_descendant_ids(1, &categories),
            HashSet::from([1, 2, 3])
        );
        assert_eq!(resolve_descendant_ids(4, &categories), HashSet::from([4]));
    }

    #[test]
    fn test_descendants_superset_of_descendant_sets() {
        let categories = vec![
            cat(1, None),
            cat(2, Some(1)),
            cat(3, Some(1)),
            cat(4, Some(2)),
            cat(5, Some(4)),
        ];
        let index = CategoryIndex::new(&categories);
        let top = index.descendant_ids(1);
        for id in &top {
            assert!(index.descendant_ids(*id).is_subset(&top));
        }
    }

    #[test]
    fn test_find_by_ref() {
        let mut numeric_slug = cat(2, None);
        numeric_slug.slug = "2024".to_string();
        let categories = vec![cat(1, None), numeric_slug];
        let index = CategoryIndex::new(&categories);

        assert_eq!(index.find_by_ref("1").map(|c| c.id), Some(1));
        assert_eq!(index.find_by_ref("category-1").map(|c| c.id), Some(1));
        assert_eq!(index.find_by_ref("2024").map(|c| c.id), Some(2));
        assert!(index.find_by_ref("missing").is_none());
    }

    #[test]
    fn test_would_create_cycle() {
        let categories = vec![cat(1, None), cat(2, Some(1)), cat(3, Some(2))];
        let index = CategoryIndex::new(&categories);

        assert!(index.would_create_cycle(1, 3));
        assert!(index.would_create_cycle(2, 2));
        assert!(!index.would_create_cycle(3, 1));
        assert!(!index.would_create_cycle(1, 99));
        assert_eq!(index.ancestor_ids(3), vec![2, 1]);
    }

    #[test]
    fn test_orphan_policy_from_str() {
        assert_eq!("promote".parse::<OrphanPolicy>(), Ok(OrphanPolicy::PromoteToRoot));
        assert_eq!("DROP".parse::<OrphanPolicy>(), Ok(OrphanPolicy::Drop));
        assert!("keep".parse::<OrphanPolicy>().is_err());
    }

    #[test]
    fn test_forest_serializes_flattened_nodes() {
        let forest = build_forest(vec![cat(1, None), cat(2, Some(1))], OrphanPolicy::default());
        let json = serde_json::to_value(&forest).unwrap();
        assert_eq!(json["roots"][0]["slug"], "category-1");
        assert_eq!(json["roots"][0]["children"][0]["id"], 2);
    }
}
