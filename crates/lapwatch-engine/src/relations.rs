//! Relation sets for selective highlighting.
//!
//! Selecting an interval in a viewer should keep visible exactly the
//! intervals on the same lineage. For a timeline `A` that is the union of the
//! ancestor chains of every timeline whose chain passes through `A`: `A`
//! itself, all of its ancestors, and all of its descendants together with
//! their ancestors.

use std::collections::BTreeSet;

use crate::timeline::Timeline;

/// Parent index of every timeline.
///
/// Explicit parent indices are used when present. Otherwise the parent is
/// recovered from the pre-order nesting levels: the nearest earlier entry one
/// level up.
pub fn parent_indices(timelines: &[Timeline]) -> Vec<Option<usize>> {
    let mut open: Vec<usize> = Vec::new();
    timelines
        .iter()
        .enumerate()
        .map(|(index, timeline)| {
            open.truncate(timeline.nest_level);
            let inferred = open.last().copied();
            open.push(index);
            timeline
                .parent
                .filter(|&parent| parent < index)
                .or(inferred)
        })
        .collect()
}

/// `index` and all of its ancestors.
pub fn ancestor_chain(parents: &[Option<usize>], index: usize) -> BTreeSet<usize> {
    let mut chain = BTreeSet::new();
    let mut current = Some(index);
    while let Some(i) = current {
        // Parents always point backwards, so the walk terminates.
        if !chain.insert(i) {
            break;
        }
        current = parents.get(i).copied().flatten().filter(|&p| p < i);
    }
    chain
}

/// Relation set of every timeline, indexed like the input sequence.
pub fn relations(timelines: &[Timeline]) -> Vec<BTreeSet<usize>> {
    let parents = parent_indices(timelines);
    let mut relations = vec![BTreeSet::new(); timelines.len()];

    for index in 0..timelines.len() {
        let chain = ancestor_chain(&parents, index);
        for &member in &chain {
            relations[member].extend(chain.iter().copied());
        }
    }

    relations
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn timeline(name: &str, nest_level: usize, parent: Option<usize>) -> Timeline {
        Timeline {
            name: name.to_string(),
            tid: 1,
            duration: Duration::from_millis(10),
            relative_start: Duration::ZERO,
            timed_out: false,
            nest_level,
            parent,
        }
    }

    /// root -> a -> a1, root -> b -> b1
    fn tree(with_parents: bool) -> Vec<Timeline> {
        let parent = |p: usize| if with_parents { Some(p) } else { None };
        vec![
            timeline("root", 0, None),
            timeline("a", 1, parent(0)),
            timeline("a1", 2, parent(1)),
            timeline("b", 1, parent(0)),
            timeline("b1", 2, parent(3)),
        ]
    }

    fn set(items: &[usize]) -> BTreeSet<usize> {
        items.iter().copied().collect()
    }

    #[test]
    fn test_parent_indices_are_inferred_from_levels() {
        let explicit = parent_indices(&tree(true));
        let inferred = parent_indices(&tree(false));
        assert_eq!(explicit, vec![None, Some(0), Some(1), Some(0), Some(3)]);
        assert_eq!(explicit, inferred);
    }

    #[test]
    fn test_ancestor_chain() {
        let parents = parent_indices(&tree(true));
        assert_eq!(ancestor_chain(&parents, 0), set(&[0]));
        assert_eq!(ancestor_chain(&parents, 2), set(&[0, 1, 2]));
        assert_eq!(ancestor_chain(&parents, 4), set(&[0, 3, 4]));
    }

    #[test]
    fn test_relations() {
        let relations = relations(&tree(true));
        assert_eq!(relations[0], set(&[0, 1, 2, 3, 4]));
        assert_eq!(relations[1], set(&[0, 1, 2]));
        assert_eq!(relations[2], set(&[0, 1, 2]));
        assert_eq!(relations[3], set(&[0, 3, 4]));
        assert_eq!(relations[4], set(&[0, 3, 4]));
    }

    #[test]
    fn test_relations_without_parent_refs_match() {
        assert_eq!(relations(&tree(false)), relations(&tree(true)));
    }

    #[test]
    fn test_relations_contain_self_and_ancestors() {
        let timelines = tree(true);
        let parents = parent_indices(&timelines);
        let relations = relations(&timelines);
        for (index, related) in relations.iter().enumerate() {
            assert!(related.contains(&index));
            assert!(ancestor_chain(&parents, index).is_subset(related));
        }
    }

    #[test]
    fn test_relations_of_empty_sequence() {
        assert!(relations(&[]).is_empty());
    }
}
