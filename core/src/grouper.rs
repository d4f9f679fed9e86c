use crate::hit::Group;
use crate::hit::Hit;

/// Buckets ranked hits by category and imposes a deterministic order on
/// both levels: items by id ascending within each group, groups by
/// category ascending. The output is therefore identical for every
/// permutation of the same input multiset.
///
/// Duplicate ids are passed through untouched; they are a caller error,
/// not a grouping concern. An empty input yields an empty (not absent)
/// group list.
pub fn group_hits(hits: Vec<Hit>) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    for hit in hits {
        match groups.iter_mut().find(|g| g.category == hit.category) {
            Some(group) => {
                group.items.push(hit);
                group.items.sort_by(|a, b| a.id.cmp(&b.id));
            }
            None => groups.push(Group {
                category: hit.category.clone(),
                items: vec![hit],
            }),
        }
    }
    groups.sort_by(|a, b| a.category.cmp(&b.category));
    groups
}
