//! Roster diffing between persisted and freshly fetched members

use std::collections::HashSet;

use crate::domain::TrackedMember;

/// Return the candidates whose id is not in `known`.
///
/// Set based: the result depends only on membership, not on the order of
/// either input. Candidates keep their relative order and a repeated
/// candidate id is only returned once.
pub fn filter_new_members<S: AsRef<str>>(
    known: &[S],
    candidates: &[TrackedMember],
) -> Vec<TrackedMember> {
    let known: HashSet<&str> = known.iter().map(|k| AsRef::<str>::as_ref(k)).collect();
    let mut emitted: HashSet<&str> = HashSet::new();

    candidates
        .iter()
        .filter(|m| !known.contains(m.external_id.as_str()))
        .filter(|m| emitted.insert(m.external_id.as_str()))
        .cloned()
        .collect()
}
