use std::collections::BTreeMap;

/// Collapses windows sharing a start to the one reported first and orders the rest by start.
///
/// The end offset is never used for ordering: `[(5, 10), (5, 7), (20, 25)]` resolves to
/// `[(5, 10), (20, 25)]`.
pub fn resolve_locations(locations: &[(usize, usize)]) -> Vec<(usize, usize)> {
    locations
        .iter()
        .fold(BTreeMap::new(), |mut first_end, &(start, end)| {
            first_end.entry(start).or_insert(end);
            first_end
        })
        .into_iter()
        .collect()
}
