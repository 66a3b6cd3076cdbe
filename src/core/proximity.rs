use crate::core::distance::distance_between;
use crate::models::{GeoPoint, Locatable};

/// Find the candidates closest to a reference point.
///
/// Computes the haversine distance from `reference` to every candidate,
/// keeps only those within `radius_m`, orders them ascending by distance
/// (ties keep their input order), and returns at most `limit` entries.
///
/// Pure function of its inputs: an empty candidate list yields an empty
/// result, never an error.
///
/// # Arguments
/// * `reference` - Point to measure from (e.g. the chosen restaurant)
/// * `candidates` - Entities to rank
/// * `radius_m` - Inclusive distance cutoff in meters
/// * `limit` - Maximum number of entries to return
pub fn find_nearby<T: Locatable>(
    reference: GeoPoint,
    candidates: Vec<T>,
    radius_m: f64,
    limit: usize,
) -> Vec<T> {
    let mut ranked: Vec<(T, f64)> = candidates
        .into_iter()
        .map(|candidate| {
            let distance = distance_between(reference, candidate.coordinate());
            (candidate, distance)
        })
        .filter(|(_, distance)| *distance <= radius_m)
        .collect();

    // Vec::sort_by is stable, so equidistant candidates keep input order
    ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(limit);

    ranked.into_iter().map(|(candidate, _)| candidate).collect()
}

/// Rank all items ascending by distance from a reference point.
///
/// Same distance function as [`find_nearby`], but no radius filter and no
/// truncation. Used to order the full restaurant catalog around the
/// current device location.
pub fn sort_by_distance<T: Locatable>(reference: GeoPoint, items: Vec<T>) -> Vec<T> {
    let mut ranked: Vec<(T, f64)> = items
        .into_iter()
        .map(|item| {
            let distance = distance_between(reference, item.coordinate());
            (item, distance)
        })
        .collect();

    ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    ranked.into_iter().map(|(item, _)| item).collect()
}
