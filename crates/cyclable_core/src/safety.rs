use crate::tags::Tags;

static SEPARATED_CYCLEWAY_KEYS: [&str; 4] =
    ["cycleway", "cycleway:left", "cycleway:right", "cycleway:both"];

static SEPARATED_CYCLEWAY_VALUES: [&str; 3] = ["track", "opposite_track", "separate"];

static SHARED_WITH_PEDESTRIANS: [&str; 2] = ["living_street", "pedestrian"];

static DESIGNATED_PATHS: [&str; 5] = ["path", "footway", "track", "service", "busway"];

/// Whether a stretch is a physically separated or bike-prioritized facility.
///
/// This is the only safety rule of the crate: segment annotation and score
/// aggregation both go through it. Missing or unknown tags are unsafe.
pub fn is_safe_path(tags: &Tags) -> bool {
    // https://wiki.openstreetmap.org/wiki/Tag:highway%3Dcycleway
    if tags.has_tag("highway", "cycleway") {
        return true;
    }

    // https://wiki.openstreetmap.org/wiki/Key:bicycle_road
    if tags.has_tag("bicycle_road", "yes") || tags.has_tag("cyclestreet", "yes") {
        return true;
    }

    if SEPARATED_CYCLEWAY_KEYS
        .iter()
        .any(|key| tags.has_any(key, &SEPARATED_CYCLEWAY_VALUES))
    {
        return true;
    }

    match tags.get("highway") {
        Some(highway) if SHARED_WITH_PEDESTRIANS.contains(&highway) => {
            tags.has_any("bicycle", &["yes", "designated"])
        }
        Some(highway) if DESIGNATED_PATHS.contains(&highway) => {
            tags.has_tag("bicycle", "designated")
        }
        _ => false,
    }
}
