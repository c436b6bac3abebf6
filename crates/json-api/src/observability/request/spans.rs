//! Route names for spans and metrics.

use uuid::Uuid;

/// Replace identifier segments with `{uuid}` so routes stay low-cardinality.
pub(super) fn normalise_path(path: &str) -> String {
    let segments: Vec<&str> = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            if Uuid::parse_str(segment).is_ok() {
                "{uuid}"
            } else {
                segment
            }
        })
        .collect();

    format!("/{}", segments.join("/"))
}
