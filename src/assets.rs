//! Compiled-in data files.

/// Constant portion of a Daylio backup: achievements, default moods, tags,
/// tag groups, reminder, colors, writing templates and prefs. `dayEntries`
/// is absent and every timestamp is `0` until stamped by the builder.
pub const DAYLIO_SKELETON_JSON: &str = include_str!("../assets/daylio_skeleton.json");
