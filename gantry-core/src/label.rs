//! Task label policy
//!
//! Display names on the build server carry environment tags that make the
//! same logical job look different across pipelines. Labels drop them.

use crate::domain::ReferenceDate;

/// Tag substrings removed from display names
pub const STRIPPED_TAGS: [&str; 4] = ["[POC]", "[A]", "[B]", "[ATCM]"];

/// Remove every occurrence of every stripped tag
///
/// Repeats until stable, so removing one tag can never leave another behind
/// (`"[[B]A]"` strips to `""`).
pub fn strip_tags(display_name: &str) -> String {
    let mut name = display_name.to_string();
    loop {
        let stripped = STRIPPED_TAGS
            .iter()
            .fold(name.clone(), |acc, tag| acc.replace(tag, ""));
        if stripped == name {
            return name;
        }
        name = stripped;
    }
}

/// Row label for a work item on a reference date
pub fn task_label(display_name: &str, date: ReferenceDate) -> String {
    let mut label = strip_tags(display_name);
    label.push_str(&date.label_suffix());
    label
}
