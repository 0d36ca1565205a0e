//! Frequency ranking of categorical tags.

use crate::{LogEntry, Tag, TagField, TimeWindow};
use serde::Serialize;
use std::collections::HashMap;

/// Default number of tags a ranking returns
pub const DEFAULT_TOP_N: usize = 3;

/// A tag and how often it occurred
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: Tag,
    pub count: u32,
}

/// Count every occurrence of `field` tags in `window`, most frequent first
///
/// Ties keep the order in which tags were first seen walking entries
/// chronologically, so the ranking is independent of input order.
pub fn tag_counts(entries: &[LogEntry], window: &TimeWindow, field: TagField) -> Vec<TagCount> {
    let mut counts: Vec<TagCount> = Vec::new();
    let mut index: HashMap<&Tag, usize> = HashMap::new();

    for entry in window.entries_within(entries) {
        for tag in entry.tags(field) {
            match index.get(tag) {
                Some(&i) => counts[i].count += 1,
                None => {
                    index.insert(tag, counts.len());
                    counts.push(TagCount {
                        tag: tag.clone(),
                        count: 1,
                    });
                }
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Top `top_n` tags of `field` in `window`
pub fn rank_tags(
    entries: &[LogEntry],
    window: &TimeWindow,
    field: TagField,
    top_n: usize,
) -> Vec<Tag> {
    let ranked: Vec<Tag> = tag_counts(entries, window, field)
        .into_iter()
        .take(top_n)
        .map(|tc| tc.tag)
        .collect();

    tracing::trace!(?field, ranked = ranked.len(), "ranked tags");
    ranked
}
