use chatter_common::{ContentItem, TimeWindow};
use serde::Serialize;

/// What the forum search produced once the window was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RedditOutcome {
    Found { count: usize },
    /// Posts came back but every one fell outside the window.
    NoneInRange { raw: usize },
    NoResults,
}

impl RedditOutcome {
    /// User-facing explanation for the empty cases.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            RedditOutcome::Found { .. } => None,
            RedditOutcome::NoneInRange { .. } => {
                Some("Posts were found, but none matched the selected date range.")
            }
            RedditOutcome::NoResults => Some("No Reddit posts found for this topic."),
        }
    }
}

/// Keep the items created inside `window`, preserving order.
pub fn filter_by_window(items: Vec<ContentItem>, window: &TimeWindow) -> (Vec<ContentItem>, RedditOutcome) {
    let raw = items.len();
    if raw == 0 {
        return (items, RedditOutcome::NoResults);
    }

    let kept: Vec<ContentItem> = items
        .into_iter()
        .filter(|item| window.contains(item.created_at))
        .collect();

    let outcome = if kept.is_empty() {
        RedditOutcome::NoneInRange { raw }
    } else {
        RedditOutcome::Found { count: kept.len() }
    };
    (kept, outcome)
}
