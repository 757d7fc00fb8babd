//! Plain-text rendering of a [`PipelineReport`] for the terminal.
use std::fmt::Write as _;

use chatter_common::format_timestamp;
use chatter_pipeline::{PipelineReport, SummaryOutcome};

pub fn render(report: &PipelineReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "== Reddit Results ==");
    match report.reddit.message() {
        Some(msg) => {
            let _ = writeln!(out, "{msg}");
        }
        None => {
            for post in &report.posts {
                let _ = writeln!(out, "\n{}", post.title.as_deref().unwrap_or(post.id.as_str()));
                let _ = writeln!(
                    out,
                    "r/{} • Score: {}",
                    post.scope.as_deref().unwrap_or("?"),
                    post.score.unwrap_or_default()
                );
                if let Some(url) = &post.url {
                    let _ = writeln!(out, "{url}");
                }
                if !post.children.is_empty() {
                    let _ = writeln!(out, "Top Comments:");
                    for (i, c) in post.children.iter().enumerate() {
                        let _ = writeln!(out, "{}. {}", i + 1, c.body);
                    }
                }
            }
        }
    }
    for w in &report.warnings {
        let _ = writeln!(out, "! {w}");
    }

    let _ = writeln!(out, "\n== Twitter Results ==");
    if report.tweets.is_empty() {
        let _ = writeln!(out, "No tweets found.");
    }
    for (i, tweet) in report.tweets.iter().enumerate() {
        let _ = writeln!(out, "\nTweet #{}", i + 1);
        let _ = writeln!(out, "{}", format_timestamp(tweet.created_at));
        let _ = writeln!(out, "{}", tweet.body);
    }

    match &report.summary {
        SummaryOutcome::Skipped => {}
        SummaryOutcome::Done(summary) => {
            let _ = writeln!(out, "\n== Summary (AI-Generated) ==");
            let _ = writeln!(out, "{}", summary.plain_text());
        }
        SummaryOutcome::Failed(err) => {
            let _ = writeln!(out, "\n== Summary (AI-Generated) ==");
            let _ = writeln!(out, "{err}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatter_common::{ContentItem, Platform, PlatformFetchError, SearchRequest, Summary, TimeWindow};
    use chatter_pipeline::RedditOutcome;
    use chatter_pipeline::aggregate::build_blob;

    fn report(posts: Vec<ContentItem>, reddit: RedditOutcome, summary: SummaryOutcome) -> PipelineReport {
        PipelineReport {
            request: SearchRequest::new("rust", "all", TimeWindow::unbounded()),
            blob: build_blob(&posts, &[], 3000),
            posts,
            tweets: vec![ContentItem::new(Platform::Twitter, "1", "crabs", 1_756_728_000)],
            reddit,
            warnings: vec![PlatformFetchError::new(Platform::Reddit, "comments for \"A\"", "timeout")],
            summary,
        }
    }

    #[test]
    fn lists_posts_comments_and_tweets() {
        let post = ContentItem::new(Platform::Reddit, "a", "", 0)
            .with_title("A")
            .with_scope("rust")
            .with_score(3)
            .with_url("https://www.reddit.com/r/rust/comments/a/")
            .with_children(vec![ContentItem::new(Platform::Reddit, "c", "first!", 0)]);
        let text = render(&report(
            vec![post],
            RedditOutcome::Found { count: 1 },
            SummaryOutcome::Done(Summary::new("- **bold** point")),
        ));

        assert!(text.contains("r/rust • Score: 3"));
        assert!(text.contains("Top Comments:\n1. first!\n"));
        assert!(text.contains("! reddit comments for \"A\": timeout"));
        assert!(text.contains("Tweet #1\n2025-09-01 12:00:00 UTC\ncrabs\n"));
        assert!(text.ends_with("- bold point\n"));
    }

    #[test]
    fn explains_empty_reddit_and_skips_summary() {
        let text = render(&report(vec![], RedditOutcome::NoneInRange { raw: 4 }, SummaryOutcome::Skipped));
        assert!(text.contains("Posts were found, but none matched the selected date range."));
        assert!(!text.contains("Summary"));
    }
}
