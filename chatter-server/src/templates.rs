//! Server-rendered HTML for the form UI. Every interpolated value goes
//! through [`html_escape`].
use std::fmt::Write as _;

use chatter_common::{ContentItem, format_timestamp};
use chatter_pipeline::{PipelineReport, RawQuery, SummaryOutcome};

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn build_page(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
body {{ font-family: system-ui, sans-serif; max-width: 860px; margin: 0 auto; padding: 24px; color: #222; }}
form {{ display: grid; gap: 10px; margin-bottom: 24px; }}
label {{ font-weight: 600; font-size: 14px; }}
input {{ padding: 8px; font-size: 15px; }}
button {{ padding: 10px; font-size: 15px; cursor: pointer; }}
.caption {{ color: #666; font-size: 13px; }}
.info {{ background: #e8f0fe; padding: 10px; border-radius: 4px; }}
.warning {{ background: #fff4e5; padding: 10px; border-radius: 4px; }}
.error {{ background: #fdecea; padding: 10px; border-radius: 4px; }}
.summary {{ white-space: pre-wrap; background: #edf7ed; padding: 12px; border-radius: 4px; }}
</style>
</head>
<body>
<h1>Reddit &amp; Twitter Trend Summarizer</h1>
{content}
</body>
</html>"#,
        title = html_escape(title),
    )
}

fn render_form_fields(values: &RawQuery) -> String {
    let subreddit = if values.subreddit.trim().is_empty() {
        "all"
    } else {
        values.subreddit.as_str()
    };
    format!(
        r#"<form method="post" action="/">
<label for="topic">Topic to search</label>
<input id="topic" name="topic" required value="{topic}">
<label for="subreddit">Subreddit (default: all)</label>
<input id="subreddit" name="subreddit" value="{subreddit}">
<label for="start_date">Start date</label>
<input id="start_date" name="start_date" type="date" value="{start}">
<label for="end_date">End date</label>
<input id="end_date" name="end_date" type="date" value="{end}">
<button type="submit">Fetch &amp; Summarize</button>
</form>"#,
        topic = html_escape(&values.topic),
        subreddit = html_escape(subreddit),
        start = html_escape(values.start_date.as_deref().unwrap_or_default()),
        end = html_escape(values.end_date.as_deref().unwrap_or_default()),
    )
}

/// The empty form, optionally with an error banner above it.
pub fn render_form(values: &RawQuery, error: Option<&str>) -> String {
    let mut content = String::new();
    if let Some(err) = error {
        let _ = write!(content, r#"<p class="error">{}</p>"#, html_escape(err));
    }
    content.push_str(&render_form_fields(values));
    build_page("Chatter", &content)
}

fn render_post(out: &mut String, post: &ContentItem) {
    let title = post.title.as_deref().unwrap_or(post.id.as_str());
    let _ = write!(out, "<h3>{}</h3>", html_escape(title));
    let _ = write!(
        out,
        r#"<p class="caption">r/{} &bull; Score: {}</p>"#,
        html_escape(post.scope.as_deref().unwrap_or("?")),
        post.score.unwrap_or_default()
    );
    if let Some(url) = &post.url {
        let url = html_escape(url);
        let _ = write!(out, r#"<p><a href="{url}" rel="noopener noreferrer">{url}</a></p>"#);
    }
    if !post.children.is_empty() {
        out.push_str("<p><strong>Top Comments:</strong></p><ol>");
        for comment in &post.children {
            let _ = write!(out, "<li>{}</li>", html_escape(&comment.body));
        }
        out.push_str("</ol>");
    }
}

/// Form followed by the Reddit, Twitter and summary sections.
pub fn render_results(query: &RawQuery, report: &PipelineReport) -> String {
    let mut out = render_form_fields(query);

    out.push_str("<h2>Reddit Results</h2>");
    match report.reddit.message() {
        Some(msg) => {
            let _ = write!(out, r#"<p class="info">{}</p>"#, html_escape(msg));
        }
        None => report.posts.iter().for_each(|p| render_post(&mut out, p)),
    }

    out.push_str("<h2>Twitter Results</h2>");
    if report.tweets.is_empty() {
        out.push_str(r#"<p class="warning">No tweets found.</p>"#);
    } else {
        out.push_str(r#"<p class="caption">Recent tweets are not date filtered.</p>"#);
        for (i, tweet) in report.tweets.iter().enumerate() {
            let _ = write!(
                out,
                r#"<p><strong>Tweet #{}</strong> <span class="caption">{}</span><br>{}</p>"#,
                i + 1,
                html_escape(&format_timestamp(tweet.created_at)),
                html_escape(&tweet.body)
            );
        }
    }

    if !report.warnings.is_empty() {
        out.push_str("<h2>Warnings</h2>");
        for w in report.warning_messages() {
            let _ = write!(out, r#"<p class="warning">{}</p>"#, html_escape(&w));
        }
    }

    out.push_str("<h2>Summary (AI-Generated)</h2>");
    match &report.summary {
        SummaryOutcome::Done(summary) => {
            let _ = write!(
                out,
                r#"<div class="summary">{}</div>"#,
                html_escape(&summary.plain_text())
            );
        }
        SummaryOutcome::Failed(err) => {
            let _ = write!(out, r#"<p class="error">{}</p>"#, html_escape(&err.to_string()));
        }
        SummaryOutcome::Skipped => out.push_str(r#"<p class="caption">Summary skipped.</p>"#),
    }

    build_page(&format!("Chatter: {}", report.request.topic), &out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            html_escape(r#"<b onclick="x">'&'</b>"#),
            "&lt;b onclick=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn form_echoes_values_escaped() {
        let page = render_form(
            &RawQuery {
                topic: "<script>".into(),
                ..Default::default()
            },
            Some("topic must not be empty"),
        );
        assert!(page.contains(r#"value="&lt;script&gt;""#));
        assert!(page.contains(r#"name="subreddit" value="all""#));
        assert!(page.contains("topic must not be empty"));
        assert!(!page.contains("<script>"));
    }
}
