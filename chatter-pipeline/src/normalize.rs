//! Raw user input → [`SearchRequest`].
use chatter_common::{ALL_SCOPE, SearchRequest, TimeWindow, ValidationError};
use time::macros::{format_description, time};
use time::{Date, PrimitiveDateTime};

const LAST_SECOND: time::Time = time!(23:59:59);

/// Validate and normalize a query.
///
/// Blank date strings count as absent. Dates are UTC calendar days; the end
/// day is inclusive.
pub fn normalize(
    topic: &str,
    scope: &str,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<SearchRequest, ValidationError> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(ValidationError::EmptyTopic);
    }
    let scope = normalize_scope(scope)?;

    let start = non_blank(start);
    let end = non_blank(end);
    let start_day = start.map(|s| parse_day("start", s)).transpose()?;
    let end_day = end.map(|s| parse_day("end", s)).transpose()?;

    if let (Some(s), Some(e)) = (start_day, end_day) {
        if s > e {
            return Err(ValidationError::InvertedRange {
                start: start.unwrap_or_default().to_string(),
                end: end.unwrap_or_default().to_string(),
            });
        }
    }

    let window = TimeWindow {
        start: start_day.map(|d| d.midnight().assume_utc().unix_timestamp()),
        end: end_day.map(|d| {
            PrimitiveDateTime::new(d, LAST_SECOND)
                .assume_utc()
                .unix_timestamp()
        }),
    };

    Ok(SearchRequest::new(topic, scope, window))
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_day(field: &'static str, raw: &str) -> Result<Date, ValidationError> {
    Date::parse(raw, format_description!("[year]-[month]-[day]")).map_err(|_| {
        ValidationError::InvalidDate {
            field,
            value: raw.to_string(),
        }
    })
}

fn normalize_scope(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    let name = trimmed
        .strip_prefix("r/")
        .or_else(|| trimmed.strip_prefix("/r/"))
        .unwrap_or(trimmed);
    if name.is_empty() {
        return Ok(ALL_SCOPE.to_string());
    }
    if name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(name.to_string())
    } else {
        Err(ValidationError::InvalidScope(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_scope_and_leaves_window_open() {
        let req = normalize("  rust ", "", None, Some("   ")).unwrap();
        assert_eq!(req.topic, "rust");
        assert_eq!(req.scope, "all");
        assert!(req.window.is_unbounded());
    }

    #[test]
    fn end_day_is_inclusive_utc() {
        let req = normalize("rust", "rust", Some("2024-01-01"), Some("2024-01-01")).unwrap();
        assert_eq!(req.window.start, Some(1_704_067_200));
        assert_eq!(req.window.end, Some(1_704_067_200 + 86_399));
    }

    #[test]
    fn single_bounds_are_carried_through() {
        let only_start = normalize("rust", "all", Some("2024-01-01"), None).unwrap();
        assert_eq!(only_start.window.start, Some(1_704_067_200));
        assert_eq!(only_start.window.end, None);

        let only_end = normalize("rust", "all", None, Some("2024-01-01")).unwrap();
        assert_eq!(only_end.window.start, None);
        assert_eq!(only_end.window.end, Some(1_704_153_599));
        assert!(only_end.window.is_unbounded());
    }

    #[test]
    fn rejects_blank_topic() {
        assert_eq!(normalize(" \t", "all", None, None), Err(ValidationError::EmptyTopic));
    }

    #[test]
    fn rejects_malformed_dates() {
        for bad in ["2024-13-01", "2024-02-30", "01/02/2024", "yesterday"] {
            match normalize("rust", "all", Some(bad), None) {
                Err(ValidationError::InvalidDate { field, value }) => {
                    assert_eq!(field, "start");
                    assert_eq!(value, bad);
                }
                other => panic!("{bad}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_inverted_range() {
        let err = normalize("rust", "all", Some("2024-02-01"), Some("2024-01-01")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvertedRange {
                start: "2024-02-01".into(),
                end: "2024-01-01".into()
            }
        );
    }

    #[test]
    fn scope_prefix_is_stripped_and_validated() {
        assert_eq!(normalize("x", "r/rust", None, None).unwrap().scope, "rust");
        assert!(matches!(
            normalize("x", "rust/../admin", None, None),
            Err(ValidationError::InvalidScope(_))
        ));
    }
}
