//! Typed field values of content records.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::fmt;

use crate::config::FieldType;

/// Value of a record field after typing through the record's model.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Plain text (`string` and `text` fields).
    Text(String),
    /// Markdown source. Rendered to HTML when read for output.
    Markdown(String),
    /// Raw HTML markup.
    Html(String),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
    Integer(i64),
    Boolean(bool),
}

impl FieldValue {
    /// Parse the raw text of a field according to its declared type.
    ///
    /// Returns `None` when the text does not fit the type; the caller
    /// treats such fields as absent.
    pub fn parse(raw: &str, ty: FieldType) -> Option<Self> {
        let trimmed = raw.trim();
        match ty {
            FieldType::String => Some(Self::Text(trimmed.to_string())),
            FieldType::Text => Some(Self::Text(raw.to_string())),
            FieldType::Markdown => Some(Self::Markdown(raw.to_string())),
            FieldType::Html => Some(Self::Html(raw.to_string())),
            FieldType::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .map(Self::Date),
            FieldType::Datetime => parse_datetime(trimmed).map(Self::DateTime),
            FieldType::Integer => trimmed.parse().ok().map(Self::Integer),
            FieldType::Boolean => parse_bool(trimmed).map(Self::Boolean),
        }
    }

    /// Markup values are emitted as HTML without escaping.
    pub fn is_markup(&self) -> bool {
        matches!(self, Self::Markdown(_) | Self::Html(_))
    }

    /// Point in time for ordering and feed timestamps.
    ///
    /// Dates become midnight UTC. Untyped text is read as a datetime when it
    /// looks like one, so sorting and entry timestamps agree.
    pub fn as_datetime(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::DateTime(dt) => Some(*dt),
            Self::Text(s) => parse_datetime(s.trim()),
            Self::Date(date) => {
                let midnight = date.and_hms_opt(0, 0, 0)?;
                Some(Utc.from_utc_datetime(&midnight).fixed_offset())
            }
            _ => None,
        }
    }

    /// Whether the value counts as set (non-empty text, any other value).
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Text(s) | Self::Markdown(s) | Self::Html(s) => !s.trim().is_empty(),
            Self::Integer(n) => *n != 0,
            Self::Boolean(b) => *b,
            Self::Date(_) | Self::DateTime(_) => true,
        }
    }
}

impl fmt::Display for FieldValue {
    /// Source text of the value (markdown is not rendered here).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) | Self::Markdown(s) | Self::Html(s) => f.write_str(s),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::DateTime(dt) => f.write_str(&dt.to_rfc3339()),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

/// Parse `YYYY-MM-DD HH:MM[:SS]` (UTC), RFC 3339, or a bare date (midnight UTC).
fn parse_datetime(s: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| Utc.from_utc_datetime(&naive).fixed_offset())
}

pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Total order used by queries: absent < present, then by value.
///
/// Values of different kinds compare by their text.
pub fn compare(a: Option<&FieldValue>, b: Option<&FieldValue>) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (a.as_datetime(), b.as_datetime()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => match (a, b) {
                (FieldValue::Integer(x), FieldValue::Integer(y)) => x.cmp(y),
                (FieldValue::Boolean(x), FieldValue::Boolean(y)) => x.cmp(y),
                _ => a.to_string().cmp(&b.to_string()),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    #[test]
    fn test_parse_date() {
        let value = FieldValue::parse("2015-12-12", FieldType::Date).unwrap();
        assert_eq!(value, FieldValue::Date(NaiveDate::from_ymd_opt(2015, 12, 12).unwrap()));
        assert!(FieldValue::parse("12/12/2015", FieldType::Date).is_none());
    }

    #[test]
    fn test_date_becomes_midnight_utc() {
        let value = FieldValue::parse("2015-12-13", FieldType::Date).unwrap();
        let dt = value.as_datetime().unwrap();
        assert_eq!(dt.to_rfc3339(), "2015-12-13T00:00:00+00:00");
    }

    #[test]
    fn test_parse_datetime_formats() {
        let naive = FieldValue::parse("2015-12-12 12:34:56", FieldType::Datetime).unwrap();
        assert_eq!(
            naive.as_datetime().unwrap().to_rfc3339(),
            "2015-12-12T12:34:56+00:00"
        );

        let offset = FieldValue::parse("2015-12-12T12:34:56+02:00", FieldType::Datetime).unwrap();
        assert_eq!(
            offset.as_datetime().unwrap().with_timezone(&Utc).to_rfc3339(),
            "2015-12-12T10:34:56+00:00"
        );

        let bare = FieldValue::parse("2015-12-13", FieldType::Datetime).unwrap();
        assert_eq!(bare.as_datetime().unwrap().to_rfc3339(), "2015-12-13T00:00:00+00:00");

        assert!(FieldValue::parse("yesterday", FieldType::Datetime).is_none());
    }

    #[test]
    fn test_parse_scalars() {
        assert_eq!(
            FieldValue::parse(" 42 ", FieldType::Integer),
            Some(FieldValue::Integer(42))
        );
        assert_eq!(
            FieldValue::parse("yes", FieldType::Boolean),
            Some(FieldValue::Boolean(true))
        );
        assert!(FieldValue::parse("maybe", FieldType::Boolean).is_none());
    }

    #[test]
    fn test_is_markup() {
        assert!(FieldValue::Markdown("*a*".into()).is_markup());
        assert!(FieldValue::Html("<b>a</b>".into()).is_markup());
        assert!(!FieldValue::Text("a".into()).is_markup());
    }

    #[test]
    fn test_compare_absent_is_smallest() {
        let date = FieldValue::parse("2015-12-12", FieldType::Date).unwrap();
        assert_eq!(compare(None, Some(&date)), Ordering::Less);
        assert_eq!(compare(Some(&date), None), Ordering::Greater);
        assert_eq!(compare(None, None), Ordering::Equal);
    }

    #[test]
    fn test_compare_date_with_datetime() {
        let date = FieldValue::parse("2015-12-12", FieldType::Date).unwrap();
        let later = FieldValue::parse("2015-12-12 00:00:01", FieldType::Datetime).unwrap();
        assert_eq!(compare(Some(&date), Some(&later)), Ordering::Less);
    }
}
