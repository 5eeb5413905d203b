//! HTML escaping for plain-text field values.

use std::borrow::Cow;

fn entity(c: char) -> Option<&'static str> {
    Some(match c {
        '<' => "&lt;",
        '>' => "&gt;",
        '&' => "&amp;",
        '"' => "&quot;",
        '\'' => "&#39;",
        _ => return None,
    })
}

/// Escape text for an HTML body; borrows when there is nothing to escape.
pub fn escape(s: &str) -> Cow<'_, str> {
    let Some(first) = s.find(|c| entity(c).is_some()) else {
        return Cow::Borrowed(s);
    };

    let mut out = String::with_capacity(s.len() + 16);
    out.push_str(&s[..first]);
    for c in s[first..].chars() {
        match entity(c) {
            Some(e) => out.push_str(e),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("Tom & \"Jerry\" <3"), "Tom &amp; &quot;Jerry&quot; &lt;3");
        assert_eq!(escape("it's"), "it&#39;s");
    }

    #[test]
    fn test_escape_borrows_clean_input() {
        assert!(matches!(escape("plain text"), Cow::Borrowed(_)));
    }
}
