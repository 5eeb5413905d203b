//! Parser for `contents.lr` record files.
//!
//! ```text
//! title: Post 1
//! ---
//! pub_date: 2015-12-12
//! ---
//! body:
//!
//! Multi-line *markdown* body.
//! ```
//!
//! Blocks are separated by a line of exactly `---`. A line of four or more
//! dashes inside a value is unescaped by dropping one dash.

/// Parse record source into `(key, raw value)` pairs in file order.
///
/// Blocks without a `key:` line are skipped.
pub fn parse(source: &str) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for line in source.lines() {
        if line.trim_end() == "---" {
            push_block(&block, &mut fields);
            block.clear();
        } else {
            block.push(line);
        }
    }
    push_block(&block, &mut fields);

    fields
}

fn push_block(lines: &[&str], fields: &mut Vec<(String, String)>) {
    // Skip blank lines before the key
    let mut lines = lines.iter().skip_while(|line| line.trim().is_empty());
    let Some(head) = lines.next() else {
        return;
    };
    let Some((key, inline)) = head.split_once(':') else {
        return;
    };
    let key = key.trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return;
    }

    let rest: Vec<String> = lines.map(|line| unescape_dashes(line)).collect();
    let value = if rest.is_empty() {
        inline.trim().to_string()
    } else {
        let mut body: Vec<&str> = Vec::with_capacity(rest.len() + 1);
        let inline = inline.trim();
        let mut rest = rest.iter().map(String::as_str).peekable();
        if inline.is_empty() {
            // One blank line separates the key from a multi-line value
            if rest.peek().is_some_and(|line| line.trim().is_empty()) {
                rest.next();
            }
        } else {
            body.push(inline);
        }
        body.extend(rest);
        body.join("\n").trim_end().to_string()
    };

    fields.push((key.to_string(), value));
}

/// `----` -> `---`, `-----` -> `----`; other lines untouched.
fn unescape_dashes(line: &str) -> String {
    let trimmed = line.trim_end();
    if trimmed.len() >= 4 && trimmed.bytes().all(|b| b == b'-') {
        trimmed[1..].to_string()
    } else {
        line.to_string()
    }
}
