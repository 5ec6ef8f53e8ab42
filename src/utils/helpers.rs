//! Helper utility functions

/// Check whether a server address already carries an explicit http(s) scheme
pub fn has_http_scheme(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Prefix `https://` onto addresses typed without a scheme
pub fn ensure_scheme(address: &str) -> String {
    if has_http_scheme(address) {
        address.to_string()
    } else {
        format!("https://{}", address)
    }
}

/// Group digits by thousands the way the en-US locale does (`12345` -> `12,345`)
pub fn format_grouped(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    grouped
}

/// Collapse runs of whitespace into single spaces and trim the ends
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decode the handful of HTML entities that show up in scraped counters and labels
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_scheme() {
        assert_eq!(ensure_scheme("example.com/api"), "https://example.com/api");
        assert_eq!(ensure_scheme("http://localhost:5003/analyze"), "http://localhost:5003/analyze");
        assert_eq!(ensure_scheme("https://example.com"), "https://example.com");
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(0), "0");
        assert_eq!(format_grouped(999), "999");
        assert_eq!(format_grouped(1000), "1,000");
        assert_eq!(format_grouped(12345), "12,345");
        assert_eq!(format_grouped(1234567), "1,234,567");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("\n   Rust\n   95.1%  "), "Rust 95.1%");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("C&amp;C++"), "C&C++");
        assert_eq!(decode_entities("plain"), "plain");
    }
}
