//! TwiML messaging responses.

/// Twilio rejects WhatsApp message bodies longer than this.
pub const MAX_MESSAGE_CHARS: usize = 1600;

/// Escape text for use inside an XML element.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Split a reply into chunks Twilio will accept, preferring line breaks.
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut rest = text.trim();
    while !rest.is_empty() {
        if rest.chars().count() <= max_chars {
            chunks.push(rest.to_string());
            break;
        }
        let hard_end = rest
            .char_indices()
            .nth(max_chars)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let cut = rest[..hard_end]
            .rfind('\n')
            .filter(|&i| i > 0)
            .unwrap_or(hard_end);
        chunks.push(rest[..cut].trim_end().to_string());
        rest = rest[cut..].trim_start();
    }
    chunks
}

/// Messaging response carrying `reply`; an empty reply yields an empty response.
pub fn message_response(reply: &str) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?><Response>"#);
    for chunk in split_message(reply, MAX_MESSAGE_CHARS) {
        xml.push_str("<Message>");
        xml.push_str(&escape_xml(&chunk));
        xml.push_str("</Message>");
    }
    xml.push_str("</Response>");
    xml
}

/// Response that sends nothing back.
pub fn empty_response() -> String {
    message_response("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_xml(r#"a < b & "c" > 'd'"#),
            "a &lt; b &amp; &quot;c&quot; &gt; &apos;d&apos;"
        );
    }

    #[test]
    fn response_wraps_escaped_message() {
        assert_eq!(
            message_response("Tom & Jerry"),
            r#"<?xml version="1.0" encoding="UTF-8"?><Response><Message>Tom &amp; Jerry</Message></Response>"#
        );
    }

    #[test]
    fn empty_reply_sends_nothing() {
        assert_eq!(
            empty_response(),
            r#"<?xml version="1.0" encoding="UTF-8"?><Response></Response>"#
        );
    }

    #[test]
    fn long_replies_split_on_line_breaks() {
        let text = format!("{}\n{}", "a".repeat(8), "b".repeat(8));
        assert_eq!(split_message(&text, 10), vec!["a".repeat(8), "b".repeat(8)]);
    }

    #[test]
    fn long_replies_without_breaks_split_hard() {
        let chunks = split_message(&"é".repeat(25), 10);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 10);
        assert_eq!(chunks[2].chars().count(), 5);
    }

    #[test]
    fn zero_limit_splits_per_char() {
        assert_eq!(split_message("abc", 0), vec!["a", "b", "c"]);
    }
}
