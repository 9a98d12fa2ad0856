//! Shopper input normalization

/// One turn of shopper text.
///
/// `text` is what commands and step handlers match against: trimmed,
/// lowercased, HTML-escaped. `raw` keeps the original casing (still trimmed
/// and escaped) for values that are echoed back, like the customer name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInput {
    pub raw: String,
    pub text: String,
}

impl UserInput {
    pub fn new(message: &str) -> Self {
        let raw = html_escape(message.trim());
        let text = html_escape(&message.trim().to_lowercase());
        Self { raw, text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Positive integer made only of ASCII digits
    pub fn positive_number(&self) -> Option<u32> {
        if self.text.is_empty() || !self.text.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        self.text.parse().ok().filter(|n| *n > 0)
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
