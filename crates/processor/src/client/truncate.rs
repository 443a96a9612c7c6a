//! Truncate: shortens messages embedded in event payloads.

/// Caller-supplied truncation applied to single-message event payloads.
pub trait Truncate: Send + Sync {
    fn truncate(&self, message: &str) -> String;
}

impl<F> Truncate for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn truncate(&self, message: &str) -> String {
        self(message)
    }
}

pub const DEFAULT_TRUNCATE_LENGTH: usize = 100;

/// Keeps at most `limit` characters and appends `pad` when anything was cut.
#[derive(Debug, Clone)]
pub struct MaxLength {
    limit: usize,
    pad: String,
}

impl MaxLength {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            pad: "...".to_string(),
        }
    }

    pub fn with_pad(mut self, pad: impl Into<String>) -> Self {
        self.pad = pad.into();
        self
    }
}

impl Default for MaxLength {
    fn default() -> Self {
        Self::new(DEFAULT_TRUNCATE_LENGTH)
    }
}

impl Truncate for MaxLength {
    fn truncate(&self, message: &str) -> String {
        match message.char_indices().nth(self.limit) {
            Some((cut, _)) => format!("{}{}", &message[..cut], self.pad),
            None => message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_message_unchanged() {
        let t = MaxLength::new(10);
        assert_eq!(t.truncate("disk full"), "disk full");
        assert_eq!(t.truncate("0123456789"), "0123456789");
    }

    #[test]
    fn test_long_message_cut_and_padded() {
        let t = MaxLength::new(5);
        assert_eq!(t.truncate("0123456789"), "01234...");
    }

    #[test]
    fn test_cut_respects_char_boundaries() {
        let t = MaxLength::new(2).with_pad("…");
        assert_eq!(t.truncate("ééé"), "éé…");
    }

    #[test]
    fn test_default_limit() {
        let long = "x".repeat(150);
        let out = MaxLength::default().truncate(&long);
        assert_eq!(out.len(), DEFAULT_TRUNCATE_LENGTH + 3);
    }

    #[test]
    fn test_closure_truncate() {
        let upper = |s: &str| s.to_uppercase();
        assert_eq!(upper.truncate("abc"), "ABC");
    }
}
