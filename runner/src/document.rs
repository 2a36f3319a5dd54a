/// The text of one document while its snippets are being replaced.
///
/// Substitution consumes the buffer and hands back the updated one, so a
/// document is only ever mutated by whoever currently owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
}

impl Document {
    pub fn new(text: String) -> Self {
        Document { text }
    }

    /// Replace every occurrence of `original` with `transcript`.
    ///
    /// Matching is textual: once a span has been replaced, an identical span
    /// appearing later has nothing left to match.
    pub fn substitute(self, original: &str, transcript: &str) -> Self {
        if !self.text.contains(original) {
            tracing::debug!("snippet text already replaced by an identical earlier snippet");
            return self;
        }
        Document {
            text: self.text.replace(original, transcript),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}
