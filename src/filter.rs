/// Rules deciding which message texts are worth sending to extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateFilter {
    /// How many of the newest messages to look at
    pub lookback: usize,

    /// Texts must be strictly longer than this many characters
    pub min_chars: usize,
}

impl Default for CandidateFilter {
    fn default() -> Self {
        Self {
            // An image-only post has no caption text, so the latest
            // message alone is not enough.
            lookback: 3,
            min_chars: 30,
        }
    }
}

impl CandidateFilter {
    /// Returns true if a normalized text is long enough to carry rates
    pub fn qualifies(&self, text: &str) -> bool {
        text.chars().count() > self.min_chars
    }

    /// Keeps the qualifying texts among the newest `lookback` candidates.
    ///
    /// Input is in page order (oldest first); output keeps that order.
    pub fn apply(&self, candidates: Vec<String>) -> Vec<String> {
        let start = candidates.len().saturating_sub(self.lookback);
        candidates
            .into_iter()
            .skip(start)
            .filter(|text| {
                let keep = self.qualifies(text);
                if !keep {
                    ::log::debug!("Skipping short candidate ({} chars)", text.chars().count());
                }
                keep
            })
            .collect()
    }

    /// The newest qualifying text, if any
    pub fn newest(&self, candidates: Vec<String>) -> Option<String> {
        self.apply(candidates).pop()
    }
}
