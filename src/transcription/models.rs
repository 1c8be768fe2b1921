//! Transcript data model.

use serde::{Deserialize, Serialize};

/// Ordered transcript of one audio artifact.
///
/// Segments are kept in the order the speech service returned them; the
/// join logic never re-sorts or deduplicates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    /// Recognized text segments, one per result returned by the service.
    pub segments: Vec<String>,
}

impl Transcript {
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Full transcript text: segments joined with single spaces.
    pub fn text(&self) -> String {
        self.segments.join(" ")
    }

    /// Whitespace-split word count of the full text.
    pub fn word_count(&self) -> usize {
        self.text().split_whitespace().count()
    }

    /// True when no speech was recognized.
    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|s| s.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_preserves_segment_order() {
        let t = Transcript::new(vec!["um dois".into(), "três".into(), "quatro".into()]);
        assert_eq!(t.text(), "um dois três quatro");
    }

    #[test]
    fn test_word_count() {
        let t = Transcript::new(vec!["um dois três quatro".into()]);
        assert_eq!(t.word_count(), 4);
        assert!(Transcript::default().is_empty());
    }
}
