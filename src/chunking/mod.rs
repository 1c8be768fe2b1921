//! Transcript chunking.
//!
//! Splits transcript text into bounded-word segments so each piece fits
//! the summarization model's input limit.

/// Lazy iterator over chunks of at most `limit` whitespace-delimited
/// words, non-overlapping and covering the input in order.
///
/// Restartable by calling [`word_chunks`] again on the same text.
pub struct WordChunks<'a> {
    words: std::str::SplitWhitespace<'a>,
    limit: usize,
}

impl Iterator for WordChunks<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let mut chunk = String::new();
        let mut count = 0;

        while count < self.limit {
            match self.words.next() {
                Some(word) => {
                    if !chunk.is_empty() {
                        chunk.push(' ');
                    }
                    chunk.push_str(word);
                    count += 1;
                }
                None => break,
            }
        }

        if chunk.is_empty() {
            None
        } else {
            Some(chunk)
        }
    }
}

/// Split `text` into chunks of at most `limit` words.
///
/// Empty or whitespace-only input yields zero chunks. A limit of zero is
/// treated as one word per chunk.
pub fn word_chunks(text: &str, limit: usize) -> WordChunks<'_> {
    WordChunks {
        words: text.split_whitespace(),
        limit: limit.max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunks_cover_input_in_order() {
        let text = "um dois três quatro cinco";
        let chunks: Vec<String> = word_chunks(text, 2).collect();
        assert_eq!(chunks, vec!["um dois", "três quatro", "cinco"]);
        assert_eq!(chunks.join(" "), text);
    }

    #[test]
    fn test_all_chunks_but_last_are_full() {
        let words: Vec<String> = (0..2000).map(|i| format!("w{i}")).collect();
        let text = words.join(" ");

        let chunks: Vec<String> = word_chunks(&text, 1024).collect();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].split_whitespace().count(), 1024);
        assert_eq!(chunks[1].split_whitespace().count(), 976);
        assert_eq!(chunks.join(" "), text);
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        assert_eq!(word_chunks("", 10).count(), 0);
        assert_eq!(word_chunks("   \n\t ", 10).count(), 0);
    }

    #[test]
    fn test_restartable() {
        let text = "um dois três";
        let first: Vec<String> = word_chunks(text, 2).collect();
        let second: Vec<String> = word_chunks(text, 2).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_limit_degrades_to_single_words() {
        let chunks: Vec<String> = word_chunks("um dois", 0).collect();
        assert_eq!(chunks, vec!["um", "dois"]);
    }

    #[test]
    fn test_whitespace_is_normalized() {
        let chunks: Vec<String> = word_chunks("um   dois\n\ntrês", 10).collect();
        assert_eq!(chunks, vec!["um dois três"]);
    }
}
