//! Text tokenization and the queue of words awaiting playback

use std::collections::VecDeque;

/// Split text into words: first on `.` sentence terminators, then on single
/// spaces, dropping the empty tokens left by consecutive delimiters.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split('.')
        .flat_map(|sentence| sentence.split(' '))
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

/// Ordered words waiting to be played, consumed front to back
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackQueue {
    words: VecDeque<String>,
}

impl PlaybackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: &str) -> Self {
        Self::from_words(tokenize(text))
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Remove and return the next word
    pub fn pop_front(&mut self) -> Option<String> {
        self.words.pop_front()
    }

    pub fn peek(&self) -> Option<&str> {
        self.words.front().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_sentences_and_spaces() {
        assert_eq!(tokenize("Hello world. Foo  bar."), vec!["Hello", "world", "Foo", "bar"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" . .. ").is_empty());
    }

    #[test]
    fn test_tokenize_keeps_other_punctuation() {
        // Only '.' and ' ' are delimiters
        assert_eq!(tokenize("I'm baby, fam!\tok"), vec!["I'm", "baby,", "fam!\tok"]);
    }

    #[test]
    fn test_queue_consumed_front_to_back() {
        let mut queue = PlaybackQueue::from_text("bad day.");
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.peek(), Some("bad"));
        assert_eq!(queue.pop_front().as_deref(), Some("bad"));
        assert_eq!(queue.pop_front().as_deref(), Some("day"));
        assert_eq!(queue.pop_front(), None);
        assert!(queue.is_empty());
    }
}
