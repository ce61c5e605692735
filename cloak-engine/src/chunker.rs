//! Word-aligned text chunking
//!
//! Splits input into consecutive segments for parallel dispatch. Chunk
//! boundaries fall only at word starts, so no word is ever split; every
//! byte of the input belongs to exactly one chunk, and concatenating the
//! chunk texts in order reproduces the input byte-for-byte.

/// A chunk of text with its position in the original input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// Start byte offset in the original text
    pub offset: usize,
    /// The chunk's text content
    pub text: String,
}

/// Splits text into chunks of at most `chunk_size` words
#[derive(Debug, Clone)]
pub struct WordChunker {
    chunk_size: usize,
}

impl WordChunker {
    /// Create a chunker producing chunks of up to `chunk_size` words
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Split `text` into word-aligned chunks
    ///
    /// Each chunk starts at a word boundary and runs to the start of the
    /// word that opens the next chunk (the final chunk runs to the end of
    /// the input), so inter-chunk whitespace stays attached to the chunk it
    /// follows.
    pub fn chunk(&self, text: &str) -> Vec<TextChunk> {
        if text.is_empty() {
            return Vec::new();
        }

        let starts = word_starts(text);
        if starts.len() <= self.chunk_size {
            return vec![TextChunk {
                offset: 0,
                text: text.to_string(),
            }];
        }

        let mut boundaries = vec![0usize];
        boundaries.extend(
            starts
                .iter()
                .skip(self.chunk_size)
                .step_by(self.chunk_size)
                .copied(),
        );
        boundaries.push(text.len());

        boundaries
            .windows(2)
            .map(|window| TextChunk {
                offset: window[0],
                text: text[window[0]..window[1]].to_string(),
            })
            .collect()
    }
}

/// Byte offsets at which words (maximal non-whitespace runs) begin
fn word_starts(text: &str) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut in_word = false;
    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            in_word = false;
        } else if !in_word {
            starts.push(idx);
            in_word = true;
        }
    }
    starts
}

/// Number of whitespace-delimited words in `text`
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
