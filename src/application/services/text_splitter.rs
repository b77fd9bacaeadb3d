//! Recursive character splitter with overlap and start offsets.
//!
//! Splitting tries separators from coarsest (paragraph break) to finest
//! (single character), then merges the resulting fragments back into chunks
//! of at most `chunk_size` characters, carrying `chunk_overlap` characters
//! of trailing context into each following chunk. Every produced span is an
//! exact slice of the source text at its recorded byte offset.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitParams {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl SplitParams {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }
}

/// A chunk of the source text together with the byte offset it starts at.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    pub start_offset: usize,
}

/// Contiguous piece of the source, each at most `chunk_size` characters.
#[derive(Debug, Clone, Copy)]
struct Fragment {
    start: usize,
    end: usize,
    chars: usize,
}

#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    separators: Vec<&'static str>,
}

impl Default for RecursiveSplitter {
    fn default() -> Self {
        Self {
            separators: vec![
                "\n\n", // paragraph break
                "\n",   // line break
                ".",    // sentence end
                " ",    // word boundary
                "",     // character level
            ],
        }
    }
}

impl RecursiveSplitter {
    pub fn split(&self, text: &str, params: SplitParams) -> Vec<TextSpan> {
        if params.chunk_size == 0 || text.is_empty() {
            return Vec::new();
        }

        // Overlap must leave room for the chunk to advance.
        let overlap = params.chunk_overlap.min(params.chunk_size.saturating_sub(1));

        let mut fragments = Vec::new();
        self.collect_fragments(text, 0, params.chunk_size, 0, &mut fragments);

        merge_fragments(text, &fragments, params.chunk_size, overlap)
            .into_iter()
            .filter(|span| !span.text.trim().is_empty())
            .collect()
    }

    fn collect_fragments(
        &self,
        text: &str,
        offset: usize,
        max_chars: usize,
        separator_index: usize,
        out: &mut Vec<Fragment>,
    ) {
        if text.is_empty() {
            return;
        }

        let chars = text.chars().count();
        if chars <= max_chars {
            out.push(Fragment {
                start: offset,
                end: offset + text.len(),
                chars,
            });
            return;
        }

        if separator_index >= self.separators.len() {
            hard_split(text, offset, max_chars, out);
            return;
        }

        let separator = self.separators[separator_index];
        if separator.is_empty() {
            hard_split(text, offset, max_chars, out);
            return;
        }

        let pieces: Vec<&str> = text.split_inclusive(separator).collect();
        if pieces.len() == 1 {
            self.collect_fragments(text, offset, max_chars, separator_index + 1, out);
            return;
        }

        let mut piece_offset = offset;
        for piece in pieces {
            // A piece only contains this separator as its trailing match, so
            // oversized pieces move on to the next, finer separator.
            self.collect_fragments(piece, piece_offset, max_chars, separator_index + 1, out);
            piece_offset += piece.len();
        }
    }
}

fn hard_split(text: &str, offset: usize, max_chars: usize, out: &mut Vec<Fragment>) {
    let mut start_byte = 0;
    let mut chars_in_piece = 0;

    for (byte_idx, _) in text.char_indices() {
        if chars_in_piece == max_chars {
            out.push(Fragment {
                start: offset + start_byte,
                end: offset + byte_idx,
                chars: chars_in_piece,
            });
            start_byte = byte_idx;
            chars_in_piece = 0;
        }
        chars_in_piece += 1;
    }

    if chars_in_piece > 0 {
        out.push(Fragment {
            start: offset + start_byte,
            end: offset + text.len(),
            chars: chars_in_piece,
        });
    }
}

fn merge_fragments(
    source: &str,
    fragments: &[Fragment],
    chunk_size: usize,
    overlap: usize,
) -> Vec<TextSpan> {
    let mut spans = Vec::new();
    let mut window_start = 0;
    let mut window_chars = 0;

    let flush = |spans: &mut Vec<TextSpan>, from: usize, to: usize| {
        if from >= to {
            return;
        }
        let start = fragments[from].start;
        let end = fragments[to - 1].end;
        spans.push(TextSpan {
            text: source[start..end].to_string(),
            start_offset: start,
        });
    };

    for (j, fragment) in fragments.iter().enumerate() {
        if window_chars > 0 && window_chars + fragment.chars > chunk_size {
            flush(&mut spans, window_start, j);

            // Back up over whole fragments until the carried tail reaches
            // the overlap budget.
            let mut k = j;
            let mut carried = 0;
            while k > window_start && carried + fragments[k - 1].chars <= overlap {
                k -= 1;
                carried += fragments[k].chars;
            }
            window_start = k;
            window_chars = carried;
        }
        window_chars += fragment.chars;
    }

    flush(&mut spans, window_start, fragments.len());
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn char_len(s: &str) -> usize {
        s.chars().count()
    }

    #[test]
    fn test_short_text_is_one_span() {
        let splitter = RecursiveSplitter::default();
        let spans = splitter.split("Texte court", SplitParams::new(100, 20));

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "Texte court");
        assert_eq!(spans[0].start_offset, 0);
    }

    #[test]
    fn test_params_bound_every_chunk() {
        let splitter = RecursiveSplitter::default();
        let text = "Premier paragraphe du cours.\n\nDeuxième paragraphe, un peu plus long, \
                    avec plusieurs phrases. Encore une phrase ici.\n\nTroisième paragraphe.";

        for (size, overlap) in [(40, 10), (60, 0), (25, 5)] {
            let spans = splitter.split(text, SplitParams::new(size, overlap));
            assert!(!spans.is_empty());
            for span in &spans {
                assert!(
                    char_len(&span.text) <= size,
                    "chunk of {} chars exceeds size {}",
                    char_len(&span.text),
                    size
                );
            }
        }
    }

    #[test]
    fn test_spans_are_slices_of_source() {
        let splitter = RecursiveSplitter::default();
        let text = "Le TALN étudie les langues naturelles. Les modèles à états \
                    cachés précèdent les transformeurs.\nLes embeddings encodent le sens.";
        let spans = splitter.split(text, SplitParams::new(30, 8));

        for span in &spans {
            let slice = &text[span.start_offset..span.start_offset + span.text.len()];
            assert_eq!(slice, span.text);
        }
    }

    #[test]
    fn test_consecutive_chunks_overlap() {
        let splitter = RecursiveSplitter::default();
        let text = "un deux trois quatre cinq six sept huit neuf dix onze douze treize";
        let spans = splitter.split(text, SplitParams::new(20, 8));

        assert!(spans.len() > 1);
        for pair in spans.windows(2) {
            let prev_end = pair[0].start_offset + pair[0].text.len();
            // The next chunk starts before the previous one ends.
            assert!(pair[1].start_offset < prev_end);
            // And still advances.
            assert!(pair[1].start_offset > pair[0].start_offset);
        }
    }

    #[test]
    fn test_no_overlap_reconstructs_source() {
        let splitter = RecursiveSplitter::default();
        let text = "mot ".repeat(50);
        let spans = splitter.split(text.trim_end(), SplitParams::new(16, 0));

        let rebuilt: String = spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(rebuilt, text.trim_end());
    }

    #[test]
    fn test_unbroken_text_hard_splits() {
        let splitter = RecursiveSplitter::default();
        let text = "x".repeat(95);
        let spans = splitter.split(&text, SplitParams::new(30, 0));

        assert_eq!(spans.len(), 4);
        assert!(spans.iter().all(|s| char_len(&s.text) <= 30));
    }

    #[test]
    fn test_multibyte_text_respects_char_boundaries() {
        let splitter = RecursiveSplitter::default();
        let text = "é".repeat(50);
        let spans = splitter.split(&text, SplitParams::new(12, 3));

        for span in &spans {
            assert!(char_len(&span.text) <= 12);
            let slice = &text[span.start_offset..span.start_offset + span.text.len()];
            assert_eq!(slice, span.text);
        }
    }

    #[test]
    fn test_empty_input() {
        let splitter = RecursiveSplitter::default();
        assert!(splitter.split("", SplitParams::new(100, 10)).is_empty());
        assert!(splitter.split("   \n  ", SplitParams::new(100, 10)).is_empty());
    }

    #[test]
    fn test_oversized_overlap_is_clamped() {
        let splitter = RecursiveSplitter::default();
        let text = "a b c d e f g h i j k l m n o p";
        // overlap >= chunk_size would otherwise never advance
        let spans = splitter.split(text, SplitParams::new(6, 50));

        assert!(spans.len() > 1);
        for pair in spans.windows(2) {
            assert!(pair[1].start_offset > pair[0].start_offset);
        }
    }
}
