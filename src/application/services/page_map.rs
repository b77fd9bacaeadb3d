/// Maps byte offsets in the joined document text back to 1-based PDF page
/// numbers, so chunks can cite the page they came from.
#[derive(Debug, Clone)]
pub struct PageMap {
    /// Byte offset at which each page starts in the joined text.
    page_starts: Vec<usize>,
    joined: String,
}

pub const PAGE_SEPARATOR: &str = "\n\n";

impl PageMap {
    pub fn from_pages(pages: &[String]) -> Self {
        let mut page_starts = Vec::with_capacity(pages.len());
        let mut joined = String::new();

        for (i, page) in pages.iter().enumerate() {
            if i > 0 {
                joined.push_str(PAGE_SEPARATOR);
            }
            page_starts.push(joined.len());
            joined.push_str(page);
        }

        Self { page_starts, joined }
    }

    pub fn text(&self) -> &str {
        &self.joined
    }

    pub fn page_count(&self) -> i32 {
        self.page_starts.len() as i32
    }

    /// 1-based page containing `offset`. Offsets past the end fall on the
    /// last page.
    pub fn page_for_offset(&self, offset: usize) -> Option<i32> {
        if self.page_starts.is_empty() {
            return None;
        }

        let idx = match self.page_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(0) => 0,
            Err(i) => i - 1,
        };

        Some(idx as i32 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages() -> Vec<String> {
        vec![
            "Page un, introduction.".to_string(),
            "Page deux, tokenization.".to_string(),
            "Page trois, embeddings.".to_string(),
        ]
    }

    #[test]
    fn test_offsets_resolve_to_pages() {
        let map = PageMap::from_pages(&pages());

        assert_eq!(map.page_count(), 3);
        assert_eq!(map.page_for_offset(0), Some(1));

        let second_start = map.text().find("Page deux").unwrap();
        assert_eq!(map.page_for_offset(second_start), Some(2));
        assert_eq!(map.page_for_offset(second_start + 5), Some(2));

        let third_start = map.text().find("Page trois").unwrap();
        assert_eq!(map.page_for_offset(third_start), Some(3));

        // past the end still lands on the last page
        assert_eq!(map.page_for_offset(map.text().len() + 100), Some(3));
    }

    #[test]
    fn test_joined_text_keeps_page_content() {
        let map = PageMap::from_pages(&pages());
        assert!(map.text().contains("introduction"));
        assert!(map.text().contains("embeddings"));
    }

    #[test]
    fn test_empty_document() {
        let map = PageMap::from_pages(&[]);
        assert_eq!(map.page_count(), 0);
        assert_eq!(map.page_for_offset(0), None);
        assert!(map.text().is_empty());
    }
}
