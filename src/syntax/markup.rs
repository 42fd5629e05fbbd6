//! Per-line category annotations
//!
//! `LineMarkup` is the annotation store a highlighting pass writes into.
//! It holds at most one category per byte of the line; rules write to it
//! through [`LineMarkup::assign`], which enforces the override policy.

use std::ops::Range;

use super::category::Category;
use super::rules::Override;

/// A categorized byte range of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightedSpan {
    /// Byte offset where this span starts (inclusive)
    pub start: usize,
    /// Byte offset where this span ends (exclusive)
    pub end: usize,
    /// Category of the span
    pub category: Category,
}

impl HighlightedSpan {
    /// Create a new span
    pub fn new(start: usize, end: usize, category: Category) -> Self {
        Self { start, end, category }
    }

    /// Byte range covered by the span
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Check if this span contains a byte position
    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.start && pos < self.end
    }
}

/// Category assignments for one line of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMarkup {
    categories: Vec<Option<Category>>,
}

impl LineMarkup {
    /// Create an empty markup for a line of `len` bytes
    pub fn new(len: usize) -> Self {
        Self {
            categories: vec![None; len],
        }
    }

    /// Rebuild markup from previously computed spans
    pub fn from_spans(len: usize, spans: &[HighlightedSpan]) -> Self {
        let mut markup = Self::new(len);
        for span in spans {
            markup.assign(span.start, span.end, span.category, Override::Replace);
        }
        markup
    }

    /// Length of the annotated line in bytes
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Check if the line is empty
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Category at a byte position
    pub fn category_at(&self, pos: usize) -> Option<Category> {
        self.categories.get(pos).copied().flatten()
    }

    /// Check whether any byte in the range already has a category
    pub fn is_categorized(&self, start: usize, end: usize) -> bool {
        let end = end.min(self.categories.len());
        start < end && self.categories[start..end].iter().any(Option::is_some)
    }

    /// Assign a category to a byte range under an override policy
    ///
    /// Returns true if at least one byte changed.
    pub fn assign(&mut self, start: usize, end: usize, category: Category, mode: Override) -> bool {
        let end = end.min(self.categories.len());
        if start >= end {
            return false;
        }

        let slots = &mut self.categories[start..end];
        match mode {
            Override::Skip => {
                if slots.iter().any(Option::is_some) {
                    return false;
                }
                slots.fill(Some(category));
                true
            }
            Override::Replace => {
                let changed = slots.iter().any(|slot| *slot != Some(category));
                slots.fill(Some(category));
                changed
            }
            Override::Keep => {
                let mut changed = false;
                for slot in slots.iter_mut().filter(|slot| slot.is_none()) {
                    *slot = Some(category);
                    changed = true;
                }
                changed
            }
        }
    }

    /// Collapse the per-byte categories into ordered, non-overlapping spans
    pub fn spans(&self) -> Vec<HighlightedSpan> {
        let mut spans: Vec<HighlightedSpan> = Vec::new();

        for (pos, slot) in self.categories.iter().enumerate() {
            let Some(category) = *slot else { continue };
            match spans.last_mut() {
                Some(last) if last.end == pos && last.category == category => last.end = pos + 1,
                _ => spans.push(HighlightedSpan::new(pos, pos + 1, category)),
            }
        }

        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_leaves_categorized_range_alone() {
        let mut markup = LineMarkup::new(10);
        assert!(markup.assign(2, 5, Category::String, Override::Skip));
        // Overlaps the string by one byte: the whole assignment is dropped
        assert!(!markup.assign(4, 8, Category::Keyword, Override::Skip));
        assert_eq!(markup.category_at(6), None);
        assert_eq!(markup.category_at(4), Some(Category::String));
    }

    #[test]
    fn test_replace_overwrites() {
        let mut markup = LineMarkup::new(10);
        markup.assign(0, 4, Category::Keyword, Override::Skip);
        assert!(markup.assign(2, 6, Category::Warning, Override::Replace));
        assert_eq!(markup.category_at(1), Some(Category::Keyword));
        assert_eq!(markup.category_at(2), Some(Category::Warning));
        assert_eq!(markup.category_at(5), Some(Category::Warning));
        // Same category again changes nothing
        assert!(!markup.assign(2, 6, Category::Warning, Override::Replace));
    }

    #[test]
    fn test_keep_fills_gaps_only() {
        let mut markup = LineMarkup::new(6);
        markup.assign(2, 3, Category::Constant, Override::Skip);
        assert!(markup.assign(0, 6, Category::Type, Override::Keep));
        assert_eq!(markup.category_at(0), Some(Category::Type));
        assert_eq!(markup.category_at(2), Some(Category::Constant));
        assert_eq!(markup.category_at(5), Some(Category::Type));
    }

    #[test]
    fn test_assign_clamps_and_ignores_empty() {
        let mut markup = LineMarkup::new(3);
        assert!(!markup.assign(2, 2, Category::Keyword, Override::Replace));
        assert!(markup.assign(1, 99, Category::Keyword, Override::Skip));
        assert_eq!(markup.spans(), vec![HighlightedSpan::new(1, 3, Category::Keyword)]);
        assert!(!markup.assign(5, 9, Category::Keyword, Override::Replace));
    }

    #[test]
    fn test_spans_merge_runs() {
        let mut markup = LineMarkup::new(8);
        markup.assign(0, 3, Category::Keyword, Override::Skip);
        markup.assign(3, 5, Category::Keyword, Override::Skip);
        markup.assign(6, 8, Category::Type, Override::Skip);

        assert_eq!(
            markup.spans(),
            vec![
                HighlightedSpan::new(0, 5, Category::Keyword),
                HighlightedSpan::new(6, 8, Category::Type),
            ]
        );
    }

    #[test]
    fn test_from_spans() {
        let spans = [HighlightedSpan::new(1, 4, Category::Comment)];
        let markup = LineMarkup::from_spans(6, &spans);
        assert!(markup.is_categorized(0, 2));
        assert!(!markup.is_categorized(4, 6));
        assert_eq!(markup.spans(), spans.to_vec());
    }
}
