//! Page-number pagination primitives shared by backend read endpoints.
//!
//! The model mirrors a classic page-number paginator:
//!
//! - a [`Paginator`] knows the total number of matching rows and the page
//!   size, and resolves a requested page number into a [`PageWindow`]
//!   (`offset`/`limit`) that adapters can push down to the store;
//! - a [`Page`] carries one window of items plus the numbers needed to render
//!   navigation links.
//!
//! An empty result set still has exactly one (empty) page, so callers never
//! need to special-case "no rows".
//!
//! # Examples
//!
//! ```
//! use pagination::{DEFAULT_PAGE_SIZE, Page, Paginator};
//!
//! let paginator = Paginator::new(23, DEFAULT_PAGE_SIZE);
//! let window = paginator.get_page(Some("3"));
//! assert_eq!(window.offset(), 20);
//!
//! let page = Page::new(vec!["u", "v", "w"], window, &paginator);
//! assert!(!page.has_next());
//! assert_eq!(page.start_index(), 21);
//! assert_eq!(page.end_index(), 23);
//! ```

use std::num::NonZeroU64;

use serde::Serialize;

/// Page size used by list endpoints unless they say otherwise.
pub const DEFAULT_PAGE_SIZE: NonZeroU64 = NonZeroU64::MIN.saturating_add(9);

/// Errors raised by strict page-number validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageNumberError {
    /// The raw value is not an integer.
    #[error("page number is not an integer: {raw}")]
    NotAnInteger {
        /// Raw value supplied by the caller.
        raw: String,
    },
    /// The value is an integer below one.
    #[error("page number {number} is less than 1")]
    LessThanOne {
        /// Parsed page number.
        number: i64,
    },
    /// The value points past the last page.
    #[error("page {number} contains no results; the last page is {num_pages}")]
    Empty {
        /// Parsed page number.
        number: u64,
        /// Number of pages available.
        num_pages: u64,
    },
}

/// Resolves page numbers against a known result size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    count: u64,
    per_page: NonZeroU64,
}

impl Paginator {
    /// Create a paginator for `count` rows split into pages of `per_page`.
    #[must_use]
    pub const fn new(count: u64, per_page: NonZeroU64) -> Self {
        Self { count, per_page }
    }

    /// Total number of rows across all pages.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Configured page size.
    #[must_use]
    pub const fn per_page(&self) -> NonZeroU64 {
        self.per_page
    }

    /// Number of pages; never less than one.
    #[must_use]
    pub const fn num_pages(&self) -> u64 {
        if self.count == 0 {
            1
        } else {
            self.count.div_ceil(self.per_page.get())
        }
    }

    /// Strictly validate a raw page number.
    ///
    /// # Errors
    ///
    /// Returns [`PageNumberError`] when the value is not an integer, is below
    /// one, or points past the last page.
    pub fn validate_number(&self, raw: &str) -> Result<u64, PageNumberError> {
        let trimmed = raw.trim();
        let parsed = trimmed
            .parse::<i64>()
            .map_err(|_| PageNumberError::NotAnInteger {
                raw: trimmed.to_owned(),
            })?;
        let number =
            u64::try_from(parsed).map_err(|_| PageNumberError::LessThanOne { number: parsed })?;
        if number == 0 {
            return Err(PageNumberError::LessThanOne { number: parsed });
        }
        let num_pages = self.num_pages();
        if number > num_pages {
            return Err(PageNumberError::Empty { number, num_pages });
        }
        Ok(number)
    }

    /// Resolve a raw page number leniently.
    ///
    /// A missing or non-integer value yields the first page; a value below
    /// one or past the end yields the last page.
    #[must_use]
    pub fn get_page(&self, raw: Option<&str>) -> PageWindow {
        let Some(value) = raw else {
            return self.window(1);
        };
        match self.validate_number(value) {
            Ok(number) => self.window(number),
            Err(PageNumberError::NotAnInteger { .. }) => self.window(1),
            Err(PageNumberError::LessThanOne { .. } | PageNumberError::Empty { .. }) => {
                self.window(self.num_pages())
            }
        }
    }

    /// Build the window for `number`, clamped into `1..=num_pages`.
    #[must_use]
    pub fn window(&self, number: u64) -> PageWindow {
        let clamped = number.clamp(1, self.num_pages());
        let per_page = self.per_page.get();
        PageWindow {
            number: clamped,
            offset: clamped.saturating_sub(1).saturating_mul(per_page),
            limit: per_page,
        }
    }
}

/// Offset/limit pair for one resolved page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    number: u64,
    offset: u64,
    limit: u64,
}

impl PageWindow {
    /// One-based page number.
    #[must_use]
    pub const fn number(&self) -> u64 {
        self.number
    }

    /// Number of rows to skip.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Maximum number of rows to return.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }
}

/// One page of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    number: u64,
    num_pages: u64,
    count: u64,
    per_page: u64,
}

impl<T> Page<T> {
    /// Assemble a page from the rows fetched for `window`.
    #[must_use]
    pub fn new(items: Vec<T>, window: PageWindow, paginator: &Paginator) -> Self {
        Self {
            items,
            number: window.number(),
            num_pages: paginator.num_pages(),
            count: paginator.count(),
            per_page: paginator.per_page().get(),
        }
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// One-based page number.
    #[must_use]
    pub const fn number(&self) -> u64 {
        self.number
    }

    /// Total number of pages.
    #[must_use]
    pub const fn num_pages(&self) -> u64 {
        self.num_pages
    }

    /// Total number of rows across all pages.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Whether a following page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    /// Whether a preceding page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// Number of the following page, if any.
    #[must_use]
    pub const fn next_page_number(&self) -> Option<u64> {
        if self.has_next() {
            Some(self.number.saturating_add(1))
        } else {
            None
        }
    }

    /// Number of the preceding page, if any.
    #[must_use]
    pub const fn previous_page_number(&self) -> Option<u64> {
        if self.has_previous() {
            Some(self.number.saturating_sub(1))
        } else {
            None
        }
    }

    /// One-based index of the first item on this page, or 0 when empty.
    #[must_use]
    pub const fn start_index(&self) -> u64 {
        if self.count == 0 {
            return 0;
        }
        self.per_page
            .saturating_mul(self.number.saturating_sub(1))
            .saturating_add(1)
    }

    /// One-based index of the last item on this page.
    #[must_use]
    pub const fn end_index(&self) -> u64 {
        if self.number == self.num_pages {
            self.count
        } else {
            self.number.saturating_mul(self.per_page)
        }
    }

    /// Transform the items while keeping the page metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit coverage for page resolution and page metadata.

    use super::*;
    use rstest::rstest;

    fn paginator(count: u64) -> Paginator {
        Paginator::new(count, DEFAULT_PAGE_SIZE)
    }

    #[rstest]
    fn default_page_size_is_ten() {
        assert_eq!(DEFAULT_PAGE_SIZE.get(), 10);
    }

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(10, 1)]
    #[case(11, 2)]
    #[case(25, 3)]
    fn num_pages_never_drops_below_one(#[case] count: u64, #[case] expected: u64) {
        assert_eq!(paginator(count).num_pages(), expected);
    }

    #[rstest]
    #[case(None, 1)]
    #[case(Some("2"), 2)]
    #[case(Some(" 3 "), 3)]
    #[case(Some("abc"), 1)]
    #[case(Some(""), 1)]
    #[case(Some("0"), 3)]
    #[case(Some("-4"), 3)]
    #[case(Some("99"), 3)]
    fn get_page_resolves_leniently(#[case] raw: Option<&str>, #[case] expected: u64) {
        let window = paginator(25).get_page(raw);
        assert_eq!(window.number(), expected);
    }

    #[rstest]
    fn validate_number_reports_each_failure() {
        let pages = paginator(25);
        assert!(matches!(
            pages.validate_number("x"),
            Err(PageNumberError::NotAnInteger { .. })
        ));
        assert_eq!(
            pages.validate_number("0"),
            Err(PageNumberError::LessThanOne { number: 0 })
        );
        assert_eq!(
            pages.validate_number("4"),
            Err(PageNumberError::Empty {
                number: 4,
                num_pages: 3
            })
        );
        assert_eq!(pages.validate_number("3"), Ok(3));
    }

    #[rstest]
    fn window_offsets_follow_page_size() {
        let window = paginator(25).window(3);
        assert_eq!(window.offset(), 20);
        assert_eq!(window.limit(), 10);
    }

    #[rstest]
    fn page_metadata_for_middle_page() {
        let pages = paginator(25);
        let page = Page::new((11..=20).collect::<Vec<u64>>(), pages.window(2), &pages);

        assert!(page.has_next());
        assert!(page.has_previous());
        assert_eq!(page.next_page_number(), Some(3));
        assert_eq!(page.previous_page_number(), Some(1));
        assert_eq!(page.start_index(), 11);
        assert_eq!(page.end_index(), 20);
    }

    #[rstest]
    fn empty_result_has_one_empty_page() {
        let pages = paginator(0);
        let page: Page<u64> = Page::new(Vec::new(), pages.get_page(Some("5")), &pages);

        assert_eq!(page.number(), 1);
        assert_eq!(page.num_pages(), 1);
        assert!(page.items().is_empty());
        assert!(!page.has_next());
        assert_eq!(page.start_index(), 0);
        assert_eq!(page.end_index(), 0);
    }

    #[rstest]
    fn map_keeps_metadata() {
        let pages = paginator(12);
        let page = Page::new(vec![1_u64, 2], pages.window(2), &pages).map(|n| n.to_string());

        assert_eq!(page.items(), ["1".to_owned(), "2".to_owned()]);
        assert_eq!(page.number(), 2);
        assert_eq!(page.count(), 12);
    }

    #[rstest]
    fn page_serializes_in_camel_case() {
        let pages = paginator(1);
        let page = Page::new(vec!["only"], pages.window(1), &pages);
        let value = serde_json::to_value(&page).expect("page serializes");

        assert_eq!(value["numPages"], 1);
        assert_eq!(value["perPage"], 10);
        assert_eq!(value["items"][0], "only");
    }
}
