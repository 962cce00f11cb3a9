//! Header navigation: hamburger toggle and active-link highlighting.

/// Document assumed when the path has no file segment.
pub const INDEX_PAGE: &str = "index.html";

/// Collapsible navigation menu state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavMenu {
    open: bool,
}

impl NavMenu {
    /// Toggle the menu (hamburger click). Returns the new state.
    pub const fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Whether the menu carries the `active` class.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }
}

/// Last path segment of `pathname`, or [`INDEX_PAGE`] when empty.
#[must_use]
pub fn current_page(pathname: &str) -> &str {
    match pathname.rsplit('/').next() {
        Some(page) if !page.is_empty() => page,
        _ => INDEX_PAGE,
    }
}

/// Indices of the nav links whose `href` points at the current page.
///
/// A leading `./` on the href is ignored.
#[must_use]
pub fn active_links<'a>(pathname: &str, hrefs: impl IntoIterator<Item = &'a str>) -> Vec<usize> {
    let page = current_page(pathname);
    hrefs
        .into_iter()
        .enumerate()
        .filter(|(_, href)| href.strip_prefix("./").unwrap_or(*href) == page)
        .map(|(i, _)| i)
        .collect()
}
