//! Page widgets shared by every Boba Lab page.

pub mod nav;
pub mod slider;

pub use nav::{NavMenu, active_links, current_page};
pub use slider::{HeroSlider, SLIDE_DURATION};

/// Per-page state created on load.
///
/// The slider is `None` on pages without hero slides. `loaded` flips once
/// initialization has run and hides the loading screen.
#[derive(Debug, Clone, Default)]
pub struct PageShell {
    pub slider: Option<HeroSlider>,
    pub nav: NavMenu,
    pub active_links: Vec<usize>,
    loaded: bool,
}

impl PageShell {
    /// Initialize the page widgets and mark the page as loaded.
    #[must_use]
    pub fn init<'a>(
        pathname: &str,
        slide_count: usize,
        nav_hrefs: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self {
            slider: HeroSlider::new(slide_count),
            nav: NavMenu::default(),
            active_links: active_links(pathname, nav_hrefs),
            loaded: true,
        }
    }

    /// Whether the loading screen is gone.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }
}
