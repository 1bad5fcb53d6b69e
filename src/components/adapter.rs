//! Content providers for the expanded hover menu.

use ratatui::text::Text;

/// Supplies the tabs of an expanded hover menu.
pub trait MenuAdapter {
    fn tab_count(&self) -> usize;

    /// Short label drawn in the tab strip.
    fn tab_title(&self, index: usize) -> String;

    /// Body drawn below the tab strip while `index` is selected.
    fn content(&self, index: usize) -> Text<'static>;
}

#[derive(Debug, Clone)]
pub struct MenuTab {
    pub title: String,
    pub body: Text<'static>,
}

impl MenuTab {
    pub fn new(title: impl Into<String>, body: impl Into<Text<'static>>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Adapter over a fixed list of tabs.
#[derive(Debug, Clone, Default)]
pub struct StaticMenuAdapter {
    tabs: Vec<MenuTab>,
}

impl StaticMenuAdapter {
    pub fn new(tabs: Vec<MenuTab>) -> Self {
        Self { tabs }
    }

    pub fn push(&mut self, tab: MenuTab) {
        self.tabs.push(tab);
    }
}

impl MenuAdapter for StaticMenuAdapter {
    fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    fn tab_title(&self, index: usize) -> String {
        self.tabs
            .get(index)
            .map(|t| t.title.clone())
            .unwrap_or_default()
    }

    fn content(&self, index: usize) -> Text<'static> {
        self.tabs
            .get(index)
            .map(|t| t.body.clone())
            .unwrap_or_default()
    }
}
