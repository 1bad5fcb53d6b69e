use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    // Hover menu lifecycle
    ShowMenu,
    HideMenu,
    ToggleMenu,
    // Expanded menu
    CollapseMenu,
    NextTab,
    PrevTab,
}

/// Where a key is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContext {
    /// Handled by the application whether or not the menu is expanded.
    Global,
    /// Only meaningful while the menu is expanded; routed to the view.
    Expanded,
}

impl Action {
    pub const fn context(self) -> KeyContext {
        match self {
            Action::Quit | Action::ShowMenu | Action::HideMenu | Action::ToggleMenu => {
                KeyContext::Global
            }
            Action::CollapseMenu | Action::NextTab | Action::PrevTab => KeyContext::Expanded,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Action::Quit => "Quit",
            Action::ShowMenu => "Show hover menu",
            Action::HideMenu => "Hide hover menu",
            Action::ToggleMenu => "Expand / collapse",
            Action::CollapseMenu => "Collapse menu",
            Action::NextTab => "Next tab",
            Action::PrevTab => "Previous tab",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub const fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub const fn key(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.code == self.code && key.modifiers == self.mods
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, name) in [
            (KeyModifiers::CONTROL, "Ctrl+"),
            (KeyModifiers::ALT, "Alt+"),
            (KeyModifiers::SHIFT, "Shift+"),
        ] {
            if self.mods.contains(flag) {
                f.write_str(name)?;
            }
        }
        match self.code {
            // plain letters stay lowercase so "m" reads as the key to press
            KeyCode::Char(c) if self.mods.is_empty() => write!(f, "{c}"),
            KeyCode::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            KeyCode::BackTab => f.write_str("Shift+Tab"),
            KeyCode::F(n) => write!(f, "F{n}"),
            code => write!(f, "{code:?}"),
        }
    }
}

/// Ordered key table. Lookups take the first binding that matches, so the
/// result never depends on hashing order.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: Vec<(KeyCombo, Action)>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Action::*;
        let mut kb = Self::new();
        kb.add(Quit, KeyCombo::ctrl('q'));
        kb.add(Quit, KeyCombo::ctrl('c'));
        kb.add(ShowMenu, KeyCombo::key(KeyCode::Char('s')));
        kb.add(HideMenu, KeyCombo::key(KeyCode::Char('h')));
        kb.add(ToggleMenu, KeyCombo::key(KeyCode::Char('m')));
        kb.add(CollapseMenu, KeyCombo::key(KeyCode::Esc));
        kb.add(NextTab, KeyCombo::key(KeyCode::Right));
        kb.add(NextTab, KeyCombo::key(KeyCode::Tab));
        kb.add(PrevTab, KeyCombo::key(KeyCode::Left));
        kb.add(PrevTab, KeyCombo::key(KeyCode::BackTab));
        kb
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Bind `combo` to `action`. A combo already bound elsewhere is moved.
    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.bindings.retain(|(bound, _)| *bound != combo);
        self.bindings.push((combo, action));
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        self.action_for_key(key) == Some(action)
    }

    pub fn action_for_key(&self, key: &KeyEvent) -> Option<Action> {
        self.bindings
            .iter()
            .find(|(combo, _)| combo.matches(key))
            .map(|(_, action)| *action)
    }

    /// Like [`KeyBindings::action_for_key`], limited to one context.
    pub fn action_in(&self, context: KeyContext, key: &KeyEvent) -> Option<Action> {
        self.action_for_key(key)
            .filter(|action| action.context() == context)
    }

    /// Display strings for every combo bound to `action`, in binding order.
    pub fn combos_for(&self, action: Action) -> Vec<String> {
        self.bindings
            .iter()
            .filter(|(_, bound)| *bound == action)
            .map(|(combo, _)| combo.to_string())
            .collect()
    }

    /// One `(keys, label)` row per bound action in `context`, for help text.
    pub fn help_rows(&self, context: KeyContext) -> Vec<(String, &'static str)> {
        let mut seen: Vec<Action> = Vec::new();
        for (_, action) in &self.bindings {
            if action.context() == context && !seen.contains(action) {
                seen.push(*action);
            }
        }
        seen.into_iter()
            .map(|action| (self.combos_for(action).join(" / "), action.label()))
            .collect()
    }
}
