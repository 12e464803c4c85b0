//! Theme store: persisted light/dark preference applied to the document.

use std::{cell::Cell, rc::Rc};

use tracing::debug;

use crate::models::Theme;
use crate::storage::KeyValueStore;

/// The document the theme is applied to.
pub trait ThemeTarget {
    /// Sets the document-level theme attribute.
    fn apply(&self, theme: Theme);

    /// Whether the system asks for a light colour scheme.
    fn prefers_light(&self) -> bool;
}

pub struct ThemeStore {
    store: Rc<dyn KeyValueStore>,
    target: Rc<dyn ThemeTarget>,
    storage_key: String,
    current: Cell<Theme>,
}

impl ThemeStore {
    /// Applies the stored theme, or the system preference when nothing
    /// (valid) is stored.
    pub fn load(
        store: Rc<dyn KeyValueStore>,
        target: Rc<dyn ThemeTarget>,
        storage_key: impl Into<String>,
    ) -> Self {
        let storage_key = storage_key.into();
        let initial = store
            .get(&storage_key)
            .and_then(|saved| Theme::try_from(saved.as_str()).ok())
            .unwrap_or_else(|| Theme::from_system(target.prefers_light()));

        let theme_store = Self {
            store,
            target,
            storage_key,
            current: Cell::new(initial),
        };
        theme_store.apply_theme(initial);
        theme_store
    }

    #[must_use]
    pub fn current(&self) -> Theme {
        self.current.get()
    }

    pub fn apply_theme(&self, theme: Theme) {
        self.current.set(theme);
        self.target.apply(theme);
        self.store.set(&self.storage_key, theme.as_str());
        debug!(theme = theme.as_str(), "applied theme");
    }

    /// Switches to the other theme and returns it.
    pub fn toggle(&self) -> Theme {
        let next = self.current().toggled();
        self.apply_theme(next);
        next
    }
}

impl std::fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeStore")
            .field("storage_key", &self.storage_key)
            .field("current", &self.current.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingTarget {
        prefers_light: bool,
        applied: RefCell<Vec<Theme>>,
    }

    impl ThemeTarget for RecordingTarget {
        fn apply(&self, theme: Theme) {
            self.applied.borrow_mut().push(theme);
        }

        fn prefers_light(&self) -> bool {
            self.prefers_light
        }
    }

    fn load(store: &Rc<MemoryStore>, target: &Rc<RecordingTarget>) -> ThemeStore {
        ThemeStore::load(store.clone(), target.clone(), "theme")
    }

    #[test]
    fn test_saved_theme_wins_over_system() {
        let store = Rc::new(MemoryStore::with_entries([("theme", "dark")]));
        let target = Rc::new(RecordingTarget {
            prefers_light: true,
            ..Default::default()
        });
        let themes = load(&store, &target);
        assert_eq!(themes.current(), Theme::Dark);
        assert_eq!(*target.applied.borrow(), vec![Theme::Dark]);
    }

    #[test]
    fn test_falls_back_to_system_preference() {
        let store = Rc::new(MemoryStore::new());
        let target = Rc::new(RecordingTarget {
            prefers_light: true,
            ..Default::default()
        });
        let themes = load(&store, &target);
        assert_eq!(themes.current(), Theme::Light);
        assert_eq!(store.get("theme").as_deref(), Some("light"));
    }

    #[test]
    fn test_garbage_saved_value_uses_system() {
        let store = Rc::new(MemoryStore::with_entries([("theme", "neon")]));
        let target = Rc::new(RecordingTarget::default());
        let themes = load(&store, &target);
        assert_eq!(themes.current(), Theme::Dark);
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn test_toggle_persists_and_applies() {
        let store = Rc::new(MemoryStore::new());
        let target = Rc::new(RecordingTarget::default());
        let themes = load(&store, &target);

        assert_eq!(themes.toggle(), Theme::Light);
        assert_eq!(store.get("theme").as_deref(), Some("light"));
        assert_eq!(themes.toggle(), Theme::Dark);
        assert_eq!(
            *target.applied.borrow(),
            vec![Theme::Dark, Theme::Light, Theme::Dark]
        );
    }
}
