use tracing::warn;

use crate::error::Result;
use crate::model::theme::Theme;
use crate::repository::{KeyValueStore, THEME_KEY};

/// Stored preference, or `default` when none (or an unknown one) is stored.
pub fn load_theme<S: KeyValueStore>(backend: &S, default: Theme) -> Result<Theme> {
    match backend.get(THEME_KEY)? {
        Some(raw) => match raw.parse::<Theme>() {
            Ok(theme) => Ok(theme),
            Err(e) => {
                warn!(error = %e, "ignoring stored theme");
                Ok(default)
            }
        },
        None => Ok(default),
    }
}

pub fn save_theme<S: KeyValueStore>(backend: &S, theme: Theme) -> Result<()> {
    backend.set(THEME_KEY, theme.as_str())
}

/// Flips the stored theme and returns the new one.
pub fn toggle_theme<S: KeyValueStore>(backend: &S, current: Theme) -> Result<Theme> {
    let next = current.toggled();
    save_theme(backend, next)?;
    Ok(next)
}
