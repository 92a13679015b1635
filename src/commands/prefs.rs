//! Commands editing persisted user preferences.

use owo_colors::OwoColorize;

use crate::error::Result;
use crate::settings::{Settings, Theme};
use crate::types::{RecordId, Selection};

/// Star a row, or unstar it if it was already starred.
pub fn cmd_star(id: RecordId) -> Result<()> {
    let settings = Settings::load()?.with_star_toggled(id);
    settings.save()?;

    if settings.is_starred(id) {
        println!("Starred {}", id.to_string().cyan());
    } else {
        println!("Unstarred {}", id.to_string().cyan());
    }
    Ok(())
}

/// Remember the selection used when none is given on the command line.
pub fn cmd_default(selection: Selection) -> Result<()> {
    Settings::load()?.with_default_selection(selection).save()?;
    println!("Default selection set to {selection}");
    Ok(())
}

pub fn cmd_theme(theme: Theme) -> Result<()> {
    Settings::load()?.with_theme(theme).save()?;
    println!("Theme set to {theme:?}");
    Ok(())
}
