//! Content domain: boss tuning loaded from RON at startup.

mod loader;
mod validation;

use loader::{BOSS_TUNING_FILE, load_boss_tuning};
use validation::validate_tuning;

use bevy::prelude::*;
use std::path::Path;

use crate::boss::BossTuning;

/// Directory holding the RON data files, relative to the working directory.
pub const DATA_DIR: &str = "assets/data";

pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(load_tuning_or_default(Path::new(DATA_DIR)));
    }
}

/// Load and validate the tuning, falling back to the built-in values on any problem.
pub fn load_tuning_or_default(base_path: &Path) -> BossTuning {
    let tuning = match load_boss_tuning(base_path) {
        Ok(tuning) => tuning,
        Err(e) => {
            warn!("{}; using default boss tuning", e);
            return BossTuning::default();
        }
    };

    let errors = validate_tuning(&tuning);
    if errors.is_empty() {
        info!("Loaded boss tuning from {}", base_path.join(BOSS_TUNING_FILE).display());
        return tuning;
    }
    for error in &errors {
        error!("Invalid boss tuning: {}", error);
    }
    warn!(
        "{} tuning error(s) in {}; using default boss tuning",
        errors.len(),
        BOSS_TUNING_FILE
    );
    BossTuning::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory_falls_back_to_defaults() {
        let tuning = load_tuning_or_default(Path::new("no/such/dir"));
        assert_eq!(tuning, BossTuning::default());
    }
}
