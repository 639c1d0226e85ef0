//! Debug domain: state for the boss AI debug tooling.

use bevy::prelude::*;

/// Resource tracking debug mode state
#[derive(Resource, Debug, Default)]
pub struct DebugState {
    /// Whether the gizmo overlay of ranges and navigation targets is drawn
    pub show_gizmos: bool,
    /// Whether the text overlay with boss state is shown
    pub show_info: bool,
    /// Whether the player is kept at full health
    pub invincible: bool,
    /// Message to log once and show in the info overlay for a while
    pub status_message: Option<(String, f32)>,
}

impl DebugState {
    /// Set a status message that will fade after a duration
    pub fn set_message(&mut self, message: impl Into<String>, duration: f32) {
        let message = message.into();
        info!("[DEBUG] {}", message);
        self.status_message = Some((message, duration));
    }

    pub fn tick_message(&mut self, dt: f32) {
        if let Some((_, ref mut duration)) = self.status_message {
            *duration -= dt;
            if *duration <= 0.0 {
                self.status_message = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_expires() {
        let mut state = DebugState::default();
        state.set_message("hello", 1.0);
        state.tick_message(0.5);
        assert!(state.status_message.is_some());
        state.tick_message(0.6);
        assert!(state.status_message.is_none());
    }
}
