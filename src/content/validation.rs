//! Validation of loaded tuning values.

use crate::boss::{AttackDefinition, AttackKind, BossTuning};

/// A validation error with context about what failed.
#[derive(Debug)]
pub struct ValidationError {
    pub section: String,
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}: {}", self.section, self.field, self.message)
    }
}

/// Helper macro for checking a value is zero or greater
macro_rules! check_non_negative {
    ($errors:expr, $section:expr, $field:ident, $value:expr) => {
        if !$value.is_finite() || $value < 0.0 {
            $errors.push(ValidationError {
                section: $section.to_string(),
                field: stringify!($field),
                message: format!("must be a finite non-negative number, got {}", $value),
            });
        }
    };
}

/// Helper macro for checking a value is strictly positive
macro_rules! check_positive {
    ($errors:expr, $section:expr, $field:ident, $value:expr) => {
        if $value.is_nan() || $value <= 0.0 {
            $errors.push(ValidationError {
                section: $section.to_string(),
                field: stringify!($field),
                message: format!("must be positive, got {}", $value),
            });
        }
    };
}

fn validate_attack(errors: &mut Vec<ValidationError>, kind: AttackKind, attack: &AttackDefinition) {
    let section = format!("attacks.{:?}", kind).to_lowercase();
    if attack.min_range < 0.0 || attack.min_range > attack.max_range {
        errors.push(ValidationError {
            section: section.clone(),
            field: "min_range",
            message: format!(
                "range window [{}, {}] is not ordered",
                attack.min_range, attack.max_range
            ),
        });
    }
    check_positive!(errors, section, cooldown, attack.cooldown);
    check_positive!(errors, section, failsafe, attack.failsafe);
    check_positive!(errors, section, clip_length, attack.clip_length);
    if attack.strike_delay.is_nan()
        || attack.strike_delay < 0.0
        || attack.strike_delay >= attack.failsafe
        || attack.strike_delay >= attack.clip_length
    {
        errors.push(ValidationError {
            section,
            field: "strike_delay",
            message: format!(
                "strike at {} must land before the clip ends at {} and the failsafe at {}",
                attack.strike_delay, attack.clip_length, attack.failsafe
            ),
        });
    }
}

/// Validate the boss tuning.
/// Returns a list of validation errors, empty if the tuning is usable.
pub fn validate_tuning(tuning: &BossTuning) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    check_positive!(errors, "root", base_health, tuning.base_health);
    check_positive!(errors, "body", half_width, tuning.body.half_width);
    check_positive!(errors, "body", half_height, tuning.body.half_height);
    check_positive!(errors, "movement", move_speed, tuning.movement.move_speed);
    check_positive!(errors, "movement", jump_force, tuning.movement.jump_force);
    check_positive!(errors, "movement", jump_failsafe, tuning.movement.jump_failsafe);
    check_positive!(errors, "attacks", general_cooldown, tuning.attacks.general_cooldown);

    for kind in AttackKind::ALL {
        validate_attack(&mut errors, kind, tuning.attacks.get(kind));
    }
    if tuning.attacks.force_variety && tuning.attacks.max_consecutive == 0 {
        errors.push(ValidationError {
            section: "attacks".to_string(),
            field: "max_consecutive",
            message: "must allow at least one attack in a row".to_string(),
        });
    }
    if tuning.attacks.projectile.enabled && tuning.attacks.volley.count == 0 {
        errors.push(ValidationError {
            section: "attacks.volley".to_string(),
            field: "count",
            message: "projectile attack is enabled but fires nothing".to_string(),
        });
    }

    if tuning.navigation.visited_capacity == 0 {
        errors.push(ValidationError {
            section: "navigation".to_string(),
            field: "visited_capacity",
            message: "must remember at least one platform".to_string(),
        });
    }
    check_positive!(errors, "navigation", timeout, tuning.navigation.timeout);
    check_positive!(errors, "teleport", horizontal_cooldown, tuning.teleport.horizontal_cooldown);
    check_positive!(errors, "teleport", vertical_cooldown, tuning.teleport.vertical_cooldown);
    check_positive!(errors, "unstuck", check_interval, tuning.unstuck.check_interval);
    check_non_negative!(errors, "unstuck", random_horizontal, tuning.unstuck.random_horizontal);
    check_non_negative!(errors, "unstuck", air_nudge, tuning.unstuck.air_nudge);
    // A forced teleport only fires while the recovery it was armed in is still running
    if tuning.unstuck.teleport_grace.is_nan()
        || tuning.unstuck.teleport_grace >= tuning.unstuck.recovery_duration
    {
        errors.push(ValidationError {
            section: "unstuck".to_string(),
            field: "teleport_grace",
            message: format!(
                "forced teleport at {} must come before the recovery ends at {}",
                tuning.unstuck.teleport_grace, tuning.unstuck.recovery_duration
            ),
        });
    }
    if tuning.unstuck.history_len == 0 {
        errors.push(ValidationError {
            section: "unstuck".to_string(),
            field: "history_len",
            message: "must keep at least one sample".to_string(),
        });
    }

    errors
}
