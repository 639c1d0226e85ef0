//! Movement domain: system modules for the target body and one-way riders.

pub(crate) mod collisions;
pub(crate) mod input;
pub(crate) mod movement;

pub(crate) use collisions::{detect_ground, update_one_way_filters};
pub(crate) use input::read_input;
pub(crate) use movement::{apply_drop_through, apply_horizontal_movement, apply_jump};
