//! Core domain: events for level flow.

use bevy::ecs::message::Message;

/// Event fired when the current level has been cleared
#[derive(Debug)]
pub struct LevelClearedEvent;

impl Message for LevelClearedEvent {}

/// Event fired to return progression to the first level
#[derive(Debug)]
pub struct ResetProgressionEvent;

impl Message for ResetProgressionEvent {}
