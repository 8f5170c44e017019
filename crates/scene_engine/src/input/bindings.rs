//! Key bindings

use std::collections::HashMap;

use crate::input::{KeyCode, Modifiers};
use crate::scene::context::{Axis, SceneFlags};

/// What a key press asks the scene to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Flip a scene mode flag
    Toggle(SceneFlags),
    /// Select the next track point
    SelectNext,
    /// Select the previous track point
    SelectPrevious,
    /// Move the selected track point one step along `axis`
    Nudge {
        /// Direction of motion
        axis: Axis,
        /// Move toward the negative end of the axis
        negative: bool,
    },
    /// Ask the host to close
    Quit,
}

/// Mapping from keys to actions
#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<KeyCode, Action>,
}

impl KeyBindings {
    /// Bindings with no keys mapped
    pub fn empty() -> Self {
        Self { map: HashMap::new() }
    }

    /// Bind `key` to `action`, replacing any previous binding
    pub fn bind(&mut self, key: KeyCode, action: Action) -> &mut Self {
        self.map.insert(key, action);
        self
    }

    /// Resolve a key press
    ///
    /// Shift reverses the direction of nudge actions.
    pub fn action_for(&self, key: KeyCode, modifiers: Modifiers) -> Option<Action> {
        let action = *self.map.get(&key)?;
        Some(match action {
            Action::Nudge { axis, negative } => Action::Nudge {
                axis,
                negative: negative ^ modifiers.contains(Modifiers::SHIFT),
            },
            other => other,
        })
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = Self::empty();
        bindings
            .bind(KeyCode::B, Action::Toggle(SceneFlags::SHOW_BOUNDS))
            .bind(KeyCode::C, Action::Toggle(SceneFlags::CULLING))
            .bind(KeyCode::D, Action::Toggle(SceneFlags::DEMO_MODE))
            .bind(KeyCode::P, Action::Toggle(SceneFlags::PAUSED))
            .bind(KeyCode::E, Action::Toggle(SceneFlags::EDIT_MODE))
            .bind(KeyCode::R, Action::Toggle(SceneFlags::RIDE_CAMERA))
            .bind(KeyCode::L, Action::Toggle(SceneFlags::LIGHT_CONTROL))
            .bind(KeyCode::Right, Action::SelectNext)
            .bind(KeyCode::Left, Action::SelectPrevious)
            .bind(KeyCode::X, Action::Nudge { axis: Axis::X, negative: false })
            .bind(KeyCode::Y, Action::Nudge { axis: Axis::Y, negative: false })
            .bind(KeyCode::Z, Action::Nudge { axis: Axis::Z, negative: false })
            .bind(KeyCode::Escape, Action::Quit);
        bindings
    }
}
