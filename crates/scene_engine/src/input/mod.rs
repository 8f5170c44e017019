//! Input events and bindings
//!
//! The window layer is an external collaborator. It translates its native
//! callbacks into [`InputEvent`]s; the scene consumes them through
//! [`crate::scene::Scene::handle_event`].

pub mod bindings;
pub mod trackball;

pub use bindings::{Action, KeyBindings};
pub use trackball::trackball_point;

use bitflags::bitflags;

bitflags! {
    /// Modifier keys held during a key press
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Shift key
        const SHIFT   = 1 << 0;
        /// Control key
        const CONTROL = 1 << 1;
    }
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// L key
    L,
    /// P key
    P,
    /// R key
    R,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// Escape key
    Escape,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

/// Event delivered by the window layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Framebuffer resized
    Resize {
        /// New width in pixels
        width: u32,
        /// New height in pixels
        height: u32,
    },
    /// Pointer moved to window coordinates (origin top-left)
    CursorMoved {
        /// X in pixels
        x: f32,
        /// Y in pixels
        y: f32,
    },
    /// Mouse button pressed or released
    MouseButton {
        /// Which button
        button: MouseButton,
        /// `true` on press
        pressed: bool,
    },
    /// Vertical scroll; positive is away from the user
    Scroll {
        /// Scroll amount in notches
        dy: f32,
    },
    /// Key pressed
    Key {
        /// Which key
        key: KeyCode,
        /// Modifiers held
        modifiers: Modifiers,
    },
}

impl InputEvent {
    /// Key press without modifiers
    pub fn key(key: KeyCode) -> Self {
        Self::Key { key, modifiers: Modifiers::empty() }
    }

    /// Key press with Shift held
    pub fn shift_key(key: KeyCode) -> Self {
        Self::Key { key, modifiers: Modifiers::SHIFT }
    }
}
