//////////////////////////////////////////////////
// Using

use std::convert::TryFrom;

//////////////////////////////////////////////////
// Input

#[derive(Debug, Copy, Clone)]
pub enum InputEvent {
    Cursor(CursorEvent),
    Mouse(MouseEvent),
    Touch(TouchEvent),
    Keyboard(KeyboardEvent),
}

#[derive(Debug, Copy, Clone)]
pub struct CursorEvent {
    pub location: Location,
}

#[derive(Debug, Copy, Clone)]
pub struct MouseEvent {
    pub state: MouseState,
    pub button: MouseButton,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MouseState {
    Pressed,
    Released,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    Back,
    Forward,
    Other(u16),
}

#[derive(Debug, Copy, Clone)]
pub struct TouchEvent {
    pub state: TouchState,
    pub location: Location,
    pub id: u64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TouchState {
    Down,
    Up,
    Move,
    Cancelled,
}

// use winit physical key codes
pub type Key = winit::keyboard::KeyCode;

#[derive(Debug, Copy, Clone)]
pub struct KeyboardEvent {
    pub state: KeyState,
    pub key: Key,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Location {
    pub x: f32,
    pub y: f32,
}

//////////////////////////////////////////////////
// Implementation

impl InputEvent {
    /// Reduces touch and primary mouse button events to a press transition.
    ///
    /// `Some(true)` on press, `Some(false)` on release or cancel, `None` for everything else.
    /// Mouse clicks stand in for touches on desktop.
    pub fn press(&self) -> Option<bool> {
        match self {
            InputEvent::Touch(TouchEvent { state, .. }) => match state {
                TouchState::Down => Some(true),
                TouchState::Up | TouchState::Cancelled => Some(false),
                TouchState::Move => None,
            },
            InputEvent::Mouse(MouseEvent { state, button: MouseButton::Left }) => Some(*state == MouseState::Pressed),
            _ => None,
        }
    }

    /// Escape on desktop, the back button on Android.
    pub fn is_back(&self) -> bool {
        matches!(
            self,
            InputEvent::Keyboard(KeyboardEvent {
                state: KeyState::Released,
                key: Key::Escape | Key::BrowserBack,
            })
        )
    }
}

//////////////////////////////////////////////////
// Conversion

impl From<winit::dpi::PhysicalPosition<f64>> for Location {
    fn from(e: winit::dpi::PhysicalPosition<f64>) -> Location {
        Location { x: e.x as f32, y: e.y as f32 }
    }
}

impl From<winit::event::ElementState> for MouseState {
    fn from(e: winit::event::ElementState) -> MouseState {
        match e {
            winit::event::ElementState::Pressed => MouseState::Pressed,
            winit::event::ElementState::Released => MouseState::Released,
        }
    }
}

impl From<winit::event::MouseButton> for MouseButton {
    fn from(e: winit::event::MouseButton) -> MouseButton {
        match e {
            winit::event::MouseButton::Left => MouseButton::Left,
            winit::event::MouseButton::Middle => MouseButton::Middle,
            winit::event::MouseButton::Right => MouseButton::Right,
            winit::event::MouseButton::Back => MouseButton::Back,
            winit::event::MouseButton::Forward => MouseButton::Forward,
            winit::event::MouseButton::Other(x) => MouseButton::Other(x),
        }
    }
}

impl From<winit::event::Touch> for TouchEvent {
    fn from(e: winit::event::Touch) -> TouchEvent {
        let winit::event::Touch { phase, location, id, .. } = e;
        TouchEvent {
            state: phase.into(),
            location: location.into(),
            id,
        }
    }
}

impl From<winit::event::TouchPhase> for TouchState {
    fn from(e: winit::event::TouchPhase) -> TouchState {
        match e {
            winit::event::TouchPhase::Started => TouchState::Down,
            winit::event::TouchPhase::Ended => TouchState::Up,
            winit::event::TouchPhase::Moved => TouchState::Move,
            winit::event::TouchPhase::Cancelled => TouchState::Cancelled,
        }
    }
}

impl From<winit::event::ElementState> for KeyState {
    fn from(e: winit::event::ElementState) -> KeyState {
        match e {
            winit::event::ElementState::Pressed => KeyState::Pressed,
            winit::event::ElementState::Released => KeyState::Released,
        }
    }
}

impl TryFrom<winit::event::KeyEvent> for KeyboardEvent {
    type Error = ();

    fn try_from(e: winit::event::KeyEvent) -> Result<KeyboardEvent, ()> {
        let winit::event::KeyEvent { physical_key, state, .. } = e;
        match physical_key {
            winit::keyboard::PhysicalKey::Code(code) => Ok(KeyboardEvent { state: state.into(), key: code }),
            _ => Err(()),
        }
    }
}

//////////////////////////////////////////////////
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(state: TouchState) -> InputEvent {
        InputEvent::Touch(TouchEvent {
            state,
            location: Location::default(),
            id: 0,
        })
    }

    fn mouse(state: MouseState, button: MouseButton) -> InputEvent {
        InputEvent::Mouse(MouseEvent { state, button })
    }

    #[test]
    fn touch_phases_map_to_presses() {
        assert_eq!(touch(TouchState::Down).press(), Some(true));
        assert_eq!(touch(TouchState::Up).press(), Some(false));
        assert_eq!(touch(TouchState::Cancelled).press(), Some(false));
        assert_eq!(touch(TouchState::Move).press(), None);
    }

    #[test]
    fn only_left_mouse_button_counts() {
        assert_eq!(mouse(MouseState::Pressed, MouseButton::Left).press(), Some(true));
        assert_eq!(mouse(MouseState::Released, MouseButton::Left).press(), Some(false));
        assert_eq!(mouse(MouseState::Pressed, MouseButton::Right).press(), None);
        assert_eq!(InputEvent::Cursor(CursorEvent { location: Location::default() }).press(), None);
    }

    #[test]
    fn back_on_key_release() {
        let released = InputEvent::Keyboard(KeyboardEvent {
            state: KeyState::Released,
            key: Key::Escape,
        });
        let pressed = InputEvent::Keyboard(KeyboardEvent {
            state: KeyState::Pressed,
            key: Key::Escape,
        });
        let other = InputEvent::Keyboard(KeyboardEvent {
            state: KeyState::Released,
            key: Key::Space,
        });
        assert!(released.is_back());
        assert!(!pressed.is_back());
        assert!(!other.is_back());
    }
}
