use crate::contact::ContactId;
use crate::render::{Point, Size};

/// Mouse device id reported for mouse events synthesized from touch input.
pub const TOUCH_MOUSE_ID: u32 = u32::MAX;

/// Raw events as delivered by the event source.
///
/// Finger coordinates are normalized to `[0, 1]`, mouse coordinates are in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    FingerDown { finger_id: i64, x: f32, y: f32 },
    FingerMotion { finger_id: i64, x: f32, y: f32 },
    FingerUp { finger_id: i64, x: f32, y: f32 },
    MouseButtonDown { which: u32, x: i32, y: i32 },
    MouseMotion { which: u32, x: i32, y: i32 },
    MouseButtonUp { which: u32, x: i32, y: i32 },
    Quit,
    /// Anything the demo does not react to (keyboard, window events, ...).
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Move,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    pub phase: Phase,
    pub id: ContactId,
    pub position: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Contact(ContactEvent),
    Quit,
    Ignore,
}

/// Scales a normalized touch position to surface pixels, rounding half away from zero.
pub fn touch_to_pixels(x: f32, y: f32, surface: Size) -> Point {
    Point::new(
        (x * surface.width as f32).round() as i32,
        (y * surface.height as f32).round() as i32,
    )
}

/// Maps a raw event to the logical contact operation it stands for.
pub fn normalize(event: &InputEvent, surface: Size) -> Action {
    let contact = |phase, id, position| {
        Action::Contact(ContactEvent {
            phase,
            id,
            position,
        })
    };

    match *event {
        InputEvent::FingerDown { finger_id, x, y } => contact(
            Phase::Start,
            ContactId::touch(finger_id),
            touch_to_pixels(x, y, surface),
        ),
        InputEvent::FingerMotion { finger_id, x, y } => contact(
            Phase::Move,
            ContactId::touch(finger_id),
            touch_to_pixels(x, y, surface),
        ),
        InputEvent::FingerUp { finger_id, x, y } => contact(
            Phase::End,
            ContactId::touch(finger_id),
            touch_to_pixels(x, y, surface),
        ),
        // touch-emulated mouse events duplicate the finger events above
        InputEvent::MouseButtonDown { which, .. }
        | InputEvent::MouseMotion { which, .. }
        | InputEvent::MouseButtonUp { which, .. }
            if which == TOUCH_MOUSE_ID =>
        {
            Action::Ignore
        }
        InputEvent::MouseButtonDown { which, x, y } => contact(
            Phase::Start,
            ContactId::pointer(which.into()),
            Point::new(x, y),
        ),
        InputEvent::MouseMotion { which, x, y } => contact(
            Phase::Move,
            ContactId::pointer(which.into()),
            Point::new(x, y),
        ),
        InputEvent::MouseButtonUp { which, x, y } => contact(
            Phase::End,
            ContactId::pointer(which.into()),
            Point::new(x, y),
        ),
        InputEvent::Quit => Action::Quit,
        InputEvent::Other => Action::Ignore,
    }
}
