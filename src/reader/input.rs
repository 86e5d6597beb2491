//! Keyboard and gesture input mapping

use serde::{Deserialize, Serialize};

/// Minimum horizontal travel for a swipe, in device-independent pixels
pub const MIN_SWIPE_DISTANCE: f64 = 50.0;

/// Keys the reader reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
    Other,
}

impl Key {
    /// Parse a DOM-style key name
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "Escape" => Key::Escape,
            _ => Key::Other,
        }
    }
}

/// Discrete commands the reader session understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "page", rename_all = "camelCase")]
pub enum ReaderCommand {
    Next,
    Prev,
    Goto(u32),
    ToggleBookmark,
    Close,
}

pub fn command_for_key(key: Key) -> Option<ReaderCommand> {
    match key {
        Key::ArrowRight => Some(ReaderCommand::Next),
        Key::ArrowLeft => Some(ReaderCommand::Prev),
        Key::Escape => Some(ReaderCommand::Close),
        Key::Other => None,
    }
}

/// Tracks one horizontal touch gesture
#[derive(Debug, Clone, Copy, Default)]
pub struct SwipeTracker {
    start: Option<f64>,
    end: Option<f64>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn touch_start(&mut self, x: f64) {
        self.start = Some(x);
        self.end = None;
    }

    pub fn touch_move(&mut self, x: f64) {
        self.end = Some(x);
    }

    /// Finish the gesture. A leftward swipe turns forward, rightward back.
    pub fn touch_end(&mut self) -> Option<ReaderCommand> {
        let (start, end) = (self.start.take()?, self.end.take()?);
        let distance = start - end;

        if distance > MIN_SWIPE_DISTANCE {
            Some(ReaderCommand::Next)
        } else if distance < -MIN_SWIPE_DISTANCE {
            Some(ReaderCommand::Prev)
        } else {
            None
        }
    }
}
