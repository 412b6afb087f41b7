use core::fmt;
use core::str::FromStr;

use bitflags::bitflags;

/// Key codes as reported by the simulator keyboard.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCodes {
    Left = 314,
    Up = 315,
    Right = 316,
    Down = 317,
    UppercaseP = 80,
    LowercaseP = 112,
}

impl TryFrom<u32> for KeyCodes {
    type Error = ();

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            314 => Ok(KeyCodes::Left),
            315 => Ok(KeyCodes::Up),
            316 => Ok(KeyCodes::Right),
            317 => Ok(KeyCodes::Down),
            80 => Ok(KeyCodes::UppercaseP),
            112 => Ok(KeyCodes::LowercaseP),
            _ => Err(()),
        }
    }
}

bitflags! {
    /// Modifier bits the keyboard ORs into the key code.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct KeyModifiers: u32 {
        const SHIFT = 1 << 16;
        const CONTROL = 1 << 17;
        const ALT = 1 << 18;
    }
}

const KEY_MASK: u32 = 0xffff;

/// Discrete operator input, one per key press seen by the input device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Forward,
    Backward,
    TurnRight,
    TurnLeft,
    StrafeRight,
    StrafeLeft,
    AltitudeUp,
    AltitudeDown,
    Capture,
    Unrecognized(u32),
}

impl InputEvent {
    pub fn from_key_code(code: u32) -> Self {
        let modifiers = KeyModifiers::from_bits_retain(code & !KEY_MASK);
        let key = match KeyCodes::try_from(code & KEY_MASK) {
            Ok(key) => key,
            Err(()) => return InputEvent::Unrecognized(code),
        };

        if modifiers.is_empty() {
            match key {
                KeyCodes::Up => InputEvent::Forward,
                KeyCodes::Down => InputEvent::Backward,
                KeyCodes::Right => InputEvent::TurnRight,
                KeyCodes::Left => InputEvent::TurnLeft,
                KeyCodes::UppercaseP | KeyCodes::LowercaseP => InputEvent::Capture,
            }
        } else if modifiers == KeyModifiers::SHIFT {
            match key {
                KeyCodes::Up => InputEvent::AltitudeUp,
                KeyCodes::Down => InputEvent::AltitudeDown,
                KeyCodes::Right => InputEvent::StrafeRight,
                KeyCodes::Left => InputEvent::StrafeLeft,
                // Shift+p arrives as the uppercase letter without the modifier bit
                KeyCodes::UppercaseP | KeyCodes::LowercaseP => InputEvent::Unrecognized(code),
            }
        } else {
            InputEvent::Unrecognized(code)
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            InputEvent::Forward => "forward",
            InputEvent::Backward => "backward",
            InputEvent::TurnRight => "turn-right",
            InputEvent::TurnLeft => "turn-left",
            InputEvent::StrafeRight => "strafe-right",
            InputEvent::StrafeLeft => "strafe-left",
            InputEvent::AltitudeUp => "altitude-up",
            InputEvent::AltitudeDown => "altitude-down",
            InputEvent::Capture => "capture",
            InputEvent::Unrecognized(_) => "unrecognized",
        }
    }
}

impl fmt::Display for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InputEvent::Unrecognized(code) => write!(f, "unrecognized({})", code),
            event => write!(f, "{}", event.name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEventName(pub String);

impl fmt::Display for UnknownEventName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown input event `{}`", self.0)
    }
}

impl std::error::Error for UnknownEventName {}

impl FromStr for InputEvent {
    type Err = UnknownEventName;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "forward" => Ok(InputEvent::Forward),
            "backward" => Ok(InputEvent::Backward),
            "turn-right" => Ok(InputEvent::TurnRight),
            "turn-left" => Ok(InputEvent::TurnLeft),
            "strafe-right" => Ok(InputEvent::StrafeRight),
            "strafe-left" => Ok(InputEvent::StrafeLeft),
            "altitude-up" => Ok(InputEvent::AltitudeUp),
            "altitude-down" => Ok(InputEvent::AltitudeDown),
            "capture" => Ok(InputEvent::Capture),
            _ => Err(UnknownEventName(value.to_string())),
        }
    }
}
