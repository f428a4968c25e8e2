// SPDX-FileCopyrightText: The hercules-air authors
// SPDX-License-Identifier: MPL-2.0

//! Hardware input primitives.


/// Time stamp of an input event in microseconds.
///
/// The origin is defined by the transport that delivers the events,
/// e.g. the connection time of the MIDI input port.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, derive_more::Display,
)]
pub struct TimeStamp(u64);

impl TimeStamp {
    #[must_use]
    pub const fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    #[must_use]
    pub const fn to_micros(self) -> u64 {
        self.0
    }
}

/// A simple two-state button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonInput {
    Pressed,
    Released,
}

impl ButtonInput {
    /// Map a 7-bit data byte to a button state.
    ///
    /// Only 0x00 (released) and 0x7f (pressed) are sent by the hardware.
    /// Any other non-zero value is treated as pressed.
    #[must_use]
    pub const fn from_u7(input: u8) -> Self {
        debug_assert!(input <= 127);
        match input {
            0x00 => Self::Released,
            _ => Self::Pressed,
        }
    }

    #[must_use]
    pub const fn is_pressed(self) -> bool {
        matches!(self, Self::Pressed)
    }
}

/// An endless encoder that sends discrete delta values when rotated
/// in CW (positive) or CCW (negative) direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepEncoderInput {
    pub delta: i32,
}

impl StepEncoderInput {
    /// Map a 7-bit data byte to a signed step delta (two's complement).
    #[must_use]
    pub const fn from_u7(input: u8) -> Self {
        debug_assert!(input <= 127);
        let delta = if input < 64 {
            input as i32
        } else {
            input as i32 - 128
        };
        Self { delta }
    }
}

/// A continuous fader or knob.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderInput {
    /// Position in the interval [0, 1]
    pub position: f32,
}

impl SliderInput {
    pub const MIN_POSITION: f32 = 0.0;
    pub const MAX_POSITION: f32 = 1.0;

    #[must_use]
    pub fn from_u7(input: u8) -> Self {
        debug_assert!(input <= 127);
        let position = f32::from(input) / 127.0;
        Self { position }
    }

    #[must_use]
    pub fn clamp_position(position: f32) -> Self {
        let position = position.clamp(Self::MIN_POSITION, Self::MAX_POSITION);
        Self { position }
    }
}

/// Any input value emitted by a hardware sensor.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::From)]
pub enum Input {
    Button(ButtonInput),
    StepEncoder(StepEncoderInput),
    Slider(SliderInput),
}

/// A time-stamped input event.
#[derive(Debug, Clone, Copy)]
pub struct Event<T> {
    pub ts: TimeStamp,
    pub input: T,
}
