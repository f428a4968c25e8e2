// SPDX-FileCopyrightText: The hercules-air authors
// SPDX-License-Identifier: MPL-2.0

//! Keyboard event transport decoding.
//!
//! The host's keyboard controller delivers each key event as a fixed-length
//! byte buffer. Events are transient and reconstructed per incoming message,
//! never persisted.

use strum::FromRepr;
use thiserror::Error;

/// Length of a serialized keyboard event in bytes.
pub const EVENT_BUFFER_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid buffer length: {len}")]
    InvalidLength { len: usize },

    #[error("unknown event type: {0}")]
    UnknownEventType(u32),
}

/// Key event type.
///
/// Discriminants follow the host's native event type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr)]
#[repr(u32)]
pub enum KeyEventType {
    KeyPress = 6,
    KeyRelease = 7,
}

/// Modifier bitmask using the host's native encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::From)]
pub struct KeyModifiers(u32);

impl KeyModifiers {
    pub const NONE: Self = Self(0x0000_0000);
    pub const SHIFT: Self = Self(0x0200_0000);
    pub const CONTROL: Self = Self(0x0400_0000);
    pub const ALT: Self = Self(0x0800_0000);
    pub const META: Self = Self(0x1000_0000);

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

/// A single decoded key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardEvent {
    pub key_code: u32,
    pub modifiers: KeyModifiers,
    pub scan_code: u32,
    pub event_type: KeyEventType,
}

impl KeyboardEvent {
    /// Decode an event from its fixed-length wire representation.
    ///
    /// Layout: key code, modifier mask, scan code, event type,
    /// each as `u32` little-endian.
    pub fn try_decode(buffer: &[u8]) -> Result<Self, DecodeError> {
        let Ok(buffer) = <&[u8; EVENT_BUFFER_LEN]>::try_from(buffer) else {
            return Err(DecodeError::InvalidLength { len: buffer.len() });
        };
        let u32_at = |offset: usize| {
            u32::from_le_bytes([
                buffer[offset],
                buffer[offset + 1],
                buffer[offset + 2],
                buffer[offset + 3],
            ])
        };
        let key_code = u32_at(0);
        let modifiers = u32_at(4);
        let scan_code = u32_at(8);
        let event_type = u32_at(12);
        let Some(event_type) = KeyEventType::from_repr(event_type) else {
            return Err(DecodeError::UnknownEventType(event_type));
        };
        Ok(Self {
            key_code,
            modifiers: KeyModifiers(modifiers),
            scan_code,
            event_type,
        })
    }
}
