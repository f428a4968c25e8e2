// SPDX-FileCopyrightText: The hercules-air authors
// SPDX-License-Identifier: MPL-2.0

//! Hercules DJ Control AIR
//!
//! Two-deck MIDI controller with touch-sensitive jog wheels, sampler pads,
//! and a 4-step beat-progress LED band next to each wheel.

use crate::{midi::DeviceDescriptor, Deck, ScratchParams};

mod input;
pub use self::input::{try_decode_midi_input, DeckSensor, MainSensor, Sensor};

mod output;
pub use self::output::{BeatStep, DeckLed, Led, MainLed, OutputGateway};

mod controller;
pub use self::controller::Controller;

#[cfg(test)]
mod tests;

pub const DEVICE_DESCRIPTOR: DeviceDescriptor = DeviceDescriptor {
    vendor_name: "Hercules",
    model_name: "DJ Control AIR",
    port_name_prefix: "DJ Control AIR",
};

/// Vinyl scratch simulation tuning (33 1/3 rpm turntable).
pub const SCRATCH_PARAMS: ScratchParams = ScratchParams {
    alpha: 1.0 / 8.0,
    beta: (1.0 / 8.0) / 32.0,
    intervals_per_rev: 128,
    rpm: 33.0 + 1.0 / 3.0,
};

/// Default wheel sensitivity for jog nudges.
pub const DEFAULT_WHEEL_MULTIPLIER: f64 = 0.4;

/// Absolute playposition step per wheel tick while paused in scratch mode.
pub const PAUSED_WHEEL_POSITION_STEP: f64 = 0.008;

const MIDI_CMD_NOTE_ON: u8 = 0x90;
const MIDI_STATUS_CC_DECK_A: u8 = 0xb0;
const MIDI_STATUS_CC_DECK_B: u8 = 0xb1;

// Buttons (note numbers, shared with the corresponding LEDs)
const MIDI_SAMPLER_1_BUTTON: u8 = 0x10;
const MIDI_SAMPLER_2_BUTTON: u8 = 0x11;
const MIDI_SAMPLER_3_BUTTON: u8 = 0x12;
const MIDI_SAMPLER_4_BUTTON: u8 = 0x13;
const MIDI_DECK_A_SCRATCH_BUTTON: u8 = 0x21;
const MIDI_DECK_B_SCRATCH_BUTTON: u8 = 0x29;
const MIDI_SHIFT_BUTTON: u8 = 0x2d;
const MIDI_SPINBACK_BUTTON: u8 = 0x2e;
const MIDI_HEAD_MIX_BUTTON: u8 = 0x39;
const MIDI_HEAD_CUE_BUTTON: u8 = 0x3a;
const MIDI_HEAD_VOLUME_DOWN_LED: u8 = 0x3b;
const MIDI_HEAD_VOLUME_UP_LED: u8 = 0x3c;

// Jog wheels (control change, one MIDI channel per deck)
const MIDI_WHEEL_TURN_CC: u8 = 0x30;
const MIDI_JOG_RING_CC: u8 = 0x31;

// Beat-progress LED bands
const MIDI_DECK_A_BEAT_LED_START: u8 = 0x44;
const MIDI_DECK_B_BEAT_LED_START: u8 = 0x4c;
const BEAT_LED_BAND_LEN: u8 = 4;

const fn beat_led_band_start(deck: Deck) -> u8 {
    match deck {
        Deck::A => MIDI_DECK_A_BEAT_LED_START,
        Deck::B => MIDI_DECK_B_BEAT_LED_START,
    }
}
