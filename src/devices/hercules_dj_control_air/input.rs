// SPDX-FileCopyrightText: The hercules-air authors
// SPDX-License-Identifier: MPL-2.0

use strum::{EnumCount, EnumIter, FromRepr};

use super::{
    MIDI_CMD_NOTE_ON, MIDI_DECK_A_SCRATCH_BUTTON, MIDI_DECK_B_SCRATCH_BUTTON, MIDI_HEAD_CUE_BUTTON,
    MIDI_HEAD_MIX_BUTTON, MIDI_JOG_RING_CC, MIDI_SAMPLER_1_BUTTON, MIDI_SAMPLER_2_BUTTON,
    MIDI_SAMPLER_3_BUTTON, MIDI_SAMPLER_4_BUTTON, MIDI_SHIFT_BUTTON, MIDI_SPINBACK_BUTTON,
    MIDI_STATUS_CC_DECK_A, MIDI_STATUS_CC_DECK_B, MIDI_WHEEL_TURN_CC,
};
use crate::{ButtonInput, Deck, Input, StepEncoderInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr, EnumIter, EnumCount)]
pub enum MainSensor {
    ShiftButton,
    SpinbackButton,
    HeadCueButton,
    HeadMixButton,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr, EnumIter, EnumCount)]
pub enum DeckSensor {
    /// Touch surface of the jog wheel (scratching)
    WheelTurnEncoder,
    /// Outer ring of the jog wheel (nudging)
    JogRingEncoder,
    /// Wheel touch button that engages the scratch simulation
    ScratchButton,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sensor {
    Main(MainSensor),
    Deck(Deck, DeckSensor),
    /// Sampler pad (1-based slot)
    SamplerPad(u8),
}

impl From<MainSensor> for Sensor {
    fn from(from: MainSensor) -> Self {
        Self::Main(from)
    }
}

/// Decode a received MIDI message.
///
/// Messages that do not belong to the mapping decode to `None`.
#[must_use]
pub fn try_decode_midi_input(input: &[u8]) -> Option<(Sensor, Input)> {
    let [status, data1, data2] = *input else {
        return None;
    };
    let (sensor, input) = match status {
        MIDI_CMD_NOTE_ON => {
            let input = ButtonInput::from_u7(data2);
            let sensor = match data1 {
                MIDI_SHIFT_BUTTON => MainSensor::ShiftButton.into(),
                MIDI_SPINBACK_BUTTON => MainSensor::SpinbackButton.into(),
                MIDI_HEAD_CUE_BUTTON => MainSensor::HeadCueButton.into(),
                MIDI_HEAD_MIX_BUTTON => MainSensor::HeadMixButton.into(),
                MIDI_SAMPLER_1_BUTTON => Sensor::SamplerPad(1),
                MIDI_SAMPLER_2_BUTTON => Sensor::SamplerPad(2),
                MIDI_SAMPLER_3_BUTTON => Sensor::SamplerPad(3),
                MIDI_SAMPLER_4_BUTTON => Sensor::SamplerPad(4),
                MIDI_DECK_A_SCRATCH_BUTTON => Sensor::Deck(Deck::A, DeckSensor::ScratchButton),
                MIDI_DECK_B_SCRATCH_BUTTON => Sensor::Deck(Deck::B, DeckSensor::ScratchButton),
                _ => {
                    return None;
                }
            };
            (sensor, input.into())
        }
        MIDI_STATUS_CC_DECK_A | MIDI_STATUS_CC_DECK_B => {
            let deck = match status {
                MIDI_STATUS_CC_DECK_A => Deck::A,
                MIDI_STATUS_CC_DECK_B => Deck::B,
                _ => unreachable!(),
            };
            let sensor = match data1 {
                MIDI_WHEEL_TURN_CC => DeckSensor::WheelTurnEncoder,
                MIDI_JOG_RING_CC => DeckSensor::JogRingEncoder,
                _ => {
                    return None;
                }
            };
            let input = StepEncoderInput::from_u7(data2);
            (Sensor::Deck(deck, sensor), input.into())
        }
        _ => {
            return None;
        }
    };
    Some((sensor, input))
}
