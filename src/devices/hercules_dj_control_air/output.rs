// SPDX-FileCopyrightText: The hercules-air authors
// SPDX-License-Identifier: MPL-2.0

use strum::{EnumCount, EnumIter, IntoEnumIterator as _};

use super::{
    beat_led_band_start, BEAT_LED_BAND_LEN, MIDI_CMD_NOTE_ON, MIDI_HEAD_CUE_BUTTON,
    MIDI_HEAD_MIX_BUTTON, MIDI_HEAD_VOLUME_DOWN_LED, MIDI_HEAD_VOLUME_UP_LED, MIDI_SHIFT_BUTTON,
    MIDI_SPINBACK_BUTTON,
};
use crate::{led_to_u7, Deck, LedOutput, MidiOutputConnection, OutputError, OutputResult};

/// Cursor within a deck's beat-progress LED band.
///
/// Wraps around after the last step, i.e. always stays within the band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BeatStep(u8);

impl BeatStep {
    pub const FIRST: Self = Self(0);

    #[must_use]
    pub const fn next(self) -> Self {
        Self((self.0 + 1) % BEAT_LED_BAND_LEN)
    }

    const fn data1(self, deck: Deck) -> u8 {
        beat_led_band_start(deck) + self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumCount)]
pub enum MainLed {
    ShiftButton,
    SpinbackButton,
    HeadMixButton,
    HeadCueButton,
    HeadVolumeDownButton,
    HeadVolumeUpButton,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckLed {
    BeatStep(BeatStep),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Led {
    Main(MainLed),
    Deck(Deck, DeckLed),
}

impl From<MainLed> for Led {
    fn from(from: MainLed) -> Self {
        Self::Main(from)
    }
}

const fn led_to_data1(led: Led) -> u8 {
    match led {
        Led::Main(led) => match led {
            MainLed::ShiftButton => MIDI_SHIFT_BUTTON,
            MainLed::SpinbackButton => MIDI_SPINBACK_BUTTON,
            MainLed::HeadMixButton => MIDI_HEAD_MIX_BUTTON,
            MainLed::HeadCueButton => MIDI_HEAD_CUE_BUTTON,
            MainLed::HeadVolumeDownButton => MIDI_HEAD_VOLUME_DOWN_LED,
            MainLed::HeadVolumeUpButton => MIDI_HEAD_VOLUME_UP_LED,
        },
        Led::Deck(deck, led) => match led {
            DeckLed::BeatStep(step) => step.data1(deck),
        },
    }
}

/// Sends LED states as `(status, index, intensity)` triples.
#[allow(missing_debug_implementations)]
pub struct OutputGateway<C> {
    midi_output_connection: Option<C>,
}

impl<C> Default for OutputGateway<C> {
    fn default() -> Self {
        Self {
            midi_output_connection: None,
        }
    }
}

impl<C: MidiOutputConnection> OutputGateway<C> {
    pub fn attach_midi_output_connection(&mut self, midi_output_connection: &mut Option<C>) {
        debug_assert!(self.midi_output_connection.is_none());
        debug_assert!(midi_output_connection.is_some());
        self.midi_output_connection = midi_output_connection.take();
    }

    pub fn detach_midi_output_connection(&mut self) -> Option<C> {
        self.midi_output_connection.take()
    }

    pub fn send_led_output(&mut self, led: Led, output: LedOutput) -> OutputResult<()> {
        let Some(midi_output_connection) = &mut self.midi_output_connection else {
            return Err(OutputError::Disconnected);
        };
        let data1 = led_to_data1(led);
        midi_output_connection.send_midi_output(&[MIDI_CMD_NOTE_ON, data1, led_to_u7(output)])
    }

    /// Extinguish every mapped LED.
    pub fn reset_all_leds(&mut self) -> OutputResult<()> {
        for led in MainLed::iter() {
            self.send_led_output(led.into(), LedOutput::Off)?;
        }
        for deck in Deck::iter() {
            for step in 0..BEAT_LED_BAND_LEN {
                self.send_led_output(
                    Led::Deck(deck, DeckLed::BeatStep(BeatStep(step))),
                    LedOutput::Off,
                )?;
            }
        }
        Ok(())
    }
}
