// SPDX-FileCopyrightText: The hercules-air authors
// SPDX-License-Identifier: MPL-2.0

use float_cmp::approx_eq;
use strum::IntoEnumIterator as _;

use super::{
    input::{try_decode_midi_input, DeckSensor, MainSensor, Sensor},
    output::{BeatStep, DeckLed, Led, MainLed, OutputGateway},
    DEFAULT_WHEEL_MULTIPLIER, DEVICE_DESCRIPTOR, PAUSED_WHEEL_POSITION_STEP, SCRATCH_PARAMS,
};
use crate::{
    ButtonInput, Control, Deck, Engine, Group, Input, LedOutput, MidiInputHandler,
    MidiOutputConnection, TimeStamp,
};

/// Beat-progress LED state of one deck.
#[derive(Debug, Clone, Copy, Default)]
struct BeatLeds {
    /// Currently lit step, if any
    lit: Option<BeatStep>,

    /// Step to light on the next beat
    next: BeatStep,
}

/// Control mapping for the Hercules DJ Control AIR.
///
/// Translates decoded sensor inputs into engine calls and drives the
/// LED feedback. All state is session-scoped and owned by the single
/// thread that dispatches the callbacks.
#[allow(missing_debug_implementations)]
pub struct Controller<E, C> {
    engine: E,
    output: OutputGateway<C>,

    shift_pressed: bool,
    spinback_enabled: bool,
    wheel_multiplier: f64,
    beat_leds: [BeatLeds; 2],
}

impl<E, C> Controller<E, C>
where
    E: Engine,
    C: MidiOutputConnection,
{
    #[must_use]
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            output: Default::default(),
            shift_pressed: false,
            spinback_enabled: false,
            wheel_multiplier: DEFAULT_WHEEL_MULTIPLIER,
            beat_leds: Default::default(),
        }
    }

    #[must_use]
    pub const fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Adjust the wheel sensitivity for jog nudges.
    pub fn set_wheel_multiplier(&mut self, wheel_multiplier: f64) {
        self.wheel_multiplier = wheel_multiplier;
    }

    pub fn attach_midi_output_connection(&mut self, midi_output_connection: &mut Option<C>) {
        self.output
            .attach_midi_output_connection(midi_output_connection);
    }

    pub fn detach_midi_output_connection(&mut self) -> Option<C> {
        self.output.detach_midi_output_connection()
    }

    /// Initialize the controller state after connecting.
    ///
    /// Extinguishes all LEDs, restores the headset LED states, registers
    /// soft takeover for all applicable controls, and subscribes to the
    /// engine notifications that drive the LED feedback.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn init(&mut self) {
        if let Err(err) = self.output.reset_all_leds() {
            log::warn!("Failed to reset LEDs: {err}");
        }
        // The headset volume button LEDs are always on.
        self.send_led(MainLed::HeadVolumeDownButton.into(), LedOutput::On);
        self.send_led(MainLed::HeadVolumeUpButton.into(), LedOutput::On);
        let head_mix = self.engine.get_value(Group::Master, Control::HeadMix);
        if head_mix > 0.5 {
            self.send_led(MainLed::HeadMixButton.into(), LedOutput::On);
        } else {
            self.send_led(MainLed::HeadCueButton.into(), LedOutput::On);
        }
        // Soft takeover for all sampler volumes
        let num_samplers = self.engine.get_value(Group::Master, Control::NumSamplers) as u8;
        for slot in 1..=num_samplers {
            self.engine
                .soft_takeover(Group::Sampler(slot), Control::Pregain, true);
        }
        // Soft takeover for all applicable deck controls
        let num_decks = self.engine.get_value(Group::Master, Control::NumDecks) as usize;
        for deck in Deck::iter().take(num_decks) {
            for control in [
                Control::Volume,
                Control::FilterHigh,
                Control::FilterMid,
                Control::FilterLow,
            ] {
                self.engine.soft_takeover(Group::Deck(deck), control, true);
            }
        }
        self.engine
            .soft_takeover(Group::Master, Control::Crossfader, true);
        for deck in Deck::iter() {
            self.engine
                .connect_control(Group::Deck(deck), Control::BeatActive);
            self.engine.connect_control(Group::Deck(deck), Control::Play);
        }
        log::info!(
            "{model_name} initialized",
            model_name = DEVICE_DESCRIPTOR.model_name
        );
    }

    /// Reset the controller state before disconnecting.
    pub fn shutdown(&mut self) {
        if let Err(err) = self.output.reset_all_leds() {
            log::warn!("Failed to reset LEDs: {err}");
        }
    }

    /// Dispatch a decoded sensor input.
    pub fn handle_sensor_input(&mut self, sensor: Sensor, input: Input) {
        match (sensor, input) {
            (Sensor::Deck(deck, DeckSensor::WheelTurnEncoder), Input::StepEncoder(input)) => {
                self.wheel_turn(deck, input.delta);
            }
            (Sensor::Deck(deck, DeckSensor::JogRingEncoder), Input::StepEncoder(input)) => {
                self.jog(deck, input.delta);
            }
            (Sensor::Deck(deck, DeckSensor::ScratchButton), Input::Button(input)) => {
                self.scratch_button(deck, input);
            }
            (Sensor::Main(MainSensor::ShiftButton), Input::Button(input)) => {
                self.shift_button(input);
            }
            (Sensor::Main(MainSensor::SpinbackButton), Input::Button(input)) => {
                self.spinback_button(input);
            }
            (Sensor::Main(MainSensor::HeadCueButton), Input::Button(input)) => {
                self.head_cue_button(input);
            }
            (Sensor::Main(MainSensor::HeadMixButton), Input::Button(input)) => {
                self.head_mix_button(input);
            }
            (Sensor::SamplerPad(slot), Input::Button(input)) => {
                self.sampler_pad(slot, input);
            }
            (sensor, input) => {
                log::debug!("Unmapped input: {sensor:?} {input:?}");
            }
        }
    }

    /// Invoked by the host when a subscribed control changes.
    pub fn control_changed(&mut self, group: Group, control: Control, value: f64) {
        match (group, control) {
            (Group::Deck(deck), Control::BeatActive) => self.beat_progress(deck, value),
            (Group::Deck(deck), Control::Play) => self.play_changed(deck, value),
            (group, control) => {
                log::debug!("Unsubscribed control change: {group} {control} = {value}");
            }
        }
    }

    /// Turning the wheel's touch surface.
    ///
    /// Outside of scratch mode the movement is forwarded as a scaled,
    /// relative jog nudge. In scratch mode a paused deck edits the
    /// absolute playposition directly, a playing deck feeds the scratch
    /// accumulator.
    fn wheel_turn(&mut self, deck: Deck, delta: i32) {
        let group = Group::Deck(deck);
        if !self.engine.is_scratching(deck) {
            self.engine
                .set_value(group, Control::Jog, f64::from(delta) * self.wheel_multiplier);
            return;
        }
        if self.is_paused(deck) {
            let position = self.engine.get_value(group, Control::PlayPosition)
                + PAUSED_WHEEL_POSITION_STEP * f64::from(delta.signum());
            self.engine
                .set_value(group, Control::PlayPosition, position.clamp(0.0, 1.0));
        } else {
            self.engine.scratch_tick(deck, delta);
        }
    }

    /// Turning the outer jog ring.
    fn jog(&mut self, deck: Deck, delta: i32) {
        if self.spinback_enabled {
            self.wheel_turn(deck, delta);
        } else {
            self.engine.set_value(
                Group::Deck(deck),
                Control::Jog,
                f64::from(delta) * self.wheel_multiplier,
            );
        }
    }

    fn scratch_button(&mut self, deck: Deck, input: ButtonInput) {
        match input {
            ButtonInput::Pressed => self.engine.scratch_enable(deck, SCRATCH_PARAMS),
            ButtonInput::Released => self.engine.scratch_disable(deck),
        }
    }

    fn shift_button(&mut self, input: ButtonInput) {
        self.shift_pressed = input.is_pressed();
        self.send_led(
            MainLed::ShiftButton.into(),
            LedOutput::from_bool(self.shift_pressed),
        );
    }

    fn spinback_button(&mut self, input: ButtonInput) {
        if !input.is_pressed() {
            return;
        }
        self.spinback_enabled = !self.spinback_enabled;
        self.send_led(
            MainLed::SpinbackButton.into(),
            LedOutput::from_bool(self.spinback_enabled),
        );
    }

    fn head_cue_button(&mut self, input: ButtonInput) {
        if !input.is_pressed() {
            return;
        }
        let head_mix = self.engine.get_value(Group::Master, Control::HeadMix);
        if approx_eq!(f64, head_mix, 0.0, ulps = 2) {
            self.engine.set_value(Group::Master, Control::HeadMix, -1.0);
            self.send_led(MainLed::HeadMixButton.into(), LedOutput::Off);
            self.send_led(MainLed::HeadCueButton.into(), LedOutput::On);
        }
    }

    fn head_mix_button(&mut self, input: ButtonInput) {
        if !input.is_pressed() {
            return;
        }
        let head_mix = self.engine.get_value(Group::Master, Control::HeadMix);
        if !approx_eq!(f64, head_mix, 1.0, ulps = 2) {
            self.engine.set_value(Group::Master, Control::HeadMix, 0.0);
            self.send_led(MainLed::HeadMixButton.into(), LedOutput::On);
            self.send_led(MainLed::HeadCueButton.into(), LedOutput::Off);
        }
    }

    fn sampler_pad(&mut self, slot: u8, input: ButtonInput) {
        if !input.is_pressed() {
            return;
        }
        let group = Group::Sampler(slot);
        if self.shift_pressed {
            self.engine
                .set_value(group, Control::LoadSelectedTrack, 1.0);
        } else if approx_eq!(
            f64,
            self.engine.get_value(group, Control::Play),
            0.0,
            ulps = 2
        ) {
            self.engine.set_value(group, Control::StartPlay, 1.0);
        } else {
            self.engine.set_value(group, Control::Play, 0.0);
        }
    }

    /// Advance the beat-progress LED band on a beat boundary.
    fn beat_progress(&mut self, deck: Deck, value: f64) {
        if !approx_eq!(f64, value, 1.0, ulps = 2) {
            // Only the rising edge advances the band.
            return;
        }
        let BeatLeds { lit, next } = *self.beat_leds(deck);
        if let Some(lit) = lit {
            self.send_led(Led::Deck(deck, DeckLed::BeatStep(lit)), LedOutput::Off);
        }
        self.send_led(Led::Deck(deck, DeckLed::BeatStep(next)), LedOutput::On);
        *self.beat_leds_mut(deck) = BeatLeds {
            lit: Some(next),
            next: next.next(),
        };
    }

    /// Rewind the beat-progress LED band when playback stops.
    fn play_changed(&mut self, deck: Deck, value: f64) {
        if !approx_eq!(f64, value, 0.0, ulps = 2) {
            return;
        }
        let BeatLeds { lit, .. } = *self.beat_leds(deck);
        if let Some(lit) = lit {
            self.send_led(Led::Deck(deck, DeckLed::BeatStep(lit)), LedOutput::Off);
        }
        *self.beat_leds_mut(deck) = BeatLeds {
            lit: None,
            next: BeatStep::FIRST,
        };
    }

    fn is_paused(&self, deck: Deck) -> bool {
        let play = self.engine.get_value(Group::Deck(deck), Control::Play);
        approx_eq!(f64, play, 0.0, ulps = 2)
    }

    const fn beat_leds(&self, deck: Deck) -> &BeatLeds {
        match deck {
            Deck::A => &self.beat_leds[0],
            Deck::B => &self.beat_leds[1],
        }
    }

    fn beat_leds_mut(&mut self, deck: Deck) -> &mut BeatLeds {
        match deck {
            Deck::A => &mut self.beat_leds[0],
            Deck::B => &mut self.beat_leds[1],
        }
    }

    fn send_led(&mut self, led: Led, output: LedOutput) {
        // Fire-and-forget: failures are logged, never propagated.
        if let Err(err) = self.output.send_led_output(led, output) {
            log::warn!("Failed to send LED output for {led:?}: {err}");
        }
    }
}

impl<E, C> MidiInputHandler for Controller<E, C>
where
    E: Engine + Send,
    C: MidiOutputConnection + Send,
{
    fn handle_midi_input(&mut self, _ts: TimeStamp, input: &[u8]) -> bool {
        let Some((sensor, input)) = try_decode_midi_input(input) else {
            return false;
        };
        self.handle_sensor_input(sensor, input);
        true
    }
}
