// SPDX-FileCopyrightText: The hercules-air authors
// SPDX-License-Identifier: MPL-2.0

use std::collections::{HashMap, HashSet};

use super::*;
use crate::{
    ButtonInput, Control, Deck, Engine, Group, Input, MidiInputHandler as _, OutputResult,
    ScratchParams, TimeStamp,
};

#[derive(Debug, Clone, PartialEq)]
enum EngineCall {
    SetValue(Group, Control, f64),
    ScratchEnable(Deck, ScratchParams),
    ScratchDisable(Deck),
    ScratchTick(Deck, i32),
    SoftTakeover(Group, Control, bool),
    ConnectControl(Group, Control),
}

#[derive(Debug, Default)]
struct FakeEngine {
    values: HashMap<(Group, Control), f64>,
    scratching: HashSet<Deck>,
    calls: Vec<EngineCall>,
}

impl FakeEngine {
    fn with_value(mut self, group: Group, control: Control, value: f64) -> Self {
        self.values.insert((group, control), value);
        self
    }

    fn with_scratching(mut self, deck: Deck) -> Self {
        self.scratching.insert(deck);
        self
    }
}

impl Engine for FakeEngine {
    fn get_value(&self, group: Group, control: Control) -> f64 {
        self.values.get(&(group, control)).copied().unwrap_or(0.0)
    }

    fn set_value(&mut self, group: Group, control: Control, value: f64) {
        self.values.insert((group, control), value);
        self.calls.push(EngineCall::SetValue(group, control, value));
    }

    fn is_scratching(&self, deck: Deck) -> bool {
        self.scratching.contains(&deck)
    }

    fn scratch_enable(&mut self, deck: Deck, params: ScratchParams) {
        self.scratching.insert(deck);
        self.calls.push(EngineCall::ScratchEnable(deck, params));
    }

    fn scratch_disable(&mut self, deck: Deck) {
        self.scratching.remove(&deck);
        self.calls.push(EngineCall::ScratchDisable(deck));
    }

    fn scratch_tick(&mut self, deck: Deck, delta: i32) {
        self.calls.push(EngineCall::ScratchTick(deck, delta));
    }

    fn soft_takeover(&mut self, group: Group, control: Control, enable: bool) {
        self.calls
            .push(EngineCall::SoftTakeover(group, control, enable));
    }

    fn connect_control(&mut self, group: Group, control: Control) {
        self.calls.push(EngineCall::ConnectControl(group, control));
    }
}

#[derive(Debug, Default)]
struct RecordingMidiOutput {
    sent: Vec<Vec<u8>>,
}

impl crate::MidiOutputConnection for RecordingMidiOutput {
    fn send_midi_output(&mut self, output: &[u8]) -> OutputResult<()> {
        self.sent.push(output.to_vec());
        Ok(())
    }
}

fn connected_controller(engine: FakeEngine) -> Controller<FakeEngine, RecordingMidiOutput> {
    let mut controller = Controller::new(engine);
    let mut connection = Some(RecordingMidiOutput::default());
    controller.attach_midi_output_connection(&mut connection);
    controller
}

fn sent_messages(controller: &mut Controller<FakeEngine, RecordingMidiOutput>) -> Vec<Vec<u8>> {
    controller
        .detach_midi_output_connection()
        .expect("attached")
        .sent
}

fn wheel_turn(deck: Deck, delta: i32) -> (Sensor, Input) {
    (
        Sensor::Deck(deck, DeckSensor::WheelTurnEncoder),
        crate::StepEncoderInput { delta }.into(),
    )
}

fn jog_ring(deck: Deck, delta: i32) -> (Sensor, Input) {
    (
        Sensor::Deck(deck, DeckSensor::JogRingEncoder),
        crate::StepEncoderInput { delta }.into(),
    )
}

fn button(sensor: Sensor, input: ButtonInput) -> (Sensor, Input) {
    (sensor, input.into())
}

#[test]
fn wheel_turn_nudges_jog_when_not_scratching() {
    let mut controller = connected_controller(FakeEngine::default());
    let (sensor, input) = wheel_turn(Deck::A, 1);
    controller.handle_sensor_input(sensor, input);
    let (sensor, input) = wheel_turn(Deck::A, -1);
    controller.handle_sensor_input(sensor, input);
    assert_eq!(
        vec![
            EngineCall::SetValue(Group::Deck(Deck::A), Control::Jog, DEFAULT_WHEEL_MULTIPLIER),
            EngineCall::SetValue(
                Group::Deck(Deck::A),
                Control::Jog,
                -DEFAULT_WHEEL_MULTIPLIER
            ),
        ],
        controller.engine().calls
    );
}

#[test]
fn wheel_turn_feeds_scratch_accumulator_while_playing() {
    let engine = FakeEngine::default()
        .with_scratching(Deck::B)
        .with_value(Group::Deck(Deck::B), Control::Play, 1.0);
    let mut controller = connected_controller(engine);
    let (sensor, input) = wheel_turn(Deck::B, -1);
    controller.handle_sensor_input(sensor, input);
    assert_eq!(
        vec![EngineCall::ScratchTick(Deck::B, -1)],
        controller.engine().calls
    );
}

#[test]
fn wheel_turn_edits_playposition_while_paused() {
    let engine = FakeEngine::default()
        .with_scratching(Deck::A)
        .with_value(Group::Deck(Deck::A), Control::PlayPosition, 0.5);
    let mut controller = connected_controller(engine);
    let (sensor, input) = wheel_turn(Deck::A, 1);
    controller.handle_sensor_input(sensor, input);
    let position = controller
        .engine()
        .get_value(Group::Deck(Deck::A), Control::PlayPosition);
    assert!(float_cmp::approx_eq!(
        f64,
        0.5 + PAUSED_WHEEL_POSITION_STEP,
        position,
        ulps = 2
    ));
}

#[test]
fn wheel_turn_clamps_playposition() {
    let engine = FakeEngine::default()
        .with_scratching(Deck::A)
        .with_value(Group::Deck(Deck::A), Control::PlayPosition, 0.999);
    let mut controller = connected_controller(engine);
    let (sensor, input) = wheel_turn(Deck::A, 1);
    controller.handle_sensor_input(sensor, input);
    assert!(float_cmp::approx_eq!(
        f64,
        1.0,
        controller
            .engine()
            .get_value(Group::Deck(Deck::A), Control::PlayPosition),
        ulps = 2
    ));

    let engine = FakeEngine::default()
        .with_scratching(Deck::A)
        .with_value(Group::Deck(Deck::A), Control::PlayPosition, 0.001);
    let mut controller = connected_controller(engine);
    let (sensor, input) = wheel_turn(Deck::A, -1);
    controller.handle_sensor_input(sensor, input);
    assert!(float_cmp::approx_eq!(
        f64,
        0.0,
        controller
            .engine()
            .get_value(Group::Deck(Deck::A), Control::PlayPosition),
        ulps = 2
    ));
}

#[test]
fn scratch_button_toggles_scratch_simulation() {
    let mut controller = connected_controller(FakeEngine::default());
    let (sensor, input) = button(
        Sensor::Deck(Deck::A, DeckSensor::ScratchButton),
        ButtonInput::Pressed,
    );
    controller.handle_sensor_input(sensor, input);
    let (sensor, input) = button(
        Sensor::Deck(Deck::A, DeckSensor::ScratchButton),
        ButtonInput::Released,
    );
    controller.handle_sensor_input(sensor, input);
    assert_eq!(
        vec![
            EngineCall::ScratchEnable(Deck::A, SCRATCH_PARAMS),
            EngineCall::ScratchDisable(Deck::A),
        ],
        controller.engine().calls
    );
}

#[test]
fn jog_ring_nudges_jog_even_in_scratch_mode() {
    let engine = FakeEngine::default().with_scratching(Deck::A);
    let mut controller = connected_controller(engine);
    let (sensor, input) = jog_ring(Deck::A, 1);
    controller.handle_sensor_input(sensor, input);
    assert_eq!(
        vec![EngineCall::SetValue(
            Group::Deck(Deck::A),
            Control::Jog,
            DEFAULT_WHEEL_MULTIPLIER
        )],
        controller.engine().calls
    );
}

#[test]
fn jog_ring_behaves_like_wheel_turn_with_spinback_enabled() {
    let engine = FakeEngine::default()
        .with_scratching(Deck::A)
        .with_value(Group::Deck(Deck::A), Control::Play, 1.0);
    let mut controller = connected_controller(engine);
    let (sensor, input) = button(
        Sensor::Main(MainSensor::SpinbackButton),
        ButtonInput::Pressed,
    );
    controller.handle_sensor_input(sensor, input);
    let (sensor, input) = jog_ring(Deck::A, -1);
    controller.handle_sensor_input(sensor, input);
    assert_eq!(
        vec![EngineCall::ScratchTick(Deck::A, -1)],
        controller.engine().calls
    );
}

#[test]
fn spinback_button_latches_on_press_edge_and_drives_its_led() {
    let mut controller = connected_controller(FakeEngine::default());
    let (sensor, input) = button(
        Sensor::Main(MainSensor::SpinbackButton),
        ButtonInput::Pressed,
    );
    controller.handle_sensor_input(sensor, input);
    let (sensor, input) = button(
        Sensor::Main(MainSensor::SpinbackButton),
        ButtonInput::Released,
    );
    controller.handle_sensor_input(sensor, input);
    let (sensor, input) = button(
        Sensor::Main(MainSensor::SpinbackButton),
        ButtonInput::Pressed,
    );
    controller.handle_sensor_input(sensor, input);
    assert_eq!(
        vec![
            vec![0x90, MIDI_SPINBACK_BUTTON, 0x7f],
            vec![0x90, MIDI_SPINBACK_BUTTON, 0x00],
        ],
        sent_messages(&mut controller)
    );
}

#[test]
fn shift_latch_reroutes_sampler_pads() {
    let mut controller = connected_controller(FakeEngine::default());
    let (sensor, input) = button(Sensor::Main(MainSensor::ShiftButton), ButtonInput::Pressed);
    controller.handle_sensor_input(sensor, input);
    let (sensor, input) = button(Sensor::SamplerPad(2), ButtonInput::Pressed);
    controller.handle_sensor_input(sensor, input);
    let (sensor, input) = button(Sensor::Main(MainSensor::ShiftButton), ButtonInput::Released);
    controller.handle_sensor_input(sensor, input);
    let (sensor, input) = button(Sensor::SamplerPad(2), ButtonInput::Pressed);
    controller.handle_sensor_input(sensor, input);
    assert_eq!(
        vec![
            EngineCall::SetValue(Group::Sampler(2), Control::LoadSelectedTrack, 1.0),
            EngineCall::SetValue(Group::Sampler(2), Control::StartPlay, 1.0),
        ],
        controller.engine().calls
    );
}

#[test]
fn sampler_pad_stops_playing_sampler() {
    let engine = FakeEngine::default().with_value(Group::Sampler(1), Control::Play, 1.0);
    let mut controller = connected_controller(engine);
    let (sensor, input) = button(Sensor::SamplerPad(1), ButtonInput::Pressed);
    controller.handle_sensor_input(sensor, input);
    assert_eq!(
        vec![EngineCall::SetValue(Group::Sampler(1), Control::Play, 0.0)],
        controller.engine().calls
    );
}

#[test]
fn sampler_pad_ignores_release_edge() {
    let mut controller = connected_controller(FakeEngine::default());
    let (sensor, input) = button(Sensor::SamplerPad(1), ButtonInput::Released);
    controller.handle_sensor_input(sensor, input);
    assert!(controller.engine().calls.is_empty());
}

#[test]
fn head_cue_button_switches_to_cue_only() {
    let engine = FakeEngine::default().with_value(Group::Master, Control::HeadMix, 0.0);
    let mut controller = connected_controller(engine);
    let (sensor, input) = button(Sensor::Main(MainSensor::HeadCueButton), ButtonInput::Pressed);
    controller.handle_sensor_input(sensor, input);
    assert_eq!(
        vec![EngineCall::SetValue(Group::Master, Control::HeadMix, -1.0)],
        controller.engine().calls
    );
    assert_eq!(
        vec![
            vec![0x90, MIDI_HEAD_MIX_BUTTON, 0x00],
            vec![0x90, MIDI_HEAD_CUE_BUTTON, 0x7f],
        ],
        sent_messages(&mut controller)
    );
}

#[test]
fn head_mix_button_centers_head_mix() {
    let engine = FakeEngine::default().with_value(Group::Master, Control::HeadMix, -1.0);
    let mut controller = connected_controller(engine);
    let (sensor, input) = button(Sensor::Main(MainSensor::HeadMixButton), ButtonInput::Pressed);
    controller.handle_sensor_input(sensor, input);
    assert_eq!(
        vec![EngineCall::SetValue(Group::Master, Control::HeadMix, 0.0)],
        controller.engine().calls
    );
    assert_eq!(
        vec![
            vec![0x90, MIDI_HEAD_MIX_BUTTON, 0x7f],
            vec![0x90, MIDI_HEAD_CUE_BUTTON, 0x00],
        ],
        sent_messages(&mut controller)
    );
}

#[test]
fn beat_progress_chases_through_the_band_and_wraps() {
    let mut controller = connected_controller(FakeEngine::default());
    for _ in 0..5 {
        controller.control_changed(Group::Deck(Deck::A), Control::BeatActive, 1.0);
        // Falling edges never advance the band.
        controller.control_changed(Group::Deck(Deck::A), Control::BeatActive, 0.0);
    }
    assert_eq!(
        vec![
            vec![0x90, 0x44, 0x7f],
            vec![0x90, 0x44, 0x00],
            vec![0x90, 0x45, 0x7f],
            vec![0x90, 0x45, 0x00],
            vec![0x90, 0x46, 0x7f],
            vec![0x90, 0x46, 0x00],
            vec![0x90, 0x47, 0x7f],
            vec![0x90, 0x47, 0x00],
            vec![0x90, 0x44, 0x7f],
        ],
        sent_messages(&mut controller)
    );
}

#[test]
fn beat_progress_bands_are_tracked_per_deck() {
    let mut controller = connected_controller(FakeEngine::default());
    controller.control_changed(Group::Deck(Deck::A), Control::BeatActive, 1.0);
    controller.control_changed(Group::Deck(Deck::B), Control::BeatActive, 1.0);
    assert_eq!(
        vec![vec![0x90, 0x44, 0x7f], vec![0x90, 0x4c, 0x7f]],
        sent_messages(&mut controller)
    );
}

#[test]
fn stopping_playback_rewinds_the_beat_band() {
    let mut controller = connected_controller(FakeEngine::default());
    controller.control_changed(Group::Deck(Deck::A), Control::BeatActive, 1.0);
    controller.control_changed(Group::Deck(Deck::A), Control::BeatActive, 1.0);
    controller.control_changed(Group::Deck(Deck::A), Control::Play, 0.0);
    controller.control_changed(Group::Deck(Deck::A), Control::BeatActive, 1.0);
    assert_eq!(
        vec![
            vec![0x90, 0x44, 0x7f],
            vec![0x90, 0x44, 0x00],
            vec![0x90, 0x45, 0x7f],
            // Playback stopped
            vec![0x90, 0x45, 0x00],
            // Band restarts from the first step
            vec![0x90, 0x44, 0x7f],
        ],
        sent_messages(&mut controller)
    );
}

#[test]
fn init_registers_soft_takeover_and_control_subscriptions() {
    let engine = FakeEngine::default()
        .with_value(Group::Master, Control::NumDecks, 2.0)
        .with_value(Group::Master, Control::NumSamplers, 4.0);
    let mut controller = connected_controller(engine);
    controller.init();
    let calls = &controller.engine().calls;
    let soft_takeover_count = calls
        .iter()
        .filter(|call| matches!(call, EngineCall::SoftTakeover(_, _, true)))
        .count();
    // 4 sampler pregains + 2 decks x 4 controls + crossfader
    assert_eq!(13, soft_takeover_count);
    for deck in [Deck::A, Deck::B] {
        assert!(calls.contains(&EngineCall::ConnectControl(
            Group::Deck(deck),
            Control::BeatActive
        )));
        assert!(calls.contains(&EngineCall::ConnectControl(
            Group::Deck(deck),
            Control::Play
        )));
    }
}

#[test]
fn init_restores_headset_leds() {
    let engine = FakeEngine::default().with_value(Group::Master, Control::HeadMix, 1.0);
    let mut controller = connected_controller(engine);
    controller.init();
    let sent = sent_messages(&mut controller);
    // After the reset sequence: volume -/+ always on, then the mix LED.
    let tail = &sent[sent.len() - 3..];
    assert_eq!(
        vec![
            vec![0x90, MIDI_HEAD_VOLUME_DOWN_LED, 0x7f],
            vec![0x90, MIDI_HEAD_VOLUME_UP_LED, 0x7f],
            vec![0x90, MIDI_HEAD_MIX_BUTTON, 0x7f],
        ],
        tail.to_vec()
    );
}

#[test]
fn shutdown_extinguishes_all_leds() {
    let mut controller = connected_controller(FakeEngine::default());
    controller.shutdown();
    let sent = sent_messages(&mut controller);
    // 6 main LEDs + 2 decks x 4 band steps
    assert_eq!(14, sent.len());
    assert!(sent
        .iter()
        .all(|message| message[0] == 0x90 && message[2] == 0x00));
}

#[test]
fn decode_wheel_and_jog_messages() {
    assert_eq!(
        Some((
            Sensor::Deck(Deck::A, DeckSensor::WheelTurnEncoder),
            crate::StepEncoderInput { delta: 1 }.into()
        )),
        decoded(&[0xb0, 0x30, 0x01])
    );
    assert_eq!(
        Some((
            Sensor::Deck(Deck::B, DeckSensor::JogRingEncoder),
            crate::StepEncoderInput { delta: -1 }.into()
        )),
        decoded(&[0xb1, 0x31, 0x7f])
    );
}

#[test]
fn decode_buttons() {
    assert_eq!(
        Some((Sensor::Main(MainSensor::ShiftButton), ButtonInput::Pressed)),
        decoded_button(&[0x90, 0x2d, 0x7f])
    );
    assert_eq!(
        Some((Sensor::SamplerPad(3), ButtonInput::Released)),
        decoded_button(&[0x90, 0x12, 0x00])
    );
    assert_eq!(
        Some((
            Sensor::Deck(Deck::B, DeckSensor::ScratchButton),
            ButtonInput::Pressed
        )),
        decoded_button(&[0x90, 0x29, 0x7f])
    );
}

#[test]
fn unknown_messages_are_not_decoded() {
    assert!(try_decode_midi_input(&[0x90, 0x7f, 0x7f]).is_none());
    assert!(try_decode_midi_input(&[0xb2, 0x30, 0x01]).is_none());
    assert!(try_decode_midi_input(&[0xf8]).is_none());
}

#[test]
fn midi_input_handler_reports_unhandled_messages() {
    let mut controller = connected_controller(FakeEngine::default());
    assert!(controller.handle_midi_input(TimeStamp::default(), &[0xb0, 0x30, 0x01]));
    assert!(!controller.handle_midi_input(TimeStamp::default(), &[0xf8]));
}

fn decoded(input: &[u8]) -> Option<(Sensor, Input)> {
    try_decode_midi_input(input)
}

fn decoded_button(input: &[u8]) -> Option<(Sensor, ButtonInput)> {
    match try_decode_midi_input(input) {
        Some((sensor, Input::Button(button))) => Some((sensor, button)),
        _ => None,
    }
}
