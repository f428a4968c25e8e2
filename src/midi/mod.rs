// SPDX-FileCopyrightText: The hercules-air authors
// SPDX-License-Identifier: MPL-2.0

//! MIDI transport abstractions.

use std::ops::{Deref, DerefMut};

use crate::{OutputResult, TimeStamp};

#[cfg(feature = "midir")]
pub mod midir;

/// Descriptor of a supported MIDI device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub vendor_name: &'static str,
    pub model_name: &'static str,

    /// Prefix for matching the names of the input/output ports.
    pub port_name_prefix: &'static str,
}

/// Passive callback for sinking MIDI input messages.
pub trait MidiInputHandler: Send {
    /// Invoked for each incoming message.
    ///
    /// Returns `true` if the message has been accepted and handled
    /// or `false` otherwise.
    #[must_use]
    fn handle_midi_input(&mut self, ts: TimeStamp, input: &[u8]) -> bool;
}

impl<D> MidiInputHandler for D
where
    D: DerefMut + Send,
    <D as Deref>::Target: MidiInputHandler,
{
    fn handle_midi_input(&mut self, ts: TimeStamp, input: &[u8]) -> bool {
        self.deref_mut().handle_midi_input(ts, input)
    }
}

/// Fire-and-forget output of raw MIDI messages.
pub trait MidiOutputConnection {
    fn send_midi_output(&mut self, output: &[u8]) -> OutputResult<()>;
}

impl<D> MidiOutputConnection for D
where
    D: DerefMut,
    <D as Deref>::Target: MidiOutputConnection,
{
    fn send_midi_output(&mut self, output: &[u8]) -> OutputResult<()> {
        self.deref_mut().send_midi_output(output)
    }
}
