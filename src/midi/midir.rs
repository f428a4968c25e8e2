// SPDX-FileCopyrightText: The hercules-air authors
// SPDX-License-Identifier: MPL-2.0

//! MIDI connectivity via [`midir`].

use std::{collections::HashMap, marker::PhantomData};

use midir::{
    ConnectError, Ignore, InitError, MidiInput, MidiInputConnection, MidiInputPort, MidiInputPorts,
    MidiOutput, MidiOutputConnection, MidiOutputPort, MidiOutputPorts, SendError,
};
use thiserror::Error;

use super::{DeviceDescriptor, MidiInputHandler};
use crate::{OutputError, TimeStamp};

#[derive(Debug, Error)]
pub enum MidiPortError {
    #[error("disconnected")]
    Disconnected,
    #[error(transparent)]
    Init(#[from] InitError),
    #[error(transparent)]
    ConnectInput(#[from] ConnectError<MidiInput>),
    #[error(transparent)]
    ConnectOutput(#[from] ConnectError<MidiOutput>),
}

impl From<SendError> for OutputError {
    fn from(err: SendError) -> Self {
        OutputError::Send {
            msg: err.to_string().into(),
        }
    }
}

// Adapter for the midir callback closure
fn handle_input<I>(micros: u64, input: &[u8], input_handler: &mut I)
where
    I: MidiInputHandler,
{
    let ts = TimeStamp::from_micros(micros);
    log::trace!("Received MIDI input: {ts} {input:0x?}");
    if !input_handler.handle_midi_input(ts, input) {
        log::warn!("Unhandled MIDI input {ts} {input:x?}");
    }
}

/// MIDI device driven by [`midir`].
#[allow(missing_debug_implementations)]
pub struct MidirDevice<I>
where
    I: MidiInputHandler + 'static,
{
    descriptor: &'static DeviceDescriptor,
    input_port_name: String,
    input_port: MidiInputPort,
    output_port_name: String,
    output_port: MidiOutputPort,
    input_connection: Option<MidiInputConnection<I>>,
}

impl<I> MidirDevice<I>
where
    I: MidiInputHandler,
{
    #[must_use]
    fn new(
        descriptor: &'static DeviceDescriptor,
        input_port_name: String,
        input_port: MidiInputPort,
        output_port_name: String,
        output_port: MidiOutputPort,
    ) -> Self {
        Self {
            descriptor,
            input_port_name,
            input_port,
            output_port_name,
            output_port,
            input_connection: None,
        }
    }

    #[must_use]
    pub const fn descriptor(&self) -> &'static DeviceDescriptor {
        self.descriptor
    }

    #[must_use]
    pub fn input_port_name(&self) -> &str {
        &self.input_port_name
    }

    #[must_use]
    pub fn output_port_name(&self) -> &str {
        &self.output_port_name
    }

    #[must_use]
    pub fn is_available(&self, device_manager: &MidirDeviceManager<I>) -> bool {
        device_manager
            .filter_input_ports_by_name(|port_name| port_name == self.input_port_name)
            .next()
            .is_some()
            && device_manager
                .filter_output_ports_by_name(|port_name| port_name == self.output_port_name)
                .next()
                .is_some()
    }

    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.input_connection.is_some()
    }

    /// (Re-)connect the input and output ports.
    ///
    /// Returns the connected MIDI output connection for attaching it
    /// to an output gateway.
    pub fn reconnect<F>(
        &mut self,
        new_input_handler: Option<F>,
        output_connection: Option<MidiOutputConnection>,
    ) -> Result<MidiOutputConnection, MidiPortError>
    where
        F: FnOnce() -> I,
    {
        let input_connection = self.input_connection.take();
        debug_assert!(!self.is_connected());
        let input_connection = self.reconnect_input(input_connection, new_input_handler)?;
        let output_connection = self.reconnect_output(output_connection)?;
        self.input_connection = Some(input_connection);
        debug_assert!(self.is_connected());
        Ok(output_connection)
    }

    pub fn disconnect(&mut self) {
        let Some(input_connection) = self.input_connection.take() else {
            return;
        };
        input_connection.close();
        debug_assert!(!self.is_connected());
    }

    fn reconnect_input<F>(
        &self,
        connection: Option<MidiInputConnection<I>>,
        new_input_handler: Option<F>,
    ) -> Result<MidiInputConnection<I>, MidiPortError>
    where
        F: FnOnce() -> I,
    {
        let port_name = &self.input_port_name;
        let (input, input_handler) =
            if let Some((input, input_handler)) = connection.map(MidiInputConnection::close) {
                (input, input_handler)
            } else {
                let Some(new_input_handler) = new_input_handler else {
                    return Err(MidiPortError::Disconnected);
                };
                let input = MidiInput::new(port_name)?;
                (input, new_input_handler())
            };
        input
            .connect(
                &self.input_port,
                port_name,
                |micros, input, input_handler| {
                    handle_input(micros, input, input_handler);
                },
                input_handler,
            )
            .map_err(Into::into)
    }

    fn reconnect_output(
        &self,
        connection: Option<MidiOutputConnection>,
    ) -> Result<MidiOutputConnection, MidiPortError> {
        let port_name = &self.output_port_name;
        let output = match connection.map(MidiOutputConnection::close) {
            Some(output) => output,
            None => MidiOutput::new(port_name)?,
        };
        output
            .connect(&self.output_port, port_name)
            .map_err(Into::into)
    }
}

/// Identifies and connects [`MidirDevice`]s.
#[allow(missing_debug_implementations)]
pub struct MidirDeviceManager<I> {
    input: MidiInput,
    output: MidiOutput,
    _input_handler: PhantomData<I>,
}

impl<I> MidirDeviceManager<I>
where
    I: MidiInputHandler,
{
    pub fn new() -> Result<Self, InitError> {
        let mut input = MidiInput::new("input port watcher")?;
        input.ignore(Ignore::None);
        let output = MidiOutput::new("output port watcher")?;
        Ok(MidirDeviceManager {
            input,
            output,
            _input_handler: PhantomData,
        })
    }

    #[must_use]
    pub fn input_ports(&self) -> MidiInputPorts {
        self.input.ports()
    }

    #[must_use]
    pub fn output_ports(&self) -> MidiOutputPorts {
        self.output.ports()
    }

    pub fn filter_input_ports_by_name<'a>(
        &'a self,
        mut filter_port_name: impl FnMut(&str) -> bool + 'a,
    ) -> impl Iterator<Item = MidiInputPort> + 'a {
        self.input_ports().into_iter().filter(move |port| {
            self.input
                .port_name(port)
                .map_or(false, |port_name| filter_port_name(&port_name))
        })
    }

    pub fn filter_output_ports_by_name<'a>(
        &'a self,
        mut filter_port_name: impl FnMut(&str) -> bool + 'a,
    ) -> impl Iterator<Item = MidiOutputPort> + 'a {
        self.output_ports().into_iter().filter(move |port| {
            self.output
                .port_name(port)
                .map_or(false, |port_name| filter_port_name(&port_name))
        })
    }

    /// Detect supported DJ controllers among the available ports.
    ///
    /// Pairs each matching input port with the output port that shares
    /// the same device-specific port name prefix.
    #[must_use]
    pub fn detect_dj_controllers(
        &self,
        device_descriptors: &[&'static DeviceDescriptor],
    ) -> Vec<MidirDevice<I>> {
        let mut input_ports = self
            .input_ports()
            .into_iter()
            .filter_map(|port| {
                let port_name = self.input.port_name(&port).ok()?;
                let Some(descriptor) = device_descriptors.iter().copied().find(|descriptor| {
                    port_name.starts_with(descriptor.port_name_prefix)
                }) else {
                    log::debug!("Input port \"{port_name}\" does not belong to a DJ controller");
                    return None;
                };
                log::debug!("Detected input port \"{port_name}\" for {descriptor:?}");
                Some((descriptor.port_name_prefix, (descriptor, port_name, port)))
            })
            .collect::<HashMap<_, _>>();
        let mut output_ports = self
            .output_ports()
            .into_iter()
            .filter_map(|port| {
                let port_name = self.output.port_name(&port).ok()?;
                let Some(port_name_prefix) = input_ports
                    .keys()
                    .copied()
                    .find(|port_name_prefix| port_name.starts_with(port_name_prefix))
                else {
                    log::debug!("Output port \"{port_name}\" does not belong to a DJ controller");
                    return None;
                };
                log::debug!(
                    "Detected output port \"{port_name}\" for DJ controller \"{port_name_prefix}\""
                );
                Some((port_name_prefix, (port_name, port)))
            })
            .collect::<HashMap<_, _>>();
        input_ports.retain(|key, _| output_ports.contains_key(key));
        debug_assert_eq!(input_ports.len(), output_ports.len());
        input_ports
            .into_iter()
            .map(
                |(port_name_prefix, (descriptor, input_port_name, input_port))| {
                    let (output_port_name, output_port) =
                        output_ports.remove(port_name_prefix).expect("Some");
                    log::debug!(
                        "Found DJ controller {vendor_name} {model_name} (input port: \
                         \"{input_port_name}\", output port: \"{output_port_name}\")",
                        vendor_name = descriptor.vendor_name,
                        model_name = descriptor.model_name,
                    );
                    MidirDevice::new(
                        descriptor,
                        input_port_name,
                        input_port,
                        output_port_name,
                        output_port,
                    )
                },
            )
            .collect()
    }
}

impl crate::MidiOutputConnection for MidiOutputConnection {
    fn send_midi_output(&mut self, output: &[u8]) -> crate::OutputResult<()> {
        self.send(output).map_err(Into::into)
    }
}
