// SPDX-FileCopyrightText: The hercules-air authors
// SPDX-License-Identifier: MPL-2.0

pub mod hercules_dj_control_air;

// Descriptors of supported MIDI DJ controllers for auto-detection.
pub const MIDI_DJ_CONTROLLER_DESCRIPTORS: &[&crate::DeviceDescriptor] =
    &[&crate::devices::hercules_dj_control_air::DEVICE_DESCRIPTOR];
