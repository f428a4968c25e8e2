// SPDX-FileCopyrightText: The hercules-air authors
// SPDX-License-Identifier: MPL-2.0

#![allow(rustdoc::invalid_rust_codeblocks)]
#![doc = include_str!("../README.md")]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(unreachable_pub)]
#![warn(unsafe_code)]
#![warn(clippy::pedantic)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(rustdoc::broken_intra_doc_links)]
// Repetitions of module/type names occur frequently when using many
// modules for keeping the size of the source files handy. Often
// types have the same name as their parent module.
#![allow(clippy::module_name_repetitions)]
// Repeating the type name in `..Default::default()` expressions
// is not needed since the context is obvious.
#![allow(clippy::default_trait_access)]

pub mod devices;

pub mod engine;
pub use self::engine::{Control, Deck, Engine, Group, ScratchParams};

pub mod input;
pub use self::input::{
    ButtonInput, Event as InputEvent, Input, SliderInput, StepEncoderInput, TimeStamp,
};

pub mod keyboard;
pub use self::keyboard::{KeyEventType, KeyModifiers, KeyboardEvent};

pub mod midi;
pub use self::midi::{DeviceDescriptor, MidiInputHandler, MidiOutputConnection};

pub mod output;
pub use self::output::{led_to_u7, LedOutput, OutputError, OutputResult};
