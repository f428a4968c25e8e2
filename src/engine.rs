// SPDX-FileCopyrightText: The hercules-air authors
// SPDX-License-Identifier: MPL-2.0

//! Host engine abstraction.
//!
//! The mixing engine is owned by the host application. Mappings reach it
//! exclusively through the opaque get/set value interface and the scratch
//! simulation interface of the [`Engine`] trait. All calls are
//! fire-and-forget against a trusted host.

use std::fmt;

use strum::{AsRefStr, Display, EnumCount, EnumIter};

/// Physical deck of a two-deck controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount)]
pub enum Deck {
    /// Left deck
    A,
    /// Right deck
    B,
}

impl Deck {
    /// Number of the corresponding host mixer channel (1-based).
    #[must_use]
    pub const fn channel(self) -> u8 {
        match self {
            Self::A => 1,
            Self::B => 2,
        }
    }
}

/// Host control group.
///
/// Rendered as the host's group identifier, e.g. `[Master]`, `[Channel1]`,
/// `[Sampler3]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Master,
    Deck(Deck),
    /// Sampler slot (1-based)
    Sampler(u8),
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Master => f.write_str("[Master]"),
            Self::Deck(deck) => write!(f, "[Channel{channel}]", channel = deck.channel()),
            Self::Sampler(slot) => write!(f, "[Sampler{slot}]"),
        }
    }
}

/// Named engine control within a [`Group`].
///
/// Rendered as the host's control identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumCount)]
pub enum Control {
    #[strum(serialize = "play")]
    Play,
    #[strum(serialize = "start_play")]
    StartPlay,
    #[strum(serialize = "playposition")]
    PlayPosition,
    #[strum(serialize = "jog")]
    Jog,
    #[strum(serialize = "headMix")]
    HeadMix,
    #[strum(serialize = "volume")]
    Volume,
    #[strum(serialize = "filterLow")]
    FilterLow,
    #[strum(serialize = "filterMid")]
    FilterMid,
    #[strum(serialize = "filterHigh")]
    FilterHigh,
    #[strum(serialize = "pregain")]
    Pregain,
    #[strum(serialize = "crossfader")]
    Crossfader,
    #[strum(serialize = "beat_active")]
    BeatActive,
    #[strum(serialize = "LoadSelectedTrack")]
    LoadSelectedTrack,
    #[strum(serialize = "num_decks")]
    NumDecks,
    #[strum(serialize = "num_samplers")]
    NumSamplers,
}

/// Tuning constants of the host's vinyl scratch simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScratchParams {
    /// Filter coefficient alpha
    pub alpha: f64,

    /// Filter coefficient beta
    pub beta: f64,

    /// Wheel resolution in intervals per revolution
    pub intervals_per_rev: u32,

    /// Simulated turntable speed
    pub rpm: f64,
}

/// Host-owned mixing state and scratch simulation.
///
/// No retries, no failure recovery: malformed values are the caller's
/// responsibility and calls never report errors (see the crate docs).
pub trait Engine {
    /// Read the current value of a control.
    #[must_use]
    fn get_value(&self, group: Group, control: Control) -> f64;

    /// Set the value of a control.
    fn set_value(&mut self, group: Group, control: Control, value: f64);

    /// Query whether the scratch simulation is active for a deck.
    #[must_use]
    fn is_scratching(&self, deck: Deck) -> bool;

    /// Start the scratch simulation for a deck.
    fn scratch_enable(&mut self, deck: Deck, params: ScratchParams);

    /// Stop the scratch simulation for a deck.
    fn scratch_disable(&mut self, deck: Deck);

    /// Feed a wheel movement into the scratch accumulator.
    fn scratch_tick(&mut self, deck: Deck, delta: i32);

    /// Enable or disable soft takeover for a control.
    ///
    /// Prevents physical-control jumps from overriding the software
    /// state abruptly.
    fn soft_takeover(&mut self, group: Group, control: Control, enable: bool);

    /// Register for change notifications of a control.
    ///
    /// The host delivers changes back into the mapping synchronously,
    /// e.g. through `Controller::control_changed`.
    fn connect_control(&mut self, group: Group, control: Control);
}
