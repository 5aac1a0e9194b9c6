// DSR
// Copyright (c) 2026 The Project DSR Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use dsr_core::text::NAME_LEN;

/// Operating mode of one mono programme channel.
///
/// Channel indices `2k` and `2k + 1` form a stereo pair when the even channel is `Primary` and
/// the odd channel is `Secondary`; a lone `Primary` is an independent mono channel.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ChannelMode {
    Off = 0,
    Primary = 1,
    Secondary = 2,
}

/// Descriptor of one of the 32 mono programme channels.
#[derive(Copy, Clone, Debug)]
pub struct Channel {
    /// Programme type, `0..16`. See [`PROGRAMME_TYPES`].
    pub ptype: u8,
    /// Music (true) or speech (false) programme.
    pub music: bool,
    pub mode: ChannelMode,
    /// Station name in the DSR character set.
    pub name: [u8; NAME_LEN],
}

impl Channel {
    /// Index of this channel's programme-attribute byte in the parity table.
    pub(crate) fn pa_index(&self) -> usize {
        ((self.ptype as usize & 0x0F) << 4) | ((self.music as usize) << 3) | ((self.mode as usize) << 1)
    }
}

impl Default for Channel {
    fn default() -> Channel {
        Channel { ptype: 0, music: true, mode: ChannelMode::Off, name: [0; NAME_LEN] }
    }
}

/// One of the sixteen DSR programme types.
pub struct ProgrammeType {
    pub number: u8,
    pub name: &'static str,
    pub short_name: &'static str,
    /// Whether the type denotes a music programme; `None` for the undefined type.
    pub music: Option<bool>,
}

/// The programme types carried in the PA descriptor block.
pub const PROGRAMME_TYPES: [ProgrammeType; 16] = [
    ProgrammeType { number: 0, name: "No programme type or undefined", short_name: "UNDEF", music: None },
    ProgrammeType { number: 1, name: "News", short_name: "NEWS", music: Some(false) },
    ProgrammeType { number: 2, name: "Current affairs", short_name: "AFFAIRS", music: Some(false) },
    ProgrammeType { number: 3, name: "Information", short_name: "INFO", music: Some(false) },
    ProgrammeType { number: 4, name: "Sport", short_name: "SPORT", music: Some(false) },
    ProgrammeType { number: 5, name: "Education", short_name: "EDUCATE", music: Some(false) },
    ProgrammeType { number: 6, name: "Drama", short_name: "DRAMA", music: Some(false) },
    ProgrammeType { number: 7, name: "Culture", short_name: "CULTURES", music: Some(false) },
    ProgrammeType { number: 8, name: "Science", short_name: "SCIENCE", music: Some(false) },
    ProgrammeType { number: 9, name: "Varied", short_name: "VARIED", music: Some(false) },
    ProgrammeType { number: 10, name: "Pop music", short_name: "POP M", music: Some(true) },
    ProgrammeType { number: 11, name: "Rock music", short_name: "ROCK M", music: Some(true) },
    ProgrammeType { number: 12, name: "M.O.R. music", short_name: "M.O.R. M", music: Some(true) },
    ProgrammeType { number: 13, name: "Light classical", short_name: "LIGHT M", music: Some(true) },
    ProgrammeType { number: 14, name: "Serious classical", short_name: "CLASSICS", music: Some(true) },
    ProgrammeType { number: 15, name: "Other music", short_name: "OTHER M", music: Some(true) },
];
