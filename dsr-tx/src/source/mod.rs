// DSR
// Copyright (c) 2026 The Project DSR Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Audio sources.

mod rawaudio;
mod tone;

use dsr_core::audio::AudioSource;
use dsr_core::errors::{config_error, Result};

use crate::config::ChannelConfig;

/// Opens the audio source described by a channel's configuration.
///
/// An unrecognised source type is a configuration error; an IO failure opening a recognised
/// source surfaces as [`Error::IoError`](dsr_core::errors::Error::IoError) so the caller can
/// silence the channel and continue.
pub fn open(config: &ChannelConfig) -> Result<Box<dyn AudioSource>> {
    match config.kind.as_str() {
        "rawaudio" => {
            let input = match &config.input {
                Some(input) => input,
                None => return config_error("missing input filename"),
            };

            let source =
                rawaudio::RawAudioSource::open(input, config.exec, config.stereo, config.repeat)?;

            Ok(Box::new(source))
        }
        "tone" => Ok(Box::new(tone::ToneSource::new(config.frequency, config.level))),
        other => config_error(format!("unrecognised input type '{}'", other)),
    }
}
