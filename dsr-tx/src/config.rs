// DSR
// Copyright (c) 2026 The Project DSR Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transmitter configuration.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use dsr_core::errors::{config_error, Result};
use dsr_core::SYMBOL_RATE;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub verbose: bool,

    pub output: OutputConfig,

    #[serde(default, rename = "channel")]
    pub channels: Vec<ChannelConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Output back end; only "file" is built in.
    #[serde(rename = "type", default = "default_output_type")]
    pub kind: String,

    /// Output path; "-" writes to standard output.
    pub output: Option<String>,

    /// Sample format written by the file back end.
    pub data_type: Option<String>,

    /// Output sample rate; must be an integer multiple of the symbol rate.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Pace the output to real time through the bounded sample ring.
    #[serde(default)]
    pub live: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelConfig {
    /// Stereo channel number, 1..=16.
    pub channel: u8,

    /// "s" for a stereo pair, "a" or "b" for a mono half-channel.
    #[serde(default = "default_channel_mode")]
    pub mode: String,

    /// Station name, up to eight characters of the DSR character set.
    #[serde(default)]
    pub name: String,

    /// Programme type, 0..=15.
    #[serde(default)]
    pub program_type: u8,

    #[serde(default)]
    pub music: bool,

    /// Programme type of the secondary channel of a stereo pair.
    pub secondary_type: Option<u8>,

    /// Source type: "rawaudio" or "tone".
    #[serde(rename = "type", default = "default_source_type")]
    pub kind: String,

    /// Raw audio input path, or the command line to spawn when `exec` is set.
    pub input: Option<String>,

    #[serde(default)]
    pub exec: bool,

    /// Whether a raw audio input is interleaved stereo rather than mono.
    #[serde(default = "default_true")]
    pub stereo: bool,

    /// Rewind a raw audio file at end of stream.
    #[serde(default)]
    pub repeat: bool,

    /// Tone frequency in Hertz.
    #[serde(default)]
    pub frequency: f64,

    /// Tone level, 0..=1.
    #[serde(default)]
    pub level: f64,
}

fn default_output_type() -> String {
    "file".to_string()
}

fn default_sample_rate() -> u32 {
    SYMBOL_RATE * 2
}

fn default_channel_mode() -> String {
    "s".to_string()
}

fn default_source_type() -> String {
    "rawaudio".to_string()
}

fn default_true() -> bool {
    true
}

/// Loads and parses a configuration file.
pub fn load(path: &Path) -> Result<Config> {
    let text = fs::read_to_string(path)?;

    match toml::from_str(&text) {
        Ok(config) => Ok(config),
        Err(err) => config_error(format!("{}: {}", path.display(), err)),
    }
}
