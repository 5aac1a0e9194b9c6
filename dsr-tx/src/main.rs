// DSR
// Copyright (c) 2026 The Project DSR Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]
#![allow(clippy::identity_op)]
#![allow(clippy::manual_range_contains)]

mod config;
mod output;
mod source;

use std::path::Path;
use std::process;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use clap::{App, Arg};
use log::{error, info, warn};

use dsr_core::audio::SourceReader;
use dsr_core::errors::{config_error, Error, Result};
use dsr_core::{text, BLOCK_BITS, BLOCK_BYTES, BLOCK_SAMPLES, CHANNELS, SYMBOL_RATE};
use dsr_encoder::{ChannelMode, DsrEncoder, PROGRAMME_TYPES};
use dsr_modem::QpskModulator;

use crate::config::ChannelConfig;

fn main() {
    let matches = App::new("dsrtx")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Digitale Satelliten Radio broadcast encoder")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("Load configuration from file")
                .takes_value(true)
                .required(true),
        )
        .arg(Arg::new("verbose").long("verbose").short('V').help("Enable verbose output"))
        .get_matches();

    let verbose = matches.is_present("verbose");

    pretty_env_logger::formatted_builder()
        .filter_level(if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info })
        .init();

    if let Err(err) = run(matches.value_of("config").unwrap(), verbose) {
        error!("{}", err);
        process::exit(1);
    }
}

fn run(config_path: &str, verbose: bool) -> Result<()> {
    let config = config::load(Path::new(config_path))?;

    let mut encoder = DsrEncoder::new();
    let mut sources: Vec<Option<SourceReader>> = Vec::new();
    sources.resize_with(CHANNELS, || None);

    for cc in &config.channels {
        let c = allocate_channel(&mut encoder, cc)?;

        // A source that fails to open with an IO error leaves its channel silent; anything
        // else in the configuration is fatal.
        match source::open(cc) {
            Ok(src) => sources[c] = Some(SourceReader::new(src)),
            Err(Error::IoError(err)) => {
                warn!("channel {:02}: source failed to open, emitting silence: {}", cc.channel, err);
            }
            Err(err) => return Err(err),
        }
    }

    if config.output.sample_rate == 0 || config.output.sample_rate % SYMBOL_RATE != 0 {
        return config_error(format!(
            "sample rate {} is not a multiple of {}",
            config.output.sample_rate, SYMBOL_RATE
        ));
    }

    encoder.update_sa();

    if verbose || config.verbose {
        dump_channels(&encoder);
    }

    // Two-strike cancellation: the first signal drains the pipeline, a second aborts.
    let strikes = Arc::new(AtomicUsize::new(0));
    {
        let strikes = Arc::clone(&strikes);
        let handler = ctrlc::set_handler(move || {
            if strikes.fetch_add(1, Ordering::SeqCst) > 0 {
                process::exit(1);
            }
        });

        if let Err(err) = handler {
            warn!("failed to install signal handler: {}", err);
        }
    }

    let mut sink = output::open(&config.output)?;

    let interpolation = (config.output.sample_rate / SYMBOL_RATE) as usize;
    let mut qpsk = match QpskModulator::try_new(interpolation, 0.8 * sink.scale()) {
        Ok(qpsk) => qpsk,
        Err(err) => {
            sink.close()?;
            return Err(err);
        }
    };

    info!(
        "transmitting at {} samples/s ({}x interpolation)",
        config.output.sample_rate, interpolation
    );

    let mut audio = [[0i16; BLOCK_SAMPLES]; CHANNELS];
    let mut block = [0u8; BLOCK_BYTES];
    let mut iq = vec![0i16; BLOCK_BITS / 2 * interpolation * 2];

    let result = loop {
        if strikes.load(Ordering::SeqCst) != 0 {
            info!("interrupted, draining");
            break Ok(());
        }

        // Fill the audio block for this 2 ms tick; unused channels stay silent.
        for plane in audio.iter_mut() {
            plane.fill(0);
        }

        let mut c = 0;
        while c < CHANNELS {
            let pair = c & !1;
            let stereo = encoder.channels()[pair].mode == ChannelMode::Primary
                && encoder.channels()[pair + 1].mode == ChannelMode::Secondary;

            if stereo {
                if let Some(reader) = sources[pair].as_mut() {
                    let (left, right) = audio.split_at_mut(pair + 1);
                    reader.read_stereo(&mut left[pair], &mut right[0]);
                }
                c = pair + 2;
            }
            else {
                if encoder.channels()[c].mode == ChannelMode::Primary {
                    if let Some(reader) = sources[c].as_mut() {
                        reader.read_mono(&mut audio[c]);
                    }
                }
                c += 1;
            }
        }

        // Encode the next 2 ms block and push it through the modulator to the sink.
        encoder.encode(&audio, &mut block);

        let samples = qpsk.modulate(&block, BLOCK_BITS, &mut iq);

        if let Err(err) = sink.write(&iq[..2 * samples]) {
            break Err(err);
        }
    };

    sink.close()?;

    result
}

/// Marks a configured channel in the encoder's channel table, returning the index its audio
/// source attaches to.
fn allocate_channel(encoder: &mut DsrEncoder, cc: &ChannelConfig) -> Result<usize> {
    if cc.channel < 1 || cc.channel > 16 {
        return config_error(format!("invalid channel number {}", cc.channel));
    }

    if cc.program_type > 15 || cc.secondary_type.unwrap_or(0) > 15 {
        return config_error(format!("channel {:02}: invalid programme type", cc.channel));
    }

    let c = (cc.channel as usize - 1) * 2;
    let name = text::encode_ps(&cc.name);

    match cc.mode.as_str() {
        "s" | "S" => {
            // A stereo pair needs both half-channels free.
            if encoder.channels()[c].mode != ChannelMode::Off
                || encoder.channels()[c + 1].mode != ChannelMode::Off
            {
                return config_error(format!("channel {:02}/S is already allocated", cc.channel));
            }

            let left = encoder.channel_mut(c);
            left.name = name;
            left.ptype = cc.program_type;
            left.music = cc.music;
            left.mode = ChannelMode::Primary;

            let right = encoder.channel_mut(c + 1);
            right.name = name;
            right.ptype = cc.secondary_type.unwrap_or(cc.program_type);
            right.music = false;
            right.mode = ChannelMode::Secondary;

            Ok(c)
        }
        "a" | "A" | "b" | "B" => {
            let c = if cc.mode.eq_ignore_ascii_case("b") { c + 1 } else { c };

            if encoder.channels()[c].mode != ChannelMode::Off {
                return config_error(format!(
                    "channel {:02}/{} is already allocated",
                    cc.channel,
                    if c & 1 != 0 { 'B' } else { 'A' }
                ));
            }

            let mono = encoder.channel_mut(c);
            mono.name = name;
            mono.ptype = cc.program_type;
            mono.music = cc.music;
            mono.mode = ChannelMode::Primary;

            Ok(c)
        }
        other => config_error(format!("unrecognised channel mode '{}'", other)),
    }
}

fn dump_channels(encoder: &DsrEncoder) {
    info!("active channels:");

    for (c, ch) in encoder.channels().iter().enumerate() {
        let pair = c & !1;
        let stereo = encoder.channels()[pair].mode == ChannelMode::Primary
            && encoder.channels()[pair + 1].mode == ChannelMode::Secondary;

        let half = if stereo {
            if c & 1 != 0 {
                'R'
            }
            else {
                'L'
            }
        }
        else if ch.mode == ChannelMode::Primary {
            if c & 1 != 0 {
                'B'
            }
            else {
                'A'
            }
        }
        else {
            continue;
        };

        let ptype = &PROGRAMME_TYPES[(ch.ptype & 15) as usize];

        info!(
            "{:02}/{}: \"{}\" ({}, {})",
            (c >> 1) + 1,
            half,
            text::decode_ps(&ch.name),
            ptype.name,
            if ch.music { "music" } else { "speech" }
        );
    }
}

#[cfg(test)]
mod tests {
    use dsr_encoder::{ChannelMode, DsrEncoder};

    use super::allocate_channel;
    use crate::config::ChannelConfig;

    fn channel_config(channel: u8, mode: &str) -> ChannelConfig {
        ChannelConfig {
            channel,
            mode: mode.to_string(),
            name: "DSR TEST".to_string(),
            program_type: 10,
            music: true,
            secondary_type: None,
            kind: "tone".to_string(),
            input: None,
            exec: false,
            stereo: true,
            repeat: false,
            frequency: 1000.0,
            level: 0.5,
        }
    }

    #[test]
    fn verify_stereo_allocation() {
        let mut encoder = DsrEncoder::new();

        assert_eq!(allocate_channel(&mut encoder, &channel_config(3, "s")).unwrap(), 4);
        assert_eq!(encoder.channels()[4].mode, ChannelMode::Primary);
        assert_eq!(encoder.channels()[5].mode, ChannelMode::Secondary);
        assert!(encoder.channels()[4].music);
        assert!(!encoder.channels()[5].music);

        // The pair is taken now, in any mode.
        assert!(allocate_channel(&mut encoder, &channel_config(3, "s")).is_err());
        assert!(allocate_channel(&mut encoder, &channel_config(3, "a")).is_err());
    }

    #[test]
    fn verify_mono_allocation() {
        let mut encoder = DsrEncoder::new();

        assert_eq!(allocate_channel(&mut encoder, &channel_config(1, "a")).unwrap(), 0);
        assert_eq!(allocate_channel(&mut encoder, &channel_config(1, "b")).unwrap(), 1);

        assert_eq!(encoder.channels()[0].mode, ChannelMode::Primary);
        assert_eq!(encoder.channels()[1].mode, ChannelMode::Primary);

        // Both halves allocated mono leave no room for a stereo pair.
        assert!(allocate_channel(&mut encoder, &channel_config(1, "s")).is_err());
    }

    #[test]
    fn verify_invalid_channels_rejected() {
        let mut encoder = DsrEncoder::new();

        assert!(allocate_channel(&mut encoder, &channel_config(0, "s")).is_err());
        assert!(allocate_channel(&mut encoder, &channel_config(17, "s")).is_err());
        assert!(allocate_channel(&mut encoder, &channel_config(1, "x")).is_err());

        let mut bad_type = channel_config(1, "s");
        bad_type.program_type = 16;
        assert!(allocate_channel(&mut encoder, &bad_type).is_err());
    }
}
