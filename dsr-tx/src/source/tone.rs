// DSR
// Copyright (c) 2026 The Project DSR Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::f64::consts::PI;

use dsr_core::audio::{AudioSource, SourceBlock};
use dsr_core::errors::Result;
use dsr_core::SAMPLE_RATE;

/// A mono sine-tone generator, rendered one second at a time.
pub struct ToneSource {
    samples: Vec<i16>,
    x: f64,
    delta: f64,
    level: f64,
}

impl ToneSource {
    pub fn new(frequency: f64, level: f64) -> ToneSource {
        ToneSource {
            samples: vec![0; SAMPLE_RATE as usize],
            x: 0.0,
            delta: 2.0 * PI * frequency / f64::from(SAMPLE_RATE),
            level,
        }
    }
}

impl AudioSource for ToneSource {
    fn read(&mut self) -> Result<SourceBlock<'_>> {
        for s in self.samples.iter_mut() {
            *s = (self.x.sin() * self.level * f64::from(i16::MAX)) as i16;
            self.x += self.delta;
        }

        Ok(SourceBlock::Mono(&self.samples))
    }
}

#[cfg(test)]
mod tests {
    use dsr_core::audio::{AudioSource, SourceBlock};
    use dsr_core::SAMPLE_RATE;

    use super::ToneSource;

    #[test]
    fn verify_tone_period() {
        // A 1 kHz tone at 32 kHz repeats every 32 samples and never ends.
        let mut tone = ToneSource::new(1000.0, 0.5);

        let samples = match tone.read().unwrap() {
            SourceBlock::Mono(samples) => samples.to_vec(),
            _ => panic!("tone source must be mono"),
        };

        assert_eq!(samples.len(), SAMPLE_RATE as usize);
        assert_eq!(samples[0], 0);

        for (a, b) in samples.iter().zip(samples[32..].iter()) {
            assert!((i32::from(*a) - i32::from(*b)).abs() <= 1);
        }

        // The level bounds the amplitude.
        assert!(samples.iter().all(|&s| i32::from(s).abs() <= 16384));
    }
}
