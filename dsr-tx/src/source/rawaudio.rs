// DSR
// Copyright (c) 2026 The Project DSR Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::process::{Child, ChildStdout, Command, Stdio};

use dsr_core::audio::{AudioSource, SourceBlock};
use dsr_core::errors::{unsupported_error, Result};
use dsr_core::SAMPLE_RATE;

enum Input {
    File(BufReader<File>),
    Pipe { child: Child, stdout: ChildStdout },
}

/// A 16-bit native-endian raw PCM source: a file, or the standard output of a spawned
/// command.
pub struct RawAudioSource {
    input: Input,
    /// Samples decoded from the current read.
    samples: Vec<i16>,
    /// Raw byte staging buffer, one tenth of a second of audio.
    bytes: Vec<u8>,
    channels: usize,
    repeat: bool,
}

impl RawAudioSource {
    pub fn open(input: &str, exec: bool, stereo: bool, repeat: bool) -> Result<RawAudioSource> {
        let input = if exec {
            let mut child =
                Command::new("sh").arg("-c").arg(input).stdout(Stdio::piped()).spawn()?;

            match child.stdout.take() {
                Some(stdout) => Input::Pipe { child, stdout },
                // Stdio::piped() above guarantees a handle.
                None => return unsupported_error("rawaudio: no pipe from child process"),
            }
        }
        else {
            Input::File(BufReader::new(File::open(input)?))
        };

        let channels = if stereo { 2 } else { 1 };
        let frames = SAMPLE_RATE as usize / 10;

        Ok(RawAudioSource {
            input,
            samples: Vec::with_capacity(frames * channels),
            bytes: vec![0; frames * channels * 2],
            channels,
            repeat,
        })
    }

    /// Fills the staging buffer and decodes it, returning the number of whole frames read.
    fn fill(&mut self) -> Result<usize> {
        let mut read = 0;

        while read < self.bytes.len() {
            let n = match &mut self.input {
                Input::File(file) => file.read(&mut self.bytes[read..]),
                Input::Pipe { stdout, .. } => stdout.read(&mut self.bytes[read..]),
            };

            match n {
                Ok(0) => break,
                Ok(n) => read += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        }

        // A trailing partial frame is dropped.
        let frames = read / (2 * self.channels);

        self.samples.clear();
        self.samples.extend(
            self.bytes[..frames * self.channels * 2]
                .chunks_exact(2)
                .map(|b| i16::from_ne_bytes([b[0], b[1]])),
        );

        Ok(frames)
    }
}

impl AudioSource for RawAudioSource {
    fn read(&mut self) -> Result<SourceBlock<'_>> {
        let mut rewound = false;

        loop {
            let frames = self.fill()?;

            if frames == 0 {
                if self.repeat && !rewound {
                    if let Input::File(file) = &mut self.input {
                        file.seek(SeekFrom::Start(0))?;
                        rewound = true;
                        continue;
                    }
                }

                return Ok(SourceBlock::Eof);
            }

            let samples = &self.samples[..frames * self.channels];

            return Ok(if self.channels == 2 {
                SourceBlock::Stereo(samples)
            }
            else {
                SourceBlock::Mono(samples)
            });
        }
    }
}

impl Drop for RawAudioSource {
    fn drop(&mut self) {
        if let Input::Pipe { child, .. } = &mut self.input {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use dsr_core::audio::{AudioSource, SourceBlock};

    use super::RawAudioSource;

    fn temp_pcm(tag: &str, samples: &[i16]) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("dsr-rawaudio-test-{}-{}.raw", std::process::id(), tag));

        let mut file = std::fs::File::create(&path).unwrap();
        for s in samples {
            file.write_all(&s.to_ne_bytes()).unwrap();
        }

        path
    }

    #[test]
    fn verify_stereo_file_read() {
        let path = temp_pcm("stereo", &[1, -1, 2, -2, 3, -3]);
        let mut source = RawAudioSource::open(path.to_str().unwrap(), false, true, false).unwrap();

        match source.read().unwrap() {
            SourceBlock::Stereo(samples) => assert_eq!(samples, &[1, -1, 2, -2, 3, -3]),
            _ => panic!("expected stereo block"),
        }

        assert!(matches!(source.read().unwrap(), SourceBlock::Eof));

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn verify_repeat_rewinds() {
        let path = temp_pcm("repeat", &[7, 8, 9]);
        let mut source = RawAudioSource::open(path.to_str().unwrap(), false, false, true).unwrap();

        for _ in 0..3 {
            match source.read().unwrap() {
                SourceBlock::Mono(samples) => assert_eq!(samples, &[7, 8, 9]),
                _ => panic!("expected mono block"),
            }
        }

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn verify_partial_frame_dropped() {
        // Seven bytes of a stereo stream are one frame plus a truncated sample.
        let path = temp_pcm("partial", &[1, -1, 2]);
        let mut raw = std::fs::read(&path).unwrap();
        raw.push(0xAA);
        std::fs::write(&path, &raw).unwrap();

        let mut source = RawAudioSource::open(path.to_str().unwrap(), false, true, false).unwrap();

        match source.read().unwrap() {
            SourceBlock::Stereo(samples) => assert_eq!(samples, &[1, -1]),
            _ => panic!("expected stereo block"),
        }

        std::fs::remove_file(path).unwrap();
    }
}
