// DSR
// Copyright (c) 2026 The Project DSR Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `audio` module defines the pull-model contract between the encoder and its audio
//! sources, and the buffered reader the controller uses to fill channel planes.

use log::warn;

use crate::errors::Result;

/// A block of 32 kHz 16-bit audio borrowed from a source.
///
/// The samples remain valid until the next call to [`AudioSource::read`].
pub enum SourceBlock<'a> {
    /// Mono samples.
    Mono(&'a [i16]),
    /// Frames of interleaved left/right samples.
    Stereo(&'a [i16]),
    /// The source has no more audio.
    Eof,
}

/// An `AudioSource` produces blocks of 32 kHz 16-bit PCM audio on demand.
///
/// Sources own their sample storage and decide their own read granularity; the returned block
/// may hold any non-zero number of frames.
pub trait AudioSource {
    /// Returns the next block of audio, or [`SourceBlock::Eof`] once the source is exhausted.
    fn read(&mut self) -> Result<SourceBlock<'_>>;
}

/// A `SourceReader` adapts an [`AudioSource`] to the fixed 64-sample reads of the encode loop.
///
/// It buffers whatever block size the source produces, folds stereo to mono (or splits mono to
/// stereo) as requested, and latches end-of-stream: after the source runs out every read
/// returns 0 and the caller's zero-filled planes are transmitted as silence.
pub struct SourceReader {
    source: Box<dyn AudioSource>,
    /// Frames copied out of the source, interleaved left/right when `stereo`.
    pending: Vec<i16>,
    pos: usize,
    stereo: bool,
    eof: bool,
}

impl SourceReader {
    pub fn new(source: Box<dyn AudioSource>) -> SourceReader {
        SourceReader { source, pending: Vec::new(), pos: 0, stereo: false, eof: false }
    }

    /// Returns true once the source has reached end-of-stream.
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Fetches the next block from the source. Returns false at end-of-stream.
    fn refill(&mut self) -> bool {
        loop {
            match self.source.read() {
                Ok(SourceBlock::Mono(samples)) => {
                    if samples.is_empty() {
                        continue;
                    }
                    self.pending.clear();
                    self.pending.extend_from_slice(samples);
                    self.stereo = false;
                }
                Ok(SourceBlock::Stereo(samples)) => {
                    if samples.is_empty() {
                        continue;
                    }
                    self.pending.clear();
                    self.pending.extend_from_slice(samples);
                    self.stereo = true;
                }
                Ok(SourceBlock::Eof) => {
                    self.eof = true;
                    return false;
                }
                Err(err) => {
                    // A failing source is silenced, not fatal.
                    warn!("audio source error, channel goes silent: {}", err);
                    self.eof = true;
                    return false;
                }
            }

            self.pos = 0;
            return true;
        }
    }

    /// Reads up to `dst.len()` mono samples, folding stereo sources as `(l + r) / 2`.
    ///
    /// Returns the number of samples written; fewer than requested only at end-of-stream.
    pub fn read_mono(&mut self, dst: &mut [i16]) -> usize {
        if self.eof {
            return 0;
        }

        let mut i = 0;

        while i < dst.len() {
            if self.pos == self.pending.len() && !self.refill() {
                break;
            }

            if self.stereo {
                while self.pos < self.pending.len() && i < dst.len() {
                    let l = i32::from(self.pending[self.pos]);
                    let r = i32::from(self.pending[self.pos + 1]);
                    dst[i] = ((l + r) / 2) as i16;
                    self.pos += 2;
                    i += 1;
                }
            }
            else {
                while self.pos < self.pending.len() && i < dst.len() {
                    dst[i] = self.pending[self.pos];
                    self.pos += 1;
                    i += 1;
                }
            }
        }

        i
    }

    /// Reads up to `l.len()` frames into the left and right planes, duplicating mono sources
    /// onto both.
    ///
    /// Returns the number of frames written; fewer than requested only at end-of-stream.
    pub fn read_stereo(&mut self, l: &mut [i16], r: &mut [i16]) -> usize {
        debug_assert!(l.len() == r.len());

        if self.eof {
            return 0;
        }

        let mut i = 0;

        while i < l.len() {
            if self.pos == self.pending.len() && !self.refill() {
                break;
            }

            if self.stereo {
                while self.pos < self.pending.len() && i < l.len() {
                    l[i] = self.pending[self.pos];
                    r[i] = self.pending[self.pos + 1];
                    self.pos += 2;
                    i += 1;
                }
            }
            else {
                while self.pos < self.pending.len() && i < l.len() {
                    l[i] = self.pending[self.pos];
                    r[i] = self.pending[self.pos];
                    self.pos += 1;
                    i += 1;
                }
            }
        }

        i
    }
}

#[cfg(test)]
mod tests {
    use super::{AudioSource, SourceBlock, SourceReader};
    use crate::errors::Result;

    /// A source producing a fixed ramp in blocks of `chunk` frames.
    struct RampSource {
        samples: Vec<i16>,
        pos: usize,
        chunk: usize,
        stereo: bool,
    }

    impl AudioSource for RampSource {
        fn read(&mut self) -> Result<SourceBlock<'_>> {
            if self.pos >= self.samples.len() {
                return Ok(SourceBlock::Eof);
            }

            let n = self.chunk.min(self.samples.len() - self.pos);
            let block = &self.samples[self.pos..self.pos + n];
            self.pos += n;

            Ok(if self.stereo { SourceBlock::Stereo(block) } else { SourceBlock::Mono(block) })
        }
    }

    #[test]
    fn verify_read_stereo_from_interleaved() {
        let samples = (0..20).map(|x| if x & 1 == 0 { x } else { -x }).collect();
        let source = RampSource { samples, pos: 0, chunk: 6, stereo: true };
        let mut reader = SourceReader::new(Box::new(source));

        let mut l = [0i16; 16];
        let mut r = [0i16; 16];

        // 10 frames available, read across the odd 6-sample chunk boundary.
        assert_eq!(reader.read_stereo(&mut l, &mut r), 10);
        assert_eq!(&l[..10], &[0, 2, 4, 6, 8, 10, 12, 14, 16, 18]);
        assert_eq!(&r[..10], &[-1, -3, -5, -7, -9, -11, -13, -15, -17, -19]);

        // End-of-stream is latched.
        assert!(reader.is_eof());
        assert_eq!(reader.read_stereo(&mut l, &mut r), 0);
    }

    #[test]
    fn verify_read_mono_folds_stereo() {
        let source =
            RampSource { samples: vec![100, 200, -100, -200, 5, 6], pos: 0, chunk: 2, stereo: true };
        let mut reader = SourceReader::new(Box::new(source));

        let mut dst = [0i16; 4];

        assert_eq!(reader.read_mono(&mut dst), 3);
        assert_eq!(&dst[..3], &[150, -150, 5]);
    }

    #[test]
    fn verify_read_stereo_duplicates_mono() {
        let source = RampSource { samples: vec![1, 2, 3], pos: 0, chunk: 8, stereo: false };
        let mut reader = SourceReader::new(Box::new(source));

        let mut l = [0i16; 3];
        let mut r = [0i16; 3];

        assert_eq!(reader.read_stereo(&mut l, &mut r), 3);
        assert_eq!(l, [1, 2, 3]);
        assert_eq!(l, r);
    }
}
