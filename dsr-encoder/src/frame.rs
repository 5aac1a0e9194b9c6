// DSR
// Copyright (c) 2026 The Project DSR Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! DSR main-frame assembly.
//!
//! Every 2 ms audio block becomes 64 pairs of 320-bit main frames. Each pair carries eight
//! 77-bit audio sub-blocks built from samples delayed by 4 ms through the quadrant ring, two
//! bits of the ZI auxiliary frames, one service-administration bit, and the frame sync words,
//! scrambled and bit-interleaved into 80 output bytes.

use dsr_core::util::bits;
use dsr_core::{BLOCK_BYTES, BLOCK_SAMPLES, CHANNELS};

use crate::tables::{ILEAVE, ZI_BCH};
use crate::DsrEncoder;

/// One block-companding range: the exponent applied to the samples of a channel, and the mask
/// of magnitude bits that must be clear for the range to apply.
struct CompRange {
    shift: u32,
    mask: u16,
}

const RANGES: [CompRange; 8] = [
    CompRange { shift: 7, mask: 0x7F00 },
    CompRange { shift: 6, mask: 0x7E00 },
    CompRange { shift: 5, mask: 0x7C00 },
    CompRange { shift: 4, mask: 0x7800 },
    CompRange { shift: 3, mask: 0x7000 },
    CompRange { shift: 2, mask: 0x6000 },
    CompRange { shift: 1, mask: 0x4000 },
    CompRange { shift: 0, mask: 0x0000 },
];

/// Selects the widest companding range whose magnitude mask clears every sample of a channel.
///
/// Returns an index into [`RANGES`]; the terminating zero mask guarantees a match.
fn scale_range(samples: &[i16]) -> usize {
    let mut r = 0;

    for &s in samples {
        let mag = (if s < 0 { !s } else { s }) as u16;

        while mag & RANGES[r].mask != 0 {
            r += 1;
        }
    }

    r
}

/// Appends the 19 checkbits of the abbreviated BCH(63,44) code to the 44 payload bits already
/// in the buffer.
fn bch_encode_63_44(b: &mut [u8]) {
    let mut code: u32 = 0;

    for i in 0..44 {
        let bit = u32::from((b[i >> 3] >> (7 - (i & 7))) & 1);
        let bit = (bit ^ (code >> 18)) & 1;

        code <<= 1;

        if bit != 0 {
            code ^= 0x8751;
        }
    }

    bits::write_uint(b, 44, u64::from(code), 19);
}

/// Composes one 77-bit audio sub-block from two scaled sample pairs and two ZI bits.
///
/// Only the low bit of `zi1`/`zi2` is transmitted.
fn block77(b: &mut [u8; 10], s: [i16; 4], zi1: u64, zi2: u64) {
    let mut x = 0;
    for &v in s.iter() {
        x = bits::write_int(b, x, i64::from(v >> 3), 11);
    }

    bch_encode_63_44(b);

    bits::write_uint(b, 63, zi1, 1);
    bits::write_uint(b, 64, zi2, 1);

    let mut x = 65;
    for &v in s.iter() {
        x = bits::write_int(b, x, i64::from(v), 3);
    }
}

/// Composes a 64-bit ZI frame: the BCH(14,6) codeword of the two scale exponents repeated
/// three times, then the 22-bit programme-identification word.
fn zi_frame(b: &mut [u8; 8], scale_l: u8, scale_r: u8, pi: u32) {
    let c = (u16::from(scale_l & 7) << 3) | u16::from(scale_r & 7);
    let c = (c << 8) | u16::from(ZI_BCH[c as usize]);

    let mut x = 0;
    for _ in 0..3 {
        x = bits::write_uint(b, x, u64::from(c), 14);
    }

    bits::write_uint(b, 42, u64::from(pi), 22);
}

/// Applies the spectrum-shaping PRBS to bits 12..320 of a main frame, leaving the sync word
/// and service-administration bit intact. Frame B uses the alternate output tap.
fn scramble(frame: &mut [u8; 40], alt: bool) {
    let mut r: u16 = 0xBD;

    for x in 12..320 {
        let bit = (if alt { r ^ (r >> 3) } else { r }) & 1;
        frame[x >> 3] ^= (bit as u8) << (7 - (x & 7));

        let bit = (r ^ (r >> 4)) & 1;
        r = (r >> 1) | (bit << 8);
    }
}

impl DsrEncoder {
    /// Encodes one 2 ms audio block into 5120 bytes of payload, advancing the frame counter
    /// by 64.
    ///
    /// The payload is the differentially-unencoded symbol stream: 40 960 two-bit symbols to be
    /// fed to the QPSK modulator. Encoding is deterministic in the encoder state and the audio
    /// block.
    pub fn encode(
        &mut self,
        audio: &[[i16; BLOCK_SAMPLES]; CHANNELS],
        block: &mut [u8; BLOCK_BYTES],
    ) {
        let blockno = (self.frame >> 6) as usize;

        // Select the companding range of each channel.
        let mut scale = [0usize; CHANNELS];
        for (i, ch) in audio.iter().enumerate() {
            scale[i] = scale_range(ch);
        }

        // Encode the ZI frames of the sixteen channel pairs.
        let mut zi = [[0u8; 8]; 16];
        for (i, z) in zi.iter_mut().enumerate() {
            zi_frame(
                z,
                RANGES[scale[i * 2 + 0]].shift as u8,
                RANGES[scale[i * 2 + 1]].shift as u8,
                self.pi,
            );
        }

        // Load the scaled audio into the delay ring, one quadrant (4 ms) ahead of the read
        // point, interleaved channel-major.
        let mut w = (((blockno + 2) & 3) * 0x800) & 0x1FFF;
        for x in 0..BLOCK_SAMPLES {
            for (i, ch) in audio.iter().enumerate() {
                self.delay[w] = (ch[x] << RANGES[scale[i]].shift) >> 2;
                w += 1;
            }
        }

        // Read back from the samples written 4 ms earlier.
        let mut r = ((blockno & 3) * 0x800) & 0x1FFF;

        // Generate the 64 main-frame pairs of this audio block.
        for i in 0..64 {
            let mut a = [0u8; 40];
            let mut b = [0u8; 40];

            // Sync words.
            bits::write_uint(&mut a, 0, 0x712, 11);
            bits::write_uint(&mut b, 0, !0x712u64, 11);

            // Special service bit, sampled 16 bits ahead of the audio frame phase.
            let j = (self.frame + 16) as usize;
            bits::write_uint(
                &mut a,
                11,
                u64::from(self.sa[(j >> 6) & 127][(j >> 3) & 7] >> (7 - (j & 7))),
                1,
            );
            // The same bit of frame B is always zero.

            // Build the eight 77-bit sub-blocks.
            let mut c = [[0u8; 10]; 8];
            for (j, cj) in c.iter_mut().enumerate() {
                block77(
                    cj,
                    [self.delay[r], self.delay[r + 1], self.delay[r + 2], self.delay[r + 3]],
                    u64::from(zi[j * 2 + 0][i >> 3] >> (7 - (i & 7))),
                    u64::from(zi[j * 2 + 1][i >> 3] >> (7 - (i & 7))),
                );

                // 77 bits fill nine bytes and the top five bits of the tenth.
                cj[9] >>= 3;

                r += 4;
            }

            // Insert the sub-blocks into the two frame halves, pairwise bit-interleaved.
            let mut x = 0;
            for j in 0..10 {
                let l = if j == 9 { 10 } else { 16 };

                let words = [
                    (ILEAVE[c[0][j] as usize] << 1) | ILEAVE[c[1][j] as usize],
                    (ILEAVE[c[2][j] as usize] << 1) | ILEAVE[c[3][j] as usize],
                    (ILEAVE[c[4][j] as usize] << 1) | ILEAVE[c[5][j] as usize],
                    (ILEAVE[c[6][j] as usize] << 1) | ILEAVE[c[7][j] as usize],
                ];

                bits::write_uint(&mut a, 12 + x, u64::from(words[0]), l);
                bits::write_uint(&mut a, 166 + x, u64::from(words[1]), l);
                bits::write_uint(&mut b, 12 + x, u64::from(words[2]), l);
                bits::write_uint(&mut b, 166 + x, u64::from(words[3]), l);

                x += l as usize;
            }

            // Spectrum-shaping scrambler.
            scramble(&mut a, false);
            scramble(&mut b, true);

            // Interleave frames A and B bit by bit into 80 output bytes.
            let out = &mut block[i * 80..][..80];
            for (j, pair) in out.chunks_exact_mut(2).enumerate() {
                let (wa, wb) = (ILEAVE[a[j] as usize], ILEAVE[b[j] as usize]);
                pair[0] = ((wa >> 7) | (wb >> 8)) as u8;
                pair[1] = ((wa << 1) | wb) as u8;
            }

            self.frame += 1;
        }
    }
}
