// DSR
// Copyright (c) 2026 The Project DSR Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Service-administration (SAÜ) matrix generation.
//!
//! The matrix holds 128 sub-frames of 64 bits in three blocks: PA (programme attributes),
//! LB (filler) and SK (station names). It is read bit-by-bit during frame assembly, one bit
//! per main-frame pair, and is only rebuilt on an explicit update.

use dsr_core::util::bits;

use crate::channel::Channel;
use crate::tables::PAR;

/// Sub-frame header: `0x5CF` marks the first sub-frame of every group of eight, `0x5FF` the
/// others.
fn header(i: usize) -> u64 {
    if i & 7 != 0 {
        0x5FF
    }
    else {
        0x5CF
    }
}

/// Rebuilds the full PA/LB/SK matrix from the channel table.
pub(crate) fn update_sa(sa: &mut [[u8; 8]; 128], channels: &[Channel; 32]) {
    // PA sub-frames: one parity-protected attribute byte per channel of the quad addressed by
    // the low three sub-frame index bits.
    for i in 0..56 {
        let quad = &channels[(i & 7) * 4..][..4];

        bits::write_uint(&mut sa[i], 0, header(i), 16);

        for (j, ch) in quad.iter().enumerate() {
            sa[i][2 + j] = PAR[ch.pa_index()];
        }

        sa[i][6] = 0x00; /* DI */
        sa[i][7] = 0x00; /* DII */
    }

    // LB sub-frames carry no payload.
    for i in 56..64 {
        bits::write_uint(&mut sa[i], 0, header(i), 16);

        for j in 2..8 {
            sa[i][j] = 0x00;
        }
    }

    // SK sub-frames: station names, one byte per group of eight sub-frames.
    for i in 64..128 {
        let quad = &channels[(i & 7) * 4..][..4];
        let b = (i - 64) >> 3;

        bits::write_uint(&mut sa[i], 0, header(i), 16);

        for (j, ch) in quad.iter().enumerate() {
            sa[i][2 + j] = ch.name[b];
        }

        sa[i][6] = 0x00; /* EI */
        sa[i][7] = 0x00; /* EII */
    }
}

#[cfg(test)]
mod tests {
    use dsr_core::text::encode_ps;

    use super::update_sa;
    use crate::channel::{Channel, ChannelMode};
    use crate::tables::PAR;

    fn channels() -> [Channel; 32] {
        let mut channels = [Channel::default(); 32];

        channels[0] = Channel {
            ptype: 10,
            music: true,
            mode: ChannelMode::Primary,
            name: encode_ps("DSR TEST"),
        };
        channels[1] = Channel {
            ptype: 10,
            music: false,
            mode: ChannelMode::Secondary,
            name: encode_ps("DSR TEST"),
        };

        channels
    }

    #[test]
    fn verify_headers() {
        let mut sa = [[0u8; 8]; 128];
        update_sa(&mut sa, &channels());

        for (i, row) in sa.iter().enumerate() {
            let header = (u16::from(row[0]) << 8) | u16::from(row[1]);
            assert_eq!(header, if i & 7 != 0 { 0x5FF } else { 0x5CF });
        }
    }

    #[test]
    fn verify_pa_attribute_bytes() {
        let mut sa = [[0u8; 8]; 128];
        update_sa(&mut sa, &channels());

        // Channels 0..4 are the quad of sub-frames 0, 8, 16, ... 48.
        // Channel 0: type 10, music, primary -> index 0xAA.
        assert_eq!(sa[0][2], PAR[(10 << 4) | (1 << 3) | (1 << 1)]);
        // Channel 1: type 10, speech, secondary.
        assert_eq!(sa[0][3], PAR[(10 << 4) | (2 << 1)]);
        // Channels 2 and 3 are off with the music default.
        assert_eq!(sa[0][4], PAR[1 << 3]);
        assert_eq!(sa[0][5], PAR[1 << 3]);

        // The same quad repeats every eight PA sub-frames.
        assert_eq!(sa[8][2], sa[0][2]);
        assert_eq!(sa[48][3], sa[0][3]);

        // Descriptor bytes are zero.
        assert_eq!(sa[0][6], 0x00);
        assert_eq!(sa[0][7], 0x00);
    }

    #[test]
    fn verify_lb_filler() {
        let mut sa = [[0u8; 8]; 128];
        update_sa(&mut sa, &channels());

        for row in &sa[56..64] {
            assert_eq!(row[2..8], [0u8; 6]);
        }
    }

    #[test]
    fn verify_sk_name_bytes() {
        let mut sa = [[0u8; 8]; 128];
        update_sa(&mut sa, &channels());

        let name = encode_ps("DSR TEST");

        // Sub-frame 64 + 8b carries byte b of the names of channels 0..4.
        for b in 0..8 {
            assert_eq!(sa[64 + 8 * b][2], name[b]);
            assert_eq!(sa[64 + 8 * b][3], name[b]);
        }
    }
}
