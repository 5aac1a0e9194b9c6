// DSR
// Copyright (c) 2026 The Project DSR Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The DSR bitstream encoder.
//!
//! [`DsrEncoder`] transforms 2 ms blocks of 32-channel 32 kHz PCM audio into the 5120-byte
//! line-coded payload of the Digitale Satelliten Radio multiplex: block-floating scale
//! estimation, 77-bit sub-frame composition under an abbreviated BCH(63,44) code, ZI auxiliary
//! frames under a BCH(14,6) code, two-way bit interleaving, and spectrum-shaping scrambling.
//! The service-administration (SAÜ) matrix interlocked with the audio frame phase is rebuilt
//! from the channel table by [`DsrEncoder::update_sa`].

#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]
// Bit-offset arithmetic throughout this project reads best when it mirrors the framing tables
// of the transmission standard, identity operations and literal ranges included.
#![allow(clippy::identity_op)]
#![allow(clippy::manual_range_contains)]

mod channel;
mod frame;
mod sa;
mod tables;

pub use channel::{Channel, ChannelMode, ProgrammeType, PROGRAMME_TYPES};

use dsr_core::CHANNELS;

/// Length of the sample delay ring: four 2 ms quadrants of 64 samples by 32 channels.
const DELAY_LEN: usize = 8192;

/// The DSR bitstream encoder state.
///
/// One encoder owns the channel table, the running frame counter, the service-administration
/// matrix and the sample delay ring. It is not shared across threads, and blocks must be
/// encoded in order: each block's output depends on delay-ring state left by its predecessor.
pub struct DsrEncoder {
    pub(crate) channels: [Channel; CHANNELS],
    pub(crate) frame: u64,
    pub(crate) pi: u32,
    pub(crate) sa: [[u8; 8]; 128],
    pub(crate) delay: [i16; DELAY_LEN],
}

impl DsrEncoder {
    /// Creates an encoder with all channels disabled.
    pub fn new() -> DsrEncoder {
        let mut enc = DsrEncoder {
            channels: [Channel::default(); CHANNELS],
            frame: 0,
            pi: 0,
            sa: [[0; 8]; 128],
            delay: [0; DELAY_LEN],
        };

        enc.update_sa();
        enc
    }

    /// The channel descriptor table.
    pub fn channels(&self) -> &[Channel; CHANNELS] {
        &self.channels
    }

    /// Mutable access to one channel descriptor.
    ///
    /// The table may only be changed before encoding begins; call [`update_sa`](Self::update_sa)
    /// afterwards to rebuild the service-administration matrix.
    pub fn channel_mut(&mut self, index: usize) -> &mut Channel {
        &mut self.channels[index]
    }

    /// Sets the 22-bit programme-identification word carried by every ZI frame.
    ///
    /// The broadcast standard allows a non-zero value here; none is defined by this encoder,
    /// and the word defaults to zero.
    pub fn set_programme_id(&mut self, pi: u32) {
        self.pi = pi & 0x3F_FFFF;
    }

    /// The running frame counter. Advances by 64 per encoded block.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Rebuilds the service-administration matrix from the channel table.
    pub fn update_sa(&mut self) {
        sa::update_sa(&mut self.sa, &self.channels);

        let active = self.channels.iter().filter(|c| c.mode != ChannelMode::Off).count();
        log::debug!("sa: matrix rebuilt, {} of {} channels active", active, CHANNELS);
    }
}

impl Default for DsrEncoder {
    fn default() -> DsrEncoder {
        DsrEncoder::new()
    }
}
