// DSR
// Copyright (c) 2026 The Project DSR Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `sink` module defines the push-model contract between the modulator and the RF output.

use crate::errors::Result;

/// An `RfSink` accepts the modulated complex baseband signal.
///
/// Sinks may apply back-pressure by blocking in [`write`](RfSink::write); the encode loop
/// tolerates an unbounded wait there. A returned error is fatal and terminates encoding.
pub trait RfSink {
    /// Writes interleaved 16-bit I/Q samples in emission order.
    fn write(&mut self, iq: &[i16]) -> Result<()>;

    /// Drains buffered samples and releases the sink.
    fn close(&mut self) -> Result<()>;

    /// Native level scaling of the sink, in `(0, 1]`.
    ///
    /// Multiplied into the modulator level at initialisation to compensate for sinks whose
    /// sample format has a smaller dynamic range than 16 bits.
    fn scale(&self) -> f64 {
        1.0
    }
}
