// DSR
// Copyright (c) 2026 The Project DSR Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pulse-shaping filter design.

use std::f64::consts::{FRAC_2_PI, PI};

/// The root-raised-cosine impulse response at time `t`, with roll-off `b` and symbol period
/// `period`.
///
/// The response has removable singularities at `t = 0` and `|t| = period / 4b` that must be
/// evaluated through their limits.
pub fn rrc(t: f64, b: f64, period: f64) -> f64 {
    if t == 0.0 {
        (1.0 / period) * (1.0 + b * (4.0 / PI - 1.0))
    }
    else if (t.abs() - period / (4.0 * b)).abs() < f64::EPSILON {
        b / (period * 2.0f64.sqrt())
            * ((1.0 + FRAC_2_PI) * (PI / (4.0 * b)).sin()
                + (1.0 - FRAC_2_PI) * (PI / (4.0 * b)).cos())
    }
    else {
        let u = t / period;
        let t1 = 4.0 * b * u;
        let t2 = (PI * u * (1.0 - b)).sin() + 4.0 * b * u * (PI * u * (1.0 + b)).cos();
        let t3 = PI * u * (1.0 - t1 * t1);

        (1.0 / period) * (t2 / t3)
    }
}

/// The Hamming window over `x` in `[-1, 1]`; zero outside.
pub fn hamming(x: f64) -> f64 {
    if x < -1.0 || x > 1.0 {
        return 0.0;
    }

    0.54 - 0.46 * (PI * (1.0 + x)).cos()
}

#[cfg(test)]
mod tests {
    use super::{hamming, rrc};

    #[test]
    fn verify_rrc_peak() {
        // The response peaks at t = 0 with the closed-form limit.
        let peak = rrc(0.0, 0.5, 1.0);

        assert!((peak - 1.136_619_772).abs() < 1e-6);
        assert!(peak > rrc(0.1, 0.5, 1.0));
        assert!(peak > rrc(-0.1, 0.5, 1.0));
    }

    #[test]
    fn verify_rrc_singularity_is_finite() {
        // |t| = T / 4b is the second removable singularity; at b = 0.5 that is t = 0.5.
        let v = rrc(0.5, 0.5, 1.0);

        assert!(v.is_finite());

        // It must agree with the response just off the singularity.
        assert!((v - rrc(0.5 + 1e-9, 0.5, 1.0)).abs() < 1e-3);
        assert!((v - rrc(0.5 - 1e-9, 0.5, 1.0)).abs() < 1e-3);
    }

    #[test]
    fn verify_hamming_window() {
        assert!((hamming(0.0) - 1.0).abs() < 1e-12);
        assert!((hamming(-1.0) - 0.08).abs() < 1e-12);
        assert!((hamming(1.0) - 0.08).abs() < 1e-12);
        assert_eq!(hamming(1.5), 0.0);
        assert_eq!(hamming(-1.5), 0.0);

        // Symmetric about zero.
        assert!((hamming(0.3) - hamming(-0.3)).abs() < 1e-12);
    }
}
