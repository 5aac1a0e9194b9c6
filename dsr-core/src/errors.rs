// DSR
// Copyright (c) 2026 The Project DSR Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `errors` module defines the common error type.

use std::error::Error as StdError;
use std::fmt;
use std::result;

/// `Error` provides an enumeration of all possible errors reported by the encoder.
#[derive(Debug)]
pub enum Error {
    /// An IO error occurred while reading from a source or writing to a sink.
    IoError(std::io::Error),
    /// The configuration is invalid or inconsistent.
    ConfigError(String),
    /// An unsupported parameter or feature was requested.
    Unsupported(&'static str),
    /// The end of the stream was reached.
    EndOfStream,
    /// The RF sink reported a fatal error.
    SinkError(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::IoError(ref err) => {
                write!(f, "io error: {}", err)
            }
            Error::ConfigError(ref msg) => {
                write!(f, "configuration error: {}", msg)
            }
            Error::Unsupported(feature) => {
                write!(f, "unsupported feature: {}", feature)
            }
            Error::EndOfStream => {
                write!(f, "end of stream")
            }
            Error::SinkError(msg) => {
                write!(f, "rf sink error: {}", msg)
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match *self {
            Error::IoError(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        match err.kind() {
            std::io::ErrorKind::UnexpectedEof => Error::EndOfStream,
            _ => Error::IoError(err),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Convenience function to create a configuration error.
pub fn config_error<T>(msg: impl Into<String>) -> Result<T> {
    Err(Error::ConfigError(msg.into()))
}

/// Convenience function to create an unsupported feature error.
pub fn unsupported_error<T>(feature: &'static str) -> Result<T> {
    Err(Error::Unsupported(feature))
}

/// Convenience function to create an end-of-stream error.
pub fn end_of_stream_error<T>() -> Result<T> {
    Err(Error::EndOfStream)
}

/// Convenience function to create a sink error.
pub fn sink_error<T>(msg: &'static str) -> Result<T> {
    Err(Error::SinkError(msg))
}
