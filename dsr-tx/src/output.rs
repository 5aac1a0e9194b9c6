// DSR
// Copyright (c) 2026 The Project DSR Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RF outputs.
//!
//! The file back end converts the modulator's 16-bit I/Q samples into one of six sample
//! formats. In live mode it is wrapped in a paced writer thread fed through a bounded
//! single-producer/single-consumer sample ring: the encode loop blocks when the ring is full,
//! and an under-run at the consumer is reported and silenced, never propagated.

use std::fs::File;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::warn;
use rb::{RbConsumer, RbProducer, SpscRb, RB};

use dsr_core::errors::{config_error, sink_error, Result};
use dsr_core::sink::RfSink;

use crate::config::OutputConfig;

/// Sample formats of the file back end.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum DataType {
    Uint8,
    Int8,
    Uint16,
    Int16,
    Int32,
    Float,
}

impl DataType {
    fn parse(s: &str) -> Option<DataType> {
        match s {
            "uint8" => Some(DataType::Uint8),
            "int8" => Some(DataType::Int8),
            "uint16" => Some(DataType::Uint16),
            "int16" => Some(DataType::Int16),
            "int32" => Some(DataType::Int32),
            "float" => Some(DataType::Float),
            _ => None,
        }
    }
}

/// Opens the RF output described by the configuration.
pub fn open(config: &OutputConfig) -> Result<Box<dyn RfSink>> {
    if config.kind != "file" {
        return config_error(format!("unrecognised output type '{}'", config.kind));
    }

    let data_type = match config.data_type.as_deref() {
        Some(s) => match DataType::parse(s) {
            Some(data_type) => data_type,
            None => return config_error(format!("invalid data type '{}'", s)),
        },
        None => return config_error("output data type is required"),
    };

    let file = FileSink::open(config.output.as_deref(), data_type)?;

    if config.live {
        Ok(Box::new(LiveSink::start(file, config.sample_rate)))
    }
    else {
        Ok(Box::new(file))
    }
}

/// Writes I/Q samples to a file or standard output in the configured sample format.
struct FileSink {
    out: Box<dyn Write + Send>,
    data_type: DataType,
    buf: Vec<u8>,
}

impl FileSink {
    fn open(path: Option<&str>, data_type: DataType) -> Result<FileSink> {
        let out: Box<dyn Write + Send> = match path {
            None => return config_error("no output filename provided"),
            Some("-") => Box::new(io::stdout()),
            Some(path) => Box::new(File::create(path)?),
        };

        Ok(FileSink { out, data_type, buf: Vec::new() })
    }
}

impl RfSink for FileSink {
    fn write(&mut self, iq: &[i16]) -> Result<()> {
        self.buf.clear();

        match self.data_type {
            DataType::Int16 => {
                // The native format needs no conversion pass.
                self.out.write_all(bytemuck::cast_slice(iq))?;
                return Ok(());
            }
            DataType::Uint8 => {
                self.buf.extend(
                    iq.iter().map(|&v| (((i32::from(v) - i32::from(i16::MIN)) >> 8) as u8)),
                );
            }
            DataType::Int8 => {
                self.buf.extend(iq.iter().map(|&v| ((v >> 8) as i8) as u8));
            }
            DataType::Uint16 => {
                for &v in iq {
                    let v = (i32::from(v) - i32::from(i16::MIN)) as u16;
                    self.buf.extend_from_slice(&v.to_ne_bytes());
                }
            }
            DataType::Int32 => {
                for &v in iq {
                    let v = (i32::from(v) << 16).wrapping_add(i32::from(v));
                    self.buf.extend_from_slice(&v.to_ne_bytes());
                }
            }
            DataType::Float => {
                for &v in iq {
                    let v = (f64::from(v) * (1.0 / 32767.0)) as f32;
                    self.buf.extend_from_slice(&v.to_ne_bytes());
                }
            }
        }

        self.out.write_all(&self.buf)?;

        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Capacity of the live output ring, in 2 ms payload blocks.
const RING_BLOCKS: usize = 8;

/// A paced real-time wrapper around the file back end.
///
/// The encode loop produces into the bounded ring and blocks when it is full; the writer
/// thread consumes one 2 ms block per tick at the nominal sample rate, zero-filling whatever
/// the producer failed to deliver in time.
struct LiveSink {
    producer: rb::Producer<i16>,
    thread: Option<thread::JoinHandle<Result<()>>>,
    stop: Arc<AtomicBool>,
}

impl LiveSink {
    fn start(mut file: FileSink, sample_rate: u32) -> LiveSink {
        // One 2 ms block of interleaved I/Q.
        let chunk = (sample_rate / 500) as usize * 2;

        let ring = SpscRb::new(RING_BLOCKS * chunk);
        let (producer, consumer) = (ring.producer(), ring.consumer());
        let stop = Arc::new(AtomicBool::new(false));

        let thread = {
            let stop = Arc::clone(&stop);

            thread::spawn(move || -> Result<()> {
                let mut buf = vec![0i16; chunk];
                let start = Instant::now();
                let mut sent: u64 = 0;

                loop {
                    // Pace one block period ahead of the drain so the producer always has a
                    // full tick to deliver into the ring.
                    sent += (buf.len() / 2) as u64;
                    let target =
                        start + Duration::from_micros(sent * 1_000_000 / u64::from(sample_rate));
                    let now = Instant::now();
                    if target > now {
                        thread::sleep(target - now);
                    }

                    let stopping = stop.load(Ordering::SeqCst);
                    let n = consumer.read(&mut buf).unwrap_or(0);

                    if n == 0 && stopping {
                        break;
                    }

                    if n < buf.len() {
                        if !stopping {
                            warn!("rf output under-run, injecting silence");
                        }
                        buf[n..].fill(0);
                    }

                    file.write(&buf[..])?;
                }

                file.close()
            })
        };

        LiveSink { producer, thread: Some(thread), stop }
    }
}

impl RfSink for LiveSink {
    fn write(&mut self, iq: &[i16]) -> Result<()> {
        let mut i = 0;

        // Write as many samples as possible to the ring buffer. This blocks until some
        // samples are written or the consumer has been destroyed (None is returned).
        while i < iq.len() {
            match self.producer.write_blocking(&iq[i..]) {
                Some(n) => i += n,
                None => return sink_error("rf output thread terminated"),
            }
        }

        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.stop.store(true, Ordering::SeqCst);

        if let Some(thread) = self.thread.take() {
            match thread.join() {
                Ok(result) => result?,
                Err(_) => return sink_error("rf output thread panicked"),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DataType, FileSink};
    use dsr_core::sink::RfSink;

    fn convert(data_type: DataType, iq: &[i16]) -> Vec<u8> {
        let mut path = std::env::temp_dir();
        path.push(format!("dsr-output-test-{}-{:?}.iq", std::process::id(), data_type));

        let mut sink = FileSink::open(path.to_str(), data_type).unwrap();
        sink.write(iq).unwrap();
        sink.close().unwrap();

        let bytes = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        bytes
    }

    #[test]
    fn verify_int16_passthrough() {
        let bytes = convert(DataType::Int16, &[0x0102, -2]);

        assert_eq!(bytes, [0x0102i16.to_ne_bytes(), (-2i16).to_ne_bytes()].concat());
    }

    #[test]
    fn verify_uint8_offset_binary() {
        // Full negative maps to 0x00, zero to 0x80, full positive to 0xFF.
        let bytes = convert(DataType::Uint8, &[i16::MIN, 0, i16::MAX, 0]);

        assert_eq!(bytes, [0x00, 0x80, 0xFF, 0x80]);
    }

    #[test]
    fn verify_int8_truncation() {
        let bytes = convert(DataType::Int8, &[i16::MIN, 0x1234]);

        assert_eq!(bytes, [0x80, 0x12]);
    }

    #[test]
    fn verify_uint16_offset_binary() {
        let bytes = convert(DataType::Uint16, &[i16::MIN, i16::MAX]);

        assert_eq!(bytes, [0x0000u16.to_ne_bytes(), 0xFFFFu16.to_ne_bytes()].concat());
    }

    #[test]
    fn verify_int32_replication() {
        let bytes = convert(DataType::Int32, &[0x0102, 0]);

        assert_eq!(bytes, [0x01020102i32.to_ne_bytes(), 0i32.to_ne_bytes()].concat());
    }

    #[test]
    fn verify_float_scaling() {
        let bytes = convert(DataType::Float, &[i16::MAX, 0]);

        assert_eq!(bytes, [1.0f32.to_ne_bytes(), 0.0f32.to_ne_bytes()].concat());
    }
}
