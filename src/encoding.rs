//! Text-encoding detection and strict decoding for fetched content
//!
//! Wraps the chardetng statistical detector behind a small sniffer that is
//! fed sequentially, chunk by chunk, and stops consuming input once its
//! guess has settled. Decoding goes through encoding_rs and treats malformed
//! byte sequences as errors rather than substituting replacement characters.

use std::io::{self, BufRead};

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use thiserror::Error;

/// Minimum number of bytes to sample before a non-ASCII guess is settled.
const SETTLE_BYTES: usize = 8 * 1024;

/// Hard ceiling on sampled bytes; beyond this more input won't change the guess.
const MAX_SNIFF_BYTES: usize = 64 * 1024;

/// Content could not be decoded with the detected encoding.
#[derive(Debug, Error)]
#[error("content is not valid {encoding}")]
pub struct DecodeError {
    /// Name of the encoding the bytes were expected to conform to
    pub encoding: &'static str,
}

/// Where the sniffer is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SniffState {
    /// Still consuming input
    Sampling,
    /// Enough evidence seen; further input is ignored
    Settled,
    /// The detector has been finalized and the guess is fixed
    Done,
}

/// Incremental encoding sniffer over a forward-only byte source.
///
/// Feed chunks with [`EncodingSniffer::feed`] until it reports that it has
/// settled (or the input runs out), then call [`EncodingSniffer::guess`].
/// An empty input produces no guess.
pub struct EncodingSniffer {
    detector: EncodingDetector,
    state: SniffState,
    bytes_fed: usize,
    saw_non_ascii: bool,
}

impl Default for EncodingSniffer {
    fn default() -> Self {
        Self::new()
    }
}

impl EncodingSniffer {
    pub fn new() -> Self {
        Self {
            detector: EncodingDetector::new(),
            state: SniffState::Sampling,
            bytes_fed: 0,
            saw_non_ascii: false,
        }
    }

    /// Feeds one chunk of input.
    ///
    /// Returns `true` while the sniffer wants more input, `false` once its
    /// guess has settled and callers may stop reading.
    pub fn feed(&mut self, chunk: &[u8]) -> bool {
        if self.state != SniffState::Sampling {
            return false;
        }
        if chunk.is_empty() {
            return true;
        }

        self.saw_non_ascii |= self.detector.feed(chunk, false);
        self.bytes_fed += chunk.len();

        let settled = self.bytes_fed >= MAX_SNIFF_BYTES
            || (self.saw_non_ascii && self.bytes_fed >= SETTLE_BYTES);
        if settled {
            self.state = SniffState::Settled;
            return false;
        }
        true
    }

    /// Finalizes the detector and returns the best-guess encoding.
    ///
    /// Returns `None` when no bytes were ever fed; callers must treat that
    /// as "encoding unknown" and fail any decode attempt explicitly.
    pub fn guess(&mut self) -> Option<&'static Encoding> {
        if self.state != SniffState::Done {
            // The detector requires exactly one final feed with `last` set.
            self.detector.feed(b"", true);
            self.state = SniffState::Done;
        }
        if self.bytes_fed == 0 {
            return None;
        }
        Some(self.detector.guess(None, true))
    }
}

/// Detects the encoding of a byte source, reading it incrementally and
/// stopping early once the sniffer settles.
pub fn detect_encoding<R: BufRead>(mut reader: R) -> io::Result<Option<&'static Encoding>> {
    let mut sniffer = EncodingSniffer::new();
    loop {
        let chunk = reader.fill_buf()?;
        if chunk.is_empty() {
            break;
        }
        let consumed = chunk.len();
        let wants_more = sniffer.feed(chunk);
        reader.consume(consumed);
        if !wants_more {
            break;
        }
    }
    Ok(sniffer.guess())
}

/// Decodes `bytes` with `encoding`, failing on malformed sequences.
pub fn decode(bytes: &[u8], encoding: &'static Encoding) -> Result<String, DecodeError> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(DecodeError {
            encoding: encoding.name(),
        });
    }
    Ok(text.into_owned())
}
