// SPDX-FileCopyrightText: 2026 Planwright Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Newline-delimited JSON framing over a chunked byte stream.

use std::pin::Pin;

use futures::{Stream, TryStreamExt, future};
use tokio_util::bytes::Buf;
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tokio_util::io::StreamReader;

/// Longest accepted line; Ollama lines are a few hundred bytes.
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

pub type LineStream = Pin<Box<dyn Stream<Item = Result<String, LinesCodecError>> + Send>>;

/// Splits `body` into non-blank lines without their `\n` / `\r\n`
/// terminators. A line split across chunks is emitted once whole; a final
/// unterminated line is emitted at end of stream.
pub fn lines<S, B, E>(body: S) -> LineStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: Buf + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    let reader = StreamReader::new(body.map_err(std::io::Error::other));
    let framed = FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_BYTES));
    Box::pin(framed.try_filter(|line| future::ready(!line.trim().is_empty())))
}
