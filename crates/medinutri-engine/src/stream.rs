//! Chunked, paced delivery of answer text.
//!
//! Text is split on single spaces and regrouped into fixed-size word chunks.
//! Each chunk becomes one [`Frame::Delta`]; a [`Frame::Done`] sentinel always
//! closes the sequence. [`FrameStream`] yields the frames with a fixed delay
//! between them. Dropping the stream stops emission.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use std::time::Duration;

use serde::Serialize;
use tokio::time::Sleep;
use tokio_stream::Stream;

/// Sentinel payload closing every stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// One unit of streamed output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A chunk of answer text.
    Delta(String),
    /// End of the answer.
    Done,
}

#[derive(Serialize)]
struct DeltaPayload<'a> {
    choices: [Choice<'a>; 1],
}

#[derive(Serialize)]
struct Choice<'a> {
    delta: Delta<'a>,
}

#[derive(Serialize)]
struct Delta<'a> {
    content: &'a str,
}

impl Frame {
    /// Event payload: the delta JSON or the sentinel.
    pub fn data(&self) -> String {
        match self {
            Frame::Delta(content) => serde_json::to_string(&DeltaPayload {
                choices: [Choice {
                    delta: Delta { content },
                }],
            })
            .unwrap_or_default(),
            Frame::Done => DONE_SENTINEL.to_string(),
        }
    }

    /// Full server-sent-event encoding: `data: <payload>\n\n`.
    pub fn to_wire(&self) -> String {
        format!("data: {}\n\n", self.data())
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Frame::Done)
    }
}

// =============================================================================
// StreamEmitter
// =============================================================================

/// Chunking and pacing policy for one engine.
#[derive(Debug, Clone)]
pub struct StreamEmitter {
    words_per_chunk: usize,
    delay: Duration,
    /// Append the separating space to the final chunk as well.
    pad_final_chunk: bool,
}

impl StreamEmitter {
    pub fn new(words_per_chunk: usize, delay: Duration, pad_final_chunk: bool) -> Self {
        Self {
            words_per_chunk: words_per_chunk.max(1),
            delay,
            pad_final_chunk,
        }
    }

    /// Entity-engine policy: every chunk keeps its trailing space.
    pub fn entity(words_per_chunk: usize, delay: Duration) -> Self {
        Self::new(words_per_chunk, delay, true)
    }

    /// Advisor policy: no trailing space after the last chunk.
    pub fn advisor(words_per_chunk: usize, delay: Duration) -> Self {
        Self::new(words_per_chunk, delay, false)
    }

    /// Text chunks in order. Empty text has none.
    pub fn chunks(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        let words: Vec<&str> = text.split(' ').collect();
        let groups = words.chunks(self.words_per_chunk);
        let count = groups.len();
        groups
            .enumerate()
            .map(|(i, group)| {
                let mut chunk = group.join(" ");
                if self.pad_final_chunk || i + 1 < count {
                    chunk.push(' ');
                }
                chunk
            })
            .collect()
    }

    /// Every frame for `text`, sentinel last.
    pub fn frames(&self, text: &str) -> Vec<Frame> {
        self.chunks(text)
            .into_iter()
            .map(Frame::Delta)
            .chain(std::iter::once(Frame::Done))
            .collect()
    }

    /// Paced stream of the frames for `text`.
    pub fn emit(&self, text: &str) -> FrameStream {
        FrameStream::new(self.frames(text), self.delay)
    }
}

// =============================================================================
// FrameStream
// =============================================================================

/// Pull-based stream over a precomputed frame sequence.
///
/// After each delta the next frame waits for `delay`. The timer is the only
/// suspension point.
pub struct FrameStream {
    frames: VecDeque<Frame>,
    delay: Duration,
    pending: Option<Pin<Box<Sleep>>>,
}

impl FrameStream {
    pub fn new(frames: impl IntoIterator<Item = Frame>, delay: Duration) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            delay,
            pending: None,
        }
    }

    /// A stream carrying one text delta and the sentinel, without pacing.
    pub fn single(text: impl Into<String>) -> Self {
        Self::new([Frame::Delta(text.into()), Frame::Done], Duration::ZERO)
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl Stream for FrameStream {
    type Item = Frame;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Frame>> {
        let this = self.get_mut();

        if let Some(sleep) = this.pending.as_mut() {
            ready!(sleep.as_mut().poll(cx));
            this.pending = None;
        }

        let Some(frame) = this.frames.pop_front() else {
            return Poll::Ready(None);
        };
        if !frame.is_done() && !this.frames.is_empty() && !this.delay.is_zero() {
            this.pending = Some(Box::pin(tokio::time::sleep(this.delay)));
        }
        Poll::Ready(Some(frame))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.frames.len(), Some(self.frames.len()))
    }
}

impl std::fmt::Debug for FrameStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameStream")
            .field("remaining", &self.frames.len())
            .field("delay", &self.delay)
            .field("sleeping", &self.pending.is_some())
            .finish()
    }
}
