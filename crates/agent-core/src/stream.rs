//! Streaming Emulation
//!
//! Replays an already computed answer word by word with a fixed delay
//! between frames, then a `[DONE]` sentinel. No frame is produced before the
//! caller has the complete answer in hand.

use std::time::Duration;

use futures::stream::{self, Stream, StreamExt};

/// Pause between emitted words
pub const STREAM_CHUNK_DELAY: Duration = Duration::from_millis(50);

/// Terminal marker
pub const DONE_SENTINEL: &str = "[DONE]";

/// One server-push unit
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamFrame {
    Word(String),
    Done,
    Error(String),
}

impl StreamFrame {
    /// Payload after `data: `
    pub fn data(&self) -> String {
        match self {
            StreamFrame::Word(word) => format!("{word} "),
            StreamFrame::Done => DONE_SENTINEL.to_string(),
            StreamFrame::Error(message) => format!("Error: {message}"),
        }
    }

    /// Full SSE event. Embedded line breaks become separate `data:` lines.
    pub fn to_sse(&self) -> String {
        let mut event: String = self
            .data()
            .split('\n')
            .map(|line| format!("data: {line}\n"))
            .collect();
        event.push('\n');
        event
    }
}

/// Emit `answer` one word per frame, `delay` apart, followed by [`StreamFrame::Done`].
///
/// Words are split on spaces only, so line breaks survive inside a word.
pub fn pace_words(answer: String, delay: Duration) -> impl Stream<Item = StreamFrame> {
    let words: Vec<String> = answer
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect();

    let paced = stream::iter(words).then(move |word| async move {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        StreamFrame::Word(word)
    });

    paced.chain(stream::once(async { StreamFrame::Done }))
}
