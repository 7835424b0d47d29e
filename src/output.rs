//! Output sinks for streamed model replies.
//!
//! The presentation layer (terminal, notebook, GUI) implements [`OutputSink`];
//! [`relay_stream`] feeds it one delta at a time.

use std::io::{self, Write};
use std::time::Duration;

use tokio::sync::mpsc;

use crate::core::errors::KnowledgeError;

pub trait OutputSink: Send {
    fn write_delta(&mut self, delta: &str) -> io::Result<()>;

    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes deltas to any [`Write`], flushing after each one.
pub struct WriterSink<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> OutputSink for WriterSink<W> {
    fn write_delta(&mut self, delta: &str) -> io::Result<()> {
        self.writer.write_all(delta.as_bytes())?;
        self.writer.flush()
    }

    fn finish(&mut self) -> io::Result<()> {
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

/// Collects everything in memory.
#[derive(Debug, Default)]
pub struct BufferSink {
    buffer: String,
    finished: bool,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> &str {
        &self.buffer
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl OutputSink for BufferSink {
    fn write_delta(&mut self, delta: &str) -> io::Result<()> {
        self.buffer.push_str(delta);
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.finished = true;
        Ok(())
    }
}

/// Drain `rx` into `sink` and return the full reply.
///
/// Empty deltas are skipped. `chunk_delay` paces output between chunks. The
/// first delta error stops the relay and is returned; the sink is not finished.
pub async fn relay_stream(
    mut rx: mpsc::Receiver<Result<String, KnowledgeError>>,
    sink: &mut dyn OutputSink,
    chunk_delay: Duration,
) -> Result<String, KnowledgeError> {
    let mut response = String::new();

    while let Some(delta) = rx.recv().await {
        let delta = delta?;
        if delta.is_empty() {
            continue;
        }
        response.push_str(&delta);
        sink.write_delta(&delta)?;

        if !chunk_delay.is_zero() {
            tokio::time::sleep(chunk_delay).await;
        }
    }

    sink.finish()?;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn channel_of(items: Vec<Result<String, KnowledgeError>>) -> mpsc::Receiver<Result<String, KnowledgeError>> {
        let (tx, rx) = mpsc::channel(items.len().max(1));
        for item in items {
            tx.send(item).await.unwrap();
        }
        rx
    }

    #[tokio::test]
    async fn test_relay_skips_empty_deltas() {
        let rx = channel_of(vec![
            Ok("Alex ".to_string()),
            Ok(String::new()),
            Ok("Lancaster".to_string()),
        ])
        .await;
        let mut sink = BufferSink::new();

        let response = relay_stream(rx, &mut sink, Duration::ZERO).await.unwrap();

        assert_eq!(response, "Alex Lancaster");
        assert_eq!(sink.contents(), "Alex Lancaster");
        assert!(sink.is_finished());
    }

    #[tokio::test]
    async fn test_relay_stops_on_error() {
        let rx = channel_of(vec![
            Ok("partial".to_string()),
            Err(KnowledgeError::Backend("connection reset".to_string())),
            Ok("never".to_string()),
        ])
        .await;
        let mut sink = BufferSink::new();

        let err = relay_stream(rx, &mut sink, Duration::ZERO).await.unwrap_err();

        assert!(matches!(err, KnowledgeError::Backend(_)));
        assert_eq!(sink.contents(), "partial");
        assert!(!sink.is_finished());
    }

    #[tokio::test]
    async fn test_writer_sink_appends_newline() {
        let rx = channel_of(vec![Ok("a".to_string()), Ok("b".to_string())]).await;
        let mut sink = WriterSink::new(Vec::new());

        relay_stream(rx, &mut sink, Duration::from_millis(1)).await.unwrap();

        assert_eq!(sink.into_inner(), b"ab\n".to_vec());
    }
}
