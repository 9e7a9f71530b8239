//! Record delivery.

use anyhow::{Context, Result};
use joblens_core::OutputRecord;
use std::io::Write;

/// Destination for delivered records.
pub trait RecordSink: Send {
    /// Deliver one batch, in order.
    fn push(&mut self, batch: &[OutputRecord]) -> Result<()>;
}

/// Writes one JSON object per line.
pub struct JsonLinesSink<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> RecordSink for JsonLinesSink<W> {
    fn push(&mut self, batch: &[OutputRecord]) -> Result<()> {
        for record in batch {
            serde_json::to_writer(&mut self.writer, record)
                .context("Failed to serialize record")?;
            self.writer.write_all(b"\n")?;
        }
        self.writer.flush().context("Failed to flush output")?;
        Ok(())
    }
}

/// Buffers records and hands them to a sink `batch_size` at a time.
pub struct BatchWriter<'a> {
    sink: &'a mut dyn RecordSink,
    batch_size: usize,
    pending: Vec<OutputRecord>,
}

impl<'a> BatchWriter<'a> {
    pub fn new(sink: &'a mut dyn RecordSink, batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            sink,
            batch_size,
            pending: Vec::with_capacity(batch_size),
        }
    }

    /// Buffer a record. Returns `true` if a full batch was delivered.
    pub fn push(&mut self, record: OutputRecord) -> Result<bool> {
        self.pending.push(record);
        if self.pending.len() >= self.batch_size {
            self.flush()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Deliver whatever is buffered.
    ///
    /// The buffer is cleared only once the sink accepted it.
    pub fn flush(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        self.sink.push(&self.pending)?;
        self.pending.clear();
        Ok(())
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}
