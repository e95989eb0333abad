//! Record Sinks
//!
//! Streaming output writes one JSON object per line and flushes after every
//! record, so an interrupted run keeps everything produced so far. Batch
//! output buffers records and writes a single JSON array when the run
//! completes.

use crate::error::SinkError;
use crate::settings::Settings;
use clap::ValueEnum;
use feature_engine::MetafeatureRecord;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use tracing::debug;

/// Output layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Newline-delimited JSON, flushed per record
    #[default]
    Jsonl,
    /// One JSON array written at the end of the run
    Json,
}

/// Destination for metafeature records
pub trait RecordSink {
    /// Accept one record
    fn write(&mut self, record: &MetafeatureRecord) -> Result<(), SinkError>;

    /// Complete the output after the last record
    fn finish(&mut self) -> Result<(), SinkError>;
}

/// Newline-delimited JSON writer
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for JsonLinesSink<W> {
    fn write(&mut self, record: &MetafeatureRecord) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        debug!("Flushed record for {}", record.name);
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Buffers every record and writes them as one JSON array
pub struct JsonArraySink<W: Write> {
    writer: W,
    records: Vec<MetafeatureRecord>,
}

impl<W: Write> JsonArraySink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            records: Vec::new(),
        }
    }

    /// Records buffered so far
    pub fn pending(&self) -> usize {
        self.records.len()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for JsonArraySink<W> {
    fn write(&mut self, record: &MetafeatureRecord) -> Result<(), SinkError> {
        self.records.push(record.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, &self.records)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        debug!("Wrote {} records", self.records.len());
        self.records.clear();
        Ok(())
    }
}

/// Open the configured destination (file or standard output) in the configured format
pub fn open_sink(settings: &Settings) -> Result<Box<dyn RecordSink>, SinkError> {
    let writer: Box<dyn Write> = match &settings.output {
        Some(path) => {
            let file = File::create(path).map_err(|source| SinkError::Open {
                path: path.clone(),
                source,
            })?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout()),
    };

    Ok(match settings.format {
        OutputFormat::Jsonl => Box::new(JsonLinesSink::new(writer)),
        OutputFormat::Json => Box::new(JsonArraySink::new(writer)),
    })
}
