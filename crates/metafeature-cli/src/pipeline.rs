//! Extraction Pipeline
//!
//! Locates datasets, extracts metafeatures one dataset at a time and hands
//! each record to a [`RecordSink`]. Production is an iterator so callers can
//! consume records without any sink.

use crate::error::PipelineError;
use crate::settings::Settings;
use crate::sink::RecordSink;
use dataset_loader::{Dataset, DatasetLocator};
use feature_engine::{
    extract_dataset, ExtractOptions, ExtractionConfig, MetafeatureExtractor, MetafeatureRecord,
    NativeExtractor,
};
use std::marker::PhantomData;
use tracing::{error, info};

/// Outcome counts of a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Records handed to the sink
    pub written: usize,
    /// Datasets skipped after an error (keep-going mode)
    pub failed: usize,
}

/// Lazy sequence of metafeature records, one per located dataset
pub struct MetafeatureStream<E = NativeExtractor> {
    locator: DatasetLocator,
    config: ExtractionConfig,
    options: ExtractOptions,
    extractor: PhantomData<fn() -> E>,
}

impl<E: MetafeatureExtractor> MetafeatureStream<E> {
    pub fn new(settings: &Settings) -> Result<Self, PipelineError> {
        let locator = DatasetLocator::new(&settings.pattern, settings.exclusions()?)?
            .with_labels(!settings.unsupervised);

        Ok(Self {
            locator,
            config: settings.extraction_config(),
            options: settings.extract_options(),
            extractor: PhantomData,
        })
    }

    fn extract(&self, dataset: Dataset) -> Result<MetafeatureRecord, PipelineError> {
        let labels = dataset.labels.as_ref().map(|y| y.view());
        match extract_dataset::<E>(dataset.features.view(), labels, &self.config, &self.options) {
            Ok(metafeatures) => Ok(MetafeatureRecord::new(dataset.name, metafeatures)),
            Err(source) => Err(PipelineError::Extract {
                dataset: dataset.name,
                source,
            }),
        }
    }
}

impl<E: MetafeatureExtractor> Iterator for MetafeatureStream<E> {
    type Item = Result<MetafeatureRecord, PipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = match self.locator.next()? {
            Ok(dataset) => self.extract(dataset),
            Err(e) => Err(e.into()),
        };
        Some(item)
    }
}

/// Extract every located dataset into `sink`.
///
/// The first error aborts the run unless `keep_going` is set, in which case
/// per-dataset failures are logged and skipped. The sink is only finished
/// when the run completes.
pub fn run<E: MetafeatureExtractor>(
    settings: &Settings,
    sink: &mut dyn RecordSink,
) -> Result<RunSummary, PipelineError> {
    let mut summary = RunSummary::default();

    for item in MetafeatureStream::<E>::new(settings)? {
        match item {
            Ok(record) => {
                sink.write(&record)?;
                summary.written += 1;
            }
            Err(e) if settings.keep_going && e.is_dataset_error() => {
                error!("Skipping dataset: {}", e);
                summary.failed += 1;
            }
            Err(e) => return Err(e),
        }
    }

    sink.finish()?;
    info!(
        "Extraction complete: {} written, {} failed",
        summary.written, summary.failed
    );
    Ok(summary)
}
