//! Glob-Driven Dataset Discovery

use crate::dataset::{Dataset, DatasetRef};
use crate::error::LoadError;
use crate::exclusion::ExclusionPolicy;
use glob::Paths;
use tracing::{debug, info};

/// Default discovery pattern for preprocessed datasets
pub const DEFAULT_PATTERN: &str = "data/datasets_processed/*.X";

/// Lazy, single-pass iterator over the datasets matched by a glob pattern.
///
/// Yields one item per matched feature file, in glob order. Excluded
/// datasets are logged and skipped. A dataset whose files cannot be read
/// is yielded as an `Err`; the caller decides whether to stop.
pub struct DatasetLocator {
    paths: Paths,
    exclusions: ExclusionPolicy,
    with_labels: bool,
}

impl DatasetLocator {
    /// Create a locator for `pattern`
    pub fn new(pattern: &str, exclusions: ExclusionPolicy) -> Result<Self, LoadError> {
        debug!("Compiling dataset pattern {}", pattern);
        Ok(Self {
            paths: glob::glob(pattern)?,
            exclusions,
            with_labels: true,
        })
    }

    /// Whether label files are read (unsupervised mode when false)
    pub fn with_labels(mut self, with_labels: bool) -> Self {
        self.with_labels = with_labels;
        self
    }

    /// Advance to the next non-excluded dataset reference
    fn next_ref(&mut self) -> Option<Result<DatasetRef, LoadError>> {
        loop {
            let path = match self.paths.next()? {
                Ok(path) => path,
                Err(e) => return Some(Err(e.into())),
            };

            let Some(dataset) = DatasetRef::from_features_path(&path) else {
                debug!("Ignoring {} (not a feature file)", path.display());
                continue;
            };

            if self.exclusions.is_excluded(dataset.name()) {
                info!("Skipping {}", dataset.base().display());
                continue;
            }

            return Some(Ok(dataset));
        }
    }
}

impl Iterator for DatasetLocator {
    type Item = Result<Dataset, LoadError>;

    fn next(&mut self) -> Option<Self::Item> {
        let dataset = match self.next_ref()? {
            Ok(dataset) => dataset,
            Err(e) => return Some(Err(e)),
        };

        info!("Processing {}", dataset.base().display());
        Some(dataset.load(self.with_labels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::{self, Write};
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    /// Log output collected in memory
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn write_dataset(dir: &Path, name: &str, with_labels: bool) {
        fs::write(dir.join(format!("{name}.X")), "a,b\n1,2\n3,4\n5,6\n").unwrap();
        if with_labels {
            fs::write(dir.join(format!("{name}.y")), "0\n1\n0\n").unwrap();
        }
    }

    fn pattern(dir: &Path) -> String {
        format!("{}/*.X", dir.display())
    }

    #[test]
    fn test_yields_every_dataset() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(dir.path(), "a", true);
        write_dataset(dir.path(), "b", true);

        let locator = DatasetLocator::new(&pattern(dir.path()), ExclusionPolicy::none()).unwrap();
        let mut names: Vec<String> = locator.map(|d| d.unwrap().name).collect();
        names.sort();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_dataset_contents() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(dir.path(), "a", true);

        let mut locator =
            DatasetLocator::new(&pattern(dir.path()), ExclusionPolicy::none()).unwrap();
        let ds = locator.next().unwrap().unwrap();
        assert_eq!(ds.n_rows(), 3);
        assert_eq!(ds.n_columns(), 2);
        assert_eq!(ds.labels.unwrap().len(), 3);
        assert!(locator.next().is_none());
    }

    #[test]
    fn test_excluded_dataset_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(dir.path(), "iris", true);
        write_dataset(dir.path(), "MNIST", true);

        let policy = ExclusionPolicy::new(["*MNIST"]).unwrap();
        let locator = DatasetLocator::new(&pattern(dir.path()), policy).unwrap();
        let names: Vec<String> = locator.map(|d| d.unwrap().name).collect();
        assert_eq!(names, vec!["iris"]);
    }

    #[test]
    fn test_missing_label_file() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(dir.path(), "foo", false);

        let mut locator =
            DatasetLocator::new(&pattern(dir.path()), ExclusionPolicy::none()).unwrap();
        match locator.next() {
            Some(Err(LoadError::NotFound { path })) => {
                assert_eq!(path, dir.path().join("foo.y"));
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupervised_mode_ignores_labels() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(dir.path(), "foo", false);

        let mut locator = DatasetLocator::new(&pattern(dir.path()), ExclusionPolicy::none())
            .unwrap()
            .with_labels(false);
        let ds = locator.next().unwrap().unwrap();
        assert!(ds.labels.is_none());
    }

    #[test]
    fn test_no_matches() {
        let dir = tempfile::tempdir().unwrap();
        let mut locator =
            DatasetLocator::new(&pattern(dir.path()), ExclusionPolicy::none()).unwrap();
        assert!(locator.next().is_none());
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            DatasetLocator::new("data/[*.X", ExclusionPolicy::none()),
            Err(LoadError::Pattern(_))
        ));
    }

    #[test]
    fn test_excluded_dataset_is_logged() {
        let dir = tempfile::tempdir().unwrap();
        write_dataset(dir.path(), "iris", true);
        write_dataset(dir.path(), "MNIST", true);

        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();

        let policy = ExclusionPolicy::new(["*MNIST"]).unwrap();
        let names: Vec<String> = tracing::subscriber::with_default(subscriber, || {
            DatasetLocator::new(&pattern(dir.path()), policy)
                .unwrap()
                .map(|d| d.unwrap().name)
                .collect()
        });
        assert_eq!(names, vec!["iris"]);

        let output = logs.contents();
        let skipped: Vec<&str> = output.lines().filter(|l| l.contains("Skipping")).collect();
        assert_eq!(skipped.len(), 1);
        let base = dir.path().join("MNIST");
        assert!(skipped[0].contains(&base.display().to_string()));
        assert!(output
            .lines()
            .any(|l| l.contains("Processing") && l.contains(&dir.path().join("iris").display().to_string())));
    }
}
