//! Extractor Protocol and Adapter

use crate::config::{ExtractOptions, ExtractionConfig};
use crate::error::ExtractError;
use crate::value::MetafeatureValue;
use ndarray::{ArrayView1, ArrayView2};
use std::collections::BTreeMap;
use tracing::debug;

/// Metafeature name → value
pub type Metafeatures = BTreeMap<String, MetafeatureValue>;

/// Two-phase metafeature extractor: construct, `fit`, then `extract`.
pub trait MetafeatureExtractor: Sized {
    /// Build an extractor from configuration
    fn from_config(config: &ExtractionConfig) -> Result<Self, ExtractError>;

    /// Condition the extractor on a dataset; unsupervised when `y` is `None`
    fn fit(&mut self, x: ArrayView2<f64>, y: Option<ArrayView1<f64>>) -> Result<(), ExtractError>;

    /// Compute metafeatures as parallel name and value lists
    fn extract(
        &self,
        options: &ExtractOptions,
    ) -> Result<(Vec<String>, Vec<MetafeatureValue>), ExtractError>;
}

/// Run one extraction with a fresh extractor and pair its outputs by position
pub fn extract_dataset<E: MetafeatureExtractor>(
    x: ArrayView2<f64>,
    y: Option<ArrayView1<f64>>,
    config: &ExtractionConfig,
    options: &ExtractOptions,
) -> Result<Metafeatures, ExtractError> {
    let mut extractor = E::from_config(config)?;
    extractor.fit(x, y)?;
    let (names, values) = extractor.extract(options)?;

    debug!("Extracted {} metafeatures", names.len());
    Ok(names.into_iter().zip(values).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    /// Reports the shape it was fitted on
    struct ShapeExtractor {
        shape: Option<(usize, usize, bool)>,
    }

    impl MetafeatureExtractor for ShapeExtractor {
        fn from_config(config: &ExtractionConfig) -> Result<Self, ExtractError> {
            if let Some(group) = config.groups.iter().flatten().find(|g| *g != "shape") {
                return Err(ExtractError::UnsupportedGroup(group.clone()));
            }
            Ok(Self { shape: None })
        }

        fn fit(&mut self, x: ArrayView2<f64>, y: Option<ArrayView1<f64>>) -> Result<(), ExtractError> {
            self.shape = Some((x.nrows(), x.ncols(), y.is_some()));
            Ok(())
        }

        fn extract(
            &self,
            _options: &ExtractOptions,
        ) -> Result<(Vec<String>, Vec<MetafeatureValue>), ExtractError> {
            let (rows, cols, supervised) = self.shape.ok_or(ExtractError::NotFitted)?;
            Ok((
                vec!["rows".into(), "cols".into(), "supervised".into()],
                vec![rows.into(), cols.into(), supervised.to_string().into()],
            ))
        }
    }

    #[test]
    fn test_pairs_names_and_values() {
        let x = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let y = array![0.0, 1.0, 0.0];
        let mf = extract_dataset::<ShapeExtractor>(
            x.view(),
            Some(y.view()),
            &ExtractionConfig::default(),
            &ExtractOptions::default(),
        )
        .unwrap();

        assert_eq!(mf.len(), 3);
        assert_eq!(mf["rows"], MetafeatureValue::Integer(3));
        assert_eq!(mf["cols"], MetafeatureValue::Integer(2));
        assert_eq!(mf["supervised"], MetafeatureValue::Text("true".into()));
    }

    #[test]
    fn test_unsupervised_fit() {
        let x = array![[1.0]];
        let mf = extract_dataset::<ShapeExtractor>(
            x.view(),
            None,
            &ExtractionConfig::default(),
            &ExtractOptions::default(),
        )
        .unwrap();
        assert_eq!(mf["supervised"], MetafeatureValue::Text("false".into()));
    }

    #[test]
    fn test_constructor_error_propagates() {
        let x = array![[1.0]];
        let config = ExtractionConfig::default().with_groups(["landmarking"]);
        let err = extract_dataset::<ShapeExtractor>(x.view(), None, &config, &ExtractOptions::default())
            .unwrap_err();
        assert_eq!(err, ExtractError::UnsupportedGroup("landmarking".into()));
    }
}
