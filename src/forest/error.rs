use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ForestError {
    #[error("cannot fit on an empty training set")]
    EmptyTrainingSet,

    #[error("row {row} has {found} features, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("labels and rows differ in length ({labels} labels, {rows} rows)")]
    LabelMismatch { labels: usize, rows: usize },

    #[error("training labels contain a single class; nothing to separate")]
    SingleClass,
}
