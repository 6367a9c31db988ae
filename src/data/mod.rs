//! Data loading
//!
//! Readers that turn files into [`Dataset`](crate::core::Dataset)s with
//! string labels. Trainers that need `bool` labels map them with
//! [`Dataset::map_labels`](crate::core::Dataset::map_labels).

pub mod csv;

pub use self::csv::CsvDataset;
