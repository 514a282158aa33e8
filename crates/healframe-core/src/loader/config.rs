pub const DEFAULT_BATCH_SIZE: usize = 64 * 1024;

/// Parsing options for delimited input files.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    pub delimiter: u8,
    pub infer_max_records: Option<usize>,
    pub batch_size: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            infer_max_records: None,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

pub struct LoaderConfigBuilder {
    delimiter: u8,
    infer_max_records: Option<usize>,
    batch_size: usize,
}

impl Default for LoaderConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoaderConfigBuilder {
    /// Create a new [`LoaderConfigBuilder`]
    pub fn new() -> Self {
        let config = LoaderConfig::default();
        Self {
            delimiter: config.delimiter,
            infer_max_records: config.infer_max_records,
            batch_size: config.batch_size,
        }
    }

    /// Build a [`LoaderConfig`]
    pub fn build(self) -> LoaderConfig {
        LoaderConfig {
            delimiter: self.delimiter,
            infer_max_records: self.infer_max_records,
            // A zero batch size would never yield a row
            batch_size: self.batch_size.max(1),
        }
    }

    pub fn with_delimiter(self, delimiter: u8) -> Self {
        Self { delimiter, ..self }
    }

    /// Limit the number of rows scanned to infer column types.
    pub fn with_infer_max_records(self, max: usize) -> Self {
        Self {
            infer_max_records: Some(max),
            ..self
        }
    }

    pub fn with_batch_size(self, batch_size: usize) -> Self {
        Self { batch_size, ..self }
    }
}
