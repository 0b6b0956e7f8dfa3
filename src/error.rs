use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: Box<ExplorerError>,
    },

    #[error("Required column '{0}' not found")]
    MissingColumn(String),

    #[error("Invalid selection '{value}' (expected one of: {options})")]
    InvalidSelection { value: String, options: String },

    #[error("Chart error: {0}")]
    Chart(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel error: {0}")]
    Excel(#[from] rust_xlsxwriter::XlsxError),
}

impl ExplorerError {
    /// Attach a 1-based source data row number to an error
    pub fn at_row(self, row: usize) -> Self {
        ExplorerError::Row {
            row,
            source: Box::new(self),
        }
    }

    /// True for the increment-code parse failure, including when wrapped with a row number
    pub fn is_parse(&self) -> bool {
        match self {
            ExplorerError::Parse(_) => true,
            ExplorerError::Row { source, .. } => source.is_parse(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExplorerError>;
