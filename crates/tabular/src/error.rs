#![forbid(unsafe_code)]

#[derive(Debug)]
pub enum CodecError {
    Csv(csv::Error),
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv(err) => write!(f, "csv: {err}"),
        }
    }
}

impl std::error::Error for CodecError {}

impl From<csv::Error> for CodecError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}
