use crate::geojson::GeoJsonError;

/// Any failure while decoding one of the story datasets.
#[derive(Debug)]
pub enum FormatError {
    Json {
        dataset: &'static str,
        source: serde_json::Error,
    },
    Csv(csv::Error),
    GeoJson(GeoJsonError),
}

impl std::fmt::Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatError::Json { dataset, source } => {
                write!(f, "failed to parse {dataset}: {source}")
            }
            FormatError::Csv(e) => write!(f, "failed to parse matches CSV: {e}"),
            FormatError::GeoJson(e) => write!(f, "failed to parse region GeoJSON: {e}"),
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormatError::Json { source, .. } => Some(source),
            FormatError::Csv(e) => Some(e),
            FormatError::GeoJson(e) => Some(e),
        }
    }
}

impl From<csv::Error> for FormatError {
    fn from(e: csv::Error) -> Self {
        FormatError::Csv(e)
    }
}

impl From<GeoJsonError> for FormatError {
    fn from(e: GeoJsonError) -> Self {
        FormatError::GeoJson(e)
    }
}
