use formats::{FormatError, GeoJsonError};
use story::config::ConfigError;
use wasm_bindgen::JsValue;

/// Anything that stops the page from loading the story.
#[derive(Debug)]
pub enum ShellError {
    NoDocument,
    Fetch { url: String, message: String },
    NotFound(&'static str),
    Format(FormatError),
    GeoJson(GeoJsonError),
    Config(ConfigError),
}

impl std::fmt::Display for ShellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShellError::NoDocument => write!(f, "no document to render into"),
            ShellError::Fetch { url, message } => write!(f, "failed to fetch {url}: {message}"),
            ShellError::NotFound(dataset) => write!(f, "{dataset} not found at any candidate path"),
            ShellError::Format(e) => write!(f, "{e}"),
            ShellError::GeoJson(e) => write!(f, "country geometry: {e}"),
            ShellError::Config(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ShellError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShellError::Format(e) => Some(e),
            ShellError::GeoJson(e) => Some(e),
            ShellError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FormatError> for ShellError {
    fn from(e: FormatError) -> Self {
        ShellError::Format(e)
    }
}

impl From<GeoJsonError> for ShellError {
    fn from(e: GeoJsonError) -> Self {
        ShellError::GeoJson(e)
    }
}

impl From<ConfigError> for ShellError {
    fn from(e: ConfigError) -> Self {
        ShellError::Config(e)
    }
}

impl From<ShellError> for JsValue {
    fn from(e: ShellError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::ShellError;

    #[test]
    fn messages_name_the_dataset() {
        assert_eq!(
            ShellError::NotFound("venues.json").to_string(),
            "venues.json not found at any candidate path"
        );
        let fetch = ShellError::Fetch {
            url: "data/worldcups.json".into(),
            message: "404".into(),
        };
        assert!(fetch.to_string().contains("data/worldcups.json"));
    }
}
