/// Recoverable failures inside the story core.
///
/// None of these are fatal: callers log them and degrade (see the handling
/// notes on each variant).
#[derive(Debug, Clone, PartialEq)]
pub enum StoryError {
    /// A named region has no geometry. Camera and highlight actions are skipped.
    MissingGeometry { name: String },
    /// A step (or a match inside a tournament) index is out of range. No-op.
    MissingStep { index: usize, len: usize },
    /// A `match` step carries no match index. No-op.
    MissingMatchIndex { step: usize },
    /// No tournament for the year. The whole transition is a no-op.
    MissingCup { year: Option<u16> },
    /// A source row had an unusable value that was replaced by a default.
    MalformedRow {
        row: usize,
        field: &'static str,
        value: String,
    },
}

impl std::fmt::Display for StoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoryError::MissingGeometry { name } => write!(f, "no geometry for region {name:?}"),
            StoryError::MissingStep { index, len } => {
                write!(f, "step index {index} out of range (len {len})")
            }
            StoryError::MissingMatchIndex { step } => {
                write!(f, "match step {step} has no match index")
            }
            StoryError::MissingCup { year: Some(year) } => write!(f, "no tournament for {year}"),
            StoryError::MissingCup { year: None } => write!(f, "step has no tournament year"),
            StoryError::MalformedRow { row, field, value } => {
                write!(f, "row {row}: unusable {field} {value:?}, using default")
            }
        }
    }
}

impl std::error::Error for StoryError {}

#[cfg(test)]
mod tests {
    use super::StoryError;

    #[test]
    fn messages_name_the_subject() {
        let e = StoryError::MissingGeometry {
            name: "Atlantis".to_string(),
        };
        assert_eq!(e.to_string(), "no geometry for region \"Atlantis\"");
        assert_eq!(
            StoryError::MissingCup { year: Some(1942) }.to_string(),
            "no tournament for 1942"
        );
    }
}
