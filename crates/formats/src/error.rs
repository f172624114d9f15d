#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    Json(String),
    MissingField { feature: usize, field: &'static str },
    BadGeometry { feature: usize, reason: String },
}

impl std::fmt::Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatError::Json(msg) => write!(f, "malformed json: {msg}"),
            FormatError::MissingField { feature, field } => {
                write!(f, "feature {feature}: missing required field {field}")
            }
            FormatError::BadGeometry { feature, reason } => {
                write!(f, "feature {feature}: unusable geometry: {reason}")
            }
        }
    }
}

impl std::error::Error for FormatError {}

impl From<serde_json::Error> for FormatError {
    fn from(e: serde_json::Error) -> Self {
        FormatError::Json(e.to_string())
    }
}
