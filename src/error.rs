use thiserror::Error;

pub type Result<T> = std::result::Result<T, ArcTextError>;

#[derive(Debug, Error)]
pub enum ArcTextError {
    #[error("Unsupported arc type: {0}")]
    UnsupportedArcType(String),

    #[error("Invalid story: {message}")]
    InvalidStory { message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Font error: {0}")]
    Font(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<toml::de::Error> for ArcTextError {
    fn from(err: toml::de::Error) -> Self {
        ArcTextError::Config(format!("TOML parse error: {}", err))
    }
}
