pub type FloaterResult<T> = Result<T, FloaterError>;

#[derive(thiserror::Error, Debug)]
pub enum FloaterError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("svg error: {0}")]
    Svg(String),

    #[error("sensor error: {0}")]
    Sensor(String),

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FloaterError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn svg(msg: impl Into<String>) -> Self {
        Self::Svg(msg.into())
    }

    pub fn sensor(msg: impl Into<String>) -> Self {
        Self::Sensor(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}
