use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LightboxError {
    #[error("Invalid spring config: tension {tension}, friction {friction}")]
    InvalidSpring { tension: f32, friction: f32 },
    #[error("Invalid viewport: {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },
    #[error("Invalid color: {0:?}")]
    InvalidColor(String),
}

pub type Result<T> = std::result::Result<T, LightboxError>;
