use thiserror::Error;

#[derive(Debug, Error)]
pub enum MobomojoError {
    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Invalid build: {0}")]
    InvalidBuild(String),

    #[error("Unknown component: {0}")]
    UnknownComponent(String),

    #[error("Component {0} has no build slot")]
    Unplaceable(String),
}

impl From<MobomojoError> for String {
    fn from(err: MobomojoError) -> Self {
        err.to_string()
    }
}
