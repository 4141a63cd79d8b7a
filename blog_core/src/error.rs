use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Rejected before anything was sent to the backend.
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Client(#[from] blog_client::Error),
}

impl Error {
    /// Text to show in a notice.
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation(message) => message.clone(),
            Error::Client(e) => e.user_message(),
        }
    }
}
