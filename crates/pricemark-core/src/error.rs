pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid price config ({key}): {message}")]
    InvalidConfig { key: String, message: String },

    #[error("Invalid slot marker: {marker:?} (expected `[attribute]` or `.class`)")]
    InvalidMarker { marker: String },
}
