#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("malformed qualified name {name:?}: {reason}")]
    MalformedName { name: String, reason: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
