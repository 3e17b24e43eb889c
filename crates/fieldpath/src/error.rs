use thiserror::Error;

use crate::PathBuf;

#[derive(Error, Debug)]
pub enum Error {
    #[error("field not found")]
    FieldNotFound,
    #[error("value is not an object")]
    NotAnObject,
    #[error("value is not an array")]
    NotAnArray,
    #[error("index out of bounds")]
    OutOfBounds,
    #[error("at {0}: {1}")]
    AtPath(PathBuf, Box<Error>),
}
pub type Result<T> = std::result::Result<T, Error>;
