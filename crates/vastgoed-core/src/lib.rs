pub mod error;
pub mod mortgage;
pub mod time_value;
pub mod types;

#[cfg(feature = "tax")]
pub mod tax;

#[cfg(feature = "investment")]
pub mod investment;

#[cfg(feature = "snowball")]
pub mod snowball;

pub use error::VastgoedError;
pub use types::*;

/// Standard result type for the fallible boundary (parsing, deserialisation)
pub type VastgoedResult<T> = Result<T, VastgoedError>;
