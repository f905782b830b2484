//! Serialization of fitted blueprint parameters.
//!
//! Parameter records hold only plain data (column names, category lists,
//! lambdas, means, standard deviations). They are encoded with bincode.

use crate::error::BlueprintError;
use std::path::Path;

/// A parameter record that can be written to and read from bytes.
pub trait SerializableParams: Sized {
    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, BlueprintError>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self, BlueprintError>;

    /// Write the serialized parameters to `path`.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), BlueprintError> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    /// Read parameters previously written by [`save_to_file`](Self::save_to_file).
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, BlueprintError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

impl<T> SerializableParams for T
where
    T: serde::Serialize + for<'de> serde::Deserialize<'de>,
{
    fn to_bytes(&self) -> Result<Vec<u8>, BlueprintError> {
        Ok(bincode::serialize(self)?)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, BlueprintError> {
        Ok(bincode::deserialize(bytes)?)
    }
}
