use std::io;
use thiserror::Error;

/// Main error type for the QM coder.
///
/// Reaching the end of the entropy data is not an error: the decoder reports
/// it as `Ok(None)`.
#[derive(Error, Debug)]
pub enum QmError {
    /// A `0xFF` byte in the entropy data was followed by something other than
    /// the `0x00` stuff byte, i.e. a marker sits at `offset`.
    #[error("Marker 0xFF{marker:02X} found in entropy data at offset {offset}")]
    MalformedStuffing { offset: usize, marker: u8 },
    /// The encoder output would grow past the configured limit.
    #[error("Encoder output exceeds capacity limit of {limit} bytes")]
    CapacityExceeded { limit: usize },
    /// The encoder was used after `finish`.
    #[error("Encoder already finished")]
    Finished,
    /// Writing the coded stream to a sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A specialized `Result` type for QM coding operations.
pub type Result<T> = std::result::Result<T, QmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            QmError::MalformedStuffing {
                offset: 29,
                marker: 0xD9
            }
            .to_string(),
            "Marker 0xFFD9 found in entropy data at offset 29"
        );

        assert_eq!(
            QmError::CapacityExceeded { limit: 32 }.to_string(),
            "Encoder output exceeds capacity limit of 32 bytes"
        );

        assert_eq!(QmError::Finished.to_string(), "Encoder already finished");

        let io_error = io::Error::new(io::ErrorKind::WriteZero, "sink full");
        assert_eq!(QmError::from(io_error).to_string(), "I/O error: sink full");
    }
}
