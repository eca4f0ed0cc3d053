//=========================================================================
// Settings Errors
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== SettingsError =======================================================

/// Failures while reading, writing or decoding persisted settings.
#[derive(Debug)]
pub enum SettingsError {
    /// Storage backend I/O failure.
    Io(std::io::Error),

    /// Snapshot could not be encoded.
    Encode(serde_json::Error),

    /// Stored text is not a valid snapshot.
    Decode(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Settings I/O error: {}", e),
            Self::Encode(e) => write!(f, "Settings encoding failed: {}", e),
            Self::Decode(e) => write!(f, "Settings decoding failed: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Encode(e) | Self::Decode(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

//=========================================================================
// Tests
//=========================================================================
