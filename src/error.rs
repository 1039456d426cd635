use thiserror::Error;

/// Errors raised at the scanner's boundaries (camera, clipboard, configuration)
///
/// Rejected candidates are not errors: the debouncer drops them silently.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The user or platform refused camera access
    #[error("Camera permission denied")]
    PermissionDenied,

    /// The capture device could not be opened or stopped delivering frames
    #[error("Capture device unavailable: {0}")]
    DeviceUnavailable(String),

    /// A single frame could not be decoded; the device keeps running
    #[error("Scanner error: {0}")]
    Decode(String),

    /// A control line named no known session command
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// The clipboard rejected the write
    #[error("Clipboard write failed: {0}")]
    Clipboard(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O error while reading a decode log or writing an export
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed YAML configuration
    #[error("Configuration parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ScanError {
    /// Whether the capture device is gone and a capture run must end.
    ///
    /// Anything else coming out of a device is a per-frame fault.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ScanError::PermissionDenied | ScanError::DeviceUnavailable(_) | ScanError::Io(_)
        )
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ScanError>;
