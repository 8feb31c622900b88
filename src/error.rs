pub type Result<T> = std::result::Result<T, Error>;

/// Every variant is fatal: nothing in the crate retries or recovers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no platforms found")]
    NoPlatformAvailable,

    #[error("no devices found")]
    NoDeviceAvailable,

    #[error("no device matches selection policy `{0}`")]
    NoMatchingDevice(String),

    #[error("failed to open device: {0}")]
    DeviceInit(String),

    #[error("kernel build failed\nbuild status: error\nbuild log: {log}")]
    Build { log: String },

    #[error("dispatch error: {0}")]
    Dispatch(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("telemetry error: {0}")]
    Telemetry(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Kernel build failure carrying the platform's log.
    pub fn build<S: Into<String>>(log: S) -> Self {
        Error::Build { log: log.into() }
    }

    /// Failure while running work on the device.
    pub fn dispatch<S: Into<String>>(msg: S) -> Self {
        Error::Dispatch(msg.into())
    }

    /// Invalid configuration.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// The selected device could not be opened.
    pub fn device_init<S: Into<String>>(msg: S) -> Self {
        Error::DeviceInit(msg.into())
    }

    /// Timing or report export failure.
    pub fn telemetry<S: Into<String>>(msg: S) -> Self {
        Error::Telemetry(msg.into())
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumeration_messages() {
        assert!(Error::NoPlatformAvailable.to_string().contains("no platforms"));
        assert!(Error::NoDeviceAvailable.to_string().contains("no devices"));
    }

    #[test]
    fn test_build_error_carries_log() {
        let err = Error::build("error: expected `;`, found `}`");
        let msg = err.to_string();
        assert!(msg.contains("build log"));
        assert!(msg.contains("expected `;`"));
    }

    #[test]
    fn test_exit_codes_are_fatal() {
        let errors = [
            Error::NoPlatformAvailable,
            Error::NoDeviceAvailable,
            Error::build("log"),
            Error::dispatch("lost device"),
            Error::config("bad"),
        ];
        for err in &errors {
            assert_eq!(err.exit_code(), 1);
        }
    }
}
