//! Device client errors.

use thiserror::Error;

/// Result type for device fetches.
pub type DeviceResult<T> = std::result::Result<T, DeviceError>;

/// Errors fetching readings from a gateway. Every variant names the URL
/// that failed.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The configured address is not a usable base URL.
    #[error("Invalid gateway address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// Connection, timeout or transport failure.
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The gateway answered with a non-success status.
    #[error("Request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// The body could not be decoded.
    #[error("Decoding response from {url} failed: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The gateway reported a type code missing from the device type table.
    #[error("Unknown device type {code} reported by {url}")]
    UnrecognizedDeviceType { code: i64, url: String },
}

impl DeviceError {
    /// URL of the failing request, if one was made.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::InvalidAddress { .. } => None,
            Self::Request { url, .. }
            | Self::Status { url, .. }
            | Self::Decode { url, .. }
            | Self::UnrecognizedDeviceType { url, .. } => Some(url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DeviceError::UnrecognizedDeviceType {
            code: 999,
            url: "http://gw/api/info".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unknown device type 999 reported by http://gw/api/info"
        );
        assert_eq!(err.url(), Some("http://gw/api/info"));

        let err = DeviceError::Status {
            url: "http://gw/api/info".to_string(),
            status: 401,
        };
        assert!(err.to_string().contains("401"));

        let err = DeviceError::InvalidAddress {
            address: "gw".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert!(err.url().is_none());
    }
}
