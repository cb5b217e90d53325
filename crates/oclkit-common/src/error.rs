//! Error taxonomy shared by the `oclkit` crates.

use crate::status::Status;

/// Errors from OpenCL platform and device operations.
#[derive(Debug, thiserror::Error)]
pub enum ClError {
    /// A native call returned a non-success status.
    #[error("{op} failed: {status}")]
    Api { op: &'static str, status: Status },

    /// A bound device reported no owning platform.
    ///
    /// Distinct from [`ClError::Api`]: the native call succeeded but yielded
    /// a null platform, which is a logically impossible state for a valid
    /// device rather than a call failure.
    #[error("device has no owning platform")]
    PlatformNotFound,

    /// A capability query was invoked on an unbound (empty) device handle.
    /// Raised before any native call is attempted.
    #[error("operation requires a bound device handle")]
    UnboundDevice,

    /// A null platform handle was passed to a platform query.
    #[error("invalid platform handle")]
    InvalidPlatform,

    /// Platform enumeration found no OpenCL platforms.
    #[error("no OpenCL platforms available")]
    NoPlatforms,

    /// Writing diagnostics output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for oclkit operations.
pub type Result<T> = std::result::Result<T, ClError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_names_call_and_code() {
        let err = ClError::Api { op: "clGetDeviceInfo", status: Status(-30) };
        let msg = err.to_string();
        assert!(msg.contains("clGetDeviceInfo"));
        assert!(msg.contains("CL_INVALID_VALUE"));
    }

    #[test]
    fn platform_not_found_is_distinct_from_api() {
        let err = ClError::PlatformNotFound;
        assert!(!matches!(err, ClError::Api { .. }));
        assert!(err.to_string().contains("owning platform"));
    }

    #[test]
    fn unbound_device_display() {
        assert!(ClError::UnboundDevice.to_string().contains("bound device"));
    }
}
