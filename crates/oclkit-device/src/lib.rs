//! Reference-counted OpenCL device handle with capability queries.
//!
//! This crate provides:
//! - [`Device`]: identity, version-gated lifetime, classification, and
//!   capability introspection over one `cl_device_id`
//! - [`DeviceKind`]: the classification enum resolved at construction
//! - [`version::ApiVersion`]: lenient `"<prefix> <major>.<minor>"` parsing
//! - [`extensions::contains_extension`]: exact-token extension lookup
//!
//! Platform discovery lives in `oclkit-query`; this crate only consumes a
//! raw id that the caller obtained there (or elsewhere).

pub mod device;
pub mod extensions;
pub mod kind;
pub mod version;

pub use device::Device;
pub use kind::DeviceKind;
pub use version::ApiVersion;
