//! The reference-counted device handle.
//!
//! A [`Device`] wraps an opaque `cl_device_id`. Whether copies and drops
//! touch the native reference count depends on the owning platform:
//! `clRetainDevice`/`clReleaseDevice` exist only from OpenCL 1.2 onward, so
//! both operations probe the platform's version string at runtime and fall
//! back to shallow aliasing on older platforms, where the root-device
//! lifetime is tied to platform teardown.

use std::io::{self, Write};
use std::ptr;

use oclkit_common::error::Result;
use oclkit_common::types::{
    ClDeviceId, ClPlatformId, CL_DEVICE_EXTENSIONS, CL_DEVICE_GLOBAL_MEM_SIZE,
    CL_DEVICE_IMAGE_SUPPORT, CL_DEVICE_LOCAL_MEM_SIZE, CL_DEVICE_MAX_COMPUTE_UNITS,
    CL_DEVICE_MAX_CONSTANT_BUFFER_SIZE, CL_DEVICE_MAX_MEM_ALLOC_SIZE,
    CL_DEVICE_MAX_WORK_GROUP_SIZE, CL_DEVICE_MAX_WORK_ITEM_DIMENSIONS,
    CL_DEVICE_MAX_WORK_ITEM_SIZES, CL_DEVICE_NAME, CL_DEVICE_PLATFORM, CL_DEVICE_PROFILE,
    CL_DEVICE_TYPE, CL_DEVICE_VENDOR, CL_DEVICE_VERSION,
};
use oclkit_common::{raw, ClError};
use tracing::{debug, warn};

use crate::extensions::contains_extension;
use crate::kind::DeviceKind;
use crate::version::ApiVersion;

/// Platform revision that introduced explicit device reference counting.
const REFCOUNT_MIN_VERSION: ApiVersion = ApiVersion::new(1, 2);

/// Extension advertising double-precision arithmetic.
const FP64_EXTENSION: &str = "cl_khr_fp64";

/// Handle to one OpenCL device.
///
/// A bound handle owns exactly one logical reference to the native device;
/// an unbound handle (from [`Device::unbound`]) owns nothing and rejects
/// every capability query with [`ClError::UnboundDevice`].
///
/// The handle is not internally synchronized. Sharing one across threads
/// requires external serialization around [`Device::try_clone`] and drop,
/// matching the native API's guarantees.
#[derive(Debug)]
pub struct Device {
    id: ClDeviceId,
    kind: DeviceKind,
}

impl Device {
    /// Bind a handle to a raw device id, taking over the caller's logical
    /// reference.
    ///
    /// The device's classification is queried once here and never again;
    /// see [`Device::kind`]. Fails if the native type query fails.
    pub fn from_raw(id: ClDeviceId) -> Result<Self> {
        let bits = raw::device_info_u64(id, CL_DEVICE_TYPE)?;
        let kind = DeviceKind::from_bits(bits);
        debug!(%kind, "classified device");
        Ok(Self { id, kind })
    }

    /// An unbound handle: null id, [`DeviceKind::All`].
    pub fn unbound() -> Self {
        Self { id: ptr::null_mut(), kind: DeviceKind::All }
    }

    /// The raw device id, null when unbound.
    pub fn id(&self) -> ClDeviceId {
        self.id
    }

    /// Whether this handle refers to a device.
    pub fn is_bound(&self) -> bool {
        !self.id.is_null()
    }

    /// Overwrite the raw id without retaining and without reclassifying.
    ///
    /// The previous id is not released and [`Device::kind`] keeps the
    /// classification resolved at construction time, so it goes stale when
    /// the new id refers to a device of a different type. Callers own that
    /// consistency.
    pub fn set_raw(&mut self, id: ClDeviceId) {
        self.id = id;
    }

    /// Duplicate this handle.
    ///
    /// On platforms reporting OpenCL ≥ 1.2 the duplicate owns a fresh
    /// native reference (`clRetainDevice`); on older platforms it is a
    /// shallow alias. A failed retain or platform probe is returned as an
    /// error and no duplicate is produced.
    pub fn try_clone(&self) -> Result<Self> {
        if self.is_bound() && Self::refcounting_supported(self.id)? {
            raw::retain_device(self.id)?;
        }
        Ok(Self { id: self.id, kind: self.kind })
    }

    // ── Classification ───────────────────────────────────────────────────────

    /// Classification resolved at construction time.
    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    /// Whether this device was classified as a GPU.
    pub fn is_gpu(&self) -> bool {
        self.kind == DeviceKind::Gpu
    }

    /// Whether this device was classified as a CPU.
    pub fn is_cpu(&self) -> bool {
        self.kind == DeviceKind::Cpu
    }

    /// Whether this device was classified as an accelerator.
    pub fn is_accelerator(&self) -> bool {
        self.kind == DeviceKind::Accelerator
    }

    // ── Numeric capability queries ───────────────────────────────────────────

    /// Number of parallel compute units.
    pub fn max_compute_units(&self) -> Result<u32> {
        raw::device_info_u32(self.require_bound()?, CL_DEVICE_MAX_COMPUTE_UNITS)
    }

    /// Maximum number of work-item dimensions.
    pub fn max_work_item_dims(&self) -> Result<u32> {
        raw::device_info_u32(self.require_bound()?, CL_DEVICE_MAX_WORK_ITEM_DIMENSIONS)
    }

    /// Per-dimension work-item bounds.
    pub fn max_work_item_sizes(&self) -> Result<[usize; 3]> {
        raw::device_info_usize3(self.require_bound()?, CL_DEVICE_MAX_WORK_ITEM_SIZES)
    }

    /// Maximum work-items per work-group.
    pub fn max_work_group_size(&self) -> Result<usize> {
        raw::device_info_usize(self.require_bound()?, CL_DEVICE_MAX_WORK_GROUP_SIZE)
    }

    /// Maximum constant-buffer allocation in bytes.
    pub fn max_constant_buffer_size(&self) -> Result<u64> {
        raw::device_info_u64(self.require_bound()?, CL_DEVICE_MAX_CONSTANT_BUFFER_SIZE)
    }

    /// Maximum memory-object allocation in bytes.
    pub fn max_mem_alloc_size(&self) -> Result<u64> {
        raw::device_info_u64(self.require_bound()?, CL_DEVICE_MAX_MEM_ALLOC_SIZE)
    }

    /// Global memory size in bytes.
    pub fn global_mem_size(&self) -> Result<u64> {
        raw::device_info_u64(self.require_bound()?, CL_DEVICE_GLOBAL_MEM_SIZE)
    }

    /// Local memory size in bytes.
    pub fn local_mem_size(&self) -> Result<u64> {
        raw::device_info_u64(self.require_bound()?, CL_DEVICE_LOCAL_MEM_SIZE)
    }

    // ── String capability queries ────────────────────────────────────────────

    /// Human-readable device name.
    pub fn name(&self) -> Result<String> {
        raw::device_info_string(self.require_bound()?, CL_DEVICE_NAME)
    }

    /// Vendor string.
    pub fn vendor(&self) -> Result<String> {
        raw::device_info_string(self.require_bound()?, CL_DEVICE_VENDOR)
    }

    /// Version string, e.g. `"OpenCL 1.2 ..."`.
    pub fn version(&self) -> Result<String> {
        raw::device_info_string(self.require_bound()?, CL_DEVICE_VERSION)
    }

    /// Profile string.
    pub fn profile(&self) -> Result<String> {
        raw::device_info_string(self.require_bound()?, CL_DEVICE_PROFILE)
    }

    /// Space-delimited extension list.
    pub fn extensions(&self) -> Result<String> {
        raw::device_info_string(self.require_bound()?, CL_DEVICE_EXTENSIONS)
    }

    // ── Derived capabilities ─────────────────────────────────────────────────

    /// Whether the device reports at least the given API version.
    ///
    /// Unparsable version strings degrade to `0.0`, which compares as
    /// unsupported for any positive requested version.
    pub fn supports_version(&self, major: u32, minor: u32) -> Result<bool> {
        Ok(ApiVersion::parse(&self.version()?).at_least(major, minor))
    }

    /// Whether the device advertises the named extension (exact token
    /// match, no prefix matching).
    pub fn supports_extension(&self, name: &str) -> Result<bool> {
        Ok(contains_extension(&self.extensions()?, name))
    }

    /// Whether the device supports double-precision arithmetic.
    pub fn double_support(&self) -> Result<bool> {
        self.supports_extension(FP64_EXTENSION)
    }

    /// Whether the device supports images.
    pub fn image_support(&self) -> Result<bool> {
        raw::device_info_bool(self.require_bound()?, CL_DEVICE_IMAGE_SUPPORT)
    }

    /// The platform owning this device.
    ///
    /// A null answer from the native layer is reported as
    /// [`ClError::PlatformNotFound`]: a bound device without an owning
    /// platform is a logically impossible state, not a call failure.
    pub fn platform(&self) -> Result<ClPlatformId> {
        let id = self.require_bound()?;
        let platform = raw::device_info_platform(id, CL_DEVICE_PLATFORM)?;
        if platform.is_null() {
            return Err(ClError::PlatformNotFound);
        }
        Ok(platform)
    }

    /// Parsed version of the owning platform.
    pub fn platform_version(&self) -> Result<ApiVersion> {
        let platform = self.platform()?;
        Ok(ApiVersion::parse(&oclkit_query::platform_version(platform)?))
    }

    // ── Diagnostics ──────────────────────────────────────────────────────────

    /// Write the vendor and name of this device as two lines.
    pub fn write_summary(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "Vendor: {}", self.vendor()?)?;
        writeln!(out, "Name: {}", self.name()?)?;
        Ok(())
    }

    /// Print the device summary to stdout.
    pub fn print(&self) -> Result<()> {
        self.write_summary(&mut io::stdout())
    }

    // ── Internals ────────────────────────────────────────────────────────────

    fn require_bound(&self) -> Result<ClDeviceId> {
        if self.id.is_null() {
            return Err(ClError::UnboundDevice);
        }
        Ok(self.id)
    }

    /// Whether the platform owning `id` supports explicit device reference
    /// counting. Probed per call; the answer is a property of whatever
    /// runtime the process is linked against, not of this build.
    fn refcounting_supported(id: ClDeviceId) -> Result<bool> {
        let platform = raw::device_info_platform(id, CL_DEVICE_PLATFORM)?;
        if platform.is_null() {
            return Err(ClError::PlatformNotFound);
        }
        let version = oclkit_query::platform_version(platform)?;
        Ok(ApiVersion::parse(&version)
            .at_least(REFCOUNT_MIN_VERSION.major, REFCOUNT_MIN_VERSION.minor))
    }
}

impl Default for Device {
    fn default() -> Self {
        Self::unbound()
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        if self.id.is_null() {
            return;
        }
        // The platform probe needs the id, so it must run before the handle
        // is invalidated.
        match Self::refcounting_supported(self.id) {
            Ok(true) => {
                if let Err(err) = raw::release_device(self.id) {
                    warn!(%err, "device release failed");
                }
            }
            Ok(false) => {}
            Err(err) => warn!(%err, "skipping device release, platform probe failed"),
        }
        self.id = ptr::null_mut();
    }
}

impl PartialEq for Device {
    /// Two handles are the same device iff their ids are equal, regardless
    /// of how many logical references each holds.
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Device {}

impl PartialEq<ClDeviceId> for Device {
    fn eq(&self, other: &ClDeviceId) -> bool {
        self.id == *other
    }
}

impl PartialEq<DeviceKind> for Device {
    fn eq(&self, other: &DeviceKind) -> bool {
        self.kind == *other
    }
}
