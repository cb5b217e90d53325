//! OpenCL ABI type aliases and the subset of info keys this workspace uses.
//!
//! Values are the OpenCL ABI values, so the `native` backend can hand them
//! straight to `cl-sys` without translation.

use std::os::raw::c_void;

/// Opaque handle to an OpenCL platform.
pub type ClPlatformId = *mut c_void;

/// Opaque handle to an OpenCL device.
pub type ClDeviceId = *mut c_void;

/// Device-type bitfield (`cl_device_type`).
pub type ClDeviceType = u64;

/// Device info key (`cl_device_info`).
pub type ClDeviceInfo = u32;

/// Platform info key (`cl_platform_info`).
pub type ClPlatformInfo = u32;

/// Native boolean (`cl_bool`); nonzero means true.
pub type ClBool = u32;

// ── Device type flags ────────────────────────────────────────────────────────

pub const CL_DEVICE_TYPE_DEFAULT: ClDeviceType = 1 << 0;
pub const CL_DEVICE_TYPE_CPU: ClDeviceType = 1 << 1;
pub const CL_DEVICE_TYPE_GPU: ClDeviceType = 1 << 2;
pub const CL_DEVICE_TYPE_ACCELERATOR: ClDeviceType = 1 << 3;
pub const CL_DEVICE_TYPE_ALL: ClDeviceType = 0xFFFF_FFFF;

// ── Device info keys ─────────────────────────────────────────────────────────

pub const CL_DEVICE_TYPE: ClDeviceInfo = 0x1000;
pub const CL_DEVICE_MAX_COMPUTE_UNITS: ClDeviceInfo = 0x1002;
pub const CL_DEVICE_MAX_WORK_ITEM_DIMENSIONS: ClDeviceInfo = 0x1003;
pub const CL_DEVICE_MAX_WORK_GROUP_SIZE: ClDeviceInfo = 0x1004;
pub const CL_DEVICE_MAX_WORK_ITEM_SIZES: ClDeviceInfo = 0x1005;
pub const CL_DEVICE_MAX_MEM_ALLOC_SIZE: ClDeviceInfo = 0x1010;
pub const CL_DEVICE_IMAGE_SUPPORT: ClDeviceInfo = 0x1016;
pub const CL_DEVICE_MAX_CONSTANT_BUFFER_SIZE: ClDeviceInfo = 0x1020;
pub const CL_DEVICE_GLOBAL_MEM_SIZE: ClDeviceInfo = 0x101F;
pub const CL_DEVICE_LOCAL_MEM_SIZE: ClDeviceInfo = 0x1023;
pub const CL_DEVICE_NAME: ClDeviceInfo = 0x102B;
pub const CL_DEVICE_VENDOR: ClDeviceInfo = 0x102C;
pub const CL_DEVICE_PROFILE: ClDeviceInfo = 0x102E;
pub const CL_DEVICE_VERSION: ClDeviceInfo = 0x102F;
pub const CL_DEVICE_EXTENSIONS: ClDeviceInfo = 0x1030;
pub const CL_DEVICE_PLATFORM: ClDeviceInfo = 0x1031;

// ── Platform info keys ───────────────────────────────────────────────────────

pub const CL_PLATFORM_PROFILE: ClPlatformInfo = 0x0900;
pub const CL_PLATFORM_VERSION: ClPlatformInfo = 0x0901;
pub const CL_PLATFORM_NAME: ClPlatformInfo = 0x0902;
pub const CL_PLATFORM_VENDOR: ClPlatformInfo = 0x0903;
pub const CL_PLATFORM_EXTENSIONS: ClPlatformInfo = 0x0904;
