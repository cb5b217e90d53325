//! OpenCL platform and device enumeration with diagnostics printing.
//!
//! This crate is the platform/query component: it discovers platform and
//! device ids, reads their string attributes, and renders human-readable
//! summaries. The device-handle core (`oclkit-device`) consumes it for the
//! owning platform's version string.
//!
//! All lookups go through the `oclkit-common` native seam, so everything
//! here works against the fake registry in test builds.

use std::io;

use oclkit_common::error::Result;
use oclkit_common::types::{
    ClDeviceId, ClDeviceType, ClPlatformId, ClPlatformInfo, CL_DEVICE_EXTENSIONS, CL_DEVICE_NAME,
    CL_DEVICE_PROFILE, CL_DEVICE_TYPE, CL_DEVICE_TYPE_ALL, CL_DEVICE_VENDOR, CL_DEVICE_VERSION,
    CL_PLATFORM_EXTENSIONS, CL_PLATFORM_NAME, CL_PLATFORM_PROFILE, CL_PLATFORM_VENDOR,
    CL_PLATFORM_VERSION,
};
use oclkit_common::{raw, ClError};
use tracing::debug;

// ── Enumeration ──────────────────────────────────────────────────────────────

/// All OpenCL platforms visible to this process.
///
/// Fails with [`ClError::NoPlatforms`] when the loader reports none.
pub fn platforms() -> Result<Vec<ClPlatformId>> {
    let ids = raw::platform_ids()?;
    if ids.is_empty() {
        return Err(ClError::NoPlatforms);
    }
    debug!(count = ids.len(), "enumerated OpenCL platforms");
    Ok(ids)
}

/// All devices of any type on the given platform.
pub fn devices(platform: ClPlatformId) -> Result<Vec<ClDeviceId>> {
    if platform.is_null() {
        return Err(ClError::InvalidPlatform);
    }
    let ids = raw::device_ids(platform, CL_DEVICE_TYPE_ALL)?;
    debug!(count = ids.len(), "enumerated devices on platform");
    Ok(ids)
}

/// Whether `platform` is one of the platforms visible to this process.
pub fn exists(platform: ClPlatformId) -> Result<bool> {
    if platform.is_null() {
        return Err(ClError::InvalidPlatform);
    }
    Ok(platforms()?.contains(&platform))
}

// ── Platform attributes ──────────────────────────────────────────────────────

fn platform_info(platform: ClPlatformId, key: ClPlatformInfo) -> Result<String> {
    if platform.is_null() {
        return Err(ClError::InvalidPlatform);
    }
    raw::platform_info_string(platform, key)
}

/// Profile string of a platform.
pub fn platform_profile(platform: ClPlatformId) -> Result<String> {
    platform_info(platform, CL_PLATFORM_PROFILE)
}

/// Version string of a platform, e.g. `"OpenCL 1.2 ..."`.
pub fn platform_version(platform: ClPlatformId) -> Result<String> {
    platform_info(platform, CL_PLATFORM_VERSION)
}

/// Name of a platform.
pub fn platform_name(platform: ClPlatformId) -> Result<String> {
    platform_info(platform, CL_PLATFORM_NAME)
}

/// Vendor of a platform.
pub fn platform_vendor(platform: ClPlatformId) -> Result<String> {
    platform_info(platform, CL_PLATFORM_VENDOR)
}

/// Space-delimited extension list of a platform.
pub fn platform_extensions(platform: ClPlatformId) -> Result<String> {
    platform_info(platform, CL_PLATFORM_EXTENSIONS)
}

// ── Device attributes (for diagnostics) ──────────────────────────────────────

/// Profile string of a device.
pub fn device_profile(device: ClDeviceId) -> Result<String> {
    raw::device_info_string(device, CL_DEVICE_PROFILE)
}

/// Version string of a device.
pub fn device_version(device: ClDeviceId) -> Result<String> {
    raw::device_info_string(device, CL_DEVICE_VERSION)
}

/// Name of a device.
pub fn device_name(device: ClDeviceId) -> Result<String> {
    raw::device_info_string(device, CL_DEVICE_NAME)
}

/// Vendor of a device.
pub fn device_vendor(device: ClDeviceId) -> Result<String> {
    raw::device_info_string(device, CL_DEVICE_VENDOR)
}

/// Space-delimited extension list of a device.
pub fn device_extensions(device: ClDeviceId) -> Result<String> {
    raw::device_info_string(device, CL_DEVICE_EXTENSIONS)
}

/// Raw device-type bitfield of a device.
pub fn device_type(device: ClDeviceId) -> Result<ClDeviceType> {
    raw::device_info_u64(device, CL_DEVICE_TYPE)
}

// ── Diagnostics printing ─────────────────────────────────────────────────────

/// Field selection for [`format_platform`] / [`format_device`] and the
/// `print_*` helpers.
#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
    pub devices: bool,
    pub profile: bool,
    pub version: bool,
    pub name: bool,
    pub vendor: bool,
    pub extensions: bool,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            devices: true,
            profile: true,
            version: true,
            name: true,
            vendor: true,
            extensions: false,
        }
    }
}

/// Render the selected attributes of one platform.
pub fn format_platform(platform: ClPlatformId, opts: &PrintOptions) -> Result<String> {
    let mut lines = Vec::new();
    if opts.profile {
        lines.push(format!("Platform Profile    : {}", platform_profile(platform)?));
    }
    if opts.vendor {
        lines.push(format!("Platform Vendor     : {}", platform_vendor(platform)?));
    }
    if opts.name {
        lines.push(format!("Platform Name       : {}", platform_name(platform)?));
    }
    if opts.version {
        lines.push(format!("Platform Version    : {}", platform_version(platform)?));
    }
    if opts.extensions {
        lines.push(format!("Platform Extensions : {}", platform_extensions(platform)?));
    }
    Ok(lines.join("\n"))
}

/// Render the selected attributes of one device.
pub fn format_device(device: ClDeviceId, opts: &PrintOptions) -> Result<String> {
    let mut lines = Vec::new();
    if opts.profile {
        lines.push(format!("Device Profile    : {}", device_profile(device)?));
    }
    if opts.vendor {
        lines.push(format!("Device Vendor     : {}", device_vendor(device)?));
    }
    if opts.name {
        lines.push(format!("Device Name       : {}", device_name(device)?));
    }
    if opts.version {
        lines.push(format!("Device Version    : {}", device_version(device)?));
    }
    if opts.extensions {
        lines.push(format!("Device Extensions : {}", device_extensions(device)?));
    }
    Ok(lines.join("\n"))
}

/// Print one platform, and its devices when `opts.devices` is set.
pub fn print_platform(
    platform: ClPlatformId,
    opts: &PrintOptions,
    out: &mut dyn io::Write,
) -> Result<()> {
    if platform.is_null() {
        return Err(ClError::InvalidPlatform);
    }
    writeln!(out, "{}", format_platform(platform, opts)?)?;
    if opts.devices {
        writeln!(out, "Devices :")?;
        print_devices(platform, opts, out)?;
    }
    Ok(())
}

/// Print every platform visible to this process.
pub fn print_platforms(opts: &PrintOptions, out: &mut dyn io::Write) -> Result<()> {
    for (index, platform) in platforms()?.into_iter().enumerate() {
        writeln!(out, "Platform {index}")?;
        print_platform(platform, opts, out)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Print every device on one platform.
pub fn print_devices(
    platform: ClPlatformId,
    opts: &PrintOptions,
    out: &mut dyn io::Write,
) -> Result<()> {
    for (index, device) in devices(platform)?.into_iter().enumerate() {
        writeln!(out, "Device {index}")?;
        writeln!(out, "{}", format_device(device, opts)?)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Print one device.
pub fn print_device(
    device: ClDeviceId,
    opts: &PrintOptions,
    out: &mut dyn io::Write,
) -> Result<()> {
    writeln!(out, "{}", format_device(device, opts)?)?;
    Ok(())
}
