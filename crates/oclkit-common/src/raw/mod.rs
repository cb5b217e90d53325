//! The native-API seam.
//!
//! Two compiled backends sit behind one surface: with the `native` feature
//! the calls go to the real ICD loader through `cl-sys`; without it the
//! in-process [`crate::fake`] registry answers them. Either way every call
//! funnels its status code through [`check`], and every string read uses
//! the two-call size-then-fill protocol; no string is ever fetched into a
//! guessed fixed-size buffer.

use std::mem::size_of;
use std::ptr;

use crate::error::Result;
use crate::status::{check, Status};
use crate::types::{ClDeviceId, ClDeviceInfo, ClDeviceType, ClPlatformId, ClPlatformInfo};

#[cfg(feature = "native")]
mod native;
#[cfg(feature = "native")]
use native as backend;

#[cfg(not(feature = "native"))]
use crate::fake as backend;

const CL_DEVICE_NOT_FOUND: Status = Status(-1);

// ── Lifetime calls ───────────────────────────────────────────────────────────

/// Add one reference to a device (`clRetainDevice`, OpenCL ≥ 1.2).
pub fn retain_device(id: ClDeviceId) -> Result<()> {
    check("clRetainDevice", backend::retain_device(id))
}

/// Drop one reference from a device (`clReleaseDevice`, OpenCL ≥ 1.2).
pub fn release_device(id: ClDeviceId) -> Result<()> {
    check("clReleaseDevice", backend::release_device(id))
}

// ── Enumeration ──────────────────────────────────────────────────────────────

/// All platform ids known to the ICD loader (count-then-fill).
pub fn platform_ids() -> Result<Vec<ClPlatformId>> {
    let mut count = 0u32;
    check("clGetPlatformIDs", backend::get_platform_ids(None, &mut count))?;
    if count == 0 {
        return Ok(Vec::new());
    }
    let mut ids: Vec<ClPlatformId> = vec![ptr::null_mut(); count as usize];
    check("clGetPlatformIDs", backend::get_platform_ids(Some(&mut ids), &mut count))?;
    ids.truncate(count as usize);
    Ok(ids)
}

/// Device ids of the given type on a platform (count-then-fill).
///
/// A `CL_DEVICE_NOT_FOUND` answer is not an error here; it simply means the
/// platform carries no device of that type.
pub fn device_ids(platform: ClPlatformId, device_type: ClDeviceType) -> Result<Vec<ClDeviceId>> {
    let mut count = 0u32;
    let status = backend::get_device_ids(platform, device_type, None, &mut count);
    if status == CL_DEVICE_NOT_FOUND {
        return Ok(Vec::new());
    }
    check("clGetDeviceIDs", status)?;
    if count == 0 {
        return Ok(Vec::new());
    }
    let mut ids: Vec<ClDeviceId> = vec![ptr::null_mut(); count as usize];
    check(
        "clGetDeviceIDs",
        backend::get_device_ids(platform, device_type, Some(&mut ids), &mut count),
    )?;
    ids.truncate(count as usize);
    Ok(ids)
}

// ── Fixed-width device reads ─────────────────────────────────────────────────
//
// One native query each, into a caller-allocated buffer of the exact native
// integer width.

pub fn device_info_u32(id: ClDeviceId, key: ClDeviceInfo) -> Result<u32> {
    let mut buf = [0u8; size_of::<u32>()];
    device_info_exact(id, key, &mut buf)?;
    Ok(u32::from_ne_bytes(buf))
}

pub fn device_info_u64(id: ClDeviceId, key: ClDeviceInfo) -> Result<u64> {
    let mut buf = [0u8; size_of::<u64>()];
    device_info_exact(id, key, &mut buf)?;
    Ok(u64::from_ne_bytes(buf))
}

pub fn device_info_usize(id: ClDeviceId, key: ClDeviceInfo) -> Result<usize> {
    let mut buf = [0u8; size_of::<usize>()];
    device_info_exact(id, key, &mut buf)?;
    Ok(usize::from_ne_bytes(buf))
}

/// Read a `cl_bool`; any nonzero value is `true`.
pub fn device_info_bool(id: ClDeviceId, key: ClDeviceInfo) -> Result<bool> {
    Ok(device_info_u32(id, key)? != 0)
}

/// Read the three per-dimension work-item bounds in one query.
pub fn device_info_usize3(id: ClDeviceId, key: ClDeviceInfo) -> Result<[usize; 3]> {
    let mut buf = [0u8; 3 * size_of::<usize>()];
    device_info_exact(id, key, &mut buf)?;
    let mut out = [0usize; 3];
    for (i, chunk) in buf.chunks_exact(size_of::<usize>()).enumerate() {
        let mut word = [0u8; size_of::<usize>()];
        word.copy_from_slice(chunk);
        out[i] = usize::from_ne_bytes(word);
    }
    Ok(out)
}

/// Read the owning platform id (pointer-width).
pub fn device_info_platform(id: ClDeviceId, key: ClDeviceInfo) -> Result<ClPlatformId> {
    Ok(device_info_usize(id, key)? as ClPlatformId)
}

fn device_info_exact(id: ClDeviceId, key: ClDeviceInfo, buf: &mut [u8]) -> Result<()> {
    let mut size = 0usize;
    check("clGetDeviceInfo", backend::get_device_info(id, key, Some(buf), &mut size))
}

// ── String reads ─────────────────────────────────────────────────────────────

/// Read a string-valued device attribute via the two-call protocol: first a
/// null-buffer query for the required length, then a fill of exactly that
/// length. Trailing NULs are stripped.
pub fn device_info_string(id: ClDeviceId, key: ClDeviceInfo) -> Result<String> {
    let mut size = 0usize;
    check("clGetDeviceInfo", backend::get_device_info(id, key, None, &mut size))?;
    if size == 0 {
        return Ok(String::new());
    }
    let mut buf = vec![0u8; size];
    check("clGetDeviceInfo", backend::get_device_info(id, key, Some(&mut buf), &mut size))?;
    Ok(bytes_to_string(buf))
}

/// Read a string-valued platform attribute (same two-call protocol).
pub fn platform_info_string(id: ClPlatformId, key: ClPlatformInfo) -> Result<String> {
    let mut size = 0usize;
    check("clGetPlatformInfo", backend::get_platform_info(id, key, None, &mut size))?;
    if size == 0 {
        return Ok(String::new());
    }
    let mut buf = vec![0u8; size];
    check("clGetPlatformInfo", backend::get_platform_info(id, key, Some(&mut buf), &mut size))?;
    Ok(bytes_to_string(buf))
}

fn bytes_to_string(mut buf: Vec<u8>) -> String {
    while buf.last() == Some(&0) {
        buf.pop();
    }
    String::from_utf8_lossy(&buf).into_owned()
}
