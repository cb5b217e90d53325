//! Real ICD-loader backend over `cl-sys`.
//!
//! Each wrapper returns the raw [`Status`]; translation to [`crate::ClError`]
//! happens in the callers through [`crate::status::check`].

use std::ptr;

use crate::status::Status;
use crate::types::{ClDeviceId, ClDeviceInfo, ClDeviceType, ClPlatformId, ClPlatformInfo};

pub(crate) fn get_platform_ids(buf: Option<&mut [ClPlatformId]>, count_out: &mut u32) -> Status {
    let (num_entries, ptr) = match buf {
        Some(b) => (b.len() as u32, b.as_mut_ptr()),
        None => (0, ptr::null_mut()),
    };
    let status = unsafe {
        cl_sys::clGetPlatformIDs(num_entries, ptr as *mut cl_sys::cl_platform_id, count_out)
    };
    Status(status)
}

pub(crate) fn get_device_ids(
    platform: ClPlatformId,
    device_type: ClDeviceType,
    buf: Option<&mut [ClDeviceId]>,
    count_out: &mut u32,
) -> Status {
    let (num_entries, ptr) = match buf {
        Some(b) => (b.len() as u32, b.as_mut_ptr()),
        None => (0, ptr::null_mut()),
    };
    let status = unsafe {
        cl_sys::clGetDeviceIDs(
            platform as cl_sys::cl_platform_id,
            device_type,
            num_entries,
            ptr as *mut cl_sys::cl_device_id,
            count_out,
        )
    };
    Status(status)
}

pub(crate) fn get_device_info(
    id: ClDeviceId,
    key: ClDeviceInfo,
    buf: Option<&mut [u8]>,
    size_out: &mut usize,
) -> Status {
    let (size, ptr) = match buf {
        Some(b) => (b.len(), b.as_mut_ptr().cast()),
        None => (0, ptr::null_mut()),
    };
    let status = unsafe {
        cl_sys::clGetDeviceInfo(id as cl_sys::cl_device_id, key, size, ptr, size_out)
    };
    Status(status)
}

pub(crate) fn get_platform_info(
    id: ClPlatformId,
    key: ClPlatformInfo,
    buf: Option<&mut [u8]>,
    size_out: &mut usize,
) -> Status {
    let (size, ptr) = match buf {
        Some(b) => (b.len(), b.as_mut_ptr().cast()),
        None => (0, ptr::null_mut()),
    };
    let status = unsafe {
        cl_sys::clGetPlatformInfo(id as cl_sys::cl_platform_id, key, size, ptr, size_out)
    };
    Status(status)
}

pub(crate) fn retain_device(id: ClDeviceId) -> Status {
    Status(unsafe { cl_sys::clRetainDevice(id as cl_sys::cl_device_id) })
}

pub(crate) fn release_device(id: ClDeviceId) -> Status {
    Status(unsafe { cl_sys::clReleaseDevice(id as cl_sys::cl_device_id) })
}
