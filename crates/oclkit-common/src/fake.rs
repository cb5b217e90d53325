//! In-process fake OpenCL registry.
//!
//! When the `native` feature is off this module backs the [`crate::raw`]
//! seam, so every crate in the workspace can exercise enumeration, info
//! queries, and retain/release bookkeeping without an ICD loader.
//!
//! Fixtures are installed per test via [`install_platform`] /
//! [`install_device`] and torn down with [`reset`]. The registry is a
//! process-global, so tests that touch it run under `#[serial]`.
//!
//! Reference-count semantics mirror the native rules: every installed
//! device starts with one logical reference, retain/release move the count,
//! and a device whose count reached zero answers every further call with
//! `CL_INVALID_DEVICE`.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use crate::status::Status;
use crate::types::{
    ClDeviceId, ClDeviceInfo, ClDeviceType, ClPlatformId, ClPlatformInfo, CL_DEVICE_EXTENSIONS,
    CL_DEVICE_GLOBAL_MEM_SIZE, CL_DEVICE_IMAGE_SUPPORT, CL_DEVICE_LOCAL_MEM_SIZE,
    CL_DEVICE_MAX_COMPUTE_UNITS, CL_DEVICE_MAX_CONSTANT_BUFFER_SIZE, CL_DEVICE_MAX_MEM_ALLOC_SIZE,
    CL_DEVICE_MAX_WORK_GROUP_SIZE, CL_DEVICE_MAX_WORK_ITEM_DIMENSIONS,
    CL_DEVICE_MAX_WORK_ITEM_SIZES, CL_DEVICE_NAME, CL_DEVICE_PLATFORM, CL_DEVICE_PROFILE,
    CL_DEVICE_TYPE, CL_DEVICE_TYPE_ACCELERATOR, CL_DEVICE_TYPE_ALL, CL_DEVICE_TYPE_CPU,
    CL_DEVICE_TYPE_GPU, CL_DEVICE_VENDOR, CL_DEVICE_VERSION, CL_PLATFORM_EXTENSIONS,
    CL_PLATFORM_NAME, CL_PLATFORM_PROFILE, CL_PLATFORM_VENDOR, CL_PLATFORM_VERSION,
};

const CL_DEVICE_NOT_FOUND: Status = Status(-1);
const CL_INVALID_VALUE: Status = Status(-30);
const CL_INVALID_PLATFORM: Status = Status(-32);
const CL_INVALID_DEVICE: Status = Status(-33);

// ── Fixture descriptions ─────────────────────────────────────────────────────

/// Description of a fake platform.
#[derive(Debug, Clone)]
pub struct FakePlatform {
    pub profile: String,
    pub version: String,
    pub name: String,
    pub vendor: String,
    pub extensions: String,
}

impl FakePlatform {
    /// A platform reporting the given version string.
    pub fn with_version(version: &str) -> Self {
        Self {
            profile: "FULL_PROFILE".into(),
            version: version.into(),
            name: "Fake OpenCL Platform".into(),
            vendor: "oclkit".into(),
            extensions: String::new(),
        }
    }
}

impl Default for FakePlatform {
    fn default() -> Self {
        Self::with_version("OpenCL 1.2 oclkit-fake")
    }
}

/// Description of a fake device.
#[derive(Debug, Clone)]
pub struct FakeDevice {
    pub device_type: ClDeviceType,
    pub name: String,
    pub vendor: String,
    pub version: String,
    pub profile: String,
    pub extensions: String,
    pub compute_units: u32,
    pub work_item_dims: u32,
    pub work_item_sizes: [usize; 3],
    pub work_group_size: usize,
    pub constant_buffer_size: u64,
    pub mem_alloc_size: u64,
    pub global_mem_size: u64,
    pub local_mem_size: u64,
    pub image_support: bool,
}

impl FakeDevice {
    /// A mid-range fake GPU.
    pub fn gpu() -> Self {
        Self {
            device_type: CL_DEVICE_TYPE_GPU,
            name: "Fake GPU".into(),
            vendor: "oclkit".into(),
            version: "OpenCL 1.2 oclkit-fake".into(),
            profile: "FULL_PROFILE".into(),
            extensions: "cl_khr_global_int32_base_atomics cl_khr_fp64".into(),
            compute_units: 32,
            work_item_dims: 3,
            work_item_sizes: [1024, 1024, 64],
            work_group_size: 1024,
            constant_buffer_size: 64 * 1024,
            mem_alloc_size: 2 * 1024 * 1024 * 1024,
            global_mem_size: 8 * 1024 * 1024 * 1024,
            local_mem_size: 64 * 1024,
            image_support: true,
        }
    }

    /// A fake CPU device.
    pub fn cpu() -> Self {
        Self {
            device_type: CL_DEVICE_TYPE_CPU,
            name: "Fake CPU".into(),
            image_support: false,
            ..Self::gpu()
        }
    }

    /// A fake accelerator device.
    pub fn accelerator() -> Self {
        Self {
            device_type: CL_DEVICE_TYPE_ACCELERATOR,
            name: "Fake Accelerator".into(),
            ..Self::gpu()
        }
    }
}

// ── Registry ─────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct PlatformState {
    desc: FakePlatform,
}

#[derive(Debug)]
struct DeviceState {
    desc: FakeDevice,
    platform: Option<usize>,
    refs: u32,
}

#[derive(Debug, Default)]
struct Registry {
    next_id: usize,
    platforms: BTreeMap<usize, PlatformState>,
    devices: BTreeMap<usize, DeviceState>,
    calls: usize,
}

impl Registry {
    fn alloc(&mut self) -> usize {
        self.next_id += 1;
        self.next_id
    }
}

fn registry() -> &'static Mutex<Registry> {
    static REGISTRY: OnceLock<Mutex<Registry>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(Registry::default()))
}

fn lock() -> MutexGuard<'static, Registry> {
    registry().lock().unwrap_or_else(PoisonError::into_inner)
}

// ── Fixture API ──────────────────────────────────────────────────────────────

/// Clear every installed platform and device and the call counter.
pub fn reset() {
    *lock() = Registry::default();
}

/// Install a platform and return its id.
pub fn install_platform(desc: FakePlatform) -> ClPlatformId {
    let mut reg = lock();
    let id = reg.alloc();
    reg.platforms.insert(id, PlatformState { desc });
    id as ClPlatformId
}

/// Install a device under `platform` and return its id. The device starts
/// with one logical reference.
pub fn install_device(platform: ClPlatformId, desc: FakeDevice) -> ClDeviceId {
    let mut reg = lock();
    let id = reg.alloc();
    reg.devices.insert(id, DeviceState { desc, platform: Some(platform as usize), refs: 1 });
    id as ClDeviceId
}

/// Install a device that reports a null owning platform.
///
/// Only useful for exercising the "bound device without a platform" error
/// path; no conformant implementation produces this state.
pub fn install_orphan_device(desc: FakeDevice) -> ClDeviceId {
    let mut reg = lock();
    let id = reg.alloc();
    reg.devices.insert(id, DeviceState { desc, platform: None, refs: 1 });
    id as ClDeviceId
}

/// Current logical reference count of a device, or `None` if unknown.
pub fn refcount(device: ClDeviceId) -> Option<u32> {
    lock().devices.get(&(device as usize)).map(|d| d.refs)
}

/// Number of native calls the registry has answered since the last
/// [`reset`]. Lets tests assert that a code path performed no native call.
pub fn native_call_count() -> usize {
    lock().calls
}

// ── Backend entry points (the raw seam) ──────────────────────────────────────

pub(crate) fn get_platform_ids(buf: Option<&mut [ClPlatformId]>, count_out: &mut u32) -> Status {
    let mut reg = lock();
    reg.calls += 1;
    let ids: Vec<usize> = reg.platforms.keys().copied().collect();
    *count_out = ids.len() as u32;
    if let Some(buf) = buf {
        for (slot, id) in buf.iter_mut().zip(&ids) {
            *slot = *id as ClPlatformId;
        }
    }
    Status::SUCCESS
}

pub(crate) fn get_device_ids(
    platform: ClPlatformId,
    device_type: ClDeviceType,
    buf: Option<&mut [ClDeviceId]>,
    count_out: &mut u32,
) -> Status {
    let mut reg = lock();
    reg.calls += 1;
    let pid = platform as usize;
    if !reg.platforms.contains_key(&pid) {
        return CL_INVALID_PLATFORM;
    }
    let ids: Vec<usize> = reg
        .devices
        .iter()
        .filter(|(_, d)| d.platform == Some(pid))
        .filter(|(_, d)| device_type == CL_DEVICE_TYPE_ALL || d.desc.device_type & device_type != 0)
        .map(|(id, _)| *id)
        .collect();
    if ids.is_empty() {
        *count_out = 0;
        return CL_DEVICE_NOT_FOUND;
    }
    *count_out = ids.len() as u32;
    if let Some(buf) = buf {
        for (slot, id) in buf.iter_mut().zip(&ids) {
            *slot = *id as ClDeviceId;
        }
    }
    Status::SUCCESS
}

pub(crate) fn get_device_info(
    id: ClDeviceId,
    key: ClDeviceInfo,
    buf: Option<&mut [u8]>,
    size_out: &mut usize,
) -> Status {
    let mut reg = lock();
    reg.calls += 1;
    let state = match reg.devices.get(&(id as usize)) {
        Some(state) if state.refs > 0 => state,
        _ => return CL_INVALID_DEVICE,
    };
    let bytes = match device_value_bytes(state, key) {
        Some(bytes) => bytes,
        None => return CL_INVALID_VALUE,
    };
    write_value(&bytes, buf, size_out)
}

pub(crate) fn get_platform_info(
    id: ClPlatformId,
    key: ClPlatformInfo,
    buf: Option<&mut [u8]>,
    size_out: &mut usize,
) -> Status {
    let mut reg = lock();
    reg.calls += 1;
    let state = match reg.platforms.get(&(id as usize)) {
        Some(state) => state,
        None => return CL_INVALID_PLATFORM,
    };
    let text = match key {
        CL_PLATFORM_PROFILE => &state.desc.profile,
        CL_PLATFORM_VERSION => &state.desc.version,
        CL_PLATFORM_NAME => &state.desc.name,
        CL_PLATFORM_VENDOR => &state.desc.vendor,
        CL_PLATFORM_EXTENSIONS => &state.desc.extensions,
        _ => return CL_INVALID_VALUE,
    };
    write_value(&string_bytes(text), buf, size_out)
}

pub(crate) fn retain_device(id: ClDeviceId) -> Status {
    let mut reg = lock();
    reg.calls += 1;
    match reg.devices.get_mut(&(id as usize)) {
        Some(state) if state.refs > 0 => {
            state.refs += 1;
            Status::SUCCESS
        }
        _ => CL_INVALID_DEVICE,
    }
}

pub(crate) fn release_device(id: ClDeviceId) -> Status {
    let mut reg = lock();
    reg.calls += 1;
    match reg.devices.get_mut(&(id as usize)) {
        Some(state) if state.refs > 0 => {
            state.refs -= 1;
            Status::SUCCESS
        }
        _ => CL_INVALID_DEVICE,
    }
}

// ── Value encoding ───────────────────────────────────────────────────────────

fn device_value_bytes(state: &DeviceState, key: ClDeviceInfo) -> Option<Vec<u8>> {
    let d = &state.desc;
    let bytes = match key {
        CL_DEVICE_TYPE => d.device_type.to_ne_bytes().to_vec(),
        CL_DEVICE_MAX_COMPUTE_UNITS => d.compute_units.to_ne_bytes().to_vec(),
        CL_DEVICE_MAX_WORK_ITEM_DIMENSIONS => d.work_item_dims.to_ne_bytes().to_vec(),
        CL_DEVICE_MAX_WORK_ITEM_SIZES => {
            let mut out = Vec::with_capacity(3 * std::mem::size_of::<usize>());
            for dim in d.work_item_sizes {
                out.extend_from_slice(&dim.to_ne_bytes());
            }
            out
        }
        CL_DEVICE_MAX_WORK_GROUP_SIZE => d.work_group_size.to_ne_bytes().to_vec(),
        CL_DEVICE_MAX_CONSTANT_BUFFER_SIZE => d.constant_buffer_size.to_ne_bytes().to_vec(),
        CL_DEVICE_MAX_MEM_ALLOC_SIZE => d.mem_alloc_size.to_ne_bytes().to_vec(),
        CL_DEVICE_GLOBAL_MEM_SIZE => d.global_mem_size.to_ne_bytes().to_vec(),
        CL_DEVICE_LOCAL_MEM_SIZE => d.local_mem_size.to_ne_bytes().to_vec(),
        CL_DEVICE_IMAGE_SUPPORT => u32::from(d.image_support).to_ne_bytes().to_vec(),
        CL_DEVICE_PLATFORM => state.platform.unwrap_or(0).to_ne_bytes().to_vec(),
        CL_DEVICE_NAME => string_bytes(&d.name),
        CL_DEVICE_VENDOR => string_bytes(&d.vendor),
        CL_DEVICE_VERSION => string_bytes(&d.version),
        CL_DEVICE_PROFILE => string_bytes(&d.profile),
        CL_DEVICE_EXTENSIONS => string_bytes(&d.extensions),
        _ => return None,
    };
    Some(bytes)
}

// String sizes include the trailing NUL, as the native API reports them.
fn string_bytes(text: &str) -> Vec<u8> {
    let mut bytes = text.as_bytes().to_vec();
    bytes.push(0);
    bytes
}

fn write_value(bytes: &[u8], buf: Option<&mut [u8]>, size_out: &mut usize) -> Status {
    *size_out = bytes.len();
    if let Some(buf) = buf {
        if buf.len() < bytes.len() {
            return CL_INVALID_VALUE;
        }
        buf[..bytes.len()].copy_from_slice(bytes);
    }
    Status::SUCCESS
}
