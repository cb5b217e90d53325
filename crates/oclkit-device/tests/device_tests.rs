#![cfg(not(feature = "native"))]
//! Lifecycle, classification, and capability tests for [`Device`].
//!
//! Everything runs against the fake registry in `oclkit-common`, so the
//! retain/release bookkeeping is observable without real hardware. Tests
//! mutate the process-global registry and therefore run under `#[serial]`.

use oclkit_common::fake::{self, FakeDevice, FakePlatform};
use oclkit_common::types::ClPlatformId;
use oclkit_common::ClError;
use oclkit_device::{ApiVersion, Device, DeviceKind};
use serial_test::serial;

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Platform new enough for explicit device reference counting.
fn platform_v12() -> ClPlatformId {
    fake::install_platform(FakePlatform::with_version("OpenCL 1.2 oclkit-fake"))
}

/// Platform from before explicit device reference counting.
fn platform_v11() -> ClPlatformId {
    fake::install_platform(FakePlatform::with_version("OpenCL 1.1 oclkit-fake"))
}

// ── Construction & classification ────────────────────────────────────────────

#[test]
#[serial]
fn gpu_bits_classify_as_gpu() {
    fake::reset();
    let id = fake::install_device(platform_v12(), FakeDevice::gpu());
    let device = Device::from_raw(id).unwrap();
    assert!(device.is_gpu());
    assert!(!device.is_cpu());
    assert!(!device.is_accelerator());
    assert_eq!(device.kind(), DeviceKind::Gpu);
    assert_eq!(device, DeviceKind::Gpu);
}

#[test]
#[serial]
fn cpu_and_accelerator_classification() {
    fake::reset();
    let platform = platform_v11();
    let cpu = Device::from_raw(fake::install_device(platform, FakeDevice::cpu())).unwrap();
    let acc = Device::from_raw(fake::install_device(platform, FakeDevice::accelerator())).unwrap();
    assert!(cpu.is_cpu());
    assert!(acc.is_accelerator());
    assert_ne!(cpu, acc);
}

#[test]
#[serial]
fn from_raw_fails_on_unknown_id() {
    fake::reset();
    let bogus = 0x5150_usize as oclkit_common::types::ClDeviceId;
    let err = Device::from_raw(bogus).unwrap_err();
    assert!(matches!(err, ClError::Api { .. }));
}

// ── Equality ─────────────────────────────────────────────────────────────────

#[test]
#[serial]
fn equality_is_identifier_based() {
    fake::reset();
    // Pre-1.2 platform so two handles over one id do not double-release.
    let id = fake::install_device(platform_v11(), FakeDevice::gpu());
    let first = Device::from_raw(id).unwrap();
    let second = Device::from_raw(id).unwrap();

    assert_eq!(first, first, "reflexive");
    assert_eq!(first, second);
    assert_eq!(second, first, "symmetric");
    assert_eq!(first, id);
}

#[test]
#[serial]
fn equality_ignores_category_snapshots() {
    fake::reset();
    let id = fake::install_device(platform_v11(), FakeDevice::gpu());
    let classified = Device::from_raw(id).unwrap();

    // A handle pointed at the same id without reclassification still
    // compares equal; identity is the id alone.
    let mut aliased = Device::unbound();
    aliased.set_raw(id);
    assert_eq!(classified, aliased);
    assert_eq!(classified.kind(), DeviceKind::Gpu);
    assert_eq!(aliased.kind(), DeviceKind::All);
}

// ── Unbound-handle preconditions ─────────────────────────────────────────────

#[test]
#[serial]
fn unbound_queries_fail_without_native_calls() {
    fake::reset();
    let device = Device::unbound();

    assert!(matches!(device.max_compute_units(), Err(ClError::UnboundDevice)));
    assert!(matches!(device.max_work_item_dims(), Err(ClError::UnboundDevice)));
    assert!(matches!(device.max_work_item_sizes(), Err(ClError::UnboundDevice)));
    assert!(matches!(device.max_work_group_size(), Err(ClError::UnboundDevice)));
    assert!(matches!(device.max_constant_buffer_size(), Err(ClError::UnboundDevice)));
    assert!(matches!(device.max_mem_alloc_size(), Err(ClError::UnboundDevice)));
    assert!(matches!(device.global_mem_size(), Err(ClError::UnboundDevice)));
    assert!(matches!(device.local_mem_size(), Err(ClError::UnboundDevice)));
    assert!(matches!(device.name(), Err(ClError::UnboundDevice)));
    assert!(matches!(device.vendor(), Err(ClError::UnboundDevice)));
    assert!(matches!(device.version(), Err(ClError::UnboundDevice)));
    assert!(matches!(device.extensions(), Err(ClError::UnboundDevice)));
    assert!(matches!(device.supports_version(1, 0), Err(ClError::UnboundDevice)));
    assert!(matches!(device.supports_extension("cl_khr_fp64"), Err(ClError::UnboundDevice)));
    assert!(matches!(device.double_support(), Err(ClError::UnboundDevice)));
    assert!(matches!(device.image_support(), Err(ClError::UnboundDevice)));
    assert!(matches!(device.platform(), Err(ClError::UnboundDevice)));

    assert_eq!(fake::native_call_count(), 0, "no native call may be attempted");
}

// ── Version-gated lifetime ───────────────────────────────────────────────────

#[test]
#[serial]
fn clone_retains_on_refcounting_platform() {
    fake::reset();
    let id = fake::install_device(platform_v12(), FakeDevice::gpu());
    let device = Device::from_raw(id).unwrap();
    assert_eq!(fake::refcount(id), Some(1));

    let copy = device.try_clone().unwrap();
    assert_eq!(fake::refcount(id), Some(2));
    assert_eq!(device, copy);

    drop(copy);
    assert_eq!(fake::refcount(id), Some(1));

    // The surviving handle still reaches the device.
    assert_eq!(device.name().unwrap(), "Fake GPU");
}

#[test]
#[serial]
fn clone_is_shallow_alias_on_old_platform() {
    fake::reset();
    let id = fake::install_device(platform_v11(), FakeDevice::gpu());
    let device = Device::from_raw(id).unwrap();

    let copy = device.try_clone().unwrap();
    assert_eq!(fake::refcount(id), Some(1), "no retain issued");

    drop(copy);
    assert_eq!(fake::refcount(id), Some(1), "no release issued");
    assert!(device.name().is_ok());
}

#[test]
#[serial]
fn n_copies_n_drops_leave_survivor_valid() {
    fake::reset();
    let id = fake::install_device(platform_v12(), FakeDevice::gpu());
    let survivor = Device::from_raw(id).unwrap();

    let copies: Vec<Device> = (0..5).map(|_| survivor.try_clone().unwrap()).collect();
    assert_eq!(fake::refcount(id), Some(6));

    drop(copies);
    assert_eq!(fake::refcount(id), Some(1));
    assert_eq!(survivor.max_compute_units().unwrap(), 32);
}

#[test]
#[serial]
fn drop_releases_the_last_reference() {
    fake::reset();
    let id = fake::install_device(platform_v12(), FakeDevice::gpu());
    let device = Device::from_raw(id).unwrap();
    drop(device);

    assert_eq!(fake::refcount(id), Some(0));
    // The id is dead: rebinding it fails at the native layer.
    assert!(Device::from_raw(id).is_err());
}

#[test]
#[serial]
fn drop_is_noop_on_old_platform() {
    fake::reset();
    let id = fake::install_device(platform_v11(), FakeDevice::gpu());
    let device = Device::from_raw(id).unwrap();
    drop(device);

    assert_eq!(fake::refcount(id), Some(1));
    assert!(Device::from_raw(id).is_ok());
}

// ── Owning platform ──────────────────────────────────────────────────────────

#[test]
#[serial]
fn platform_round_trips() {
    fake::reset();
    let platform = platform_v12();
    let device = Device::from_raw(fake::install_device(platform, FakeDevice::gpu())).unwrap();
    assert_eq!(device.platform().unwrap(), platform);
    assert_eq!(device.platform_version().unwrap(), ApiVersion::new(1, 2));
}

#[test]
#[serial]
fn null_owning_platform_is_its_own_error() {
    fake::reset();
    let device = Device::from_raw(fake::install_orphan_device(FakeDevice::gpu())).unwrap();

    let err = device.platform().unwrap_err();
    assert!(matches!(err, ClError::PlatformNotFound), "got {err:?}");
    assert!(!matches!(err, ClError::Api { .. }));

    // The retain gate needs the platform, so cloning surfaces the same state.
    assert!(matches!(device.try_clone(), Err(ClError::PlatformNotFound)));
}

// ── Capability queries ───────────────────────────────────────────────────────

#[test]
#[serial]
fn numeric_queries_report_fixture_values() {
    fake::reset();
    let desc = FakeDevice {
        compute_units: 48,
        work_item_dims: 3,
        work_item_sizes: [512, 256, 8],
        work_group_size: 512,
        constant_buffer_size: 128 * 1024,
        mem_alloc_size: 1024 * 1024 * 1024,
        global_mem_size: 4 * 1024 * 1024 * 1024,
        local_mem_size: 48 * 1024,
        ..FakeDevice::gpu()
    };
    let device = Device::from_raw(fake::install_device(platform_v12(), desc)).unwrap();

    assert_eq!(device.max_compute_units().unwrap(), 48);
    assert_eq!(device.max_work_item_dims().unwrap(), 3);
    assert_eq!(device.max_work_item_sizes().unwrap(), [512, 256, 8]);
    assert_eq!(device.max_work_group_size().unwrap(), 512);
    assert_eq!(device.max_constant_buffer_size().unwrap(), 128 * 1024);
    assert_eq!(device.max_mem_alloc_size().unwrap(), 1024 * 1024 * 1024);
    assert_eq!(device.global_mem_size().unwrap(), 4 * 1024 * 1024 * 1024);
    assert_eq!(device.local_mem_size().unwrap(), 48 * 1024);
}

#[test]
#[serial]
fn string_queries_report_fixture_values() {
    fake::reset();
    let desc = FakeDevice {
        name: "Fixture Device".into(),
        vendor: "Fixture Vendor".into(),
        version: "OpenCL 3.0 fixture".into(),
        profile: "EMBEDDED_PROFILE".into(),
        ..FakeDevice::gpu()
    };
    let device = Device::from_raw(fake::install_device(platform_v12(), desc)).unwrap();

    assert_eq!(device.name().unwrap(), "Fixture Device");
    assert_eq!(device.vendor().unwrap(), "Fixture Vendor");
    assert_eq!(device.version().unwrap(), "OpenCL 3.0 fixture");
    assert_eq!(device.profile().unwrap(), "EMBEDDED_PROFILE");
}

#[test]
#[serial]
fn supports_version_boundaries() {
    fake::reset();
    let desc = FakeDevice { version: "X 2.1 extra".into(), ..FakeDevice::gpu() };
    let device = Device::from_raw(fake::install_device(platform_v12(), desc)).unwrap();

    assert!(device.supports_version(2, 0).unwrap());
    assert!(device.supports_version(2, 1).unwrap(), "inclusive boundary");
    assert!(!device.supports_version(2, 2).unwrap());
}

#[test]
#[serial]
fn unparsable_version_degrades_to_zero() {
    fake::reset();
    let desc = FakeDevice { version: String::new(), ..FakeDevice::gpu() };
    let device = Device::from_raw(fake::install_device(platform_v12(), desc)).unwrap();

    assert!(device.supports_version(0, 0).unwrap());
    assert!(!device.supports_version(1, 0).unwrap());
}

#[test]
#[serial]
fn extension_lookup_is_exact() {
    fake::reset();
    let desc = FakeDevice {
        extensions: "cl_khr_fp64 cl_khr_gl_sharing".into(),
        ..FakeDevice::gpu()
    };
    let device = Device::from_raw(fake::install_device(platform_v12(), desc)).unwrap();

    assert!(device.supports_extension("cl_khr_fp64").unwrap());
    assert!(device.supports_extension("cl_khr_gl_sharing").unwrap());
    assert!(!device.supports_extension("cl_khr_fp").unwrap());
    assert!(!device.supports_extension("cl_khr_fp64x").unwrap());
    assert!(device.double_support().unwrap());
}

#[test]
#[serial]
fn double_support_absent_without_fp64() {
    fake::reset();
    let desc = FakeDevice { extensions: "cl_khr_gl_sharing".into(), ..FakeDevice::gpu() };
    let device = Device::from_raw(fake::install_device(platform_v12(), desc)).unwrap();
    assert!(!device.double_support().unwrap());
}

#[test]
#[serial]
fn image_support_flag() {
    fake::reset();
    let platform = platform_v12();
    let with = Device::from_raw(fake::install_device(platform, FakeDevice::gpu())).unwrap();
    let without = Device::from_raw(fake::install_device(platform, FakeDevice::cpu())).unwrap();
    assert!(with.image_support().unwrap());
    assert!(!without.image_support().unwrap());
}

// ── set_raw ──────────────────────────────────────────────────────────────────

#[test]
#[serial]
fn set_raw_keeps_stale_classification() {
    fake::reset();
    let platform = platform_v11();
    let gpu_id = fake::install_device(platform, FakeDevice::gpu());
    let cpu_id = fake::install_device(platform, FakeDevice::cpu());

    let mut device = Device::from_raw(gpu_id).unwrap();
    device.set_raw(cpu_id);

    // Queries follow the new id; the classification does not.
    assert_eq!(device.name().unwrap(), "Fake CPU");
    assert!(device.is_gpu(), "kind stays as resolved at construction");
    assert_eq!(device, cpu_id);
}

// ── Diagnostics ──────────────────────────────────────────────────────────────

#[test]
#[serial]
fn summary_is_vendor_then_name() {
    fake::reset();
    let device = Device::from_raw(fake::install_device(platform_v12(), FakeDevice::gpu())).unwrap();

    let mut out = Vec::new();
    device.write_summary(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, vec!["Vendor: oclkit", "Name: Fake GPU"]);
}

#[test]
#[serial]
fn summary_on_unbound_handle_fails() {
    fake::reset();
    let mut out = Vec::new();
    assert!(matches!(
        Device::unbound().write_summary(&mut out),
        Err(ClError::UnboundDevice)
    ));
}
