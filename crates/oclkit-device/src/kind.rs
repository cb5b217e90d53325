//! Device classification.

use oclkit_common::types::{
    ClDeviceType, CL_DEVICE_TYPE_ACCELERATOR, CL_DEVICE_TYPE_CPU, CL_DEVICE_TYPE_GPU,
};

/// Classification of an OpenCL device, resolved once at handle construction.
///
/// `All` doubles as "unclassified": it is the kind of an unbound handle and
/// of any device whose type bits name none of the specific categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeviceKind {
    Cpu,
    Gpu,
    Accelerator,
    #[default]
    All,
}

impl DeviceKind {
    /// Map the native `CL_DEVICE_TYPE` bitfield onto a kind.
    ///
    /// A device may advertise several type bits; the most specific single
    /// category wins, in GPU → CPU → accelerator order. Unknown or empty
    /// bitfields map to `All`.
    pub fn from_bits(bits: ClDeviceType) -> Self {
        if bits & CL_DEVICE_TYPE_GPU != 0 {
            DeviceKind::Gpu
        } else if bits & CL_DEVICE_TYPE_CPU != 0 {
            DeviceKind::Cpu
        } else if bits & CL_DEVICE_TYPE_ACCELERATOR != 0 {
            DeviceKind::Accelerator
        } else {
            DeviceKind::All
        }
    }
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DeviceKind::Cpu => "CPU",
            DeviceKind::Gpu => "GPU",
            DeviceKind::Accelerator => "accelerator",
            DeviceKind::All => "all",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oclkit_common::types::CL_DEVICE_TYPE_DEFAULT;

    #[test]
    fn single_bits_map_to_their_kind() {
        assert_eq!(DeviceKind::from_bits(CL_DEVICE_TYPE_GPU), DeviceKind::Gpu);
        assert_eq!(DeviceKind::from_bits(CL_DEVICE_TYPE_CPU), DeviceKind::Cpu);
        assert_eq!(DeviceKind::from_bits(CL_DEVICE_TYPE_ACCELERATOR), DeviceKind::Accelerator);
    }

    #[test]
    fn unknown_bits_map_to_all() {
        assert_eq!(DeviceKind::from_bits(0), DeviceKind::All);
        assert_eq!(DeviceKind::from_bits(CL_DEVICE_TYPE_DEFAULT), DeviceKind::All);
    }

    #[test]
    fn composite_bits_pick_the_most_specific() {
        let bits = CL_DEVICE_TYPE_GPU | CL_DEVICE_TYPE_DEFAULT;
        assert_eq!(DeviceKind::from_bits(bits), DeviceKind::Gpu);
    }

    #[test]
    fn default_is_all() {
        assert_eq!(DeviceKind::default(), DeviceKind::All);
    }
}
