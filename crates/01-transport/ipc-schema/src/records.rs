//! Payload records carried by inbound events.

use serde::{Deserialize, Deserializer, Serialize};

const GENERIC_RETRY: &str = "Check failed, please retry";

/// Exam session details returned after a successful login.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamInfo {
    /// Exam identifier.
    pub exam_id: String,
    /// Human-readable exam title.
    pub title: String,
    /// Start timestamp as formatted by the host.
    pub start_time: String,
    /// End timestamp as formatted by the host.
    pub end_time: String,
    /// Duration in minutes.
    pub duration: u32,
    /// Name of the signed-in student.
    pub student_name: String,
}

/// One entry of the host's periodic process sample.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessInfo {
    /// Process id.
    pub pid: u32,
    /// Executable name.
    pub name: String,
    /// Resident memory in MiB.
    pub memory: u64,
    /// CPU usage percentage.
    pub cpu: f64,
}

/// Result of a bounded-latency diagnostic check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Whether the check passed.
    pub success: bool,
    /// Failure or timeout explanation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckResult {
    /// Successful check with no message.
    pub fn passed() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// Failed check carrying `message`.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }

    /// Text to surface for a failed check: the host message when present,
    /// a generic retry prompt otherwise.
    pub fn display_message(&self) -> &str {
        self.message
            .as_deref()
            .filter(|msg| !msg.is_empty())
            .unwrap_or(GENERIC_RETRY)
    }
}

/// Outcome of a login attempt.
///
/// The host sends `loginResult(success, examInfo, message)`; `examInfo` is
/// `null` when the attempt fails and `message` is empty when it succeeds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    /// Whether the credentials were accepted.
    pub success: bool,
    /// Exam session, present on success.
    pub exam_info: Option<ExamInfo>,
    /// Failure explanation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LoginResult {
    /// Failed login carrying `message`.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            exam_info: None,
            message: Some(message.into()),
        }
    }
}

/// Host-side description of an attached USB device.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsbDevice {
    /// Device display name.
    pub name: String,
    /// Device class as reported by the OS.
    #[serde(rename = "type")]
    pub kind: String,
    /// Manufacturer string.
    pub manufacturer: String,
    /// Whether the device exposes mass storage.
    pub is_storage: bool,
    /// Mounted drive letters, if any.
    #[serde(default, deserialize_with = "null_as_default")]
    pub drive_letters: Vec<String>,
}

/// Reply to a USB device enumeration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsbDevicesReport {
    /// Devices found; empty on failure.
    pub devices: Vec<UsbDevice>,
    /// Enumeration failure, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UsbDevicesReport {
    /// Failed enumeration carrying `error`.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            devices: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// Whether any attached device exposes mass storage.
    pub fn has_storage(&self) -> bool {
        self.devices.iter().any(|device| device.is_storage)
    }
}

/// Structured machine summary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    /// CPU model.
    pub cpu: String,
    /// Installed memory.
    pub memory: String,
    /// Operating system name.
    pub os: String,
    /// Operating system version.
    pub version: String,
}

/// Hardware and software inventory of the exam machine.
///
/// Every field defaults, so a host that skips a collector still decodes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeviceInfo {
    /// Network host name.
    pub hostname: String,
    /// Operating system family, e.g. `windows`.
    pub os: String,
    /// Platform name.
    pub platform: String,
    /// Platform family.
    pub platform_family: String,
    /// Platform version.
    pub platform_ver: String,
    /// Kernel version.
    pub kernel_ver: String,
    /// Kernel architecture.
    pub kernel_arch: String,
    /// Host-derived identifier, stable across reboots.
    pub unique_id: String,
    /// OS machine id.
    pub machine_id: String,
    /// BIOS UUID.
    pub bios_uuid: String,
    /// OS product id.
    pub product_id: String,
    /// Hardware fingerprint.
    pub hardware_id: String,
    /// CPU model name.
    pub cpu_model: String,
    /// Logical core count.
    pub cpu_cores: u32,
    /// Nominal frequency in MHz.
    pub cpu_frequency: f64,
    /// CPU usage percentage at sampling time.
    pub cpu_usage: f64,
    /// Total memory in bytes.
    pub mem_total: u64,
    /// Available memory in bytes.
    pub mem_available: u64,
    /// Used memory in bytes.
    pub mem_used: u64,
    /// Used memory percentage.
    pub mem_used_percent: f64,
    /// Mounted volumes.
    #[serde(deserialize_with = "null_as_default")]
    pub disk_info: Vec<DiskInfo>,
    /// Network interfaces.
    #[serde(deserialize_with = "null_as_default")]
    pub network_info: Vec<NetworkInfo>,
    /// Display adapters.
    #[serde(deserialize_with = "null_as_default")]
    pub gpu_info: Vec<GpuInfo>,
    /// BIOS vendor.
    pub bios_vendor: String,
    /// BIOS version.
    pub bios_version: String,
    /// BIOS release date.
    pub bios_date: String,
    /// Baseboard details.
    pub motherboard_info: MotherboardInfo,
    /// Product name.
    pub product_name: String,
    /// Product vendor.
    pub product_vendor: String,
    /// Product version.
    pub product_version: String,
    /// Product serial number.
    pub product_serial: String,
    /// Whether the host believes it runs inside a virtual machine.
    pub is_virtual_machine: bool,
    /// Security products detected on the machine.
    #[serde(deserialize_with = "null_as_default")]
    pub security_software: Vec<String>,
}

/// One mounted volume.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiskInfo {
    /// Device path.
    pub device: String,
    /// Mount point or drive letter.
    pub mount_point: String,
    /// File system type.
    pub fs_type: String,
    /// Capacity in bytes.
    pub total: u64,
    /// Used bytes.
    pub used: u64,
    /// Used percentage.
    pub used_percent: f64,
    /// Whether the volume sits on removable media.
    pub is_removable: bool,
}

/// One network interface.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkInfo {
    /// Interface name.
    pub name: String,
    /// MTU in bytes.
    pub mtu: u32,
    /// Hardware address.
    pub mac_addr: String,
    /// Bound addresses.
    #[serde(deserialize_with = "null_as_default")]
    pub ip_addresses: Vec<String>,
    /// Whether the link is up.
    pub is_up: bool,
    /// Interface kind.
    #[serde(rename = "type")]
    pub kind: String,
    /// Link speed.
    pub speed: u64,
}

/// One display adapter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GpuInfo {
    /// Adapter name.
    pub name: String,
    /// Vendor.
    pub vendor: String,
    /// Driver version.
    pub driver_version: String,
    /// Driver date.
    pub driver_date: String,
    /// Dedicated memory in bytes.
    pub memory: u64,
}

/// Baseboard details.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MotherboardInfo {
    /// Manufacturer.
    pub manufacturer: String,
    /// Product name.
    pub product: String,
    /// Serial number.
    pub serial_number: String,
    /// Board revision.
    pub version: String,
}

/// Reply to a device inventory request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfoReport {
    /// Inventory; absent when collection failed.
    pub device_info: Option<DeviceInfo>,
    /// Collection failure, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeviceInfoReport {
    /// Failed collection carrying `error`.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            device_info: None,
            error: Some(error.into()),
        }
    }

    /// Whether the inventory arrived.
    pub fn is_ok(&self) -> bool {
        self.device_info.is_some() && self.error.is_none()
    }
}

/// Go hosts marshal nil slices as `null`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
