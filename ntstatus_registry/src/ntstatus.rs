//! NTSTATUS value decoding
//!
//! Bit layout of a 32-bit NTSTATUS:
//!
//! ```text
//!  3 3 2 2 2 2 2 2 2 2 2 2 1 1 1 1 1 1 1 1 1 1
//!  1 0 9 8 7 6 5 4 3 2 1 0 9 8 7 6 5 4 3 2 1 0 9 8 7 6 5 4 3 2 1 0
//! +---+-+-+-----------------------+-------------------------------+
//! |Sev|C|N|       Facility        |              Code             |
//! +---+-+-+-----------------------+-------------------------------+
//! ```

use crate::error::RegistryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SEVERITY_SHIFT: u32 = 30;
const CUSTOMER_BIT: u32 = 1 << 29;
const RESERVED_BIT: u32 = 1 << 28;
const FACILITY_SHIFT: u32 = 16;
const FACILITY_MASK: u32 = 0x0FFF;
const CODE_MASK: u32 = 0xFFFF;

/// Bit OR-ed in by `HRESULT_FROM_NT`
pub const FACILITY_NT_BIT: u32 = 0x1000_0000;

// ============================================================================
// Severity
// ============================================================================

/// Top two bits of a status value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Success = 0,
    Informational = 1,
    Warning = 2,
    Error = 3,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Success,
        Severity::Informational,
        Severity::Warning,
        Severity::Error,
    ];

    pub const fn from_value(value: u32) -> Self {
        match value >> SEVERITY_SHIFT {
            0 => Severity::Success,
            1 => Severity::Informational,
            2 => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "Success",
            Severity::Informational => "Informational",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Facility
// ============================================================================

/// 12-bit facility field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Facility(u16);

impl Facility {
    pub const fn new(raw: u16) -> Self {
        Self(raw & FACILITY_MASK as u16)
    }

    pub fn value(&self) -> u16 {
        self.0
    }

    /// Well-known facility name without the `FACILITY_` prefix
    pub fn name(&self) -> Option<&'static str> {
        let name = match self.0 {
            0x001 => "DEBUGGER",
            0x002 => "RPC_RUNTIME",
            0x003 => "RPC_STUBS",
            0x004 => "IO_ERROR_CODE",
            0x006 => "CODCLASS_ERROR_CODE",
            0x007 => "NTWIN32",
            0x008 => "NTCERT",
            0x009 => "NTSSPI",
            0x00A => "TERMINAL_SERVER",
            0x00B => "MUI_ERROR_CODE",
            0x010 => "USB_ERROR_CODE",
            0x011 => "HID_ERROR_CODE",
            0x012 => "FIREWIRE_ERROR_CODE",
            0x013 => "CLUSTER_ERROR_CODE",
            0x014 => "ACPI_ERROR_CODE",
            0x015 => "SXS_ERROR_CODE",
            0x019 => "TRANSACTION",
            0x01A => "COMMONLOG",
            0x01B => "VIDEO",
            0x01C => "FILTER_MANAGER",
            0x01D => "MONITOR",
            0x01E => "GRAPHICS_KERNEL",
            0x020 => "DRIVER_FRAMEWORK",
            0x021 => "FVE_ERROR_CODE",
            0x022 => "FWP_ERROR_CODE",
            0x023 => "NDIS_ERROR_CODE",
            0x029 => "TPM",
            0x02A => "RTPM",
            0x035 => "HYPERVISOR",
            0x036 => "IPSEC",
            0x037 => "VIRTUALIZATION",
            0x038 => "VOLMGR",
            0x039 => "BCD_ERROR_CODE",
            0x03A => "VHD",
            0x03E => "WIN32K_NTUSER",
            0x03F => "WIN32K_NTGDI",
            0x040 => "RESUME_KEY_FILTER",
            0x041 => "RDBSS",
            0x042 => "BTH_ATT",
            0x043 => "SECUREBOOT",
            0x044 => "AUDIO_KERNEL",
            0x045 => "VSM",
            0x050 => "VOLSNAP",
            0x051 => "SDBUS",
            0x05C => "SHARED_VHDX",
            0x05D => "SMB",
            0x099 => "INTERIX",
            0x0E7 => "SPACES",
            0x0E8 => "SECURITY_CORE",
            0x0E9 => "SYSTEM_INTEGRITY",
            0x0EA => "LICENSING",
            0x0EB => "PLATFORM_MANIFEST",
            0x0EC => "APP_EXEC",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} (0x{:03X})", name, self.0),
            None => write!(f, "0x{:03X}", self.0),
        }
    }
}

// ============================================================================
// NtStatus
// ============================================================================

/// A raw 32-bit NTSTATUS value with its bit fields decoded on demand.
///
/// Any `u32` is a valid `NtStatus`; whether the catalog names it is a separate
/// question answered by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NtStatus(u32);

impl NtStatus {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Reinterpret a signed `NTSTATUS` (the C typedef is `LONG`)
    pub const fn from_signed(value: i32) -> Self {
        Self(value as u32)
    }

    pub const fn value(&self) -> u32 {
        self.0
    }

    pub const fn as_signed(&self) -> i32 {
        self.0 as i32
    }

    pub const fn severity(&self) -> Severity {
        Severity::from_value(self.0)
    }

    /// Bit 29: customer-defined code
    pub const fn is_customer(&self) -> bool {
        self.0 & CUSTOMER_BIT != 0
    }

    /// Bit 28: reserved, set when an NTSTATUS is carried inside an HRESULT
    pub const fn has_reserved_bit(&self) -> bool {
        self.0 & RESERVED_BIT != 0
    }

    pub const fn facility(&self) -> Facility {
        Facility::new(((self.0 >> FACILITY_SHIFT) & FACILITY_MASK) as u16)
    }

    pub const fn code(&self) -> u16 {
        (self.0 & CODE_MASK) as u16
    }

    /// `NT_SUCCESS`: success or informational severity
    pub const fn is_success(&self) -> bool {
        (self.0 as i32) >= 0
    }

    /// `NT_INFORMATION`
    pub const fn is_information(&self) -> bool {
        self.0 >> SEVERITY_SHIFT == Severity::Informational as u32
    }

    /// `NT_WARNING`
    pub const fn is_warning(&self) -> bool {
        self.0 >> SEVERITY_SHIFT == Severity::Warning as u32
    }

    /// `NT_ERROR`
    pub const fn is_error(&self) -> bool {
        self.0 >> SEVERITY_SHIFT == Severity::Error as u32
    }

    /// `HRESULT_FROM_NT`
    pub const fn to_hresult(&self) -> u32 {
        self.0 | FACILITY_NT_BIT
    }
}

impl fmt::Display for NtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

impl fmt::UpperHex for NtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

impl fmt::LowerHex for NtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl From<u32> for NtStatus {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<NtStatus> for u32 {
    fn from(status: NtStatus) -> Self {
        status.0
    }
}

impl TryFrom<i64> for NtStatus {
    type Error = RegistryError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .map(Self)
            .map_err(|_| RegistryError::out_of_range(value))
    }
}

impl TryFrom<u64> for NtStatus {
    type Error = RegistryError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .map(Self)
            .map_err(|_| RegistryError::out_of_range(value))
    }
}

impl TryFrom<i128> for NtStatus {
    type Error = RegistryError;

    fn try_from(value: i128) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .map(Self)
            .map_err(|_| RegistryError::out_of_range(value))
    }
}

impl TryFrom<&str> for NtStatus {
    type Error = RegistryError;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        text.parse()
    }
}

/// Accepts `0x`/`0X` hex or plain decimal. Surrounding whitespace is trimmed
/// and `_` separators are ignored.
impl FromStr for NtStatus {
    type Err = RegistryError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(RegistryError::invalid_input(input, "empty input"));
        }

        if trimmed.starts_with(['+', '-']) {
            return Err(RegistryError::invalid_input(
                input,
                "signed values are not accepted",
            ));
        }

        let (body, radix) = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(rest) => (rest, 16),
            None => (trimmed, 10),
        };

        let digits: String = body.chars().filter(|c| *c != '_').collect();
        if digits.is_empty() {
            return Err(RegistryError::invalid_input(input, "no digits"));
        }

        if digits.contains('.') {
            return Err(RegistryError::invalid_input(
                input,
                "fractional values are not accepted",
            ));
        }

        if let Some(bad) = digits.chars().find(|c| !c.is_digit(radix)) {
            let reason = if radix == 16 {
                format!("unexpected character '{}' in hex value", bad)
            } else {
                format!("unexpected character '{}' in decimal value", bad)
            };
            return Err(RegistryError::invalid_input(input, &reason));
        }

        // Digits are validated, so the only failure left is overflow
        let wide = u128::from_str_radix(&digits, radix)
            .map_err(|_| RegistryError::out_of_range(trimmed))?;

        u32::try_from(wide)
            .map(Self)
            .map_err(|_| RegistryError::out_of_range(trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_severity_decoding() {
        assert_eq!(NtStatus::new(0x0000_0000).severity(), Severity::Success);
        assert_eq!(NtStatus::new(0x4000_0000).severity(), Severity::Informational);
        assert_eq!(NtStatus::new(0x8000_0005).severity(), Severity::Warning);
        assert_eq!(NtStatus::new(0xC000_0005).severity(), Severity::Error);
        assert_eq!(NtStatus::new(0xFFFF_FFFF).severity(), Severity::Error);
    }

    #[test]
    fn test_field_decoding() {
        let rpc = NtStatus::new(0xC002_0003);
        assert_eq!(rpc.facility().value(), 0x002);
        assert_eq!(rpc.facility().name(), Some("RPC_RUNTIME"));
        assert_eq!(rpc.code(), 0x0003);
        assert!(!rpc.is_customer());
        assert!(!rpc.has_reserved_bit());

        let custom = NtStatus::new(0xE123_4567);
        assert!(custom.is_customer());
        assert_eq!(custom.facility().value(), 0x123);
        assert_eq!(custom.code(), 0x4567);

        assert_eq!(NtStatus::new(0xC000_0005).facility().name(), None);
        assert_eq!(NtStatus::new(0xC000_0005).facility().to_string(), "0x000");
    }

    #[test]
    fn test_success_predicates() {
        assert!(NtStatus::new(0).is_success());
        assert!(NtStatus::new(0x4000_0000).is_success());
        assert!(NtStatus::new(0x4000_0000).is_information());
        assert!(!NtStatus::new(0x8000_0005).is_success());
        assert!(NtStatus::new(0x8000_0005).is_warning());
        assert!(NtStatus::new(0xC000_0005).is_error());
        assert!(!NtStatus::new(0xC000_0005).is_success());
    }

    #[test]
    fn test_hresult_and_signed_views() {
        let status = NtStatus::new(0xC000_0005);
        assert_eq!(status.to_hresult(), 0xD000_0005);
        assert!(NtStatus::new(status.to_hresult()).has_reserved_bit());

        assert_eq!(NtStatus::from_signed(-1073741819), status);
        assert_eq!(status.as_signed(), -1073741819);
        assert_eq!(NtStatus::from_signed(-1).value(), 0xFFFF_FFFF);
    }

    #[test]
    fn test_display() {
        assert_eq!(NtStatus::new(0xC000_0005).to_string(), "0xC0000005");
        assert_eq!(NtStatus::new(0x102).to_string(), "0x00000102");
        assert_eq!(format!("{:08x}", NtStatus::new(0xC000_0005)), "c0000005");
        assert_eq!(Severity::Informational.to_string(), "Informational");
        assert_eq!(Facility::new(0x002).to_string(), "RPC_RUNTIME (0x002)");
    }

    #[test]
    fn test_parse_hex_and_decimal() {
        assert_eq!("0xC0000005".parse::<NtStatus>().unwrap().value(), 0xC000_0005);
        assert_eq!("0Xc0000005".parse::<NtStatus>().unwrap().value(), 0xC000_0005);
        assert_eq!("3221225477".parse::<NtStatus>().unwrap().value(), 0xC000_0005);
        assert_eq!("  259  ".parse::<NtStatus>().unwrap().value(), 0x103);
        assert_eq!("0xC000_0005".parse::<NtStatus>().unwrap().value(), 0xC000_0005);
        assert_eq!("4_294_967_295".parse::<NtStatus>().unwrap().value(), u32::MAX);
        assert_eq!("0".parse::<NtStatus>().unwrap().value(), 0);
    }

    #[test]
    fn test_parse_rejects_malformed_text() {
        assert_matches!("".parse::<NtStatus>(), Err(RegistryError::InvalidInput { .. }));
        assert_matches!("   ".parse::<NtStatus>(), Err(RegistryError::InvalidInput { .. }));
        assert_matches!("-5".parse::<NtStatus>(), Err(RegistryError::InvalidInput { .. }));
        assert_matches!("+5".parse::<NtStatus>(), Err(RegistryError::InvalidInput { .. }));
        assert_matches!("1.5".parse::<NtStatus>(), Err(RegistryError::InvalidInput { .. }));
        assert_matches!("0x".parse::<NtStatus>(), Err(RegistryError::InvalidInput { .. }));
        assert_matches!("0xZZ".parse::<NtStatus>(), Err(RegistryError::InvalidInput { .. }));
        assert_matches!("C0000005".parse::<NtStatus>(), Err(RegistryError::InvalidInput { .. }));
        assert_matches!("STATUS_SUCCESS".parse::<NtStatus>(), Err(RegistryError::InvalidInput { .. }));
    }

    #[test]
    fn test_parse_out_of_range() {
        assert_matches!(
            "4294967296".parse::<NtStatus>(),
            Err(RegistryError::OutOfRange { ref value }) if value == "4294967296"
        );
        assert_matches!(
            "0x1_0000_0000".parse::<NtStatus>(),
            Err(RegistryError::OutOfRange { .. })
        );
        assert_matches!(
            "999999999999999999999999999999999999999999999".parse::<NtStatus>(),
            Err(RegistryError::OutOfRange { .. })
        );
    }

    #[test]
    fn test_integer_conversions() {
        assert_eq!(NtStatus::try_from(0xC000_0005i64).unwrap().value(), 0xC000_0005);
        assert_eq!(NtStatus::try_from(u32::MAX as u64).unwrap().value(), u32::MAX);
        assert_matches!(NtStatus::try_from(-1i64), Err(RegistryError::OutOfRange { .. }));
        assert_matches!(NtStatus::try_from(1u64 << 32), Err(RegistryError::OutOfRange { .. }));
        assert_matches!(NtStatus::try_from(i128::MIN), Err(RegistryError::OutOfRange { .. }));
        assert_eq!(u32::from(NtStatus::from(7u32)), 7);
    }
}
