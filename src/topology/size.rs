use serde::{Deserialize, Serialize};

use super::TopologyError;

/// Base units (megabytes) per "g".
pub const UNITS_PER_GB: u32 = 1024;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeResource {
    #[default]
    Memory,
    Storage,
}

impl std::fmt::Display for SizeResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => f.write_str("memory"),
            Self::Storage => f.write_str("storage"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    #[serde(default)]
    pub resource: SizeResource,
    pub value: u32,
}

impl Size {
    pub fn new(resource: SizeResource, value: u32) -> Self {
        Self { resource, value }
    }

    pub fn memory(value: u32) -> Self {
        Self::new(SizeResource::Memory, value)
    }

    pub fn zero(resource: SizeResource) -> Self {
        Self::new(resource, 0)
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", format_size(self.value), self.resource)
    }
}

/// Parses a human size such as `"4g"` or `"0.5g"` into base units.
pub fn parse_gb(raw: &str) -> Result<u32, TopologyError> {
    let normalized = raw.trim().to_ascii_lowercase();
    let number = normalized
        .strip_suffix('g')
        .ok_or_else(|| TopologyError::invalid_size(raw, "missing 'g' suffix"))?;

    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(TopologyError::invalid_size(raw, "expected a non-negative number"));
    }

    let gb: f64 = number
        .parse()
        .map_err(|e| TopologyError::invalid_size(raw, format!("{}", e)))?;

    let units = gb * f64::from(UNITS_PER_GB);
    if units.fract() != 0.0 {
        return Err(TopologyError::invalid_size(
            raw,
            "must be a whole number of megabytes",
        ));
    }
    if units > f64::from(u32::MAX) {
        return Err(TopologyError::invalid_size(raw, "value is too large"));
    }

    Ok(units as u32)
}

pub fn parse_size(raw: &str, resource: SizeResource) -> Result<Size, TopologyError> {
    Ok(Size::new(resource, parse_gb(raw)?))
}

/// Inverse of [`parse_gb`]: `2048` becomes `"2g"`, `512` becomes `"0.5g"`.
pub fn format_size(units: u32) -> String {
    if units % UNITS_PER_GB == 0 {
        format!("{}g", units / UNITS_PER_GB)
    } else {
        format!("{}g", f64::from(units) / f64::from(UNITS_PER_GB))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whole_gigabytes() {
        assert_eq!(parse_gb("2g").unwrap(), 2048);
        assert_eq!(parse_gb("4g").unwrap(), 4096);
        assert_eq!(parse_gb("232g").unwrap(), 237_568);
    }

    #[test]
    fn test_parse_fractional_gigabytes() {
        assert_eq!(parse_gb("0.5g").unwrap(), 512);
        assert_eq!(parse_gb("1.5g").unwrap(), 1536);
    }

    #[test]
    fn test_parse_zero() {
        assert_eq!(parse_gb("0g").unwrap(), 0);
    }

    #[test]
    fn test_parse_is_case_and_whitespace_tolerant() {
        assert_eq!(parse_gb(" 8G ").unwrap(), 8192);
    }

    #[test]
    fn test_parse_missing_suffix() {
        let err = parse_gb("4").unwrap_err();
        assert!(matches!(err, TopologyError::InvalidSize { .. }));
        assert!(err.to_string().contains("missing 'g' suffix"));
    }

    #[test]
    fn test_parse_unrecognized_suffix() {
        assert!(parse_gb("4mb").is_err());
        assert!(parse_gb("4gb").is_err());
    }

    #[test]
    fn test_parse_non_numeric_prefix() {
        assert!(parse_gb("g").is_err());
        assert!(parse_gb("abcg").is_err());
        assert!(parse_gb("-1g").is_err());
        assert!(parse_gb("1.2.3g").is_err());
    }

    #[test]
    fn test_parse_rejects_partial_megabytes() {
        let err = parse_gb("0.0001g").unwrap_err();
        assert!(err.to_string().contains("whole number of megabytes"));
    }

    #[test]
    fn test_format_whole_and_fractional() {
        assert_eq!(format_size(2048), "2g");
        assert_eq!(format_size(0), "0g");
        assert_eq!(format_size(512), "0.5g");
        assert_eq!(format_size(1536), "1.5g");
    }

    #[test]
    fn test_state_string_survives_parse_and_format() {
        for raw in ["2g", "0.5g", "64g"] {
            assert_eq!(format_size(parse_gb(raw).unwrap()), raw);
        }
    }

    #[test]
    fn test_parse_size_keeps_resource() {
        let size = parse_size("1g", SizeResource::Storage).unwrap();
        assert_eq!(size, Size::new(SizeResource::Storage, 1024));
    }

    #[test]
    fn test_size_resource_serialization_lowercase() {
        let json = serde_json::to_string(&Size::memory(1024)).unwrap();
        assert_eq!(json, r#"{"resource":"memory","value":1024}"#);
    }
}
