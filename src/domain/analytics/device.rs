//! Device classification for analytics events.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Device class an event was recorded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Mobile,
    Desktop,
    Tablet,
}

impl DeviceType {
    /// Every device type, in breakdown order.
    pub const ALL: [DeviceType; 3] = [DeviceType::Mobile, DeviceType::Desktop, DeviceType::Tablet];

    /// Parses a stored device string. Unknown or missing values count as desktop.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("mobile") | Some("phone") => DeviceType::Mobile,
            Some("tablet") => DeviceType::Tablet,
            _ => DeviceType::Desktop,
        }
    }

    /// Infers the device class from a `User-Agent` header.
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_ascii_lowercase();
        if ua.contains("ipad") || ua.contains("tablet") || (ua.contains("android") && !ua.contains("mobile")) {
            DeviceType::Tablet
        } else if ua.contains("mobile") || ua.contains("iphone") || ua.contains("android") {
            DeviceType::Mobile
        } else {
            DeviceType::Desktop
        }
    }

    /// Device for a new event: an explicit value wins, then the user agent.
    pub fn resolve(explicit: Option<&str>, user_agent: Option<&str>) -> Self {
        match explicit.map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => Self::parse(Some(value)),
            None => user_agent.map(Self::from_user_agent).unwrap_or(DeviceType::Desktop),
        }
    }

    /// Value stored in the `device_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Mobile => "mobile",
            DeviceType::Desktop => "desktop",
            DeviceType::Tablet => "tablet",
        }
    }

    fn index(&self) -> usize {
        match self {
            DeviceType::Mobile => 0,
            DeviceType::Desktop => 1,
            DeviceType::Tablet => 2,
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-device counters indexed in `DeviceType::ALL` order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct DeviceCounts([u64; 3]);

impl DeviceCounts {
    pub(crate) fn add(&mut self, device: DeviceType) {
        self.0[device.index()] += 1;
    }

    pub(crate) fn get(&self, device: DeviceType) -> u64 {
        self.0[device.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_prefers_explicit_value() {
        let iphone = Some("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)");
        assert_eq!(DeviceType::resolve(Some("tablet"), iphone), DeviceType::Tablet);
        assert_eq!(DeviceType::resolve(Some("  "), iphone), DeviceType::Mobile);
        assert_eq!(DeviceType::resolve(None, None), DeviceType::Desktop);
    }

    #[test]
    fn parse_defaults_to_desktop() {
        assert_eq!(DeviceType::parse(Some("Mobile")), DeviceType::Mobile);
        assert_eq!(DeviceType::parse(Some(" tablet ")), DeviceType::Tablet);
        assert_eq!(DeviceType::parse(Some("desktop")), DeviceType::Desktop);
        assert_eq!(DeviceType::parse(Some("smart-fridge")), DeviceType::Desktop);
        assert_eq!(DeviceType::parse(Some("")), DeviceType::Desktop);
        assert_eq!(DeviceType::parse(None), DeviceType::Desktop);
    }

    #[test]
    fn user_agent_classification() {
        let iphone = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 Mobile/15E148";
        let ipad = "Mozilla/5.0 (iPad; CPU OS 17_0 like Mac OS X) AppleWebKit/605.1.15";
        let android_phone = "Mozilla/5.0 (Linux; Android 14; Pixel 8) Chrome/120.0 Mobile Safari/537.36";
        let android_tablet = "Mozilla/5.0 (Linux; Android 13; SM-X700) Chrome/120.0 Safari/537.36";
        let mac = "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0) AppleWebKit/605.1.15 Safari/605.1.15";

        assert_eq!(DeviceType::from_user_agent(iphone), DeviceType::Mobile);
        assert_eq!(DeviceType::from_user_agent(ipad), DeviceType::Tablet);
        assert_eq!(DeviceType::from_user_agent(android_phone), DeviceType::Mobile);
        assert_eq!(DeviceType::from_user_agent(android_tablet), DeviceType::Tablet);
        assert_eq!(DeviceType::from_user_agent(mac), DeviceType::Desktop);
        assert_eq!(DeviceType::from_user_agent(""), DeviceType::Desktop);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&DeviceType::Tablet).unwrap(), "\"tablet\"");
        assert_eq!(DeviceType::Mobile.to_string(), "mobile");
    }

    #[test]
    fn counts_accumulate_per_device() {
        let mut counts = DeviceCounts::default();
        counts.add(DeviceType::Mobile);
        counts.add(DeviceType::Mobile);
        counts.add(DeviceType::Tablet);
        assert_eq!(counts.get(DeviceType::Mobile), 2);
        assert_eq!(counts.get(DeviceType::Desktop), 0);
        assert_eq!(counts.get(DeviceType::Tablet), 1);
    }
}
