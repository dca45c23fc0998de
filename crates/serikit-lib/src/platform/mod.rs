//! Platform identity used to pick the default JSON engine.

/// Operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
    Apple,
    Android,
    Unknown,
}

/// Form factor of the device the process runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceIdiom {
    Desktop,
    Phone,
    Tablet,
    TV,
    Watch,
    Unknown,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Windows => write!(f, "Windows"),
            Platform::Linux => write!(f, "Linux"),
            Platform::Apple => write!(f, "Apple"),
            Platform::Android => write!(f, "Android"),
            Platform::Unknown => write!(f, "Unknown"),
        }
    }
}

impl std::fmt::Display for DeviceIdiom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceIdiom::Desktop => write!(f, "Desktop"),
            DeviceIdiom::Phone => write!(f, "Phone"),
            DeviceIdiom::Tablet => write!(f, "Tablet"),
            DeviceIdiom::TV => write!(f, "TV"),
            DeviceIdiom::Watch => write!(f, "Watch"),
            DeviceIdiom::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformInfo {
    pub platform: Platform,
    pub idiom: DeviceIdiom,
}

impl PlatformInfo {
    pub fn new(platform: Platform, idiom: DeviceIdiom) -> Self {
        Self { platform, idiom }
    }

    /// `true` where the platform's native JSON encoder escapes emoji and
    /// other non-ASCII text: Android, and every non-desktop Apple device.
    pub fn has_json_escaping_defect(&self) -> bool {
        self.platform == Platform::Android
            || (self.platform == Platform::Apple && self.idiom != DeviceIdiom::Desktop)
    }
}

impl std::fmt::Display for PlatformInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.platform, self.idiom)
    }
}

/// Source of platform identity. Injected into the default-backend cell so
/// tests can pose as any device.
pub trait PlatformProbe: Send + Sync {
    fn detect(&self) -> PlatformInfo;
}

/// Reports the platform the crate was compiled for.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompileTimeProbe;

impl PlatformProbe for CompileTimeProbe {
    fn detect(&self) -> PlatformInfo {
        PlatformInfo::new(current_platform(), current_idiom())
    }
}

/// A fixed answer, for injection.
impl PlatformProbe for PlatformInfo {
    fn detect(&self) -> PlatformInfo {
        *self
    }
}

/// Returns the platform detected at compile time.
pub fn current_platform() -> Platform {
    if cfg!(target_os = "android") {
        Platform::Android
    } else if cfg!(target_vendor = "apple") {
        Platform::Apple
    } else if cfg!(target_os = "windows") {
        Platform::Windows
    } else if cfg!(target_os = "linux") {
        Platform::Linux
    } else {
        Platform::Unknown
    }
}

/// Returns the device idiom implied by the compile target.
pub fn current_idiom() -> DeviceIdiom {
    if cfg!(any(target_os = "android", target_os = "ios")) {
        DeviceIdiom::Phone
    } else if cfg!(target_os = "tvos") {
        DeviceIdiom::TV
    } else if cfg!(target_os = "watchos") {
        DeviceIdiom::Watch
    } else if cfg!(any(target_os = "macos", target_os = "windows", target_os = "linux")) {
        DeviceIdiom::Desktop
    } else {
        DeviceIdiom::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_platform_matches_target() {
        let platform = current_platform();
        if cfg!(target_os = "linux") {
            assert_eq!(platform, Platform::Linux);
        } else if cfg!(target_os = "macos") {
            assert_eq!(platform, Platform::Apple);
        } else if cfg!(target_os = "windows") {
            assert_eq!(platform, Platform::Windows);
        }
    }

    #[test]
    fn desktop_targets_have_no_defect() {
        if cfg!(any(target_os = "linux", target_os = "macos", target_os = "windows")) {
            assert!(!CompileTimeProbe.detect().has_json_escaping_defect());
        }
    }

    #[test]
    fn android_has_defect() {
        for idiom in [DeviceIdiom::Phone, DeviceIdiom::Tablet, DeviceIdiom::Desktop] {
            assert!(PlatformInfo::new(Platform::Android, idiom).has_json_escaping_defect());
        }
    }

    #[test]
    fn apple_defect_depends_on_idiom() {
        assert!(!PlatformInfo::new(Platform::Apple, DeviceIdiom::Desktop).has_json_escaping_defect());
        assert!(PlatformInfo::new(Platform::Apple, DeviceIdiom::Phone).has_json_escaping_defect());
        assert!(PlatformInfo::new(Platform::Apple, DeviceIdiom::Watch).has_json_escaping_defect());
        assert!(PlatformInfo::new(Platform::Apple, DeviceIdiom::Unknown).has_json_escaping_defect());
    }

    #[test]
    fn other_platforms_have_no_defect() {
        for platform in [Platform::Windows, Platform::Linux, Platform::Unknown] {
            assert!(!PlatformInfo::new(platform, DeviceIdiom::Tablet).has_json_escaping_defect());
        }
    }

    #[test]
    fn fixed_probe_returns_itself() {
        let info = PlatformInfo::new(Platform::Apple, DeviceIdiom::TV);
        assert_eq!(info.detect(), info);
    }

    #[test]
    fn platform_display() {
        assert_eq!(Platform::Apple.to_string(), "Apple");
        assert_eq!(Platform::Android.to_string(), "Android");
        assert_eq!(
            PlatformInfo::new(Platform::Linux, DeviceIdiom::Desktop).to_string(),
            "Linux (Desktop)"
        );
    }
}
