//! Default JSON engine selection.
//!
//! [`DefaultJsonBackend`] is a small atomic cell. It is computed lazily on the
//! first read from a [`PlatformProbe`] (or a configured preference), and can be
//! overwritten at any time. Each facade owns an `Arc` to one of these cells;
//! the process-wide one is [`DefaultJsonBackend::global`].

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};

use crate::backend::JsonBackendKind;
use crate::config::SerikitConfig;
use crate::platform::{CompileTimeProbe, PlatformInfo, PlatformProbe};

const UNSET: u8 = 0;
const TREE: u8 = 1;
const STREAM: u8 = 2;

fn to_bits(kind: JsonBackendKind) -> u8 {
    match kind {
        JsonBackendKind::TreeJson => TREE,
        JsonBackendKind::StreamJson => STREAM,
    }
}

fn from_bits(bits: u8) -> Option<JsonBackendKind> {
    match bits {
        TREE => Some(JsonBackendKind::TreeJson),
        STREAM => Some(JsonBackendKind::StreamJson),
        _ => None,
    }
}

/// The engine to use when a caller does not name one.
///
/// Platforms whose native encoder escapes emoji get the tree engine; every
/// other platform gets the streaming engine.
pub fn default_for_platform(info: &PlatformInfo) -> JsonBackendKind {
    if info.has_json_escaping_defect() {
        JsonBackendKind::TreeJson
    } else {
        JsonBackendKind::StreamJson
    }
}

pub struct DefaultJsonBackend {
    state: AtomicU8,
    probe: Box<dyn PlatformProbe>,
    preferred: Option<JsonBackendKind>,
}

static GLOBAL: OnceLock<Arc<DefaultJsonBackend>> = OnceLock::new();

impl DefaultJsonBackend {
    /// An uninitialised cell that consults `probe` on first read.
    pub fn new(probe: impl PlatformProbe + 'static) -> Self {
        Self {
            state: AtomicU8::new(UNSET),
            probe: Box::new(probe),
            preferred: None,
        }
    }

    /// A cell that already holds `kind`.
    pub fn with_value(kind: JsonBackendKind) -> Self {
        let cell = Self::new(CompileTimeProbe);
        cell.state.store(to_bits(kind), Ordering::Release);
        cell
    }

    /// Use `preferred` instead of the probe whenever the value is computed.
    pub fn with_preferred(mut self, preferred: Option<JsonBackendKind>) -> Self {
        self.preferred = preferred;
        self
    }

    /// The process-wide cell: compile-time probe plus `SERIKIT_JSON_BACKEND`.
    pub fn global() -> Arc<DefaultJsonBackend> {
        GLOBAL
            .get_or_init(|| {
                let preferred = SerikitConfig::get().json_backend;
                Arc::new(DefaultJsonBackend::new(CompileTimeProbe).with_preferred(preferred))
            })
            .clone()
    }

    pub fn get(&self) -> JsonBackendKind {
        if let Some(kind) = from_bits(self.state.load(Ordering::Acquire)) {
            return kind;
        }
        let computed = self.compute();
        match self.state.compare_exchange(
            UNSET,
            to_bits(computed),
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => {
                tracing::info!(backend = %computed, "default JSON backend selected");
                computed
            }
            // Lost the race to another initialiser or an explicit set.
            Err(current) => from_bits(current).unwrap_or(computed),
        }
    }

    pub fn set(&self, kind: JsonBackendKind) {
        let previous = self.state.swap(to_bits(kind), Ordering::AcqRel);
        tracing::info!(
            backend = %kind,
            previous = ?from_bits(previous),
            "default JSON backend overridden"
        );
    }

    /// Forget the current value; the next read recomputes it.
    pub fn reset(&self) {
        self.state.store(UNSET, Ordering::Release);
    }

    pub fn is_initialized(&self) -> bool {
        self.state.load(Ordering::Acquire) != UNSET
    }

    fn compute(&self) -> JsonBackendKind {
        if let Some(kind) = self.preferred {
            return kind;
        }
        let info = self.probe.detect();
        let kind = default_for_platform(&info);
        tracing::debug!(platform = %info, backend = %kind, "computed default JSON backend");
        kind
    }
}

impl std::fmt::Debug for DefaultJsonBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultJsonBackend")
            .field("value", &from_bits(self.state.load(Ordering::Acquire)))
            .field("preferred", &self.preferred)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{DeviceIdiom, Platform};
    use std::sync::atomic::AtomicUsize;

    struct CountingProbe {
        info: PlatformInfo,
        calls: Arc<AtomicUsize>,
    }

    impl PlatformProbe for CountingProbe {
        fn detect(&self) -> PlatformInfo {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.info
        }
    }

    #[test]
    fn defect_platforms_get_tree_engine() {
        let android = PlatformInfo::new(Platform::Android, DeviceIdiom::Phone);
        let ipad = PlatformInfo::new(Platform::Apple, DeviceIdiom::Tablet);
        assert_eq!(default_for_platform(&android), JsonBackendKind::TreeJson);
        assert_eq!(default_for_platform(&ipad), JsonBackendKind::TreeJson);
    }

    #[test]
    fn other_platforms_get_stream_engine() {
        let mac = PlatformInfo::new(Platform::Apple, DeviceIdiom::Desktop);
        let windows = PlatformInfo::new(Platform::Windows, DeviceIdiom::Desktop);
        assert_eq!(default_for_platform(&mac), JsonBackendKind::StreamJson);
        assert_eq!(default_for_platform(&windows), JsonBackendKind::StreamJson);
    }

    #[test]
    fn computed_lazily_and_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cell = DefaultJsonBackend::new(CountingProbe {
            info: PlatformInfo::new(Platform::Android, DeviceIdiom::Phone),
            calls: calls.clone(),
        });
        assert!(!cell.is_initialized());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert_eq!(cell.get(), JsonBackendKind::TreeJson);
        assert_eq!(cell.get(), JsonBackendKind::TreeJson);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cell.is_initialized());
    }

    #[test]
    fn override_is_observed_by_later_reads() {
        let cell = DefaultJsonBackend::new(PlatformInfo::new(Platform::Linux, DeviceIdiom::Desktop));
        assert_eq!(cell.get(), JsonBackendKind::StreamJson);
        cell.set(JsonBackendKind::TreeJson);
        assert_eq!(cell.get(), JsonBackendKind::TreeJson);
    }

    #[test]
    fn set_before_first_read_skips_probe() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cell = DefaultJsonBackend::new(CountingProbe {
            info: PlatformInfo::new(Platform::Linux, DeviceIdiom::Desktop),
            calls: calls.clone(),
        });
        cell.set(JsonBackendKind::TreeJson);
        assert_eq!(cell.get(), JsonBackendKind::TreeJson);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn reset_recomputes() {
        let cell = DefaultJsonBackend::new(PlatformInfo::new(Platform::Android, DeviceIdiom::Tablet));
        cell.set(JsonBackendKind::StreamJson);
        cell.reset();
        assert!(!cell.is_initialized());
        assert_eq!(cell.get(), JsonBackendKind::TreeJson);
    }

    #[test]
    fn preferred_wins_over_probe() {
        let cell = DefaultJsonBackend::new(PlatformInfo::new(Platform::Android, DeviceIdiom::Phone))
            .with_preferred(Some(JsonBackendKind::StreamJson));
        assert_eq!(cell.get(), JsonBackendKind::StreamJson);
    }

    #[test]
    fn with_value_is_preinitialised() {
        let cell = DefaultJsonBackend::with_value(JsonBackendKind::TreeJson);
        assert!(cell.is_initialized());
        assert_eq!(cell.get(), JsonBackendKind::TreeJson);
    }

    #[test]
    fn concurrent_reads_agree() {
        let cell = Arc::new(DefaultJsonBackend::new(PlatformInfo::new(
            Platform::Apple,
            DeviceIdiom::Phone,
        )));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cell = cell.clone();
                std::thread::spawn(move || cell.get())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), JsonBackendKind::TreeJson);
        }
    }

    #[test]
    fn concurrent_set_never_tears() {
        let cell = Arc::new(DefaultJsonBackend::with_value(JsonBackendKind::TreeJson));
        let writer = {
            let cell = cell.clone();
            std::thread::spawn(move || {
                for i in 0..1000 {
                    let kind = if i % 2 == 0 {
                        JsonBackendKind::StreamJson
                    } else {
                        JsonBackendKind::TreeJson
                    };
                    cell.set(kind);
                }
            })
        };
        for _ in 0..1000 {
            assert!(JsonBackendKind::ALL.contains(&cell.get()));
        }
        writer.join().unwrap();
    }
}
