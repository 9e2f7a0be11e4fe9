// Label failures: logged once, cached as absent, never rasterised again.

use std::sync::atomic::{AtomicUsize, Ordering};

use folio_core::icon::{SvgIcon, ViewBox};
use folio_core::{LabelCache, Rgba};

const BAD_ICON: &str = "never-parses";

static WARNINGS: AtomicUsize = AtomicUsize::new(0);

struct WarnCounter;

impl log::Log for WarnCounter {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::Level::Warn
    }

    fn log(&self, record: &log::Record) {
        if record.level() == log::Level::Warn && record.args().to_string().contains(BAD_ICON) {
            WARNINGS.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn flush(&self) {}
}

static LOGGER: WarnCounter = WarnCounter;

#[test]
fn broken_label_warns_once_and_builds_once() {
    log::set_logger(&LOGGER).ok();
    log::set_max_level(log::LevelFilter::Warn);

    let bad = SvgIcon::new(BAD_ICON, ViewBox::square(24.0), vec!["M0 0 Q".into()]);
    let mut cache = LabelCache::new(32);
    for _ in 0..3 {
        assert!(cache.get_or_build(&bad, Rgba::WHITE).is_none());
    }
    assert_eq!(cache.builds(), 1);
    assert_eq!(cache.len(), 1);
    assert_eq!(WARNINGS.load(Ordering::SeqCst), 1);
}
