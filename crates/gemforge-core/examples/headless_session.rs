//! Headless session runner: start, tick for a few seconds, stop.
//!
//! Run it twice to watch offline catch-up credit the gap between runs:
//!
//! ```text
//! cargo run --example headless_session
//! # wait a while...
//! cargo run --example headless_session
//! ```

use gemforge_core::session::Lifecycle;
use gemforge_core::{FactorySpec, GameConfig, Notification, Session, SystemClock};
use gemforge_persist::FileStore;
use std::time::{Duration, Instant};

fn main() {
    let save_dir = std::env::temp_dir().join("gemforge-headless");
    let store = match FileStore::open(&save_dir) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("cannot open save store: {e}");
            return;
        }
    };

    // A visible production rate (the default 1e-7 gems/s makes for a very
    // patient demo) and a matching offline rate.
    let config = GameConfig {
        starting_factory: FactorySpec {
            production_rate: 1.0,
            ..FactorySpec::default()
        },
        offline_rate: 1.0,
        ..GameConfig::default()
    };

    let mut session = Session::new(SystemClock, store, config);
    session.subscribe(|n| match n {
        Notification::GemsChanged { total } => println!("  gems: {total}"),
        Notification::Message { text, success } => println!("  [{success}] {text}"),
        Notification::ProductionPulse { factory } => println!("  pulse from {factory:?}"),
    });

    session.on_start();
    if let Some(report) = session.startup_report() {
        println!(
            "started: first_run={} restored={} offline_gems={} (gap {:.1}s)",
            report.first_run, report.restored_factories, report.offline_gems, report.offline_elapsed
        );
    }

    // Drive the tick hook for ~5 seconds of real time.
    let mut last = Instant::now();
    let end = Instant::now() + Duration::from_secs(5);
    while Instant::now() < end {
        std::thread::sleep(Duration::from_millis(250));
        let now = Instant::now();
        session.on_tick(now.duration_since(last).as_secs_f64());
        last = now;
    }

    println!("display total: {}", session.gems_display_text());
    session.on_stop();
    println!("checkpoint written to {}", save_dir.display());
}
