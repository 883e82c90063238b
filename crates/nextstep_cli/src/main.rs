//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `nextstep_core` linkage.
//! - Optionally open a session under a data dir and print its summary.

use nextstep_core::{AppSession, CoreConfig};

fn main() {
    println!("nextstep_core ping={}", nextstep_core::ping());
    println!("nextstep_core version={}", nextstep_core::core_version());

    let Some(dir) = std::env::args().nth(1) else {
        return;
    };
    match AppSession::open(&CoreConfig::new(dir)) {
        Ok(session) => {
            let summary = session.progress_summary();
            println!(
                "nextstep_core tasks={} pending={} modules={} credentials={}",
                summary.total_tasks,
                session.tasks().pending_count(),
                summary.total_modules,
                session.credentials().exists().unwrap_or(false)
            );
        }
        Err(err) => {
            eprintln!("nextstep_core session error: {err}");
            std::process::exit(1);
        }
    }
}
