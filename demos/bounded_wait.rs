//! # Example: bounded_wait
//!
//! Two ways to bound a shutdown:
//! 1. [`Group::supervise`] with a [`Config`]: quit on SIGTERM/SIGHUP, 2s grace.
//! 2. [`wait_blocking_with_timeout`] over plain OS threads joined synchronously.
//!
//! The group part stops itself after 3s through a deadline scope, so the example
//! also finishes without any signal.
//!
//! ## Run
//! ```bash
//! RUST_LOG=wake=trace cargo run --example bounded_wait
//! # optionally: kill -HUP <pid>
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use wake::{Config, Context, Group, QuitSignal, Scope, WakeError, wait_blocking_with_timeout};

async fn supervised() -> Result<(), WakeError> {
    let cfg = Config::default()
        .with_grace(Duration::from_secs(2))
        .with_signals([QuitSignal::Terminate, QuitSignal::Hangup]);

    let deadline = Scope::new().with_timeout(Duration::from_secs(3));
    let (mut group, ctx) = Group::new(&deadline);

    for id in 0..3u64 {
        let ctx = ctx.clone();
        group.spawn(async move {
            ctx.done().await;
            tokio::time::sleep(Duration::from_millis(200 * (id + 1))).await;
            println!("[worker-{id}] stopped ({:?})", ctx.err());
            Ok(())
        });
    }

    println!("pid {} running for 3s", std::process::id());
    group.supervise(&cfg).await
}

async fn threads() -> Result<(), WakeError> {
    let ctx = Scope::new();
    let stop = Arc::new(AtomicBool::new(false));

    let handles: Vec<_> = (0..2)
        .map(|id| {
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    thread::sleep(Duration::from_millis(50));
                }
                println!("[thread-{id}] stopped");
            })
        })
        .collect();

    tokio::time::sleep(Duration::from_millis(300)).await;
    stop.store(true, Ordering::Relaxed);
    ctx.cancel();

    wait_blocking_with_timeout(&ctx, Duration::from_secs(1), move || {
        for h in handles {
            let _ = h.join();
        }
        Ok(())
    })
    .await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== bounded_wait example ===\n");

    match supervised().await {
        Ok(()) => println!("group: all members stopped in time"),
        Err(e) => println!("group: {e} [{}]", e.as_label()),
    }

    threads().await?;
    println!("threads: joined in time");
    Ok(())
}
