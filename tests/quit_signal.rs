//! Quit listener against real signals sent to this test process.
//!
//! Every test owns a different signal so the tests can run in parallel.

#![cfg(unix)]

use std::pin::pin;
use std::time::Duration;

use anyhow::Context as _;
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use tokio::signal::unix::{SignalKind, signal};
use tokio::time;
use wake::{
    Config, ContextError, Group, QuitSignal, Scope, WakeError, is_quit_signal,
    listen_for_quit_signal,
};

fn send(sig: Signal) {
    kill(Pid::this(), sig).expect("failed to send signal to own process");
}

// The only test that raises SIGINT or SIGTERM: the default set covers both, so
// splitting these cases would let parallel listeners steal each other's signals.
#[tokio::test]
async fn default_set_ignores_others_then_catches_interrupt_and_terminate() {
    let mut winch = signal(SignalKind::window_change()).unwrap();

    let ctx = Scope::new();
    let mut listener = pin!(listen_for_quit_signal(&ctx, &[]));

    // First poll registers the subscription; nothing has arrived yet.
    assert!(time::timeout(Duration::from_millis(50), &mut listener).await.is_err());

    send(Signal::SIGWINCH);
    time::timeout(Duration::from_secs(2), winch.recv())
        .await
        .expect("SIGWINCH was not delivered");
    assert!(
        time::timeout(Duration::from_millis(200), &mut listener).await.is_err(),
        "default set returned for a signal outside it"
    );

    send(Signal::SIGINT);
    let err = time::timeout(Duration::from_secs(2), listener)
        .await
        .expect("listener didn't return after SIGINT");
    assert_eq!(err.quit_signal(), Some(QuitSignal::Interrupt));
    assert_eq!(err.to_string(), "interrupt: received quit signal");

    let mut listener = pin!(listen_for_quit_signal(&ctx, &[]));
    assert!(time::timeout(Duration::from_millis(50), &mut listener).await.is_err());

    send(Signal::SIGTERM);
    let err = time::timeout(Duration::from_secs(2), listener)
        .await
        .expect("listener didn't return after SIGTERM");
    assert_eq!(err.quit_signal(), Some(QuitSignal::Terminate));
    assert_eq!(err.to_string(), "terminated: received quit signal");
}

#[tokio::test]
async fn explicit_signal_is_recognised_through_wrapping() {
    let ctx = Scope::new();
    let mut listener = pin!(listen_for_quit_signal(&ctx, &[QuitSignal::Quit]));
    assert!(time::timeout(Duration::from_millis(50), &mut listener).await.is_err());

    send(Signal::SIGQUIT);
    let err = time::timeout(Duration::from_secs(2), listener)
        .await
        .expect("listener didn't return after SIGQUIT");

    let wrapped: anyhow::Result<()> = Err(err).context("service loop").context("run");
    let wrapped = wrapped.unwrap_err();
    assert!(is_quit_signal(&*wrapped));
    assert_eq!(
        WakeError::find(&*wrapped).and_then(WakeError::quit_signal),
        Some(QuitSignal::Quit)
    );
    assert_eq!(
        format!("{:#}", wrapped),
        "run: service loop: quit: received quit signal"
    );
}

#[tokio::test]
async fn signal_outside_set_is_not_observed() {
    // Keep SIGUSR1 caught so the default disposition doesn't end the test process.
    let mut observer = signal(SignalKind::user_defined1()).unwrap();

    let ctx = Scope::new();
    let mut listener = pin!(listen_for_quit_signal(&ctx, &[QuitSignal::Hangup]));
    assert!(time::timeout(Duration::from_millis(50), &mut listener).await.is_err());

    send(Signal::SIGUSR1);
    time::timeout(Duration::from_secs(2), observer.recv())
        .await
        .expect("SIGUSR1 was not delivered");
    assert!(
        time::timeout(Duration::from_millis(200), &mut listener).await.is_err(),
        "listener returned for a signal it did not subscribe to"
    );

    ctx.cancel();
    let err = listener.await;
    assert_eq!(err.context_reason(), Some(ContextError::Canceled));
}

#[tokio::test]
async fn signal_after_return_is_not_replayed() {
    let mut observer = signal(SignalKind::user_defined2()).unwrap();

    let first_ctx = Scope::new();
    let mut first = pin!(listen_for_quit_signal(&first_ctx, &[QuitSignal::User2]));
    assert!(time::timeout(Duration::from_millis(50), &mut first).await.is_err());
    send(Signal::SIGUSR2);
    let err = time::timeout(Duration::from_secs(2), first)
        .await
        .expect("first listener didn't return");
    assert_eq!(err.quit_signal(), Some(QuitSignal::User2));
    observer.recv().await;

    // Delivered while nobody but the observer is listening.
    send(Signal::SIGUSR2);
    time::timeout(Duration::from_secs(2), observer.recv())
        .await
        .expect("second SIGUSR2 was not delivered");

    let second_ctx = Scope::new();
    let mut second = pin!(listen_for_quit_signal(&second_ctx, &[QuitSignal::User2]));
    assert!(
        time::timeout(Duration::from_millis(200), &mut second).await.is_err(),
        "a signal sent before the call was replayed"
    );
    second_ctx.cancel();
    assert_eq!(second.await.context_reason(), Some(ContextError::Canceled));
}

#[tokio::test]
async fn supervised_group_stops_on_signal() {
    let cfg = Config::default()
        .with_grace(Duration::from_secs(1))
        .with_signals([QuitSignal::Raw(Signal::SIGALRM as i32)]);

    let (mut group, ctx) = Group::<WakeError>::new(&Scope::new());
    let (ready_tx, ready_rx) = tokio::sync::oneshot::channel();
    let service_ctx = ctx.clone();
    group.spawn(async move {
        let _ = ready_tx.send(());
        wake::Context::done(&service_ctx).await;
        Ok(())
    });

    let run = tokio::spawn(async move { group.supervise(&cfg).await });
    ready_rx.await.unwrap();
    // Let the listener member subscribe before signalling.
    time::sleep(Duration::from_millis(200)).await;

    send(Signal::SIGALRM);
    let err = time::timeout(Duration::from_secs(2), run)
        .await
        .expect("supervised group didn't stop")
        .unwrap()
        .unwrap_err();
    assert_eq!(err.to_string(), "alarm clock: received quit signal");
    assert!(ctx.is_cancelled());
}
