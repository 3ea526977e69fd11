//! Tests for the shutdown state machine

use super::*;

#[test]
fn test_initial_state() {
    let coordinator = ShutdownCoordinator::new();
    assert_eq!(coordinator.state(), ShutdownState::Running);
    assert!(!coordinator.is_draining());
}

#[test]
fn test_begin_drain_fires_once() {
    let coordinator = ShutdownCoordinator::new();

    assert!(coordinator.begin_drain("SIGTERM"));
    assert!(!coordinator.begin_drain("SIGINT"));
    assert!(!coordinator.begin_drain("SIGTERM"));
    assert_eq!(coordinator.state(), ShutdownState::Draining);
    assert!(coordinator.is_draining());
}

#[test]
fn test_state_never_moves_backwards() {
    let coordinator = ShutdownCoordinator::new();
    coordinator.begin_drain("test");
    assert!(coordinator.mark_stopped());
    assert!(!coordinator.mark_stopped());

    assert!(!coordinator.begin_drain("late signal"));
    assert_eq!(coordinator.state(), ShutdownState::Stopped);
}

#[test]
fn test_clones_share_state() {
    let coordinator = ShutdownCoordinator::new();
    let observer = coordinator.clone();

    coordinator.begin_drain("test");
    assert!(observer.is_draining());
    assert!(!observer.begin_drain("again"));
}

#[test]
fn test_repeated_signals_do_not_retrigger() {
    let coordinator = ShutdownCoordinator::new();
    let mut rx = coordinator.subscribe();

    coordinator.on_signal("SIGINT");
    assert!(rx.has_changed().unwrap());
    let _ = rx.borrow_and_update();

    coordinator.on_signal("SIGTERM");
    assert!(!rx.has_changed().unwrap());
    assert_eq!(coordinator.state(), ShutdownState::Draining);
}

#[tokio::test]
async fn test_subscribers_observe_transitions() {
    let coordinator = ShutdownCoordinator::new();
    let mut rx = coordinator.subscribe();

    let observer = tokio::spawn(async move {
        let draining = *rx
            .wait_for(|s| *s != ShutdownState::Running)
            .await
            .unwrap();
        let stopped = *rx
            .wait_for(|s| *s == ShutdownState::Stopped)
            .await
            .unwrap();
        (draining, stopped)
    });

    coordinator.begin_drain("test");
    coordinator.mark_stopped();

    let (draining, stopped) = observer.await.unwrap();
    assert!(draining >= ShutdownState::Draining);
    assert_eq!(stopped, ShutdownState::Stopped);
}

#[test]
fn test_state_display() {
    assert_eq!(ShutdownState::Running.to_string(), "running");
    assert_eq!(ShutdownState::Draining.to_string(), "draining");
    assert_eq!(ShutdownState::Stopped.to_string(), "stopped");
}

#[cfg(unix)]
mod signals {
    use super::super::signal::spawn_listener;
    use super::*;
    use std::time::Duration;

    fn raise_sigterm() {
        // SAFETY: raise has no memory-safety preconditions
        let rc = unsafe { libc::raise(libc::SIGTERM) };
        assert_eq!(rc, 0);
    }

    #[tokio::test]
    async fn test_sigterm_drains_once() {
        let coordinator = ShutdownCoordinator::new();
        let mut rx = coordinator.subscribe();
        let listener = spawn_listener(coordinator.clone()).expect("signal handlers installed");
        assert_eq!(coordinator.state(), ShutdownState::Running);

        raise_sigterm();
        let state = tokio::time::timeout(
            Duration::from_secs(5),
            rx.wait_for(|s| *s != ShutdownState::Running),
        )
        .await
        .expect("first SIGTERM begins the drain")
        .map(|state| *state)
        .unwrap();
        assert_eq!(state, ShutdownState::Draining);

        raise_sigterm();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!rx.has_changed().unwrap());
        assert_eq!(coordinator.state(), ShutdownState::Draining);
        assert!(!listener.is_finished());

        listener.abort();
    }
}
