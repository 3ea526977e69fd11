//! Background work launched from handlers

#[cfg(test)]
mod tests {
    use eiga_api::core::BackgroundTaskTracker;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::watch;
    use tokio_test::assert_pending;

    #[tokio::test]
    async fn test_wait_covers_jobs_started_before_it() {
        let tracker = BackgroundTaskTracker::new();
        let finished = Arc::new(AtomicUsize::new(0));
        let (release, _) = watch::channel(false);

        for _ in 0..3 {
            let finished = Arc::clone(&finished);
            let mut gate = release.subscribe();
            tracker.run("held", move || async move {
                gate.wait_for(|open| *open)
                    .await
                    .map_err(|e| e.to_string())?;
                finished.fetch_add(1, Ordering::SeqCst);
                Ok::<(), String>(())
            });
        }
        assert_eq!(tracker.outstanding(), 3);

        let mut wait = tokio_test::task::spawn(tracker.wait());
        assert_pending!(wait.poll());

        release.send_replace(true);
        tokio::time::timeout(Duration::from_secs(5), tracker.wait())
            .await
            .expect("jobs drained");

        assert_eq!(finished.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.outstanding(), 0);
    }

    #[tokio::test]
    async fn test_faulting_jobs_do_not_block_wait() {
        let tracker = BackgroundTaskTracker::new();

        tracker.run("panics", || async { deliver_through_broken_relay() });
        tracker.run("fails", || async { Err::<(), _>("smtp 554".to_string()) });

        tokio::time::timeout(Duration::from_secs(5), tracker.wait())
            .await
            .expect("faulted jobs still count down");
        assert_eq!(tracker.outstanding(), 0);
    }

    fn deliver_through_broken_relay() -> Result<(), String> {
        panic!("mail relay exploded")
    }
}
