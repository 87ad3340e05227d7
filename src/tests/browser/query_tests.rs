use std::time::Duration;

use tokio::time::sleep;

use super::*;

fn runner() -> QueryRunner<String, u32> {
    QueryRunner::new(None)
}

#[tokio::test(start_paused = true)]
async fn later_key_wins_when_earlier_settles_last() {
    let mut q = runner();
    assert!(q.run("a".to_string(), || async {
        sleep(Duration::from_millis(300)).await;
        Ok::<_, FetchError>(1)
    }));
    assert!(q.run("b".to_string(), || async {
        sleep(Duration::from_millis(100)).await;
        Ok::<_, FetchError>(2)
    }));
    assert!(q.status().is_loading());

    sleep(Duration::from_millis(150)).await;
    assert!(q.poll());
    assert_eq!(q.status(), &QueryStatus::Ready(2));

    sleep(Duration::from_millis(200)).await;
    assert!(!q.poll());
    assert_eq!(q.status(), &QueryStatus::Ready(2));
    assert_eq!(q.key().map(String::as_str), Some("b"));
}

#[tokio::test(start_paused = true)]
async fn unchanged_key_does_not_refetch() {
    let mut q = runner();
    assert!(q.run("k".to_string(), || async { Ok::<_, FetchError>(1) }));
    assert!(!q.run("k".to_string(), || async { Ok::<_, FetchError>(2) }));
    assert_eq!(q.started(), 1);

    sleep(Duration::from_millis(1)).await;
    q.poll();
    assert_eq!(q.status(), &QueryStatus::Ready(1));
}

#[tokio::test(start_paused = true)]
async fn failure_becomes_status_and_next_key_clears_it() {
    let mut q = runner();
    q.run("bad".to_string(), || async {
        Err::<u32, _>(FetchError::transport("ListThings", "throttled"))
    });
    sleep(Duration::from_millis(1)).await;
    q.poll();
    assert_eq!(
        q.status().error(),
        Some(&FetchError::transport("ListThings", "throttled"))
    );

    q.run("good".to_string(), || async { Ok::<_, FetchError>(7) });
    assert!(q.status().is_loading());
    assert_eq!(q.status().error(), None);
    sleep(Duration::from_millis(1)).await;
    q.poll();
    assert_eq!(q.status().ready(), Some(&7));
}

#[tokio::test(start_paused = true)]
async fn clear_discards_in_flight_result() {
    let mut q = runner();
    q.run("k".to_string(), || async {
        sleep(Duration::from_millis(50)).await;
        Ok::<_, FetchError>(1)
    });
    q.clear();
    assert_eq!(q.status(), &QueryStatus::Idle);

    sleep(Duration::from_millis(100)).await;
    assert!(!q.poll());
    assert_eq!(q.status(), &QueryStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn rerunning_an_old_key_after_clear_fetches_again() {
    let mut q = runner();
    q.run("k".to_string(), || async { Ok::<_, FetchError>(1) });
    q.clear();
    assert!(q.run("k".to_string(), || async { Ok::<_, FetchError>(2) }));
    assert_eq!(q.started(), 2);
}

#[tokio::test]
async fn settling_query_wakes_the_loop() {
    let wake = Arc::new(Notify::new());
    let mut q: QueryRunner<String, u32> = QueryRunner::new(Some(wake.clone()));
    q.run("k".to_string(), || async { Ok::<_, FetchError>(3) });

    tokio::time::timeout(Duration::from_secs(5), wake.notified())
        .await
        .expect("query should notify on settle");
    assert!(q.poll());
    assert_eq!(q.status().ready(), Some(&3));
}

#[test]
fn settle_ignores_mismatched_key() {
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    rt.block_on(async {
        let mut q = runner();
        q.run("current".to_string(), std::future::pending::<Result<u32, FetchError>>);
        assert!(!q.settle("older".to_string(), Ok(9)));
        assert!(q.status().is_loading());
        assert!(q.settle("current".to_string(), Ok(4)));
        assert_eq!(q.status().ready(), Some(&4));
    });
}
