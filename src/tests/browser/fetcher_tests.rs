use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::*;

fn paged(ids: Vec<u32>, page_size: usize) -> impl FnMut(Option<String>) -> std::future::Ready<Result<Page<u32>, FetchError>> {
    move |token: Option<String>| {
        let start: usize = token.map(|t| t.parse().expect("numeric token")).unwrap_or(0);
        let end = (start + page_size).min(ids.len());
        let next_token = (end < ids.len()).then(|| end.to_string());
        std::future::ready(Ok(Page {
            items: ids[start..end].to_vec(),
            next_token,
        }))
    }
}

#[tokio::test]
async fn merges_all_pages_in_batches_preserving_order() {
    let ids: Vec<u32> = (1..=237).collect();
    let batches = Arc::new(Mutex::new(Vec::new()));

    let seen = batches.clone();
    let out = fetch_all(
        paged(ids.clone(), 50),
        move |chunk: Vec<u32>| {
            seen.lock().unwrap().push(chunk.len());
            async move {
                Ok::<_, FetchError>(chunk.into_iter().map(|id| format!("r{id}")).collect::<Vec<String>>())
            }
        },
        100,
        FetchMode::All,
    )
    .await
    .unwrap();

    assert!(!out.has_more);
    assert_eq!(out.items.len(), 237);
    let expected: Vec<String> = ids.iter().map(|id| format!("r{id}")).collect();
    assert_eq!(out.items, expected);
    assert_eq!(*batches.lock().unwrap(), vec![100, 100, 37]);
}

#[tokio::test(start_paused = true)]
async fn output_follows_chunk_order_not_completion_order() {
    let ids: Vec<u32> = (0..30).collect();
    let out = fetch_all(
        paged(ids, 7),
        |chunk: Vec<u32>| async move {
            // Earlier chunks finish last.
            let delay = 100 - u64::from(chunk[0]);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok::<_, FetchError>(chunk)
        },
        10,
        FetchMode::All,
    )
    .await
    .unwrap();

    assert_eq!(out.items, (0..30).collect::<Vec<_>>());
}

#[tokio::test]
async fn list_pages_are_requested_with_the_previous_token() {
    let tokens = Arc::new(Mutex::new(Vec::new()));
    let mut inner = paged((0..120).collect(), 50);
    let seen = tokens.clone();
    let out = collect_pages(
        move |token: Option<String>| {
            seen.lock().unwrap().push(token.clone());
            inner(token)
        },
        FetchMode::All,
    )
    .await
    .unwrap();

    assert_eq!(out.items.len(), 120);
    assert_eq!(
        *tokens.lock().unwrap(),
        vec![None, Some("50".to_string()), Some("100".to_string())]
    );
}

#[tokio::test]
async fn capped_mode_truncates_and_flags_more() {
    let out = collect_pages(paged((0..500).collect(), 40), FetchMode::Capped(50))
        .await
        .unwrap();
    assert_eq!(out.items.len(), 50);
    assert_eq!(out.items.last(), Some(&49));
    assert!(out.has_more);
}

#[tokio::test]
async fn capped_mode_without_leftovers_is_complete() {
    let out = collect_pages(paged((0..50).collect(), 50), FetchMode::Capped(50))
        .await
        .unwrap();
    assert_eq!(out.items.len(), 50);
    assert!(!out.has_more);

    let out = collect_pages(paged((0..12).collect(), 5), FetchMode::Capped(50))
        .await
        .unwrap();
    assert_eq!(out.items.len(), 12);
    assert!(!out.has_more);
}

#[tokio::test]
async fn empty_listing_skips_describe() {
    let calls = Arc::new(Mutex::new(0usize));
    let seen = calls.clone();
    let out = fetch_all(
        paged(Vec::new(), 50),
        move |chunk: Vec<u32>| {
            *seen.lock().unwrap() += 1;
            async move { Ok::<_, FetchError>(chunk) }
        },
        100,
        FetchMode::All,
    )
    .await
    .unwrap();

    assert!(out.is_empty());
    assert_eq!(*calls.lock().unwrap(), 0);
}

#[tokio::test]
async fn describe_failure_discards_partial_results() {
    let err = fetch_all(
        paged((0..25).collect(), 25),
        |chunk: Vec<u32>| async move {
            if chunk[0] == 10 {
                Err(FetchError::transport("describe", "throttled"))
            } else {
                Ok::<_, FetchError>(chunk)
            }
        },
        10,
        FetchMode::All,
    )
    .await
    .unwrap_err();

    assert_eq!(err, FetchError::transport("describe", "throttled"));
}

#[tokio::test]
async fn list_failure_aborts_before_describe() {
    let mut calls = 0;
    let err = collect_pages(
        |token: Option<String>| {
            calls += 1;
            let out = match token {
                None => Ok(Page {
                    items: vec![1, 2],
                    next_token: Some("next".to_string()),
                }),
                Some(_) => Err(FetchError::transport("list", "access denied")),
            };
            std::future::ready(out)
        },
        FetchMode::All,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, FetchError::Transport { .. }));
    assert_eq!(calls, 2);
}
