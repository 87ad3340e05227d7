use super::*;

fn profile() -> Profile {
    Profile::new("demo", Some("eu-west-1".to_string()))
}

fn provider() -> StaticProvider {
    StaticProvider::new(demo_dataset(OffsetDateTime::UNIX_EPOCH + time::Duration::days(20_000)))
}

#[tokio::test]
async fn log_group_pages_chain_through_offsets() {
    let p = provider().with_page_size(20);
    let first = p.list_log_groups(&profile(), None, None).await.unwrap();
    assert_eq!(first.items.len(), 20);
    assert_eq!(first.next_token.as_deref(), Some("20"));

    let last = p
        .list_log_groups(&profile(), None, Some("60".to_string()))
        .await
        .unwrap();
    assert_eq!(last.items.len(), 4);
    assert_eq!(last.next_token, None);
    assert_eq!(p.calls("describe-log-groups"), 2);
}

#[tokio::test]
async fn log_group_prefix_narrows_listing() {
    let p = provider();
    let page = p
        .list_log_groups(&profile(), Some("/ecs/"), None)
        .await
        .unwrap();
    let names: Vec<&str> = page.items.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["/ecs/api", "/ecs/web", "/ecs/worker"]);
}

#[tokio::test]
async fn bad_token_is_a_transport_error() {
    let p = provider();
    let err = p
        .list_secrets(&profile(), Some("nope".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Transport { .. }));
}

#[tokio::test]
async fn unknown_parents_are_not_found() {
    let p = provider();
    assert!(
        p.list_log_streams(&profile(), "/missing", 50)
            .await
            .unwrap_err()
            .is_not_found()
    );
    assert!(
        p.list_services(&profile(), "arn:missing", None)
            .await
            .unwrap_err()
            .is_not_found()
    );
    assert!(
        p.secret_value(&profile(), "arn:missing")
            .await
            .unwrap_err()
            .is_not_found()
    );
}

#[tokio::test]
async fn log_events_return_latest_slice() {
    let p = provider();
    let streams = p.list_log_streams(&profile(), "/ecs/api", 50).await.unwrap();
    assert_eq!(streams.len(), 3);
    assert!(streams[0].last_event > streams[1].last_event);

    let events = p
        .log_events(&profile(), "/ecs/api", &streams[0].name, 10)
        .await
        .unwrap();
    assert_eq!(events.len(), 10);
    assert!(events[0].timestamp < events[9].timestamp);
    assert!(events[9].message.contains("request 1039"));
}

#[tokio::test]
async fn injected_failures_apply_until_cleared() {
    let p = provider();
    p.fail("list-clusters", FetchError::transport("list-clusters", "throttled"));
    assert_eq!(
        p.list_clusters(&profile(), None).await.unwrap_err(),
        FetchError::transport("list-clusters", "throttled")
    );
    p.clear_failures();
    assert_eq!(p.list_clusters(&profile(), None).await.unwrap().items.len(), 2);
    assert_eq!(p.calls("list-clusters"), 2);
    assert_eq!(p.total_calls(), 2);
}

#[tokio::test]
async fn describe_services_rejects_oversized_batches() {
    let p = provider();
    let cluster = p.snapshot().clusters[0].arn.clone();
    let arns = vec!["arn:x".to_string(); 11];
    assert!(p.describe_services(&profile(), &cluster, arns).await.is_err());
}

#[tokio::test]
async fn force_new_deployment_starts_a_primary_rollout() {
    let p = provider();
    let data = p.snapshot();
    let cluster = data.clusters[0].arn.clone();
    let service = data.services[&cluster][0].clone();

    p.force_new_deployment(&profile(), &cluster, &service.arn)
        .await
        .unwrap();

    let after = p
        .describe_services(&profile(), &cluster, vec![service.arn.clone()])
        .await
        .unwrap();
    let svc = &after[0];
    assert_eq!(svc.deployments.len(), 2);
    let active = svc.active_deployment().unwrap();
    assert_eq!(active.rollout_state.as_deref(), Some("IN_PROGRESS"));
    assert_eq!(active.running, 0);
    assert_eq!(svc.deployments[1].status, "ACTIVE");

    assert!(
        p.force_new_deployment(&profile(), &cluster, "arn:missing")
            .await
            .unwrap_err()
            .is_not_found()
    );
}
