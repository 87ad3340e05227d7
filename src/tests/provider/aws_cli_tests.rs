use super::*;

#[test]
fn log_groups_page_keeps_cli_token() {
    let json = br#"{
        "logGroups": [
            {"logGroupName": "/aws/lambda/api", "storedBytes": 2048, "retentionInDays": 14},
            {"logGroupName": "/ecs/web"}
        ],
        "NextToken": "eyJuZXh0IjoxfQ=="
    }"#;
    let page = decode::<wire::LogGroups>("describe-log-groups", json)
        .unwrap()
        .into_page();
    assert_eq!(page.next_token.as_deref(), Some("eyJuZXh0IjoxfQ=="));
    assert_eq!(
        page.items,
        vec![
            LogGroup {
                name: "/aws/lambda/api".to_string(),
                stored_bytes: 2048,
                retention_days: Some(14),
            },
            LogGroup {
                name: "/ecs/web".to_string(),
                stored_bytes: 0,
                retention_days: None,
            },
        ]
    );
}

#[test]
fn arn_pages_accept_every_listing_shape() {
    for (field, op) in [
        ("clusterArns", "list-clusters"),
        ("serviceArns", "list-services"),
        ("taskArns", "list-tasks"),
    ] {
        let json = format!(r#"{{"{field}": ["arn:a", "arn:b"]}}"#);
        let page = decode::<wire::ArnPage>(op, json.as_bytes()).unwrap().into_page();
        assert_eq!(page.items, vec!["arn:a", "arn:b"]);
        assert_eq!(page.next_token, None);
    }
}

#[test]
fn deployments_parse_text_and_epoch_dates() {
    let json = br#"{
        "services": [{
            "serviceArn": "arn:aws:ecs:eu-west-1:1:service/main/web",
            "serviceName": "web",
            "status": "ACTIVE",
            "runningCount": 2, "pendingCount": 1, "desiredCount": 3,
            "deployments": [
                {"id": "ecs-svc/1", "status": "PRIMARY",
                 "taskDefinition": "arn:aws:ecs:eu-west-1:1:task-definition/web:42",
                 "runningCount": 2, "desiredCount": 3, "pendingCount": 1,
                 "rolloutState": "IN_PROGRESS",
                 "createdAt": "2024-03-01T10:00:00.250000+00:00",
                 "updatedAt": 1709287200.5}
            ]
        }],
        "failures": [{"arn": "arn:gone", "reason": "MISSING"}]
    }"#;
    let services: Vec<Service> = decode::<wire::Services>("describe-services", json)
        .unwrap()
        .services
        .into_iter()
        .map(Into::into)
        .collect();
    assert_eq!(services.len(), 1);
    let deployment = services[0].active_deployment().unwrap();
    assert_eq!(deployment.short_task_definition(), "web:42");
    assert_eq!(deployment.rollout_state.as_deref(), Some("IN_PROGRESS"));
    assert_eq!(
        deployment.created_at.map(|t| t.unix_timestamp()),
        Some(1_709_287_200)
    );
    assert_eq!(
        deployment.updated_at.map(|t| t.unix_timestamp()),
        Some(1_709_287_200)
    );
}

#[test]
fn secrets_use_pascal_case_fields() {
    let json = br#"{
        "SecretList": [
            {"ARN": "arn:s:1", "Name": "prod/db", "Description": "", "LastChangedDate": "2024-01-01T00:00:00Z"}
        ],
        "NextToken": "t2"
    }"#;
    let page = decode::<wire::Secrets>("list-secrets", json).unwrap().into_page();
    assert_eq!(page.next_token.as_deref(), Some("t2"));
    let secret = &page.items[0];
    assert_eq!(secret.arn, "arn:s:1");
    assert_eq!(secret.name, "prod/db");
    assert_eq!(secret.description, None);
    assert!(secret.last_changed.is_some());
}

#[test]
fn log_event_millis_become_datetimes() {
    let json = br#"{"events": [{"timestamp": 1700000000123, "message": "ERROR boom\n"}]}"#;
    let events: Vec<LogEvent> = decode::<wire::LogEvents>("get-log-events", json)
        .unwrap()
        .events
        .into_iter()
        .map(Into::into)
        .collect();
    assert_eq!(events[0].timestamp.unix_timestamp(), 1_700_000_000);
    assert_eq!(events[0].timestamp.millisecond(), 123);
    assert_eq!(events[0].message, "ERROR boom\n");
}

#[test]
fn malformed_output_is_a_transport_error() {
    let err = decode::<wire::Clusters>("describe-clusters", b"not json").unwrap_err();
    match err {
        FetchError::Transport { op, message } => {
            assert_eq!(op, "describe-clusters");
            assert!(message.starts_with("unexpected response"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn not_found_exceptions_are_classified() {
    let stderr = "\nAn error occurred (ResourceNotFoundException) when calling the \
                  GetLogEvents operation: The specified log stream does not exist.\n";
    let err = classify_cli_error("get-log-events", stderr);
    assert!(err.is_not_found());
    assert_eq!(
        err.to_string(),
        "not found: An error occurred (ResourceNotFoundException) when calling the \
         GetLogEvents operation: The specified log stream does not exist."
    );

    for marker in ["ServiceNotFoundException", "ClusterNotFoundException"] {
        let err = classify_cli_error("describe-services", &format!("An error occurred ({marker})"));
        assert!(err.is_not_found(), "{marker}");
    }
}

#[test]
fn other_failures_keep_the_last_stderr_line() {
    let stderr = "warning: something\nAn error occurred (AccessDeniedException): nope\n\n";
    assert_eq!(
        classify_cli_error("list-secrets", stderr),
        FetchError::transport("list-secrets", "An error occurred (AccessDeniedException): nope")
    );
    assert_eq!(
        classify_cli_error("list-secrets", ""),
        FetchError::transport("list-secrets", "command failed")
    );
}
