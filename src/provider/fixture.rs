use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use time::OffsetDateTime;

use super::ResourceProvider;
use crate::browser::Page;
use crate::error::FetchError;
use crate::model::{
    Cluster, Deployment, LogEvent, LogGroup, LogStream, Profile, Secret, Service, Task,
};

/// Everything a [`StaticProvider`] can answer with.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    pub log_groups: Vec<LogGroup>,
    /// Keyed by log group name, newest first.
    pub log_streams: BTreeMap<String, Vec<LogStream>>,
    /// Keyed by `(group, stream)`, oldest first.
    pub log_events: BTreeMap<(String, String), Vec<LogEvent>>,
    pub clusters: Vec<Cluster>,
    /// Keyed by cluster ARN.
    pub services: BTreeMap<String, Vec<Service>>,
    /// Keyed by service ARN.
    pub tasks: BTreeMap<String, Vec<Task>>,
    pub secrets: Vec<Secret>,
    /// Keyed by secret ARN.
    pub secret_values: BTreeMap<String, String>,
}

/// An in-memory provider that pages through a fixed [`Dataset`].
///
/// Continuation tokens are plain offsets. Every call is counted per
/// operation name, and any operation can be made to fail.
#[derive(Debug)]
pub struct StaticProvider {
    data: Mutex<Dataset>,
    page_size: usize,
    latency: Duration,
    calls: Mutex<BTreeMap<&'static str, usize>>,
    failures: Mutex<BTreeMap<&'static str, FetchError>>,
}

impl StaticProvider {
    pub fn new(data: Dataset) -> Self {
        Self {
            data: Mutex::new(data),
            page_size: 50,
            latency: Duration::ZERO,
            calls: Mutex::new(BTreeMap::new()),
            failures: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Delay every call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make every later call to `op` fail with `err`.
    pub fn fail(&self, op: &'static str, err: FetchError) {
        lock(&self.failures).insert(op, err);
    }

    pub fn clear_failures(&self) {
        lock(&self.failures).clear();
    }

    /// How many times `op` has been called.
    pub fn calls(&self, op: &str) -> usize {
        lock(&self.calls).get(op).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        lock(&self.calls).values().sum()
    }

    pub fn snapshot(&self) -> Dataset {
        lock(&self.data).clone()
    }

    async fn enter(&self, op: &'static str) -> Result<(), FetchError> {
        *lock(&self.calls).entry(op).or_insert(0) += 1;
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        match lock(&self.failures).get(op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn page<T: Clone>(
        &self,
        op: &str,
        items: &[T],
        token: Option<String>,
    ) -> Result<Page<T>, FetchError> {
        let start = match token {
            Some(t) => t
                .parse::<usize>()
                .map_err(|_| FetchError::transport(op, format!("invalid token {t:?}")))?,
            None => 0,
        };
        let start = start.min(items.len());
        let end = (start + self.page_size).min(items.len());
        Ok(Page {
            items: items[start..end].to_vec(),
            next_token: (end < items.len()).then(|| end.to_string()),
        })
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl ResourceProvider for StaticProvider {
    async fn list_log_groups(
        &self,
        _profile: &Profile,
        prefix: Option<&str>,
        token: Option<String>,
    ) -> Result<Page<LogGroup>, FetchError> {
        let op = "describe-log-groups";
        self.enter(op).await?;
        let matching: Vec<LogGroup> = lock(&self.data)
            .log_groups
            .iter()
            .filter(|g| prefix.is_none_or(|p| g.name.starts_with(p)))
            .cloned()
            .collect();
        self.page(op, &matching, token)
    }

    async fn list_log_streams(
        &self,
        _profile: &Profile,
        group: &str,
        limit: usize,
    ) -> Result<Vec<LogStream>, FetchError> {
        self.enter("describe-log-streams").await?;
        let data = lock(&self.data);
        let streams = data
            .log_streams
            .get(group)
            .ok_or_else(|| FetchError::NotFound(format!("log group {group}")))?;
        Ok(streams.iter().take(limit).cloned().collect())
    }

    async fn log_events(
        &self,
        _profile: &Profile,
        group: &str,
        stream: &str,
        limit: usize,
    ) -> Result<Vec<LogEvent>, FetchError> {
        self.enter("get-log-events").await?;
        let data = lock(&self.data);
        let events = data
            .log_events
            .get(&(group.to_string(), stream.to_string()))
            .ok_or_else(|| FetchError::NotFound(format!("log stream {stream}")))?;
        let skip = events.len().saturating_sub(limit);
        Ok(events[skip..].to_vec())
    }

    async fn list_clusters(
        &self,
        _profile: &Profile,
        token: Option<String>,
    ) -> Result<Page<String>, FetchError> {
        let op = "list-clusters";
        self.enter(op).await?;
        let arns: Vec<String> = lock(&self.data)
            .clusters
            .iter()
            .map(|c| c.arn.clone())
            .collect();
        self.page(op, &arns, token)
    }

    async fn describe_clusters(
        &self,
        _profile: &Profile,
        arns: Vec<String>,
    ) -> Result<Vec<Cluster>, FetchError> {
        self.enter("describe-clusters").await?;
        let data = lock(&self.data);
        Ok(arns
            .iter()
            .filter_map(|arn| data.clusters.iter().find(|c| &c.arn == arn))
            .cloned()
            .collect())
    }

    async fn list_services(
        &self,
        _profile: &Profile,
        cluster: &str,
        token: Option<String>,
    ) -> Result<Page<String>, FetchError> {
        let op = "list-services";
        self.enter(op).await?;
        let arns: Vec<String> = lock(&self.data)
            .services
            .get(cluster)
            .ok_or_else(|| FetchError::NotFound(format!("cluster {cluster}")))?
            .iter()
            .map(|s| s.arn.clone())
            .collect();
        self.page(op, &arns, token)
    }

    async fn describe_services(
        &self,
        _profile: &Profile,
        cluster: &str,
        arns: Vec<String>,
    ) -> Result<Vec<Service>, FetchError> {
        let op = "describe-services";
        self.enter(op).await?;
        if arns.len() > super::SERVICE_BATCH {
            return Err(FetchError::transport(op, "too many services in one call"));
        }
        let data = lock(&self.data);
        let services = data
            .services
            .get(cluster)
            .ok_or_else(|| FetchError::NotFound(format!("cluster {cluster}")))?;
        Ok(arns
            .iter()
            .filter_map(|arn| services.iter().find(|s| &s.arn == arn))
            .cloned()
            .collect())
    }

    async fn list_tasks(
        &self,
        _profile: &Profile,
        _cluster: &str,
        service: &str,
        token: Option<String>,
    ) -> Result<Page<String>, FetchError> {
        let op = "list-tasks";
        self.enter(op).await?;
        let arns: Vec<String> = lock(&self.data)
            .tasks
            .get(service)
            .map(|tasks| tasks.iter().map(|t| t.arn.clone()).collect())
            .unwrap_or_default();
        self.page(op, &arns, token)
    }

    async fn describe_tasks(
        &self,
        _profile: &Profile,
        _cluster: &str,
        arns: Vec<String>,
    ) -> Result<Vec<Task>, FetchError> {
        self.enter("describe-tasks").await?;
        let data = lock(&self.data);
        Ok(arns
            .iter()
            .filter_map(|arn| data.tasks.values().flatten().find(|t| &t.arn == arn))
            .cloned()
            .collect())
    }

    async fn list_secrets(
        &self,
        _profile: &Profile,
        token: Option<String>,
    ) -> Result<Page<Secret>, FetchError> {
        let op = "list-secrets";
        self.enter(op).await?;
        let secrets = lock(&self.data).secrets.clone();
        self.page(op, &secrets, token)
    }

    async fn secret_value(&self, _profile: &Profile, arn: &str) -> Result<String, FetchError> {
        self.enter("get-secret-value").await?;
        lock(&self.data)
            .secret_values
            .get(arn)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(format!("secret {arn}")))
    }

    async fn force_new_deployment(
        &self,
        _profile: &Profile,
        cluster: &str,
        service: &str,
    ) -> Result<(), FetchError> {
        self.enter("update-service").await?;
        let mut data = lock(&self.data);
        let svc = data
            .services
            .get_mut(cluster)
            .and_then(|all| all.iter_mut().find(|s| s.arn == service))
            .ok_or_else(|| FetchError::NotFound(format!("service {service}")))?;

        let now = OffsetDateTime::now_utc();
        let task_definition = svc
            .active_deployment()
            .map(|d| d.task_definition.clone())
            .unwrap_or_default();
        for d in &mut svc.deployments {
            if d.status == "PRIMARY" {
                d.status = "ACTIVE".to_string();
            }
        }
        let id = format!("ecs-svc/{}", svc.deployments.len() + 1);
        svc.deployments.insert(
            0,
            Deployment {
                id,
                status: "PRIMARY".to_string(),
                task_definition,
                running: 0,
                desired: svc.desired,
                pending: svc.desired,
                rollout_state: Some("IN_PROGRESS".to_string()),
                rollout_reason: Some("ECS deployment in progress.".to_string()),
                created_at: Some(now),
                updated_at: Some(now),
            },
        );
        Ok(())
    }
}

/// A small made-up account for `--demo` and for tests.
pub fn demo_dataset(now: OffsetDateTime) -> Dataset {
    let mut data = Dataset::default();
    let ago = |mins: i64| now - time::Duration::minutes(mins);

    let mut groups: Vec<String> = [
        "/aws/lambda/checkout",
        "/aws/lambda/payments",
        "/aws/lambda/thumbnails",
        "/ecs/api",
        "/ecs/web",
        "/ecs/worker",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    groups.extend((1..=58).map(|i| format!("/aws/lambda/batch-job-{i:02}")));
    groups.sort();

    for (i, name) in groups.iter().enumerate() {
        let i = i as u64;
        data.log_groups.push(LogGroup {
            name: name.clone(),
            stored_bytes: (i + 1) * 731 * 1024,
            retention_days: (i % 3 != 0).then_some(if i % 2 == 0 { 30 } else { 14 }),
        });

        let streams: Vec<LogStream> = [(5, "a1f3"), (90, "b7c2"), (60 * 30, "c9d4")]
            .iter()
            .map(|&(mins, suffix)| LogStream {
                name: format!("2024/05/01/[$LATEST]{suffix}{i:02}"),
                last_event: Some(ago(mins)),
            })
            .collect();
        for stream in &streams {
            let levels = ["INFO", "INFO", "WARN", "INFO", "ERROR"];
            let events = (0..40)
                .map(|n| LogEvent {
                    timestamp: ago(40 - n),
                    message: format!(
                        "{} request {} handled in {}ms",
                        levels[n as usize % levels.len()],
                        1000 + n,
                        12 + n * 3
                    ),
                })
                .collect();
            data.log_events
                .insert((name.clone(), stream.name.clone()), events);
        }
        data.log_streams.insert(name.clone(), streams);
    }

    let account = "arn:aws:ecs:eu-west-1:123456789012";
    for (cluster, services) in [
        ("main", vec![("api", 3, 3), ("web", 2, 2), ("worker", 1, 4)]),
        ("batch", vec![("scheduler", 1, 1)]),
    ] {
        let cluster_arn = format!("{account}:cluster/{cluster}");
        let mut running_total = 0;
        let mut pending_total = 0;
        let mut svcs = Vec::new();
        for (name, running, desired) in services {
            let arn = format!("{account}:service/{cluster}/{name}");
            let pending = desired - running;
            running_total += running;
            pending_total += pending;
            let task_definition = format!("{account}:task-definition/{name}:{}", 7 + running);
            let tasks: Vec<Task> = (0..desired + 1)
                .map(|n| Task {
                    arn: format!("{account}:task/{cluster}/{name}{n:04x}"),
                    last_status: if n < running {
                        "RUNNING"
                    } else if n < desired {
                        "PENDING"
                    } else {
                        "STOPPED"
                    }
                    .to_string(),
                    desired_status: if n < desired { "RUNNING" } else { "STOPPED" }.to_string(),
                    task_definition: task_definition.clone(),
                })
                .collect();
            data.tasks.insert(arn.clone(), tasks);
            svcs.push(Service {
                arn,
                name: name.to_string(),
                status: "ACTIVE".to_string(),
                running,
                pending,
                desired,
                deployments: vec![Deployment {
                    id: format!("ecs-svc/{name}1"),
                    status: "PRIMARY".to_string(),
                    task_definition,
                    running,
                    desired,
                    pending,
                    rollout_state: Some(
                        if running == desired { "COMPLETED" } else { "IN_PROGRESS" }.to_string(),
                    ),
                    rollout_reason: None,
                    created_at: Some(ago(60 * 26)),
                    updated_at: Some(ago(12)),
                }],
            });
        }
        data.clusters.push(Cluster {
            arn: cluster_arn.clone(),
            name: cluster.to_string(),
            status: "ACTIVE".to_string(),
            running_tasks: running_total,
            pending_tasks: pending_total,
            active_services: svcs.len() as u32,
        });
        data.services.insert(cluster_arn, svcs);
    }

    let secrets = [
        (
            "prod/db",
            Some("Primary database credentials"),
            r#"{"username":"app","password":"hunter2","port":5432,"ssl":true,"replica":null}"#,
        ),
        (
            "prod/api-keys",
            None,
            r#"{"stripe":{"live":"sk_live_x"},"keys":[1,2]}"#,
        ),
        ("staging/db", Some("Staging database"), "plain-text-password"),
        ("shared/feature-flags", None, r#"{"beta":false}"#),
    ];
    for (i, (name, description, value)) in secrets.into_iter().enumerate() {
        let arn = format!("arn:aws:secretsmanager:eu-west-1:123456789012:secret:{name}-{i}");
        data.secret_values.insert(arn.clone(), value.to_string());
        data.secrets.push(Secret {
            arn,
            name: name.to_string(),
            description: description.map(str::to_string),
            last_changed: Some(ago(60 * 24 * (i as i64 + 1))),
        });
    }

    data
}

#[cfg(test)]
#[path = "../tests/provider/fixture_tests.rs"]
mod tests;
