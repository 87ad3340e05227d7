use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::process::Command;
use tokio::time::timeout;

use super::ResourceProvider;
use crate::browser::Page;
use crate::error::FetchError;
use crate::model::{
    Cluster, Deployment, LogEvent, LogGroup, LogStream, Profile, Secret, Service, Task,
};

const NOT_FOUND_MARKERS: &[&str] = &[
    "ResourceNotFoundException",
    "ServiceNotFoundException",
    "ClusterNotFoundException",
];

/// Items requested per listing page.
const PAGE_SIZE: usize = 100;

/// Answers remote calls by running the `aws` command line tool.
#[derive(Clone, Debug)]
pub struct AwsCliProvider {
    bin: PathBuf,
    timeout: Duration,
}

impl AwsCliProvider {
    pub fn new(bin: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            bin: bin.into(),
            timeout,
        }
    }

    async fn call<W: DeserializeOwned>(
        &self,
        profile: &Profile,
        service: &str,
        op: &str,
        args: Vec<String>,
    ) -> Result<W, FetchError> {
        let stdout = self.run(profile, service, op, args).await?;
        decode(op, &stdout)
    }

    async fn run(
        &self,
        profile: &Profile,
        service: &str,
        op: &str,
        args: Vec<String>,
    ) -> Result<Vec<u8>, FetchError> {
        let mut cmd = Command::new(&self.bin);
        cmd.arg(service)
            .arg(op)
            .args(&args)
            .args(["--output", "json", "--profile", profile.name.as_str()])
            .env("AWS_PAGER", "")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(region) = &profile.region {
            cmd.args(["--region", region.as_str()]);
        }

        tracing::debug!(service, op, profile = %profile.name, "aws call");
        let output = timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| FetchError::Timeout {
                op: op.to_string(),
                secs: self.timeout.as_secs(),
            })?
            .map_err(|err| {
                FetchError::transport(op, format!("run {}: {}", self.bin.display(), err))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(service, op, status = %output.status, "aws call failed");
            return Err(classify_cli_error(op, &stderr));
        }
        Ok(output.stdout)
    }

    fn paging_args(&self, token: Option<String>) -> Vec<String> {
        let mut args = vec!["--max-items".to_string(), PAGE_SIZE.to_string()];
        if let Some(token) = token {
            args.push("--starting-token".to_string());
            args.push(token);
        }
        args
    }
}

/// Turn a failed call's stderr into a [`FetchError`].
pub fn classify_cli_error(op: &str, stderr: &str) -> FetchError {
    let message = stderr
        .lines()
        .map(str::trim)
        .rfind(|l| !l.is_empty())
        .unwrap_or("command failed")
        .to_string();
    if NOT_FOUND_MARKERS.iter().any(|m| stderr.contains(m)) {
        FetchError::NotFound(message)
    } else {
        FetchError::transport(op, message)
    }
}

fn decode<W: DeserializeOwned>(op: &str, stdout: &[u8]) -> Result<W, FetchError> {
    serde_json::from_slice(stdout)
        .map_err(|err| FetchError::transport(op, format!("unexpected response: {err}")))
}

#[async_trait]
impl ResourceProvider for AwsCliProvider {
    async fn list_log_groups(
        &self,
        profile: &Profile,
        prefix: Option<&str>,
        token: Option<String>,
    ) -> Result<Page<LogGroup>, FetchError> {
        let mut args = self.paging_args(token);
        if let Some(prefix) = prefix.filter(|p| !p.is_empty()) {
            args.push("--log-group-name-prefix".to_string());
            args.push(prefix.to_string());
        }
        let wire: wire::LogGroups = self
            .call(profile, "logs", "describe-log-groups", args)
            .await?;
        Ok(wire.into_page())
    }

    async fn list_log_streams(
        &self,
        profile: &Profile,
        group: &str,
        limit: usize,
    ) -> Result<Vec<LogStream>, FetchError> {
        let args = vec![
            "--log-group-name".to_string(),
            group.to_string(),
            "--order-by".to_string(),
            "LastEventTime".to_string(),
            "--descending".to_string(),
            "--max-items".to_string(),
            limit.to_string(),
        ];
        let wire: wire::LogStreams = self
            .call(profile, "logs", "describe-log-streams", args)
            .await?;
        Ok(wire.log_streams.into_iter().map(Into::into).collect())
    }

    async fn log_events(
        &self,
        profile: &Profile,
        group: &str,
        stream: &str,
        limit: usize,
    ) -> Result<Vec<LogEvent>, FetchError> {
        let args = vec![
            "--log-group-name".to_string(),
            group.to_string(),
            "--log-stream-name".to_string(),
            stream.to_string(),
            "--no-start-from-head".to_string(),
            "--limit".to_string(),
            limit.to_string(),
        ];
        let wire: wire::LogEvents = self.call(profile, "logs", "get-log-events", args).await?;
        Ok(wire.events.into_iter().map(Into::into).collect())
    }

    async fn list_clusters(
        &self,
        profile: &Profile,
        token: Option<String>,
    ) -> Result<Page<String>, FetchError> {
        let wire: wire::ArnPage = self
            .call(profile, "ecs", "list-clusters", self.paging_args(token))
            .await?;
        Ok(wire.into_page())
    }

    async fn describe_clusters(
        &self,
        profile: &Profile,
        arns: Vec<String>,
    ) -> Result<Vec<Cluster>, FetchError> {
        let mut args = vec!["--clusters".to_string()];
        args.extend(arns);
        args.extend(["--include".to_string(), "STATISTICS".to_string()]);
        let wire: wire::Clusters = self.call(profile, "ecs", "describe-clusters", args).await?;
        Ok(wire.clusters.into_iter().map(Into::into).collect())
    }

    async fn list_services(
        &self,
        profile: &Profile,
        cluster: &str,
        token: Option<String>,
    ) -> Result<Page<String>, FetchError> {
        let mut args = vec!["--cluster".to_string(), cluster.to_string()];
        args.extend(self.paging_args(token));
        let wire: wire::ArnPage = self.call(profile, "ecs", "list-services", args).await?;
        Ok(wire.into_page())
    }

    async fn describe_services(
        &self,
        profile: &Profile,
        cluster: &str,
        arns: Vec<String>,
    ) -> Result<Vec<Service>, FetchError> {
        let mut args = vec![
            "--cluster".to_string(),
            cluster.to_string(),
            "--services".to_string(),
        ];
        args.extend(arns);
        let wire: wire::Services = self.call(profile, "ecs", "describe-services", args).await?;
        Ok(wire.services.into_iter().map(Into::into).collect())
    }

    async fn list_tasks(
        &self,
        profile: &Profile,
        cluster: &str,
        service: &str,
        token: Option<String>,
    ) -> Result<Page<String>, FetchError> {
        let mut args = vec![
            "--cluster".to_string(),
            cluster.to_string(),
            "--service-name".to_string(),
            service.to_string(),
        ];
        args.extend(self.paging_args(token));
        let wire: wire::ArnPage = self.call(profile, "ecs", "list-tasks", args).await?;
        Ok(wire.into_page())
    }

    async fn describe_tasks(
        &self,
        profile: &Profile,
        cluster: &str,
        arns: Vec<String>,
    ) -> Result<Vec<Task>, FetchError> {
        let mut args = vec![
            "--cluster".to_string(),
            cluster.to_string(),
            "--tasks".to_string(),
        ];
        args.extend(arns);
        let wire: wire::Tasks = self.call(profile, "ecs", "describe-tasks", args).await?;
        Ok(wire.tasks.into_iter().map(Into::into).collect())
    }

    async fn list_secrets(
        &self,
        profile: &Profile,
        token: Option<String>,
    ) -> Result<Page<Secret>, FetchError> {
        let wire: wire::Secrets = self
            .call(profile, "secretsmanager", "list-secrets", self.paging_args(token))
            .await?;
        Ok(wire.into_page())
    }

    async fn secret_value(&self, profile: &Profile, arn: &str) -> Result<String, FetchError> {
        let op = "get-secret-value";
        let args = vec!["--secret-id".to_string(), arn.to_string()];
        let wire: wire::SecretValue = self.call(profile, "secretsmanager", op, args).await?;
        wire.secret_string.ok_or_else(|| {
            FetchError::transport(op, "secret has no string value (binary secrets not supported)")
        })
    }

    async fn force_new_deployment(
        &self,
        profile: &Profile,
        cluster: &str,
        service: &str,
    ) -> Result<(), FetchError> {
        let args = vec![
            "--cluster".to_string(),
            cluster.to_string(),
            "--service".to_string(),
            service.to_string(),
            "--force-new-deployment".to_string(),
        ];
        self.run(profile, "ecs", "update-service", args).await?;
        tracing::info!(cluster, service, "forced new deployment");
        Ok(())
    }
}

/// JSON shapes printed by the CLI.
pub(crate) mod wire {
    use super::*;

    fn or_unknown(name: Option<String>) -> String {
        name.unwrap_or_else(|| "(unknown)".to_string())
    }

    fn millis(ms: i64) -> Option<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(ms) * 1_000_000).ok()
    }

    /// A date printed either as RFC 3339 text or as epoch seconds.
    #[derive(Clone, Debug, Deserialize)]
    #[serde(untagged)]
    pub(crate) enum Stamp {
        Text(String),
        Epoch(f64),
    }

    impl Stamp {
        pub(crate) fn to_datetime(&self) -> Option<OffsetDateTime> {
            match self {
                Stamp::Text(s) => OffsetDateTime::parse(s, &Rfc3339).ok(),
                Stamp::Epoch(secs) => {
                    OffsetDateTime::from_unix_timestamp_nanos((secs * 1e9) as i128).ok()
                }
            }
        }
    }

    fn stamp(s: Option<Stamp>) -> Option<OffsetDateTime> {
        s.as_ref().and_then(Stamp::to_datetime)
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub(crate) struct LogGroups {
        pub(crate) log_groups: Vec<LogGroupWire>,
        #[serde(alias = "NextToken")]
        pub(crate) next_token: Option<String>,
    }

    impl LogGroups {
        pub(crate) fn into_page(self) -> Page<LogGroup> {
            Page {
                items: self.log_groups.into_iter().map(Into::into).collect(),
                next_token: self.next_token,
            }
        }
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub(crate) struct LogGroupWire {
        log_group_name: Option<String>,
        stored_bytes: Option<u64>,
        retention_in_days: Option<u32>,
    }

    impl From<LogGroupWire> for LogGroup {
        fn from(w: LogGroupWire) -> Self {
            LogGroup {
                name: or_unknown(w.log_group_name),
                stored_bytes: w.stored_bytes.unwrap_or(0),
                retention_days: w.retention_in_days,
            }
        }
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub(crate) struct LogStreams {
        pub(crate) log_streams: Vec<LogStreamWire>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub(crate) struct LogStreamWire {
        log_stream_name: Option<String>,
        last_event_timestamp: Option<i64>,
    }

    impl From<LogStreamWire> for LogStream {
        fn from(w: LogStreamWire) -> Self {
            LogStream {
                name: or_unknown(w.log_stream_name),
                last_event: w.last_event_timestamp.and_then(millis),
            }
        }
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    pub(crate) struct LogEvents {
        pub(crate) events: Vec<LogEventWire>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    pub(crate) struct LogEventWire {
        timestamp: Option<i64>,
        message: Option<String>,
    }

    impl From<LogEventWire> for LogEvent {
        fn from(w: LogEventWire) -> Self {
            LogEvent {
                timestamp: w
                    .timestamp
                    .and_then(millis)
                    .unwrap_or(OffsetDateTime::UNIX_EPOCH),
                message: w.message.unwrap_or_default(),
            }
        }
    }

    /// `list-clusters`, `list-services` and `list-tasks` all page ARNs.
    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub(crate) struct ArnPage {
        #[serde(alias = "clusterArns", alias = "serviceArns", alias = "taskArns")]
        pub(crate) arns: Vec<String>,
        #[serde(alias = "NextToken")]
        pub(crate) next_token: Option<String>,
    }

    impl ArnPage {
        pub(crate) fn into_page(self) -> Page<String> {
            Page {
                items: self.arns,
                next_token: self.next_token,
            }
        }
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    pub(crate) struct Clusters {
        pub(crate) clusters: Vec<ClusterWire>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub(crate) struct ClusterWire {
        cluster_arn: Option<String>,
        cluster_name: Option<String>,
        status: Option<String>,
        running_tasks_count: u32,
        pending_tasks_count: u32,
        active_services_count: u32,
    }

    impl From<ClusterWire> for Cluster {
        fn from(w: ClusterWire) -> Self {
            Cluster {
                arn: w.cluster_arn.unwrap_or_default(),
                name: or_unknown(w.cluster_name),
                status: w.status.unwrap_or_else(|| "UNKNOWN".to_string()),
                running_tasks: w.running_tasks_count,
                pending_tasks: w.pending_tasks_count,
                active_services: w.active_services_count,
            }
        }
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    pub(crate) struct Services {
        pub(crate) services: Vec<ServiceWire>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub(crate) struct ServiceWire {
        service_arn: Option<String>,
        service_name: Option<String>,
        status: Option<String>,
        running_count: u32,
        pending_count: u32,
        desired_count: u32,
        deployments: Vec<DeploymentWire>,
    }

    impl From<ServiceWire> for Service {
        fn from(w: ServiceWire) -> Self {
            Service {
                arn: w.service_arn.unwrap_or_default(),
                name: or_unknown(w.service_name),
                status: w.status.unwrap_or_else(|| "UNKNOWN".to_string()),
                running: w.running_count,
                pending: w.pending_count,
                desired: w.desired_count,
                deployments: w.deployments.into_iter().map(Into::into).collect(),
            }
        }
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub(crate) struct DeploymentWire {
        id: Option<String>,
        status: Option<String>,
        task_definition: Option<String>,
        running_count: u32,
        desired_count: u32,
        pending_count: u32,
        rollout_state: Option<String>,
        rollout_state_reason: Option<String>,
        created_at: Option<Stamp>,
        updated_at: Option<Stamp>,
    }

    impl From<DeploymentWire> for Deployment {
        fn from(w: DeploymentWire) -> Self {
            Deployment {
                id: w.id.unwrap_or_default(),
                status: w.status.unwrap_or_else(|| "UNKNOWN".to_string()),
                task_definition: w.task_definition.unwrap_or_default(),
                running: w.running_count,
                desired: w.desired_count,
                pending: w.pending_count,
                rollout_state: w.rollout_state,
                rollout_reason: w.rollout_state_reason,
                created_at: stamp(w.created_at),
                updated_at: stamp(w.updated_at),
            }
        }
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    pub(crate) struct Tasks {
        pub(crate) tasks: Vec<TaskWire>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub(crate) struct TaskWire {
        task_arn: Option<String>,
        last_status: Option<String>,
        desired_status: Option<String>,
        task_definition_arn: Option<String>,
    }

    impl From<TaskWire> for Task {
        fn from(w: TaskWire) -> Self {
            Task {
                arn: w.task_arn.unwrap_or_default(),
                last_status: w.last_status.unwrap_or_else(|| "UNKNOWN".to_string()),
                desired_status: w.desired_status.unwrap_or_else(|| "UNKNOWN".to_string()),
                task_definition: w.task_definition_arn.unwrap_or_default(),
            }
        }
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "PascalCase", default)]
    pub(crate) struct Secrets {
        pub(crate) secret_list: Vec<SecretWire>,
        pub(crate) next_token: Option<String>,
    }

    impl Secrets {
        pub(crate) fn into_page(self) -> Page<Secret> {
            Page {
                items: self.secret_list.into_iter().map(Into::into).collect(),
                next_token: self.next_token,
            }
        }
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "PascalCase", default)]
    pub(crate) struct SecretWire {
        #[serde(rename = "ARN")]
        arn: Option<String>,
        name: Option<String>,
        description: Option<String>,
        last_changed_date: Option<Stamp>,
    }

    impl From<SecretWire> for Secret {
        fn from(w: SecretWire) -> Self {
            Secret {
                arn: w.arn.unwrap_or_default(),
                name: or_unknown(w.name),
                description: w.description.filter(|d| !d.is_empty()),
                last_changed: stamp(w.last_changed_date),
            }
        }
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "PascalCase", default)]
    pub(crate) struct SecretValue {
        pub(crate) secret_string: Option<String>,
    }
}

#[cfg(test)]
#[path = "../tests/provider/aws_cli_tests.rs"]
mod tests;
