//! Remote resource access.
//!
//! [`ResourceProvider`] is the seam between the screens and whatever answers
//! the remote calls. Every method maps one remote operation: a single page of
//! a listing, one batch of a describe call, a single value, or a mutation.

use async_trait::async_trait;

use crate::browser::Page;
use crate::error::FetchError;
use crate::model::{Cluster, LogEvent, LogGroup, LogStream, Profile, Secret, Service, Task};

mod aws_cli;
mod fixture;

pub use aws_cli::{AwsCliProvider, classify_cli_error};
pub use fixture::{Dataset, StaticProvider, demo_dataset};

/// Largest batch `describe_clusters` accepts.
pub const CLUSTER_BATCH: usize = 100;
/// Largest batch `describe_services` accepts.
pub const SERVICE_BATCH: usize = 10;
/// Largest batch `describe_tasks` accepts.
pub const TASK_BATCH: usize = 100;

#[async_trait]
pub trait ResourceProvider: Send + Sync {
    /// One page of log groups, optionally restricted to a name prefix.
    async fn list_log_groups(
        &self,
        profile: &Profile,
        prefix: Option<&str>,
        token: Option<String>,
    ) -> Result<Page<LogGroup>, FetchError>;

    /// The `limit` streams of a group with the most recent events, newest
    /// first.
    async fn list_log_streams(
        &self,
        profile: &Profile,
        group: &str,
        limit: usize,
    ) -> Result<Vec<LogStream>, FetchError>;

    /// The latest `limit` events of a stream, oldest first.
    async fn log_events(
        &self,
        profile: &Profile,
        group: &str,
        stream: &str,
        limit: usize,
    ) -> Result<Vec<LogEvent>, FetchError>;

    async fn list_clusters(
        &self,
        profile: &Profile,
        token: Option<String>,
    ) -> Result<Page<String>, FetchError>;

    async fn describe_clusters(
        &self,
        profile: &Profile,
        arns: Vec<String>,
    ) -> Result<Vec<Cluster>, FetchError>;

    async fn list_services(
        &self,
        profile: &Profile,
        cluster: &str,
        token: Option<String>,
    ) -> Result<Page<String>, FetchError>;

    /// Describes up to [`SERVICE_BATCH`] services. Services that no longer
    /// exist are left out of the result.
    async fn describe_services(
        &self,
        profile: &Profile,
        cluster: &str,
        arns: Vec<String>,
    ) -> Result<Vec<Service>, FetchError>;

    async fn list_tasks(
        &self,
        profile: &Profile,
        cluster: &str,
        service: &str,
        token: Option<String>,
    ) -> Result<Page<String>, FetchError>;

    async fn describe_tasks(
        &self,
        profile: &Profile,
        cluster: &str,
        arns: Vec<String>,
    ) -> Result<Vec<Task>, FetchError>;

    async fn list_secrets(
        &self,
        profile: &Profile,
        token: Option<String>,
    ) -> Result<Page<Secret>, FetchError>;

    /// The secret's string value. Binary secrets are an error.
    async fn secret_value(&self, profile: &Profile, arn: &str) -> Result<String, FetchError>;

    /// Restart every task of a service on its current task definition.
    async fn force_new_deployment(
        &self,
        profile: &Profile,
        cluster: &str,
        service: &str,
    ) -> Result<(), FetchError>;
}
