//! Whole-collection fetches built from single provider calls.

use std::sync::Arc;

use crate::browser::{FetchMode, Fetched, collect_pages, fetch_all};
use crate::error::FetchError;
use crate::model::{
    Cluster, LogEvent, LogGroup, LogStream, Profile, Secret, Service, ServiceDetail, Task,
};
use crate::provider::{CLUSTER_BATCH, ResourceProvider, SERVICE_BATCH, TASK_BATCH};

pub type SharedProvider = Arc<dyn ResourceProvider>;

/// The first `cap` log groups whose names start with `prefix`.
pub async fn log_groups(
    provider: SharedProvider,
    profile: Profile,
    prefix: String,
    cap: usize,
) -> Result<Fetched<LogGroup>, FetchError> {
    let p = provider.as_ref();
    let prof = &profile;
    let prefix = Some(prefix.as_str()).filter(|s| !s.is_empty());
    collect_pages(
        move |token| p.list_log_groups(prof, prefix, token),
        FetchMode::Capped(cap),
    )
    .await
}

pub async fn log_streams(
    provider: SharedProvider,
    profile: Profile,
    group: String,
    limit: usize,
) -> Result<Fetched<LogStream>, FetchError> {
    let streams = provider.list_log_streams(&profile, &group, limit).await?;
    Ok(Fetched::complete(streams))
}

pub async fn log_events(
    provider: SharedProvider,
    profile: Profile,
    group: String,
    stream: String,
    limit: usize,
) -> Result<Fetched<LogEvent>, FetchError> {
    let events = provider.log_events(&profile, &group, &stream, limit).await?;
    Ok(Fetched::complete(events))
}

pub async fn clusters(
    provider: SharedProvider,
    profile: Profile,
) -> Result<Fetched<Cluster>, FetchError> {
    let p = provider.as_ref();
    let prof = &profile;
    fetch_all(
        move |token| p.list_clusters(prof, token),
        move |arns| p.describe_clusters(prof, arns),
        CLUSTER_BATCH,
        FetchMode::All,
    )
    .await
}

pub async fn services(
    provider: SharedProvider,
    profile: Profile,
    cluster: String,
) -> Result<Fetched<Service>, FetchError> {
    let p = provider.as_ref();
    let prof = &profile;
    let cluster = cluster.as_str();
    fetch_all(
        move |token| p.list_services(prof, cluster, token),
        move |arns| p.describe_services(prof, cluster, arns),
        SERVICE_BATCH,
        FetchMode::All,
    )
    .await
}

pub async fn tasks(
    provider: SharedProvider,
    profile: Profile,
    cluster: String,
    service: String,
) -> Result<Fetched<Task>, FetchError> {
    let p = provider.as_ref();
    let prof = &profile;
    let (cluster, service) = (cluster.as_str(), service.as_str());
    fetch_all(
        move |token| p.list_tasks(prof, cluster, service, token),
        move |arns| p.describe_tasks(prof, cluster, arns),
        TASK_BATCH,
        FetchMode::All,
    )
    .await
}

/// One service plus all of its tasks, fetched concurrently.
pub async fn service_detail(
    provider: SharedProvider,
    profile: Profile,
    cluster: String,
    service: String,
) -> Result<ServiceDetail, FetchError> {
    let describe = provider.describe_services(&profile, &cluster, vec![service.clone()]);
    let tasks = tasks(
        provider.clone(),
        profile.clone(),
        cluster.clone(),
        service.clone(),
    );
    let (described, tasks) = futures::try_join!(describe, tasks)?;

    let service = described
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::NotFound(format!("service {service}")))?;
    Ok(ServiceDetail {
        service,
        tasks: tasks.items,
    })
}

pub async fn secrets(
    provider: SharedProvider,
    profile: Profile,
) -> Result<Fetched<Secret>, FetchError> {
    let p = provider.as_ref();
    let prof = &profile;
    collect_pages(move |token| p.list_secrets(prof, token), FetchMode::All).await
}

pub async fn secret_value(
    provider: SharedProvider,
    profile: Profile,
    arn: String,
) -> Result<String, FetchError> {
    provider.secret_value(&profile, &arn).await
}

pub async fn force_new_deployment(
    provider: SharedProvider,
    profile: Profile,
    cluster: String,
    service: String,
) -> Result<(), FetchError> {
    provider
        .force_new_deployment(&profile, &cluster, &service)
        .await
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
