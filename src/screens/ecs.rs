use futures::FutureExt;
use time::OffsetDateTime;

use super::ScreenContext;
use super::list::Listing;
use crate::browser::{
    BrowsableResource, FilterMode, LoadRequest, Loader, NavAction, ResourceBrowser,
};
use crate::catalog;
use crate::model::{Cluster, ScreenId, ScreenParams, Service, param};
use crate::view::{Row, Tone};

pub(crate) fn cluster_tone(cluster: &Cluster) -> Tone {
    if cluster.status != "ACTIVE" {
        Tone::Bad
    } else if cluster.pending_tasks > 0 {
        Tone::Warn
    } else {
        Tone::Good
    }
}

pub(crate) fn service_tone(service: &Service) -> Tone {
    if service.running == 0 {
        Tone::Bad
    } else if service.pending == 0 && service.running == service.desired {
        Tone::Good
    } else {
        Tone::Warn
    }
}

impl BrowsableResource for Cluster {
    const NOUN: &'static str = "ECS clusters";
    const FILTER: FilterMode = FilterMode::Off;

    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
    }

    fn row(&self, _now: OffsetDateTime) -> Row {
        Row::text(self.name.clone())
            .cell(format!("● {}", self.status), cluster_tone(self))
            .cell(
                format!(
                    "{} services · {} pending tasks",
                    self.active_services, self.pending_tasks
                ),
                Tone::Dim,
            )
    }
}

impl Listing for Cluster {
    fn crumbs(_params: &ScreenParams) -> Vec<String> {
        vec!["ECS".to_string()]
    }

    fn loader(ctx: &ScreenContext) -> Loader<Self> {
        let provider = ctx.provider.clone();
        Box::new(move |req: &LoadRequest| {
            Some(catalog::clusters(provider.clone(), req.profile.clone()).boxed())
        })
    }

    fn count(browser: &ResourceBrowser<Self>) -> String {
        format!("{} clusters", browser.total())
    }

    fn open(&self, _params: &ScreenParams) -> Option<NavAction> {
        Some(NavAction::Navigate(
            ScreenId::Services,
            ScreenParams::new()
                .with(param::CLUSTER_ARN, self.arn.clone())
                .with(param::CLUSTER_NAME, self.name.clone()),
        ))
    }
}

impl BrowsableResource for Service {
    const NOUN: &'static str = "services";
    const FILTER: FilterMode = FilterMode::Off;

    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
    }

    fn row(&self, _now: OffsetDateTime) -> Row {
        let mut row = Row::text(self.name.clone()).cell(
            format!("● {}/{}", self.running, self.desired),
            service_tone(self),
        );
        if self.pending > 0 {
            row = row.cell(format!("{} pending", self.pending), Tone::Warn);
        }
        row.cell(self.status.clone(), Tone::Dim)
    }
}

impl Listing for Service {
    fn crumbs(params: &ScreenParams) -> Vec<String> {
        vec![
            "ECS".to_string(),
            params.get(param::CLUSTER_NAME).unwrap_or_default().to_string(),
        ]
    }

    fn loader(ctx: &ScreenContext) -> Loader<Self> {
        let provider = ctx.provider.clone();
        Box::new(move |req: &LoadRequest| {
            let cluster = req.params.require(param::CLUSTER_ARN)?.to_string();
            Some(catalog::services(provider.clone(), req.profile.clone(), cluster).boxed())
        })
    }

    fn count(browser: &ResourceBrowser<Self>) -> String {
        format!("{} services", browser.total())
    }

    fn open(&self, params: &ScreenParams) -> Option<NavAction> {
        let cluster_arn = params.require(param::CLUSTER_ARN)?;
        Some(NavAction::Navigate(
            ScreenId::ServiceDetail,
            ScreenParams::new()
                .with(param::CLUSTER_ARN, cluster_arn)
                .with(
                    param::CLUSTER_NAME,
                    params.get(param::CLUSTER_NAME).unwrap_or_default(),
                )
                .with(param::SERVICE_ARN, self.arn.clone())
                .with(param::SERVICE_NAME, self.name.clone()),
        ))
    }
}
