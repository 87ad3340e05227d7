use time::OffsetDateTime;
use tokio::time::Instant;

use super::ecs::service_tone;
use super::time_utils::fmt_since_opt;
use super::{Outcome, Screen, ScreenContext, fallback, header};
use crate::browser::{Intent, QueryKey, QueryRunner, QueryStatus};
use crate::catalog::{self, SharedProvider};
use crate::model::{Deployment, Profile, ScreenParams, ScreenState, ServiceDetail, param};
use crate::view::{Body, Overlay, Row, ScreenView, Tone};

const BAR_WIDTH: usize = 10;

/// The force-redeploy prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeployState {
    Hidden,
    Confirming,
    Deploying,
    Failed(String),
}

pub struct ServiceDetailScreen {
    profile: Profile,
    state: ScreenState,
    provider: SharedProvider,
    detail: QueryRunner<QueryKey, ServiceDetail>,
    /// Last successful load, kept on screen while a refresh runs.
    shown: Option<ServiceDetail>,
    requested: Option<QueryKey>,
    refresh: u64,

    deploy: QueryRunner<QueryKey, ()>,
    deploy_state: DeployState,
    deploys: u64,

    scroll: usize,
    height: usize,
}

impl ServiceDetailScreen {
    pub fn new(profile: Profile, state: &ScreenState, ctx: &ScreenContext) -> Self {
        Self {
            profile,
            state: state.clone(),
            provider: ctx.provider.clone(),
            detail: QueryRunner::new(ctx.wake.clone()),
            shown: None,
            requested: None,
            refresh: 0,
            deploy: QueryRunner::new(ctx.wake.clone()),
            deploy_state: DeployState::Hidden,
            deploys: 0,
            scroll: 0,
            height: ctx.viewport_height.max(1),
        }
    }

    pub fn deploy_state(&self) -> &DeployState {
        &self.deploy_state
    }

    pub fn detail(&self) -> Option<&ServiceDetail> {
        self.shown.as_ref()
    }

    pub fn fetches(&self) -> u64 {
        self.detail.started()
    }

    fn params(&self) -> &ScreenParams {
        &self.state.params
    }

    fn key(&self, refresh: u64) -> QueryKey {
        QueryKey {
            profile: self.profile.clone(),
            screen: self.state.screen,
            params: self.state.params.clone(),
            filter: String::new(),
            refresh,
        }
    }

    fn target(&self) -> Option<(String, String)> {
        let cluster = self.params().require(param::CLUSTER_ARN)?;
        let service = self.params().require(param::SERVICE_ARN)?;
        Some((cluster.to_string(), service.to_string()))
    }

    fn ensure_query(&mut self) -> bool {
        let key = self.key(self.refresh);
        if self.requested.as_ref() == Some(&key) {
            return false;
        }
        self.requested = Some(key.clone());
        let Some((cluster, service)) = self.target() else {
            tracing::debug!("service detail without cluster or service, nothing to fetch");
            self.detail.clear();
            return true;
        };
        let fut = catalog::service_detail(
            self.provider.clone(),
            self.profile.clone(),
            cluster,
            service,
        );
        self.detail.run(key, move || fut)
    }

    fn start_deploy(&mut self) {
        let Some((cluster, service)) = self.target() else {
            return;
        };
        self.deploys += 1;
        let key = self.key(self.deploys);
        tracing::info!(cluster = %cluster, service = %service, "forcing new deployment");
        let fut = catalog::force_new_deployment(
            self.provider.clone(),
            self.profile.clone(),
            cluster,
            service,
        );
        self.deploy.run(key, move || fut);
        self.deploy_state = DeployState::Deploying;
    }

    fn handle_prompt(&mut self, intent: Intent) -> Outcome {
        if intent == Intent::Quit {
            return Outcome::Quit;
        }
        match self.deploy_state {
            DeployState::Confirming => match intent {
                Intent::Char('y') | Intent::Confirm => self.start_deploy(),
                Intent::Char('n') | Intent::Cancel => self.deploy_state = DeployState::Hidden,
                _ => {}
            },
            DeployState::Failed(_) => self.deploy_state = DeployState::Hidden,
            DeployState::Hidden | DeployState::Deploying => {}
        }
        Outcome::Stay
    }

    fn service_name(&self) -> &str {
        self.params().get(param::SERVICE_NAME).unwrap_or_default()
    }

    fn content(&self, now: OffsetDateTime) -> Vec<Row> {
        match &self.shown {
            Some(detail) => detail_rows(detail, self.service_name(), now),
            None => Vec::new(),
        }
    }

    fn max_scroll(&self) -> usize {
        self.content(OffsetDateTime::UNIX_EPOCH)
            .len()
            .saturating_sub(self.height)
    }

    fn overlay(&self) -> Option<Overlay> {
        let service = Row::new()
            .cell("Service:", Tone::Normal)
            .cell(self.service_name(), Tone::Accent);
        let warning = Row::new().cell(
            "This will stop current tasks and start new ones. Continue?",
            Tone::Warn,
        );
        let last = match &self.deploy_state {
            DeployState::Hidden => return None,
            DeployState::Confirming => Row::new().cell("y/enter confirm · n/esc cancel", Tone::Dim),
            DeployState::Deploying => Row::new().cell("Deploying...", Tone::Accent),
            DeployState::Failed(msg) => Row::new().cell(format!("Error: {msg}"), Tone::Bad),
        };
        let mut lines = vec![service, Row::new(), warning, Row::new(), last];
        if matches!(self.deploy_state, DeployState::Failed(_)) {
            lines.push(Row::new().cell("press any key to close", Tone::Dim));
        }
        Some(Overlay {
            title: "Force New Deployment".to_string(),
            lines,
            tone: Tone::Warn,
        })
    }
}

impl Screen for ServiceDetailScreen {
    fn sync(&mut self, _now: Instant) -> bool {
        let mut changed = false;
        if self.detail.poll() {
            if let QueryStatus::Ready(detail) = self.detail.status() {
                self.shown = Some(detail.clone());
                self.scroll = self.scroll.min(self.max_scroll());
            }
            changed = true;
        }
        if self.deploy.poll() {
            match self.deploy.status() {
                QueryStatus::Ready(()) => {
                    tracing::info!("deployment started, refreshing");
                    self.deploy_state = DeployState::Hidden;
                    self.refresh += 1;
                }
                QueryStatus::Failed(err) => {
                    self.deploy_state = DeployState::Failed(err.to_string());
                }
                _ => {}
            }
            changed = true;
        }
        changed |= self.ensure_query();
        changed
    }

    fn handle(&mut self, intent: Intent, _now: Instant) -> Outcome {
        if self.deploy_state != DeployState::Hidden {
            return self.handle_prompt(intent);
        }
        match intent {
            Intent::Up => self.scroll = self.scroll.saturating_sub(1),
            Intent::Down => self.scroll = (self.scroll + 1).min(self.max_scroll()),
            Intent::Char('d') => {
                if self.shown.is_some() && self.target().is_some() {
                    self.deploy_state = DeployState::Confirming;
                }
            }
            Intent::Char('r') => {
                if !self.detail.status().is_loading() {
                    self.refresh += 1;
                    self.ensure_query();
                }
            }
            other => return fallback(other),
        }
        Outcome::Stay
    }

    fn set_viewport_height(&mut self, height: usize) {
        self.height = height.max(1);
        self.scroll = self.scroll.min(self.max_scroll());
    }

    fn view(&self, now: OffsetDateTime) -> ScreenView {
        let status = self.detail.status();
        let body = if let Some(err) = status.error() {
            if err.is_not_found() {
                Body::NotFound(err.to_string())
            } else {
                Body::Error(err.to_string())
            }
        } else if self.shown.is_none() && status.is_loading() {
            Body::Loading("Loading service detail...".to_string())
        } else if self.shown.is_none() {
            Body::Empty("Service not found".to_string())
        } else {
            Body::Text(self.content(now).into_iter().skip(self.scroll).collect())
        };

        let cluster = self.params().get(param::CLUSTER_NAME).unwrap_or_default();
        let mut view = ScreenView::new(
            header(Some(&self.profile), &["ECS", cluster, self.service_name()], None),
            body,
            "↑↓ scroll · d deploy · r refresh · m menu · esc back · q quit",
        );
        view.status = status.is_loading().then(|| "loading…".to_string());
        view.overlay = self.overlay();
        view
    }
}

/// `██████░░░░` for 6 of 10.
pub(crate) fn progress_bar(running: u32, desired: u32, width: usize) -> String {
    let filled = if desired == 0 {
        0
    } else {
        let ratio = f64::from(running) / f64::from(desired);
        ((ratio * width as f64).round() as usize).min(width)
    };
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn deployment_tone(status: &str) -> Tone {
    match status {
        "PRIMARY" | "IN_PROGRESS" => Tone::Warn,
        "COMPLETED" => Tone::Good,
        "FAILED" => Tone::Bad,
        _ => Tone::Normal,
    }
}

fn rollout_tone(state: &str) -> Tone {
    match state {
        "COMPLETED" => Tone::Good,
        "FAILED" => Tone::Bad,
        "IN_PROGRESS" => Tone::Warn,
        _ => Tone::Normal,
    }
}

fn detail_rows(detail: &ServiceDetail, service_name: &str, now: OffsetDateTime) -> Vec<Row> {
    let svc = &detail.service;
    let status_tone = if svc.status == "ACTIVE" { Tone::Good } else { Tone::Bad };
    let mut rows = vec![
        Row::new()
            .cell("Status", Tone::Dim)
            .cell(svc.status.clone(), status_tone)
            .cell("·", Tone::Dim)
            .cell("Desired", Tone::Dim)
            .cell(svc.desired.to_string(), Tone::Accent)
            .cell("·", Tone::Dim)
            .cell(format!("● {}/{} running", svc.running, svc.desired), service_tone(svc)),
        Row::new(),
        Row::text("Tasks"),
    ];

    let running = detail.count_tasks("RUNNING");
    let pending = detail.count_tasks("PENDING");
    let stopped = detail.count_tasks("STOPPED");
    rows.push(Row::new().cell(format!("● {running} RUNNING"), Tone::Good));
    rows.push(Row::new().cell(
        format!("● {pending} PENDING"),
        if pending > 0 { Tone::Warn } else { Tone::Normal },
    ));
    rows.push(Row::new().cell(format!("● {stopped} STOPPED"), Tone::Dim));
    rows.push(Row::new());

    match svc.active_deployment() {
        Some(active) => rows.extend(deployment_rows(active, service_name, now)),
        None => {
            rows.push(Row::text("Active Deployment"));
            rows.push(Row::new().cell("No active deployment", Tone::Dim));
        }
    }
    rows
}

fn deployment_rows(active: &Deployment, service_name: &str, now: OffsetDateTime) -> Vec<Row> {
    let task_def = active.short_task_definition();
    let task_def = if task_def.is_empty() {
        Row::new().cell("Task def", Tone::Dim).cell("unknown", Tone::Dim)
    } else {
        Row::new().cell("Task def", Tone::Dim).cell(task_def, Tone::Normal)
    };
    let bar_tone = if active.running == active.desired { Tone::Good } else { Tone::Warn };

    let mut rows = vec![
        Row::text("Active Deployment").cell(
            format!("[{}]", active.status),
            deployment_tone(&active.status),
        ),
        Row::new()
            .cell("Service", Tone::Dim)
            .cell(service_name, Tone::Accent),
        task_def,
        Row::new()
            .cell(
                format!("[{}]", progress_bar(active.running, active.desired, BAR_WIDTH)),
                bar_tone,
            )
            .cell(format!("{}/{}", active.running, active.desired), Tone::Accent)
            .cell("tasks running", Tone::Dim),
    ];
    if let Some(state) = &active.rollout_state {
        rows.push(
            Row::new()
                .cell("Rollout", Tone::Dim)
                .cell(state.clone(), rollout_tone(state)),
        );
    }
    rows.push(
        Row::new()
            .cell("Updated", Tone::Dim)
            .cell(fmt_since_opt(active.updated_at, now, "unknown"), Tone::Dim),
    );
    rows
}
