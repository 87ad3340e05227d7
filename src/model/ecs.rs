use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq)]
pub struct Cluster {
    pub arn: String,
    pub name: String,
    pub status: String,
    pub running_tasks: u32,
    pub pending_tasks: u32,
    pub active_services: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Service {
    pub arn: String,
    pub name: String,
    pub status: String,
    pub running: u32,
    pub pending: u32,
    pub desired: u32,
    pub deployments: Vec<Deployment>,
}

impl Service {
    /// The deployment currently rolling out or serving, if any.
    pub fn active_deployment(&self) -> Option<&Deployment> {
        self.deployments
            .iter()
            .find(|d| d.status == "PRIMARY" || d.status == "IN_PROGRESS")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Deployment {
    pub id: String,
    pub status: String,
    pub task_definition: String,
    pub running: u32,
    pub desired: u32,
    pub pending: u32,
    pub rollout_state: Option<String>,
    pub rollout_reason: Option<String>,
    pub created_at: Option<OffsetDateTime>,
    pub updated_at: Option<OffsetDateTime>,
}

impl Deployment {
    /// `family:revision` part of the task definition ARN.
    pub fn short_task_definition(&self) -> &str {
        match self.task_definition.split_once("task-definition/") {
            Some((_, rest)) if !rest.is_empty() => rest,
            _ => &self.task_definition,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Task {
    pub arn: String,
    pub last_status: String,
    pub desired_status: String,
    pub task_definition: String,
}

/// A service together with its tasks, as shown on the detail screen.
#[derive(Clone, Debug, PartialEq)]
pub struct ServiceDetail {
    pub service: Service,
    pub tasks: Vec<Task>,
}

impl ServiceDetail {
    /// Number of tasks whose last status is `status`.
    pub fn count_tasks(&self, status: &str) -> usize {
        self.tasks.iter().filter(|t| t.last_status == status).count()
    }
}
