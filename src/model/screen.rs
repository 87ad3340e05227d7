use std::collections::BTreeMap;

/// Identifies one screen of the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScreenId {
    ProfileSelect,
    MainMenu,
    LogGroups,
    LogStreams,
    LogEvents,
    Clusters,
    Services,
    ServiceDetail,
    Secrets,
    SecretDetail,
}

impl ScreenId {
    pub fn label(self) -> &'static str {
        match self {
            ScreenId::ProfileSelect => "profile-select",
            ScreenId::MainMenu => "main-menu",
            ScreenId::LogGroups => "log-groups",
            ScreenId::LogStreams => "log-streams",
            ScreenId::LogEvents => "log-events",
            ScreenId::Clusters => "ecs-clusters",
            ScreenId::Services => "ecs-services",
            ScreenId::ServiceDetail => "ecs-service-detail",
            ScreenId::Secrets => "secrets-list",
            ScreenId::SecretDetail => "secrets-detail",
        }
    }
}

/// Parameter keys understood by the screens.
pub mod param {
    pub const LOG_GROUP: &str = "logGroupName";
    pub const LOG_STREAM: &str = "logStreamName";
    pub const CLUSTER_ARN: &str = "clusterArn";
    pub const CLUSTER_NAME: &str = "clusterName";
    pub const SERVICE_ARN: &str = "serviceArn";
    pub const SERVICE_NAME: &str = "serviceName";
    pub const SECRET_ARN: &str = "secretArn";
    pub const SECRET_NAME: &str = "secretName";
}

/// String parameters addressed to a single screen.
///
/// Ordered so that parameter sets compare and hash deterministically as part
/// of a query key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ScreenParams(BTreeMap<String, String>);

impl ScreenParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|s| s.as_str())
    }

    /// Like `get`, but treats an empty value as missing.
    pub fn require(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ScreenParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScreenState {
    pub screen: ScreenId,
    pub params: ScreenParams,
}

impl ScreenState {
    pub fn new(screen: ScreenId, params: ScreenParams) -> Self {
        Self { screen, params }
    }

    pub fn bare(screen: ScreenId) -> Self {
        Self::new(screen, ScreenParams::new())
    }
}
