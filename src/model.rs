mod ecs;
mod logs;
mod profile;
mod screen;
mod secrets;

pub use self::ecs::{Cluster, Deployment, Service, ServiceDetail, Task};
pub use self::logs::{LogEvent, LogGroup, LogStream};
pub use self::profile::Profile;
pub use self::screen::{ScreenId, ScreenParams, ScreenState, param};
pub use self::secrets::Secret;
