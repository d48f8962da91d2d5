pub mod data;
pub mod error;
pub mod icons;
pub mod monitor;
pub mod services;
pub mod utils;

pub use data::{aggregate, Check, CheckState, PrRef, PullRequest, Snapshot};
pub use error::Error;
pub use monitor::{Monitor, MonitorConfig, Outcome};
pub use services::{DesktopNotifier, GhClient};
