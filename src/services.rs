pub mod gh;
pub mod notify;
pub mod prompt;

pub use gh::GhClient;
pub use notify::DesktopNotifier;
pub use prompt::{PullRequestPicker, TerminalPicker};
