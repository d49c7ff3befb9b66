/// Interactive MCP server install/uninstall wizard
pub mod app;
pub mod apply;
pub mod credentials;
pub mod events;
pub mod modal;
pub mod navigator;
pub mod screens;
pub mod state;
pub mod tasks;
pub mod theme;

pub use apply::{ApplyOutcome, ApplyPhase, ApplyScreen, DoneChoice};
pub use credentials::{CredentialFlow, CredentialOutcome, CredentialStage};
pub use events::AppEvent;
pub use navigator::{BreadcrumbStep, Outcome, Screen, ScreenKind, Wizard, WizardOptions};
pub use state::{Action, TargetResult, TargetStatus, WizardState};
pub use tasks::{ApplyTask, Task};

use std::sync::Arc;
use std::time::Duration;

use crate::backend::Backend;
use crate::Result;

/// Entry point for the wizard
pub async fn run(backend: Arc<dyn Backend>, options: WizardOptions, poll_interval: Duration) -> Result<()> {
    let app = app::App::new(backend, options, poll_interval);
    app.run().await
}
