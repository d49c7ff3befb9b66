/// Terminal User Interface module for interactive commands
pub mod wizard;

use std::sync::Arc;
use std::time::Duration;

use crate::backend::Backend;
use crate::Result;

/// Run the interactive install/uninstall wizard
pub async fn run_wizard(
    backend: Arc<dyn Backend>,
    options: wizard::WizardOptions,
    poll_interval: Duration,
) -> Result<()> {
    wizard::run(backend, options, poll_interval).await
}
