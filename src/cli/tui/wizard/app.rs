use std::sync::Arc;
use std::time::Duration;

use ratatui::{
    crossterm::event::{self, Event, KeyEventKind},
    DefaultTerminal,
};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::time;

use super::events::AppEvent;
use super::navigator::{Wizard, WizardOptions};
use super::tasks::{self, Task};
use super::theme::Theme;
use crate::backend::Backend;
use crate::Result;

/// Main application struct
pub struct App {
    wizard: Wizard,
    backend: Arc<dyn Backend>,
    theme: Theme,
    /// Delay between registry status polls
    poll_interval: Duration,
    /// Event sender for background tasks
    event_tx: Option<UnboundedSender<AppEvent>>,
}

impl App {
    pub fn new(backend: Arc<dyn Backend>, options: WizardOptions, poll_interval: Duration) -> Self {
        Self {
            wizard: Wizard::new(backend.clone(), options),
            backend,
            theme: Theme::default(),
            poll_interval,
            event_tx: None,
        }
    }

    /// Run the application
    pub async fn run(mut self) -> Result<()> {
        let mut terminal = ratatui::init();
        terminal.clear()?;

        let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel();
        self.event_tx = Some(event_tx.clone());

        // Terminal input is read on a plain thread so that a pending read never
        // holds up runtime shutdown
        let input_tx = event_tx;
        std::thread::spawn(move || {
            while !input_tx.is_closed() {
                match event::poll(Duration::from_millis(100)) {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(_) => break,
                }
                let sent = match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        input_tx.send(AppEvent::Key(key))
                    }
                    Ok(Event::Resize(width, height)) => input_tx.send(AppEvent::Resize(width, height)),
                    Ok(_) => Ok(()),
                    Err(_) => break,
                };
                if sent.is_err() {
                    break;
                }
            }
        });

        let initial = self.wizard.start();
        self.spawn_tasks(initial);

        let result = self.main_loop(&mut terminal, &mut event_rx).await;

        ratatui::restore();
        result
    }

    /// Main event loop
    async fn main_loop(
        &mut self,
        terminal: &mut DefaultTerminal,
        event_rx: &mut UnboundedReceiver<AppEvent>,
    ) -> Result<()> {
        loop {
            terminal.draw(|frame| super::screens::render(frame, &self.wizard, &self.theme))?;

            // Timeout drives the spinner animation
            let event = match time::timeout(Duration::from_millis(80), event_rx.recv()).await {
                Ok(Some(event)) => event,
                Ok(None) => break,
                Err(_) => AppEvent::Tick,
            };

            let tasks = self.wizard.handle(event);
            self.spawn_tasks(tasks);

            if self.wizard.should_quit() {
                break;
            }
        }

        Ok(())
    }

    fn spawn_tasks(&self, tasks: Vec<Task>) {
        let Some(tx) = &self.event_tx else {
            return;
        };
        for task in tasks {
            self.spawn_task(task, tx.clone());
        }
    }

    /// Run one task on the blocking pool and send its completion event
    fn spawn_task(&self, task: Task, event_tx: UnboundedSender<AppEvent>) {
        let backend = self.backend.clone();
        let delay = task.is_delayed().then_some(self.poll_interval);

        tokio::spawn(async move {
            if let Some(delay) = delay {
                time::sleep(delay).await;
            }
            match tokio::task::spawn_blocking(move || tasks::execute(backend.as_ref(), task)).await {
                Ok(event) => {
                    let _ = event_tx.send(event);
                }
                Err(e) => tracing::error!("Background task panicked: {}", e),
            }
        });
    }
}
