//! Prompting for secrets the service needs before install
//!
//! The flow walks the required variables that have no value yet, one at a
//! time. Each value is typed into a masked field, optionally saved to the
//! credential store, and recorded. Once every variable has a value the merged
//! map (pre-supplied plus entered) is available through [`CredentialFlow::resolved`].

use std::collections::BTreeMap;

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use crate::catalog::EnvVar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialStage {
    /// Typing the value
    Input,
    /// Asking whether to persist it; `save` is the highlighted answer
    Save { save: bool },
}

/// What the caller has to do after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialOutcome {
    /// User backed out of the whole flow
    Aborted,
    /// Open the variable's setup page
    OpenUrl(String),
    /// A value was recorded; persist it when `store` is set
    Advanced { store: Option<(String, String)> },
}

#[derive(Debug)]
pub struct CredentialFlow {
    pending: Vec<EnvVar>,
    index: usize,
    resolved: BTreeMap<String, String>,
    input: Input,
    stage: CredentialStage,
    can_store: bool,
}

impl CredentialFlow {
    /// Start a flow over `required`, skipping anything already in `preset`
    pub fn new(required: Vec<EnvVar>, preset: BTreeMap<String, String>, can_store: bool) -> Self {
        let pending = required
            .into_iter()
            .filter(|var| !preset.get(&var.name).is_some_and(|v| !v.is_empty()))
            .collect();
        Self {
            pending,
            index: 0,
            resolved: preset,
            input: Input::default(),
            stage: CredentialStage::Input,
            can_store,
        }
    }

    /// Nothing left to ask for
    pub fn is_complete(&self) -> bool {
        self.index >= self.pending.len()
    }

    pub fn current(&self) -> Option<&EnvVar> {
        self.pending.get(self.index)
    }

    /// (1-based position, total) of the variable being prompted
    pub fn progress(&self) -> (usize, usize) {
        ((self.index + 1).min(self.pending.len()), self.pending.len())
    }

    pub fn stage(&self) -> CredentialStage {
        self.stage
    }

    pub fn input(&self) -> &Input {
        &self.input
    }

    /// The typed value with every character masked
    pub fn masked_value(&self) -> String {
        "•".repeat(self.input.value().chars().count())
    }

    pub fn resolved(&self) -> &BTreeMap<String, String> {
        &self.resolved
    }

    pub fn into_resolved(self) -> BTreeMap<String, String> {
        self.resolved
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<CredentialOutcome> {
        if self.is_complete() {
            return None;
        }
        match self.stage {
            CredentialStage::Input => self.handle_input_key(key),
            CredentialStage::Save { save } => self.handle_save_key(key, save),
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> Option<CredentialOutcome> {
        match key.code {
            KeyCode::Esc => Some(CredentialOutcome::Aborted),
            KeyCode::Char('o') if key.modifiers.contains(KeyModifiers::CONTROL) => self
                .current()
                .map(|var| var.setup_url.clone())
                .filter(|url| !url.is_empty())
                .map(CredentialOutcome::OpenUrl),
            KeyCode::Enter => {
                if self.input.value().is_empty() {
                    return None;
                }
                if self.can_store {
                    self.stage = CredentialStage::Save { save: false };
                    None
                } else {
                    Some(self.advance(false))
                }
            }
            _ => {
                self.input.handle_event(&Event::Key(key));
                None
            }
        }
    }

    fn handle_save_key(&mut self, key: KeyEvent, save: bool) -> Option<CredentialOutcome> {
        match key.code {
            KeyCode::Esc => Some(self.advance(false)),
            KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down | KeyCode::Tab => {
                self.stage = CredentialStage::Save { save: !save };
                None
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(self.advance(true)),
            KeyCode::Char('n') | KeyCode::Char('N') => Some(self.advance(false)),
            KeyCode::Enter => Some(self.advance(save)),
            _ => None,
        }
    }

    fn advance(&mut self, store: bool) -> CredentialOutcome {
        let value = self.input.value().to_string();
        let name = self.current().map(|var| var.name.clone()).unwrap_or_default();

        self.resolved.insert(name.clone(), value.clone());
        self.index += 1;
        self.input.reset();
        self.stage = CredentialStage::Input;

        CredentialOutcome::Advanced {
            store: store.then_some((name, value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn var(name: &str) -> EnvVar {
        EnvVar {
            name: name.to_string(),
            required: true,
            setup_url: format!("https://example.com/{name}"),
            ..Default::default()
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(flow: &mut CredentialFlow, text: &str) {
        for c in text.chars() {
            flow.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_preset_values_are_not_prompted() {
        let preset = BTreeMap::from([("A".to_string(), "1".to_string())]);
        let flow = CredentialFlow::new(vec![var("A"), var("B")], preset, false);

        assert_eq!(flow.current().map(|v| v.name.as_str()), Some("B"));
        assert_eq!(flow.progress(), (1, 1));
    }

    #[test]
    fn test_empty_submission_is_ignored() {
        let mut flow = CredentialFlow::new(vec![var("A")], BTreeMap::new(), true);

        assert_eq!(flow.handle_key(key(KeyCode::Enter)), None);
        assert_eq!(flow.stage(), CredentialStage::Input);
        assert_eq!(flow.current().map(|v| v.name.as_str()), Some("A"));
    }

    #[test]
    fn test_save_prompt_defaults_to_no() {
        let mut flow = CredentialFlow::new(vec![var("A")], BTreeMap::new(), true);
        type_text(&mut flow, "secret");
        assert_eq!(flow.masked_value(), "••••••");

        flow.handle_key(key(KeyCode::Enter));
        assert_eq!(flow.stage(), CredentialStage::Save { save: false });

        let outcome = flow.handle_key(key(KeyCode::Enter));
        assert_eq!(outcome, Some(CredentialOutcome::Advanced { store: None }));
        assert!(flow.is_complete());
        assert_eq!(flow.resolved().get("A").map(String::as_str), Some("secret"));
    }

    #[test]
    fn test_save_yes_requests_store() {
        let mut flow = CredentialFlow::new(vec![var("A"), var("B")], BTreeMap::new(), true);
        type_text(&mut flow, "x");
        flow.handle_key(key(KeyCode::Enter));

        let outcome = flow.handle_key(key(KeyCode::Char('y')));
        assert_eq!(
            outcome,
            Some(CredentialOutcome::Advanced {
                store: Some(("A".to_string(), "x".to_string()))
            })
        );
        assert_eq!(flow.current().map(|v| v.name.as_str()), Some("B"));
        assert_eq!(flow.input().value(), "");
    }

    #[test]
    fn test_esc_in_save_skips_persistence_but_advances() {
        let mut flow = CredentialFlow::new(vec![var("A")], BTreeMap::new(), true);
        type_text(&mut flow, "x");
        flow.handle_key(key(KeyCode::Enter));
        flow.handle_key(key(KeyCode::Right));

        let outcome = flow.handle_key(key(KeyCode::Esc));
        assert_eq!(outcome, Some(CredentialOutcome::Advanced { store: None }));
        assert!(flow.is_complete());
    }

    #[test]
    fn test_esc_in_input_aborts() {
        let mut flow = CredentialFlow::new(vec![var("A")], BTreeMap::new(), true);
        assert_eq!(flow.handle_key(key(KeyCode::Esc)), Some(CredentialOutcome::Aborted));
    }

    #[test]
    fn test_ctrl_o_opens_setup_url() {
        let mut flow = CredentialFlow::new(vec![var("A")], BTreeMap::new(), false);
        let outcome = flow.handle_key(KeyEvent::new(KeyCode::Char('o'), KeyModifiers::CONTROL));
        assert_eq!(
            outcome,
            Some(CredentialOutcome::OpenUrl("https://example.com/A".to_string()))
        );
        assert_eq!(flow.input().value(), "");
    }

    #[test]
    fn test_without_store_enter_advances_directly() {
        let mut flow = CredentialFlow::new(vec![var("A")], BTreeMap::new(), false);
        type_text(&mut flow, "v");
        let outcome = flow.handle_key(key(KeyCode::Enter));
        assert_eq!(outcome, Some(CredentialOutcome::Advanced { store: None }));
        assert!(flow.is_complete());
    }
}
