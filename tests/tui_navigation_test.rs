mod common;

use common::{ctrl, registry_fixture, FakeBackend, FakeTarget, Harness};
use mcp_wizard::catalog::{Catalog, Entry, SourceChoice};
use mcp_wizard::cli::tui::wizard::{Action, AppEvent, Screen, ScreenKind, Task, WizardOptions};
use mcp_wizard::targets::Scope;
use pretty_assertions::assert_eq;
use ratatui::crossterm::event::KeyCode;

fn service_names(harness: &Harness) -> Vec<String> {
    match harness.wizard.screen() {
        Screen::Service(service) => service.visible().iter().map(|e| e.name().to_string()).collect(),
        _ => panic!("not on the service screen"),
    }
}

#[test]
fn test_install_path_through_scope_to_review() {
    let mut harness = Harness::new(FakeBackend::default(), true);
    assert_eq!(harness.kind(), ScreenKind::Menu);

    harness.press(KeyCode::Char('i'));
    assert_eq!(harness.kind(), ScreenKind::Source);
    assert_eq!(harness.wizard.state().action, Action::Install);

    harness.press(KeyCode::Enter);
    let tasks = harness.take_tasks();
    assert!(matches!(tasks.as_slice(), [Task::LoadCatalog(SourceChoice::Curated)]));
    harness.queue.extend(tasks);
    harness.settle();
    assert_eq!(service_names(&harness), vec!["filesystem", "github", "linear"]);

    harness.type_text("git");
    assert_eq!(service_names(&harness), vec!["github"]);
    harness.press(KeyCode::Enter);
    assert_eq!(harness.kind(), ScreenKind::Target);
    assert_eq!(harness.wizard.state().entry.as_ref().map(|e| e.name()), Some("github"));

    // Installed targets start selected
    harness.press(KeyCode::Enter);
    assert_eq!(harness.wizard.state().target_slugs(), vec!["claude-code", "cursor"]);
    assert_eq!(harness.kind(), ScreenKind::Scope);

    harness.press(KeyCode::Down);
    harness.press(KeyCode::Enter);
    assert_eq!(harness.kind(), ScreenKind::Review);
    assert_eq!(harness.wizard.state().scope, Some(Scope::Project));
}

#[test]
fn test_registry_entry_is_confirmed_before_targets() {
    let mut harness = Harness::new(FakeBackend::default(), true);
    harness.press(KeyCode::Char('i'));
    harness.press(KeyCode::Down);
    harness.press(KeyCode::Enter);

    let tasks = harness.take_tasks();
    assert!(matches!(
        tasks.as_slice(),
        [Task::LoadCatalog(SourceChoice::Registry), Task::PollRegistryStatus]
    ));
    harness.queue.extend(tasks);
    harness.settle();
    assert_eq!(service_names(&harness), vec!["io.example/weather"]);

    harness.press(KeyCode::Enter);
    assert_eq!(harness.kind(), ScreenKind::Trust);

    harness.press(KeyCode::Enter);
    assert!(matches!(harness.queue.front(), Some(Task::RefreshEntry(_))));
    harness.settle();
    assert_eq!(harness.kind(), ScreenKind::Target);
}

#[test]
fn test_declining_trust_returns_to_services() {
    let mut harness = Harness::new(FakeBackend::default(), true);
    harness.press(KeyCode::Char('i'));
    harness.press(KeyCode::Down);
    harness.press_and_settle(KeyCode::Enter);
    harness.press(KeyCode::Enter);

    harness.press(KeyCode::Char('n'));
    assert_eq!(harness.kind(), ScreenKind::Service);
    assert!(harness.wizard.state().entry.is_none());
    // The catalog is reused for the same source
    assert!(harness.take_tasks().is_empty());
}

#[test]
fn test_late_refresh_after_leaving_trust_is_ignored() {
    let mut harness = Harness::new(FakeBackend::default(), true);
    harness.press(KeyCode::Char('i'));
    harness.press(KeyCode::Down);
    harness.press_and_settle(KeyCode::Enter);
    harness.press(KeyCode::Enter);
    harness.press(KeyCode::Char('y'));
    let refresh = harness.take_tasks();
    assert_eq!(refresh.len(), 1);

    harness.press(KeyCode::Esc);
    assert_eq!(harness.kind(), ScreenKind::Service);

    let entry = Entry::registry(harness.backend.registry[0].clone());
    harness.send(AppEvent::EntryRefreshed(Ok(entry)));
    assert_eq!(harness.kind(), ScreenKind::Service);
    assert!(harness.wizard.state().entry.is_none());
}

#[test]
fn test_refresh_for_another_entry_is_ignored() {
    let mut other = registry_fixture();
    other.name = "io.example/zzz-other".to_string();
    other.title = Some("Other".to_string());
    let backend = FakeBackend {
        registry: vec![registry_fixture(), other],
        ..Default::default()
    };
    let mut harness = Harness::new(backend, true);
    harness.press(KeyCode::Char('i'));
    harness.press(KeyCode::Down);
    harness.press_and_settle(KeyCode::Enter);

    // Confirm weather, then back out before its refresh lands
    harness.press(KeyCode::Enter);
    harness.press(KeyCode::Char('y'));
    let weather_refresh = harness.take_tasks();
    assert!(matches!(weather_refresh.as_slice(), [Task::RefreshEntry(e)] if e.name() == "io.example/weather"));
    harness.press(KeyCode::Esc);

    harness.press(KeyCode::Down);
    harness.press(KeyCode::Enter);
    assert_eq!(harness.kind(), ScreenKind::Trust);
    harness.press(KeyCode::Char('y'));
    let other_refresh = harness.take_tasks();

    let stale = Entry::registry(harness.backend.registry[0].clone());
    harness.send(AppEvent::EntryRefreshed(Ok(stale)));
    assert_eq!(harness.kind(), ScreenKind::Trust);
    assert_eq!(
        harness.wizard.state().entry.as_ref().map(|e| e.name()),
        Some("io.example/zzz-other")
    );

    harness.queue.extend(other_refresh);
    harness.settle();
    assert_eq!(harness.kind(), ScreenKind::Target);
    assert_eq!(
        harness.wizard.state().entry.as_ref().map(|e| e.name()),
        Some("io.example/zzz-other")
    );
}

#[test]
fn test_back_from_targets_clears_entry_and_selection() {
    let mut harness = Harness::new(FakeBackend::default(), true);
    harness.open_services(false);
    harness.type_text("files");
    harness.press(KeyCode::Enter);
    assert_eq!(harness.kind(), ScreenKind::Target);

    harness.press(KeyCode::Esc);
    assert_eq!(harness.kind(), ScreenKind::Service);
    let state = harness.wizard.state();
    assert!(state.entry.is_none());
    assert!(state.targets.is_empty());
    assert!(state.scope.is_none());
    assert_eq!(state.source, Some(SourceChoice::Curated));
}

#[test]
fn test_back_from_service_clears_source() {
    let mut harness = Harness::new(FakeBackend::default(), true);
    harness.open_services(false);

    harness.press(KeyCode::Esc);
    assert_eq!(harness.kind(), ScreenKind::Source);
    assert!(harness.wizard.state().source.is_none());

    harness.press(KeyCode::Esc);
    assert_eq!(harness.kind(), ScreenKind::Menu);
}

#[test]
fn test_back_from_review_clears_scope() {
    let mut harness = Harness::new(FakeBackend::default(), true);
    harness.reach_review("files", false);
    assert_eq!(harness.wizard.state().scope, Some(Scope::User));

    harness.press(KeyCode::Esc);
    assert_eq!(harness.kind(), ScreenKind::Scope);
    assert!(harness.wizard.state().scope.is_none());
    assert_eq!(harness.wizard.state().targets.len(), 2);

    harness.press(KeyCode::Esc);
    assert_eq!(harness.kind(), ScreenKind::Target);
    // Previous selection is kept on the way back
    assert_eq!(harness.wizard.state().targets.len(), 2);
}

#[test]
fn test_user_only_targets_skip_scope() {
    let backend = FakeBackend::default()
        .with_targets(vec![FakeTarget::new("Windsurf", "windsurf", true).user_only()]);
    let mut harness = Harness::new(backend, false);
    harness.open_services(false);
    harness.type_text("files");
    harness.press(KeyCode::Enter);
    harness.press(KeyCode::Enter);

    assert_eq!(harness.kind(), ScreenKind::Review);
    assert_eq!(harness.wizard.state().scope, Some(Scope::User));

    harness.press(KeyCode::Esc);
    assert_eq!(harness.kind(), ScreenKind::Target);
}

#[test]
fn test_target_screen_requires_a_selection() {
    let mut harness = Harness::new(FakeBackend::default(), false);
    harness.open_services(false);
    harness.type_text("files");
    harness.press(KeyCode::Enter);

    // First toggle selects everything, the second clears it
    harness.press(KeyCode::Char('a'));
    harness.press(KeyCode::Char('a'));
    harness.press(KeyCode::Enter);
    assert_eq!(harness.kind(), ScreenKind::Target);
    assert!(harness.wizard.state().targets.is_empty());

    harness.press(KeyCode::Char(' '));
    harness.press(KeyCode::Enter);
    assert_eq!(harness.wizard.state().target_slugs(), vec!["claude-code"]);
}

#[test]
fn test_registry_disabled_goes_straight_to_curated_services() {
    let mut harness = Harness::new(FakeBackend::default(), false);
    harness.press(KeyCode::Char('u'));

    assert_eq!(harness.kind(), ScreenKind::Service);
    assert_eq!(harness.wizard.state().source, Some(SourceChoice::Curated));
    assert_eq!(harness.wizard.state().action, Action::Uninstall);
    let tasks = harness.take_tasks();
    assert!(matches!(tasks.as_slice(), [Task::LoadCatalog(SourceChoice::Curated)]));

    harness.press(KeyCode::Esc);
    assert_eq!(harness.kind(), ScreenKind::Menu);
}

#[test]
fn test_initial_action_skips_menu() {
    let harness = Harness::with_options(
        FakeBackend::default(),
        WizardOptions {
            registry_enabled: false,
            initial_action: Some(Action::Uninstall),
        },
    );

    assert_eq!(harness.kind(), ScreenKind::Service);
    assert_eq!(harness.wizard.state().action, Action::Uninstall);
    assert_eq!(harness.queue.len(), 1);
}

#[test]
fn test_catalog_error_only_allows_back() {
    let backend = FakeBackend {
        catalog_error: Some("registry unreachable".to_string()),
        ..Default::default()
    };
    let mut harness = Harness::new(backend, true);
    harness.press(KeyCode::Char('i'));
    harness.press(KeyCode::Down);
    harness.press_and_settle(KeyCode::Enter);

    match harness.wizard.screen() {
        Screen::Service(service) => {
            assert!(service.error().is_some_and(|e| e.contains("registry unreachable")));
            assert!(!service.is_loading());
        }
        _ => panic!("not on the service screen"),
    }

    harness.press(KeyCode::Enter);
    harness.press(KeyCode::Down);
    assert_eq!(harness.kind(), ScreenKind::Service);

    harness.press(KeyCode::Esc);
    assert_eq!(harness.kind(), ScreenKind::Source);
}

#[test]
fn test_catalog_for_another_source_is_ignored() {
    let mut harness = Harness::new(FakeBackend::default(), true);
    harness.press(KeyCode::Char('i'));
    harness.press(KeyCode::Down);
    harness.press(KeyCode::Enter);
    harness.take_tasks();

    harness.send(AppEvent::CatalogLoaded {
        source: SourceChoice::Curated,
        result: Ok(Catalog::default()),
    });
    match harness.wizard.screen() {
        Screen::Service(service) => assert!(service.is_loading()),
        _ => panic!("not on the service screen"),
    }
}

#[test]
fn test_registry_status_keeps_polling_while_loading() {
    let mut harness = Harness::new(FakeBackend::default(), true);
    harness.press(KeyCode::Char('i'));
    harness.press(KeyCode::Down);
    harness.press(KeyCode::Enter);
    harness.take_tasks();

    harness.send(AppEvent::RegistryStatus("Fetched 3 pages".to_string()));
    assert!(matches!(harness.take_tasks().as_slice(), [Task::PollRegistryStatus]));

    // Still loading, so an idle status polls again
    harness.send(AppEvent::RegistryStatus(String::new()));
    assert!(matches!(harness.take_tasks().as_slice(), [Task::PollRegistryStatus]));

    harness.send(AppEvent::CatalogLoaded {
        source: SourceChoice::Registry,
        result: Ok(Catalog::default()),
    });
    harness.send(AppEvent::RegistryStatus(String::new()));
    assert!(harness.take_tasks().is_empty());
}

#[test]
fn test_reentering_registry_services_keeps_one_poll() {
    let mut harness = Harness::new(FakeBackend::default(), true);
    harness.press(KeyCode::Char('i'));
    harness.press(KeyCode::Down);
    harness.press(KeyCode::Enter);
    harness.press(KeyCode::Esc);
    harness.press(KeyCode::Down);
    harness.press(KeyCode::Enter);

    let polls = |tasks: &[Task]| tasks.iter().filter(|t| matches!(t, Task::PollRegistryStatus)).count();
    let tasks = harness.take_tasks();
    assert_eq!(polls(&tasks), 1);
    assert_eq!(tasks.iter().filter(|t| matches!(t, Task::LoadCatalog(_))).count(), 2);

    // The single outstanding poll answers and is re-issued once
    harness.send(AppEvent::RegistryStatus("Fetched 1 page".to_string()));
    assert_eq!(polls(&harness.take_tasks()), 1);

    // Leaving and coming back while that poll is out does not start another
    harness.press(KeyCode::Esc);
    harness.press(KeyCode::Down);
    harness.press(KeyCode::Enter);
    assert_eq!(polls(&harness.take_tasks()), 0);
}

#[test]
fn test_resize_leaves_state_alone() {
    let mut harness = Harness::new(FakeBackend::default(), true);
    harness.reach_review("files", false);
    let before = harness.wizard.breadcrumb();
    let slugs: Vec<String> = harness
        .wizard
        .state()
        .target_slugs()
        .into_iter()
        .map(String::from)
        .collect();

    harness.send(AppEvent::Resize(40, 12));
    assert!(harness.take_tasks().is_empty());
    assert_eq!(harness.kind(), ScreenKind::Review);
    let state = harness.wizard.state();
    assert_eq!(state.action, Action::Install);
    assert_eq!(state.source, Some(SourceChoice::Curated));
    assert_eq!(state.entry.as_ref().map(|e| e.name()), Some("filesystem"));
    assert_eq!(state.target_slugs(), slugs);
    assert_eq!(state.scope, Some(Scope::User));
    assert_eq!(harness.wizard.breadcrumb(), before);

    // Service keeps its list and cursor across a resize
    harness.press(KeyCode::Esc);
    harness.press(KeyCode::Esc);
    harness.press(KeyCode::Esc);
    harness.press(KeyCode::Down);
    harness.send(AppEvent::Resize(200, 60));
    assert_eq!(harness.kind(), ScreenKind::Service);
    assert_eq!(service_names(&harness), vec!["filesystem", "github", "linear"]);
    harness.press(KeyCode::Enter);
    assert_eq!(harness.wizard.state().entry.as_ref().map(|e| e.name()), Some("github"));
}

#[test]
fn test_ctrl_c_quits_from_any_screen() {
    let mut harness = Harness::new(FakeBackend::default(), false);
    harness.open_services(false);
    assert!(!harness.wizard.should_quit());

    harness.send(AppEvent::Key(ctrl('c')));
    assert!(harness.wizard.should_quit());
}

#[test]
fn test_menu_quit() {
    let mut harness = Harness::new(FakeBackend::default(), false);
    harness.press(KeyCode::Char('q'));
    assert!(harness.wizard.should_quit());
}
