use std::cell::RefCell;
use std::rc::Rc;

use qegui_common::{Point, Rect, UserLevel, WindowState};
use qegui_persist::EXIT_SAVE_NAME;

use super::*;
use crate::host::{GeometryProbe, HeadlessHost};
use crate::model::{DockArea, DockAttributes};

fn manager() -> SessionManager<HeadlessHost> {
    SessionManager::new(
        HeadlessHost::new(Rect::new(0, 0, 1920, 1080), 24),
        SessionOptions::default(),
    )
}

fn store() -> (tempfile::TempDir, ConfigStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = ConfigStore::empty(dir.path().join("QEGuiConfig.json"));
    (dir, store)
}

fn gui(file: &str, presentation: Option<Presentation>) -> PanelNode {
    PanelNode {
        file: file.into(),
        presentation,
        ..Default::default()
    }
}

/// Store holding one window under `name`.
fn store_with_window(store: &mut ConfigStore, name: &str, node: WindowSessionNode) {
    let mut config = Configuration::new();
    let mut app = Element::new(ROOT_NAME);
    app.add_value(MAIN_WINDOWS_KEY, 1);
    config.add_named_configuration(app);
    config.add_named_configuration(node.to_element(0));
    store.put_configuration(name, config);
}

fn restore_params(name: &str) -> StartupParams {
    StartupParams {
        restore: true,
        configuration_name: name.into(),
        ..Default::default()
    }
}

#[test]
fn absent_configuration_warns_once_and_opens_empty_window() {
    let (_dir, store) = store();
    let mut session = manager();

    let outcome = session.launch(&restore_params("Nightshift"), &store);

    assert_eq!(session.host().warnings().len(), 1);
    let (title, message) = &session.host().warnings()[0];
    assert_eq!(title, RESTORE_WARNING_TITLE);
    assert!(message.contains("'Nightshift'"));
    // Falls back to a single empty window.
    assert_eq!(outcome.windows, 1);
    assert_eq!(outcome.restored.as_deref(), Some("Nightshift"));
}

#[test]
fn empty_configuration_restores_nothing() {
    let (_dir, mut store) = store();
    store.put_configuration("Empty", Configuration::new());
    let mut session = manager();

    assert_eq!(session.restore(&store, "Empty").windows_created, 0);
    assert!(session.host().window_ids().is_empty());

    session.launch(&restore_params("Empty"), &store);
    assert_eq!(session.host().warnings().len(), 1);
}

#[test]
fn missing_presentation_defaults_to_central_then_tabs() {
    let (_dir, mut store) = store();
    store_with_window(
        &mut store,
        "Default",
        WindowSessionNode {
            panels: vec![gui("a.ui", None), gui("b.ui", None), gui("c.ui", None)],
            ..Default::default()
        },
    );
    let mut session = manager();

    let outcome = session.restore(&store, "Default");
    assert_eq!(outcome.windows_created, 1);

    let window = &session.windows()[0];
    let host = session.host();
    assert_eq!(window.panels.len(), 3);
    assert_eq!(host.tab_count(window.id), 3);
    let state = host.window(window.id).unwrap();
    assert!(state.tab_mode);
    assert_eq!(state.tabs[0], window.panels[0].id);
}

#[test]
fn second_panel_converts_central_to_first_tab() {
    let (_dir, mut store) = store();
    store_with_window(
        &mut store,
        "Two",
        WindowSessionNode {
            panels: vec![gui("a.ui", None), gui("b.ui", None)],
            ..Default::default()
        },
    );
    let mut session = manager();
    session.restore(&store, "Two");

    let window = &session.windows()[0];
    assert_eq!(session.host().tab_count(window.id), 2);
    assert!(session.host().window(window.id).unwrap().central.is_none());
}

#[test]
fn docked_panels_use_saved_attributes() {
    let docking = DockAttributes {
        area: DockArea::Right,
        floating: true,
        ..Default::default()
    };
    let (_dir, mut store) = store();
    store_with_window(
        &mut store,
        "Docks",
        WindowSessionNode {
            panels: vec![
                gui("main.ui", Some(Presentation::Central)),
                PanelNode {
                    docking: Some(docking),
                    ..gui("side.ui", Some(Presentation::Dock))
                },
                gui("bare.ui", Some(Presentation::Dock)),
            ],
            ..Default::default()
        },
    );
    let mut session = manager();
    session.restore(&store, "Docks");

    let window = &session.windows()[0];
    let host = session.host();
    let docks = &host.window(window.id).unwrap().docks;
    assert_eq!(docks.len(), 2);
    assert_eq!(docks[0].1, docking);
    assert_eq!(docks[1].1, DockAttributes::default());
    assert_eq!(host.current_panel(window.id), Some(window.panels[0].id));
    assert_eq!(host.tab_count(window.id), 0);
}

#[test]
fn last_active_panel_is_raised_and_title_applied() {
    let (_dir, mut store) = store();
    store_with_window(
        &mut store,
        "Active",
        WindowSessionNode {
            title: "Linac".into(),
            panels: vec![
                PanelNode {
                    active: true,
                    ..gui("a.ui", Some(Presentation::Tab))
                },
                PanelNode {
                    active: true,
                    ..gui("b.ui", Some(Presentation::Tab))
                },
                gui("c.ui", Some(Presentation::Tab)),
            ],
            ..Default::default()
        },
    );
    let mut session = manager();
    session.restore(&store, "Active");

    let window = &session.windows()[0];
    assert_eq!(
        session.host().current_panel(window.id),
        Some(window.panels[1].id)
    );
    assert_eq!(session.host().title(window.id), "Linac");
}

#[test]
fn failed_panels_are_skipped() {
    let (_dir, mut store) = store();
    store_with_window(
        &mut store,
        "Partial",
        WindowSessionNode {
            panels: vec![gui("gone.ui", None), gui("here.ui", None)],
            ..Default::default()
        },
    );
    let mut session = manager();
    session.host_mut().refuse_file("gone.ui");
    session.restore(&store, "Partial");

    let window = &session.windows()[0];
    assert_eq!(window.panels.len(), 1);
    assert_eq!(window.panels[0].file, "here.ui");
    // Placement follows saved position, so the survivor still goes to a tab.
    let state = session.host().window(window.id).unwrap();
    assert!(state.central.is_none());
    assert_eq!(state.tabs, vec![window.panels[0].id]);
}

#[test]
fn restore_closes_existing_windows() {
    let (_dir, mut store) = store();
    store_with_window(
        &mut store,
        "One",
        WindowSessionNode {
            panels: vec![gui("a.ui", None)],
            ..Default::default()
        },
    );
    let mut session = manager();
    session.launch(&StartupParams::default(), &store);
    let old = session.windows()[0].id;

    session.restore(&store, "One");
    assert_eq!(session.window_count(), 1);
    assert!(session.host().window(old).is_none());
    assert_ne!(session.windows()[0].id, old);
}

#[test]
fn restore_over_open_windows_numbers_panels_from_zero() {
    let (_dir, mut store) = store();
    store_with_window(
        &mut store,
        "One",
        WindowSessionNode {
            panels: vec![gui("a.ui", None), gui("b.ui", None)],
            ..Default::default()
        },
    );
    let mut session = manager();
    session.launch(
        &StartupParams {
            filenames: vec!["x.ui".into(), "y.ui".into()],
            ..Default::default()
        },
        &store,
    );
    assert_eq!(session.window_count(), 2);

    session.restore(&store, "One");
    let ids: Vec<_> = session.windows()[0]
        .panels
        .iter()
        .map(|p| p.restore_id.as_str())
        .collect();
    assert_eq!(ids, vec!["QEGui_window_0_form_0", "QEGui_window_0_form_1"]);
}

#[test]
fn user_level_survives_save_and_restore() {
    let (_dir, mut store) = store();
    let mut session = manager();
    session.launch(&StartupParams::default(), &store);
    session.host_mut().set_user_level(UserLevel::Engineer);
    session.save(&mut store, "Commissioning").unwrap();

    let app = store
        .configuration("Commissioning")
        .and_then(|c| c.named_configuration(ROOT_NAME))
        .unwrap();
    assert_eq!(app.value_str(USER_LEVEL_KEY), Some("USERLEVEL_ENGINEER"));

    let mut fresh = manager();
    assert_eq!(fresh.host().user_level(), UserLevel::User);
    fresh.restore(&store, "Commissioning");
    assert_eq!(fresh.host().user_level(), UserLevel::Engineer);
}

#[test]
fn unknown_user_level_is_ignored() {
    let (_dir, mut store) = store();
    let mut config = Configuration::new();
    let mut app = Element::new(ROOT_NAME);
    app.add_value(MAIN_WINDOWS_KEY, 1)
        .add_value(USER_LEVEL_KEY, "USERLEVEL_WIZARD");
    config.add_named_configuration(app);
    store.put_configuration("Odd", config);

    let mut session = manager();
    session.host_mut().set_user_level(UserLevel::Scientist);
    assert_eq!(session.restore(&store, "Odd").windows_created, 1);
    assert_eq!(session.host().user_level(), UserLevel::Scientist);
}

#[test]
fn save_as_refuses_reserved_names() {
    let (_dir, mut store) = store();
    let mut session = manager();
    session.launch(&StartupParams::default(), &store);

    let err = session.save_as(&mut store, AUTOSAVE_NAME).unwrap_err();
    assert!(matches!(err, StoreError::ReservedName(_)));
    assert!(matches!(
        session.save_as(&mut store, "  "),
        Err(StoreError::EmptyName)
    ));
    assert!(!store.is_configuration_present(AUTOSAVE_NAME));

    session.save_as(&mut store, " Night shift ").unwrap();
    assert!(store.is_configuration_present("Night shift"));
}

#[test]
fn save_then_restore_reproduces_the_tree() {
    let (_dir, mut store) = store();
    let params = StartupParams {
        filenames: vec!["vacuum.ui".into()],
        substitutions: "SECTOR=3,SECTOR=4".into(),
        path_list: vec!["/opt/screens".into()],
        ..Default::default()
    };
    let mut session = manager();
    session.launch(&params, &store);

    let window = session.windows()[0].id;
    let panel = session.windows()[0].panels[0].id;
    session
        .host_mut()
        .set_geometry(window, Rect::new(400, 300, 900, 700));
    session
        .host_mut()
        .set_window_state(window, WindowState::MAXIMIZED);
    session.host_mut().set_scroll(panel, Point::new(0, 150));
    session.save(&mut store, EXIT_SAVE_NAME).unwrap();

    let reopened = ConfigStore::open(store.path()).unwrap();
    let mut fresh = manager();
    assert_eq!(fresh.restore(&reopened, EXIT_SAVE_NAME).windows_created, 1);

    let restored = &fresh.windows()[0];
    let live = &restored.panels[0];
    assert_eq!(live.file, "vacuum.ui");
    assert_eq!(live.restore_id, "QEGui_window_0_form_0");
    assert_eq!(live.macros.to_string(), "SECTOR=3");
    assert_eq!(live.path_list, vec!["/opt/screens"]);
    assert_eq!(
        fresh.host().window_state(restored.id),
        WindowState::MAXIMIZED
    );

    // Geometry and scroll arrive once the settler has run.
    let live_id = live.id;
    let window_id = restored.id;
    while fresh.tick_settlers() > 0 {}
    assert_eq!(
        fresh.host().geometry(window_id),
        Some(Rect::new(400, 300, 900, 700))
    );
    assert_eq!(fresh.host().scroll_offset(live_id), Some(Point::new(0, 150)));
    assert!(!fresh.has_pending_geometry());
}

#[test]
fn saved_presentations_follow_panel_layout() {
    let (_dir, mut store) = store();
    let mut session = manager();
    session.launch(
        &StartupParams {
            filenames: vec!["a.ui".into()],
            ..Default::default()
        },
        &store,
    );
    session.save(&mut store, "Single").unwrap();

    let config = store.configuration("Single").unwrap();
    let app = config.named_configuration(ROOT_NAME).unwrap();
    assert_eq!(app.value::<usize>(MAIN_WINDOWS_KEY), Some(1));
    let node = WindowSessionNode::from_element(
        config
            .named_configuration(&WindowSessionNode::root_name(0))
            .unwrap(),
    );
    assert_eq!(node.panels[0].presentation, Some(Presentation::Central));
    assert!(node.panels[0].active);
    assert_eq!(node.title, "QEGui");
}

#[derive(Clone, Default)]
struct Recorder {
    log: Rc<RefCell<Vec<String>>>,
}

struct Participant {
    name: &'static str,
    recorder: Recorder,
}

impl RestoreParticipant for Participant {
    fn save(&mut self, config: &mut Configuration) {
        self.recorder.log.borrow_mut().push(format!("{}:save", self.name));
        let mut root = Element::new(self.name);
        root.add_value("Seen", true);
        config.add_named_configuration(root);
    }

    fn restore(&mut self, phase: RestorePhase, config: &Configuration) {
        let found = config.named_configuration(self.name).is_some();
        self.recorder
            .log
            .borrow_mut()
            .push(format!("{}:{phase:?}:{found}", self.name));
    }
}

#[test]
fn participants_run_in_registration_order() {
    let (_dir, mut store) = store();
    let recorder = Recorder::default();
    let mut session = manager();
    for name in ["StripChart", "PvLog"] {
        session.register_participant(Box::new(Participant {
            name,
            recorder: recorder.clone(),
        }));
    }
    session.launch(&StartupParams::default(), &store);
    session.save(&mut store, "Default").unwrap();
    session.restore(&store, "Default");

    assert_eq!(
        *recorder.log.borrow(),
        vec![
            "StripChart:save",
            "PvLog:save",
            "StripChart:RestoreApplication:true",
            "PvLog:RestoreApplication:true",
            "StripChart:RestoreFramework:true",
            "PvLog:RestoreFramework:true",
        ]
    );
}

#[test]
fn launch_opens_one_window_per_file() {
    let (_dir, store) = store();
    let mut session = manager();
    let params = StartupParams {
        filenames: vec!["a.ui".into(), "b.ui".into()],
        startup_customisation_name: "Operator".into(),
        application_title: "Beamline".into(),
        ..Default::default()
    };
    let outcome = session.launch(&params, &store);

    assert_eq!(outcome, LaunchOutcome { restored: None, windows: 2 });
    for (window, file) in session.windows().iter().zip(["a.ui", "b.ui"]) {
        let state = session.host().window(window.id).unwrap();
        assert_eq!(state.title, "Beamline");
        assert_eq!(state.customisation_name, "Operator");
        assert_eq!(window.panels[0].file, file);
    }
    assert!(session.host().warnings().is_empty());
}

#[test]
fn autosave_recovery_follows_policy() {
    let (_dir, mut store) = store();
    store_with_window(
        &mut store,
        AUTOSAVE_NAME,
        WindowSessionNode {
            panels: vec![gui("crashed.ui", None)],
            ..Default::default()
        },
    );

    let mut always = SessionManager::new(
        HeadlessHost::new(Rect::new(0, 0, 1920, 1080), 24),
        SessionOptions {
            recover: RecoverPolicy::Always,
            ..Default::default()
        },
    );
    let outcome = always.launch(&restore_params("Default"), &store);
    assert_eq!(outcome.restored.as_deref(), Some(AUTOSAVE_NAME));
    assert_eq!(always.windows()[0].panels[0].file, "crashed.ui");

    // Declined: the requested restore runs instead, finds nothing and warns.
    let mut asked = manager();
    let outcome = asked.launch(&restore_params("Default"), &store);
    assert_eq!(outcome.restored.as_deref(), Some("Default"));
    assert_eq!(asked.host().warnings().len(), 1);

    let mut accepted = manager();
    accepted.host_mut().set_recover_autosave(true);
    let outcome = accepted.launch(&StartupParams::default(), &store);
    assert_eq!(outcome.restored.as_deref(), Some(AUTOSAVE_NAME));

    let mut disabled = SessionManager::new(
        HeadlessHost::new(Rect::new(0, 0, 1920, 1080), 24),
        SessionOptions {
            recover: RecoverPolicy::Always,
            ..Default::default()
        },
    );
    let params = StartupParams {
        disable_autosave: true,
        ..Default::default()
    };
    assert_eq!(disabled.launch(&params, &store).restored, None);
}

#[test]
fn scaling_is_clamped_before_the_host() {
    let mut session = manager();
    session.apply_scaling(1000.0, 5.0);
    assert_eq!(session.host().scaling(), (400.0, 40.0));
}
