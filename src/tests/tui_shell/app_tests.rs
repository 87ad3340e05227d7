use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use time::OffsetDateTime;
use tokio::time::{Instant, sleep};

use super::app::event_loop::until;
use super::app::{App, render, viewport_height};
use super::input::intent_for;
use crate::browser::Intent;
use crate::config::Settings;
use crate::model::{Profile, ScreenId, param};
use crate::provider::{StaticProvider, demo_dataset};
use crate::tui::TuiRunOptions;

fn options(initial_profile: Option<Profile>) -> TuiRunOptions {
    TuiRunOptions {
        settings: Settings::default(),
        provider: Arc::new(StaticProvider::new(demo_dataset(OffsetDateTime::now_utc()))),
        profiles: vec![
            Profile::new("demo", Some("eu-west-1".to_string())),
            Profile::new("ci", None),
        ],
        initial_profile,
    }
}

async fn settle(app: &mut App) {
    for _ in 0..4 {
        sleep(Duration::from_millis(5)).await;
        app.sync(Instant::now());
    }
}

fn press(app: &mut App, intent: Intent) {
    app.handle(intent, Instant::now());
}

fn screen_text(app: &App) -> String {
    let backend = TestBackend::new(100, 24);
    let mut terminal = Terminal::new(backend).unwrap();
    let view = app.screen.view(OffsetDateTime::now_utc());
    terminal.draw(|f| render::draw(f, &view)).unwrap();
    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

#[test]
fn keys_map_to_intents() {
    let key = |code, modifiers| KeyEvent::new(code, modifiers);
    assert_eq!(
        intent_for(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        Some(Intent::Quit)
    );
    assert_eq!(
        intent_for(key(KeyCode::Char('q'), KeyModifiers::NONE)),
        Some(Intent::Char('q'))
    );
    assert_eq!(
        intent_for(key(KeyCode::Esc, KeyModifiers::NONE)),
        Some(Intent::Cancel)
    );
    assert_eq!(
        intent_for(key(KeyCode::Enter, KeyModifiers::NONE)),
        Some(Intent::Confirm)
    );
    assert_eq!(intent_for(key(KeyCode::F(1), KeyModifiers::NONE)), None);
    assert_eq!(
        intent_for(key(KeyCode::Char('x'), KeyModifiers::CONTROL)),
        None
    );
}

#[test]
fn viewport_excludes_chrome() {
    assert_eq!(viewport_height(30), 24);
    assert_eq!(viewport_height(4), 1);
}

#[tokio::test(start_paused = true)]
async fn starts_on_profile_selection_without_profile() {
    let mut app = App::load(options(None), None, 30);
    assert_eq!(app.nav.current().screen, ScreenId::ProfileSelect);

    press(&mut app, Intent::Confirm);
    assert_eq!(app.nav.current().screen, ScreenId::MainMenu);
    assert_eq!(app.nav.profile().map(|p| p.name.as_str()), Some("demo"));
    assert!(screen_text(&app).contains("awstui [demo · eu-west-1] › Main Menu"));
}

#[tokio::test(start_paused = true)]
async fn walks_down_to_a_service_and_back() {
    let demo = Profile::new("demo", Some("eu-west-1".to_string()));
    let mut app = App::load(options(Some(demo)), None, 30);
    assert_eq!(app.nav.current().screen, ScreenId::MainMenu);

    press(&mut app, Intent::Down);
    press(&mut app, Intent::Confirm);
    assert_eq!(app.nav.current().screen, ScreenId::Clusters);
    settle(&mut app).await;
    assert!(screen_text(&app).contains("(2 clusters)"));

    press(&mut app, Intent::Confirm);
    assert_eq!(app.nav.current().screen, ScreenId::Services);
    assert_eq!(app.nav.current().params.get(param::CLUSTER_NAME), Some("main"));
    settle(&mut app).await;

    press(&mut app, Intent::Down);
    press(&mut app, Intent::Down);
    press(&mut app, Intent::Confirm);
    assert_eq!(app.nav.current().screen, ScreenId::ServiceDetail);
    assert_eq!(app.nav.current().params.get(param::SERVICE_NAME), Some("worker"));
    settle(&mut app).await;
    assert!(screen_text(&app).contains("1/4"));
    assert_eq!(app.nav.depth(), 3);

    press(&mut app, Intent::Cancel);
    assert_eq!(app.nav.current().screen, ScreenId::Services);

    press(&mut app, Intent::Char('m'));
    assert_eq!(app.nav.current().screen, ScreenId::MainMenu);
    assert_eq!(app.nav.depth(), 0);

    assert!(!app.quit);
    press(&mut app, Intent::Char('q'));
    assert!(app.quit);
}

#[tokio::test(start_paused = true)]
async fn change_profile_returns_to_selection() {
    let demo = Profile::new("demo", Some("eu-west-1".to_string()));
    let mut app = App::load(options(Some(demo)), None, 30);
    press(&mut app, Intent::Char('p'));
    assert_eq!(app.nav.current().screen, ScreenId::ProfileSelect);
    assert_eq!(app.nav.profile(), None);
    assert!(screen_text(&app).contains("Profile Select"));
}

#[tokio::test(start_paused = true)]
async fn resize_reaches_screen_and_context() {
    let demo = Profile::new("demo", Some("eu-west-1".to_string()));
    let mut app = App::load(options(Some(demo)), None, 30);
    app.resize(12);
    assert_eq!(app.ctx.viewport_height, 6);
}

#[tokio::test(start_paused = true)]
async fn deploy_prompt_is_drawn_over_the_detail() {
    let demo = Profile::new("demo", Some("eu-west-1".to_string()));
    let mut app = App::load(options(Some(demo)), None, 30);
    press(&mut app, Intent::Down);
    press(&mut app, Intent::Confirm);
    settle(&mut app).await;
    press(&mut app, Intent::Confirm);
    settle(&mut app).await;
    press(&mut app, Intent::Confirm);
    settle(&mut app).await;

    press(&mut app, Intent::Char('d'));
    let text = screen_text(&app);
    assert!(text.contains("Force New Deployment"));
    assert!(text.contains("y/enter confirm"));

    // Esc closes the prompt instead of leaving the screen.
    press(&mut app, Intent::Cancel);
    assert_eq!(app.nav.current().screen, ScreenId::ServiceDetail);
}

#[tokio::test(start_paused = true)]
async fn typed_filter_sets_a_wake_deadline() {
    let demo = Profile::new("demo", Some("eu-west-1".to_string()));
    let mut app = App::load(options(Some(demo)), None, 30);
    press(&mut app, Intent::Confirm);
    assert_eq!(app.nav.current().screen, ScreenId::LogGroups);
    settle(&mut app).await;
    assert_eq!(app.screen.deadline(), None);

    press(&mut app, Intent::Char('/'));
    for c in "/ecs".chars() {
        press(&mut app, Intent::Char(c));
    }
    let due = app.screen.deadline().expect("pending filter");
    assert!(due <= Instant::now() + app.ctx.settings.debounce());

    tokio::time::timeout(Duration::from_secs(60), until(Some(due)))
        .await
        .expect("deadline wakes");
    assert!(Instant::now() >= due);
    assert!(app.sync(Instant::now()));
    assert_eq!(app.screen.deadline(), None);

    let idle = tokio::time::timeout(Duration::from_secs(1), until(None)).await;
    assert!(idle.is_err());
}
