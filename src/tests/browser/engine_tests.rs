use std::sync::Mutex;

use futures::FutureExt;
use tokio::time::sleep;

use super::*;
use crate::model::param;

#[derive(Clone, Debug, PartialEq)]
struct Group(String);

impl BrowsableResource for Group {
    const NOUN: &'static str = "groups";
    const FILTER: FilterMode = FilterMode::Remote;

    fn matches(&self, needle: &str) -> bool {
        self.0.to_lowercase().contains(needle)
    }

    fn row(&self, _now: OffsetDateTime) -> Row {
        Row::text(self.0.clone())
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Secretish(String);

impl BrowsableResource for Secretish {
    const NOUN: &'static str = "secrets";
    const FILTER: FilterMode = FilterMode::Local;

    fn matches(&self, needle: &str) -> bool {
        self.0.to_lowercase().contains(needle)
    }

    fn row(&self, _now: OffsetDateTime) -> Row {
        Row::text(self.0.clone())
    }
}

type Calls = Arc<Mutex<Vec<String>>>;

const QUIET: Duration = Duration::from_millis(400);

fn profile() -> Profile {
    Profile::new("dev", None)
}

/// Serves `names` filtered by prefix after `delay(filter)` milliseconds.
fn prefix_loader(calls: Calls, names: &[&str], delay: fn(&str) -> u64) -> Loader<Group> {
    let names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
    Box::new(move |req: &LoadRequest| {
        calls.lock().unwrap().push(req.filter.clone());
        let filter = req.filter.clone();
        let names = names.clone();
        let wait = Duration::from_millis(delay(&filter));
        Some(
            async move {
                sleep(wait).await;
                let items: Vec<Group> = names
                    .into_iter()
                    .filter(|n| n.starts_with(&filter))
                    .map(Group)
                    .collect();
                Ok::<_, FetchError>(Fetched::complete(items))
            }
            .boxed(),
        )
    })
}

fn groups_browser(loader: Loader<Group>) -> ResourceBrowser<Group> {
    ResourceBrowser::new(
        profile(),
        &ScreenState::bare(ScreenId::LogGroups),
        loader,
        QUIET,
        None,
        5,
    )
}

fn row_texts(body: &Body) -> Vec<String> {
    match body {
        Body::Rows(w) => w.rows.iter().map(Row::plain).collect(),
        other => panic!("expected rows, got {other:?}"),
    }
}

async fn tick(b: &mut ResourceBrowser<impl BrowsableResource>, ms: u64) {
    sleep(Duration::from_millis(ms)).await;
    b.sync(Instant::now());
}

#[tokio::test(start_paused = true)]
async fn typing_within_quiet_period_fetches_once_for_final_text() {
    let calls = Calls::default();
    let mut b = groups_browser(prefix_loader(
        calls.clone(),
        &["abc-1", "abcd-2", "xyz"],
        |_| 20,
    ));
    b.sync(Instant::now());
    tick(&mut b, 50).await;
    assert_eq!(b.total(), 3);

    b.handle(Intent::Char('/'), Instant::now());
    for c in "abc".chars() {
        b.handle(Intent::Char(c), Instant::now());
    }
    assert!(b.filter_line("").pending);
    tick(&mut b, 60).await;
    b.handle(Intent::Char('d'), Instant::now());

    for _ in 0..12 {
        tick(&mut b, 50).await;
    }

    assert_eq!(*calls.lock().unwrap(), vec!["".to_string(), "abcd".to_string()]);
    assert_eq!(b.settled_filter(), "abcd");
    assert_eq!(row_texts(&b.body(OffsetDateTime::UNIX_EPOCH)), vec!["abcd-2"]);
}

#[tokio::test(start_paused = true)]
async fn slow_stale_result_does_not_replace_newer_one() {
    let calls = Calls::default();
    let mut b = groups_browser(prefix_loader(
        calls.clone(),
        &["alpha", "beta", "bravo"],
        |filter| if filter.is_empty() { 1_000 } else { 10 },
    ));
    b.sync(Instant::now());
    assert!(matches!(b.body(OffsetDateTime::UNIX_EPOCH), Body::Loading(_)));

    b.handle(Intent::Char('/'), Instant::now());
    b.handle(Intent::Char('b'), Instant::now());
    // Settles at 400ms, the "b" fetch lands at 410ms.
    for _ in 0..9 {
        tick(&mut b, 50).await;
    }
    assert_eq!(*calls.lock().unwrap(), vec!["".to_string(), "b".to_string()]);
    assert_eq!(
        row_texts(&b.body(OffsetDateTime::UNIX_EPOCH)),
        vec!["beta", "bravo"]
    );

    // The unfiltered fetch lands at 1000ms and must be dropped.
    tick(&mut b, 700).await;
    assert_eq!(
        row_texts(&b.body(OffsetDateTime::UNIX_EPOCH)),
        vec!["beta", "bravo"]
    );
    assert!(!b.is_loading());
}

#[tokio::test(start_paused = true)]
async fn local_filter_narrows_without_refetching() {
    let calls = Calls::default();
    let names = ["prod/db", "prod/api", "staging/db"];
    let recorded = calls.clone();
    let loader: Loader<Secretish> = Box::new(move |req: &LoadRequest| {
        recorded.lock().unwrap().push(req.filter.clone());
        let items: Vec<Secretish> = names.iter().map(|n| Secretish(n.to_string())).collect();
        Some(async move { Ok::<_, FetchError>(Fetched::complete(items)) }.boxed())
    });
    let mut b = ResourceBrowser::new(
        profile(),
        &ScreenState::bare(ScreenId::Secrets),
        loader,
        QUIET,
        None,
        10,
    );
    b.sync(Instant::now());
    tick(&mut b, 1).await;
    assert_eq!(b.shown(), 3);

    b.handle(Intent::Char('/'), Instant::now());
    for c in "DB".chars() {
        b.handle(Intent::Char(c), Instant::now());
    }
    tick(&mut b, 450).await;
    assert_eq!(b.shown(), 2);
    assert_eq!(b.total(), 3);
    assert_eq!(calls.lock().unwrap().len(), 1);

    for c in "zz".chars() {
        b.handle(Intent::Char(c), Instant::now());
    }
    b.handle(Intent::Confirm, Instant::now());
    assert!(!b.filter_focused());
    assert_eq!(
        b.body(OffsetDateTime::UNIX_EPOCH),
        Body::Empty("No secrets match filter".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn missing_parameters_degrade_to_empty_without_fetching() {
    let mut b: ResourceBrowser<Group> = ResourceBrowser::new(
        profile(),
        &ScreenState::bare(ScreenId::LogStreams),
        Box::new(|req: &LoadRequest| {
            req.params.require(param::LOG_GROUP)?;
            Some(async { Ok::<_, FetchError>(Fetched::<Group>::default()) }.boxed())
        }),
        QUIET,
        None,
        5,
    );
    b.sync(Instant::now());
    assert_eq!(b.fetches(), 0);
    assert!(matches!(b.body(OffsetDateTime::UNIX_EPOCH), Body::Empty(_)));
    assert!(b.selected().is_none());
}

#[tokio::test(start_paused = true)]
async fn not_found_and_errors_replace_the_body() {
    let mut b = groups_browser(Box::new(|req: &LoadRequest| {
        let err = if req.filter.is_empty() {
            FetchError::NotFound("log group /gone".to_string())
        } else {
            FetchError::transport("DescribeLogGroups", "AccessDenied")
        };
        Some(async move { Err::<Fetched<Group>, _>(err) }.boxed())
    }));
    b.sync(Instant::now());
    tick(&mut b, 1).await;
    assert!(matches!(b.body(OffsetDateTime::UNIX_EPOCH), Body::NotFound(_)));

    b.handle(Intent::Char('/'), Instant::now());
    b.handle(Intent::Char('x'), Instant::now());
    b.handle(Intent::Confirm, Instant::now());
    b.sync(Instant::now());
    tick(&mut b, 1).await;
    assert_eq!(
        b.body(OffsetDateTime::UNIX_EPOCH),
        Body::Error("DescribeLogGroups: AccessDenied".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn refresh_refetches_and_is_ignored_while_loading() {
    let calls = Calls::default();
    let mut b = groups_browser(prefix_loader(calls.clone(), &["a", "b"], |_| 100));
    b.sync(Instant::now());
    assert_eq!(b.handle(Intent::Char('r'), Instant::now()), Handled::Ignored(Intent::Char('r')));
    tick(&mut b, 150).await;

    assert_eq!(b.handle(Intent::Char('r'), Instant::now()), Handled::Consumed);
    assert_eq!(b.fetches(), 2);
    // Previous rows stay up while the refresh is in flight.
    assert_eq!(row_texts(&b.body(OffsetDateTime::UNIX_EPOCH)), vec!["a", "b"]);
    tick(&mut b, 150).await;
    assert!(!b.is_loading());
    assert_eq!(calls.lock().unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn cursor_moves_and_opens_selected_item() {
    let names: Vec<String> = (0..12).map(|i| format!("g{i:02}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let mut b = groups_browser(prefix_loader(Calls::default(), &refs, |_| 1));
    b.sync(Instant::now());
    tick(&mut b, 5).await;

    for _ in 0..6 {
        b.handle(Intent::Down, Instant::now());
    }
    assert_eq!(b.window().selected(), 6);
    assert_eq!(b.window().offset(), 2);
    match b.body(OffsetDateTime::UNIX_EPOCH) {
        Body::Rows(w) => {
            assert_eq!(w.rows.len(), 5);
            assert_eq!(w.selected, Some(4));
            assert_eq!(w.position().as_deref(), Some("7/12"));
        }
        other => panic!("expected rows, got {other:?}"),
    }

    b.set_viewport_height(3);
    assert_eq!(b.window().offset(), 4);

    assert_eq!(
        b.handle(Intent::Confirm, Instant::now()),
        Handled::Open(Group("g06".to_string()))
    );
    assert_eq!(b.handle(Intent::Cancel, Instant::now()), Handled::Ignored(Intent::Cancel));
}

#[tokio::test(start_paused = true)]
async fn escape_in_filter_clears_it() {
    let calls = Calls::default();
    let mut b = groups_browser(prefix_loader(calls.clone(), &["a"], |_| 1));
    b.sync(Instant::now());
    b.handle(Intent::Char('/'), Instant::now());
    b.handle(Intent::Char('q'), Instant::now());
    assert_eq!(b.filter_text(), "q");

    b.handle(Intent::Cancel, Instant::now());
    assert_eq!(b.filter_text(), "");
    assert!(!b.filter_focused());
    tick(&mut b, 500).await;
    assert_eq!(*calls.lock().unwrap(), vec!["".to_string()]);
}
