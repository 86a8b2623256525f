// Tests for users-report against an in-process stub users service.
// These drive the public API the same way the event loop does.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use users_report::api::{
    Address, ApiError, ApiResult, DocumentType, QueryFilter, ResultPage, UserId, UserRecord, UsersApi,
};
use users_report::app::update::{apply_event, dispatch, pump, Effect};
use users_report::app::worker::Worker;
use users_report::app::{AppState, FilterState, Keymap, Theme};
use users_report::ui;

/// Records every request; answers listings with `page` (or a 500 when unset).
#[derive(Default)]
struct StubApi {
    page: Mutex<Option<ResultPage>>,
    fetches: Mutex<Vec<QueryFilter>>,
    documents: Mutex<Vec<(QueryFilter, DocumentType)>>,
    fail_documents: bool,
}

impl StubApi {
    fn serving(page: ResultPage) -> Arc<Self> {
        Arc::new(Self { page: Mutex::new(Some(page)), ..Self::default() })
    }

    fn fetches(&self) -> Vec<QueryFilter> {
        self.fetches.lock().unwrap().clone()
    }

    fn set_page(&self, page: Option<ResultPage>) {
        *self.page.lock().unwrap() = page;
    }
}

impl UsersApi for StubApi {
    fn fetch_page(&self, filter: &QueryFilter) -> ApiResult<ResultPage> {
        self.fetches.lock().unwrap().push(filter.clone());
        self.page.lock().unwrap().clone().ok_or(ApiError::Status(500))
    }

    fn fetch_document(&self, filter: &QueryFilter, format: DocumentType) -> ApiResult<Vec<u8>> {
        self.documents.lock().unwrap().push((filter.clone(), format));
        if self.fail_documents {
            return Err(ApiError::Transport("connection reset".into()));
        }
        Ok(format!("{}:{}", format.as_param(), filter.search).into_bytes())
    }
}

fn users(n: usize) -> Vec<UserRecord> {
    (1..=n)
        .map(|i| UserRecord {
            id: UserId::Number(i as i64),
            name: format!("User {i}"),
            email: format!("user{i}@example.com"),
            address: Address { address: format!("{i} Oak Ave"), city: "Lyon".to_string() },
        })
        .collect()
}

fn setup(stub: &Arc<StubApi>, out: &Path) -> (AppState, Worker) {
    let api: Arc<dyn UsersApi> = stub.clone();
    let worker = Worker::new(api, out);
    let app = AppState::new(FilterState::new(10), Theme::default(), Keymap::default(), out);
    (app, worker)
}

/// Start scheduled work and apply completions until nothing is in flight.
fn settle(app: &mut AppState, worker: &Worker) {
    pump(app, worker);
    while app.filter.is_loading() || app.filter.is_downloading() {
        let event = worker.next_timeout(Duration::from_secs(5)).expect("request should complete");
        apply_event(app, event);
    }
}

fn screen(app: &AppState) -> Vec<String> {
    let mut terminal = Terminal::new(TestBackend::new(110, 30)).expect("terminal");
    terminal.draw(|f| ui::render(f, app)).expect("draw");
    let buffer = terminal.backend().buffer().clone();
    let width = buffer.area.width as usize;
    buffer
        .content()
        .chunks(width)
        .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
        .collect()
}

#[test]
fn first_page_shows_ten_rows_and_total() {
    let stub = StubApi::serving(ResultPage { data: users(10), total: 57 });
    let out = tempfile::tempdir().unwrap();
    let (mut app, worker) = setup(&stub, out.path());

    settle(&mut app, &worker);

    assert_eq!(stub.fetches(), vec![QueryFilter { page: 1, per_page: 10, search: String::new() }]);
    assert_eq!(app.rows().len(), 10);

    let lines = screen(&app);
    let row_lines = lines.iter().filter(|l| l.contains("@example.com")).count();
    assert_eq!(row_lines, 10);
    assert!(lines.iter().any(|l| l.contains("total 57")), "{lines:#?}");
    assert!(lines.iter().any(|l| l.contains("Page 1/6")));
}

#[test]
fn submitted_search_issues_exactly_one_fetch_with_that_filter() {
    let stub = StubApi::serving(ResultPage { data: users(10), total: 57 });
    let out = tempfile::tempdir().unwrap();
    let (mut app, worker) = setup(&stub, out.path());
    settle(&mut app, &worker);

    app.filter.set_page(3, 25);
    settle(&mut app, &worker);
    app.filter.set_search_text("alice");
    settle(&mut app, &worker);
    assert_eq!(stub.fetches().len(), 2, "typing alone must not fetch");

    app.filter.submit_search();
    settle(&mut app, &worker);

    let fetches = stub.fetches();
    assert_eq!(fetches.len(), 3);
    assert_eq!(fetches[2], QueryFilter { page: 1, per_page: 25, search: "alice".to_string() });
}

#[test]
fn failed_fetch_keeps_rows_and_clears_loading() {
    let stub = StubApi::serving(ResultPage { data: users(10), total: 57 });
    let out = tempfile::tempdir().unwrap();
    let (mut app, worker) = setup(&stub, out.path());
    settle(&mut app, &worker);
    let before = app.filter.page().clone();

    stub.set_page(None);
    app.filter.set_page(2, 10);
    pump(&mut app, &worker);
    assert!(app.filter.is_loading());
    let event = worker.next_timeout(Duration::from_secs(5)).expect("fetch completes");
    apply_event(&mut app, event);

    assert!(!app.filter.is_loading());
    assert_eq!(app.filter.page(), &before);
    assert_eq!(app.filter.filter().page, 2);
}

#[test]
fn loading_marker_is_drawn_while_fetching() {
    let stub = StubApi::serving(ResultPage { data: users(2), total: 2 });
    let out = tempfile::tempdir().unwrap();
    let (mut app, _worker) = setup(&stub, out.path());
    app.filter.take_scheduled_fetch();
    assert!(screen(&app).iter().any(|l| l.contains("Loading...")));
}

#[test]
fn download_pdf_and_excel_use_matching_file_names() {
    let stub = StubApi::serving(ResultPage { data: users(10), total: 57 });
    let out = tempfile::tempdir().unwrap();
    let (mut app, worker) = setup(&stub, out.path());
    settle(&mut app, &worker);
    app.filter.set_search_text("carol");
    app.filter.submit_search();
    settle(&mut app, &worker);

    dispatch(&mut app, &worker, Effect::Download(DocumentType::Pdf));
    settle(&mut app, &worker);
    dispatch(&mut app, &worker, Effect::Download(DocumentType::Excel));
    settle(&mut app, &worker);

    assert_eq!(std::fs::read(out.path().join("users-report.pdf")).unwrap(), b"pdf:carol");
    assert_eq!(std::fs::read(out.path().join("users-report.xlsx")).unwrap(), b"excel:carol");
    let docs = stub.documents.lock().unwrap().clone();
    assert_eq!(docs.len(), 2);
    assert!(docs.iter().all(|(f, _)| f.search == "carol" && f.page == 1));
}

#[test]
fn failed_download_writes_nothing_and_clears_spinner() {
    let stub = Arc::new(StubApi {
        page: Mutex::new(Some(ResultPage { data: users(1), total: 1 })),
        fail_documents: true,
        ..StubApi::default()
    });
    let out = tempfile::tempdir().unwrap();
    let (mut app, worker) = setup(&stub, out.path());
    settle(&mut app, &worker);

    dispatch(&mut app, &worker, Effect::Download(DocumentType::Pdf));
    assert!(app.filter.is_downloading());
    settle(&mut app, &worker);

    assert!(!app.filter.is_downloading());
    assert!(!out.path().join("users-report.pdf").exists());
    assert!(app.notice.is_none());
}

#[test]
fn theme_and_keymap_files_are_created_and_reloaded() {
    let dir = tempfile::tempdir().unwrap();
    let theme_path = dir.path().join("theme.conf");
    let keys_path = dir.path().join("keybinds.conf");

    let theme = Theme::load_or_init(&theme_path);
    assert!(theme_path.exists());
    assert_eq!(Theme::from_file(&theme_path), Some(theme));

    let keymap = Keymap::load_or_init(&keys_path);
    assert!(keys_path.exists());
    let reloaded = Keymap::from_file(&keys_path).expect("reload keymap");
    let mut a = keymap.all_bindings();
    let mut b = reloaded.all_bindings();
    a.sort_by_key(|(k, _)| format!("{k:?}"));
    b.sort_by_key(|(k, _)| format!("{k:?}"));
    assert_eq!(a, b);
}
