#![allow(dead_code)]

use axum::Router;
use std::{fs, path::Path, sync::Arc};
use tempfile::TempDir;
use typetest::{create_router, AppState, Config, Language, StatsDb};

pub const EN_WORDS: &str = "a\nan\nox\ncat\ndog\nfish\nhorse\n-stem\nwombat\nbuffalo\nelephant\nhippopotamus\nkeyboard\nlanguage\npractice\nsentence\n";
pub const RU_WORDS: &str = "кот\nдом\nлес\nмир\nсад\nмост\nрека\nокно\n-ся\nгород\nкнига\nмашина\nдерево\nпрограмма\nклавиатура\n";

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub dir: TempDir,
}

pub fn write_corpus(dir: &Path, name: &str, words: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, words).expect("Failed to write word list");
    path
}

pub fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config
        .corpora
        .insert(Language::En, write_corpus(dir, "en.txt", EN_WORDS));
    config
        .corpora
        .insert(Language::Ru, write_corpus(dir, "ru.txt", RU_WORDS));
    config
}

pub fn app_with_config(config: Config, dir: TempDir) -> TestApp {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let db = StatsDb::open_in_memory().expect("Failed to open test database");
    let state = Arc::new(AppState::new(config, db));
    TestApp {
        router: create_router(state.clone()),
        state,
        dir,
    }
}

pub fn create_test_app() -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = test_config(dir.path());
    app_with_config(config, dir)
}
