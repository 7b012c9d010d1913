use std::{
    fs,
    sync::{Mutex, MutexGuard},
};

use tempfile::TempDir;

static ENV_LOCK: Mutex<()> = Mutex::new(());

pub fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().expect("env lock should not be poisoned")
}

pub const INDEX_HTML: &str = "<!doctype html><h1>hello from the edge</h1>";

/// A small static site: `index.html` plus a nested stylesheet.
pub fn web_fixture() -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    fs::write(dir.path().join("index.html"), INDEX_HTML).expect("index should be written");
    fs::create_dir_all(dir.path().join("css")).expect("css dir should be created");
    fs::write(dir.path().join("css").join("site.css"), "h1 { color: teal; }")
        .expect("stylesheet should be written");
    dir
}
