//! Request handler module
//!
//! Routes requests to the site pages, static assets, the health probe and the
//! contact form endpoint.

pub mod contact;
pub mod pages;
pub mod router;

// Re-export main entry point
pub use router::handle_request;

#[cfg(test)]
pub(crate) mod test_support {
    //! A throwaway site on disk: templates, one asset and a `SQLite` store.

    use http_body_util::{BodyExt, Full};
    use hyper::body::Bytes;
    use hyper::Response;
    use sqlx::sqlite::SqliteConnectOptions;
    use sqlx::ConnectOptions;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tempfile::TempDir;

    use crate::config::{AppState, Config};
    use crate::storage::{MessageStore, SqliteStore};

    pub type MessageRow = (i64, String, String, String);

    pub struct TestSite {
        _dir: TempDir,
        db_path: PathBuf,
        pub state: Arc<AppState>,
    }

    impl TestSite {
        pub async fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let templates = dir.path().join("templates");
            let assets = dir.path().join("static");
            std::fs::create_dir_all(&templates).unwrap();
            std::fs::create_dir_all(assets.join("js")).unwrap();
            for page in ["index", "services", "portfolio", "contact"] {
                std::fs::write(
                    templates.join(format!("{page}.html")),
                    format!("<html><body><h1>{page}</h1></body></html>"),
                )
                .unwrap();
            }
            std::fs::write(assets.join("js/contact.js"), "console.log('hi');").unwrap();

            let db_path = dir.path().join("site.db");
            let store = SqliteStore::new(&db_path);
            store.ensure_schema().await.unwrap();

            let mut config = Config::load_from("does-not-exist").unwrap();
            config.site.template_dir = templates.to_str().unwrap().to_string();
            config.site.static_dir = assets.to_str().unwrap().to_string();
            config.storage.sqlite_path = db_path.to_str().unwrap().to_string();
            config.storage.database_url = None;
            config.http.server_name = "contact-site-test".to_string();
            config.logging.access_log = false;

            Self {
                _dir: dir,
                db_path,
                state: Arc::new(AppState::new(config, Arc::new(store))),
            }
        }

        fn state_mut(&mut self) -> &mut AppState {
            Arc::get_mut(&mut self.state).expect("test state is not shared")
        }

        pub fn set_store(&mut self, store: Arc<dyn MessageStore>) {
            self.state_mut().store = store;
        }

        pub fn set_max_body_size(&mut self, limit: u64) {
            self.state_mut().config.http.max_body_size = limit;
        }

        pub fn set_cors(&mut self, enabled: bool) {
            self.state_mut().config.http.enable_cors = enabled;
        }

        /// Rows in the embedded store, oldest first
        pub async fn messages(&self) -> Vec<MessageRow> {
            let mut conn = SqliteConnectOptions::new()
                .filename(&self.db_path)
                .connect()
                .await
                .unwrap();
            sqlx::query_as("SELECT id, name, email, message FROM messages ORDER BY id")
                .fetch_all(&mut conn)
                .await
                .unwrap()
        }
    }

    pub async fn body_json(resp: Response<Full<Bytes>>) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }
}
