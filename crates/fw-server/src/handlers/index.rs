//! Landing page.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /.
///
/// Listing titles waits on the collection lock, which a save holds for its
/// whole propagation, so it runs on the blocking pool.
pub(crate) async fn get_index(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, ServerError> {
    let wiki = Arc::clone(&state.wiki);
    let titles = tokio::task::spawn_blocking(move || wiki.titles()).await?;
    Ok(Html(state.templates.render_index(&titles)?))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::sync::mpsc::{Sender, channel};
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use fw_storage::{MockStorage, Storage, StorageError};
    use fw_wiki::{LoadPolicy, Title, Wiki};
    use tower::ServiceExt;

    use super::*;
    use crate::app::create_router;

    /// Storage whose first write signals and then stalls, holding the
    /// collection lock for the duration of a save.
    struct StallingStorage {
        inner: MockStorage,
        started: Mutex<Option<Sender<()>>>,
        stall: Duration,
    }

    impl Storage for StallingStorage {
        fn read(&self, title: &str) -> Result<Vec<u8>, StorageError> {
            self.inner.read(title)
        }

        fn write(&self, title: &str, body: &[u8]) -> Result<PathBuf, StorageError> {
            if let Some(started) = self.started.lock().unwrap().take() {
                started.send(()).unwrap();
                std::thread::sleep(self.stall);
            }
            self.inner.write(title, body)
        }

        fn list(&self) -> Result<Vec<String>, StorageError> {
            self.inner.list()
        }

        fn location(&self, title: &str) -> Option<PathBuf> {
            self.inner.location(title)
        }

        fn exists(&self, title: &str) -> bool {
            self.inner.exists(title)
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_index_during_save_does_not_block_runtime() {
        let (started_tx, started_rx) = channel();
        let storage: Arc<dyn Storage> = Arc::new(StallingStorage {
            inner: MockStorage::new().with_page("Alpha", "a"),
            started: Mutex::new(Some(started_tx)),
            stall: Duration::from_millis(300),
        });
        let wiki = Arc::new(Wiki::load(storage, LoadPolicy::FailFast).unwrap());
        let app = create_router(Arc::new(AppState::new(Arc::clone(&wiki)).unwrap()));

        let saver = std::thread::spawn({
            let wiki = Arc::clone(&wiki);
            move || wiki.save(Title::parse("Beta").unwrap(), "b").unwrap()
        });
        started_rx.recv().unwrap();

        let index = tokio::spawn(app.oneshot(Request::get("/").body(Body::empty()).unwrap()));
        tokio::time::sleep(Duration::from_millis(20)).await;

        // The runtime thread stays free while the request waits for the lock.
        assert!(!index.is_finished());

        saver.join().unwrap();
        let response = index.await.unwrap().unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains(r#"<a href="/view/Alpha">Alpha</a>"#));
        assert!(html.contains(r#"<a href="/view/Beta">Beta</a>"#));
    }
}
