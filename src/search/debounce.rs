use super::{search, SearchState};
use crate::news::ContentSource;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::sleep;

/// Runs until the query sender is dropped. Each query change (re)starts a
/// `delay` timer; the search fires once the query has been quiet that long.
/// Searches run one at a time, so a state is never replaced by an older
/// query's results. Dropping the sender abandons a search in flight.
pub async fn run(
    source: Arc<dyn ContentSource>,
    mut queries: watch::Receiver<String>,
    states: watch::Sender<SearchState>,
    delay: Duration,
    per_page: u32,
) {
    let mut pending = false;
    loop {
        if !pending && queries.changed().await.is_err() {
            return;
        }
        loop {
            tokio::select! {
                _ = sleep(delay) => break,
                changed = queries.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
            }
        }

        let query = queries.borrow_and_update().clone();
        if query.trim().is_empty() {
            states.send_replace(SearchState::Idle);
            pending = false;
            continue;
        }
        states.send_replace(SearchState::Searching {
            query: query.clone(),
        });
        let state = tokio::select! {
            state = search(source.as_ref(), &query, per_page) => state,
            _ = sender_dropped(&mut queries) => {
                log::debug!("search for {:?} abandoned", query);
                return;
            }
        };
        states.send_replace(state);
        // typed while the search ran
        pending = *queries.borrow() != query;
    }
}

/// Resolves once the query sender is gone, swallowing intermediate edits.
async fn sender_dropped(queries: &mut watch::Receiver<String>) {
    while queries.changed().await.is_ok() {}
}
