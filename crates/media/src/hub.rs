//! Live breakpoint subscriptions.

use crate::query::MediaQuery;
use crate::viewport::Viewport;
use std::collections::HashMap;

/// Handle identifying one watch subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WatchId(u64);

/// A watch whose match state flipped during a viewport change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaChange {
    pub id: WatchId,
    pub matches: bool,
}

struct Watcher {
    query: MediaQuery,
    matches: bool,
}

/// Owns the viewport and every live media watch.
///
/// Watches are evaluated eagerly at registration and re-evaluated on
/// every viewport change; [`MediaHub::set_viewport`] reports exactly
/// the watches whose state flipped, in registration order. A watch
/// stops reporting the moment it is cancelled with
/// [`MediaHub::unwatch`].
pub struct MediaHub {
    viewport: Viewport,
    next_id: u64,
    watchers: HashMap<WatchId, Watcher>,
}

impl MediaHub {
    /// Create a hub for the given initial viewport.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            next_id: 0,
            watchers: HashMap::new(),
        }
    }

    /// Current viewport.
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Evaluate a query against the current viewport without watching.
    pub fn evaluate(&self, query: &MediaQuery) -> bool {
        query.matches(self.viewport)
    }

    /// Register a watch; the returned id can be polled and cancelled.
    pub fn watch(&mut self, query: MediaQuery) -> WatchId {
        let id = WatchId(self.next_id);
        self.next_id += 1;
        let matches = query.matches(self.viewport);
        log::debug!("watch {id:?} on `{query}` starts {matches}");
        self.watchers.insert(id, Watcher { query, matches });
        id
    }

    /// Cancel a watch. Returns whether it was still live.
    pub fn unwatch(&mut self, id: WatchId) -> bool {
        let live = self.watchers.remove(&id).is_some();
        if live {
            log::debug!("unwatch {id:?}");
        }
        live
    }

    /// Last delivered match state for a live watch.
    pub fn is_matching(&self, id: WatchId) -> Option<bool> {
        self.watchers.get(&id).map(|watcher| watcher.matches)
    }

    /// Update the viewport and return the watches whose match state
    /// flipped, ordered by watch id.
    pub fn set_viewport(&mut self, width: i32, height: i32) -> Vec<MediaChange> {
        self.viewport = Viewport::new(width, height);
        let mut changes = Vec::new();
        for (id, watcher) in &mut self.watchers {
            let now = watcher.query.matches(self.viewport);
            if now != watcher.matches {
                watcher.matches = now;
                changes.push(MediaChange {
                    id: *id,
                    matches: now,
                });
            }
        }
        changes.sort_by_key(|change| change.id);
        log::debug!(
            "viewport {}x{}: {} watch(es) flipped",
            width,
            height,
            changes.len()
        );
        changes
    }
}
