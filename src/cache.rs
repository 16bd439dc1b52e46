//! Process-wide shared cache guarded by one fair async mutex.
//!
//! The cache holds exactly two top-level entries:
//!
//! - `allowed_orgs`: the set of currently allowed external account
//!   identifiers
//! - `tools`: a session-partitioned table of [`ToolDescriptor`] sequences
//!
//! Every operation serializes through a single `tokio::sync::Mutex` (the
//! "gate"). Tokio's mutex is fair, so contended acquisitions are granted in
//! arrival order and a sequence of updates issued in a known order is
//! applied in that order. Writes replace the whole top-level value with a
//! fresh `Arc`, never mutating through one already handed out, so any
//! snapshot a reader holds stays frozen while the live cache moves on.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use once_cell::sync::Lazy;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::descriptor::ToolDescriptor;
use crate::error::CacheResult;
use crate::session::SessionId;

/// The session-partitioned tool table. Each session's descriptor list is
/// itself behind an `Arc` so cloning the table on copy-on-write updates is
/// cheap.
pub type ToolTable = HashMap<SessionId, Arc<Vec<ToolDescriptor>>>;

#[derive(Debug, Clone)]
struct CacheState {
    allowed_orgs: Arc<HashSet<String>>,
    tools: Arc<ToolTable>,
}

impl CacheState {
    fn initial() -> Self {
        let mut tools = ToolTable::new();
        tools.insert(SessionId::default(), Arc::new(Vec::new()));
        Self {
            allowed_orgs: Arc::new(HashSet::new()),
            tools: Arc::new(tools),
        }
    }
}

static GLOBAL: Lazy<SharedCache> = Lazy::new(SharedCache::new);

/// Concurrency-safe store for allowed organizations and per-session tools.
///
/// Usually accessed through [`SharedCache::global`]; independent instances
/// (for tests, or embedders that want scoped lifetimes) behave identically.
#[derive(Debug)]
pub struct SharedCache {
    state: Mutex<CacheState>,
}

impl SharedCache {
    /// Fresh cache: no allowed organizations, and a tool table containing
    /// only the default session with an empty descriptor list.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(CacheState::initial()),
        }
    }

    /// The process-wide instance, created on first access. Concurrent first
    /// calls observe the same instance.
    pub fn global() -> &'static SharedCache {
        &GLOBAL
    }

    /// Run `f` against the live state while holding the gate.
    ///
    /// This is the one primitive every public operation goes through. `f`
    /// is synchronous, so the critical section cannot suspend mid-update,
    /// and the guard is released on every exit path including unwinds.
    async fn with_state<R>(&self, f: impl FnOnce(&mut CacheState) -> R) -> R {
        let mut state = self.state.lock().await;
        f(&mut state)
    }

    // --- Allowed organizations ---

    /// Snapshot of the allowed-organization set.
    pub async fn allowed_orgs(&self) -> Arc<HashSet<String>> {
        self.with_state(|s| Arc::clone(&s.allowed_orgs)).await
    }

    /// Replace the allowed-organization set wholesale.
    pub async fn set_allowed_orgs(&self, orgs: HashSet<String>) {
        self.with_state(|s| s.allowed_orgs = Arc::new(orgs)).await
    }

    /// Compute a new allowed-organization set from the current one and
    /// install it, returning the new set.
    pub async fn update_allowed_orgs<F>(&self, f: F) -> Arc<HashSet<String>>
    where
        F: FnOnce(&HashSet<String>) -> HashSet<String>,
    {
        self.with_state(|s| {
            let next = Arc::new(f(&s.allowed_orgs));
            s.allowed_orgs = Arc::clone(&next);
            next
        })
        .await
    }

    /// Fallible variant of [`update_allowed_orgs`](Self::update_allowed_orgs).
    /// On `Err` nothing is written and the error propagates.
    pub async fn try_update_allowed_orgs<F>(&self, f: F) -> CacheResult<Arc<HashSet<String>>>
    where
        F: FnOnce(&HashSet<String>) -> CacheResult<HashSet<String>>,
    {
        self.with_state(|s| match f(&s.allowed_orgs) {
            Ok(next) => {
                let next = Arc::new(next);
                s.allowed_orgs = Arc::clone(&next);
                Ok(next)
            }
            Err(e) => {
                warn!("allowed_orgs update failed, state unchanged: {}", e);
                Err(e)
            }
        })
        .await
    }

    // --- Tool table ---

    /// Snapshot of the whole session-partitioned tool table.
    pub async fn tool_table(&self) -> Arc<ToolTable> {
        self.with_state(|s| Arc::clone(&s.tools)).await
    }

    /// Replace the tool table wholesale.
    pub async fn set_tool_table(&self, table: ToolTable) {
        self.with_state(|s| s.tools = Arc::new(table)).await
    }

    /// Compute a new tool table from the current one and install it,
    /// returning the new table.
    pub async fn update_tool_table<F>(&self, f: F) -> Arc<ToolTable>
    where
        F: FnOnce(&ToolTable) -> ToolTable,
    {
        self.with_state(|s| {
            let next = Arc::new(f(&s.tools));
            s.tools = Arc::clone(&next);
            next
        })
        .await
    }

    /// Fallible variant of [`update_tool_table`](Self::update_tool_table).
    /// On `Err` nothing is written and the error propagates.
    pub async fn try_update_tool_table<F>(&self, f: F) -> CacheResult<Arc<ToolTable>>
    where
        F: FnOnce(&ToolTable) -> CacheResult<ToolTable>,
    {
        self.with_state(|s| match f(&s.tools) {
            Ok(next) => {
                let next = Arc::new(next);
                s.tools = Arc::clone(&next);
                Ok(next)
            }
            Err(e) => {
                warn!("tool table update failed, state unchanged: {}", e);
                Err(e)
            }
        })
        .await
    }

    // --- Per-session operations ---

    /// Create an empty descriptor list for the resolved session if it does
    /// not already have one. An existing session (populated or not) is left
    /// untouched, and the table is not reallocated in that case.
    ///
    /// Returns the resulting table snapshot.
    pub async fn ensure_session(&self, session_id: Option<&str>) -> Arc<ToolTable> {
        let sid = SessionId::resolve(session_id);
        self.with_state(|s| {
            if s.tools.contains_key(&sid) {
                return Arc::clone(&s.tools);
            }
            debug!("creating tool session '{}'", sid);
            let mut next = (*s.tools).clone();
            next.insert(sid, Arc::new(Vec::new()));
            s.tools = Arc::new(next);
            Arc::clone(&s.tools)
        })
        .await
    }

    /// Replace the resolved session's descriptor list with an empty one,
    /// creating the session if it was absent.
    ///
    /// Returns the resulting table snapshot.
    pub async fn reset_session(&self, session_id: Option<&str>) -> Arc<ToolTable> {
        let sid = SessionId::resolve(session_id);
        self.with_state(|s| {
            debug!("resetting tool session '{}'", sid);
            let mut next = (*s.tools).clone();
            next.insert(sid, Arc::new(Vec::new()));
            s.tools = Arc::new(next);
            Arc::clone(&s.tools)
        })
        .await
    }

    /// Remove the resolved session's entry. Removing a session that does
    /// not exist is a no-op (and does not reallocate the table).
    ///
    /// Returns the resulting table snapshot.
    pub async fn delete_session(&self, session_id: Option<&str>) -> Arc<ToolTable> {
        let sid = SessionId::resolve(session_id);
        self.with_state(|s| {
            if !s.tools.contains_key(&sid) {
                return Arc::clone(&s.tools);
            }
            debug!("deleting tool session '{}'", sid);
            let mut next = (*s.tools).clone();
            next.remove(&sid);
            s.tools = Arc::new(next);
            Arc::clone(&s.tools)
        })
        .await
    }

    /// Defensive copy of the resolved session's descriptor list.
    ///
    /// An absent session reads as an empty list; reading never creates the
    /// session entry.
    pub async fn tools_for_session(&self, session_id: Option<&str>) -> Vec<ToolDescriptor> {
        let sid = SessionId::resolve(session_id);
        self.with_state(|s| {
            s.tools
                .get(&sid)
                .map(|tools| tools.as_ref().clone())
                .unwrap_or_default()
        })
        .await
    }

    /// Read-modify-write on one session's descriptor list.
    ///
    /// The updater receives an owned copy of the current list (empty if the
    /// session was absent) and its return value becomes the session's new
    /// list, creating the entry if needed. Returns the new list.
    pub async fn update_tools_for_session<F>(
        &self,
        session_id: Option<&str>,
        f: F,
    ) -> Vec<ToolDescriptor>
    where
        F: FnOnce(Vec<ToolDescriptor>) -> Vec<ToolDescriptor>,
    {
        let sid = SessionId::resolve(session_id);
        self.with_state(|s| {
            let current = s
                .tools
                .get(&sid)
                .map(|tools| tools.as_ref().clone())
                .unwrap_or_default();
            let next = Arc::new(f(current));
            let mut table = (*s.tools).clone();
            table.insert(sid, Arc::clone(&next));
            s.tools = Arc::new(table);
            next.as_ref().clone()
        })
        .await
    }

    /// Fallible variant of
    /// [`update_tools_for_session`](Self::update_tools_for_session). On
    /// `Err` the session's list (and the table) are untouched and the error
    /// propagates; subsequent operations proceed normally.
    pub async fn try_update_tools_for_session<F>(
        &self,
        session_id: Option<&str>,
        f: F,
    ) -> CacheResult<Vec<ToolDescriptor>>
    where
        F: FnOnce(Vec<ToolDescriptor>) -> CacheResult<Vec<ToolDescriptor>>,
    {
        let sid = SessionId::resolve(session_id);
        self.with_state(|s| {
            let current = s
                .tools
                .get(&sid)
                .map(|tools| tools.as_ref().clone())
                .unwrap_or_default();
            match f(current) {
                Ok(next) => {
                    let next = Arc::new(next);
                    let mut table = (*s.tools).clone();
                    table.insert(sid, Arc::clone(&next));
                    s.tools = Arc::new(table);
                    Ok(next.as_ref().clone())
                }
                Err(e) => {
                    warn!("tool update for session '{}' failed, state unchanged: {}", sid, e);
                    Err(e)
                }
            }
        })
        .await
    }
}

impl Default for SharedCache {
    fn default() -> Self {
        Self::new()
    }
}
