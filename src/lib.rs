//! Shared in-process cache for a tool-serving host.
//!
//! Stores two pieces of process-wide state: the set of currently allowed
//! external organizations, and a session-partitioned table of tool
//! descriptors. All access goes through [`SharedCache`], whose operations
//! serialize through one fair async mutex so concurrent request flows never
//! observe (or produce) a half-applied update.
//!
//! ## Modules
//!
//! - [`cache`]: the [`SharedCache`] itself and its process-global instance
//! - [`session`]: session identifiers and default-session resolution
//! - [`descriptor`]: the opaque stored tool value
//! - [`error`]: error types for fallible updates
//!
//! ## Example
//!
//! ```
//! use tool_cache::{SharedCache, ToolDescriptor};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let cache = SharedCache::new();
//! cache.ensure_session(Some("req-42")).await;
//! let tools = cache
//!     .update_tools_for_session(Some("req-42"), |mut tools| {
//!         tools.push(ToolDescriptor::new("web_search"));
//!         tools
//!     })
//!     .await;
//! assert_eq!(tools.len(), 1);
//! # });
//! ```

pub mod cache;
pub mod descriptor;
pub mod error;
pub mod session;

pub use cache::{SharedCache, ToolTable};
pub use descriptor::ToolDescriptor;
pub use error::{CacheError, CacheResult};
pub use session::{SessionId, DEFAULT_SESSION_ID};
