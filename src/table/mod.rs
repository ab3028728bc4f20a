//! Generic table pipeline: free-text filter, paginator, virtualized row
//! window and responsive column selection over caller-owned rows.
//!
//! Data flows one direction: rows → filter → paginate → window → render.
//! Every stage is a pure derivation of the current [`TableQuery`] state.

pub mod columns;
pub mod pager;
pub mod search;
pub mod state;
pub mod window;

pub use columns::{ColumnSpec, Priority, Viewport};
pub use pager::{Pager, DEFAULT_PAGE_SIZE};
pub use search::{Matcher, SearchKey};
pub use state::{TableQuery, TableView};
pub use window::RowWindow;
