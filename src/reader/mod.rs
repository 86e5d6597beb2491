//! Pagination engine
//!
//! Measures a reading surface, derives column geometry, estimates how many
//! columns the content flows into, and navigates the resulting pages.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_reader::reader::{HostRect, ReaderSession, TextFlowOracle};
//!
//! let mut session = ReaderSession::default();
//! let now = std::time::Instant::now();
//! session.mount(HostRect::new(1280.0, 800.0), now);
//! session.replace_content("진달래꽃", paragraphs, now);
//!
//! let mut oracle = TextFlowOracle::default();
//! session.drain(now, &mut oracle);
//! println!("{}", session.navigator().label());
//! ```

mod flow;
mod geometry;
mod input;
mod motion;
mod navigator;
mod oracle;
mod scheduler;
mod session;
mod typography;
mod viewport;

pub use flow::{
    estimate_column_count, pinned_width, FlowError, FlowEstimator, FlowMeasurement, FlowPass,
    FlowRequest, LayoutOracle, DRIFT_TOLERANCE_PX,
};
pub use geometry::{compute_geometry, ColumnGeometry};
pub use input::{command_for_key, Key, ReaderCommand, SwipeTracker, MIN_SWIPE_DISTANCE};
pub use motion::SpringMotion;
pub use navigator::{PageNavigator, PageState};
pub use oracle::TextFlowOracle;
pub use scheduler::DeferredTask;
pub use session::{CommandOutcome, Content, ReaderSession, ReaderSnapshot, SessionTimings};
pub use typography::{ColumnMode, Theme, Typography};
pub use viewport::{
    measure, HostRect, NotReady, ResizeGate, Viewport, ViewportMeasurer, COLUMN_GAP,
    MAX_SURFACE_PX,
};
