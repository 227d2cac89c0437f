//! # Event Bus Module
//!
//! Publish/subscribe telemetry for the alignment engine. The engine
//! publishes point-count, selection, and transform state transitions;
//! logging and reporting layers subscribe.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use starsync_core::event_bus::{AlignmentEvent, AppEvent, EventBus, EventCategory, EventFilter};
//!
//! let bus = EventBus::with_history(100);
//! bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Alignment]),
//!     |event| {
//!         if let AppEvent::Alignment(AlignmentEvent::PointCountChanged { count }) = event {
//!             println!("{} alignment points", count);
//!         }
//!     },
//! );
//!
//! let recent = bus.history();
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
