//! StarSync Alignment Crate
//!
//! N-star pointing model for two-axis telescope mounts. Calibration
//! points pair where the mount thought it was pointing with where it
//! really was; the engine maps between the two using a triangulated
//! transform over nearby points, falling back to a nearest-point or
//! single-point translation.
//!
//! ## Modules
//! - [`projector`]: axis positions to plane points and back
//! - [`store`]: ordered calibration point storage
//! - [`selector`]: nearest point and enclosing triangle search
//! - [`transform`]: affine and direction-cosine transform assembly
//! - [`engine`]: the thread-safe mapping engine

pub mod active;
pub mod engine;
pub mod geometry;
pub mod point;
pub mod projector;
pub mod selector;
pub mod store;
pub mod transform;

pub use active::ActiveTransform;
pub use engine::{AlignmentReport, MappingEngine};
pub use geometry::Triangle;
pub use point::{AlignmentPoint, AlignmentRecord, Direction, Frame};
pub use projector::CoordinateProjector;
pub use selector::{CandidateSelector, DistanceMetric, Query};
pub use store::{AlignmentPointStore, InsertOutcome};
pub use transform::{AffineTransform, TakiTransform, Transform};
