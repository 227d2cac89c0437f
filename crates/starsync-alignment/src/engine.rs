//! Mapping engine
//!
//! Owns the alignment model and answers forward (synced to unsynced) and
//! reverse (unsynced to synced) queries. All state sits behind one lock;
//! each public operation takes it once, so a query never observes a point
//! set whose transform has not been rebuilt yet. Telemetry is collected
//! while the lock is held and published after it is released.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use starsync_core::{
    thread_safe, AlignmentError, AlignmentEvent, AppEvent, AxisKinematics, AxisPosition,
    EquatorialKinematics, EventBus, KinematicsError, NotificationEvent, NotificationLevel,
    Result, SettingsEvent, Site, ThreadSafe,
};
use starsync_settings::{AlignmentConfig, AlignmentMode};
use tracing::{debug, info, warn};

use crate::active::{self, ActiveTransform};
use crate::geometry::Triangle;
use crate::point::{AlignmentPoint, AlignmentRecord, Direction};
use crate::projector::CoordinateProjector;
use crate::selector::{CandidateSelector, Query};
use crate::store::AlignmentPointStore;

/// Snapshot of the alignment model for reporting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentReport {
    /// Number of calibration points
    pub point_count: usize,
    /// Whether the active transform is usable
    pub enabled: bool,
    /// Triple the active transform was built from
    pub active_triple: Option<[u32; 3]>,
    /// Point used by the last nearest-point mapping
    pub last_selected_point_id: Option<u32>,
    /// Points used by the last mapping
    pub selected_ids: Vec<u32>,
    /// One-point correction, `synced - unsynced` of the newest point
    pub fallback_delta: AxisPosition,
    /// The points themselves
    pub points: Vec<AlignmentPoint>,
}

/// Observable state compared before and after an operation
#[derive(Debug, Clone, PartialEq)]
struct Observed {
    count: usize,
    enabled: bool,
    selected: Vec<u32>,
    last_selected: Option<u32>,
}

impl Observed {
    fn transitions(&self, after: &Observed, events: &mut Vec<AppEvent>) {
        if self.count != after.count {
            events.push(AppEvent::Alignment(AlignmentEvent::PointCountChanged {
                count: after.count,
            }));
        }
        if self.enabled != after.enabled {
            events.push(AppEvent::Alignment(AlignmentEvent::TransformStateChanged {
                enabled: after.enabled,
            }));
        }
        if self.selected != after.selected {
            events.push(AppEvent::Alignment(AlignmentEvent::SelectionChanged {
                ids: after.selected.clone(),
            }));
        }
        if self.last_selected != after.last_selected {
            events.push(AppEvent::Alignment(AlignmentEvent::SelectedPointChanged {
                id: after.last_selected,
            }));
        }
    }
}

#[derive(Debug)]
struct EngineState {
    config: AlignmentConfig,
    projector: CoordinateProjector,
    store: AlignmentPointStore,
    active: ActiveTransform,
    last_selected: Option<u32>,
}

impl EngineState {
    fn observe(&self) -> Observed {
        Observed {
            count: self.store.len(),
            enabled: self.active.is_enabled(),
            selected: self.store.selected_ids(),
            last_selected: self.last_selected,
        }
    }

    /// Rebuild the active transform after the store or site changed
    fn rebuild(&mut self, events: &mut Vec<AppEvent>) {
        if self
            .last_selected
            .is_some_and(|id| self.store.get(id).is_none())
        {
            self.last_selected = None;
        }

        let was_enabled = self.active.is_enabled();
        match self.active.rebuild(&self.store, &self.config) {
            Ok(()) => {
                if self.active.is_enabled() != was_enabled {
                    info!(
                        "Alignment transform {}",
                        if self.active.is_enabled() { "enabled" } else { "disabled" }
                    );
                }
            }
            Err(err) => {
                warn!("Alignment transform disabled: {}", err);
                if let AlignmentError::DegenerateGeometry { ids, .. } = &err {
                    events.push(AppEvent::Alignment(AlignmentEvent::DegenerateGeometry {
                        ids: ids.clone(),
                    }));
                }
                events.push(AppEvent::Notification(NotificationEvent::new(
                    NotificationLevel::Warning,
                    err.to_string(),
                )));
            }
        }
    }

    fn map(&mut self, input: AxisPosition, direction: Direction) -> AxisPosition {
        if self.store.len() < 3 {
            self.last_selected = None;
            return direction.translate(input, self.store.fallback_delta());
        }

        let query = Query {
            axis: input,
            plane: self.projector.project(input),
            frame: direction.source(),
        };
        let selector = CandidateSelector::from_config(&self.config);

        match self.config.alignment_mode {
            AlignmentMode::NearestOnly => self.map_nearest(&selector, &query, direction),
            AlignmentMode::NStarPlusNearest => self
                .map_triangulated(&selector, &query, direction)
                .unwrap_or_else(|| self.map_nearest(&selector, &query, direction)),
        }
    }

    fn map_nearest(
        &mut self,
        selector: &CandidateSelector,
        query: &Query,
        direction: Direction,
    ) -> AxisPosition {
        let nearest = selector
            .select_one(self.store.points(), query)
            .map(|p| (p.id, p.axis_delta()));

        match nearest {
            Some((id, delta)) => {
                self.store.mark_selected(&[id]);
                self.last_selected = Some(id);
                direction.translate(query.axis, delta)
            }
            None => {
                debug!("No eligible point for {} mapping", direction);
                self.store.clear_selection();
                self.last_selected = None;
                query.axis
            }
        }
    }

    fn map_triangulated(
        &mut self,
        selector: &CandidateSelector,
        query: &Query,
        direction: Direction,
    ) -> Option<AxisPosition> {
        let triple = selector.select_three(self.store.points(), query)?;
        let ids = triple.map(|p| p.id);
        let destination = Triangle::new(
            *triple[0].plane(direction.destination()),
            *triple[1].plane(direction.destination()),
            *triple[2].plane(direction.destination()),
        );

        let transform = match self.active.cached(ids, direction) {
            Some(cached) => *cached,
            None => match active::assemble(&triple, direction, &self.config) {
                Ok(transform) => transform,
                Err(err) => {
                    debug!("Skipping triangulation: {}", err);
                    return None;
                }
            },
        };

        self.store.mark_selected(&ids);
        if !destination.contains(&query.plane) {
            debug!("Query outside destination triangle {:?}", ids);
            return None;
        }

        let mapped = transform.apply(&query.plane);
        self.last_selected = None;
        Some(self.projector.unproject_near(&mapped, &query.plane, query.axis))
    }
}

/// Thread-safe handle to an alignment model
///
/// Clones share the same model and event bus.
#[derive(Clone)]
pub struct MappingEngine {
    state: ThreadSafe<EngineState>,
    bus: Arc<EventBus>,
}

impl MappingEngine {
    /// Create an engine for a German equatorial mount with its own event bus
    pub fn new(config: AlignmentConfig) -> Result<Self> {
        Self::with_bus(config, Arc::new(EventBus::new()))
    }

    /// Create an engine publishing to an existing event bus
    pub fn with_bus(config: AlignmentConfig, bus: Arc<EventBus>) -> Result<Self> {
        Self::with_kinematics(config, Box::new(EquatorialKinematics::default()), bus)
    }

    /// Create an engine over custom mount kinematics
    ///
    /// The kinematics site is replaced by the configured one.
    pub fn with_kinematics(
        config: AlignmentConfig,
        mut kinematics: Box<dyn AxisKinematics>,
        bus: Arc<EventBus>,
    ) -> Result<Self> {
        validate(&config)?;
        kinematics.set_site(site_of(&config)?);

        let state = EngineState {
            config,
            projector: CoordinateProjector::new(kinematics),
            store: AlignmentPointStore::new(),
            active: ActiveTransform::default(),
            last_selected: None,
        };
        Ok(Self {
            state: thread_safe(state),
            bus,
        })
    }

    /// The event bus telemetry is published on
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Record a sync: the mount reported `unsynced` while actually
    /// pointing at `synced`
    ///
    /// Returns the new point's id.
    pub fn sync_point(
        &self,
        unsynced: AxisPosition,
        synced: AxisPosition,
        timestamp: DateTime<Utc>,
    ) -> Result<u32> {
        check_finite(&unsynced, "unsynced axis position")?;
        check_finite(&synced, "synced axis position")?;

        let mut events = Vec::new();
        let id = {
            let mut state = self.state.lock();
            let before = state.observe();

            let state = &mut *state;
            let outcome = state.store.insert(
                &state.projector,
                unsynced,
                synced,
                timestamp,
                state.config.proximity_limit,
            );
            state.rebuild(&mut events);

            before.transitions(&state.observe(), &mut events);
            outcome.id
        };
        self.bus.publish_all(events);
        Ok(id)
    }

    /// Delete a point; false when no point has that id
    pub fn remove_point(&self, id: u32) -> bool {
        let mut events = Vec::new();
        let removed = {
            let mut state = self.state.lock();
            let before = state.observe();
            let removed = state.store.remove(id);
            if removed {
                state.rebuild(&mut events);
            }
            before.transitions(&state.observe(), &mut events);
            removed
        };
        self.bus.publish_all(events);
        removed
    }

    /// Delete every point
    pub fn clear(&self) {
        let mut events = Vec::new();
        {
            let mut state = self.state.lock();
            let before = state.observe();
            state.store.clear();
            state.rebuild(&mut events);
            before.transitions(&state.observe(), &mut events);
        }
        self.bus.publish_all(events);
    }

    /// Replace every point with persisted records
    ///
    /// Returns the ids in record order; invalid or duplicate ids are
    /// reassigned.
    pub fn load_all(&self, records: &[AlignmentRecord]) -> Result<Vec<u32>> {
        for record in records {
            check_finite(&record.unsynced, "unsynced axis position")?;
            check_finite(&record.synced, "synced axis position")?;
        }

        let mut events = Vec::new();
        let ids = {
            let mut state = self.state.lock();
            let before = state.observe();
            let state = &mut *state;
            let ids = state.store.load(&state.projector, records);
            state.rebuild(&mut events);
            before.transitions(&state.observe(), &mut events);
            ids
        };
        self.bus.publish_all(events);
        Ok(ids)
    }

    /// Map a synced (target) position to the unsynced position to drive to
    pub fn forward(&self, synced: AxisPosition) -> AxisPosition {
        self.map(synced, Direction::Forward)
    }

    /// Map an unsynced (reported) position to where the mount really points
    pub fn reverse(&self, unsynced: AxisPosition) -> AxisPosition {
        self.map(unsynced, Direction::Reverse)
    }

    /// Map a position in either direction
    pub fn map(&self, input: AxisPosition, direction: Direction) -> AxisPosition {
        let mut events = Vec::new();
        let output = {
            let mut state = self.state.lock();
            let before = state.observe();
            let output = state.map(input, direction);
            before.transitions(&state.observe(), &mut events);
            output
        };
        self.bus.publish_all(events);
        output
    }

    /// Apply a new configuration
    ///
    /// A site change re-projects every point; a site or transform kind
    /// change rebuilds the active transform.
    pub fn configure(&self, config: AlignmentConfig) -> Result<()> {
        validate(&config)?;
        let site = site_of(&config)?;

        let mut events = Vec::new();
        {
            let mut state = self.state.lock();
            let before = state.observe();

            let site_changed = state.projector.site() != site;
            let kinds_changed = state.config.forward_transform != config.forward_transform
                || state.config.reverse_transform != config.reverse_transform;
            state.config = config;

            if site_changed {
                info!("Alignment site changed to {}", site);
                let state = &mut *state;
                state.projector.set_site(site);
                state.store.reproject(&state.projector);
                events.push(AppEvent::Settings(SettingsEvent::SiteChanged {
                    latitude: site.latitude,
                    longitude: site.longitude,
                }));
            }
            if site_changed || kinds_changed {
                state.rebuild(&mut events);
            }

            events.push(AppEvent::Settings(SettingsEvent::ConfigurationApplied));
            before.transitions(&state.observe(), &mut events);
        }
        self.bus.publish_all(events);
        Ok(())
    }

    /// Current configuration
    pub fn config(&self) -> AlignmentConfig {
        self.state.lock().config.clone()
    }

    /// Number of calibration points
    pub fn point_count(&self) -> usize {
        self.state.lock().store.len()
    }

    /// Whether the active transform is usable
    pub fn is_enabled(&self) -> bool {
        self.state.lock().active.is_enabled()
    }

    /// Point used by the last nearest-point mapping
    pub fn last_selected_point_id(&self) -> Option<u32> {
        self.state.lock().last_selected
    }

    /// Triple the active transform was built from
    pub fn active_triple(&self) -> Option<[u32; 3]> {
        self.state.lock().active.triple_ids()
    }

    /// Snapshot of the points in insertion order
    pub fn points(&self) -> Vec<AlignmentPoint> {
        self.state.lock().store.points().to_vec()
    }

    /// Flat records in insertion order, for persistence
    pub fn records(&self) -> Vec<AlignmentRecord> {
        self.state.lock().store.records()
    }

    /// Snapshot of the model; also publishes one data notification per point
    pub fn report(&self) -> AlignmentReport {
        let report = {
            let state = self.state.lock();
            AlignmentReport {
                point_count: state.store.len(),
                enabled: state.active.is_enabled(),
                active_triple: state.active.triple_ids(),
                last_selected_point_id: state.last_selected,
                selected_ids: state.store.selected_ids(),
                fallback_delta: state.store.fallback_delta(),
                points: state.store.points().to_vec(),
            }
        };

        self.bus.publish_all(report.points.iter().map(|p| {
            AppEvent::Notification(NotificationEvent::new(NotificationLevel::Data, p.to_string()))
        }));
        report
    }
}

impl std::fmt::Debug for MappingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MappingEngine")
            .field("points", &state.store.len())
            .field("enabled", &state.active.is_enabled())
            .field("config", &state.config)
            .finish()
    }
}

fn validate(config: &AlignmentConfig) -> std::result::Result<(), AlignmentError> {
    config.validate().map_err(|err| {
        warn!("Rejected alignment configuration: {}", err);
        AlignmentError::InvalidConfiguration {
            field: err.key().unwrap_or("configuration").to_string(),
            reason: err.to_string(),
        }
    })
}

fn site_of(config: &AlignmentConfig) -> std::result::Result<Site, AlignmentError> {
    config.site().map_err(|err| {
        AlignmentError::InvalidConfiguration {
            field: "site_latitude".to_string(),
            reason: err.to_string(),
        }
    })
}

fn check_finite(position: &AxisPosition, what: &str) -> std::result::Result<(), KinematicsError> {
    if position.is_finite() {
        Ok(())
    } else {
        Err(KinematicsError::NonFinite {
            what: format!("{} {:?}", what, position),
        })
    }
}
