use std::collections::BTreeMap;

use catalog::modality::Modality;
use catalog::task::{TaskId, TaskRegistry};
use foundation::geo::{GeoBounds, LatLng};
use interact::hover::HoverMachine;
use interact::panel::InfoPanel;
use interact::zoom_gate::{self, ThresholdCrossing};
use overlay::manager::{OverlayManager, ReconcileParams};
use overlay::surface::MapSurface;
use runtime::frame::Frame;
use runtime::pacer::FramePacer;
use runtime::throttle::WindowThrottle;
use runtime::timer::TimerQueue;
use scene::index::TileIndex;
use scene::resolver::{self, ResolveQuery};
use scene::split_filter::{self, SplitIndex};
use scene::tile::TileId;
use scene::visible_set::VisibleSet;

use crate::events::InputEvent;
use crate::state::Selections;

/// Loaded data for one checked task.
#[derive(Debug)]
struct TaskData {
    index: TileIndex,
    split: Option<SplitIndex>,
    visible: VisibleSet,
}

/// The coordinator: owns the map surface, the per-task data, and the
/// interaction state, and runs the pipeline
///
/// input event → scheduler gate → visible-set resolution → overlay
/// reconciliation → hover re-validation
///
/// Each task's reconciliation is synchronous within one tick, so its visible
/// set is always an authoritative snapshot when the next diff runs. Tasks
/// are independent of each other; reconciliation order across them is the
/// registry's id order and nothing depends on it.
pub struct Controller<S: MapSurface> {
    surface: S,
    registry: TaskRegistry,
    raster_base: String,
    selections: Selections,
    tasks: BTreeMap<TaskId, TaskData>,
    manager: OverlayManager,
    hover: HoverMachine,
    timers: TimerQueue,
    pacer: FramePacer,
    zoom_throttle: WindowThrottle,
    viewport: GeoBounds,
    zoom: f64,
    pending_zoom: Option<(f64, GeoBounds)>,
}

impl<S: MapSurface> Controller<S> {
    pub fn new(
        surface: S,
        registry: TaskRegistry,
        raster_base: impl Into<String>,
        viewport: GeoBounds,
        zoom: f64,
    ) -> Self {
        Self {
            surface,
            registry,
            raster_base: raster_base.into(),
            selections: Selections::default(),
            tasks: BTreeMap::new(),
            manager: OverlayManager::new(),
            hover: HoverMachine::new(),
            timers: TimerQueue::new(),
            pacer: FramePacer::new(),
            zoom_throttle: WindowThrottle::new(WindowThrottle::DEFAULT_WINDOW_MS),
            viewport,
            zoom,
            pending_zoom: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn panel(&self) -> &InfoPanel {
        self.hover.panel()
    }

    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn is_task_shown(&self, task: &TaskId) -> bool {
        self.tasks.contains_key(task)
    }

    pub fn visible_set(&self, task: &TaskId) -> Option<&VisibleSet> {
        self.tasks.get(task).map(|data| &data.visible)
    }

    /// Register a task's freshly loaded data and show it.
    ///
    /// Called by the host after the asynchronous fetch succeeds; a failed
    /// load never reaches this point, leaving the task unregistered until
    /// the user re-toggles it.
    pub fn install_task(&mut self, task: TaskId, index: TileIndex, split: Option<SplitIndex>) {
        self.tasks.insert(
            task.clone(),
            TaskData {
                index,
                split,
                visible: VisibleSet::new(),
            },
        );
        self.reconcile_task(&task, true);
    }

    /// Task checkbox unchecked: tear down every overlay for the task and
    /// discard its data, independent of any diffing.
    pub fn hide_task(&mut self, task: &TaskId) {
        self.tasks.remove(task);
        self.manager.hide_task(&mut self.surface, task);
        if self.hover.focus().is_some_and(|f| &f.task == task) {
            self.hover.force_idle(&mut self.timers);
        }
    }

    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::ViewportMoved { bounds } => {
                self.viewport = bounds;
                self.pacer.mark_dirty();
            }
            InputEvent::ZoomEnded { zoom, bounds, now } => {
                self.pending_zoom = Some((zoom, bounds));
                self.zoom_throttle.trigger(now);
            }
            InputEvent::FrameTick(frame) => self.on_frame(frame),

            InputEvent::PointerEnteredTile { task, tile, point }
            | InputEvent::TouchStarted { task, tile, point } => {
                self.pointer_entered(&task, &tile, point);
            }
            InputEvent::PointerMoved { point } | InputEvent::TouchMoved { point } => {
                self.hover.pointer_moved(point, self.zoom);
            }
            InputEvent::PointerLeftTile { point, now }
            | InputEvent::TouchEnded { point, now } => {
                self.hover.pointer_left(point, now, &mut self.timers);
            }
            InputEvent::PanelEntered => self.hover.panel_entered(&mut self.timers),
            InputEvent::PanelLeft { now } => self.hover.panel_left(now, &mut self.timers),

            InputEvent::ModalitySelected(modality) => self.set_modality(modality),
            InputEvent::SplitsChanged(splits) => {
                self.selections.splits = splits;
                self.reconcile_all(true);
                self.revalidate_hover();
            }
            InputEvent::SpeciesSelected(species) => {
                self.selections.species = species;
                self.reconcile_all(true);
                self.revalidate_hover();
            }
            InputEvent::ValueOverlayToggled { task, on } => {
                if on {
                    self.selections.value_overlay_tasks.insert(task.clone());
                } else {
                    self.selections.value_overlay_tasks.remove(&task);
                }
                self.reconcile_task(&task, true);
            }
            InputEvent::TaskHidden(task) => self.hide_task(&task),
        }
    }

    fn set_modality(&mut self, modality: Modality) {
        if self.selections.modality == modality {
            return;
        }
        self.selections.modality = modality;
        self.reconcile_all(true);
        self.revalidate_hover();
    }

    fn on_frame(&mut self, frame: Frame) {
        // Hide-debounce timers run on the frame clock.
        for token in self.timers.fire_due(frame.time) {
            self.hover.timer_fired(token);
        }

        // A settled zoom applies once its throttle window elapses.
        if self.zoom_throttle.poll(frame.time)
            && let Some((zoom, bounds)) = self.pending_zoom.take()
        {
            self.apply_zoom(zoom, bounds);
        }

        // Pan recomputation, coalesced to one run per frame. Skipped while a
        // tile is focused at pixel-detail zoom so the rebuild doesn't fight
        // the panel's position stability; the dirty flag survives and is
        // served on the first frame after the focus releases.
        if self.pacer.is_dirty() {
            let suppressed = self.hover.has_focus() && zoom_gate::is_pixel_detail(self.zoom);
            if !suppressed && self.pacer.should_run(frame) {
                self.reconcile_all(false);
                self.revalidate_hover();
            }
        }
    }

    fn apply_zoom(&mut self, zoom: f64, bounds: GeoBounds) {
        let previous = self.zoom;
        self.zoom = zoom;
        self.viewport = bounds;

        match zoom_gate::crossing(previous, zoom) {
            Some(ThresholdCrossing::Down) => {
                // UX floor when zooming out: imagery and hover are suspended
                // and the modality selector snaps back to solid.
                self.selections.modality = Modality::Solid;
                self.hover.force_idle(&mut self.timers);
                self.reconcile_all(true);
            }
            Some(ThresholdCrossing::Up) => {
                self.reconcile_all(true);
                self.revalidate_hover();
            }
            None => {
                self.reconcile_all(false);
                self.revalidate_hover();
            }
        }
    }

    fn pointer_entered(&mut self, task: &TaskId, tile: &TileId, point: LatLng) {
        let Some(spec) = self.registry.get(task) else {
            return;
        };
        let Some(data) = self.tasks.get(task) else {
            return;
        };
        // Only a currently visible tile is interactive; an enter event from
        // an overlay destroyed earlier this tick is dropped here.
        if !data.visible.contains(tile) {
            return;
        }
        let Some(record) = data.index.get(tile) else {
            return;
        };
        self.hover
            .pointer_entered(spec, record, point, self.zoom, &mut self.timers);
    }

    fn reconcile_all(&mut self, force: bool) {
        let ids: Vec<TaskId> = self.tasks.keys().cloned().collect();
        for id in ids {
            self.reconcile_task(&id, force);
        }
    }

    fn reconcile_task(&mut self, task: &TaskId, force: bool) {
        let Some(spec) = self.registry.get(task).cloned() else {
            return;
        };
        let Some(data) = self.tasks.get_mut(task) else {
            return;
        };

        let admitted = split_filter::resolve_indices(data.split.as_ref(), &self.selections.splits);
        data.visible = resolver::resolve_visible(
            &data.index,
            &ResolveQuery {
                viewport: self.viewport,
                admitted_indices: admitted.as_ref(),
                task_kind: spec.kind,
                species: &self.selections.species,
            },
        );

        let params = ReconcileParams {
            task: &spec,
            visible: &data.visible,
            modality: self.selections.modality,
            zoom: self.zoom,
            force_full_rebuild: force,
            value_overlay: self.selections.value_overlay_tasks.contains(task),
            raster_base: &self.raster_base,
        };
        self.manager.reconcile(&mut self.surface, &data.index, &params);
    }

    fn revalidate_hover(&mut self) {
        let zoom = self.zoom;
        let tasks = &self.tasks;
        self.hover.revalidate(zoom, &mut self.timers, |focus, pointer| {
            tasks.get(&focus.task).is_some_and(|data| {
                data.visible.contains(&focus.tile)
                    && data
                        .index
                        .tile_at(pointer, &data.visible)
                        .is_some_and(|t| t.id == focus.tile)
            })
        });
    }
}

#[cfg(test)]
mod tests {
    use catalog::modality::Modality;
    use catalog::split::SplitSelection;
    use catalog::task::{TaskId, TaskRegistry};
    use foundation::geo::{GeoBounds, LatLng};
    use foundation::time::Timestamp;
    use overlay::surface::RecordingSurface;
    use pretty_assertions::assert_eq;
    use runtime::frame::Frame;
    use runtime::throttle::WindowThrottle;
    use scene::index::TileIndex;
    use scene::split_filter::SplitIndex;
    use scene::tile::{TileId, TileProperties, TileRecord};

    use super::Controller;
    use crate::events::InputEvent;

    const BASE: &str = "https://proxy.example";

    fn tile(id: &str, index: u32, west: f64) -> TileRecord {
        TileRecord {
            id: TileId::new(id),
            bounds: GeoBounds::new(0.0, west, 1.0, west + 1.0),
            properties: TileProperties {
                value: Some(1.25),
                ..TileProperties::default()
            },
            ingestion_index: index,
        }
    }

    /// Tiles A (index 0) and B (index 2) near the origin, one far away.
    fn soil_index() -> TileIndex {
        TileIndex::new(vec![
            tile("A", 0, 0.0),
            tile("other", 1, 120.0),
            tile("B", 2, 2.0),
        ])
    }

    fn controller() -> Controller<RecordingSurface> {
        Controller::new(
            RecordingSurface::new(),
            TaskRegistry::standard(),
            BASE,
            GeoBounds::new(-5.0, -5.0, 5.0, 5.0),
            8.0,
        )
    }

    fn soil() -> TaskId {
        TaskId::new("soil_nitrogen")
    }

    fn frame_at(index: u64, ms: f64) -> InputEvent {
        InputEvent::FrameTick(Frame::new(index, Timestamp(ms)))
    }

    fn settle_zoom(c: &mut Controller<RecordingSurface>, zoom: f64, at_ms: f64) {
        c.handle(InputEvent::ZoomEnded {
            zoom,
            bounds: GeoBounds::new(-5.0, -5.0, 5.0, 5.0),
            now: Timestamp(at_ms),
        });
        let settle_ms = at_ms + WindowThrottle::DEFAULT_WINDOW_MS;
        c.handle(frame_at(1000 + settle_ms as u64, settle_ms));
    }

    #[test]
    fn solid_task_below_threshold_shows_boundaries_only() {
        let mut c = controller();
        c.install_task(soil(), soil_index(), None);

        let visible = c.visible_set(&soil()).unwrap();
        assert_eq!(visible.len(), 2);
        assert!(visible.contains(&TileId::new("A")));
        assert!(visible.contains(&TileId::new("B")));

        assert_eq!(c.surface().live_boundary_count(), 2);
        assert_eq!(c.surface().live_raster_count(), 0);

        // Hover is gated below the pixel-detail zoom: panel stays hidden.
        c.handle(InputEvent::PointerEnteredTile {
            task: soil(),
            tile: TileId::new("A"),
            point: LatLng::new(0.5, 0.5),
        });
        assert!(!c.panel().visible);
    }

    #[test]
    fn zoom_up_plus_imagery_modality_builds_rasters_and_enables_hover() {
        let mut c = controller();
        c.install_task(soil(), soil_index(), None);

        settle_zoom(&mut c, 12.0, 0.0);
        c.handle(InputEvent::ModalitySelected(Modality::Sentinel2));

        assert_eq!(c.surface().live_boundary_count(), 2);
        let mut sources = c
            .surface()
            .live_raster_sources()
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>();
        sources.sort();
        assert_eq!(
            sources,
            vec![
                format!("{BASE}/soil_nitrogen/png_tiles/Sentinel2/tile_A_Sentinel2.png"),
                format!("{BASE}/soil_nitrogen/png_tiles/Sentinel2/tile_B_Sentinel2.png"),
            ]
        );

        c.handle(InputEvent::PointerEnteredTile {
            task: soil(),
            tile: TileId::new("A"),
            point: LatLng::new(0.5, 0.5),
        });
        assert!(c.panel().visible);
        assert_eq!(c.panel().title, "Soil nitrogen: 1.25");

        let expected_anchor =
            foundation::mercator::project(LatLng::new(1.0, 0.0), 12.0);
        assert_eq!(c.panel().anchor, expected_anchor);
    }

    #[test]
    fn zero_checked_splits_empty_the_visible_set_only_when_split_data_exists() {
        let mut c = controller();
        let split = SplitIndex {
            train_100: [0, 2].into_iter().collect(),
            ..SplitIndex::default()
        };
        c.install_task(soil(), soil_index(), Some(split));
        assert_eq!(c.surface().live_boundary_count(), 2);

        c.handle(InputEvent::SplitsChanged(SplitSelection::none()));
        assert!(c.visible_set(&soil()).unwrap().is_empty());
        assert_eq!(c.surface().live_boundary_count(), 0);

        // Without split data the same selection filters nothing.
        let mut unsplit = controller();
        unsplit.install_task(soil(), soil_index(), None);
        unsplit.handle(InputEvent::SplitsChanged(SplitSelection::none()));
        assert_eq!(unsplit.surface().live_boundary_count(), 2);
    }

    #[test]
    fn pan_reconciliation_is_frame_coalesced_and_idempotent() {
        let mut c = controller();
        c.install_task(soil(), soil_index(), None);
        c.surface_mut().clear_ops();

        // A burst of move events inside one frame runs the pipeline once,
        // and an unchanged visible set performs zero surface operations.
        for _ in 0..10 {
            c.handle(InputEvent::ViewportMoved {
                bounds: GeoBounds::new(-5.0, -5.0, 5.0, 5.0),
            });
        }
        c.handle(frame_at(0, 16.0));
        c.handle(frame_at(1, 32.0));
        assert!(c.surface().ops().is_empty());

        // Panning away actually swaps overlays.
        c.handle(InputEvent::ViewportMoved {
            bounds: GeoBounds::new(-5.0, 1.5, 5.0, 5.0),
        });
        c.handle(frame_at(2, 48.0));
        assert_eq!(
            c.surface().live_boundary_tiles(&soil()),
            vec![TileId::new("B")]
        );
    }

    #[test]
    fn pan_recompute_is_suppressed_while_a_tile_is_focused_at_detail_zoom() {
        let mut c = controller();
        c.install_task(soil(), soil_index(), None);
        settle_zoom(&mut c, 12.0, 0.0);

        c.handle(InputEvent::PointerEnteredTile {
            task: soil(),
            tile: TileId::new("A"),
            point: LatLng::new(0.5, 0.5),
        });
        assert!(c.panel().visible);
        c.surface_mut().clear_ops();

        // Pan away while focused: nothing runs.
        c.handle(InputEvent::ViewportMoved {
            bounds: GeoBounds::new(-5.0, 1.5, 5.0, 5.0),
        });
        c.handle(frame_at(10, 500.0));
        assert!(c.surface().ops().is_empty());

        // Focus releases (pointer leaves, debounce elapses): the pending pan
        // is served and the hover is re-validated away.
        c.handle(InputEvent::PointerLeftTile {
            point: LatLng::new(20.0, 20.0),
            now: Timestamp(500.0),
        });
        c.handle(frame_at(11, 1000.0));
        assert_eq!(
            c.surface().live_boundary_tiles(&soil()),
            vec![TileId::new("B")]
        );
        assert!(!c.panel().visible);
    }

    #[test]
    fn downward_crossing_resets_modality_and_hides_the_panel() {
        let mut c = controller();
        c.install_task(soil(), soil_index(), None);
        settle_zoom(&mut c, 12.0, 0.0);
        c.handle(InputEvent::ModalitySelected(Modality::Sentinel2));
        c.handle(InputEvent::PointerEnteredTile {
            task: soil(),
            tile: TileId::new("A"),
            point: LatLng::new(0.5, 0.5),
        });
        assert!(c.panel().visible);
        assert_eq!(c.surface().live_raster_count(), 2);

        settle_zoom(&mut c, 8.0, 1000.0);

        assert_eq!(c.selections().modality, Modality::Solid);
        assert_eq!(c.surface().live_raster_count(), 0);
        assert!(!c.panel().visible);
        assert_eq!(c.surface().live_boundary_count(), 2);
    }

    #[test]
    fn zoom_end_burst_applies_once_after_the_window() {
        let mut c = controller();
        c.install_task(soil(), soil_index(), None);

        let bounds = GeoBounds::new(-5.0, -5.0, 5.0, 5.0);
        c.handle(InputEvent::ZoomEnded {
            zoom: 11.0,
            bounds,
            now: Timestamp(0.0),
        });
        c.handle(InputEvent::ZoomEnded {
            zoom: 12.0,
            bounds,
            now: Timestamp(100.0),
        });

        // First window (from the superseded trigger) has not elapsed.
        c.handle(frame_at(0, 160.0));
        assert_eq!(c.zoom(), 8.0);

        c.handle(frame_at(1, 250.0));
        assert_eq!(c.zoom(), 12.0);
    }

    #[test]
    fn hiding_a_focused_task_clears_overlays_focus_and_timers() {
        let mut c = controller();
        c.install_task(soil(), soil_index(), None);
        settle_zoom(&mut c, 12.0, 0.0);

        c.handle(InputEvent::PointerEnteredTile {
            task: soil(),
            tile: TileId::new("A"),
            point: LatLng::new(0.5, 0.5),
        });
        // Leave starts a hide timer; unchecking must cancel it, not race it.
        c.handle(InputEvent::PointerLeftTile {
            point: LatLng::new(20.0, 20.0),
            now: Timestamp(200.0),
        });
        c.handle(InputEvent::TaskHidden(soil()));

        assert_eq!(c.surface().live_boundary_count(), 0);
        assert!(!c.panel().visible);
        assert!(!c.is_task_shown(&soil()));

        // A later tick finds no stale timer with anything to act on.
        c.handle(frame_at(5, 10_000.0));
        assert!(!c.panel().visible);
    }

    #[test]
    fn species_selection_filters_through_the_whole_pipeline() {
        let mut c = controller();
        let quercus = TileRecord {
            properties: TileProperties {
                species: Some(vec!["Quercus robur".into(), "Fagus sylvatica".into()]),
                ..TileProperties::default()
            },
            ..tile("q", 0, 0.0)
        };
        let fagus = TileRecord {
            properties: TileProperties {
                species: Some(vec!["Fagus sylvatica".into()]),
                ..TileProperties::default()
            },
            ..tile("f", 1, 2.0)
        };
        c.install_task(
            TaskId::new("species"),
            TileIndex::new(vec![quercus, fagus]),
            None,
        );
        assert_eq!(c.surface().live_boundary_count(), 2);

        c.handle(InputEvent::SpeciesSelected(
            scene::attribute_filter::SpeciesSelection::only("Quercus robur"),
        ));
        assert_eq!(
            c.surface().live_boundary_tiles(&TaskId::new("species")),
            vec![TileId::new("q")]
        );
    }
}
