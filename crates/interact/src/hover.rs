use catalog::task::{TaskId, TaskSpec};
use foundation::geo::{GeoBounds, LatLng};
use foundation::time::Timestamp;
use runtime::timer::{TimerQueue, TimerToken};
use scene::tile::{TileId, TileRecord};

use crate::panel::InfoPanel;
use crate::zoom_gate;

/// Delay between the pointer leaving a tile and the panel hiding. Long
/// enough to cross the hairline gap between adjacent tiles without flicker,
/// short enough that the panel doesn't linger.
pub const HIDE_DELAY_MS: f64 = 200.0;

/// The focused tile: id plus its cached bounds, so every later check works
/// off the load-time box and never re-derives geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Focus {
    pub task: TaskId,
    pub tile: TileId,
    pub bounds: GeoBounds,
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle,
    Focused(Focus),
    PendingHide(Focus, TimerToken),
}

/// Hover/touch focus tracking for the info panel.
///
/// At most one tile is focused system-wide, however many tasks are shown.
/// Touch devices drive the same entry points: touch-start maps to
/// `pointer_entered`, touch-move to `pointer_moved`, touch-end to
/// `pointer_left`; a touch landing on the panel arrives as `panel_entered`
/// and must never read as "left the tile".
///
/// Nothing here trusts scheduled context. A hide timer carries its token and
/// is matched against the phase when it fires; rebuilds go through
/// `revalidate`, which re-checks the focus against current visibility
/// instead of assuming the overlay under the pointer still exists.
#[derive(Debug)]
pub struct HoverMachine {
    phase: Phase,
    pointer_over_panel: bool,
    last_pointer: Option<LatLng>,
    panel: InfoPanel,
}

impl Default for HoverMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl HoverMachine {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            pointer_over_panel: false,
            last_pointer: None,
            panel: InfoPanel::default(),
        }
    }

    pub fn panel(&self) -> &InfoPanel {
        &self.panel
    }

    /// The focused tile, whether settled or pending hide.
    pub fn focus(&self) -> Option<&Focus> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Focused(focus) | Phase::PendingHide(focus, _) => Some(focus),
        }
    }

    pub fn has_focus(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    /// Pointer entered a tile's interactive hit region.
    ///
    /// Below the pixel-detail zoom this is a no-op: hover inspection is
    /// gated together with the rasters. Entering a different tile while one
    /// is focused re-runs the entry logic for the new tile; re-entering the
    /// tile whose hide is pending cancels the hide.
    pub fn pointer_entered(
        &mut self,
        task: &TaskSpec,
        tile: &TileRecord,
        point: LatLng,
        zoom: f64,
        timers: &mut TimerQueue,
    ) {
        self.last_pointer = Some(point);
        if !zoom_gate::is_pixel_detail(zoom) {
            return;
        }

        self.cancel_pending(timers);
        self.panel.show(task, tile, zoom);
        self.phase = Phase::Focused(Focus {
            task: task.id.clone(),
            tile: tile.id.clone(),
            bounds: tile.bounds,
        });
    }

    /// Pointer moved. Inside the focused tile this repositions the panel
    /// only; content is untouched.
    pub fn pointer_moved(&mut self, point: LatLng, zoom: f64) {
        self.last_pointer = Some(point);
        if let Phase::Focused(focus) = &self.phase
            && focus.bounds.contains(point)
        {
            let bounds = focus.bounds;
            self.panel.reposition(bounds, zoom);
        }
    }

    /// Pointer left the focused tile's hit region.
    ///
    /// Starts the debounced hide unless the pointer went onto the panel
    /// itself (the panel overlaps the map; hovering it must not dismiss it).
    pub fn pointer_left(&mut self, point: LatLng, now: Timestamp, timers: &mut TimerQueue) {
        self.last_pointer = Some(point);
        if self.pointer_over_panel {
            return;
        }
        let Phase::Focused(focus) = &self.phase else {
            return;
        };
        let focus = focus.clone();
        let token = timers.schedule(now, HIDE_DELAY_MS);
        self.phase = Phase::PendingHide(focus, token);
    }

    pub fn panel_entered(&mut self, timers: &mut TimerQueue) {
        self.pointer_over_panel = true;
        if let Phase::PendingHide(focus, token) = &self.phase {
            let (focus, token) = (focus.clone(), *token);
            timers.cancel(token);
            self.phase = Phase::Focused(focus);
        }
    }

    pub fn panel_left(&mut self, now: Timestamp, timers: &mut TimerQueue) {
        self.pointer_over_panel = false;
        let Phase::Focused(focus) = &self.phase else {
            return;
        };
        let outside = self
            .last_pointer
            .is_none_or(|p| !focus.bounds.contains(p));
        if outside {
            let focus = focus.clone();
            let token = timers.schedule(now, HIDE_DELAY_MS);
            self.phase = Phase::PendingHide(focus, token);
        }
    }

    /// A hide timer fired.
    ///
    /// Only the token the machine is waiting on means anything; any other
    /// firing is stale and ignored. Even a matching token re-validates the
    /// pointer position instead of trusting the schedule-time context.
    pub fn timer_fired(&mut self, token: TimerToken) {
        let Phase::PendingHide(focus, pending) = &self.phase else {
            return;
        };
        if *pending != token {
            return;
        }

        let back_inside = self.pointer_over_panel
            || self
                .last_pointer
                .is_some_and(|p| focus.bounds.contains(p));
        if back_inside {
            let focus = focus.clone();
            self.phase = Phase::Focused(focus);
        } else {
            self.phase = Phase::Idle;
            self.panel.hide();
        }
    }

    /// Drop any focus immediately: zoom fell below the pixel-detail
    /// threshold, the focused tile's task was hidden, or the host resets.
    pub fn force_idle(&mut self, timers: &mut TimerQueue) {
        self.cancel_pending(timers);
        self.phase = Phase::Idle;
        self.panel.hide();
    }

    /// Re-validate the focus after a rebuild, filter change, or pan.
    ///
    /// `still_focusable(focus, pointer)` must answer whether the focused
    /// tile is still visible and still under the pointer; the overlay it was
    /// focused through may just have been destroyed and recreated, so the
    /// answer comes from current state, never from the focus itself.
    pub fn revalidate<F>(&mut self, zoom: f64, timers: &mut TimerQueue, still_focusable: F)
    where
        F: FnOnce(&Focus, LatLng) -> bool,
    {
        if !self.has_focus() {
            return;
        }
        if !zoom_gate::is_pixel_detail(zoom) {
            self.force_idle(timers);
            return;
        }
        if self.pointer_over_panel {
            return;
        }
        let Some(pointer) = self.last_pointer else {
            self.force_idle(timers);
            return;
        };
        let Some(focus) = self.focus().cloned() else {
            return;
        };

        if still_focusable(&focus, pointer) {
            self.panel.reposition(focus.bounds, zoom);
        } else {
            self.force_idle(timers);
        }
    }

    fn cancel_pending(&mut self, timers: &mut TimerQueue) {
        if let Phase::PendingHide(_, token) = &self.phase {
            timers.cancel(*token);
        }
    }
}

#[cfg(test)]
mod tests {
    use catalog::task::{TaskKind, TaskSpec};
    use foundation::geo::{GeoBounds, LatLng};
    use foundation::time::Timestamp;
    use runtime::timer::TimerQueue;
    use scene::tile::{TileId, TileProperties, TileRecord};

    use super::{HIDE_DELAY_MS, HoverMachine};

    fn task() -> TaskSpec {
        TaskSpec::new("biomass", "Biomass", "green", TaskKind::Scalar)
    }

    fn tile(id: &str, west: f64) -> TileRecord {
        TileRecord {
            id: TileId::new(id),
            bounds: GeoBounds::new(0.0, west, 1.0, west + 1.0),
            properties: TileProperties {
                value: Some(3.5),
                ..TileProperties::default()
            },
            ingestion_index: 0,
        }
    }

    fn drive_timers(machine: &mut HoverMachine, timers: &mut TimerQueue, now: Timestamp) {
        for token in timers.fire_due(now) {
            machine.timer_fired(token);
        }
    }

    #[test]
    fn enter_below_detail_zoom_is_ignored() {
        let mut machine = HoverMachine::new();
        let mut timers = TimerQueue::new();

        machine.pointer_entered(&task(), &tile("a", 0.0), LatLng::new(0.5, 0.5), 8.0, &mut timers);
        assert!(!machine.has_focus());
        assert!(!machine.panel().visible);
    }

    #[test]
    fn leave_and_reenter_within_debounce_window_does_not_flicker() {
        let mut machine = HoverMachine::new();
        let mut timers = TimerQueue::new();
        let t = tile("a", 0.0);

        machine.pointer_entered(&task(), &t, LatLng::new(0.5, 0.5), 12.0, &mut timers);
        assert!(machine.panel().visible);

        machine.pointer_left(LatLng::new(1.5, 1.5), Timestamp(0.0), &mut timers);
        // Panel must stay up throughout the pending window.
        assert!(machine.panel().visible);

        machine.pointer_entered(&task(), &t, LatLng::new(0.4, 0.4), 12.0, &mut timers);
        assert!(machine.panel().visible);

        // The cancelled timer never fires; nothing hides later.
        drive_timers(&mut machine, &mut timers, Timestamp(10_000.0));
        assert!(machine.panel().visible);
        assert!(machine.has_focus());
    }

    #[test]
    fn pending_hide_completes_when_pointer_stays_away() {
        let mut machine = HoverMachine::new();
        let mut timers = TimerQueue::new();

        machine.pointer_entered(&task(), &tile("a", 0.0), LatLng::new(0.5, 0.5), 12.0, &mut timers);
        machine.pointer_left(LatLng::new(5.0, 5.0), Timestamp(0.0), &mut timers);

        drive_timers(&mut machine, &mut timers, Timestamp(HIDE_DELAY_MS));
        assert!(!machine.has_focus());
        assert!(!machine.panel().visible);
    }

    #[test]
    fn timer_firing_revalidates_pointer_position() {
        let mut machine = HoverMachine::new();
        let mut timers = TimerQueue::new();
        let t = tile("a", 0.0);

        machine.pointer_entered(&task(), &t, LatLng::new(0.5, 0.5), 12.0, &mut timers);
        machine.pointer_left(LatLng::new(5.0, 5.0), Timestamp(0.0), &mut timers);
        // Pointer drifts back inside without a formal enter event.
        machine.pointer_moved(LatLng::new(0.6, 0.6), 12.0);

        drive_timers(&mut machine, &mut timers, Timestamp(HIDE_DELAY_MS));
        assert!(machine.has_focus());
        assert!(machine.panel().visible);
    }

    #[test]
    fn hovering_the_panel_blocks_the_hide() {
        let mut machine = HoverMachine::new();
        let mut timers = TimerQueue::new();

        machine.pointer_entered(&task(), &tile("a", 0.0), LatLng::new(0.5, 0.5), 12.0, &mut timers);
        machine.pointer_left(LatLng::new(5.0, 5.0), Timestamp(0.0), &mut timers);
        machine.panel_entered(&mut timers);

        drive_timers(&mut machine, &mut timers, Timestamp(10_000.0));
        assert!(machine.has_focus());
        assert!(machine.panel().visible);

        // Leaving the panel with the pointer off-tile restarts the debounce.
        machine.panel_left(Timestamp(10_000.0), &mut timers);
        assert!(machine.panel().visible);
        drive_timers(&mut machine, &mut timers, Timestamp(10_000.0 + HIDE_DELAY_MS));
        assert!(!machine.has_focus());
    }

    #[test]
    fn entering_a_different_tile_switches_focus() {
        let mut machine = HoverMachine::new();
        let mut timers = TimerQueue::new();
        let a = tile("a", 0.0);
        let b = tile("b", 2.0);

        machine.pointer_entered(&task(), &a, LatLng::new(0.5, 0.5), 12.0, &mut timers);
        machine.pointer_entered(&task(), &b, LatLng::new(0.5, 2.5), 12.0, &mut timers);

        let focus = machine.focus().expect("focused");
        assert_eq!(focus.tile, TileId::new("b"));
        assert!(timers.is_empty());
    }

    #[test]
    fn force_idle_cancels_pending_timer() {
        let mut machine = HoverMachine::new();
        let mut timers = TimerQueue::new();

        machine.pointer_entered(&task(), &tile("a", 0.0), LatLng::new(0.5, 0.5), 12.0, &mut timers);
        machine.pointer_left(LatLng::new(5.0, 5.0), Timestamp(0.0), &mut timers);
        machine.force_idle(&mut timers);

        assert!(timers.is_empty());
        assert!(!machine.panel().visible);

        // No stale firing can resurrect the old focus.
        drive_timers(&mut machine, &mut timers, Timestamp(10_000.0));
        assert!(!machine.has_focus());
    }

    #[test]
    fn revalidate_drops_focus_when_tile_no_longer_under_pointer() {
        let mut machine = HoverMachine::new();
        let mut timers = TimerQueue::new();

        machine.pointer_entered(&task(), &tile("a", 0.0), LatLng::new(0.5, 0.5), 12.0, &mut timers);
        machine.revalidate(12.0, &mut timers, |_, _| false);
        assert!(!machine.has_focus());
        assert!(!machine.panel().visible);
    }

    #[test]
    fn revalidate_below_threshold_forces_idle() {
        let mut machine = HoverMachine::new();
        let mut timers = TimerQueue::new();

        machine.pointer_entered(&task(), &tile("a", 0.0), LatLng::new(0.5, 0.5), 12.0, &mut timers);
        machine.revalidate(8.0, &mut timers, |_, _| true);
        assert!(!machine.has_focus());
    }

    #[test]
    fn revalidate_keeps_a_still_valid_focus() {
        let mut machine = HoverMachine::new();
        let mut timers = TimerQueue::new();

        machine.pointer_entered(&task(), &tile("a", 0.0), LatLng::new(0.5, 0.5), 12.0, &mut timers);
        machine.revalidate(12.0, &mut timers, |focus, pointer| {
            focus.bounds.contains(pointer)
        });
        assert!(machine.has_focus());
        assert!(machine.panel().visible);
    }
}
