use catalog::modality::Modality;
use catalog::split::SplitSelection;
use catalog::task::TaskId;
use foundation::geo::{GeoBounds, LatLng};
use foundation::time::Timestamp;
use runtime::frame::Frame;
use scene::attribute_filter::SpeciesSelection;
use scene::tile::TileId;

/// The named input events driving the whole pipeline.
///
/// Everything the map, the control panel, and the pointer can do arrives
/// here; every handler re-validates preconditions against current state
/// rather than trusting the context the event was produced under.
///
/// Checking a task is not an event: loading is asynchronous, so the host
/// fetches first and calls `Controller::install_task` on success (reverting
/// the checkbox on failure).
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Continuous pan/move; coalesced to one recomputation per frame.
    ViewportMoved { bounds: GeoBounds },
    /// Zoom gesture settled; throttled by a fixed window before applying.
    ZoomEnded {
        zoom: f64,
        bounds: GeoBounds,
        now: Timestamp,
    },
    /// Animation-frame tick; drives timers, throttles, and pending work.
    FrameTick(Frame),

    PointerEnteredTile {
        task: TaskId,
        tile: TileId,
        point: LatLng,
    },
    PointerMoved { point: LatLng },
    PointerLeftTile { point: LatLng, now: Timestamp },
    PanelEntered,
    PanelLeft { now: Timestamp },

    // Touch mirrors hover with the same debounce discipline.
    TouchStarted {
        task: TaskId,
        tile: TileId,
        point: LatLng,
    },
    TouchMoved { point: LatLng },
    TouchEnded { point: LatLng, now: Timestamp },

    ModalitySelected(Modality),
    SplitsChanged(SplitSelection),
    SpeciesSelected(SpeciesSelection),
    ValueOverlayToggled { task: TaskId, on: bool },
    /// Task checkbox unchecked.
    TaskHidden(TaskId),
}
