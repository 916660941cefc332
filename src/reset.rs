//! "Clear and relayout": wipe cached positions, relayout, then fit once things settle.

use crate::constants::{FIT_PADDING, SETTLE_DELAY_MS};
use crate::controller::ViewportController;
use crate::scheduler::Scheduler;
use crate::store::PositionStore;
use crate::surface::RenderSurface;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

/// Where a reset currently is.
///
/// `Idle → Clearing → Relayouting → AwaitingSettle → Idle`. Every transition is
/// effect-only; there is no error state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetPhase {
    /// No reset in progress
    Idle,
    /// Dropping in-memory and persisted positions
    Clearing,
    /// Layout pass triggered on the surface
    Relayouting,
    /// Waiting for the deferred fit-to-view
    AwaitingSettle,
}

/// Orchestrates a reposition command against a surface and the position store.
///
/// Overlapping resets are not serialized: a second reset while the first is still
/// awaiting its fit schedules a second fit, and both fire. The extra fit is harmless.
pub struct ResetCoordinator {
    controller: ViewportController,
    store: Rc<RefCell<PositionStore>>,
    scheduler: Rc<dyn Scheduler>,
    phase: Rc<Cell<ResetPhase>>,
    settle_delay: Duration,
    fit_padding: f32,
}

impl ResetCoordinator {
    /// Creates a coordinator with the standard 250 ms settle delay and 20 px fit padding.
    pub fn new(
        controller: ViewportController,
        store: Rc<RefCell<PositionStore>>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        Self {
            controller,
            store,
            scheduler,
            phase: Rc::new(Cell::new(ResetPhase::Idle)),
            settle_delay: Duration::from_millis(SETTLE_DELAY_MS),
            fit_padding: FIT_PADDING,
        }
    }

    /// Overrides the wait between relayout and fit.
    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    /// Overrides the padding of the deferred fit.
    pub fn with_fit_padding(mut self, fit_padding: f32) -> Self {
        self.fit_padding = fit_padding;
        self
    }

    /// Current phase.
    pub fn phase(&self) -> ResetPhase {
        self.phase.get()
    }

    /// The store this coordinator clears.
    pub fn store(&self) -> &Rc<RefCell<PositionStore>> {
        &self.store
    }

    /// Runs a full reset against `surface`.
    ///
    /// Clearing and relayout happen synchronously; the fit is deferred. The deferred
    /// fit keeps only a weak handle and does nothing if the surface is gone, torn
    /// down, or busy when it fires.
    pub fn reset<S>(&self, surface: &Rc<RefCell<S>>)
    where
        S: RenderSurface + ?Sized + 'static,
    {
        enter(&self.phase, ResetPhase::Clearing);
        surface.borrow_mut().clean_local_positions();
        self.store.borrow_mut().clear();

        enter(&self.phase, ResetPhase::Relayouting);
        surface.borrow_mut().layout();

        enter(&self.phase, ResetPhase::AwaitingSettle);
        let weak = Rc::downgrade(surface);
        let controller = self.controller;
        let padding = self.fit_padding;
        let phase = Rc::clone(&self.phase);
        self.scheduler.schedule(
            self.settle_delay,
            Box::new(move || {
                fit_if_alive(&weak, &controller, padding);
                enter(&phase, ResetPhase::Idle);
            }),
        );
    }
}

fn enter(phase: &Cell<ResetPhase>, next: ResetPhase) {
    log::debug!("reset: {:?} -> {:?}", phase.get(), next);
    phase.set(next);
}

fn fit_if_alive<S>(surface: &Weak<RefCell<S>>, controller: &ViewportController, padding: f32)
where
    S: RenderSurface + ?Sized,
{
    let Some(cell) = surface.upgrade() else {
        log::debug!("deferred fit skipped: surface dropped");
        return;
    };
    let Ok(mut surface) = cell.try_borrow_mut() else {
        log::debug!("deferred fit skipped: surface busy");
        return;
    };
    if !surface.is_alive() {
        log::debug!("deferred fit skipped: surface torn down");
        return;
    }
    controller.fit_to_view(&mut *surface, padding);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::PerformanceGuard;
    use crate::scheduler::TimerQueue;
    use crate::store::MemoryStore;
    use crate::surface::testing::{RecordingSurface, SurfaceCall};
    use crate::types::{PersistedPosition, TransitionConfig};

    struct Fixture {
        coordinator: ResetCoordinator,
        queue: TimerQueue,
        surface: Rc<RefCell<RecordingSurface>>,
    }

    fn fixture(nodes: usize) -> Fixture {
        let queue = TimerQueue::new();
        let store = Rc::new(RefCell::new(PositionStore::with_backend(MemoryStore::new())));
        let controller = ViewportController::new(
            PerformanceGuard::new(50).unwrap(),
            TransitionConfig::default(),
        );
        let coordinator = ResetCoordinator::new(controller, store, Rc::new(queue.clone()));
        Fixture {
            coordinator,
            queue,
            surface: Rc::new(RefCell::new(RecordingSurface::with_nodes(nodes))),
        }
    }

    fn is_layout(call: &SurfaceCall) -> bool {
        matches!(call, SurfaceCall::Layout)
    }

    fn is_fit_20(call: &SurfaceCall) -> bool {
        matches!(call, SurfaceCall::FitView { padding, .. } if *padding == 20.0)
    }

    #[test]
    fn test_reset_clears_relayouts_then_fits_after_settle_delay() {
        let f = fixture(4);
        f.coordinator
            .store()
            .borrow_mut()
            .set_all(vec![PersistedPosition::new("n0", 1.0, 1.0)]);

        f.coordinator.reset(&f.surface);

        assert_eq!(f.coordinator.phase(), ResetPhase::AwaitingSettle);
        assert_eq!(f.coordinator.store().borrow().get("n0"), None);
        assert_eq!(
            f.surface.borrow().calls,
            vec![SurfaceCall::CleanLocalPositions, SurfaceCall::Layout]
        );

        f.queue.advance(Duration::from_millis(249));
        assert_eq!(f.surface.borrow().count(is_fit_20), 0);

        f.queue.advance(Duration::from_millis(1));
        assert_eq!(f.surface.borrow().count(is_layout), 1);
        assert_eq!(f.surface.borrow().count(is_fit_20), 1);
        assert_eq!(f.coordinator.phase(), ResetPhase::Idle);
    }

    #[test]
    fn test_overlapping_resets_are_not_deduplicated() {
        let f = fixture(4);
        f.coordinator.reset(&f.surface);
        f.queue.advance(Duration::from_millis(100));
        f.coordinator.reset(&f.surface);
        f.queue.advance(Duration::from_millis(500));

        let surface = f.surface.borrow();
        assert_eq!(surface.count(is_layout), 2);
        assert_eq!(surface.count(is_fit_20), 2);
        assert_eq!(f.coordinator.phase(), ResetPhase::Idle);
    }

    #[test]
    fn test_deferred_fit_on_dropped_surface_is_noop() {
        let f = fixture(4);
        f.coordinator.reset(&f.surface);
        drop(f.surface);
        assert_eq!(f.queue.advance(Duration::from_millis(250)), 1);
        assert_eq!(f.coordinator.phase(), ResetPhase::Idle);
    }

    #[test]
    fn test_deferred_fit_on_torn_down_surface_is_noop() {
        let f = fixture(4);
        f.coordinator.reset(&f.surface);
        f.surface.borrow_mut().alive = false;
        f.queue.advance(Duration::from_millis(250));
        assert_eq!(f.surface.borrow().count(is_fit_20), 0);
        assert_eq!(f.coordinator.phase(), ResetPhase::Idle);
    }

    #[test]
    fn test_reset_on_empty_diagram_skips_fit() {
        let f = fixture(0);
        f.coordinator.reset(&f.surface);
        f.queue.advance(Duration::from_millis(250));
        assert_eq!(f.surface.borrow().count(is_layout), 1);
        assert_eq!(f.surface.borrow().count(is_fit_20), 0);
    }
}
