//! Per-frame orchestration of the preview.
//!
//! Each call to [`FrameCoordinator::tick`] runs, in order: apply a finished
//! kernel result, advance the rotation, advance the geometry parameters,
//! start a regeneration if due, resize the canvas, re-center the camera and
//! render. The host calls `tick` once per display refresh and schedules the
//! next one itself.

use std::cell::{Cell, RefCell};
use std::f64::consts::PI;
use std::rc::Rc;

use file_format::MeshSerializer;
use tracing::{debug, warn};
use tube_kernel::SolidKernel;
use tube_types::{Bounds, CylinderParams, Orientation, ParamKind, RenderMesh};

use crate::animate::{Animated, Transition};
use crate::cell::{zip4, ReactiveCell};
use crate::clock::Clock;
use crate::config::PreviewConfig;
use crate::error::PreviewError;
use crate::gesture::{GestureMachine, GesturePosition};
use crate::host::{CameraFraming, DownloadLink, Viewport};
use crate::inputs::{InputOutcome, NumericInput, ToggleInput};
use crate::scheduler::RegenScheduler;

/// Everything outside the pipeline that the coordinator talks to.
pub struct Collaborators {
    pub kernel: Box<dyn SolidKernel>,
    pub viewport: Box<dyn Viewport>,
    pub link: Box<dyn DownloadLink>,
    pub serializer: Box<dyn MeshSerializer>,
    pub clock: Rc<dyn Clock>,
}

/// Where the rotation should go and how to get there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationTarget {
    pub units: f64,
    pub transition: Transition,
}

impl RotationTarget {
    pub fn settle(orientation: Orientation) -> Self {
        Self {
            units: orientation.units(),
            transition: Transition::Eased,
        }
    }

    pub fn follow(units: f64) -> Self {
        Self {
            units,
            transition: Transition::Immediate,
        }
    }
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// Sequence number of a kernel result applied this frame.
    pub applied_seq: Option<u64>,
    pub rotation_changed: bool,
    pub params_changed: bool,
    /// Sequence number of a kernel request issued this frame.
    pub issued_seq: Option<u64>,
    pub resized: bool,
    pub recentered: bool,
}

type SharedAnimated = Rc<RefCell<Animated>>;

pub struct FrameCoordinator {
    config: PreviewConfig,
    kernel: Box<dyn SolidKernel>,
    viewport: Box<dyn Viewport>,
    link: Box<dyn DownloadLink>,
    serializer: Box<dyn MeshSerializer>,
    clock: Rc<dyn Clock>,

    height: NumericInput,
    outer_radius: NumericInput,
    wall_thickness: NumericInput,
    closed_bottom: ToggleInput,
    closed_cell: ReactiveCell<bool>,
    rotation_target: ReactiveCell<RotationTarget>,
    tracking: ReactiveCell<bool>,

    height_anim: SharedAnimated,
    radius_anim: SharedAnimated,
    wall_anim: SharedAnimated,
    rotation_anim: SharedAnimated,
    targets_changed: Rc<Cell<bool>>,

    gesture: GestureMachine,
    scheduler: RegenScheduler,
    mesh: Option<RenderMesh>,
    bounds: Option<Bounds>,
    filename: Option<String>,
    needs_recenter: bool,
}

impl FrameCoordinator {
    pub fn new(config: PreviewConfig, collaborators: Collaborators) -> Result<Self, PreviewError> {
        config.validate()?;
        let Collaborators {
            kernel,
            viewport,
            link,
            serializer,
            clock,
        } = collaborators;

        let limits = config.limits;
        let defaults = limits.defaults();
        let height_cell = ReactiveCell::new(defaults.height);
        let radius_cell = ReactiveCell::new(defaults.outer_radius);
        let wall_cell = ReactiveCell::new(defaults.wall_thickness);
        let closed_cell = ReactiveCell::new(defaults.closed_bottom);
        let rotation_target = ReactiveCell::new(RotationTarget::settle(Orientation::default()));

        let animated = |initial: f64| {
            Rc::new(RefCell::new(Animated::new(
                initial,
                config.animation.duration(),
                config.animation.easing,
            )))
        };
        let height_anim = animated(defaults.height);
        let radius_anim = animated(defaults.outer_radius);
        let wall_anim = animated(defaults.wall_thickness);
        let rotation_anim = animated(Orientation::default().units());

        drive(&height_cell, &height_anim, &clock);
        drive(&radius_cell, &radius_anim, &clock);
        drive(&wall_cell, &wall_anim, &clock);
        {
            let anim = Rc::clone(&rotation_anim);
            let clock = Rc::clone(&clock);
            rotation_target.add_listener(move |target: &RotationTarget| {
                anim.borrow_mut()
                    .start_animation_to(target.units, clock.now(), target.transition);
            });
        }

        // Replays once on registration, which requests the initial load.
        let targets_changed = Rc::new(Cell::new(false));
        {
            let flag = Rc::clone(&targets_changed);
            zip4(&height_cell, &radius_cell, &wall_cell, &closed_cell)
                .add_listener(move |_| flag.set(true));
        }

        Ok(Self {
            height: NumericInput::new(ParamKind::Height, limits.height, height_cell),
            outer_radius: NumericInput::new(ParamKind::OuterRadius, limits.outer_radius, radius_cell),
            wall_thickness: NumericInput::new(
                ParamKind::WallThickness,
                limits.wall_thickness,
                wall_cell,
            ),
            closed_bottom: ToggleInput::new(closed_cell.clone()),
            closed_cell,
            rotation_target,
            tracking: ReactiveCell::new(false),
            height_anim,
            radius_anim,
            wall_anim,
            rotation_anim,
            targets_changed,
            gesture: GestureMachine::new(config.gesture),
            scheduler: RegenScheduler::new(config.scheduler),
            mesh: None,
            bounds: None,
            filename: None,
            needs_recenter: false,
            kernel,
            viewport,
            link,
            serializer,
            clock,
            config,
        })
    }

    /// Run one frame.
    pub fn tick(&mut self) -> FrameReport {
        let now = self.clock.now();
        let mut report = FrameReport::default();

        if let Some(result) = self.scheduler.poll() {
            self.viewport.set_mesh(&result.mesh);
            match self.serializer.artifact(&result.mesh, result.filename.clone()) {
                Ok(artifact) => self.link.publish(artifact),
                Err(error) => warn!(seq = result.seq, %error, "could not serialize mesh"),
            }
            self.bounds = result.mesh.bounds();
            self.mesh = Some(result.mesh);
            self.filename = Some(result.filename);
            self.needs_recenter = true;
            report.applied_seq = Some(result.seq);
        }

        if self.rotation_anim.borrow_mut().update(now) {
            let radians = self.radians(self.rotation_anim.borrow().current());
            self.viewport.set_rotation(radians);
            report.rotation_changed = true;
        }

        let mut params_changed = self.targets_changed.replace(false);
        for anim in [&self.height_anim, &self.radius_anim, &self.wall_anim] {
            params_changed |= anim.borrow_mut().update(now);
        }
        if params_changed {
            self.scheduler.mark_needs_reload();
            report.params_changed = true;
        }

        let params = self.params_current();
        report.issued_seq = self
            .scheduler
            .start_reload_if_due(now, params, &mut *self.kernel);

        if self.viewport.resize_canvas() {
            self.needs_recenter = true;
            report.resized = true;
        }

        if self.needs_recenter {
            if let Some(bounds) = self.bounds {
                let framing = CameraFraming {
                    bounds,
                    rotation_radians: self.radians(self.gesture.orientation().units()),
                };
                self.viewport.center_camera_around(&framing);
                self.needs_recenter = false;
                report.recentered = true;
            }
        }

        self.viewport.render();
        report
    }

    /// Press at canvas position `(x, y)`. Presses on the background are ignored.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        if self.gesture.is_tracking() {
            debug!("pointer down during an active gesture; ignored");
            return false;
        }
        match self.viewport.pixel_color(x, y) {
            None => {
                debug!(x, y, "pointer down outside the canvas; ignored");
                return false;
            }
            Some(pixel) if pixel.is_transparent() => {
                debug!(x, y, "pointer down on background; ignored");
                return false;
            }
            Some(_) => {}
        }
        let rotation = self.rotation_anim.borrow().current();
        let started = self.gesture.pointer_down(x, y, self.clock.now(), rotation);
        if started {
            self.tracking.send(true);
        }
        started
    }

    /// Follow the pointer while a press is in progress.
    pub fn pointer_move(&mut self, x: f64) -> bool {
        let width = self.viewport.canvas_width();
        match self.gesture.pointer_move(x, width) {
            Some(units) => {
                self.rotation_target.send(RotationTarget::follow(units));
                true
            }
            None => false,
        }
    }

    pub fn pointer_up(&mut self) -> Option<Orientation> {
        let rotation = self.rotation_anim.borrow().current();
        let settled = self.gesture.pointer_up(self.clock.now(), rotation);
        self.finish_gesture(settled)
    }

    pub fn pointer_cancel(&mut self) -> Option<Orientation> {
        let rotation = self.rotation_anim.borrow().current();
        let settled = self.gesture.pointer_cancel(self.clock.now(), rotation);
        self.finish_gesture(settled)
    }

    fn finish_gesture(&mut self, settled: Option<Orientation>) -> Option<Orientation> {
        let orientation = settled?;
        self.rotation_target.send(RotationTarget::settle(orientation));
        self.tracking.send(false);
        Some(orientation)
    }

    /// Submit text typed into one of the numeric fields.
    pub fn set_param_text(&mut self, kind: ParamKind, text: &str) -> InputOutcome {
        self.numeric_input(kind).submit(text)
    }

    pub fn set_closed_bottom(&mut self, closed: bool) -> bool {
        self.closed_bottom.set(closed)
    }

    /// Replace all four targets at once, clamped into the configured limits.
    pub fn load_params(&mut self, params: CylinderParams) {
        let params = self.config.limits.clamp(params);
        self.height.submit_value(params.height);
        self.outer_radius.submit_value(params.outer_radius);
        self.wall_thickness.submit_value(params.wall_thickness);
        self.closed_bottom.set(params.closed_bottom);
    }

    pub fn numeric_input(&self, kind: ParamKind) -> &NumericInput {
        match kind {
            ParamKind::Height => &self.height,
            ParamKind::OuterRadius => &self.outer_radius,
            ParamKind::WallThickness => &self.wall_thickness,
        }
    }

    pub fn closed_input(&self) -> &ToggleInput {
        &self.closed_bottom
    }

    /// Values the user asked for.
    pub fn params_target(&self) -> CylinderParams {
        CylinderParams::new(
            self.height.value(),
            self.outer_radius.value(),
            self.wall_thickness.value(),
            self.closed_cell.latest(),
        )
    }

    /// Values currently on screen, part way through any transition.
    pub fn params_current(&self) -> CylinderParams {
        CylinderParams::new(
            self.height_anim.borrow().current(),
            self.radius_anim.borrow().current(),
            self.wall_anim.borrow().current(),
            self.closed_cell.latest(),
        )
    }

    /// True while move/up events should be routed here.
    pub fn tracking_cell(&self) -> ReactiveCell<bool> {
        self.tracking.clone()
    }

    pub fn rotation_target_cell(&self) -> ReactiveCell<RotationTarget> {
        self.rotation_target.clone()
    }

    /// Animated rotation in units (one unit is half a turn).
    pub fn rotation_units(&self) -> f64 {
        self.rotation_anim.borrow().current()
    }

    pub fn orientation(&self) -> Orientation {
        self.gesture.orientation()
    }

    pub fn gesture_position(&self) -> GesturePosition {
        self.gesture.position()
    }

    pub fn scheduler(&self) -> &RegenScheduler {
        &self.scheduler
    }

    /// Download name of the mesh on screen.
    pub fn current_filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// The mesh on screen, once the first result has arrived.
    pub fn current_mesh(&self) -> Option<&RenderMesh> {
        self.mesh.as_ref()
    }

    pub fn current_bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    fn radians(&self, units: f64) -> f64 {
        units * PI + self.config.view.rotation_offset_radians
    }
}

/// Push every new target from `cell` into `anim` as an eased transition.
fn drive(cell: &ReactiveCell<f64>, anim: &SharedAnimated, clock: &Rc<dyn Clock>) {
    let anim = Rc::clone(anim);
    let clock = Rc::clone(clock);
    cell.add_listener(move |target: &f64| {
        anim.borrow_mut()
            .start_animation_to(*target, clock.now(), Transition::Eased);
    });
}
