//! The control state machine: a slider's value model with validated accessors, change
//! listeners, and frame-coalesced display refreshes.

use std::fmt::{Debug, Display};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use atomic_float::AtomicF32;
use lazy_static::lazy_static;

use crate::config::{self, CtlConfig, Direction};
use crate::error::CtlError;
use crate::event_loop::{EventLoop, FrameClock};
use crate::formatters;

pub mod range;
pub mod spec;

use self::range::{Range, Warp};

/// Multiplier applied to the step for [`StepAmount::Coarse`] nudges, the usual shift-key
/// behavior.
const COARSE_STEP_SCALE: f32 = 10.0;
/// Fraction of the normalized range covered by one [`StepAmount::Scaled`] nudge, the usual
/// alt-key and page-up/down behavior.
const SCALED_STEP: f32 = 1.0 / 20.0;

/// Callback for listening to value changes, called with the control's new plain value and its
/// normalized `[0, 1]` counterpart. This should not do anything expensive as it may be called
/// multiple times in rapid succession.
pub type Listener = Arc<dyn Fn(f32, f32) + Send + Sync>;

/// The presentation layer's render callback. Runs on the control's event loop with a
/// [`DisplayFrame`] describing the state at the time the frame executes.
pub type Renderer = Arc<dyn Fn(DisplayFrame) + Send + Sync>;

/// Identifies a listener registered through [`Ctl::bind()`] so it can be removed again with
/// [`Ctl::unbind()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerHandle(u64);

/// Everything a renderer needs to draw one frame: the plain value, the normalized handle and
/// meter position, and the value formatted at the control's fixed display width.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayFrame {
    pub value: f32,
    pub normal: f32,
    pub text: String,
}

/// Increment granularities for [`Ctl::increment()`] and [`Ctl::decrement()`], matching the
/// wheel and arrow-key modifiers sliders conventionally support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepAmount {
    /// One step of the configured step size.
    #[default]
    Step,
    /// Ten steps at once.
    Coarse,
    /// One twentieth of the normalized range, regardless of step size.
    Scaled,
}

/// Snapshot shared with the event loop. A deferred refresh always renders the state current at
/// the time the frame runs, which is what makes dropping intermediate frames safe.
struct DisplayState {
    value: AtomicF32,
    normal: AtomicF32,
    /// Set while a refresh task is queued. Further updates only move the snapshot.
    refresh_pending: AtomicBool,
}

lazy_static! {
    /// Fallback clock for controls constructed without an explicit event loop. Shared, like
    /// every control on a page sharing the same frame callback.
    static ref SHARED_FRAME_CLOCK: Arc<FrameClock> = Arc::new(FrameClock::new_and_spawn());
}

/// A slider/numeric control's value model. The five fields `min`, `max`, `step`, `value`, and
/// `normal` are only reachable through validated accessors that maintain the invariants:
/// ordered bounds, a value quantized to the step and clamped to the bounds, and a normal that
/// is always the warp-specific mapping of the value into `[0, 1]`.
pub struct Ctl {
    range: Range,
    step: f32,
    value: f32,
    normal: f32,

    direction: Direction,
    label: String,
    theme: String,
    width: Option<String>,
    height: Option<String>,
    num_characters: usize,
    max_precision: usize,

    format: Arc<dyn Fn(f32) -> String + Send + Sync>,
    parse: Arc<dyn Fn(&str) -> Option<f32> + Send + Sync>,

    listeners: Vec<(ListenerHandle, Listener)>,
    next_listener_id: u64,

    display: Arc<DisplayState>,
    renderer: Option<Renderer>,
    event_loop: Arc<dyn EventLoop>,
}

impl Display for Ctl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format_value())
    }
}

impl Debug for Ctl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = if self.label.is_empty() {
            "ctl"
        } else {
            self.label.as_str()
        };
        write!(f, "{}: {}", label, &self)
    }
}

impl Ctl {
    /// Build a new control from explicit options merged over the built-in defaults, using the
    /// shared fallback frame clock for display refreshes.
    pub fn new(options: CtlConfig) -> Result<Ctl, CtlError> {
        Self::build(
            CtlConfig::default(),
            options,
            SHARED_FRAME_CLOCK.clone() as Arc<dyn EventLoop>,
        )
    }

    /// Like [`new()`][Self::new()], but also merges in host element attributes. Explicit
    /// options take priority over attributes, which take priority over a `spec` preset named
    /// by either.
    pub fn from_attributes<'a, I>(attributes: I, options: CtlConfig) -> Result<Ctl, CtlError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self::build(
            CtlConfig::from_attributes(attributes),
            options,
            SHARED_FRAME_CLOCK.clone() as Arc<dyn EventLoop>,
        )
    }

    /// Like [`new()`][Self::new()], with display refreshes scheduled on the given event loop
    /// instead of the built-in timer. This is how a host plugs in its platform's frame
    /// callback primitive.
    pub fn with_event_loop(
        options: CtlConfig,
        event_loop: Arc<dyn EventLoop>,
    ) -> Result<Ctl, CtlError> {
        Self::build(CtlConfig::default(), options, event_loop)
    }

    fn build(
        attributes: CtlConfig,
        options: CtlConfig,
        event_loop: Arc<dyn EventLoop>,
    ) -> Result<Ctl, CtlError> {
        let resolved = config::resolve(attributes, options)?;

        let range = Range {
            min: resolved.min,
            max: resolved.max,
            warp: resolved.warp,
        };
        range.assert_validity();

        let format = formatters::fixed_width(
            resolved.num_characters,
            resolved.max_precision,
            resolved.min < 0.0,
            resolved.direction == Direction::Vertical,
        );

        let mut ctl = Ctl {
            range,
            step: resolved.step,
            value: 0.0,
            normal: 0.0,
            direction: resolved.direction,
            label: resolved.label,
            theme: resolved.theme,
            width: resolved.width,
            height: resolved.height,
            num_characters: resolved.num_characters,
            max_precision: resolved.max_precision,
            format,
            parse: formatters::from_fixed_width(),
            listeners: Vec::new(),
            next_listener_id: 0,
            display: Arc::new(DisplayState {
                value: AtomicF32::new(0.0),
                normal: AtomicF32::new(0.0),
                refresh_pending: AtomicBool::new(false),
            }),
            renderer: None,
            event_loop,
        };
        // The configured value runs through the regular path so construction and later
        // assignment agree on quantization and clamping
        ctl.apply_value(resolved.value);

        Ok(ctl)
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[inline]
    pub fn normal(&self) -> f32 {
        self.normal
    }

    #[inline]
    pub fn min(&self) -> f32 {
        self.range.min
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.range.max
    }

    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    #[inline]
    pub fn warp(&self) -> Warp {
        self.range.warp
    }

    /// The current bounds and warp as a [`Range`].
    #[inline]
    pub fn range(&self) -> Range {
        self.range
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn width(&self) -> Option<&str> {
        self.width.as_deref()
    }

    pub fn height(&self) -> Option<&str> {
        self.height.as_deref()
    }

    pub fn num_characters(&self) -> usize {
        self.num_characters
    }

    pub fn max_precision(&self) -> usize {
        self.max_precision
    }

    /// The current value formatted at the control's fixed display width.
    pub fn format_value(&self) -> String {
        (self.format)(self.value)
    }

    /// Map a plain value to its normalized `[0, 1]` position under the active warp.
    #[inline]
    pub fn normalize(&self, plain: f32) -> f32 {
        self.range.normalize(plain)
    }

    /// Map a normalized `[0, 1]` position to a plain value under the active warp.
    #[inline]
    pub fn unnormalize(&self, normalized: f32) -> f32 {
        self.range.unnormalize(normalized)
    }

    /// Set the plain value. The input is quantized to the step, clamped to the bounds, and the
    /// normal is re-derived from the result. Listeners fire when the stored value changed.
    pub fn set_value(&mut self, input: f32) -> Result<(), CtlError> {
        if !input.is_finite() {
            return Err(CtlError::NotANumber { what: "value" });
        }

        self.apply_value(input);
        Ok(())
    }

    /// Set the value from its normalized `[0, 1]` position. The position is clamped, mapped to
    /// a plain value, quantized, and the normal is re-derived from the quantized result so it
    /// reflects what is actually stored.
    pub fn set_normal(&mut self, input: f32) -> Result<(), CtlError> {
        if !input.is_finite() {
            return Err(CtlError::NotANumber { what: "normal" });
        }

        let clamped = input.clamp(0.0, 1.0);
        self.apply_value(self.range.unnormalize(clamped));
        Ok(())
    }

    /// Set the lower bound. A minimum above the current maximum swaps the bounds instead of
    /// erroring, and the current value is re-clamped against the new range.
    pub fn set_min(&mut self, input: f32) -> Result<(), CtlError> {
        if !input.is_finite() {
            return Err(CtlError::NotANumber { what: "minimum value" });
        }
        if self.range.warp == Warp::Exponential && input <= 0.0 {
            return Err(CtlError::ExponentialMinimum { min: input });
        }

        if input > self.range.max {
            self.range.min = self.range.max;
            self.range.max = input;
        } else {
            self.range.min = input;
        }

        // Re-derives the normal against the new bounds, re-clamping the value on the way
        self.apply_value(self.value);
        Ok(())
    }

    /// Set the upper bound. A maximum below the current minimum swaps the bounds instead of
    /// erroring, and the current value is re-clamped against the new range.
    pub fn set_max(&mut self, input: f32) -> Result<(), CtlError> {
        if !input.is_finite() {
            return Err(CtlError::NotANumber { what: "maximum value" });
        }
        // The swap below can turn the input into the new minimum
        if self.range.warp == Warp::Exponential && input <= 0.0 {
            return Err(CtlError::ExponentialMinimum { min: input });
        }

        if input < self.range.min {
            self.range.max = self.range.min;
            self.range.min = input;
        } else {
            self.range.max = input;
        }

        self.apply_value(self.value);
        Ok(())
    }

    /// Set the quantization step. The step is clamped to `[0, max - min]`, with zero meaning
    /// unquantized, and the current value is re-quantized from its normalized position.
    pub fn set_step(&mut self, input: f32) -> Result<(), CtlError> {
        if !input.is_finite() {
            return Err(CtlError::NotANumber { what: "step value" });
        }

        // The step can't be more than the total range
        self.step = input.clamp(0.0, self.range.max - self.range.min);
        self.apply_value(self.range.unnormalize(self.normal));
        Ok(())
    }

    /// Swap the active warp. The value and normal deliberately stay untouched until the next
    /// setter runs. Switching to the exponential warp is rejected while the minimum isn't
    /// strictly positive.
    pub fn set_warp(&mut self, warp: Warp) -> Result<(), CtlError> {
        if warp == Warp::Exponential && self.range.min <= 0.0 {
            return Err(CtlError::ExponentialMinimum {
                min: self.range.min,
            });
        }

        self.range.warp = warp;
        Ok(())
    }

    /// Set the warp from a configuration key. Unlike [`set_warp()`][Self::set_warp()] an
    /// unrecognized key is ignored, keeping the active mapper.
    pub fn set_warp_key(&mut self, key: &str) -> Result<(), CtlError> {
        match Warp::from_key(key) {
            Some(warp) => self.set_warp(warp),
            None => {
                ctl_warn!("Ignoring unknown warp {key:?}");
                Ok(())
            }
        }
    }

    /// Set the value from text input, the way the number display feeds edits back in. Padding
    /// is ignored; anything else that doesn't parse cancels the update.
    pub fn set_from_string(&mut self, string: &str) -> Result<(), CtlError> {
        match (self.parse)(string) {
            Some(value) => self.set_value(value),
            None => Err(CtlError::UnparseableValue(string.to_owned())),
        }
    }

    /// Nudge the value up by the given amount.
    pub fn increment(&mut self, amount: StepAmount) -> Result<(), CtlError> {
        self.nudge(1.0, amount)
    }

    /// Nudge the value down by the given amount.
    pub fn decrement(&mut self, amount: StepAmount) -> Result<(), CtlError> {
        self.nudge(-1.0, amount)
    }

    fn nudge(&mut self, direction: f32, amount: StepAmount) -> Result<(), CtlError> {
        match amount {
            StepAmount::Step => self.set_value(self.value + direction * self.step),
            StepAmount::Coarse => {
                self.set_value(self.value + direction * self.step * COARSE_STEP_SCALE)
            }
            StepAmount::Scaled => self.set_normal(self.normal + direction * SCALED_STEP),
        }
    }

    /// Add a listener called on every value change with `(value, normal)`. Listeners run
    /// synchronously on the calling thread, in registration order, ahead of the deferred
    /// display refresh.
    pub fn bind(&mut self, listener: Listener) -> ListenerHandle {
        let handle = ListenerHandle(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((handle, listener));
        handle
    }

    /// Remove a previously bound listener. Returns whether the handle was still bound.
    pub fn unbind(&mut self, handle: ListenerHandle) -> bool {
        let listeners_before = self.listeners.len();
        self.listeners.retain(|(bound, _)| *bound != handle);
        self.listeners.len() != listeners_before
    }

    /// Register the presentation layer's render callback and schedule an initial refresh so
    /// the display reflects the current state.
    pub fn set_renderer(&mut self, renderer: Renderer) {
        self.renderer = Some(renderer);
        self.request_refresh();
    }

    /// Notify all listeners with the current `(value, normal)` and schedule a display refresh.
    /// The setters call this on every change; hosts can call it to force a refresh pass.
    pub fn update(&self) {
        for (_, listener) in &self.listeners {
            listener(self.value, self.normal);
        }

        self.request_refresh();
    }

    /// Quantize and clamp `input`, store it together with its re-derived normal, and emit an
    /// update when either stored field changed.
    fn apply_value(&mut self, input: f32) {
        let old_value = self.value;
        let old_normal = self.normal;

        self.value = self.quantize(input);
        self.normal = self.range.normalize(self.value);

        if self.value != old_value || self.normal != old_normal {
            self.update();
        }
    }

    fn quantize(&self, value: f32) -> f32 {
        if self.step > 0.0 {
            self.range.snap_to_step(value, self.step)
        } else {
            self.range.clamp(value)
        }
    }

    fn request_refresh(&self) {
        self.display.value.store(self.value, Ordering::Relaxed);
        self.display.normal.store(self.normal, Ordering::Relaxed);

        let renderer = match &self.renderer {
            Some(renderer) => renderer,
            None => return,
        };
        // While a refresh is already queued, new values only move the snapshot. Bursts of
        // changes collapse into a single render per frame.
        if self.display.refresh_pending.swap(true, Ordering::AcqRel) {
            return;
        }

        let display = Arc::clone(&self.display);
        let renderer = Arc::clone(renderer);
        let format = Arc::clone(&self.format);
        let scheduled = self.event_loop.schedule(Box::new(move || {
            display.refresh_pending.store(false, Ordering::Release);
            let value = display.value.load(Ordering::Relaxed);
            let normal = display.normal.load(Ordering::Relaxed);
            renderer(DisplayFrame {
                value,
                normal,
                text: format(value),
            });
        }));
        if !scheduled {
            self.display.refresh_pending.store(false, Ordering::Release);
            ctl_warn!("Dropped a display refresh because the event loop queue is full");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::event_loop::{ImmediateLoop, Task};

    /// An event loop that only runs its tasks when told to, so tests can observe the state
    /// between the synchronous listener pass and the deferred render.
    #[derive(Default)]
    struct ManualLoop {
        tasks: Mutex<Vec<Task>>,
    }

    impl ManualLoop {
        fn pending(&self) -> usize {
            self.tasks.lock().unwrap().len()
        }

        fn run(&self) {
            let tasks: Vec<Task> = std::mem::take(&mut *self.tasks.lock().unwrap());
            for task in tasks {
                task();
            }
        }
    }

    impl EventLoop for ManualLoop {
        fn schedule(&self, task: Task) -> bool {
            self.tasks.lock().unwrap().push(task);
            true
        }
    }

    fn immediate(options: CtlConfig) -> Ctl {
        Ctl::with_event_loop(options, Arc::new(ImmediateLoop)).unwrap()
    }

    fn bipolar_tenths() -> Ctl {
        immediate(CtlConfig {
            min: Some(-10.0),
            max: Some(10.0),
            step: Some(0.1),
            value: Some(5.0),
            ..CtlConfig::default()
        })
    }

    #[test]
    fn values_clamp_to_the_bounds() {
        let mut ctl = bipolar_tenths();
        assert_eq!(ctl.value(), 5.0);

        ctl.set_value(15.0).unwrap();
        assert_eq!(ctl.value(), 10.0);

        ctl.set_value(-100.0).unwrap();
        assert_eq!(ctl.value(), -10.0);
    }

    #[test]
    fn the_freq_spec_maps_exponentially() {
        let ctl = immediate(CtlConfig {
            spec: Some(String::from("freq")),
            ..CtlConfig::default()
        });
        approx::assert_relative_eq!(ctl.value(), 440.0, epsilon = 1e-3);

        let expected =
            (440.0f32.ln() - 20.0f32.ln()) / (20_000.0f32.ln() - 20.0f32.ln());
        approx::assert_relative_eq!(ctl.normalize(ctl.value()), expected, epsilon = 1e-4);
        approx::assert_relative_eq!(ctl.normal(), expected, epsilon = 1e-4);
    }

    #[test]
    fn inverted_minimum_swaps_the_bounds() {
        let mut ctl = immediate(CtlConfig::default());
        ctl.set_min(5.0).unwrap();
        assert_eq!(ctl.min(), 1.0);
        assert_eq!(ctl.max(), 5.0);
        // The value follows the range it was clamped out of
        assert_eq!(ctl.value(), 1.0);
    }

    #[test]
    fn inverted_maximum_swaps_the_bounds() {
        let mut ctl = immediate(CtlConfig::default());
        ctl.set_max(-3.0).unwrap();
        assert_eq!(ctl.min(), -3.0);
        assert_eq!(ctl.max(), 0.0);
        assert!(ctl.min() <= ctl.max());
    }

    #[test]
    fn steps_clamp_to_the_range_span() {
        let mut ctl = immediate(CtlConfig::default());
        ctl.set_step(2.0).unwrap();
        assert_eq!(ctl.step(), 1.0);
    }

    #[test]
    fn setting_the_step_requantizes_the_value() {
        let mut ctl = immediate(CtlConfig {
            min: Some(0.0),
            max: Some(10.0),
            step: Some(1.0),
            value: Some(5.0),
            ..CtlConfig::default()
        });
        ctl.set_step(3.0).unwrap();
        assert_eq!(ctl.step(), 3.0);
        assert_eq!(ctl.value(), 6.0);
    }

    #[test]
    fn non_finite_input_is_rejected_and_leaves_the_state_alone() {
        let mut ctl = bipolar_tenths();
        assert_eq!(
            ctl.set_value(f32::NAN),
            Err(CtlError::NotANumber { what: "value" })
        );
        assert_eq!(
            ctl.set_min(f32::INFINITY),
            Err(CtlError::NotANumber {
                what: "minimum value"
            })
        );
        assert_eq!(ctl.value(), 5.0);
        assert_eq!(ctl.min(), -10.0);
    }

    #[test]
    fn normals_quantize_through_the_value() {
        let mut ctl = immediate(CtlConfig {
            step: Some(0.25),
            ..CtlConfig::default()
        });
        ctl.set_normal(0.4).unwrap();
        assert_eq!(ctl.value(), 0.5);
        assert_eq!(ctl.normal(), 0.5);

        // Out-of-range normals clamp before mapping
        ctl.set_normal(7.0).unwrap();
        assert_eq!(ctl.value(), 1.0);
        assert_eq!(ctl.normal(), 1.0);
    }

    #[test]
    fn warp_changes_keep_the_value_until_the_next_setter() {
        let mut ctl = immediate(CtlConfig {
            value: Some(0.25),
            ..CtlConfig::default()
        });
        let value = ctl.value();
        let normal = ctl.normal();

        ctl.set_warp(Warp::QuadIn).unwrap();
        assert_eq!(ctl.warp(), Warp::QuadIn);
        assert_eq!(ctl.value(), value);
        assert_eq!(ctl.normal(), normal);

        // min == 0.0, so the exponential warp is out
        assert_eq!(
            ctl.set_warp(Warp::Exponential),
            Err(CtlError::ExponentialMinimum { min: 0.0 })
        );

        // Unknown keys are ignored rather than rejected
        ctl.set_warp_key("cubic").unwrap();
        assert_eq!(ctl.warp(), Warp::QuadIn);
    }

    #[test]
    fn string_input_feeds_the_value_setter() {
        let mut ctl = immediate(CtlConfig {
            min: Some(0.0),
            max: Some(100.0),
            step: Some(0.5),
            ..CtlConfig::default()
        });
        ctl.set_from_string(" 12.5").unwrap();
        assert_eq!(ctl.value(), 12.5);

        assert_eq!(
            ctl.set_from_string("twelve"),
            Err(CtlError::UnparseableValue(String::from("twelve")))
        );
        assert_eq!(ctl.value(), 12.5);
    }

    #[test]
    fn nudges_move_by_step_coarse_and_normalized_amounts() {
        let mut ctl = immediate(CtlConfig {
            min: Some(0.0),
            max: Some(100.0),
            step: Some(1.0),
            value: Some(50.0),
            ..CtlConfig::default()
        });

        ctl.increment(StepAmount::Step).unwrap();
        assert_eq!(ctl.value(), 51.0);

        ctl.increment(StepAmount::Coarse).unwrap();
        assert_eq!(ctl.value(), 61.0);

        ctl.decrement(StepAmount::Scaled).unwrap();
        assert_eq!(ctl.value(), 56.0);
    }

    #[test]
    fn listeners_observe_changes_before_the_deferred_render() {
        let event_loop = Arc::new(ManualLoop::default());
        let mut ctl =
            Ctl::with_event_loop(CtlConfig::default(), event_loop.clone()).unwrap();

        let events = Arc::new(Mutex::new(Vec::<String>::new()));

        let listener_events = events.clone();
        ctl.bind(Arc::new(move |value, _normal| {
            listener_events
                .lock()
                .unwrap()
                .push(format!("listener {value}"));
        }));

        let renderer_events = events.clone();
        ctl.set_renderer(Arc::new(move |frame| {
            renderer_events
                .lock()
                .unwrap()
                .push(format!("render {}", frame.value));
        }));
        event_loop.run();
        events.lock().unwrap().clear();

        ctl.set_value(0.5).unwrap();
        assert_eq!(*events.lock().unwrap(), ["listener 0.5"]);

        event_loop.run();
        assert_eq!(*events.lock().unwrap(), ["listener 0.5", "render 0.5"]);
    }

    #[test]
    fn rapid_changes_coalesce_into_one_render() {
        let event_loop = Arc::new(ManualLoop::default());
        let mut ctl = Ctl::with_event_loop(
            CtlConfig {
                step: Some(0.25),
                ..CtlConfig::default()
            },
            event_loop.clone(),
        )
        .unwrap();

        let frames = Arc::new(Mutex::new(Vec::<DisplayFrame>::new()));
        let rendered = frames.clone();
        ctl.set_renderer(Arc::new(move |frame| {
            rendered.lock().unwrap().push(frame);
        }));
        event_loop.run();
        frames.lock().unwrap().clear();

        ctl.set_value(0.25).unwrap();
        ctl.set_value(0.5).unwrap();
        ctl.set_value(0.75).unwrap();
        assert_eq!(event_loop.pending(), 1);

        event_loop.run();
        {
            let frames = frames.lock().unwrap();
            assert_eq!(frames.len(), 1);
            assert_eq!(frames[0].value, 0.75);
            assert_eq!(frames[0].normal, 0.75);
        }

        // Once the frame ran, the next change schedules a fresh one
        ctl.set_value(0.5).unwrap();
        assert_eq!(event_loop.pending(), 1);
    }

    #[test]
    fn unbound_listeners_stop_firing() {
        let mut ctl = immediate(CtlConfig::default());

        let calls = Arc::new(Mutex::new(0u32));
        let counted = calls.clone();
        let handle = ctl.bind(Arc::new(move |_, _| {
            *counted.lock().unwrap() += 1;
        }));

        ctl.set_value(0.5).unwrap();
        assert_eq!(*calls.lock().unwrap(), 1);

        assert!(ctl.unbind(handle));
        ctl.set_value(0.75).unwrap();
        assert_eq!(*calls.lock().unwrap(), 1);

        // A stale handle is gone for good
        assert!(!ctl.unbind(handle));
    }

    #[test]
    fn formats_at_the_derived_width() {
        let ctl = bipolar_tenths();
        // Two integer columns, one decimal from the step, and a sign column
        assert_eq!(ctl.num_characters(), 5);
        assert_eq!(ctl.format_value(), "  5.0");
        assert_eq!(ctl.to_string(), "  5.0");
    }

    #[test]
    fn host_attributes_layer_under_explicit_options() {
        let ctl = Ctl::from_attributes(
            [("spec", "freq"), ("label", "Cutoff")],
            CtlConfig {
                value: Some(880.0),
                ..CtlConfig::default()
            },
        )
        .unwrap();
        assert_eq!(ctl.min(), 20.0);
        assert_eq!(ctl.max(), 20_000.0);
        assert_eq!(ctl.warp(), Warp::Exponential);
        assert_eq!(ctl.label(), "Cutoff");
        approx::assert_relative_eq!(ctl.value(), 880.0, epsilon = 1e-3);
    }

    #[test]
    fn the_shared_frame_clock_backs_plain_construction() {
        let mut ctl = Ctl::new(CtlConfig::default()).unwrap();
        ctl.set_value(0.7).unwrap();
        approx::assert_relative_eq!(ctl.value(), 0.7, epsilon = 1e-5);
    }
}
