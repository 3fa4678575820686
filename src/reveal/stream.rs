//! Lifecycle Controller: the typewriter stream itself.
//!
//! A [`TypewriterStream`] owns the target text, the display cursor, the
//! frame-loop and settle-timer handles, and the cancellation token of any
//! chunk consumption. Every input funnels through one path: classify the
//! new target against the old one, regress the cursor on divergence, then
//! let the pacing strategy catch up. Catching up arms the completion
//! detector.
//!
//! # Invariants
//!
//! - `cursor <= target_len` at all times.
//! - At most one frame request and one settle timer are live.
//! - At most one feeder can affect the stream: `start()` and `reset()`
//!   cancel the previous one and bump the generation, so anything still
//!   in flight from it is discarded.
//! - Completion fires at most once between `start()`/`reset()` calls.

use super::completion::CompletionDetector;
use super::config::{PacingMode, RevealConfig};
use super::events::StreamEvents;
use super::pacing::{self, Advance, FrameClockState, Metrics};
use super::state::StreamState;
use crate::clock::{FrameId, ManualScheduler, Scheduler, TimerId};
use crate::error::StreamError;
use crate::source::{Envelope, FeederActor, Push, PushHandle, Source, SourceEvent};
use crate::text::diff::{char_prefix, classify, ChangeKind};
use crate::text::segment::{segment_with_fallback, Segment, UnicodeWordSegmenter, WordSegmenter};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::time::Instant;
use tracing::{debug, trace, warn};

type CompleteCallback = Box<dyn FnMut() + Send>;
type ErrorCallback = Box<dyn FnMut(&StreamError) + Send>;

/// A cancellable, self-correcting typewriter reveal of streamed text.
///
/// The stream is driven entirely by its owner: input through
/// [`update`](Self::update), [`push`](Self::push) or [`pump`](Self::pump),
/// and time through [`on_frame`](Self::on_frame) and
/// [`on_timer`](Self::on_timer) with the ids its [`Scheduler`] issued.
///
/// # Example
///
/// ```
/// use inkflow::{RevealConfig, TypewriterStream};
///
/// let mut stream = TypewriterStream::manual(RevealConfig::default());
/// stream.update("Hello");
/// stream.update("Hello, world!");
/// assert_eq!(stream.visible_text(), "Hello, world!");
/// ```
pub struct TypewriterStream<S: Scheduler = ManualScheduler> {
    /// Configuration.
    config: RevealConfig,
    /// Injected frame clock and delay timer.
    scheduler: S,
    /// Word segmentation for fade mode.
    segmenter: Box<dyn WordSegmenter>,
    /// Lifecycle state.
    state: StreamState,
    /// Text that should eventually be shown.
    target: String,
    /// Length of `target` in chars.
    target_len: usize,
    /// Chars of `target` currently shown.
    cursor: usize,
    /// Frame-clock bookkeeping of the current smoothing run.
    clock: FrameClockState,
    /// Pending frame request of the active loop.
    frame: Option<FrameId>,
    /// Settle-timer state.
    completion: CompletionDetector,
    /// Observability counters.
    metrics: Metrics,
    /// Segments of the visible text (fade mode only).
    segments: Vec<Segment>,
    /// Whether the producer signaled the end of input.
    source_ended: bool,
    /// Lifecycle generation stamped on pushes.
    generation: u64,
    /// Push channel.
    feed_tx: Sender<Envelope>,
    feed_rx: Receiver<Envelope>,
    /// Active chunk consumer.
    feeder: Option<FeederActor>,
    /// Changes since the last `take_events`.
    events: StreamEvents,
    on_complete: Option<CompleteCallback>,
    on_error: Option<ErrorCallback>,
}

impl TypewriterStream<ManualScheduler> {
    /// Create a stream on a [`ManualScheduler`].
    pub fn manual(config: RevealConfig) -> Self {
        Self::new(config, ManualScheduler::new())
    }
}

impl<S: Scheduler> TypewriterStream<S> {
    /// Create a stream using `scheduler` for frames and timers.
    pub fn new(config: RevealConfig, scheduler: S) -> Self {
        let (feed_tx, feed_rx) = unbounded();
        Self {
            config,
            scheduler,
            segmenter: Box::new(UnicodeWordSegmenter),
            state: StreamState::Idle,
            target: String::new(),
            target_len: 0,
            cursor: 0,
            clock: FrameClockState::new(),
            frame: None,
            completion: CompletionDetector::new(),
            metrics: Metrics::default(),
            segments: Vec::new(),
            source_ended: false,
            generation: 0,
            feed_tx,
            feed_rx,
            feeder: None,
            events: StreamEvents::empty(),
            on_complete: None,
            on_error: None,
        }
    }

    /// Replace the word segmenter used in fade mode.
    #[must_use]
    pub fn with_segmenter(mut self, segmenter: impl WordSegmenter + 'static) -> Self {
        self.segmenter = Box::new(segmenter);
        self
    }

    /// Install the completion callback.
    pub fn set_on_complete(&mut self, callback: impl FnMut() + Send + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    /// Install the error callback.
    pub fn set_on_error(&mut self, callback: impl FnMut(&StreamError) + Send + 'static) {
        self.on_error = Some(Box::new(callback));
    }

    // --------------------------------------------------------
    // Accessors
    // --------------------------------------------------------

    /// The configuration.
    pub const fn config(&self) -> &RevealConfig {
        &self.config
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> StreamState {
        self.state
    }

    /// The currently revealed text.
    pub fn visible_text(&self) -> &str {
        char_prefix(&self.target, self.cursor)
    }

    /// The full target text.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Display cursor, in chars.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Target length, in chars.
    pub const fn target_len(&self) -> usize {
        self.target_len
    }

    /// Chars still to be revealed.
    pub const fn backlog(&self) -> usize {
        self.target_len - self.cursor
    }

    /// Whether completion has been signaled in this lifecycle.
    pub const fn is_complete(&self) -> bool {
        self.completion.has_fired()
    }

    /// Whether a frame loop is active.
    pub const fn is_smoothing(&self) -> bool {
        self.frame.is_some()
    }

    /// Whether a settle timer is pending.
    pub const fn is_settling(&self) -> bool {
        self.completion.is_armed()
    }

    /// Whether the producer signaled the end of input.
    pub const fn source_ended(&self) -> bool {
        self.source_ended
    }

    /// Whether a chunk source is still being consumed.
    pub fn is_consuming(&self) -> bool {
        self.feeder.as_ref().is_some_and(|feeder| !feeder.is_finished())
    }

    /// Segments of the visible text; empty unless fade mode is configured.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Observability counters.
    pub const fn metrics(&self) -> Metrics {
        self.metrics
    }

    /// Current lifecycle generation.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// The injected scheduler.
    pub const fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// The injected scheduler, mutably.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Drain the changes accumulated since the last call.
    pub fn take_events(&mut self) -> StreamEvents {
        std::mem::take(&mut self.events)
    }

    /// A producer handle bound to the current lifecycle.
    ///
    /// Pushes queue until the owner calls [`pump`](Self::pump).
    pub fn push_handle(&self) -> PushHandle {
        PushHandle::new(self.feed_tx.clone(), self.generation)
    }

    pub(crate) fn feed_receiver(&self) -> Receiver<Envelope> {
        self.feed_rx.clone()
    }

    // --------------------------------------------------------
    // Control
    // --------------------------------------------------------

    /// Begin a new lifecycle consuming `source`.
    ///
    /// Any previous consumption is cancelled and all state is
    /// reinitialized first.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Spawn`] if a chunk feeder cannot be started;
    /// the stream is then left Idle.
    pub fn start(&mut self, source: Source) -> Result<(), StreamError> {
        self.teardown();
        self.clear();
        self.generation += 1;

        let chunked = source.is_chunks();
        if let Source::Chunks(chunks) = source {
            match FeederActor::spawn(chunks, self.feed_tx.clone(), self.generation) {
                Ok(feeder) => self.feeder = Some(feeder),
                Err(err) => {
                    self.set_state(StreamState::Idle);
                    return Err(err);
                }
            }
        }

        debug!(generation = self.generation, chunked, "stream started");
        self.set_state(StreamState::Streaming);
        Ok(())
    }

    /// Halt the frame loop and the settle timer.
    ///
    /// Input is still accepted while paused. Under burst smoothing nothing
    /// more is revealed until [`resume`](Self::resume); under realtime
    /// pacing updates still snap and only completion is held back.
    pub fn pause(&mut self) {
        if self.state != StreamState::Streaming {
            trace!(state = ?self.state, "pause ignored");
            return;
        }
        self.stop_loop();
        self.completion.disarm(&mut self.scheduler);
        self.set_state(StreamState::Paused);
    }

    /// Restart revealing after [`pause`](Self::pause). No-op otherwise.
    pub fn resume(&mut self) {
        if self.state != StreamState::Paused {
            trace!(state = ?self.state, "resume ignored");
            return;
        }
        self.set_state(StreamState::Streaming);
        self.catch_up();
    }

    /// Clear everything and return to Idle.
    pub fn reset(&mut self) {
        self.teardown();
        self.clear();
        self.generation += 1;
        self.set_state(StreamState::Idle);
        debug!(generation = self.generation, "stream reset");
    }

    /// Reveal the whole target now.
    pub fn skip_to_end(&mut self) {
        if !self.state.is_revealing() {
            return;
        }
        self.stop_loop();
        if self.cursor < self.target_len {
            self.cursor = self.target_len;
            self.text_changed();
        }
        self.arm_completion();
    }

    // --------------------------------------------------------
    // Input
    // --------------------------------------------------------

    /// Accept a snapshot of the full target text.
    pub fn update(&mut self, text: &str) {
        if text == self.target {
            self.accept_target(None);
        } else {
            self.accept_target(Some(text.to_owned()));
        }
    }

    /// Apply one tagged push.
    pub fn push(&mut self, push: Push) {
        match push {
            Push::Replace(text) => self.accept_target(Some(text)),
            Push::Delta(delta) if delta.is_empty() => self.accept_target(None),
            Push::Delta(delta) => {
                let mut next = String::with_capacity(self.target.len() + delta.len());
                next.push_str(&self.target);
                next.push_str(&delta);
                self.accept_target(Some(next));
            }
        }
    }

    /// Apply every push queued by handles and feeders, in arrival order.
    ///
    /// The push channel is unbounded: an owner consuming a chunk source or
    /// handing out [`PushHandle`]s must call this regularly (once per
    /// frame is typical), or the queue grows with the producer.
    ///
    /// Returns the number of envelopes processed, stale ones included.
    pub fn pump(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(envelope) = self.feed_rx.try_recv() {
            self.apply_envelope(envelope);
            processed += 1;
        }
        processed
    }

    pub(crate) fn apply_envelope(&mut self, envelope: Envelope) {
        if envelope.generation != self.generation {
            trace!(
                stale = envelope.generation,
                current = self.generation,
                "dropping push from a previous lifecycle"
            );
            return;
        }

        match envelope.event {
            SourceEvent::Push(push) => self.push(push),
            SourceEvent::End => {
                self.end_of_input();
            }
            SourceEvent::Failed(err) => {
                self.report_error(StreamError::SourceFailure(err));
                self.end_of_input();
            }
        }
    }

    // --------------------------------------------------------
    // Host callbacks
    // --------------------------------------------------------

    /// Advance the frame loop. Ids other than the pending request are ignored.
    pub fn on_frame(&mut self, id: FrameId, now: Instant) {
        if self.frame != Some(id) {
            trace!(frame = id.get(), "ignoring stale frame");
            return;
        }
        self.frame = None;

        if !self.state.is_revealing() {
            return;
        }
        if self.cursor >= self.target_len {
            self.arm_completion();
            return;
        }

        let rate = pacing::reveal_rate(&self.config);
        let step = self.clock.step(now, rate, self.config.frame_cap());
        let next = self.cursor.saturating_add(step).min(self.target_len);
        self.metrics.smoothed_chars += (next - self.cursor) as u64;
        self.cursor = next;
        trace!(step, cursor = self.cursor, target = self.target_len, "frame");
        self.text_changed();

        if self.cursor >= self.target_len {
            debug!(chars = self.target_len, "smoothing caught up");
            self.arm_completion();
        } else {
            self.frame = Some(self.scheduler.request_frame());
        }
    }

    /// Handle a fired delay timer. Ids other than the pending settle timer
    /// are ignored.
    pub fn on_timer(&mut self, id: TimerId) {
        if !self.completion.on_timer(id) {
            trace!(timer = id.get(), "ignoring stale timer");
            return;
        }
        debug!(chars = self.target_len, "stream complete");
        self.set_state(StreamState::Completed);
        self.events |= StreamEvents::COMPLETED;
        if let Some(callback) = self.on_complete.as_mut() {
            callback();
        }
    }

    // --------------------------------------------------------
    // Internals
    // --------------------------------------------------------

    /// Move to `next`; `None` means the target is unchanged.
    fn accept_target(&mut self, next: Option<String>) {
        if self.state == StreamState::Idle {
            self.set_state(StreamState::Streaming);
        }

        let Some(next) = next else {
            // Identical: never postpone a pending settle timer.
            if self.cursor == self.target_len && !self.completion.is_armed() {
                self.arm_completion();
            }
            return;
        };

        let change = classify(&self.target, &next);
        let mut regressed = false;
        match change.kind {
            ChangeKind::Identical => {
                if self.cursor == self.target_len && !self.completion.is_armed() {
                    self.arm_completion();
                }
                return;
            }
            ChangeKind::Append => {}
            ChangeKind::Divergent => {
                if self.cursor > change.common_prefix {
                    debug!(
                        from = self.cursor,
                        to = change.common_prefix,
                        "divergent update, regressing cursor"
                    );
                    self.cursor = change.common_prefix;
                    regressed = true;
                }
            }
        }

        self.target_len = next.chars().count();
        self.target = next;
        self.completion.disarm(&mut self.scheduler);
        if regressed {
            self.text_changed();
        }

        // Realtime pacing keeps snapping while paused; only the settle
        // timer waits for resume.
        if self.state.is_revealing() || self.config.mode == PacingMode::Realtime {
            self.catch_up();
        }
    }

    fn end_of_input(&mut self) {
        if self.state == StreamState::Idle {
            self.set_state(StreamState::Streaming);
        }
        self.source_ended = true;
        self.feeder = None;
        self.arm_completion();
    }

    /// Reveal toward the target using the configured pacing.
    fn catch_up(&mut self) {
        let backlog = self.target_len - self.cursor;
        if backlog == 0 {
            self.stop_loop();
            self.arm_completion();
            return;
        }

        match pacing::plan(&self.config, backlog, self.frame.is_some()) {
            Advance::Snap => {
                self.cursor = self.target_len;
                self.metrics.instant_updates += 1;
                trace!(backlog, "applied instantly");
                self.text_changed();
                self.arm_completion();
            }
            Advance::Smooth => self.start_loop(backlog),
        }
    }

    fn start_loop(&mut self, backlog: usize) {
        if self.frame.is_some() {
            return;
        }
        self.clock.begin_run();
        self.metrics.smoothing_activations += 1;
        self.frame = Some(self.scheduler.request_frame());
        debug!(backlog, "smoothing started");
    }

    fn stop_loop(&mut self) {
        if let Some(id) = self.frame.take() {
            self.scheduler.cancel_frame(id);
        }
    }

    fn arm_completion(&mut self) {
        if self.state != StreamState::Streaming || self.cursor < self.target_len {
            return;
        }
        if self.target_len == 0 && !self.source_ended {
            return;
        }
        let delay = self.config.settle_delay();
        if self.completion.arm(&mut self.scheduler, delay) {
            trace!(?delay, "settle timer armed");
        }
    }

    fn text_changed(&mut self) {
        self.events |= StreamEvents::TEXT_CHANGED;

        let Some(fade) = self.config.fade.as_ref() else {
            return;
        };
        let result = segment_with_fallback(
            self.segmenter.as_ref(),
            char_prefix(&self.target, self.cursor),
            fade.locale.as_deref(),
        );
        self.segments = result.segments;
        self.events |= StreamEvents::SEGMENTS_CHANGED;
        if let Some(err) = result.fallback {
            self.report_error(err.into());
        }
    }

    fn report_error(&mut self, err: StreamError) {
        self.events |= StreamEvents::ERROR;
        if err.is_caller_visible() {
            warn!(error = %err, "stream error");
        } else {
            debug!(error = %err, "recovered stream error");
        }
        if let Some(callback) = self.on_error.as_mut() {
            callback(&err);
        }
    }

    fn set_state(&mut self, next: StreamState) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, "state transition");
            self.state = next;
            self.events |= StreamEvents::STATE_CHANGED;
        }
    }

    /// Cancel the feeder, the frame loop and the settle timer.
    fn teardown(&mut self) {
        if let Some(feeder) = self.feeder.take() {
            feeder.cancel();
            debug!(generation = self.generation, "cancelled chunk consumption");
        }
        self.stop_loop();
        self.completion.disarm(&mut self.scheduler);
    }

    fn clear(&mut self) {
        if self.cursor > 0 {
            self.events |= StreamEvents::TEXT_CHANGED;
        }
        if !self.segments.is_empty() {
            self.segments.clear();
            self.events |= StreamEvents::SEGMENTS_CHANGED;
        }
        self.target.clear();
        self.target_len = 0;
        self.cursor = 0;
        self.clock = FrameClockState::new();
        self.metrics = Metrics::default();
        self.completion.reset(&mut self.scheduler);
        self.source_ended = false;
        while self.feed_rx.try_recv().is_ok() {}
    }
}

impl<S: Scheduler> Drop for TypewriterStream<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
