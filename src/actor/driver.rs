//! Driver: runs a typewriter stream on its own thread.
//!
//! The driver owns a [`TypewriterStream`] on a [`ThreadScheduler`] and
//! multiplexes four inputs with `select!`: control messages from the host,
//! pushes from handles and feeders, ticker frames, and the nearest settle
//! deadline. After each input it drains the stream's change flags and
//! publishes them as [`RevealEvent`]s.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   Control    ┌──────────────┐  RevealEvent  ┌──────┐
//! │     Host     │ ───────────▶ │ Driver Thread│ ────────────▶ │ Host │
//! └──────────────┘              │              │               └──────┘
//! ┌──────────────┐     Tick     │   Typewriter │
//! │Ticker Thread │ ───────────▶ │    Stream    │
//! └──────────────┘              │              │
//! ┌──────────────┐   Envelope   │              │
//! │Feeder Thread │ ───────────▶ │              │
//! └──────────────┘              └──────────────┘
//! ```

use super::messages::{Control, RevealEvent};
use super::scheduler::ThreadScheduler;
use super::ticker::TickerActor;
use crate::error::StreamError;
use crate::reveal::{RevealConfig, StreamEvents, TypewriterStream};
use crate::source::{Push, Source};
use crossbeam_channel::{at, bounded, never, select, unbounded, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

type DriverStream = TypewriterStream<ThreadScheduler>;

/// Configuration for the [`Driver`].
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Target frames per second of the smoothing loop.
    pub target_fps: u32,
    /// Capacity of the control channel.
    pub control_capacity: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            control_capacity: 64,
        }
    }
}

impl DriverConfig {
    /// Set the frame rate.
    #[must_use]
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    /// Frame interval, treating 0 FPS as 1.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.target_fps.max(1)
    }
}

/// A typewriter stream running on a dedicated thread.
pub struct Driver {
    /// Control sender.
    control_tx: Sender<Control>,
    /// Published events.
    events_rx: Receiver<RevealEvent>,
    /// Handle to the driver thread.
    handle: Option<JoinHandle<()>>,
}

impl Driver {
    /// Spawn the ticker and the driver thread.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Spawn`] if either thread cannot be started.
    pub fn spawn(config: DriverConfig, reveal: RevealConfig) -> Result<Self, StreamError> {
        let ticker = TickerActor::spawn(config.frame_interval())?;
        let (control_tx, control_rx) = bounded::<Control>(config.control_capacity.max(1));
        let (events_tx, events_rx) = unbounded::<RevealEvent>();

        let handle = thread::Builder::new()
            .name("inkflow-driver".to_string())
            .spawn(move || {
                let stream = TypewriterStream::new(reveal, ThreadScheduler::new());
                run_loop(stream, ticker, &control_rx, &events_tx);
            })
            .map_err(|source| StreamError::Spawn {
                name: "inkflow-driver",
                source,
            })?;

        tracing::debug!(fps = config.target_fps, "driver started");
        Ok(Self {
            control_tx,
            events_rx,
            handle: Some(handle),
        })
    }

    /// Send a control message. Returns `false` if the driver has stopped.
    pub fn send(&self, control: Control) -> bool {
        self.control_tx.send(control).is_ok()
    }

    /// Begin a new lifecycle.
    pub fn start(&self, source: Source) -> bool {
        self.send(Control::Start(source))
    }

    /// Send a snapshot of the full target.
    pub fn update(&self, text: impl Into<String>) -> bool {
        self.send(Control::Update(text.into()))
    }

    /// Send a tagged push.
    pub fn push(&self, push: Push) -> bool {
        self.send(Control::Push(push))
    }

    /// Pause revealing.
    pub fn pause(&self) -> bool {
        self.send(Control::Pause)
    }

    /// Resume revealing.
    pub fn resume(&self) -> bool {
        self.send(Control::Resume)
    }

    /// Reveal the whole target now.
    pub fn skip_to_end(&self) -> bool {
        self.send(Control::SkipToEnd)
    }

    /// Reset the stream.
    pub fn reset(&self) -> bool {
        self.send(Control::Reset)
    }

    /// The event receiver.
    #[inline]
    pub const fn events(&self) -> &Receiver<RevealEvent> {
        &self.events_rx
    }

    /// Signal the driver to stop.
    pub fn shutdown(&self) {
        let _ = self.control_tx.send(Control::Shutdown);
    }

    /// Stop the driver and wait for its thread.
    pub fn join(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_loop(
    mut stream: DriverStream,
    ticker: TickerActor,
    control_rx: &Receiver<Control>,
    events_tx: &Sender<RevealEvent>,
) {
    let errors_tx = events_tx.clone();
    stream.set_on_error(move |err| {
        let _ = errors_tx.send(RevealEvent::Error(err.to_string()));
    });
    let feed_rx = stream.feed_receiver();

    loop {
        let settle = stream.scheduler().next_deadline().map_or_else(never, at);

        select! {
            recv(control_rx) -> msg => match msg {
                Ok(Control::Shutdown) | Err(_) => break,
                Ok(control) => apply(&mut stream, control, events_tx),
            },
            recv(feed_rx) -> envelope => {
                if let Ok(envelope) = envelope {
                    stream.apply_envelope(envelope);
                }
            },
            recv(ticker.receiver()) -> tick => {
                if let (Ok(tick), Some(id)) = (tick, stream.scheduler_mut().take_frame()) {
                    stream.on_frame(id, tick.at);
                }
            },
            recv(settle) -> _ => {
                for id in stream.scheduler_mut().take_due(Instant::now()) {
                    stream.on_timer(id);
                }
            },
        }

        publish(&mut stream, events_tx);
    }

    ticker.join();
    tracing::debug!("driver stopped");
}

fn apply(stream: &mut DriverStream, control: Control, events_tx: &Sender<RevealEvent>) {
    match control {
        Control::Start(source) => {
            if let Err(err) = stream.start(source) {
                let _ = events_tx.send(RevealEvent::Error(err.to_string()));
            }
        }
        Control::Update(text) => stream.update(&text),
        Control::Push(push) => stream.push(push),
        Control::Pause => stream.pause(),
        Control::Resume => stream.resume(),
        Control::SkipToEnd => stream.skip_to_end(),
        Control::Reset => stream.reset(),
        Control::Shutdown => {}
    }
}

fn publish(stream: &mut DriverStream, events_tx: &Sender<RevealEvent>) {
    let events = stream.take_events();
    if events.is_empty() {
        return;
    }

    if events.contains(StreamEvents::STATE_CHANGED) {
        let _ = events_tx.send(RevealEvent::State(stream.state()));
    }
    if events.contains(StreamEvents::TEXT_CHANGED) {
        let _ = events_tx.send(RevealEvent::Text {
            visible: stream.visible_text().to_owned(),
            cursor: stream.cursor(),
            target_len: stream.target_len(),
        });
    }
    if events.contains(StreamEvents::SEGMENTS_CHANGED) {
        let _ = events_tx.send(RevealEvent::Segments(stream.segments().to_vec()));
    }
    if events.contains(StreamEvents::COMPLETED) {
        let _ = events_tx.send(RevealEvent::Completed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::reveal::{FadeConfig, StreamState};
    use futures::stream;

    fn collect_until_completed(driver: &Driver) -> Vec<RevealEvent> {
        let mut events = Vec::new();
        while let Ok(event) = driver.events().recv_timeout(Duration::from_secs(3)) {
            let done = event.is_completed();
            events.push(event);
            if done {
                return events;
            }
        }
        panic!("driver never completed: {events:?}");
    }

    fn texts(events: &[RevealEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|event| match event {
                RevealEvent::Text { visible, .. } => Some(visible.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_driver_realtime_completion() {
        let driver = Driver::spawn(DriverConfig::default(), RevealConfig::default()).unwrap();
        assert!(driver.update("Hello"));
        assert!(driver.update("Hello, world!"));

        let events = collect_until_completed(&driver);
        assert_eq!(texts(&events).last().map(String::as_str), Some("Hello, world!"));
        assert!(events.contains(&RevealEvent::State(StreamState::Streaming)));
        assert!(events.contains(&RevealEvent::State(StreamState::Completed)));
        driver.join();
    }

    #[test]
    fn test_driver_smooths_burst() {
        let reveal = RevealConfig::smoothed().with_speed(100.0);
        let driver = Driver::spawn(DriverConfig::default().with_target_fps(120), reveal).unwrap();
        let text = "r".repeat(120);
        driver.update(text.clone());

        let events = collect_until_completed(&driver);
        let shown = texts(&events);
        assert!(shown.len() > 1);
        assert!(shown.windows(2).all(|pair| pair[0].len() <= pair[1].len()));
        assert_eq!(shown.last(), Some(&text));
    }

    #[test]
    fn test_driver_chunk_source() {
        let driver = Driver::spawn(DriverConfig::default(), RevealConfig::default()).unwrap();
        let chunks = stream::iter(vec![Ok::<_, BoxError>("Rust "), Ok("engineer")]);
        driver.start(Source::chunks(chunks));

        let events = collect_until_completed(&driver);
        assert_eq!(texts(&events).last().map(String::as_str), Some("Rust engineer"));
    }

    #[test]
    fn test_driver_forwards_source_errors() {
        let driver = Driver::spawn(DriverConfig::default(), RevealConfig::default()).unwrap();
        let chunks = stream::iter(vec![
            Ok::<_, BoxError>("half".to_string()),
            Err("reset by peer".into()),
        ]);
        driver.start(Source::chunks(chunks));

        let events = collect_until_completed(&driver);
        let reported = events.iter().any(|event| {
            matches!(event, RevealEvent::Error(msg) if msg.contains("reset by peer"))
        });
        assert!(reported);
    }

    #[test]
    fn test_driver_pause_holds_completion() {
        let driver = Driver::spawn(DriverConfig::default(), RevealConfig::default()).unwrap();
        driver.update("Held");
        driver.pause();

        let deadline = Instant::now() + Duration::from_millis(400);
        while let Ok(event) = driver.events().recv_deadline(deadline) {
            assert!(!event.is_completed());
        }

        driver.resume();
        collect_until_completed(&driver);
    }

    #[test]
    fn test_driver_segments() {
        let reveal = RevealConfig::default().with_fade(FadeConfig::default());
        let driver = Driver::spawn(DriverConfig::default(), reveal).unwrap();
        driver.push(Push::Delta("two words".to_string()));

        let events = collect_until_completed(&driver);
        let segments = events.iter().find_map(|event| match event {
            RevealEvent::Segments(segments) => Some(segments.clone()),
            _ => None,
        });
        assert_eq!(segments.map(|s| s.len()), Some(3));
    }

    #[test]
    fn test_driver_drop_joins() {
        let driver = Driver::spawn(DriverConfig::default(), RevealConfig::default()).unwrap();
        driver.update("bye");
        drop(driver);
    }

    #[test]
    fn test_frame_interval() {
        let config = DriverConfig::default().with_target_fps(0);
        assert_eq!(config.frame_interval(), Duration::from_secs(1));
    }
}
