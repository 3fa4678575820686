//! Typewriter Demo: reveal a simulated model response in the terminal.
//!
//! Tokens arrive in bursts at uneven intervals; the driver smooths them
//! into a steady reveal and reports completion once the text settles.
//!
//! Keys: `p` pause/resume, `s` skip to end, `r` restart, `q`/Esc quit.
//! Set `RUST_LOG=inkflow=debug` to see lifecycle logs on stderr.

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute, queue,
    style::Print,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use inkflow::{Driver, DriverConfig, Push, RevealConfig, RevealEvent, Source, StreamState};
use std::io::{self, Write};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Sample text to stream (simulating a model writing a resume summary).
const SAMPLE_TEXT: &str = "Senior backend engineer with eight years of experience building \
low-latency services in Rust and Go. Led the migration of a payments ledger from a monolith \
to event-sourced services, cutting p99 latency from 480ms to 35ms while tripling throughput. \
Mentored a team of six, introduced property-based testing across the codebase, and owned \
the on-call rotation for a system processing forty thousand requests per second. Comfortable \
across the stack: async runtimes, storage engines, observability pipelines and the occasional \
React dashboard when the situation calls for it.";

struct Screen {
    width: u16,
    height: u16,
}

impl Screen {
    fn draw_text(&self, out: &mut impl Write, text: &str) -> io::Result<()> {
        let width = usize::from(self.width.saturating_sub(4)).max(1);
        let rows = usize::from(self.height.saturating_sub(3));
        let chars: Vec<char> = text.chars().collect();
        for (row, line) in chars.chunks(width).take(rows).enumerate() {
            let line: String = line.iter().collect();
            let y = u16::try_from(row).unwrap_or(u16::MAX).saturating_add(2);
            queue!(out, cursor::MoveTo(2, y), Clear(ClearType::CurrentLine), Print(line))?;
        }
        Ok(())
    }

    fn draw_status(&self, out: &mut impl Write, status: &str) -> io::Result<()> {
        queue!(
            out,
            cursor::MoveTo(2, self.height.saturating_sub(1)),
            Clear(ClearType::CurrentLine),
            Print(status)
        )
    }
}

fn draw_header(out: &mut impl Write) -> io::Result<()> {
    queue!(
        out,
        Clear(ClearType::All),
        cursor::MoveTo(2, 0),
        Print("Inkflow Typewriter Demo")
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let (width, height) = terminal::size()?;
    let screen = Screen { width, height };

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

    let result = run(&screen, &mut stdout);

    execute!(stdout, cursor::Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn run(screen: &Screen, stdout: &mut io::Stdout) -> Result<(), Box<dyn std::error::Error>> {
    let reveal = RevealConfig::smoothed().with_speed(40.0);
    let driver = Driver::spawn(DriverConfig::default(), reveal)?;

    let text_chars: Vec<char> = SAMPLE_TEXT.chars().collect();
    let mut char_index = 0;
    let mut last_burst = Instant::now();
    let mut paused = false;
    let mut state = StreamState::Idle;

    draw_header(stdout)?;
    driver.start(Source::Snapshot);

    loop {
        // Input
        while event::poll(Duration::ZERO)? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(());
                }
                KeyCode::Char('p') => {
                    paused = !paused;
                    if paused {
                        driver.pause();
                    } else {
                        driver.resume();
                    }
                }
                KeyCode::Char('s') => {
                    driver.skip_to_end();
                }
                KeyCode::Char('r') => {
                    draw_header(stdout)?;
                    driver.start(Source::Snapshot);
                    char_index = 0;
                    paused = false;
                }
                _ => {}
            }
        }

        // Bursty producer: 5-40 chars every 60-180ms.
        let gap = Duration::from_millis(60 + (u64::try_from(char_index).unwrap_or(0) * 13) % 120);
        if char_index < text_chars.len() && last_burst.elapsed() >= gap {
            let burst = 5 + (char_index * 7) % 36;
            let end = (char_index + burst).min(text_chars.len());
            let chunk: String = text_chars[char_index..end].iter().collect();
            driver.push(Push::Delta(chunk));
            char_index = end;
            last_burst = Instant::now();
        }

        // Output
        while let Ok(event) = driver.events().try_recv() {
            match event {
                RevealEvent::Text {
                    visible,
                    cursor,
                    target_len,
                } => {
                    screen.draw_text(stdout, &visible)?;
                    let status = format!(
                        "{state:?} | {cursor}/{target_len} chars | p pause  s skip  r restart  q quit"
                    );
                    screen.draw_status(stdout, &status)?;
                }
                RevealEvent::State(next) => state = next,
                RevealEvent::Completed => {
                    screen.draw_status(stdout, "Done! Press 'r' to restart or 'q' to quit.")?;
                }
                RevealEvent::Error(message) => {
                    screen.draw_status(stdout, &format!("error: {message}"))?;
                }
                RevealEvent::Segments(_) => {}
            }
        }
        stdout.flush()?;

        std::thread::sleep(Duration::from_millis(8));
    }
}
