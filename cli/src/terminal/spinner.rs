use std::io::{self, Write};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use colored::*;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use cdnstrip_core::aggregator::Counters;

use crate::terminal::colors;

const POLL_INTERVAL: Duration = Duration::from_millis(250);
const PROGRESS_INTERVAL_MS: u64 = 100;

pub struct SpinnerHandle {
    pub spinner: ProgressBar,
    tx: Sender<String>,
    started: Instant,
    last_progress_ms: AtomicU64,
}

impl SpinnerHandle {
    pub fn send_to_queue(&self, message: String) {
        let _ = self.tx.send(message);
    }

    pub fn finish_and_clear(&self) {
        self.spinner.finish_and_clear();
    }

    /// Lets at most one progress update through per interval.
    fn progress_due(&self) -> bool {
        let now = self.started.elapsed().as_millis() as u64;
        let last = self.last_progress_ms.load(Ordering::Relaxed);
        now.saturating_sub(last) >= PROGRESS_INTERVAL_MS
            && self
                .last_progress_ms
                .compare_exchange(last, now, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
    }
}

pub(crate) static SPINNER: OnceLock<SpinnerHandle> = OnceLock::new();

/// Creates the spinner. A hidden spinner still passes log lines through.
pub fn init(visible: bool) {
    SPINNER.get_or_init(|| init_spinner(visible));
}

pub fn get_spinner() -> &'static SpinnerHandle {
    SPINNER.get_or_init(|| init_spinner(true))
}

fn init_spinner(visible: bool) -> SpinnerHandle {
    let pb = if visible {
        ProgressBar::new_spinner()
    } else {
        ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden())
    };

    let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ]);

    pb.set_style(style);
    if visible {
        pb.enable_steady_tick(Duration::from_millis(100));
    }

    let (tx, rx) = mpsc::channel::<String>();
    let pb_clone = pb.clone();

    thread::spawn(move || {
        loop {
            if pb_clone.is_finished() {
                break;
            }

            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(mut msg) => {
                    while let Ok(newer_msg) = rx.try_recv() {
                        msg = newer_msg;
                    }
                    pb_clone.set_message(msg);
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    });

    SpinnerHandle {
        spinner: pb,
        tx,
        started: Instant::now(),
        last_progress_ms: AtomicU64::new(0),
    }
}

pub fn set_status(message: String) {
    get_spinner().send_to_queue(message);
}

/// Called from the classifier workers after every verdict.
pub fn report_progress(counters: Counters) {
    let handle = get_spinner();
    if handle.progress_due() {
        handle.send_to_queue(progress_line(counters));
    }
}

pub fn progress_line(counters: Counters) -> String {
    let sep = "|".color(colors::SEPARATOR);
    format!(
        "{} VALID: {} {sep} INVALID: {} {sep} CDN: {} {}",
        "[".color(colors::SEPARATOR),
        counters.valid.to_string().color(colors::PRIMARY).bold(),
        counters.invalid.to_string().color(colors::INVALID).bold(),
        counters.matched.to_string().color(colors::MATCHED).bold(),
        "]".color(colors::SEPARATOR),
    )
}

pub fn finish() {
    get_spinner().finish_and_clear();
}

/// Log sink that keeps stderr lines from tearing through the spinner.
pub struct SpinnerWriter;

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        get_spinner()
            .spinner
            .suspend(|| io::stderr().write_all(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
