//! Interfaces between the simulation and the outside world
//!
//! The core only ever talks to:
//! - a `ControlSource`, polled once per tick for steering input
//! - a `Collaborator`, told about game over and asked for the equipped cosmetic
//!
//! Reports are fire-and-forget. `QueuedReporter` moves the real collaborator
//! onto a worker thread so a slow backend never stalls a tick.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use serde::{Deserialize, Serialize};

/// Player skin, affects rendering only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cosmetic {
    #[default]
    Default,
    Red,
    Green,
    /// Uses the player's profile picture
    Profile,
}

impl Cosmetic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cosmetic::Default => "default",
            Cosmetic::Red => "red",
            Cosmetic::Green => "green",
            Cosmetic::Profile => "profile",
        }
    }

    /// Parse a stored identifier, unknown ids fall back to the default skin
    pub fn from_id(id: &str) -> Self {
        match id.to_lowercase().as_str() {
            "red" => Cosmetic::Red,
            "green" => Cosmetic::Green,
            "profile" => Cosmetic::Profile,
            _ => Cosmetic::Default,
        }
    }
}

/// Steering sample, already normalized by the input layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlInput {
    pub tilt: f32,
    pub touch: f32,
}

/// Source of per-tick steering input
pub trait ControlSource {
    fn control_input(&mut self) -> ControlInput;
}

/// Constant input (scripted runs, tests)
impl ControlSource for ControlInput {
    fn control_input(&mut self) -> ControlInput {
        *self
    }
}

/// External services the core reports to
pub trait Collaborator {
    /// Hand over the result of a finished run. Must not block.
    fn report_game_over(&mut self, final_score: u64, coins_collected: u32);

    /// Skin to draw the player with
    fn equipped_cosmetic(&self) -> Cosmetic;
}

/// Collaborator that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

impl Collaborator for Offline {
    fn report_game_over(&mut self, final_score: u64, coins_collected: u32) {
        log::debug!(
            "Offline: discarding result score={} coins={}",
            final_score,
            coins_collected
        );
    }

    fn equipped_cosmetic(&self) -> Cosmetic {
        Cosmetic::Default
    }
}

#[derive(Debug, Default)]
struct LatchCells {
    tilt: AtomicU32,
    touch: AtomicU32,
}

/// Latest-value input cell shared between the sampler and the loop
///
/// Writers overwrite, the loop reads whatever is there at the start of a
/// tick. No queue, no backpressure.
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    cells: Arc<LatchCells>,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_tilt(&self, tilt: f32) {
        self.cells.tilt.store(tilt.to_bits(), Ordering::Relaxed);
    }

    pub fn set_touch(&self, touch: f32) {
        self.cells.touch.store(touch.to_bits(), Ordering::Relaxed);
    }

    /// Finger lifted
    pub fn release_touch(&self) {
        self.set_touch(0.0);
    }

    pub fn sample(&self) -> ControlInput {
        ControlInput {
            tilt: f32::from_bits(self.cells.tilt.load(Ordering::Relaxed)),
            touch: f32::from_bits(self.cells.touch.load(Ordering::Relaxed)),
        }
    }
}

impl ControlSource for InputLatch {
    fn control_input(&mut self) -> ControlInput {
        self.sample()
    }
}

/// Messages for the reporter worker
#[derive(Debug, Clone, Copy, PartialEq)]
enum Report {
    GameOver { score: u64, coins: u32 },
}

/// Forwards reports to a collaborator running on its own thread
///
/// Sending never blocks. The cosmetic is read once, when the reporter is
/// built, before the collaborator moves to the worker.
pub struct QueuedReporter<C> {
    tx: Option<Sender<Report>>,
    worker: Option<JoinHandle<C>>,
    cosmetic: Cosmetic,
}

impl<C> QueuedReporter<C>
where
    C: Collaborator + Send + 'static,
{
    pub fn new(inner: C) -> Self {
        let cosmetic = inner.equipped_cosmetic();
        let (tx, rx) = crossbeam_channel::unbounded::<Report>();
        let worker = thread::spawn(move || Self::drain(rx, inner));
        Self {
            tx: Some(tx),
            worker: Some(worker),
            cosmetic,
        }
    }

    /// Worker loop, exits once every sender is gone
    fn drain(rx: Receiver<Report>, mut inner: C) -> C {
        while let Ok(report) = rx.recv() {
            match report {
                Report::GameOver { score, coins } => inner.report_game_over(score, coins),
            }
        }
        inner
    }

    /// Close the queue, wait for pending reports and return the collaborator
    ///
    /// Returns `None` if the collaborator panicked on the worker.
    pub fn finish(mut self) -> Option<C> {
        drop(self.tx.take());
        let worker = self.worker.take()?;
        match worker.join() {
            Ok(inner) => Some(inner),
            Err(_) => {
                log::error!("Reporter worker panicked, pending reports lost");
                None
            }
        }
    }
}

impl<C> Collaborator for QueuedReporter<C> {
    fn report_game_over(&mut self, final_score: u64, coins_collected: u32) {
        let Some(tx) = &self.tx else {
            log::warn!("Reporter closed, dropping game over report");
            return;
        };
        let report = Report::GameOver {
            score: final_score,
            coins: coins_collected,
        };
        if let Err(e) = tx.send(report) {
            log::warn!("Failed to queue game over report: {}", e);
        }
    }

    fn equipped_cosmetic(&self) -> Cosmetic {
        self.cosmetic
    }
}

impl<C> Drop for QueuedReporter<C> {
    fn drop(&mut self) {
        // Closing the channel lets a detached worker finish on its own
        self.tx.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        reports: Vec<(u64, u32)>,
        skin: Cosmetic,
    }

    impl Collaborator for Recorder {
        fn report_game_over(&mut self, final_score: u64, coins_collected: u32) {
            self.reports.push((final_score, coins_collected));
        }

        fn equipped_cosmetic(&self) -> Cosmetic {
            self.skin
        }
    }

    #[test]
    fn test_cosmetic_ids() {
        assert_eq!(Cosmetic::from_id("RED"), Cosmetic::Red);
        assert_eq!(Cosmetic::from_id("profile"), Cosmetic::Profile);
        assert_eq!(Cosmetic::from_id("golden"), Cosmetic::Default);
        assert_eq!(Cosmetic::Green.as_str(), "green");
    }

    #[test]
    fn test_latch_keeps_latest_value() {
        let latch = InputLatch::new();
        let writer = latch.clone();
        assert_eq!(latch.sample(), ControlInput::default());

        writer.set_tilt(0.25);
        writer.set_tilt(-1.5);
        writer.set_touch(12.0);
        assert_eq!(
            latch.sample(),
            ControlInput {
                tilt: -1.5,
                touch: 12.0
            }
        );

        writer.release_touch();
        assert_eq!(latch.sample().touch, 0.0);
    }

    #[test]
    fn test_latch_written_from_another_thread() {
        let mut latch = InputLatch::new();
        let writer = latch.clone();
        thread::spawn(move || writer.set_touch(-3.0)).join().unwrap();
        assert_eq!(latch.control_input().touch, -3.0);
    }

    #[test]
    fn test_queued_reporter_delivers_in_order() {
        let mut reporter = QueuedReporter::new(Recorder {
            skin: Cosmetic::Green,
            ..Default::default()
        });
        assert_eq!(reporter.equipped_cosmetic(), Cosmetic::Green);

        reporter.report_game_over(1200, 3);
        reporter.report_game_over(800, 0);

        let inner = reporter.finish().unwrap();
        assert_eq!(inner.reports, vec![(1200, 3), (800, 0)]);
    }

    #[test]
    fn test_queued_reporter_does_not_wait_for_slow_backend() {
        struct Slow(Arc<Mutex<Vec<u64>>>);
        impl Collaborator for Slow {
            fn report_game_over(&mut self, final_score: u64, _coins: u32) {
                thread::sleep(std::time::Duration::from_millis(50));
                self.0.lock().unwrap().push(final_score);
            }
            fn equipped_cosmetic(&self) -> Cosmetic {
                Cosmetic::Default
            }
        }

        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut reporter = QueuedReporter::new(Slow(seen.clone()));
        let start = std::time::Instant::now();
        for score in 0..5 {
            reporter.report_game_over(score, 0);
        }
        assert!(start.elapsed() < std::time::Duration::from_millis(50));

        reporter.finish().unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }
}
