//! A single play session
//!
//! Owns the game state for one run and drives it tick by tick. Input is
//! sampled once at the top of each tick, the stop flag is checked before
//! anything else, and the game-over report goes out exactly once.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::collaborator::{Collaborator, ControlInput, ControlSource, Cosmetic};
use crate::consts::*;
use crate::settings::{Settings, SettingsError};
use crate::sim::{GameState, TickInput, tick};

/// Cooperative stop flag, cheap to clone and share with other threads
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Why a session stopped ticking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEnd {
    GameOver,
    Stopped,
    TickLimit,
}

/// Summary of a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub score: u64,
    pub coins: u32,
    pub level: u8,
    pub ticks: u64,
    pub end: SessionEnd,
}

/// Game instance holding all state for one run
pub struct Session<I, C> {
    state: GameState,
    input: I,
    collaborator: C,
    cosmetic: Cosmetic,
    stop: StopHandle,
    reported: bool,
    accumulator: f32,
}

impl<I, C> Session<I, C>
where
    I: ControlSource,
    C: Collaborator,
{
    /// Start a fresh run
    pub fn new(
        seed: u64,
        settings: &Settings,
        input: I,
        collaborator: C,
    ) -> Result<Self, SettingsError> {
        let state = GameState::new(seed, settings)?;
        let cosmetic = collaborator.equipped_cosmetic();
        log::info!("Session started with seed {} and skin '{}'", seed, cosmetic.as_str());
        Ok(Self {
            state,
            input,
            collaborator,
            cosmetic,
            stop: StopHandle::default(),
            reported: false,
            accumulator: 0.0,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Skin read at session start
    pub fn cosmetic(&self) -> Cosmetic {
        self.cosmetic
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.stop.is_stopped() || self.state.is_over()
    }

    /// Run one tick. Returns false if the session is stopped or over.
    pub fn step(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }

        let ControlInput { tilt, touch } = self.input.control_input();
        tick(&mut self.state, &TickInput { tilt, touch }, TICK_DT);

        if self.state.is_over() && !self.reported {
            self.reported = true;
            self.collaborator
                .report_game_over(self.state.final_score(), self.state.coins);
        }
        true
    }

    /// Tick until game over, stop, or `max_ticks` ticks have run
    pub fn run(&mut self, max_ticks: Option<u64>) -> SessionOutcome {
        let mut ticks = 0u64;
        loop {
            if max_ticks.is_some_and(|max| ticks >= max) {
                return self.outcome(SessionEnd::TickLimit);
            }
            if !self.step() {
                break;
            }
            ticks += 1;
        }
        let end = if self.state.is_over() {
            SessionEnd::GameOver
        } else {
            SessionEnd::Stopped
        };
        self.outcome(end)
    }

    /// Run as many fixed ticks as fit into `elapsed_secs` of wall-clock time
    ///
    /// Leftover time carries to the next call. Returns the number of ticks run.
    pub fn advance(&mut self, elapsed_secs: f32) -> u32 {
        let step = 1.0 / TICKS_PER_SECOND;
        self.accumulator += elapsed_secs.clamp(0.0, 0.1);

        let mut substeps = 0;
        while self.accumulator >= step && substeps < MAX_SUBSTEPS {
            if !self.step() {
                self.accumulator = 0.0;
                break;
            }
            self.accumulator -= step;
            substeps += 1;
        }
        substeps
    }

    pub fn outcome(&self, end: SessionEnd) -> SessionOutcome {
        SessionOutcome {
            score: self.state.final_score(),
            coins: self.state.coins,
            level: self.state.level,
            ticks: self.state.time_ticks,
            end,
        }
    }

    /// Tear down the session and hand back the collaborator
    pub fn into_collaborator(self) -> C {
        self.collaborator
    }
}
