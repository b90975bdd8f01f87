//! Frame lifecycle state machine.
//!
//! ```text
//!   Idle --begin_scene--> SceneOpen --end_scene--> Idle
//!     \                      |
//!      `----run() == false---+--> Shutdown (terminal)
//! ```
//!
//! `render*` calls are only valid while a scene is open. Misordered calls
//! are absorbed: they are logged at `warn`, leave the state untouched and
//! return a [`LifecycleViolation`].

use thiserror::Error;

/// Current phase of the frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    Idle,
    SceneOpen,
    Shutdown,
}

/// A lifecycle call that arrived in the wrong state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleViolation {
    #[error("begin_scene called while a scene is already open")]
    SceneAlreadyOpen,
    #[error("{0} called without an open scene")]
    SceneNotOpen(&'static str),
    #[error("{0} called after shutdown")]
    ShutDown(&'static str),
}

/// Tracks the frame loop of one backend.
#[derive(Debug, Clone)]
pub struct FrameLifecycle {
    state: FrameState,
    frames_completed: u64,
}

impl FrameLifecycle {
    pub fn new() -> Self {
        Self {
            state: FrameState::Idle,
            frames_completed: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> FrameState {
        self.state
    }

    #[inline]
    pub fn is_shutdown(&self) -> bool {
        self.state == FrameState::Shutdown
    }

    #[inline]
    pub fn is_scene_open(&self) -> bool {
        self.state == FrameState::SceneOpen
    }

    /// Number of `begin_scene`/`end_scene` pairs completed.
    #[inline]
    pub fn frames_completed(&self) -> u64 {
        self.frames_completed
    }

    /// Applies the backend's keep-running decision.
    ///
    /// Returns false once shut down. A `false` decision is terminal.
    pub fn run(&mut self, keep_running: bool) -> bool {
        if self.is_shutdown() {
            return false;
        }
        if !keep_running {
            if self.is_scene_open() {
                tracing::warn!("shutting down with an open scene");
            }
            self.state = FrameState::Shutdown;
            tracing::debug!(frames = self.frames_completed, "frame loop shut down");
            return false;
        }
        true
    }

    pub fn begin_scene(&mut self) -> Result<(), LifecycleViolation> {
        match self.state {
            FrameState::Idle => {
                self.state = FrameState::SceneOpen;
                Ok(())
            }
            FrameState::SceneOpen => Err(warn(LifecycleViolation::SceneAlreadyOpen)),
            FrameState::Shutdown => Err(warn(LifecycleViolation::ShutDown("begin_scene"))),
        }
    }

    /// Checks that a draw call named `call` may run.
    pub fn check_render(&self, call: &'static str) -> Result<(), LifecycleViolation> {
        match self.state {
            FrameState::SceneOpen => Ok(()),
            FrameState::Idle => Err(warn(LifecycleViolation::SceneNotOpen(call))),
            FrameState::Shutdown => Err(warn(LifecycleViolation::ShutDown(call))),
        }
    }

    /// Closes the scene. Returns the index of the frame just completed.
    pub fn end_scene(&mut self) -> Result<u64, LifecycleViolation> {
        match self.state {
            FrameState::SceneOpen => {
                self.state = FrameState::Idle;
                let index = self.frames_completed;
                self.frames_completed += 1;
                Ok(index)
            }
            FrameState::Idle => Err(warn(LifecycleViolation::SceneNotOpen("end_scene"))),
            FrameState::Shutdown => Err(warn(LifecycleViolation::ShutDown("end_scene"))),
        }
    }
}

impl Default for FrameLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

fn warn(violation: LifecycleViolation) -> LifecycleViolation {
    tracing::warn!(%violation, "frame lifecycle call ignored");
    violation
}
