//! Work deferred until the first quiet frame after mount

use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Input activity that should not compete with deferred work
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Interaction {
    pub pointer_down: bool,
    pub scrolling: bool,
}

impl Interaction {
    pub fn from_ctx(ctx: &egui::Context) -> Self {
        ctx.input(|i| Self {
            pointer_down: i.pointer.any_down(),
            scrolling: i.smooth_scroll_delta != egui::Vec2::ZERO,
        })
    }

    pub fn is_quiet(&self) -> bool {
        !self.pointer_down && !self.scrolling
    }
}

/// One-shot job that runs on the first quiet frame after the mount frame.
/// Cancelling the token before then drops the job without running it.
pub struct DeferredTask {
    job: Option<Box<dyn FnOnce()>>,
    frames_seen: u32,
    token: CancellationToken,
}

impl DeferredTask {
    pub fn new(token: CancellationToken, job: impl FnOnce() + 'static) -> Self {
        Self {
            job: Some(Box::new(job)),
            frames_seen: 0,
            token,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.job.is_some()
    }

    /// Call once per frame. Returns true on the frame the job runs.
    pub fn poll(&mut self, interaction: Interaction) -> bool {
        if self.token.is_cancelled() {
            if self.job.take().is_some() {
                debug!("Deferred task cancelled before running");
            }
            return false;
        }
        if self.job.is_none() {
            return false;
        }

        self.frames_seen += 1;
        // The mount frame paints first
        if self.frames_seen < 2 || !interaction.is_quiet() {
            return false;
        }

        match self.job.take() {
            Some(job) => {
                debug!(frames = self.frames_seen, "Running deferred task");
                job();
                true
            }
            None => false,
        }
    }
}
