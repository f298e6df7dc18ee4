//! Progress reporting and cooperative cancellation.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use strum_macros::{Display, FromRepr};

use crate::error::{Error, Result};

/// Pipeline stage of a stretch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, FromRepr)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum StretchStage {
    /// Input validation and luminance extraction.
    #[default]
    Luminance,
    /// Source and target distribution construction (OTS).
    Distribution,
    /// Transport map derivation and application (OTS).
    Transport,
    /// Starlet decomposition (SAS).
    Decompose,
    /// Per-scale thresholding and gain shaping (SAS).
    ScaleProcessing,
    /// Pyramid summation (SAS).
    Reconstruct,
    /// Arctan compression and background renormalization (SAS).
    Compression,
    /// Merging the processed luminance back into the color channels.
    ColorMerge,
}

/// Progress information for a stretch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StretchProgress {
    /// Current step (0-based).
    pub current: usize,
    /// Total number of steps within the stage.
    pub total: usize,
    pub stage: StretchStage,
}

/// Callback type for progress reporting.
pub type ProgressCallback = Arc<dyn Fn(StretchProgress) + Send + Sync>;

/// Shared cancellation flag.
///
/// Clones observe the same flag, so a host can keep one clone and hand
/// another to [`ProgressContext::with_cancel_token`].
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Host-supplied progress and cancellation context.
///
/// Engines call [`ProgressContext::stage`] between pipeline stages and
/// [`ProgressContext::check`] inside long pixel loops. Cancellation is
/// advisory: samples already written to the working plane stay written.
#[derive(Default)]
pub struct ProgressContext {
    callback: Option<ProgressCallback>,
    cancel: CancelToken,
    stage: AtomicU8,
}

impl ProgressContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(mut self, callback: ProgressCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    pub fn current_stage(&self) -> StretchStage {
        StretchStage::from_repr(self.stage.load(Ordering::Relaxed)).unwrap_or_default()
    }

    /// Enter `stage`, report progress and fail if cancellation was requested.
    pub fn stage(&self, stage: StretchStage, current: usize, total: usize) -> Result<()> {
        self.stage.store(stage as u8, Ordering::Relaxed);
        self.check()?;
        if let Some(f) = self.callback.as_ref() {
            f(StretchProgress {
                current,
                total,
                stage,
            });
        }
        Ok(())
    }

    /// Fail with `Error::Cancelled` if cancellation was requested.
    #[inline]
    pub fn check(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled {
                stage: self.current_stage(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for ProgressContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressContext")
            .field("has_callback", &self.callback.is_some())
            .field("cancelled", &self.cancel.is_cancelled())
            .field("stage", &self.current_stage())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_default_context_never_cancels() {
        let ctx = ProgressContext::default();
        assert!(ctx.stage(StretchStage::Distribution, 0, 1).is_ok());
        assert!(ctx.check().is_ok());
        assert_eq!(ctx.current_stage(), StretchStage::Distribution);
    }

    #[test]
    fn test_callback_receives_progress() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let ctx = ProgressContext::new().with_callback(Arc::new(move |p| {
            sink.lock().unwrap().push(p);
        }));

        ctx.stage(StretchStage::Decompose, 2, 6).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![StretchProgress {
                current: 2,
                total: 6,
                stage: StretchStage::Decompose
            }]
        );
    }

    #[test]
    fn test_cancel_reports_current_stage() {
        let token = CancelToken::new();
        let ctx = ProgressContext::new().with_cancel_token(token.clone());
        ctx.stage(StretchStage::ScaleProcessing, 0, 1).unwrap();

        token.cancel();

        match ctx.check() {
            Err(Error::Cancelled { stage }) => assert_eq!(stage, StretchStage::ScaleProcessing),
            other => panic!("expected cancellation, got {other:?}"),
        }
        assert!(ctx.stage(StretchStage::Reconstruct, 0, 1).is_err());
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(StretchStage::ColorMerge.to_string(), "color_merge");
        assert_eq!(StretchStage::Luminance.to_string(), "luminance");
    }
}
