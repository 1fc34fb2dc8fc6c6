//! Seams between an animation and the environment it is embedded in.

use crate::config::AnimationConfig;
use crate::error::DweetResult;

/// The surfaces an animation draws on, plus the queries it makes per tick.
pub trait RenderTarget {
    /// Handle passed to the routine as `c`.
    type Canvas: ?Sized;
    /// Handle passed to the routine as `x`.
    type Context: ?Sized;

    fn canvas(&self) -> &Self::Canvas;
    fn context(&self) -> &Self::Context;

    /// Whether any part of the target lies inside the viewport.
    fn is_visible(&self) -> bool;

    /// Show the latest drawing state, called once after a tick that drew.
    fn present(&mut self) -> DweetResult<()> {
        Ok(())
    }
}

/// Looks up the element to embed into and builds a target inside it.
pub trait Page {
    type Target: RenderTarget;

    /// Fails with [`crate::DweetError::TargetNotFound`] when `target_id`
    /// resolves to nothing.
    fn mount(&self, target_id: &str, config: &AnimationConfig) -> DweetResult<Self::Target>;
}

/// Delivers refresh timestamps in milliseconds. `None` means the host
/// stopped refreshing.
pub trait RefreshScheduler {
    fn next_timestamp(&mut self) -> Option<f64>;
}

/// A scheduler replaying a fixed list of timestamps.
#[derive(Debug, Clone)]
pub struct ScriptedRefresh<I> {
    timestamps: I,
    delivered: usize,
}

impl<I: Iterator<Item = f64>> ScriptedRefresh<I> {
    pub fn new(timestamps: impl IntoIterator<Item = f64, IntoIter = I>) -> Self {
        Self {
            timestamps: timestamps.into_iter(),
            delivered: 0,
        }
    }

    pub fn delivered(&self) -> usize {
        self.delivered
    }
}

impl<I: Iterator<Item = f64>> RefreshScheduler for ScriptedRefresh<I> {
    fn next_timestamp(&mut self) -> Option<f64> {
        let next = self.timestamps.next();
        if next.is_some() {
            self.delivered += 1;
        }
        next
    }
}

/// Client-space bounding rectangle of an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Bounds {
    pub fn intersects_viewport(&self, width: f64, height: f64) -> bool {
        self.left < width && self.right > 0.0 && self.top < height && self.bottom > 0.0
    }
}
