//! Per-instance animation settings.
//!
//! Everything here is validated once, when the instance is built, and never
//! changes afterwards.

use std::num::NonZeroU32;

use crate::error::{DweetError, DweetResult};

/// Frame rate used when the caller does not pick one.
pub const DEFAULT_FPS: f64 = 60.0;

/// Logical resolution of the drawing surface.
pub const SURFACE_WIDTH: u32 = 1920;
pub const SURFACE_HEIGHT: u32 = 1080;

/// Upper bound on draw calls performed in a single refresh while catching up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepCap {
    Limited(NonZeroU32),
    Unlimited,
}

impl StepCap {
    /// `max(1, ceil(fps / 60))`, so a 120 fps dweet may run two steps per
    /// 60 Hz refresh. Infinite fps yields no cap at all.
    pub fn for_fps(fps: f64) -> Self {
        if fps.is_infinite() {
            return Self::Unlimited;
        }
        let steps = (fps / 60.0).ceil().max(1.0);
        if steps >= f64::from(u32::MAX) {
            return Self::Unlimited;
        }
        NonZeroU32::new(steps as u32).map_or(Self::Unlimited, Self::Limited)
    }

    /// Accepts the JS-number form: a positive integer or `+Infinity`.
    pub fn from_f64(value: f64) -> DweetResult<Self> {
        if value.is_nan() {
            return Err(DweetError::configuration(
                "maxStepsPerTick has to be a number that is also not NaN",
            ));
        }
        if value == f64::INFINITY {
            return Ok(Self::Unlimited);
        }
        if value <= 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
            return Err(DweetError::configuration(format!(
                "maxStepsPerTick has to be an integer greater than 0 or Infinity, got {value}"
            )));
        }
        NonZeroU32::new(value as u32)
            .map(Self::Limited)
            .ok_or_else(|| DweetError::configuration("maxStepsPerTick has to be greater than 0"))
    }

    /// Clamp a number of due steps to this cap.
    pub fn clamp(self, due: u64) -> u64 {
        match self {
            Self::Limited(cap) => due.min(u64::from(cap.get())),
            Self::Unlimited => due,
        }
    }
}

/// Optional attribution shown above the animation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credits {
    pub title: Option<String>,
    pub author: Option<String>,
    pub link: Option<String>,
}

impl Credits {
    /// Text that opens the credits banner, styled as a JS block comment.
    /// The link (if any) is rendered separately as an anchor, followed by
    /// [`Credits::CLOSING`].
    pub fn caption(&self) -> String {
        let mut caption = String::from("/* ");
        if let Some(title) = self.title.as_deref().filter(|s| !s.is_empty()) {
            caption.push(' ');
            caption.push_str(title);
        }
        if let Some(author) = self.author.as_deref().filter(|s| !s.is_empty()) {
            caption.push_str(" by ");
            caption.push_str(author);
        }
        if self.link().is_some() {
            caption.push(' ');
        }
        caption
    }

    pub const CLOSING: &'static str = " */";

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref().filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationConfig {
    /// Fixed virtual update rate. `0` draws a single frame, `+Infinity`
    /// unlocks the rate and draws once per refresh.
    pub target_fps: f64,
    pub max_steps: StepCap,
    pub show_source: bool,
    pub credits: Option<Credits>,
    /// Draw every elapsed step, or only the latest one. Defaults to `true`
    /// unless `max_steps` is [`StepCap::Unlimited`].
    pub draw_intermediate: bool,
    /// Scale the drawing surface onto a separately sized display canvas.
    pub display_canvas: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self::builder().build_unchecked()
    }
}

impl AnimationConfig {
    pub fn builder() -> AnimationConfigBuilder {
        AnimationConfigBuilder::default()
    }

    pub fn is_unlocked(&self) -> bool {
        self.target_fps == f64::INFINITY
    }

    pub fn validate(&self) -> DweetResult<()> {
        if self.target_fps.is_nan() {
            return Err(DweetError::configuration(
                "targetFps has to be a number that is also not NaN",
            ));
        }
        if self.target_fps < 0.0 {
            return Err(DweetError::configuration(format!(
                "targetFps has to be greater or equal to 0, got {}",
                self.target_fps
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnimationConfigBuilder {
    target_fps: Option<f64>,
    max_steps: Option<StepCap>,
    show_source: bool,
    credits: Option<Credits>,
    draw_intermediate: Option<bool>,
    display_canvas: bool,
}

impl AnimationConfigBuilder {
    pub fn target_fps(mut self, fps: f64) -> Self {
        self.target_fps = Some(fps);
        self
    }

    pub fn max_steps(mut self, cap: StepCap) -> Self {
        self.max_steps = Some(cap);
        self
    }

    pub fn show_source(mut self, show: bool) -> Self {
        self.show_source = show;
        self
    }

    pub fn credits(mut self, credits: Credits) -> Self {
        self.credits = Some(credits);
        self
    }

    pub fn draw_intermediate(mut self, draw: bool) -> Self {
        self.draw_intermediate = Some(draw);
        self
    }

    pub fn display_canvas(mut self, display: bool) -> Self {
        self.display_canvas = display;
        self
    }

    pub fn build(self) -> DweetResult<AnimationConfig> {
        let config = self.build_unchecked();
        config.validate()?;
        Ok(config)
    }

    fn build_unchecked(self) -> AnimationConfig {
        let target_fps = self.target_fps.unwrap_or(DEFAULT_FPS);
        let max_steps = self.max_steps.unwrap_or_else(|| StepCap::for_fps(target_fps));
        AnimationConfig {
            target_fps,
            max_steps,
            show_source: self.show_source,
            credits: self.credits,
            // An uncapped catch-up only draws the latest step.
            draw_intermediate: self
                .draw_intermediate
                .unwrap_or(!matches!(max_steps, StepCap::Unlimited)),
            display_canvas: self.display_canvas,
        }
    }
}
