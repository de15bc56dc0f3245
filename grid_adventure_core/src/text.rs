//! Transient on-screen messages that fade in, hold, then fade out.

use serde::{Deserialize, Serialize};

/// Seconds a message stays alive unless configured otherwise.
pub const DEFAULT_LIFETIME: f32 = 2.0;
/// Seconds spent fading in and fading out.
pub const DEFAULT_EASE: f32 = 0.2;

/// Circular easing curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Easing {
    CircleIn,
    CircleOut,
}

impl Easing {
    /// Maps `t` in `[0, 1]` onto `[0, 1]`. Input is clamped first.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::CircleIn => 1.0 - (1.0 - t * t).sqrt(),
            Easing::CircleOut => {
                let u = t - 1.0;
                (1.0 - u * u).sqrt()
            }
        }
    }
}

/// A single message with its own clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAnimation {
    text: String,
    lifetime: f32,
    ease: f32,
    elapsed: f32,
}

impl TextAnimation {
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_timing(text, DEFAULT_LIFETIME, DEFAULT_EASE)
    }

    pub fn with_timing(text: impl Into<String>, lifetime: f32, ease: f32) -> Self {
        TextAnimation {
            text: text.into(),
            lifetime,
            ease,
            elapsed: 0.0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn update(&mut self, delta: f32) {
        self.elapsed += delta;
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.lifetime
    }

    /// Current opacity in `[0, 1]`.
    pub fn opacity(&self) -> f32 {
        if self.elapsed <= self.ease {
            Easing::CircleIn.apply((self.elapsed / self.ease).min(1.0))
        } else if self.elapsed > self.lifetime - self.ease {
            Easing::CircleOut.apply(((self.lifetime - self.elapsed) / self.ease).min(1.0))
        } else {
            1.0
        }
    }
}

/// The set of live messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFeed {
    lifetime: f32,
    ease: f32,
    texts: Vec<TextAnimation>,
}

impl Default for TextFeed {
    fn default() -> Self {
        TextFeed::new(DEFAULT_LIFETIME, DEFAULT_EASE)
    }
}

impl TextFeed {
    pub fn new(lifetime: f32, ease: f32) -> Self {
        TextFeed {
            lifetime,
            ease,
            texts: Vec::new(),
        }
    }

    pub fn show_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        log::debug!("showing text {text:?}");
        self.texts
            .push(TextAnimation::with_timing(text, self.lifetime, self.ease));
    }

    /// Drops messages that completed on an earlier pass, then advances the
    /// rest by `delta`.
    pub fn advance(&mut self, delta: f32) {
        self.texts.retain(|text| !text.is_complete());
        for text in &mut self.texts {
            text.update(delta);
        }
    }

    /// Live messages, oldest first.
    pub fn messages(&self) -> &[TextAnimation] {
        &self.texts
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}
