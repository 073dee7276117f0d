//! Runtime-adjustable parameters, driven from the keyboard.

use winit::keyboard::{KeyCode, PhysicalKey};

pub const LIGHT_POS_MIN: f32 = 1.0;
pub const LIGHT_POS_MAX: f32 = 8.0;
pub const LIGHT_POS_STEP: f32 = 0.03;

/// What a key press asks the application to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TweakAction {
    /// A value changed; uniforms need an update.
    Changed,
    ReloadShaders,
    Exit,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tweaks {
    /// Sun position parameter, see [`crate::pipelines::light::sun_direction`].
    pub light_pos: f32,
    /// Last measured render time. Display only.
    pub render_time_ms: f32,
}

impl Default for Tweaks {
    fn default() -> Self {
        Self {
            light_pos: 4.0,
            render_time_ms: 0.0,
        }
    }
}

impl Tweaks {
    /// Moves the light by `steps` slider steps, staying within range.
    pub fn adjust_light(&mut self, steps: f32) {
        self.light_pos =
            (self.light_pos + steps * LIGHT_POS_STEP).clamp(LIGHT_POS_MIN, LIGHT_POS_MAX);
    }

    pub fn handle_key(&mut self, key: PhysicalKey) -> Option<TweakAction> {
        match key {
            PhysicalKey::Code(KeyCode::ArrowLeft) => {
                self.adjust_light(-1.0);
                Some(TweakAction::Changed)
            }
            PhysicalKey::Code(KeyCode::ArrowRight) => {
                self.adjust_light(1.0);
                Some(TweakAction::Changed)
            }
            PhysicalKey::Code(KeyCode::KeyR) => Some(TweakAction::ReloadShaders),
            PhysicalKey::Code(KeyCode::Escape) => Some(TweakAction::Exit),
            _ => None,
        }
    }

    pub fn window_title(&self, base: &str) -> String {
        format!(
            "{} | light {:.2} | render {:.3} ms",
            base, self.light_pos, self.render_time_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_stays_in_range() {
        let mut tweaks = Tweaks::default();
        for _ in 0..1000 {
            tweaks.adjust_light(1.0);
        }
        assert_eq!(tweaks.light_pos, LIGHT_POS_MAX);
        for _ in 0..1000 {
            tweaks.adjust_light(-1.0);
        }
        assert_eq!(tweaks.light_pos, LIGHT_POS_MIN);
    }

    #[test]
    fn arrows_step_the_light() {
        let mut tweaks = Tweaks::default();
        let action = tweaks.handle_key(PhysicalKey::Code(KeyCode::ArrowRight));
        assert_eq!(action, Some(TweakAction::Changed));
        assert!((tweaks.light_pos - 4.03).abs() < 1e-5);
    }

    #[test]
    fn r_reloads_and_escape_exits() {
        let mut tweaks = Tweaks::default();
        assert_eq!(
            tweaks.handle_key(PhysicalKey::Code(KeyCode::KeyR)),
            Some(TweakAction::ReloadShaders)
        );
        assert_eq!(
            tweaks.handle_key(PhysicalKey::Code(KeyCode::Escape)),
            Some(TweakAction::Exit)
        );
        assert_eq!(tweaks.handle_key(PhysicalKey::Code(KeyCode::KeyQ)), None);
        assert_eq!(tweaks, Tweaks::default());
    }

    #[test]
    fn title_shows_render_time() {
        let tweaks = Tweaks {
            light_pos: 4.0,
            render_time_ms: 1.5,
        };
        assert_eq!(tweaks.window_title("Demo"), "Demo | light 4.00 | render 1.500 ms");
    }
}
