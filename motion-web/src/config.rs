//! Platform profile - desktop vs mobile tuning
//!
//! Detected once at startup and passed by value into the recognizer and
//! every mode. Only numbers change between profiles, never decision structure.

/// User agent fragments that mark a mobile device
pub const MOBILE_KEYWORDS: [&str; 8] = [
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "windows phone",
    "mobile",
];

/// Viewport width (CSS px) below which a touch device counts as mobile
pub const SMALL_SCREEN_WIDTH: f64 = 768.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    Desktop,
    Mobile,
}

impl Platform {
    /// Mobile if the user agent says so, or a touch screen is narrow
    pub fn detect(user_agent: &str, has_touch: bool, viewport_width: f64) -> Self {
        let ua = user_agent.to_lowercase();
        let mobile_ua = MOBILE_KEYWORDS.iter().any(|k| ua.contains(k));
        let small_touch = has_touch && viewport_width < SMALL_SCREEN_WIDTH;

        if mobile_ua || small_touch {
            Platform::Mobile
        } else {
            Platform::Desktop
        }
    }

    pub fn is_mobile(&self) -> bool {
        matches!(self, Platform::Mobile)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Desktop => "desktop",
            Platform::Mobile => "mobile",
        }
    }
}

/// Affine launch power curve: `base + min(hand_speed * gain, max_bonus)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaunchPower {
    pub base: f32,
    pub gain: f32,
    pub max_bonus: f32,
}

impl LaunchPower {
    pub fn power(&self, hand_speed: f32) -> f32 {
        self.base + (hand_speed * self.gain).min(self.max_bonus)
    }
}

/// Every platform-dependent tuning value
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlatformProfile {
    pub platform: Platform,

    /// Minimum straight fingers for a THROW
    pub throw_min_fingers: usize,
    /// THROW requires vertical velocity below this (negative = upward in camera space)
    pub throw_max_vy: f32,

    /// Seconds between two shots
    pub shot_cooldown: f32,
    /// GUN (not only SHOOT) fires a bullet
    pub gun_fires: bool,

    /// Targets per row in shooting and whip modes
    pub target_count: usize,

    pub launch_power: LaunchPower,

    /// Particle systems available per mode; bursts past the budget are skipped
    pub explosion_slots: usize,
    pub electric_slots: usize,
    pub score_slots: usize,
}

impl PlatformProfile {
    pub fn desktop() -> Self {
        Self {
            platform: Platform::Desktop,
            throw_min_fingers: 3,
            throw_max_vy: -0.5,
            shot_cooldown: 0.3,
            gun_fires: false,
            target_count: 3,
            launch_power: LaunchPower {
                base: 6.0,
                gain: 3.0,
                max_bonus: 8.0,
            },
            explosion_slots: 8,
            electric_slots: 10,
            score_slots: 12,
        }
    }

    /// Easier thresholds, shorter cooldown, lighter effects
    pub fn mobile() -> Self {
        Self {
            platform: Platform::Mobile,
            throw_min_fingers: 2,
            throw_max_vy: -0.3,
            shot_cooldown: 0.15,
            gun_fires: true,
            target_count: 1,
            launch_power: LaunchPower {
                base: 8.0,
                gain: 2.5,
                max_bonus: 6.0,
            },
            explosion_slots: 4,
            electric_slots: 5,
            score_slots: 6,
        }
    }

    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Desktop => Self::desktop(),
            Platform::Mobile => Self::mobile(),
        }
    }
}

impl Default for PlatformProfile {
    fn default() -> Self {
        Self::desktop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_mobile_user_agents() {
        let ua = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)";
        assert_eq!(Platform::detect(ua, true, 390.0), Platform::Mobile);

        let ua = "Mozilla/5.0 (Linux; Android 14; Pixel 8)";
        assert_eq!(Platform::detect(ua, false, 1200.0), Platform::Mobile);
    }

    #[test]
    fn narrow_touch_screen_is_mobile() {
        let ua = "Mozilla/5.0 (X11; Linux x86_64)";
        assert_eq!(Platform::detect(ua, true, 700.0), Platform::Mobile);
        assert_eq!(Platform::detect(ua, true, 1400.0), Platform::Desktop);
        assert_eq!(Platform::detect(ua, false, 700.0), Platform::Desktop);
    }

    #[test]
    fn launch_power_is_clamped() {
        let desktop = PlatformProfile::desktop().launch_power;
        assert!((desktop.power(1.0) - 9.0).abs() < 1e-6);
        assert!((desktop.power(10.0) - 14.0).abs() < 1e-6);

        let mobile = PlatformProfile::mobile().launch_power;
        assert!((mobile.power(1.0) - 10.5).abs() < 1e-6);
        assert!((mobile.power(10.0) - 14.0).abs() < 1e-6);
    }
}
