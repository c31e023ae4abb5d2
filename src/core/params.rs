//! Scene parameters and the change notifications that edit them.
//!
//! Colors baked into particle attributes require a full rebuild when edited;
//! the flame tint, rotation speed and glow are pushed straight to the
//! renderer instead.

use super::color::{Color, ParseColorError};
use super::constants::MAX_CANDLES;

/// User-editable scene configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneParameters {
    pub base_color: Color,
    pub top_color: Color,
    pub icing_color: Color,
    pub flame_color: Color,
    pub particle_size: f32,
    pub rotation_speed: f32,
    pub bloom_strength: f32,
    pub candle_count: u32,
}

impl Default for SceneParameters {
    fn default() -> Self {
        Self {
            base_color: Color::from_hex_u32(0xD4AF37),  // gold
            top_color: Color::from_hex_u32(0xF7E7CE),   // champagne
            icing_color: Color::from_hex_u32(0xFFFFFF), // diamond
            flame_color: Color::from_hex_u32(0xFF5722),
            particle_size: 0.15,
            rotation_speed: 1.0,
            bloom_strength: 1.5,
            candle_count: 8,
        }
    }
}

/// A single edited field, as delivered by the settings panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamChange {
    BaseColor(Color),
    TopColor(Color),
    IcingColor(Color),
    FlameColor(Color),
    ParticleSize(f32),
    RotationSpeed(f32),
    BloomStrength(f32),
    CandleCount(u32),
}

/// What the scene composer has to do after a change was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamEffect {
    /// Regenerate both batches and reinstall them before the next frame.
    Rebuild,
    /// Push the new tint to the flame shading stage.
    FlameTint,
    /// Update the camera auto-rotation rate.
    Rotation,
    /// Update the glow gain.
    Glow,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamError {
    #[error("unknown scene parameter {0:?}")]
    UnknownField(String),
    #[error(transparent)]
    InvalidColor(#[from] ParseColorError),
    #[error("invalid value {value:?} for {field}")]
    InvalidNumber { field: &'static str, value: String },
}

impl ParamChange {
    /// Parse a `(field, value)` pair using the panel's field names.
    pub fn parse(field: &str, value: &str) -> Result<Self, ParamError> {
        let value = value.trim();
        let float = |field: &'static str| {
            value
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| ParamError::InvalidNumber {
                    field,
                    value: value.to_string(),
                })
        };
        let change = match field {
            "baseColor" => ParamChange::BaseColor(Color::from_hex(value)?),
            "topColor" => ParamChange::TopColor(Color::from_hex(value)?),
            "icingColor" => ParamChange::IcingColor(Color::from_hex(value)?),
            "flameColor" => ParamChange::FlameColor(Color::from_hex(value)?),
            "particleSize" => ParamChange::ParticleSize(float("particleSize")?),
            "rotationSpeed" => ParamChange::RotationSpeed(float("rotationSpeed")?),
            "bloomStrength" => ParamChange::BloomStrength(float("bloomStrength")?),
            "candleCount" => {
                // Sliders may report "8" or "8.0"
                let n = value
                    .parse::<u32>()
                    .ok()
                    .or_else(|| {
                        value
                            .parse::<f32>()
                            .ok()
                            .filter(|v| v.is_finite() && *v >= 0.0)
                            .map(|v| v.round() as u32)
                    })
                    .ok_or_else(|| ParamError::InvalidNumber {
                        field: "candleCount",
                        value: value.to_string(),
                    })?;
                ParamChange::CandleCount(n)
            }
            other => return Err(ParamError::UnknownField(other.to_string())),
        };
        Ok(change)
    }
}

impl SceneParameters {
    /// Apply a change in place and report how the composer must react.
    pub fn apply(&mut self, change: ParamChange) -> ParamEffect {
        match change {
            ParamChange::BaseColor(c) => {
                self.base_color = c;
                ParamEffect::Rebuild
            }
            ParamChange::TopColor(c) => {
                self.top_color = c;
                ParamEffect::Rebuild
            }
            ParamChange::IcingColor(c) => {
                self.icing_color = c;
                ParamEffect::Rebuild
            }
            ParamChange::FlameColor(c) => {
                self.flame_color = c;
                ParamEffect::FlameTint
            }
            ParamChange::ParticleSize(s) => {
                self.particle_size = s;
                ParamEffect::Rebuild
            }
            ParamChange::CandleCount(n) => {
                if n > MAX_CANDLES {
                    log::warn!("[params] candleCount {} clamped to {}", n, MAX_CANDLES);
                }
                self.candle_count = n.min(MAX_CANDLES);
                ParamEffect::Rebuild
            }
            ParamChange::RotationSpeed(v) => {
                self.rotation_speed = v;
                ParamEffect::Rotation
            }
            ParamChange::BloomStrength(v) => {
                self.bloom_strength = v;
                ParamEffect::Glow
            }
        }
    }

    /// Defaults overridden by a URL query string such as
    /// `?candleCount=12&baseColor=%23ff0000`. Invalid pairs are logged and skipped.
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = percent_decode(value);
            match ParamChange::parse(key, &value) {
                Ok(change) => {
                    params.apply(change);
                }
                Err(e) => log::warn!("[params] ignoring query pair {:?}: {}", pair, e),
            }
        }
        params
    }
}

fn percent_decode(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
                match hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    Some(b) => {
                        out.push(b);
                        i += 3;
                        continue;
                    }
                    None => out.push(b'%'),
                }
            }
            b'+' => out.push(b' '),
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
