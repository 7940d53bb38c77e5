//! Game tuning and layout parameters
//!
//! Loaded from JSON; any field left out keeps its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::BubbleColor;

/// Tuning values for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Ceiling ===
    /// Shots fired between ceiling advances
    pub shots_before_drop: u32,

    // === Board ===
    /// Lattice depth (rows addressable, visible or not)
    pub max_rows: usize,
    /// Nominal visible rows
    pub rows_visible: usize,
    /// Rows filled when a game starts; derived from `rows_visible` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_rows: Option<usize>,
    /// Occupancy probability for seeded slots
    pub seed_fill: f64,
    /// Occupancy probability for rows inserted by the ceiling
    pub new_row_fill: f64,
    /// Number of palette colors in play
    pub palette_size: usize,

    // === Physics ===
    /// Projectile speed in device px/s
    pub projectile_speed: f32,
    /// Integration substeps per frame
    pub substeps: u32,
    /// Maximum elapsed time simulated per frame (seconds)
    pub max_frame_dt: f32,
    /// Contact slack subtracted from 2R (css px)
    pub contact_slack: f32,
    /// Offset below the ceiling used for ceiling snaps
    pub ceiling_epsilon: f32,

    // === Aim ===
    pub aim_min_deg: f32,
    pub aim_max_deg: f32,
    /// Radians per keyboard nudge
    pub aim_nudge: f32,

    // === Layout (css px) ===
    pub min_radius: f32,
    pub max_radius: f32,
    pub radius_divisor: f32,
    pub board_margin: f32,
    pub emitter_inset: f32,
    pub min_cols: usize,
    pub max_dpr: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            shots_before_drop: SHOTS_BEFORE_DROP,

            max_rows: MAX_ROWS,
            rows_visible: ROWS_VISIBLE,
            seed_rows: None,
            seed_fill: 0.85,
            new_row_fill: 0.9,
            palette_size: BubbleColor::ALL.len(),

            projectile_speed: PROJECTILE_SPEED,
            substeps: SUBSTEPS,
            max_frame_dt: MAX_FRAME_DT,
            contact_slack: CONTACT_SLACK,
            ceiling_epsilon: CEILING_EPSILON,

            aim_min_deg: AIM_MIN_DEG,
            aim_max_deg: AIM_MAX_DEG,
            aim_nudge: AIM_NUDGE,

            min_radius: MIN_RADIUS,
            max_radius: MAX_RADIUS,
            radius_divisor: RADIUS_DIVISOR,
            board_margin: BOARD_MARGIN,
            emitter_inset: EMITTER_INSET,
            min_cols: MIN_COLS,
            max_dpr: MAX_DPR,
        }
    }
}

impl Settings {
    /// Parse and validate settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read, parse and validate a JSON settings file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every value is usable by the simulation
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shots_before_drop == 0 {
            return Err(ConfigError::invalid("shots_before_drop", "must be at least 1"));
        }
        if self.max_rows == 0 {
            return Err(ConfigError::invalid("max_rows", "must be at least 1"));
        }
        if let Some(rows) = self.seed_rows.filter(|&rows| rows > self.max_rows) {
            return Err(ConfigError::invalid(
                "seed_rows",
                format!("{rows} exceeds max_rows {}", self.max_rows),
            ));
        }
        if self.substeps == 0 {
            return Err(ConfigError::invalid("substeps", "must be at least 1"));
        }
        if !(1..=BubbleColor::ALL.len()).contains(&self.palette_size) {
            return Err(ConfigError::invalid(
                "palette_size",
                format!("must be between 1 and {}", BubbleColor::ALL.len()),
            ));
        }
        for (field, p) in [("seed_fill", self.seed_fill), ("new_row_fill", self.new_row_fill)] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::invalid(field, format!("{p} is not a probability")));
            }
        }
        for (field, v) in [
            ("projectile_speed", self.projectile_speed),
            ("max_frame_dt", self.max_frame_dt),
            ("min_radius", self.min_radius),
            ("max_radius", self.max_radius),
            ("radius_divisor", self.radius_divisor),
            ("max_dpr", self.max_dpr),
        ] {
            if !(v.is_finite() && v > 0.0) {
                return Err(ConfigError::invalid(field, "must be positive"));
            }
        }
        if self.min_radius > self.max_radius {
            return Err(ConfigError::invalid("min_radius", "exceeds max_radius"));
        }
        if !(self.aim_min_deg.is_finite() && self.aim_max_deg.is_finite())
            || self.aim_min_deg >= self.aim_max_deg
        {
            return Err(ConfigError::invalid("aim_min_deg", "aim arc is empty"));
        }
        if self.contact_slack < 0.0 || self.board_margin < 0.0 || self.emitter_inset < 0.0 {
            return Err(ConfigError::invalid("layout", "offsets must not be negative"));
        }
        Ok(())
    }

    /// Aim arc in radians
    pub fn aim_range(&self) -> (f32, f32) {
        (self.aim_min_deg.to_radians(), self.aim_max_deg.to_radians())
    }

    /// Colors available to new bubbles
    pub fn palette(&self) -> &'static [BubbleColor] {
        let n = self.palette_size.clamp(1, BubbleColor::ALL.len());
        &BubbleColor::ALL[..n]
    }

    /// Rows seeded at game start: `seed_rows`, else `min(rows_visible - 4, 8)`
    pub fn seed_row_count(&self) -> usize {
        self.seed_rows
            .unwrap_or_else(|| self.rows_visible.saturating_sub(4).min(8))
            .min(self.max_rows)
    }

    /// Shots between ceiling advances, never zero
    pub fn drop_interval(&self) -> u32 {
        self.shots_before_drop.max(1)
    }

    /// Shots remaining until the next ceiling advance
    pub fn shots_until_drop(&self, shots_fired: u32) -> u32 {
        let interval = self.drop_interval();
        interval - shots_fired % interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.seed_row_count(), 8);
        assert_eq!(settings.palette().len(), 7);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "shots_before_drop": 3, "palette_size": 4 }"#)
            .expect("valid settings");
        assert_eq!(settings.shots_before_drop, 3);
        assert_eq!(settings.palette().len(), 4);
        assert_eq!(settings.max_rows, MAX_ROWS);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Settings::from_json(r#"{ "shots_before_drop": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "shots_before_drop", .. }));

        let err = Settings::from_json(r#"{ "seed_fill": 1.5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "seed_fill", .. }));

        let err = Settings::from_json(r#"{ "aim_min_deg": -10, "aim_max_deg": -20 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Settings::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings::default();
        let json = settings.to_json().expect("serializable");
        assert_eq!(Settings::from_json(&json).expect("valid"), settings);
    }

    #[test]
    fn test_shots_until_drop() {
        let settings = Settings::default();
        assert_eq!(settings.shots_until_drop(0), 5);
        assert_eq!(settings.shots_until_drop(4), 1);
        assert_eq!(settings.shots_until_drop(5), 5);

        let zero = Settings {
            shots_before_drop: 0,
            ..Settings::default()
        };
        assert_eq!(zero.drop_interval(), 1);
        assert_eq!(zero.shots_until_drop(7), 1);
    }

    #[test]
    fn test_seed_rows_follow_rows_visible() {
        let settings = Settings::from_json(r#"{ "rows_visible": 6 }"#).expect("valid settings");
        assert_eq!(settings.seed_row_count(), 2);

        let settings = Settings::from_json(r#"{ "rows_visible": 30 }"#).expect("valid settings");
        assert_eq!(settings.seed_row_count(), 8);

        let settings = Settings::from_json(r#"{ "rows_visible": 6, "seed_rows": 5 }"#)
            .expect("valid settings");
        assert_eq!(settings.seed_row_count(), 5);

        let err = Settings::from_json(r#"{ "max_rows": 4, "seed_rows": 5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "seed_rows", .. }));
    }
}
