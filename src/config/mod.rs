//! Configuration system with YAML schema and validation.
//!
//! All rendering-surface constants (circle geometry, cadence, reveal
//! duration, tardiness policy) live here instead of being baked into the
//! renderers. Every field has a default, so an empty YAML document is a
//! valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::error::{VizError, VizResult};

/// Top-level visualization configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct VizConfig {
    /// Tour drawing surface and node appearance.
    #[validate(nested)]
    #[serde(default)]
    pub tour: TourConfig,

    /// Animation cadence and durations.
    #[validate(nested)]
    #[serde(default)]
    pub animation: AnimationConfig,

    /// Schedule timeline settings.
    #[validate(nested)]
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

impl VizConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> VizResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> VizResult<Self> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };

        config.validate()?;
        config.validate_semantic()?;

        Ok(config)
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> VizConfigBuilder {
        VizConfigBuilder::default()
    }

    /// Constraints spanning several fields.
    fn validate_semantic(&self) -> VizResult<()> {
        let tour = &self.tour;
        if tour.hover_radius < tour.node_radius {
            return Err(VizError::config(format!(
                "hover_radius {} must not be smaller than node_radius {}",
                tour.hover_radius, tour.node_radius
            )));
        }
        if tour.center_x - tour.radius < 0.0
            || tour.center_y - tour.radius < 0.0
            || tour.center_x + tour.radius > tour.width
            || tour.center_y + tour.radius > tour.height
        {
            tracing::warn!(
                radius = tour.radius,
                "tour circle extends past the drawing surface"
            );
        }
        Ok(())
    }
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            tour: TourConfig::default(),
            animation: AnimationConfig::default(),
            schedule: ScheduleConfig::default(),
        }
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct VizConfigBuilder {
    step_interval_ms: Option<u64>,
    reveal_duration_ms: Option<u64>,
    radius: Option<f64>,
    due_date_policy: Option<DueDatePolicy>,
}

impl VizConfigBuilder {
    /// Set the animation step cadence in milliseconds.
    #[must_use]
    pub const fn step_interval_ms(mut self, ms: u64) -> Self {
        self.step_interval_ms = Some(ms);
        self
    }

    /// Set the polygon reveal duration in milliseconds.
    #[must_use]
    pub const fn reveal_duration_ms(mut self, ms: u64) -> Self {
        self.reveal_duration_ms = Some(ms);
        self
    }

    /// Set the tour circle radius.
    #[must_use]
    pub const fn radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Set the policy for tasks without a due date.
    #[must_use]
    pub const fn due_date_policy(mut self, policy: DueDatePolicy) -> Self {
        self.due_date_policy = Some(policy);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> VizConfig {
        let mut config = VizConfig::default();

        if let Some(ms) = self.step_interval_ms {
            config.animation.step_interval_ms = ms;
        }
        if let Some(ms) = self.reveal_duration_ms {
            config.animation.reveal_duration_ms = ms;
        }
        if let Some(radius) = self.radius {
            config.tour.radius = radius;
        }
        if let Some(policy) = self.due_date_policy {
            config.schedule.due_date_policy = policy;
        }

        config
    }
}

/// Tour drawing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TourConfig {
    /// Surface width in pixels.
    #[validate(range(min = 1.0))]
    pub width: f64,
    /// Surface height in pixels.
    #[validate(range(min = 1.0))]
    pub height: f64,
    /// Circle center, x.
    pub center_x: f64,
    /// Circle center, y.
    pub center_y: f64,
    /// Circle radius the nodes sit on.
    #[validate(range(min = 0.0))]
    pub radius: f64,
    /// Node marker radius at rest.
    #[validate(range(min = 0.0))]
    pub node_radius: f64,
    /// Node marker radius while hovered.
    #[validate(range(min = 0.0))]
    pub hover_radius: f64,
    /// Radius of the soft glow under each node.
    #[validate(range(min = 0.0))]
    pub glow_radius: f64,
    /// Radius of the dot drawn at each tour vertex.
    #[validate(range(min = 0.0))]
    pub dot_radius: f64,
    /// Stroke width of the tour polygon.
    #[validate(range(min = 0.0))]
    pub stroke_width: f64,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 360.0,
            center_x: 320.0,
            center_y: 180.0,
            radius: 180.0,
            node_radius: 10.0,
            hover_radius: 12.0,
            glow_radius: 16.0,
            dot_radius: 3.0,
            stroke_width: 4.0,
        }
    }
}

/// Animation timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AnimationConfig {
    /// Wall-clock time between history steps.
    #[validate(range(min = 1))]
    pub step_interval_ms: u64,
    /// Time taken to reveal the whole tour polygon.
    pub reveal_duration_ms: u64,
    /// Time taken by the hover enlarge/shrink transition.
    pub hover_transition_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            step_interval_ms: 200,
            reveal_duration_ms: 3000,
            hover_transition_ms: 200,
        }
    }
}

/// What a task without a due date means for tardiness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueDatePolicy {
    /// Missing due dates count as 0, so tardiness equals completion time.
    #[default]
    ZeroDefault,
    /// Tasks without a due date are never late.
    NoDueDateNoTardiness,
}

/// Schedule timeline settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Policy for tasks without a due date.
    pub due_date_policy: DueDatePolicy,
    /// Duration used for every task when a snapshot has no durations.
    #[validate(range(min = 0.0))]
    pub missing_duration: f64,
    /// Spacing of the time markers under the Gantt chart.
    #[validate(range(min = 0.001))]
    pub time_marker_interval: f64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            due_date_policy: DueDatePolicy::ZeroDefault,
            missing_duration: 1.0,
            time_marker_interval: 5.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = VizConfig::default();

        assert!((config.tour.center_x - 320.0).abs() < f64::EPSILON);
        assert!((config.tour.center_y - 180.0).abs() < f64::EPSILON);
        assert!((config.tour.radius - 180.0).abs() < f64::EPSILON);
        assert_eq!(config.animation.step_interval_ms, 200);
        assert_eq!(config.animation.reveal_duration_ms, 3000);
        assert_eq!(config.schedule.due_date_policy, DueDatePolicy::ZeroDefault);
    }

    #[test]
    fn test_config_builder() {
        let config = VizConfig::builder()
            .step_interval_ms(50)
            .reveal_duration_ms(1000)
            .radius(100.0)
            .due_date_policy(DueDatePolicy::NoDueDateNoTardiness)
            .build();

        assert_eq!(config.animation.step_interval_ms, 50);
        assert_eq!(config.animation.reveal_duration_ms, 1000);
        assert!((config.tour.radius - 100.0).abs() < f64::EPSILON);
        assert_eq!(
            config.schedule.due_date_policy,
            DueDatePolicy::NoDueDateNoTardiness
        );
    }

    #[test]
    fn test_config_empty_yaml_is_default() {
        let config = VizConfig::from_yaml("").ok();
        assert_eq!(config, Some(VizConfig::default()));
    }

    #[test]
    fn test_config_yaml_parse() {
        let yaml = r"
animation:
  step_interval_ms: 100
schedule:
  due_date_policy: no_due_date_no_tardiness
";
        let config = VizConfig::from_yaml(yaml);
        assert!(config.is_ok());

        let config = config.ok();
        assert_eq!(
            config.as_ref().map(|c| c.animation.step_interval_ms),
            Some(100)
        );
        assert_eq!(
            config.as_ref().map(|c| c.schedule.due_date_policy),
            Some(DueDatePolicy::NoDueDateNoTardiness)
        );
        // untouched fields keep their defaults
        assert_eq!(
            config.as_ref().map(|c| c.animation.reveal_duration_ms),
            Some(3000)
        );
    }

    #[test]
    fn test_config_rejects_unknown_section() {
        let result = VizConfig::from_yaml("theme:\n  dark: true\n");
        assert!(matches!(result, Err(VizError::YamlParse(_))));
    }

    #[test]
    fn test_config_validation_fails_zero_interval() {
        let yaml = "animation:\n  step_interval_ms: 0\n";
        let result = VizConfig::from_yaml(yaml);
        assert!(matches!(result, Err(VizError::Validation(_))));
    }

    #[test]
    fn test_config_validation_fails_negative_radius() {
        let yaml = "tour:\n  radius: -5.0\n";
        let result = VizConfig::from_yaml(yaml);
        assert!(matches!(result, Err(VizError::Validation(_))));
    }

    #[test]
    fn test_config_semantic_hover_smaller_than_node() {
        let yaml = "tour:\n  node_radius: 10.0\n  hover_radius: 4.0\n";
        let result = VizConfig::from_yaml(yaml);
        assert!(matches!(result, Err(VizError::Config { .. })));
    }

    #[test]
    fn test_config_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viz.yaml");
        std::fs::write(&path, "animation:\n  reveal_duration_ms: 1500\n").unwrap();

        let config = VizConfig::load(&path).unwrap();
        assert_eq!(config.animation.reveal_duration_ms, 1500);
    }

    #[test]
    fn test_config_load_missing_file() {
        let result = VizConfig::load("/nonexistent/optiviz.yaml");
        assert!(matches!(result, Err(VizError::Io(_))));
    }
}
