//! System load segment implementation
//!
//! Renders the three load averages from `/proc/loadavg` and picks a gradient
//! tag from the five-minute average normalized by CPU count.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use super::base::{Segment, SegmentFactory, SegmentOutput, RenderContext};
use crate::config::{BaseSegmentConfig, Config, LoadSegmentConfig};
use crate::utils;

const LOADAVG_PATH: &str = "/proc/loadavg";

/// Load averages segment
pub struct LoadSegment {
    config: LoadSegmentConfig,
    source: PathBuf,
}

impl LoadSegment {
    #[must_use]
    pub fn new(config: LoadSegmentConfig) -> Self {
        Self {
            config,
            source: PathBuf::from(LOADAVG_PATH),
        }
    }

    #[cfg(test)]
    fn with_source(config: LoadSegmentConfig, source: PathBuf) -> Self {
        Self { config, source }
    }

    async fn read_averages(&self) -> Option<LoadAverages> {
        let raw = fs::read_to_string(&self.source).await.ok()?;
        parse_averages(&raw)
    }

    /// Gradient tag and color for a normalized five-minute average.
    fn gradient(&self, normalized: f64) -> (&'static str, &str) {
        let thresholds = &self.config.thresholds;
        let colors = &self.config.colors;

        if normalized < thresholds.bad {
            ("system_load_good", colors.good.as_str())
        } else if normalized < thresholds.ugly {
            ("system_load_bad", colors.bad.as_str())
        } else {
            ("system_load_ugly", colors.ugly.as_str())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct LoadAverages {
    one: f64,
    five: f64,
    fifteen: f64,
}

fn parse_averages(raw: &str) -> Option<LoadAverages> {
    let mut fields = raw.split_whitespace();
    let one = fields.next()?.parse().ok()?;
    let five = fields.next()?.parse().ok()?;
    let fifteen = fields.next()?.parse().ok()?;

    Some(LoadAverages { one, five, fifteen })
}

#[async_trait]
impl Segment for LoadSegment {
    fn name(&self) -> &'static str {
        "load"
    }

    fn is_enabled(&self, _ctx: &RenderContext) -> bool {
        self.config.base.enabled
    }

    async fn render(&self, ctx: &RenderContext) -> SegmentOutput {
        if !self.is_enabled(ctx) {
            return SegmentOutput::hidden();
        }

        let Some(averages) = self.read_averages().await else {
            eprintln!("[statusline] load: cannot read {}", self.source.display());
            return SegmentOutput::hidden();
        };

        #[allow(clippy::cast_precision_loss)]
        let normalized = averages.five / utils::cpu_count() as f64;
        let (tag, color) = self.gradient(normalized);

        SegmentOutput::new(format!(
            "{:.1}, {:.1}, {:.1}",
            averages.one, averages.five, averages.fifteen
        ))
        .with_icon(self.select_icon(ctx).unwrap_or_default())
        .with_icon_color(&self.config.base.icon_color)
        .with_text_color(color)
        .with_highlight(tag)
        .with_highlight("system_load")
    }

    fn base_config(&self, _ctx: &RenderContext) -> Option<&BaseSegmentConfig> {
        Some(&self.config.base)
    }
}

/// Factory for creating Load segments
pub struct LoadSegmentFactory;

impl SegmentFactory for LoadSegmentFactory {
    fn create(&self, config: &Config) -> Box<dyn Segment> {
        Box::new(LoadSegment::new(config.segments.load.clone()))
    }

    fn name(&self) -> &'static str {
        "load"
    }
}
