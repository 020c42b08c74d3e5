//! Uptime segment implementation
//!
//! Renders host uptime from `/proc/uptime` as `⇑ 00d00h00m00s`. An unreadable
//! source degrades to a placeholder instead of failing the render.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use super::base::{Segment, SegmentFactory, SegmentOutput, RenderContext};
use crate::config::{BaseSegmentConfig, Config, UptimeSegmentConfig};

const UPTIME_PATH: &str = "/proc/uptime";

/// Uptime segment
pub struct UptimeSegment {
    config: UptimeSegmentConfig,
    source: PathBuf,
}

impl UptimeSegment {
    #[must_use]
    pub fn new(config: UptimeSegmentConfig) -> Self {
        Self {
            config,
            source: PathBuf::from(UPTIME_PATH),
        }
    }

    #[cfg(test)]
    fn with_source(config: UptimeSegmentConfig, source: PathBuf) -> Self {
        Self { config, source }
    }

    async fn read_uptime_seconds(&self) -> Option<f64> {
        let raw = fs::read_to_string(&self.source).await.ok()?;
        parse_uptime_seconds(&raw)
    }
}

/// First field of the uptime file: seconds since boot.
fn parse_uptime_seconds(raw: &str) -> Option<f64> {
    raw.split_whitespace().next()?.parse().ok()
}

/// Render seconds since boot as `00d00h00m00s`.
fn format_duration(total_seconds: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = total_seconds.max(0.0) as u64;
    let (minutes, seconds) = (total / 60, total % 60);
    let (hours, minutes) = (minutes / 60, minutes % 60);
    let (days, hours) = (hours / 24, hours % 24);
    format!("{days:02}d{hours:02}h{minutes:02}m{seconds:02}s")
}

#[async_trait]
impl Segment for UptimeSegment {
    fn name(&self) -> &'static str {
        "uptime"
    }

    fn is_enabled(&self, _ctx: &RenderContext) -> bool {
        self.config.base.enabled
    }

    async fn render(&self, ctx: &RenderContext) -> SegmentOutput {
        if !self.is_enabled(ctx) {
            return SegmentOutput::hidden();
        }

        let text = match self.read_uptime_seconds().await {
            Some(seconds) => format_duration(seconds),
            None => self.config.placeholder.clone(),
        };

        SegmentOutput::new(text)
            .with_icon(self.select_icon(ctx).unwrap_or_default())
            .with_icon_color(&self.config.base.icon_color)
            .with_text_color(&self.config.base.text_color)
            .with_highlight("uptime")
    }

    fn base_config(&self, _ctx: &RenderContext) -> Option<&BaseSegmentConfig> {
        Some(&self.config.base)
    }
}

/// Factory for creating Uptime segments
pub struct UptimeSegmentFactory;

impl SegmentFactory for UptimeSegmentFactory {
    fn create(&self, config: &Config) -> Box<dyn Segment> {
        Box::new(UptimeSegment::new(config.segments.uptime.clone()))
    }

    fn name(&self) -> &'static str {
        "uptime"
    }
}
