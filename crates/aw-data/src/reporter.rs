//! Bounded top-N summary reports derived from an [`Analysis`].

use std::cmp::Ordering;

use aw_core::formatting::format_duration;
use serde::Serialize;

use crate::analyzer::{Analysis, DateRange, UsageSlot};

// ── Report rows ───────────────────────────────────────────────────────────────

/// Headline totals carried over from the analysis.
#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub total_events: usize,
    pub total_duration: f64,
    pub total_duration_formatted: String,
    pub date_range: DateRange,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppEntry {
    pub app: String,
    pub duration: f64,
    pub duration_formatted: String,
    pub events: u64,
    /// Share of total duration, 0 when the total is 0.
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct UrlEntry {
    pub url: String,
    pub title: String,
    pub duration: f64,
    pub duration_formatted: String,
    pub events: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyEntry {
    pub date: String,
    pub duration: f64,
    pub duration_formatted: String,
    pub events: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HourlyEntry {
    /// Rendered as `"HH:00"`.
    pub hour: String,
    pub duration: f64,
    pub duration_formatted: String,
    pub events: u64,
}

/// The summary-format output of the analyze tool.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub overview: Overview,
    pub top_apps: Vec<AppEntry>,
    pub top_urls: Vec<UrlEntry>,
    pub daily_breakdown: Vec<DailyEntry>,
    pub hourly_breakdown: Vec<HourlyEntry>,
}

// ── Report generation ─────────────────────────────────────────────────────────

/// Derive a bounded summary report from `analysis`.
///
/// Top lists sort descending by duration with a stable sort, so equal
/// durations keep the analysis's encounter order. Day and hour breakdowns
/// sort ascending by key; the zero-padded key formats make the lexical
/// sort chronological.
pub fn summary_report(analysis: &Analysis, top_n: usize) -> SummaryReport {
    let total = analysis.total_duration;

    let mut apps: Vec<(&str, &UsageSlot)> = analysis.apps.iter().collect();
    apps.sort_by(|a, b| descending_duration(a.1.duration, b.1.duration));
    let top_apps = apps
        .into_iter()
        .take(top_n)
        .map(|(app, slot)| AppEntry {
            app: app.to_string(),
            duration: slot.duration,
            duration_formatted: format_duration(slot.duration),
            events: slot.events,
            percentage: percentage_of(slot.duration, total),
        })
        .collect();

    let mut urls: Vec<_> = analysis.urls.iter().collect();
    urls.sort_by(|a, b| descending_duration(a.1.duration, b.1.duration));
    let top_urls = urls
        .into_iter()
        .take(top_n)
        .map(|(url, slot)| UrlEntry {
            url: url.to_string(),
            title: slot.title.clone(),
            duration: slot.duration,
            duration_formatted: format_duration(slot.duration),
            events: slot.events,
            percentage: percentage_of(slot.duration, total),
        })
        .collect();

    let mut daily: Vec<(&str, &UsageSlot)> = analysis.daily.iter().collect();
    daily.sort_by(|a, b| a.0.cmp(b.0));
    let daily_breakdown = daily
        .into_iter()
        .map(|(date, slot)| DailyEntry {
            date: date.to_string(),
            duration: slot.duration,
            duration_formatted: format_duration(slot.duration),
            events: slot.events,
        })
        .collect();

    let mut hourly: Vec<(&str, &UsageSlot)> = analysis.hourly.iter().collect();
    hourly.sort_by(|a, b| a.0.cmp(b.0));
    let hourly_breakdown = hourly
        .into_iter()
        .map(|(hour, slot)| HourlyEntry {
            hour: format!("{}:00", hour),
            duration: slot.duration,
            duration_formatted: format_duration(slot.duration),
            events: slot.events,
        })
        .collect();

    SummaryReport {
        overview: Overview {
            total_events: analysis.total_events,
            total_duration: analysis.total_duration,
            total_duration_formatted: analysis.total_duration_formatted.clone(),
            date_range: analysis.date_range.clone(),
        },
        top_apps,
        top_urls,
        daily_breakdown,
        hourly_breakdown,
    }
}

fn descending_duration(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

fn percentage_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
