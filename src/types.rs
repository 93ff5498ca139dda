//! Type definitions for streamvista
//!
//! Source of truth for all data structures.

use serde::{Deserialize, Serialize};

// ============================================
// Video Types
// ============================================

/// A video record from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub title: String,
    pub description: String,
    /// URL to thumbnail image
    pub thumbnail: String,
    /// Duration formatted as "3:45" or "1:23:45"
    pub duration: String,
    pub views: u64,
    /// ISO-8601 date, e.g. "2024-03-15"
    pub upload_date: String,
    pub channel: Channel,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// URL of the playable media
    pub video_url: String,
}

/// The channel a video was published on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    /// URL to avatar image
    pub avatar: String,
    /// e.g., "1.2M"
    pub subscribers: String,
}

/// Optional filters applied on top of a free-text search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    /// Matched case-insensitively for exact equality
    pub category: Option<String>,
}

impl SearchFilters {
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
        }
    }
}

// ============================================
// Config Types
// ============================================

/// User configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Trending list size (default: 10)
    pub trending_limit: usize,
    /// Recommended sample size (default: 10)
    pub recommended_limit: usize,
    /// Related videos shown next to a playing video (default: 8)
    pub related_limit: usize,
    /// Max history entries (default: 100)
    pub max_history_entries: usize,
    /// Simulated latency of a catalog fetch
    pub fetch_latency_ms: u64,
    /// Simulated latency of a search
    pub search_latency_ms: u64,
    /// Remote JSON catalog; the bundled dataset is used when unset
    pub catalog_url: Option<String>,
    /// Fixed seed for recommendations, random when unset
    pub recommend_seed: Option<u64>,
    /// Editor command for `--edit`; empty uses `$VISUAL`, then `$EDITOR`
    pub editor: String,
    pub player: PlayerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trending_limit: 10,
            recommended_limit: 10,
            related_limit: 8,
            max_history_entries: 100,
            fetch_latency_ms: 500,
            search_latency_ms: 300,
            catalog_url: None,
            recommend_seed: None,
            editor: String::new(),
            player: PlayerConfig::default(),
        }
    }
}

/// Playback controller settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Start playing as soon as a source is mounted
    pub autoplay: bool,
    /// Idle time before controls hide during playback
    pub hide_controls_after_ms: u64,
    /// Step used by the seek buttons
    pub seek_step_secs: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            autoplay: false,
            hide_controls_after_ms: 3000,
            seek_step_secs: 10.0,
        }
    }
}

// ============================================
// Playback Types
// ============================================

/// Transport state of the playback controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Paused,
    Playing,
    /// The resource stalled waiting for data while playing
    Buffering,
}

/// Point-in-time view of everything a player UI renders
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSnapshot {
    pub is_playing: bool,
    pub is_muted: bool,
    pub volume: f64,
    pub current_time: f64,
    pub duration: f64,
    pub show_controls: bool,
    pub is_fullscreen: bool,
    pub is_buffering: bool,
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self {
            is_playing: false,
            is_muted: false,
            volume: 1.0,
            current_time: 0.0,
            duration: 0.0,
            show_controls: true,
            is_fullscreen: false,
            is_buffering: false,
        }
    }
}
