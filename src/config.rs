/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// All tick values assume the server's 100 ms decision cycle.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::ConfigError;

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq)]
pub struct AgentConfig {
    pub grid: GridConfig,
    pub items: ItemConfig,
    pub behavior: BehaviorConfig,
    pub exploration: ExplorationConfig,
    pub log_filter: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ItemConfig {
    pub respawn_ticks: u32,
    pub max_energy: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BehaviorConfig {
    pub potion_critical_energy: i32,
    pub potion_moderate_energy: i32,
    pub potion_opportunistic_range: u32, // Manhattan cap for a respawning potion
    pub respawn_arrival_window: u32,     // max ticks to wait at an item after arriving
    pub stale_score_ticks: u64,
    pub attack_cooldown_ticks: u64,
    pub max_burst_shots: u32,
    pub look_turns: u32,
    pub look_cooldown_ticks: u64,
    pub evade_hysteresis_ticks: u64,
    pub evade_keep_axis_across_states: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExplorationConfig {
    pub seed: Option<u64>,
    pub run_probability: f64,
    pub min_run: u32,
    pub max_run: u32,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    grid: TomlGrid,
    #[serde(default)]
    items: TomlItems,
    #[serde(default)]
    behavior: TomlBehavior,
    #[serde(default)]
    exploration: TomlExploration,
    #[serde(default)]
    log: TomlLog,
}

#[derive(Deserialize, Debug)]
struct TomlGrid {
    #[serde(default = "default_width")]
    width: u32,
    #[serde(default = "default_height")]
    height: u32,
}

#[derive(Deserialize, Debug)]
struct TomlItems {
    #[serde(default = "default_respawn")]
    respawn_ticks: u32,
    #[serde(default = "default_max_energy")]
    max_energy: i32,
}

#[derive(Deserialize, Debug)]
struct TomlBehavior {
    #[serde(default = "default_potion_critical")]
    potion_critical_energy: i32,
    #[serde(default = "default_potion_moderate")]
    potion_moderate_energy: i32,
    #[serde(default = "default_potion_range")]
    potion_opportunistic_range: u32,
    #[serde(default = "default_arrival_window")]
    respawn_arrival_window: u32,
    #[serde(default = "default_stale_score")]
    stale_score_ticks: u64,
    #[serde(default = "default_attack_cooldown")]
    attack_cooldown_ticks: u64,
    #[serde(default = "default_max_burst")]
    max_burst_shots: u32,
    #[serde(default = "default_look_turns")]
    look_turns: u32,
    #[serde(default = "default_look_cooldown")]
    look_cooldown_ticks: u64,
    #[serde(default = "default_evade_hysteresis")]
    evade_hysteresis_ticks: u64,
    #[serde(default = "default_keep_axis")]
    evade_keep_axis_across_states: bool,
}

#[derive(Deserialize, Debug)]
struct TomlExploration {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default = "default_run_probability")]
    run_probability: f64,
    #[serde(default = "default_min_run")]
    min_run: u32,
    #[serde(default = "default_max_run")]
    max_run: u32,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default = "default_log_filter")]
    filter: String,
}

// ── Defaults ──

fn default_width() -> u32 { 59 }
fn default_height() -> u32 { 34 }
fn default_respawn() -> u32 { 300 }           // 30s
fn default_max_energy() -> i32 { 100 }
fn default_potion_critical() -> i32 { 30 }
fn default_potion_moderate() -> i32 { 50 }
fn default_potion_range() -> u32 { 10 }
fn default_arrival_window() -> u32 { 20 }     // 2s
fn default_stale_score() -> u64 { 500 }       // 50s without scoring
fn default_attack_cooldown() -> u64 { 10 }    // 1s pause after a long burst
fn default_max_burst() -> u32 { 10 }
fn default_look_turns() -> u32 { 3 }
fn default_look_cooldown() -> u64 { 50 }      // 5s
fn default_evade_hysteresis() -> u64 { 5 }
fn default_keep_axis() -> bool { true }
fn default_run_probability() -> f64 { 0.55 }
fn default_min_run() -> u32 { 3 }
fn default_max_run() -> u32 { 15 }
fn default_log_filter() -> String { "info".into() }

impl Default for TomlGrid {
    fn default() -> Self {
        TomlGrid { width: default_width(), height: default_height() }
    }
}

impl Default for TomlItems {
    fn default() -> Self {
        TomlItems { respawn_ticks: default_respawn(), max_energy: default_max_energy() }
    }
}

impl Default for TomlBehavior {
    fn default() -> Self {
        TomlBehavior {
            potion_critical_energy: default_potion_critical(),
            potion_moderate_energy: default_potion_moderate(),
            potion_opportunistic_range: default_potion_range(),
            respawn_arrival_window: default_arrival_window(),
            stale_score_ticks: default_stale_score(),
            attack_cooldown_ticks: default_attack_cooldown(),
            max_burst_shots: default_max_burst(),
            look_turns: default_look_turns(),
            look_cooldown_ticks: default_look_cooldown(),
            evade_hysteresis_ticks: default_evade_hysteresis(),
            evade_keep_axis_across_states: default_keep_axis(),
        }
    }
}

impl Default for TomlExploration {
    fn default() -> Self {
        TomlExploration {
            seed: None,
            run_probability: default_run_probability(),
            min_run: default_min_run(),
            max_run: default_max_run(),
        }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog { filter: default_log_filter() }
    }
}

impl From<TomlConfig> for AgentConfig {
    fn from(t: TomlConfig) -> Self {
        let min_run = t.exploration.min_run.max(1);
        let run_probability = match t.exploration.run_probability {
            p if p.is_finite() => p.clamp(0.0, 1.0),
            _ => default_run_probability(),
        };
        AgentConfig {
            grid: GridConfig { width: t.grid.width, height: t.grid.height },
            items: ItemConfig {
                respawn_ticks: t.items.respawn_ticks,
                max_energy: t.items.max_energy,
            },
            behavior: BehaviorConfig {
                potion_critical_energy: t.behavior.potion_critical_energy,
                potion_moderate_energy: t.behavior.potion_moderate_energy,
                potion_opportunistic_range: t.behavior.potion_opportunistic_range,
                respawn_arrival_window: t.behavior.respawn_arrival_window,
                stale_score_ticks: t.behavior.stale_score_ticks,
                attack_cooldown_ticks: t.behavior.attack_cooldown_ticks,
                max_burst_shots: t.behavior.max_burst_shots,
                look_turns: t.behavior.look_turns,
                look_cooldown_ticks: t.behavior.look_cooldown_ticks,
                evade_hysteresis_ticks: t.behavior.evade_hysteresis_ticks,
                evade_keep_axis_across_states: t.behavior.evade_keep_axis_across_states,
            },
            exploration: ExplorationConfig {
                seed: t.exploration.seed,
                run_probability,
                min_run,
                max_run: t.exploration.max_run.max(min_run),
            },
            log_filter: t.log.filter,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        TomlConfig::default().into()
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        AgentConfig::default().behavior
    }
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        AgentConfig::default().exploration
    }
}

// ── Loading ──

impl AgentConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    ///
    /// Problems are returned rather than logged: the log filter itself
    /// comes from this file, so the subscriber is not up yet.
    pub fn load() -> (Self, Vec<ConfigError>) {
        let mut problems = Vec::new();
        for dir in candidate_dirs() {
            let path = dir.join("config.toml");
            if !path.exists() {
                continue;
            }
            match AgentConfig::from_file(&path) {
                Ok(cfg) => return (cfg, problems),
                Err(err @ ConfigError::Parse(_)) => {
                    problems.push(err);
                    return (AgentConfig::default(), problems);
                }
                Err(err) => problems.push(err),
            }
        }
        (AgentConfig::default(), problems)
    }

    /// Report problems from `load()` once logging is up.
    pub fn report(problems: &[ConfigError]) {
        for err in problems {
            match err {
                ConfigError::Parse(_) => warn!(%err, "using default settings"),
                ConfigError::Read { .. } => warn!(%err, "skipping unreadable config"),
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        AgentConfig::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str::<TomlConfig>(text)?.into())
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. Fallback
    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}
