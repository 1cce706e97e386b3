use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default candidate executable, matching the conventional `csign` shim name.
pub const DEFAULT_CANDIDATE: &str = "./csign";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Candidate signer executable.
    pub candidate: Option<PathBuf>,
    /// Highest message length N; the run covers lengths 0..=N.
    pub cases: Option<u32>,
    /// Bound on a single candidate invocation, in seconds.
    pub timeout_secs: Option<u64>,
    /// Optional log4rs YAML config path.
    pub log_config: Option<PathBuf>,
}

impl AppConfig {
    pub fn candidate_program(&self) -> PathBuf {
        self.candidate.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CANDIDATE))
    }

    pub fn case_bound(&self) -> u32 {
        self.cases.unwrap_or(crate::runner::DEFAULT_CASES)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(crate::candidate::DEFAULT_TIMEOUT_SECS))
    }
}

/// Config file candidates, most specific first.
pub fn find_config_paths(cli_cfg: &Option<PathBuf>) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = vec![];
    if let Some(p) = cli_cfg {
        paths.push(p.clone());
    }
    if let Ok(p) = std::env::var("SIGDIFF_CONFIG") {
        paths.push(PathBuf::from(p));
    }
    if let Ok(home) = std::env::var("USERPROFILE").or_else(|_| std::env::var("HOME")) {
        let home_pb = PathBuf::from(home);
        paths.push(home_pb.join(".sigdiffrc"));
        paths.push(home_pb.join(".config").join("sigdiff.toml"));
    }
    if let Ok(cur) = std::env::current_dir() {
        paths.push(cur.join("sigdiff.toml"));
    }
    paths
}

/// Loads layered configuration. Precedence: environment (`SIGDIFF_*`) >
/// config files in `find_config_paths` order > defaults. CLI flags override
/// on top of this in the binary. Unreadable or unparsable files are skipped.
pub fn load(cli_cfg: Option<PathBuf>) -> AppConfig {
    let mut cfg = AppConfig::default();
    if let Ok(s) = std::env::var("SIGDIFF_CANDIDATE") {
        cfg.candidate = Some(PathBuf::from(s));
    }
    if let Ok(s) = std::env::var("SIGDIFF_CASES")
        && let Ok(n) = s.parse::<u32>()
    {
        cfg.cases = Some(n);
    }
    if let Ok(s) = std::env::var("SIGDIFF_TIMEOUT_SECS")
        && let Ok(n) = s.parse::<u64>()
    {
        cfg.timeout_secs = Some(n);
    }
    if let Ok(s) = std::env::var("SIGDIFF_LOG_CONFIG") {
        cfg.log_config = Some(PathBuf::from(s));
    }
    for p in find_config_paths(&cli_cfg) {
        if !p.exists() {
            continue;
        }
        let Ok(s) = std::fs::read_to_string(&p) else { continue };
        let Ok(file_cfg) = toml::from_str::<AppConfig>(&s) else { continue };
        if cfg.candidate.is_none() {
            cfg.candidate = file_cfg.candidate;
        }
        if cfg.cases.is_none() {
            cfg.cases = file_cfg.cases;
        }
        if cfg.timeout_secs.is_none() {
            cfg.timeout_secs = file_cfg.timeout_secs;
        }
        if cfg.log_config.is_none() {
            cfg.log_config = file_cfg.log_config;
        }
    }
    cfg
}
