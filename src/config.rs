// ============================================
// src/config.rs
// コマンドライン引数と設定ファイル
// ============================================

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use clap::Parser;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::catalog::{Script, smallest_catalog_len};
use crate::session::{DEFAULT_FLASH, DEFAULT_ROWS, SessionPolicy};

const CONFIG_FILE: &str = "config.json";
const LOG_FILE: &str = "kanamatch.log";
const MAX_FLASH_MS: u64 = 10_000;

/// ローマ字とかなを組み合わせる神経衰弱
#[derive(Debug, Default, Parser)]
#[command(name = "kanamatch", version, about = "KANA MATCH.")]
pub struct Cli {
    /// 出題する文字 (hiragana / katakana)
    #[arg(long, value_enum)]
    pub script: Option<Script>,

    /// 盤面の行数
    #[arg(long)]
    pub rows: Option<usize>,

    /// 判定時の点滅時間 (ミリ秒)
    #[arg(long)]
    pub flash_ms: Option<u64>,

    /// 正解するたびに残りの行を並べ替える
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub reshuffle_on_match: Option<bool>,

    /// 使い切ったマスを暗くする
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub dim_solved: Option<bool>,

    /// 乱数のシード (同じ値なら同じ盤面)
    #[arg(long)]
    pub seed: Option<u64>,

    /// 設定ファイルのパス
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// ログの出力先
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// 設定ファイルの中身。書かれていない項目は初期値
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub script: Script,
    pub rows: usize,
    pub flash_ms: u64,
    pub reshuffle_on_match: bool,
    pub dim_solved: bool,
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            script: Script::default(),
            rows: DEFAULT_ROWS,
            flash_ms: DEFAULT_FLASH.as_millis() as u64,
            reshuffle_on_match: false,
            dim_solved: true,
            seed: None,
            log_file: None,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("jp", "kanamatch", "KANA_MATCH")
}

/// 既定の設定ファイルの場所
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// 既定のログファイルの場所 (取得できなければカレントディレクトリ)
pub fn default_log_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join(LOG_FILE))
        .unwrap_or_else(|| PathBuf::from(LOG_FILE))
}

impl Settings {
    // MARK: 読み込み
    /// CLI の値で設定ファイルを上書きした最終的な設定を返す
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut settings = match &cli.config {
            // 明示されたファイルは必ず存在すること
            Some(path) => Self::load(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::load(&path)?,
                _ => Self::default(),
            },
        };
        settings.apply(cli);
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("invalid settings in {}", path.display()))
    }

    pub fn apply(&mut self, cli: &Cli) {
        if let Some(script) = cli.script {
            self.script = script;
        }
        if let Some(rows) = cli.rows {
            self.rows = rows;
        }
        if let Some(flash_ms) = cli.flash_ms {
            self.flash_ms = flash_ms;
        }
        if let Some(reshuffle) = cli.reshuffle_on_match {
            self.reshuffle_on_match = reshuffle;
        }
        if let Some(dim) = cli.dim_solved {
            self.dim_solved = dim;
        }
        if cli.seed.is_some() {
            self.seed = cli.seed;
        }
        if cli.log_file.is_some() {
            self.log_file = cli.log_file.clone();
        }
    }

    pub fn validate(&self) -> Result<()> {
        let max_rows = smallest_catalog_len();
        ensure!(
            (1..=max_rows).contains(&self.rows),
            "rows must be between 1 and {max_rows}, got {}",
            self.rows
        );
        ensure!(
            self.flash_ms <= MAX_FLASH_MS,
            "flash_ms must be at most {MAX_FLASH_MS}, got {}",
            self.flash_ms
        );
        Ok(())
    }

    pub fn policy(&self) -> SessionPolicy {
        SessionPolicy {
            rows: self.rows,
            flash: Duration::from_millis(self.flash_ms),
            reshuffle_on_match: self.reshuffle_on_match,
            dim_solved: self.dim_solved,
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(default_log_path)
    }
}
