use std::io::Read;
use std::path::PathBuf;

use serde::Deserialize;
use twenty48_engine::engine::{Move, Tile};

/// Move-selection strategies the driver can play with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, clap::ValueEnum)]
pub enum StrategyKind {
    /// Uniformly random legal move
    Random,
    /// Legal move with the largest immediate merge score
    Greedy,
    /// First legal move in a fixed preference order
    Ordered,
    // Future strategies can be added here
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Strategy {
    #[serde(rename = "strategy")]
    pub kind: StrategyKind,

    /// Preference order for `Ordered`. If omitted in the TOML it defaults
    /// to Left, Down, Right, Up; other strategies ignore it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<Move>>,
}

impl Strategy {
    pub fn of_kind(kind: StrategyKind) -> Self {
        Self { kind, order: None }
    }

    /// Resolve the preference order to the corner-hugging default when not
    /// provided or empty.
    pub fn order_or_default(&self) -> Vec<Move> {
        match &self.order {
            Some(order) if !order.is_empty() => order.clone(),
            _ => vec![Move::Left, Move::Down, Move::Right, Move::Up],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default = "defaults::games")]
    pub games: u32,

    /// Base seed; game i plays with seed + i. Drawn from entropy when
    /// omitted.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Stop a game after this many committed moves.
    #[serde(default)]
    pub max_moves: Option<u64>,

    #[serde(default)]
    pub grid: GridSection,

    #[serde(default = "defaults::strategy")]
    pub strategy: Strategy,

    #[serde(default)]
    pub report: Report,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GridSection {
    #[serde(default = "defaults::size")]
    pub size: usize,
    #[serde(default = "defaults::win_tile")]
    pub win_tile: Tile,
}

impl Default for GridSection {
    fn default() -> Self {
        Self {
            size: defaults::size(),
            win_tile: defaults::win_tile(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Default)]
pub struct Report {
    /// Record run summaries under this session directory.
    #[serde(default)]
    pub session_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            games: defaults::games(),
            seed: None,
            max_moves: None,
            grid: GridSection::default(),
            strategy: defaults::strategy(),
            report: Report::default(),
        }
    }
}

impl Config {
    pub fn from_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut file = std::fs::File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let cfg: Self = toml::from_str(&contents)?;
        Ok(cfg)
    }
}

mod defaults {
    use super::{Strategy, StrategyKind};

    pub fn games() -> u32 {
        100
    }
    pub fn size() -> usize {
        4
    }
    pub fn win_tile() -> u64 {
        2048
    }
    pub fn strategy() -> Strategy {
        Strategy::of_kind(StrategyKind::Random)
    }
}
