use serde::{Deserialize, Serialize};

use crate::model::view::{PriorityFilter, SortKey};

/// Configuration from board.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    pub board: BoardInfo,
    #[serde(default)]
    pub view: ViewConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardInfo {
    pub name: String,
}

/// Default view parameters applied when `tb board` flags are omitted
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub priority: PriorityFilter,
    #[serde(default)]
    pub sort: SortKey,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            priority: PriorityFilter::All,
            sort: SortKey::Created,
        }
    }
}
