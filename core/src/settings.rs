use serde::{Deserialize, Serialize};

use crate::*;

/// Player preferences kept between runs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub board_size: BoardSize,
}

impl StorageKey for Settings {
    const KEY: &'static str = "knights-tour:settings";
}
