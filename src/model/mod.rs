// 国標麻雀のデータモデル
mod define;
mod fan;
mod hand;
mod pack;
mod rule;
mod tile;
mod win_context;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use define::*;
pub use fan::*;
pub use hand::*;
pub use pack::*;
pub use rule::*;
pub use tile::*;
pub use win_context::*;
