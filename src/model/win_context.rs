use std::ops::{BitOr, BitOrAssign};

use super::*;

// 和了の状況を表すフラグ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinFlags(u8);

impl WinFlags {
    pub const DISCARD: Self = Self(0); // 栄和 (点和)
    pub const SELF_DRAWN: Self = Self(1); // 自摸
    pub const FOURTH_TILE: Self = Self(2); // 絶張
    pub const ABOUT_KONG: Self = Self(4); // 槓に関連 (自摸なら槓上開花, 栄和なら搶槓和)
    pub const WALL_LAST: Self = Self(8); // 牌山の最後の牌 (自摸なら妙手回春, 栄和なら海底撈月)
    pub const INIT: Self = Self(16); // 配牌 (天和・地和の状況)

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    #[inline]
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    #[inline]
    pub const fn is_self_drawn(self) -> bool {
        self.contains(Self::SELF_DRAWN)
    }
}

impl BitOr for WinFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for WinFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

// 算番の入力
#[derive(Debug, Clone)]
pub struct CalculateParam {
    pub hand: Hand,           // 手牌 (和了牌は含まない)
    pub win_tile: Tile,       // 和了牌
    pub flower_count: u8,     // 花牌の数
    pub win_flags: WinFlags,  // 和了の状況
    pub prevalent_wind: Rank, // 圏風 (東: 1, 南: 2, 西: 3, 北: 4)
    pub seat_wind: Rank,      // 門風 (同上)
    pub rule: RuleSet,        // ルール設定
}

impl CalculateParam {
    pub fn new(hand: Hand, win_tile: Tile) -> Self {
        Self {
            hand,
            win_tile,
            flower_count: 0,
            win_flags: WinFlags::DISCARD,
            prevalent_wind: WE,
            seat_wind: WE,
            rule: RuleSet::default(),
        }
    }
}

#[test]
fn test_win_flags() {
    let mut wf = WinFlags::SELF_DRAWN | WinFlags::WALL_LAST;
    assert!(wf.is_self_drawn());
    assert!(wf.contains(WinFlags::WALL_LAST));
    assert!(!wf.contains(WinFlags::ABOUT_KONG));
    wf.remove(WinFlags::SELF_DRAWN);
    assert!(!wf.is_self_drawn());
    wf |= WinFlags::FOURTH_TILE;
    assert!(wf.contains(WinFlags::FOURTH_TILE | WinFlags::WALL_LAST));
    assert!(wf.contains(WinFlags::DISCARD));
}
