// 型エイリアス
pub type Suit = u8; // 牌の種別部分 (萬子,索子,筒子,字牌)
pub type Rank = u8; // 牌の数字部分 (数牌: 1~9, 字牌: 1~7)
pub type Offer = u8; // 副露の供給元 (0: 暗, 1~3: 明)
pub type Index = usize; // その他Index

// Number
pub const TILE: usize = 4; // 同種の牌の数
pub const TILE_KIND: usize = 34; // 牌の種類の数
pub const PACK: usize = 4; // 面子の数(雀頭除く)
pub const HAND_SIZE: usize = 13; // 和了牌を除く手牌の枚数

// Suit
pub const SUIT_CHARACTERS: Suit = 1; // 萬子 (m)
pub const SUIT_BAMBOO: Suit = 2; // 索子 (s)
pub const SUIT_DOTS: Suit = 3; // 筒子 (p)
pub const SUIT_HONORS: Suit = 4; // 字牌

// Honor Rank
pub const WE: Rank = 1; // Wind:   East  (東)
pub const WS: Rank = 2; // Wind:   South (南)
pub const WW: Rank = 3; // Wind:   West  (西)
pub const WN: Rank = 4; // Wind:   North (北)
pub const DC: Rank = 5; // Dragon: Red   (中)
pub const DF: Rank = 6; // Dragon: Green (發)
pub const DP: Rank = 7; // Dragon: White (白)

// 表記に使用する文字
pub const SUIT_SUFFIX: [char; 3] = ['m', 's', 'p'];
pub const HONOR_CHARS: [char; 7] = ['E', 'S', 'W', 'N', 'C', 'F', 'P'];
