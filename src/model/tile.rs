use serde::{de, ser};

use super::*;

// 上位4bitが種別, 下位4bitが数字
// 範囲外の値に対する各関数の結果は未定義 (検査は表記のパース時に行う)
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Tile(pub(super) u8);

pub const Z8: Tile = Tile(0); // 牌なし

impl Tile {
    #[inline]
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Self((suit << 4) | rank)
    }

    // 34種のIndexから牌を復元
    #[inline]
    pub const fn from_index(i: Index) -> Self {
        if i < 27 {
            Self::new((i / 9) as Suit + 1, (i % 9) as Rank + 1)
        } else {
            Self::new(SUIT_HONORS, (i - 27) as Rank + 1)
        }
    }

    #[inline]
    pub const fn suit(self) -> Suit {
        self.0 >> 4
    }

    #[inline]
    pub const fn rank(self) -> Rank {
        self.0 & 0xF
    }

    // 34種のIndex (萬子0~8, 索子9~17, 筒子18~26, 字牌27~33)
    #[inline]
    pub const fn index(self) -> Index {
        (self.suit() as usize - 1) * 9 + self.rank() as usize - 1
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    // 同じ種別で数字をdだけずらした牌 (数牌専用)
    #[inline]
    pub const fn shift(self, d: i8) -> Self {
        Self((self.0 as i8 + d) as u8)
    }

    // 数牌
    #[inline]
    pub const fn is_numbered_suit(self) -> bool {
        self.suit() < SUIT_HONORS
    }

    // 字牌
    #[inline]
    pub const fn is_honor(self) -> bool {
        self.suit() == SUIT_HONORS
    }

    // 1,9牌
    #[inline]
    pub const fn is_terminal(self) -> bool {
        self.is_numbered_suit() && (self.rank() == 1 || self.rank() == 9)
    }

    // 么九牌
    #[inline]
    pub const fn is_terminal_or_honor(self) -> bool {
        self.is_honor() || self.rank() == 1 || self.rank() == 9
    }

    // 風牌
    #[inline]
    pub const fn is_winds(self) -> bool {
        self.is_honor() && self.rank() <= WN
    }

    // 三元牌
    #[inline]
    pub const fn is_dragons(self) -> bool {
        self.is_honor() && self.rank() >= DC
    }

    // 緑一色の構成牌 (23468s, 發)
    pub const fn is_green(self) -> bool {
        match self.suit() {
            SUIT_BAMBOO => matches!(self.rank(), 2 | 3 | 4 | 6 | 8),
            SUIT_HONORS => self.rank() == DF,
            _ => false,
        }
    }

    // 推不倒の構成牌 (1234589p, 245689s, 白)
    pub const fn is_reversible(self) -> bool {
        match self.suit() {
            SUIT_DOTS => matches!(self.rank(), 1 | 2 | 3 | 4 | 5 | 8 | 9),
            SUIT_BAMBOO => matches!(self.rank(), 2 | 4 | 5 | 6 | 8 | 9),
            SUIT_HONORS => self.rank() == DP,
            _ => false,
        }
    }

    // 牌の種別と数字が正しいか (表記のパース等, 外部入力の検査用)
    pub const fn is_valid(self) -> bool {
        match self.suit() {
            SUIT_CHARACTERS | SUIT_BAMBOO | SUIT_DOTS => 1 <= self.rank() && self.rank() <= 9,
            SUIT_HONORS => 1 <= self.rank() && self.rank() <= DP,
            _ => false,
        }
    }

    pub fn from_symbol(s: &str) -> Option<Self> {
        let chars: Vec<char> = s.chars().collect();
        match chars.as_slice() {
            [c] => honor_from_char(*c),
            [n, c] => {
                let suit = suit_from_char(*c)?;
                let rank = n.to_digit(10)? as Rank;
                let t = Self::new(suit, rank);
                if t.is_valid() {
                    Some(t)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

pub fn suit_from_char(c: char) -> Option<Suit> {
    SUIT_SUFFIX
        .iter()
        .position(|&s| s == c)
        .map(|i| i as Suit + 1)
}

pub fn honor_from_char(c: char) -> Option<Tile> {
    HONOR_CHARS
        .iter()
        .position(|&h| h == c)
        .map(|i| Tile::new(SUIT_HONORS, i as Rank + 1))
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_honor() {
            write!(f, "{}", HONOR_CHARS[self.rank() as usize - 1])
        } else {
            write!(f, "{}{}", self.rank(), SUIT_SUFFIX[self.suit() as usize - 1])
        }
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "-")
        } else {
            write!(f, "{}", self)
        }
    }
}

impl ser::Serialize for Tile {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

struct TileVisitor;

impl<'de> de::Visitor<'de> for TileVisitor {
    type Value = Tile;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("tile symbol")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Tile::from_symbol(v).ok_or_else(|| E::custom(format!("invalid tile symbol: {}", v)))
    }
}

impl<'de> de::Deserialize<'de> for Tile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_str(TileVisitor)
    }
}

// 全34種 (Index順)
pub const ALL_TILES: [Tile; TILE_KIND] = {
    let mut res = [Z8; TILE_KIND];
    let mut i = 0;
    while i < TILE_KIND {
        res[i] = Tile::from_index(i);
        i += 1;
    }
    res
};

// 么九牌13種
pub const TERMINALS_AND_HONORS: [Tile; 13] = [
    Tile::new(SUIT_CHARACTERS, 1),
    Tile::new(SUIT_CHARACTERS, 9),
    Tile::new(SUIT_BAMBOO, 1),
    Tile::new(SUIT_BAMBOO, 9),
    Tile::new(SUIT_DOTS, 1),
    Tile::new(SUIT_DOTS, 9),
    Tile::new(SUIT_HONORS, WE),
    Tile::new(SUIT_HONORS, WS),
    Tile::new(SUIT_HONORS, WW),
    Tile::new(SUIT_HONORS, WN),
    Tile::new(SUIT_HONORS, DC),
    Tile::new(SUIT_HONORS, DF),
    Tile::new(SUIT_HONORS, DP),
];

// [TileTable]
// 牌の種類(Index)ごとの枚数
pub type TileTable = [u8; TILE_KIND];

// [UsefulTable]
// 有効牌・待ち牌のフラグ
pub type UsefulTable = [bool; TILE_KIND];

#[inline]
pub fn inc_tile(tt: &mut TileTable, t: Tile) {
    tt[t.index()] += 1;
}

#[inline]
pub fn dec_tile(tt: &mut TileTable, t: Tile) {
    tt[t.index()] -= 1;
}

pub fn tiles_to_tile_table(tiles: &[Tile]) -> TileTable {
    let mut tt = [0; TILE_KIND];
    for &t in tiles {
        inc_tile(&mut tt, t);
    }
    tt
}

pub fn tiles_from_tile_table(tt: &TileTable) -> Vec<Tile> {
    let mut tiles = vec![];
    for (i, &n) in tt.iter().enumerate() {
        for _ in 0..n {
            tiles.push(Tile::from_index(i));
        }
    }
    tiles
}

pub fn count_useful_tiles(ut: &UsefulTable) -> usize {
    ut.iter().filter(|&&b| b).count()
}

pub fn useful_tiles(ut: &UsefulTable) -> Vec<Tile> {
    ut.iter()
        .enumerate()
        .filter(|&(_, &b)| b)
        .map(|(i, _)| Tile::from_index(i))
        .collect()
}

#[test]
fn test_tile_index() {
    for (i, t) in ALL_TILES.iter().enumerate() {
        assert_eq!(t.index(), i);
        assert!(t.is_valid());
        assert_eq!(Tile::from_symbol(&t.to_string()), Some(*t));
    }
    assert_eq!(Tile::from_symbol("5p"), Some(Tile::new(SUIT_DOTS, 5)));
    assert_eq!(Tile::from_symbol("C"), Some(Tile::new(SUIT_HONORS, DC)));
    assert_eq!(Tile::from_symbol("0m"), None);
}

#[test]
fn test_tile_traits() {
    let t = |s: &str| Tile::from_symbol(s).unwrap();
    assert!(t("1m").is_terminal() && t("9p").is_terminal());
    assert!(!t("E").is_terminal() && t("E").is_terminal_or_honor());
    assert!(t("N").is_winds() && !t("N").is_dragons());
    assert!(t("P").is_dragons() && t("P").is_reversible());
    assert!(t("F").is_green() && t("6s").is_green() && !t("5s").is_green());
    assert!(t("8p").is_reversible() && !t("6p").is_reversible());
    assert!(t("2s") < t("1p") && t("9p") < t("E"));
    assert_eq!(TERMINALS_AND_HONORS.iter().filter(|t| t.is_terminal()).count(), 6);
}
