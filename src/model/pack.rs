use serde::ser;

use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PackType {
    Chow, // 順子
    Pung, // 刻子
    Kong, // 槓子
    Pair, // 雀頭
}

impl PackType {
    #[inline]
    const fn to_bits(self) -> u16 {
        match self {
            PackType::Chow => 1,
            PackType::Pung => 2,
            PackType::Kong => 3,
            PackType::Pair => 4,
        }
    }
}

// 面子 (offer << 12) | (type << 8) | tile
// 順子の場合のtileは中央の牌
// offer: 0 = 暗, 1~3 = 明 (刻子・槓子は1:上家, 2:対家, 3:下家, 順子は何枚目を鳴いたか)
// 加槓の場合はofferに4を加える
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Pack(u16);

impl Pack {
    #[inline]
    pub const fn new(offer: Offer, pack_type: PackType, tile: Tile) -> Self {
        Self(((offer as u16) << 12) | (pack_type.to_bits() << 8) | tile.0 as u16)
    }

    #[inline]
    pub const fn tile(self) -> Tile {
        Tile((self.0 & 0xFF) as u8)
    }

    #[inline]
    pub const fn offer(self) -> Offer {
        (self.0 >> 12) as Offer
    }

    pub fn pack_type(self) -> PackType {
        match (self.0 >> 8) & 0xF {
            1 => PackType::Chow,
            2 => PackType::Pung,
            3 => PackType::Kong,
            4 => PackType::Pair,
            n => unreachable!("invalid pack type: {}", n),
        }
    }

    // 鳴いた面子か (加槓のフラグは無視)
    #[inline]
    pub const fn is_melded(self) -> bool {
        self.offer() & 3 != 0
    }

    #[inline]
    pub const fn is_promoted_kong(self) -> bool {
        self.offer() & 4 != 0
    }

    // 供給元を書き換えた面子を返却 (ロン和了の刻子を明刻扱いにする場合など)
    #[inline]
    pub const fn with_offer(self, offer: Offer) -> Self {
        Self((self.0 & 0x0FFF) | ((offer as u16) << 12))
    }

    // 加槓 (刻子 -> 槓子)
    pub fn promote_pung_to_kong(self) -> Self {
        debug_assert!(self.pack_type() == PackType::Pung);
        Self::new(self.offer() | 4, PackType::Kong, self.tile())
    }

    #[inline]
    pub fn is_chow(self) -> bool {
        self.pack_type() == PackType::Chow
    }

    // 刻子または槓子
    #[inline]
    pub fn is_pung_or_kong(self) -> bool {
        matches!(self.pack_type(), PackType::Pung | PackType::Kong)
    }

    // 面子を構成する牌を返却 (順子は昇順)
    pub fn tiles(self) -> Vec<Tile> {
        let t = self.tile();
        match self.pack_type() {
            PackType::Chow => vec![t.shift(-1), t, t.shift(1)],
            PackType::Pung => vec![t; 3],
            PackType::Kong => vec![t; 4],
            PackType::Pair => vec![t; 2],
        }
    }

    // 面子に指定した牌が含まれるか
    pub fn contains(self, t: Tile) -> bool {
        let mid = self.tile();
        match self.pack_type() {
            PackType::Chow => mid.suit() == t.suit() && mid.rank().abs_diff(t.rank()) <= 1,
            _ => mid == t,
        }
    }
}

impl fmt::Debug for Pack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tp = match self.pack_type() {
            PackType::Chow => "Chow",
            PackType::Pung => "Pung",
            PackType::Kong => "Kong",
            PackType::Pair => "Pair",
        };
        write!(f, "{}({}, {})", tp, self.tile(), self.offer())
    }
}

impl ser::Serialize for Pack {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        serializer.serialize_str(&crate::convert::notation::format_pack(*self))
    }
}

#[test]
fn test_pack_bits() {
    let t = Tile::new(SUIT_BAMBOO, 5);
    let p = Pack::new(2, PackType::Chow, t);
    assert_eq!(p.tile(), t);
    assert_eq!(p.offer(), 2);
    assert_eq!(p.pack_type(), PackType::Chow);
    assert!(p.is_melded());
    assert_eq!(p.tiles(), vec![t.shift(-1), t, t.shift(1)]);
    assert!(p.contains(Tile::new(SUIT_BAMBOO, 4)));
    assert!(!p.contains(Tile::new(SUIT_DOTS, 4)));

    let k = Pack::new(3, PackType::Pung, t).promote_pung_to_kong();
    assert_eq!(k.pack_type(), PackType::Kong);
    assert!(k.is_melded() && k.is_promoted_kong());
    assert_eq!(k.offer(), 7);

    let ak = Pack::new(0, PackType::Kong, t);
    assert!(!ak.is_melded());
    assert!(ak.with_offer(1).is_melded());
}
