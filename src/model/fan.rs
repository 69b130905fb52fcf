use std::ops::{Index as IndexOp, IndexMut};

use serde::ser::{self, SerializeMap};

use super::*;

#[derive(Debug)]
pub struct FanInfo {
    pub fan: Fan,
    pub name: &'static str,    // 中国語名
    pub name_en: &'static str, // 英語名
    pub value: i32,            // 番数
}

macro_rules! fan {
    ($($v: ident => ($n: expr, $e: expr, $p: expr),)*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Fan {
            $($v,)*
        }

        pub const FAN_COUNT: usize = [$(Fan::$v),*].len();

        pub static FAN_LIST: &[FanInfo] = &[
            $(FanInfo { fan: Fan::$v, name: $n, name_en: $e, value: $p },)*
        ];
    };
}

// 番種一覧 (番数の大きい順)
fan! {
    // 88番
    BigFourWinds => ("大四喜", "Big Four Winds", 88),
    BigThreeDragons => ("大三元", "Big Three Dragons", 88),
    AllGreen => ("绿一色", "All Green", 88),
    NineGates => ("九莲宝灯", "Nine Gates", 88),
    FourKongs => ("四杠", "Four Kongs", 88),
    SevenShiftedPairs => ("连七对", "Seven Shifted Pairs", 88),
    ThirteenOrphans => ("十三幺", "Thirteen Orphans", 88),
    // 64番
    AllTerminals => ("清幺九", "All Terminals", 64),
    LittleFourWinds => ("小四喜", "Little Four Winds", 64),
    LittleThreeDragons => ("小三元", "Little Three Dragons", 64),
    AllHonors => ("字一色", "All Honors", 64),
    FourConcealedPungs => ("四暗刻", "Four Concealed Pungs", 64),
    PureTerminalChows => ("一色双龙会", "Pure Terminal Chows", 64),
    // 48番
    QuadrupleChow => ("一色四同顺", "Quadruple Chow", 48),
    FourPureShiftedPungs => ("一色四节高", "Four Pure Shifted Pungs", 48),
    // 32番
    FourPureShiftedChows => ("一色四步高", "Four Pure Shifted Chows", 32),
    ThreeKongs => ("三杠", "Three Kongs", 32),
    AllTerminalsAndHonors => ("混幺九", "All Terminals and Honors", 32),
    // 24番
    SevenPairs => ("七对", "Seven Pairs", 24),
    GreaterHonorsAndKnittedTiles => ("七星不靠", "Greater Honors and Knitted Tiles", 24),
    AllEvenPungs => ("全双刻", "All Even Pungs", 24),
    FullFlush => ("清一色", "Full Flush", 24),
    PureTripleChow => ("一色三同顺", "Pure Triple Chow", 24),
    PureShiftedPungs => ("一色三节高", "Pure Shifted Pungs", 24),
    UpperTiles => ("全大", "Upper Tiles", 24),
    MiddleTiles => ("全中", "Middle Tiles", 24),
    LowerTiles => ("全小", "Lower Tiles", 24),
    // 16番
    PureStraight => ("清龙", "Pure Straight", 16),
    ThreeSuitedTerminalChows => ("三色双龙会", "Three-Suited Terminal Chows", 16),
    PureShiftedChows => ("一色三步高", "Pure Shifted Chows", 16),
    AllFive => ("全带五", "All Five", 16),
    TriplePung => ("三同刻", "Triple Pung", 16),
    ThreeConcealedPungs => ("三暗刻", "Three Concealed Pungs", 16),
    // 12番
    LesserHonorsAndKnittedTiles => ("全不靠", "Lesser Honors and Knitted Tiles", 12),
    KnittedStraight => ("组合龙", "Knitted Straight", 12),
    UpperFour => ("大于五", "Upper Four", 12),
    LowerFour => ("小于五", "Lower Four", 12),
    BigThreeWinds => ("三风刻", "Big Three Winds", 12),
    // 8番
    MixedStraight => ("花龙", "Mixed Straight", 8),
    ReversibleTiles => ("推不倒", "Reversible Tiles", 8),
    MixedTripleChow => ("三色三同顺", "Mixed Triple Chow", 8),
    MixedShiftedPungs => ("三色三节高", "Mixed Shifted Pungs", 8),
    ChickenHand => ("无番和", "Chicken Hand", 8),
    LastTileDraw => ("妙手回春", "Last Tile Draw", 8),
    LastTileClaim => ("海底捞月", "Last Tile Claim", 8),
    OutWithReplacementTile => ("杠上开花", "Out with Replacement Tile", 8),
    RobbingTheKong => ("抢杠和", "Robbing the Kong", 8),
    // 6番
    AllPungs => ("碰碰和", "All Pungs", 6),
    HalfFlush => ("混一色", "Half Flush", 6),
    MixedShiftedChows => ("三色三步高", "Mixed Shifted Chows", 6),
    AllTypes => ("五门齐", "All Types", 6),
    MeldedHand => ("全求人", "Melded Hand", 6),
    TwoConcealedKongs => ("双暗杠", "Two Concealed Kongs", 6),
    TwoDragonsPungs => ("双箭刻", "Two Dragons Pungs", 6),
    // 4番
    OutsideHand => ("全带幺", "Outside Hand", 4),
    FullyConcealedHand => ("不求人", "Fully Concealed Hand", 4),
    TwoMeldedKongs => ("双明杠", "Two Melded Kongs", 4),
    LastTile => ("和绝张", "Last Tile", 4),
    // 2番
    DragonPung => ("箭刻", "Dragon Pung", 2),
    PrevalentWind => ("圈风刻", "Prevalent Wind", 2),
    SeatWind => ("门风刻", "Seat Wind", 2),
    ConcealedHand => ("门前清", "Concealed Hand", 2),
    AllChows => ("平和", "All Chows", 2),
    TileHog => ("四归一", "Tile Hog", 2),
    DoublePung => ("双同刻", "Double Pung", 2),
    TwoConcealedPungs => ("双暗刻", "Two Concealed Pungs", 2),
    ConcealedKong => ("暗杠", "Concealed Kong", 2),
    AllSimples => ("断幺", "All Simples", 2),
    // 1番
    PureDoubleChow => ("一般高", "Pure Double Chow", 1),
    MixedDoubleChow => ("喜相逢", "Mixed Double Chow", 1),
    ShortStraight => ("连六", "Short Straight", 1),
    TwoTerminalChows => ("老少副", "Two Terminal Chows", 1),
    PungOfTerminalsOrHonors => ("幺九刻", "Pung of Terminals or Honors", 1),
    MeldedKong => ("明杠", "Melded Kong", 1),
    OneVoidedSuit => ("缺一门", "One Voided Suit", 1),
    NoHonors => ("无字", "No Honors", 1),
    EdgeWait => ("边张", "Edge Wait", 1),
    ClosedWait => ("嵌张", "Closed Wait", 1),
    SingleWait => ("单钓将", "Single Wait", 1),
    SelfDrawn => ("自摸", "Self-Drawn", 1),
    // 花牌 (1枚につき1番)
    FlowerTiles => ("花牌", "Flower Tiles", 1),
    // 明暗杠 (98年版ルールの厳密適用時は採用しない)
    ConcealedKongAndMeldedKong => ("明暗杠", "Concealed Kong and Melded Kong", 5),
}

impl Fan {
    #[inline]
    pub fn info(self) -> &'static FanInfo {
        &FAN_LIST[self as usize]
    }

    #[inline]
    pub fn value(self) -> i32 {
        self.info().value
    }

    #[inline]
    pub fn name(self) -> &'static str {
        self.info().name
    }
}

impl fmt::Display for Fan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// 番種ごとの成立数
#[derive(Clone, PartialEq, Eq)]
pub struct FanTable([u8; FAN_COUNT]);

impl Default for FanTable {
    fn default() -> Self {
        Self([0; FAN_COUNT])
    }
}

impl FanTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&n| n == 0)
    }

    pub fn has(&self, fan: Fan) -> bool {
        self[fan] != 0
    }

    // 1つ以上成立している番種を番数の大きい順に列挙
    pub fn iter(&self) -> impl Iterator<Item = (Fan, u8)> + '_ {
        FAN_LIST
            .iter()
            .zip(self.0.iter())
            .filter(|&(_, &n)| n != 0)
            .map(|(fi, &n)| (fi.fan, n))
    }

    // 合計番数
    pub fn total(&self) -> i32 {
        self.iter().map(|(f, n)| f.value() * n as i32).sum()
    }
}

impl IndexOp<Fan> for FanTable {
    type Output = u8;

    fn index(&self, fan: Fan) -> &u8 {
        &self.0[fan as usize]
    }
}

impl IndexMut<Fan> for FanTable {
    fn index_mut(&mut self, fan: Fan) -> &mut u8 {
        &mut self.0[fan as usize]
    }
}

impl fmt::Debug for FanTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(fan, n)| (fan.info().name_en, n)))
            .finish()
    }
}

impl fmt::Display for FanTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (fan, n) in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{}({})", fan.name(), fan.value())?;
            if n > 1 {
                write!(f, "x{}", n)?;
            }
        }
        Ok(())
    }
}

impl ser::Serialize for FanTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        for (fan, n) in self.iter() {
            map.serialize_entry(fan.name(), &n)?;
        }
        map.end()
    }
}

#[test]
fn test_fan_list() {
    assert_eq!(FAN_LIST.len(), FAN_COUNT);
    for (i, fi) in FAN_LIST.iter().enumerate() {
        assert_eq!(fi.fan as usize, i);
    }
    assert_eq!(Fan::BigFourWinds.value(), 88);
    assert_eq!(Fan::SelfDrawn.value(), 1);
    assert_eq!(Fan::ConcealedKongAndMeldedKong.value(), 5);
    assert_eq!(Fan::ChickenHand.name(), "无番和");
}

#[test]
fn test_fan_table() {
    let mut ft = FanTable::new();
    assert!(ft.is_empty());
    ft[Fan::AllPungs] = 1;
    ft[Fan::TileHog] = 2;
    ft[Fan::SelfDrawn] += 1;
    assert_eq!(ft.total(), 6 + 4 + 1);
    assert_eq!(ft.to_string(), "碰碰和(6), 四归一(2)x2, 自摸(1)");
    let json = serde_json::to_string(&ft).unwrap();
    assert_eq!(json, r#"{"碰碰和":1,"四归一":2,"自摸":1}"#);
}
