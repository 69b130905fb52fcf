// 向聴数と有効牌
// 向聴数: 聴牌で0, 和了形(3k+2枚)で-1, 手牌の枚数が不正な場合はi32::MAX
use super::special::{count_knitted_tiles, KNITTED_SEQUENCES};
use crate::model::*;

use std::ops::{BitOr, BitOrAssign};

// 和了形の種類
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShapeFlags(u8);

impl ShapeFlags {
    pub const REGULAR: Self = Self(1); // 基本形
    pub const SEVEN_PAIRS: Self = Self(2); // 七対
    pub const THIRTEEN_ORPHANS: Self = Self(4); // 十三么
    pub const HONORS_AND_KNITTED: Self = Self(8); // 全不靠
    pub const KNITTED_STRAIGHT: Self = Self(16); // 組合龍
    pub const ALL: Self = Self(31);

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::REGULAR => "基本和型",
            Self::SEVEN_PAIRS => "七对",
            Self::THIRTEEN_ORPHANS => "十三幺",
            Self::HONORS_AND_KNITTED => "全不靠",
            Self::KNITTED_STRAIGHT => "组合龙",
            _ => "混合",
        }
    }
}

impl BitOr for ShapeFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ShapeFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

pub type ShantenFn = fn(&[Tile]) -> (i32, UsefulTable);

// 形ごとの計算関数 (列挙の順番)
pub const SHAPES: [(ShapeFlags, ShantenFn); 5] = [
    (ShapeFlags::REGULAR, regular_shanten),
    (ShapeFlags::SEVEN_PAIRS, seven_pairs_shanten),
    (ShapeFlags::THIRTEEN_ORPHANS, thirteen_orphans_shanten),
    (ShapeFlags::HONORS_AND_KNITTED, honors_and_knitted_tiles_shanten),
    (ShapeFlags::KNITTED_STRAIGHT, knitted_straight_shanten),
];

// 1枚加えて向聴数が下がる牌 (4枚使いの牌は除く)
fn calc_useful_table(tt: &TileTable, shanten: i32, value: impl Fn(&TileTable) -> i32) -> UsefulTable {
    let mut res = [false; TILE_KIND];
    let mut tt = *tt;
    for i in 0..TILE_KIND {
        if tt[i] as usize >= TILE {
            continue;
        }
        tt[i] += 1;
        res[i] = value(&tt) < shanten;
        tt[i] -= 1;
    }
    res
}

fn shanten_with(
    standing_tiles: &[Tile],
    valid: bool,
    value: impl Fn(&TileTable) -> i32,
) -> (i32, UsefulTable) {
    if !valid {
        return (i32::MAX, [false; TILE_KIND]);
    }
    let tt = tiles_to_tile_table(standing_tiles);
    let shanten = value(&tt);
    let useful = calc_useful_table(&tt, shanten, value);
    (shanten, useful)
}

// [基本形]

// ブロックの種類 (同じIndexでは順番に選択)
const KIND_PAIR: u8 = 0; // 雀頭
const KIND_PUNG: u8 = 1; // 刻子
const KIND_CHOW: u8 = 2; // 順子
const KIND_PAIR_PARTIAL: u8 = 3; // 対子 (刻子候補)
const KIND_ADJACENT: u8 = 4; // 両面・辺張
const KIND_GAP: u8 = 5; // 嵌張
const KIND_ISOLATED: u8 = 6; // 孤立牌

struct RegularSearch {
    tt: TileTable,
    packs: usize,    // 面子 (副露を含む)
    partials: usize, // 搭子
    pair: bool,
    best: i32,
}

impl RegularSearch {
    fn value(&self) -> i32 {
        8 - 2 * self.packs as i32 - self.partials as i32 - self.pair as i32
    }

    // 最小Indexの牌から順番にブロックを確定
    fn search(&mut self, prev: (Index, u8)) {
        let Some(i) = self.tt.iter().position(|&n| n > 0) else {
            self.best = self.best.min(self.value());
            return;
        };

        let numbered = i < 27;
        let can_take = |kind: u8| (i, kind) >= prev;
        let blocks = self.packs + self.partials;

        if can_take(KIND_PAIR) && !self.pair && self.tt[i] >= 2 {
            self.tt[i] -= 2;
            self.pair = true;
            self.search((i, KIND_PAIR));
            self.pair = false;
            self.tt[i] += 2;
        }
        if blocks < PACK {
            if can_take(KIND_PUNG) && self.tt[i] >= 3 {
                self.tt[i] -= 3;
                self.packs += 1;
                self.search((i, KIND_PUNG));
                self.packs -= 1;
                self.tt[i] += 3;
            }
            if can_take(KIND_CHOW)
                && numbered
                && i % 9 < 7
                && self.tt[i + 1] > 0
                && self.tt[i + 2] > 0
            {
                self.take_run(i, 2, 1);
                self.packs += 1;
                self.search((i, KIND_CHOW));
                self.packs -= 1;
                self.take_run(i, 2, -1);
            }
            if can_take(KIND_PAIR_PARTIAL) && self.tt[i] >= 2 {
                self.tt[i] -= 2;
                self.partials += 1;
                self.search((i, KIND_PAIR_PARTIAL));
                self.partials -= 1;
                self.tt[i] += 2;
            }
            if can_take(KIND_ADJACENT) && numbered && i % 9 < 8 && self.tt[i + 1] > 0 {
                self.take_run(i, 1, 1);
                self.partials += 1;
                self.search((i, KIND_ADJACENT));
                self.partials -= 1;
                self.take_run(i, 1, -1);
            }
            if can_take(KIND_GAP) && numbered && i % 9 < 7 && self.tt[i + 2] > 0 {
                self.tt[i] -= 1;
                self.tt[i + 2] -= 1;
                self.partials += 1;
                self.search((i, KIND_GAP));
                self.partials -= 1;
                self.tt[i] += 1;
                self.tt[i + 2] += 1;
            }
        }

        self.tt[i] -= 1;
        self.search((i, KIND_ISOLATED));
        self.tt[i] += 1;
    }

    // i, i+1, (i+2) の牌をまとめて増減 (lenは先頭以外の枚数)
    fn take_run(&mut self, i: Index, len: usize, sign: i8) {
        for j in i..=i + len {
            if sign > 0 {
                self.tt[j] -= 1;
            } else {
                self.tt[j] += 1;
            }
        }
    }
}

// 副露を除いた牌(3k+1枚または3k+2枚)の向聴数
pub fn regular_shanten_value(tt: &TileTable, fixed_cnt: usize) -> i32 {
    let mut search = RegularSearch {
        tt: *tt,
        packs: fixed_cnt,
        partials: 0,
        pair: false,
        best: i32::MAX,
    };
    search.search((0, 0));
    search.best
}

pub fn regular_shanten(standing_tiles: &[Tile]) -> (i32, UsefulTable) {
    let n = standing_tiles.len();
    let valid = n % 3 == 1 && n <= HAND_SIZE;
    let fixed_cnt = PACK.saturating_sub(n / 3);
    shanten_with(standing_tiles, valid, |tt| regular_shanten_value(tt, fixed_cnt))
}

// [七対]

fn seven_pairs_value(tt: &TileTable) -> i32 {
    let pairs: i32 = tt.iter().map(|&n| (n / 2) as i32).sum();
    6 - pairs.min(7)
}

pub fn seven_pairs_shanten(standing_tiles: &[Tile]) -> (i32, UsefulTable) {
    shanten_with(standing_tiles, standing_tiles.len() == HAND_SIZE, seven_pairs_value)
}

// [十三么]

fn thirteen_orphans_value(tt: &TileTable) -> i32 {
    let kinds = TERMINALS_AND_HONORS.iter().filter(|t| tt[t.index()] > 0).count() as i32;
    let has_pair = TERMINALS_AND_HONORS.iter().any(|t| tt[t.index()] >= 2);
    13 - kinds - has_pair as i32
}

pub fn thirteen_orphans_shanten(standing_tiles: &[Tile]) -> (i32, UsefulTable) {
    shanten_with(standing_tiles, standing_tiles.len() == HAND_SIZE, thirteen_orphans_value)
}

// [全不靠]

fn honors_and_knitted_value(tt: &TileTable) -> i32 {
    let honors = tt[27..].iter().filter(|&&n| n > 0).count();
    let knitted = KNITTED_SEQUENCES
        .iter()
        .map(|seq| count_knitted_tiles(tt, seq))
        .max()
        .unwrap_or(0);
    13 - (honors + knitted) as i32
}

pub fn honors_and_knitted_tiles_shanten(standing_tiles: &[Tile]) -> (i32, UsefulTable) {
    shanten_with(standing_tiles, standing_tiles.len() == HAND_SIZE, honors_and_knitted_value)
}

// [組合龍]
// 組合龍を3面子として扱い, 残りの牌で基本形の向聴数を計算

fn knitted_straight_value(tt: &TileTable, fixed_cnt: usize) -> i32 {
    KNITTED_SEQUENCES
        .iter()
        .map(|seq| {
            let mut rest = *tt;
            let mut matched = 0;
            for t in seq {
                if rest[t.index()] > 0 {
                    rest[t.index()] -= 1;
                    matched += 1;
                }
            }
            (9 - matched) + regular_shanten_value(&rest, 3 + fixed_cnt)
        })
        .min()
        .unwrap_or(i32::MAX)
}

pub fn knitted_straight_shanten(standing_tiles: &[Tile]) -> (i32, UsefulTable) {
    let n = standing_tiles.len();
    let valid = n == HAND_SIZE || n == HAND_SIZE - 3;
    let fixed_cnt = (HAND_SIZE - n.min(HAND_SIZE)) / 3;
    shanten_with(standing_tiles, valid, |tt| knitted_straight_value(tt, fixed_cnt))
}

// [全形]

// flagsに含まれる形のうち最小の向聴数 (同じ向聴数の形の有効牌は合成)
pub fn shanten_all(standing_tiles: &[Tile], flags: ShapeFlags) -> (i32, UsefulTable) {
    let mut res = (i32::MAX, [false; TILE_KIND]);
    for (shape, calc) in SHAPES {
        if !flags.contains(shape) {
            continue;
        }
        let (s, useful) = calc(standing_tiles);
        if s < res.0 {
            res = (s, useful);
        } else if s == res.0 && s != i32::MAX {
            for i in 0..TILE_KIND {
                res.1[i] |= useful[i];
            }
        }
    }
    res
}

#[cfg(test)]
fn tiles(exp: &str) -> Vec<Tile> {
    crate::convert::notation::parse_tiles(exp).unwrap()
}

#[cfg(test)]
fn useful_str(ut: &UsefulTable) -> String {
    crate::convert::notation::format_tiles(&useful_tiles(ut))
}

#[test]
fn test_regular_shanten() {
    let (s, useful) = regular_shanten(&tiles("1112345678999s"));
    assert_eq!(s, 0);
    assert_eq!(useful_str(&useful), "123456789s");

    let (s, useful) = regular_shanten(&tiles("23m456s789pEEECC"));
    assert_eq!(s, 0);
    assert_eq!(useful_str(&useful), "14m");

    let (s, _) = regular_shanten(&tiles("19m19s19pESWNCFP"));
    assert_eq!(s, 8);

    assert_eq!(regular_shanten(&tiles("123m456s7p")).0, 0);
    assert_eq!(regular_shanten(&tiles("123m456s79pEW")).0, 1);
    let (s, useful) = regular_shanten(&tiles("5p"));
    assert_eq!((s, useful_str(&useful)), (0, "5p".to_string()));

    assert_eq!(regular_shanten(&tiles("123m45s")).0, i32::MAX);
    assert_eq!(regular_shanten(&tiles("123m456s789p11222pE")).0, i32::MAX);
}

#[test]
fn test_special_shanten() {
    // 一向聴で有効牌は1種
    let (s, useful) = seven_pairs_shanten(&tiles("1199m1199sEESSC"));
    assert_eq!(s, 0);
    assert_eq!(useful_str(&useful), "C");

    let (s, useful) = seven_pairs_shanten(&tiles("1199m1199sEESCF"));
    assert_eq!(s, 1);
    assert_eq!(useful_str(&useful), "SCF");

    let (s, useful) = thirteen_orphans_shanten(&tiles("19m19s19pESWNCFP"));
    assert_eq!(s, 0);
    assert_eq!(count_useful_tiles(&useful), 13);
    assert_eq!(thirteen_orphans_shanten(&tiles("19m19s19pESWNC55p")).0, 2);

    let (s, useful) = honors_and_knitted_tiles_shanten(&tiles("147m258s36pESWNC"));
    assert_eq!(s, 0);
    assert_eq!(useful_str(&useful), "9pFP");

    let (s, _) = knitted_straight_shanten(&tiles("147m258s369p1234m"));
    assert_eq!(s, 0);
    let (s, _) = knitted_straight_shanten(&tiles("147m258s36p12345m"));
    assert_eq!(s, 1);
    assert_eq!(seven_pairs_shanten(&tiles("1199m1199s")).0, i32::MAX);
}

#[test]
fn test_shanten_all() {
    let hand = tiles("1199m1199sEESSC");
    let (s, useful) = shanten_all(&hand, ShapeFlags::ALL);
    assert_eq!(s, 0);
    assert!(useful[Tile::new(SUIT_HONORS, DC).index()]);
    assert_eq!(shanten_all(&hand, ShapeFlags::REGULAR).0, regular_shanten(&hand).0);
    assert!(ShapeFlags::ALL.contains(ShapeFlags::KNITTED_STRAIGHT));
    assert!(!(ShapeFlags::REGULAR | ShapeFlags::SEVEN_PAIRS).contains(ShapeFlags::ALL));
}

#[test]
fn test_shanten_monotonic() {
    use rand::prelude::*;

    // 有効牌を加えて不要な牌を1枚捨てると向聴数が1下がる
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..30 {
        let wall = crate::util::wall::create_wall(rng.gen());
        let hand: Vec<Tile> = wall[..13].to_vec();
        let (s, useful) = regular_shanten(&hand);
        assert!((0..=8).contains(&s));
        for t in useful_tiles(&useful) {
            let mut tt = tiles_to_tile_table(&hand);
            inc_tile(&mut tt, t);
            assert_eq!(regular_shanten_value(&tt, 0), s - 1);
        }
        let s14 = regular_shanten_value(&tiles_to_tile_table(&wall[..14]), 0);
        assert!(s14 <= s);
    }
}

// 和了形から1枚抜いた手牌は聴牌で, 有効牌と待ち牌が一致する
#[cfg(test)]
fn check_tenpai_from_win(
    win: &[Tile],
    rng: &mut rand::rngs::StdRng,
    shanten: fn(&[Tile]) -> (i32, UsefulTable),
    waiting: fn(&[Tile]) -> UsefulTable,
) {
    use rand::prelude::*;

    let mut hand = win.to_vec();
    let removed = hand.remove(rng.gen_range(0..hand.len()));
    hand.sort();
    let (s, useful) = shanten(&hand);
    let exp = crate::convert::notation::format_tiles(&hand);
    assert_eq!(s, 0, "{}", exp);
    assert_eq!(useful, waiting(&hand), "{}", exp);
    assert!(useful[removed.index()], "{} {}", exp, removed);
}

#[test]
fn test_special_tenpai() {
    use super::wait::*;
    use rand::prelude::*;

    let mut rng = StdRng::seed_from_u64(3);
    let honors: Vec<Tile> = (1..=7).map(|r| Tile::new(SUIT_HONORS, r)).collect();
    for _ in 0..100 {
        // 七対: 異なる7種の対子
        let mut kinds: Vec<Index> = (0..TILE_KIND).collect();
        kinds.shuffle(&mut rng);
        let win: Vec<Tile> = kinds[..7]
            .iter()
            .flat_map(|&i| [Tile::from_index(i); 2])
            .collect();
        check_tenpai_from_win(&win, &mut rng, seven_pairs_shanten, seven_pairs_waiting);

        // 十三么
        let mut win = TERMINALS_AND_HONORS.to_vec();
        win.push(*TERMINALS_AND_HONORS.choose(&mut rng).unwrap());
        check_tenpai_from_win(&win, &mut rng, thirteen_orphans_shanten, thirteen_orphans_waiting);

        // 全不靠: 組合龍と字牌の16種から14種
        let seq = KNITTED_SEQUENCES.choose(&mut rng).unwrap();
        let mut pool: Vec<Tile> = seq.iter().chain(honors.iter()).copied().collect();
        pool.shuffle(&mut rng);
        check_tenpai_from_win(
            &pool[..14],
            &mut rng,
            honors_and_knitted_tiles_shanten,
            honors_and_knitted_waiting,
        );

        // 組合龍 + 1面子 + 雀頭
        let win = loop {
            let mut win = seq.to_vec();
            let t = Tile::from_index(rng.gen_range(0..TILE_KIND));
            if rng.gen_bool(0.5) && t.is_numbered_suit() && t.rank() <= 7 {
                win.extend([t, t.shift(1), t.shift(2)]);
            } else {
                win.extend([t; 3]);
            }
            win.extend([Tile::from_index(rng.gen_range(0..TILE_KIND)); 2]);
            let tt = tiles_to_tile_table(&win);
            if tt.iter().all(|&n| n as usize <= TILE) {
                break win;
            }
        };
        check_tenpai_from_win(&win, &mut rng, knitted_straight_shanten, knitted_straight_waiting);
    }
}

#[test]
fn test_knitted_straight_with_quad() {
    // 4枚使いの牌は待ちにならない
    let hand = tiles("147m258s369pEEEE");
    let (s, useful) = knitted_straight_shanten(&hand);
    assert_eq!(s, 0);
    assert_eq!(count_useful_tiles(&useful), 0);
    assert_eq!(count_useful_tiles(&super::wait::knitted_straight_waiting(&hand)), 0);
}
