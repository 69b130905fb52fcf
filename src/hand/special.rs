// 特殊な和了形 (十三么, 全不靠, 組合龍, 七対) と九蓮宝燈の判定
use super::adjust::*;
use super::group::calculate_kongs;
use super::wait::*;
use crate::model::*;

use Fan::*;

// 組合龍: 3種の数牌にそれぞれ147, 258, 369を割り当てた9枚
const SUIT_PERMUTATIONS: [[Suit; 3]; 6] = [
    [SUIT_CHARACTERS, SUIT_BAMBOO, SUIT_DOTS],
    [SUIT_CHARACTERS, SUIT_DOTS, SUIT_BAMBOO],
    [SUIT_BAMBOO, SUIT_CHARACTERS, SUIT_DOTS],
    [SUIT_BAMBOO, SUIT_DOTS, SUIT_CHARACTERS],
    [SUIT_DOTS, SUIT_CHARACTERS, SUIT_BAMBOO],
    [SUIT_DOTS, SUIT_BAMBOO, SUIT_CHARACTERS],
];

pub const KNITTED_SEQUENCES: [[Tile; 9]; 6] = {
    let mut res = [[Z8; 9]; 6];
    let mut i = 0;
    while i < 6 {
        let mut j = 0;
        while j < 9 {
            let g = j / 3;
            res[i][j] = Tile::new(SUIT_PERMUTATIONS[i][g], (g + 1 + 3 * (j % 3)) as Rank);
            j += 1;
        }
        i += 1;
    }
    res
};

// 組合龍の牌のうちtilesに含まれる種類の数
pub fn count_knitted_tiles(tt: &TileTable, seq: &[Tile; 9]) -> usize {
    seq.iter().filter(|t| tt[t.index()] > 0).count()
}

// tilesの中にmin_cnt種類以上含まれる組合龍
pub fn find_knitted_sequence(tiles: &[Tile], min_cnt: usize) -> Option<[Tile; 9]> {
    let tt = tiles_to_tile_table(tiles);
    KNITTED_SEQUENCES
        .iter()
        .find(|seq| count_knitted_tiles(&tt, seq) >= min_cnt)
        .copied()
}

// 組合龍を除いた残り(5枚または2枚)を面子と雀頭に分解
// 残りが2枚の場合は副露が面子
fn divide_rest(rest: &TileTable, fixed_packs: &[Pack]) -> Option<(Pack, Pack)> {
    let mut tt = *rest;
    for i in 0..TILE_KIND {
        if tt[i] < 2 {
            continue;
        }
        tt[i] -= 2;
        let pair = Pack::new(0, PackType::Pair, Tile::from_index(i));
        let meld = match fixed_packs {
            [p] => tt.iter().all(|&n| n == 0).then_some(*p),
            _ => find_meld(&tt),
        };
        tt[i] += 2;
        if let Some(meld) = meld {
            return Some((meld, pair));
        }
    }
    None
}

// 3枚が1つの面子になる場合はその面子
fn find_meld(tt: &TileTable) -> Option<Pack> {
    let i = tt.iter().position(|&n| n > 0)?;
    if tt[i] == 3 {
        return Some(Pack::new(0, PackType::Pung, Tile::from_index(i)));
    }
    let is_chow = i < 27 && i % 9 < 7 && tt[i] == 1 && tt[i + 1] == 1 && tt[i + 2] == 1;
    if is_chow && tt.iter().map(|&n| n as usize).sum::<usize>() == 3 {
        return Some(Pack::new(0, PackType::Chow, Tile::from_index(i + 1)));
    }
    None
}

// [九蓮宝燈]

// 和了牌を除く13枚が同じ種別の1112345678999
pub fn is_nine_gates(tt: &TileTable) -> bool {
    const SKELETON: [u8; 9] = [3, 1, 1, 1, 1, 1, 1, 1, 3];
    (0..3).any(|s| {
        let row = &tt[s * 9..s * 9 + 9];
        row == SKELETON && tt.iter().map(|&n| n as usize).sum::<usize>() == HAND_SIZE
    })
}

// 天和の場合は14枚のうち任意の1枚を除いて九蓮宝燈の形
pub fn is_nine_gates_blessing_of_heaven(tt_with_win: &TileTable) -> bool {
    let mut tt = *tt_with_win;
    for i in 0..TILE_KIND {
        if tt[i] == 0 {
            continue;
        }
        tt[i] -= 1;
        let ok = is_nine_gates(&tt);
        tt[i] += 1;
        if ok {
            return true;
        }
    }
    false
}

// [特殊形の点数計算]
// 成立しない場合はNone

fn win_table(param: &CalculateParam) -> TileTable {
    let mut tt = tiles_to_tile_table(&param.hand.standing_tiles);
    inc_tile(&mut tt, param.win_tile);
    tt
}

fn win_tiles(param: &CalculateParam) -> Vec<Tile> {
    let mut tiles = param.hand.standing_tiles.clone();
    for p in &param.hand.fixed_packs {
        tiles.extend(p.tiles());
    }
    tiles.push(param.win_tile);
    tiles
}

// 門前の特殊形は自摸のみ加算 (門前清・不求人は含まれるため加算しない)
fn finish_special(param: &CalculateParam, ft: &mut FanTable) {
    if param.win_flags.is_self_drawn() {
        ft[SelfDrawn] = 1;
    }
    adjust_by_win_flags(param.win_flags, ft);
    final_adjust(&param.rule, ft);
    if ft.is_empty() {
        ft[ChickenHand] = 1;
    }
}

pub fn calculate_thirteen_orphans(param: &CalculateParam) -> Option<FanTable> {
    if !param.hand.fixed_packs.is_empty() || !is_thirteen_orphans_table(&win_table(param)) {
        return None;
    }
    let mut ft = FanTable::new();
    ft[ThirteenOrphans] = 1;
    finish_special(param, &mut ft);
    Some(ft)
}

pub fn calculate_honors_and_knitted(param: &CalculateParam) -> Option<FanTable> {
    let tt = win_table(param);
    if !param.hand.fixed_packs.is_empty() || !is_honors_and_knitted_table(&tt) {
        return None;
    }

    let mut ft = FanTable::new();
    let honor_cnt = tt[27..].iter().filter(|&&n| n > 0).count();
    if honor_cnt == 7 {
        ft[GreaterHonorsAndKnittedTiles] = 1;
    } else {
        ft[LesserHonorsAndKnittedTiles] = 1;
    }
    if KNITTED_SEQUENCES.iter().any(|seq| count_knitted_tiles(&tt, seq) == 9) {
        ft[KnittedStraight] = 1;
    }
    finish_special(param, &mut ft);
    Some(ft)
}

pub fn calculate_seven_pairs(param: &CalculateParam) -> Option<FanTable> {
    let tt = win_table(param);
    if !param.hand.fixed_packs.is_empty() || !is_seven_pairs_table(&tt) {
        return None;
    }

    let mut ft = FanTable::new();
    // 同じ種別の連続する7種の対子
    let shifted = (0..3).any(|s| {
        tt[s * 9..s * 9 + 9].windows(7).any(|w| w.iter().all(|&n| n == 2))
    });
    ft[if shifted { SevenShiftedPairs } else { SevenPairs }] = 1;

    let tiles = tiles_from_tile_table(&tt);
    adjust_by_suits(&tiles, &mut ft);
    adjust_by_tiles_traits(&tiles, &mut ft);
    adjust_by_rank_range(&tiles, &param.rule, &mut ft);
    adjust_by_tiles_hog(&tiles, 0, &mut ft);
    finish_special(param, &mut ft);
    Some(ft)
}

// 組合龍 + 1面子 + 雀頭 (副露は0または1組)
pub fn calculate_knitted_straight(param: &CalculateParam) -> Option<FanTable> {
    let hand = &param.hand;
    if hand.fixed_packs.len() > 1 {
        return None;
    }
    let tt = win_table(param);
    let mut standing = hand.standing_tiles.clone();
    standing.push(param.win_tile);
    let seq = find_knitted_sequence(&standing, 9)?;

    let mut rest = tt;
    for &t in &seq {
        dec_tile(&mut rest, t);
    }
    let (meld, pair) = divide_rest(&rest, &hand.fixed_packs)?;

    let mut ft = FanTable::new();
    ft[KnittedStraight] = 1;
    adjust_by_self_drawn(&hand.fixed_packs, param.win_flags.is_self_drawn(), &mut ft);
    let chow_cnt = 3 + meld.is_chow() as usize;
    adjust_by_pair_tile(pair.tile(), chow_cnt, &mut ft);

    let tiles = win_tiles(param);
    adjust_by_suits(&tiles, &mut ft);
    adjust_by_tiles_traits(&tiles, &mut ft);
    adjust_by_rank_range(&tiles, &param.rule, &mut ft);
    let kong_cnt = (meld.pack_type() == PackType::Kong) as usize;
    adjust_by_tiles_hog(&tiles, kong_cnt, &mut ft);

    // 和了牌が組合龍に含まれない場合のみ待ちの形を判定
    if !seq.contains(&param.win_tile) {
        let waiting = knitted_straight_waiting(&hand.standing_tiles);
        let concealed = if hand.fixed_packs.is_empty() { vec![meld, pair] } else { vec![pair] };
        adjust_by_waiting_form(&concealed, &waiting, param.win_tile, &mut ft);
    }
    adjust_by_win_flags(param.win_flags, &mut ft);

    if meld.is_pung_or_kong() {
        let mut meld = meld;
        // 栄和で和了牌を含む暗刻は明刻扱い
        if !param.win_flags.is_self_drawn()
            && hand.fixed_packs.is_empty()
            && meld.tile() == param.win_tile
        {
            meld = meld.with_offer(1);
        }
        calculate_kongs(&[meld], &param.rule, &mut ft);
        if meld.tile().is_winds() {
            adjust_by_winds(meld.tile(), param.prevalent_wind, param.seat_wind, &mut ft);
        }
    }

    final_adjust(&param.rule, &mut ft);
    if ft.is_empty() {
        ft[ChickenHand] = 1;
    }
    Some(ft)
}

#[cfg(test)]
fn param(exp: &str) -> CalculateParam {
    let (hand, win) = crate::convert::notation::parse_win_hand(exp).unwrap();
    CalculateParam::new(hand, win)
}

#[test]
fn test_knitted_sequences() {
    let fmt = |seq: &[Tile; 9]| {
        let mut seq = *seq;
        seq.sort();
        crate::convert::notation::format_tiles(&seq)
    };
    assert_eq!(fmt(&KNITTED_SEQUENCES[0]), "147m258s369p");
    assert_eq!(fmt(&KNITTED_SEQUENCES[5]), "369m258s147p");
    for a in 0..6 {
        for b in a + 1..6 {
            assert_ne!(fmt(&KNITTED_SEQUENCES[a]), fmt(&KNITTED_SEQUENCES[b]));
        }
    }
}

#[test]
fn test_nine_gates() {
    let tt = tiles_to_tile_table(&crate::convert::notation::parse_tiles("1112345678999p").unwrap());
    assert!(is_nine_gates(&tt));
    let tt =
        tiles_to_tile_table(&crate::convert::notation::parse_tiles("11123456789999p").unwrap());
    assert!(!is_nine_gates(&tt));
    assert!(is_nine_gates_blessing_of_heaven(&tt));
}

#[test]
fn test_special_shapes() {
    let ft = calculate_thirteen_orphans(&param("19m19s19pESWNCFP,1m")).unwrap();
    assert_eq!(ft.iter().collect::<Vec<_>>(), vec![(ThirteenOrphans, 1)]);
    assert!(calculate_thirteen_orphans(&param("1199m1199sEESSCC")).is_none());

    let ft = calculate_seven_pairs(&param("1199m1199sEESSC,C")).unwrap();
    assert!(ft.has(SevenPairs) && ft.has(OneVoidedSuit));
    assert!(!ft.has(SingleWait) && !ft.has(ConcealedHand));

    let ft = calculate_seven_pairs(&param("22334455667788s")).unwrap();
    assert!(ft.has(SevenShiftedPairs) && !ft.has(SevenPairs) && !ft.has(FullFlush));

    let ft = calculate_honors_and_knitted(&param("147m25s36pESWNCF,P")).unwrap();
    assert!(ft.has(GreaterHonorsAndKnittedTiles) && !ft.has(KnittedStraight));
    let ft = calculate_honors_and_knitted(&param("147m258s369pESWC,F")).unwrap();
    assert!(ft.has(LesserHonorsAndKnittedTiles) && ft.has(KnittedStraight));
    assert!(calculate_honors_and_knitted(&param("147m258s369pESWC,5m")).is_none());
}

#[test]
fn test_knitted_straight() {
    let ft = calculate_knitted_straight(&param("147m258s369p1255m,3m")).unwrap();
    assert!(ft.has(KnittedStraight) && ft.has(EdgeWait));
    assert!(ft.has(AllChows) && ft.has(ConcealedHand));
    assert!(!ft.has(NoHonors));

    // 組合龍の牌での和了は待ちの形を加算しない
    let ft = calculate_knitted_straight(&param("47m258s369p123m55s,1m")).unwrap();
    assert!(!ft.has(EdgeWait) && !ft.has(ClosedWait) && !ft.has(SingleWait));

    let ft = calculate_knitted_straight(&param("[EEE1]147m258s369pC,C")).unwrap();
    assert!(ft.has(KnittedStraight) && ft.has(SingleWait));
    assert!(ft.has(PungOfTerminalsOrHonors) || ft.has(PrevalentWind));
    assert!(calculate_knitted_straight(&param("147m258s36p12355m,4m")).is_none());
}
