// 和了形判定と待ち牌
use super::special::find_knitted_sequence;
use crate::model::*;

// 種別ごとの範囲 (34種Index)
const SUIT_RANGES: [(Index, Index); 4] = [(0, 9), (9, 18), (18, 27), (27, 34)];

// [完成形判定 (面子, 雀頭)]

// 面子のみで構成されているかの判定
fn is_sets(row: &[u8], honor: bool) -> bool {
    if honor {
        return row.iter().all(|&n| n % 3 == 0);
    }
    let (mut n0, mut n1) = (row[0], row[1]);
    for &n2 in &row[2..] {
        let n = n0 % 3;
        if n1 < n || n2 < n {
            return false;
        }
        n0 = n1 - n;
        n1 = n2 - n;
    }
    n0 % 3 == 0 && n1 % 3 == 0
}

// 雀頭+面子で構成されているかの判定
fn is_sets_pair(row: &[u8], honor: bool) -> bool {
    let mut row = row.to_vec();
    if honor {
        return row.iter().filter(|&&n| n % 3 == 2).count() == 1 && row.iter().all(|&n| n % 3 != 1);
    }

    // 面子の数字の和は3で割り切れるので雀頭の候補は3つに絞り込める
    let sum: usize = row.iter().enumerate().map(|(i, &n)| (i + 1) * n as usize).sum();
    let m = sum % 3;
    for r in [3 - m, 6 - m, 9 - m] {
        let i = r - 1;
        if row[i] < 2 {
            continue;
        }
        row[i] -= 2;
        let ok = is_sets(&row, false);
        row[i] += 2;
        if ok {
            return true;
        }
    }
    false
}

// 雀頭+面子形 (3k+2枚)
pub fn is_regular_win_table(tt: &TileTable) -> bool {
    let mut pair_found = false;
    for (s, &(a, b)) in SUIT_RANGES.iter().enumerate() {
        let row = &tt[a..b];
        let honor = s == 3;
        match row.iter().map(|&n| n as usize).sum::<usize>() % 3 {
            0 => {
                if !is_sets(row, honor) {
                    return false;
                }
            }
            2 => {
                if pair_found || !is_sets_pair(row, honor) {
                    return false;
                }
                pair_found = true;
            }
            _ => return false,
        }
    }
    pair_found
}

// 七対 (4枚は2組として扱う)
pub fn is_seven_pairs_table(tt: &TileTable) -> bool {
    tt.iter().map(|&n| n as usize).sum::<usize>() == 14 && tt.iter().all(|&n| n % 2 == 0)
}

// 十三么
pub fn is_thirteen_orphans_table(tt: &TileTable) -> bool {
    let cnt: usize = tt.iter().map(|&n| n as usize).sum();
    cnt == 14
        && TERMINALS_AND_HONORS.iter().all(|t| tt[t.index()] > 0)
        && ALL_TILES.iter().all(|t| t.is_terminal_or_honor() || tt[t.index()] == 0)
}

// 全不靠 (組合龍の一部と字牌で14種)
pub fn is_honors_and_knitted_table(tt: &TileTable) -> bool {
    let cnt: usize = tt.iter().map(|&n| n as usize).sum();
    if cnt != 14 || tt.iter().any(|&n| n > 1) {
        return false;
    }
    let numbered: Vec<Tile> =
        ALL_TILES.iter().filter(|t| t.is_numbered_suit() && tt[t.index()] > 0).copied().collect();
    find_knitted_sequence(&numbered, numbered.len()).is_some()
}

// 組合龍 + 1面子 + 雀頭 (副露1組の場合は11枚)
pub fn is_knitted_straight_table(tt: &TileTable) -> bool {
    let cnt: usize = tt.iter().map(|&n| n as usize).sum();
    if cnt != 14 && cnt != 11 {
        return false;
    }
    let tiles = tiles_from_tile_table(tt);
    match find_knitted_sequence(&tiles, 9) {
        Some(seq) => {
            let mut rest = *tt;
            for t in seq {
                dec_tile(&mut rest, t);
            }
            is_regular_win_table(&rest)
        }
        None => false,
    }
}

// [待ち牌]
// 立牌(3k+1枚)に1枚加えて和了形になる牌
// 立牌に4枚ある牌は待ち牌としない

fn waiting_table(standing_tiles: &[Tile], is_win: fn(&TileTable) -> bool) -> UsefulTable {
    let mut res = [false; TILE_KIND];
    if standing_tiles.len() % 3 != 1 {
        return res;
    }
    let mut tt = tiles_to_tile_table(standing_tiles);
    for i in 0..TILE_KIND {
        if tt[i] as usize >= TILE {
            continue;
        }
        tt[i] += 1;
        res[i] = is_win(&tt);
        tt[i] -= 1;
    }
    res
}

fn is_win_with(standing_tiles: &[Tile], t: Tile, is_win: fn(&TileTable) -> bool) -> bool {
    if standing_tiles.len() % 3 != 1 {
        return false;
    }
    let mut tt = tiles_to_tile_table(standing_tiles);
    inc_tile(&mut tt, t);
    is_win(&tt)
}

// 基本形
pub fn regular_waiting(standing_tiles: &[Tile]) -> UsefulTable {
    waiting_table(standing_tiles, is_regular_win_table)
}

pub fn is_waiting(standing_tiles: &[Tile]) -> bool {
    count_useful_tiles(&regular_waiting(standing_tiles)) != 0
}

pub fn is_regular_win(standing_tiles: &[Tile], t: Tile) -> bool {
    is_win_with(standing_tiles, t, is_regular_win_table)
}

// 七対
pub fn seven_pairs_waiting(standing_tiles: &[Tile]) -> UsefulTable {
    if standing_tiles.len() != HAND_SIZE {
        return [false; TILE_KIND];
    }
    waiting_table(standing_tiles, is_seven_pairs_table)
}

pub fn is_seven_pairs_wait(standing_tiles: &[Tile]) -> bool {
    count_useful_tiles(&seven_pairs_waiting(standing_tiles)) != 0
}

pub fn is_seven_pairs_win(standing_tiles: &[Tile], t: Tile) -> bool {
    standing_tiles.len() == HAND_SIZE && is_win_with(standing_tiles, t, is_seven_pairs_table)
}

// 十三么
pub fn thirteen_orphans_waiting(standing_tiles: &[Tile]) -> UsefulTable {
    if standing_tiles.len() != HAND_SIZE {
        return [false; TILE_KIND];
    }
    waiting_table(standing_tiles, is_thirteen_orphans_table)
}

pub fn is_thirteen_orphans_wait(standing_tiles: &[Tile]) -> bool {
    count_useful_tiles(&thirteen_orphans_waiting(standing_tiles)) != 0
}

pub fn is_thirteen_orphans_win(standing_tiles: &[Tile], t: Tile) -> bool {
    standing_tiles.len() == HAND_SIZE && is_win_with(standing_tiles, t, is_thirteen_orphans_table)
}

// 全不靠
pub fn honors_and_knitted_waiting(standing_tiles: &[Tile]) -> UsefulTable {
    if standing_tiles.len() != HAND_SIZE {
        return [false; TILE_KIND];
    }
    waiting_table(standing_tiles, is_honors_and_knitted_table)
}

pub fn is_honors_and_knitted_wait(standing_tiles: &[Tile]) -> bool {
    count_useful_tiles(&honors_and_knitted_waiting(standing_tiles)) != 0
}

pub fn is_honors_and_knitted_win(standing_tiles: &[Tile], t: Tile) -> bool {
    standing_tiles.len() == HAND_SIZE
        && is_win_with(standing_tiles, t, is_honors_and_knitted_table)
}

// 組合龍 (立牌13枚または10枚)
pub fn knitted_straight_waiting(standing_tiles: &[Tile]) -> UsefulTable {
    if standing_tiles.len() != HAND_SIZE && standing_tiles.len() != HAND_SIZE - 3 {
        return [false; TILE_KIND];
    }
    waiting_table(standing_tiles, is_knitted_straight_table)
}

pub fn is_knitted_straight_wait(standing_tiles: &[Tile]) -> bool {
    count_useful_tiles(&knitted_straight_waiting(standing_tiles)) != 0
}

pub fn is_knitted_straight_win(standing_tiles: &[Tile], t: Tile) -> bool {
    (standing_tiles.len() == HAND_SIZE || standing_tiles.len() == HAND_SIZE - 3)
        && is_win_with(standing_tiles, t, is_knitted_straight_table)
}

#[cfg(test)]
fn tiles(exp: &str) -> Vec<Tile> {
    crate::convert::notation::parse_tiles(exp).unwrap()
}

#[cfg(test)]
fn waits(ut: &UsefulTable) -> String {
    crate::convert::notation::format_tiles(&useful_tiles(ut))
}

#[test]
fn test_regular_win() {
    assert!(is_regular_win_table(&tiles_to_tile_table(&tiles("11122233344455m"))));
    assert!(is_regular_win_table(&tiles_to_tile_table(&tiles("123m456s789pEEECC"))));
    assert!(is_regular_win_table(&tiles_to_tile_table(&tiles("99s"))));
    assert!(!is_regular_win_table(&tiles_to_tile_table(&tiles("123m456s789pESWNN"))));
    assert!(!is_regular_win_table(&tiles_to_tile_table(&tiles("11m22s"))));

    assert!(is_regular_win(&tiles("1112345678999s"), Tile::new(SUIT_BAMBOO, 5)));
    assert!(!is_regular_win(&tiles("1112345678999s"), Tile::new(SUIT_DOTS, 5)));
}

#[test]
fn test_regular_waiting() {
    // 九蓮宝燈の形は同じ種別のすべての牌で和了
    assert_eq!(waits(&regular_waiting(&tiles("1112345678999s"))), "123456789s");
    assert_eq!(waits(&regular_waiting(&tiles("23m456s789pEEECC"))), "14m");
    assert_eq!(waits(&regular_waiting(&tiles("13m456s789pEEECC"))), "2m");
    // 4枚使いの牌は待ち牌にならない
    assert_eq!(waits(&regular_waiting(&tiles("1111m"))), "");
    assert!(is_waiting(&tiles("5p")));
    assert!(!is_waiting(&tiles("19m19s19pESWNCFP")));
}

#[test]
fn test_special_waiting() {
    let hand = tiles("1199m1199sEESSC");
    assert!(is_seven_pairs_wait(&hand));
    assert_eq!(waits(&seven_pairs_waiting(&hand)), "C");
    assert!(is_seven_pairs_win(&hand, Tile::new(SUIT_HONORS, DC)));

    let hand = tiles("19m19s19pESWNCFP");
    assert_eq!(waits(&thirteen_orphans_waiting(&hand)), "19m19s19pESWNCFP");
    let hand = tiles("19m19s19pESWNCCF");
    assert_eq!(waits(&thirteen_orphans_waiting(&hand)), "P");

    let hand = tiles("147m258s36pESWNC");
    assert!(is_honors_and_knitted_wait(&hand));
    assert_eq!(waits(&honors_and_knitted_waiting(&hand)), "9pFP");

    let hand = tiles("147m258s369p1234m");
    assert!(is_knitted_straight_wait(&hand));
    assert!(is_knitted_straight_win(&hand, Tile::new(SUIT_CHARACTERS, 1)));
    assert!(is_knitted_straight_win(&hand, Tile::new(SUIT_CHARACTERS, 4)));
    assert!(!is_knitted_straight_win(&hand, Tile::new(SUIT_CHARACTERS, 9)));
}
