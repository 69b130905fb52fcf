// 打牌候補ごとの向聴数と有効牌の列挙
use super::shanten::{ShapeFlags, SHAPES};
use crate::model::*;

#[derive(Debug, Clone)]
pub struct DiscardResult {
    pub discard_tile: Tile, // 打牌 (ツモ牌がない場合はZ8)
    pub shape: ShapeFlags,
    pub shanten: i32, // ツモ牌で和了の場合は-1
    pub useful_table: UsefulTable,
}

// 打牌後の手牌(立牌)について形ごとに評価し, callbackがfalseを返した時点で終了
// 戻り値はcallbackで中断した場合false
fn enum_shapes<F>(
    standing_tiles: &[Tile],
    discard_tile: Tile,
    win_tile: Option<Tile>,
    flags: ShapeFlags,
    callback: &mut F,
) -> bool
where
    F: FnMut(&DiscardResult) -> bool,
{
    for (shape, calc) in SHAPES {
        if !flags.contains(shape) {
            continue;
        }
        let (mut shanten, useful_table) = calc(standing_tiles);
        if shanten == i32::MAX {
            continue;
        }
        if let Some(t) = win_tile {
            if shanten == 0 && useful_table[t.index()] {
                shanten = -1;
            }
        }
        let res = DiscardResult {
            discard_tile,
            shape,
            shanten,
            useful_table,
        };
        if !callback(&res) {
            return false;
        }
    }
    true
}

// hand: 立牌が3k+1枚の手牌, drawn_tile: ツモ牌
// ツモ切りを先に評価し, その後は立牌の各種類を1枚ずつ打牌
pub fn enum_discard_tile<F>(hand: &Hand, drawn_tile: Option<Tile>, flags: ShapeFlags, mut callback: F)
where
    F: FnMut(&DiscardResult) -> bool,
{
    let standing = &hand.standing_tiles;
    let discard = drawn_tile.unwrap_or(Z8);
    if !enum_shapes(standing, discard, drawn_tile, flags, &mut callback) {
        return;
    }

    let Some(drawn) = drawn_tile else {
        return;
    };
    let tt = tiles_to_tile_table(standing);
    if tt[drawn.index()] as usize >= TILE {
        return;
    }
    for (i, &n) in tt.iter().enumerate() {
        let t = Tile::from_index(i);
        if n == 0 || t == drawn {
            continue;
        }
        // 打牌tの代わりにツモ牌を立牌に加える
        let mut tiles = standing.clone();
        if let Some(pos) = tiles.iter().position(|&x| x == t) {
            tiles[pos] = drawn;
        }
        tiles.sort();
        if !enum_shapes(&tiles, t, None, flags, &mut callback) {
            return;
        }
    }
}

#[cfg(test)]
fn results(exp: &str, drawn: &str, flags: ShapeFlags) -> Vec<DiscardResult> {
    let (hand, _) = crate::convert::notation::parse_hand(exp).unwrap();
    let drawn = Tile::from_symbol(drawn);
    let mut res = vec![];
    enum_discard_tile(&hand, drawn, flags, |r| {
        res.push(r.clone());
        true
    });
    res
}

#[test]
fn test_discard_win() {
    // ツモ牌で和了
    let res = results("1112345678999s", "5s", ShapeFlags::REGULAR);
    assert_eq!(res[0].discard_tile, Tile::new(SUIT_BAMBOO, 5));
    assert_eq!(res[0].shanten, -1);
    // 1s~9sのうちツモ牌以外の8種
    assert_eq!(res.len(), 1 + 8);
    assert!(res[1..].iter().all(|r| r.shanten >= 0));
}

#[test]
fn test_discard_order() {
    let res = results("123m456s789p1mEEC", "C", ShapeFlags::REGULAR);
    let discards: Vec<String> = res.iter().map(|r| r.discard_tile.to_string()).collect();
    assert_eq!(discards, ["C", "1m", "2m", "3m", "4s", "5s", "6s", "7p", "8p", "9p", "E"]);
    // 1mを切ると聴牌 (ECの双碰)
    let r = &res[1];
    assert_eq!(r.shanten, 0);
    assert!(r.useful_table[Tile::new(SUIT_HONORS, WE).index()]);
}

#[test]
fn test_discard_stop() {
    let mut cnt = 0;
    let (hand, _) = crate::convert::notation::parse_hand("123m456s789p1mEEC").unwrap();
    enum_discard_tile(&hand, Tile::from_symbol("C"), ShapeFlags::ALL, |_| {
        cnt += 1;
        cnt < 3
    });
    assert_eq!(cnt, 3);

    // ツモ牌なし
    let res = results("123m456s789p1mEEC", "", ShapeFlags::ALL);
    assert!(res.iter().all(|r| r.discard_tile == Z8));
    assert!(!res.is_empty());
}
