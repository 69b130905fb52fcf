use crate::model::*;

// 和了形の分解結果 (副露が先頭, 末尾が雀頭)
pub type Division = [Pack; PACK + 1];

// 分解結果の最大数 (正しい手牌ではこれを超えない)
const MAX_DIVISION_CNT: usize = 20;

// 面子の順序付けに使用するキー (構成牌の34種Index)
type PackKey = (Index, Index, Index);

fn pung_key(i: Index) -> PackKey {
    (i, i, i)
}

fn chow_key(i: Index) -> PackKey {
    (i, i + 1, i + 2)
}

// 順子の先頭にできる牌か (数牌の1~7)
#[inline]
fn can_start_chow(i: Index) -> bool {
    i < 27 && i % 9 < 7
}

// 立牌(和了牌を含む)と副露から雀頭+4面子への分解をすべて列挙
// 分解できない場合は空
pub fn divide_win_hand(standing_tiles: &[Tile], fixed_packs: &[Pack]) -> Vec<Division> {
    let fixed_cnt = fixed_packs.len();
    if fixed_cnt > PACK || standing_tiles.len() != 14 - fixed_cnt * 3 {
        return vec![];
    }

    let mut tt = tiles_to_tile_table(standing_tiles);
    let mut work = Division::default();
    work[..fixed_cnt].copy_from_slice(fixed_packs);

    let mut res = vec![];
    divide_recursively(&mut tt, fixed_cnt, fixed_cnt, None, &mut work, &mut res);
    res
}

fn divide_recursively(
    tt: &mut TileTable,
    fixed_cnt: usize,
    step: usize,
    prev: Option<PackKey>,
    work: &mut Division,
    res: &mut Vec<Division>,
) {
    if step == PACK {
        // 残りが雀頭1組だけであれば分解完了
        let mut pair = None;
        for (i, &n) in tt.iter().enumerate() {
            match n {
                0 => {}
                2 if pair.is_none() => pair = Some(i),
                _ => return,
            }
        }
        if let Some(i) = pair {
            work[PACK] = Pack::new(0, PackType::Pair, Tile::from_index(i));
            record_division(work, fixed_cnt, res);
        }
        return;
    }

    for i in 0..TILE_KIND {
        if tt[i] == 0 {
            continue;
        }

        // 刻子: 直前の面子より真に大きい場合のみ
        let key = pung_key(i);
        if tt[i] >= 3 && prev.map_or(true, |p| key > p) {
            tt[i] -= 3;
            work[step] = Pack::new(0, PackType::Pung, Tile::from_index(i));
            divide_recursively(tt, fixed_cnt, step + 1, Some(key), work, res);
            tt[i] += 3;
        }

        // 順子: 同じ順子は繰り返し選べるので直前の面子以上
        let key = chow_key(i);
        if can_start_chow(i)
            && tt[i + 1] > 0
            && tt[i + 2] > 0
            && prev.map_or(true, |p| key >= p)
        {
            tt[i] -= 1;
            tt[i + 1] -= 1;
            tt[i + 2] -= 1;
            work[step] = Pack::new(0, PackType::Chow, Tile::from_index(i + 1));
            divide_recursively(tt, fixed_cnt, step + 1, Some(key), work, res);
            tt[i] += 1;
            tt[i + 1] += 1;
            tt[i + 2] += 1;
        }
    }
}

// 副露以外の部分を整列して重複がなければ記録
fn record_division(work: &Division, fixed_cnt: usize, res: &mut Vec<Division>) {
    let mut d = *work;
    d[fixed_cnt..PACK].sort();
    if res.contains(&d) {
        return;
    }
    debug_assert!(res.len() < MAX_DIVISION_CNT, "too many divisions");
    res.push(d);
}

#[cfg(test)]
fn divide(exp: &str) -> Vec<Division> {
    let (hand, win) = crate::convert::notation::parse_hand(exp).unwrap();
    let mut tiles = hand.standing_tiles.clone();
    tiles.extend(win);
    divide_win_hand(&tiles, &hand.fixed_packs)
}

#[test]
fn test_divide_triple() {
    // 刻子3つと順子3つの2通り
    let divs = divide("111222333m456p77s");
    assert_eq!(divs.len(), 2);
    for d in &divs {
        assert_eq!(d[PACK], Pack::new(0, PackType::Pair, Tile::new(SUIT_BAMBOO, 7)));
    }
    let pungs = divs[0].iter().filter(|p| p.pack_type() == PackType::Pung).count();
    let chows = divs[1].iter().filter(|p| p.pack_type() == PackType::Chow).count();
    assert_eq!((pungs, chows), (3, 4));
}

#[test]
fn test_divide_with_fixed() {
    let divs = divide("[123p1][345s2][999s3]6m6pEW1m");
    assert!(divs.is_empty());

    let divs = divide("[123p1][345s2]{EEEE}456m9s,9s");
    assert_eq!(divs.len(), 1);
    assert_eq!(divs[0][2], Pack::new(0, PackType::Kong, Tile::new(SUIT_HONORS, WE)));
    assert_eq!(divs[0][3], Pack::new(0, PackType::Chow, Tile::new(SUIT_CHARACTERS, 5)));
}

#[test]
fn test_divide_unique() {
    for exp in [
        "1112345678999m,5m",
        "11122233344455m",
        "22333444556677p",
        "1111222233334m,4m",
    ] {
        let divs = divide(exp);
        assert!(!divs.is_empty(), "{}", exp);
        for (i, a) in divs.iter().enumerate() {
            for b in &divs[i + 1..] {
                let mut a = a.to_vec();
                let mut b = b.to_vec();
                a.sort();
                b.sort();
                assert_ne!(a, b, "{}", exp);
            }
        }
    }
}

#[test]
fn test_divide_not_win() {
    assert!(divide("1234567m1234567p").is_empty());
    assert!(divide("19m19s19pESWNCFPP").is_empty());
}
