// 基本形 (4面子1雀頭) の分解結果ごとの点数計算
use super::adjust::*;
use super::divide::Division;
use super::group::*;
use super::special::{is_nine_gates, is_nine_gates_blessing_of_heaven};
use crate::model::*;

use Fan::*;

// 和了牌を含む手牌全体 (副露の槓子は4枚)
pub fn all_tiles(param: &CalculateParam) -> Vec<Tile> {
    let mut tiles = param.hand.standing_tiles.clone();
    for p in &param.hand.fixed_packs {
        tiles.extend(p.tiles());
    }
    tiles.push(param.win_tile);
    tiles
}

// waiting: 和了牌を除いた立牌の待ち牌 (門前の場合は七対の待ちを含む)
pub fn calculate_basic_form(
    division: &Division,
    param: &CalculateParam,
    waiting: &UsefulTable,
) -> FanTable {
    let hand = &param.hand;
    let fixed_cnt = hand.fixed_packs.len();
    let flags = param.win_flags;
    let self_drawn = flags.is_self_drawn();
    let win_tile = param.win_tile;

    let mut packs = *division;
    let pair = packs[PACK];

    // 栄和の場合, 和了牌で暗順子が作れなければ和了牌を含む暗刻は明刻として扱う
    if !self_drawn {
        let in_chow = packs[fixed_cnt..PACK]
            .iter()
            .any(|p| p.is_chow() && p.contains(win_tile));
        if !in_chow {
            for p in packs[fixed_cnt..PACK].iter_mut() {
                if p.pack_type() == PackType::Pung && p.tile() == win_tile {
                    *p = p.with_offer(1);
                    break;
                }
            }
        }
    }

    let mut chows = vec![];
    let mut pungs = vec![];
    for &p in &packs[..PACK] {
        if p.is_chow() {
            chows.push(p.tile());
        } else {
            pungs.push(p);
        }
    }
    chows.sort();

    let mut ft = FanTable::new();
    calculate_kongs(&pungs, &param.rule, &mut ft);

    let mut pung_tiles: Vec<Tile> = pungs.iter().map(|p| p.tile()).collect();
    pung_tiles.sort();
    match (chows.as_slice(), pung_tiles.as_slice()) {
        (&[a, b, c, d], []) => {
            let ts = [a, b, c, d];
            if is_three_suited_terminal_chows(&ts, pair.tile()) {
                ft[ThreeSuitedTerminalChows] = 1;
            } else if is_pure_terminal_chows(&ts, pair.tile()) {
                ft[PureTerminalChows] = 1;
            } else {
                calculate_4_chows(&ts, &mut ft);
            }
        }
        (&[a, b, c], _) => calculate_3_chows(&[a, b, c], &mut ft),
        (&[a, b], &[c, d]) => {
            calculate_2_chows(&[a, b], &mut ft);
            calculate_2_pungs(&[c, d], &mut ft);
        }
        (_, &[a, b, c]) => calculate_3_pungs(&[a, b, c], &mut ft),
        (_, &[a, b, c, d]) => calculate_4_pungs(&[a, b, c, d], &mut ft),
        _ => {}
    }

    // 九蓮宝燈
    if fixed_cnt == 0 {
        let tt = hand.standing_table();
        let mut tt_with_win = tt;
        inc_tile(&mut tt_with_win, win_tile);
        let blessing = param.rule.nine_gates_when_blessing_of_heaven
            && flags.contains(WinFlags::INIT)
            && self_drawn
            && is_nine_gates_blessing_of_heaven(&tt_with_win);
        if is_nine_gates(&tt) || blessing {
            ft[NineGates] = 1;
        }
    }

    adjust_by_self_drawn(&hand.fixed_packs, self_drawn, &mut ft);
    adjust_by_pair_tile(pair.tile(), chows.len(), &mut ft);
    adjust_by_packs_traits(&packs, &mut ft);

    let tiles = all_tiles(param);
    adjust_by_suits(&tiles, &mut ft);
    adjust_by_rank_range(&tiles, &param.rule, &mut ft);
    adjust_by_tiles_traits(&tiles, &mut ft);
    let kong_cnt = pungs.iter().filter(|p| p.pack_type() == PackType::Kong).count();
    adjust_by_tiles_hog(&tiles, kong_cnt, &mut ft);

    adjust_by_waiting_form(&packs[fixed_cnt..], waiting, win_tile, &mut ft);

    for p in &pungs {
        if p.tile().is_winds() {
            adjust_by_winds(p.tile(), param.prevalent_wind, param.seat_wind, &mut ft);
        }
    }
    adjust_by_win_flags(flags, &mut ft);

    final_adjust(&param.rule, &mut ft);
    if ft.is_empty() {
        ft[ChickenHand] = 1;
    }
    ft
}

#[cfg(test)]
fn calc(exp: &str, flags: WinFlags) -> Vec<FanTable> {
    use super::divide::divide_win_hand;
    use super::wait::regular_waiting;

    let (hand, win) = crate::convert::notation::parse_win_hand(exp).unwrap();
    let mut param = CalculateParam::new(hand, win);
    param.win_flags = flags;
    let waiting = regular_waiting(&param.hand.standing_tiles);
    let mut tiles = param.hand.standing_tiles.clone();
    tiles.push(win);
    divide_win_hand(&tiles, &param.hand.fixed_packs)
        .iter()
        .map(|d| calculate_basic_form(d, &param, &waiting))
        .collect()
}

#[test]
fn test_concealed_pung_by_discard() {
    // 栄和の和了牌で完成した刻子は暗刻に数えない
    let fts = calc("[123p1]22m555s777p99m,2m", WinFlags::DISCARD);
    assert_eq!(fts.len(), 1);
    assert_eq!(fts[0][TwoConcealedPungs], 1);
    assert_eq!(fts[0][ThreeConcealedPungs], 0);

    let fts = calc("[123p1]22m555s777p99m,2m", WinFlags::SELF_DRAWN);
    assert_eq!(fts[0][ThreeConcealedPungs], 1);
    assert_eq!(fts[0][TwoConcealedPungs], 0);
}

#[test]
fn test_chicken_hand() {
    let fts = calc("[123p1][789s2][456m3]EEEW,W", WinFlags::DISCARD);
    assert_eq!(fts.len(), 1);
    assert!(fts[0].has(PrevalentWind) && fts[0].has(SingleWait));
    assert!(!fts[0].has(PungOfTerminalsOrHonors));

    let fts = calc("[123p1][789s2][345m3]EE77m,7m", WinFlags::DISCARD);
    assert_eq!(fts[0].iter().collect::<Vec<_>>(), vec![(ChickenHand, 1)]);
}

#[test]
fn test_nine_gates_form() {
    // 11/123/456/789/999の1通りのみ (7sが1枚なので111/234/567/789/99は不可)
    let fts = calc("1112345678999s,9s", WinFlags::DISCARD);
    assert_eq!(fts.len(), 1);
    let ft = &fts[0];
    // 幺九刻は九蓮宝燈で1つ減算, 9sの4枚目は四帰一
    assert_eq!(
        ft.iter().collect::<Vec<_>>(),
        vec![(NineGates, 1), (PureStraight, 1), (TileHog, 1)]
    );
    assert_eq!(ft[PungOfTerminalsOrHonors], 0);
    assert_eq!(ft.total(), 88 + 16 + 2);
}
