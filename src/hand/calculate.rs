// 和了形の番数計算
use super::basic::calculate_basic_form;
use super::divide::divide_win_hand;
use super::special::*;
use super::wait::{regular_waiting, seven_pairs_waiting};
use crate::error::CalcError;
use crate::model::*;

use Fan::*;

// 同じ番数の場合の優先順位 (一色三同順, 七対, 三同刻)
fn selection_key(ft: &FanTable) -> (i32, bool, bool, bool) {
    (ft.total(), ft.has(PureTripleChow), ft.has(SevenPairs), ft.has(TriplePung))
}

// 最大のものを採用 (同点の場合は先に見つかったもの)
fn select_best(candidates: Vec<FanTable>) -> Option<FanTable> {
    let mut best: Option<FanTable> = None;
    for ft in candidates {
        let replace = match &best {
            Some(b) => selection_key(&ft) > selection_key(b),
            None => true,
        };
        if replace {
            best = Some(ft);
        }
    }
    best
}

// 和了の状況のうち手牌と矛盾するものを取り除く
fn correct_win_flags(param: &CalculateParam) -> WinFlags {
    let mut flags = param.win_flags;
    let hand = &param.hand;
    let win_tile = param.win_tile;
    let in_standing = hand.standing_tiles.contains(&win_tile);

    // 手の内にある牌は絶張にならない
    if in_standing {
        flags.remove(WinFlags::FOURTH_TILE);
    }
    if flags.contains(WinFlags::ABOUT_KONG) {
        if flags.is_self_drawn() {
            // 槓子がなければ槓上開花にならない
            if !hand.fixed_packs.iter().any(|p| p.pack_type() == PackType::Kong) {
                flags.remove(WinFlags::ABOUT_KONG);
            }
        } else {
            // 搶槓和は加槓された牌を自分で使っていない場合のみ
            let in_fixed = hand.fixed_packs.iter().any(|p| p.contains(win_tile));
            if in_standing || in_fixed {
                flags.remove(WinFlags::ABOUT_KONG);
            }
        }
    }
    flags
}

// 番種の表と合計番数 (花牌を含む) を返却
pub fn calculate_fan(param: &CalculateParam) -> Result<(FanTable, i32), CalcError> {
    let hand = &param.hand;
    if hand.fixed_packs.len() > PACK || hand.tile_count() != HAND_SIZE || param.win_tile.is_none()
    {
        return Err(CalcError::WrongTileCount);
    }
    let mut tt = hand.tile_table();
    inc_tile(&mut tt, param.win_tile);
    if tt.iter().any(|&n| n as usize > TILE) {
        return Err(CalcError::TileCountGreaterThan4);
    }

    let mut param = param.clone();
    param.win_flags = correct_win_flags(&param);
    let param = &param;

    // 特殊形
    let mut candidates = vec![];
    candidates.extend(calculate_thirteen_orphans(param));
    candidates.extend(calculate_honors_and_knitted(param));
    candidates.extend(calculate_knitted_straight(param));
    candidates.extend(calculate_seven_pairs(param));

    // 基本形
    let mut standing = hand.standing_tiles.clone();
    standing.push(param.win_tile);
    let divisions = divide_win_hand(&standing, &hand.fixed_packs);
    if !divisions.is_empty() {
        let mut waiting = regular_waiting(&hand.standing_tiles);
        if hand.fixed_packs.is_empty() {
            let sp = seven_pairs_waiting(&hand.standing_tiles);
            for i in 0..TILE_KIND {
                waiting[i] |= sp[i];
            }
        }
        for d in &divisions {
            candidates.push(calculate_basic_form(d, param, &waiting));
        }
    }

    let mut ft = select_best(candidates).ok_or(CalcError::NotWin)?;

    if param.flower_count > 0 {
        ft[FlowerTiles] = param.flower_count;
    }
    let total = ft.total();
    Ok((ft, total))
}

#[cfg(test)]
fn calc(exp: &str, winds: (Rank, Rank), flags: WinFlags) -> Result<(FanTable, i32), CalcError> {
    let (hand, win) = crate::convert::notation::parse_win_hand(exp).unwrap();
    let mut param = CalculateParam::new(hand, win);
    param.prevalent_wind = winds.0;
    param.seat_wind = winds.1;
    param.win_flags = flags;
    calculate_fan(&param)
}

#[test]
fn test_big_four_winds() {
    let (ft, total) = calc("EEEWWWSSSNNCC,N", (WE, WS), WinFlags::DISCARD).unwrap();
    assert!(ft.has(BigFourWinds));
    for f in [
        BigThreeWinds,
        AllPungs,
        SeatWind,
        PrevalentWind,
        PungOfTerminalsOrHonors,
        LittleFourWinds,
    ] {
        assert!(!ft.has(f), "{}", f);
    }
    // 大四喜 + 字一色 + 三暗刻 (栄和のNNNは明刻) + 門前清
    assert_eq!(
        ft.iter().collect::<Vec<_>>(),
        vec![(BigFourWinds, 1), (AllHonors, 1), (ThreeConcealedPungs, 1), (ConcealedHand, 1)]
    );
    assert_eq!(total, 88 + 64 + 16 + 2);
}

#[test]
fn test_nine_gates() {
    let (ft, total) = calc("1112345678999s,9s", (WE, WE), WinFlags::DISCARD).unwrap();
    assert!(ft.has(NineGates) && ft.has(PureStraight));
    assert_eq!(total, 88 + 16 + 2);

    // 5m待ち: 111/234/55/678/999の2暗刻と幺九刻(九蓮宝燈で1つ減算)
    let (ft, total) = calc("1112345678999m,5m", (WE, WE), WinFlags::DISCARD).unwrap();
    assert_eq!(
        ft.iter().collect::<Vec<_>>(),
        vec![(NineGates, 1), (TwoConcealedPungs, 1), (PungOfTerminalsOrHonors, 1)]
    );
    assert_eq!(total, 91);

    // 天和の場合は14枚目を含めて判定
    let rule = RuleSet {
        nine_gates_when_blessing_of_heaven: true,
        ..Default::default()
    };
    let (hand, win) = crate::convert::notation::parse_win_hand("1112345679999s,8s").unwrap();
    let mut param = CalculateParam::new(hand, win);
    param.win_flags = WinFlags::SELF_DRAWN | WinFlags::INIT;
    let (ft, _) = calculate_fan(&param).unwrap();
    assert!(!ft.has(NineGates));
    param.rule = rule;
    let (ft, _) = calculate_fan(&param).unwrap();
    assert!(ft.has(NineGates));
}

#[test]
fn test_wrong_tile_count() {
    use crate::convert::notation::parse_hand;

    for exp in [
        "123m456s789pEEE",
        "[123m1]456s789pEEE",
        "[123m1][456s1]789pEEE",
        "[123m1][456s1][789p1]EEE",
        "[123m1][456s1][789p1][EEE1]",
    ] {
        let (hand, _) = parse_hand(exp).unwrap();
        let param = CalculateParam::new(hand, Tile::new(SUIT_HONORS, WE));
        assert_eq!(calculate_fan(&param), Err(CalcError::WrongTileCount), "{}", exp);
    }

    let (hand, _) = parse_hand("123m456s789p1mEEE").unwrap();
    assert_eq!(calculate_fan(&CalculateParam::new(hand, Z8)), Err(CalcError::WrongTileCount));
}

#[test]
fn test_not_win() {
    assert_eq!(
        calc("123m456s789p1mEEC,N", (WE, WE), WinFlags::DISCARD),
        Err(CalcError::NotWin)
    );

    let tiles = crate::convert::notation::parse_tiles("1111m456s789pEEE").unwrap();
    let param = CalculateParam::new(Hand::new(vec![], tiles), Tile::new(SUIT_CHARACTERS, 1));
    assert_eq!(calculate_fan(&param), Err(CalcError::TileCountGreaterThan4));
}

#[test]
fn test_seven_pairs_or_basic() {
    // 七対と一色双龍会は番数の大きい方
    let (ft, total) = calc("1122335577889s,9s", (WE, WE), WinFlags::DISCARD).unwrap();
    assert_eq!(
        ft.iter().collect::<Vec<_>>(),
        vec![(PureTerminalChows, 1), (ConcealedHand, 1)]
    );
    // 6s9s待ちなので待ちの番は付かない
    assert_eq!(total, 64 + 2);

    // 七対は門前清を含み, 自摸は加算
    let (ft, total) = calc("1133m55s77pEESSC,C", (WE, WE), WinFlags::SELF_DRAWN).unwrap();
    assert_eq!(
        ft.iter().collect::<Vec<_>>(),
        vec![(SevenPairs, 1), (AllTypes, 1), (SelfDrawn, 1)]
    );
    assert_eq!(total, 24 + 6 + 1);
}

#[test]
fn test_overlapping_divisions() {
    // 111222333mは一色三同順(24)と一色三節高(24)のどちらにも分解できる
    // 刻子の分解は三暗刻と幺九刻が加わるので番数が大きい
    let (ft, total) = calc("123m123m123m456p9s,9s", (WE, WE), WinFlags::DISCARD).unwrap();
    assert!(ft.has(PureShiftedPungs) && ft.has(ThreeConcealedPungs));
    assert!(!ft.has(PureTripleChow));
    assert_eq!(total, 45);

    assert_eq!(calc("111m111s111p999m9s,9s", (WE, WE), WinFlags::DISCARD).map(|r| r.1), Ok(145));
    assert_eq!(calc("123m456m789m123s5s,5s", (WE, WE), WinFlags::DISCARD).map(|r| r.1), Ok(23));
    assert_eq!(calc("[CCC1][FFF1]PP123m99s,P", (WE, WE), WinFlags::DISCARD).map(|r| r.1), Ok(92));
}

#[test]
fn test_select_best() {
    let table = |fans: &[Fan]| {
        let mut ft = FanTable::new();
        for &f in fans {
            ft[f] = 1;
        }
        ft
    };
    // いずれも24番
    let triple_chow = table(&[PureTripleChow]);
    let seven_pairs = table(&[SevenPairs]);
    let triple_pung = table(&[TriplePung, MixedStraight]);
    let other = table(&[FullFlush]);
    let other2 = table(&[AllEvenPungs]);
    for ft in [&triple_chow, &seven_pairs, &triple_pung, &other, &other2] {
        assert_eq!(ft.total(), 24);
    }

    let best = |v: &[&FanTable]| select_best(v.iter().map(|&ft| ft.clone()).collect());
    assert_eq!(best(&[&other, &triple_pung, &seven_pairs, &triple_chow]), Some(triple_chow.clone()));
    assert_eq!(best(&[&triple_chow, &seven_pairs, &other]), Some(triple_chow.clone()));
    assert_eq!(best(&[&other, &triple_pung, &seven_pairs]), Some(seven_pairs.clone()));
    assert_eq!(best(&[&other, &triple_pung]), Some(triple_pung.clone()));
    // 完全に同点の場合は先のもの
    assert_eq!(best(&[&other, &other2]), Some(other.clone()));
    assert_eq!(best(&[&other2, &other]), Some(other2.clone()));
    // 番数が大きければ優先順位に関係なく採用
    let bigger = table(&[FullFlush, SelfDrawn]);
    assert_eq!(best(&[&triple_chow, &bigger]), Some(bigger.clone()));
    assert_eq!(best(&[]), None);
}

#[test]
fn test_win_flags_correction() {
    // 和了牌が手の内にある場合は和絶張にならない
    let flags = WinFlags::DISCARD | WinFlags::FOURTH_TILE;
    let (ft, _) = calc("[123p1][456s1]78911mEE,1m", (WE, WS), flags).unwrap();
    assert!(!ft.has(LastTile));
    let (ft, _) = calc("[123p1][456s1]78m11mEEE,9m", (WE, WS), flags).unwrap();
    assert!(ft.has(LastTile));

    // 槓子がない場合は槓上開花にならない
    let flags = WinFlags::SELF_DRAWN | WinFlags::ABOUT_KONG;
    let (ft, _) = calc("[123p1][456s1]78911mEE,1m", (WE, WS), flags).unwrap();
    assert!(!ft.has(OutWithReplacementTile));
    let (ft, _) = calc("[1111p1][456s1]78911mEE,1m", (WE, WS), flags).unwrap();
    assert!(ft.has(OutWithReplacementTile) && !ft.has(SelfDrawn));
}

#[test]
fn test_flowers_and_determinism() {
    let (hand, win) = crate::convert::notation::parse_win_hand("123m456s789pEEEC,C").unwrap();
    let mut param = CalculateParam::new(hand, win);
    param.flower_count = 3;
    let (ft, total) = calculate_fan(&param).unwrap();
    assert_eq!(ft[FlowerTiles], 3);
    for _ in 0..10 {
        assert_eq!(calculate_fan(&param), Ok((ft.clone(), total)));
    }
}

#[test]
fn test_calculate_in_threads() {
    let exps = ["EEEWWWSSSNNCC,N", "1112345678999s,9s", "123m456s789pEEEC,C", "22334455667788s"];
    let handles: Vec<_> = exps
        .iter()
        .map(|&exp| {
            std::thread::spawn(move || {
                let (hand, win) = crate::convert::notation::parse_win_hand(exp).unwrap();
                calculate_fan(&CalculateParam::new(hand, win)).map(|(_, total)| total)
            })
        })
        .collect();
    let totals: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for (exp, total) in exps.iter().zip(totals) {
        let (hand, win) = crate::convert::notation::parse_win_hand(exp).unwrap();
        let expected = calculate_fan(&CalculateParam::new(hand, win)).map(|(_, t)| t);
        assert_eq!(total, expected);
    }
}
