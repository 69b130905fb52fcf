// 手牌全体の特徴による番種の加算と, 最後にまとめて行う不計の調整
use crate::model::*;

use Fan::*;

// 鳴いた面子の数による調整 (不求人, 門前清, 全求人, 自摸)
pub fn adjust_by_self_drawn(fixed_packs: &[Pack], self_drawn: bool, ft: &mut FanTable) {
    let melded_cnt = fixed_packs.iter().filter(|p| p.is_melded()).count();
    match melded_cnt {
        0 => ft[if self_drawn { FullyConcealedHand } else { ConcealedHand }] = 1,
        PACK => ft[if self_drawn { SelfDrawn } else { MeldedHand }] = 1,
        _ => {
            if self_drawn {
                ft[SelfDrawn] = 1;
            }
        }
    }
}

// 雀頭による調整 (平和, 小三元, 小四喜)
pub fn adjust_by_pair_tile(pair: Tile, chow_cnt: usize, ft: &mut FanTable) {
    if chow_cnt == PACK {
        if pair.is_numbered_suit() {
            ft[AllChows] = 1;
        }
        return;
    }

    if ft.has(TwoDragonsPungs) {
        if pair.is_dragons() {
            ft[LittleThreeDragons] = 1;
            ft[TwoDragonsPungs] = 0;
        }
        return;
    }

    if ft.has(BigThreeWinds) && pair.is_winds() {
        ft[LittleFourWinds] = 1;
        ft[BigThreeWinds] = 0;
    }
}

// 全ての面子と雀頭の特徴による調整 (全帯幺, 全帯五, 全双刻)
pub fn adjust_by_packs_traits(packs: &[Pack], ft: &mut FanTable) {
    let (mut terminal, mut five, mut even) = (0, 0, 0);
    for p in packs {
        let t = p.tile();
        if !t.is_numbered_suit() {
            terminal += 1;
            continue;
        }
        let r = t.rank();
        if p.is_chow() {
            // 中央が2,8の順子は1,9を含む
            if r == 2 || r == 8 {
                terminal += 1;
            } else if (4..=6).contains(&r) {
                five += 1;
            }
        } else if r == 1 || r == 9 {
            terminal += 1;
        } else if r == 5 {
            five += 1;
        } else if r % 2 == 0 {
            even += 1;
        }
    }

    if terminal == packs.len() {
        ft[OutsideHand] = 1;
    } else if five == packs.len() {
        ft[AllFive] = 1;
    } else if even == packs.len() {
        ft[AllEvenPungs] = 1;
    }
}

// 種別による調整 (無字, 缺一門, 混一色, 清一色, 五門斉)
pub fn adjust_by_suits(tiles: &[Tile], ft: &mut FanTable) {
    let mut has = [false; 5];
    for t in tiles {
        has[t.suit() as usize] = true;
    }
    let has_honor = has[SUIT_HONORS as usize];
    if !has_honor {
        ft[NoHonors] = 1;
    }

    let voided = (SUIT_CHARACTERS..=SUIT_DOTS).filter(|&s| !has[s as usize]).count();
    match voided {
        0 => {
            // 3種の数牌と風牌, 三元牌
            if tiles.iter().any(|t| t.is_winds()) && tiles.iter().any(|t| t.is_dragons()) {
                ft[AllTypes] = 1;
            }
        }
        1 => ft[OneVoidedSuit] = 1,
        2 => ft[if has_honor { HalfFlush } else { FullFlush }] = 1,
        _ => {}
    }
}

// 牌の特徴による調整 (断幺, 推不倒, 緑一色, 字一色, 清幺九, 混幺九)
pub fn adjust_by_tiles_traits(tiles: &[Tile], ft: &mut FanTable) {
    if tiles.iter().all(|t| !t.is_terminal_or_honor()) {
        ft[AllSimples] = 1;
    }
    if tiles.iter().all(|t| t.is_reversible()) {
        ft[ReversibleTiles] = 1;
    }
    if tiles.iter().all(|t| t.is_green()) {
        ft[AllGreen] = 1;
    }
    if ft.has(AllSimples) {
        return;
    }

    if tiles.iter().all(|t| t.is_honor()) {
        ft[AllHonors] = 1;
    } else if tiles.iter().all(|t| t.is_terminal()) {
        ft[AllTerminals] = 1;
    } else if tiles.iter().all(|t| t.is_terminal_or_honor()) {
        ft[AllTerminalsAndHonors] = 1;
    }
}

// 数牌の範囲による調整 (全大, 全中, 全小, 大于五, 小于五)
pub fn adjust_by_rank_range(tiles: &[Tile], rule: &RuleSet, ft: &mut FanTable) {
    // 98年版の七対は重複させない
    if rule.strict_98_rule && ft.has(SevenPairs) {
        return;
    }
    if tiles.iter().any(|t| t.is_honor()) {
        return;
    }

    let min = tiles.iter().map(|t| t.rank()).min().unwrap_or(0);
    let max = tiles.iter().map(|t| t.rank()).max().unwrap_or(0);
    if max <= 4 {
        ft[if max == 4 { LowerFour } else { LowerTiles }] = 1;
    } else if min >= 6 {
        ft[if min == 6 { UpperFour } else { UpperTiles }] = 1;
    } else if min >= 4 && max <= 6 {
        ft[MiddleTiles] = 1;
    }
}

// 四帰一 (槓子として使っていない4枚)
pub fn adjust_by_tiles_hog(tiles: &[Tile], kong_cnt: usize, ft: &mut FanTable) {
    let tt = tiles_to_tile_table(tiles);
    let n = tt.iter().filter(|&&n| n as usize == TILE).count();
    ft[TileHog] = n.saturating_sub(kong_cnt) as u8;
}

// 待ちの形による調整 (辺張, 嵌張, 単騎)
// waiting: 和了牌を除いた立牌の待ち牌, concealed_packs: 副露以外の面子と雀頭
pub fn adjust_by_waiting_form(
    concealed_packs: &[Pack],
    waiting: &UsefulTable,
    win_tile: Tile,
    ft: &mut FanTable,
) {
    if ft.has(MeldedHand) || ft.has(FourKongs) {
        return;
    }
    // 待ちが1種類の場合のみ
    if count_useful_tiles(waiting) != 1 {
        return;
    }

    let (mut edge, mut closed, mut single) = (false, false, false);
    for p in concealed_packs {
        match p.pack_type() {
            PackType::Chow => {
                let mid = p.tile();
                if mid == win_tile {
                    closed = true;
                } else if p.contains(win_tile) {
                    // 12の3待ち, 89の7待ちのみ (78の9待ちなどは両面)
                    let r = (mid.rank(), win_tile.rank());
                    if r == (2, 3) || r == (8, 7) {
                        edge = true;
                    }
                }
            }
            PackType::Pair => {
                if p.tile() == win_tile {
                    single = true;
                }
            }
            _ => {}
        }
    }

    if edge {
        ft[EdgeWait] = 1;
    } else if closed {
        ft[ClosedWait] = 1;
    } else if single {
        ft[SingleWait] = 1;
    }
}

// 圏風刻, 門風刻 (幺九刻と重複しないように減算)
pub fn adjust_by_winds(t: Tile, prevalent_wind: Rank, seat_wind: Rank, ft: &mut FanTable) {
    let deducted = [
        BigThreeWinds,
        AllTerminalsAndHonors,
        AllHonors,
        LittleFourWinds,
        BigFourWinds,
    ]
    .iter()
    .any(|&f| ft.has(f));

    let r = t.rank();
    if r == prevalent_wind {
        ft[PrevalentWind] = 1;
        if !deducted {
            ft[PungOfTerminalsOrHonors] = ft[PungOfTerminalsOrHonors].saturating_sub(1);
        }
    }
    if r == seat_wind {
        ft[SeatWind] = 1;
        // 圏風と門風が同じ場合は減算済み
        if !deducted && prevalent_wind != seat_wind {
            ft[PungOfTerminalsOrHonors] = ft[PungOfTerminalsOrHonors].saturating_sub(1);
        }
    }
}

// 和了の状況による調整 (和絶張, 妙手回春, 海底撈月, 槓上開花, 搶槓和)
pub fn adjust_by_win_flags(flags: WinFlags, ft: &mut FanTable) {
    let self_drawn = flags.is_self_drawn();
    if flags.contains(WinFlags::FOURTH_TILE) {
        ft[LastTile] = 1;
    }
    if flags.contains(WinFlags::WALL_LAST) {
        ft[if self_drawn { LastTileDraw } else { LastTileClaim }] = 1;
    }
    if flags.contains(WinFlags::ABOUT_KONG) {
        ft[if self_drawn { OutWithReplacementTile } else { RobbingTheKong }] = 1;
    }
}

// [不計]

enum Absorb {
    Zero(Fan),
    // 98年版ルールを厳密に適用しない場合のみ0にする (必然的に成立する番種)
    LooseZero(Fan),
    Sub(Fan, u8),
    // 門前清を不計 (不求人は自摸に読み替え)
    Concealed,
}

use Absorb::*;

// (成立している番種, 不計の内容)
// 番数の大きい順に1回だけ適用する (順番を変えてはならない)
static ABSORB_RULES: &[(Fan, &[Absorb])] = &[
    // 88番
    (
        BigFourWinds,
        &[
            Zero(BigThreeWinds),
            Zero(AllPungs),
            Zero(SeatWind),
            Zero(PrevalentWind),
            Zero(PungOfTerminalsOrHonors),
            LooseZero(OneVoidedSuit),
        ],
    ),
    (
        BigThreeDragons,
        &[Zero(DragonPung), Zero(TwoDragonsPungs), LooseZero(OneVoidedSuit)],
    ),
    (AllGreen, &[Zero(HalfFlush), Zero(OneVoidedSuit)]),
    (
        NineGates,
        &[
            Zero(FullFlush),
            Concealed,
            Sub(PungOfTerminalsOrHonors, 1),
            LooseZero(NoHonors),
        ],
    ),
    (FourKongs, &[Zero(SingleWait), Zero(AllPungs)]),
    (
        SevenShiftedPairs,
        &[
            Zero(SevenPairs),
            Zero(FullFlush),
            Concealed,
            Zero(SingleWait),
            LooseZero(NoHonors),
        ],
    ),
    (
        ThirteenOrphans,
        &[
            Zero(AllTerminalsAndHonors),
            Concealed,
            Zero(SingleWait),
            Zero(AllTypes),
        ],
    ),
    // 64番
    (
        AllTerminals,
        &[
            Zero(AllTerminalsAndHonors),
            Zero(AllPungs),
            Zero(OutsideHand),
            Zero(PungOfTerminalsOrHonors),
            Zero(DoublePung),
            LooseZero(NoHonors),
        ],
    ),
    (
        LittleFourWinds,
        &[
            Zero(BigThreeWinds),
            Zero(PungOfTerminalsOrHonors),
            LooseZero(OneVoidedSuit),
        ],
    ),
    (LittleThreeDragons, &[Zero(TwoDragonsPungs), Zero(DragonPung)]),
    (
        AllHonors,
        &[
            Zero(AllTerminalsAndHonors),
            Zero(AllPungs),
            Zero(OutsideHand),
            Zero(PungOfTerminalsOrHonors),
        ],
    ),
    (FourConcealedPungs, &[Zero(AllPungs), Concealed]),
    (
        PureTerminalChows,
        &[
            Zero(FullFlush),
            Zero(AllChows),
            Zero(PureDoubleChow),
            Zero(TwoTerminalChows),
            LooseZero(NoHonors),
        ],
    ),
    // 48番
    (
        QuadrupleChow,
        &[
            Zero(PureShiftedPungs),
            Zero(TileHog),
            Zero(PureDoubleChow),
            Zero(PureTripleChow),
        ],
    ),
    (
        FourPureShiftedPungs,
        &[Zero(PureShiftedPungs), Zero(AllPungs)],
    ),
    // 32番
    (
        FourPureShiftedChows,
        &[
            Zero(PureShiftedChows),
            Zero(PureDoubleChow),
            Zero(ShortStraight),
            Zero(TwoTerminalChows),
        ],
    ),
    (
        AllTerminalsAndHonors,
        &[Zero(AllPungs), Zero(OutsideHand), Zero(PungOfTerminalsOrHonors)],
    ),
    // 24番
    (SevenPairs, &[Concealed, Zero(SingleWait)]),
    (
        GreaterHonorsAndKnittedTiles,
        &[
            Zero(LesserHonorsAndKnittedTiles),
            Concealed,
            Zero(AllTypes),
        ],
    ),
    (
        AllEvenPungs,
        &[Zero(AllPungs), Zero(AllSimples), Zero(NoHonors)],
    ),
    (FullFlush, &[Zero(OneVoidedSuit), Zero(NoHonors)]),
    (PureTripleChow, &[Zero(PureDoubleChow)]),
    (UpperTiles, &[Zero(NoHonors)]),
    (MiddleTiles, &[Zero(AllSimples), Zero(NoHonors)]),
    (LowerTiles, &[Zero(NoHonors)]),
    // 16番
    (
        ThreeSuitedTerminalChows,
        &[
            Zero(AllChows),
            Zero(NoHonors),
            Zero(MixedDoubleChow),
            Zero(TwoTerminalChows),
        ],
    ),
    (AllFive, &[Zero(AllSimples), Zero(NoHonors)]),
    // 12番
    (
        LesserHonorsAndKnittedTiles,
        &[Concealed, Zero(AllTypes)],
    ),
    (UpperFour, &[Zero(NoHonors)]),
    (LowerFour, &[Zero(NoHonors)]),
    (
        BigThreeWinds,
        &[Sub(PungOfTerminalsOrHonors, 3), LooseZero(OneVoidedSuit)],
    ),
    // 8番
    (ReversibleTiles, &[Zero(OneVoidedSuit)]),
    (LastTileDraw, &[Zero(SelfDrawn)]),
    (OutWithReplacementTile, &[Zero(SelfDrawn)]),
    (RobbingTheKong, &[Zero(LastTile)]),
    // 6番
    (HalfFlush, &[Zero(OneVoidedSuit)]),
    (MeldedHand, &[Zero(SingleWait)]),
    (TwoDragonsPungs, &[Zero(DragonPung)]),
    // 4番
    (FullyConcealedHand, &[Zero(SelfDrawn)]),
    // 2番
    (AllChows, &[Zero(NoHonors)]),
    (AllSimples, &[Zero(NoHonors)]),
];

// 不計の調整 (全ての加算の後に1回だけ実行)
pub fn final_adjust(rule: &RuleSet, ft: &mut FanTable) {
    for (trigger, absorbs) in ABSORB_RULES {
        if !ft.has(*trigger) {
            continue;
        }
        for a in absorbs.iter() {
            match a {
                Zero(f) => ft[*f] = 0,
                LooseZero(f) => {
                    if !rule.strict_98_rule {
                        ft[*f] = 0;
                    }
                }
                Sub(f, n) => ft[*f] = ft[*f].saturating_sub(*n),
                Concealed => {
                    ft[ConcealedHand] = 0;
                    if ft.has(FullyConcealedHand) {
                        ft[FullyConcealedHand] = 0;
                        ft[SelfDrawn] = 1;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
fn tiles(exp: &str) -> Vec<Tile> {
    crate::convert::notation::parse_tiles(exp).unwrap()
}

#[test]
fn test_suits() {
    let mut ft = FanTable::new();
    adjust_by_suits(&tiles("12345678999m111s"), &mut ft);
    assert!(ft.has(NoHonors) && ft.has(OneVoidedSuit));

    let mut ft = FanTable::new();
    adjust_by_suits(&tiles("123456789111mEE"), &mut ft);
    assert!(ft.has(HalfFlush) && !ft.has(OneVoidedSuit));

    let mut ft = FanTable::new();
    adjust_by_suits(&tiles("123m456s789pEEECC"), &mut ft);
    assert!(ft.has(AllTypes));

    let mut ft = FanTable::new();
    adjust_by_suits(&tiles("EEESSSWWWNNNCC"), &mut ft);
    assert!(ft.is_empty());
}

#[test]
fn test_rank_range() {
    let rule = RuleSet::default();
    let mut ft = FanTable::new();
    adjust_by_rank_range(&tiles("123m123s123p11122m"), &rule, &mut ft);
    assert!(ft.has(LowerTiles));

    let mut ft = FanTable::new();
    adjust_by_rank_range(&tiles("6789m6789s678p99m"), &rule, &mut ft);
    assert!(ft.has(UpperFour));

    let mut ft = FanTable::new();
    adjust_by_rank_range(&tiles("456m456s456p44455m"), &rule, &mut ft);
    assert!(ft.has(MiddleTiles));

    let mut ft = FanTable::new();
    adjust_by_rank_range(&tiles("456m456s456p444mE"), &rule, &mut ft);
    assert!(ft.is_empty());
}

#[test]
fn test_waiting_form() {
    let chow = |s: &str| Pack::new(0, PackType::Chow, tiles(s)[0]);
    let pair = Pack::new(0, PackType::Pair, tiles("E")[0]);
    let mut waiting = [false; TILE_KIND];
    waiting[tiles("3m")[0].index()] = true;

    let mut ft = FanTable::new();
    adjust_by_waiting_form(&[chow("2m"), pair], &waiting, tiles("3m")[0], &mut ft);
    assert!(ft.has(EdgeWait));

    let mut ft = FanTable::new();
    adjust_by_waiting_form(&[chow("3m"), pair], &waiting, tiles("3m")[0], &mut ft);
    assert!(ft.has(ClosedWait));

    let mut waiting9 = [false; TILE_KIND];
    waiting9[tiles("9m")[0].index()] = true;
    // 6mが使えずに9m待ちのみでも78の形は辺張ではない
    let mut ft = FanTable::new();
    adjust_by_waiting_form(&[chow("8m"), pair], &waiting9, tiles("9m")[0], &mut ft);
    assert!(ft.is_empty());
    let mut waiting7 = [false; TILE_KIND];
    waiting7[tiles("7m")[0].index()] = true;
    let mut ft = FanTable::new();
    adjust_by_waiting_form(&[chow("8m"), pair], &waiting7, tiles("7m")[0], &mut ft);
    assert!(ft.has(EdgeWait));

    // 待ちが複数ある場合は加算しない
    waiting[tiles("6m")[0].index()] = true;
    let mut ft = FanTable::new();
    adjust_by_waiting_form(&[chow("4m"), pair], &waiting, tiles("3m")[0], &mut ft);
    assert!(ft.is_empty());
}

#[test]
fn test_winds() {
    let east = Tile::new(SUIT_HONORS, WE);
    let mut ft = FanTable::new();
    ft[PungOfTerminalsOrHonors] = 2;
    adjust_by_winds(east, WE, WE, &mut ft);
    assert!(ft.has(PrevalentWind) && ft.has(SeatWind));
    assert_eq!(ft[PungOfTerminalsOrHonors], 1);

    let mut ft = FanTable::new();
    ft[PungOfTerminalsOrHonors] = 3;
    ft[BigThreeWinds] = 1;
    adjust_by_winds(east, WE, WS, &mut ft);
    assert_eq!(ft[PungOfTerminalsOrHonors], 3);
}

#[test]
fn test_final_adjust() {
    let mut ft = FanTable::new();
    ft[BigFourWinds] = 1;
    ft[AllPungs] = 1;
    ft[PungOfTerminalsOrHonors] = 4;
    ft[PrevalentWind] = 1;
    ft[OneVoidedSuit] = 1;
    final_adjust(&RuleSet::default(), &mut ft);
    assert_eq!(ft.iter().collect::<Vec<_>>(), vec![(BigFourWinds, 1)]);

    let strict = RuleSet {
        strict_98_rule: true,
        ..Default::default()
    };
    let mut ft = FanTable::new();
    ft[BigFourWinds] = 1;
    ft[OneVoidedSuit] = 1;
    final_adjust(&strict, &mut ft);
    assert!(ft.has(OneVoidedSuit));

    // 不求人は自摸に読み替え
    let mut ft = FanTable::new();
    ft[FourConcealedPungs] = 1;
    ft[FullyConcealedHand] = 1;
    final_adjust(&RuleSet::default(), &mut ft);
    assert!(ft.has(SelfDrawn) && !ft.has(FullyConcealedHand));
}
