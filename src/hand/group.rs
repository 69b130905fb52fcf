// 順子・刻子の組み合わせによる番種
// 引数の牌は順子の場合は中央の牌, 刻子の場合はその牌 (いずれも昇順に整列済み)
use crate::model::*;

use Fan::*;

// [順子]

fn same_suit(ts: &[Tile]) -> bool {
    ts.iter().all(|t| t.suit() == ts[0].suit())
}

// 種別がすべて異なる (整列済みが前提)
fn distinct_suits(ts: &[Tile]) -> bool {
    ts.windows(2).all(|w| w[0].suit() < w[1].suit())
}

fn sorted_ranks<const N: usize>(ts: &[Tile; N]) -> [Rank; N] {
    let mut rs = ts.map(|t| t.rank());
    rs.sort();
    rs
}

// 数字がdずつ増加 (整列済みの数字)
fn is_step(rs: &[Rank], d: Rank) -> bool {
    rs.windows(2).all(|w| w[0] + d == w[1])
}

// 一色四同順
fn is_quadruple_chow(ts: &[Tile; 4]) -> bool {
    ts.iter().all(|&t| t == ts[0])
}

// 一色四歩高
fn is_four_pure_shifted_chows(ts: &[Tile; 4]) -> bool {
    let rs = sorted_ranks(ts);
    same_suit(ts) && (is_step(&rs, 1) || is_step(&rs, 2))
}

fn get_4_chows_fan(ts: &[Tile; 4]) -> Option<Fan> {
    if is_quadruple_chow(ts) {
        Some(QuadrupleChow)
    } else if is_four_pure_shifted_chows(ts) {
        Some(FourPureShiftedChows)
    } else {
        None
    }
}

fn get_3_chows_fan(ts: &[Tile; 3]) -> Option<Fan> {
    let rs = sorted_ranks(ts);
    if distinct_suits(ts) {
        if is_step(&rs, 1) {
            return Some(MixedShiftedChows); // 三色三歩高
        }
        if rs == [2, 5, 8] {
            return Some(MixedStraight); // 花龍
        }
        if is_step(&rs, 0) {
            return Some(MixedTripleChow); // 三色三同順
        }
        return None;
    }
    if !same_suit(ts) {
        return None;
    }
    if rs == [2, 5, 8] {
        Some(PureStraight) // 清龍
    } else if is_step(&rs, 1) || is_step(&rs, 2) {
        Some(PureShiftedChows) // 一色三歩高
    } else if is_step(&rs, 0) {
        Some(PureTripleChow) // 一色三同順
    } else {
        None
    }
}

// 2組の順子で成立する番種 (1つのみ)
fn get_2_chows_fan_unique(t0: Tile, t1: Tile) -> Option<Fan> {
    if t0 == t1 {
        Some(PureDoubleChow) // 一般高
    } else if t0.suit() != t1.suit() {
        if t0.rank() == t1.rank() {
            Some(MixedDoubleChow) // 喜相逢
        } else {
            None
        }
    } else {
        match t0.rank().abs_diff(t1.rank()) {
            3 => Some(ShortStraight), // 連六
            6 => Some(TwoTerminalChows), // 老少副
            _ => None,
        }
    }
}

// 「一度しか使えない」原則の簡易的な適用
// 1番の4種の合計がmax_cntを超える場合, 老少副から一般高の順に減らす
// まず同じ番種の重複を1まで減らし, それでも超える場合は0まで減らす
fn exclusionary_rule(all_fans: &[Option<Fan>], max_cnt: usize, ft: &mut FanTable) {
    const FANS: [Fan; 4] = [PureDoubleChow, MixedDoubleChow, ShortStraight, TwoTerminalChows];

    let mut table = [0usize; 4];
    let mut cnt = 0;
    for f in all_fans.iter().flatten() {
        if let Some(i) = FANS.iter().position(|x| x == f) {
            table[i] += 1;
            cnt += 1;
        }
    }

    for limit in [1, 0] {
        for i in (0..FANS.len()).rev() {
            while table[i] > limit && cnt > max_cnt {
                table[i] -= 1;
                cnt -= 1;
            }
        }
    }

    for (i, &f) in FANS.iter().enumerate() {
        ft[f] = table[i] as u8;
    }
}

// 三組の順子の番種が成立した場合, 残りの1組は三組のいずれか1組と1回だけ組み合わせる
fn calculate_3_plus_1_chows(three: &[Tile; 3], free: Tile, ft: &mut FanTable) -> bool {
    let Some(fan) = get_3_chows_fan(three) else {
        return false;
    };
    ft[fan] = 1;
    for &t in three {
        if let Some(f) = get_2_chows_fan_unique(t, free) {
            ft[f] += 1;
            break;
        }
    }
    true
}

pub fn calculate_4_chows(ts: &[Tile; 4], ft: &mut FanTable) {
    if let Some(fan) = get_4_chows_fan(ts) {
        ft[fan] = 1;
        return;
    }

    // (三組, 残り1組)
    const SUBSETS: [([usize; 3], usize); 4] =
        [([0, 1, 2], 3), ([0, 1, 3], 2), ([0, 2, 3], 1), ([1, 2, 3], 0)];
    for (idx, free) in SUBSETS {
        if calculate_3_plus_1_chows(&idx.map(|i| ts[i]), ts[free], ft) {
            return;
        }
    }

    // 三組の番種がない場合は2組ずつ (最大3番)
    const PAIRS: [(usize, usize); 6] = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];
    let all_fans = PAIRS.map(|(a, b)| get_2_chows_fan_unique(ts[a], ts[b]));
    let mut max_cnt = 3;
    for i in 0..4 {
        // 他の3組と何の関係もない順子があれば1減らす
        let isolated = PAIRS
            .iter()
            .zip(all_fans.iter())
            .filter(|((a, b), _)| *a == i || *b == i)
            .all(|(_, f)| f.is_none());
        if isolated {
            max_cnt -= 1;
        }
    }
    if max_cnt > 0 {
        exclusionary_rule(&all_fans, max_cnt, ft);
    }
}

pub fn calculate_3_chows(ts: &[Tile; 3], ft: &mut FanTable) {
    if let Some(fan) = get_3_chows_fan(ts) {
        ft[fan] = 1;
        return;
    }

    // 三組の番種がない場合は2組ずつ (最大2番)
    let all_fans = [
        get_2_chows_fan_unique(ts[0], ts[1]),
        get_2_chows_fan_unique(ts[0], ts[2]),
        get_2_chows_fan_unique(ts[1], ts[2]),
    ];
    exclusionary_rule(&all_fans, 2, ft);
}

pub fn calculate_2_chows(ts: &[Tile; 2], ft: &mut FanTable) {
    if let Some(fan) = get_2_chows_fan_unique(ts[0], ts[1]) {
        ft[fan] += 1;
    }
}

// 一色双龍会: 同じ種別の老少副2組と5の雀頭
pub fn is_pure_terminal_chows(ts: &[Tile; 4], pair: Tile) -> bool {
    let rs = ts.map(|t| t.rank());
    pair.is_numbered_suit()
        && pair.rank() == 5
        && ts.iter().all(|t| t.suit() == pair.suit())
        && rs == [2, 2, 8, 8]
}

// 三色双龍会: 2種別の老少副と残りの種別の5の雀頭
pub fn is_three_suited_terminal_chows(ts: &[Tile; 4], pair: Tile) -> bool {
    if !pair.is_numbered_suit() || pair.rank() != 5 {
        return false;
    }
    if ts.iter().any(|t| t.suit() == pair.suit()) {
        return false;
    }
    // 整列済みなので(2, 8)が2種別分並ぶ
    ts[0].suit() == ts[1].suit()
        && ts[2].suit() == ts[3].suit()
        && ts[1].suit() != ts[2].suit()
        && ts.map(|t| t.rank()) == [2, 8, 2, 8]
}

// [刻子]

fn get_4_pungs_fan(ts: &[Tile; 4]) -> Option<Fan> {
    if ts[0].is_numbered_suit() && same_suit(ts) && is_step(&sorted_ranks(ts), 1) {
        Some(FourPureShiftedPungs) // 一色四節高
    } else if ts.iter().all(|t| t.is_winds()) {
        Some(BigFourWinds) // 大四喜
    } else {
        None
    }
}

fn get_3_pungs_fan(ts: &[Tile; 3]) -> Option<Fan> {
    if ts.iter().all(|t| t.is_numbered_suit()) {
        let rs = sorted_ranks(ts);
        if distinct_suits(ts) {
            if is_step(&rs, 1) {
                return Some(MixedShiftedPungs); // 三色三節高
            }
            if is_step(&rs, 0) {
                return Some(TriplePung); // 三同刻
            }
        } else if same_suit(ts) && is_step(&rs, 1) {
            return Some(PureShiftedPungs); // 一色三節高
        }
        return None;
    }
    if ts.iter().all(|t| t.is_winds()) {
        Some(BigThreeWinds) // 三風刻
    } else if ts.iter().all(|t| t.is_dragons()) {
        Some(BigThreeDragons) // 大三元
    } else {
        None
    }
}

fn get_2_pungs_fan_unique(t0: Tile, t1: Tile) -> Option<Fan> {
    if t0.is_numbered_suit() && t1.is_numbered_suit() {
        if t0.suit() != t1.suit() && t0.rank() == t1.rank() {
            return Some(DoublePung); // 双同刻
        }
    } else if t0.is_dragons() && t1.is_dragons() {
        return Some(TwoDragonsPungs); // 双箭刻
    }
    None
}

pub fn get_1_pung_fan(t: Tile) -> Option<Fan> {
    if t.is_dragons() {
        Some(DragonPung)
    } else if t.is_terminal() || t.is_winds() {
        Some(PungOfTerminalsOrHonors)
    } else {
        None
    }
}

pub fn calculate_4_pungs(ts: &[Tile; 4], ft: &mut FanTable) {
    if let Some(fan) = get_4_pungs_fan(ts) {
        ft[fan] = 1;
        return;
    }

    const SUBSETS: [([usize; 3], usize); 4] =
        [([0, 1, 2], 3), ([0, 1, 3], 2), ([0, 2, 3], 1), ([1, 2, 3], 0)];
    for (idx, free) in SUBSETS {
        if let Some(fan) = get_3_pungs_fan(&idx.map(|i| ts[i])) {
            ft[fan] += 1;
            // 残りの1組は三組のいずれか1組とだけ組み合わせる
            for i in idx {
                if let Some(f) = get_2_pungs_fan_unique(ts[i], ts[free]) {
                    ft[f] += 1;
                    break;
                }
            }
            return;
        }
    }

    for a in 0..4 {
        for b in a + 1..4 {
            if let Some(f) = get_2_pungs_fan_unique(ts[a], ts[b]) {
                ft[f] += 1;
            }
        }
    }
}

pub fn calculate_3_pungs(ts: &[Tile; 3], ft: &mut FanTable) {
    if let Some(fan) = get_3_pungs_fan(ts) {
        ft[fan] = 1;
        return;
    }
    for (a, b) in [(0, 1), (0, 2), (1, 2)] {
        if let Some(f) = get_2_pungs_fan_unique(ts[a], ts[b]) {
            ft[f] += 1;
        }
    }
}

pub fn calculate_2_pungs(ts: &[Tile; 2], ft: &mut FanTable) {
    if let Some(f) = get_2_pungs_fan_unique(ts[0], ts[1]) {
        ft[f] += 1;
    }
}

// [槓子]

// 槓子と暗刻の数による番種 (packsは刻子と槓子)
// 栄和で明刻扱いになった刻子は呼び出し側で副露済みにしておく
pub fn calculate_kongs(packs: &[Pack], rule: &RuleSet, ft: &mut FanTable) {
    let (mut melded_kong, mut concealed_kong, mut concealed_pung) = (0, 0, 0);
    for p in packs {
        match (p.pack_type(), p.is_melded()) {
            (PackType::Kong, true) => melded_kong += 1,
            (PackType::Kong, false) => concealed_kong += 1,
            (PackType::Pung, false) => concealed_pung += 1,
            _ => {}
        }
    }

    // 暗刻の数 (暗槓を含む)
    let concealed_pungs_fan = |n: usize| match n {
        2 => Some(TwoConcealedPungs),
        3 => Some(ThreeConcealedPungs),
        4 => Some(FourConcealedPungs),
        _ => None,
    };

    let kong_cnt = melded_kong + concealed_kong;
    match kong_cnt {
        0 => {}
        1 => ft[if concealed_kong == 1 { ConcealedKong } else { MeldedKong }] = 1,
        2 => match concealed_kong {
            0 => ft[TwoMeldedKongs] = 1,
            1 => {
                if rule.strict_98_rule {
                    ft[MeldedKong] = 1;
                    ft[ConcealedKong] = 1;
                } else {
                    ft[ConcealedKongAndMeldedKong] = 1;
                }
            }
            _ => ft[TwoConcealedKongs] = 1,
        },
        3 => ft[ThreeKongs] = 1,
        _ => ft[FourKongs] = 1,
    }
    // 双暗槓は双暗刻を含む
    let two_concealed_kongs_only = kong_cnt == 2 && concealed_kong == 2 && concealed_pung == 0;
    if let Some(f) = concealed_pungs_fan(concealed_kong + concealed_pung) {
        if !two_concealed_kongs_only {
            ft[f] = 1;
        }
    }

    // 四暗刻・四槓以外の4刻子は碰碰和
    if packs.len() == PACK && !ft.has(FourKongs) && !ft.has(FourConcealedPungs) {
        ft[AllPungs] = 1;
    }

    for p in packs {
        if let Some(f) = get_1_pung_fan(p.tile()) {
            ft[f] += 1;
        }
    }
}

#[cfg(test)]
fn tiles<const N: usize>(exp: &str) -> [Tile; N] {
    let mut ts = crate::convert::notation::parse_tiles(exp).unwrap();
    ts.sort();
    ts.try_into().unwrap()
}

#[test]
fn test_3_chows() {
    let mut ft = FanTable::new();
    calculate_3_chows(&tiles("258m"), &mut ft);
    assert_eq!(ft[PureStraight], 1);

    let mut ft = FanTable::new();
    calculate_3_chows(&tiles("2m5s8p"), &mut ft);
    assert_eq!(ft[MixedStraight], 1);

    let mut ft = FanTable::new();
    calculate_3_chows(&tiles("3m4s5p"), &mut ft);
    assert_eq!(ft[MixedShiftedChows], 1);

    // 一般高 + 喜相逢 (2組まで)
    let mut ft = FanTable::new();
    calculate_3_chows(&tiles("33m3s"), &mut ft);
    assert_eq!((ft[PureDoubleChow], ft[MixedDoubleChow]), (1, 1));
    assert_eq!(ft.total(), 2);
}

#[test]
fn test_4_chows_account_once() {
    // 清龍 + 残り1組は1回だけ組み合わせる
    let mut ft = FanTable::new();
    calculate_4_chows(&tiles("2258m"), &mut ft);
    assert_eq!(ft[PureStraight], 1);
    assert_eq!(ft[PureDoubleChow], 1);
    assert_eq!(ft[ShortStraight], 0);
    assert_eq!(ft.total(), 17);

    // 一般高2組 + 喜相逢: 最大3番
    let mut ft = FanTable::new();
    calculate_4_chows(&tiles("22m22s"), &mut ft);
    assert_eq!(ft[PureDoubleChow], 2);
    assert_eq!(ft[MixedDoubleChow], 1);

    // 関係のない順子があると上限が減る
    let mut ft = FanTable::new();
    calculate_4_chows(&tiles("25m2s7p"), &mut ft);
    assert_eq!(ft[MixedDoubleChow], 1);
    assert_eq!(ft[ShortStraight], 1);
    assert_eq!(ft.total(), 2);

    let mut ft = FanTable::new();
    calculate_4_chows(&tiles("3333p"), &mut ft);
    assert_eq!(ft[QuadrupleChow], 1);
    assert_eq!(ft.total(), 48);
}

#[test]
fn test_terminal_chows() {
    assert!(is_pure_terminal_chows(&tiles("2288s"), Tile::new(SUIT_BAMBOO, 5)));
    assert!(!is_pure_terminal_chows(&tiles("2288s"), Tile::new(SUIT_DOTS, 5)));
    assert!(is_three_suited_terminal_chows(&tiles("28m28s"), Tile::new(SUIT_DOTS, 5)));
    assert!(!is_three_suited_terminal_chows(&tiles("28m28s"), Tile::new(SUIT_BAMBOO, 5)));
}

#[test]
fn test_pungs() {
    let mut ft = FanTable::new();
    calculate_4_pungs(&tiles("ESWN"), &mut ft);
    assert_eq!(ft[BigFourWinds], 1);

    // 三同刻 + 残り1組
    let mut ft = FanTable::new();
    calculate_4_pungs(&tiles("2m2s2p3m"), &mut ft);
    assert_eq!(ft[TriplePung], 1);
    assert_eq!(ft[DoublePung], 0);

    let mut ft = FanTable::new();
    calculate_4_pungs(&tiles("4m4s7m7p"), &mut ft);
    assert_eq!(ft[DoublePung], 2);

    let mut ft = FanTable::new();
    calculate_3_pungs(&tiles("CFP"), &mut ft);
    assert_eq!(ft[BigThreeDragons], 1);

    let mut ft = FanTable::new();
    calculate_2_pungs(&tiles("CF"), &mut ft);
    assert_eq!(ft[TwoDragonsPungs], 1);

    assert_eq!(get_1_pung_fan(Tile::new(SUIT_HONORS, DP)), Some(DragonPung));
    assert_eq!(get_1_pung_fan(Tile::new(SUIT_DOTS, 9)), Some(PungOfTerminalsOrHonors));
    assert_eq!(get_1_pung_fan(Tile::new(SUIT_DOTS, 8)), None);
}

#[test]
fn test_kongs() {
    let m = |exp: &str| Tile::from_symbol(exp).unwrap();
    let rule = RuleSet::default();

    // 暗槓 + 明槓 + 暗刻
    let packs = [
        Pack::new(0, PackType::Kong, m("1m")),
        Pack::new(2, PackType::Kong, m("5p")),
        Pack::new(0, PackType::Pung, m("7s")),
    ];
    let mut ft = FanTable::new();
    calculate_kongs(&packs, &rule, &mut ft);
    assert_eq!(ft[ConcealedKongAndMeldedKong], 1);
    assert_eq!(ft[TwoConcealedPungs], 1);
    assert_eq!(ft[PungOfTerminalsOrHonors], 1);
    assert_eq!(ft[AllPungs], 0);

    let strict = RuleSet {
        strict_98_rule: true,
        ..Default::default()
    };
    let mut ft = FanTable::new();
    calculate_kongs(&packs, &strict, &mut ft);
    assert!(ft.has(MeldedKong) && ft.has(ConcealedKong));
    assert!(!ft.has(ConcealedKongAndMeldedKong));

    // 双暗槓のみでは双暗刻を加算しない
    let packs = [
        Pack::new(0, PackType::Kong, m("2m")),
        Pack::new(0, PackType::Kong, m("3p")),
    ];
    let mut ft = FanTable::new();
    calculate_kongs(&packs, &rule, &mut ft);
    assert_eq!(ft.iter().collect::<Vec<_>>(), vec![(TwoConcealedKongs, 1)]);

    let packs = [
        Pack::new(0, PackType::Pung, m("2m")),
        Pack::new(0, PackType::Pung, m("3p")),
        Pack::new(0, PackType::Pung, m("4s")),
        Pack::new(0, PackType::Kong, m("6s")),
    ];
    let mut ft = FanTable::new();
    calculate_kongs(&packs, &rule, &mut ft);
    assert!(ft.has(FourConcealedPungs) && ft.has(ConcealedKong));
    assert!(!ft.has(AllPungs));
}
