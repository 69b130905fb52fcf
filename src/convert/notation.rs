// 手牌の文字列表記
// 数牌: 数字の後ろに種別 (123m, 55p), 字牌: E S W N C F P
// 副露: [123p1] (末尾の数字は供給元, 省略時は1), 暗槓: {EEEE}
// ",9s" のように末尾に和了牌を指定可能
use crate::error::ParseError;
use crate::model::*;

// 副露を含まない牌の並びをパース
pub fn parse_tiles(exp: &str) -> Result<Vec<Tile>, ParseError> {
    let mut tiles = vec![];
    let mut ranks = vec![];
    for (i, c) in exp.chars().enumerate() {
        parse_char(i, c, &mut ranks, &mut tiles)?;
    }
    if !ranks.is_empty() {
        return Err(ParseError::MissingSuffix);
    }
    Ok(tiles)
}

// 数字と種別と字牌を1文字分処理
fn parse_char(
    pos: usize,
    c: char,
    ranks: &mut Vec<Rank>,
    tiles: &mut Vec<Tile>,
) -> Result<(), ParseError> {
    match c {
        '1'..='9' => ranks.push(c as Rank - b'0'),
        'm' | 's' | 'p' => {
            if ranks.is_empty() {
                return Err(ParseError::IllegalCharacter(pos, c));
            }
            let suit = suit_from_char(c).ok_or(ParseError::IllegalCharacter(pos, c))?;
            for r in ranks.drain(..) {
                tiles.push(Tile::new(suit, r));
            }
        }
        ' ' => {}
        _ => {
            let t = honor_from_char(c).ok_or(ParseError::IllegalCharacter(pos, c))?;
            if !ranks.is_empty() {
                return Err(ParseError::MissingSuffix);
            }
            tiles.push(t);
        }
    }
    Ok(())
}

// 括弧内の牌から副露を生成
fn make_fixed_pack(tiles: &mut [Tile], offer: Offer, concealed: bool) -> Result<Pack, ParseError> {
    tiles.sort();
    let same = tiles.iter().all(|&t| t == tiles[0]);
    match tiles.len() {
        3 if concealed => Err(ParseError::WrongTileCountForFixedPack(3)),
        3 if same => match offer {
            1..=3 => Ok(Pack::new(offer, PackType::Pung, tiles[0])),
            _ => Err(ParseError::CannotMakeFixedPack),
        },
        3 => {
            let t = tiles[0];
            let is_chow = t.is_numbered_suit()
                && tiles[1] == t.shift(1)
                && tiles[2] == t.shift(2)
                && t.rank() <= 7;
            if !is_chow || !(1..=3).contains(&offer) {
                return Err(ParseError::CannotMakeFixedPack);
            }
            Ok(Pack::new(offer, PackType::Chow, tiles[1]))
        }
        4 if !same => Err(ParseError::CannotMakeFixedPack),
        4 if concealed => Ok(Pack::new(0, PackType::Kong, tiles[0])),
        4 => match offer {
            1..=3 | 5..=7 => Ok(Pack::new(offer, PackType::Kong, tiles[0])),
            _ => Err(ParseError::CannotMakeFixedPack),
        },
        n => Err(ParseError::WrongTileCountForFixedPack(n)),
    }
}

// 手牌をパースして(手牌, 和了牌)を返却
// 和了牌の指定がない場合, 立牌はそのまま (14枚目の扱いは呼び出し側で決める)
pub fn parse_hand(exp: &str) -> Result<(Hand, Option<Tile>), ParseError> {
    let (exp_hand, exp_win) = match exp.split_once(',') {
        Some((h, w)) => (h, Some(w)),
        None => (exp, None),
    };

    let mut fixed_packs = vec![];
    let mut standing_tiles = vec![];
    let mut ranks = vec![];
    let mut pack_tiles = vec![];
    let mut bracket: Option<char> = None; // 閉じ括弧待ち
    for (i, c) in exp_hand.chars().enumerate() {
        match (c, bracket) {
            ('[', None) | ('{', None) => {
                if !ranks.is_empty() {
                    return Err(ParseError::MissingSuffix);
                }
                bracket = Some(if c == '[' { ']' } else { '}' });
            }
            (']', Some(']')) => {
                // 種別の後ろに残った1桁の数字は供給元
                let offer = match ranks.len() {
                    0 => 1,
                    1 if !pack_tiles.is_empty() => ranks.pop().unwrap_or(1),
                    _ => return Err(ParseError::MissingSuffix),
                };
                fixed_packs.push(make_fixed_pack(&mut pack_tiles, offer, false)?);
                pack_tiles.clear();
                bracket = None;
            }
            ('}', Some('}')) => {
                if !ranks.is_empty() {
                    return Err(ParseError::MissingSuffix);
                }
                fixed_packs.push(make_fixed_pack(&mut pack_tiles, 0, true)?);
                pack_tiles.clear();
                bracket = None;
            }
            ('[' | '{' | ']' | '}', _) => return Err(ParseError::IllegalCharacter(i, c)),
            (_, Some(_)) => parse_char(i, c, &mut ranks, &mut pack_tiles)?,
            (_, None) => parse_char(i, c, &mut ranks, &mut standing_tiles)?,
        }
        if fixed_packs.len() > PACK {
            return Err(ParseError::TooManyFixedPacks);
        }
    }
    if bracket.is_some() {
        return Err(ParseError::WrongTileCountForFixedPack(pack_tiles.len()));
    }
    if !ranks.is_empty() {
        return Err(ParseError::MissingSuffix);
    }

    let win_tile = match exp_win {
        Some(w) => {
            let tiles = parse_tiles(w)?;
            match tiles.as_slice() {
                [t] => Some(*t),
                [] => return Err(ParseError::IllegalCharacter(exp_hand.chars().count(), ',')),
                _ => return Err(ParseError::TooManyTiles),
            }
        }
        None => None,
    };

    let hand = Hand::new(fixed_packs, standing_tiles);
    let count = hand.tile_count() + win_tile.is_some() as usize;
    if count > HAND_SIZE + 1 {
        return Err(ParseError::TooManyTiles);
    }

    let mut tt = hand.tile_table();
    if let Some(t) = win_tile {
        inc_tile(&mut tt, t);
    }
    if tt.iter().any(|&n| n as usize > TILE) {
        return Err(ParseError::TileCountGreaterThan4);
    }

    Ok((hand, win_tile))
}

// 和了形の手牌をパース
// 和了牌の指定がなく14枚ある場合は最後の立牌を和了牌とする (13枚未満の場合はZ8)
pub fn parse_win_hand(exp: &str) -> Result<(Hand, Tile), ParseError> {
    let (mut hand, win_tile) = parse_hand(exp)?;
    let win_tile = match win_tile {
        Some(t) => t,
        None if hand.tile_count() == HAND_SIZE + 1 => hand.standing_tiles.pop().unwrap_or(Z8),
        None => Z8,
    };
    Ok((hand, win_tile))
}

// 連続する同じ種別の数牌は種別をまとめて表記
pub fn format_tiles(tiles: &[Tile]) -> String {
    let mut res = String::new();
    let mut suit: Option<Suit> = None;
    for &t in tiles {
        if suit.is_some() && suit != Some(t.suit()) {
            res.push(SUIT_SUFFIX[suit.unwrap_or(1) as usize - 1]);
            suit = None;
        }
        if t.is_honor() {
            res.push(HONOR_CHARS[t.rank() as usize - 1]);
        } else {
            res.push((b'0' + t.rank()) as char);
            suit = Some(t.suit());
        }
    }
    if let Some(s) = suit {
        res.push(SUIT_SUFFIX[s as usize - 1]);
    }
    res
}

// 鳴いた面子は[]、暗槓は{}で囲む (分解結果の暗刻・順子・雀頭は括弧なし)
pub fn format_pack(p: Pack) -> String {
    let tiles = format_tiles(&p.tiles());
    if p.is_melded() {
        format!("[{}{}]", tiles, p.offer())
    } else if p.pack_type() == PackType::Kong {
        format!("{{{}}}", tiles)
    } else {
        tiles
    }
}

pub fn format_hand(hand: &Hand) -> String {
    let mut res = String::new();
    for &p in &hand.fixed_packs {
        res += &format_pack(p);
    }
    res + &format_tiles(&hand.standing_tiles)
}

#[test]
fn test_parse_tiles() {
    let tiles = parse_tiles("123m55pESC").unwrap();
    assert_eq!(format_tiles(&tiles), "123m55pESC");
    assert_eq!(tiles.len(), 8);
    assert_eq!(parse_tiles("123"), Err(ParseError::MissingSuffix));
    assert_eq!(parse_tiles("12E3m"), Err(ParseError::MissingSuffix));
    assert_eq!(parse_tiles("1x"), Err(ParseError::IllegalCharacter(1, 'x')));
    assert_eq!(parse_tiles("0m"), Err(ParseError::IllegalCharacter(0, '0')));
}

#[test]
fn test_parse_hand_with_win_tile() {
    let (hand, win) = parse_hand("1112345678999s,9s").unwrap();
    assert!(hand.fixed_packs.is_empty());
    assert_eq!(hand.standing_tiles.len(), 13);
    assert_eq!(win, Some(Tile::new(SUIT_BAMBOO, 9)));
}

#[test]
fn test_parse_hand_with_packs() {
    let (hand, win) = parse_hand("[123p1][345s2][999s3]6m6pEW1m").unwrap();
    assert_eq!(win, None);
    assert_eq!(
        hand.fixed_packs,
        vec![
            Pack::new(1, PackType::Chow, Tile::new(SUIT_DOTS, 2)),
            Pack::new(2, PackType::Chow, Tile::new(SUIT_BAMBOO, 4)),
            Pack::new(3, PackType::Pung, Tile::new(SUIT_BAMBOO, 9)),
        ]
    );
    assert_eq!(format_tiles(&hand.standing_tiles), "6m6pEW1m");
    assert_eq!(hand.tile_count(), 14);
}

#[test]
fn test_parse_hand_kong() {
    let (hand, win) = parse_hand("{EEEE}[5555p6]123m456sC,C").unwrap();
    assert_eq!(hand.fixed_packs[0], Pack::new(0, PackType::Kong, Tile::new(SUIT_HONORS, WE)));
    assert!(hand.fixed_packs[1].is_promoted_kong());
    assert_eq!(hand.fixed_packs[1].offer(), 6);
    assert_eq!(win, Some(Tile::new(SUIT_HONORS, DC)));
    assert_eq!(format_hand(&hand), "{EEEE}[5555p6]123m456sC");

    let (hand, win) = parse_hand("11122233344455m").unwrap();
    assert_eq!(hand.standing_tiles.len(), 14);
    assert_eq!(win, None);

    let (hand, win) = parse_win_hand("11122233344455m").unwrap();
    assert_eq!(hand.standing_tiles.len(), 13);
    assert_eq!(win, Tile::new(SUIT_CHARACTERS, 5));
}

#[test]
fn test_parse_hand_error() {
    assert_eq!(parse_hand("[12p]"), Err(ParseError::WrongTileCountForFixedPack(2)));
    assert_eq!(parse_hand("[124p]"), Err(ParseError::CannotMakeFixedPack));
    assert_eq!(parse_hand("{EEE}"), Err(ParseError::WrongTileCountForFixedPack(3)));
    assert_eq!(parse_hand("[123p4]"), Err(ParseError::CannotMakeFixedPack));
    assert_eq!(
        parse_hand("[111m][222m][333m][444m][555m]"),
        Err(ParseError::TooManyFixedPacks)
    );
    assert_eq!(parse_hand("123456789m123456p"), Err(ParseError::TooManyTiles));
    assert_eq!(parse_hand("11111m"), Err(ParseError::TileCountGreaterThan4));
    assert_eq!(parse_hand("[123p]12"), Err(ParseError::MissingSuffix));
    assert_eq!(parse_hand("123m]"), Err(ParseError::IllegalCharacter(4, ']')));
}

#[test]
fn test_format_roundtrip() {
    use rand::prelude::*;

    let mut rng = StdRng::seed_from_u64(7);
    // 順子, 明刻, 明槓, 暗槓, 加槓
    let mut seen = [false; 5];
    for _ in 0..500 {
        let mut tt: TileTable = [0; TILE_KIND];
        let mut fixed_packs = vec![];
        for _ in 0..rng.gen_range(0..=PACK) {
            let kind = rng.gen_range(0..5);
            let t = Tile::from_index(rng.gen_range(0..TILE_KIND));
            let p = match kind {
                0 => {
                    if !t.is_numbered_suit() || t.rank() > 7 {
                        continue;
                    }
                    Pack::new(rng.gen_range(1..=3), PackType::Chow, t.shift(1))
                }
                1 => Pack::new(rng.gen_range(1..=3), PackType::Pung, t),
                2 => Pack::new(rng.gen_range(1..=3), PackType::Kong, t),
                3 => Pack::new(0, PackType::Kong, t),
                _ => Pack::new(rng.gen_range(1..=3), PackType::Pung, t).promote_pung_to_kong(),
            };
            let mut tt2 = tt;
            for x in p.tiles() {
                inc_tile(&mut tt2, x);
            }
            if tt2.iter().any(|&n| n as usize > TILE) {
                continue;
            }
            tt = tt2;
            fixed_packs.push(p);
            seen[kind] = true;
        }

        // 残りの牌から立牌と和了牌を選ぶ
        let mut pool = vec![];
        for i in 0..TILE_KIND {
            for _ in tt[i] as usize..TILE {
                pool.push(Tile::from_index(i));
            }
        }
        pool.shuffle(&mut rng);
        let n = HAND_SIZE - 3 * fixed_packs.len();
        let mut standing_tiles: Vec<Tile> = pool.drain(..n).collect();
        standing_tiles.sort();
        let hand = Hand::new(fixed_packs, standing_tiles);
        let win = pool[0];

        let s = format!("{},{}", format_hand(&hand), win);
        let (hand2, win2) = parse_hand(&s).unwrap();
        assert_eq!(hand2, hand, "{}", s);
        assert_eq!(win2, Some(win));
    }
    assert_eq!(seen, [true; 5]);
}

#[test]
fn test_format_pack_kinds() {
    let e = Tile::new(SUIT_HONORS, WE);
    let m2 = Tile::new(SUIT_CHARACTERS, 2);
    assert_eq!(format_pack(Pack::new(3, PackType::Chow, m2)), "[123m3]");
    assert_eq!(format_pack(Pack::new(0, PackType::Kong, e)), "{EEEE}");
    assert_eq!(format_pack(Pack::new(2, PackType::Kong, e)), "[EEEE2]");
    let promoted = Pack::new(2, PackType::Pung, e).promote_pung_to_kong();
    assert_eq!(format_pack(promoted), "[EEEE6]");
    let (hand, _) = parse_hand("[EEEE6]{9999p}[123m3]1s").unwrap();
    assert_eq!(hand.fixed_packs[0], promoted);
    assert!(hand.fixed_packs[0].is_melded());
    assert_eq!(hand.fixed_packs[1], Pack::new(0, PackType::Kong, Tile::new(SUIT_DOTS, 9)));
    assert_eq!(hand.fixed_packs[2], Pack::new(3, PackType::Chow, m2));
}
