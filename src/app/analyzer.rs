use gbmahjong::convert::notation::{format_tiles, parse_hand};
use gbmahjong::hand::{enum_discard_tile, shanten_all, DiscardResult, ShapeFlags};
use gbmahjong::model::*;
use gbmahjong::util::misc::*;

use gbmahjong::error;

// 手牌の向聴数と有効牌を表示
#[derive(Debug)]
pub struct AnalyzerApp {
    args: Vec<String>,
    flags: ShapeFlags,
    detail: bool,
}

impl AnalyzerApp {
    pub fn new(args: Vec<String>) -> Self {
        Self {
            args,
            flags: ShapeFlags::ALL,
            detail: false,
        }
    }

    pub fn run(&mut self) {
        let mut file_path = "".to_string();
        let mut exps = vec![];
        let args = self.args.clone();
        let mut it = args.iter();
        while let Some(s) = it.next() {
            match s.as_str() {
                "-d" => self.detail = true,
                "-r" => self.flags = ShapeFlags::REGULAR, // 基本形のみ
                "-f" => file_path = next_value(&mut it, s),
                _ => {
                    if s.starts_with('-') {
                        error!("unknown option: {}", s);
                        return;
                    }
                    exps.push(s.clone());
                }
            }
        }

        if !file_path.is_empty() {
            match read_lines(&file_path) {
                Ok(lines) => exps.extend(
                    lines
                        .into_iter()
                        .filter(|l| !l.trim().is_empty() && !l.starts_with('#')),
                ),
                Err(e) => {
                    error!("{}: {}", file_path, e);
                    return;
                }
            }
        }

        if exps.is_empty() {
            print_usage();
            return;
        }

        for exp in &exps {
            if let Err(e) = self.analyze(exp) {
                error!("{}: {}", exp, e);
            }
            println!();
        }
    }

    fn analyze(&self, exp: &str) -> Res {
        println!("> {}", exp);
        let exp = exp.replace(' ', "");
        let (mut hand, mut drawn) = parse_hand(&exp)?;
        let n = hand.standing_tiles.len();
        if drawn.is_none() && n % 3 == 2 {
            drawn = hand.standing_tiles.pop();
        }
        if hand.standing_tiles.len() % 3 != 1 {
            Err(format!("invalid number of standing tiles: {}", n))?;
        }

        let visible = hand.tile_table();
        match drawn {
            None => {
                let (shanten, useful) = shanten_all(&hand.standing_tiles, self.flags);
                if shanten == i32::MAX {
                    Err("no shape is applicable")?;
                }
                println!("shanten: {}", shanten);
                print_useful_tiles(&useful, &visible);
            }
            Some(t) => {
                let mut visible = visible;
                inc_tile(&mut visible, t);
                let mut results = vec![];
                enum_discard_tile(&hand, Some(t), self.flags, |r| {
                    results.push(r.clone());
                    true
                });
                print_discard_results(&results, &visible, self.detail);
            }
        }
        Ok(())
    }
}

fn remaining_count(useful: &UsefulTable, visible: &TileTable) -> usize {
    (0..TILE_KIND)
        .filter(|&i| useful[i])
        .map(|i| TILE.saturating_sub(visible[i] as usize))
        .sum()
}

fn print_useful_tiles(useful: &UsefulTable, visible: &TileTable) {
    println!(
        "useful: {} ({} kinds, {} tiles)",
        format_tiles(&useful_tiles(useful)),
        count_useful_tiles(useful),
        remaining_count(useful, visible),
    );
}

// 打牌ごとに最小の向聴数を持つ形のみ表示 (向聴数, 残り枚数の順)
pub(super) fn print_discard_results(results: &[DiscardResult], visible: &TileTable, detail: bool) {
    let mut best: Vec<&DiscardResult> = vec![];
    for r in results {
        if detail {
            println!("  {} {}: {}", r.discard_tile, r.shape.name(), r.shanten);
        }
        match best.iter().position(|b| b.discard_tile == r.discard_tile) {
            Some(i) if best[i].shanten > r.shanten => best[i] = r,
            Some(_) => {}
            None => best.push(r),
        }
    }
    best.sort_by_key(|r| (r.shanten, std::cmp::Reverse(remaining_count(&r.useful_table, visible))));

    for r in best {
        if r.shanten < 0 {
            println!("discard: {} (win)", r.discard_tile);
            continue;
        }
        println!(
            "discard: {}, shape: {}, shanten: {}, useful: {} ({} tiles)",
            r.discard_tile,
            r.shape.name(),
            r.shanten,
            format_tiles(&useful_tiles(&r.useful_table)),
            remaining_count(&r.useful_table, visible),
        );
    }
}

fn print_usage() {
    error!(
        r"invalid input
Usage
    $ cargo run S HAND... [-d] [-r]
    $ cargo run S -f FILE [-d] [-r]
Hand
    13 tiles: shanten and useful tiles
    14 tiles (or HAND,DRAWN): shanten and useful tiles for each discard
Options
    -d: print all shapes of each discard
    -r: regular shape only
    -f: read hands from file
"
    );
}

#[test]
fn test_remaining_count() {
    let (hand, _) = parse_hand("123m456s789p1mEEC").unwrap();
    let (shanten, useful) = shanten_all(&hand.standing_tiles, ShapeFlags::REGULAR);
    assert_eq!(shanten, 1);
    // 1m, E, Cは手牌から見えている枚数を除く
    let visible = hand.tile_table();
    let n = remaining_count(&useful, &visible);
    assert!(n > 0 && n <= count_useful_tiles(&useful) * TILE);
}

#[test]
fn test_analyze() {
    let app = AnalyzerApp::new(vec![]);
    app.analyze("1112345678999s").unwrap();
    app.analyze("1112345678999s,5s").unwrap();
    app.analyze("11123456789999s").unwrap();
    assert!(app.analyze("111234567s").is_err());
    assert!(app.analyze("123x").is_err());
}
