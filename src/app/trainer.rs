use gbmahjong::convert::notation::format_tiles;
use gbmahjong::hand::{enum_discard_tile, ShapeFlags};
use gbmahjong::model::*;
use gbmahjong::util::misc::*;
use gbmahjong::util::wall::create_wall;

use gbmahjong::{error, info};

use super::analyzer::print_discard_results;

// 牌山から配牌を行い, 打牌候補を表示
#[derive(Debug)]
pub struct TrainerApp {
    seed: u64,
    count: usize,
    flags: ShapeFlags,
    detail: bool,
}

impl TrainerApp {
    pub fn new(args: Vec<String>) -> Self {
        let mut app = Self {
            seed: 0,
            count: 1,
            flags: ShapeFlags::ALL,
            detail: false,
        };

        let mut it = args.iter();
        while let Some(s) = it.next() {
            match s.as_str() {
                "-s" => app.seed = next_value(&mut it, s),
                "-n" => app.count = next_value(&mut it, s),
                "-r" => app.flags = ShapeFlags::REGULAR,
                "-d" => app.detail = true,
                opt => {
                    error!("unknown option: {}", opt);
                    std::process::exit(0);
                }
            }
        }

        if app.seed == 0 {
            app.seed = unixtime_now() as u64;
            info!(
                "Random seed is not specified. Unix timestamp '{}' is used as seed.",
                app.seed
            );
        }

        app
    }

    pub fn run(self) {
        println!("seed: {}", self.seed);
        for i in 0..self.count {
            let seed = self.seed.wrapping_add(i as u64);
            let (hand, drawn) = deal(seed);
            println!("[{}] {} + {}", i, format_tiles(&hand.standing_tiles), drawn);

            let mut visible = hand.standing_table();
            inc_tile(&mut visible, drawn);
            let mut results = vec![];
            enum_discard_tile(&hand, Some(drawn), self.flags, |r| {
                results.push(r.clone());
                true
            });
            print_discard_results(&results, &visible, self.detail);
            println!();

            if (i + 1) % 100 == 0 {
                info!("{}/{} hands", i + 1, self.count);
            }
        }
    }
}

// 牌山の先頭13枚を配牌, 14枚目をツモ牌とする
fn deal(seed: u64) -> (Hand, Tile) {
    let wall = create_wall(seed);
    let mut tiles = wall[..HAND_SIZE].to_vec();
    tiles.sort();
    (Hand::new(vec![], tiles), wall[HAND_SIZE])
}

#[test]
fn test_deal() {
    let (hand, drawn) = deal(1);
    assert_eq!(hand.tile_count(), HAND_SIZE);
    assert!(hand.standing_tiles.windows(2).all(|w| w[0] <= w[1]));
    let mut tt = hand.standing_table();
    inc_tile(&mut tt, drawn);
    assert!(tt.iter().all(|&n| n as usize <= TILE));
    assert_eq!(deal(1), (hand.clone(), drawn));

    // 配牌は牌山の先頭13枚, ツモ牌は14枚目
    let wall = create_wall(1);
    let mut head = wall[..HAND_SIZE].to_vec();
    head.sort();
    assert_eq!(hand.standing_tiles, head);
    assert_eq!(drawn, wall[HAND_SIZE]);
    assert!(hand.fixed_packs.is_empty());
}
