// 牌山の生成
use rand::prelude::*;

use crate::model::*;

// 136枚をシャッフルした牌山 (同じseedでは同じ並び)
pub fn create_wall(seed: u64) -> Vec<Tile> {
    let mut wall = vec![];
    for t in ALL_TILES {
        for _ in 0..TILE {
            wall.push(t);
        }
    }
    let mut rng = StdRng::seed_from_u64(seed);
    wall.shuffle(&mut rng);
    wall
}

#[test]
fn test_create_wall() {
    let wall = create_wall(0);
    assert_eq!(wall.len(), TILE_KIND * TILE);
    assert!(tiles_to_tile_table(&wall).iter().all(|&n| n as usize == TILE));
    assert_eq!(wall, create_wall(0));
    assert_ne!(wall, create_wall(1));
}
