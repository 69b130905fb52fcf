use super::*;

// 手牌 (副露 + 立牌)
// 3 * fixed_packs.len() + standing_tiles.len() == 13 (和了牌は含まない)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Hand {
    pub fixed_packs: Vec<Pack>,    // 副露 (暗槓を含む)
    pub standing_tiles: Vec<Tile>, // 立牌
}

impl Hand {
    pub fn new(fixed_packs: Vec<Pack>, standing_tiles: Vec<Tile>) -> Self {
        Self {
            fixed_packs,
            standing_tiles,
        }
    }

    // 3 * 副露数 + 立牌数 (槓子は3枚として数える)
    pub fn tile_count(&self) -> usize {
        PACK.min(self.fixed_packs.len()) * 3 + self.standing_tiles.len()
    }

    pub fn is_concealed(&self) -> bool {
        self.fixed_packs.iter().all(|p| !p.is_melded())
    }

    // 立牌の枚数テーブル
    pub fn standing_table(&self) -> TileTable {
        tiles_to_tile_table(&self.standing_tiles)
    }

    // 副露を含むすべての牌の枚数テーブル (槓子は4枚)
    pub fn tile_table(&self) -> TileTable {
        let mut tt = self.standing_table();
        for p in &self.fixed_packs {
            for t in p.tiles() {
                inc_tile(&mut tt, t);
            }
        }
        tt
    }

    pub fn sort(&mut self) {
        self.standing_tiles.sort();
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::convert::notation::format_hand(self))
    }
}

#[test]
fn test_hand_count() {
    let chow = Pack::new(1, PackType::Chow, Tile::new(SUIT_DOTS, 2));
    let kong = Pack::new(0, PackType::Kong, Tile::new(SUIT_HONORS, WE));
    let mut standing = vec![Tile::new(SUIT_CHARACTERS, 1); 3];
    standing.extend(vec![Tile::new(SUIT_BAMBOO, 9); 4]);
    let hand = Hand::new(vec![chow, kong], standing);
    assert_eq!(hand.tile_count(), 13);
    assert!(!hand.is_concealed());

    let tt = hand.tile_table();
    assert_eq!(tt[Tile::new(SUIT_HONORS, WE).index()], 4);
    assert_eq!(tt[Tile::new(SUIT_DOTS, 3).index()], 1);
    assert_eq!(tt.iter().map(|&n| n as usize).sum::<usize>(), 14);
}
