use std::fmt;

// 表記のパースエラー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    // 使用できない文字 (位置, 文字)
    IllegalCharacter(usize, char),
    // 数字の後ろに種別(m, s, p)がない
    MissingSuffix,
    // 副露の枚数が3枚または4枚ではない
    WrongTileCountForFixedPack(usize),
    // 順子・刻子・槓子のいずれにもならない
    CannotMakeFixedPack,
    // 副露が5組以上
    TooManyFixedPacks,
    // 牌の数が多すぎる
    TooManyTiles,
    // 同じ牌が5枚以上
    TileCountGreaterThan4,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::IllegalCharacter(pos, c) => {
                write!(f, "illegal character '{}' at {}", c, pos)
            }
            ParseError::MissingSuffix => write!(f, "digits without suit suffix"),
            ParseError::WrongTileCountForFixedPack(n) => {
                write!(f, "wrong tile count for fixed pack: {}", n)
            }
            ParseError::CannotMakeFixedPack => write!(f, "cannot make fixed pack"),
            ParseError::TooManyFixedPacks => write!(f, "too many fixed packs"),
            ParseError::TooManyTiles => write!(f, "too many tiles"),
            ParseError::TileCountGreaterThan4 => write!(f, "tile count greater than 4"),
        }
    }
}

impl std::error::Error for ParseError {}

// 算番のエラー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcError {
    // 3 * 副露数 + 立牌数 != 13
    WrongTileCount,
    // 同じ牌が5枚以上
    TileCountGreaterThan4,
    // 和了形ではない
    NotWin,
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcError::WrongTileCount => write!(f, "wrong tile count"),
            CalcError::TileCountGreaterThan4 => write!(f, "tile count greater than 4"),
            CalcError::NotWin => write!(f, "not win hand"),
        }
    }
}

impl std::error::Error for CalcError {}
