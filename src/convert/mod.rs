// 外部表現との相互変換
pub mod notation;
