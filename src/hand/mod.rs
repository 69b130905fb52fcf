// 手牌の分解, 番数計算, 向聴数計算を行うモジュール
mod adjust;
mod basic;
mod calculate;
mod discard;
mod divide;
mod group;
mod shanten;
mod special;
mod wait;

pub use self::{
    calculate::calculate_fan,
    discard::{enum_discard_tile, DiscardResult},
    divide::{divide_win_hand, Division},
    shanten::{
        honors_and_knitted_tiles_shanten, knitted_straight_shanten, regular_shanten,
        seven_pairs_shanten, shanten_all, thirteen_orphans_shanten, ShapeFlags,
    },
    special::KNITTED_SEQUENCES,
    wait::{
        honors_and_knitted_waiting, is_honors_and_knitted_wait, is_honors_and_knitted_win,
        is_knitted_straight_wait, is_knitted_straight_win, is_regular_win, is_seven_pairs_wait,
        is_seven_pairs_win, is_thirteen_orphans_wait, is_thirteen_orphans_win, is_waiting,
        knitted_straight_waiting, regular_waiting, seven_pairs_waiting, thirteen_orphans_waiting,
    },
};
