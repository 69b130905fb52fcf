#![warn(rust_2018_idioms)]
// 構造的な意味合いや一貫性を保つために以下の警告は無効化
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::needless_range_loop)]

mod app;

use gbmahjong::error;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        error!("mode not specified");
        return;
    }

    let args2 = args[2..].to_vec();
    match args[1].as_str() {
        "C" => {
            // Calculator (算番モード)
            app::CalculatorApp::new(args2).run();
        }
        "S" => {
            // Shanten (向聴数・有効牌の解析モード)
            app::AnalyzerApp::new(args2).run();
        }
        "T" => {
            // Trainer (ランダム配牌の打牌練習モード)
            app::TrainerApp::new(args2).run();
        }
        m => {
            error!("unknown mode: {}", m)
        }
    }
}
