// mainから直接呼び出すアプリケーションの動作モード(C, S, T)のモジュール

mod analyzer;
mod calculator;
mod trainer;

pub use analyzer::AnalyzerApp;
pub use calculator::CalculatorApp;
pub use trainer::TrainerApp;
