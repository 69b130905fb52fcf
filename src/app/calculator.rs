use std::fs::File;
use std::io::{self, BufRead};

use serde::Serialize;

use gbmahjong::convert::notation::{format_hand, parse_win_hand};
use gbmahjong::hand::calculate_fan;
use gbmahjong::model::*;
use gbmahjong::util::log::{set_log_level, Level};
use gbmahjong::util::misc::*;

use gbmahjong::{debug, error};

#[derive(Debug)]
pub struct CalculatorApp {
    args: Vec<String>,
    detail: bool,
    json: bool,
    rule: RuleSet,
}

impl CalculatorApp {
    pub fn new(args: Vec<String>) -> Self {
        Self {
            args,
            detail: false,
            json: false,
            rule: RuleSet::default(),
        }
    }

    pub fn run(&mut self) {
        let mut file_path = "".to_string();
        let mut rule_path = "".to_string();
        let mut exp = "".to_string();
        let args = self.args.clone();
        let mut it = args.iter();
        while let Some(s) = it.next() {
            match s.as_str() {
                "-d" => {
                    self.detail = true;
                    set_log_level(Level::Debug);
                }
                "-j" => self.json = true,
                "-f" => file_path = next_value(&mut it, s),
                "-r" => rule_path = next_value(&mut it, s),
                _ => {
                    if s.starts_with('-') {
                        error!("unknown option: {}", s);
                        return;
                    }
                    if !exp.is_empty() {
                        error!("multiple expression is not allowed");
                        return;
                    }
                    exp = s.clone();
                }
            }
        }

        if (file_path.is_empty() && exp.is_empty()) || (!file_path.is_empty() && !exp.is_empty()) {
            print_usage();
            return;
        }

        if !rule_path.is_empty() {
            match load_rule(&rule_path) {
                Ok(rule) => self.rule = rule,
                Err(e) => {
                    error!("{}: {}", rule_path, e);
                    return;
                }
            }
            debug!("rule: {:?}", self.rule);
        }

        if !exp.is_empty() {
            if let Err(e) = self.process_expression(&exp) {
                error!("{}", e);
            }
            return;
        }

        if let Err(e) = self.run_from_file(&file_path) {
            error!("{}", e);
        }
    }

    fn run_from_file(&self, file_path: &str) -> Res {
        let file = File::open(file_path)?;
        let lines = io::BufReader::new(file).lines();
        let mut n_error = 0;
        for exp in lines.map_while(Result::ok) {
            let e = exp.replace(' ', "");
            if e.is_empty() || e.starts_with('#') {
                // 空行とコメント行はスキップ
                println!("> {}", exp);
            } else {
                match self.process_expression(&exp) {
                    Ok(Verify::Error) => n_error += 1,
                    Ok(_) => {}
                    Err(e) => {
                        error!("{}", e);
                        n_error += 1;
                    }
                }
            }
            println!();
        }
        if n_error > 0 {
            Err(format!("{} expression(s) failed", n_error))?;
        }
        Ok(())
    }

    fn process_expression(&self, exp: &str) -> Res<Verify> {
        let mut calculator = Calculator::new(self.detail, self.json, self.rule);
        calculator.parse(exp)?;
        Ok(calculator.run())
    }
}

fn load_rule(path: &str) -> Res<RuleSet> {
    let text = std::fs::read_to_string(path)?;
    Ok(RuleSet::from_json(&text)?)
}

#[derive(Debug, PartialEq)]
enum Verify {
    Ok,
    Error,
    Skip,
}

#[derive(Serialize)]
struct CalculateOutput<'a> {
    hand: &'a Hand,
    win_tile: Tile,
    fans: &'a FanTable,
    total: i32,
}

#[derive(Debug)]
struct Calculator {
    detail: bool,
    json: bool,
    param: CalculateParam,
    // 点数の検証
    verify: bool,
    total: i32,
}

impl Calculator {
    fn new(detail: bool, json: bool, rule: RuleSet) -> Self {
        let mut param = CalculateParam::new(Hand::default(), Z8);
        param.rule = rule;
        Self {
            detail,
            json,
            param,
            verify: false,
            total: 0,
        }
    }

    // HAND[/WINDS[/FLAGS[/EXPECTED]]]
    fn parse(&mut self, input: &str) -> Res {
        println!("> {}", input);

        let input = input.replace(' ', "");
        let input = input.split('#').next().unwrap_or(""); // コメント削除
        let exps: Vec<&str> = input.split('/').collect();
        let len = exps.len();
        if len > 0 {
            let (hand, win_tile) = parse_win_hand(exps[0])?;
            self.param.hand = hand;
            self.param.win_tile = win_tile;
        }
        if len > 1 {
            self.parse_winds(exps[1])?;
        }
        if len > 2 {
            self.parse_win_flags(exps[2])?;
        }
        if len > 3 {
            self.total = exps[3].parse::<i32>()?;
            self.verify = true;
        }

        if self.detail {
            println!("{:?}", self.param);
        }

        Ok(())
    }

    fn run(&self) -> Verify {
        let (ft, total) = match calculate_fan(&self.param) {
            Ok(res) => res,
            Err(e) => {
                println!("{}", e);
                let verify = if !self.verify {
                    Verify::Skip
                } else if self.total == 0 {
                    Verify::Ok
                } else {
                    Verify::Error
                };
                println!("verify: {:?}", verify);
                return verify;
            }
        };

        if self.json {
            let out = CalculateOutput {
                hand: &self.param.hand,
                win_tile: self.param.win_tile,
                fans: &ft,
                total,
            };
            match serde_json::to_string(&out) {
                Ok(s) => println!("{}", s),
                Err(e) => error!("{}", e),
            }
        } else {
            println!("hand: {},{}", format_hand(&self.param.hand), self.param.win_tile);
            println!("fans: {}", ft);
            if self.detail {
                for (fan, n) in ft.iter() {
                    println!("  {:?} {} x{}", fan, fan.value(), n);
                }
            }
            println!("total: {}", total);
        }

        let verify = if !self.verify {
            Verify::Skip
        } else if total == self.total {
            Verify::Ok
        } else {
            Verify::Error
        };
        println!("verify: {:?}", verify);
        verify
    }

    // 圏風と門風の2文字 (例: ES)
    fn parse_winds(&mut self, input: &str) -> Res {
        let chars: Vec<char> = input.chars().collect();
        if chars.len() != 2 {
            Err(format!("winds len is not 2: {}", input))?;
        }
        self.param.prevalent_wind = wind_from_char(chars[0])?;
        self.param.seat_wind = wind_from_char(chars[1])?;
        Ok(())
    }

    fn parse_win_flags(&mut self, input: &str) -> Res {
        for f in input.split(',') {
            match f {
                "自摸" => self.param.win_flags.insert(WinFlags::SELF_DRAWN),
                "绝张" => self.param.win_flags.insert(WinFlags::FOURTH_TILE),
                "杠" => self.param.win_flags.insert(WinFlags::ABOUT_KONG),
                "海底" => self.param.win_flags.insert(WinFlags::WALL_LAST),
                "天和" => self.param.win_flags.insert(WinFlags::INIT),
                "" => {}
                _ => {
                    if let Some(n) = f.strip_prefix('花') {
                        self.param.flower_count = n.parse::<u8>()?;
                    } else {
                        Err(format!("invalid win flag: {}", f))?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn wind_from_char(c: char) -> Res<Rank> {
    match honor_from_char(c) {
        Some(t) if t.is_winds() => Ok(t.rank()),
        _ => Err(format!("invalid wind: {}", c).into()),
    }
}

fn print_usage() {
    error!(
        r"invalid input
Usage
    $ cargo run C EXPRESSION [-d] [-j] [-r RULE_FILE]
    $ cargo run C -f FILE [-d] [-j] [-r RULE_FILE]
Expression
    HAND[/WINDS[/FLAGS[/TOTAL]]]
    e.g. [123p1][345s2]999s6m6pEW,1m/ES/自摸,花2/12
Options
    -d: print debug info
    -j: print result as json
    -f: read expressions from file instead of a commandline expression
    -r: load rule settings from json file
"
    );
}

#[test]
fn test_calculator() {
    let file = File::open("tests/win_hands.txt").unwrap();
    let lines = io::BufReader::new(file).lines();
    for exp in lines.map_while(Result::ok) {
        let e = exp.replace(' ', "");
        if e.is_empty() || e.starts_with('#') {
            println!("> {}", exp);
        } else {
            let mut calculator = Calculator::new(false, false, RuleSet::default());
            calculator.parse(&e).unwrap();
            assert_ne!(Verify::Error, calculator.run(), "{}", e);
        }
    }
}

#[test]
fn test_parse_expression() {
    let mut calculator = Calculator::new(false, false, RuleSet::default());
    calculator.parse("1112345678999s,9s/SW/自摸,绝张,花3/0").unwrap();
    let p = &calculator.param;
    assert_eq!(p.prevalent_wind, WS);
    assert_eq!(p.seat_wind, WW);
    assert!(p.win_flags.is_self_drawn() && p.win_flags.contains(WinFlags::FOURTH_TILE));
    assert_eq!(p.flower_count, 3);
    assert!(calculator.verify);

    let mut calculator = Calculator::new(false, false, RuleSet::default());
    assert!(calculator.parse("123m/EC").is_err());
    let mut calculator = Calculator::new(false, false, RuleSet::default());
    assert!(calculator.parse("123m/EE/立直").is_err());
}
