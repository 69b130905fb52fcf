use super::*;

// 算番ルールの設定
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    // 98年版ルールを厳密に適用する
    // true: 明暗槓を採用しない, 必然的に成立する缺一門・無字を不計にしない
    pub strict_98_rule: bool,
    // 天和の状況では14枚のどの牌を和了牌とみなしても九蓮宝燈とする
    pub nine_gates_when_blessing_of_heaven: bool,
}

impl RuleSet {
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[test]
fn test_rule_from_json() {
    let r = RuleSet::from_json(r#"{"strict_98_rule": true}"#).unwrap();
    assert!(r.strict_98_rule);
    assert!(!r.nine_gates_when_blessing_of_heaven);
    assert_eq!(RuleSet::from_json("{}").unwrap(), RuleSet::default());
    assert!(RuleSet::from_json(r#"{"strict_98_rule": 1}"#).is_err());
}
