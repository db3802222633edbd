use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_range, Validate};
use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// 出發日往前推的天數，以及回程日往後推的天數（0 表示節日當天回程）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRule {
    pub departure_offset_days: u32,
    #[serde(default)]
    pub return_offset_days: u32,
}

impl WindowRule {
    pub const fn new(departure_offset_days: u32, return_offset_days: u32) -> Self {
        Self {
            departure_offset_days,
            return_offset_days,
        }
    }

    pub fn return_is_holiday(&self) -> bool {
        self.return_offset_days == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayTable {
    pub mon: WindowRule,
    pub tue: WindowRule,
    pub wed: WindowRule,
    pub thu: WindowRule,
    pub fri: WindowRule,
    pub sat: WindowRule,
    pub sun: WindowRule,
}

impl WeekdayTable {
    pub fn rule_for(&self, weekday: Weekday) -> WindowRule {
        match weekday {
            Weekday::Mon => self.mon,
            Weekday::Tue => self.tue,
            Weekday::Wed => self.wed,
            Weekday::Thu => self.thu,
            Weekday::Fri => self.fri,
            Weekday::Sat => self.sat,
            Weekday::Sun => self.sun,
        }
    }

    pub fn set(&mut self, weekday: Weekday, rule: WindowRule) {
        let slot = match weekday {
            Weekday::Mon => &mut self.mon,
            Weekday::Tue => &mut self.tue,
            Weekday::Wed => &mut self.wed,
            Weekday::Thu => &mut self.thu,
            Weekday::Fri => &mut self.fri,
            Weekday::Sat => &mut self.sat,
            Weekday::Sun => &mut self.sun,
        };
        *slot = rule;
    }

    fn entries(&self) -> [(Weekday, WindowRule); 7] {
        [
            (Weekday::Mon, self.mon),
            (Weekday::Tue, self.tue),
            (Weekday::Wed, self.wed),
            (Weekday::Thu, self.thu),
            (Weekday::Fri, self.fri),
            (Weekday::Sat, self.sat),
            (Weekday::Sun, self.sun),
        ]
    }
}

impl Default for WeekdayTable {
    /// 一般國定假日：盡量接上週末
    fn default() -> Self {
        Self {
            mon: WindowRule::new(4, 0),
            tue: WindowRule::new(4, 0),
            wed: WindowRule::new(0, 3),
            thu: WindowRule::new(1, 3),
            fri: WindowRule::new(2, 2),
            sat: WindowRule::new(3, 1),
            sun: WindowRule::new(4, 0),
        }
    }
}

/// 名稱包含 `keyword`（且星期相符時）的節日改用 `rule`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRule {
    pub keyword: String,
    #[serde(default)]
    pub weekday: Option<Weekday>,
    #[serde(flatten)]
    pub rule: WindowRule,
}

impl NamedRule {
    pub fn new(keyword: &str, weekday: Option<Weekday>, rule: WindowRule) -> Self {
        Self {
            keyword: keyword.to_string(),
            weekday,
            rule,
        }
    }

    pub fn matches(&self, name: &str, weekday: Weekday) -> bool {
        name.contains(&self.keyword) && self.weekday.map_or(true, |w| w == weekday)
    }
}

/// 節日區間的挑選規則表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowPolicy {
    pub weekdays: WeekdayTable,
    pub named_rules: Vec<NamedRule>,
    pub skip_keywords: Vec<String>,
    pub compensatory_marker: String,
}

const MAX_OFFSET_DAYS: u32 = 31;

impl WindowPolicy {
    /// 只用星期表，不含任何名稱規則
    pub fn with_weekdays(weekdays: WeekdayTable) -> Self {
        Self {
            weekdays,
            named_rules: Vec::new(),
            ..Self::default()
        }
    }

    pub fn is_skipped(&self, name: &str) -> bool {
        self.skip_keywords.iter().any(|k| name.contains(k.as_str()))
            || (!self.compensatory_marker.is_empty() && name.contains(&self.compensatory_marker))
    }

    pub fn rule_for(&self, name: &str, weekday: Weekday) -> WindowRule {
        self.named_rules
            .iter()
            .find(|r| r.matches(name, weekday))
            .map(|r| r.rule)
            .unwrap_or_else(|| self.weekdays.rule_for(weekday))
    }
}

impl Default for WindowPolicy {
    fn default() -> Self {
        let mut named_rules = vec![NamedRule::new(
            "開國紀念日",
            Some(Weekday::Wed),
            WindowRule::new(4, 0),
        )];

        // 小年夜連著春節，回程往後拉
        let lunar_eve = [
            (Weekday::Mon, WindowRule::new(2, 4)),
            (Weekday::Tue, WindowRule::new(3, 3)),
            (Weekday::Wed, WindowRule::new(4, 2)),
            (Weekday::Thu, WindowRule::new(2, 4)),
            (Weekday::Fri, WindowRule::new(2, 4)),
            (Weekday::Sat, WindowRule::new(2, 3)),
            (Weekday::Sun, WindowRule::new(2, 3)),
        ];
        named_rules.extend(
            lunar_eve
                .into_iter()
                .map(|(weekday, rule)| NamedRule::new("小年夜", Some(weekday), rule)),
        );

        Self {
            weekdays: WeekdayTable::default(),
            named_rules,
            skip_keywords: vec!["春節".to_string(), "農曆除夕".to_string()],
            compensatory_marker: "補".to_string(),
        }
    }
}

impl Validate for WindowPolicy {
    fn validate(&self) -> Result<()> {
        for (weekday, rule) in self.weekdays.entries() {
            let field = format!("policy.weekdays.{}", weekday.to_string().to_lowercase());
            validate_rule(&field, rule)?;
        }

        for (idx, named) in self.named_rules.iter().enumerate() {
            validate_non_empty_string(&format!("policy.named_rules[{}].keyword", idx), &named.keyword)?;
            validate_rule(&format!("policy.named_rules[{}]", idx), named.rule)?;
        }

        for (idx, keyword) in self.skip_keywords.iter().enumerate() {
            validate_non_empty_string(&format!("policy.skip_keywords[{}]", idx), keyword)?;
        }

        Ok(())
    }
}

fn validate_rule(field: &str, rule: WindowRule) -> Result<()> {
    validate_range(
        &format!("{}.departure_offset_days", field),
        rule.departure_offset_days,
        0,
        MAX_OFFSET_DAYS,
    )?;
    validate_range(
        &format!("{}.return_offset_days", field),
        rule.return_offset_days,
        0,
        MAX_OFFSET_DAYS,
    )
}
