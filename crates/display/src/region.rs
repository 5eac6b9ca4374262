use members::Member;
use serde::{Deserialize, Serialize};

/// One named sub-region of the designated country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRule {
    pub label: String,
    /// City substrings that place a member in this region.
    pub needles: Vec<String>,
}

impl RegionRule {
    pub fn new(label: impl Into<String>, needles: &[&str]) -> Self {
        Self {
            label: label.into(),
            needles: needles.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn matches(&self, city: &str) -> bool {
        self.needles.iter().any(|n| city.contains(n.as_str()))
    }
}

/// Region key derivation used by region-level aggregation.
///
/// Members of `country` whose city contains one of a rule's needles share the
/// key `<country>_<label>`; first matching rule wins. Everyone else is keyed
/// per city as `<country>_<city>`.
///
/// When deserializing, omitted `rules` fall back to the default rule set only
/// if `country` is also omitted or names the default country. Any other
/// country without `rules` gets none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RegionRulesDoc")]
pub struct RegionRules {
    pub country: String,
    pub rules: Vec<RegionRule>,
}

#[derive(Deserialize)]
struct RegionRulesDoc {
    country: Option<String>,
    rules: Option<Vec<RegionRule>>,
}

impl From<RegionRulesDoc> for RegionRules {
    fn from(doc: RegionRulesDoc) -> Self {
        let defaults = RegionRules::default();
        let rules = match (doc.rules, &doc.country) {
            (Some(rules), _) => rules,
            (None, Some(country)) if *country != defaults.country => Vec::new(),
            (None, _) => defaults.rules,
        };
        Self {
            country: doc.country.unwrap_or(defaults.country),
            rules,
        }
    }
}

impl Default for RegionRules {
    fn default() -> Self {
        Self {
            country: "France".to_string(),
            rules: vec![
                RegionRule::new("IleDeFrance", &["Paris", "Île-de-France"]),
                RegionRule::new("RhoneAlpes", &["Lyon", "Rhône"]),
                RegionRule::new("NouvelleCaledonie", &["Nouméa", "Nouvelle-Calédonie"]),
            ],
        }
    }
}

impl RegionRules {
    /// No designated country: every member is keyed per city.
    pub fn per_city() -> Self {
        Self {
            country: String::new(),
            rules: Vec::new(),
        }
    }

    pub fn region_key(&self, member: &Member) -> String {
        if !self.country.is_empty()
            && member.country == self.country
            && let Some(rule) = self.rules.iter().find(|r| r.matches(&member.city))
        {
            return format!("{}_{}", member.country, rule.label);
        }
        format!("{}_{}", member.country, member.city)
    }
}
