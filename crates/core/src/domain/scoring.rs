use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Coarse risk bucket assigned by the scoring service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RiskLevel {
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "LOW")]
    Low,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::High => "HIGH",
            RiskLevel::Low => "LOW",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `risk_level` outside `HIGH`/`LOW`. Never mapped to a default bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRiskLevel {
    pub value: String,
}

impl fmt::Display for UnknownRiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown risk level '{}' (expected HIGH or LOW)",
            self.value
        )
    }
}

impl std::error::Error for UnknownRiskLevel {}

impl std::str::FromStr for RiskLevel {
    type Err = UnknownRiskLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HIGH" => Ok(RiskLevel::High),
            "LOW" => Ok(RiskLevel::Low),
            other => Err(UnknownRiskLevel {
                value: other.to_string(),
            }),
        }
    }
}

/// Feature name to signed attribution, kept in the order the service sent it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributions(Vec<(String, f64)>);

impl Attributions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces; a replaced key keeps its original position.
    pub fn insert(&mut self, feature: impl Into<String>, impact: f64) {
        let feature = feature.into();
        match self.0.iter_mut().find(|(name, _)| *name == feature) {
            Some(slot) => slot.1 = impact,
            None => self.0.push((feature, impact)),
        }
    }

    pub fn get(&self, feature: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(name, _)| name == feature)
            .map(|(_, impact)| *impact)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.0.iter().map(|(name, impact)| (name.as_str(), *impact))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Attributions {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut out = Attributions::new();
        for (feature, impact) in iter {
            out.insert(feature, impact);
        }
        out
    }
}

impl Serialize for Attributions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (feature, impact) in &self.0 {
            map.serialize_entry(feature, impact)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Attributions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AttributionsVisitor;

        impl<'de> Visitor<'de> for AttributionsVisitor {
            type Value = Attributions;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping feature names to numbers")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut out = Attributions(Vec::with_capacity(access.size_hint().unwrap_or(0)));
                while let Some((feature, impact)) = access.next_entry::<String, f64>()? {
                    out.insert(feature, impact);
                }
                Ok(out)
            }
        }

        deserializer.deserialize_map(AttributionsVisitor)
    }
}

/// Validated `POST /predict` response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringResult {
    pub default_probability: f64,
    pub risk_level: RiskLevel,
    pub shap_values: Attributions,
}
