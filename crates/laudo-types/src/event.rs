//! Inspection events (observed anomalies) and their classification

use serde::{Deserialize, Serialize};

use crate::attachment::Attachment;
use crate::catalog::DEFAULT_CAUSE;

/// Maximum number of images kept per event
pub const MAX_EVENT_IMAGES: usize = 3;

/// Label used when an event applies to the building as a whole
pub const GENERAL_LOCATION: &str = "Generalidades";

/// Urgency tier of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum Priority {
    #[serde(rename = "Prioridade 1")]
    P1,
    #[default]
    #[serde(rename = "Prioridade 2")]
    P2,
    #[serde(rename = "Prioridade 3")]
    P3,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::P1, Priority::P2, Priority::P3];

    pub fn label(&self) -> &'static str {
        match self {
            Priority::P1 => "Prioridade 1",
            Priority::P2 => "Prioridade 2",
            Priority::P3 => "Prioridade 3",
        }
    }

    /// Trailing numeral of the label, as shown in the summary table
    pub fn numeral(&self) -> &'static str {
        match self {
            Priority::P1 => "1",
            Priority::P2 => "2",
            Priority::P3 => "3",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether the element is being used as designed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum UsageStatus {
    #[default]
    Regular,
    Irregular,
}

impl UsageStatus {
    pub fn label(&self) -> &'static str {
        match self {
            UsageStatus::Regular => "Regular",
            UsageStatus::Irregular => "Irregular",
        }
    }
}

/// Where in the building the event was observed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Location {
    #[default]
    General,
    Custom(String),
}

impl Location {
    /// Blank custom text falls back to the general location
    pub fn custom(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            Location::General
        } else {
            Location::Custom(text.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Location::General => GENERAL_LOCATION,
            Location::Custom(text) => text,
        }
    }
}

/// Insertion-ordered collection with set semantics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct OptionSet(Vec<String>);

impl OptionSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert a value; returns false if it was already present
    pub fn insert(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.0.contains(&value) {
            return false;
        }
        self.0.push(value);
        true
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|v| v == value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Values joined with ", " as printed in the report
    pub fn joined(&self) -> String {
        self.0.join(", ")
    }
}

impl From<Vec<String>> for OptionSet {
    fn from(values: Vec<String>) -> Self {
        values.into_iter().collect()
    }
}

impl From<OptionSet> for Vec<String> {
    fn from(set: OptionSet) -> Self {
        set.0
    }
}

impl<S: Into<String>> FromIterator<S> for OptionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = OptionSet::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

/// One documented anomaly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "numero")]
    pub number: u32,
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(rename = "localizacao", default)]
    pub location: Location,
    #[serde(rename = "anomalias", default)]
    pub defects: OptionSet,
    #[serde(rename = "causa", default = "default_cause")]
    pub cause: String,
    #[serde(rename = "consequencias", default)]
    pub consequences: OptionSet,
    #[serde(rename = "prioridade", default)]
    pub priority: Priority,
    #[serde(rename = "uso", default)]
    pub usage: UsageStatus,
    #[serde(rename = "recomendacoes", default)]
    pub recommendations: OptionSet,
    #[serde(rename = "imagens", default)]
    pub images: Vec<Attachment>,
}

impl Event {
    /// A fresh event with the form's placeholder values
    pub fn new(number: u32) -> Self {
        Self {
            number,
            name: String::new(),
            location: Location::General,
            defects: OptionSet::new(),
            cause: DEFAULT_CAUSE.to_string(),
            consequences: OptionSet::new(),
            priority: Priority::P2,
            usage: UsageStatus::Regular,
            recommendations: OptionSet::new(),
            images: Vec::new(),
        }
    }

    /// "EVENTO 07" style label
    pub fn tag(&self) -> String {
        format!("EVENTO {:02}", self.number)
    }
}

fn default_cause() -> String {
    DEFAULT_CAUSE.to_string()
}

/// Reassign dense 1-based numbers following list order
pub fn renumber(events: &mut [Event]) {
    for (idx, event) in events.iter_mut().enumerate() {
        event.number = idx as u32 + 1;
    }
}
