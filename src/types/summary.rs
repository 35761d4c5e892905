use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};
#[cfg(test)]
use std::collections::BTreeMap;

pub type Score = f64;

/// One named, weighted contribution to the global index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreElement {
    pub id: String,
    pub name: String,
    pub value: Option<Score>,
    pub coefficient: f64,
}

impl ScoreElement {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        value: Option<Score>,
        coefficient: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value,
            coefficient,
        }
    }

    /// Builds an element only when the value is defined.
    pub fn scored(
        id: impl Into<String>,
        name: impl Into<String>,
        value: Option<Score>,
        coefficient: f64,
    ) -> Option<Self> {
        value.map(|value| Self::new(id, name, Some(value), coefficient))
    }
}

/// Run-scoped registry of score elements, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Summary {
    elements: Vec<ScoreElement>,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elements with an undefined value are dropped; a known id is overwritten in place.
    pub fn add(&mut self, element: ScoreElement) -> &mut Self {
        if element.value.is_none() {
            return self;
        }
        match self
            .elements
            .iter_mut()
            .find(|existing| existing.id == element.id)
        {
            Some(existing) => *existing = element,
            None => self.elements.push(element),
        }
        self
    }

    pub fn extend(&mut self, elements: impl IntoIterator<Item = ScoreElement>) -> &mut Self {
        for element in elements {
            self.add(element);
        }
        self
    }

    pub fn elements(&self) -> &[ScoreElement] {
        &self.elements
    }

    pub fn get(&self, id: &str) -> Option<&ScoreElement> {
        self.elements.iter().find(|element| element.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Weighted mean of every defined value, or `None` when nothing carries weight.
    pub fn aggregate(&self) -> Option<Score> {
        let (weighted, total_coefficient) = self
            .elements
            .iter()
            .filter_map(|element| element.value.map(|value| (value, element.coefficient)))
            .fold((0.0, 0.0), |(weighted, total), (value, coefficient)| {
                (weighted + value * coefficient, total + coefficient)
            });
        if total_coefficient > 0.0 {
            Some(weighted / total_coefficient)
        } else {
            None
        }
    }

    pub fn global(&self) -> Score {
        self.aggregate().unwrap_or(0.0)
    }

    pub fn has_data(&self) -> bool {
        self.aggregate().is_some()
    }

    pub fn export(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

struct ToolMap<'a>(&'a [ScoreElement]);

impl Serialize for ToolMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for element in self.0 {
            map.serialize_entry(&element.id, element)?;
        }
        map.end()
    }
}

impl Serialize for Summary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Summary", 3)?;
        state.serialize_field("global", &self.global())?;
        state.serialize_field("graded", &self.has_data())?;
        state.serialize_field("tools", &ToolMap(&self.elements))?;
        state.end()
    }
}

/// Parsed form of an exported summary file.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SummarySnapshot {
    pub global: Score,
    pub graded: bool,
    pub tools: BTreeMap<String, ScoreElement>,
}
