use std::collections::BTreeSet;

pub static DEFAULT_MEASURES: [&str; 12] = [
    "Violent crime rate",
    "Unemployment",
    "Children in poverty",
    "Diabetic screening",
    "Mammography screening",
    "Preventable hospital stays",
    "Uninsured",
    "Sexually transmitted infections",
    "Physical inactivity",
    "Adult obesity",
    "Premature Death",
    "Daily fine particulate matter",
];

/// A measure name known to be part of the catalog it was parsed against.
#[derive(Clone, Debug, PartialEq)]
pub struct MeasureName(String);

impl AsRef<str> for MeasureName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The set of measure names the lookup accepts.
///
/// Built once at startup and never mutated afterwards. Names are matched
/// exactly, including case.
#[derive(Clone, Debug)]
pub struct MeasureCatalog(BTreeSet<String>);

impl MeasureCatalog {
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        Self(names.into_iter().collect())
    }

    pub fn parse(&self, s: String) -> Result<MeasureName, String> {
        if self.contains(&s) {
            Ok(MeasureName(s))
        } else {
            Err(format!("`{s}` is not a known measure name"))
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for MeasureCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_MEASURES.iter().map(|name| name.to_string()))
    }
}
