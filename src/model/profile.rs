use std::fmt;

/// A named credential profile. Every remote call is scoped by one.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Profile {
    pub name: String,
    pub region: Option<String>,
}

impl Profile {
    pub fn new(name: impl Into<String>, region: Option<String>) -> Self {
        Self {
            name: name.into(),
            region,
        }
    }

    /// `name · region`, or just the name when no region is configured.
    pub fn label(&self) -> String {
        match &self.region {
            Some(region) => format!("{} · {}", self.name, region),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
