//! Roster - the fixed consultant set served by a provider process.
//!
//! The roster is read-only state initialized once at startup, either from the
//! built-in list or from a YAML file. There is no mutation API.

use crate::models::Consultant;

/// Immutable consultant roster, kept in definition order.
#[derive(Debug, Clone)]
pub struct Roster {
    consultants: Vec<Consultant>,
}

impl Roster {
    /// Build a roster from explicit records, validating the workload invariant.
    pub fn new(consultants: Vec<Consultant>) -> Result<Self, String> {
        for c in &consultants {
            if c.workload_percent > 100 {
                return Err(format!(
                    "Invalid roster entry '{}': workload {}% is outside 0-100",
                    c.name, c.workload_percent
                ));
            }
        }
        Ok(Self { consultants })
    }

    /// The built-in roster used when no roster file is configured.
    pub fn builtin() -> Self {
        Self {
            consultants: vec![
                Consultant::new(1, "Fredrik", skills(&["python", "fastapi", "docker"]), 50),
                Consultant::new(
                    2,
                    "Elias",
                    skills(&[
                        "artificial intelligence",
                        "data-science",
                        "software engineering",
                        "matlab",
                        "mysql",
                        "java",
                        "python",
                    ]),
                    40,
                ),
                Consultant::new(
                    3,
                    "Daniel",
                    skills(&[
                        "artificial intelligence",
                        "data-science",
                        "software engineering",
                        "machine learning",
                        "fastapi",
                        "django",
                        "pandas",
                        "next.js",
                        "postgresql",
                        "python",
                        "java",
                        "sql",
                        "javascript",
                    ]),
                    80,
                ),
                Consultant::new(
                    4,
                    "Erlend",
                    skills(&[
                        "artificial intelligence",
                        "data-science",
                        "software engineering",
                        "c++",
                        "python",
                    ]),
                    60,
                ),
                Consultant::new(
                    5,
                    "Adrian",
                    skills(&[
                        "artificial intelligence",
                        "data-science",
                        "software engineering",
                        "python",
                        "golang",
                        "kubernetes",
                        "docker",
                    ]),
                    70,
                ),
            ],
        }
    }

    /// Load a roster from a YAML file containing a list of consultant records
    /// (wire field names: `id`, `navn`, `ferdigheter`, `belastning_prosent`).
    pub fn from_yaml_file(path: &str) -> Result<Self, String> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read roster file '{}': {}", path, e))?;

        let consultants: Vec<Consultant> = serde_yaml::from_str(&raw)
            .map_err(|e| format!("Failed to parse roster file '{}': {}", path, e))?;

        Self::new(consultants)
    }

    /// All records in fixed definition order.
    pub fn all(&self) -> &[Consultant] {
        &self.consultants
    }

    pub fn len(&self) -> usize {
        self.consultants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.consultants.is_empty()
    }
}

fn skills(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_builtin_roster_shape() {
        let roster = Roster::builtin();
        assert_eq!(roster.len(), 5);

        let first = &roster.all()[0];
        assert_eq!(first.name, "Fredrik");
        assert_eq!(first.workload_percent, 50);
        assert_eq!(first.availability_percent(), 50);

        let last = &roster.all()[4];
        assert_eq!(last.name, "Adrian");
        assert!(last.skills.contains(&"kubernetes".to_string()));
    }

    #[test]
    fn test_new_rejects_out_of_range_workload() {
        let result = Roster::new(vec![Consultant::new(1, "Test", vec![], 101)]);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("outside 0-100"));
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
- id: 1
  navn: Kari
  ferdigheter: [rust, sql]
  belastning_prosent: 25
- id: 2
  navn: Ola
  ferdigheter: []
  belastning_prosent: 100
"#
        )
        .unwrap();

        let roster = Roster::from_yaml_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.all()[0].name, "Kari");
        assert_eq!(roster.all()[0].availability_percent(), 75);
        assert_eq!(roster.all()[1].availability_percent(), 0);
    }

    #[test]
    fn test_from_yaml_file_missing() {
        let result = Roster::from_yaml_file("/nonexistent/roster.yaml");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Failed to read roster file"));
    }

    #[test]
    fn test_from_yaml_file_rejects_bad_workload() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
- id: 1
  navn: Kari
  ferdigheter: [rust]
  belastning_prosent: 120
"#
        )
        .unwrap();

        let result = Roster::from_yaml_file(file.path().to_str().unwrap());
        assert!(result.is_err());
    }
}
