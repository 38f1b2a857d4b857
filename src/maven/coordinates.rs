//! Project coordinates as computed by Maven
//!
//! The artifact name is not parsed from `pom.xml`; Maven evaluates it, so
//! parent POMs, properties and profiles are all taken into account.

use crate::error::{MvnboxError, MvnboxResult};

/// Pinned help plugin used to evaluate expressions
pub const HELP_PLUGIN: &str = "org.apache.maven.plugins:maven-help-plugin:3.2.0:evaluate";

/// Expression for the project's artifactId
pub const ARTIFACT_ID_EXPRESSION: &str = "project.artifactId";

/// Expression for the project's version
pub const VERSION_EXPRESSION: &str = "project.version";

/// What the help plugin prints for an unknown expression
const INVALID_EXPRESSION_MARKER: &str = "null object or invalid expression";

/// Maven project name and version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinates {
    pub artifact_id: String,
    pub version: String,
}

impl Coordinates {
    /// Path of the default jar, relative to the project directory
    pub fn jar_file_name(&self) -> String {
        format!("target/{}-{}.jar", self.artifact_id, self.version)
    }
}

/// Command line that prints a single expression to stdout
pub fn evaluate_command(expression: &str) -> Vec<String> {
    vec![
        "mvn".to_string(),
        HELP_PLUGIN.to_string(),
        format!("-Dexpression={}", expression),
        "-q".to_string(),
        "-DforceStdout".to_string(),
    ]
}

/// Extract the evaluated value from the plugin's stdout
pub fn parse_evaluate_output(expression: &str, stdout: &str) -> MvnboxResult<String> {
    let value = stdout.trim();

    let failure = |reason: &str| MvnboxError::MavenMetadata {
        expression: expression.to_string(),
        reason: reason.to_string(),
    };

    if value.is_empty() {
        return Err(failure("no output"));
    }
    if value.contains(INVALID_EXPRESSION_MARKER) {
        return Err(failure("Maven reported an invalid expression"));
    }
    if value.lines().count() > 1 {
        return Err(failure(&format!("unexpected output: {}", value)));
    }

    Ok(value.to_string())
}
