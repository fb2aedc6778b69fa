//! Fixture data for seeding: bundled JSON or a caller-supplied file.

use std::path::Path;

use agency_core::service_template::{ProfileRole, TemplateBlueprint};
use agency_db::models::profile::CreateProfile;
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Deserialize;

const BUNDLED_TEMPLATES: &str = include_str!("../../../db/seeds/templates.json");
const BUNDLED_USERS: &str = include_str!("../../../db/seeds/users.json");

/// A test account to seed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserFixture {
    pub email: String,
    pub full_name: String,
    pub role: ProfileRole,
}

impl From<&UserFixture> for CreateProfile {
    fn from(user: &UserFixture) -> Self {
        CreateProfile {
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role.as_str().to_string(),
        }
    }
}

fn load<T: DeserializeOwned>(path: Option<&Path>, bundled: &str, what: &str) -> anyhow::Result<T> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {what} from {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse {what} in {}", path.display()))
        }
        None => serde_json::from_str(bundled)
            .with_context(|| format!("Failed to parse bundled {what}")),
    }
}

/// Template blueprints from `path`, or the bundled set when `None`.
pub fn load_templates(path: Option<&Path>) -> anyhow::Result<Vec<TemplateBlueprint>> {
    load(path, BUNDLED_TEMPLATES, "template fixtures")
}

/// Load a single blueprint from a JSON file.
pub fn load_template_file(path: &Path) -> anyhow::Result<TemplateBlueprint> {
    load(Some(path), "", "template")
}

/// User fixtures from `path`, or the bundled admin/team/client set when `None`.
pub fn load_users(path: Option<&Path>) -> anyhow::Result<Vec<UserFixture>> {
    load(path, BUNDLED_USERS, "user fixtures")
}

#[cfg(test)]
mod tests {
    use super::*;
    use agency_core::service_template::validate_blueprint;
    use std::io::Write;

    #[test]
    fn bundled_templates_are_valid() {
        let templates = load_templates(None).unwrap();
        assert!(templates.len() >= 3);
        for t in &templates {
            validate_blueprint(t).unwrap_or_else(|e| panic!("{}: {e}", t.name));
        }
        assert_eq!(templates.iter().filter(|t| t.is_default).count(), 1);
    }

    #[test]
    fn bundled_users_cover_every_role() {
        let users = load_users(None).unwrap();
        for role in ProfileRole::ALL {
            assert!(users.iter().any(|u| u.role == *role), "missing {role}");
        }
    }

    #[test]
    fn loads_templates_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name": "Tiny", "milestones": [{{"name": "Only", "position": 0,
                "relative_start_days": 0, "relative_due_days": 3, "tasks": []}}]}}]"#
        )
        .unwrap();

        let templates = load_templates(Some(file.path())).unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].milestones[0].relative_due_days, 3);
    }

    #[test]
    fn malformed_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = load_users(Some(file.path())).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse user fixtures"));
    }

    #[test]
    fn user_fixture_converts_to_profile_dto() {
        let user = UserFixture {
            email: "team@agency.test".into(),
            full_name: "Taylor".into(),
            role: ProfileRole::Team,
        };
        let dto = CreateProfile::from(&user);
        assert_eq!(dto.role, "team");
    }
}
