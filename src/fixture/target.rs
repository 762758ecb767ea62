use url::Url;

use super::ProvisionError;

/// Database the fixture is built in, plus the administrative URL used to drop
/// and recreate it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseTarget {
    url: Url,
    admin_url: Url,
    name: String,
    admin_database: String,
}

impl DatabaseTarget {
    /// Parses a PostgreSQL URL and derives the admin URL by swapping the
    /// database name for `admin_database`
    pub fn parse(url: &str, admin_database: &str) -> Result<Self, ProvisionError> {
        let url = Url::parse(url)
            .map_err(|e| ProvisionError::InvalidTarget(format!("unparseable URL: {}", e)))?;

        if !matches!(url.scheme(), "postgres" | "postgresql") {
            return Err(ProvisionError::InvalidTarget(format!(
                "only PostgreSQL databases can be dropped and recreated, got scheme `{}`",
                url.scheme()
            )));
        }

        let name = url.path().trim_start_matches('/').to_string();

        if name.is_empty() {
            return Err(ProvisionError::InvalidTarget("URL names no database".to_string()));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ProvisionError::InvalidTarget(format!(
                "unsupported database name `{}`",
                name
            )));
        }
        if name == admin_database {
            return Err(ProvisionError::InvalidTarget(format!(
                "target database `{}` is the administrative database",
                name
            )));
        }

        let mut admin_url = url.clone();
        admin_url.set_path(&format!("/{}", admin_database));

        Ok(Self {
            url,
            admin_url,
            name,
            admin_database: admin_database.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn admin_database(&self) -> &str {
        &self.admin_database
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn admin_url(&self) -> &str {
        self.admin_url.as_str()
    }

    /// Target URL with the password masked, for logs
    pub fn redacted(&self) -> String {
        let mut url = self.url.clone();
        if url.password().is_some() {
            let _ = url.set_password(Some("***"));
        }
        url.to_string()
    }
}
