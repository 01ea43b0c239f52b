//! `.env` template generation.

use crate::config::{DEFAULT_DBNAME, DEFAULT_HOST, DEFAULT_PASSWORD, DEFAULT_PORT, DEFAULT_USER};
use anyhow::{bail, Context};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

pub const DEFAULT_TEMPLATE_PATH: &str = ".env.template";

/// Template listing every connection variable with its default, plus
/// commented examples for hosted databases.
pub fn render_env_template() -> String {
    format!(
        "# MANAS360 Test Database Configuration
# Copy this to .env and update values

MANS360_DB_HOST={DEFAULT_HOST}
MANS360_DB_PORT={DEFAULT_PORT}
MANS360_DB_NAME={DEFAULT_DBNAME}
MANS360_DB_USER={DEFAULT_USER}
MANS360_DB_PASSWORD={DEFAULT_PASSWORD}

# For AWS Lightsail:
# MANS360_DB_HOST=ls-xxxxx.ap-south-1.rds.amazonaws.com
# MANS360_DB_PASSWORD=your_rds_password

# For Supabase:
# MANS360_DB_HOST=db.xxxxx.supabase.co
# MANS360_DB_PORT=5432
# MANS360_DB_NAME=postgres
# MANS360_DB_USER=postgres
# MANS360_DB_PASSWORD=your_supabase_password
"
    )
}

/// Write the template to `path`. An existing file is only replaced when
/// `force` is set.
pub fn write_env_template(path: &Path, force: bool) -> anyhow::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true);
    if force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    let mut file = match options.open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            bail!("{} already exists (use --force to overwrite)", path.display())
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to create {}", path.display()));
        }
    };

    file.write_all(render_env_template().as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!("Created {} (copy to .env and update values)", path.display());
    Ok(())
}
