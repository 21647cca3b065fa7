//! Template loading and management

use specdocs_common::{Result, SpecError};
use tera::Tera;

/// Load all templates
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();

    tera.add_raw_template("page.mdx", include_str!("../templates/page.mdx.tera"))
        .map_err(|e| SpecError::Generation(format!("Failed to load page.mdx template: {}", e)))?;

    Ok(tera)
}
