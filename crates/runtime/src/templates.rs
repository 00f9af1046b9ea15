use std::path::Path;

use anyhow::{Context, Result};
use notekeeper_config::AppConfig;
use notekeeper_template::{
    DEFAULT_BASE_TEMPLATE, DEFAULT_INTERFACE_TEMPLATE, DEFAULT_TREE_TEMPLATE, Schema,
};
use tracing::info;

use crate::files::FileSystem;

/// The three compiled templates a session works with.
#[derive(Debug, Clone)]
pub struct Templates {
    pub base: Schema,
    pub interface: Schema,
    pub tree: Schema,
}

impl Templates {
    /// Reads every template file, writing the built-in default first when a
    /// file is missing.  A template that fails to compile is fatal.
    pub fn load(files: &impl FileSystem, config: &AppConfig) -> Result<Self> {
        Ok(Self {
            base: load_one(files, &config.base_template_path(), DEFAULT_BASE_TEMPLATE)?,
            interface: load_one(
                files,
                &config.interface_template_path(),
                DEFAULT_INTERFACE_TEMPLATE,
            )?,
            tree: load_one(files, &config.tree_template_path(), DEFAULT_TREE_TEMPLATE)?,
        })
    }
}

fn load_one(files: &impl FileSystem, path: &Path, default: &str) -> Result<Schema> {
    let (source, created) = files.read_or_create(path, default)?;
    if created {
        info!(path = %path.display(), "created default template; you may edit it manually");
    }
    Schema::compile(&source).with_context(|| {
        format!(
            "template {} is malformed; fix it manually or delete it to restore the default",
            path.display()
        )
    })
}

#[cfg(test)]
mod tests {
    use notekeeper_config::AppConfig;

    use super::*;
    use crate::files::MemoryFiles;

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.paths.home_dir = "/nk".to_string();
        config
    }

    #[test]
    fn missing_templates_are_written_with_defaults() {
        let files = MemoryFiles::new();
        let templates = Templates::load(&files, &config()).unwrap();
        assert!(templates.interface.has_field("tags_used"));
        assert_eq!(
            files.get("/nk/template_base.txt").as_deref(),
            Some(DEFAULT_BASE_TEMPLATE)
        );
        assert!(files.get("/nk/template_tree.txt").is_some());
    }

    #[test]
    fn malformed_template_is_fatal_and_names_the_file() {
        let files = MemoryFiles::new().with_file("/nk/template_base.txt", "<><name>\n<><name>\n");
        let err = Templates::load(&files, &config()).unwrap_err();
        assert!(format!("{err:#}").contains("/nk/template_base.txt"));
    }
}
