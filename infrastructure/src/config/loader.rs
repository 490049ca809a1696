//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

const PROJECT_FILES: [&str; 2] = ["planwise.toml", ".planwise.toml"];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `PLANWISE_` environment variables (`__` separates sections)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./planwise.toml` or `./.planwise.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/planwise/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path, Self::global_config_path(), Self::project_config_path())
            .extract()
            .map_err(Box::new)
    }

    fn figment(
        config_path: Option<&PathBuf>,
        global_path: Option<PathBuf>,
        project_path: Option<PathBuf>,
    ) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = global_path
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(project_path) = project_path {
            figment = figment.merge(Toml::file(&project_path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed("PLANWISE_").split("__"))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/planwise/config.toml if set,
    /// otherwise falls back to ~/.config/planwise/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("planwise").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");

        if let Some(path) = config_path {
            let marker = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{marker:^7}] Explicit: {}", path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [ FOUND ] Project: {}", path.display());
        } else {
            println!("  [       ] Project: ./planwise.toml or ./.planwise.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [ FOUND ] Global:  {}", path.display());
            } else {
                println!("  [       ] Global:  {}", path.display());
            }
        }

        println!("  [       ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::Path;

    fn load_only(path: &PathBuf) -> Result<FileConfig, figment::Error> {
        ConfigLoader::figment(Some(path), None, None).extract()
    }

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.roster.len(), 2);
        assert!(config.transcript.enabled);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("planwise"));
    }

    #[test]
    fn test_later_sources_override_earlier() {
        let dir = tempfile::tempdir().unwrap();
        let global = write_file(
            dir.path(),
            "global.toml",
            "[chat]\nuser_id = \"global.user\"\ndirective = \"Global directive\"\n",
        );
        let project = write_file(dir.path(), "project.toml", "[chat]\nuser_id = \"project.user\"\n");
        let explicit = write_file(
            dir.path(),
            "explicit.toml",
            "[[roster]]\nlabel = \"Only\"\nkind = \"openai\"\nmodel = \"gpt-5\"\n",
        );

        let config: FileConfig =
            ConfigLoader::figment(Some(&explicit), Some(global), Some(project))
                .extract()
                .unwrap();

        assert_eq!(config.chat.user_id, "project.user");
        assert_eq!(config.chat.directive, "Global directive");
        assert_eq!(config.roster.len(), 1);
        assert_eq!(config.roster[0].label, "Only");
    }

    #[test]
    fn test_partial_file_keeps_defaults_for_missing_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "planwise.toml", "[transcript]\nenabled = false\n");

        let config = load_only(&path).unwrap();
        assert!(!config.transcript.enabled);
        assert_eq!(config.roster.len(), 2);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "bad.toml", "[transcript]\nenabled = \"maybe\"\n");
        assert!(load_only(&path).is_err());
    }
}
