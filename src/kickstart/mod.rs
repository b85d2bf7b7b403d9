mod schema;

pub use schema::*;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Input source for kickstart documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KickstartSource {
    File(PathBuf),
    Url(String),
    Stdin,
}

impl KickstartSource {
    /// Parse from command line argument
    pub fn from_arg(arg: &str) -> Self {
        match arg {
            "-" => Self::Stdin,
            s if s.starts_with("http://") || s.starts_with("https://") => Self::Url(s.to_string()),
            s => Self::File(PathBuf::from(s)),
        }
    }
}

/// Load a kickstart document from any supported source
pub fn load(source: &KickstartSource) -> Result<KickstartDocument> {
    match source {
        KickstartSource::File(path) => load_from_file(path),
        KickstartSource::Url(url) => load_from_url(url),
        KickstartSource::Stdin => load_from_stdin(),
    }
}

/// Load a kickstart document from a file (YAML, JSON, or TOML)
pub fn load_from_file(path: &Path) -> Result<KickstartDocument> {
    let content = fs::read_to_string(path).map_err(|e| Error::read(path, e))?;

    match Format::from_path(path) {
        Some(format) => format.parse(&content),
        None => parse_auto(&content),
    }
}

fn load_from_url(url: &str) -> Result<KickstartDocument> {
    let response = ureq::get(url).call().map_err(|e| Error::Fetch {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    let content = response.into_string().map_err(|e| Error::Fetch {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    parse_auto(&content)
}

fn load_from_stdin() -> Result<KickstartDocument> {
    let mut content = String::new();
    io::stdin().read_to_string(&mut content)?;
    parse_auto(&content)
}

/// Write a kickstart document, choosing the format from the file extension
pub fn save(document: &KickstartDocument, path: &Path) -> Result<()> {
    let content = Format::from_path(path).unwrap_or(Format::Yaml).render(document)?;
    fs::write(path, content).map_err(|e| Error::write(path, e))
}

/// Document formats understood by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    Yaml,
    Json,
    Toml,
}

impl Format {
    pub(crate) fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    pub(crate) fn parse<T: serde::de::DeserializeOwned>(self, content: &str) -> Result<T> {
        Ok(match self {
            Self::Yaml => serde_yaml::from_str(content)?,
            Self::Json => serde_json::from_str(content)?,
            Self::Toml => toml::from_str(content)?,
        })
    }

    pub(crate) fn render<T: serde::Serialize>(self, value: &T) -> Result<String> {
        Ok(match self {
            Self::Yaml => serde_yaml::to_string(value)?,
            Self::Json => serde_json::to_string_pretty(value)?,
            Self::Toml => toml::to_string(value)?,
        })
    }

    /// Guess the format from content
    pub(crate) fn sniff(content: &str) -> Self {
        let trimmed = content.trim_start();
        if trimmed.starts_with('{') {
            Self::Json
        } else if trimmed.starts_with('[') {
            Self::Toml
        } else {
            Self::Yaml
        }
    }
}

/// Auto-detect format and parse
fn parse_auto(content: &str) -> Result<KickstartDocument> {
    if content.trim().is_empty() {
        return Ok(KickstartDocument::default());
    }
    Format::sniff(content).parse(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_document() {
        let yaml = r#"
addons:
  org_rosa_package_remove:
    list: [bash, vim]
    remove: [vim]
"#;
        let doc = parse_auto(yaml).unwrap();
        assert_eq!(doc.package_remove().list, vec!["bash", "vim"]);
        assert_eq!(doc.package_remove().remove, vec!["vim"]);
    }

    #[test]
    fn json_document() {
        let json = r#"{"addons": {"org_rosa_package_remove": {"remove": ["httpd"]}}}"#;
        let doc = parse_auto(json).unwrap();
        assert!(doc.package_remove().list.is_empty());
        assert_eq!(doc.package_remove().remove, vec!["httpd"]);
    }

    #[test]
    fn toml_document() {
        let toml = "[addons.org_rosa_package_remove]\nlist = [\"a\", \"b\"]\nremove = [\"b\"]\n";
        let doc = parse_auto(toml).unwrap();
        assert_eq!(doc.package_remove().list, vec!["a", "b"]);
        assert_eq!(doc.package_remove().remove, vec!["b"]);
    }

    #[test]
    fn missing_section_defaults_to_empty() {
        let doc = parse_auto("addons: {}\n").unwrap();
        assert_eq!(doc, KickstartDocument::default());

        let doc = parse_auto("").unwrap();
        assert_eq!(doc, KickstartDocument::default());
    }

    #[test]
    fn save_then_load_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = KickstartDocument::default();
        doc.package_remove_mut().list = vec!["nano".into(), "vim".into()];
        doc.package_remove_mut().remove = vec!["vim".into(), "nano".into()];

        for name in ["ks.yaml", "ks.json", "ks.toml", "ks.cfg"] {
            let path = dir.path().join(name);
            save(&doc, &path).unwrap();
            assert_eq!(load_from_file(&path).unwrap(), doc, "{}", name);
        }
    }

    #[test]
    fn section_name_on_the_wire() {
        let yaml = Format::Yaml.render(&KickstartDocument::default()).unwrap();
        assert!(yaml.contains(crate::paths::KICKSTART_SECTION));
    }

    #[test]
    fn source_from_arg() {
        assert_eq!(KickstartSource::from_arg("-"), KickstartSource::Stdin);
        assert!(matches!(
            KickstartSource::from_arg("https://example.com/ks.yaml"),
            KickstartSource::Url(_)
        ));
        assert_eq!(
            KickstartSource::from_arg("/root/ks.yaml"),
            KickstartSource::File(PathBuf::from("/root/ks.yaml"))
        );
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load(&KickstartSource::File("/nonexistent/ks.yaml".into())).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }
}
