pub mod comment;
pub mod delete;
pub mod merge;

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use commented_yaml::Document;
use yaml_tools::NodePath;
use yaml_tools_config::Config;

/// Load `yaml-tools.toml` from the working directory upward. A broken file
/// is reported and ignored.
pub fn load_config() -> Config {
    match yaml_tools_config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("warning: failed to load {}: {e}", yaml_tools_config::CONFIG_FILENAME);
            Config::default()
        }
    }
}

pub fn read_document(path: &Path) -> Result<Document> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let document = commented_yaml::parse_document(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    tracing::info!(path = %path.display(), "read");
    Ok(document)
}

/// Write `content` to `output`, or to standard output when there is none.
///
/// Files are written to a temporary file in the same directory first and
/// then renamed over the target, so the input can be rewritten in place and
/// a failed write never leaves a truncated file behind.
pub fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    let Some(path) = output else {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        stdout.flush()?;
        return Ok(());
    };
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut file = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create a temporary file in {}", dir.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;
    file.persist(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote");
    Ok(())
}

/// Join the PATH arguments into one node path. Each argument may itself be
/// dotted, so `test.foo h[2]` and `test foo h 2` name the same node.
pub fn node_path(args: &[String]) -> Result<NodePath> {
    anyhow::ensure!(!args.is_empty(), "missing the path of the node to act on");
    let mut path = NodePath::root();
    for arg in args {
        path.extend(NodePath::parse(arg).segments().iter().cloned());
    }
    Ok(path)
}
