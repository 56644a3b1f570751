//! Extraction-script emission.
//!
//! The companion script is plain CommonJS over Node builtins (`fs`, `path`,
//! `zlib`), so it executes inside the sandboxed container without any module
//! resolution. The embedded template carries its own central-directory
//! parser; inflation comes from the runtime's built-in zlib.

use std::path::{Path, PathBuf};

use crate::config::PackConfig;
use crate::error::{PackError, Result};

const DEFAULT_TEMPLATE: &str = include_str!("../assets/unzip.cjs");

/// Produce the final script text: load the source, substitute placeholders,
/// minify. Does not touch the output directory, so callers can fail fast on
/// a bad script source before writing any artifact.
pub fn render_extraction_script(config: &PackConfig, repo_root: &Path) -> Result<String> {
    let source = match &config.script_source {
        Some(configured) => {
            let path = if configured.is_absolute() {
                configured.clone()
            } else {
                repo_root.join(configured)
            };
            if !path.exists() {
                return Err(PackError::ScriptSourceNotFound(path));
            }
            std::fs::read_to_string(&path)
                .map_err(|source| PackError::Read { path, source })?
        }
        None => DEFAULT_TEMPLATE.to_string(),
    };

    Ok(minify(&render(&source, config)))
}

/// Write previously rendered script text next to the archive.
pub fn write_script(text: &str, config: &PackConfig, repo_root: &Path) -> Result<PathBuf> {
    let out = config.script_path(repo_root);
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent).map_err(|source| PackError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(&out, text).map_err(|source| PackError::Write {
        path: out.clone(),
        source,
    })?;

    Ok(out)
}

/// Render and write the extraction script in one step.
pub fn emit_extraction_script(config: &PackConfig, repo_root: &Path) -> Result<PathBuf> {
    let text = render_extraction_script(config, repo_root)?;
    write_script(&text, config, repo_root)
}

/// Substitute the project identifier and bin-link placeholders.
fn render(template: &str, config: &PackConfig) -> String {
    template
        .replace("__PROJECT__", &config.project)
        .replace("__LINK_NAME__", &config.bin_link.name)
        .replace("__LINK_TARGET__", &config.bin_link.target)
}

/// Conservative minification: drop comment lines, indentation and blank
/// lines. Line breaks are preserved, so the result is valid for any input
/// the template language allows (no reliance on statement joining).
fn minify(source: &str) -> String {
    let mut out: String = source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn template_placeholders_are_substituted() {
        let config = PackConfig {
            project: "orders".to_string(),
            ..PackConfig::default()
        };

        let rendered = render(DEFAULT_TEMPLATE, &config);
        assert!(rendered.contains("const project = 'orders';"));
        assert!(rendered.contains("'node_modules/.bin/esbuild'"));
        assert!(rendered.contains("'../esbuild/bin/esbuild'"));
        assert!(!rendered.contains("__PROJECT__"));
        assert!(!rendered.contains("__LINK_NAME__"));
        assert!(!rendered.contains("__LINK_TARGET__"));
    }

    #[test]
    fn template_only_requires_node_builtins() {
        let requires: Vec<&str> = DEFAULT_TEMPLATE
            .lines()
            .filter(|l| l.contains("require("))
            .collect();
        assert!(!requires.is_empty());
        for line in requires {
            assert!(
                line.contains("require('fs')")
                    || line.contains("require('path')")
                    || line.contains("require('zlib')"),
                "unexpected require: {line}"
            );
        }
    }

    #[test]
    fn minify_strips_comments_indentation_and_blanks() {
        let source = "// header\n  const a = 1;\n\n    // inner\n  const b = 2;\n";
        assert_eq!(minify(source), "const a = 1;\nconst b = 2;\n");
    }

    #[test]
    fn minify_keeps_protocol_strings() {
        let source = "const url = 'https://example.com';\n";
        assert_eq!(minify(source), source);
    }

    #[test]
    fn emit_writes_minified_script_to_adapter_dir() {
        let dir = TempDir::new().unwrap();
        let config = PackConfig::default();

        let path = emit_extraction_script(&config, dir.path()).unwrap();
        assert_eq!(path, config.script_path(dir.path()));

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("const project = 'tutorial';"));
        assert!(!written.contains("// "));
        assert!(!written.contains("\n\n"));
    }

    #[test]
    fn custom_script_source_is_used() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("custom.cjs"),
            "// custom\nconsole.log('__PROJECT__');\n",
        )
        .unwrap();

        let config = PackConfig {
            script_source: Some(PathBuf::from("custom.cjs")),
            ..PackConfig::default()
        };

        let path = emit_extraction_script(&config, dir.path()).unwrap();
        let written = fs::read_to_string(path).unwrap();
        assert_eq!(written, "console.log('tutorial');\n");
    }

    #[test]
    fn missing_script_source_is_an_error() {
        let dir = TempDir::new().unwrap();
        let config = PackConfig {
            script_source: Some(PathBuf::from("missing.cjs")),
            ..PackConfig::default()
        };

        let result = emit_extraction_script(&config, dir.path());
        assert!(matches!(result, Err(PackError::ScriptSourceNotFound(_))));
    }
}
