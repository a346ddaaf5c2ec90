use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::Config;
use serde::Deserialize;

use crate::parser::grammar::Variant;
use crate::record::LinkShape;

const ENV_PREFIX: &str = "EXAMPLES";

/// Values supplied by flags or environment; anything unset falls back to
/// the README conventions.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct Overrides {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub language: Option<Variant>,
    pub link_shape: Option<LinkShape>,
    pub root: Option<PathBuf>,
}

impl Overrides {
    /// `EXAMPLES_INPUT`, `EXAMPLES_OUTPUT`, `EXAMPLES_LANGUAGE`,
    /// `EXAMPLES_LINK_SHAPE`, `EXAMPLES_ROOT`.
    pub fn from_env() -> Result<Self> {
        Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .and_then(Config::try_deserialize)
            .context("reading EXAMPLES_* environment settings")
    }

    /// Fields set on `self` win over `fallback`.
    pub fn or(self, fallback: Overrides) -> Overrides {
        Overrides {
            input: self.input.or(fallback.input),
            output: self.output.or(fallback.output),
            language: self.language.or(fallback.language),
            link_shape: self.link_shape.or(fallback.link_shape),
            root: self.root.or(fallback.root),
        }
    }
}

/// Fully resolved run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub variant: Variant,
    pub link_shape: LinkShape,
}

impl Settings {
    /// Merge `cli` over the environment and resolve against the filesystem.
    pub fn load(cli: Overrides) -> Result<Settings> {
        let merged = cli.or(Overrides::from_env()?);
        Ok(Settings::resolve(merged, Path::exists))
    }

    /// Fill in defaults. `exists` decides which README is present when
    /// neither an input nor a language is given.
    pub fn resolve(o: Overrides, exists: impl Fn(&Path) -> bool) -> Settings {
        let root = o.root.unwrap_or_default();
        let link_shape = o.link_shape.unwrap_or_default();

        match o.input {
            None => {
                let variant = o.language.unwrap_or_else(|| {
                    if exists(&root.join(readme_name(Variant::En))) {
                        Variant::En
                    } else {
                        Variant::Cn
                    }
                });
                Settings {
                    input: root.join(readme_name(variant)),
                    output: o.output.unwrap_or_else(|| root.join(output_name(variant))),
                    variant,
                    link_shape,
                }
            }
            Some(input) => {
                let output = o.output.unwrap_or_else(|| {
                    let english = input
                        .file_stem()
                        .is_some_and(|s| s.to_string_lossy().ends_with("_en"));
                    let variant = if english { Variant::En } else { Variant::Cn };
                    root.join(output_name(variant))
                });
                let variant = o.language.unwrap_or_else(|| {
                    if input.to_string_lossy().contains("_en") {
                        Variant::En
                    } else {
                        Variant::Cn
                    }
                });
                Settings {
                    input,
                    output,
                    variant,
                    link_shape,
                }
            }
        }
    }
}

fn readme_name(variant: Variant) -> &'static str {
    match variant {
        Variant::Cn => "README.md",
        Variant::En => "README_en.md",
    }
}

fn output_name(variant: Variant) -> &'static str {
    match variant {
        Variant::Cn => "examples.json",
        Variant::En => "examples_en.json",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nothing_exists(_: &Path) -> bool {
        false
    }

    #[test]
    fn defaults_to_cn_without_english_readme() {
        let s = Settings::resolve(Overrides::default(), nothing_exists);
        assert_eq!(s.variant, Variant::Cn);
        assert_eq!(s.input, PathBuf::from("README.md"));
        assert_eq!(s.output, PathBuf::from("examples.json"));
        assert_eq!(s.link_shape, LinkShape::Legacy);
    }

    #[test]
    fn prefers_english_readme_when_present() {
        let o = Overrides {
            root: Some("repo".into()),
            ..Default::default()
        };
        let s = Settings::resolve(o, |p| p == Path::new("repo/README_en.md"));
        assert_eq!(s.variant, Variant::En);
        assert_eq!(s.input, PathBuf::from("repo/README_en.md"));
        assert_eq!(s.output, PathBuf::from("repo/examples_en.json"));
    }

    #[test]
    fn explicit_language_picks_default_paths() {
        let o = Overrides {
            language: Some(Variant::En),
            ..Default::default()
        };
        let s = Settings::resolve(o, nothing_exists);
        assert_eq!(s.input, PathBuf::from("README_en.md"));
        assert_eq!(s.output, PathBuf::from("examples_en.json"));
    }

    #[test]
    fn language_inferred_from_input_name() {
        let o = Overrides {
            input: Some("docs/README_en.md".into()),
            ..Default::default()
        };
        let s = Settings::resolve(o, nothing_exists);
        assert_eq!(s.variant, Variant::En);
        assert_eq!(s.output, PathBuf::from("examples_en.json"));

        let o = Overrides {
            input: Some("docs/README.md".into()),
            ..Default::default()
        };
        let s = Settings::resolve(o, nothing_exists);
        assert_eq!(s.variant, Variant::Cn);
        assert_eq!(s.output, PathBuf::from("examples.json"));
    }

    #[test]
    fn explicit_values_win() {
        let o = Overrides {
            input: Some("a_en.md".into()),
            output: Some("out/x.json".into()),
            language: Some(Variant::Cn),
            link_shape: Some(LinkShape::List),
            root: None,
        };
        let s = Settings::resolve(o, nothing_exists);
        assert_eq!(s.variant, Variant::Cn);
        assert_eq!(s.output, PathBuf::from("out/x.json"));
        assert_eq!(s.link_shape, LinkShape::List);
    }

    #[test]
    fn cli_overrides_win_over_fallback() {
        let cli = Overrides {
            language: Some(Variant::En),
            ..Default::default()
        };
        let env = Overrides {
            language: Some(Variant::Cn),
            output: Some("env.json".into()),
            ..Default::default()
        };
        let merged = cli.or(env);
        assert_eq!(merged.language, Some(Variant::En));
        assert_eq!(merged.output, Some(PathBuf::from("env.json")));
    }

    // The only test that sets EXAMPLES_* variables.
    #[test]
    fn environment_values_and_cli_precedence() {
        std::env::set_var("EXAMPLES_LANGUAGE", "en");
        std::env::set_var("EXAMPLES_LINK_SHAPE", "list");
        std::env::set_var("EXAMPLES_OUTPUT", "o/x.json");

        let env = Overrides::from_env();
        let cli = Overrides {
            language: Some(Variant::Cn),
            ..Default::default()
        };
        let loaded = Settings::load(cli);

        for key in ["EXAMPLES_LANGUAGE", "EXAMPLES_LINK_SHAPE", "EXAMPLES_OUTPUT"] {
            std::env::remove_var(key);
        }

        let env = env.unwrap();
        assert_eq!(env.language, Some(Variant::En));
        assert_eq!(env.link_shape, Some(LinkShape::List));
        assert_eq!(env.output, Some(PathBuf::from("o/x.json")));
        assert_eq!(env.input, None);

        let loaded = loaded.unwrap();
        assert_eq!(loaded.variant, Variant::Cn);
        assert_eq!(loaded.input, PathBuf::from("README.md"));
        assert_eq!(loaded.output, PathBuf::from("o/x.json"));
        assert_eq!(loaded.link_shape, LinkShape::List);
    }
}
