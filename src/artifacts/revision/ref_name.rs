use crate::artifacts::revision::INVALID_REF_NAME_REGEX;
use anyhow::Context;
use derive_new::new;

const HEADS_REF_PREFIX: &str = "refs/heads/";
const TAGS_REF_PREFIX: &str = "refs/tags/";

/// Repository-relative path of a reference file, e.g. `HEAD`,
/// `refs/heads/master` or `refs/tags/v1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord, new)]
pub struct SymRefName(String);

impl SymRefName {
    pub fn is_detached_head(&self) -> bool {
        self.0.starts_with("HEAD")
    }

    pub fn is_branch(&self) -> bool {
        self.0.starts_with(HEADS_REF_PREFIX)
    }

    pub fn is_tag(&self) -> bool {
        self.0.starts_with(TAGS_REF_PREFIX)
    }

    pub fn as_ref_path(&self) -> &str {
        &self.0
    }

    /// The name as shown in log decorations: `refs/heads/` and `refs/tags/`
    /// prefixes are dropped, `HEAD` stays as-is.
    pub fn short_name(&self) -> &str {
        self.0
            .strip_prefix(HEADS_REF_PREFIX)
            .or_else(|| self.0.strip_prefix(TAGS_REF_PREFIX))
            .unwrap_or(&self.0)
    }
}

/// A validated branch or tag name
///
/// Validation follows the refname rules: no leading dot or slash, no `..`,
/// no `.lock` suffix, no whitespace or control characters, none of `*:?[\~^`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct RefName(String);

impl RefName {
    pub fn try_parse(name: String) -> anyhow::Result<Self> {
        if name.is_empty() {
            anyhow::bail!("ref name cannot be empty");
        }

        let re = regex::Regex::new(INVALID_REF_NAME_REGEX)
            .with_context(|| format!("invalid ref name regex: {INVALID_REF_NAME_REGEX}"))?;

        if re.is_match(&name) {
            anyhow::bail!("invalid ref name: {}", name);
        } else {
            Ok(Self(name))
        }
    }

    pub fn try_parse_sym_ref_name(sym_ref_name: &SymRefName) -> anyhow::Result<Self> {
        if !sym_ref_name.0.starts_with(HEADS_REF_PREFIX)
            && !sym_ref_name.0.starts_with(TAGS_REF_PREFIX)
            && !sym_ref_name.0.starts_with("HEAD")
        {
            anyhow::bail!(
                "symbolic ref name must start with '{}', '{}' or 'HEAD', got '{}'",
                HEADS_REF_PREFIX,
                TAGS_REF_PREFIX,
                sym_ref_name.0
            );
        }

        let sym_ref_name = sym_ref_name.0.strip_prefix(HEADS_REF_PREFIX).unwrap_or_else(|| {
            sym_ref_name
                .0
                .strip_prefix(TAGS_REF_PREFIX)
                .unwrap_or(&sym_ref_name.0)
        });
        Self::try_parse(sym_ref_name.parse()?)
    }
}

impl AsRef<str> for RefName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RefName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
