// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Shell-style `KEY=value` configuration files.
//!
//! The accepted subset is what a deployment config sourced by `sh` normally contains:
//! comments, blank lines, an optional `export` prefix, and single, double or unquoted
//! values. `$NAME` and `${NAME}` expand to keys assigned earlier in the same file, then
//! to the lookup function (usually the process environment), then to the empty string.

use crate::shared::error::{RenderError, Result};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

fn key_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("key pattern is valid"))
}

fn expansion_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\\(.)|\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
            .expect("expansion pattern is valid")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quoting {
    Bare,
    Single,
    Double,
}

#[derive(Debug, Clone, Default)]
pub struct EnvFile {
    origin: String,
    values: BTreeMap<String, String>,
}

impl EnvFile {
    pub fn load<F>(path: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if !path.is_file() {
            return Err(RenderError::ConfigNotFound(path.to_path_buf()));
        }

        let content =
            std::fs::read_to_string(path).map_err(|e| RenderError::io_at(path, e))?;

        Self::parse_str(&content, &path.display().to_string(), lookup)
    }

    pub fn parse_str<F>(content: &str, origin: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut values = BTreeMap::new();

        for (idx, raw_line) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line = line
                .strip_prefix("export ")
                .map(str::trim_start)
                .unwrap_or(line);

            let (key, raw_value) = line.split_once('=').ok_or_else(|| {
                RenderError::syntax(origin, line_no, format!("expected KEY=value, found '{}'", line))
            })?;

            if !key_pattern().is_match(key) {
                return Err(RenderError::syntax(
                    origin,
                    line_no,
                    format!("invalid variable name '{}'", key),
                ));
            }

            let (body, quoting) =
                split_value(raw_value).map_err(|m| RenderError::syntax(origin, line_no, m))?;

            let value = match quoting {
                Quoting::Single => body.to_string(),
                Quoting::Bare | Quoting::Double => expand(body, quoting, &values, &lookup),
            };

            values.insert(key.to_string(), value);
        }

        Ok(Self {
            origin: origin.to_string(),
            values,
        })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Where the assignments came from, for error messages.
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

fn split_value(raw: &str) -> std::result::Result<(&str, Quoting), String> {
    if let Some(rest) = raw.strip_prefix('\'') {
        let end = rest
            .find('\'')
            .ok_or_else(|| "unterminated single quote".to_string())?;
        check_trailing(&rest[end + 1..])?;
        return Ok((&rest[..end], Quoting::Single));
    }

    if let Some(rest) = raw.strip_prefix('"') {
        let end =
            closing_double_quote(rest).ok_or_else(|| "unterminated double quote".to_string())?;
        check_trailing(&rest[end + 1..])?;
        return Ok((&rest[..end], Quoting::Double));
    }

    Ok((strip_inline_comment(raw).trim_end(), Quoting::Bare))
}

fn closing_double_quote(s: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some(i),
            _ => {}
        }
    }
    None
}

fn check_trailing(rest: &str) -> std::result::Result<(), String> {
    if rest.is_empty() {
        return Ok(());
    }

    let trimmed = rest.trim_start();
    if trimmed.is_empty() || (trimmed.len() < rest.len() && trimmed.starts_with('#')) {
        Ok(())
    } else {
        Err(format!("unexpected characters after quoted value: '{}'", rest))
    }
}

// `#` only opens a comment at the start of a word.
fn strip_inline_comment(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'#' && i > 0 && bytes[i - 1].is_ascii_whitespace() {
            return &raw[..i];
        }
    }
    raw
}

fn expand<F>(body: &str, quoting: Quoting, known: &BTreeMap<String, String>, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    expansion_pattern()
        .replace_all(body, |caps: &Captures| {
            if let Some(escaped) = caps.get(1) {
                let c = escaped.as_str();
                return match quoting {
                    Quoting::Double if !matches!(c, "$" | "\"" | "\\" | "`") => {
                        format!("\\{}", c)
                    }
                    _ => c.to_string(),
                };
            }

            let name = caps
                .get(2)
                .or_else(|| caps.get(3))
                .map(|m| m.as_str())
                .unwrap_or_default();

            known
                .get(name)
                .cloned()
                .or_else(|| lookup(name))
                .unwrap_or_default()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> EnvFile {
        EnvFile::parse_str(content, "test.env", |_| None).expect("parse")
    }

    #[test]
    fn test_plain_assignments_and_comments() {
        let file = parse(
            "# deployment\n\nNAMESPACE=rw-staging\nexport NUM_PROXY=3\nDB_URL=tikv://pd:2379 # pd\n",
        );
        assert_eq!(file.len(), 3);
        assert_eq!(file.get("NAMESPACE"), Some("rw-staging"));
        assert_eq!(file.get("NUM_PROXY"), Some("3"));
        assert_eq!(file.get("DB_URL"), Some("tikv://pd:2379"));
    }

    #[test]
    fn test_hash_inside_word_is_kept() {
        let file = parse("IMAGE_SUFFIX=:v1#2\nEMPTY=#x\n");
        assert_eq!(file.get("IMAGE_SUFFIX"), Some(":v1#2"));
        assert_eq!(file.get("EMPTY"), Some("#x"));
    }

    #[test]
    fn test_quoted_values() {
        let file = parse(
            "A='literal $HOME # not a comment'\nB=\"two words\" # trailing\nC=\"say \\\"hi\\\"\"\n",
        );
        assert_eq!(file.get("A"), Some("literal $HOME # not a comment"));
        assert_eq!(file.get("B"), Some("two words"));
        assert_eq!(file.get("C"), Some("say \"hi\""));
    }

    #[test]
    fn test_expansion_uses_earlier_keys_then_lookup() {
        let file = EnvFile::parse_str(
            "REGISTRY=registry.example.com\nIMAGE_PREFIX=\"${REGISTRY}/rw-\"\nHOME_DIR=$HOME\nMISSING=x${NOPE}y\n",
            "test.env",
            |k| (k == "HOME").then(|| "/home/deploy".to_string()),
        )
        .expect("parse");

        assert_eq!(file.get("IMAGE_PREFIX"), Some("registry.example.com/rw-"));
        assert_eq!(file.get("HOME_DIR"), Some("/home/deploy"));
        assert_eq!(file.get("MISSING"), Some("xy"));
    }

    #[test]
    fn test_escapes() {
        let file = parse("A=\"cost \\$5 \\n\"\nB=a\\ b\n");
        assert_eq!(file.get("A"), Some("cost $5 \\n"));
        assert_eq!(file.get("B"), Some("a b"));
    }

    #[test]
    fn test_later_assignment_wins() {
        let file = parse("NUM_RUNTIME=2\nNUM_RUNTIME=4\n");
        assert_eq!(file.get("NUM_RUNTIME"), Some("4"));
    }

    #[test]
    fn test_syntax_errors_report_line() {
        let err = EnvFile::parse_str("A=1\nnot an assignment\n", "bad.env", |_| None)
            .expect_err("should fail");
        match err {
            RenderError::ConfigSyntax { path, line, .. } => {
                assert_eq!(path, "bad.env");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(EnvFile::parse_str("1BAD=x", "bad.env", |_| None).is_err());
        assert!(EnvFile::parse_str("A=\"open", "bad.env", |_| None).is_err());
        assert!(EnvFile::parse_str("A='x'y", "bad.env", |_| None).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = EnvFile::load(Path::new("/nonexistent/rw-kube.env"), |_| None)
            .expect_err("should fail");
        assert!(matches!(err, RenderError::ConfigNotFound(_)));
    }
}
