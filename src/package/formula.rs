//! Homebrew formula rendering and parsing.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{url_tag_version, PackageDescriptor};
use crate::error::{PetError, Result};

static CLASS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*class\s+([A-Z][A-Za-z0-9]*)\s*<\s*Formula\b").unwrap());

static FIELD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*(desc|homepage|url|sha256|version)\s+"((?:[^"\\]|\\.)*)""#).unwrap()
});

static BIN_INSTALL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"bin\.install\s+"((?:[^"\\]|\\.)*)""#).unwrap());

static SHA_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)^(\s*sha256\s+)"(?:[^"\\]|\\.)*""#).unwrap());

/// Render a descriptor as a Homebrew formula.
pub fn render(d: &PackageDescriptor) -> String {
    format!(
        r#"class {class} < Formula
  desc "{desc}"
  homepage "{homepage}"
  url "{url}"
  sha256 "{sha256}"
  version "{version}"

  def install
    bin.install "{binary}"
  end
end
"#,
        class = class_name(&d.name),
        desc = escape(&d.description),
        homepage = escape(&d.homepage),
        url = escape(&d.url),
        sha256 = escape(&d.sha256),
        version = escape(&d.version),
        binary = escape(&d.binary),
    )
}

/// Parse a formula back into a descriptor.
///
/// `url`, `sha256` and the class declaration are required. A missing
/// `version` is taken from the URL's release tag; a missing `bin.install`
/// means the binary is named after the package.
pub fn parse(text: &str) -> Result<PackageDescriptor> {
    let class = CLASS_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .ok_or_else(|| PetError::Formula("no `class <Name> < Formula` declaration".into()))?
        .as_str();
    let name = package_name(class);

    let mut description = String::new();
    let mut homepage = String::new();
    let mut url = None;
    let mut sha256 = None;
    let mut version = None;

    for cap in FIELD_RE.captures_iter(text) {
        let raw = cap[2].to_string();
        match &cap[1] {
            "desc" => description = unescape(&raw),
            "homepage" => homepage = unescape(&raw),
            "url" => url = Some(raw),
            "sha256" => sha256 = Some(unescape(&raw)),
            "version" => version = Some(expand(&raw, None)?),
            _ => {}
        }
    }

    let raw_url = url.ok_or_else(|| PetError::Formula("missing `url`".into()))?;
    let sha256 = sha256.ok_or_else(|| PetError::Formula("missing `sha256`".into()))?;
    let version = match version {
        Some(v) => v,
        None => {
            let url = expand(&raw_url, None)?;
            url_tag_version(&url).ok_or_else(|| {
                PetError::Formula("missing `version` and none found in url".into())
            })?
        }
    };
    let url = expand(&raw_url, Some(&version))?;
    let binary = BIN_INSTALL_RE
        .captures(text)
        .map(|c| unescape(&c[1]))
        .unwrap_or_else(|| name.clone());

    Ok(PackageDescriptor {
        name,
        description,
        homepage,
        url,
        sha256,
        version,
        binary,
    })
}

/// Replace the `sha256` value in formula text, leaving everything else as is.
pub fn stamp(text: &str, sha256: &str) -> Result<String> {
    if !SHA_LINE_RE.is_match(text) {
        return Err(PetError::Formula("missing `sha256`".into()));
    }
    let replacement = format!("${{1}}\"{}\"", sha256.to_lowercase());
    Ok(SHA_LINE_RE.replace(text, replacement.as_str()).into_owned())
}

/// `terminal-pet` → `TerminalPet`.
pub fn class_name(name: &str) -> String {
    name.split(['-', '_', '.'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// `TerminalPet` → `terminal-pet`.
pub fn package_name(class: &str) -> String {
    let mut out = String::with_capacity(class.len() + 4);
    for (i, c) in class.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Escape for a double-quoted Ruby string, including `#{` interpolation.
fn escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace("#{", "\\#{")
}

/// Unescape a quoted value and substitute `#{version}`. Any other
/// interpolation, or `#{version}` with no version known, is an error.
fn expand(raw: &str, version: Option<&str>) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(c) = rest.chars().next() {
        if c == '\\' {
            let mut chars = rest[1..].chars();
            if let Some(next) = chars.next() {
                out.push(next);
            }
            rest = chars.as_str();
        } else if let Some(after) = rest.strip_prefix("#{") {
            let end = after
                .find('}')
                .ok_or_else(|| PetError::Formula(format!("unterminated `#{{` in \"{}\"", raw)))?;
            match (&after[..end], version) {
                ("version", Some(v)) => out.push_str(v),
                (expr, _) => {
                    return Err(PetError::Formula(format!(
                        "cannot resolve `#{{{}}}` in \"{}\"",
                        expr, raw
                    )))
                }
            }
            rest = &after[end + 1..];
        } else {
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }
    Ok(out)
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
