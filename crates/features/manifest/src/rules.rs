//! Chunk exclusion rules.

use crate::error::ManifestError;
use regex::Regex;
use tracing::debug;

/// Compiled `ignore` globs and `ignore_re` regexes.
///
/// Globs follow shell `fnmatch` rules on the whole name: case-sensitive, `*` also
/// matches `/`, `[!..]` negates a set and an unclosed `[` is literal. Regexes must match
/// at the start of the chunk name but need not consume all of it.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    globs: Vec<Regex>,
    regexes: Vec<Regex>,
}

impl IgnoreRules {
    /// # Errors
    /// Returns [`ManifestError::InvalidRule`] for the first rule that does not compile.
    pub fn compile<G, R>(globs: G, regexes: R) -> Result<Self, ManifestError>
    where
        G: IntoIterator,
        G::Item: AsRef<str>,
        R: IntoIterator,
        R::Item: AsRef<str>,
    {
        let mut compiled = Vec::new();
        for rule in globs {
            let rule = rule.as_ref();
            let Some(pattern) = translate(rule) else {
                debug!(rule, "Ignore glob can never match, skipping");
                continue;
            };
            compiled.push(Regex::new(&pattern).map_err(|e| ManifestError::InvalidRule {
                rule: rule.to_owned(),
                message: e.to_string().into(),
                context: Some("ignore".into()),
            })?);
        }

        let regexes = regexes
            .into_iter()
            .map(|rule| {
                let rule = rule.as_ref();
                Regex::new(&format!("^(?:{rule})")).map_err(|e| ManifestError::InvalidRule {
                    rule: rule.to_owned(),
                    message: e.to_string().into(),
                    context: Some("ignore_re".into()),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { globs: compiled, regexes })
    }

    #[must_use]
    pub fn is_ignored(&self, name: &str) -> bool {
        self.regexes.iter().any(|re| re.is_match(name))
            || self.globs.iter().any(|glob| glob.is_match(name))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.globs.is_empty() && self.regexes.is_empty()
    }
}

/// Anchored regex source for a shell glob, or `None` when the glob contains a set
/// made only of reversed ranges (`[z-a]`) and so matches nothing.
fn translate(glob: &str) -> Option<String> {
    let chars: Vec<char> = glob.chars().collect();
    let mut out = String::from("^(?s:");
    let mut i = 0;
    while let Some(&c) = chars.get(i) {
        i += 1;
        match c {
            '*' => {
                while chars.get(i) == Some(&'*') {
                    i += 1;
                }
                out.push_str(".*");
            },
            '?' => out.push('.'),
            '[' => match set_end(&chars, i) {
                Some(end) => {
                    out.push_str(&set(&chars[i..end])?);
                    i = end + 1;
                },
                None => out.push_str(r"\["),
            },
            other => out.push_str(&escape(other)),
        }
    }
    out.push_str(r")\z");
    Some(out)
}

/// Index of the `]` closing a set that opens just before `start`.
fn set_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    chars.get(j..)?.iter().position(|&c| c == ']').map(|offset| j + offset)
}

/// Character class for the body of a `[...]` set.
fn set(body: &[char]) -> Option<String> {
    let (negated, body) = match body.split_first() {
        Some(('!', rest)) => (true, rest),
        _ => (false, body),
    };

    let mut items = String::new();
    let mut i = 0;
    while let Some(&lo) = body.get(i) {
        if body.get(i + 1) == Some(&'-')
            && let Some(&hi) = body.get(i + 2)
        {
            if lo <= hi {
                items.push_str(&format!("{}-{}", escape(lo), escape(hi)));
            }
            i += 3;
        } else {
            items.push_str(&escape(lo));
            i += 1;
        }
    }

    match (negated, items.is_empty()) {
        (true, true) => Some(".".to_owned()),
        (false, true) => None,
        (true, false) => Some(format!("[^{items}]")),
        (false, false) => Some(format!("[{items}]")),
    }
}

fn escape(c: char) -> String {
    regex::escape(c.encode_utf8(&mut [0; 4]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_globs_drop_maps_and_hot_updates() {
        let rules = IgnoreRules::compile(["*.hot-update.js", "*.map"], Vec::<String>::new()).unwrap();

        assert!(rules.is_ignored("main.js.map"));
        assert!(rules.is_ignored("0.abc.hot-update.js"));
        assert!(!rules.is_ignored("main.js"));
    }

    #[test]
    fn globs_cross_directories_and_respect_case() {
        let rules = IgnoreRules::compile(["*.css"], Vec::<String>::new()).unwrap();

        assert!(rules.is_ignored("css/site.css"));
        assert!(!rules.is_ignored("site.CSS"));
    }

    #[test]
    fn regexes_are_anchored_at_start_only() {
        let rules = IgnoreRules::compile(Vec::<String>::new(), ["vendor", r".*\.txt$"]).unwrap();

        assert!(rules.is_ignored("vendor.js"));
        assert!(!rules.is_ignored("main.vendor.js"));
        assert!(rules.is_ignored("notes.txt"));
    }

    #[test]
    fn double_star_is_not_a_directory_wildcard() {
        let rules = IgnoreRules::compile(["**/*.map"], Vec::<String>::new()).unwrap();

        assert!(!rules.is_ignored("main.js.map"));
        assert!(rules.is_ignored("js/main.js.map"));
    }

    #[test]
    fn repeated_stars_collapse() {
        let rules = IgnoreRules::compile(["a**b", "*.hot-update.**"], Vec::<String>::new()).unwrap();

        assert!(rules.is_ignored("ab"));
        assert!(rules.is_ignored("a/x/b"));
        assert!(!rules.is_ignored("ba"));
        assert!(rules.is_ignored("0.abc.hot-update.json"));
    }

    #[test]
    fn unclosed_bracket_is_literal() {
        let rules = IgnoreRules::compile(["[abc"], Vec::<String>::new()).unwrap();

        assert!(rules.is_ignored("[abc"));
        assert!(!rules.is_ignored("a"));
        assert!(!rules.is_ignored("[abcd"));
    }

    #[test]
    fn sets_ranges_and_negation() {
        let rules = IgnoreRules::compile(["chunk-[0-9].js", "[!m]*.css", "x[]-]y"], Vec::<String>::new())
            .unwrap();

        assert!(rules.is_ignored("chunk-7.js"));
        assert!(!rules.is_ignored("chunk-a.js"));
        assert!(rules.is_ignored("admin.css"));
        assert!(!rules.is_ignored("main.css"));
        assert!(rules.is_ignored("x]y"));
        assert!(rules.is_ignored("x-y"));
        assert!(!rules.is_ignored("x.js.y"));
    }

    #[test]
    fn question_mark_and_metacharacters() {
        let rules = IgnoreRules::compile(["?.js", "a+b(c).js"], Vec::<String>::new()).unwrap();

        assert!(rules.is_ignored("0.js"));
        assert!(!rules.is_ignored("10.js"));
        assert!(rules.is_ignored("a+b(c).js"));
        assert!(!rules.is_ignored("aab(c).js"));
    }

    #[test]
    fn reversed_range_never_matches() {
        let rules = IgnoreRules::compile(["[z-a].js", "[!z-a].js"], Vec::<String>::new()).unwrap();

        assert!(!rules.is_ignored("[z-a].js"));
        assert!(rules.is_ignored("q.js"));
    }

    #[test]
    fn bad_regexes_are_rejected() {
        let err = IgnoreRules::compile(Vec::<String>::new(), ["(unclosed"]).expect_err("bad regex");
        assert!(matches!(err, ManifestError::InvalidRule { ref rule, .. } if rule == "(unclosed"));
    }
}
