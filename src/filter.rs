use regex::Regex;

use crate::error::Error;

/// Namespaces that are never instrumented, regardless of allow patterns.
/// The last entry keeps the profiler from instrumenting itself.
const DENY_PREFIXES: &[&str] = &["std::", "core::", "alloc::", "tempo::"];

/// Precompiled allow-list matcher for the instrumentation pass.
///
/// Consulted once per candidate method at attach time; the recorder never
/// re-evaluates filters on the enter/exit path. Each pattern must match
/// the whole name, matching the anchored semantics the patterns were
/// written for.
#[derive(Debug)]
pub struct Filter {
    class_allow: Vec<Regex>,
    method_allow: Vec<Regex>,
}

impl Filter {
    pub fn new(class_patterns: &[String], method_patterns: &[String]) -> Result<Self, Error> {
        Ok(Self {
            class_allow: compile_all(class_patterns)?,
            method_allow: compile_all(method_patterns)?,
        })
    }

    /// True iff `owner` escapes every deny prefix, matches at least one
    /// class-allow pattern, and the qualified key matches at least one
    /// method-allow pattern.
    pub fn is_eligible(&self, owner: &str, signature: &str) -> bool {
        if DENY_PREFIXES.iter().any(|prefix| owner.starts_with(prefix)) {
            return false;
        }
        if !self.class_allow.iter().any(|re| re.is_match(owner)) {
            return false;
        }
        let qualified = format!("{owner}.{signature}");
        self.method_allow.iter().any(|re| re.is_match(&qualified))
    }
}

fn compile_all(patterns: &[String]) -> Result<Vec<Regex>, Error> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(&format!("^(?:{pattern})$")).map_err(|source| Error::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(classes: &[&str], methods: &[&str]) -> Filter {
        let classes: Vec<String> = classes.iter().map(|s| s.to_string()).collect();
        let methods: Vec<String> = methods.iter().map(|s| s.to_string()).collect();
        Filter::new(&classes, &methods).unwrap()
    }

    #[test]
    fn default_patterns_match_everything() {
        let f = filter(&[".*"], &[".*"]);
        assert!(f.is_eligible("demo::Parser", "parse()"));
        assert!(f.is_eligible("other_crate::Thing", "run()"));
    }

    #[test]
    fn deny_prefixes_win_over_allow_patterns() {
        let f = filter(&[".*"], &[".*"]);
        assert!(!f.is_eligible("std::vec::Vec", "push()"));
        assert!(!f.is_eligible("core::fmt::Formatter", "write_str()"));
        assert!(!f.is_eligible("alloc::string::String", "clone()"));
        // Never instrument the profiler itself.
        assert!(!f.is_eligible("tempo::Recorder", "enter()"));
    }

    #[test]
    fn class_pattern_narrows_eligibility() {
        let f = filter(&["demo::.*"], &[".*"]);
        assert!(f.is_eligible("demo::Parser", "parse()"));
        assert!(!f.is_eligible("other::Parser", "parse()"));
    }

    #[test]
    fn method_pattern_matches_the_qualified_key() {
        let f = filter(&[".*"], &[".*\\.parse.*"]);
        assert!(f.is_eligible("demo::Parser", "parse()"));
        assert!(f.is_eligible("demo::Parser", "parse_line()"));
        assert!(!f.is_eligible("demo::Parser", "format()"));
    }

    #[test]
    fn patterns_are_whole_name_matches() {
        // "demo" alone must not match "demo::Parser" as a substring.
        let f = filter(&["demo"], &[".*"]);
        assert!(!f.is_eligible("demo::Parser", "parse()"));
        assert!(f.is_eligible("demo", "main()"));
    }

    #[test]
    fn any_of_several_patterns_suffices() {
        let f = filter(&["a::.*", "b::.*"], &[".*"]);
        assert!(f.is_eligible("a::X", "f()"));
        assert!(f.is_eligible("b::Y", "g()"));
        assert!(!f.is_eligible("c::Z", "h()"));
    }

    #[test]
    fn invalid_pattern_is_rejected_up_front() {
        let err = Filter::new(&["(unclosed".to_string()], &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
        assert!(err.to_string().contains("(unclosed"));
    }
}
