use std::path::PathBuf;

use crate::error::Error;

/// Pattern that makes every class or method eligible.
pub const DEFAULT_PATTERN: &str = ".*";

/// Parsed configuration surface.
///
/// The attach-time argument is a single comma-separated list of
/// `key=value` pairs, e.g. `silent=true,classes=demo::.*,out=/tmp/prof.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Suppress auxiliary log messages.
    pub silent: bool,
    /// Class allow patterns (semicolon-separated in the input).
    pub class_patterns: Vec<String>,
    /// Method allow patterns (semicolon-separated in the input).
    pub method_patterns: Vec<String>,
    /// Redirect the final report to this file instead of stdout.
    pub out: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            silent: false,
            class_patterns: vec![DEFAULT_PATTERN.to_string()],
            method_patterns: vec![DEFAULT_PATTERN.to_string()],
            out: None,
        }
    }
}

impl Options {
    /// Parse the `key=value` list.
    ///
    /// Keys are case-insensitive and whitespace-trimmed. Unknown keys are
    /// ignored. A pair without exactly one `=` fails fast -- parsing
    /// happens before any instrumentation is installed, so a malformed
    /// argument never produces a half-configured profiler.
    pub fn parse(args: &str) -> Result<Self, Error> {
        let mut options = Self::default();
        if args.trim().is_empty() {
            return Ok(options);
        }

        for pair in args.split(',') {
            let Some((key, value)) = pair.split_once('=') else {
                return Err(Error::MalformedOption {
                    pair: pair.to_string(),
                });
            };
            if value.contains('=') {
                return Err(Error::MalformedOption {
                    pair: pair.to_string(),
                });
            }

            match key.trim().to_ascii_lowercase().as_str() {
                "silent" => options.silent = value.trim().eq_ignore_ascii_case("true"),
                "classes" => {
                    let patterns = split_patterns(value);
                    if !patterns.is_empty() {
                        options.class_patterns = patterns;
                    }
                }
                "methods" => {
                    let patterns = split_patterns(value);
                    if !patterns.is_empty() {
                        options.method_patterns = patterns;
                    }
                }
                "out" => options.out = Some(PathBuf::from(value)),
                _ => {}
            }
        }
        Ok(options)
    }
}

fn split_patterns(value: &str) -> Vec<String> {
    value
        .split(';')
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_args_yield_defaults() {
        let options = Options::parse("").unwrap();
        assert_eq!(options, Options::default());
        assert!(!options.silent);
        assert_eq!(options.class_patterns, [DEFAULT_PATTERN]);
        assert_eq!(options.method_patterns, [DEFAULT_PATTERN]);
        assert!(options.out.is_none());
    }

    #[test]
    fn full_argument_list_parses() {
        let options =
            Options::parse("silent=true,classes=demo::.*;app::.*,methods=.*parse.*,out=/tmp/prof.txt")
                .unwrap();
        assert!(options.silent);
        assert_eq!(options.class_patterns, ["demo::.*", "app::.*"]);
        assert_eq!(options.method_patterns, [".*parse.*"]);
        assert_eq!(options.out, Some(PathBuf::from("/tmp/prof.txt")));
    }

    #[test]
    fn keys_are_case_insensitive_and_trimmed() {
        let options = Options::parse(" Silent =true, OUT =report.txt").unwrap();
        assert!(options.silent);
        assert_eq!(options.out, Some(PathBuf::from("report.txt")));
    }

    #[test]
    fn silent_accepts_only_true() {
        assert!(Options::parse("silent=TRUE").unwrap().silent);
        assert!(!Options::parse("silent=yes").unwrap().silent);
        assert!(!Options::parse("silent=false").unwrap().silent);
    }

    #[test]
    fn pair_without_equals_fails_fast() {
        let err = Options::parse("silent").unwrap_err();
        assert!(matches!(err, Error::MalformedOption { .. }));
        let err = Options::parse("silent=true,classes").unwrap_err();
        assert!(matches!(err, Error::MalformedOption { .. }));
    }

    #[test]
    fn pair_with_two_equals_fails_fast() {
        let err = Options::parse("classes=a=b").unwrap_err();
        assert!(matches!(err, Error::MalformedOption { .. }));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let options = Options::parse("verbose=very,silent=true").unwrap();
        assert!(options.silent);
    }

    #[test]
    fn empty_pattern_list_keeps_defaults() {
        let options = Options::parse("classes=;").unwrap();
        assert_eq!(options.class_patterns, [DEFAULT_PATTERN]);
    }
}
