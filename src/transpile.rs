// src/transpile.rs
//
// Best-effort TypeScript-to-JavaScript stripping. This is a fixed ordered
// list of textual substitutions, not a parser: nested generics, multi-line
// type aliases, and unions buried in complex expressions survive the chain
// and surface through `scan_residual_syntax` when execution fails.

use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    TypeScript,
    JavaScript,
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::TypeScript => "typescript",
            Dialect::JavaScript => "javascript",
        }
    }
}

impl FromStr for Dialect {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "javascript" | "js" => Ok(Dialect::JavaScript),
            "typescript" | "ts" => Ok(Dialect::TypeScript),
            _ => Ok(Dialect::TypeScript), // Default fallback
        }
    }
}

// Type expressions the annotation rules recognize: primitive names or
// capitalized identifiers, one level of generic arguments, array suffixes,
// simple unions/intersections. Anything richer is left in place for the
// diagnostics pass.
const TYPE_ATOM: &str = r"(?:string|number|boolean|void|any|unknown|never|null|undefined|object|symbol|bigint|this|[A-Z][\w$]*)(?:<[^<>]*>)?(?:\[\])*";

fn union_type() -> String {
    format!(r"{TYPE_ATOM}(?:[ \t]*[|&][ \t]*{TYPE_ATOM})*")
}

static RULES: Lazy<Vec<(Regex, String)>> = Lazy::new(|| {
    let union = union_type();
    [
        // Module syntax cannot run in a plain script scope.
        (r"(?m)^[ \t]*import\s[^\n]*\n?", ""),
        (r"(?m)^([ \t]*)export\s+default\s+", "$1"),
        (r"(?m)^([ \t]*)export\s+", "$1"),
        // Decorator-like prefixes on their own line.
        (r"(?m)^[ \t]*@[\w$]+(?:\([^)\n]*\))?[ \t]*\r?\n", ""),
        // Declaration blocks: interface / type alias / enum / namespace.
        (
            r"(?ms)^[ \t]*interface\s+[\w$][^{]*\{.*?^[ \t]*\}[ \t]*\r?\n?",
            "",
        ),
        (r"(?m)^[ \t]*type\s+[\w$]+(?:<[^>\n]*>)?[ \t]*=[^\n]*\r?\n?", ""),
        (
            r"(?ms)^[ \t]*(?:const\s+)?enum\s+[\w$]+\s*\{.*?^[ \t]*\}[ \t]*\r?\n?",
            "",
        ),
        (
            r"(?ms)^[ \t]*(?:declare\s+)?namespace\s+[\w$.]+\s*\{.*?^[ \t]*\}[ \t]*\r?\n?",
            "",
        ),
        (r"(?m)^[ \t]*declare\s[^\n]*\r?\n?", ""),
        // Access-modifier keywords.
        (r"\b(?:public|private|protected)\s+", ""),
        (r"\breadonly\s+", ""),
        (r"\babstract\s+", ""),
        // Heritage clauses and generic parameter lists.
        (
            r"[ \t]*\bimplements\s+[\w$.]+(?:<[^<>]*>)?(?:\s*,\s*[\w$.]+(?:<[^<>]*>)?)*",
            "",
        ),
        (r"\bextends\s+([\w$.]+)\s*<[^<>{(]*>", "extends $1"),
        (r"\bclass\s+([\w$]+)\s*<[^<>{]*>", "class $1"),
        (
            r"\b(function\s+[\w$]+|[\w$]+)\s*<[\w$][\w$ \t,.\[\]]*>\(",
            "$1(",
        ),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (pattern.to_string(), replacement.to_string()))
    .chain([
        // Type annotations on params, fields, locals, and return positions.
        (
            format!(r"([\w$\)\]\}}])[ \t]*[?!]?[ \t]*:[ \t]*{union}"),
            "$1".to_string(),
        ),
        // Casts and non-null assertions.
        (format!(r"[ \t]+as[ \t]+(?:const\b|{union})"), String::new()),
        (r"!\.".to_string(), ".".to_string()),
        (r"!\)".to_string(), ")".to_string()),
        (r"!;".to_string(), ";".to_string()),
        (r"!,".to_string(), ",".to_string()),
    ])
    .map(|(pattern, replacement)| {
        (
            Regex::new(&pattern).expect("stripping rule compiles"),
            replacement,
        )
    })
    .collect()
});

/// Runs the substitution chain over the learner's source. The JavaScript
/// dialect passes through untouched.
pub fn strip_types(source: &str, dialect: Dialect) -> String {
    match dialect {
        Dialect::JavaScript => source.to_string(),
        Dialect::TypeScript => {
            let mut out = source.to_string();
            for (rule, replacement) in RULES.iter() {
                out = rule.replace_all(&out, replacement.as_str()).into_owned();
            }
            out
        }
    }
}

static UNION_MARK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\w$\)\]][ \t]*\|[ \t]*[\w$\(]").expect("union scan compiles"));
static ANNOTATION_MARK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r":[ \t]*(?:string|number|boolean|void|any|unknown|never)\b")
        .expect("annotation scan compiles")
});
static DECL_MARK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:interface|namespace|declare|enum)\b").expect("keyword scan compiles")
});

/// Heuristic scan of already-stripped source for syntax the chain is known
/// to miss. Only consulted when execution fails, to explain the failure.
pub fn scan_residual_syntax(source: &str) -> Vec<String> {
    let mut findings = Vec::new();
    for (i, line) in source.lines().enumerate() {
        let n = i + 1;
        let without_logical_or = line.replace("||", "");
        if UNION_MARK.is_match(&without_logical_or) {
            findings.push(format!("line {n}: possible union type: {}", line.trim()));
        }
        if ANNOTATION_MARK.is_match(line) {
            findings.push(format!(
                "line {n}: possible residual type annotation: {}",
                line.trim()
            ));
        }
        if DECL_MARK.is_match(line) {
            findings.push(format!(
                "line {n}: unstripped declaration keyword: {}",
                line.trim()
            ));
        }
    }
    findings
}

/// Line-numbered listing of the transformed source, appended to failure
/// reports for inspection.
pub fn number_lines(source: &str) -> String {
    source
        .lines()
        .enumerate()
        .map(|(i, line)| format!("{:>4} | {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}
