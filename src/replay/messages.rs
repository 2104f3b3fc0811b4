//! Keyed sentence templates for the summary stream.
//!
//! Templates use `{}` placeholders filled left to right. An unknown key
//! renders as the key itself.

/// A summary sentence waiting to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    /// Template key.
    pub key: &'static str,
    /// Placeholder values, in order.
    pub args: Vec<String>,
}

impl Sentence {
    /// Build a sentence from a key and its arguments.
    #[must_use]
    pub fn new<I: IntoIterator<Item = String>>(key: &'static str, args: I) -> Self {
        Self {
            key,
            args: args.into_iter().collect(),
        }
    }

    /// Render with the built-in templates.
    #[must_use]
    pub fn render(&self) -> String {
        render(self.key, &self.args)
    }
}

const TEMPLATES: &[(&str, &str)] = &[
    (
        "production",
        "${} researched medicine for sample {}, scored {} health points and gained expertise in molecule {}",
    ),
    (
        "productionNoGain",
        "${} researched medicine for sample {}, scored {} health points",
    ),
    ("upload", "${} stores sample {} on the cloud."),
    ("newSample", "${} receives sample {}."),
    ("download", "${} downloads sample {} from the cloud."),
    ("takeMolecule", "${} receives a {} molecule."),
    ("moleculeDenied", "${} finds no {} molecule left."),
    ("eta", "${} will arrive at the {} module in {} turns"),
    ("etaSingular", "${} will arrive at the {} module in {} turn"),
    ("diagnosis", "${} has diagnosed sample {}"),
    (
        "projectCompletion",
        "${} has completed the science project {} and scores {} health points.",
    ),
    ("projectTooltip", "${} completes a science project!"),
    ("eliminated", "${}: Eliminated!"),
];

/// Look up the template for `key`.
#[must_use]
pub fn template(key: &str) -> Option<&'static str> {
    TEMPLATES.iter().find(|(k, _)| *k == key).map(|(_, t)| *t)
}

/// Render `key` with `args`. Missing arguments leave their placeholder empty.
#[must_use]
pub fn render(key: &str, args: &[String]) -> String {
    let Some(template) = template(key) else {
        return key.to_string();
    };
    let mut out = String::with_capacity(template.len() + 16);
    let mut args = args.iter();
    let mut parts = template.split("{}").peekable();
    while let Some(part) = parts.next() {
        out.push_str(part);
        if parts.peek().is_some() {
            if let Some(arg) = args.next() {
                out.push_str(arg);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_production() {
        let s = Sentence::new(
            "production",
            ["0".to_string(), "5".to_string(), "10".to_string(), "C".to_string()],
        );
        assert_eq!(
            s.render(),
            "$0 researched medicine for sample 5, scored 10 health points and gained expertise in molecule C"
        );
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(render("noSuchKey", &[]), "noSuchKey");
    }

    #[test]
    fn test_missing_args() {
        assert_eq!(render("newSample", &["1".to_string()]), "$1 receives sample .");
    }
}
