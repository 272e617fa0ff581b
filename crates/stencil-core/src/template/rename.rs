/// A filename rewrite applied while copying template files.
///
/// Template trees ship some files under neutral names (a dotfile would be
/// dropped or mangled by packaging tools); they are restored to their real
/// names on the way out.
#[derive(Debug, Clone, Copy)]
pub struct RenameRule {
    pub template_name: &'static str,
    pub target_name: &'static str,
}

/// Ordered rewrite table, evaluated once per filename; first match wins.
pub const RENAME_RULES: &[RenameRule] = &[
    RenameRule {
        template_name: "gitignore",
        target_name: ".gitignore",
    },
    RenameRule {
        template_name: "env.example",
        target_name: ".env.example",
    },
    RenameRule {
        template_name: "eslintrc.json",
        target_name: ".eslintrc.json",
    },
    RenameRule {
        template_name: "README-template.md",
        target_name: "README.md",
    },
];

/// The on-disk name for a template filename. Names absent from the table
/// pass through unchanged.
pub fn materialized_name(name: &str) -> &str {
    for rule in RENAME_RULES {
        if rule.template_name == name {
            return rule.target_name;
        }
    }
    name
}
