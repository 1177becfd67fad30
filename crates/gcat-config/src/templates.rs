//! Configuration templates for `gcat init`.
//!
//! Templates are valid TOML and returned as commented-out examples.

/// Local configuration template.
const LOCAL_TEMPLATE: &str = r#"# gcat configuration
#
# Files named .gcat.toml are discovered from the current directory upwards.
# Closer files take precedence; ~/.gcat.toml is read last.

# Stop discovery here and ignore parent and global configs.
root = false

[settings]
# Catalog file, relative to this file's directory.
catalog = ".gcat/catalog.json"
# Maximum results printed by `gcat search`.
default_limit = 50

[search]
# Match topic: filters against labels including case.
case_sensitive_topics = true

[galaxy]
# HTTP timeout when polling Galaxy servers.
timeout_secs = 30
"#;

/// Global configuration template.
const GLOBAL_TEMPLATE: &str = r#"# gcat global configuration (~/.gcat.toml)
#
# Applies everywhere unless a closer .gcat.toml overrides a setting.

[settings]
# Shared catalog for all directories.
catalog = "~/.gcat/catalog.json"
default_limit = 50

[galaxy]
timeout_secs = 30
"#;

/// Returns the local configuration template as a commented-out example.
pub fn local_template() -> String {
    comment_template(LOCAL_TEMPLATE)
}

/// Returns the global configuration template as a commented-out example.
pub fn global_template() -> String {
    comment_template(GLOBAL_TEMPLATE)
}

/// Prefixes every non-empty, non-comment line with `# `.
fn comment_template(template: &str) -> String {
    let mut result = String::with_capacity(template.len() + template.lines().count() * 2);
    for line in template.lines() {
        if !line.is_empty() && !line.starts_with('#') {
            result.push_str("# ");
        }
        result.push_str(line);
        result.push('\n');
    }
    result
}
