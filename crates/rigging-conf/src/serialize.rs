//! Rendering a resolved store back to configuration text.
//!
//! The full rendering groups macros first, then parameters by
//! `(scope, target)` site with comment headers; re-parsing the output yields
//! an equivalent binding table for literal values (symbol references render
//! as `@name` and eager constructions as `@name()`).
//!
//! The operative/inoperative split partitions the table by whether a
//! binding was ever read: the operative configuration is what the run
//! actually used, the inoperative part is what was configured but never
//! consumed. Both feed experiment reports, optionally through
//! [`markdownify`].

use crate::foundation::BindingKey;
use crate::store::ConfigStore;
use crate::value::Value;
use std::collections::BTreeMap;

const DIVIDER: &str =
    "# ==============================================================================\n";

#[derive(Clone, Copy, PartialEq, Eq)]
enum Filter {
    All,
    Operative,
    Inoperative,
}

/// Render every binding.
pub fn config_str(store: &ConfigStore) -> String {
    render(store, Filter::All)
}

/// Render the bindings that were actually read.
pub fn operative_config_str(store: &ConfigStore) -> String {
    render(store, Filter::Operative)
}

/// Render the bindings that were configured but never read.
pub fn inoperative_config_str(store: &ConfigStore) -> String {
    render(store, Filter::Inoperative)
}

fn render(store: &ConfigStore, filter: Filter) -> String {
    let mut macros: BTreeMap<&str, &Value> = BTreeMap::new();
    let mut sites: BTreeMap<(Option<&str>, &str), Vec<(&str, &Value)>> = BTreeMap::new();

    for (key, value, read) in store.entries() {
        let keep = match filter {
            Filter::All => true,
            Filter::Operative => read,
            Filter::Inoperative => !read,
        };
        if !keep {
            continue;
        }
        match key {
            BindingKey::Macro(name) => {
                macros.insert(name.as_str(), value);
            }
            BindingKey::Param(pk) => {
                sites
                    .entry((pk.scope.as_deref(), pk.target.as_str()))
                    .or_default()
                    .push((pk.parameter.as_str(), value));
            }
        }
    }

    let mut out = String::new();

    if !macros.is_empty() {
        out.push_str("# Macros:\n");
        out.push_str(DIVIDER);
        for (name, value) in &macros {
            out.push_str(&format!("{} = {}\n", name, value));
        }
        out.push('\n');
    }

    for ((scope, target), mut params) in sites {
        let site = match scope {
            Some(scope) => format!("{}/{}", scope, target),
            None => target.to_string(),
        };
        out.push_str(&format!("# Parameters for {}:\n", site));
        out.push_str(DIVIDER);
        params.sort_by(|a, b| a.0.cmp(b.0));
        for (parameter, value) in params {
            match scope {
                Some(scope) => {
                    out.push_str(&format!("{}/{}.{} = {}\n", scope, target, parameter, value))
                }
                None => out.push_str(&format!("{}.{} = {}\n", target, parameter, value)),
            }
        }
        out.push('\n');
    }

    out
}

/// Convert a rendered configuration to markdown.
///
/// Section headers (comment lines ending in `:`) become `####` headings,
/// divider lines are dropped, and binding lines are indented as code.
pub fn markdownify(config: &str, description: &str) -> String {
    let mut lines = Vec::new();

    if !description.is_empty() {
        lines.push(format!("    # {}", description));
        lines.push(String::new());
    }

    for line in config.lines() {
        if let Some(rest) = line.strip_prefix("# ") {
            if rest.starts_with("====") {
                lines.push(String::new());
            } else if rest.ends_with(':') {
                lines.push(format!("#### {}", rest));
            } else {
                lines.push(rest.to_string());
            }
        } else if line.is_empty() {
            lines.push(String::new());
        } else {
            lines.push(format!("    {}", line));
        }
    }

    lines.join("\n")
}
