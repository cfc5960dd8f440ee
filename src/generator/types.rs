//! Icon name listing for editors and compilers.
//!
//! Emits a TypeScript module with a string union of every icon name and the
//! same names as a runtime list:
//!
//! ```ts
//! export type IconName =
//!   | "home"
//!   | "social:facebook";
//!
//! export const iconNames = [
//!   "home",
//!   "social:facebook",
//! ] as const;
//! ```
//!
//! With no icons the type is `never`, so every reference fails to type-check.

use std::fmt::Write;

const HEADER: &str = "// Generated by icon-sprite. Do not edit.\n";

/// Render the listing for `names`, in the given order.
pub fn generate<S: AsRef<str>>(names: &[S]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');

    if names.is_empty() {
        out.push_str("export type IconName = never;\n\n");
        out.push_str("export const iconNames: readonly IconName[] = [];\n");
        return out;
    }

    out.push_str("export type IconName =");
    for (i, name) in names.iter().enumerate() {
        let terminator = if i + 1 == names.len() { ";" } else { "" };
        let _ = write!(out, "\n  | {}{terminator}", quote(name.as_ref()));
    }
    out.push_str("\n\nexport const iconNames = [");
    for name in names {
        let _ = write!(out, "\n  {},", quote(name.as_ref()));
    }
    out.push_str("\n] as const;\n");
    out
}

/// JSON string quoting is valid TypeScript string literal syntax.
fn quote(name: &str) -> String {
    serde_json::to_string(name).unwrap_or_else(|_| format!("\"{name}\""))
}
