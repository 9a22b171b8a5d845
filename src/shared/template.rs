//! `${name}` placeholder substitution for config templates.

/// Replace every `${name}` in `template` with its value from `vars`.
/// Unknown placeholders are left untouched.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter()
        .fold(template.to_string(), |rendered, (name, value)| {
            rendered.replace(&format!("${{{name}}}"), value)
        })
}
