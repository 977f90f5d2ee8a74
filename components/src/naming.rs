//! Component names derived from file paths.

use std::path::Path;

use crate::project::ProjectKind;

/// Camel-case an identifier split on anything that is not an ASCII letter or
/// digit. The first word is lowercased entirely; later words are capitalized.
pub fn to_camel_case(input: &str) -> String {
    input
        .split(|c: char| !c.is_ascii_alphanumeric())
        .enumerate()
        .map(|(index, word)| {
            if index == 0 {
                return word.to_ascii_lowercase();
            }
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    let mut capitalized = first.to_ascii_uppercase().to_string();
                    capitalized.push_str(&chars.as_str().to_ascii_lowercase());
                    capitalized
                }
                None => String::new(),
            }
        })
        .collect()
}

/// File name without its final extension.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Name substituted for `{{name}}` when generating a component.
///
/// Next.js route files are all called `page`, so they take their name from
/// the route directory instead.
pub fn component_name(path: &Path, project: ProjectKind) -> String {
    let name = to_camel_case(&file_stem(path));

    if project == ProjectKind::Next && name.eq_ignore_ascii_case("page") {
        let route = path
            .parent()
            .and_then(Path::file_name)
            .map(|dir| dir.to_string_lossy().into_owned())
            .unwrap_or_default();
        return format!("{}Page", to_camel_case(&route));
    }

    name
}
