use std::sync::LazyLock;

use regex::Regex;

/// Wrapper artifacts of the serialized instruction list: the `c(` opener, closing
/// parentheses and double quotes.
static LIST_ARTIFACTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"c\(|\)|""#).expect("valid regex"));

const ITEM_SEPARATOR: &str = ", ";

/// Turn a stored instruction list such as `c("Preheat oven.", "Bake 20 minutes.")` into
/// display text (`Preheat oven. Bake 20 minutes.`).
///
/// A single pass can expose new artifacts (removing a quote may join `c` and `(`), so the
/// pass repeats until the text stops changing. Each pass that changes anything shortens
/// the text, so this terminates, and normalizing the output again is a no-op.
pub fn normalize(raw: &str) -> String {
    let mut text = raw.to_string();
    loop {
        let next = normalize_once(&text);
        if next == text {
            return text;
        }
        text = next;
    }
}

fn normalize_once(text: &str) -> String {
    let stripped = LIST_ARTIFACTS.replace_all(text, "");
    stripped.split(ITEM_SEPARATOR).collect::<Vec<_>>().join(" ")
}
