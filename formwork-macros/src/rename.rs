/// Case conversion applied by `#[form(rename_all = "...")]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RenameRule {
    CamelCase,
    SnakeCase,
    KebabCase,
    PascalCase,
    ScreamingSnakeCase,
    ScreamingKebabCase,
    Lowercase,
    Uppercase,
}

impl RenameRule {
    pub(crate) const ALL: &'static [(&'static str, RenameRule)] = &[
        ("camelCase", RenameRule::CamelCase),
        ("snake_case", RenameRule::SnakeCase),
        ("kebab-case", RenameRule::KebabCase),
        ("PascalCase", RenameRule::PascalCase),
        ("SCREAMING_SNAKE_CASE", RenameRule::ScreamingSnakeCase),
        ("SCREAMING-KEBAB-CASE", RenameRule::ScreamingKebabCase),
        ("lowercase", RenameRule::Lowercase),
        ("UPPERCASE", RenameRule::Uppercase),
    ];

    pub(crate) fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .find_map(|(name, rule)| (*name == s).then_some(*rule))
    }

    pub(crate) fn apply(self, name: &str) -> String {
        let words = words(name);
        match self {
            RenameRule::CamelCase => {
                let mut out = String::with_capacity(name.len());
                for (i, word) in words.iter().enumerate() {
                    if i == 0 {
                        out.push_str(&word.to_lowercase());
                    } else {
                        push_capitalized(&mut out, word);
                    }
                }
                out
            }
            RenameRule::PascalCase => {
                let mut out = String::with_capacity(name.len());
                for word in &words {
                    push_capitalized(&mut out, word);
                }
                out
            }
            RenameRule::SnakeCase => join(&words, '_', str::to_lowercase),
            RenameRule::KebabCase => join(&words, '-', str::to_lowercase),
            RenameRule::ScreamingSnakeCase => join(&words, '_', str::to_uppercase),
            RenameRule::ScreamingKebabCase => join(&words, '-', str::to_uppercase),
            RenameRule::Lowercase => name.to_lowercase(),
            RenameRule::Uppercase => name.to_uppercase(),
        }
    }
}

fn push_capitalized(out: &mut String, word: &str) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.push_str(&chars.as_str().to_lowercase());
    }
}

fn join(words: &[&str], sep: char, case: fn(&str) -> String) -> String {
    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            out.push(sep);
        }
        out.push_str(&case(word));
    }
    out
}

/// Splits on `_`, `-` and lower-to-upper transitions. A run of capitals
/// stays one word, so `HTTPStatus` is `HTTP`, `Status`.
fn words(name: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let chars: Vec<(usize, char)> = name.char_indices().collect();
    let mut start = None;

    for (pos, &(i, c)) in chars.iter().enumerate() {
        if c == '_' || c == '-' {
            if let Some(s) = start.take() {
                words.push(&name[s..i]);
            }
            continue;
        }
        let Some(s) = start else {
            start = Some(i);
            continue;
        };
        let prev = chars[pos - 1].1;
        let next_is_lower = chars
            .get(pos + 1)
            .is_some_and(|&(_, n)| n.is_lowercase());
        let boundary = c.is_uppercase()
            && (prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower));
        if boundary {
            words.push(&name[s..i]);
            start = Some(i);
        }
    }
    if let Some(s) = start {
        words.push(&name[s..]);
    }
    words
}
