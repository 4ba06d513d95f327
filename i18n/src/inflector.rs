//! English inflections for association, model and table names.
//!
//! Rules are tried in order and the first matching one wins. Only the last
//! word of a snake_case or spaced name is inflected, so `order_invoice`
//! pluralizes to `order_invoices`.

use std::sync::LazyLock;

use regex_lite::Regex;

type Rules = Vec<(Regex, &'static str)>;

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "jeans",
    "police",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("child", "children"),
    ("sex", "sexes"),
    ("move", "moves"),
    ("zombie", "zombies"),
];

static PLURALS: LazyLock<Rules> = LazyLock::new(|| {
    compile(&[
        (r"(?i)(quiz)$", "${1}zes"),
        (r"(?i)^(oxen)$", "${1}"),
        (r"(?i)^(ox)$", "${1}en"),
        (r"(?i)^(m|l)ice$", "${1}ice"),
        (r"(?i)^(m|l)ouse$", "${1}ice"),
        (r"(?i)(matr|vert|ind)(?:ix|ex)$", "${1}ices"),
        (r"(?i)(x|ch|ss|sh)$", "${1}es"),
        (r"(?i)([^aeiouy]|qu)y$", "${1}ies"),
        (r"(?i)(hive)$", "${1}s"),
        (r"(?i)(?:([^f])fe|([lr])f)$", "${1}${2}ves"),
        (r"(?i)sis$", "ses"),
        (r"(?i)([ti])a$", "${1}a"),
        (r"(?i)([ti])um$", "${1}a"),
        (r"(?i)(buffal|tomat)o$", "${1}oes"),
        (r"(?i)(bu)s$", "${1}ses"),
        (r"(?i)(alias|status)$", "${1}es"),
        (r"(?i)(octop|vir)i$", "${1}i"),
        (r"(?i)(octop|vir)us$", "${1}i"),
        (r"(?i)^(ax|test)is$", "${1}es"),
        (r"(?i)s$", "s"),
        (r"$", "s"),
    ])
});

static SINGULARS: LazyLock<Rules> = LazyLock::new(|| {
    compile(&[
        (r"(?i)(database)s$", "${1}"),
        (r"(?i)(quiz)zes$", "${1}"),
        (r"(?i)(matr)ices$", "${1}ix"),
        (r"(?i)(vert|ind)ices$", "${1}ex"),
        (r"(?i)^(ox)en", "${1}"),
        (r"(?i)(alias|status)(es)?$", "${1}"),
        (r"(?i)(octop|vir)(us|i)$", "${1}us"),
        (r"(?i)^(a)x[ie]s$", "${1}xis"),
        (r"(?i)(cris|test)(is|es)$", "${1}is"),
        (r"(?i)(shoe)s$", "${1}"),
        (r"(?i)(o)es$", "${1}"),
        (r"(?i)(bus)(es)?$", "${1}"),
        (r"(?i)^(m|l)ice$", "${1}ouse"),
        (r"(?i)(x|ch|ss|sh)es$", "${1}"),
        (r"(?i)(m)ovies$", "${1}ovie"),
        (r"(?i)(s)eries$", "${1}eries"),
        (r"(?i)([^aeiouy]|qu)ies$", "${1}y"),
        (r"(?i)([lr])ves$", "${1}f"),
        (r"(?i)(tive)s$", "${1}"),
        (r"(?i)(hive)s$", "${1}"),
        (r"(?i)([^f])ves$", "${1}fe"),
        (r"(?i)(^analy)(sis|ses)$", "${1}sis"),
        (
            r"(?i)((a)naly|(b)a|(d)iagno|(p)arenthe|(p)rogno|(s)ynop|(t)he)(sis|ses)$",
            "${1}sis",
        ),
        (r"(?i)([ti])a$", "${1}um"),
        (r"(?i)(n)ews$", "${1}ews"),
        (r"(?i)(ss)$", "${1}"),
        (r"(?i)s$", ""),
    ])
});

fn compile(rules: &[(&str, &'static str)]) -> Rules {
    rules
        .iter()
        .map(|(pattern, replacement)| {
            let regex = Regex::new(pattern).expect("inflection pattern is valid");
            (regex, *replacement)
        })
        .collect()
}

/// Split `word` into (prefix, last word), keeping the separator in the prefix.
fn split_last_word(word: &str) -> (&str, &str) {
    match word.rfind(['_', ' ']) {
        Some(index) => word.split_at(index + 1),
        None => ("", word),
    }
}

fn match_case(template: &str, word: &str) -> String {
    let starts_upper = template.chars().next().is_some_and(char::is_uppercase);
    if !starts_upper {
        return word.to_string();
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn inflect(word: &str, rules: &Rules, irregular: impl Fn(&str) -> Option<&'static str>) -> String {
    let (prefix, last) = split_last_word(word);
    if last.is_empty() {
        return word.to_string();
    }

    let lower = last.to_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some(replacement) = irregular(&lower) {
        return format!("{}{}", prefix, match_case(last, replacement));
    }

    for (regex, replacement) in rules {
        if regex.is_match(last) {
            return format!("{}{}", prefix, regex.replace(last, *replacement));
        }
    }
    word.to_string()
}

/// Plural form of `word` (`order` -> `orders`, `category` -> `categories`).
pub fn pluralize(word: &str) -> String {
    inflect(word, &PLURALS, |lower| {
        IRREGULAR
            .iter()
            .find(|(singular, plural)| *singular == lower || *plural == lower)
            .map(|(_, plural)| *plural)
    })
}

/// Singular form of `word` (`orders` -> `order`, `categories` -> `category`).
pub fn singularize(word: &str) -> String {
    inflect(word, &SINGULARS, |lower| {
        IRREGULAR
            .iter()
            .find(|(singular, plural)| *plural == lower || *singular == lower)
            .map(|(singular, _)| *singular)
    })
}

/// `OrderInvoice` -> `order_invoice`.
pub fn underscore(word: &str) -> String {
    let mut out = String::with_capacity(word.len() + 4);
    let chars: Vec<char> = word.replace("::", "/").chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1);
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(|n| n.is_lowercase()),
                _ => false,
            };
            if boundary {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else if *c == '-' {
            out.push('_');
        } else {
            out.push(*c);
        }
    }
    out
}

/// `order_invoice` -> `OrderInvoice`.
pub fn camelize(word: &str) -> String {
    word.split('/')
        .map(|segment| {
            segment
                .split('_')
                .filter(|part| !part.is_empty())
                .map(|part| match_case("A", part))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("::")
}

/// Table name for a model name: `OrderInvoice` -> `order_invoices`.
pub fn tableize(class_name: &str) -> String {
    pluralize(&underscore(class_name))
}

/// Model name for a table or association name: `order_invoices` -> `OrderInvoice`.
pub fn classify(name: &str) -> String {
    camelize(&singularize(name))
}

/// Foreign key column for a model name: `Category` -> `category_id`.
pub fn foreign_key(class_name: &str) -> String {
    format!("{}_id", underscore(class_name))
}
