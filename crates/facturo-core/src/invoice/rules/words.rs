//! French cardinal words for invoice totals ("montant en lettres").

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

const UNITS: [&str; 10] = [
    "zéro", "un", "deux", "trois", "quatre", "cinq", "six", "sept", "huit", "neuf",
];

const TEENS: [&str; 10] = [
    "dix", "onze", "douze", "treize", "quatorze", "quinze", "seize", "dix-sept", "dix-huit",
    "dix-neuf",
];

// 70 and 90 are built on 60 and 80 plus a teen.
const TENS: [&str; 10] = [
    "", "dix", "vingt", "trente", "quarante", "cinquante", "soixante", "soixante",
    "quatre-vingt", "quatre-vingt",
];

/// Currency unit of the integer part.
pub const CURRENCY_UNIT: &str = "dirhams";

/// Currency unit of the fractional part.
pub const SUBUNIT: &str = "centimes";

/// 0..=99. `plural` allows the trailing "s" of a bare "quatre-vingts".
fn below_hundred(n: usize, plural: bool) -> String {
    match n {
        0..=9 => UNITS[n].to_string(),
        10..=19 => TEENS[n - 10].to_string(),
        _ => {
            let (tens, unit) = (n / 10, n % 10);
            let base = TENS[tens];
            match (tens, unit) {
                (7, 1) => format!("{} et {}", base, TEENS[1]),
                (7, _) | (9, _) => format!("{}-{}", base, TEENS[unit]),
                (8, 0) if plural => format!("{}s", base),
                (_, 0) => base.to_string(),
                (8, _) => format!("{}-{}", base, UNITS[unit]),
                (_, 1) => format!("{} et un", base),
                _ => format!("{}-{}", base, UNITS[unit]),
            }
        }
    }
}

/// 1..=999.
fn below_thousand(n: usize, plural: bool) -> String {
    let (hundreds, rest) = (n / 100, n % 100);
    let mut parts = Vec::with_capacity(2);

    match hundreds {
        0 => {}
        1 => parts.push("cent".to_string()),
        h if rest == 0 && plural => parts.push(format!("{} cents", UNITS[h])),
        h => parts.push(format!("{} cent", UNITS[h])),
    }
    if rest > 0 {
        parts.push(below_hundred(rest, plural));
    }

    parts.join(" ")
}

/// Spell out a non-negative integer in French, lowercase.
pub fn number_to_words(n: u128) -> String {
    if n == 0 {
        return UNITS[0].to_string();
    }

    let billions = n / 1_000_000_000;
    let millions = ((n / 1_000_000) % 1000) as usize;
    let thousands = ((n / 1000) % 1000) as usize;
    let rest = (n % 1000) as usize;

    let mut parts = Vec::with_capacity(4);
    match billions {
        0 => {}
        1 => parts.push("un milliard".to_string()),
        b => parts.push(format!("{} milliards", number_to_words(b))),
    }
    match millions {
        0 => {}
        1 => parts.push("un million".to_string()),
        m => parts.push(format!("{} millions", below_thousand(m, true))),
    }
    match thousands {
        0 => {}
        1 => parts.push("mille".to_string()),
        // "mille" is invariable and keeps "cent"/"quatre-vingt" singular
        t => parts.push(format!("{} mille", below_thousand(t, false))),
    }
    if rest > 0 {
        parts.push(below_thousand(rest, true));
    }

    parts.join(" ")
}

/// Spell out an amount as dirhams and centimes, capitalized.
///
/// The amount is rounded to two decimals first; centimes are only spelled
/// out when non-zero.
pub fn amount_to_words(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let magnitude = rounded.abs();
    let integer = magnitude.trunc();
    let cents = ((magnitude - integer) * Decimal::ONE_HUNDRED)
        .round()
        .to_u128()
        .unwrap_or(0);

    let mut words = String::new();
    if rounded.is_sign_negative() && !rounded.is_zero() {
        words.push_str("moins ");
    }
    words.push_str(&number_to_words(integer.to_u128().unwrap_or(0)));
    words.push(' ');
    words.push_str(CURRENCY_UNIT);

    if cents > 0 {
        words.push_str(" et ");
        words.push_str(&number_to_words(cents));
        words.push(' ');
        words.push_str(SUBUNIT);
    }

    capitalize(&words)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
