const UNITS: [&str; 10] = [
    "", "un", "deux", "trois", "quatre", "cinq", "six", "sept", "huit", "neuf",
];
const TEENS: [&str; 10] = [
    "dix", "onze", "douze", "treize", "quatorze", "quinze", "seize", "dix-sept", "dix-huit",
    "dix-neuf",
];
const TENS: [&str; 10] = [
    "", "", "vingt", "trente", "quarante", "cinquante", "soixante", "soixante", "quatre-vingt",
    "quatre-vingt",
];

/// Scales above a thousand, with their singular and plural nouns.
const SCALES: [(i64, &str, &str); 2] = [
    (1_000_000_000, "milliard", "milliards"),
    (1_000_000, "million", "millions"),
];

/// Spells out an integer in French, the way amounts are written on bank
/// slips (e.g. 2355 -> "deux mille trois cent cinquante-cinq").
pub fn number_to_words(n: i64) -> String {
    if n == 0 {
        return "zéro".to_string();
    }
    if n < 0 {
        return format!("moins {}", number_to_words(n.saturating_neg()));
    }

    let mut parts = Vec::new();
    let mut n = n;

    for (scale, one, many) in SCALES {
        let count = n / scale;
        if count > 0 {
            let noun = if count > 1 { many } else { one };
            parts.push(format!("{} {}", number_to_words(count), noun));
            n %= scale;
        }
    }

    match n / 1000 {
        0 => {}
        1 => parts.push("mille".to_string()),
        thousands => parts.push(format!(
            "{} mille",
            without_plural(below_thousand(thousands as usize))
        )),
    }

    let rest = (n % 1000) as usize;
    if rest > 0 {
        parts.push(below_thousand(rest));
    }
    parts.join(" ")
}

/// "cents" and "quatre-vingts" lose their s in front of "mille".
fn without_plural(mut words: String) -> String {
    if words.ends_with("cents") || words.ends_with("vingts") {
        words.pop();
    }
    words
}

fn below_thousand(n: usize) -> String {
    let mut words = String::new();
    let hundreds = n / 100;
    let rest = n % 100;
    match hundreds {
        0 => {}
        1 => words.push_str("cent "),
        h => {
            words.push_str(UNITS[h]);
            words.push_str(" cent");
            // Only a round hundred takes the plural.
            if rest == 0 {
                words.push('s');
            }
            words.push(' ');
        }
    }
    words.push_str(&below_hundred(rest));
    words.trim().to_string()
}

fn below_hundred(n: usize) -> String {
    if n >= 20 {
        let ten = n / 10;
        let unit = n % 10;
        match ten {
            7 => match unit {
                0 => "soixante-dix".to_string(),
                1 => "soixante et onze".to_string(),
                u => format!("soixante-{}", TEENS[u]),
            },
            8 => match unit {
                0 => "quatre-vingts".to_string(),
                u => format!("quatre-vingt-{}", UNITS[u]),
            },
            9 => format!("quatre-vingt-{}", TEENS[unit]),
            t => match unit {
                0 => TENS[t].to_string(),
                1 => format!("{} et un", TENS[t]),
                u => format!("{}-{}", TENS[t], UNITS[u]),
            },
        }
    } else if n >= 10 {
        TEENS[n - 10].to_string()
    } else {
        UNITS[n].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_numbers() {
        assert_eq!(number_to_words(0), "zéro");
        assert_eq!(number_to_words(7), "sept");
        assert_eq!(number_to_words(16), "seize");
        assert_eq!(number_to_words(21), "vingt et un");
        assert_eq!(number_to_words(63), "soixante-trois");
    }

    #[test]
    fn seventies_to_nineties() {
        assert_eq!(number_to_words(70), "soixante-dix");
        assert_eq!(number_to_words(71), "soixante et onze");
        assert_eq!(number_to_words(75), "soixante-quinze");
        assert_eq!(number_to_words(80), "quatre-vingts");
        assert_eq!(number_to_words(81), "quatre-vingt-un");
        assert_eq!(number_to_words(90), "quatre-vingt-dix");
        assert_eq!(number_to_words(99), "quatre-vingt-dix-neuf");
    }

    #[test]
    fn hundreds_and_thousands() {
        assert_eq!(number_to_words(100), "cent");
        assert_eq!(number_to_words(200), "deux cents");
        assert_eq!(number_to_words(201), "deux cent un");
        assert_eq!(number_to_words(1000), "mille");
        assert_eq!(
            number_to_words(2355),
            "deux mille trois cent cinquante-cinq"
        );
    }

    #[test]
    fn plural_is_dropped_before_mille() {
        assert_eq!(number_to_words(80_000), "quatre-vingt mille");
        assert_eq!(number_to_words(200_000), "deux cent mille");
        assert_eq!(number_to_words(280_000), "deux cent quatre-vingt mille");
        assert_eq!(number_to_words(201_000), "deux cent un mille");
    }

    #[test]
    fn millions_and_milliards() {
        assert_eq!(number_to_words(1_000_000), "un million");
        assert_eq!(number_to_words(2_000_000), "deux millions");
        assert_eq!(number_to_words(80_000_000), "quatre-vingts millions");
        assert_eq!(
            number_to_words(1_171_915),
            "un million cent soixante et onze mille neuf cent quinze"
        );
        assert_eq!(number_to_words(3_000_000_000), "trois milliards");
    }

    #[test]
    fn negatives() {
        assert_eq!(number_to_words(-5), "moins cinq");
    }
}
