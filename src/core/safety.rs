// crisis phrase detection
// fuzzy on purpose: "kil myself" has to trip it the same as "kill myself"

use strsim::normalized_levenshtein;

pub const SAFETY_PHRASES: &[&str] = &[
    "end it all",
    "kill myself",
    "killing myself",
    "suicide",
    "suicidal",
    "want to die",
    "self harm",
    "hurt myself",
    "can't go on",
    "no reason to live",
    "better off dead",
    "hopeless",
    "worthless",
    "despair",
];

// percent, inclusive
pub const DEFAULT_THRESHOLD: f64 = 80.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Safety {
    pub is_flagged: bool,
    pub phrase: Option<&'static str>,
    pub score: f64,
}

impl Safety {
    pub fn check(entry: &str) -> Self {
        Self::check_with(entry, DEFAULT_THRESHOLD)
    }

    pub fn check_with(entry: &str, threshold: f64) -> Self {
        let text = normalize(entry);
        let words: Vec<&str> = text.split_whitespace().collect();

        let mut best = Self {
            is_flagged: false,
            phrase: None,
            score: 0.0,
        };

        if words.is_empty() {
            return best;
        }

        for &phrase in SAFETY_PHRASES {
            let score = phrase_score(&text, &words, phrase);
            if score > best.score {
                best.score = score;
                best.phrase = Some(phrase);
            }
            // exact hit, nothing can beat it
            if score >= 100.0 {
                break;
            }
        }

        best.is_flagged = best.score >= threshold;
        if !best.is_flagged {
            best.phrase = None;
        }
        best
    }
}

// lowercase, straight apostrophes, punctuation to spaces
pub fn normalize(text: &str) -> String {
    let mapped: String = text
        .chars()
        .map(|c| match c {
            '\u{2019}' | '\u{2018}' | '`' => '\'',
            c if c.is_alphanumeric() || c == '\'' => c,
            _ => ' ',
        })
        .collect::<String>()
        .to_lowercase();

    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

// everyday words within one edit of a phrase word
const LOOKALIKES: &[&str] = &["homeless", "dine", "diet", "dice", "dive", "died"];

// best similarity (0-100) of `phrase` against any same-length word window
fn phrase_score(text: &str, words: &[&str], phrase: &str) -> f64 {
    if text.contains(phrase) {
        return 100.0;
    }

    let targets: Vec<&str> = phrase.split_whitespace().collect();
    if words.len() < targets.len() {
        return normalized_levenshtein(text, phrase) * 100.0;
    }

    words
        .windows(targets.len())
        .filter(|window| plausible_typo(window, &targets))
        .map(|window| normalized_levenshtein(&window.join(" "), phrase) * 100.0)
        .fold(0.0, f64::max)
}

// a misspelt word keeps its first letter and isn't some other common word
fn plausible_typo(window: &[&str], targets: &[&str]) -> bool {
    window.iter().zip(targets).all(|(word, target)| {
        word == target
            || (word.chars().next() == target.chars().next() && !LOOKALIKES.contains(word))
    })
}
