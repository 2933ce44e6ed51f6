use resume_pdf::fit::{ELLIPSIS, budget, normalize, shorten};

const SAMPLES: &[&str] = &[
    "",
    "court",
    "  a\n\tb  ",
    "Une phrase assez longue, avec des virgules; des points. Et encore du texte pour dépasser.",
    "motsansaucunespacequidepasselargementlebudgetfixe",
    "abc, def, ghi, jkl, mno, pqr, stu",
    "Élaboration de modèles — prévision à J+1 … puis mise en production",
];

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[test]
fn normalize_collapses_whitespace() {
    assert_eq!(normalize("  a\n\tb  "), "a b");
    assert_eq!(normalize("one   two\r\nthree"), "one two three");
    assert_eq!(normalize(" \n\t "), "");
}

#[test]
fn normalize_repairs_mojibake_apostrophe() {
    assert_eq!(normalize("l\u{FFFD}équipe  d\u{FFFD}abord"), "l'équipe d'abord");
}

#[test]
fn shorten_within_budget_is_normalize() {
    for &s in SAMPLES {
        let n = char_len(&normalize(s));
        assert_eq!(shorten(s, n), normalize(s), "{s:?}");
        assert_eq!(shorten(s, n + 10), normalize(s), "{s:?}");
    }
}

#[test]
fn shorten_is_idempotent() {
    for &s in SAMPLES {
        for n in [0, 1, 3, 5, 10, 17, 40, 80] {
            let once = shorten(s, n);
            assert_eq!(shorten(&once, n), once, "{s:?} at {n}");
        }
    }
}

#[test]
fn shorten_respects_budget() {
    for &s in SAMPLES {
        for n in [1, 4, 12, 25, 60] {
            let out = shorten(s, n);
            let body = out.strip_suffix(ELLIPSIS).unwrap_or(&out);
            assert!(char_len(body) <= n, "{out:?} exceeds {n}");
        }
    }
}

#[test]
fn shorten_cuts_at_word_boundary() {
    assert_eq!(shorten("alpha beta gamma delta", 13), "alpha beta…");
    assert_eq!(shorten("alpha beta gamma delta", 12), "alpha beta…");
}

#[test]
fn shorten_strips_trailing_punctuation() {
    assert_eq!(shorten("abc, def, ghi, jkl", 10), "abc, def…");
    assert_eq!(shorten("Fin de phrase. Suite du texte", 16), "Fin de phrase…");
    assert_eq!(shorten("un deux : trois quatre", 9), "un deux…");
}

#[test]
fn shorten_without_space_hard_cuts() {
    assert_eq!(shorten("abcdefghijklmnop", 5), "abcde…");
    assert_eq!(shorten("abcd.efghijk", 5), "abcd…");
}

#[test]
fn shorten_never_trims_to_a_bare_ellipsis() {
    assert_eq!(shorten(".........", 3), "...…");
    assert_eq!(shorten(", , , abc", 4), ", ,…");
    for s in [".........", ", , , abc", ";;;; ::::"] {
        for n in 1..6 {
            let once = shorten(s, n);
            assert_ne!(once, ELLIPSIS.to_string(), "{s:?} at {n}");
            assert_eq!(shorten(&once, n), once, "{s:?} at {n}");
        }
    }
}

#[test]
fn shorten_counts_characters_not_bytes() {
    assert_eq!(shorten("éééé ààà", 8), "éééé ààà");
    assert_eq!(shorten("éééé ààà ùùù", 8), "éééé…");
}

#[test]
fn long_summary_fits_its_budget() {
    let sentence = "Ingénieure data, passionnée par la prévision; ";
    let mut summary = String::new();
    while char_len(&summary) < 400 {
        summary.push_str(sentence);
    }
    let summary: String = summary.chars().take(400).collect();

    let out = shorten(&summary, budget::SUMMARY);
    assert!(char_len(&out) <= budget::SUMMARY + 1);
    assert!(out.ends_with(ELLIPSIS));

    let body = out.strip_suffix(ELLIPSIS).unwrap();
    assert!(!body.ends_with([',', '.', ';', ':']), "{body:?}");
    assert!(normalize(&summary).starts_with(body));
    let next = normalize(&summary).chars().nth(char_len(body));
    assert!(
        matches!(next, Some(' ' | ',' | '.' | ';' | ':')),
        "cut inside a word: {body:?}"
    );
}
