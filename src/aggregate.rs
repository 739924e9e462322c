use crate::answer::ChunkAnswer;

/// Pick the longest answer; ties go to the lowest chunk index.
///
/// Length is a crude stand-in for answer quality: a verbose wrong answer
/// beats a terse right one. Returns an empty string when every chunk was
/// absent.
pub fn pick_best(answers: &[ChunkAnswer]) -> String {
    pick_best_by(answers, |text| text.chars().count())
}

/// Pick the answer with the strictly greatest score under `scorer`.
///
/// Candidates are visited in chunk order, so equal scores resolve to the
/// earliest chunk no matter how `answers` is ordered.
pub fn pick_best_by<F>(answers: &[ChunkAnswer], scorer: F) -> String
where
    F: Fn(&str) -> usize,
{
    let mut candidates: Vec<(usize, &str)> = answers
        .iter()
        .filter_map(|a| a.text().map(|text| (a.chunk_index(), text)))
        .collect();
    candidates.sort_by_key(|(index, _)| *index);

    let mut best: Option<(usize, &str)> = None;
    for (_, text) in candidates {
        let score = scorer(text);
        match best {
            Some((best_score, _)) if score <= best_score => {}
            _ => best = Some((score, text)),
        }
    }

    best.map(|(_, text)| text.to_string()).unwrap_or_default()
}
