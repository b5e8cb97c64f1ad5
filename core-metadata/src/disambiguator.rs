//! Content Disambiguator
//!
//! Prose sources such as Wikipedia are ambiguous by name alone: "Queen" is
//! also a monarch, "Boston" a city. A summary is accepted as being about a
//! musical act only when it mentions at least two distinct terms from a fixed
//! English/Spanish domain vocabulary. One incidental mention ("a jazz club
//! downtown") is not enough signal. A compound term counts once: "electronic
//! music" is one mention, not one for the phrase plus one for "music".
//!
//! A cheaper hint, [`ContentDisambiguator::title_hint_score`], ranks search hits
//! by their title and short description so the best candidate is fetched first.

/// Genres, instruments, roles and industry terms in English and Spanish
const MUSIC_KEYWORDS: &[&str] = &[
    // English
    "music",
    "musician",
    "musical",
    "band",
    "singer",
    "songwriter",
    "rapper",
    "composer",
    "guitarist",
    "bassist",
    "drummer",
    "pianist",
    "vocalist",
    "album",
    "single",
    "song",
    "record label",
    "discography",
    "concert",
    "tour",
    "rock",
    "pop",
    "jazz",
    "blues",
    "hip hop",
    "rap",
    "heavy metal",
    "punk",
    "reggae",
    "folk",
    "electronic music",
    "orchestra",
    "guitar",
    "piano",
    "drums",
    "studio album",
    "billboard",
    "grammy",
    "record producer",
    "dj",
    // Spanish
    "música",
    "músico",
    "banda",
    "cantante",
    "cantautor",
    "compositor",
    "guitarrista",
    "bajista",
    "baterista",
    "pianista",
    "vocalista",
    "álbum",
    "sencillo",
    "canción",
    "discográfica",
    "gira musical",
    "concierto",
    "grupo musical",
    "orquesta",
    "guitarra",
    "disco de estudio",
    "rock en español",
];

/// Terms that, in a search hit title or description, point at a musical act
const TITLE_INDICATORS: &[&str] = &[
    "band",
    "musical group",
    "musician",
    "singer",
    "rapper",
    "songwriter",
    "composer",
    "dj",
    "banda",
    "grupo musical",
    "músico",
    "cantante",
    "cantautor",
    "álbum",
    "album",
];

/// Distinct keyword matches needed to accept a text
pub const DEFAULT_THRESHOLD: usize = 2;

#[derive(Debug, Clone)]
pub struct ContentDisambiguator {
    keywords: Vec<String>,
    threshold: usize,
}

impl Default for ContentDisambiguator {
    fn default() -> Self {
        Self::new(MUSIC_KEYWORDS.iter().copied(), DEFAULT_THRESHOLD)
    }
}

/// Search hit considered by [`ContentDisambiguator::pick_best_candidate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub title: String,
    pub description: String,
}

impl ContentDisambiguator {
    pub fn new<I, S>(keywords: I, threshold: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
            threshold,
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Number of distinct domain keywords present in `text`
    ///
    /// Occurrences lying inside a longer matched keyword are not counted.
    pub fn keyword_matches(&self, text: &str) -> usize {
        distinct_matches(&text.to_lowercase(), &self.keywords)
    }

    /// True when `text` reads like an article about a musical act
    pub fn is_music_related(&self, text: &str) -> bool {
        self.keyword_matches(text) >= self.threshold
    }

    /// Scores a search hit by music indicators in its title and description
    ///
    /// Title indicators weigh double since opensearch titles carry the
    /// disambiguation in parentheses, e.g. `"Boston (band)"`.
    pub fn title_hint_score(&self, title: &str, description: &str) -> usize {
        let title = title.to_lowercase();
        let description = description.to_lowercase();

        let title_hits = distinct_matches(&title, TITLE_INDICATORS);
        let description_hits = distinct_matches(&description, &self.keywords);

        title_hits * 2 + description_hits
    }

    /// Highest hint score wins; ties keep the search engine's order
    pub fn pick_best_candidate<'a>(&self, candidates: &'a [Candidate]) -> Option<&'a Candidate> {
        let mut best: Option<(&Candidate, usize)> = None;
        for candidate in candidates {
            let score = self.title_hint_score(&candidate.title, &candidate.description);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((candidate, score));
            }
        }
        best.map(|(candidate, _)| candidate)
    }
}

/// Counts the terms with at least one occurrence not enclosed by a longer
/// term's occurrence
fn distinct_matches<S: AsRef<str>>(haystack: &str, terms: &[S]) -> usize {
    let spans: Vec<Vec<(usize, usize)>> = terms
        .iter()
        .map(|term| term_spans(haystack, term.as_ref()))
        .collect();

    let enclosed = |own: usize, (start, end): (usize, usize)| {
        spans.iter().enumerate().any(|(other, other_spans)| {
            other != own
                && other_spans
                    .iter()
                    .any(|&(s, e)| s <= start && end <= e && e - s > end - start)
        })
    };

    spans
        .iter()
        .enumerate()
        .filter(|(index, own_spans)| own_spans.iter().any(|&span| !enclosed(*index, span)))
        .count()
}

/// Byte spans of word-boundary matches of an already lower-cased `term`,
/// tolerating a plural `s`/`es` suffix ("bands", "álbumes")
fn term_spans(haystack: &str, term: &str) -> Vec<(usize, usize)> {
    if term.is_empty() {
        return Vec::new();
    }

    haystack
        .match_indices(term)
        .filter_map(|(index, _)| {
            let starts_word = haystack[..index]
                .chars()
                .next_back()
                .map_or(true, |c| !c.is_alphanumeric());

            let rest = &haystack[index + term.len()..];
            let rest = rest
                .strip_prefix("es")
                .filter(|r| ends_word(r))
                .or_else(|| rest.strip_prefix('s').filter(|r| ends_word(r)))
                .unwrap_or(rest);

            (starts_word && ends_word(rest)).then(|| (index, haystack.len() - rest.len()))
        })
        .collect()
}

fn ends_word(rest: &str) -> bool {
    rest.chars().next().map_or(true, |c| !c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_distinct_keywords() {
        let d = ContentDisambiguator::default();
        let text = "Soda Stereo was an Argentine rock band. The band released a studio album.";
        // rock, band, studio album
        assert_eq!(d.keyword_matches(text), 3);
        assert!(d.is_music_related(text));
    }

    #[test]
    fn test_compound_term_is_one_mention() {
        let d = ContentDisambiguator::default();
        let text = "Boston is the capital of Massachusetts. The city once hosted an electronic music fair.";
        assert_eq!(d.keyword_matches(text), 1);
        assert!(!d.is_music_related(text));

        assert_eq!(d.keyword_matches("Fundó un grupo musical."), 1);
        assert_eq!(d.keyword_matches("Recorded a studio album."), 1);
        assert_eq!(d.keyword_matches("Hicieron una gira musical."), 1);
    }

    #[test]
    fn test_compound_term_keeps_standalone_mentions() {
        let d = ContentDisambiguator::default();
        // rock en español, rock
        let text = "Pioneers of rock en español who later turned to hard rock.";
        assert_eq!(d.keyword_matches(text), 2);
        assert!(d.is_music_related(text));
    }

    #[test]
    fn test_everyday_spanish_words_do_not_count() {
        let d = ContentDisambiguator::default();
        let text = "El técnico cambió la batería del portátil y formateó el disco duro antes de la gira por la ciudad.";
        assert_eq!(d.keyword_matches(text), 0);
        assert!(!d.is_music_related(text));
    }

    #[test]
    fn test_single_mention_is_rejected() {
        let d = ContentDisambiguator::default();
        let text = "Boston is the capital of Massachusetts, known for a famous jazz club downtown.";
        assert_eq!(d.keyword_matches(text), 1);
        assert!(!d.is_music_related(text));
    }

    #[test]
    fn test_word_boundaries() {
        let d = ContentDisambiguator::default();
        // "rocky", "popular", "toured" and "bandwidth" must not count
        let text = "A rocky and popular hiking trail toured for its bandwidth.";
        assert_eq!(d.keyword_matches(text), 0);
    }

    #[test]
    fn test_plural_and_case_insensitive() {
        let d = ContentDisambiguator::default();
        assert_eq!(d.keyword_matches("Several BANDS and Singers"), 2);
    }

    #[test]
    fn test_spanish_text() {
        let d = ContentDisambiguator::default();
        let text = "Los Prisioneros fue una banda chilena de rock. Su primer álbum fue un éxito.";
        assert!(d.is_music_related(text));
    }

    #[test]
    fn test_custom_threshold() {
        let d = ContentDisambiguator::new(["guitar", "drums"], 1);
        assert!(d.is_music_related("He plays guitar"));
        assert!(!d.is_music_related("He plays chess"));
    }

    #[test]
    fn test_pick_best_candidate() {
        let d = ContentDisambiguator::default();
        let candidates = vec![
            Candidate {
                title: "Queen".into(),
                description: "female monarch".into(),
            },
            Candidate {
                title: "Queen (band)".into(),
                description: "British rock band".into(),
            },
            Candidate {
                title: "Queen Elizabeth".into(),
                description: "".into(),
            },
        ];

        let best = d.pick_best_candidate(&candidates).unwrap();
        assert_eq!(best.title, "Queen (band)");
    }

    #[test]
    fn test_pick_best_candidate_keeps_order_on_tie() {
        let d = ContentDisambiguator::default();
        let candidates = vec![
            Candidate {
                title: "Alpha".into(),
                description: "".into(),
            },
            Candidate {
                title: "Beta".into(),
                description: "".into(),
            },
        ];
        assert_eq!(d.pick_best_candidate(&candidates).unwrap().title, "Alpha");
        assert!(d.pick_best_candidate(&[]).is_none());
    }
}
